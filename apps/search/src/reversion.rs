//! Facet reversion
//!
//! A facet must list every value that would still match if the shopper
//! changed their selection along the facet's own dimension. Its values are
//! therefore computed from a "reverted" criteria: a clone without the user
//! conditions the facet owns, keeping base conditions and every unrelated
//! filter. Both backends use the same reverted criteria; the relational
//! backend runs a secondary query with it, the search engine wraps the facet's
//! aggregation in a filter built from it.

use storefront_model::{Condition, Criteria, Facet};

/// Criteria clone for computing one facet, plus the selections that were
/// taken out of it.
#[derive(Debug, Clone)]
pub struct RevertedCriteria {
    pub criteria: Criteria,
    /// User conditions of the facet's own dimension, in criteria order
    pub active: Vec<Condition>,
}

impl RevertedCriteria {
    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }
}

/// Clone `criteria` and remove what `facet` owns.
///
/// With partial facets disabled every user condition is removed, and
/// sortings are reset since facet queries never need them.
pub fn revert(criteria: &Criteria, facet: &Facet) -> RevertedCriteria {
    let mut reverted = criteria.clone();
    reverted.reset_sorting();

    let removed: Vec<Condition> = criteria
        .user_conditions()
        .iter()
        .filter(|c| !criteria.generate_partial_facets() || facet.owns_condition(c))
        .cloned()
        .collect();

    for condition in &removed {
        reverted.remove_condition(&condition.name());
    }

    let active = removed
        .into_iter()
        .filter(|c| facet.owns_condition(c))
        .collect();

    RevertedCriteria {
        criteria: reverted,
        active,
    }
}

/// Ids selected by the shopper for a facet, across all of its active conditions.
pub fn active_ids(conditions: &[Condition]) -> Vec<i64> {
    let mut ids = Vec::new();
    for condition in conditions {
        match condition {
            Condition::Category { category_ids } => ids.extend(category_ids),
            Condition::Manufacturer { manufacturer_ids } => ids.extend(manufacturer_ids),
            Condition::Property { value_ids } => ids.extend(value_ids),
            _ => {}
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_model::{Sorting, SortingKind};

    fn criteria() -> Criteria {
        let mut criteria = Criteria::new();
        criteria
            .add_base_condition(Condition::category([5]))
            .unwrap()
            .add_condition(Condition::manufacturer([42]))
            .unwrap()
            .add_condition(Condition::ShippingFree)
            .unwrap()
            .add_condition(Condition::property([1, 2]))
            .unwrap()
            .add_condition(Condition::property([7]))
            .unwrap()
            .add_sorting(Sorting::asc(SortingKind::Price));
        criteria
    }

    #[test]
    fn removes_only_the_facets_own_condition() {
        let original = criteria();
        let reverted = revert(&original, &Facet::manufacturer());

        assert!(!reverted.criteria.has_condition("manufacturer"));
        assert!(reverted.criteria.has_condition("shipping_free"));
        assert!(reverted.criteria.has_base_condition("category"));
        assert_eq!(reverted.active, vec![Condition::manufacturer([42])]);
        assert_eq!(active_ids(&reverted.active), vec![42]);
    }

    #[test]
    fn original_criteria_is_untouched() {
        let original = criteria();
        let snapshot = original.clone();
        let _ = revert(&original, &Facet::manufacturer());
        assert_eq!(original, snapshot);
    }

    #[test]
    fn property_facet_reverts_every_property_condition() {
        let reverted = revert(&criteria(), &Facet::property());
        assert_eq!(reverted.active.len(), 2);
        assert_eq!(active_ids(&reverted.active), vec![1, 2, 7]);
        assert_eq!(reverted.criteria.user_conditions().len(), 2);
    }

    #[test]
    fn facet_without_selection_is_inactive() {
        let reverted = revert(&criteria(), &Facet::price());
        assert!(!reverted.is_active());
        assert_eq!(reverted.criteria.user_conditions().len(), 4);
        assert!(reverted.criteria.sortings().is_empty());
    }

    #[test]
    fn disabled_partial_facets_revert_all_user_conditions() {
        let mut original = criteria();
        original.set_generate_partial_facets(false);
        let reverted = revert(&original, &Facet::manufacturer());

        assert!(reverted.criteria.user_conditions().is_empty());
        assert!(reverted.criteria.has_base_condition("category"));
        assert_eq!(reverted.active, vec![Condition::manufacturer([42])]);
    }
}
