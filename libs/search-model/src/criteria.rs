//! Search criteria
//!
//! `Criteria` is the backend-agnostic description of a product search:
//! - base conditions: structural scoping that is always applied
//! - user conditions: filters the shopper selected
//! - facets, sortings and paging
//!
//! Conditions are unique by name within their partition, facets are unique
//! by name. Insertion order is preserved everywhere.

use crate::condition::Condition;
use crate::error::{ModelError, Partition, Result};
use crate::facet::Facet;
use crate::sorting::Sorting;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    base_conditions: Vec<Condition>,
    conditions: Vec<Condition>,
    facets: Vec<Facet>,
    sortings: Vec<Sorting>,
    offset: usize,
    /// `None` means unbounded
    limit: Option<usize>,
    generate_partial_facets: bool,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            base_conditions: Vec::new(),
            conditions: Vec::new(),
            facets: Vec::new(),
            sortings: Vec::new(),
            offset: 0,
            limit: None,
            generate_partial_facets: true,
        }
    }
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&mut self, offset: usize) -> &mut Self {
        self.offset = offset;
        self
    }

    pub fn limit(&mut self, limit: Option<usize>) -> &mut Self {
        self.limit = limit;
        self
    }

    pub fn get_offset(&self) -> usize {
        self.offset
    }

    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    /// When disabled, facets are computed with every user condition reverted
    /// instead of only their own.
    pub fn set_generate_partial_facets(&mut self, enabled: bool) -> &mut Self {
        self.generate_partial_facets = enabled;
        self
    }

    pub fn generate_partial_facets(&self) -> bool {
        self.generate_partial_facets
    }

    // --- user conditions ---

    pub fn add_condition(&mut self, condition: Condition) -> Result<&mut Self> {
        insert_unique(
            &mut self.conditions,
            condition,
            Partition::UserConditions,
            Condition::name,
        )?;
        Ok(self)
    }

    pub fn remove_condition(&mut self, name: &str) -> &mut Self {
        self.conditions.retain(|c| c.name() != name);
        self
    }

    pub fn condition(&self, name: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.name() == name)
    }

    pub fn has_condition(&self, name: &str) -> bool {
        self.condition(name).is_some()
    }

    pub fn user_conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Drops all user conditions; base conditions stay.
    pub fn reset_conditions(&mut self) -> &mut Self {
        self.conditions.clear();
        self
    }

    // --- base conditions ---

    pub fn add_base_condition(&mut self, condition: Condition) -> Result<&mut Self> {
        insert_unique(
            &mut self.base_conditions,
            condition,
            Partition::BaseConditions,
            Condition::name,
        )?;
        Ok(self)
    }

    pub fn remove_base_condition(&mut self, name: &str) -> &mut Self {
        self.base_conditions.retain(|c| c.name() != name);
        self
    }

    pub fn base_condition(&self, name: &str) -> Option<&Condition> {
        self.base_conditions.iter().find(|c| c.name() == name)
    }

    pub fn has_base_condition(&self, name: &str) -> bool {
        self.base_condition(name).is_some()
    }

    pub fn base_conditions(&self) -> &[Condition] {
        &self.base_conditions
    }

    /// Base conditions followed by user conditions
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.base_conditions.iter().chain(self.conditions.iter())
    }

    // --- facets ---

    pub fn add_facet(&mut self, facet: Facet) -> Result<&mut Self> {
        insert_unique(&mut self.facets, facet, Partition::Facets, |f| {
            f.name().to_string()
        })?;
        Ok(self)
    }

    pub fn remove_facet(&mut self, name: &str) -> &mut Self {
        self.facets.retain(|f| f.name() != name);
        self
    }

    pub fn facet(&self, name: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.name() == name)
    }

    pub fn has_facet(&self, name: &str) -> bool {
        self.facet(name).is_some()
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn reset_facets(&mut self) -> &mut Self {
        self.facets.clear();
        self
    }

    // --- sortings ---

    pub fn add_sorting(&mut self, sorting: Sorting) -> &mut Self {
        self.sortings.push(sorting);
        self
    }

    pub fn sortings(&self) -> &[Sorting] {
        &self.sortings
    }

    pub fn reset_sorting(&mut self) -> &mut Self {
        self.sortings.clear();
        self
    }
}

fn insert_unique<T>(
    items: &mut Vec<T>,
    item: T,
    partition: Partition,
    name_of: impl Fn(&T) -> String,
) -> Result<()> {
    let name = name_of(&item);
    if items.iter().any(|existing| name_of(existing) == name) {
        return Err(ModelError::DuplicateName { partition, name });
    }
    items.push(item);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorting::SortingKind;

    #[test]
    fn add_then_remove_leaves_no_condition() {
        let mut criteria = Criteria::new();
        criteria
            .add_condition(Condition::manufacturer([42]))
            .unwrap()
            .remove_condition("manufacturer");

        assert!(!criteria.has_condition("manufacturer"));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut criteria = Criteria::new();
        criteria.add_condition(Condition::ShippingFree).unwrap();
        let before = criteria.clone();

        criteria.remove_condition("price").remove_base_condition("price");
        assert_eq!(criteria, before);
    }

    #[test]
    fn duplicate_condition_name_is_rejected_and_criteria_unchanged() {
        let mut criteria = Criteria::new();
        criteria.add_condition(Condition::manufacturer([1])).unwrap();
        let before = criteria.clone();

        let err = criteria
            .add_condition(Condition::manufacturer([2]))
            .unwrap_err();

        assert_eq!(
            err,
            ModelError::DuplicateName {
                partition: Partition::UserConditions,
                name: "manufacturer".to_string()
            }
        );
        assert_eq!(criteria, before);
    }

    #[test]
    fn partitions_are_independent() {
        let mut criteria = Criteria::new();
        criteria.add_base_condition(Condition::category([3])).unwrap();
        criteria.add_condition(Condition::category([5])).unwrap();

        assert_eq!(
            criteria.base_condition("category").unwrap().category_ids(),
            Some(&[3][..])
        );
        assert_eq!(
            criteria.condition("category").unwrap().category_ids(),
            Some(&[5][..])
        );
        assert_eq!(criteria.conditions().count(), 2);
    }

    #[test]
    fn duplicate_facet_is_rejected() {
        let mut criteria = Criteria::new();
        criteria.add_facet(Facet::manufacturer()).unwrap();
        assert!(criteria.add_facet(Facet::manufacturer()).is_err());
        assert_eq!(criteria.facets().len(), 1);
    }

    #[test]
    fn resets_clear_their_collections() {
        let mut criteria = Criteria::new();
        criteria
            .add_sorting(Sorting::asc(SortingKind::Price))
            .add_facet(Facet::price())
            .unwrap();
        criteria.reset_sorting().reset_facets();

        assert!(criteria.sortings().is_empty());
        assert!(criteria.facets().is_empty());
    }

    #[test]
    fn limit_defaults_to_unbounded() {
        let criteria = Criteria::new();
        assert_eq!(criteria.get_limit(), None);
        assert_eq!(criteria.get_offset(), 0);
    }
}
