//! Request handlers
//!
//! Each handler reads the parameters it knows and adds conditions, facets,
//! sortings or paging to the criteria under construction. Handlers run in
//! registration order; core parameters are handled first.

use storefront_model::{Condition, Criteria, Facet, ShopContext, Sorting, SortingKind};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::request::{fields, RequestParams};

/// Translates request parameters into criteria parts
pub trait CriteriaRequestHandler: Send + Sync {
    fn handle_request(
        &self,
        params: &dyn RequestParams,
        criteria: &mut Criteria,
        context: &ShopContext,
    ) -> Result<()>;
}

/// Listing sort options, by request value
///
/// | `sort` | ordering |
/// |---|---|
/// | 1 | newest first |
/// | 2 | most popular first |
/// | 3 | cheapest first |
/// | 4 | most expensive first |
/// | 5 | name A-Z |
/// | 6 | name Z-A |
/// | 7 | best match |
pub fn sorting_for(sort: usize) -> Option<Sorting> {
    let sorting = match sort {
        1 => Sorting::desc(SortingKind::ReleaseDate),
        2 => Sorting::desc(SortingKind::Popularity),
        3 => Sorting::asc(SortingKind::Price),
        4 => Sorting::desc(SortingKind::Price),
        5 => Sorting::asc(SortingKind::ProductName),
        6 => Sorting::desc(SortingKind::ProductName),
        7 => Sorting::desc(SortingKind::SearchRanking),
        _ => return None,
    };
    Some(sorting)
}

const SORT_RELEASE_DATE: usize = 1;
const SORT_SEARCH_RANKING: usize = 7;

/// Handles every parameter the storefront itself renders controls for
#[derive(Debug, Clone)]
pub struct CoreCriteriaRequestHandler {
    config: SearchConfig,
}

impl CoreCriteriaRequestHandler {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    fn add_base_conditions(
        &self,
        params: &dyn RequestParams,
        criteria: &mut Criteria,
        context: &ShopContext,
    ) -> Result<()> {
        let category_ids = params.get_ids(fields::CATEGORY);
        if !category_ids.is_empty() {
            criteria.add_base_condition(Condition::category(category_ids))?;
        }
        if self.config.hide_no_in_stock {
            criteria.add_base_condition(Condition::IsAvailable)?;
        }
        criteria.add_base_condition(Condition::customer_group([
            context.current_customer_group.id,
        ]))?;
        Ok(())
    }

    fn add_user_conditions(&self, params: &dyn RequestParams, criteria: &mut Criteria) -> Result<()> {
        if let Some(term) = params.get_non_empty(fields::SEARCH) {
            criteria.add_condition(Condition::search_term(term))?;
        }

        let category_filter = params.get_ids(fields::CATEGORY_FILTER);
        if !category_filter.is_empty() {
            criteria.add_condition(Condition::category(category_filter))?;
        }

        let manufacturers = params.get_ids(fields::MANUFACTURER);
        if !manufacturers.is_empty() {
            criteria.add_condition(Condition::manufacturer(manufacturers))?;
        }

        let min = params.get_f64(fields::MIN_PRICE).filter(|v| *v > 0.0);
        let max = params.get_f64(fields::MAX_PRICE).filter(|v| *v > 0.0);
        if min.is_some() || max.is_some() {
            criteria.add_condition(Condition::price(min, max))?;
        }

        if params.get_flag(fields::SHIPPING_FREE) {
            criteria.add_condition(Condition::ShippingFree)?;
        }
        if params.get_flag(fields::IMMEDIATE_DELIVERY) {
            criteria.add_condition(Condition::ImmediateDelivery)?;
        }

        let properties = params.get_ids(fields::PROPERTIES);
        if !properties.is_empty() {
            criteria.add_condition(Condition::property(properties))?;
        }

        if let Some(average) = params.get_f64(fields::RATING).filter(|v| *v > 0.0) {
            criteria.add_condition(Condition::VoteAverage { average })?;
        }

        Ok(())
    }

    fn add_sorting(&self, params: &dyn RequestParams, criteria: &mut Criteria) {
        let default = if params.get_non_empty(fields::SEARCH).is_some() {
            SORT_SEARCH_RANKING
        } else {
            SORT_RELEASE_DATE
        };
        let sorting = params
            .get_usize(fields::SORT)
            .and_then(sorting_for)
            .or_else(|| sorting_for(default));
        if let Some(sorting) = sorting {
            criteria.add_sorting(sorting);
        }
    }

    /// `p` is one-based; `n` is clamped to the configured maximum
    fn add_paging(&self, params: &dyn RequestParams, criteria: &mut Criteria) {
        let per_page = params
            .get_usize(fields::PER_PAGE)
            .filter(|n| *n > 0)
            .unwrap_or(self.config.default_per_page)
            .min(self.config.max_per_page);
        let page = params.get_usize(fields::PAGE).unwrap_or(1).max(1);

        criteria
            .offset((page - 1).saturating_mul(per_page))
            .limit(Some(per_page));
    }

    fn add_facets(&self, criteria: &mut Criteria) -> Result<()> {
        for name in &self.config.facets {
            let facet = match name.as_str() {
                "category" => Facet::category(self.config.category_facet_depth),
                "manufacturer" => Facet::manufacturer(),
                "property" => Facet::property(),
                "price" => Facet::price(),
                "shipping_free" => Facet::shipping_free(),
                "immediate_delivery" => Facet::immediate_delivery(),
                other => {
                    tracing::debug!(facet = other, "Unknown facet in configuration, skipping");
                    continue;
                }
            };
            if !criteria.has_facet(facet.name()) {
                criteria.add_facet(facet)?;
            }
        }
        Ok(())
    }
}

impl CriteriaRequestHandler for CoreCriteriaRequestHandler {
    fn handle_request(
        &self,
        params: &dyn RequestParams,
        criteria: &mut Criteria,
        context: &ShopContext,
    ) -> Result<()> {
        criteria.set_generate_partial_facets(self.config.partial_facets);
        self.add_base_conditions(params, criteria, context)?;
        self.add_user_conditions(params, criteria)?;
        self.add_sorting(params, criteria);
        self.add_paging(params, criteria);
        self.add_facets(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::shop_context;
    use storefront_model::SortDirection;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn handle(pairs: &[(&str, &str)], config: SearchConfig) -> Criteria {
        let mut criteria = Criteria::new();
        CoreCriteriaRequestHandler::new(config)
            .handle_request(&params(pairs), &mut criteria, &shop_context())
            .unwrap();
        criteria
    }

    #[test]
    fn category_parameter_becomes_base_condition() {
        let criteria = handle(&[("c", "5")], SearchConfig::default());
        assert_eq!(
            criteria.base_condition("category"),
            Some(&Condition::category([5]))
        );
        assert_eq!(
            criteria.base_condition("customer_group"),
            Some(&Condition::customer_group([2]))
        );
        assert!(!criteria.has_base_condition("is_available"));
    }

    #[test]
    fn filters_become_user_conditions() {
        let criteria = handle(
            &[
                ("q", " shirt "),
                ("manufacturer", "42|7"),
                ("properties", "3|1"),
                ("min_price", "10"),
                ("shipping_free", "1"),
                ("rating", "4"),
            ],
            SearchConfig::default(),
        );

        assert_eq!(
            criteria.condition("search"),
            Some(&Condition::search_term("shirt"))
        );
        assert_eq!(
            criteria.condition("manufacturer"),
            Some(&Condition::manufacturer([42, 7]))
        );
        assert!(criteria.has_condition("property_1_3"));
        assert_eq!(
            criteria.condition("price"),
            Some(&Condition::price(Some(10.0), None))
        );
        assert!(criteria.has_condition("shipping_free"));
        assert!(!criteria.has_condition("immediate_delivery"));
        assert!(criteria.has_condition("vote_average"));
    }

    #[test]
    fn hidden_out_of_stock_adds_availability() {
        let config = SearchConfig {
            hide_no_in_stock: true,
            ..SearchConfig::default()
        };
        let criteria = handle(&[], config);
        assert!(criteria.has_base_condition("is_available"));
    }

    #[test]
    fn paging_is_one_based_and_clamped() {
        let criteria = handle(&[("p", "3"), ("n", "500")], SearchConfig::default());
        assert_eq!(criteria.get_limit(), Some(100));
        assert_eq!(criteria.get_offset(), 200);

        let criteria = handle(&[("p", "0")], SearchConfig::default());
        assert_eq!(criteria.get_offset(), 0);
        assert_eq!(criteria.get_limit(), Some(12));
    }

    #[test]
    fn search_term_defaults_to_ranking_sort() {
        let criteria = handle(&[("q", "shirt")], SearchConfig::default());
        assert_eq!(criteria.sortings(), &[Sorting::desc(SortingKind::SearchRanking)]);

        let criteria = handle(&[("sort", "3")], SearchConfig::default());
        assert_eq!(criteria.sortings()[0].kind, SortingKind::Price);
        assert_eq!(criteria.sortings()[0].direction, SortDirection::Asc);

        let criteria = handle(&[("sort", "99")], SearchConfig::default());
        assert_eq!(criteria.sortings(), &[Sorting::desc(SortingKind::ReleaseDate)]);
    }

    #[test]
    fn configured_facets_are_added_in_order() {
        let config = SearchConfig {
            facets: vec!["price".into(), "unknown".into(), "manufacturer".into()],
            partial_facets: false,
            ..SearchConfig::default()
        };
        let criteria = handle(&[], config);
        let names: Vec<&str> = criteria.facets().iter().map(Facet::name).collect();
        assert_eq!(names, vec!["price", "manufacturer"]);
        assert!(!criteria.generate_partial_facets());
    }
}
