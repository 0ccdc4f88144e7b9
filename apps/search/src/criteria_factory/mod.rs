//! Storefront criteria factory
//!
//! Builds the criteria variants the storefront needs (listing, search,
//! live search, filter counts, product navigation) from request parameters.
//! Request handlers fill the criteria; registered extensions may adjust each
//! variant before its final adjustments are applied.

use std::sync::Arc;

use storefront_model::{Condition, Criteria, ShopContext};

mod request_handler;

pub use request_handler::{sorting_for, CoreCriteriaRequestHandler, CriteriaRequestHandler};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::request::RequestParams;

/// Callbacks invoked while criteria variants are built.
///
/// Every method defaults to a no-op, so an extension only implements the
/// variants it cares about.
#[allow(unused_variables)]
pub trait CriteriaExtension: Send + Sync {
    fn on_base_criteria(
        &self,
        criteria: &mut Criteria,
        category_ids: &[i64],
        context: &ShopContext,
    ) -> Result<()> {
        Ok(())
    }

    fn on_search_criteria(
        &self,
        criteria: &mut Criteria,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<()> {
        Ok(())
    }

    fn on_listing_criteria(
        &self,
        criteria: &mut Criteria,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<()> {
        Ok(())
    }

    fn on_ajax_search_criteria(
        &self,
        criteria: &mut Criteria,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<()> {
        Ok(())
    }

    fn on_ajax_listing_criteria(
        &self,
        criteria: &mut Criteria,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<()> {
        Ok(())
    }

    fn on_ajax_count_criteria(
        &self,
        criteria: &mut Criteria,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<()> {
        Ok(())
    }

    fn on_product_navigation_criteria(
        &self,
        criteria: &mut Criteria,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<()> {
        Ok(())
    }
}

pub struct StoreFrontCriteriaFactory {
    config: SearchConfig,
    request_handlers: Vec<Arc<dyn CriteriaRequestHandler>>,
    extensions: Vec<Arc<dyn CriteriaExtension>>,
}

impl StoreFrontCriteriaFactory {
    /// Factory with the core request handler followed by `request_handlers`
    pub fn new(
        config: SearchConfig,
        request_handlers: Vec<Arc<dyn CriteriaRequestHandler>>,
        extensions: Vec<Arc<dyn CriteriaExtension>>,
    ) -> Self {
        let mut handlers: Vec<Arc<dyn CriteriaRequestHandler>> =
            vec![Arc::new(CoreCriteriaRequestHandler::new(config.clone()))];
        handlers.extend(request_handlers);
        Self {
            config,
            request_handlers: handlers,
            extensions,
        }
    }

    pub fn create_base_criteria(
        &self,
        category_ids: &[i64],
        context: &ShopContext,
    ) -> Result<Criteria> {
        let mut criteria = Criteria::new();
        criteria.add_base_condition(Condition::category(category_ids.iter().copied()))?;
        if self.config.hide_no_in_stock {
            criteria.add_base_condition(Condition::IsAvailable)?;
        }
        criteria.add_base_condition(Condition::customer_group([
            context.current_customer_group.id,
        ]))?;

        for extension in &self.extensions {
            extension.on_base_criteria(&mut criteria, category_ids, context)?;
        }
        Ok(criteria)
    }

    pub fn create_search_criteria(
        &self,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<Criteria> {
        let mut criteria = self.search_criteria(params, context)?;
        for extension in &self.extensions {
            extension.on_search_criteria(&mut criteria, params, context)?;
        }
        Ok(criteria)
    }

    pub fn create_listing_criteria(
        &self,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<Criteria> {
        let mut criteria = self.criteria_from_request(params, context)?;
        for extension in &self.extensions {
            extension.on_listing_criteria(&mut criteria, params, context)?;
        }
        criteria.remove_facet("category");
        Ok(criteria)
    }

    pub fn create_ajax_search_criteria(
        &self,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<Criteria> {
        let mut criteria = self.search_criteria(params, context)?;
        criteria.limit(Some(self.config.max_live_search_results));
        for extension in &self.extensions {
            extension.on_ajax_search_criteria(&mut criteria, params, context)?;
        }
        criteria.reset_facets();
        Ok(criteria)
    }

    pub fn create_ajax_listing_criteria(
        &self,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<Criteria> {
        let mut criteria = self.criteria_from_request(params, context)?;
        for extension in &self.extensions {
            extension.on_ajax_listing_criteria(&mut criteria, params, context)?;
        }
        criteria.reset_facets();
        Ok(criteria)
    }

    /// Criteria answering "how many products match", without facets
    pub fn create_ajax_count_criteria(
        &self,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<Criteria> {
        let mut criteria = self.criteria_from_request(params, context)?;
        for extension in &self.extensions {
            extension.on_ajax_count_criteria(&mut criteria, params, context)?;
        }
        criteria
            .offset(0)
            .limit(Some(1))
            .reset_sorting()
            .reset_facets();
        Ok(criteria)
    }

    /// Unpaged criteria over one category, for previous/next navigation
    pub fn create_product_navigation_criteria(
        &self,
        params: &dyn RequestParams,
        context: &ShopContext,
        category_id: i64,
    ) -> Result<Criteria> {
        let mut criteria = self.criteria_from_request(params, context)?;
        criteria.offset(0).limit(None);
        criteria.remove_condition("category");
        criteria.remove_base_condition("category");
        criteria.add_base_condition(Condition::category([category_id]))?;

        for extension in &self.extensions {
            extension.on_product_navigation_criteria(&mut criteria, params, context)?;
        }
        criteria.reset_facets();
        Ok(criteria)
    }

    /// Request criteria scoped to the shop's system category.
    ///
    /// A requested category outside the system category narrows the result
    /// as a user condition instead of replacing the shop scope.
    fn search_criteria(
        &self,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<Criteria> {
        let mut criteria = self.criteria_from_request(params, context)?;
        let system_id = context.system_category_id();

        let Some(requested) = criteria.base_condition("category").cloned() else {
            criteria.add_base_condition(Condition::category([system_id]))?;
            return Ok(criteria);
        };

        let in_system = requested
            .category_ids()
            .is_some_and(|ids| ids.contains(&system_id));
        if !in_system {
            criteria.remove_base_condition("category");
            criteria.remove_condition("category");
            criteria.add_condition(requested)?;
            criteria.add_base_condition(Condition::category([system_id]))?;
        }
        Ok(criteria)
    }

    fn criteria_from_request(
        &self,
        params: &dyn RequestParams,
        context: &ShopContext,
    ) -> Result<Criteria> {
        let mut criteria = Criteria::new();
        for handler in &self.request_handlers {
            handler.handle_request(params, &mut criteria, context)?;
        }
        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::shop_context;
    use storefront_model::Facet;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn factory() -> StoreFrontCriteriaFactory {
        StoreFrontCriteriaFactory::new(SearchConfig::default(), Vec::new(), Vec::new())
    }

    #[test]
    fn base_criteria_scopes_category_and_customer_group() {
        let criteria = factory().create_base_criteria(&[5], &shop_context()).unwrap();
        assert_eq!(
            criteria.base_condition("category"),
            Some(&Condition::category([5]))
        );
        assert!(criteria.has_base_condition("customer_group"));
        assert!(criteria.facets().is_empty());
    }

    #[test]
    fn search_without_category_uses_system_category() {
        let criteria = factory()
            .create_search_criteria(&params(&[("q", "shirt")]), &shop_context())
            .unwrap();
        assert_eq!(
            criteria.base_condition("category"),
            Some(&Condition::category([3]))
        );
        assert!(!criteria.has_condition("category"));
    }

    #[test]
    fn search_moves_foreign_category_to_user_conditions() {
        let criteria = factory()
            .create_search_criteria(&params(&[("c", "5")]), &shop_context())
            .unwrap();
        assert_eq!(
            criteria.base_condition("category"),
            Some(&Condition::category([3]))
        );
        assert_eq!(
            criteria.condition("category"),
            Some(&Condition::category([5]))
        );
    }

    #[test]
    fn search_keeps_category_containing_system_category() {
        let criteria = factory()
            .create_search_criteria(&params(&[("c", "3|5")]), &shop_context())
            .unwrap();
        assert_eq!(
            criteria.base_condition("category"),
            Some(&Condition::category([3, 5]))
        );
        assert!(!criteria.has_condition("category"));
    }

    #[test]
    fn listing_drops_category_facet() {
        let criteria = factory()
            .create_listing_criteria(&params(&[("c", "5")]), &shop_context())
            .unwrap();
        assert!(!criteria.has_facet("category"));
        assert!(criteria.has_facet("manufacturer"));
    }

    #[test]
    fn ajax_search_is_limited_and_facetless() {
        let criteria = factory()
            .create_ajax_search_criteria(&params(&[("q", "shirt"), ("n", "48")]), &shop_context())
            .unwrap();
        assert_eq!(criteria.get_limit(), Some(6));
        assert!(criteria.facets().is_empty());
    }

    #[test]
    fn ajax_count_resets_paging_sorting_and_facets() {
        let criteria = factory()
            .create_ajax_count_criteria(
                &params(&[("c", "5"), ("p", "4"), ("sort", "3")]),
                &shop_context(),
            )
            .unwrap();
        assert_eq!(criteria.get_offset(), 0);
        assert_eq!(criteria.get_limit(), Some(1));
        assert!(criteria.sortings().is_empty());
        assert!(criteria.facets().is_empty());
    }

    #[test]
    fn product_navigation_replaces_category() {
        let criteria = factory()
            .create_product_navigation_criteria(
                &params(&[("c", "5"), ("categoryFilter", "8"), ("p", "2")]),
                &shop_context(),
                9,
            )
            .unwrap();
        assert_eq!(criteria.get_limit(), None);
        assert_eq!(criteria.get_offset(), 0);
        assert!(!criteria.has_condition("category"));
        assert_eq!(
            criteria.base_condition("category"),
            Some(&Condition::category([9]))
        );
        assert!(criteria.facets().is_empty());
    }

    struct PinFacets;

    impl CriteriaExtension for PinFacets {
        fn on_listing_criteria(
            &self,
            criteria: &mut Criteria,
            _params: &dyn RequestParams,
            _context: &ShopContext,
        ) -> Result<()> {
            criteria.remove_facet("price");
            criteria.add_condition(Condition::ShippingFree)?;
            Ok(())
        }
    }

    #[test]
    fn extensions_adjust_their_variant_only() {
        let factory = StoreFrontCriteriaFactory::new(
            SearchConfig::default(),
            Vec::new(),
            vec![Arc::new(PinFacets)],
        );
        let context = shop_context();

        let listing = factory.create_listing_criteria(&params(&[]), &context).unwrap();
        assert!(!listing.has_facet("price"));
        assert!(listing.has_condition("shipping_free"));

        let search = factory.create_search_criteria(&params(&[]), &context).unwrap();
        assert!(search.has_facet("price"));
        assert!(!search.has_condition("shipping_free"));
    }

    struct Bestsellers;

    impl CriteriaRequestHandler for Bestsellers {
        fn handle_request(
            &self,
            params: &dyn RequestParams,
            criteria: &mut Criteria,
            _context: &ShopContext,
        ) -> Result<()> {
            if params.get_flag("bestsellers") {
                criteria.add_facet(Facet::Custom {
                    kind: "bestseller".to_string(),
                    name: "bestseller".to_string(),
                    params: serde_json::Value::Null,
                })?;
            }
            Ok(())
        }
    }

    #[test]
    fn extra_request_handlers_run_after_core() {
        let factory = StoreFrontCriteriaFactory::new(
            SearchConfig::default(),
            vec![Arc::new(Bestsellers)],
            Vec::new(),
        );
        let criteria = factory
            .create_ajax_listing_criteria(&params(&[("bestsellers", "1")]), &shop_context())
            .unwrap();
        assert!(criteria.facets().is_empty());

        let criteria = factory
            .create_listing_criteria(&params(&[("bestsellers", "1")]), &shop_context())
            .unwrap();
        assert!(criteria.has_facet("bestseller"));
    }
}
