//! Condition handlers for the search engine backend.
//!
//! Every handler builds one query clause. Base conditions land in
//! `query.bool.filter`, user conditions in `post_filter` so aggregations can
//! still see products the shopper filtered away.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use storefront_model::{Condition, Criteria, ShopContext};

use super::dsl::Search;
use super::field_mapping::FieldMapping;
use crate::error::Result;
use crate::handler::Supports;

mod ids;
mod range;
mod search_term;
mod stock;

pub use ids::{
    CategoryConditionHandler, CustomerGroupConditionHandler, ManufacturerConditionHandler,
    PropertyConditionHandler,
};
pub use range::{PriceConditionHandler, VoteAverageConditionHandler};
pub use search_term::SearchTermConditionHandler;
pub use stock::{
    ImmediateDeliveryConditionHandler, IsAvailableConditionHandler, ShippingFreeConditionHandler,
};

pub trait EsConditionHandler: Supports<Condition> + Send + Sync {
    /// Clause for `condition`; `None` when it restricts nothing
    fn build_query(
        &self,
        condition: &Condition,
        criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Option<JsonValue>>;

    fn handle_filter(
        &self,
        condition: &Condition,
        criteria: &Criteria,
        search: &mut Search,
        context: &ShopContext,
    ) -> Result<()> {
        if let Some(query) = self.build_query(condition, criteria, context)? {
            search.add_filter(query);
        }
        Ok(())
    }

    fn handle_post_filter(
        &self,
        condition: &Condition,
        criteria: &Criteria,
        search: &mut Search,
        context: &ShopContext,
    ) -> Result<()> {
        if let Some(query) = self.build_query(condition, criteria, context)? {
            search.add_post_filter(query);
        }
        Ok(())
    }
}

pub fn core_condition_handlers(mapping: FieldMapping) -> Vec<Arc<dyn EsConditionHandler>> {
    vec![
        Arc::new(CategoryConditionHandler),
        Arc::new(CustomerGroupConditionHandler),
        Arc::new(IsAvailableConditionHandler),
        Arc::new(ManufacturerConditionHandler),
        Arc::new(ShippingFreeConditionHandler),
        Arc::new(PriceConditionHandler::new(mapping)),
        Arc::new(PropertyConditionHandler),
        Arc::new(ImmediateDeliveryConditionHandler),
        Arc::new(VoteAverageConditionHandler),
        Arc::new(SearchTermConditionHandler::new(mapping)),
    ]
}
