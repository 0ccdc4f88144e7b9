//! Condition handlers for the relational backend.
//!
//! Each handler turns one condition variant into joins and predicates on the
//! product query. Membership tests use `EXISTS` subqueries so the product
//! query keeps one row per product.

use std::sync::Arc;

use storefront_model::{Condition, ShopContext};

use super::query::SqlQuery;
use crate::error::Result;
use crate::handler::Supports;

mod category;
mod customer_group;
mod manufacturer;
mod price;
mod property;
mod search_term;
mod stock;
mod vote_average;

pub use category::CategoryConditionHandler;
pub use customer_group::CustomerGroupConditionHandler;
pub use manufacturer::ManufacturerConditionHandler;
pub use price::PriceConditionHandler;
pub use property::PropertyConditionHandler;
pub use search_term::{SearchTermConditionHandler, SEARCH_RANKING};
pub use stock::{
    ImmediateDeliveryConditionHandler, IsAvailableConditionHandler, ShippingFreeConditionHandler,
};
pub use vote_average::VoteAverageConditionHandler;

pub trait ConditionHandler: Supports<Condition> + Send + Sync {
    fn generate_condition(
        &self,
        condition: &Condition,
        query: &mut SqlQuery,
        context: &ShopContext,
    ) -> Result<()>;
}

/// Built-in handlers, one per core condition variant
pub fn core_condition_handlers() -> Vec<Arc<dyn ConditionHandler>> {
    vec![
        Arc::new(CategoryConditionHandler),
        Arc::new(CustomerGroupConditionHandler),
        Arc::new(IsAvailableConditionHandler),
        Arc::new(ManufacturerConditionHandler),
        Arc::new(ShippingFreeConditionHandler),
        Arc::new(PriceConditionHandler),
        Arc::new(PropertyConditionHandler),
        Arc::new(ImmediateDeliveryConditionHandler),
        Arc::new(VoteAverageConditionHandler),
        Arc::new(SearchTermConditionHandler),
    ]
}

/// `EXISTS` over a product relation table matching any of `ids`
fn exists_in_relation(
    query: &mut SqlQuery,
    table: &str,
    alias_prefix: &str,
    column: &str,
    ids: &[i64],
) -> String {
    let alias = query.unique_alias(alias_prefix);
    let idx = query.bind_int_array(ids.to_vec());
    format!(
        "EXISTS (SELECT 1 FROM {table} {alias} WHERE {alias}.product_id = product.id AND {alias}.{column} = ANY(${idx}::bigint[]))",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerRegistry;

    #[test]
    fn every_core_variant_has_a_handler() {
        let registry = HandlerRegistry::new(core_condition_handlers());
        let conditions = [
            Condition::category([1]),
            Condition::customer_group([1]),
            Condition::IsAvailable,
            Condition::manufacturer([1]),
            Condition::ShippingFree,
            Condition::price(Some(1.0), None),
            Condition::property([1]),
            Condition::ImmediateDelivery,
            Condition::VoteAverage { average: 3.0 },
            Condition::search_term("shirt"),
        ];
        for condition in &conditions {
            assert!(registry.find(condition).is_some(), "{}", condition.name());
        }
        assert!(registry
            .find(&Condition::custom("stock_level", "stock_level", serde_json::json!({})))
            .is_none());
    }
}
