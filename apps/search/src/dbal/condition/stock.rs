use storefront_model::{Condition, ShopContext};

use super::ConditionHandler;
use crate::dbal::query::SqlQuery;
use crate::error::Result;
use crate::handler::Supports;

/// Products that can be bought: not sold out when flagged as last stock
pub struct IsAvailableConditionHandler;

impl Supports<Condition> for IsAvailableConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::IsAvailable)
    }
}

impl ConditionHandler for IsAvailableConditionHandler {
    fn generate_condition(
        &self,
        _condition: &Condition,
        query: &mut SqlQuery,
        _context: &ShopContext,
    ) -> Result<()> {
        query.and_where("(product.last_stock = FALSE OR variant.in_stock >= variant.min_purchase)");
        Ok(())
    }
}

/// Products with at least one active variant in stock
pub struct ImmediateDeliveryConditionHandler;

impl Supports<Condition> for ImmediateDeliveryConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::ImmediateDelivery)
    }
}

impl ConditionHandler for ImmediateDeliveryConditionHandler {
    fn generate_condition(
        &self,
        _condition: &Condition,
        query: &mut SqlQuery,
        _context: &ShopContext,
    ) -> Result<()> {
        let alias = query.unique_alias("delivery");
        query.and_where(format!(
            "EXISTS (SELECT 1 FROM product_variant {a} WHERE {a}.product_id = product.id AND {a}.active = TRUE AND {a}.in_stock >= {a}.min_purchase)",
            a = alias
        ));
        Ok(())
    }
}

pub struct ShippingFreeConditionHandler;

impl Supports<Condition> for ShippingFreeConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::ShippingFree)
    }
}

impl ConditionHandler for ShippingFreeConditionHandler {
    fn generate_condition(
        &self,
        _condition: &Condition,
        query: &mut SqlQuery,
        _context: &ShopContext,
    ) -> Result<()> {
        query.and_where("variant.shipping_free = TRUE");
        Ok(())
    }
}
