use serde_json::{json, Value as JsonValue};
use storefront_model::{Condition, Criteria, ShopContext};

use super::EsConditionHandler;
use crate::error::Result;
use crate::handler::Supports;

/// Indexed as `isAvailable`: in stock, or not restricted to the last stock
pub struct IsAvailableConditionHandler;

impl Supports<Condition> for IsAvailableConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::IsAvailable)
    }
}

impl EsConditionHandler for IsAvailableConditionHandler {
    fn build_query(
        &self,
        _condition: &Condition,
        _criteria: &Criteria,
        _context: &ShopContext,
    ) -> Result<Option<JsonValue>> {
        Ok(Some(json!({ "term": { "isAvailable": true } })))
    }
}

pub struct ShippingFreeConditionHandler;

impl Supports<Condition> for ShippingFreeConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::ShippingFree)
    }
}

impl EsConditionHandler for ShippingFreeConditionHandler {
    fn build_query(
        &self,
        _condition: &Condition,
        _criteria: &Criteria,
        _context: &ShopContext,
    ) -> Result<Option<JsonValue>> {
        Ok(Some(json!({ "term": { "shippingFree": true } })))
    }
}

/// Indexed as `hasAvailableVariant`
pub struct ImmediateDeliveryConditionHandler;

impl Supports<Condition> for ImmediateDeliveryConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::ImmediateDelivery)
    }
}

impl EsConditionHandler for ImmediateDeliveryConditionHandler {
    fn build_query(
        &self,
        _condition: &Condition,
        _criteria: &Criteria,
        _context: &ShopContext,
    ) -> Result<Option<JsonValue>> {
        Ok(Some(json!({ "term": { "hasAvailableVariant": true } })))
    }
}
