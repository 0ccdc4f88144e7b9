use serde_json::{json, Map, Value as JsonValue};
use storefront_model::{Condition, Criteria, ShopContext};

use super::EsConditionHandler;
use crate::error::Result;
use crate::es::field_mapping::FieldMapping;
use crate::handler::Supports;

pub struct PriceConditionHandler {
    mapping: FieldMapping,
}

impl PriceConditionHandler {
    pub fn new(mapping: FieldMapping) -> Self {
        Self { mapping }
    }
}

impl Supports<Condition> for PriceConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::Price { .. })
    }
}

impl EsConditionHandler for PriceConditionHandler {
    fn build_query(
        &self,
        condition: &Condition,
        _criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Option<JsonValue>> {
        let Condition::Price { min, max } = condition else {
            return Ok(None);
        };

        let mut bounds = Map::new();
        if let Some(min) = min {
            bounds.insert("gte".to_string(), json!(min));
        }
        if let Some(max) = max {
            bounds.insert("lte".to_string(), json!(max));
        }
        if bounds.is_empty() {
            return Ok(None);
        }

        let field = self.mapping.price_field(context);
        Ok(Some(json!({ "range": { field: bounds } })))
    }
}

pub struct VoteAverageConditionHandler;

impl Supports<Condition> for VoteAverageConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::VoteAverage { .. })
    }
}

impl EsConditionHandler for VoteAverageConditionHandler {
    fn build_query(
        &self,
        condition: &Condition,
        _criteria: &Criteria,
        _context: &ShopContext,
    ) -> Result<Option<JsonValue>> {
        Ok(match condition {
            Condition::VoteAverage { average } => Some(json!({
                "range": { "voteAverage.average": { "gte": average } }
            })),
            _ => None,
        })
    }
}
