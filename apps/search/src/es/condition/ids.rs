use serde_json::{json, Value as JsonValue};
use storefront_model::{Condition, Criteria, ShopContext};

use super::EsConditionHandler;
use crate::error::Result;
use crate::handler::Supports;

fn terms(field: &str, ids: &[i64]) -> JsonValue {
    json!({ "terms": { field: ids } })
}

/// Products indexed with any of the category ids (ancestors included)
pub struct CategoryConditionHandler;

impl Supports<Condition> for CategoryConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::Category { .. })
    }
}

impl EsConditionHandler for CategoryConditionHandler {
    fn build_query(
        &self,
        condition: &Condition,
        _criteria: &Criteria,
        _context: &ShopContext,
    ) -> Result<Option<JsonValue>> {
        Ok(match condition {
            Condition::Category { category_ids } => Some(terms("categoryIds", category_ids)),
            _ => None,
        })
    }
}

pub struct ManufacturerConditionHandler;

impl Supports<Condition> for ManufacturerConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::Manufacturer { .. })
    }
}

impl EsConditionHandler for ManufacturerConditionHandler {
    fn build_query(
        &self,
        condition: &Condition,
        _criteria: &Criteria,
        _context: &ShopContext,
    ) -> Result<Option<JsonValue>> {
        Ok(match condition {
            Condition::Manufacturer { manufacturer_ids } => {
                Some(terms("manufacturer.id", manufacturer_ids))
            }
            _ => None,
        })
    }
}

pub struct PropertyConditionHandler;

impl Supports<Condition> for PropertyConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::Property { .. })
    }
}

impl EsConditionHandler for PropertyConditionHandler {
    fn build_query(
        &self,
        condition: &Condition,
        _criteria: &Criteria,
        _context: &ShopContext,
    ) -> Result<Option<JsonValue>> {
        Ok(match condition {
            Condition::Property { value_ids } => Some(terms("properties.id", value_ids)),
            _ => None,
        })
    }
}

pub struct CustomerGroupConditionHandler;

impl Supports<Condition> for CustomerGroupConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::CustomerGroup { .. })
    }
}

impl EsConditionHandler for CustomerGroupConditionHandler {
    fn build_query(
        &self,
        condition: &Condition,
        _criteria: &Criteria,
        _context: &ShopContext,
    ) -> Result<Option<JsonValue>> {
        Ok(match condition {
            Condition::CustomerGroup { customer_group_ids } => Some(json!({
                "bool": { "must_not": [terms("blockedCustomerGroupIds", customer_group_ids)] }
            })),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::shop_context;

    #[test]
    fn blocked_groups_are_excluded() {
        let query = CustomerGroupConditionHandler
            .build_query(
                &Condition::customer_group([2]),
                &Criteria::new(),
                &shop_context(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(
            query,
            json!({"bool": {"must_not": [{"terms": {"blockedCustomerGroupIds": [2]}}]}})
        );
    }
}
