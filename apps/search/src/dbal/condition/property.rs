use storefront_model::{Condition, ShopContext};

use super::{exists_in_relation, ConditionHandler};
use crate::dbal::query::SqlQuery;
use crate::error::Result;
use crate::handler::Supports;

/// Products carrying any of the property values.
///
/// Several property conditions on one criteria narrow each other.
pub struct PropertyConditionHandler;

impl Supports<Condition> for PropertyConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::Property { .. })
    }
}

impl ConditionHandler for PropertyConditionHandler {
    fn generate_condition(
        &self,
        condition: &Condition,
        query: &mut SqlQuery,
        _context: &ShopContext,
    ) -> Result<()> {
        if let Condition::Property { value_ids } = condition {
            let predicate = exists_in_relation(
                query,
                "product_property_value",
                "property",
                "value_id",
                value_ids,
            );
            query.and_where(predicate);
        }
        Ok(())
    }
}
