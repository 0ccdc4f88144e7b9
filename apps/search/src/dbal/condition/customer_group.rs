use storefront_model::{Condition, ShopContext};

use super::{exists_in_relation, ConditionHandler};
use crate::dbal::query::SqlQuery;
use crate::error::Result;
use crate::handler::Supports;

/// Excludes products blocked for any of the customer groups
pub struct CustomerGroupConditionHandler;

impl Supports<Condition> for CustomerGroupConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::CustomerGroup { .. })
    }
}

impl ConditionHandler for CustomerGroupConditionHandler {
    fn generate_condition(
        &self,
        condition: &Condition,
        query: &mut SqlQuery,
        _context: &ShopContext,
    ) -> Result<()> {
        if let Condition::CustomerGroup { customer_group_ids } = condition {
            let blocked = exists_in_relation(
                query,
                "product_avoid_customer_group",
                "avoid",
                "customer_group_id",
                customer_group_ids,
            );
            query.and_where(format!("NOT {}", blocked));
        }
        Ok(())
    }
}
