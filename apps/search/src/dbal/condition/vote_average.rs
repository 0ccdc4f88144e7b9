use storefront_model::{Condition, ShopContext};

use super::ConditionHandler;
use crate::dbal::query::SqlQuery;
use crate::error::Result;
use crate::handler::Supports;

/// Average of active votes at or above the given points
pub struct VoteAverageConditionHandler;

impl Supports<Condition> for VoteAverageConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::VoteAverage { .. })
    }
}

impl ConditionHandler for VoteAverageConditionHandler {
    fn generate_condition(
        &self,
        condition: &Condition,
        query: &mut SqlQuery,
        _context: &ShopContext,
    ) -> Result<()> {
        if let Condition::VoteAverage { average } = condition {
            let alias = query.unique_alias("vote");
            let idx = query.bind_float(*average);
            query.and_where(format!(
                "(SELECT AVG({a}.points) FROM product_vote {a} WHERE {a}.product_id = product.id AND {a}.active = TRUE) >= ${idx}::float8",
                a = alias,
                idx = idx
            ));
        }
        Ok(())
    }
}
