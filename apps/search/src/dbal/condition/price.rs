use storefront_model::{Condition, ShopContext};

use super::ConditionHandler;
use crate::dbal::price::join_prices;
use crate::dbal::query::SqlQuery;
use crate::error::Result;
use crate::handler::Supports;

/// Displayed price within `[min, max]`; an absent bound is open
pub struct PriceConditionHandler;

impl Supports<Condition> for PriceConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::Price { .. })
    }
}

impl ConditionHandler for PriceConditionHandler {
    fn generate_condition(
        &self,
        condition: &Condition,
        query: &mut SqlQuery,
        context: &ShopContext,
    ) -> Result<()> {
        let Condition::Price { min, max } = condition else {
            return Ok(());
        };
        if min.is_none() && max.is_none() {
            return Ok(());
        }

        let price = join_prices(query, context);
        if let Some(min) = min {
            let idx = query.bind_float(*min);
            query.and_where(format!("{} >= ${}::float8", price, idx));
        }
        if let Some(max) = max {
            let idx = query.bind_float(*max);
            query.and_where(format!("{} <= ${}::float8", price, idx));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::shop_context;

    #[test]
    fn open_upper_bound_only_adds_minimum() {
        let mut query = SqlQuery::new("product", "product");
        PriceConditionHandler
            .generate_condition(&Condition::price(Some(10.0), None), &mut query, &shop_context())
            .unwrap();
        let sql = query.to_sql();
        assert!(sql.contains(">= $4::float8"));
        assert!(!sql.contains("<="));
    }

    #[test]
    fn unbounded_price_adds_nothing() {
        let mut query = SqlQuery::new("product", "product");
        PriceConditionHandler
            .generate_condition(&Condition::price(None, None), &mut query, &shop_context())
            .unwrap();
        assert!(query.binds().is_empty());
    }
}
