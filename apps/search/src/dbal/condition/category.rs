use storefront_model::{Condition, ShopContext};

use super::{exists_in_relation, ConditionHandler};
use crate::dbal::query::SqlQuery;
use crate::error::Result;
use crate::handler::Supports;

/// Products assigned to any of the categories, directly or below them.
///
/// `product_category_ro` holds one row per category and ancestor.
pub struct CategoryConditionHandler;

impl Supports<Condition> for CategoryConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::Category { .. })
    }
}

impl ConditionHandler for CategoryConditionHandler {
    fn generate_condition(
        &self,
        condition: &Condition,
        query: &mut SqlQuery,
        _context: &ShopContext,
    ) -> Result<()> {
        if let Condition::Category { category_ids } = condition {
            let predicate = exists_in_relation(
                query,
                "product_category_ro",
                "category",
                "category_id",
                category_ids,
            );
            query.and_where(predicate);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbal::query::BindValue;
    use crate::test_fixtures::shop_context;

    #[test]
    fn restricts_to_category_tree() {
        let mut query = SqlQuery::new("product", "product");
        CategoryConditionHandler
            .generate_condition(&Condition::category([5, 6]), &mut query, &shop_context())
            .unwrap();

        assert!(query.to_sql().contains(
            "EXISTS (SELECT 1 FROM product_category_ro category_1 WHERE category_1.product_id = product.id AND category_1.category_id = ANY($1::bigint[]))"
        ));
        assert_eq!(query.binds(), &[BindValue::IntArray(vec![5, 6])]);
    }
}
