use storefront_model::{Condition, ShopContext};

use super::ConditionHandler;
use crate::dbal::bind::escape_like_pattern;
use crate::dbal::query::SqlQuery;
use crate::error::Result;
use crate::handler::Supports;

/// Query value holding the relevance expression of the search term
pub const SEARCH_RANKING: &str = "search_ranking";

/// Every word of the term must occur in the product name, keywords or the
/// main variant's number.
///
/// Also records a relevance expression (name hits weigh more than keyword
/// hits) for the search ranking sorting.
pub struct SearchTermConditionHandler;

impl Supports<Condition> for SearchTermConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::SearchTerm { .. })
    }
}

impl ConditionHandler for SearchTermConditionHandler {
    fn generate_condition(
        &self,
        condition: &Condition,
        query: &mut SqlQuery,
        _context: &ShopContext,
    ) -> Result<()> {
        let Condition::SearchTerm { term } = condition else {
            return Ok(());
        };

        let mut ranking = Vec::new();
        for word in term.split_whitespace() {
            let idx = query.bind_text(format!("%{}%", escape_like_pattern(word)));
            query.and_where(format!(
                "(product.name ILIKE ${i} ESCAPE '\\' OR product.keywords ILIKE ${i} ESCAPE '\\' OR variant.number ILIKE ${i} ESCAPE '\\')",
                i = idx
            ));
            ranking.push(format!(
                "(CASE WHEN product.name ILIKE ${i} ESCAPE '\\' THEN 2 WHEN product.keywords ILIKE ${i} ESCAPE '\\' THEN 1 ELSE 0 END)",
                i = idx
            ));
        }

        if !ranking.is_empty() {
            query.set_value(SEARCH_RANKING, format!("({})", ranking.join(" + ")));
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
    fn each_word_must_match() {
        let mut query = SqlQuery::new("product", "product");
        SearchTermConditionHandler
            .generate_condition(&Condition::search_term("red  100%"), &mut query, &shop_context())
            .unwrap();

        assert_eq!(
            query.binds(),
            &[
                BindValue::Text("%red%".to_string()),
                BindValue::Text("%100\\%%".to_string()),
            ]
        );
        assert!(query.to_sql().contains("product.name ILIKE $2"));
        assert!(query.value(SEARCH_RANKING).is_some());
    }

    #[test]
    fn blank_term_matches_everything() {
        let mut query = SqlQuery::new("product", "product");
        SearchTermConditionHandler
            .generate_condition(&Condition::search_term("  "), &mut query, &shop_context())
            .unwrap();
        assert!(!query.to_sql().contains("WHERE"));
        assert!(query.value(SEARCH_RANKING).is_none());
    }
}
