use serde_json::{json, Value as JsonValue};
use storefront_model::{Condition, Criteria, ShopContext};

use super::EsConditionHandler;
use crate::error::Result;
use crate::es::dsl::Search;
use crate::es::field_mapping::FieldMapping;
use crate::handler::Supports;

/// Full text match over number, names and keywords.
///
/// Always a scoring query, whichever partition the condition sits in, so
/// search ranking sorts by relevance.
pub struct SearchTermConditionHandler {
    mapping: FieldMapping,
}

impl SearchTermConditionHandler {
    pub fn new(mapping: FieldMapping) -> Self {
        Self { mapping }
    }
}

impl Supports<Condition> for SearchTermConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::SearchTerm { .. })
    }
}

impl EsConditionHandler for SearchTermConditionHandler {
    fn build_query(
        &self,
        condition: &Condition,
        _criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Option<JsonValue>> {
        let Condition::SearchTerm { term } = condition else {
            return Ok(None);
        };
        let term = term.trim();
        if term.is_empty() {
            return Ok(None);
        }

        let language = format!("{}^3", self.mapping.language_field(&context.shop));
        Ok(Some(json!({
            "multi_match": {
                "query": term,
                "type": "best_fields",
                "operator": "and",
                "fields": ["number^5", "name^3", language, "keywords"]
            }
        })))
    }

    fn handle_filter(
        &self,
        condition: &Condition,
        criteria: &Criteria,
        search: &mut Search,
        context: &ShopContext,
    ) -> Result<()> {
        if let Some(query) = self.build_query(condition, criteria, context)? {
            search.add_query(query);
        }
        Ok(())
    }

    fn handle_post_filter(
        &self,
        condition: &Condition,
        criteria: &Criteria,
        search: &mut Search,
        context: &ShopContext,
    ) -> Result<()> {
        self.handle_filter(condition, criteria, search, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::shop_context;

    #[test]
    fn search_term_goes_to_scoring_query() {
        let handler = SearchTermConditionHandler::new(FieldMapping::new());
        let mut search = Search::new();
        handler
            .handle_post_filter(
                &Condition::search_term("red shirt"),
                &Criteria::new(),
                &mut search,
                &shop_context(),
            )
            .unwrap();

        assert!(search.post_filters().is_empty());
        let body = search.to_json();
        assert_eq!(body["query"]["bool"]["must"][0]["multi_match"]["query"], "red shirt");
        assert_eq!(
            body["query"]["bool"]["must"][0]["multi_match"]["fields"][2],
            "name.de^3"
        );
    }
}
