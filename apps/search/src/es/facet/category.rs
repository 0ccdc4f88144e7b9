use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value as JsonValue};
use storefront_model::{Criteria, Facet, FacetResult, ShopContext};

use super::{bucket_ids, EsFacetHandler, Labels};
use crate::error::Result;
use crate::es::dsl::Search;
use crate::handler::Supports;
use crate::reversion::{active_ids, RevertedCriteria};
use crate::services::{CategoryDepth, CategoryService, CategoryTreeBuilder};

const AGGREGATION: &str = "category";

/// Category tree from the `categoryIds` of matching documents, without the
/// shop's system category and its ancestors
pub struct CategoryFacetHandler {
    categories: Arc<dyn CategoryService>,
    labels: Labels,
    aggregation_size: usize,
}

impl CategoryFacetHandler {
    pub fn new(
        categories: Arc<dyn CategoryService>,
        labels: Labels,
        aggregation_size: usize,
    ) -> Self {
        Self {
            categories,
            labels,
            aggregation_size,
        }
    }
}

impl Supports<Facet> for CategoryFacetHandler {
    fn supports(&self, part: &Facet) -> bool {
        matches!(part, Facet::Category { .. })
    }
}

#[async_trait]
impl EsFacetHandler for CategoryFacetHandler {
    fn handle(
        &self,
        _facet: &Facet,
        _criteria: &Criteria,
        search: &mut Search,
        _context: &ShopContext,
    ) -> Result<()> {
        search.add_aggregation(
            AGGREGATION,
            json!({ "terms": { "field": "categoryIds", "size": self.aggregation_size } }),
        );
        Ok(())
    }

    async fn hydrate(
        &self,
        facet: &Facet,
        aggregations: &Map<String, JsonValue>,
        reverted: &RevertedCriteria,
        _criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Option<FacetResult>> {
        let Facet::Category { depth, .. } = facet else {
            return Ok(None);
        };

        let system = context.system_category_ids();
        let ids: Vec<i64> = bucket_ids(aggregations, AGGREGATION)
            .into_iter()
            .filter(|id| !system.contains(id))
            .collect();
        if ids.is_empty() {
            return Ok(None);
        }

        let root_id = context.system_category_id();
        let categories = self.categories.get_list(&ids, context).await?;
        let categories = CategoryDepth::filter(root_id, *depth, categories);

        Ok(CategoryTreeBuilder::build(
            facet.name(),
            self.labels.resolve(facet),
            &categories,
            &active_ids(&reverted.active),
            root_id,
        )
        .map(FacetResult::Tree))
    }
}
