use std::sync::Arc;

use async_trait::async_trait;
use storefront_model::{Criteria, Facet, FacetResult, ShopContext};

use super::{FacetQuerySource, PartialFacetHandler};
use crate::dbal::connection::column_ids;
use crate::error::Result;
use crate::handler::Supports;
use crate::reversion::{active_ids, RevertedCriteria};
use crate::services::{CategoryDepth, CategoryService, CategoryTreeBuilder};

/// Category tree of the products matching the reverted criteria.
///
/// The shop's system category and its ancestors are never offered.
pub struct CategoryFacetHandler {
    source: FacetQuerySource,
    categories: Arc<dyn CategoryService>,
}

impl CategoryFacetHandler {
    pub fn new(source: FacetQuerySource, categories: Arc<dyn CategoryService>) -> Self {
        Self { source, categories }
    }
}

impl Supports<Facet> for CategoryFacetHandler {
    fn supports(&self, part: &Facet) -> bool {
        matches!(part, Facet::Category { .. })
    }
}

#[async_trait]
impl PartialFacetHandler for CategoryFacetHandler {
    async fn generate_partial_facet(
        &self,
        facet: &Facet,
        reverted: &RevertedCriteria,
        _criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Option<FacetResult>> {
        let Facet::Category { depth, .. } = facet else {
            return Ok(None);
        };

        let mut query = self.source.query(&reverted.criteria, context)?;
        let alias = query.unique_alias("product_category");
        query
            .select([("categoryId", format!("{}.category_id", alias))])
            .inner_join(
                "product_category_ro",
                &alias,
                format!("{}.product_id = product.id", alias),
            )
            .add_group_by(format!("{}.category_id", alias));

        let rows = self.source.fetch(&query).await?;
        let system = context.system_category_ids();
        let ids: Vec<i64> = column_ids(&rows, "categoryId")
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
            self.source.label(facet),
            &categories,
            &active_ids(&reverted.active),
            root_id,
        )
        .map(FacetResult::Tree))
    }
}
