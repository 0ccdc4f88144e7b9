use std::sync::Arc;

use async_trait::async_trait;
use storefront_model::{Criteria, Facet, FacetResult, ShopContext};

use super::{FacetQuerySource, PartialFacetHandler};
use crate::dbal::connection::column_ids;
use crate::error::Result;
use crate::facet_results;
use crate::handler::Supports;
use crate::reversion::{active_ids, RevertedCriteria};
use crate::services::PropertyService;

/// Property values of the matching products, grouped by property group
pub struct PropertyFacetHandler {
    source: FacetQuerySource,
    properties: Arc<dyn PropertyService>,
}

impl PropertyFacetHandler {
    pub fn new(source: FacetQuerySource, properties: Arc<dyn PropertyService>) -> Self {
        Self { source, properties }
    }
}

impl Supports<Facet> for PropertyFacetHandler {
    fn supports(&self, part: &Facet) -> bool {
        matches!(part, Facet::Property { .. })
    }
}

#[async_trait]
impl PartialFacetHandler for PropertyFacetHandler {
    async fn generate_partial_facet(
        &self,
        facet: &Facet,
        reverted: &RevertedCriteria,
        _criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Option<FacetResult>> {
        let mut query = self.source.query(&reverted.criteria, context)?;
        let alias = query.unique_alias("product_property");
        query
            .select([("valueId", format!("{}.value_id", alias))])
            .inner_join(
                "product_property_value",
                &alias,
                format!("{}.product_id = product.id", alias),
            )
            .add_group_by(format!("{}.value_id", alias));

        let rows = self.source.fetch(&query).await?;
        let ids = column_ids(&rows, "valueId");
        if ids.is_empty() {
            return Ok(None);
        }

        let groups = self.properties.get_list(&ids, context).await?;
        Ok(facet_results::property_groups(
            facet.name(),
            self.source.label(facet),
            groups,
            &active_ids(&reverted.active),
        ))
    }
}
