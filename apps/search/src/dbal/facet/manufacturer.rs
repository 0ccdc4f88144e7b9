use std::sync::Arc;

use async_trait::async_trait;
use storefront_model::{Criteria, Facet, FacetResult, ShopContext};

use super::{FacetQuerySource, PartialFacetHandler};
use crate::dbal::connection::column_ids;
use crate::error::Result;
use crate::facet_results;
use crate::handler::Supports;
use crate::reversion::{active_ids, RevertedCriteria};
use crate::services::ManufacturerService;

pub struct ManufacturerFacetHandler {
    source: FacetQuerySource,
    manufacturers: Arc<dyn ManufacturerService>,
}

impl ManufacturerFacetHandler {
    pub fn new(source: FacetQuerySource, manufacturers: Arc<dyn ManufacturerService>) -> Self {
        Self {
            source,
            manufacturers,
        }
    }
}

impl Supports<Facet> for ManufacturerFacetHandler {
    fn supports(&self, part: &Facet) -> bool {
        matches!(part, Facet::Manufacturer { .. })
    }
}

#[async_trait]
impl PartialFacetHandler for ManufacturerFacetHandler {
    async fn generate_partial_facet(
        &self,
        facet: &Facet,
        reverted: &RevertedCriteria,
        _criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Option<FacetResult>> {
        let mut query = self.source.query(&reverted.criteria, context)?;
        query
            .select([("manufacturerId", "product.manufacturer_id")])
            .and_where("product.manufacturer_id IS NOT NULL")
            .add_group_by("product.manufacturer_id");

        let rows = self.source.fetch(&query).await?;
        let ids = column_ids(&rows, "manufacturerId");
        if ids.is_empty() {
            return Ok(None);
        }

        let manufacturers = self.manufacturers.get_list(&ids, context).await?;
        Ok(facet_results::manufacturer_list(
            facet.name(),
            self.source.label(facet),
            manufacturers,
            &active_ids(&reverted.active),
        ))
    }
}
