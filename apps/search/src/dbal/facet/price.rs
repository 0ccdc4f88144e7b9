use async_trait::async_trait;
use storefront_model::{Criteria, Facet, FacetResult, ShopContext};

use super::{FacetQuerySource, PartialFacetHandler};
use crate::dbal::price::join_prices;
use crate::error::Result;
use crate::facet_results;
use crate::handler::Supports;
use crate::hydrator::json_f64;
use crate::reversion::RevertedCriteria;

/// Lowest and highest displayed price of the matching products
pub struct PriceFacetHandler {
    source: FacetQuerySource,
}

impl PriceFacetHandler {
    pub fn new(source: FacetQuerySource) -> Self {
        Self { source }
    }
}

impl Supports<Facet> for PriceFacetHandler {
    fn supports(&self, part: &Facet) -> bool {
        matches!(part, Facet::Price { .. })
    }
}

#[async_trait]
impl PartialFacetHandler for PriceFacetHandler {
    async fn generate_partial_facet(
        &self,
        facet: &Facet,
        reverted: &RevertedCriteria,
        _criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Option<FacetResult>> {
        let mut query = self.source.query(&reverted.criteria, context)?;
        let price = join_prices(&mut query, context);
        query.select([
            ("min", format!("MIN({})", price)),
            ("max", format!("MAX({})", price)),
        ]);

        let rows = self.source.fetch(&query).await?;
        let bounds = rows.first().and_then(|row| {
            let min = row.get("min").and_then(json_f64)?;
            let max = row.get("max").and_then(json_f64)?;
            Some((min, max))
        });
        let Some((min, max)) = bounds else {
            return Ok(None);
        };

        Ok(facet_results::price_range(
            facet.name(),
            self.source.label(facet),
            min,
            max,
            &reverted.active,
        ))
    }
}
