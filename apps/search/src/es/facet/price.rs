use async_trait::async_trait;
use serde_json::{json, Map, Value as JsonValue};
use storefront_model::{Criteria, Facet, FacetResult, ShopContext};

use super::{EsFacetHandler, Labels};
use crate::error::Result;
use crate::es::dsl::Search;
use crate::es::field_mapping::FieldMapping;
use crate::facet_results;
use crate::handler::Supports;
use crate::hydrator::json_f64;
use crate::reversion::RevertedCriteria;

const AGGREGATION: &str = "price";

/// Stats over the context price field
pub struct PriceFacetHandler {
    mapping: FieldMapping,
    labels: Labels,
}

impl PriceFacetHandler {
    pub fn new(mapping: FieldMapping, labels: Labels) -> Self {
        Self { mapping, labels }
    }
}

impl Supports<Facet> for PriceFacetHandler {
    fn supports(&self, part: &Facet) -> bool {
        matches!(part, Facet::Price { .. })
    }
}

#[async_trait]
impl EsFacetHandler for PriceFacetHandler {
    fn handle(
        &self,
        _facet: &Facet,
        _criteria: &Criteria,
        search: &mut Search,
        context: &ShopContext,
    ) -> Result<()> {
        search.add_aggregation(
            AGGREGATION,
            json!({ "stats": { "field": self.mapping.price_field(context) } }),
        );
        Ok(())
    }

    async fn hydrate(
        &self,
        facet: &Facet,
        aggregations: &Map<String, JsonValue>,
        reverted: &RevertedCriteria,
        _criteria: &Criteria,
        _context: &ShopContext,
    ) -> Result<Option<FacetResult>> {
        let Some(stats) = aggregations.get(AGGREGATION) else {
            return Ok(None);
        };
        let (Some(min), Some(max)) = (
            stats.get("min").and_then(json_f64),
            stats.get("max").and_then(json_f64),
        ) else {
            return Ok(None);
        };

        Ok(facet_results::price_range(
            facet.name(),
            self.labels.resolve(facet),
            min,
            max,
            &reverted.active,
        ))
    }
}
