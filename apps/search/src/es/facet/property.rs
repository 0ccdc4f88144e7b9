use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value as JsonValue};
use storefront_model::{Criteria, Facet, FacetResult, ShopContext};

use super::{bucket_ids, EsFacetHandler, Labels};
use crate::error::Result;
use crate::es::dsl::Search;
use crate::facet_results;
use crate::handler::Supports;
use crate::reversion::{active_ids, RevertedCriteria};
use crate::services::PropertyService;

const AGGREGATION: &str = "properties";

pub struct PropertyFacetHandler {
    properties: Arc<dyn PropertyService>,
    labels: Labels,
    aggregation_size: usize,
}

impl PropertyFacetHandler {
    pub fn new(
        properties: Arc<dyn PropertyService>,
        labels: Labels,
        aggregation_size: usize,
    ) -> Self {
        Self {
            properties,
            labels,
            aggregation_size,
        }
    }
}

impl Supports<Facet> for PropertyFacetHandler {
    fn supports(&self, part: &Facet) -> bool {
        matches!(part, Facet::Property { .. })
    }
}

#[async_trait]
impl EsFacetHandler for PropertyFacetHandler {
    fn handle(
        &self,
        _facet: &Facet,
        _criteria: &Criteria,
        search: &mut Search,
        _context: &ShopContext,
    ) -> Result<()> {
        search.add_aggregation(
            AGGREGATION,
            json!({ "terms": { "field": "properties.id", "size": self.aggregation_size } }),
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
        let ids = bucket_ids(aggregations, AGGREGATION);
        if ids.is_empty() {
            return Ok(None);
        }

        let groups = self.properties.get_list(&ids, context).await?;
        Ok(facet_results::property_groups(
            facet.name(),
            self.labels.resolve(facet),
            groups,
            &active_ids(&reverted.active),
        ))
    }
}
