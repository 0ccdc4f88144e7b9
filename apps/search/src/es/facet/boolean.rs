use async_trait::async_trait;
use serde_json::{json, Map, Value as JsonValue};
use storefront_model::{Criteria, Facet, FacetResult, ShopContext};

use super::{EsFacetHandler, Labels};
use crate::error::Result;
use crate::es::dsl::Search;
use crate::facet_results;
use crate::handler::Supports;
use crate::request::fields;
use crate::reversion::RevertedCriteria;

/// Toggle facet offered when any matching document has the flag set
pub struct BooleanFacetHandler {
    facet_name: &'static str,
    field_name: &'static str,
    index_field: &'static str,
    labels: Labels,
}

impl BooleanFacetHandler {
    pub fn new(
        facet_name: &'static str,
        field_name: &'static str,
        index_field: &'static str,
        labels: Labels,
    ) -> Self {
        Self {
            facet_name,
            field_name,
            index_field,
            labels,
        }
    }

    pub fn shipping_free(labels: Labels) -> Self {
        Self::new("shipping_free", fields::SHIPPING_FREE, "shippingFree", labels)
    }

    pub fn immediate_delivery(labels: Labels) -> Self {
        Self::new(
            "immediate_delivery",
            fields::IMMEDIATE_DELIVERY,
            "hasAvailableVariant",
            labels,
        )
    }
}

impl Supports<Facet> for BooleanFacetHandler {
    fn supports(&self, part: &Facet) -> bool {
        !matches!(part, Facet::Custom { .. }) && part.name() == self.facet_name
    }
}

#[async_trait]
impl EsFacetHandler for BooleanFacetHandler {
    fn handle(
        &self,
        _facet: &Facet,
        _criteria: &Criteria,
        search: &mut Search,
        _context: &ShopContext,
    ) -> Result<()> {
        search.add_aggregation(
            self.facet_name,
            json!({ "filter": { "term": { self.index_field: true } } }),
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
        let count = aggregations
            .get(self.facet_name)
            .and_then(|agg| agg.get("doc_count"))
            .and_then(JsonValue::as_u64)
            .unwrap_or(0);
        if count == 0 {
            return Ok(None);
        }

        Ok(Some(facet_results::boolean(
            facet.name(),
            self.field_name,
            self.labels.resolve(facet),
            reverted.is_active(),
        )))
    }
}
