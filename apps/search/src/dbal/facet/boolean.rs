use async_trait::async_trait;
use storefront_model::{Condition, Criteria, Facet, FacetResult, ShopContext};

use super::{FacetQuerySource, PartialFacetHandler};
use crate::error::Result;
use crate::facet_results;
use crate::handler::Supports;
use crate::request::fields;
use crate::reversion::RevertedCriteria;

/// Toggle facet offered when at least one product would match its condition
pub struct BooleanFacetHandler {
    facet_name: &'static str,
    field_name: &'static str,
    condition: Condition,
    source: FacetQuerySource,
}

impl BooleanFacetHandler {
    pub fn new(
        facet_name: &'static str,
        field_name: &'static str,
        condition: Condition,
        source: FacetQuerySource,
    ) -> Self {
        Self {
            facet_name,
            field_name,
            condition,
            source,
        }
    }

    pub fn shipping_free(source: FacetQuerySource) -> Self {
        Self::new(
            "shipping_free",
            fields::SHIPPING_FREE,
            Condition::ShippingFree,
            source,
        )
    }

    pub fn immediate_delivery(source: FacetQuerySource) -> Self {
        Self::new(
            "immediate_delivery",
            fields::IMMEDIATE_DELIVERY,
            Condition::ImmediateDelivery,
            source,
        )
    }
}

impl Supports<Facet> for BooleanFacetHandler {
    fn supports(&self, part: &Facet) -> bool {
        !matches!(part, Facet::Custom { .. }) && part.name() == self.facet_name
    }
}

#[async_trait]
impl PartialFacetHandler for BooleanFacetHandler {
    async fn generate_partial_facet(
        &self,
        facet: &Facet,
        reverted: &RevertedCriteria,
        _criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Option<FacetResult>> {
        let mut probe = reverted.criteria.clone();
        probe
            .remove_condition(&self.condition.name())
            .add_condition(self.condition.clone())?;

        let mut query = self.source.query(&probe, context)?;
        query.select([("id", "product.id")]).set_limit(Some(1));

        let rows = self.source.fetch(&query).await?;
        if rows.is_empty() {
            return Ok(None);
        }

        Ok(Some(facet_results::boolean(
            facet.name(),
            self.field_name,
            self.source.label(facet),
            reverted.is_active(),
        )))
    }
}
