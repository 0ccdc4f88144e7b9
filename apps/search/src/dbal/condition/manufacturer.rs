use storefront_model::{Condition, ShopContext};

use super::ConditionHandler;
use crate::dbal::query::SqlQuery;
use crate::error::Result;
use crate::handler::Supports;

pub struct ManufacturerConditionHandler;

impl Supports<Condition> for ManufacturerConditionHandler {
    fn supports(&self, part: &Condition) -> bool {
        matches!(part, Condition::Manufacturer { .. })
    }
}

impl ConditionHandler for ManufacturerConditionHandler {
    fn generate_condition(
        &self,
        condition: &Condition,
        query: &mut SqlQuery,
        _context: &ShopContext,
    ) -> Result<()> {
        if let Condition::Manufacturer { manufacturer_ids } = condition {
            let idx = query.bind_int_array(manufacturer_ids.clone());
            query.and_where(format!("product.manufacturer_id = ANY(${}::bigint[])", idx));
        }
        Ok(())
    }
}
