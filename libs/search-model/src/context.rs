//! Shop context snapshot
//!
//! Read-only view of the shop, customer group and currency a search runs for.
//! Every query builder and facet handler receives it by reference.

use serde::{Deserialize, Serialize};

/// The shop's root category. `path` lists the ancestors of the root,
/// nearest parent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemCategory {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub category: SystemCategory,
    /// Locale used for language-specific index fields (e.g. "de_DE")
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerGroup {
    pub id: i64,
    /// Short key used in price tables and price index fields (e.g. "EK")
    pub key: String,
    #[serde(default = "default_true")]
    pub display_gross: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: i64,
    pub iso: String,
    #[serde(default = "default_factor")]
    pub factor: f64,
    #[serde(default)]
    pub symbol: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_factor() -> f64 {
    1.0
}

/// Snapshot of the shop state a request is served in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopContext {
    pub shop: Shop,
    pub current_customer_group: CustomerGroup,
    /// Group whose prices apply when the current group has none
    pub fallback_customer_group: CustomerGroup,
    pub currency: Currency,
}

impl ShopContext {
    /// Id of the shop's system (root) category
    pub fn system_category_id(&self) -> i64 {
        self.shop.category.id
    }

    /// The system category together with all of its ancestors.
    ///
    /// Facets never offer these ids as selectable values.
    pub fn system_category_ids(&self) -> Vec<i64> {
        let mut ids = Vec::with_capacity(self.shop.category.path.len() + 1);
        ids.push(self.shop.category.id);
        ids.extend(self.shop.category.path.iter().copied());
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_with_defaults() {
        let ctx: ShopContext = serde_json::from_value(json!({
            "shop": {"id": 1, "name": "Main", "category": {"id": 3, "path": [1]}},
            "currentCustomerGroup": {"id": 1, "key": "EK"},
            "fallbackCustomerGroup": {"id": 1, "key": "EK"},
            "currency": {"id": 1, "iso": "EUR"}
        }))
        .unwrap();

        assert!(ctx.current_customer_group.display_gross);
        assert_eq!(ctx.currency.factor, 1.0);
        assert_eq!(ctx.system_category_ids(), vec![3, 1]);
    }
}
