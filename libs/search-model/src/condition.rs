//! Filter conditions
//!
//! A condition narrows the product set. Conditions are values: once built
//! they are never changed, only added to or removed from a criteria.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A filter predicate, tagged by kind.
///
/// `Custom` carries the kind tag and free-form parameters of conditions that
/// only an extension handler understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    Category {
        category_ids: Vec<i64>,
    },
    /// Excludes products that are blocked for any of the given groups
    CustomerGroup {
        customer_group_ids: Vec<i64>,
    },
    IsAvailable,
    Manufacturer {
        manufacturer_ids: Vec<i64>,
    },
    ShippingFree,
    Price {
        min: Option<f64>,
        max: Option<f64>,
    },
    Property {
        value_ids: Vec<i64>,
    },
    ImmediateDelivery,
    VoteAverage {
        average: f64,
    },
    SearchTerm {
        term: String,
    },
    Custom {
        #[serde(rename = "type")]
        kind: String,
        name: String,
        #[serde(default)]
        params: JsonValue,
    },
}

impl Condition {
    pub fn category(ids: impl IntoIterator<Item = i64>) -> Self {
        Self::Category {
            category_ids: ids.into_iter().collect(),
        }
    }

    pub fn customer_group(ids: impl IntoIterator<Item = i64>) -> Self {
        Self::CustomerGroup {
            customer_group_ids: ids.into_iter().collect(),
        }
    }

    pub fn manufacturer(ids: impl IntoIterator<Item = i64>) -> Self {
        Self::Manufacturer {
            manufacturer_ids: ids.into_iter().collect(),
        }
    }

    pub fn price(min: Option<f64>, max: Option<f64>) -> Self {
        Self::Price { min, max }
    }

    /// Property values are kept sorted so the condition name is stable
    /// regardless of request order.
    pub fn property(ids: impl IntoIterator<Item = i64>) -> Self {
        let mut value_ids: Vec<i64> = ids.into_iter().collect();
        value_ids.sort_unstable();
        value_ids.dedup();
        Self::Property { value_ids }
    }

    pub fn search_term(term: impl Into<String>) -> Self {
        Self::SearchTerm { term: term.into() }
    }

    pub fn custom(kind: impl Into<String>, name: impl Into<String>, params: JsonValue) -> Self {
        Self::Custom {
            kind: kind.into(),
            name: name.into(),
            params,
        }
    }

    /// Name under which the condition is stored in a criteria
    pub fn name(&self) -> String {
        match self {
            Self::Category { .. } => "category".to_string(),
            Self::CustomerGroup { .. } => "customer_group".to_string(),
            Self::IsAvailable => "is_available".to_string(),
            Self::Manufacturer { .. } => "manufacturer".to_string(),
            Self::ShippingFree => "shipping_free".to_string(),
            Self::Price { .. } => "price".to_string(),
            Self::Property { value_ids } => {
                let ids: Vec<String> = value_ids.iter().map(|id| id.to_string()).collect();
                format!("property_{}", ids.join("_"))
            }
            Self::ImmediateDelivery => "immediate_delivery".to_string(),
            Self::VoteAverage { .. } => "vote_average".to_string(),
            Self::SearchTerm { .. } => "search".to_string(),
            Self::Custom { name, .. } => name.clone(),
        }
    }

    /// Kind tag used by handler registries
    pub fn kind(&self) -> &str {
        match self {
            Self::Category { .. } => "category",
            Self::CustomerGroup { .. } => "customer_group",
            Self::IsAvailable => "is_available",
            Self::Manufacturer { .. } => "manufacturer",
            Self::ShippingFree => "shipping_free",
            Self::Price { .. } => "price",
            Self::Property { .. } => "property",
            Self::ImmediateDelivery => "immediate_delivery",
            Self::VoteAverage { .. } => "vote_average",
            Self::SearchTerm { .. } => "search_term",
            Self::Custom { kind, .. } => kind,
        }
    }

    pub fn category_ids(&self) -> Option<&[i64]> {
        match self {
            Self::Category { category_ids } => Some(category_ids),
            _ => None,
        }
    }
}
