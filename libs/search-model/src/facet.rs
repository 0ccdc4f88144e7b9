//! Facet requests
//!
//! A facet asks which values are available along one dimension. It never
//! filters the product set itself.

use crate::condition::Condition;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Facet {
    Category {
        /// Number of tree levels below the system category
        depth: u32,
        #[serde(default)]
        label: Option<String>,
    },
    Manufacturer {
        #[serde(default)]
        label: Option<String>,
    },
    Property {
        #[serde(default)]
        label: Option<String>,
    },
    Price {
        #[serde(default)]
        label: Option<String>,
    },
    ShippingFree {
        #[serde(default)]
        label: Option<String>,
    },
    ImmediateDelivery {
        #[serde(default)]
        label: Option<String>,
    },
    Custom {
        #[serde(rename = "type")]
        kind: String,
        name: String,
        #[serde(default)]
        params: JsonValue,
    },
}

impl Facet {
    pub fn category(depth: u32) -> Self {
        Self::Category { depth, label: None }
    }

    pub fn manufacturer() -> Self {
        Self::Manufacturer { label: None }
    }

    pub fn property() -> Self {
        Self::Property { label: None }
    }

    pub fn price() -> Self {
        Self::Price { label: None }
    }

    pub fn shipping_free() -> Self {
        Self::ShippingFree { label: None }
    }

    pub fn immediate_delivery() -> Self {
        Self::ImmediateDelivery { label: None }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Category { .. } => "category",
            Self::Manufacturer { .. } => "manufacturer",
            Self::Property { .. } => "property",
            Self::Price { .. } => "price",
            Self::ShippingFree { .. } => "shipping_free",
            Self::ImmediateDelivery { .. } => "immediate_delivery",
            Self::Custom { name, .. } => name,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::Custom { kind, .. } => kind,
            other => other.name(),
        }
    }

    /// Label configured on the facet itself, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Category { label, .. }
            | Self::Manufacturer { label }
            | Self::Property { label }
            | Self::Price { label }
            | Self::ShippingFree { label }
            | Self::ImmediateDelivery { label } => label.as_deref().filter(|l| !l.is_empty()),
            Self::Custom { params, .. } => params.get("label").and_then(|l| l.as_str()),
        }
    }

    /// Whether `condition` filters along this facet's own dimension.
    ///
    /// Such conditions are taken out of the criteria before the facet's
    /// values are computed.
    pub fn owns_condition(&self, condition: &Condition) -> bool {
        match self {
            Self::Property { .. } => matches!(condition, Condition::Property { .. }),
            _ => condition.name() == self.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_facet_owns_every_property_condition() {
        let facet = Facet::property();
        assert!(facet.owns_condition(&Condition::property([1, 2])));
        assert!(facet.owns_condition(&Condition::property([9])));
        assert!(!facet.owns_condition(&Condition::manufacturer([1])));
    }

    #[test]
    fn facets_own_conditions_of_the_same_name() {
        assert!(Facet::manufacturer().owns_condition(&Condition::manufacturer([42])));
        assert!(Facet::category(2).owns_condition(&Condition::category([5])));
        assert!(!Facet::price().owns_condition(&Condition::ShippingFree));
    }

    #[test]
    fn empty_label_counts_as_unset() {
        let facet = Facet::Manufacturer {
            label: Some(String::new()),
        };
        assert_eq!(facet.label(), None);
    }
}
