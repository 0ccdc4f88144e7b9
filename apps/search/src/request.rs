//! Inbound request parameters

use std::collections::HashMap;

/// Request parameter names shared by the request handlers and the facet
/// results that render filter controls for them.
pub mod fields {
    pub const SEARCH: &str = "q";
    pub const CATEGORY: &str = "c";
    pub const CATEGORY_FILTER: &str = "categoryFilter";
    pub const MANUFACTURER: &str = "manufacturer";
    pub const PROPERTIES: &str = "properties";
    pub const MIN_PRICE: &str = "min_price";
    pub const MAX_PRICE: &str = "max_price";
    pub const SHIPPING_FREE: &str = "shipping_free";
    pub const IMMEDIATE_DELIVERY: &str = "immediate_delivery";
    pub const RATING: &str = "rating";
    pub const SORT: &str = "sort";
    pub const PAGE: &str = "p";
    pub const PER_PAGE: &str = "n";
}

/// Read access to request parameters
pub trait RequestParams {
    fn get_param(&self, name: &str) -> Option<&str>;

    /// Non-empty, trimmed value
    fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get_param(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Pipe or comma separated id list; unparsable entries are dropped
    fn get_ids(&self, name: &str) -> Vec<i64> {
        self.get_non_empty(name)
            .map(|raw| {
                raw.split(['|', ','])
                    .filter_map(|id| id.trim().parse().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_f64(&self, name: &str) -> Option<f64> {
        self.get_non_empty(name)
            .and_then(|v| v.replace(',', ".").parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    fn get_usize(&self, name: &str) -> Option<usize> {
        self.get_non_empty(name).and_then(|v| v.parse().ok())
    }

    /// `1`, `true` and `on` count as set
    fn get_flag(&self, name: &str) -> bool {
        matches!(self.get_non_empty(name), Some("1" | "true" | "on"))
    }
}

impl RequestParams for HashMap<String, String> {
    fn get_param(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl RequestParams for [(String, String)] {
    fn get_param(&self, name: &str) -> Option<&str> {
        self.iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl RequestParams for Vec<(String, String)> {
    fn get_param(&self, name: &str) -> Option<&str> {
        self.as_slice().get_param(name)
    }
}
