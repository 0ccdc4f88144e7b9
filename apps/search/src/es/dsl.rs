//! Search request body under construction

use serde_json::{json, Map, Value as JsonValue};
use storefront_model::SortDirection;

#[derive(Debug, Clone, Default)]
pub struct Search {
    queries: Vec<JsonValue>,
    filters: Vec<JsonValue>,
    post_filters: Vec<JsonValue>,
    aggregations: Map<String, JsonValue>,
    sorts: Vec<JsonValue>,
    from: usize,
    size: usize,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scoring clause (`bool.must`)
    pub fn add_query(&mut self, query: JsonValue) -> &mut Self {
        self.queries.push(query);
        self
    }

    /// Non-scoring clause (`bool.filter`); narrows hits and aggregations
    pub fn add_filter(&mut self, filter: JsonValue) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Applied after aggregations; narrows hits only
    pub fn add_post_filter(&mut self, filter: JsonValue) -> &mut Self {
        self.post_filters.push(filter);
        self
    }

    pub fn add_aggregation(&mut self, name: impl Into<String>, aggregation: JsonValue) -> &mut Self {
        self.aggregations.insert(name.into(), aggregation);
        self
    }

    pub fn take_aggregations(&mut self) -> Map<String, JsonValue> {
        std::mem::take(&mut self.aggregations)
    }

    pub fn add_sort(&mut self, field: &str, direction: SortDirection) -> &mut Self {
        self.sorts
            .push(json!({ field: { "order": direction.as_es() } }));
        self
    }

    pub fn set_from(&mut self, from: usize) -> &mut Self {
        self.from = from;
        self
    }

    pub fn set_size(&mut self, size: usize) -> &mut Self {
        self.size = size;
        self
    }

    pub fn filters(&self) -> &[JsonValue] {
        &self.filters
    }

    pub fn post_filters(&self) -> &[JsonValue] {
        &self.post_filters
    }

    pub fn to_json(&self) -> JsonValue {
        let mut body = Map::new();
        body.insert("query".to_string(), self.query_json());
        if !self.post_filters.is_empty() {
            body.insert(
                "post_filter".to_string(),
                bool_filter(self.post_filters.clone()),
            );
        }
        if !self.aggregations.is_empty() {
            body.insert(
                "aggs".to_string(),
                JsonValue::Object(self.aggregations.clone()),
            );
        }
        if !self.sorts.is_empty() {
            body.insert("sort".to_string(), JsonValue::Array(self.sorts.clone()));
        }
        body.insert("from".to_string(), json!(self.from));
        body.insert("size".to_string(), json!(self.size));
        body.insert("track_total_hits".to_string(), json!(true));
        JsonValue::Object(body)
    }

    fn query_json(&self) -> JsonValue {
        if self.queries.is_empty() && self.filters.is_empty() {
            return json!({ "match_all": {} });
        }
        let mut clauses = Map::new();
        if !self.queries.is_empty() {
            clauses.insert("must".to_string(), JsonValue::Array(self.queries.clone()));
        }
        if !self.filters.is_empty() {
            clauses.insert("filter".to_string(), JsonValue::Array(self.filters.clone()));
        }
        json!({ "bool": clauses })
    }
}

/// All clauses must match; no clauses matches everything
pub fn bool_filter(clauses: Vec<JsonValue>) -> JsonValue {
    if clauses.is_empty() {
        json!({ "match_all": {} })
    } else {
        json!({ "bool": { "filter": clauses } })
    }
}
