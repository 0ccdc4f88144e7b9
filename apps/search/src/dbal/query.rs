//! SQL query under construction.
//!
//! Handlers append joins, predicates and orderings; bind values are
//! positional and `$n` placeholders are returned as they are pushed.

use std::collections::{HashMap, HashSet};

use storefront_model::SortDirection;

use super::bind::{push_float, push_int, push_int_array, push_text};

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    IntArray(Vec<i64>),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectColumn {
    alias: String,
    expr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum JoinKind {
    Inner,
    Left,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Join {
    kind: JoinKind,
    table: String,
    alias: String,
    on: String,
}

#[derive(Debug, Clone, Default)]
pub struct SqlQuery {
    select: Vec<SelectColumn>,
    from: String,
    joins: Vec<Join>,
    wheres: Vec<String>,
    group_by: Vec<String>,
    order_by: Vec<String>,
    offset: usize,
    limit: Option<usize>,
    binds: Vec<BindValue>,
    states: HashSet<String>,
    values: HashMap<String, String>,
    alias_counter: usize,
}

impl SqlQuery {
    /// Query over `table`, aliased as `alias`
    pub fn new(table: &str, alias: &str) -> Self {
        Self {
            from: format!("{} {}", table, alias),
            ..Default::default()
        }
    }

    /// Replace the select list
    pub fn select<A, E>(&mut self, columns: impl IntoIterator<Item = (A, E)>) -> &mut Self
    where
        A: Into<String>,
        E: Into<String>,
    {
        self.select = columns
            .into_iter()
            .map(|(alias, expr)| SelectColumn {
                alias: alias.into(),
                expr: expr.into(),
            })
            .collect();
        self
    }

    pub fn inner_join(&mut self, table: &str, alias: &str, on: impl Into<String>) -> &mut Self {
        self.push_join(JoinKind::Inner, table, alias, on.into())
    }

    pub fn left_join(&mut self, table: &str, alias: &str, on: impl Into<String>) -> &mut Self {
        self.push_join(JoinKind::Left, table, alias, on.into())
    }

    fn push_join(&mut self, kind: JoinKind, table: &str, alias: &str, on: String) -> &mut Self {
        self.joins.push(Join {
            kind,
            table: table.to_string(),
            alias: alias.to_string(),
            on,
        });
        self
    }

    /// Fresh table alias, unique within this query
    pub fn unique_alias(&mut self, prefix: &str) -> String {
        self.alias_counter += 1;
        format!("{}_{}", prefix, self.alias_counter)
    }

    pub fn and_where(&mut self, predicate: impl Into<String>) -> &mut Self {
        self.wheres.push(predicate.into());
        self
    }

    pub fn add_group_by(&mut self, expr: impl Into<String>) -> &mut Self {
        self.group_by.push(expr.into());
        self
    }

    pub fn add_order_by(&mut self, expr: impl Into<String>, direction: SortDirection) -> &mut Self {
        self.order_by
            .push(format!("{} {}", expr.into(), direction.as_sql()));
        self
    }

    pub fn reset_order_by(&mut self) -> &mut Self {
        self.order_by.clear();
        self
    }

    pub fn set_offset(&mut self, offset: usize) -> &mut Self {
        self.offset = offset;
        self
    }

    pub fn set_limit(&mut self, limit: Option<usize>) -> &mut Self {
        self.limit = limit;
        self
    }

    pub fn bind_int(&mut self, value: i64) -> usize {
        push_int(&mut self.binds, value)
    }

    pub fn bind_int_array(&mut self, value: Vec<i64>) -> usize {
        push_int_array(&mut self.binds, value)
    }

    pub fn bind_float(&mut self, value: f64) -> usize {
        push_float(&mut self.binds, value)
    }

    pub fn bind_text(&mut self, value: String) -> usize {
        push_text(&mut self.binds, value)
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    /// Marks that a shared join or expression was already added.
    ///
    /// Returns false when the state was already present.
    pub fn add_state(&mut self, state: &str) -> bool {
        self.states.insert(state.to_string())
    }

    /// Attach a value other handlers of the same query can read
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn has_order_by(&self) -> bool {
        !self.order_by.is_empty()
    }

    /// Plain SQL with one output column per select entry
    pub fn to_sql(&self) -> String {
        let columns = if self.select.is_empty() {
            "*".to_string()
        } else {
            self.select
                .iter()
                .map(|c| format!("{} AS \"{}\"", c.expr, c.alias))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("SELECT {}{}", columns, self.tail())
    }

    /// SQL producing a single `row` column holding each row as a JSON object
    /// keyed by select alias. Ordering is preserved.
    pub fn to_json_sql(&self) -> String {
        let pairs = self
            .select
            .iter()
            .map(|c| format!("'{}', {}", c.alias, c.expr))
            .collect::<Vec<_>>()
            .join(", ");
        format!("SELECT json_build_object({}) AS row{}", pairs, self.tail())
    }

    fn tail(&self) -> String {
        let mut sql = format!(" FROM {}", self.from);

        for join in &self.joins {
            let keyword = match join.kind {
                JoinKind::Inner => "INNER JOIN",
                JoinKind::Left => "LEFT JOIN",
            };
            sql.push_str(&format!(
                " {} {} {} ON {}",
                keyword, join.table, join.alias, join.on
            ));
        }

        if !self.wheres.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.wheres.join(" AND "));
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if self.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.offset));
        }

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_clauses_in_sql_order() {
        let mut query = SqlQuery::new("product", "product");
        query
            .select([("id", "product.id")])
            .inner_join("product_variant", "variant", "variant.id = product.main_variant_id")
            .and_where("product.active = TRUE")
            .add_order_by("product.name", SortDirection::Desc)
            .set_limit(Some(10))
            .set_offset(20);
        let idx = query.bind_int(5);
        query.and_where(format!("product.manufacturer_id = ${}", idx));

        assert_eq!(
            query.to_sql(),
            "SELECT product.id AS \"id\" FROM product product \
             INNER JOIN product_variant variant ON variant.id = product.main_variant_id \
             WHERE product.active = TRUE AND product.manufacturer_id = $1 \
             ORDER BY product.name DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(query.binds(), &[BindValue::Int(5)]);
    }

    #[test]
    fn no_limit_means_no_limit_clause() {
        let mut query = SqlQuery::new("product", "product");
        query.select([("id", "product.id")]).set_limit(None);
        assert!(!query.to_sql().contains("LIMIT"));
    }

    #[test]
    fn json_sql_keys_rows_by_alias() {
        let mut query = SqlQuery::new("product", "product");
        query.select([("id", "product.id"), ("variantId", "variant.id")]);
        assert_eq!(
            query.to_json_sql(),
            "SELECT json_build_object('id', product.id, 'variantId', variant.id) AS row FROM product product"
        );
    }

    #[test]
    fn aliases_and_states_are_unique() {
        let mut query = SqlQuery::new("product", "product");
        assert_ne!(query.unique_alias("pc"), query.unique_alias("pc"));
        assert!(query.add_state("prices"));
        assert!(!query.add_state("prices"));
    }
}
