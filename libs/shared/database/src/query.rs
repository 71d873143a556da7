//! Select-query builder rendered into PostgREST request paths.
//!
//! A [`SelectQuery`] is the relational plan for one read: the projected
//! columns, embedded relations (joins), row filters, filters on embedded
//! relations and the ordering. Joins map onto PostgREST resource embedding:
//!
//! * `embed_inner` keeps only parent rows with at least one matching child
//!   (inner join),
//! * `embed` keeps every parent row (left join),
//! * `without` keeps only parent rows with no matching child (anti-join).
//!
//! Building a query never performs I/O; [`SelectQuery::to_path`] renders it.

use std::fmt::Display;

use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: String,
    columns: Vec<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
}

impl SelectQuery {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Adds projected columns. With no call the projection is `*`.
    pub fn select(mut self, columns: &str) -> Self {
        self.columns.push(columns.to_string());
        self
    }

    pub fn embed_inner(mut self, relation: &str, columns: &str) -> Self {
        self.columns.push(format!("{}!inner({})", relation, columns));
        self
    }

    pub fn embed(mut self, relation: &str, columns: &str) -> Self {
        self.columns.push(format!("{}({})", relation, columns));
        self
    }

    /// Anti-join: keep rows whose embedded `relation` has no row left after
    /// the relation's own filters. The relation must also be embedded.
    pub fn without(mut self, relation: &str) -> Self {
        self.filters.push((relation.to_string(), "is.null".to_string()));
        self
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lte", value)
    }

    /// Case-insensitive substring match.
    pub fn ilike(self, column: &str, needle: &str) -> Self {
        self.filter(column, "ilike", format!("*{}*", needle))
    }

    /// Inclusive timestamp range, `BETWEEN start AND end`.
    pub fn between(self, column: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.gte(column, timestamp(start)).lte(column, timestamp(end))
    }

    pub fn order(mut self, column: &str, direction: Order) -> Self {
        self.order.push(format!("{}.{}", column, direction.as_str()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn filter(mut self, column: &str, operator: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("{}.{}", operator, value)));
        self
    }

    pub fn to_path(&self) -> String {
        let select = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(",")
        };

        let mut parts = vec![format!("select={}", urlencoding::encode(&select))];

        for (column, condition) in &self.filters {
            parts.push(format!(
                "{}={}",
                urlencoding::encode(column),
                urlencoding::encode(condition)
            ));
        }
        if !self.order.is_empty() {
            parts.push(format!("order={}", urlencoding::encode(&self.order.join(","))));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={}", limit));
        }

        format!("/rest/v1/{}?{}", self.table, parts.join("&"))
    }
}

/// Timestamp literal as the store expects it in filters. Sub-second
/// precision is kept so inclusive bounds stay exact.
pub fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
