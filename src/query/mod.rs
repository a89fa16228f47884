//! Collection filters and the composable query that executes them.
//!
//! Positive scopes are structured equality filters; the query layer
//! qualifies them to the base table of the query. Negation scopes carry an
//! explicit table qualifier so that joined queries against another model
//! with the same attribute name resolve unambiguously.

use crate::core::{EnumError, Result};
use crate::storage::{Attributes, MemoryStore, StoreRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A structured collection filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// Equality against the query's base table, qualified by the query layer.
    Eq { column: String, value: String },
    /// Raw inequality, qualified to a specific table at declaration time.
    /// A null column value never matches.
    NotEqRaw {
        table: String,
        column: String,
        value: String,
    },
}

/// A named, composable filter over collections of one model type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    name: String,
    filter: Filter,
}

impl Scope {
    pub(crate) fn new(name: impl Into<String>, filter: Filter) -> Self {
        Self {
            name: name.into(),
            filter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }
}

/// Inner join from the base table to another table via a foreign-key column
/// on the base row holding the target record id.
#[derive(Debug, Clone)]
struct JoinClause {
    table: String,
    fk_column: String,
}

/// A query over one table of the store, with optional joins and filters.
///
/// Execution scans the base table in record-id order; joined rows without a
/// live join target are dropped.
#[derive(Debug, Clone)]
pub struct Query {
    store: MemoryStore,
    base: String,
    joins: Vec<JoinClause>,
    filters: Vec<Filter>,
}

impl MemoryStore {
    pub fn query(&self, table: &str) -> Query {
        Query {
            store: self.clone(),
            base: table.to_string(),
            joins: Vec::new(),
            filters: Vec::new(),
        }
    }
}

impl Query {
    /// Join another table through `fk_column` on the base row.
    pub fn join(mut self, table: &str, fk_column: &str) -> Self {
        self.joins.push(JoinClause {
            table: table.to_string(),
            fk_column: fk_column.to_string(),
        });
        self
    }

    /// Compose a named scope into this query.
    pub fn scope(mut self, scope: &Scope) -> Self {
        self.filters.push(scope.filter().clone());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Matching base-table record ids, in insertion order.
    pub fn ids(&self) -> Result<Vec<u64>> {
        self.store.read(|tables| {
            let base = tables
                .get(&self.base)
                .ok_or_else(|| EnumError::TableNotFound(self.base.clone()))?;

            let mut matches = Vec::new();
            'rows: for (id, attrs) in base.rows() {
                // Row context: base attributes plus one entry per joined
                // table, keyed by table name.
                let mut context: HashMap<&str, &Attributes> = HashMap::new();
                context.insert(self.base.as_str(), attrs);

                for join in &self.joins {
                    let target = tables
                        .get(&join.table)
                        .ok_or_else(|| EnumError::TableNotFound(join.table.clone()))?;
                    let Some(joined) = lookup_join(attrs, &join.fk_column, target) else {
                        continue 'rows;
                    };
                    context.insert(join.table.as_str(), joined);
                }

                for filter in &self.filters {
                    if !evaluate(filter, &self.base, &context)? {
                        continue 'rows;
                    }
                }

                matches.push(id);
            }
            Ok(matches)
        })
    }

    /// Matching base-table records, checked out for reading and mutation.
    pub fn records(&self) -> Result<Vec<StoreRecord>> {
        self.ids()?
            .into_iter()
            .map(|id| self.store.checkout(&self.base, id))
            .collect()
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.ids()?.len())
    }
}

fn lookup_join<'a>(
    attrs: &Attributes,
    fk_column: &str,
    target: &'a crate::storage::Table,
) -> Option<&'a Attributes> {
    let id = attrs.get(fk_column)?.as_deref()?.parse::<u64>().ok()?;
    target.get(id)
}

fn evaluate(filter: &Filter, base: &str, context: &HashMap<&str, &Attributes>) -> Result<bool> {
    match filter {
        // Structured equality binds to the base table of the query.
        Filter::Eq { column, value } => {
            let attrs = context
                .get(base)
                .ok_or_else(|| EnumError::TableNotFound(base.to_string()))?;
            Ok(attr_value(attrs, column) == Some(value.as_str()))
        }
        Filter::NotEqRaw {
            table,
            column,
            value,
        } => {
            let attrs = context
                .get(table.as_str())
                .ok_or_else(|| EnumError::TableNotFound(table.clone()))?;
            // SQL inequality semantics: a null column never satisfies `!=`.
            match attr_value(attrs, column) {
                Some(current) => Ok(current != value),
                None => Ok(false),
            }
        }
    }
}

fn attr_value<'a>(attrs: &'a Attributes, column: &str) -> Option<&'a str> {
    attrs.get(column).and_then(|v| v.as_deref())
}
