use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    entities::{
        blog_post::BlogPost,
        resource::{Direction, Resource},
    },
    errors::StoreError,
    store::{BackendKind, SelectQuery, StoreBackend},
};

/// Process-local tables keyed by name. Used for `memory://` stores and in tests.
///
/// Unique columns are checked while the table's shard lock is held, so two concurrent
/// writes cannot both claim the same value.
pub struct MemoryBackend {
    tables: DashMap<String, Vec<Value>>,
    unique: Vec<(&'static str, &'static str)>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Mirrors the hosted schema: blog post slugs are unique.
    pub fn new() -> Self {
        MemoryBackend { tables: DashMap::new(), unique: vec![(BlogPost::TABLE, "slug")] }
    }

    fn unique_columns<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.unique
            .iter()
            .filter(move |(t, _)| *t == table)
            .map(|(_, column)| *column)
    }

    /// Fails when another row (any id but `own_id`) already holds one of `row`'s unique values.
    fn check_unique(
        &self,
        table: &str,
        rows: &[Value],
        row: &Map<String, Value>,
        own_id: Option<&str>,
    ) -> Result<(), StoreError> {
        for column in self.unique_columns(table) {
            let Some(value) = row.get(column).filter(|v| !v.is_null()) else {
                continue;
            };
            let taken = rows
                .iter()
                .filter(|r| own_id.is_none() || id_of(r).as_deref() != own_id)
                .any(|r| r.get(column) == Some(value));
            if taken {
                return Err(StoreError::Conflict(format!("{column} {value} is already in use")));
            }
        }
        Ok(())
    }

    /// Row count of a table, zero if it was never written.
    pub fn len(&self, table: &str) -> usize {
        self.tables.get(table).map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }
}

fn id_of(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn matches_text(value: Option<&Value>, expected: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == expected,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == expected,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (x.parse::<DateTime<Utc>>(), y.parse::<DateTime<Utc>>()) {
                (Ok(dx), Ok(dy)) => dx.cmp(&dy),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn as_object(row: Value) -> Result<Map<String, Value>, StoreError> {
    match row {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::Decode("row payload must be a JSON object".into())),
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
        let mut rows: Vec<Value> = self
            .tables
            .get(query.table)
            .map(|rows| rows.clone())
            .unwrap_or_default();

        if let Some(filter) = &query.filter {
            rows.retain(|row| matches_text(row.get(filter.column), &filter.value));
        }

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(order.column), b.get(order.column));
                match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        Ok(rows)
    }

    async fn insert(&self, table: &'static str, row: Value) -> Result<Value, StoreError> {
        let mut object = as_object(row)?;
        let now = Value::String(Utc::now().to_rfc3339());

        object.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        object.entry("created_at").or_insert_with(|| now.clone());
        object.entry("updated_at").or_insert(now);

        let mut rows = self.tables.entry(table.to_string()).or_default();
        self.check_unique(table, &rows, &object, None)?;

        let stored = Value::Object(object);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, table: &'static str, id: &str, patch: Value) -> Result<Option<Value>, StoreError> {
        let patch = as_object(patch)?;
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(None);
        };

        if !rows.iter().any(|r| id_of(r).as_deref() == Some(id)) {
            return Ok(None);
        }
        self.check_unique(table, &rows, &patch, Some(id))?;

        let Some(row) = rows.iter_mut().find(|r| id_of(r).as_deref() == Some(id)) else {
            return Ok(None);
        };

        if let Value::Object(existing) = &mut *row {
            for (key, value) in patch {
                if key != "id" {
                    existing.insert(key, value);
                }
            }
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, table: &'static str, id: &str) -> Result<bool, StoreError> {
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|r| id_of(r).as_deref() != Some(id));
        Ok(rows.len() < before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
