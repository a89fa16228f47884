use crate::core::{EnumError, RawValue, Result};
use crate::model::{ModelType, Record};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

/// Raw attribute map of one stored record: attribute name to nullable string.
pub type Attributes = BTreeMap<String, Option<String>>;

/// One table of the attribute store: schemaless rows keyed by record id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    rows: BTreeMap<u64, Attributes>,
    next_id: u64,
}

impl Table {
    fn insert(&mut self, attrs: Attributes) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.rows.insert(id, attrs);
        id
    }

    pub fn get(&self, id: u64) -> Option<&Attributes> {
        self.rows.get(&id)
    }

    pub fn rows(&self) -> impl Iterator<Item = (u64, &Attributes)> {
        self.rows.iter().map(|(id, attrs)| (*id, attrs))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    tables: HashMap<String, Table>,
}

/// Shared handle to the in-memory attribute store.
///
/// Tables hold raw attribute maps only; all typed behavior lives on the
/// model types registered against them. Clones share the same underlying
/// store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table if it does not exist yet.
    pub fn create_table(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.write()?;
        inner.tables.entry(name.to_string()).or_default();
        Ok(())
    }

    /// Insert raw attributes without validation and return the record id.
    pub fn insert(&self, table: &str, attrs: Attributes) -> Result<u64> {
        let mut inner = self.inner.write()?;
        let table = inner
            .tables
            .get_mut(table)
            .ok_or_else(|| EnumError::TableNotFound(table.to_string()))?;
        Ok(table.insert(attrs))
    }

    /// Build a fresh unsaved record for the model's table.
    pub fn build(&self, model: &ModelType) -> StoreRecord {
        StoreRecord {
            store: self.clone(),
            table: model.table_name().to_string(),
            id: None,
            attrs: Attributes::new(),
            saves: 0,
        }
    }

    /// Validate raw attributes against the model's rules, then insert and
    /// return the persisted record.
    pub fn create(&self, model: &ModelType, attrs: Attributes) -> Result<StoreRecord> {
        let mut record = self.build(model);
        record.attrs = attrs;
        model.validate(&record)?;
        record.persist()?;
        Ok(record)
    }

    /// Check out a record for reading and mutation. Changes become visible
    /// to the store only on [`Record::persist`].
    pub fn checkout(&self, table: &str, id: u64) -> Result<StoreRecord> {
        let inner = self.inner.read()?;
        let attrs = inner
            .tables
            .get(table)
            .ok_or_else(|| EnumError::TableNotFound(table.to_string()))?
            .get(id)
            .ok_or_else(|| EnumError::RecordNotFound(table.to_string(), id))?
            .clone();
        Ok(StoreRecord {
            store: self.clone(),
            table: table.to_string(),
            id: Some(id),
            attrs,
            saves: 0,
        })
    }

    pub fn delete_all(&self, table: &str) -> Result<()> {
        let mut inner = self.inner.write()?;
        let table = inner
            .tables
            .get_mut(table)
            .ok_or_else(|| EnumError::TableNotFound(table.to_string()))?;
        *table = Table::default();
        Ok(())
    }

    pub fn row_count(&self, table: &str) -> Result<usize> {
        let inner = self.inner.read()?;
        Ok(inner
            .tables
            .get(table)
            .ok_or_else(|| EnumError::TableNotFound(table.to_string()))?
            .row_count())
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&HashMap<String, Table>) -> Result<R>) -> Result<R> {
        let inner = self.inner.read()?;
        f(&inner.tables)
    }

    pub(crate) fn tables_snapshot(&self) -> Result<HashMap<String, Table>> {
        let inner = self.inner.read()?;
        Ok(inner.tables.clone())
    }

    pub(crate) fn replace_tables(&self, tables: HashMap<String, Table>) -> Result<()> {
        let mut inner = self.inner.write()?;
        inner.tables = tables;
        Ok(())
    }

    fn save_record(&self, table: &str, id: Option<u64>, attrs: &Attributes) -> Result<u64> {
        let mut inner = self.inner.write()?;
        let table_ref = inner
            .tables
            .get_mut(table)
            .ok_or_else(|| EnumError::TableNotFound(table.to_string()))?;
        match id {
            Some(id) => {
                let row = table_ref
                    .rows
                    .get_mut(&id)
                    .ok_or_else(|| EnumError::RecordNotFound(table.to_string(), id))?;
                *row = attrs.clone();
                Ok(id)
            }
            None => Ok(table_ref.insert(attrs.clone())),
        }
    }
}

/// A checked-out record: a local attribute buffer plus a handle back to the
/// store. The first persist inserts and assigns the record id; later
/// persists overwrite the stored row.
#[derive(Debug, Clone)]
pub struct StoreRecord {
    store: MemoryStore,
    table: String,
    id: Option<u64>,
    attrs: Attributes,
    saves: usize,
}

impl StoreRecord {
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of times this handle has been persisted. Lets tests observe
    /// that same-value mutations skip persistence.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Record for StoreRecord {
    fn read_raw(&self, attribute: &str) -> RawValue {
        RawValue::from(self.attrs.get(attribute).cloned().flatten())
    }

    fn write_raw(&mut self, attribute: &str, value: RawValue) {
        self.attrs.insert(attribute.to_string(), value.into_inner());
    }

    fn persist(&mut self) -> Result<()> {
        let id = self.store.save_record(&self.table, self.id, &self.attrs)?;
        self.id = Some(id);
        self.saves += 1;
        Ok(())
    }
}
