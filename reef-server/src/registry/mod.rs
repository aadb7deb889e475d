//! Table Registry - 桌台注册表
//!
//! Owns every dining table record and its occupancy status. All mutations
//! go through the registry so that concurrent `reserve`/`occupy` calls for
//! the same table serialize on the table's row: the losing writer gets a
//! [`RegistryError::Conflict`] carrying the reservation id that holds the
//! table, never a silent overwrite.

use dashmap::DashMap;
use shared::error::{AppError, ErrorCode};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
use shared::util::snowflake_id;
use thiserror::Error;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("table {0} not found")]
    NotFound(i64),

    #[error("table {table_id} is already held by reservation {held_by}")]
    Conflict { table_id: i64, held_by: i64 },
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match &err {
            RegistryError::NotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, err.to_string())
                    .with_detail("table_id", *id)
            }
            RegistryError::Conflict { table_id, held_by } => {
                AppError::with_message(ErrorCode::TableConflict, err.to_string())
                    .with_detail("table_id", *table_id)
                    .with_detail("held_by", *held_by)
            }
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Per-row serialized table store
///
/// Row-level exclusivity comes from the map's entry locking: a mutation
/// holds the entry for the duration of its check-and-set, so two writers
/// for the same table cannot interleave between the conflict check and
/// the status write.
pub struct TableRegistry {
    tables: DashMap<i64, DiningTable>,
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRegistry {
    pub fn new() -> Self {
        Self {
            tables: DashMap::new(),
        }
    }

    // ========================================================================
    // Administrative CRUD
    // ========================================================================

    /// Register a new table, starting AVAILABLE
    pub fn create(&self, data: DiningTableCreate) -> DiningTable {
        let table = DiningTable {
            id: snowflake_id(),
            restaurant_id: data.restaurant_id,
            table_number: data.table_number,
            capacity: data.capacity.unwrap_or(4),
            status: TableStatus::Available,
            current_reservation_id: None,
        };
        tracing::debug!(table_id = table.id, table_number = table.table_number, "Table registered");
        self.tables.insert(table.id, table.clone());
        table
    }

    /// Update table metadata (number, capacity); status is not touched here
    pub fn update(&self, id: i64, data: DiningTableUpdate) -> RegistryResult<DiningTable> {
        let mut entry = self.tables.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        if let Some(n) = data.table_number {
            entry.table_number = n;
        }
        if let Some(c) = data.capacity {
            entry.capacity = c;
        }
        Ok(entry.clone())
    }

    /// Hard delete a table (administrative side operation)
    pub fn delete(&self, id: i64) -> bool {
        self.tables.remove(&id).is_some()
    }

    pub fn get(&self, id: i64) -> RegistryResult<DiningTable> {
        self.tables
            .get(&id)
            .map(|t| t.clone())
            .ok_or(RegistryError::NotFound(id))
    }

    /// All tables, ordered by table number
    pub fn list(&self) -> Vec<DiningTable> {
        let mut tables: Vec<DiningTable> = self.tables.iter().map(|t| t.clone()).collect();
        tables.sort_by_key(|t| (t.restaurant_id, t.table_number));
        tables
    }

    /// All tables for one restaurant, ordered by table number
    pub fn list_by_restaurant(&self, restaurant_id: i64) -> Vec<DiningTable> {
        let mut tables: Vec<DiningTable> = self
            .tables
            .iter()
            .filter(|t| t.restaurant_id == restaurant_id)
            .map(|t| t.clone())
            .collect();
        tables.sort_by_key(|t| t.table_number);
        tables
    }

    // ========================================================================
    // Occupancy operations
    // ========================================================================

    /// Available tables with sufficient capacity, smallest table first
    pub fn find_available(&self, restaurant_id: i64, min_capacity: i32) -> Vec<DiningTable> {
        let mut tables: Vec<DiningTable> = self
            .tables
            .iter()
            .filter(|t| {
                t.restaurant_id == restaurant_id
                    && t.status == TableStatus::Available
                    && t.capacity >= min_capacity
            })
            .map(|t| t.clone())
            .collect();
        tables.sort_by_key(|t| (t.capacity, t.table_number));
        tables
    }

    /// Reserve a table for a reservation
    ///
    /// Re-assigning the same reservation id is idempotent; a table held by
    /// a different reservation rejects the writer with `Conflict`.
    pub fn reserve(&self, table_id: i64, reservation_id: i64) -> RegistryResult<DiningTable> {
        self.bind(table_id, reservation_id, TableStatus::Reserved)
    }

    /// Occupy a table (guests seated)
    pub fn occupy(&self, table_id: i64, reservation_id: i64) -> RegistryResult<DiningTable> {
        self.bind(table_id, reservation_id, TableStatus::Occupied)
    }

    /// Release a table fully back to AVAILABLE, clearing the binding
    pub fn free(&self, table_id: i64) -> RegistryResult<DiningTable> {
        let mut entry = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::NotFound(table_id))?;
        entry.status = TableStatus::Available;
        entry.current_reservation_id = None;
        Ok(entry.clone())
    }

    /// Send a table to CLEANING, clearing the binding
    pub fn mark_cleaning(&self, table_id: i64) -> RegistryResult<DiningTable> {
        let mut entry = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::NotFound(table_id))?;
        entry.status = TableStatus::Cleaning;
        entry.current_reservation_id = None;
        Ok(entry.clone())
    }

    /// Check-and-set of (status, current_reservation_id) under the row lock
    fn bind(
        &self,
        table_id: i64,
        reservation_id: i64,
        status: TableStatus,
    ) -> RegistryResult<DiningTable> {
        let mut entry = self
            .tables
            .get_mut(&table_id)
            .ok_or(RegistryError::NotFound(table_id))?;

        if let Some(held_by) = entry.current_reservation_id
            && held_by != reservation_id
            && matches!(entry.status, TableStatus::Reserved | TableStatus::Occupied)
        {
            return Err(RegistryError::Conflict { table_id, held_by });
        }

        entry.status = status;
        entry.current_reservation_id = Some(reservation_id);
        debug_assert!(entry.binding_consistent());
        Ok(entry.clone())
    }
}
