//! SQLite persistence for scenarios.
//!
//! Only this module issues SQL. Every call runs on the blocking pool with
//! the shared connection locked for its duration.

use crate::core::{NewScenario, Scenario, ScenarioStore};
use crate::utils::error::{Result, RoiError};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex};

const SCHEMA: &str = include_str!("../../migrations/001_scenarios.sql");

const COLUMNS: &str = "id, scenario_name, monthly_invoice_volume, num_ap_staff, \
    avg_hours_per_invoice, hourly_wage, error_rate_manual, error_cost, \
    time_horizon_months, one_time_implementation_cost, monthly_savings, \
    roi_percentage, payback_months";

#[derive(Clone)]
pub struct SqliteScenarioStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteScenarioStore {
    /// Open (or create) the scenario database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self::from_connection(conn))
    }

    /// In-memory database, mostly for tests.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!("Scenario schema is up to date");
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RoiError::PersistenceError {
            message: "database connection lock poisoned".to_string(),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = store.lock()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| RoiError::PersistenceError {
            message: format!("database task failed: {}", e),
        })?
    }
}

#[async_trait]
impl ScenarioStore for SqliteScenarioStore {
    async fn create(&self, scenario: NewScenario) -> Result<Scenario> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            match insert_and_fetch(&tx, &scenario) {
                Ok(saved) => {
                    tx.commit()?;
                    Ok(saved)
                }
                Err(e) => {
                    if let Err(rollback_err) = tx.rollback() {
                        tracing::error!("Rollback failed: {}", rollback_err);
                    } else {
                        tracing::warn!("Rolled back scenario insert: {}", e);
                    }
                    Err(e)
                }
            }
        })
        .await
    }

    async fn list(&self) -> Result<Vec<Scenario>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {} FROM scenarios ORDER BY id DESC", COLUMNS))?;
            let rows = stmt.query_map([], map_scenario_row)?;
            let scenarios = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(scenarios)
        })
        .await
    }

    async fn get(&self, id: i64) -> Result<Option<Scenario>> {
        self.with_conn(move |conn| {
            let scenario = conn
                .query_row(
                    &format!("SELECT {} FROM scenarios WHERE id = ?1", COLUMNS),
                    params![id],
                    map_scenario_row,
                )
                .optional()?;
            Ok(scenario)
        })
        .await
    }
}

fn insert_and_fetch(tx: &Transaction<'_>, scenario: &NewScenario) -> Result<Scenario> {
    let inputs = &scenario.inputs;
    let results = &scenario.results;

    tx.execute(
        "INSERT INTO scenarios (scenario_name, monthly_invoice_volume, num_ap_staff, \
         avg_hours_per_invoice, hourly_wage, error_rate_manual, error_cost, \
         time_horizon_months, one_time_implementation_cost, monthly_savings, \
         roi_percentage, payback_months) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            scenario.scenario_name,
            inputs.monthly_invoice_volume,
            inputs.num_ap_staff,
            inputs.avg_hours_per_invoice,
            inputs.hourly_wage,
            inputs.error_rate_manual,
            inputs.error_cost,
            inputs.time_horizon_months,
            inputs.one_time_implementation_cost,
            results.monthly_savings,
            results.roi_percentage,
            results.payback_months,
        ],
    )?;

    let id = tx.last_insert_rowid();
    let saved = tx.query_row(
        &format!("SELECT {} FROM scenarios WHERE id = ?1", COLUMNS),
        params![id],
        map_scenario_row,
    )?;
    Ok(saved)
}

fn map_scenario_row(row: &Row<'_>) -> rusqlite::Result<Scenario> {
    Ok(Scenario {
        id: row.get(0)?,
        scenario_name: row.get(1)?,
        monthly_invoice_volume: row.get(2)?,
        num_ap_staff: row.get(3)?,
        avg_hours_per_invoice: row.get(4)?,
        hourly_wage: row.get(5)?,
        error_rate_manual: row.get(6)?,
        error_cost: row.get(7)?,
        time_horizon_months: row.get(8)?,
        one_time_implementation_cost: row.get(9)?,
        monthly_savings: row.get(10)?,
        roi_percentage: row.get(11)?,
        payback_months: row.get(12)?,
    })
}
