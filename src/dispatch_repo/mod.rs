// SQLite store behind the console's read-only query boundary.
// Ingestion validates records; every query re-reads fresh rows.

mod blob;
mod error;

pub use error::IngestError;

use crate::aggregator;
use crate::models::{
    Alert, Availability, Incident, IncidentStatus, PipelineMetrics, SystemMetricSnapshot, Unit,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

pub struct DispatchRepo {
    pool: SqlitePool,
    alert_retention_ms: i64,
}

/// Current Unix time in ms; 0 if the clock is before the epoch.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl DispatchRepo {
    pub async fn connect(
        path: &str,
        max_pool_size: u32,
        alert_retention_days: u32,
    ) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        let alert_retention_ms = (alert_retention_days as i64) * 24 * 60 * 60 * 1000;
        Ok(Self {
            pool,
            alert_retention_ms,
        })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS incidents (
                id TEXT PRIMARY KEY,
                category TEXT NOT NULL,
                location TEXT NOT NULL,
                severity TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                processing_secs REAL NOT NULL,
                assigned_units BLOB NOT NULL,
                eta_secs INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS units (
                id TEXT PRIMARY KEY,
                unit_type TEXT NOT NULL,
                availability TEXT NOT NULL,
                assigned_incident TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS alerts (
                id TEXT PRIMARY KEY,
                severity TEXT NOT NULL,
                message TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_alerts_timestamp ON alerts(timestamp)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS pipeline_metrics (id INTEGER PRIMARY KEY CHECK (id = 1), data BLOB NOT NULL)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ---- ingestion ----

    /// Insert or replace an incident and move its units to `active` (or release them when
    /// the incident is resolved). Units dropped from the assignment list are released.
    #[instrument(skip(self, incident), fields(repo = "dispatch", operation = "ingest_incident", incident_id = %incident.id))]
    pub async fn ingest_incident(&self, incident: &Incident) -> Result<(), IngestError> {
        if incident.id.trim().is_empty() {
            return Err(IngestError::EmptyId { entity: "incident" });
        }
        if !incident.processing_secs.is_finite() || incident.processing_secs < 0.0 {
            return Err(IngestError::InvalidProcessingDuration {
                id: incident.id.clone(),
                value: incident.processing_secs,
            });
        }
        let created_at = sql_i64("createdAt", incident.created_at)?;
        let eta_secs = incident
            .eta_secs
            .map(|s| sql_i64("etaSecs", s))
            .transpose()?;

        let mut tx = self.pool.begin().await?;

        check_units(
            &mut tx,
            &incident.id,
            &incident.assigned_units,
            incident.is_active(),
        )
        .await?;

        let units_blob = blob::encode_unit_ids(&incident.assigned_units).map_err(IngestError::Blob)?;
        sqlx::query(
            r#"
            INSERT INTO incidents
            (id, category, location, severity, status, created_at, processing_secs, assigned_units, eta_secs)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT(id) DO UPDATE SET
                category = excluded.category,
                location = excluded.location,
                severity = excluded.severity,
                status = excluded.status,
                created_at = excluded.created_at,
                processing_secs = excluded.processing_secs,
                assigned_units = excluded.assigned_units,
                eta_secs = excluded.eta_secs
            "#,
        )
        .bind(&incident.id)
        .bind(&incident.category)
        .bind(&incident.location)
        .bind(enum_text(&incident.severity))
        .bind(enum_text(&incident.status))
        .bind(created_at)
        .bind(incident.processing_secs)
        .bind(&units_blob)
        .bind(eta_secs)
        .execute(&mut *tx)
        .await?;

        release_units(&mut tx, &incident.id).await?;
        if incident.is_active() {
            activate_units(&mut tx, &incident.id, &incident.assigned_units).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Set an incident's status. Resolving it releases every unit assigned to it; reopening a
    /// resolved incident claims its stored units again, failing if another incident holds one.
    #[instrument(skip(self), fields(repo = "dispatch", operation = "update_incident_status"))]
    pub async fn update_incident_status(
        &self,
        id: &str,
        status: IncidentStatus,
    ) -> Result<(), IngestError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT status, assigned_units FROM incidents WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Err(IngestError::IncidentNotFound(id.to_string()));
        };
        let previous: String = row.try_get("status")?;
        let was_terminal = previous == enum_text(&IncidentStatus::Resolved);

        if status.is_terminal() {
            release_units(&mut tx, id).await?;
        } else if was_terminal {
            let assigned: Vec<u8> = row.try_get("assigned_units")?;
            let unit_ids = blob::decode_unit_ids(&assigned);
            check_units(&mut tx, id, &unit_ids, true).await?;
            activate_units(&mut tx, id, &unit_ids).await?;
        }

        sqlx::query("UPDATE incidents SET status = $1 WHERE id = $2")
            .bind(enum_text(&status))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Insert or update a unit and return what was stored. An omitted `assignedIncident`
    /// keeps the current assignment; a unit working an active incident stays `active` and
    /// cannot be moved to another incident.
    #[instrument(skip(self, unit), fields(repo = "dispatch", operation = "upsert_unit", unit_id = %unit.id))]
    pub async fn upsert_unit(&self, unit: &Unit) -> Result<Unit, IngestError> {
        if unit.id.trim().is_empty() {
            return Err(IngestError::EmptyId { entity: "unit" });
        }
        let mut tx = self.pool.begin().await?;

        let current = current_assignment(&mut tx, &unit.id).await?;
        let assigned_incident = match (&unit.assigned_incident, &current) {
            (Some(requested), Some(working)) if requested != working => {
                return Err(IngestError::UnitAlreadyAssigned {
                    unit: unit.id.clone(),
                    incident: working.clone(),
                });
            }
            (Some(requested), _) => Some(requested.clone()),
            (None, working) => working.clone(),
        };

        if let Some(ref incident_id) = assigned_incident {
            match incident_active(&mut tx, incident_id).await? {
                None => return Err(IngestError::IncidentNotFound(incident_id.clone())),
                Some(false) => return Err(IngestError::IncidentNotActive(incident_id.clone())),
                Some(true) => {}
            }
            if unit.availability != Availability::Active {
                return Err(IngestError::UnitBusy {
                    unit: unit.id.clone(),
                    incident: incident_id.clone(),
                });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO units (id, unit_type, availability, assigned_incident)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(id) DO UPDATE SET
                unit_type = excluded.unit_type,
                availability = excluded.availability,
                assigned_incident = excluded.assigned_incident
            "#,
        )
        .bind(&unit.id)
        .bind(enum_text(&unit.unit_type))
        .bind(enum_text(&unit.availability))
        .bind(&assigned_incident)
        .execute(&mut *tx)
        .await?;

        if current.is_none()
            && let Some(ref incident_id) = assigned_incident
        {
            add_unit_to_incident(&mut tx, incident_id, &unit.id).await?;
        }

        tx.commit().await?;
        Ok(Unit {
            assigned_incident,
            ..unit.clone()
        })
    }

    /// Availability change reported by a unit agent. A unit working an active incident can
    /// only report `active`.
    #[instrument(skip(self), fields(repo = "dispatch", operation = "set_unit_status"))]
    pub async fn set_unit_status(
        &self,
        id: &str,
        availability: Availability,
    ) -> Result<(), IngestError> {
        let mut tx = self.pool.begin().await?;
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM units WHERE id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(IngestError::UnitNotFound(id.to_string()));
        }
        if availability != Availability::Active
            && let Some(incident) = current_assignment(&mut tx, id).await?
        {
            return Err(IngestError::UnitBusy {
                unit: id.to_string(),
                incident,
            });
        }
        sqlx::query("UPDATE units SET availability = $1 WHERE id = $2")
            .bind(enum_text(&availability))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Offboard a unit. Refused while it works an active incident.
    #[instrument(skip(self), fields(repo = "dispatch", operation = "delete_unit"))]
    pub async fn delete_unit(&self, id: &str) -> Result<(), IngestError> {
        let mut tx = self.pool.begin().await?;
        if let Some(incident) = current_assignment(&mut tx, id).await? {
            return Err(IngestError::UnitBusy {
                unit: id.to_string(),
                incident,
            });
        }
        let r = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if r.rows_affected() == 0 {
            return Err(IngestError::UnitNotFound(id.to_string()));
        }
        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self, alert), fields(repo = "dispatch", operation = "insert_alert"))]
    pub async fn insert_alert(&self, alert: &Alert) -> Result<(), IngestError> {
        if alert.id.trim().is_empty() {
            return Err(IngestError::EmptyId { entity: "alert" });
        }
        let timestamp = sql_i64("timestamp", alert.timestamp)?;
        sqlx::query(
            "INSERT OR REPLACE INTO alerts (id, severity, message, timestamp) VALUES ($1, $2, $3, $4)",
        )
        .bind(&alert.id)
        .bind(enum_text(&alert.severity))
        .bind(&alert.message)
        .bind(timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Replace the latest pipeline metrics (percentages clamped, negatives zeroed).
    #[instrument(skip(self, metrics), fields(repo = "dispatch", operation = "record_pipeline_metrics"))]
    pub async fn record_pipeline_metrics(
        &self,
        metrics: &PipelineMetrics,
    ) -> Result<(), IngestError> {
        let clean = metrics.sanitized();
        let payload = wincode::serialize(&clean).map_err(|e| IngestError::Blob(e.to_string()))?;
        let data = blob::with_version_prefix(blob::BLOB_VERSION, payload);
        sqlx::query("INSERT OR REPLACE INTO pipeline_metrics (id, data) VALUES (1, $1)")
            .bind(&data)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ---- queries ----

    pub async fn list_incidents(&self) -> anyhow::Result<Vec<Incident>> {
        let rows = sqlx::query(
            "SELECT id, category, location, severity, status, created_at, processing_secs, assigned_units, eta_secs
             FROM incidents ORDER BY created_at DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_incident_row).collect()
    }

    pub async fn get_incident(&self, id: &str) -> anyhow::Result<Option<Incident>> {
        let row = sqlx::query(
            "SELECT id, category, location, severity, status, created_at, processing_secs, assigned_units, eta_secs
             FROM incidents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(parse_incident_row).transpose()
    }

    pub async fn list_units(&self) -> anyhow::Result<Vec<Unit>> {
        let rows = sqlx::query(
            "SELECT id, unit_type, availability, assigned_incident FROM units ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_unit_row).collect()
    }

    pub async fn get_unit(&self, id: &str) -> anyhow::Result<Option<Unit>> {
        let row = sqlx::query(
            "SELECT id, unit_type, availability, assigned_incident FROM units WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(parse_unit_row).transpose()
    }

    /// Alerts newest first (ties by id, descending). `None` returns all.
    pub async fn list_alerts(&self, limit: Option<u32>) -> anyhow::Result<Vec<Alert>> {
        let limit = limit.map(i64::from).unwrap_or(-1);
        let rows = sqlx::query(
            "SELECT id, severity, message, timestamp FROM alerts ORDER BY timestamp DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(Alert {
                id: row.try_get("id")?,
                severity: parse_enum(&row.try_get::<String, _>("severity")?)?,
                message: row.try_get("message")?,
                timestamp: row.try_get::<i64, _>("timestamp")? as u64,
            });
        }
        Ok(out)
    }

    /// Latest reported pipeline metrics; zeros when nothing was reported or the blob is unreadable.
    pub async fn latest_pipeline_metrics(&self) -> anyhow::Result<PipelineMetrics> {
        let row = sqlx::query("SELECT data FROM pipeline_metrics WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(PipelineMetrics::default());
        };
        let data: Vec<u8> = row.try_get("data")?;
        Ok(
            wincode::deserialize(blob::blob_payload(&data, blob::BLOB_VERSION)).unwrap_or_else(
                |e| {
                    tracing::debug!(error = %e, "wincode deserialize pipeline_metrics, using default");
                    PipelineMetrics::default()
                },
            ),
        )
    }

    /// Aggregates a fresh read of incidents, units and pipeline metrics.
    #[instrument(skip(self), fields(repo = "dispatch", operation = "get_metric_snapshot"))]
    pub async fn get_metric_snapshot(&self, as_of_ms: u64) -> anyhow::Result<SystemMetricSnapshot> {
        let incidents = self.list_incidents().await?;
        let units = self.list_units().await?;
        let pipeline = self.latest_pipeline_metrics().await?;
        Ok(aggregator::aggregate(&incidents, &units, &pipeline, as_of_ms))
    }

    /// Delete alerts older than the retention window. Returns rows deleted.
    #[instrument(skip(self), fields(repo = "dispatch", operation = "prune_alerts"))]
    pub async fn prune_alerts(&self) -> anyhow::Result<u64> {
        let cutoff = i64::try_from(now_ms())
            .unwrap_or(i64::MAX)
            .saturating_sub(self.alert_retention_ms);
        let r = sqlx::query("DELETE FROM alerts WHERE timestamp < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }
}

async fn release_units(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    incident_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE units SET availability = $1, assigned_incident = NULL WHERE assigned_incident = $2",
    )
    .bind(enum_text(&Availability::Available))
    .bind(incident_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Every unit must exist; while `active`, none may be working a different incident.
async fn check_units(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    incident_id: &str,
    unit_ids: &[String],
    active: bool,
) -> Result<(), IngestError> {
    for unit_id in unit_ids {
        let row = sqlx::query("SELECT assigned_incident FROM units WHERE id = $1")
            .bind(unit_id)
            .fetch_optional(&mut **tx)
            .await?;
        let Some(row) = row else {
            return Err(IngestError::UnknownUnit(unit_id.clone()));
        };
        let current: Option<String> = row.try_get("assigned_incident")?;
        if active
            && let Some(other) = current
            && other != incident_id
        {
            return Err(IngestError::UnitAlreadyAssigned {
                unit: unit_id.clone(),
                incident: other,
            });
        }
    }
    Ok(())
}

async fn activate_units(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    incident_id: &str,
    unit_ids: &[String],
) -> Result<(), sqlx::Error> {
    for unit_id in unit_ids {
        sqlx::query("UPDATE units SET availability = $1, assigned_incident = $2 WHERE id = $3")
            .bind(enum_text(&Availability::Active))
            .bind(incident_id)
            .bind(unit_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// `Some(true)` active, `Some(false)` resolved, `None` unknown.
async fn incident_active(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    incident_id: &str,
) -> Result<Option<bool>, sqlx::Error> {
    let status = sqlx::query_scalar::<_, String>("SELECT status FROM incidents WHERE id = $1")
        .bind(incident_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(status.map(|s| s != enum_text(&IncidentStatus::Resolved)))
}

/// The active incident the unit works, if any.
async fn current_assignment(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    unit_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    let assigned = sqlx::query_scalar::<_, Option<String>>(
        "SELECT assigned_incident FROM units WHERE id = $1",
    )
    .bind(unit_id)
    .fetch_optional(&mut **tx)
    .await?
    .flatten();
    let Some(incident_id) = assigned else {
        return Ok(None);
    };
    Ok(match incident_active(tx, &incident_id).await? {
        Some(true) => Some(incident_id),
        _ => None,
    })
}

/// Appends the unit to the incident's assignment list if it is not there yet.
async fn add_unit_to_incident(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    incident_id: &str,
    unit_id: &str,
) -> Result<(), IngestError> {
    let assigned: Vec<u8> =
        sqlx::query_scalar("SELECT assigned_units FROM incidents WHERE id = $1")
            .bind(incident_id)
            .fetch_one(&mut **tx)
            .await?;
    let mut unit_ids = blob::decode_unit_ids(&assigned);
    if unit_ids.iter().any(|u| u == unit_id) {
        return Ok(());
    }
    unit_ids.push(unit_id.to_string());
    let units_blob = blob::encode_unit_ids(&unit_ids).map_err(IngestError::Blob)?;
    sqlx::query("UPDATE incidents SET assigned_units = $1 WHERE id = $2")
        .bind(&units_blob)
        .bind(incident_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// SQLite integers are signed; larger values would wrap negative and break ordering.
fn sql_i64(field: &'static str, value: u64) -> Result<i64, IngestError> {
    i64::try_from(value).map_err(|_| IngestError::TimestampOutOfRange { field, value })
}

fn parse_unit_row(row: &SqliteRow) -> anyhow::Result<Unit> {
    Ok(Unit {
        id: row.try_get("id")?,
        unit_type: parse_enum(&row.try_get::<String, _>("unit_type")?)?,
        availability: parse_enum(&row.try_get::<String, _>("availability")?)?,
        assigned_incident: row.try_get("assigned_incident")?,
    })
}

fn parse_incident_row(row: &SqliteRow) -> anyhow::Result<Incident> {
    let assigned: Vec<u8> = row.try_get("assigned_units")?;
    Ok(Incident {
        id: row.try_get("id")?,
        category: row.try_get("category")?,
        location: row.try_get("location")?,
        severity: parse_enum(&row.try_get::<String, _>("severity")?)?,
        status: parse_enum(&row.try_get::<String, _>("status")?)?,
        created_at: row.try_get::<i64, _>("created_at")? as u64,
        processing_secs: row.try_get("processing_secs")?,
        assigned_units: blob::decode_unit_ids(&assigned),
        eta_secs: row.try_get::<Option<i64>, _>("eta_secs")?.map(|s| s as u64),
    })
}

/// Enum -> its serde name (e.g. `OutOfService` -> "out_of_service").
fn enum_text<T: Serialize>(v: &T) -> String {
    match serde_json::to_value(v) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

fn parse_enum<T: DeserializeOwned>(s: &str) -> anyhow::Result<T> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| anyhow::anyhow!("unexpected stored value {:?}: {}", s, e))
}
