use rusqlite::{params, Connection, Row};

use super::DatabaseError;
use crate::models::{DebrisRecord, NewDebrisRecord};

const DEBRIS_COLUMNS: &str =
    "id, file_path, categories, gps_lat, gps_lon, country, description, created_at";

// ═══════════════════════════════════════════
// Debris Repository
// ═══════════════════════════════════════════

/// Insert an accepted submission and return its assigned id.
pub fn insert_debris(conn: &Connection, record: &NewDebrisRecord) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO debris (file_path, categories, gps_lat, gps_lon, country, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.file_path,
            record.joined_categories(),
            record.gps_lat,
            record.gps_lon,
            record.country,
            record.description,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_debris(conn: &Connection, id: i64) -> Result<DebrisRecord, DatabaseError> {
    let sql = format!("SELECT {DEBRIS_COLUMNS} FROM debris WHERE id = ?1");
    conn.query_row(&sql, params![id], debris_from_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "debris".into(),
                id: id.to_string(),
            },
            other => DatabaseError::Sqlite(other),
        })
}

/// All stored submissions in insertion order.
pub fn list_debris(conn: &Connection) -> Result<Vec<DebrisRecord>, DatabaseError> {
    let sql = format!("SELECT {DEBRIS_COLUMNS} FROM debris ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], debris_from_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

fn debris_from_row(row: &Row<'_>) -> rusqlite::Result<DebrisRecord> {
    Ok(DebrisRecord {
        id: row.get(0)?,
        file_path: row.get(1)?,
        categories: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        // SQLite stores NaN as NULL.
        gps_lat: row.get::<_, Option<f64>>(3)?.unwrap_or(f64::NAN),
        gps_lon: row.get::<_, Option<f64>>(4)?.unwrap_or(f64::NAN),
        country: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        description: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        created_at: row.get(7)?,
    })
}
