use crate::db::connection::Database;
use crate::domain::class::HotelClass;
use crate::domain::record::{PropertyRecord, RecordId};
use crate::errors::ServerError;
use crate::normalizer::NormalizeReport;
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension};
use std::fs::File;
use std::io::BufWriter;

/// Metadata about the currently loaded dataset.
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    pub id: i64,
    pub filename: String,
    pub uploaded_at: NaiveDateTime,
    pub kept: i64,
    pub dropped_numeric: i64,
    pub dropped_class: i64,
}

/// Drops the normalized records next to the DB as pretty JSON, handy
/// when a workbook doesn't coerce the way the analyst expected.
pub fn save_dataset_debug(records: &[PropertyRecord], filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

/// Stores a freshly normalized dataset, replacing whatever was loaded
/// before. One dataset is live at a time; row order is preserved in
/// `row_ord` so record ids equal positions on reload.
pub fn replace_dataset(
    db: &Database,
    filename: &str,
    records: &[PropertyRecord],
    report: &NormalizeReport,
) -> Result<i64, ServerError> {
    let now = Utc::now().naive_utc();

    if let Err(e) = save_dataset_debug(records, "dataset_debug.json") {
        eprintln!("Failed to write dataset debug file: {e}");
    }

    db.with_conn(|conn| {
        let tx = conn
            .transaction()
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        // Explicit delete order; we don't rely on FK cascades being on
        // for this connection.
        tx.execute("DELETE FROM properties", [])
            .map_err(|e| ServerError::DbError(e.to_string()))?;
        tx.execute("DELETE FROM datasets", [])
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        tx.execute(
            r#"
            INSERT INTO datasets (filename, uploaded_at, kept, dropped_numeric, dropped_class)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                filename,
                now,
                report.kept as i64,
                report.dropped_numeric as i64,
                report.dropped_class as i64
            ],
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;
        let dataset_id = tx.last_insert_rowid();

        for rec in records {
            let extra_json = serde_json::to_string(&rec.extra)
                .map_err(|e| ServerError::DbError(format!("encode extra columns: {e}")))?;

            tx.execute(
                r#"
                INSERT INTO properties (
                  dataset_id, row_ord, address, project_name, state, county,
                  room_count, market_value, value_per_room, hotel_class,
                  class_order, owner_street, owner_name, extra_json
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                "#,
                params![
                    dataset_id,
                    rec.id.0 as i64,
                    rec.address,
                    rec.project_name,
                    rec.state,
                    rec.county,
                    rec.room_count,
                    rec.market_value,
                    rec.value_per_room,
                    rec.hotel_class.as_str(),
                    rec.class_order as i64,
                    rec.owner_street,
                    rec.owner_name,
                    extra_json
                ],
            )
            .map_err(|e| ServerError::DbError(e.to_string()))?;
        }

        tx.commit()
            .map_err(|e| ServerError::DbError(e.to_string()))?;
        Ok(dataset_id)
    })
}

/// Loads the live dataset, records ordered by `row_ord` so that a
/// record's id equals its index in the returned vector.
pub fn load_dataset(
    db: &Database,
) -> Result<Option<(DatasetInfo, Vec<PropertyRecord>)>, ServerError> {
    db.with_conn(|conn| {
        let info = conn
            .query_row(
                r#"
                SELECT id, filename, uploaded_at, kept, dropped_numeric, dropped_class
                FROM datasets
                ORDER BY id DESC
                LIMIT 1
                "#,
                [],
                |row| {
                    Ok(DatasetInfo {
                        id: row.get(0)?,
                        filename: row.get(1)?,
                        uploaded_at: row.get(2)?,
                        kept: row.get(3)?,
                        dropped_numeric: row.get(4)?,
                        dropped_class: row.get(5)?,
                    })
                },
            )
            .optional()
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let Some(info) = info else {
            return Ok(None);
        };

        struct Row {
            row_ord: i64,
            address: String,
            project_name: String,
            state: String,
            county: String,
            room_count: f64,
            market_value: f64,
            value_per_room: f64,
            class_label: String,
            owner_street: String,
            owner_name: String,
            extra_json: String,
        }

        let mut stmt = conn
            .prepare(
                r#"
                SELECT row_ord, address, project_name, state, county,
                       room_count, market_value, value_per_room, hotel_class,
                       owner_street, owner_name, extra_json
                FROM properties
                WHERE dataset_id = ?1
                ORDER BY row_ord
                "#,
            )
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map(params![info.id], |row| {
                Ok(Row {
                    row_ord: row.get(0)?,
                    address: row.get(1)?,
                    project_name: row.get(2)?,
                    state: row.get(3)?,
                    county: row.get(4)?,
                    room_count: row.get(5)?,
                    market_value: row.get(6)?,
                    value_per_room: row.get(7)?,
                    class_label: row.get(8)?,
                    owner_street: row.get(9)?,
                    owner_name: row.get(10)?,
                    extra_json: row.get(11)?,
                })
            })
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let mut records = Vec::new();
        for r in rows {
            let raw = r.map_err(|e| ServerError::DbError(e.to_string()))?;

            let hotel_class = HotelClass::from_label(&raw.class_label).ok_or_else(|| {
                ServerError::DbError(format!(
                    "row {} has unknown hotel class '{}'",
                    raw.row_ord, raw.class_label
                ))
            })?;
            let extra: Vec<(String, String)> = serde_json::from_str(&raw.extra_json)
                .map_err(|e| ServerError::DbError(format!("decode extra columns: {e}")))?;

            records.push(PropertyRecord {
                id: RecordId(raw.row_ord as usize),
                address: raw.address,
                project_name: raw.project_name,
                state: raw.state,
                county: raw.county,
                room_count: raw.room_count,
                market_value: raw.market_value,
                value_per_room: raw.value_per_room,
                hotel_class,
                class_order: hotel_class.order(),
                owner_street: raw.owner_street,
                owner_name: raw.owner_name,
                extra,
            });
        }

        Ok(Some((info, records)))
    })
}
