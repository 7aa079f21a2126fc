//! SQLite-backed trip store.
//!
//! The trip, audit and history tables are normally fed by the telemetry
//! side; this service only reads them and applies dispatcher corrections.
//! Schema bootstrap is idempotent so a fresh database works out of the box.

use crate::errors::{AppError, AppResult};
use crate::models::correction::{HmCorrection, ShiftReassignment};
use crate::models::shift::ShiftCode;
use crate::store::{HmValidationSet, NewTrip, TripPatch, TripRow, TripStore};
use crate::utils::time::to_store_string;
use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::{Map, Value};
use std::sync::{Mutex, MutexGuard};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &str) -> AppResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.bootstrap()?;
        Ok(store)
    }

    /// Private database, used by tests.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.bootstrap()?;
        Ok(store)
    }

    fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Other("store connection lock poisoned".to_string()))
    }

    fn bootstrap(&self) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS opr_dump (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                reporttime TEXT,
                mobileid TEXT,
                opr_nrp TEXT,
                opr_username TEXT DEFAULT '',
                opr_shift TEXT,
                act_loaderid TEXT,
                pos_name TEXT,
                act_hauldistance TEXT,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                record_type TEXT NOT NULL DEFAULT 'trip',
                shift_code TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS login_update (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                target_id TEXT NOT NULL,
                b_nrp TEXT,
                a_nrp TEXT,
                b_hm REAL,
                a_hm REAL,
                b_shift TEXT,
                a_shift TEXT,
                remark TEXT NOT NULL,
                actor TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS hm_validation (
                id TEXT,
                next_id TEXT,
                prev_id TEXT,
                mig_type TEXT,
                mobileid TEXT,
                opr_nrp TEXT,
                opr_username TEXT,
                opr_shift TEXT,
                lgn_pattern TEXT,
                prev_hm REAL,
                hm REAL,
                next_hm REAL,
                reporttime TEXT,
                next_reporttime TEXT,
                problem TEXT
            );

            CREATE TABLE IF NOT EXISTS login_history (
                id TEXT,
                opr_nrp TEXT,
                opr_username TEXT,
                status TEXT,
                tanggal TEXT,
                opr_shift TEXT,
                jam TEXT,
                mobileid TEXT,
                lgn_hourmeter REAL,
                pos_name TEXT,
                reporttime TEXT,
                created_at TEXT
            );
            "#,
        )?;
        Ok(())
    }
}

/// Map one `opr_dump` row to the positional row shape the planner consumes.
fn map_trip_row(row: &Row) -> rusqlite::Result<TripRow> {
    Ok(vec![
        row.get::<_, Option<i64>>(0)?.map(|v| v.to_string()),
        row.get::<_, Option<String>>(1)?,
        row.get::<_, Option<String>>(2)?,
        row.get::<_, Option<String>>(3)?,
        row.get::<_, Option<String>>(4)?,
        row.get::<_, Option<String>>(5)?,
        row.get::<_, Option<String>>(6)?,
        row.get::<_, Option<String>>(7)?,
        row.get::<_, Option<String>>(8)?,
        row.get::<_, Option<i64>>(9)?.map(|v| v.to_string()),
        row.get::<_, Option<String>>(10)?,
    ])
}

/// Convert a SQLite value to JSON for the pass-through result sets.
fn value_ref_to_json(v: rusqlite::types::ValueRef<'_>) -> Value {
    use rusqlite::types::ValueRef;
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}

fn rows_as_objects(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> AppResult<(Vec<String>, Vec<Value>)> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut rows = stmt.query(rusqlite::params_from_iter(args.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut obj = Map::new();
        for (idx, name) in columns.iter().enumerate() {
            obj.insert(name.clone(), value_ref_to_json(row.get_ref(idx)?));
        }
        out.push(Value::Object(obj));
    }
    Ok((columns, out))
}

impl TripStore for SqliteStore {
    fn trips_by_unit(
        &self,
        date: &str,
        shift: ShiftCode,
        equipment: &str,
        operator: Option<&str>,
    ) -> AppResult<Vec<TripRow>> {
        let conn = self.conn()?;

        const COLUMNS: &str = "id, reporttime, mobileid, opr_nrp, opr_username, opr_shift, \
             act_loaderid, pos_name, act_hauldistance, is_deleted, record_type";

        let mut out = Vec::new();
        match operator {
            Some(nrp) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM opr_dump
                     WHERE date(reporttime) = ?1 AND shift_code = ?2
                       AND mobileid = ?3 AND opr_nrp = ?4
                     ORDER BY reporttime ASC"
                ))?;
                let rows = stmt.query_map(
                    params![date, shift.as_str(), equipment, nrp],
                    map_trip_row,
                )?;
                for r in rows {
                    out.push(r?);
                }
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM opr_dump
                     WHERE date(reporttime) = ?1 AND shift_code = ?2 AND mobileid = ?3
                     ORDER BY reporttime ASC"
                ))?;
                let rows =
                    stmt.query_map(params![date, shift.as_str(), equipment], map_trip_row)?;
                for r in rows {
                    out.push(r?);
                }
            }
        }
        Ok(out)
    }

    fn insert_trip(&self, trip: &NewTrip) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO opr_dump
                 (reporttime, mobileid, opr_nrp, opr_shift, act_loaderid, pos_name, act_hauldistance)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                to_store_string(&trip.report_time),
                trip.equipment_no,
                trip.operator_id,
                trip.opr_shift,
                trip.loader_id,
                trip.pos_name,
                trip.distance,
            ],
        )?;
        Ok(())
    }

    fn find_trip_id(
        &self,
        report_time: &NaiveDateTime,
        equipment: &str,
        operator: &str,
    ) -> AppResult<Option<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id FROM opr_dump
             WHERE reporttime = ?1 AND mobileid = ?2 AND opr_nrp = ?3
             ORDER BY id DESC
             LIMIT 1",
        )?;
        let id: Option<i64> = stmt
            .query_row(
                params![to_store_string(report_time), equipment, operator],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id.map(|v| v.to_string()))
    }

    fn delete_trip(&self, id: &str) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute("UPDATE opr_dump SET is_deleted = 1 WHERE id = ?1", [id])?;
        Ok(())
    }

    fn restore_trip(&self, id: &str) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute("UPDATE opr_dump SET is_deleted = 0 WHERE id = ?1", [id])?;
        Ok(())
    }

    fn modify_trip(&self, patch: &TripPatch) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE opr_dump
             SET reporttime       = COALESCE(?2, reporttime),
                 act_loaderid     = COALESCE(?3, act_loaderid),
                 pos_name         = COALESCE(?4, pos_name),
                 act_hauldistance = COALESCE(?5, act_hauldistance)
             WHERE id = ?1",
            params![
                patch.id,
                patch.report_time.as_ref().map(to_store_string),
                patch.loader_id,
                patch.pos_name,
                patch.distance,
            ],
        )?;
        Ok(())
    }

    fn update_shift(&self, change: &ShiftReassignment) -> AppResult<()> {
        let mut conn = self.conn()?;
        // Both sides of the boundary move in one transaction.
        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE opr_dump SET opr_shift = ?2 WHERE id = ?1",
            params![change.id, change.new_shift.as_str()],
        )?;
        if let Some(next_id) = &change.next_id {
            tx.execute(
                "UPDATE opr_dump SET opr_shift = ?2 WHERE id = ?1",
                params![next_id, change.new_shift.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_login_update(&self, correction: &HmCorrection) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO login_update
                 (target_id, b_nrp, a_nrp, b_hm, a_hm, b_shift, a_shift, remark, actor, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                correction.target_id,
                correction.before_nrp,
                correction.after_nrp,
                correction.before_hm,
                correction.after_hm,
                correction.before_shift,
                correction.after_shift,
                correction.remark,
                correction.actor,
                Local::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn hm_validation_rows(&self) -> AppResult<HmValidationSet> {
        let conn = self.conn()?;
        let (columns, rows) = rows_as_objects(
            &conn,
            "SELECT * FROM hm_validation ORDER BY reporttime ASC",
            &[],
        )?;
        Ok(HmValidationSet { columns, rows })
    }

    fn historical_logins(&self, equipment: &str) -> AppResult<Vec<Value>> {
        let conn = self.conn()?;
        let (_, rows) = rows_as_objects(
            &conn,
            "SELECT * FROM login_history WHERE mobileid = ?1 ORDER BY reporttime ASC",
            &[&equipment],
        )?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shift::ShiftValue;

    fn seeded() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        {
            let conn = store.conn().unwrap();
            conn.execute_batch(
                r#"
                INSERT INTO opr_dump (reporttime, mobileid, opr_nrp, opr_username, opr_shift,
                                      act_loaderid, pos_name, act_hauldistance, is_deleted,
                                      record_type, shift_code)
                VALUES
                    ('2024-03-02 06:10:00', 'DT1101', '88123', 'A. SIREGAR', '1',
                     'EX201', 'PIT-A', '1.8', 0, 'trip', 'S01'),
                    ('2024-03-02 07:55:00', 'DT1101', '88123', 'A. SIREGAR', '1',
                     'EX201', 'PIT-A', '2.1', 1, 'trip', 'S01'),
                    ('2024-03-02 15:02:00', 'DT1101', '90511', 'B. HUTAPEA', '2',
                     NULL, NULL, NULL, 0, 'trip', 'S02');
                "#,
            )
            .unwrap();
        }
        store
    }

    #[test]
    fn trips_by_unit_filters_by_shift_and_operator() {
        let store = seeded();
        let rows = store
            .trips_by_unit("2024-03-02", ShiftCode::S01, "DT1101", None)
            .unwrap();
        assert_eq!(rows.len(), 2);

        let rows = store
            .trips_by_unit("2024-03-02", ShiftCode::S02, "DT1101", Some("90511"))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][3].as_deref(), Some("90511"));
        // NULL trailing columns come through as None, not empty strings
        assert_eq!(rows[0][6], None);
    }

    #[test]
    fn delete_and_restore_toggle_the_flag() {
        let store = seeded();
        store.delete_trip("1").unwrap();
        let rows = store
            .trips_by_unit("2024-03-02", ShiftCode::S01, "DT1101", None)
            .unwrap();
        assert_eq!(rows[0][9].as_deref(), Some("1"));

        store.restore_trip("1").unwrap();
        let rows = store
            .trips_by_unit("2024-03-02", ShiftCode::S01, "DT1101", None)
            .unwrap();
        assert_eq!(rows[0][9].as_deref(), Some("0"));
    }

    #[test]
    fn modify_trip_leaves_unset_fields_alone() {
        let store = seeded();
        store
            .modify_trip(&TripPatch {
                id: "1".to_string(),
                report_time: None,
                loader_id: Some("EX305".to_string()),
                pos_name: None,
                distance: None,
            })
            .unwrap();
        let rows = store
            .trips_by_unit("2024-03-02", ShiftCode::S01, "DT1101", None)
            .unwrap();
        assert_eq!(rows[0][6].as_deref(), Some("EX305"));
        assert_eq!(rows[0][7].as_deref(), Some("PIT-A"));
    }

    #[test]
    fn update_shift_moves_both_sides_of_the_pair() {
        let store = seeded();
        store
            .update_shift(&ShiftReassignment {
                id: "1".to_string(),
                next_id: Some("2".to_string()),
                report_time: None,
                next_report_time: None,
                equipment_no: Some("DT1101".to_string()),
                operator_id: Some("88123".to_string()),
                hm: Some(10450.5),
                next_hm: Some(10461.0),
                opr_shift: Some("1".to_string()),
                new_shift: ShiftValue::Two,
            })
            .unwrap();
        let rows = store
            .trips_by_unit("2024-03-02", ShiftCode::S01, "DT1101", None)
            .unwrap();
        assert_eq!(rows[0][5].as_deref(), Some("2"));
        assert_eq!(rows[1][5].as_deref(), Some("2"));
    }
}
