//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! four tables: `survey_reports`, `crew_reports`, `daily_summaries` and
//! `site_snapshots`.

use std::path::Path;

use rusqlite::{Connection, Statement, params};

use crate::writer::OutputWriter;
use crate::{CrewDayRow, DaySummaryRow, OutputResult, SiteSnapshotRow, SurveyRow};

/// Writes program output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS survey_reports (
                 site_id       INTEGER NOT NULL,
                 method        TEXT    NOT NULL,
                 date          TEXT    NOT NULL,
                 measured_rate REAL,
                 survey_level  TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS crew_reports (
                 crew_id         INTEGER NOT NULL,
                 method          TEXT    NOT NULL,
                 date            TEXT    NOT NULL,
                 sites_visited   INTEGER NOT NULL,
                 travel_time_min REAL    NOT NULL,
                 survey_time_min REAL    NOT NULL,
                 cost            REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS daily_summaries (
                 day       INTEGER PRIMARY KEY,
                 date      TEXT    NOT NULL,
                 surveys   INTEGER NOT NULL,
                 crew_days INTEGER NOT NULL,
                 cost      REAL    NOT NULL,
                 flags     INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS site_snapshots (
                 site_id         INTEGER NOT NULL,
                 day             INTEGER NOT NULL,
                 date            TEXT    NOT NULL,
                 flagged         INTEGER NOT NULL,
                 tagging_surveys INTEGER NOT NULL,
                 surveys_done    INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl SqliteWriter {
    /// Insert `rows` with one prepared statement inside one transaction.
    fn insert_batch<T>(
        &self,
        sql:  &str,
        rows: &[T],
        bind: impl Fn(&mut Statement<'_>, &T) -> rusqlite::Result<usize>,
    ) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(sql)?;
            for row in rows {
                bind(&mut *stmt, row)?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl OutputWriter for SqliteWriter {
    fn write_surveys(&mut self, rows: &[SurveyRow]) -> OutputResult<()> {
        self.insert_batch(
            "INSERT INTO survey_reports (site_id, method, date, measured_rate, survey_level) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rows,
            |stmt, r| stmt.execute(params![r.site_id, r.method, r.date, r.measured_rate, r.survey_level]),
        )
    }

    fn write_crew_days(&mut self, rows: &[CrewDayRow]) -> OutputResult<()> {
        self.insert_batch(
            "INSERT INTO crew_reports \
             (crew_id, method, date, sites_visited, travel_time_min, survey_time_min, cost) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rows,
            |stmt, r| {
                stmt.execute(params![
                    r.crew_id,
                    r.method,
                    r.date,
                    r.sites_visited,
                    r.travel_time_min,
                    r.survey_time_min,
                    r.cost,
                ])
            },
        )
    }

    fn write_day_summary(&mut self, row: &DaySummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO daily_summaries (day, date, surveys, crew_days, cost, flags) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![row.day, row.date, row.surveys as i64, row.crew_days as i64, row.cost, row.flags as i64],
        )?;
        Ok(())
    }

    fn write_site_snapshots(&mut self, rows: &[SiteSnapshotRow]) -> OutputResult<()> {
        self.insert_batch(
            "INSERT INTO site_snapshots (site_id, day, date, flagged, tagging_surveys, surveys_done) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rows,
            |stmt, r| stmt.execute(params![r.site_id, r.day, r.date, r.flagged, r.tagging_surveys, r.surveys_done]),
        )
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
