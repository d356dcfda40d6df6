//! Integration tests for ldar-output.

use tempfile::TempDir;

use crate::row::{CrewDayRow, DaySummaryRow, SiteSnapshotRow, SurveyRow};
use crate::writer::OutputWriter;

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn survey_row(site_id: u32, rate: Option<f64>) -> SurveyRow {
    SurveyRow {
        site_id,
        method:        "ogi".to_owned(),
        date:          "2023-01-05".to_owned(),
        measured_rate: rate,
        survey_level:  "component",
    }
}

fn crew_row(crew_id: u16) -> CrewDayRow {
    CrewDayRow {
        crew_id,
        method:          "ogi".to_owned(),
        date:            "2023-01-05".to_owned(),
        sites_visited:   3,
        travel_time_min: 45.0,
        survey_time_min: 360.0,
        cost:            900.0,
    }
}

fn summary_row(day: u32) -> DaySummaryRow {
    DaySummaryRow {
        day,
        date:      "2023-01-05".to_owned(),
        surveys:   4,
        crew_days: 2,
        cost:      1800.0,
        flags:     1,
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;
    use crate::csv::CsvWriter;

    fn headers(path: std::path::PathBuf) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        for name in ["survey_reports.csv", "crew_reports.csv", "daily_summaries.csv", "site_snapshots.csv"] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = tmp();
        let nested = dir.path().join("run").join("r0");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("survey_reports.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(dir.path().join("survey_reports.csv")), [
            "site_id",
            "method",
            "date",
            "measured_rate",
            "survey_level"
        ]);
        assert_eq!(headers(dir.path().join("crew_reports.csv")), [
            "crew_id",
            "method",
            "date",
            "sites_visited",
            "travel_time_min",
            "survey_time_min",
            "cost"
        ]);
        assert_eq!(headers(dir.path().join("daily_summaries.csv")), [
            "day", "date", "surveys", "crew_days", "cost", "flags"
        ]);
    }

    #[test]
    fn missing_rate_written_as_empty_field() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_surveys(&[survey_row(7, Some(0.25)), survey_row(8, None)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("survey_reports.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "7");
        assert_eq!(&rows[0][3], "0.25");
        assert_eq!(&rows[0][4], "component");
        assert_eq!(&rows[1][3], "");
    }

    #[test]
    fn crew_and_summary_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_crew_days(&[crew_row(0), crew_row(1)]).unwrap();
        w.write_day_summary(&summary_row(4)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("crew_reports.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "1");
        assert_eq!(&rows[1][3], "3");

        let mut rdr = csv::Reader::from_path(dir.path().join("daily_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "4");
        assert_eq!(&rows[0][5], "1");
    }

    #[test]
    fn flagged_written_as_integer() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_site_snapshots(&[SiteSnapshotRow {
            site_id:         2,
            day:             0,
            date:            "2023-01-01".to_owned(),
            flagged:         true,
            tagging_surveys: 1,
            surveys_done:    2,
        }])
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("site_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][3], "1");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batches_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_surveys(&[]).unwrap();
        w.write_crew_days(&[]).unwrap();
    }
}

// ── ReportObserver ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use ldar_core::{GeoPoint, NaiveDate, SimConfig};
    use ldar_method::MethodConfig;
    use ldar_sim::ProgramBuilder;
    use ldar_site::{SiteMethodParams, SiteRegistryBuilder};

    use super::*;
    use crate::csv::CsvWriter;
    use crate::observer::ReportObserver;
    use crate::OutputResult;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Fails every write after the first `ok` calls.
    struct FailingWriter {
        ok:    usize,
        calls: usize,
    }

    impl FailingWriter {
        fn tick(&mut self) -> OutputResult<()> {
            self.calls += 1;
            if self.calls > self.ok {
                Err(std::io::Error::other(format!("write {} failed", self.calls)).into())
            } else {
                Ok(())
            }
        }
    }

    impl OutputWriter for FailingWriter {
        fn write_surveys(&mut self, _rows: &[SurveyRow]) -> OutputResult<()> {
            self.tick()
        }
        fn write_crew_days(&mut self, _rows: &[CrewDayRow]) -> OutputResult<()> {
            self.tick()
        }
        fn write_day_summary(&mut self, _row: &DaySummaryRow) -> OutputResult<()> {
            self.tick()
        }
        fn write_site_snapshots(&mut self, _rows: &[SiteSnapshotRow]) -> OutputResult<()> {
            self.tick()
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.tick()
        }
    }

    #[test]
    fn integration_csv() {
        let config = SimConfig {
            start_date:           d(2023, 1, 1),
            end_date:             d(2023, 1, 2),
            seed:                 1,
            num_threads:          Some(1),
            output_interval_days: 1,
        };
        let params = SiteMethodParams { surveys_per_year: 1, survey_time_min: 60.0, deployable: true };
        let sites = SiteRegistryBuilder::new(1)
            .site("a", GeoPoint::new(52.0, -113.0), vec![params])
            .site("b", GeoPoint::new(52.0, -112.0), vec![params])
            .build()
            .unwrap();
        let mut truck = MethodConfig::new("truck");
        truck.max_work_hours = 1.0;

        let mut program = ProgramBuilder::new(config, sites, vec![truck]).build().unwrap();

        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = ReportObserver::new(writer, ["truck"]);
        program.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // One crew with room for one survey a day: one survey on each of two days.
        let mut rdr = csv::Reader::from_path(dir.path().join("survey_reports.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "truck");
        assert_eq!(&rows[0][2], "2023-01-01");
        assert_eq!(&rows[1][2], "2023-01-02");

        let mut rdr = csv::Reader::from_path(dir.path().join("crew_reports.csv")).unwrap();
        assert_eq!(rdr.records().count(), 2);

        let mut rdr = csv::Reader::from_path(dir.path().join("daily_summaries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 2);

        // output_interval = 1 → a snapshot each day, 2 days × 2 sites.
        let mut rdr = csv::Reader::from_path(dir.path().join("site_snapshots.csv")).unwrap();
        assert_eq!(rdr.records().count(), 4);
    }

    #[test]
    fn first_error_kept() {
        let mut obs = ReportObserver::new(FailingWriter { ok: 0, calls: 0 }, Vec::<String>::new());
        ldar_sim::ProgramObserver::on_sim_end(&mut obs, 0);
        ldar_sim::ProgramObserver::on_sim_end(&mut obs, 0);
        let err = obs.take_error().expect("error stored");
        assert!(err.to_string().contains("write 1 failed"), "{err}");
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn unknown_method_labelled_by_id() {
        use ldar_core::{MethodId, SiteId};
        use ldar_schedule::{MinimalSurveyReport, SurveyLevel};
        use ldar_sim::{DaySummary, ProgramObserver};

        let dir = tmp();
        let mut obs = ReportObserver::new(CsvWriter::new(dir.path()).unwrap(), ["ogi"]);
        obs.on_survey(&MinimalSurveyReport {
            site:          SiteId(0),
            method:        MethodId(3),
            date:          d(2023, 6, 1),
            measured_rate: None,
            survey_level:  SurveyLevel::Site,
        });
        obs.on_day_end(ldar_core::Day(0), d(2023, 6, 1), &DaySummary::default());
        obs.on_sim_end(1);
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("survey_reports.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][1], "method#3");
        assert_eq!(&rows[0][4], "site");
    }
}

// ── SQLite ────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::*;
    use crate::sqlite::SqliteWriter;

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_survey_count_and_null_rate() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_surveys(&[survey_row(0, Some(1.5)), survey_row(1, None), survey_row(2, Some(0.0))]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM survey_reports", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 3);
        let nulls: i64 = conn
            .query_row("SELECT COUNT(*) FROM survey_reports WHERE measured_rate IS NULL", [], |r| r.get(0))
            .unwrap();
        assert_eq!(nulls, 1);
    }

    #[test]
    fn sqlite_crew_days() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_crew_days(&[crew_row(0), crew_row(1)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let cost: f64 = conn.query_row("SELECT SUM(cost) FROM crew_reports", [], |r| r.get(0)).unwrap();
        assert_eq!(cost, 1800.0);
    }

    #[test]
    fn sqlite_day_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_day_summary(&summary_row(7)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (day, surveys, flags): (i64, i64, i64) = conn
            .query_row("SELECT day, surveys, flags FROM daily_summaries WHERE day = 7", [], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?))
            })
            .unwrap();
        assert_eq!(day, 7);
        assert_eq!(surveys, 4);
        assert_eq!(flags, 1);
    }

    #[test]
    fn sqlite_flagged_as_integer() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_site_snapshots(&[SiteSnapshotRow {
            site_id:         0,
            day:             3,
            date:            "2023-01-04".to_owned(),
            flagged:         true,
            tagging_surveys: 0,
            surveys_done:    1,
        }])
        .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let val: i64 = conn.query_row("SELECT flagged FROM site_snapshots WHERE site_id = 0", [], |r| r.get(0)).unwrap();
        assert_eq!(val, 1);
    }
}
