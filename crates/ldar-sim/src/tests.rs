//! Integration tests for ldar-sim.

use ldar_core::{Day, GeoPoint, MethodId, NaiveDate, SeedTable, SimConfig, SiteId};
use ldar_method::{FollowUpConfig, MethodConfig, StaticEmissions};
use ldar_schedule::{CrewDailyReport, MinimalSurveyReport, SurveyLevel, SurveyPriority};
use ldar_site::{SiteMethodParams, SiteRegistry, SiteRegistryBuilder};

use crate::{DaySummary, NoopObserver, ProgramBuilder, ProgramConfig, ProgramError, ProgramObserver, run_replicates};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn config(start: NaiveDate, end: NaiveDate) -> SimConfig {
    SimConfig { start_date: start, end_date: end, seed: 42, num_threads: Some(1), output_interval_days: 1 }
}

fn params(rs: u32, minutes: f64) -> SiteMethodParams {
    SiteMethodParams { surveys_per_year: rs, survey_time_min: minutes, deployable: true }
}

/// `n` sites; each method column gets the same `(rs, minutes)`.
fn sites(n: usize, per_method: &[(u32, f64)]) -> SiteRegistry {
    let mut b = SiteRegistryBuilder::new(per_method.len());
    for i in 0..n {
        let p = per_method.iter().map(|&(rs, min)| params(rs, min)).collect();
        b = b.site(format!("site{i}"), GeoPoint::new(52.0, -113.0 + i as f32), p);
    }
    b.build().unwrap()
}

fn one_hour_truck() -> MethodConfig {
    let mut m = MethodConfig::new("truck");
    m.max_work_hours = 1.0;
    m
}

#[derive(Default)]
struct Recorder {
    days:      Vec<NaiveDate>,
    surveys:   Vec<MinimalSurveyReport>,
    crews:     Vec<CrewDailyReport>,
    snapshots: usize,
    ended:     Option<u32>,
}

impl ProgramObserver for Recorder {
    fn on_day_start(&mut self, _day: Day, date: NaiveDate) {
        self.days.push(date);
    }

    fn on_survey(&mut self, report: &MinimalSurveyReport) {
        self.surveys.push(report.clone());
    }

    fn on_crew_day(&mut self, report: &CrewDailyReport) {
        self.crews.push(report.clone());
    }

    fn on_snapshot(&mut self, _day: Day, _date: NaiveDate, _sites: &SiteRegistry) {
        self.snapshots += 1;
    }

    fn on_sim_end(&mut self, days: u32) {
        self.ended = Some(days);
    }
}

// ── ProgramBuilder ────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let p = ProgramBuilder::new(config(d(2023, 1, 1), d(2023, 1, 10)), sites(2, &[(1, 60.0)]), vec![one_hour_truck()])
            .build()
            .unwrap();
        assert_eq!(p.methods.len(), 1);
        assert_eq!(p.current_date(), d(2023, 1, 1));
    }

    #[test]
    fn inverted_dates_rejected() {
        let err = ProgramBuilder::new(config(d(2023, 2, 1), d(2023, 1, 1)), sites(1, &[(1, 60.0)]), vec![one_hour_truck()])
            .build();
        assert!(matches!(err, Err(ProgramError::Core(_))));
    }

    #[test]
    fn method_errors_propagate() {
        let err = ProgramBuilder::new(config(d(2023, 1, 1), d(2023, 1, 2)), sites(1, &[(1, 60.0), (1, 60.0)]), vec![
            one_hour_truck(),
        ])
        .build();
        assert!(matches!(err, Err(ProgramError::Method(_))));
    }
}

// ── Daily loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod program_tests {
    use super::*;

    #[test]
    fn more_neglected_site_surveyed_first() {
        let mut reg = sites(2, &[(1, 60.0)]);
        reg[SiteId(1)].state_mut(MethodId(0)).unwrap().time_since_last_survey = 300;
        let mut p = ProgramBuilder::new(config(d(2023, 1, 1), d(2023, 1, 2)), reg, vec![one_hour_truck()])
            .build()
            .unwrap();
        let mut rec = Recorder::default();

        p.run_days(1, &mut rec).unwrap();
        assert_eq!(rec.surveys.len(), 1);
        assert_eq!(rec.surveys[0].site, SiteId(1));
        let schedule = p.methods[0].schedule();
        assert_eq!(schedule.get_due_sites(), vec![SiteId(0)]);
        assert_eq!(schedule.queued_priority(SiteId(0)), Some(SurveyPriority::Default));

        p.run_days(1, &mut rec).unwrap();
        assert_eq!(rec.surveys.len(), 2);
        assert_eq!(rec.surveys[1].site, SiteId(0));
        assert_eq!(rec.surveys[1].date, d(2023, 1, 2));
    }

    #[test]
    fn run_covers_every_day_and_fires_hooks() {
        let mut p = ProgramBuilder::new(config(d(2023, 3, 1), d(2023, 3, 10)), sites(3, &[(1, 60.0)]), vec![
            one_hour_truck(),
        ])
        .build()
        .unwrap();
        let mut rec = Recorder::default();
        let summary = p.run(&mut rec).unwrap();

        assert_eq!(rec.days.len(), 10);
        assert_eq!(rec.days.last(), Some(&d(2023, 3, 10)));
        assert_eq!(rec.snapshots, 10);
        assert_eq!(rec.ended, Some(10));
        assert_eq!(summary.days, 10);
        assert_eq!(summary.surveys, 3);
        assert_eq!(summary.crew_days, 3);
        assert_eq!(rec.crews.len(), 3);
    }

    #[test]
    fn time_since_last_survey_advances_daily() {
        let mut p = ProgramBuilder::new(config(d(2023, 1, 1), d(2023, 1, 5)), sites(1, &[(0, 60.0)]), vec![
            one_hour_truck(),
        ])
        .build()
        .unwrap();
        p.run_days(4, &mut NoopObserver).unwrap();
        assert_eq!(p.sites[SiteId(0)].time_since_last_survey(MethodId(0)), 4);
    }

    #[test]
    fn annual_counters_roll_on_new_year() {
        let mut p = ProgramBuilder::new(config(d(2023, 12, 31), d(2024, 1, 1)), sites(1, &[(1, 60.0)]), vec![
            one_hour_truck(),
        ])
        .build()
        .unwrap();
        let summary = p.run(&mut NoopObserver).unwrap();
        assert_eq!(summary.surveys, 2);
        assert_eq!(p.sites[SiteId(0)].state(MethodId(0)).unwrap().surveys_done_this_year, 1);
    }

    #[test]
    fn screening_detection_triggers_follow_up_next_day() {
        let mut screen = MethodConfig::new("plane");
        screen.survey_level = SurveyLevel::Site;
        screen.follow_up = Some(FollowUpConfig::new("ogi", 1.0));
        let mut ogi = MethodConfig::new("ogi");
        ogi.is_follow_up = true;

        let emissions = StaticEmissions::new().with_rate(SiteId(0), 5.0);
        let mut p = ProgramBuilder::new(config(d(2023, 1, 1), d(2023, 1, 3)), sites(2, &[(1, 60.0), (0, 60.0)]), vec![
            screen, ogi,
        ])
        .emissions(Box::new(emissions))
        .build()
        .unwrap();
        let mut rec = Recorder::default();

        p.run_days(1, &mut rec).unwrap();
        assert_eq!(rec.surveys.len(), 2);
        assert!(rec.surveys.iter().all(|s| s.method == MethodId(0)));
        assert!(p.sites[SiteId(0)].currently_flagged);
        assert!(!p.sites[SiteId(1)].currently_flagged);
        assert_eq!(p.methods[1].schedule().get_due_sites(), vec![SiteId(0)]);

        p.run_days(1, &mut rec).unwrap();
        let follow_ups: Vec<_> = rec.surveys.iter().filter(|s| s.method == MethodId(1)).collect();
        assert_eq!(follow_ups.len(), 1);
        assert_eq!(follow_ups[0].site, SiteId(0));
        assert_eq!(follow_ups[0].date, d(2023, 1, 2));
        assert!(!p.sites[SiteId(0)].currently_flagged);
        assert_eq!(p.sites[SiteId(0)].tagging_surveys(), 1);
        assert_eq!(p.summary().flags, 1);
    }

    struct CountDays(u32);

    impl ProgramObserver for CountDays {
        fn on_day_end(&mut self, _day: Day, _date: NaiveDate, _summary: &DaySummary) {
            self.0 += 1;
        }
    }

    #[test]
    fn run_days_ignores_end_date() {
        let mut p = ProgramBuilder::new(config(d(2023, 1, 1), d(2023, 1, 2)), sites(1, &[(1, 60.0)]), vec![
            one_hour_truck(),
        ])
        .build()
        .unwrap();
        let mut obs = CountDays(0);
        p.run_days(5, &mut obs).unwrap();
        assert_eq!(obs.0, 5);
        assert_eq!(p.current_date(), d(2023, 1, 6));
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use std::fs;

    use super::*;

    const JSON: &str = r#"{
        "name": "screen_and_fix",
        "start_date": "2023-01-01",
        "end_date": "2023-01-31",
        "seed": 7,
        "replicates": 3,
        "sites_file": "sites.csv",
        "methods": [
            { "name": "plane", "survey_level": "site",
              "follow_up": { "target_method": "ogi", "threshold": 1.0 } },
            { "name": "ogi", "is_follow_up": true }
        ]
    }"#;

    #[test]
    fn parses_and_derives_seeds() {
        let cfg = ProgramConfig::from_json_str(JSON).unwrap();
        assert_eq!(cfg.sim.total_days(), 31);
        assert_eq!(cfg.sim.output_interval_days, 1);
        assert_eq!(cfg.method_names(), vec!["plane", "ogi"]);
        let seeds = cfg.seed_table();
        assert_eq!(seeds.len(), 3);
        assert_eq!(seeds.iter().collect::<Vec<_>>(), SeedTable::derive(7, 3).iter().collect::<Vec<_>>());
    }

    #[test]
    fn seed_count_must_match_replicates() {
        let json = JSON.replace("\"replicates\": 3,", "\"replicates\": 3, \"seeds\": [1, 2],");
        assert!(matches!(ProgramConfig::from_json_str(&json), Err(ProgramError::Config(_))));
    }

    #[test]
    fn bad_interaction_priority_is_fatal() {
        let json = JSON.replace("\"threshold\": 1.0", "\"threshold\": 1.0, \"interaction_priority\": \"both\"");
        assert!(matches!(ProgramConfig::from_json_str(&json), Err(ProgramError::Json(_))));
    }

    #[test]
    fn sites_file_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("program.json"), JSON).unwrap();
        fs::write(
            dir.path().join("sites.csv"),
            "site_id,lat,lon,plane_RS,plane_time,ogi_RS,ogi_time\n\
             a,52.0,-113.0,2,30,0,120\n\
             b,52.1,-113.1,2,30,0,120\n",
        )
        .unwrap();

        let cfg = ProgramConfig::from_json_file(dir.path().join("program.json")).unwrap();
        let reg = cfg.load_sites().unwrap();
        assert_eq!(reg.len(), 2);

        let mut p = ProgramBuilder::from_config(&cfg, reg).build().unwrap();
        let summary = p.run(&mut NoopObserver).unwrap();
        assert_eq!(summary.days, 31);
        assert!(summary.surveys >= 2);
    }
}

// ── Replicates ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod replicate_tests {
    use super::*;

    #[test]
    fn one_result_per_seed_in_order() {
        let seeds = SeedTable::derive(11, 4);
        let results = run_replicates(&seeds, Some(2), |_, seed| {
            let p = ProgramBuilder::new(config(d(2023, 1, 1), d(2023, 1, 5)), sites(3, &[(1, 60.0)]), vec![
                one_hour_truck(),
            ])
            .seed(seed)
            .build()?;
            Ok((p, Recorder::default()))
        })
        .unwrap();

        assert_eq!(results.len(), 4);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.index, i);
            assert_eq!(Some(r.seed), seeds.seed(i));
            assert_eq!(r.summary.surveys, 3);
            assert_eq!(r.observer.days.len(), 5);
        }
    }

    #[test]
    fn build_error_aborts_batch() {
        let seeds = SeedTable::derive(1, 2);
        let result = run_replicates(&seeds, None, |_, _| -> crate::ProgramResult<(crate::Program, NoopObserver)> {
            Err(ProgramError::Config("nope".into()))
        });
        assert!(result.is_err());
    }
}
