//! Unit tests for ldar-site.

use ldar_core::{GeoPoint, MethodId, NaiveDate};

use crate::{SiteMethodParams, SiteRegistry, SiteRegistryBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn params(rs: u32, minutes: f64) -> SiteMethodParams {
    SiteMethodParams { surveys_per_year: rs, survey_time_min: minutes, deployable: true }
}

fn two_method_registry() -> SiteRegistry {
    SiteRegistryBuilder::new(2)
        .site("a", GeoPoint::new(50.0, -110.0), vec![params(2, 60.0), params(0, 120.0)])
        .site("b", GeoPoint::new(51.0, -111.0), vec![params(4, 30.0), params(0, 90.0)])
        .build()
        .unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[cfg(test)]
mod registry {
    use super::*;
    use ldar_core::SiteId;

    use crate::SiteError;

    #[test]
    fn ids_follow_insertion_order() {
        let reg = two_method_registry();
        let ids: Vec<_> = reg.site_ids().collect();
        assert_eq!(ids, vec![SiteId(0), SiteId(1)]);
        assert_eq!(reg[SiteId(1)].name, "b");
        assert_eq!(reg.find_by_name("a"), Some(SiteId(0)));
    }

    #[test]
    fn unknown_site_is_error() {
        let reg = two_method_registry();
        assert!(matches!(reg.get(SiteId(9)), Err(SiteError::UnknownSite(SiteId(9)))));
    }

    #[test]
    fn method_count_mismatch_rejected() {
        let err = SiteRegistryBuilder::new(2)
            .site("x", GeoPoint::default(), vec![params(1, 10.0)])
            .build()
            .unwrap_err();
        assert!(matches!(err, SiteError::MethodCountMismatch { expected: 2, got: 1, .. }));
    }
}

#[cfg(test)]
mod site_state {
    use super::*;
    use ldar_core::SiteId;

    #[test]
    fn attributes_by_method() {
        let reg = two_method_registry();
        let site = &reg[SiteId(1)];
        assert_eq!(site.required_surveys(MethodId(0)), 4);
        assert_eq!(site.survey_time(MethodId(1)), 90.0);
        assert!(site.is_deployable(MethodId(0)));
        assert!(!site.is_deployable(MethodId(7)), "unknown method is never deployable");
    }

    #[test]
    fn survey_resets_counter_and_counts_quota() {
        let mut reg = two_method_registry();
        let site = &mut reg[SiteId(0)];
        for _ in 0..5 {
            site.advance_day();
        }
        assert_eq!(site.time_since_last_survey(MethodId(0)), 5);
        site.record_survey(MethodId(0), d(2023, 3, 1));
        assert_eq!(site.time_since_last_survey(MethodId(0)), 0);
        assert_eq!(site.time_since_last_survey(MethodId(1)), 5, "other methods unaffected");
        assert_eq!(site.state(MethodId(0)).unwrap().surveys_done_this_year, 1);
        site.reset_annual();
        assert_eq!(site.state(MethodId(0)).unwrap().surveys_done_this_year, 0);
    }

    #[test]
    fn double_flag_is_refused() {
        let mut reg = two_method_registry();
        let site = &mut reg[SiteId(0)];
        assert!(site.flag(d(2023, 5, 1), MethodId(0)));
        assert!(!site.flag(d(2023, 5, 2), MethodId(1)));
        assert_eq!(site.date_flagged, Some(d(2023, 5, 1)));
        assert_eq!(site.flagged_by, Some(MethodId(0)));
    }

    #[test]
    fn tagging_clears_flag_and_never_rewinds() {
        let mut reg = two_method_registry();
        let site = &mut reg[SiteId(0)];
        site.flag(d(2023, 5, 1), MethodId(0));
        site.tag_emissions_at_component(d(2023, 5, 10), MethodId(1));
        assert!(!site.currently_flagged);
        assert_eq!(site.latest_tagging_survey_date(), Some(d(2023, 5, 10)));
        site.set_latest_tagging_survey_date(d(2023, 4, 1));
        assert_eq!(site.latest_tagging_survey_date(), Some(d(2023, 5, 10)));
        assert_eq!(site.tagging_surveys(), 1);
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use ldar_core::SiteId;

    use super::*;
    use crate::{SiteError, load_sites_reader};

    const CSV: &str = "\
site_id,lat,lon,aircraft_RS,aircraft_time,ogi_time,ogi_deploy\n\
pad-001,53.51,-113.49,2,1,120,1\n\
pad-002,53.62,-113.31,3,1.5,95,false\n\
";

    #[test]
    fn parses_per_method_columns() {
        let reg = load_sites_reader(Cursor::new(CSV), &["aircraft", "ogi"]).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.method_count(), 2);

        let b = &reg[SiteId(1)];
        assert_eq!(b.name, "pad-002");
        assert_eq!(b.required_surveys(MethodId(0)), 3);
        assert_eq!(b.survey_time(MethodId(0)), 1.5);
        assert_eq!(b.required_surveys(MethodId(1)), 0, "missing column → default");
        assert!(!b.is_deployable(MethodId(1)));
        assert!((b.location.lat - 53.62).abs() < 1e-4);
    }

    #[test]
    fn invalid_number_reports_line() {
        let bad = "site_id,lat,lon,m_RS\nx,1.0,2.0,lots\n";
        let err = load_sites_reader(Cursor::new(bad), &["m"]).unwrap_err();
        match err {
            SiteError::Parse(msg) => assert!(msg.contains("line 2"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_lat_rejected() {
        let bad = "site_id,lon\nx,2.0\n";
        assert!(load_sites_reader(Cursor::new(bad), &[]).is_err());
    }
}
