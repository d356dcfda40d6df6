//! Survey execution: what happens when a crew arrives at a site.

use ldar_core::{CrewId, GeoPoint, MethodId, NaiveDate, SimRng};
use ldar_schedule::SiteSurveyReport;
use ldar_site::Site;

use crate::{DaylightLookup, EmissionLookup, Sensor, TravelRange, WeatherLookup};

/// Collaborators and randomness for one method's day.
pub struct SurveyContext<'a> {
    pub date:      NaiveDate,
    pub weather:   &'a dyn WeatherLookup,
    pub daylight:  &'a dyn DaylightLookup,
    pub emissions: &'a dyn EmissionLookup,
    pub rng:       &'a mut SimRng,
}

/// A crew's position in its working day.
#[derive(Clone, Debug)]
pub struct CrewState {
    pub id:            CrewId,
    pub remaining_min: f64,
    /// Where the crew finished its last visit today.  `None` at day start.
    pub location:      Option<GeoPoint>,
}

impl CrewState {
    pub fn new(id: CrewId, remaining_min: f64) -> Self {
        Self { id, remaining_min: remaining_min.max(0.0), location: None }
    }
}

/// Result of one site attempt.
#[derive(Clone, Debug)]
pub struct SurveyOutcome {
    pub report:           SiteSurveyReport,
    pub travel_time:      f64,
    /// The crew has no time left for another site today.
    pub last_site_of_day: bool,
    /// The crew reached the site.
    pub site_visited:     bool,
}

/// Performs one survey attempt for a crew.
pub trait SurveyExecutor: Send + Sync {
    fn survey_site(
        &self,
        crew:   &mut CrewState,
        report: SiteSurveyReport,
        site:   &Site,
        ctx:    &mut SurveyContext<'_>,
    ) -> SurveyOutcome;

    /// Record a survey that needs no crew (fixed sensors).
    fn survey_in_place(&self, report: SiteSurveyReport, site: &Site, ctx: &mut SurveyContext<'_>) -> SiteSurveyReport;
}

// ── TimedSurveyExecutor ───────────────────────────────────────────────────────

/// Travel, then survey until the site's required minutes are spent or the
/// crew's day ends.
pub struct TimedSurveyExecutor {
    method:           MethodId,
    travel:           TravelRange,
    travel_speed_kmh: Option<f64>,
    consider_weather: bool,
    sensor:           Box<dyn Sensor>,
}

impl TimedSurveyExecutor {
    pub fn new(
        method:           MethodId,
        travel:           TravelRange,
        travel_speed_kmh: Option<f64>,
        consider_weather: bool,
        sensor:           Box<dyn Sensor>,
    ) -> Self {
        Self { method, travel, travel_speed_kmh, consider_weather, sensor }
    }

    /// Minutes from the crew's position to `to`.
    fn travel_minutes(&self, from: Option<GeoPoint>, to: GeoPoint, rng: &mut SimRng) -> f64 {
        if let (Some(speed), Some(from)) = (self.travel_speed_kmh, from) {
            return from.distance_km(to) / speed * 60.0;
        }
        if self.travel.max > self.travel.min {
            rng.gen_range(self.travel.min..=self.travel.max)
        } else {
            self.travel.min
        }
    }

    fn complete(&self, report: &mut SiteSurveyReport, site: &Site, ctx: &mut SurveyContext<'_>) {
        let true_rate = ctx.emissions.site_rate(site.id(), ctx.date);
        report.measured_rate = Some(self.sensor.measure(true_rate, ctx.rng));
        report.survey_complete = true;
        report.survey_in_progress = false;
        report.survey_complete_date = Some(ctx.date);
    }
}

impl SurveyExecutor for TimedSurveyExecutor {
    fn survey_site(
        &self,
        crew:       &mut CrewState,
        mut report: SiteSurveyReport,
        site:       &Site,
        ctx:        &mut SurveyContext<'_>,
    ) -> SurveyOutcome {
        if self.consider_weather && !ctx.weather.deployable(self.method, site.location, ctx.date) {
            return SurveyOutcome { report, travel_time: 0.0, last_site_of_day: false, site_visited: false };
        }

        let travel = self.travel_minutes(crew.location, site.location, ctx.rng);
        if travel >= crew.remaining_min {
            // Not enough day left to get there.
            crew.remaining_min = 0.0;
            return SurveyOutcome { report, travel_time: 0.0, last_site_of_day: true, site_visited: false };
        }
        let on_site = crew.remaining_min - travel;
        let needed = (site.survey_time(self.method) - report.time_surveyed_min).max(0.0);

        let (worked, finished) = if needed <= on_site { (needed, true) } else { (on_site, false) };

        report.survey_started = true;
        report.survey_start_date.get_or_insert(ctx.date);
        report.crew = Some(crew.id);
        report.travel_time_min += travel;
        report.time_surveyed_min += worked;
        report.time_surveyed_current_day_min += worked;
        if finished {
            self.complete(&mut report, site, ctx);
        } else {
            report.survey_in_progress = true;
        }

        crew.remaining_min = (crew.remaining_min - travel - worked).max(0.0);
        crew.location = Some(site.location);

        SurveyOutcome {
            report,
            travel_time: travel,
            last_site_of_day: !finished || crew.remaining_min <= 0.0,
            site_visited: true,
        }
    }

    fn survey_in_place(&self, mut report: SiteSurveyReport, site: &Site, ctx: &mut SurveyContext<'_>) -> SiteSurveyReport {
        report.survey_started = true;
        report.survey_start_date.get_or_insert(ctx.date);
        self.complete(&mut report, site, ctx);
        report
    }
}
