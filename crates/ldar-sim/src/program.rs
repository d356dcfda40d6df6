//! The `Program` struct and its daily loop.

use ldar_core::{Day, NaiveDate, SimClock, SimConfig, SimRng};
use ldar_method::{DaylightLookup, EmissionLookup, Method, SurveyContext, WeatherLookup};
use ldar_schedule::MinimalSurveyReport;
use ldar_site::SiteRegistry;
use tracing::{debug, info};

use crate::{ProgramError, ProgramObserver, ProgramResult};

/// Totals for one simulated day.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DaySummary {
    /// Completed surveys, all methods.
    pub surveys:   usize,
    /// Crews that deployed, all methods.
    pub crew_days: usize,
    /// Survey cost incurred today.
    pub cost:      f64,
    /// Sites newly flagged for follow-up today.
    pub flags:     u64,
}

/// Totals for a whole run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgramSummary {
    pub days:      u32,
    pub surveys:   u64,
    pub crew_days: u64,
    pub cost:      f64,
    pub flags:     u64,
}

impl ProgramSummary {
    fn absorb(&mut self, day: &DaySummary) {
        self.days += 1;
        self.surveys += day.surveys as u64;
        self.crew_days += day.crew_days as u64;
        self.cost += day.cost;
        self.flags += day.flags;
    }
}

/// One replicate of one LDAR program.
///
/// Steps one calendar day at a time:
///
/// 1. **Year roll**: on the first day and every Jan 1, reset annual quotas.
/// 2. **Daily reset**: clear every site's `attempted_today`.
/// 3. **Methods** (configuration order): workplan → crews → schedule update.
///    Completed surveys and crew days go to the observer.
/// 4. **Triage**: each screening method's detections feed its follow-up
///    method's queue.  Follow-ups therefore start the next day at the
///    earliest.
/// 5. **Advance**: every site is one day further from its last survey.
///
/// Create via [`ProgramBuilder`][crate::ProgramBuilder].
pub struct Program {
    /// Date range and master seed.
    pub config: SimConfig,

    /// Current day and date.
    pub clock: SimClock,

    /// Every site and its scheduling state.
    pub sites: SiteRegistry,

    /// Methods in `MethodId` order.
    pub methods: Vec<Method>,

    /// Replicate RNG: travel times, sensor noise.
    pub rng: SimRng,

    pub weather:   Box<dyn WeatherLookup>,
    pub daylight:  Box<dyn DaylightLookup>,
    pub emissions: Box<dyn EmissionLookup>,

    pub(crate) summary: ProgramSummary,
}

impl Program {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current day through `config.end_date`.
    pub fn run<O: ProgramObserver>(&mut self, observer: &mut O) -> ProgramResult<ProgramSummary> {
        info!(
            start = %self.config.start_date,
            end = %self.config.end_date,
            sites = self.sites.len(),
            methods = self.methods.len(),
            "program start"
        );
        while self.clock.current_day < self.config.end_day() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_day.0);
        info!(
            days = self.summary.days,
            surveys = self.summary.surveys,
            flags = self.summary.flags,
            cost = self.summary.cost,
            "program end"
        );
        Ok(self.summary.clone())
    }

    /// Run exactly `n` days from the current position (ignores `end_date`).
    pub fn run_days<O: ProgramObserver>(&mut self, n: u32, observer: &mut O) -> ProgramResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Totals so far.
    pub fn summary(&self) -> &ProgramSummary {
        &self.summary
    }

    pub fn current_date(&self) -> NaiveDate {
        self.clock.current_date()
    }

    // ── Day processing ────────────────────────────────────────────────────

    fn step<O: ProgramObserver>(&mut self, observer: &mut O) -> ProgramResult<()> {
        let day = self.clock.current_day;
        let date = self.clock.current_date();

        observer.on_day_start(day, date);
        let summary = self.process_day(date, observer)?;
        self.summary.absorb(&summary);
        observer.on_day_end(day, date, &summary);

        let interval = self.config.output_interval_days;
        if interval > 0 && day.0 % interval == 0 {
            observer.on_snapshot(day, date, &self.sites);
        }
        self.clock.advance();
        Ok(())
    }

    fn process_day<O: ProgramObserver>(&mut self, date: NaiveDate, observer: &mut O) -> ProgramResult<DaySummary> {
        if self.clock.is_new_year() {
            self.sites.iter_mut().for_each(|s| s.reset_annual());
        }
        self.sites.iter_mut().for_each(|s| s.reset_daily());

        let mut summary = DaySummary::default();
        let mut detections: Vec<Vec<MinimalSurveyReport>> = Vec::with_capacity(self.methods.len());

        // ── Methods ───────────────────────────────────────────────────────
        for method in &mut self.methods {
            let mut ctx = SurveyContext {
                date,
                weather:   self.weather.as_ref(),
                daylight:  self.daylight.as_ref(),
                emissions: self.emissions.as_ref(),
                rng:       &mut self.rng,
            };
            let result = method.run_day(&mut self.sites, &mut ctx)?;

            let minimal: Vec<MinimalSurveyReport> = result.completed.iter().filter_map(|r| r.to_minimal()).collect();
            for report in &minimal {
                observer.on_survey(report);
            }
            for crew in &result.crews {
                summary.cost += crew.cost;
                observer.on_crew_day(crew);
            }
            summary.surveys += minimal.len();
            summary.crew_days += result.crews.len();
            detections.push(minimal);
        }

        // ── Triage ────────────────────────────────────────────────────────
        for (i, reports) in detections.iter().enumerate() {
            let Some(mut triage) = self.methods[i].take_triage() else {
                continue;
            };
            let target = triage.target_method();
            let before = triage.counters().flags;

            let outcome = match self.methods.get_mut(target.index()).and_then(|m| m.schedule_mut().as_follow_up_queue()) {
                Some(queue) => {
                    triage.process_detections(reports, date, &mut self.sites, queue);
                    Ok(())
                }
                None => Err(ProgramError::NoFollowUpQueue(target)),
            };
            summary.flags += triage.counters().flags - before;
            self.methods[i].restore_triage(triage);
            outcome?;
        }

        // ── End of day ────────────────────────────────────────────────────
        self.sites.iter_mut().for_each(|s| s.advance_day());

        debug!(%date, surveys = summary.surveys, crews = summary.crew_days, flags = summary.flags, "day done");
        Ok(summary)
    }

    /// The day the next `step` will simulate.
    pub fn current_day(&self) -> Day {
        self.clock.current_day
    }
}
