//! Crew deployment: spend the day's crew-minutes on the workplan.
//!
//! # Allocation
//!
//! Crews sit in a max-heap keyed on minutes remaining (ties to the lower
//! crew id).  Each site in workplan order goes to the crew with the most
//! time left.  A crew that reports its last site of the day, or runs out of
//! minutes, does not return to the heap.  When the heap is empty the rest of
//! the workplan is left untouched: those reports go back to the schedule as
//! not started, or still in progress if they were already partly surveyed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ldar_core::{CrewId, MethodId};
use ldar_schedule::{CrewDailyReport, SiteSurveyReport, Workplan};
use ldar_site::SiteRegistry;
use tracing::debug;

use crate::{CostModel, CrewState, SurveyContext, SurveyExecutor};

/// Crew count, day length and pricing of one mobile method.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CrewSpec {
    pub n_crews:           u32,
    pub max_work_min:      f64,
    pub consider_daylight: bool,
    pub cost:              CostModel,
}

/// Heap entry: most minutes first, then lowest crew index.
#[derive(Copy, Clone, Debug)]
struct ByRemaining {
    remaining: f64,
    crew:      usize,
}

impl PartialEq for ByRemaining {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ByRemaining {}

impl PartialOrd for ByRemaining {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByRemaining {
    fn cmp(&self, other: &Self) -> Ordering {
        self.remaining
            .total_cmp(&other.remaining)
            .then_with(|| other.crew.cmp(&self.crew))
    }
}

/// Working minutes per crew today.
fn day_minutes(spec: &CrewSpec, workplan: &Workplan, sites: &SiteRegistry, ctx: &SurveyContext<'_>) -> f64 {
    if !spec.consider_daylight {
        return spec.max_work_min;
    }
    let first = workplan.reports().first().and_then(|r| sites.get(r.site).ok());
    match first {
        Some(site) => {
            let light = ctx.daylight.daylight_hours(site.location, ctx.date) * 60.0;
            spec.max_work_min.min(light.max(0.0))
        }
        None => spec.max_work_min,
    }
}

/// Survey `workplan` in place with `spec.n_crews` crews.
///
/// Returns one `CrewDailyReport` per crew that left the base.
pub fn deploy_crews(
    workplan: &mut Workplan,
    spec:     &CrewSpec,
    executor: &dyn SurveyExecutor,
    sites:    &SiteRegistry,
    ctx:      &mut SurveyContext<'_>,
) -> Vec<CrewDailyReport> {
    if workplan.is_empty() || spec.n_crews == 0 {
        return Vec::new();
    }
    let method: MethodId = workplan.method();
    let minutes = day_minutes(spec, workplan, sites, ctx);

    let n_crews = u16::try_from(spec.n_crews).unwrap_or(u16::MAX);
    let mut crews: Vec<CrewState> = (0..n_crews).map(|i| CrewState::new(CrewId(i), minutes)).collect();
    let mut daily: Vec<CrewDailyReport> = crews.iter().map(|c| CrewDailyReport::new(c.id, method, ctx.date)).collect();
    let mut heap: BinaryHeap<ByRemaining> = crews
        .iter()
        .enumerate()
        .filter(|(_, c)| c.remaining_min > 0.0)
        .map(|(i, c)| ByRemaining { remaining: c.remaining_min, crew: i })
        .collect();

    for slot in workplan.reports_mut() {
        let Ok(site) = sites.get(slot.site) else {
            continue;
        };
        let Some(ByRemaining { crew: i, .. }) = heap.pop() else {
            break;
        };

        slot.dispatched = true;
        let placeholder = SiteSurveyReport::new(slot.site, slot.method, slot.survey_level);
        let report = std::mem::replace(slot, placeholder);
        let outcome = executor.survey_site(&mut crews[i], report, site, ctx);
        *slot = outcome.report;

        let day = &mut daily[i];
        if outcome.site_visited {
            day.sites_visited += 1;
            day.travel_time_min += outcome.travel_time;
            day.survey_time_min += slot.time_surveyed_current_day_min;
            if slot.survey_complete {
                day.cost += spec.cost.per_site;
            }
        }

        let crew = &crews[i];
        if crew.remaining_min > 0.0 && !outcome.last_site_of_day {
            heap.push(ByRemaining { remaining: crew.remaining_min, crew: i });
        }
    }

    daily.retain(CrewDailyReport::deployed);
    for day in &mut daily {
        day.cost += spec.cost.per_day;
    }

    debug!(
        %method,
        date = %ctx.date,
        crews = daily.len(),
        surveyed = workplan.reports().iter().filter(|r| r.survey_complete).count(),
        "crews deployed"
    );
    daily
}
