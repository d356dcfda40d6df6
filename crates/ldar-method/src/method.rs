//! `Method` — one configured detection method and the registry that builds
//! them.

use ldar_core::{MethodId, NaiveDate};
use ldar_schedule::{
    CrewCapacity, CrewDailyReport, FollowUpSchedule, GenericSchedule, Schedule, SiteSurveyReport, StationarySchedule,
};
use ldar_site::SiteRegistry;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::{
    CrewSpec, DeploymentType, DetectionLimitSensor, FollowUpTriage, MethodConfig, MethodError, MethodResult, Sensor,
    SurveyContext, SurveyExecutor, TimedSurveyExecutor, deploy_crews,
};

/// What one method did on one day.
#[derive(Clone, Debug, Default)]
pub struct MethodDay {
    pub completed: Vec<SiteSurveyReport>,
    pub crews:     Vec<CrewDailyReport>,
}

/// A method's schedule, survey executor, crews and optional follow-up
/// triage.
pub struct Method {
    id:       MethodId,
    config:   MethodConfig,
    schedule: Box<dyn Schedule>,
    executor: Box<dyn SurveyExecutor>,
    crews:    CrewSpec,
    triage:   Option<FollowUpTriage>,
}

impl Method {
    #[inline]
    pub fn id(&self) -> MethodId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &MethodConfig {
        &self.config
    }

    pub fn schedule(&self) -> &dyn Schedule {
        self.schedule.as_ref()
    }

    pub fn schedule_mut(&mut self) -> &mut dyn Schedule {
        self.schedule.as_mut()
    }

    pub fn crew_spec(&self) -> &CrewSpec {
        &self.crews
    }

    /// Replace the sensor built from the configuration.
    pub fn with_sensor(mut self, sensor: Box<dyn Sensor>) -> Self {
        self.executor = Box::new(executor_for(self.id, &self.config, sensor));
        self
    }

    /// Replace the survey executor entirely.
    pub fn with_executor(mut self, executor: Box<dyn SurveyExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn triage(&self) -> Option<&FollowUpTriage> {
        self.triage.as_ref()
    }

    /// Lend the triage out while the program borrows the target schedule.
    pub fn take_triage(&mut self) -> Option<FollowUpTriage> {
        self.triage.take()
    }

    pub fn restore_triage(&mut self, triage: FollowUpTriage) {
        self.triage = Some(triage);
    }

    /// Workplan, survey, update: the method's part of one simulated day.
    pub fn run_day(&mut self, sites: &mut SiteRegistry, ctx: &mut SurveyContext<'_>) -> MethodResult<MethodDay> {
        let mut workplan = self.schedule.get_workplan(ctx.date, sites);

        let crews = match self.config.deployment_type {
            DeploymentType::Mobile => deploy_crews(&mut workplan, &self.crews, self.executor.as_ref(), sites, ctx),
            DeploymentType::Stationary => {
                for slot in workplan.reports_mut() {
                    let Ok(site) = sites.get(slot.site) else {
                        continue;
                    };
                    let placeholder = SiteSurveyReport::new(slot.site, slot.method, slot.survey_level);
                    let report = std::mem::replace(slot, placeholder);
                    *slot = self.executor.survey_in_place(report, site, ctx);
                }
                Vec::new()
            }
        };

        let completed = self.schedule.update(workplan, sites)?;
        Ok(MethodDay { completed, crews })
    }
}

fn executor_for(id: MethodId, cfg: &MethodConfig, sensor: Box<dyn Sensor>) -> TimedSurveyExecutor {
    TimedSurveyExecutor::new(id, cfg.travel_time_min, cfg.travel_speed_kmh, cfg.consider_weather, sensor)
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Resolve every configuration into a `Method`.  `MethodId`s follow
/// configuration order and must match the per-method columns of `sites`.
pub fn build_methods(configs: &[MethodConfig], sites: &SiteRegistry, start_date: NaiveDate) -> MethodResult<Vec<Method>> {
    if configs.len() != sites.method_count() {
        return Err(MethodError::Config(format!(
            "{} methods configured but sites carry attributes for {}",
            configs.len(),
            sites.method_count()
        )));
    }

    let mut ids: FxHashMap<&str, MethodId> = FxHashMap::default();
    for (i, cfg) in configs.iter().enumerate() {
        cfg.validate()?;
        let id = u16::try_from(i)
            .map(MethodId)
            .map_err(|_| MethodError::Config(format!("too many methods ({})", configs.len())))?;
        if ids.insert(cfg.name.as_str(), id).is_some() {
            return Err(MethodError::Config(format!("duplicate method name {:?}", cfg.name)));
        }
    }

    configs
        .iter()
        .enumerate()
        .map(|(i, cfg)| build_method(MethodId(i as u16), cfg, configs, &ids, sites, start_date))
        .collect()
}

fn build_method(
    id:         MethodId,
    cfg:        &MethodConfig,
    all:        &[MethodConfig],
    ids:        &FxHashMap<&str, MethodId>,
    sites:      &SiteRegistry,
    start_date: NaiveDate,
) -> MethodResult<Method> {
    let window = cfg.window()?;
    let deployable: Vec<f64> = sites.iter().filter(|s| s.is_deployable(id)).map(|s| s.survey_time(id)).collect();
    if deployable.is_empty() {
        warn!(method = %cfg.name, "no deployable sites");
    }
    let mean_survey = if deployable.is_empty() { 0.0 } else { deployable.iter().sum::<f64>() / deployable.len() as f64 };
    let capacity = CrewCapacity::estimate(cfg.n_crews, cfg.max_work_minutes(), mean_survey, cfg.travel_time_min.mean());

    let schedule: Box<dyn Schedule> = if cfg.is_follow_up {
        Box::new(FollowUpSchedule::new(id, cfg.survey_level, capacity, window))
    } else if cfg.deployment_type == DeploymentType::Stationary {
        Box::new(StationarySchedule::new(id, cfg.survey_level, window, sites))
    } else {
        Box::new(GenericSchedule::new(id, cfg.survey_level, capacity, window, cfg.min_interval_days, sites, start_date))
    };

    let triage = match &cfg.follow_up {
        None => None,
        Some(fu) => {
            let &target = ids
                .get(fu.target_method.as_str())
                .ok_or_else(|| MethodError::UnknownMethod(fu.target_method.clone()))?;
            if !all[target.index()].is_follow_up {
                return Err(MethodError::NotFollowUp { method: cfg.name.clone(), target: fu.target_method.clone() });
            }
            if target == id {
                warn!(method = %cfg.name, "follow-up method triages its own detections");
            }
            Some(FollowUpTriage::new(id, target, fu.clone()))
        }
    };

    info!(
        method = %cfg.name,
        id = %id,
        kind = ?cfg.deployment_type,
        follow_up = cfg.is_follow_up,
        crews = cfg.n_crews,
        est_daily_surveys = capacity.est_daily_surveys,
        sites = deployable.len(),
        "method ready"
    );

    Ok(Method {
        id,
        config: cfg.clone(),
        schedule,
        executor: Box::new(executor_for(id, cfg, Box::new(DetectionLimitSensor::from(cfg.sensor)))),
        crews: CrewSpec {
            n_crews:           cfg.n_crews,
            max_work_min:      cfg.max_work_minutes(),
            consider_daylight: cfg.consider_daylight,
            cost:              cfg.cost,
        },
        triage,
    })
}
