//! Fluent builder for constructing a [`Program`].

use ldar_core::{SimConfig, SimRng};
use ldar_method::{AlwaysDeployable, DaylightLookup, EmissionLookup, MethodConfig, WeatherLookup, build_methods};
use ldar_site::SiteRegistry;

use crate::{Program, ProgramConfig, ProgramError, ProgramResult, ProgramSummary};

/// Fluent builder for [`Program`].
///
/// # Required inputs
///
/// - [`SimConfig`]: date range, seed
/// - [`SiteRegistry`]: one attribute column group per method
/// - `Vec<MethodConfig>`: method mix, in `MethodId` order
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                          |
/// |--------------------|----------------------------------|
/// | `.weather(w)`      | `AlwaysDeployable` (fair)        |
/// | `.daylight(d)`     | `AlwaysDeployable` (24 h)        |
/// | `.emissions(e)`    | `AlwaysDeployable` (no leaks)    |
/// | `.seed(s)`         | `config.seed`                    |
///
/// # Example
///
/// ```rust,ignore
/// let mut program = ProgramBuilder::new(config, sites, methods)
///     .weather(Box::new(weather))
///     .emissions(Box::new(emissions))
///     .build()?;
/// program.run(&mut NoopObserver)?;
/// ```
pub struct ProgramBuilder {
    config:    SimConfig,
    sites:     SiteRegistry,
    methods:   Vec<MethodConfig>,
    weather:   Option<Box<dyn WeatherLookup>>,
    daylight:  Option<Box<dyn DaylightLookup>>,
    emissions: Option<Box<dyn EmissionLookup>>,
    seed:      Option<u64>,
}

impl ProgramBuilder {
    pub fn new(config: SimConfig, sites: SiteRegistry, methods: Vec<MethodConfig>) -> Self {
        Self {
            config,
            sites,
            methods,
            weather:   None,
            daylight:  None,
            emissions: None,
            seed:      None,
        }
    }

    /// Start from a loaded program configuration.
    pub fn from_config(config: &ProgramConfig, sites: SiteRegistry) -> Self {
        Self::new(config.sim.clone(), sites, config.methods.clone())
    }

    pub fn weather(mut self, weather: Box<dyn WeatherLookup>) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn daylight(mut self, daylight: Box<dyn DaylightLookup>) -> Self {
        self.daylight = Some(daylight);
        self
    }

    pub fn emissions(mut self, emissions: Box<dyn EmissionLookup>) -> Self {
        self.emissions = Some(emissions);
        self
    }

    /// Replicate seed.  Overrides `config.seed`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate inputs, build every method, and return a ready-to-run
    /// [`Program`].
    pub fn build(self) -> ProgramResult<Program> {
        self.config.validate()?;
        if self.sites.is_empty() {
            return Err(ProgramError::Config("program has no sites".into()));
        }

        let methods = build_methods(&self.methods, &self.sites, self.config.start_date)?;
        let seed = self.seed.unwrap_or(self.config.seed);

        Ok(Program {
            clock:     self.config.make_clock(),
            config:    self.config,
            sites:     self.sites,
            methods,
            rng:       SimRng::new(seed),
            weather:   self.weather.unwrap_or_else(|| Box::new(AlwaysDeployable)),
            daylight:  self.daylight.unwrap_or_else(|| Box::new(AlwaysDeployable)),
            emissions: self.emissions.unwrap_or_else(|| Box::new(AlwaysDeployable)),
            summary:   ProgramSummary::default(),
        })
    }
}
