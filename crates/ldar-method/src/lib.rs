//! `ldar-method` — detection methods: configuration, crews, and triage.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                          |
//! |-----------------|-------------------------------------------------------------------|
//! | [`config`]      | `MethodConfig`, `FollowUpConfig`, `InteractionPriority`, `CostModel` |
//! | [`environment`] | `WeatherLookup`, `DaylightLookup`, `EmissionLookup` and simple impls |
//! | [`sensor`]      | `Sensor` trait, `DetectionLimitSensor`                            |
//! | [`executor`]    | `SurveyExecutor` trait, `TimedSurveyExecutor`, `SurveyContext`    |
//! | [`crew`]        | `deploy_crews` (crew-minute allocation over a workplan)           |
//! | [`triage`]      | `FollowUpTriage` (threshold/proportion batch release)             |
//! | [`method`]      | `Method`, `build_methods` (static method registry)                |
//! | [`error`]       | `MethodError`, `MethodResult<T>`                                  |
//!
//! # Extension points
//!
//! Weather, daylight, emissions and sensors are traits.  The engine never
//! models them; it asks.  `SurveyExecutor` can be swapped per method when a
//! survey is more than travel plus on-site minutes.

pub mod config;
pub mod crew;
pub mod environment;
pub mod error;
pub mod executor;
pub mod method;
pub mod sensor;
pub mod triage;


pub use config::{
    CostModel, DeploymentType, FollowUpConfig, InteractionPriority, MethodConfig, SensorConfig, TravelRange,
    TriageScope,
};
pub use crew::{CrewSpec, deploy_crews};
pub use environment::{
    AlwaysDeployable, AstronomicalDaylight, DaylightLookup, EmissionLookup, StaticEmissions, WeatherLookup, WeatherTable,
};
pub use error::{MethodError, MethodResult};
pub use executor::{CrewState, SurveyContext, SurveyExecutor, SurveyOutcome, TimedSurveyExecutor};
pub use method::{Method, MethodDay, build_methods};
pub use sensor::{DetectionLimitSensor, Sensor};
pub use triage::{FollowUpTriage, TriageCounters};
