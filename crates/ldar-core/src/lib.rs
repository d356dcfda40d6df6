//! `ldar-core` — ids, dates, coordinates and randomness shared by every
//! `ldar-*` crate.
//!
//! Depends only on `chrono`, `rand` and `thiserror` (plus `serde` behind the
//! `serde` feature).
//!
//! | Module     | Provides                                             |
//! |------------|------------------------------------------------------|
//! | [`ids`]    | `SiteId`, `MethodId`, `CrewId`                       |
//! | [`geo`]    | `GeoPoint`, great-circle distance, weather grid cell |
//! | [`time`]   | `Day`, `SimClock`, `SimConfig`, `days_in_month`      |
//! | [`rng`]    | `SimRng` per replicate, `SeedTable`                  |
//! | [`error`]  | `LdarError`                                          |
//!
//! Enable `serde` to derive `Serialize`/`Deserialize` on the config and id
//! types.

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


pub use error::{LdarError, LdarResult};
pub use geo::GeoPoint;
pub use ids::{CrewId, MethodId, SiteId};
pub use rng::{SeedTable, SimRng};
pub use time::{Day, SimClock, SimConfig, days_in_month};

/// Re-exported so downstream crates share one date type and its accessors.
pub use chrono::{Datelike, NaiveDate};
