//! Weather, daylight and emission lookups.
//!
//! These are the simulation's external collaborators.  The scheduling
//! engine only asks yes/no and how-much questions of them; models that
//! produce the answers live outside this workspace.

use std::collections::BTreeSet;

use ldar_core::{Datelike, GeoPoint, MethodId, NaiveDate, SiteId};
use rustc_hash::{FxHashMap, FxHashSet};

/// Can `method` deploy at `location` on `date`?
pub trait WeatherLookup: Send + Sync {
    fn deployable(&self, method: MethodId, location: GeoPoint, date: NaiveDate) -> bool;
}

/// Hours of daylight at `location` on `date`.
pub trait DaylightLookup: Send + Sync {
    fn daylight_hours(&self, location: GeoPoint, date: NaiveDate) -> f64;
}

/// True emission rate at a site on a date.
pub trait EmissionLookup: Send + Sync {
    fn site_rate(&self, site: SiteId, date: NaiveDate) -> f64;
}

// ── Simple implementations ────────────────────────────────────────────────────

/// Fair weather, 24 hours of light and no emissions anywhere.
#[derive(Copy, Clone, Debug, Default)]
pub struct AlwaysDeployable;

impl WeatherLookup for AlwaysDeployable {
    fn deployable(&self, _method: MethodId, _location: GeoPoint, _date: NaiveDate) -> bool {
        true
    }
}

impl DaylightLookup for AlwaysDeployable {
    fn daylight_hours(&self, _location: GeoPoint, _date: NaiveDate) -> f64 {
        24.0
    }
}

impl EmissionLookup for AlwaysDeployable {
    fn site_rate(&self, _site: SiteId, _date: NaiveDate) -> f64 {
        0.0
    }
}

/// Blocked days per method, optionally restricted to one grid cell.
///
/// Anything not blocked is deployable.
#[derive(Clone, Debug, Default)]
pub struct WeatherTable {
    everywhere: FxHashMap<MethodId, BTreeSet<NaiveDate>>,
    cells:      FxHashSet<(MethodId, (i32, i32), NaiveDate)>,
}

impl WeatherTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block `method` everywhere on `date`.
    pub fn block(&mut self, method: MethodId, date: NaiveDate) -> &mut Self {
        self.everywhere.entry(method).or_default().insert(date);
        self
    }

    /// Block `method` in the 1° cell containing `location` on `date`.
    pub fn block_at(&mut self, method: MethodId, location: GeoPoint, date: NaiveDate) -> &mut Self {
        self.cells.insert((method, location.grid_cell(), date));
        self
    }
}

impl WeatherLookup for WeatherTable {
    fn deployable(&self, method: MethodId, location: GeoPoint, date: NaiveDate) -> bool {
        let blocked_everywhere = self.everywhere.get(&method).is_some_and(|days| days.contains(&date));
        !blocked_everywhere && !self.cells.contains(&(method, location.grid_cell(), date))
    }
}

/// Daylight from latitude and day of year (CBM model, sunrise to sunset).
#[derive(Copy, Clone, Debug, Default)]
pub struct AstronomicalDaylight;

impl DaylightLookup for AstronomicalDaylight {
    fn daylight_hours(&self, location: GeoPoint, date: NaiveDate) -> f64 {
        let lat = (location.lat as f64).to_radians();
        let day = date.ordinal() as f64;
        let theta = 0.2163108 + 2.0 * (0.9671396 * (0.00860 * (day - 186.0)).tan()).atan();
        let phi = (0.39795 * theta.cos()).asin();
        let p = 0.8333_f64.to_radians();
        let x = (p.sin() + lat.sin() * phi.sin()) / (lat.cos() * phi.cos());
        24.0 - 24.0 / std::f64::consts::PI * x.clamp(-1.0, 1.0).acos()
    }
}

/// Constant per-site rates.  Sites not listed do not emit.
#[derive(Clone, Debug, Default)]
pub struct StaticEmissions {
    rates: FxHashMap<SiteId, f64>,
}

impl StaticEmissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, site: SiteId, rate: f64) -> Self {
        self.rates.insert(site, rate);
        self
    }

    pub fn set_rate(&mut self, site: SiteId, rate: f64) {
        self.rates.insert(site, rate);
    }
}

impl EmissionLookup for StaticEmissions {
    fn site_rate(&self, site: SiteId, _date: NaiveDate) -> f64 {
        self.rates.get(&site).copied().unwrap_or(0.0)
    }
}
