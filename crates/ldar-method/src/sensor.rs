//! Sensors turn a true emission rate into a measured one.

use ldar_core::SimRng;

use crate::SensorConfig;

/// Measurement model of one method.
pub trait Sensor: Send + Sync {
    /// Measured rate for a site whose true rate is `true_rate`.  `0.0` means
    /// nothing was detected.
    fn measure(&self, true_rate: f64, rng: &mut SimRng) -> f64;
}

/// Detects anything at or above the minimum detection limit and reports it
/// with a uniform relative quantification error.
#[derive(Copy, Clone, Debug, Default)]
pub struct DetectionLimitSensor {
    mdl:   f64,
    error: f64,
}

impl DetectionLimitSensor {
    pub fn new(mdl: f64, quantification_error: f64) -> Self {
        Self { mdl: mdl.max(0.0), error: quantification_error.abs() }
    }
}

impl From<SensorConfig> for DetectionLimitSensor {
    fn from(cfg: SensorConfig) -> Self {
        Self::new(cfg.mdl, cfg.quantification_error)
    }
}

impl Sensor for DetectionLimitSensor {
    fn measure(&self, true_rate: f64, rng: &mut SimRng) -> f64 {
        if true_rate <= 0.0 || true_rate < self.mdl {
            return 0.0;
        }
        if self.error == 0.0 {
            return true_rate;
        }
        let factor = 1.0 + rng.gen_range(-self.error..=self.error);
        (true_rate * factor).max(0.0)
    }
}
