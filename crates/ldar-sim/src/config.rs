//! Program configuration loaded from JSON.
//!
//! ```json
//! {
//!   "name": "aircraft_plus_ogi",
//!   "start_date": "2023-01-01",
//!   "end_date": "2024-12-31",
//!   "seed": 42,
//!   "replicates": 10,
//!   "sites_file": "sites.csv",
//!   "methods": [ { "name": "aircraft", ... }, { "name": "ogi_fu", "is_follow_up": true } ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use ldar_core::{SeedTable, SimConfig};
use ldar_method::MethodConfig;
use ldar_site::{SiteRegistry, load_sites_csv};
use serde::{Deserialize, Serialize};

use crate::{ProgramError, ProgramResult};

/// One LDAR program: a method mix over a date range, run for some number of
/// replicates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramConfig {
    pub name: String,

    #[serde(flatten)]
    pub sim: SimConfig,

    pub methods: Vec<MethodConfig>,

    #[serde(default = "default_replicates")]
    pub replicates: usize,

    /// Explicit per-replicate seeds.  Derived from `seed` when absent.
    #[serde(default)]
    pub seeds: Option<Vec<u64>>,

    /// Site CSV, relative to the configuration file.
    #[serde(default)]
    pub sites_file: Option<PathBuf>,
}

fn default_replicates() -> usize {
    1
}

impl ProgramConfig {
    pub fn from_json_str(json: &str) -> ProgramResult<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a configuration file.  A relative `sites_file` is
    /// resolved against the file's directory.
    pub fn from_json_file(path: impl AsRef<Path>) -> ProgramResult<Self> {
        let path = path.as_ref();
        let mut cfg = Self::from_json_str(&fs::read_to_string(path)?)?;
        if let (Some(sites), Some(dir)) = (cfg.sites_file.as_mut(), path.parent()) {
            if sites.is_relative() {
                *sites = dir.join(&*sites);
            }
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> ProgramResult<()> {
        self.sim.validate()?;
        if self.methods.is_empty() {
            return Err(ProgramError::Config("program has no methods".into()));
        }
        if self.replicates == 0 {
            return Err(ProgramError::Config("replicates must be at least 1".into()));
        }
        if let Some(seeds) = &self.seeds {
            if seeds.len() != self.replicates {
                return Err(ProgramError::Config(format!(
                    "{} seeds given for {} replicates",
                    seeds.len(),
                    self.replicates
                )));
            }
        }
        for m in &self.methods {
            m.validate()?;
        }
        Ok(())
    }

    pub fn method_names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }

    /// Seeds for every replicate.
    pub fn seed_table(&self) -> SeedTable {
        match &self.seeds {
            Some(seeds) => SeedTable::from_seeds(seeds.clone()),
            None => SeedTable::derive(self.sim.seed, self.replicates),
        }
    }

    /// Load `sites_file` with one column group per configured method.
    pub fn load_sites(&self) -> ProgramResult<SiteRegistry> {
        let path = self
            .sites_file
            .as_ref()
            .ok_or_else(|| ProgramError::Config("no sites_file configured".into()))?;
        Ok(load_sites_csv(path, &self.method_names())?)
    }
}
