//! `ldar-sim` — daily program loop for the LDAR scheduling engine.
//!
//! # Daily loop
//!
//! ```text
//! for date in start_date..=end_date:
//!   ① Year roll  — reset annual quotas on the first day and every Jan 1.
//!   ② Reset      — clear attempted_today on every site.
//!   ③ Methods    — in configuration order:
//!                    Schedule::get_workplan → deploy crews → Schedule::update
//!   ④ Triage     — screening detections → follow-up method queues.
//!   ⑤ Advance    — time_since_last_survey += 1 on every site.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs replicates on Rayon's thread pool.                |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ldar_sim::{NoopObserver, ProgramBuilder, ProgramConfig};
//!
//! let config = ProgramConfig::from_json_file("program.json")?;
//! let sites = config.load_sites()?;
//! let mut program = ProgramBuilder::from_config(&config, sites).build()?;
//! let summary = program.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod program;
pub mod replicate;

#[cfg(test)]
mod tests;

pub use builder::ProgramBuilder;
pub use config::ProgramConfig;
pub use error::{ProgramError, ProgramResult};
pub use observer::{NoopObserver, ProgramObserver};
pub use program::{DaySummary, Program, ProgramSummary};
pub use replicate::{Replicate, run_replicates};
