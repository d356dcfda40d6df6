//! `ldar-site` — inspection targets and their scheduling state.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`site`]      | `Site`, `SiteMethodParams`, `SiteMethodState`              |
//! | [`registry`]  | `SiteRegistry`, `SiteRegistryBuilder`                      |
//! | [`loader`]    | `load_sites_csv`, `load_sites_reader`                      |
//! | [`error`]     | `SiteError`, `SiteResult<T>`                               |
//!
//! Sites live for the whole run.  Per-method state (time since last survey,
//! surveys done this year, attempted-today) is indexed by `MethodId`, so every
//! site carries exactly one entry per configured method.

pub mod error;
pub mod loader;
pub mod registry;
pub mod site;

#[cfg(test)]
mod tests;

pub use error::{SiteError, SiteResult};
pub use loader::{load_sites_csv, load_sites_reader};
pub use registry::{SiteRegistry, SiteRegistryBuilder};
pub use site::{Site, SiteMethodParams, SiteMethodState};
