//! CSV site loader.
//!
//! # CSV format
//!
//! One row per site.  Three fixed columns, then up to three columns per
//! method, named after the method:
//!
//! ```csv
//! site_id,lat,lon,aircraft_RS,aircraft_time,ogi_RS,ogi_time,ogi_deploy
//! pad-001,53.51,-113.49,2,1,0,120,1
//! pad-002,53.62,-113.31,2,1,0,95,0
//! ```
//!
//! | Column           | Meaning                                  | Default |
//! |------------------|------------------------------------------|---------|
//! | `<method>_RS`    | required surveys per year                | `0`     |
//! | `<method>_time`  | on-site survey minutes                   | `0`     |
//! | `<method>_deploy`| `1`/`0` or `true`/`false`                | `1`     |
//!
//! Missing per-method columns take the defaults, so a follow-up method
//! (which has no annual quota) only needs its `_time` column.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use ldar_core::GeoPoint;

use crate::{SiteError, SiteMethodParams, SiteRegistry, SiteRegistryBuilder};

type SiteRecord = HashMap<String, String>;

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a `SiteRegistry` from a CSV file.
///
/// `method_names` lists the configured methods in `MethodId` order; it
/// determines which per-method columns are read.
pub fn load_sites_csv(path: &Path, method_names: &[&str]) -> Result<SiteRegistry, SiteError> {
    let file = std::fs::File::open(path).map_err(SiteError::Io)?;
    load_sites_reader(file, method_names)
}

/// Like [`load_sites_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedding site tables in
/// a binary.
pub fn load_sites_reader<R: Read>(reader: R, method_names: &[&str]) -> Result<SiteRegistry, SiteError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut builder = SiteRegistryBuilder::new(method_names.len());

    for (row_no, result) in csv_reader.deserialize::<SiteRecord>().enumerate() {
        let row = result.map_err(|e| SiteError::Parse(e.to_string()))?;
        let line = row_no + 2; // header is line 1

        let name = required(&row, "site_id", line)?.to_owned();
        let lat: f32 = parse_field(&row, "lat", line)?
            .ok_or_else(|| SiteError::Parse(format!("line {line}: missing lat")))?;
        let lon: f32 = parse_field(&row, "lon", line)?
            .ok_or_else(|| SiteError::Parse(format!("line {line}: missing lon")))?;

        let params = method_names
            .iter()
            .map(|m| method_params(&row, m, line))
            .collect::<Result<Vec<_>, _>>()?;

        builder = builder.site(name, GeoPoint::new(lat, lon), params);
    }

    builder.build()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn method_params(row: &SiteRecord, method: &str, line: usize) -> Result<SiteMethodParams, SiteError> {
    let defaults = SiteMethodParams::default();
    Ok(SiteMethodParams {
        surveys_per_year: parse_field(row, &format!("{method}_RS"), line)?
            .unwrap_or(defaults.surveys_per_year),
        survey_time_min:  parse_field(row, &format!("{method}_time"), line)?
            .unwrap_or(defaults.survey_time_min),
        deployable:       parse_flag(row, &format!("{method}_deploy"), line)?
            .unwrap_or(defaults.deployable),
    })
}

fn required<'a>(row: &'a SiteRecord, key: &str, line: usize) -> Result<&'a str, SiteError> {
    row.get(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SiteError::Parse(format!("line {line}: missing {key}")))
}

/// `Ok(None)` for an absent or blank cell; an error for an unparsable one.
fn parse_field<T: std::str::FromStr>(row: &SiteRecord, key: &str, line: usize) -> Result<Option<T>, SiteError> {
    match row.get(key).map(|s| s.trim()) {
        None | Some("") => Ok(None),
        Some(v) => v.parse::<T>().map(Some).map_err(|_| {
            SiteError::Parse(format!("line {line}: invalid {key} value {v:?}"))
        }),
    }
}

fn parse_flag(row: &SiteRecord, key: &str, line: usize) -> Result<Option<bool>, SiteError> {
    match row.get(key).map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(v) => match v.as_str() {
            "" => Ok(None),
            "1" | "true" | "yes" => Ok(Some(true)),
            "0" | "false" | "no" => Ok(Some(false)),
            other => Err(SiteError::Parse(format!(
                "line {line}: invalid {key} value {other:?}: expected 1/0 or true/false"
            ))),
        },
    }
}
