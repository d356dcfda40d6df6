//! `SiteRegistry` — owner of every `Site` in one replicate.
//!
//! The registry is owned by the program and handed by reference to
//! schedules and methods; nothing else holds site data.  `SiteId` is the
//! index into the backing `Vec`, so lookups are O(1).

use std::ops::{Index, IndexMut};

use ldar_core::{GeoPoint, SiteId};

use crate::{Site, SiteError, SiteMethodParams, SiteResult};

/// All sites of one simulation replicate.
#[derive(Clone, Debug, Default)]
pub struct SiteRegistry {
    sites:        Vec<Site>,
    method_count: usize,
}

impl SiteRegistry {
    /// Number of sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Number of methods every site carries attributes for.
    pub fn method_count(&self) -> usize {
        self.method_count
    }

    /// Iterator over all `SiteId`s in ascending order.
    pub fn site_ids(&self) -> impl Iterator<Item = SiteId> + '_ {
        (0..self.sites.len() as u32).map(SiteId)
    }

    pub fn get(&self, id: SiteId) -> SiteResult<&Site> {
        self.sites.get(id.index()).ok_or(SiteError::UnknownSite(id))
    }

    pub fn get_mut(&mut self, id: SiteId) -> SiteResult<&mut Site> {
        self.sites.get_mut(id.index()).ok_or(SiteError::UnknownSite(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Site> {
        self.sites.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Site> {
        self.sites.iter_mut()
    }

    /// Look a site up by its external name (linear scan; setup-time only).
    pub fn find_by_name(&self, name: &str) -> Option<SiteId> {
        self.sites.iter().find(|s| s.name == name).map(Site::id)
    }
}

impl Index<SiteId> for SiteRegistry {
    type Output = Site;

    fn index(&self, id: SiteId) -> &Site {
        &self.sites[id.index()]
    }
}

impl IndexMut<SiteId> for SiteRegistry {
    fn index_mut(&mut self, id: SiteId) -> &mut Site {
        &mut self.sites[id.index()]
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`SiteRegistry`].
///
/// # Usage
///
/// ```rust
/// use ldar_core::GeoPoint;
/// use ldar_site::{SiteMethodParams, SiteRegistryBuilder};
///
/// let params = SiteMethodParams { surveys_per_year: 2, survey_time_min: 90.0, deployable: true };
/// let sites = SiteRegistryBuilder::new(1)
///     .site("well-pad-1", GeoPoint::new(53.5, -113.5), vec![params])
///     .site("well-pad-2", GeoPoint::new(53.6, -113.4), vec![params])
///     .build()
///     .unwrap();
///
/// assert_eq!(sites.len(), 2);
/// ```
pub struct SiteRegistryBuilder {
    method_count: usize,
    pending:      Vec<(String, GeoPoint, Vec<SiteMethodParams>)>,
}

impl SiteRegistryBuilder {
    /// Create a builder whose sites carry `method_count` method entries each.
    pub fn new(method_count: usize) -> Self {
        Self { method_count, pending: Vec::new() }
    }

    /// Queue one site.  `params` must have one entry per method.
    pub fn site(mut self, name: impl Into<String>, location: GeoPoint, params: Vec<SiteMethodParams>) -> Self {
        self.pending.push((name.into(), location, params));
        self
    }

    /// Assign ids in insertion order and validate method entry counts.
    pub fn build(self) -> SiteResult<SiteRegistry> {
        let mut sites = Vec::with_capacity(self.pending.len());
        for (i, (name, location, params)) in self.pending.into_iter().enumerate() {
            if params.len() != self.method_count {
                return Err(SiteError::MethodCountMismatch {
                    site:     name,
                    expected: self.method_count,
                    got:      params.len(),
                });
            }
            let id = SiteId::try_from(i).map_err(|e| SiteError::Parse(e.to_string()))?;
            sites.push(Site::new(id, name, location, params));
        }
        Ok(SiteRegistry { sites, method_count: self.method_count })
    }
}
