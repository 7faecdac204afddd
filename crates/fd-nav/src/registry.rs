//! Location registry: schedule location codes → navigable points.
//!
//! Schedule rows name endpoints by code (`DOCK_3`, `STORE_A1`, …); the
//! registry is the single place those codes resolve to site-frame points.
//! Registration is first-wins: a second registration under an in-use code is
//! logged and ignored so a bad site file cannot silently re-aim live codes.

use rustc_hash::FxHashMap;
use tracing::warn;

use fd_core::Point;

use crate::{NavError, NavResult};

/// Maps location codes to navigable target points.
#[derive(Default)]
pub struct LocationRegistry {
    codes: FxHashMap<String, Point>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `code` at `point`.
    ///
    /// The first registration wins; a duplicate is logged, left unchanged,
    /// and reported as [`NavError::DuplicateCode`] so callers loading a site
    /// file can count conflicts.
    pub fn register(&mut self, code: impl Into<String>, point: Point) -> NavResult<()> {
        let code = code.into();
        match self.codes.entry(code) {
            std::collections::hash_map::Entry::Occupied(e) => {
                warn!(code = %e.key(), "duplicate location code ignored");
                Err(NavError::DuplicateCode(e.key().clone()))
            }
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(point);
                Ok(())
            }
        }
    }

    /// Resolve a code to its target point, or `None` for unknown codes.
    pub fn resolve(&self, code: &str) -> Option<Point> {
        self.codes.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
