use serde::{Deserialize, Serialize};

use crate::section::SectionId;
use crate::types::Rect;

/// One intersection notification for one region.
///
/// Mirrors the fields of a DOM `IntersectionObserverEntry` that the
/// tracker reads. Hosts without a native observer can derive entries from
/// layout boxes with [`VisibilityEntry::from_bounds`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityEntry {
    pub id: SectionId,
    /// Fraction of the region inside the viewport, `[0, 1]`.
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl VisibilityEntry {
    pub fn new(id: impl Into<SectionId>, ratio: f64, is_intersecting: bool) -> Self {
        Self {
            id: id.into(),
            ratio,
            is_intersecting,
        }
    }

    pub fn from_bounds(id: impl Into<SectionId>, region: &Rect, viewport: &Rect) -> Self {
        let ratio = region.visible_ratio(viewport);
        Self::new(id, ratio, ratio > 0.0)
    }

    /// Whether this entry counts as "in view" at `threshold`.
    pub fn crosses(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}
