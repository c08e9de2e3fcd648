use thiserror::Error;
use tracing::warn;
use vaulta_protocol::{PinnedRange, SectionExtent};

use super::resolver::{self, SnapMode};

#[derive(Debug, Error, PartialEq)]
pub enum RangeError {
    #[error("page has no scrollable distance (max scroll {0})")]
    NoScrollableDistance(f64),
}

/// One layout generation's pinned ranges, normalized and sorted by `start`.
///
/// Built once per layout pass and never mutated afterwards; a new pass
/// produces a new set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeSet {
    ranges: Vec<PinnedRange>,
    ids: Vec<String>,
}

impl RangeSet {
    /// Normalize measured pixel extents into a sorted range set.
    ///
    /// Extents with non-finite bounds are dropped and inverted ones are
    /// swapped. Bounds are divided by `max_scroll` and clamped into `[0, 1]`.
    pub fn from_extents(extents: &[SectionExtent], max_scroll: f64) -> Result<Self, RangeError> {
        if !max_scroll.is_finite() || max_scroll <= 0.0 {
            return Err(RangeError::NoScrollableDistance(max_scroll));
        }

        let mut entries: Vec<(String, PinnedRange)> = Vec::with_capacity(extents.len());
        for section in extents {
            let (mut start, mut end) = (section.extent.start, section.extent.end);
            if !start.is_finite() || !end.is_finite() {
                warn!(section = %section.id, start, end, "discarding non-finite pinned extent");
                continue;
            }
            if start > end {
                warn!(section = %section.id, start, end, "swapping inverted pinned extent");
                std::mem::swap(&mut start, &mut end);
            }
            let start = (start / max_scroll).clamp(0.0, 1.0);
            let end = (end / max_scroll).clamp(0.0, 1.0);
            entries.push((section.id.clone(), PinnedRange::new(start, end)));
        }

        entries.sort_by(|a, b| a.1.start.total_cmp(&b.1.start));
        let (ids, ranges) = entries.into_iter().unzip();
        Ok(Self { ranges, ids })
    }

    pub fn ranges(&self) -> &[PinnedRange] {
        &self.ranges
    }

    /// Id of the section that reported the range at `index`.
    pub fn section_id(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PinnedRange)> {
        self.ids.iter().map(String::as_str).zip(self.ranges.iter())
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn classify(&self, position: f64, buffer: f64) -> SnapMode {
        resolver::classify(position, &self.ranges, buffer)
    }

    pub fn resolve(&self, position: f64, buffer: f64) -> f64 {
        resolver::resolve(position, &self.ranges, buffer)
    }

    /// Index of the range whose unbuffered bounds contain `position`.
    pub fn enclosing(&self, position: f64) -> Option<usize> {
        self.ranges.iter().position(|r| r.contains(position, 0.0))
    }
}
