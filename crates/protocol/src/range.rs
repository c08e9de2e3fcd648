use serde::{Deserialize, Serialize};

/// One contiguous interval of normalized scroll progress during which a
/// section is held on screen while its content animates.
///
/// Both bounds are in `[0, 1]` with `start <= end`. The registration step
/// in core normalizes measured extents before building these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinnedRange {
    pub start: f64,
    pub end: f64,
}

impl PinnedRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Resting point a snap lands on.
    #[inline]
    pub fn center(&self) -> f64 {
        self.start + (self.end - self.start) * 0.5
    }

    /// Whether `position` lies within the range widened by `buffer` on both
    /// sides. Both edges are inclusive.
    #[inline]
    pub fn contains(&self, position: f64, buffer: f64) -> bool {
        position >= self.start - buffer && position <= self.end + buffer
    }

    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }
}

/// Raw pixel extent of a pinned section, as measured after its timeline
/// was built. Not yet normalized by the scrollable distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollExtent {
    pub start: f64,
    pub end: f64,
}

impl ScrollExtent {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// A measured extent tagged with the section that reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionExtent {
    pub id: String,
    pub extent: ScrollExtent,
}

impl SectionExtent {
    pub fn new(id: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            id: id.into(),
            extent: ScrollExtent::new(start, end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_midpoint() {
        let r = PinnedRange::new(0.2, 0.6);
        assert!((r.center() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn contains_applies_buffer_inclusively() {
        let r = PinnedRange::new(0.45, 0.65);
        assert!(r.contains(0.45 - 0.02, 0.02));
        assert!(r.contains(0.65 + 0.02, 0.02));
        assert!(!r.contains(0.45 - 0.02 - 1e-9, 0.02));
        assert!(!r.contains(0.45 - 0.001, 0.0));
    }

    #[test]
    fn center_field_is_ignored_on_input() {
        let r: PinnedRange =
            serde_json::from_str(r#"{"start":0.0,"end":0.2,"center":0.1}"#).unwrap();
        assert_eq!(r, PinnedRange::new(0.0, 0.2));
    }
}
