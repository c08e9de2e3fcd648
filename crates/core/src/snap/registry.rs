use vaulta_protocol::{ScrollExtent, SectionExtent};

/// Source of measured pinned-section extents for one layout pass.
pub trait PinnedSectionRegistry {
    /// Pixel extents of every pinned section, in any order.
    fn pinned_extents(&self) -> Vec<SectionExtent>;

    /// Whether every pinned section has finished measuring. Ranges are
    /// only built from a settled registry.
    fn is_settled(&self) -> bool {
        true
    }
}

/// Progress of a layout pass fed through [`ExtentStore::report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Pending { remaining: usize },
    Settled,
}

impl Readiness {
    pub fn is_settled(self) -> bool {
        matches!(self, Readiness::Settled)
    }
}

/// Registry fed by sections reporting their own extents once their
/// timelines are built.
///
/// A layout pass begins with [`expect`](Self::expect), naming how many
/// sections will report. The store settles when that many distinct ids
/// have reported.
#[derive(Debug, Clone, Default)]
pub struct ExtentStore {
    expected: usize,
    reports: Vec<SectionExtent>,
}

impl ExtentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new layout pass, discarding previous reports.
    pub fn expect(&mut self, sections: usize) {
        self.expected = sections;
        self.reports.clear();
    }

    /// Record a section's extent. A repeated id replaces its earlier report.
    pub fn report(&mut self, id: &str, extent: ScrollExtent) -> Readiness {
        match self.reports.iter_mut().find(|r| r.id == id) {
            Some(existing) => existing.extent = extent,
            None => self.reports.push(SectionExtent {
                id: id.to_owned(),
                extent,
            }),
        }
        self.readiness()
    }

    pub fn readiness(&self) -> Readiness {
        match self.expected.saturating_sub(self.reports.len()) {
            0 => Readiness::Settled,
            remaining => Readiness::Pending { remaining },
        }
    }

    pub fn reported(&self) -> usize {
        self.reports.len()
    }
}

impl PinnedSectionRegistry for ExtentStore {
    fn pinned_extents(&self) -> Vec<SectionExtent> {
        self.reports.clone()
    }

    fn is_settled(&self) -> bool {
        self.readiness().is_settled()
    }
}
