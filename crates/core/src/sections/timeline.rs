use vaulta_protocol::PinnedRange;

/// Stage of a pinned section's choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Content animates in.
    Entrance,
    /// Content holds still.
    Settle,
    /// Content animates out.
    Exit,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Entrance => "entrance",
            Phase::Settle => "settle",
            Phase::Exit => "exit",
        }
    }
}

/// Phase boundaries as fractions of a pinned range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedTimeline {
    pub entrance_end: f64,
    pub exit_start: f64,
}

impl Default for PinnedTimeline {
    fn default() -> Self {
        Self {
            entrance_end: 0.3,
            exit_start: 0.7,
        }
    }
}

impl PinnedTimeline {
    pub fn phase(&self, progress: f64) -> Phase {
        if progress < self.entrance_end {
            Phase::Entrance
        } else if progress < self.exit_start {
            Phase::Settle
        } else {
            Phase::Exit
        }
    }

    pub fn phase_at(&self, position: f64, range: &PinnedRange) -> Phase {
        self.phase(local_progress(position, range))
    }
}

/// Progress through `range` in `[0, 1]`.
pub fn local_progress(position: f64, range: &PinnedRange) -> f64 {
    if range.is_empty() {
        return if position >= range.start { 1.0 } else { 0.0 };
    }
    ((position - range.start) / range.len()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_split_the_range() {
        let tl = PinnedTimeline::default();
        let r = PinnedRange::new(0.2, 0.4);
        assert_eq!(tl.phase_at(0.2, &r), Phase::Entrance);
        assert_eq!(tl.phase_at(0.3, &r), Phase::Settle);
        assert_eq!(tl.phase_at(0.39, &r), Phase::Exit);
        assert_eq!(tl.phase_at(0.9, &r), Phase::Exit);
    }

    #[test]
    fn snap_center_rests_in_settle() {
        let tl = PinnedTimeline::default();
        let r = PinnedRange::new(0.45, 0.65);
        assert_eq!(tl.phase_at(r.center(), &r), Phase::Settle);
    }

    #[test]
    fn degenerate_range_is_a_step() {
        let r = PinnedRange::new(0.5, 0.5);
        assert_eq!(local_progress(0.4, &r), 0.0);
        assert_eq!(local_progress(0.5, &r), 1.0);
    }
}
