use vaulta_protocol::PinnedRange;

/// Which of the two logical scroll modes a position falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapMode {
    /// No pinned range claims the position; native inertia continues.
    Flowing,
    /// Inside at least one (buffered) pinned range. `index` is the range
    /// whose center the viewport snaps to.
    Pinned { index: usize },
}

/// Classify `position` against `ranges` (sorted ascending by `start`).
///
/// Only ranges whose buffered window contains the position compete; the
/// nearest center among them wins, and on ties the earliest range is kept.
pub fn classify(position: f64, ranges: &[PinnedRange], buffer: f64) -> SnapMode {
    let mut best: Option<(usize, f64)> = None;
    for (index, range) in ranges.iter().enumerate() {
        if !range.contains(position, buffer) {
            continue;
        }
        let distance = (range.center() - position).abs();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }
    match best {
        Some((index, _)) => SnapMode::Pinned { index },
        None => SnapMode::Flowing,
    }
}

/// Resolve the snap target for `position`.
///
/// Returns `position` unchanged when it is flowing (including when
/// `ranges` is empty or `position` is not finite), otherwise the center of
/// the selected range. Never fails and never allocates.
pub fn resolve(position: f64, ranges: &[PinnedRange], buffer: f64) -> f64 {
    match classify(position, ranges, buffer) {
        SnapMode::Flowing => position,
        SnapMode::Pinned { index } => ranges[index].center(),
    }
}
