use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    TrackBackground,
    TrackBorder,

    // Snap overlay
    PinnedRange,
    SnapBuffer,
    RangeCenter,
    PositionMarker,
    TargetMarker,

    TextPrimary,
    TextMuted,
}
