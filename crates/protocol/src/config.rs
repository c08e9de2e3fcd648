use serde::{Deserialize, Serialize};

/// Easing curve handed to the animation engine. Serialized with the
/// engine's own curve names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    #[serde(rename = "none")]
    Linear,
    #[serde(rename = "power2.in")]
    Power2In,
    #[default]
    #[serde(rename = "power2.out")]
    Power2Out,
    #[serde(rename = "power2.inOut")]
    Power2InOut,
}

impl Ease {
    /// Map linear progress `t` to eased progress. Input is clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Ease::Linear => t,
            Ease::Power2In => t * t * t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Ease::Linear => "none",
            Ease::Power2In => "power2.in",
            Ease::Power2Out => "power2.out",
            Ease::Power2InOut => "power2.inOut",
        }
    }
}

/// Bounds on how long a snap animation may take, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapDuration {
    pub min: f64,
    pub max: f64,
}

impl Default for SnapDuration {
    fn default() -> Self {
        Self {
            min: 0.15,
            max: 0.35,
        }
    }
}

impl SnapDuration {
    /// Duration for a snap covering `distance` (normalized scroll units).
    ///
    /// Grows linearly from `min` at zero distance to `max` at
    /// `full_distance` and beyond.
    pub fn for_distance(&self, distance: f64, full_distance: f64) -> f64 {
        if full_distance <= 0.0 || !distance.is_finite() {
            return self.max;
        }
        let t = (distance.abs() / full_distance).min(1.0);
        self.min + (self.max - self.min) * t
    }
}

/// Tunables for the snap behavior. Every field falls back to its default
/// when absent from a config document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Slack around each pinned range, in normalized scroll units.
    pub buffer: f64,
    pub duration: SnapDuration,
    /// Snap distance at which the duration reaches `duration.max`.
    pub full_duration_distance: f64,
    /// Seconds to wait before starting the snap animation.
    pub delay: f64,
    pub ease: Ease,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            buffer: 0.02,
            duration: SnapDuration::default(),
            full_duration_distance: 0.1,
            delay: 0.0,
            ease: Ease::Power2Out,
        }
    }
}
