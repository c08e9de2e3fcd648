use serde::{Deserialize, Serialize};

use crate::config::Ease;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// Request to animate the viewport to a normalized scroll position.
///
/// Produced by the snap planner and handed back to the scroll source,
/// which owns the actual animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapCommand {
    pub target: f64,
    /// Seconds.
    pub duration: f64,
    /// Seconds.
    pub delay: f64,
    pub ease: Ease,
}

/// A single, stateless drawing instruction for debug overlays.
///
/// Views emit a `Vec<RenderCommand>`; renderers consume the list in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RenderCommand {
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        label: Option<String>,
    },

    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Begin a logical group. Renderers may use this for layering.
    BeginGroup { id: String, label: Option<String> },

    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}
