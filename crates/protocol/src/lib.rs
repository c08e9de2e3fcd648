pub mod commands;
pub mod config;
pub mod range;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, SnapCommand, TextAlign};
pub use config::{Ease, SnapConfig, SnapDuration};
pub use range::{PinnedRange, ScrollExtent, SectionExtent};
pub use theme::ThemeToken;
pub use types::{Point, Rect, Viewport};
