pub mod layout;
pub mod timeline;

pub use layout::{LayoutError, MeasuredPage, MeasuredSection, PageLayout, SectionKind, SectionSpec};
pub use timeline::{Phase, PinnedTimeline, local_progress};
