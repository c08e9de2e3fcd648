//! Scroll-snap core: the pure resolver, the per-layout range set, and the
//! controller that keeps exactly one snap handler attached to the page.

pub mod controller;
pub mod planner;
pub mod ranges;
pub mod registry;
pub mod resolver;

pub use controller::{Refresh, ScrollSource, SnapController, SnapHandler};
pub use planner::SnapPlanner;
pub use ranges::{RangeError, RangeSet};
pub use registry::{ExtentStore, PinnedSectionRegistry, Readiness};
pub use resolver::{SnapMode, classify, resolve};
