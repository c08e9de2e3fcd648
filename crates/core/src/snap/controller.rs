use std::sync::Arc;

use tracing::{debug, info};
use vaulta_protocol::{SnapCommand, SnapConfig};

use super::planner::SnapPlanner;
use super::ranges::RangeSet;
use super::registry::PinnedSectionRegistry;

/// Callback a scroll source invokes with the current normalized position
/// when scrolling comes to rest. A returned command asks the source to
/// animate there.
pub type SnapHandler = Box<dyn Fn(f64) -> Option<SnapCommand>>;

/// Host scroll environment the controller attaches to.
pub trait ScrollSource {
    /// Guard for an attached handler. Dropping it must detach the handler.
    type Subscription;

    /// Total scrollable distance in pixels.
    fn max_scroll(&self) -> f64;

    fn subscribe(&self, handler: SnapHandler) -> Self::Subscription;
}

/// Outcome of [`SnapController::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The registry has not settled; nothing is attached.
    Deferred,
    /// No pinned ranges or no scrollable distance; nothing is attached.
    Idle,
    /// A new generation is attached.
    Armed { generation: u64, sections: usize },
}

struct ActiveSnap<Sub> {
    ranges: Arc<RangeSet>,
    _subscription: Sub,
}

/// Owns the snap subscription for one page.
///
/// Every [`refresh`](Self::refresh) tears the previous subscription down
/// before attaching a new one, so at most one handler is ever live.
/// Dropping the controller releases it.
pub struct SnapController<S: ScrollSource, R: PinnedSectionRegistry> {
    source: S,
    registry: R,
    config: SnapConfig,
    active: Option<ActiveSnap<S::Subscription>>,
    generation: u64,
}

impl<S: ScrollSource, R: PinnedSectionRegistry> SnapController<S, R> {
    pub fn new(source: S, registry: R, config: SnapConfig) -> Self {
        Self {
            source,
            registry,
            config,
            active: None,
            generation: 0,
        }
    }

    /// Rebuild ranges from the registry and re-attach.
    ///
    /// Call after the layout settles and on every viewport resize.
    pub fn refresh(&mut self) -> Refresh {
        self.teardown();

        if !self.registry.is_settled() {
            debug!("pinned sections still measuring; snap deferred");
            return Refresh::Deferred;
        }

        let extents = self.registry.pinned_extents();
        let max_scroll = self.source.max_scroll();
        let ranges = match RangeSet::from_extents(&extents, max_scroll) {
            Ok(ranges) if !ranges.is_empty() => Arc::new(ranges),
            Ok(_) => {
                debug!("no pinned sections; page scrolls freely");
                return Refresh::Idle;
            }
            Err(e) => {
                info!("snap disabled: {e}");
                return Refresh::Idle;
            }
        };

        self.generation += 1;
        let sections = ranges.len();
        let planner = SnapPlanner::new(Arc::clone(&ranges), self.config, max_scroll);
        let subscription = self
            .source
            .subscribe(Box::new(move |position| planner.plan(position)));
        self.active = Some(ActiveSnap {
            ranges,
            _subscription: subscription,
        });
        debug!(generation = self.generation, sections, "snap armed");
        Refresh::Armed {
            generation: self.generation,
            sections,
        }
    }

    /// Detach the active handler, if any.
    pub fn teardown(&mut self) {
        if self.active.take().is_some() {
            debug!(generation = self.generation, "snap torn down");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }

    /// Ranges of the active generation.
    pub fn ranges(&self) -> Option<Arc<RangeSet>> {
        self.active.as_ref().map(|a| Arc::clone(&a.ranges))
    }

    /// Number of generations armed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Mutable registry access. Changes take effect on the next refresh.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// Resolve against the active generation; identity when unarmed.
    pub fn resolve(&self, position: f64) -> f64 {
        match &self.active {
            Some(active) => active.ranges.resolve(position, self.config.buffer),
            None => position,
        }
    }
}

impl<S: ScrollSource, R: PinnedSectionRegistry> Drop for SnapController<S, R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
