use std::sync::Arc;

use vaulta_protocol::{SnapCommand, SnapConfig};

use super::ranges::RangeSet;

/// Within this many pixels of its target the viewport counts as resting
/// there. Browsers report whole or half pixels after a smooth scroll.
const SETTLED_PX: f64 = 0.5;
/// Floor for the normalized settle threshold.
const MIN_SETTLED: f64 = 1e-6;

/// Turns a scroll position into an optional snap request for one layout
/// generation.
#[derive(Debug, Clone)]
pub struct SnapPlanner {
    ranges: Arc<RangeSet>,
    config: SnapConfig,
    settled: f64,
}

impl SnapPlanner {
    /// `max_scroll` is the pixel distance the ranges were normalized
    /// against.
    pub fn new(ranges: Arc<RangeSet>, config: SnapConfig, max_scroll: f64) -> Self {
        let settled = if max_scroll.is_finite() && max_scroll > 0.0 {
            (SETTLED_PX / max_scroll).max(MIN_SETTLED)
        } else {
            MIN_SETTLED
        };
        Self {
            ranges,
            config,
            settled,
        }
    }

    pub fn ranges(&self) -> &RangeSet {
        &self.ranges
    }

    /// `None` while flowing or when within half a pixel of the target.
    pub fn plan(&self, position: f64) -> Option<SnapCommand> {
        let target = self.ranges.resolve(position, self.config.buffer);
        let distance = (target - position).abs();
        if !distance.is_finite() || distance <= self.settled {
            return None;
        }
        Some(SnapCommand {
            target,
            duration: self
                .config
                .duration
                .for_distance(distance, self.config.full_duration_distance),
            delay: self.config.delay,
            ease: self.config.ease,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaulta_protocol::{Ease, SectionExtent};

    fn planner() -> SnapPlanner {
        let extents = vec![
            SectionExtent::new("hero", 0.0, 200.0),
            SectionExtent::new("security", 450.0, 650.0),
        ];
        let set = RangeSet::from_extents(&extents, 1000.0).unwrap();
        SnapPlanner::new(Arc::new(set), SnapConfig::default(), 1000.0)
    }

    #[test]
    fn flowing_positions_plan_nothing() {
        assert_eq!(planner().plan(0.3), None);
    }

    #[test]
    fn pinned_positions_plan_a_snap() {
        let cmd = planner().plan(0.56).unwrap();
        assert!((cmd.target - 0.55).abs() < 1e-9);
        assert_eq!(cmd.ease, Ease::Power2Out);
        assert!(cmd.duration >= 0.15 && cmd.duration <= 0.35);
        assert_eq!(cmd.delay, 0.0);
    }

    #[test]
    fn resting_on_center_plans_nothing() {
        let p = planner();
        let center = p.ranges().ranges()[0].center();
        assert_eq!(p.plan(center), None);
    }

    #[test]
    fn sub_pixel_offset_from_center_plans_nothing() {
        let p = planner();
        let center = p.ranges().ranges()[1].center();
        // 0.4px and 0.6px away on a 1000px page.
        assert_eq!(p.plan(center + 0.4 / 1000.0), None);
        assert!(p.plan(center + 0.6 / 1000.0).is_some());
    }

    #[test]
    fn longer_snaps_take_longer() {
        let p = planner();
        let near = p.plan(0.11).unwrap();
        let far = p.plan(0.19).unwrap();
        assert!(far.duration > near.duration);
    }
}
