//! Integration test: measure the product page, arm the snap controller
//! against a simulated scroll source, and walk the page top to bottom.

use std::cell::RefCell;
use std::rc::Rc;

use vaulta_core::sections::{MeasuredPage, PageLayout, Phase, PinnedTimeline};
use vaulta_core::snap::{Refresh, ScrollSource, SnapController, SnapHandler, SnapMode};
use vaulta_protocol::{SnapCommand, SnapConfig};

type Slot = Rc<RefCell<Option<SnapHandler>>>;

/// Scroll source whose scrollable distance follows the measured page.
struct PageScroll {
    max_scroll: Rc<RefCell<f64>>,
    slot: Slot,
}

struct Attached(Slot);

impl Drop for Attached {
    fn drop(&mut self) {
        self.0.borrow_mut().take();
    }
}

impl ScrollSource for PageScroll {
    type Subscription = Attached;

    fn max_scroll(&self) -> f64 {
        *self.max_scroll.borrow()
    }

    fn subscribe(&self, handler: SnapHandler) -> Attached {
        let mut slot = self.slot.borrow_mut();
        assert!(slot.is_none(), "a previous handler is still attached");
        *slot = Some(handler);
        Attached(Rc::clone(&self.slot))
    }
}

fn settle_at(slot: &Slot, position: f64) -> Option<SnapCommand> {
    slot.borrow().as_ref().and_then(|h| h(position))
}

fn arm(viewport_height: f64) -> (SnapController<PageScroll, MeasuredPage>, Slot, Rc<RefCell<f64>>) {
    let page = PageLayout::vaulta()
        .measure(viewport_height)
        .expect("vaulta layout should measure");
    let max_scroll = Rc::new(RefCell::new(page.max_scroll()));
    let slot: Slot = Rc::new(RefCell::new(None));
    let source = PageScroll {
        max_scroll: Rc::clone(&max_scroll),
        slot: Rc::clone(&slot),
    };
    let mut ctrl = SnapController::new(source, page, SnapConfig::default());
    assert_eq!(
        ctrl.refresh(),
        Refresh::Armed {
            generation: 1,
            sections: 7
        }
    );
    (ctrl, slot, max_scroll)
}

#[test]
fn every_pinned_section_snaps_into_its_settle_phase() {
    let (ctrl, slot, _) = arm(900.0);
    let ranges = ctrl.ranges().expect("controller should be armed");
    let timeline = PinnedTimeline::default();

    for (id, range) in ranges.iter() {
        let entering = range.start + range.len() * 0.1;
        let cmd = settle_at(&slot, entering)
            .unwrap_or_else(|| panic!("{id}: expected a snap from {entering}"));
        assert!(
            (cmd.target - range.center()).abs() < 1e-9,
            "{id}: snapped to {} instead of {}",
            cmd.target,
            range.center()
        );
        assert_eq!(timeline.phase_at(cmd.target, range), Phase::Settle, "{id}");
        assert_eq!(settle_at(&slot, cmd.target), None, "{id}: snap is not idempotent");
    }
}

#[test]
fn use_cases_section_scrolls_freely() {
    let (ctrl, slot, max_scroll) = arm(900.0);
    let page = ctrl.registry();
    let usecases = page
        .sections()
        .iter()
        .find(|s| s.id == "usecases")
        .expect("usecases section");
    let middle = (usecases.top + usecases.height * 0.5) / *max_scroll.borrow();

    assert_eq!(
        ctrl.ranges().map(|r| r.classify(middle, ctrl.config().buffer)),
        Some(SnapMode::Flowing)
    );
    assert_eq!(settle_at(&slot, middle), None);
}

#[test]
fn resize_rebuilds_ranges_without_stacking_handlers() {
    let (mut ctrl, slot, max_scroll) = arm(900.0);
    let before = ctrl.ranges().expect("armed");

    let resized = PageLayout::vaulta().measure(600.0).expect("measure");
    *max_scroll.borrow_mut() = resized.max_scroll();
    *ctrl.registry_mut() = resized;

    // `PageScroll::subscribe` asserts the old handler was detached first.
    assert_eq!(
        ctrl.refresh(),
        Refresh::Armed {
            generation: 2,
            sections: 7
        }
    );
    let after = ctrl.ranges().expect("armed");

    // Every section scales with the viewport, so normalized ranges match.
    for ((_, a), (_, b)) in before.iter().zip(after.iter()) {
        assert!((a.start - b.start).abs() < 1e-9);
        assert!((a.end - b.end).abs() < 1e-9);
    }
    assert!(slot.borrow().is_some());

    drop(ctrl);
    assert!(slot.borrow().is_none());
}
