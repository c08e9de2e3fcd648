use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use vaulta_core::snap::{ScrollSource, SnapHandler};
use vaulta_protocol::{Ease, SnapCommand};

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
    ease: Ease,
}

impl Animation {
    /// Offset at `now` and whether the animation has finished.
    fn sample(&self, now: Instant) -> (f64, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (self.from + (self.to - self.from) * self.ease.apply(t), false)
    }
}

#[derive(Default)]
struct Inner {
    offset: Cell<f64>,
    max_scroll: Cell<f64>,
    handler: RefCell<Option<SnapHandler>>,
    animation: Cell<Option<Animation>>,
}

/// In-memory page scroll driven by key presses.
///
/// Cloning yields another handle to the same scroll state, so the snap
/// controller and the event loop can share it.
#[derive(Clone, Default)]
pub struct SimulatedScroll {
    inner: Rc<Inner>,
}

impl SimulatedScroll {
    pub fn new(max_scroll: f64) -> Self {
        let scroll = Self::default();
        scroll.set_max_scroll(max_scroll);
        scroll
    }

    /// Current offset in pixels.
    pub fn offset(&self) -> f64 {
        self.inner.offset.get()
    }

    /// Current normalized position.
    pub fn position(&self) -> f64 {
        let max = self.inner.max_scroll.get();
        if max > 0.0 { self.offset() / max } else { 0.0 }
    }

    pub fn set_max_scroll(&self, max_scroll: f64) {
        let max = max_scroll.max(0.0);
        self.inner.max_scroll.set(max);
        self.inner.offset.set(self.offset().clamp(0.0, max));
    }

    /// Move by `delta` pixels, interrupting any running snap.
    pub fn scroll_by(&self, delta: f64) {
        self.inner.animation.set(None);
        self.scroll_to(self.offset() + delta);
    }

    pub fn scroll_to(&self, offset: f64) {
        self.inner.animation.set(None);
        let max = self.inner.max_scroll.get();
        self.inner.offset.set(offset.clamp(0.0, max));
    }

    pub fn is_attached(&self) -> bool {
        self.inner.handler.borrow().is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.inner.animation.get().is_some()
    }

    /// Scrolling came to rest: ask the attached handler for a snap and
    /// start animating toward it.
    pub fn settle(&self, now: Instant) -> Option<SnapCommand> {
        let command = {
            let handler = self.inner.handler.borrow();
            handler.as_ref().and_then(|h| h(self.position()))
        }?;
        let max = self.inner.max_scroll.get();
        let to = command.target * max;
        let timing = (
            Duration::try_from_secs_f64(command.delay.max(0.0)),
            Duration::try_from_secs_f64(command.duration.max(0.0)),
        );
        match timing {
            (Ok(delay), Ok(duration)) => self.inner.animation.set(Some(Animation {
                from: self.offset(),
                to,
                start: now + delay,
                duration,
                ease: command.ease,
            })),
            // Timing that cannot be represented jumps straight to the target.
            _ => {
                self.inner.animation.set(None);
                self.inner.offset.set(to.clamp(0.0, max));
            }
        }
        Some(command)
    }

    /// Advance a running snap. Returns whether one is still running.
    pub fn tick(&self, now: Instant) -> bool {
        let Some(animation) = self.inner.animation.get() else {
            return false;
        };
        let (offset, done) = animation.sample(now);
        self.inner.offset.set(offset);
        if done {
            self.inner.animation.set(None);
        }
        !done
    }
}

/// Keeps a handler attached to a [`SimulatedScroll`] until dropped.
pub struct Attachment(Rc<Inner>);

impl Drop for Attachment {
    fn drop(&mut self) {
        self.0.handler.borrow_mut().take();
        self.0.animation.set(None);
    }
}

impl ScrollSource for SimulatedScroll {
    type Subscription = Attachment;

    fn max_scroll(&self) -> f64 {
        self.inner.max_scroll.get()
    }

    fn subscribe(&self, handler: SnapHandler) -> Attachment {
        *self.inner.handler.borrow_mut() = Some(handler);
        Attachment(Rc::clone(&self.inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaulta_core::sections::{MeasuredPage, PageLayout};
    use vaulta_core::snap::{Refresh, SnapController};
    use vaulta_protocol::SnapConfig;

    type Controller = SnapController<SimulatedScroll, MeasuredPage>;

    fn armed() -> (Controller, SimulatedScroll) {
        armed_with(SnapConfig::default())
    }

    fn armed_with(config: SnapConfig) -> (Controller, SimulatedScroll) {
        let page = PageLayout::vaulta().measure(100.0).unwrap();
        let scroll = SimulatedScroll::new(page.max_scroll());
        let mut ctrl = SnapController::new(scroll.clone(), page, config);
        assert!(matches!(ctrl.refresh(), Refresh::Armed { .. }));
        (ctrl, scroll)
    }

    #[test]
    fn settle_animates_to_section_center() {
        let (_ctrl, scroll) = armed();
        // Hero pins over [0, 130]px; rest a little past its start.
        scroll.scroll_to(20.0);
        let now = Instant::now();
        let cmd = scroll.settle(now).unwrap();
        assert!(scroll.is_animating());

        assert!(scroll.tick(now + Duration::from_millis(1)));
        let end = now + Duration::from_secs_f64(cmd.duration) + Duration::from_millis(1);
        assert!(!scroll.tick(end));
        assert!((scroll.offset() - 65.0).abs() < 1e-6);
        assert_eq!(scroll.settle(end), None);
    }

    #[test]
    fn unrepresentable_duration_jumps_to_target() {
        let mut config = SnapConfig::default();
        config.duration.max = 1e300;
        let (_ctrl, scroll) = armed_with(config);
        scroll.scroll_to(20.0);
        let cmd = scroll.settle(Instant::now()).unwrap();
        assert!(cmd.duration > 1e200);
        assert!(!scroll.is_animating());
        assert!((scroll.offset() - 65.0).abs() < 1e-6);
    }

    #[test]
    fn user_input_interrupts_snap() {
        let (_ctrl, scroll) = armed();
        scroll.scroll_to(20.0);
        scroll.settle(Instant::now()).unwrap();
        scroll.scroll_by(5.0);
        assert!(!scroll.is_animating());
        assert!((scroll.offset() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn dropping_controller_detaches() {
        let (ctrl, scroll) = armed();
        assert!(scroll.is_attached());
        drop(ctrl);
        assert!(!scroll.is_attached());
        scroll.scroll_to(20.0);
        assert_eq!(scroll.settle(Instant::now()), None);
    }

    #[test]
    fn offset_stays_within_page() {
        let scroll = SimulatedScroll::new(100.0);
        scroll.scroll_by(-50.0);
        assert_eq!(scroll.offset(), 0.0);
        scroll.scroll_by(500.0);
        assert_eq!(scroll.offset(), 100.0);
        scroll.set_max_scroll(40.0);
        assert_eq!(scroll.offset(), 40.0);
        assert!((scroll.position() - 1.0).abs() < 1e-12);
    }
}
