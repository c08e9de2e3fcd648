use std::cell::Cell;
use std::rc::Rc;

use vaulta_core::snap::{ScrollSource, SnapHandler};
use vaulta_protocol::SnapCommand;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{ScrollBehavior, ScrollToOptions, Window};

/// Scrolling must pause this long before a snap is considered.
const SETTLE_MS: i32 = 120;

/// Pixel geometry one armed generation was normalized against.
///
/// A resize invalidates it: the generation's ranges no longer describe the
/// page, so no further snaps are planned from it.
#[derive(Debug)]
struct SnapFrame {
    max_scroll: f64,
    stale: Cell<bool>,
}

impl SnapFrame {
    fn new(max_scroll: f64) -> Self {
        Self {
            max_scroll,
            stale: Cell::new(false),
        }
    }

    /// Normalized position for `scroll_y`, or `None` once stale.
    fn position(&self, scroll_y: f64) -> Option<f64> {
        if self.stale.get() || self.max_scroll <= 0.0 {
            return None;
        }
        Some(scroll_y / self.max_scroll)
    }

    fn target_px(&self, command: &SnapCommand) -> f64 {
        command.target * self.max_scroll
    }

    /// Mark stale. Returns `true` the first time.
    fn invalidate(&self) -> bool {
        !self.stale.replace(true)
    }
}

/// The browser window as a scroll source.
///
/// Snaps run once scroll events stop for [`SETTLE_MS`]. If the host page
/// supplied an animator it receives `(target_px, duration_s, ease)`;
/// otherwise the window scrolls smoothly on its own. A window resize
/// disables the armed generation and calls the host's `relayout`
/// callback, which is expected to start a new layout pass.
pub struct WindowScrollSource {
    window: Window,
    animator: Option<js_sys::Function>,
    relayout: Option<js_sys::Function>,
}

impl WindowScrollSource {
    pub fn new(
        window: Window,
        animator: Option<js_sys::Function>,
        relayout: Option<js_sys::Function>,
    ) -> Self {
        Self {
            window,
            animator,
            relayout,
        }
    }
}

impl ScrollSource for WindowScrollSource {
    type Subscription = WindowSubscription;

    fn max_scroll(&self) -> f64 {
        max_scroll(&self.window)
    }

    fn subscribe(&self, handler: SnapHandler) -> WindowSubscription {
        let frame = Rc::new(SnapFrame::new(max_scroll(&self.window)));
        let pending = Rc::new(Cell::new(None::<i32>));

        let settle = {
            let window = self.window.clone();
            let animator = self.animator.clone();
            let frame = Rc::clone(&frame);
            let pending = Rc::clone(&pending);
            Closure::<dyn Fn()>::new(move || {
                pending.set(None);
                let Some(position) = window.scroll_y().ok().and_then(|y| frame.position(y))
                else {
                    return;
                };
                if let Some(command) = handler(position) {
                    animate(&window, animator.as_ref(), &command, frame.target_px(&command));
                }
            })
        };

        let on_scroll = {
            let window = self.window.clone();
            let pending = Rc::clone(&pending);
            let settle_fn: js_sys::Function =
                settle.as_ref().unchecked_ref::<js_sys::Function>().clone();
            Closure::<dyn Fn()>::new(move || {
                if let Some(handle) = pending.take() {
                    window.clear_timeout_with_handle(handle);
                }
                match window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&settle_fn, SETTLE_MS)
                {
                    Ok(handle) => pending.set(Some(handle)),
                    Err(e) => web_sys::console::warn_1(&e),
                }
            })
        };

        let on_resize = {
            let window = self.window.clone();
            let relayout = self.relayout.clone();
            let frame = Rc::clone(&frame);
            let pending = Rc::clone(&pending);
            Closure::<dyn Fn()>::new(move || {
                if let Some(handle) = pending.take() {
                    window.clear_timeout_with_handle(handle);
                }
                if !frame.invalidate() {
                    return;
                }
                if let Some(f) = &relayout
                    && let Err(e) = f.call0(&JsValue::NULL)
                {
                    web_sys::console::error_1(&e);
                }
            })
        };

        for (event, listener) in [("scroll", &on_scroll), ("resize", &on_resize)] {
            if let Err(e) = self
                .window
                .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            {
                web_sys::console::error_1(&e);
            }
        }

        WindowSubscription {
            window: self.window.clone(),
            on_scroll,
            on_resize,
            _settle: settle,
            pending,
        }
    }
}

/// Attached scroll and resize listeners. Dropping it removes both and
/// cancels any pending snap.
pub struct WindowSubscription {
    window: Window,
    on_scroll: Closure<dyn Fn()>,
    on_resize: Closure<dyn Fn()>,
    _settle: Closure<dyn Fn()>,
    pending: Rc<Cell<Option<i32>>>,
}

impl Drop for WindowSubscription {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        for (event, listener) in [("scroll", &self.on_scroll), ("resize", &self.on_resize)] {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            {
                web_sys::console::warn_1(&e);
            }
        }
    }
}

fn max_scroll(window: &Window) -> f64 {
    let viewport = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let document_height = window
        .document()
        .and_then(|d| d.document_element())
        .map_or(0.0, |e| f64::from(e.scroll_height()));
    (document_height - viewport).max(0.0)
}

fn animate(
    window: &Window,
    animator: Option<&js_sys::Function>,
    command: &SnapCommand,
    target_px: f64,
) {
    match animator {
        Some(f) => {
            if let Err(e) = f.call3(
                &JsValue::NULL,
                &JsValue::from_f64(target_px),
                &JsValue::from_f64(command.duration),
                &JsValue::from_str(command.ease.name()),
            ) {
                web_sys::console::error_1(&e);
            }
        }
        None => {
            let options = ScrollToOptions::new();
            options.set_top(target_px);
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaulta_protocol::Ease;

    fn command(target: f64) -> SnapCommand {
        SnapCommand {
            target,
            duration: 0.2,
            delay: 0.0,
            ease: Ease::Power2Out,
        }
    }

    #[test]
    fn frame_maps_through_armed_scroll_distance() {
        // Armed against 9000px of scroll; the live page may differ later.
        let frame = SnapFrame::new(9000.0);
        assert_eq!(frame.position(4500.0), Some(0.5));
        assert_eq!(frame.target_px(&command(0.5)), 4500.0);
    }

    #[test]
    fn resize_makes_frame_stale_once() {
        let frame = SnapFrame::new(9000.0);
        assert!(frame.invalidate());
        assert!(!frame.invalidate());
        assert_eq!(frame.position(4600.0), None);
    }

    #[test]
    fn unscrollable_frame_plans_nothing() {
        assert_eq!(SnapFrame::new(0.0).position(10.0), None);
    }
}
