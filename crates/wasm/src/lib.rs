mod source;

use vaulta_core::config::parse_snap_config;
use vaulta_core::snap::{self, ExtentStore, Readiness, Refresh, SnapController};
use vaulta_protocol::{PinnedRange, ScrollExtent, SnapConfig};
use wasm_bindgen::prelude::*;

use crate::source::WindowScrollSource;

/// Resolve a snap target. `ranges_json` is an array of `{start, end}`
/// sorted by `start`.
#[wasm_bindgen]
pub fn resolve_snap(position: f64, ranges_json: &str, buffer: f64) -> Result<f64, JsError> {
    let ranges: Vec<PinnedRange> =
        serde_json::from_str(ranges_json).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(snap::resolve(position, &ranges, buffer))
}

/// Page-level snap controller bound to the browser window.
///
/// Lifecycle: call `begin_layout(n)` with the number of pinned sections,
/// then `report_section` once per section after its timeline is built.
/// The snap arms itself when the last section reports. A window resize
/// disables the armed snap at once and calls `relayout`, which should
/// re-measure and call `begin_layout` again; the stale subscription is
/// dropped there. `free()` (or garbage collection) detaches everything.
#[wasm_bindgen]
pub struct PageSnap {
    controller: SnapController<WindowScrollSource, ExtentStore>,
}

#[wasm_bindgen]
impl PageSnap {
    /// `config_json` may be omitted for defaults. `animator`, when given,
    /// is called as `animator(targetPx, durationSeconds, easeName)`.
    /// `relayout`, when given, is called with no arguments after a resize.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: Option<String>,
        animator: Option<js_sys::Function>,
        relayout: Option<js_sys::Function>,
    ) -> Result<PageSnap, JsError> {
        console_error_panic_hook::set_once();

        let config = match config_json {
            Some(json) => {
                parse_snap_config(json.as_bytes()).map_err(|e| JsError::new(&e.to_string()))?
            }
            None => SnapConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let source = WindowScrollSource::new(window, animator, relayout);
        Ok(Self {
            controller: SnapController::new(source, ExtentStore::new(), config),
        })
    }

    /// Start a layout pass expecting `sections` reports.
    pub fn begin_layout(&mut self, sections: usize) {
        self.controller.registry_mut().expect(sections);
        if self.controller.refresh() == Refresh::Deferred {
            web_sys::console::debug_1(
                &format!("vaulta: waiting for {sections} pinned sections").into(),
            );
        }
    }

    /// Record one section's pinned pixel extent. Returns `true` once the
    /// snap is armed for this layout pass.
    pub fn report_section(&mut self, id: &str, start: f64, end: f64) -> bool {
        let readiness = self
            .controller
            .registry_mut()
            .report(id, ScrollExtent::new(start, end));
        match readiness {
            Readiness::Pending { .. } => false,
            Readiness::Settled => {
                matches!(self.controller.refresh(), Refresh::Armed { .. })
            }
        }
    }

    /// Resolve against the armed ranges; identity when unarmed.
    pub fn resolve(&self, position: f64) -> f64 {
        self.controller.resolve(position)
    }

    /// Armed ranges as JSON, or `null` when unarmed.
    pub fn ranges_json(&self) -> Result<String, JsError> {
        let ranges = self.controller.ranges();
        let ranges = ranges.as_ref().map(|r| r.ranges());
        serde_json::to_string(&ranges).map_err(|e| JsError::new(&e.to_string()))
    }

    pub fn generation(&self) -> u64 {
        self.controller.generation()
    }

    pub fn is_armed(&self) -> bool {
        self.controller.is_armed()
    }

    /// Detach the snap without discarding the controller.
    pub fn teardown(&mut self) {
        self.controller.teardown();
    }
}
