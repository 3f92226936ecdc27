//! Browser platform layer
//!
//! Periodic driver backed by `setInterval`. Owning an [`Interval`] keeps the
//! timer alive; dropping it clears the timer.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// A running `setInterval` timer
pub struct Interval {
    handle: i32,
    callback: Option<Closure<dyn FnMut()>>,
}

impl Interval {
    /// Start calling `on_tick` every `period_ms` milliseconds
    pub fn new(period_ms: u32, on_tick: impl FnMut() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let callback = Closure::<dyn FnMut()>::new(on_tick);
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                period_ms as i32,
            )
            .map_err(|e| log::warn!("setInterval failed: {:?}", e))
            .ok()?;
        log::debug!("Interval {} armed ({}ms)", handle, period_ms);
        Some(Self {
            handle,
            callback: Some(callback),
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        window.clear_interval_with_handle(self.handle);
        log::debug!("Interval {} cleared", self.handle);

        // The callback may be the one dropping us; free it on the next turn
        if let Some(callback) = self.callback.take() {
            let release = Closure::once_into_js(move || drop(callback));
            let _ = window.set_timeout_with_callback(release.unchecked_ref());
        }
    }
}

/// Milliseconds since the Unix epoch
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}
