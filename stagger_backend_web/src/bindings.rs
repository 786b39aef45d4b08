// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direct global bindings.
//!
//! These skip `web_sys::Window` methods so the hot paths never fetch (and
//! unwrap) the `Window` object.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    pub(crate) fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    pub(crate) fn cancel_animation_frame(id: i32);

    #[wasm_bindgen(js_name = "setTimeout")]
    pub(crate) fn set_timeout(callback: &JsValue, delay_ms: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    pub(crate) fn clear_timeout(id: i32);

    #[wasm_bindgen(js_name = "setInterval")]
    pub(crate) fn set_interval(callback: &JsValue, period_ms: i32) -> i32;

    #[wasm_bindgen(js_name = "clearInterval")]
    pub(crate) fn clear_interval(id: i32);
}
