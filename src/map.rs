//! Map adapter boundary. The core only talks to `MapPort`; the widget itself
//! lives in JS and may not exist yet when the simulation starts, so it is
//! handed in from the host page via `attachMap` and looked up every tick.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::util::clog;

pub trait MapPort {
    fn pan_by(&mut self, dx: f64, dy: f64);
    fn pan_to(&mut self, lat: f64, lng: f64);
    fn get_zoom(&self) -> i32;
    fn set_zoom(&mut self, zoom: i32);
    /// Current map center as (lat, lng) degrees.
    fn get_center(&self) -> (f64, f64);
}

thread_local! {
    static MAP: RefCell<Option<JsValue>> = const { RefCell::new(None) };
}

/// Called by the host page once the external map widget is ready (and again
/// with `null` to detach it). The simulation never blocks on this.
#[wasm_bindgen(js_name = attachMap)]
pub fn attach_map(map: JsValue) {
    let attached = !(map.is_null() || map.is_undefined());
    MAP.with(|m| *m.borrow_mut() = attached.then_some(map));
    clog(if attached { "map attached" } else { "map detached" });
}

/// The currently attached widget, if any.
pub fn current() -> Option<JsMap> {
    MAP.with(|m| m.borrow().clone()).map(|obj| JsMap { obj })
}

/// `MapPort` over an untyped JS map object exposing the google.maps-style
/// methods panBy/panTo/getZoom/setZoom/getCenter. Missing methods degrade to
/// no-ops rather than erroring.
pub struct JsMap {
    obj: JsValue,
}

impl JsMap {
    fn method(&self, name: &str) -> Option<js_sys::Function> {
        js_sys::Reflect::get(&self.obj, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<js_sys::Function>()
            .ok()
    }

    fn call0(&self, name: &str) -> Option<JsValue> {
        self.method(name)?.call0(&self.obj).ok()
    }

    fn call2(&self, name: &str, a: f64, b: f64) {
        if let Some(f) = self.method(name) {
            let _ = f.call2(&self.obj, &JsValue::from_f64(a), &JsValue::from_f64(b));
        }
    }

    /// Read a LatLng-ish coordinate: either a `lat()` method or a `lat` number.
    fn coord(obj: &JsValue, key: &str) -> Option<f64> {
        let v = js_sys::Reflect::get(obj, &JsValue::from_str(key)).ok()?;
        if let Some(f) = v.dyn_ref::<js_sys::Function>() {
            f.call0(obj).ok()?.as_f64()
        } else {
            v.as_f64()
        }
    }
}

impl MapPort for JsMap {
    fn pan_by(&mut self, dx: f64, dy: f64) {
        self.call2("panBy", dx, dy);
    }

    fn pan_to(&mut self, lat: f64, lng: f64) {
        self.call2("panTo", lat, lng);
    }

    fn get_zoom(&self) -> i32 {
        self.call0("getZoom")
            .and_then(|v| v.as_f64())
            .map(|z| z as i32)
            .unwrap_or(0)
    }

    fn set_zoom(&mut self, zoom: i32) {
        if let Some(f) = self.method("setZoom") {
            let _ = f.call1(&self.obj, &JsValue::from_f64(f64::from(zoom)));
        }
    }

    fn get_center(&self) -> (f64, f64) {
        self.call0("getCenter")
            .and_then(|c| Some((Self::coord(&c, "lat")?, Self::coord(&c, "lng")?)))
            .unwrap_or((0.0, 0.0))
    }
}

/// Test double recording every call the translator makes.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingMap {
    pub zoom: i32,
    pub center: (f64, f64),
    pub pan_by_calls: Vec<(f64, f64)>,
    pub pan_to_calls: Vec<(f64, f64)>,
    pub zoom_calls: Vec<i32>,
}

#[cfg(test)]
impl MapPort for RecordingMap {
    fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_by_calls.push((dx, dy));
    }

    fn pan_to(&mut self, lat: f64, lng: f64) {
        self.pan_to_calls.push((lat, lng));
        self.center = (lat, lng);
    }

    fn get_zoom(&self) -> i32 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: i32) {
        self.zoom_calls.push(zoom);
        self.zoom = zoom;
    }

    fn get_center(&self) -> (f64, f64) {
        self.center
    }
}

#[cfg(test)]
impl RecordingMap {
    pub fn total_calls(&self) -> usize {
        self.pan_by_calls.len() + self.pan_to_calls.len() + self.zoom_calls.len()
    }
}
