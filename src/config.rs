//! Tunable constants for the leash controller. Two presets: the pixel-panning
//! `classic` setup and the `geographic` setup with zoom-compensated panning.
//! Everything here can also be overridden at startup from a JSON blob.

use serde::{Deserialize, Serialize};

/// Web-mercator degrees per screen pixel at zoom level 23 (360 / (256 * 2^23)).
/// Base factor for the zoom-compensated pan formula.
pub const DEG_PER_PIXEL_Z23: f64 = 360.0 / (256.0 * 8_388_608.0);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyParams {
    pub radius: f64,
    pub mass: f64,
    pub linear_damping: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainParams {
    pub rest_length: f64,
    /// 1.0 (or more) means a rigid rod; below 1.0 the link is a spring.
    pub stiffness: f64,
    pub damping: f64,
}

/// How collision penetration translates into map movement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PanMode {
    /// Pixel pan: `scale * depth`, accrued and flushed on the stagger interval.
    Pixel { scale: f64 },
    /// Geographic pan: `depth * k1 * k2^(23 - zoom)` degrees, applied
    /// immediately to the map center with the latitude clamped to
    /// `±lat_clamp` so the projection never reaches the poles.
    Geographic { k1: f64, k2: f64, lat_clamp: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeashConfig {
    pub wall_thickness: f64,
    pub handle: BodyParams,
    pub collider: BodyParams,
    pub chain: ChainParams,
    pub gravity_y: f64,
    /// Contacts shallower than this are treated as noise and ignored.
    pub min_separation: f64,
    /// Below this handle-collider distance no side classification is made.
    pub rotation_min_distance: f64,
    pub pan: PanMode,
    /// When set, zoom is suppressed while the pointer is within this many
    /// pixels of any viewport edge.
    pub edge_margin: Option<f64>,
    pub pan_flush_ms: u32,
    pub step_ms: u32,
    /// Re-center handle and collider when the viewport is resized.
    pub recenter_on_resize: bool,
}

impl LeashConfig {
    /// Pixel-panning setup: small chain, panBy with a linear scale.
    pub fn classic() -> Self {
        LeashConfig {
            wall_thickness: 1024.0,
            handle: BodyParams { radius: 5.0, mass: 1.0, linear_damping: 60.0 },
            // damping 3.8/s matches a per-frame air friction of 0.06 at 60 Hz
            collider: BodyParams { radius: 10.0, mass: 100.0, linear_damping: 3.8 },
            chain: ChainParams { rest_length: 15.0, stiffness: 1.0, damping: 0.5 },
            gravity_y: 981.0,
            min_separation: 1.0,
            rotation_min_distance: 80.0,
            pan: PanMode::Pixel { scale: 30.0 },
            edge_margin: None,
            pan_flush_ms: 50,
            step_ms: 7,
            recenter_on_resize: true,
        }
    }

    /// Geographic setup: bigger chain, zoom-compensated panTo, edge-aware zoom.
    pub fn geographic() -> Self {
        LeashConfig {
            wall_thickness: 1024.0,
            handle: BodyParams { radius: 10.0, mass: 1.0, linear_damping: 60.0 },
            collider: BodyParams { radius: 30.0, mass: 100.0, linear_damping: 3.8 },
            chain: ChainParams { rest_length: 50.0, stiffness: 1.0, damping: 0.5 },
            gravity_y: 981.0,
            min_separation: 1.0,
            rotation_min_distance: 80.0,
            pan: PanMode::Geographic { k1: DEG_PER_PIXEL_Z23, k2: 2.0, lat_clamp: 80.0 },
            edge_margin: Some(100.0),
            pan_flush_ms: 50,
            step_ms: 7,
            recenter_on_resize: false,
        }
    }

    pub fn step_dt(&self) -> f64 {
        f64::from(self.step_ms) / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_in_geometry_and_pan_mode() {
        let classic = LeashConfig::classic();
        let geo = LeashConfig::geographic();
        assert_eq!(classic.handle.radius, 5.0);
        assert_eq!(classic.collider.radius, 10.0);
        assert_eq!(classic.chain.rest_length, 15.0);
        assert_eq!(geo.handle.radius, 10.0);
        assert_eq!(geo.collider.radius, 30.0);
        assert_eq!(geo.chain.rest_length, 50.0);
        assert!(matches!(classic.pan, PanMode::Pixel { scale } if scale == 30.0));
        assert!(matches!(geo.pan, PanMode::Geographic { lat_clamp, .. } if lat_clamp == 80.0));
        assert!(classic.edge_margin.is_none());
        assert_eq!(geo.edge_margin, Some(100.0));
    }

    #[test]
    fn startup_override_parses() {
        let json = serde_json::to_string(&LeashConfig::geographic()).unwrap();
        let parsed: LeashConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, LeashConfig::geographic());
    }

    #[test]
    fn step_dt_is_seconds() {
        assert!((LeashConfig::classic().step_dt() - 0.007).abs() < 1e-12);
    }
}
