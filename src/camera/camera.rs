use serde::{Deserialize, Serialize};

pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1024;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 768;

/// Pixels per light-year at zoom level 1.
pub const DEFAULT_ZOOM: f32 = 40.0;
pub const MIN_ZOOM: f32 = 5.0;
pub const MAX_ZOOM: f32 = 400.0;
/// Multiplier applied per zoom step.
pub const ZOOM_STEP: f32 = 1.1;

/// Depth cue: objects with positive rotated Z appear larger.
pub const DEPTH_SIZE_GAIN: f32 = 0.1;

/// Ratio of clickable halo to rendered size.
pub const GLOW_FACTOR: f32 = 1.8;

/// Projected position of one star, plus its depth-derived size factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub size_factor: f32,
}

/// Rendered radius in pixels for a star of the given absolute magnitude.
pub fn rendered_size(abs_magnitude: f32) -> f32 {
    15.0 - (abs_magnitude + 5.0) * (13.0 / 20.0)
}

/// Clickable radius, matched to the drawn glow so hit area follows visible
/// size. Never smaller than 5 px.
pub fn hit_radius(abs_magnitude: f32) -> f32 {
    (rendered_size(abs_magnitude) * GLOW_FACTOR).max(5.0)
}

/// Camera for the world-to-screen transform: rotation about three axes
/// around a pivot point, a 2D pan offset, and a zoom scalar. Angles are
/// unbounded radians; nothing wraps them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CameraState {
    pub width: u32,
    pub height: u32,
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub rotation_z: f32,
    /// World point the rotation is computed around.
    pub pivot: [f32; 3],
    /// Screen-space pan in pixels.
    pub pan: [f32; 2],
    /// Pixels per light-year.
    pub zoom: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
    }
}

impl CameraState {
    pub fn new(width: u32, height: u32) -> Self {
        CameraState {
            width,
            height,
            rotation_x: 0.0,
            rotation_y: 0.0,
            rotation_z: 0.0,
            pivot: [0.0, 0.0, 0.0],
            pan: [0.0, 0.0],
            zoom: DEFAULT_ZOOM,
        }
    }

    /// World coordinates to screen coordinates.
    ///
    /// The rotations are applied sequentially about X, then Y, then Z; the
    /// order is part of the contract, since the three planar rotations do
    /// not commute. Screen Y grows downward, so world Y is inverted on the
    /// way out.
    pub fn project(&self, pos: [f32; 3]) -> ScreenPoint {
        let mut rel_x = pos[0] - self.pivot[0];
        let mut rel_y = pos[1] - self.pivot[1];
        let mut rel_z = pos[2] - self.pivot[2];

        let (sin_x, cos_x) = self.rotation_x.sin_cos();
        let (sin_y, cos_y) = self.rotation_y.sin_cos();
        let (sin_z, cos_z) = self.rotation_z.sin_cos();

        // Rotation about X
        let y_rot = rel_y * cos_x - rel_z * sin_x;
        let z_rot = rel_y * sin_x + rel_z * cos_x;
        rel_y = y_rot;
        rel_z = z_rot;

        // Rotation about Y
        let x_rot = rel_x * cos_y + rel_z * sin_y;
        let z_rot = -rel_x * sin_y + rel_z * cos_y;
        rel_x = x_rot;
        rel_z = z_rot;

        // Rotation about Z
        let x_rot = rel_x * cos_z - rel_y * sin_z;
        let y_rot = rel_x * sin_z + rel_y * cos_z;
        rel_x = x_rot;
        rel_y = y_rot;

        ScreenPoint {
            x: (self.width as f32 * 0.5) + rel_x * self.zoom + self.pan[0],
            y: (self.height as f32 * 0.5) - rel_y * self.zoom + self.pan[1],
            size_factor: 1.0 + rel_z * DEPTH_SIZE_GAIN,
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }
}
