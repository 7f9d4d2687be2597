use std::collections::HashMap;

use crate::camera::camera::{CameraState, ScreenPoint};
use crate::catalog::catalog::StarCatalog;

/// Projected screen coordinates for every star visible this frame.
///
/// Rebuilt from scratch at the start of each frame and passed explicitly to
/// selection and drawing consumers, so everything in one frame reads the
/// same snapshot. Must not be held across frames.
#[derive(Clone, Debug, Default)]
pub struct FrameProjection {
    coords: HashMap<String, ScreenPoint>,
}

impl FrameProjection {
    pub fn capture(catalog: &StarCatalog, camera: &CameraState, max_distance: f32) -> Self {
        let coords = catalog
            .within_filter(max_distance)
            .map(|star| (star.name.clone(), camera.project(star.pos)))
            .collect();
        FrameProjection { coords }
    }

    pub fn get(&self, name: &str) -> Option<ScreenPoint> {
        self.coords.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ScreenPoint)> {
        self.coords.iter()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}
