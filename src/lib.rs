pub mod camera;
pub mod catalog;
pub mod data;
pub mod distance;
pub mod route;
pub mod select;
pub mod session;
pub mod systems;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One star in the catalog. `name` is the primary key; `pos` never changes
/// after loading.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StarEntry {
    pub name: String,
    /// Position in light-years, Sun at the origin.
    pub pos: [f32; 3],
    /// Distance from the origin, denormalized for the render-distance filter.
    pub distance_ly: f32,
    pub abs_magnitude: f32,
    /// Passthrough source columns the engine does not interpret.
    #[serde(default)]
    pub side_data: HashMap<String, String>,
}

impl StarEntry {
    pub fn distance(&self, other: &StarEntry) -> f32 {
        self.distance_to_point(other.pos)
    }

    pub fn distance_to_point(&self, p: [f32; 3]) -> f32 {
        let dx = self.pos[0] - p[0];
        let dy = self.pos[1] - p[1];
        let dz = self.pos[2] - p[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}
