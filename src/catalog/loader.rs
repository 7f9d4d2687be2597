//! Row-level ingestion helpers shared by the catalog builder.
//!
//! Positions come from galactic longitude/latitude when the source row
//! carries them; otherwise the star is placed at a uniformly random point on
//! the sphere of its distance. The random fallback is documented behavior of
//! the source data, not a defect: some catalog rows simply have no
//! coordinates.

use std::collections::HashMap;

use rand::Rng;

use crate::StarEntry;

/// Absolute magnitude assumed when the source column is missing or
/// unparseable.
pub const DEFAULT_ABS_MAGNITUDE: f32 = 10.0;

/// One source row after column extraction, before position resolution.
#[derive(Clone, Debug, Default)]
pub struct RawStarRow {
    pub name: String,
    pub distance_ly: Option<f32>,
    pub abs_magnitude: Option<f32>,
    pub galactic_l_deg: Option<f32>,
    pub galactic_b_deg: Option<f32>,
    pub side_data: HashMap<String, String>,
}

/// Convert galactic longitude/latitude (degrees) at a distance into
/// Cartesian light-years.
pub fn galactic_to_cartesian(distance_ly: f32, l_deg: f32, b_deg: f32) -> [f32; 3] {
    let l = l_deg.to_radians();
    let b = b_deg.to_radians();
    [
        distance_ly * b.cos() * l.cos(),
        distance_ly * b.cos() * l.sin(),
        distance_ly * b.sin(),
    ]
}

/// Uniform placement at the requested radius for rows without coordinates.
pub fn random_position_at_distance(distance_ly: f32) -> [f32; 3] {
    let mut rng = rand::thread_rng();
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    let phi = rng.gen::<f32>() * std::f32::consts::PI - std::f32::consts::FRAC_PI_2;
    [
        distance_ly * phi.cos() * theta.cos(),
        distance_ly * phi.cos() * theta.sin(),
        distance_ly * phi.sin(),
    ]
}

/// Resolve one source row into a catalog entry.
///
/// Rows without a parseable distance, or beyond `max_distance`, yield `None`
/// and are skipped. The Sun is always pinned to the origin regardless of
/// what the source row says.
pub fn entry_from_row(row: RawStarRow, max_distance: f32) -> Option<StarEntry> {
    let distance = row.distance_ly?;
    if distance > max_distance {
        return None;
    }

    let pos = if row.name == "Sun" {
        [0.0, 0.0, 0.0]
    } else {
        match (row.galactic_l_deg, row.galactic_b_deg) {
            (Some(l), Some(b)) => galactic_to_cartesian(distance, l, b),
            _ => random_position_at_distance(distance),
        }
    };

    Some(StarEntry {
        name: row.name,
        pos,
        distance_ly: distance,
        abs_magnitude: row.abs_magnitude.unwrap_or(DEFAULT_ABS_MAGNITUDE),
        side_data: row.side_data,
    })
}
