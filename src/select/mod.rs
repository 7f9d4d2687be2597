use crate::camera::camera::hit_radius;
use crate::camera::frame::FrameProjection;
use crate::catalog::catalog::StarCatalog;
use crate::StarEntry;

/// Find the star under a screen point, if any.
///
/// Works off the frame's projected coordinates — the same snapshot the
/// renderer drew from — so the clickable area is pixel-identical to what is
/// on screen. A star qualifies when the click falls inside its
/// magnitude-derived hit radius; the closest qualifying star wins.
pub fn pick_nearest<'a>(
    catalog: &'a StarCatalog,
    frame: &FrameProjection,
    point: [f32; 2],
    max_distance: f32,
) -> Option<&'a StarEntry> {
    let mut closest: Option<&StarEntry> = None;
    let mut closest_distance = f32::INFINITY;

    for (name, projected) in frame.iter() {
        let Some(star) = catalog.get(name) else {
            continue;
        };
        if star.distance_ly > max_distance {
            continue;
        }

        let dx = point[0] - projected.x;
        let dy = point[1] - projected.y;
        let click_distance = (dx * dx + dy * dy).sqrt();

        if click_distance < hit_radius(star.abs_magnitude) && click_distance < closest_distance {
            closest_distance = click_distance;
            closest = Some(star);
        }
    }

    closest
}
