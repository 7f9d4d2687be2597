use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use log::info;
use once_cell::sync::Lazy;
use serde::Serialize;
use starhop_engine::catalog::catalog::StarCatalog;
use starhop_engine::catalog::loader::galactic_to_cartesian;
use starhop_engine::data::read_catalog_from_file;
use starhop_engine::session::state::{Action, SessionState, MAX_RENDER_DISTANCE};
use starhop_engine::StarEntry;

const SNAPSHOT_DIR: &str = "saved_views";

static DEMO_CATALOG: Lazy<StarCatalog> = Lazy::new(|| {
    // Small built-in neighborhood; pass a catalog bundle path for real data.
    fn star(name: &str, distance_ly: f32, l_deg: f32, b_deg: f32, abs_magnitude: f32) -> StarEntry {
        StarEntry {
            name: name.into(),
            pos: galactic_to_cartesian(distance_ly, l_deg, b_deg),
            distance_ly,
            abs_magnitude,
            side_data: Default::default(),
        }
    }
    StarCatalog::new(vec![
        StarEntry {
            name: "Sun".into(),
            pos: [0.0, 0.0, 0.0],
            distance_ly: 0.0,
            abs_magnitude: 4.83,
            side_data: Default::default(),
        },
        star("Proxima Centauri", 4.25, 313.94, -1.93, 15.53),
        star("Alpha Centauri A", 4.34, 315.73, -0.68, 4.38),
        star("Alpha Centauri B", 4.34, 315.73, -0.68, 5.71),
        star("Barnard's Star", 5.96, 31.01, 14.06, 13.22),
        star("Wolf 359", 7.86, 244.05, 56.12, 16.60),
        star("Lalande 21185", 8.31, 185.12, 65.43, 10.48),
        star("Sirius A", 8.66, 227.23, -8.89, 1.45),
        star("Sirius B", 8.66, 227.23, -8.89, 11.34),
        star("Ross 154", 9.70, 11.31, -10.28, 13.07),
        star("Epsilon Eridani", 10.48, 195.84, -48.05, 6.19),
        star("Procyon A", 11.46, 213.70, 13.02, 2.66),
        star("Tau Ceti", 11.91, 173.10, -73.44, 5.68),
    ])
});

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SessionReply {
    State {
        selected: Option<String>,
        pivot_star: Option<String>,
        measurements: usize,
        routes: Vec<RouteSummary>,
        zoom: f32,
        max_distance: f32,
        paused: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Serialize)]
struct RouteSummary {
    stops: Vec<String>,
    total_hop_distance: f32,
    direct_distance: f32,
    efficiency: f32,
}

fn state_reply(session: &mut SessionState, status: Option<String>) -> SessionReply {
    let stored = session.routes.clone();
    let routes = stored
        .iter()
        .map(|route| {
            let metrics = session.route_metrics(route);
            RouteSummary {
                stops: route.clone(),
                total_hop_distance: metrics.total_hop_distance,
                direct_distance: metrics.direct_distance,
                efficiency: metrics.efficiency,
            }
        })
        .collect();

    SessionReply::State {
        selected: session.selected.clone(),
        pivot_star: session.pivot_star.clone(),
        measurements: session.measurements.len(),
        routes,
        zoom: session.camera.zoom,
        max_distance: session.max_distance,
        paused: session.paused,
        status,
    }
}

/// Headless session driver: one JSON action per stdin line, one JSON reply
/// per action. The windowed renderer drives the same `SessionState` API.
fn main() -> Result<()> {
    env_logger::init();

    let catalog = match env::args().nth(1) {
        Some(path) => read_catalog_from_file(&path)
            .with_context(|| format!("failed to read catalog bundle from {path}"))?,
        None => DEMO_CATALOG.clone(),
    };
    info!("catalog ready with {} stars", catalog.len());

    let mut session = SessionState::new(catalog, MAX_RENDER_DISTANCE, SNAPSHOT_DIR);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<Action>(&line) {
            Ok(Action::Quit) => break,
            Ok(action) => {
                // Each action sees the frame the renderer would have drawn
                // from: one projection snapshot per loop turn.
                let frame = session.capture_frame();
                let status = session.handle(action, &frame);
                state_reply(&mut session, status)
            }
            Err(err) => SessionReply::Error {
                message: format!("unrecognized action: {err}"),
            },
        };

        serde_json::to_writer(&mut stdout, &reply)?;
        stdout.write_all(b"\n")?;
    }

    Ok(())
}
