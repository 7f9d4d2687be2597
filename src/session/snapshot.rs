use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::data::{self, DataError};
use crate::session::state::ViewToggles;

/// Everything needed to restore a view: camera orientation, filters,
/// toggles, selection, and the user's annotations. One snapshot per slot.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewSnapshot {
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub rotation_z: f32,
    pub pan: [f32; 2],
    pub zoom: f32,
    pub max_distance: f32,
    pub toggles: ViewToggles,
    pub paused: bool,
    pub pivot_star: Option<String>,
    pub selected: Option<String>,
    pub measurements: Vec<(String, String)>,
    pub routes: Vec<Vec<String>>,
    pub saved_at_epoch: u64,
}

/// On-disk slot store: one compressed record per slot under a fixed
/// directory.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        SnapshotStore {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn slot_path(&self, slot: u8) -> PathBuf {
        self.dir.join(format!("view_{slot}.bin"))
    }

    pub fn save(&self, slot: u8, snapshot: &ViewSnapshot) -> Result<(), DataError> {
        fs::create_dir_all(&self.dir)?;
        let bytes = data::serialize_record(snapshot)?;
        fs::write(self.slot_path(slot), bytes)?;
        Ok(())
    }

    /// `Ok(None)` when the slot has never been written.
    pub fn load(&self, slot: u8) -> Result<Option<ViewSnapshot>, DataError> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path)?;
        Ok(Some(data::deserialize_record(&bytes)?))
    }
}

pub fn current_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
