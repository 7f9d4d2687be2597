use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::DataError;

/// Membership record for one component of a multiple star system.
///
/// Consumed by the inset renderer only; the engine treats this as an opaque
/// lookup and never bases routing or selection on it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SystemMembership {
    pub system_name: String,
    pub component: String,
    #[serde(default)]
    pub separation: Option<String>,
    pub system_components: u32,
    #[serde(default)]
    pub system_distance: Option<f32>,
}

/// Name-keyed lookup of system membership, loaded from the mapping file the
/// catalog preprocessing step emits.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SystemIndex {
    members: HashMap<String, SystemMembership>,
}

impl SystemIndex {
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let members: HashMap<String, SystemMembership> = serde_json::from_str(json)?;
        Ok(SystemIndex { members })
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, name: &str) -> Option<&SystemMembership> {
        self.members.get(name)
    }

    pub fn is_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
