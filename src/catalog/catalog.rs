use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::StarEntry;

/// Fixed set of stars available to routing, selection, and distance
/// operations. Name-indexed; positions do not move for the process lifetime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StarCatalog {
    pub stars: Vec<StarEntry>,
    #[serde(skip)]
    name_index: HashMap<String, usize>,
}

impl StarCatalog {
    pub fn new(stars: Vec<StarEntry>) -> Self {
        let mut catalog = StarCatalog {
            stars,
            name_index: HashMap::new(),
        };
        catalog.rebuild_indices();
        catalog
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&StarEntry> {
        self.index_of_name(name).map(|idx| &self.stars[idx])
    }

    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StarEntry> {
        self.stars.iter()
    }

    /// Stars within the active render-distance filter, in catalog order.
    pub fn within_filter(&self, max_distance: f32) -> impl Iterator<Item = &StarEntry> {
        self.stars
            .iter()
            .filter(move |star| star.distance_ly <= max_distance)
    }

    pub fn rebuild_indices(&mut self) {
        self.name_index = self
            .stars
            .iter()
            .enumerate()
            .map(|(idx, star)| (star.name.clone(), idx))
            .collect();
    }
}
