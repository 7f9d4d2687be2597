use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::catalog::StarCatalog;
use crate::distance::DistanceCache;

/// Summary figures for one finalized route.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Sum of consecutive-pair distances along the route.
    pub total_hop_distance: f32,
    /// Straight-line distance between the route's endpoints.
    pub direct_distance: f32,
    /// `direct / total x 100`; a straight line scores 100.
    pub efficiency: f32,
}

/// Session-lifetime memo of route metrics, keyed by the exact ordered stop
/// sequence. A reversed or reordered route is a different key.
#[derive(Debug, Default)]
pub struct RouteMetricsCache {
    metrics: HashMap<Vec<String>, RouteMetrics>,
}

impl RouteMetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(
        &mut self,
        catalog: &StarCatalog,
        distances: &mut DistanceCache,
        route: &[String],
    ) -> RouteMetrics {
        if let Some(&cached) = self.metrics.get(route) {
            return cached;
        }

        let direct_distance = match (route.first(), route.last()) {
            (Some(first), Some(last)) => distances.distance(catalog, first, last),
            _ => 0.0,
        };
        let total_hop_distance: f32 = route
            .windows(2)
            .map(|pair| distances.distance(catalog, &pair[0], &pair[1]))
            .sum();
        let efficiency = if total_hop_distance > 0.0 {
            direct_distance / total_hop_distance * 100.0
        } else {
            100.0
        };

        let computed = RouteMetrics {
            total_hop_distance,
            direct_distance,
            efficiency,
        };
        self.metrics.insert(route.to_vec(), computed);
        computed
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::StarEntry;

    fn entry(name: &str, pos: [f32; 3]) -> StarEntry {
        StarEntry {
            name: name.into(),
            pos,
            distance_ly: 0.0,
            abs_magnitude: 5.0,
            side_data: Default::default(),
        }
    }

    fn catalog() -> StarCatalog {
        StarCatalog::new(vec![
            entry("A", [0.0, 0.0, 0.0]),
            entry("B", [3.0, 0.0, 0.0]),
            entry("C", [0.0, 4.0, 0.0]),
        ])
    }

    fn names(route: &[&str]) -> Vec<String> {
        route.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn direct_route_is_fully_efficient() {
        let catalog = catalog();
        let mut distances = DistanceCache::new();
        let mut cache = RouteMetricsCache::new();

        let m = cache.metrics(&catalog, &mut distances, &names(&["A", "B"]));
        assert_approx_eq!(m.total_hop_distance, 3.0, 1e-5);
        assert_approx_eq!(m.direct_distance, 3.0, 1e-5);
        assert_approx_eq!(m.efficiency, 100.0, 1e-3);
    }

    #[test]
    fn dogleg_route_loses_efficiency() {
        let catalog = catalog();
        let mut distances = DistanceCache::new();
        let mut cache = RouteMetricsCache::new();

        // A -> C -> B travels 4 + 5 = 9 to cover a direct distance of 3.
        let m = cache.metrics(&catalog, &mut distances, &names(&["A", "C", "B"]));
        assert_approx_eq!(m.total_hop_distance, 9.0, 1e-4);
        assert_approx_eq!(m.direct_distance, 3.0, 1e-5);
        assert_approx_eq!(m.efficiency, 100.0 / 3.0, 1e-3);
        assert!(m.efficiency < 100.0);
    }

    #[test]
    fn empty_route_defaults_to_full_efficiency() {
        let catalog = catalog();
        let mut distances = DistanceCache::new();
        let mut cache = RouteMetricsCache::new();

        let m = cache.metrics(&catalog, &mut distances, &[]);
        assert_eq!(m.total_hop_distance, 0.0);
        assert_eq!(m.efficiency, 100.0);
    }

    #[test]
    fn repeated_queries_hit_the_cache() {
        let catalog = catalog();
        let mut distances = DistanceCache::new();
        let mut cache = RouteMetricsCache::new();

        let route = names(&["A", "C", "B"]);
        let first = cache.metrics(&catalog, &mut distances, &route);
        let second = cache.metrics(&catalog, &mut distances, &route);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        // Reversed stops are a distinct key.
        cache.metrics(&catalog, &mut distances, &names(&["B", "C", "A"]));
        assert_eq!(cache.len(), 2);
    }
}
