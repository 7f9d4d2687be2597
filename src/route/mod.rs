pub mod metrics;
pub mod planner;

pub use metrics::{RouteMetrics, RouteMetricsCache};
pub use planner::plan_route;
