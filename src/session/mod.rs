pub mod snapshot;
pub mod state;

pub use snapshot::{SnapshotStore, ViewSnapshot};
pub use state::{Action, SessionState, ViewFeature, ViewToggles};
