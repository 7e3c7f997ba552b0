pub mod controller;
pub mod snapshot;

pub use controller::{StreamController, StreamEvent, StreamState};
pub use snapshot::{fetch_snapshot, Snapshot, SnapshotSeries};
