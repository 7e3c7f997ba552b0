pub mod config;
pub mod data_handling;
pub mod error;
pub mod feed;
pub mod logging;
pub mod render;
pub mod util;

pub use config::AppConfig;
pub use data_handling::{Column, ColumnEntry, Datapoint, Series, SeriesRegistry};
pub use error::{FeedError, FeedResult};
pub use feed::{fetch_snapshot, Snapshot, StreamController, StreamEvent, StreamState};
pub use render::{ChartOptions, Dataset, JsonRenderer, LogRenderer, Renderer};

pub struct Settings {}

impl Settings {
    // Liveness probe sent right after the socket opens. The peer ignores it.
    pub const HANDSHAKE: &'static str = "Ping";
    pub const DEFAULT_MAX_TICKS_X: usize = 20;
}
