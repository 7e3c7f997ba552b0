pub mod column;
pub mod registry;
pub mod timeseries;
pub mod timestamp;

pub use column::{Column, ColumnEntry};
pub use registry::SeriesRegistry;
pub use timeseries::{Datapoint, Series};
