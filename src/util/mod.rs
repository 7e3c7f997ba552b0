pub mod rolling_buffer;

pub use rolling_buffer::RollingBuffer;
