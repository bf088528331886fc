//! CLI library components for fuiman.

pub mod logging;
pub mod pipeline;
