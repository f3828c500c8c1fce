//! CLI library components for the perinatal dataset filter.

pub mod io;
pub mod logging;
