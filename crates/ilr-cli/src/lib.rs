//! Library side of the `ilr` command-line tool.

pub mod logging;
pub mod report;
