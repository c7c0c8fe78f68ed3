//! Library side of the `sheetmap` command-line tool.

pub mod ingest;
pub mod logging;
pub mod pipeline;
