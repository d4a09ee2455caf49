//! Input/output helpers.
//!
//! - multi-axis offsets ingest (`axes`)
//! - rectangular table ingest (`table`)
//! - per-site result exports (CSV) (`export`)
//! - curve JSON read/write (`curve`)

pub mod axes;
pub mod curve;
pub mod export;
pub mod table;

pub use axes::*;
pub use curve::*;
pub use export::*;
pub use table::*;
