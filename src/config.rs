//! Configuration loader and schema types.
//!
//! Settings drive the catalog client, the playback controller and the TUI.
//! Every section has defaults, so a missing file is not an error.

mod load;
mod schema;

pub use load::default_log_dir;
pub use schema::*;
