//! Application module: the presentation-layer model driven by the runtime.
//!
//! `App` lives in `app::model`; it never talks to the network or the audio
//! backend itself.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
