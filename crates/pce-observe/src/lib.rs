//! Logging setup shared by the export binaries.
//!
//! Everything in the workspace logs through `tracing`; this crate only decides
//! where those events go and how they are rendered.
mod logger;
pub use logger::*;
