//! Pipeline module - loading, encoding and the fairness computation

pub mod association;
pub mod encoder;
pub mod error;
pub mod fairness;
pub mod groups;
pub mod loader;
pub mod metrics;

pub use association::*;
pub use encoder::*;
pub use error::*;
pub use fairness::*;
pub use groups::*;
pub use loader::*;
pub use metrics::*;
