//! Report module - displaying and exporting fairness results

pub mod export;
pub mod summary;

pub use export::*;
pub use summary::*;
