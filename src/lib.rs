//! fairlens: Group Fairness Metrics Library
//!
//! A library for measuring how an outcome differs across the groups of a
//! demographic attribute, using statistical parity difference, disparate
//! impact and an association statistic combined into a weighted score.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
