// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! This crate provides histograms which store counts for values across a
//! wide range while guaranteeing a configurable relative precision. Values
//! are bucketed with logarithmic ranges subdivided into linear sub-buckets,
//! which keeps recording constant-time and allocation-free while percentiles
//! and summary statistics remain available without retaining raw samples.
//!
//! The counter type is generic, allowing the memory footprint to be traded
//! against the risk of counters wrapping under very heavy recording.

mod config;
mod counter;
mod error;
mod format;
mod iterators;
mod standard;

pub use counter::*;
pub use error::*;
pub use format::*;
pub use iterators::*;
pub use standard::*;
