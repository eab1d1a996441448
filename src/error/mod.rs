// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use thiserror::Error;

/// Errors which prevent a histogram from being constructed.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildError {
    #[error("lowest discernible value must be at least 1")]
    /// The lowest discernible value must be at least 1.
    LowIsZero,
    #[error("lowest discernible value must fit in 63 bits")]
    /// The lowest discernible value is too large to index.
    LowExceedsMax,
    #[error("highest trackable value must be at least twice the lowest discernible value")]
    /// The highest trackable value is too small for the requested lowest
    /// discernible value.
    HighLessThanTwiceLow,
    #[error("significant value digits must be in the range 0..=5")]
    /// The requested precision is beyond what the bucketing can provide.
    SigFigExceedsMax,
    #[error("cannot maintain the requested precision at this magnitude")]
    /// The combination of lowest discernible value and precision does not
    /// leave enough bits to index the counts array.
    CannotRepresentPrecision,
}

/// Errors returned when recording into a histogram.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("value outside of histogram range with resizing disabled")]
    /// The value does not fit within the covered range and the histogram is
    /// not permitted to resize.
    OutOfRange,
}
