// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Counter, Histogram};

mod all;
mod linear;
mod logarithmic;
mod percentile;
mod recorded;

pub use all::*;
pub use linear::*;
pub use logarithmic::*;
pub use percentile::*;
pub use recorded::*;

/// A single reporting step produced while iterating a histogram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationValue {
    pub(crate) value: u64,
    pub(crate) prev_value: u64,
    pub(crate) count_at_value: u64,
    pub(crate) percentile: f64,
    pub(crate) percentile_level_iterated_to: f64,
    pub(crate) count_added_in_this_iteration_step: u64,
    pub(crate) total_count_to_this_value: u64,
    pub(crate) total_value_to_this_value: u64,
}

impl IterationValue {
    /// The value reported for this step.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// The value reported for the previous step, or zero for the first.
    pub fn prev_value(&self) -> u64 {
        self.prev_value
    }

    /// The count recorded at the counter the cursor stopped on.
    pub fn count_at_value(&self) -> u64 {
        self.count_at_value
    }

    /// The percentage of recorded values at or below this step's value.
    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// The percentile level the iteration was seeking when it emitted this
    /// step. Matches `percentile` except for percentile iteration, where it
    /// reports the requested tick level.
    pub fn percentile_level_iterated_to(&self) -> f64 {
        self.percentile_level_iterated_to
    }

    /// The count accumulated since the previous step.
    pub fn count_added_in_this_iteration_step(&self) -> u64 {
        self.count_added_in_this_iteration_step
    }

    /// The running total of counts up to and including this step.
    pub fn total_count_to_this_value(&self) -> u64 {
        self.total_count_to_this_value
    }

    /// The running sum of `count * highest equivalent value` up to and
    /// including this step.
    pub fn total_value_to_this_value(&self) -> u64 {
        self.total_value_to_this_value
    }
}

/// Traversal state shared by every iteration flavor. The cursor walks the
/// counts array one sub-bucket at a time and accumulates running totals; a
/// `Selector` decides where the walk pauses to emit a step.
pub struct Cursor<'a, C> {
    pub(crate) histogram: &'a Histogram<C>,
    pub(crate) current_index: usize,
    pub(crate) current_value_at_index: u64,
    pub(crate) next_value_at_index: u64,
    pub(crate) prev_value_iterated_to: u64,
    pub(crate) total_count_to_prev_index: u64,
    pub(crate) total_count_to_current_index: u64,
    pub(crate) total_value_to_current_index: u64,
    pub(crate) count_at_this_value: u64,
    pub(crate) fresh_sub_bucket: bool,
    pub(crate) array_total_count: u64,
}

impl<'a, C> Cursor<'a, C>
where
    C: Counter,
    u64: From<C>,
{
    fn new(histogram: &'a Histogram<C>) -> Self {
        Self {
            histogram,
            current_index: 0,
            current_value_at_index: 0,
            next_value_at_index: histogram.value_for_index(1),
            prev_value_iterated_to: 0,
            total_count_to_prev_index: 0,
            total_count_to_current_index: 0,
            total_value_to_current_index: 0,
            count_at_this_value: 0,
            fresh_sub_bucket: true,
            // iteration assumes the histogram is not mutated while a cursor
            // is outstanding
            array_total_count: histogram.total_count(),
        }
    }

    fn has_next(&self) -> bool {
        self.total_count_to_current_index < self.array_total_count
    }

    fn exhausted_sub_buckets(&self) -> bool {
        self.current_index >= self.histogram.distinct_values()
    }

    pub(crate) fn last_index(&self) -> usize {
        self.histogram.distinct_values() - 1
    }

    pub(crate) fn current_percentile(&self) -> f64 {
        if self.array_total_count == 0 {
            0.0
        } else {
            100.0 * self.total_count_to_current_index as f64 / self.array_total_count as f64
        }
    }

    fn move_next(&mut self) {
        self.count_at_this_value = self.histogram.count_at_index(self.current_index);
        if self.fresh_sub_bucket {
            self.total_count_to_current_index += self.count_at_this_value;
            self.total_value_to_current_index = self.total_value_to_current_index.wrapping_add(
                self.count_at_this_value
                    .wrapping_mul(self.histogram.highest_equivalent(self.current_value_at_index)),
            );
            self.fresh_sub_bucket = false;
        }
    }

    fn increment_sub_bucket(&mut self) {
        self.fresh_sub_bucket = true;
        self.current_index += 1;
        self.current_value_at_index = self.histogram.value_for_index(self.current_index);
        self.next_value_at_index = self.histogram.value_for_index(self.current_index + 1);
    }
}

/// Decides where a traversal pauses to emit a step and what the step
/// reports. Each iteration flavor supplies its own exit conditions; the
/// cursor mechanics are shared.
pub trait Selector<C>
where
    C: Counter,
    u64: From<C>,
{
    /// Whether reporting steps remain after all recorded counts have been
    /// consumed.
    fn has_extra_step(&mut self, _cursor: &Cursor<'_, C>) -> bool {
        false
    }

    /// Whether the cursor has reached a position this flavor reports on.
    fn reached_iteration_level(&self, cursor: &Cursor<'_, C>) -> bool;

    /// Move the reporting target past the step just emitted.
    fn advance(&mut self, cursor: &Cursor<'_, C>);

    /// The reported value, when it differs from the highest equivalent of
    /// the value at the cursor.
    fn value_iterated_to(&self, _cursor: &Cursor<'_, C>) -> Option<u64> {
        None
    }

    /// The reported percentile level, when it differs from the percentile
    /// at the cursor.
    fn percentile_level_iterated_to(&self) -> Option<f64> {
        None
    }
}

/// An iterator over reporting steps, parameterized by the selector which
/// controls where steps are emitted.
pub struct Iter<'a, C, S> {
    cursor: Cursor<'a, C>,
    selector: S,
}

impl<'a, C, S> Iter<'a, C, S>
where
    C: Counter,
    u64: From<C>,
{
    pub(crate) fn new(histogram: &'a Histogram<C>, selector: S) -> Self {
        Self {
            cursor: Cursor::new(histogram),
            selector,
        }
    }
}

impl<'a, C, S> Iterator for Iter<'a, C, S>
where
    C: Counter,
    S: Selector<C>,
    u64: From<C>,
{
    type Item = IterationValue;

    fn next(&mut self) -> Option<IterationValue> {
        if !(self.cursor.has_next() || self.selector.has_extra_step(&self.cursor)) {
            return None;
        }
        while !self.cursor.exhausted_sub_buckets() {
            self.cursor.move_next();
            if self.selector.reached_iteration_level(&self.cursor) {
                let value = self.selector.value_iterated_to(&self.cursor).unwrap_or_else(|| {
                    self.cursor
                        .histogram
                        .highest_equivalent(self.cursor.current_value_at_index)
                });
                let percentile = self.cursor.current_percentile();
                let step = IterationValue {
                    value,
                    prev_value: self.cursor.prev_value_iterated_to,
                    count_at_value: self.cursor.count_at_this_value,
                    percentile,
                    percentile_level_iterated_to: self
                        .selector
                        .percentile_level_iterated_to()
                        .unwrap_or(percentile),
                    count_added_in_this_iteration_step: self.cursor.total_count_to_current_index
                        - self.cursor.total_count_to_prev_index,
                    total_count_to_this_value: self.cursor.total_count_to_current_index,
                    total_value_to_this_value: self.cursor.total_value_to_current_index,
                };
                self.cursor.prev_value_iterated_to = value;
                self.cursor.total_count_to_prev_index = self.cursor.total_count_to_current_index;
                self.selector.advance(&self.cursor);
                return Some(step);
            }
            self.cursor.increment_sub_bucket();
        }
        None
    }
}
