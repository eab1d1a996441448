// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::iterators::{Cursor, Selector};
use crate::{Counter, Histogram};

/// Emits steps whose reporting levels start at `value_units_in_first_bucket`
/// and grow by a factor of `log_base` each step.
pub struct LogarithmicBuckets {
    next_value_reporting_level: f64,
    log_base: f64,
    current_step_highest_value_reporting_level: u64,
    current_step_lowest_value_reporting_level: u64,
}

impl LogarithmicBuckets {
    pub(crate) fn new<C>(
        histogram: &Histogram<C>,
        value_units_in_first_bucket: u64,
        log_base: f64,
    ) -> Self
    where
        C: Counter,
        u64: From<C>,
    {
        assert!(
            value_units_in_first_bucket > 0,
            "value units in first bucket must be > 0"
        );
        assert!(log_base > 1.0, "log base must be > 1.0");
        let highest = value_units_in_first_bucket - 1;
        Self {
            next_value_reporting_level: value_units_in_first_bucket as f64,
            log_base,
            current_step_highest_value_reporting_level: highest,
            current_step_lowest_value_reporting_level: histogram.lowest_equivalent(highest),
        }
    }
}

impl<C> Selector<C> for LogarithmicBuckets
where
    C: Counter,
    u64: From<C>,
{
    fn has_extra_step(&mut self, cursor: &Cursor<'_, C>) -> bool {
        cursor
            .histogram
            .lowest_equivalent(self.next_value_reporting_level as u64)
            < cursor.next_value_at_index
    }

    fn reached_iteration_level(&self, cursor: &Cursor<'_, C>) -> bool {
        cursor.current_value_at_index >= self.current_step_lowest_value_reporting_level
            || cursor.current_index == cursor.last_index()
    }

    fn advance(&mut self, cursor: &Cursor<'_, C>) {
        self.next_value_reporting_level *= self.log_base;
        // log_base > 1.0, so the reporting level only grows
        self.current_step_highest_value_reporting_level =
            self.next_value_reporting_level as u64 - 1;
        self.current_step_lowest_value_reporting_level = cursor
            .histogram
            .lowest_equivalent(self.current_step_highest_value_reporting_level);
    }

    fn value_iterated_to(&self, _cursor: &Cursor<'_, C>) -> Option<u64> {
        Some(self.current_step_highest_value_reporting_level)
    }
}
