// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::iterators::{Cursor, Selector};
use crate::{Counter, Histogram};

/// Emits a step for every `value_units_per_bucket`-sized slice of the value
/// range. When a slice is narrower than the sub-bucket it falls in, multiple
/// steps are emitted from the same sub-bucket; iteration continues until the
/// next step would leave the last populated sub-bucket.
pub struct LinearBuckets {
    value_units_per_bucket: u64,
    current_step_highest_value_reporting_level: u64,
    current_step_lowest_value_reporting_level: u64,
}

impl LinearBuckets {
    pub(crate) fn new<C>(histogram: &Histogram<C>, value_units_per_bucket: u64) -> Self
    where
        C: Counter,
        u64: From<C>,
    {
        assert!(
            value_units_per_bucket > 0,
            "value units per bucket must be > 0"
        );
        let highest = value_units_per_bucket - 1;
        Self {
            value_units_per_bucket,
            current_step_highest_value_reporting_level: highest,
            current_step_lowest_value_reporting_level: histogram.lowest_equivalent(highest),
        }
    }
}

impl<C> Selector<C> for LinearBuckets
where
    C: Counter,
    u64: From<C>,
{
    fn has_extra_step(&mut self, cursor: &Cursor<'_, C>) -> bool {
        self.current_step_highest_value_reporting_level < cursor.next_value_at_index
    }

    fn reached_iteration_level(&self, cursor: &Cursor<'_, C>) -> bool {
        cursor.current_value_at_index >= self.current_step_lowest_value_reporting_level
            || cursor.current_index == cursor.last_index()
    }

    fn advance(&mut self, cursor: &Cursor<'_, C>) {
        self.current_step_highest_value_reporting_level += self.value_units_per_bucket;
        self.current_step_lowest_value_reporting_level = cursor
            .histogram
            .lowest_equivalent(self.current_step_highest_value_reporting_level);
    }

    fn value_iterated_to(&self, _cursor: &Cursor<'_, C>) -> Option<u64> {
        Some(self.current_step_highest_value_reporting_level)
    }
}
