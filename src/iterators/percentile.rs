// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::iterators::{Cursor, Selector};
use crate::Counter;

/// Emits a step each time the cumulative percentile crosses the next
/// reporting tick. Tick spacing halves as the distance to 100% halves, so
/// reporting points stay visually even across an exponentially shrinking
/// tail. A terminal tick at 100% is always emitted for a non-empty
/// histogram.
pub struct Percentiles {
    ticks_per_half_distance: u32,
    percentile_level_to_iterate_to: f64,
    reached_last_recorded_value: bool,
}

impl Percentiles {
    pub(crate) fn new(ticks_per_half_distance: u32) -> Self {
        assert!(
            ticks_per_half_distance > 0,
            "ticks per half distance must be > 0"
        );
        Self {
            ticks_per_half_distance,
            percentile_level_to_iterate_to: 0.0,
            reached_last_recorded_value: false,
        }
    }
}

impl<C> Selector<C> for Percentiles
where
    C: Counter,
    u64: From<C>,
{
    fn has_extra_step(&mut self, cursor: &Cursor<'_, C>) -> bool {
        if self.reached_last_recorded_value || cursor.array_total_count == 0 {
            return false;
        }
        self.percentile_level_to_iterate_to = 100.0;
        self.reached_last_recorded_value = true;
        true
    }

    fn reached_iteration_level(&self, cursor: &Cursor<'_, C>) -> bool {
        cursor.count_at_this_value != 0
            && cursor.current_percentile() >= self.percentile_level_to_iterate_to
    }

    fn advance(&mut self, _cursor: &Cursor<'_, C>) {
        if self.percentile_level_to_iterate_to == 100.0 {
            return;
        }
        // The number of ticks doubles each time the remaining distance to
        // 100% halves.
        let halvings =
            (100.0 / (100.0 - self.percentile_level_to_iterate_to)).log2() as u32 + 1;
        let total_ticks = self.ticks_per_half_distance as u64 * (1_u64 << halvings);
        self.percentile_level_to_iterate_to += 100.0 / total_ticks as f64;
    }

    fn percentile_level_iterated_to(&self) -> Option<f64> {
        Some(self.percentile_level_to_iterate_to)
    }
}
