// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::iterators::{Cursor, Selector};
use crate::Counter;

/// Emits one step for every counter with a non-zero count.
pub struct RecordedValues {
    visited_index: Option<usize>,
}

impl RecordedValues {
    pub(crate) fn new() -> Self {
        Self {
            visited_index: None,
        }
    }
}

impl<C> Selector<C> for RecordedValues
where
    C: Counter,
    u64: From<C>,
{
    fn reached_iteration_level(&self, cursor: &Cursor<'_, C>) -> bool {
        cursor.count_at_this_value != 0 && self.visited_index != Some(cursor.current_index)
    }

    fn advance(&mut self, cursor: &Cursor<'_, C>) {
        self.visited_index = Some(cursor.current_index);
    }
}
