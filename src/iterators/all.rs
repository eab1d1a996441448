// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::iterators::{Cursor, Selector};
use crate::Counter;

/// Emits one step for every counter, populated or not.
pub struct AllValues {
    visited_index: Option<usize>,
}

impl AllValues {
    pub(crate) fn new() -> Self {
        Self {
            visited_index: None,
        }
    }
}

impl<C> Selector<C> for AllValues
where
    C: Counter,
    u64: From<C>,
{
    fn has_extra_step(&mut self, cursor: &Cursor<'_, C>) -> bool {
        cursor.current_index < cursor.last_index()
    }

    fn reached_iteration_level(&self, cursor: &Cursor<'_, C>) -> bool {
        self.visited_index != Some(cursor.current_index)
    }

    fn advance(&mut self, cursor: &Cursor<'_, C>) {
        self.visited_index = Some(cursor.current_index);
    }
}
