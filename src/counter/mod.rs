// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// A trait which is used to restrict the types that may be used to store
/// counts within a histogram. Narrower types reduce the memory footprint at
/// the cost of wrapping sooner; the histogram's total count is kept at full
/// width regardless.
pub trait Counter: Default + Copy {
    /// The count for a single recorded value.
    fn one() -> Self;

    /// Add the provided count, wrapping at the type's width.
    fn wrapping_add(&mut self, count: Self);
}

impl Counter for u8 {
    fn one() -> Self {
        1
    }

    fn wrapping_add(&mut self, count: Self) {
        *self = (*self as u8).wrapping_add(count);
    }
}

impl Counter for u16 {
    fn one() -> Self {
        1
    }

    fn wrapping_add(&mut self, count: Self) {
        *self = (*self as u16).wrapping_add(count);
    }
}

impl Counter for u32 {
    fn one() -> Self {
        1
    }

    fn wrapping_add(&mut self, count: Self) {
        *self = (*self as u32).wrapping_add(count);
    }
}

impl Counter for u64 {
    fn one() -> Self {
        1
    }

    fn wrapping_add(&mut self, count: Self) {
        *self = (*self as u64).wrapping_add(count);
    }
}

impl Counter for usize {
    fn one() -> Self {
        1
    }

    fn wrapping_add(&mut self, count: Self) {
        *self = (*self as usize).wrapping_add(count);
    }
}
