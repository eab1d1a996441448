// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::Config;
use crate::iterators::{
    AllValues, Iter, LinearBuckets, LogarithmicBuckets, Percentiles, RecordedValues,
};
use crate::{BuildError, Counter, RecordError};

use log::debug;

use core::ops::RangeInclusive;

/// A histogram which stores counts for values across a wide range while
/// bounding the relative error by a configured number of significant digits.
/// Recording runs in constant time; percentiles and summary statistics are
/// derived from the counts without retaining individual samples.
#[derive(Clone, Debug)]
pub struct Histogram<C> {
    config: Config,
    auto_resize: bool,
    counts: Vec<C>,
    total_count: u64,
    max_value: u64,
    min_non_zero_value: u64,
}

impl<C> Histogram<C>
where
    C: Counter,
    u64: From<C>,
{
    /// Create a new histogram which tracks values between `low` and `high`,
    /// where `low` is the smallest value that needs to be distinguished from
    /// its neighbors and `significant_digits` is the number of decimal
    /// digits of precision maintained across the entire range.
    pub fn with_bounds(low: u64, high: u64, significant_digits: u8) -> Result<Self, BuildError> {
        let config = Config::new(low, high, significant_digits)?;
        let counts = vec![C::default(); config.counts_array_length()];
        Ok(Self {
            config,
            auto_resize: false,
            counts,
            total_count: 0,
            max_value: 0,
            min_non_zero_value: u64::MAX,
        })
    }

    /// Create a new histogram which tracks values from 1 up to and including
    /// `high`.
    pub fn with_max(high: u64, significant_digits: u8) -> Result<Self, BuildError> {
        Self::with_bounds(1, high, significant_digits)
    }

    /// Create a new auto-resizing histogram. The covered range starts at its
    /// minimum and grows as values are recorded.
    pub fn new(significant_digits: u8) -> Result<Self, BuildError> {
        let mut histogram = Self::with_bounds(1, 2, significant_digits)?;
        histogram.auto_resize = true;
        Ok(histogram)
    }

    /// Record a single occurrence of `value`.
    pub fn record(&mut self, value: u64) -> Result<(), RecordError> {
        self.record_n(value, C::one())
    }

    /// Record `count` occurrences of `value`. The counter for the value may
    /// wrap at the counter type's width; the total count is kept at full
    /// width.
    pub fn record_n(&mut self, value: u64, count: C) -> Result<(), RecordError> {
        let mut index = self.config.index_for(value);
        if index >= self.counts.len() {
            if !self.auto_resize {
                return Err(RecordError::OutOfRange);
            }
            self.resize_to_cover(value);
            index = self.config.index_for(value);
        }
        self.counts[index].wrapping_add(count);
        self.total_count = self.total_count.wrapping_add(u64::from(count));
        if value > self.max_value {
            self.max_value = value;
        }
        if value != 0 && value < self.min_non_zero_value {
            self.min_non_zero_value = value;
        }
        Ok(())
    }

    /// Record a single occurrence of `value`, compensating for coordinated
    /// omission. When `value` exceeds `expected_interval`, additional
    /// samples are synthesized at `value - expected_interval`,
    /// `value - 2 * expected_interval`, and so on, standing in for the
    /// samples a stalled load generator failed to issue.
    pub fn record_corrected(&mut self, value: u64, expected_interval: u64) -> Result<(), RecordError> {
        self.record_corrected_n(value, C::one(), expected_interval)
    }

    /// Record `count` occurrences of `value` with coordinated omission
    /// compensation. Stops at the first backfilled value which cannot be
    /// recorded; samples recorded up to that point are retained.
    pub fn record_corrected_n(
        &mut self,
        value: u64,
        count: C,
        expected_interval: u64,
    ) -> Result<(), RecordError> {
        self.record_n(value, count)?;
        if expected_interval == 0 || value <= expected_interval {
            return Ok(());
        }
        let mut missing = value - expected_interval;
        while missing >= expected_interval {
            self.record_n(missing, count)?;
            missing -= expected_interval;
        }
        Ok(())
    }

    /// Clear all counts. The covered range and the counts array capacity are
    /// unchanged.
    pub fn reset(&mut self) {
        for count in self.counts.iter_mut() {
            *count = C::default();
        }
        self.total_count = 0;
        self.max_value = 0;
        self.min_non_zero_value = u64::MAX;
    }

    fn resize_to_cover(&mut self, value: u64) {
        let old_buckets = self.config.bucket_count();
        let old_length = self.counts.len();
        let new_length = self.config.grow_to_cover(value);
        if new_length > self.counts.len() {
            self.counts.resize(new_length, C::default());
        }
        debug!(
            "histogram resized: {} -> {} buckets, {} -> {} counts",
            old_buckets,
            self.config.bucket_count(),
            old_length,
            new_length,
        );
    }

    /// Return the value at the given percentile (0.0 to 100.0). Returns the
    /// highest value equivalent to the counter the percentile falls in, or
    /// the lowest for the 0th percentile. Returns zero when the histogram is
    /// empty.
    pub fn value_at_percentile(&self, percentile: f64) -> u64 {
        if self.total_count == 0 {
            return 0;
        }
        // back off by one ulp so a request landing exactly on a counter
        // boundary resolves to that counter
        let requested = (percentile - percentile * f64::EPSILON).clamp(0.0, 100.0);
        let threshold = (((requested / 100.0) * self.total_count as f64).ceil() as u64).max(1);
        let mut total = 0;
        for index in 0..self.counts.len() {
            total += self.count_at_index(index);
            if total >= threshold {
                let value = self.config.value_for_index(index);
                return if percentile == 0.0 {
                    self.lowest_equivalent(value)
                } else {
                    self.highest_equivalent(value)
                };
            }
        }
        0
    }

    /// Return the percentage of recorded values which are at or below
    /// `value`. Returns 100.0 when the histogram is empty.
    pub fn percentile_at_or_below_value(&self, value: u64) -> f64 {
        if self.total_count == 0 {
            return 100.0;
        }
        let target = self.config.index_for(value).min(self.counts.len() - 1);
        let mut total = 0;
        for index in 0..=target {
            total += self.count_at_index(index);
        }
        100.0 * total as f64 / self.total_count as f64
    }

    /// Return the number of values recorded between `low` and `high`,
    /// inclusive of both endpoints' equivalence ranges.
    pub fn count_between(&self, low: u64, high: u64) -> u64 {
        let low_index = self.config.index_for(low);
        let high_index = self.config.index_for(high).min(self.counts.len() - 1);
        if low_index > high_index {
            return 0;
        }
        (low_index..=high_index)
            .map(|index| self.count_at_index(index))
            .sum()
    }

    /// Return the count recorded at the counter which holds `value`.
    pub fn count_at(&self, value: u64) -> u64 {
        let index = self.config.index_for(value).min(self.counts.len() - 1);
        self.count_at_index(index)
    }

    /// The minimum recorded value, or zero if the histogram is empty or a
    /// zero was recorded.
    pub fn min(&self) -> u64 {
        if self.total_count == 0 || self.count_at_index(0) > 0 {
            0
        } else {
            self.min_non_zero()
        }
    }

    /// The lowest equivalent of the smallest recorded non-zero value, or the
    /// type maximum if no non-zero value has been recorded.
    pub fn min_non_zero(&self) -> u64 {
        if self.min_non_zero_value == u64::MAX {
            u64::MAX
        } else {
            self.lowest_equivalent(self.min_non_zero_value)
        }
    }

    /// The highest equivalent of the largest recorded value, or zero if the
    /// histogram is empty.
    pub fn max(&self) -> u64 {
        if self.max_value == 0 {
            0
        } else {
            self.highest_equivalent(self.max_value)
        }
    }

    /// The mean of all recorded values, computed at each counter's median
    /// equivalent value. Returns zero when the histogram is empty.
    pub fn mean(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        let total = self.total_count as f64;
        self.recorded_values()
            .map(|step| {
                self.median_equivalent(step.value()) as f64 * step.count_at_value() as f64 / total
            })
            .sum()
    }

    /// The standard deviation of all recorded values, computed at each
    /// counter's median equivalent value. Returns zero when the histogram is
    /// empty.
    pub fn stdev(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let squared_deviations: f64 = self
            .recorded_values()
            .map(|step| {
                let deviation = self.median_equivalent(step.value()) as f64 - mean;
                deviation * deviation * step.count_at_value() as f64
            })
            .sum();
        (squared_deviations / self.total_count as f64).sqrt()
    }

    /// The value at the 50th percentile.
    pub fn median(&self) -> u64 {
        self.value_at_percentile(50.0)
    }

    /// Total number of values recorded.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// An estimate of the memory occupied by this histogram.
    pub fn estimated_footprint_in_bytes(&self) -> usize {
        512 + self.counts.capacity() * core::mem::size_of::<C>()
    }

    /// The lowest value which maps to the same counter as `value`.
    pub fn lowest_equivalent(&self, value: u64) -> u64 {
        self.config.lowest_equivalent(value)
    }

    /// The highest value which maps to the same counter as `value`.
    pub fn highest_equivalent(&self, value: u64) -> u64 {
        self.config.highest_equivalent(value)
    }

    /// The value in the middle of the range which maps to the same counter
    /// as `value`.
    pub fn median_equivalent(&self, value: u64) -> u64 {
        self.config.median_equivalent(value)
    }

    /// The smallest value which maps to a higher counter than `value`.
    pub fn next_non_equivalent(&self, value: u64) -> u64 {
        self.config.next_non_equivalent(value)
    }

    /// The width of the range of values which map to the same counter as
    /// `value`.
    pub fn size_of_equivalent_range(&self, value: u64) -> u64 {
        self.config.size_of_equivalent_range(value)
    }

    /// The full range of values which map to the same counter as `value`.
    pub fn equivalent_range(&self, value: u64) -> RangeInclusive<u64> {
        self.lowest_equivalent(value)..=self.highest_equivalent(value)
    }

    /// Whether two values map to the same counter.
    pub fn values_are_equivalent(&self, a: u64, b: u64) -> bool {
        self.lowest_equivalent(a) == self.lowest_equivalent(b)
    }

    /// The lowest value mapping to the counter at `index`.
    pub fn value_for_index(&self, index: usize) -> u64 {
        self.config.value_for_index(index)
    }

    /// The number of distinct indexable slots in the counts array.
    pub fn distinct_values(&self) -> usize {
        self.counts.len()
    }

    pub fn low(&self) -> u64 {
        self.config.low()
    }

    pub fn high(&self) -> u64 {
        self.config.high()
    }

    pub fn significant_digits(&self) -> u8 {
        self.config.significant_digits()
    }

    pub fn bucket_count(&self) -> u32 {
        self.config.bucket_count()
    }

    pub fn sub_bucket_count(&self) -> u32 {
        self.config.sub_bucket_count()
    }

    pub fn auto_resize(&self) -> bool {
        self.auto_resize
    }

    /// Control whether recording a value beyond the covered range grows the
    /// counts array instead of failing.
    pub fn set_auto_resize(&mut self, enabled: bool) {
        self.auto_resize = enabled;
    }

    /// Iterate percentile reporting points with `ticks_per_half_distance`
    /// points emitted for each halving of the remaining distance to 100%,
    /// ending with a terminal tick at 100%.
    pub fn percentiles(&self, ticks_per_half_distance: u32) -> Iter<'_, C, Percentiles> {
        Iter::new(self, Percentiles::new(ticks_per_half_distance))
    }

    /// Iterate fixed-size steps of `value_units_per_bucket` across the
    /// recorded range.
    pub fn linear_bucket_values(&self, value_units_per_bucket: u64) -> Iter<'_, C, LinearBuckets> {
        Iter::new(self, LinearBuckets::new(self, value_units_per_bucket))
    }

    /// Iterate steps which start at `value_units_in_first_bucket` and grow
    /// by a factor of `log_base` each step.
    pub fn logarithmic_bucket_values(
        &self,
        value_units_in_first_bucket: u64,
        log_base: f64,
    ) -> Iter<'_, C, LogarithmicBuckets> {
        Iter::new(
            self,
            LogarithmicBuckets::new(self, value_units_in_first_bucket, log_base),
        )
    }

    /// Iterate every counter with a non-zero count.
    pub fn recorded_values(&self) -> Iter<'_, C, RecordedValues> {
        Iter::new(self, RecordedValues::new())
    }

    /// Iterate every counter, including those with no recorded values.
    pub fn all_values(&self) -> Iter<'_, C, AllValues> {
        Iter::new(self, AllValues::new())
    }

    pub(crate) fn count_at_index(&self, index: usize) -> u64 {
        u64::from(self.counts[index])
    }
}

impl<C> Default for Histogram<C>
where
    C: Counter,
    u64: From<C>,
{
    fn default() -> Self {
        Self::new(3).expect("three significant digits is a valid configuration")
    }
}

impl<C> PartialEq for Histogram<C>
where
    C: Counter,
    u64: From<C>,
{
    /// Histograms are equal when they share a lowest discernible value and
    /// precision and hold identical counts. The counts arrays may differ in
    /// length through resizing; slots past the shared length must be empty.
    fn eq(&self, other: &Self) -> bool {
        if !self.config.matches(&other.config) {
            return false;
        }
        if self.total_count != other.total_count
            || self.max() != other.max()
            || self.min_non_zero() != other.min_non_zero()
        {
            return false;
        }
        let shared = self.counts.len().min(other.counts.len());
        for index in 0..shared {
            if u64::from(self.counts[index]) != u64::from(other.counts[index]) {
                return false;
            }
        }
        for index in shared..self.counts.len() {
            if u64::from(self.counts[index]) != 0 {
                return false;
            }
        }
        for index in shared..other.counts.len() {
            if u64::from(other.counts[index]) != 0 {
                return false;
            }
        }
        true
    }
}
