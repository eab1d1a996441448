// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use hdrhist::Histogram;

macro_rules! assert_near {
    ($a:expr, $b:expr, $tolerance:expr) => {{
        let a = $a as f64;
        let b = $b as f64;
        let tolerance = $tolerance as f64;
        assert!(
            (a - b).abs() <= b * tolerance,
            "left `{}` is not within {}% of right `{}`",
            a,
            100.0 * tolerance,
            b
        );
    }};
}

const TRACKABLE_MAX: u64 = 3_600_000_000;
const SIGFIG: u8 = 3;
const INTERVAL: u64 = 10_000;

struct Loaded {
    corrected: Histogram<u64>,
    raw: Histogram<u64>,
}

/// 100 seconds of perfect 1 msec results sampled 100 times per second,
/// followed by a single 100 second stall, recorded with an expected interval
/// of 10 msec between samples.
fn load_histograms() -> Loaded {
    let mut corrected = Histogram::with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    let mut raw = Histogram::with_max(TRACKABLE_MAX, SIGFIG).unwrap();

    for _ in 0..10_000 {
        corrected.record_corrected(1_000, INTERVAL).unwrap();
        raw.record(1_000).unwrap();
    }
    corrected.record_corrected(100_000_000, INTERVAL).unwrap();
    raw.record(100_000_000).unwrap();

    Loaded { corrected, raw }
}

#[test]
fn total_count() {
    let Loaded { corrected, raw } = load_histograms();

    assert_eq!(raw.total_count(), 10_001);
    assert_eq!(corrected.total_count(), 20_000);
}

#[test]
fn min_and_max() {
    let Loaded { corrected, .. } = load_histograms();

    assert!(corrected.values_are_equivalent(corrected.max(), 100_000_000));
    assert!(corrected.values_are_equivalent(corrected.min(), 1_000));
    assert_eq!(corrected.value_at_percentile(100.0), corrected.max());
}

#[test]
fn mean() {
    let Loaded { corrected, raw } = load_histograms();

    let expected_raw_mean = ((10_000.0 * 1_000.0) + 100_000_000.0) / 10_001.0;
    // 1 msec for half the samples, evenly spread stall samples for the rest
    let expected_corrected_mean = (1_000.0 + 50_000_000.0) / 2.0;

    assert_near!(raw.mean(), expected_raw_mean, 0.001);
    assert_near!(corrected.mean(), expected_corrected_mean, 0.001);
}

#[test]
fn stdev() {
    let Loaded { corrected, raw } = load_histograms();

    let expected_raw_mean = ((10_000.0 * 1_000.0) + 100_000_000.0) / 10_001.0;
    let expected_raw_stdev = ((10_000.0 * (1_000_f64 - expected_raw_mean).powi(2)
        + (100_000_000_f64 - expected_raw_mean).powi(2))
        / 10_001.0)
        .sqrt();

    let expected_corrected_mean = (1_000.0 + 50_000_000.0) / 2.0;
    let mut squared_deviations = 10_000.0 * (1_000_f64 - expected_corrected_mean).powi(2);
    let mut value = 10_000_f64;
    while value <= 100_000_000.0 {
        squared_deviations += (value - expected_corrected_mean).powi(2);
        value += 10_000.0;
    }
    let expected_corrected_stdev = (squared_deviations / 20_000.0).sqrt();

    assert_near!(raw.stdev(), expected_raw_stdev, 0.001);
    assert_near!(corrected.stdev(), expected_corrected_stdev, 0.001);
}

#[test]
fn percentiles() {
    let Loaded { corrected, raw } = load_histograms();

    assert_near!(raw.value_at_percentile(30.0), 1_000.0, 0.001);
    assert_near!(raw.value_at_percentile(99.0), 1_000.0, 0.001);
    assert_near!(raw.value_at_percentile(99.99), 1_000.0, 0.001);
    assert_near!(raw.value_at_percentile(99.999), 100_000_000.0, 0.001);
    assert_near!(raw.value_at_percentile(100.0), 100_000_000.0, 0.001);

    assert_near!(corrected.value_at_percentile(30.0), 1_000.0, 0.001);
    assert_near!(corrected.value_at_percentile(50.0), 1_000.0, 0.001);
    assert_near!(corrected.value_at_percentile(75.0), 50_000_000.0, 0.001);
    assert_near!(corrected.value_at_percentile(90.0), 80_000_000.0, 0.001);
    assert_near!(corrected.value_at_percentile(99.0), 98_000_000.0, 0.001);
    assert_near!(corrected.value_at_percentile(99.999), 100_000_000.0, 0.001);
    assert_near!(corrected.value_at_percentile(100.0), 100_000_000.0, 0.001);
}

#[test]
fn percentile_at_or_below() {
    let Loaded { corrected, raw } = load_histograms();

    assert_near!(raw.percentile_at_or_below_value(5_000), 99.99, 0.0001);
    assert_near!(corrected.percentile_at_or_below_value(5_000), 50.0, 0.0001);
    assert_near!(
        corrected.percentile_at_or_below_value(100_000_000),
        100.0,
        0.0001
    );
}

#[test]
fn count_queries() {
    let Loaded { corrected, raw } = load_histograms();

    assert_eq!(raw.count_between(1_000, 1_000), 10_000);
    assert_eq!(raw.count_between(5_000, 150_000_000), 1);
    assert_eq!(corrected.count_between(5_000, 150_000_000), 10_000);
    assert_eq!(raw.count_between(10_000, 10_010), 0);
    assert_eq!(corrected.count_between(10_000, 10_010), 1);
    assert_eq!(raw.count_at(1_000), 10_000);
    assert_eq!(corrected.count_at(1_000), 10_000);
}

#[test]
fn percentile_iterator_matches_percentile_queries() {
    let Loaded { corrected, .. } = load_histograms();

    for step in corrected.percentiles(5) {
        assert_eq!(
            step.value(),
            corrected.highest_equivalent(corrected.value_at_percentile(step.percentile()))
        );
    }
}

#[test]
fn linear_iteration() {
    let Loaded { corrected, raw } = load_histograms();

    // 100 msec steps over the raw data
    let mut steps = 0;
    for (i, step) in raw.linear_bucket_values(100_000).enumerate() {
        match i {
            0 => assert_eq!(step.count_added_in_this_iteration_step(), 10_000),
            999 => assert_eq!(step.count_added_in_this_iteration_step(), 1),
            _ => assert_eq!(step.count_added_in_this_iteration_step(), 0),
        }
        steps += 1;
    }
    assert_eq!(steps, 1_000);

    // 10 msec steps over the corrected data
    let mut steps = 0;
    let mut added = 0;
    for (i, step) in corrected.linear_bucket_values(10_000).enumerate() {
        if i == 0 {
            assert_eq!(step.count_added_in_this_iteration_step(), 10_000);
        }
        added += step.count_added_in_this_iteration_step();
        steps += 1;
    }
    assert_eq!(steps, 10_000);
    assert_eq!(added, 20_000);

    // 1 msec steps: the last populated sub-bucket is wider than the step, so
    // iteration runs to the end of that sub-bucket rather than stopping at
    // the 100_000th step
    let mut steps = 0;
    let mut added = 0;
    for step in corrected.linear_bucket_values(1_000) {
        added += step.count_added_in_this_iteration_step();
        steps += 1;
    }
    assert_eq!(steps, 100_007);
    assert_eq!(added, 20_000);
}

#[test]
fn linear_iteration_steps_inside_wide_sub_buckets() {
    let mut histogram = Histogram::<u64>::with_bounds(1, u64::MAX, 3).unwrap();
    for value in [1, 2047, 2048, 2049, 4095, 4096, 4097, 4098, 4099, 4100] {
        histogram.record(value).unwrap();
    }

    let mut steps = 0;
    let mut added = 0;
    for (i, step) in histogram.linear_bucket_values(1).enumerate() {
        assert_eq!(step.value(), i as u64);
        match i {
            0 => assert_eq!(step.count_added_in_this_iteration_step(), 0),
            1 => assert_eq!(step.count_added_in_this_iteration_step(), 1),
            2047 => assert_eq!(step.count_added_in_this_iteration_step(), 1),
            // sub-buckets are two units wide in the second bucket
            2048 => assert_eq!(step.count_added_in_this_iteration_step(), 2),
            2049 => assert_eq!(step.count_added_in_this_iteration_step(), 0),
            4094 => assert_eq!(step.count_added_in_this_iteration_step(), 1),
            // four units wide in the third
            4096 => assert_eq!(step.count_added_in_this_iteration_step(), 4),
            4100 => assert_eq!(step.count_added_in_this_iteration_step(), 1),
            _ => assert_eq!(step.count_added_in_this_iteration_step(), 0),
        }
        added += step.count_added_in_this_iteration_step();
        steps += 1;
    }
    assert_eq!(steps, 4_104);
    assert_eq!(added, 10);
}

#[test]
fn logarithmic_iteration() {
    let Loaded { corrected, raw } = load_histograms();

    // 10 msec first bucket, doubling each step, over the raw data
    let mut steps = 0;
    for (i, step) in raw.logarithmic_bucket_values(10_000, 2.0).enumerate() {
        match i {
            0 => assert_eq!(step.count_added_in_this_iteration_step(), 10_000),
            14 => assert_eq!(step.count_added_in_this_iteration_step(), 1),
            _ => assert_eq!(step.count_added_in_this_iteration_step(), 0),
        }
        steps += 1;
    }
    assert_eq!(steps - 1, 14);

    let mut steps = 0;
    let mut added = 0;
    for (i, step) in corrected.logarithmic_bucket_values(10_000, 2.0).enumerate() {
        if i == 0 {
            assert_eq!(step.count_added_in_this_iteration_step(), 10_000);
        }
        added += step.count_added_in_this_iteration_step();
        steps += 1;
    }
    assert_eq!(steps - 1, 14);
    assert_eq!(added, 20_000);
}

#[test]
fn recorded_value_iteration() {
    let Loaded { corrected, raw } = load_histograms();

    let mut steps = 0;
    for (i, step) in raw.recorded_values().enumerate() {
        match i {
            0 => assert_eq!(step.count_added_in_this_iteration_step(), 10_000),
            _ => assert_eq!(step.count_added_in_this_iteration_step(), 1),
        }
        steps += 1;
    }
    assert_eq!(steps, 2);

    let mut added = 0;
    for step in corrected.recorded_values() {
        assert!(step.count_at_value() != 0);
        assert_eq!(step.count_at_value(), step.count_added_in_this_iteration_step());
        added += step.count_added_in_this_iteration_step();
    }
    assert_eq!(added, 20_000);
}

#[test]
fn all_value_iteration() {
    let Loaded { corrected, raw } = load_histograms();

    let mut steps = 0;
    for (i, step) in raw.all_values().enumerate() {
        if i == 1_000 {
            assert_eq!(step.count_added_in_this_iteration_step(), 10_000);
        } else if raw.values_are_equivalent(step.value(), 100_000_000) {
            assert_eq!(step.count_added_in_this_iteration_step(), 1);
        } else {
            assert_eq!(step.count_added_in_this_iteration_step(), 0);
        }
        assert!(raw.values_are_equivalent(raw.value_for_index(i), step.value()));
        steps += 1;
    }
    assert_eq!(steps, raw.distinct_values());

    let mut added = 0;
    for step in corrected.all_values() {
        assert_eq!(step.count_at_value(), step.count_added_in_this_iteration_step());
        added += step.count_added_in_this_iteration_step();
    }
    assert_eq!(added, 20_000);
}

#[test]
fn percentile_tick_cadence() {
    let mut histogram = Histogram::<u64>::with_max(10_000, 3).unwrap();
    for value in 1..=10 {
        histogram.record(value).unwrap();
    }

    let levels: Vec<f64> = histogram
        .percentiles(2)
        .map(|step| step.percentile_level_iterated_to())
        .collect();
    assert_eq!(
        levels,
        vec![0.0, 25.0, 50.0, 62.5, 75.0, 81.25, 87.5, 90.625, 100.0]
    );

    let values: Vec<u64> = histogram.percentiles(2).map(|step| step.value()).collect();
    assert_eq!(values, vec![1, 3, 5, 7, 8, 9, 9, 10, 10]);
}

#[test]
fn value_duplication_through_iteration() {
    let Loaded { corrected, .. } = load_histograms();

    let mut duplicate = Histogram::<u64>::with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    for step in corrected.all_values() {
        if step.count_added_in_this_iteration_step() > 0 {
            duplicate
                .record_n(step.value(), step.count_added_in_this_iteration_step())
                .unwrap();
        }
    }

    assert_eq!(corrected, duplicate);
}

#[test]
fn total_count_survives_narrow_counter_wrap() {
    let mut histogram = Histogram::<u8>::new(3).unwrap();

    for _ in 0..300 {
        histogram.record(100).unwrap();
    }
    for _ in 0..300 {
        histogram.record(100_000).unwrap();
    }

    assert_eq!(histogram.total_count(), 600);
    assert_eq!(
        histogram.value_at_percentile(100.0),
        histogram.highest_equivalent(100_000)
    );
}

#[test]
fn recorded_values_round_trip_through_queries() {
    use rand::Rng;

    let mut histogram = Histogram::<u64>::with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    let mut rng = rand::thread_rng();
    let mut values = Vec::new();

    for _ in 0..10_000 {
        let value = rng.gen_range(1, TRACKABLE_MAX);
        histogram.record(value).unwrap();
        values.push(value);
    }

    assert_eq!(histogram.total_count(), 10_000);
    for &value in &values {
        assert!(histogram.count_at(value) >= 1);
        assert!(histogram.values_are_equivalent(
            value,
            histogram.value_at_percentile(histogram.percentile_at_or_below_value(value)),
        ));
        assert_eq!(
            histogram.next_non_equivalent(value),
            histogram.lowest_equivalent(value) + histogram.size_of_equivalent_range(value)
        );
        assert!(histogram
            .values_are_equivalent(histogram.lowest_equivalent(value), histogram.highest_equivalent(value)));
    }
}
