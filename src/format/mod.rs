// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Counter, Histogram};

use std::io::{self, Write};

/// Output layout for a percentile distribution report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Right-aligned columns suitable for reading in a terminal.
    PlainText,
    /// Comma-separated values with the same columns.
    Csv,
}

impl<C> Histogram<C>
where
    C: Counter,
    u64: From<C>,
{
    /// Write the percentile distribution to `writer`. Reported values are
    /// divided by `value_scaling_ratio`, printed with the histogram's
    /// configured number of significant digits, and stepped at
    /// `ticks_per_half_distance` reporting points per halving of the
    /// distance to 100%. Callers conventionally pass 5 ticks.
    pub fn output_percentile_distribution<W: Write>(
        &self,
        writer: &mut W,
        value_scaling_ratio: f64,
        ticks_per_half_distance: u32,
        format: Format,
    ) -> io::Result<()> {
        match format {
            Format::PlainText => {
                self.write_plain_text(writer, value_scaling_ratio, ticks_per_half_distance)
            }
            Format::Csv => self.write_csv(writer, value_scaling_ratio, ticks_per_half_distance),
        }
    }

    fn write_plain_text<W: Write>(
        &self,
        writer: &mut W,
        value_scaling_ratio: f64,
        ticks_per_half_distance: u32,
    ) -> io::Result<()> {
        let digits = self.significant_digits() as usize;
        writeln!(
            writer,
            "{:>12} {:>14} {:>10} {}",
            "Value", "Percentile", "TotalCount", "1/(1-Percentile)"
        )?;
        for step in self.percentiles(ticks_per_half_distance) {
            let value = step.value() as f64 / value_scaling_ratio;
            let quantile = step.percentile_level_iterated_to() / 100.0;
            if step.percentile_level_iterated_to() >= 100.0 {
                writeln!(
                    writer,
                    "{:>12.digits$} {:>14.12} {:>10}",
                    value,
                    quantile,
                    step.total_count_to_this_value(),
                    digits = digits,
                )?;
            } else {
                writeln!(
                    writer,
                    "{:>12.digits$} {:>14.12} {:>10} {:.2}",
                    value,
                    quantile,
                    step.total_count_to_this_value(),
                    1.0 / (1.0 - quantile),
                    digits = digits,
                )?;
            }
        }
        writeln!(
            writer,
            "#[Mean    = {:12.digits$}, StdDeviation   = {:12.digits$}]",
            self.mean() / value_scaling_ratio,
            self.stdev() / value_scaling_ratio,
            digits = digits,
        )?;
        writeln!(
            writer,
            "#[Max     = {:12.digits$}, Total count    = {:12}]",
            self.max() as f64 / value_scaling_ratio,
            self.total_count(),
            digits = digits,
        )?;
        writeln!(
            writer,
            "#[Buckets = {:12}, SubBuckets     = {:12}]",
            self.bucket_count(),
            self.sub_bucket_count(),
        )
    }

    fn write_csv<W: Write>(
        &self,
        writer: &mut W,
        value_scaling_ratio: f64,
        ticks_per_half_distance: u32,
    ) -> io::Result<()> {
        let digits = self.significant_digits() as usize;
        writeln!(writer, "Value,Percentile,TotalCount,1/(1-Percentile)")?;
        for step in self.percentiles(ticks_per_half_distance) {
            let value = step.value() as f64 / value_scaling_ratio;
            let quantile = step.percentile_level_iterated_to() / 100.0;
            if step.percentile_level_iterated_to() >= 100.0 {
                writeln!(
                    writer,
                    "{:.digits$},{:.12},{},Infinity",
                    value,
                    quantile,
                    step.total_count_to_this_value(),
                    digits = digits,
                )?;
            } else {
                writeln!(
                    writer,
                    "{:.digits$},{:.12},{},{:.2}",
                    value,
                    quantile,
                    step.total_count_to_this_value(),
                    1.0 / (1.0 - quantile),
                    digits = digits,
                )?;
            }
        }
        Ok(())
    }
}
