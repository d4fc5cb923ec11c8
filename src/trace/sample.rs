use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;

/// One line of the input trace. The second column arrives in milliseconds and
/// is converted to seconds on parse, so `idleness` is fractional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: i64,
    pub idleness: f64,
}

impl Sample {
    pub fn new(timestamp: i64, raw_idleness: i64) -> Self {
        // Float division. Truncating here would break reset detection for
        // sub-second counter values.
        Self {
            timestamp,
            idleness: raw_idleness as f64 / 1000.,
        }
    }
}

impl FromStr for Sample {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let timestamp = tokens
            .next()
            .ok_or_else(|| anyhow!("Missing timestamp in line {s:?}"))?
            .parse::<i64>()
            .map_err(|e| anyhow!("Can't parse timestamp in line {s:?}: {e}"))?;
        let raw_idleness = tokens
            .next()
            .ok_or_else(|| anyhow!("Missing idleness column in line {s:?}"))?
            .parse::<i64>()
            .map_err(|e| anyhow!("Can't parse idleness in line {s:?}: {e}"))?;
        Ok(Sample::new(timestamp, raw_idleness))
    }
}

/// A reconstructed span of continuous idleness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleInterval {
    pub start: f64,
    pub length: f64,
}

impl IdleInterval {
    /// Reconstructs the interval that ends at `sample`. The counter holds the
    /// seconds accumulated so far, so the start is recovered by walking back
    /// from the timestamp it was last observed at.
    pub fn ending_at(sample: &Sample) -> Self {
        Self {
            start: sample.timestamp as f64 - sample.idleness,
            length: sample.idleness,
        }
    }
}

impl Display for IdleInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "idleness\t{}\t{}",
            format_seconds(self.start),
            format_seconds(self.length)
        )
    }
}

/// Whole seconds keep one fractional digit so columns read as seconds rather
/// than bare counters.
fn format_seconds(value: f64) -> String {
    if value.fract() == 0. {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod sample_tests {
    use super::{IdleInterval, Sample};

    #[test]
    fn parses_whitespace_separated_columns() {
        let sample = "100 5000".parse::<Sample>().unwrap();
        assert_eq!(sample, Sample::new(100, 5000));
        assert_eq!(sample.idleness, 5.0);

        // Tabs and repeated spaces are fine, same as str::split_whitespace.
        let sample = "30\t  500".parse::<Sample>().unwrap();
        assert_eq!(sample, Sample::new(30, 500));
        assert_eq!(sample.idleness, 0.5);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!("abc def".parse::<Sample>().is_err());
        assert!("100".parse::<Sample>().is_err());
        assert!("".parse::<Sample>().is_err());
        assert!("100 5.5".parse::<Sample>().is_err());
    }

    #[test]
    fn interval_walks_back_from_last_observation() {
        let interval = IdleInterval::ending_at(&Sample::new(100, 5000));
        assert_eq!(interval.start, 95.0);
        assert_eq!(interval.length, 5.0);
    }

    #[test]
    fn display_keeps_seconds_readable() {
        let interval = IdleInterval::ending_at(&Sample::new(100, 5000));
        assert_eq!(interval.to_string(), "idleness\t95.0\t5.0");

        let interval = IdleInterval::ending_at(&Sample::new(30, 500));
        assert_eq!(interval.to_string(), "idleness\t29.5\t0.5");

        let interval = IdleInterval::ending_at(&Sample::new(10, 1234));
        assert_eq!(interval.to_string(), "idleness\t8.766\t1.234");
    }
}
