// Selector domain models - threshold tables and label dials
use thiserror::Error;

/// Highest reading the 10-bit converter can produce.
pub const ADC_MAX: u16 = 1023;

const ADC_RANGE: f64 = ADC_MAX as f64;

/// Label shown when a role reading falls outside every bin.
pub const UNKNOWN_MACHINE_ROLE: &str = "unknown role";
/// Label shown when an environment reading falls outside every bin.
pub const UNKNOWN_ENVIRONMENT: &str = "unknown env";

/// A single sample from one converter channel.
pub type Reading = u16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("a selector needs at least 2 positions, got {0}")]
    InvalidPositionCount(usize),
}

/// Upper-exclusive bin boundaries partitioning the reading range into
/// evenly spaced positions. Boundaries sit halfway between adjacent
/// nominal levels, so a pot resting exactly on a level reads inside its
/// own bin instead of on an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    bounds: Vec<f64>,
}

impl ThresholdTable {
    pub fn new(position_count: usize) -> Result<Self, SelectionError> {
        if position_count < 2 {
            return Err(SelectionError::InvalidPositionCount(position_count));
        }

        let increment = ADC_RANGE / (position_count - 1) as f64;
        let bounds = (0..position_count)
            .map(|level| level as f64 * increment + increment / 2.0)
            .collect();

        Ok(Self { bounds })
    }

    /// Index of the bin the reading falls into, or `None` when the reading
    /// lies beyond the last boundary. Tables built for the full reading
    /// range resolve every in-range reading; `None` is still handled so an
    /// out-of-range sample surfaces as a fallback label, never a panic.
    pub fn position_of(&self, reading: Reading) -> Option<usize> {
        self.bounds.iter().position(|bound| f64::from(reading) < *bound)
    }

    pub fn position_count(&self) -> usize {
        self.bounds.len()
    }

    #[cfg(test)]
    fn bounds(&self) -> &[f64] {
        &self.bounds
    }
}

/// One physical selector knob: an ordered label list, the threshold table
/// partitioning the reading range into one bin per label, and the label to
/// fall back to when a reading resolves to no bin.
#[derive(Debug, Clone)]
pub struct LabelDial {
    labels: Vec<String>,
    thresholds: ThresholdTable,
    fallback: String,
}

impl LabelDial {
    pub fn new(labels: Vec<String>, fallback: impl Into<String>) -> Result<Self, SelectionError> {
        let thresholds = ThresholdTable::new(labels.len())?;
        Ok(Self {
            labels,
            thresholds,
            fallback: fallback.into(),
        })
    }

    pub fn label_for(&self, reading: Reading) -> &str {
        match self.thresholds.position_of(reading) {
            Some(position) => &self.labels[position],
            None => &self.fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn test_thresholds_for_six_positions() {
        let table = ThresholdTable::new(6).unwrap();
        let expected = [102.3, 306.9, 511.5, 716.1, 920.7, 1125.3];

        assert_eq!(table.position_count(), 6);
        for (bound, want) in table.bounds().iter().zip(expected) {
            assert!(close(*bound, want), "expected {} got {}", want, bound);
        }
    }

    #[test]
    fn test_thresholds_strictly_increasing_and_cover_max() {
        for count in 2..=10 {
            let table = ThresholdTable::new(count).unwrap();
            assert_eq!(table.position_count(), count);
            assert!(
                table.bounds().windows(2).all(|pair| pair[0] < pair[1]),
                "bounds not strictly increasing for {} positions",
                count
            );
            assert!(*table.bounds().last().unwrap() >= f64::from(ADC_MAX));
        }
    }

    #[test]
    fn test_position_count_below_two_rejected() {
        assert_eq!(
            ThresholdTable::new(0),
            Err(SelectionError::InvalidPositionCount(0))
        );
        assert_eq!(
            ThresholdTable::new(1),
            Err(SelectionError::InvalidPositionCount(1))
        );
    }

    #[test]
    fn test_boundary_readings() {
        // With 6 positions the first boundary is 102.3: a reading of 102
        // stays in bin 0 and 103 crosses into bin 1.
        let table = ThresholdTable::new(6).unwrap();
        assert_eq!(table.position_of(102), Some(0));
        assert_eq!(table.position_of(103), Some(1));
        assert_eq!(table.position_of(ADC_MAX), Some(5));
    }

    #[test]
    fn test_resolution_total_over_full_range() {
        for count in [2, 5, 6, 7, 10] {
            let table = ThresholdTable::new(count).unwrap();
            for reading in 0..=ADC_MAX {
                let position = table.position_of(reading);
                match position {
                    Some(index) => assert!(index < count),
                    None => panic!("reading {} unresolved for {} positions", reading, count),
                }
            }
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let table = ThresholdTable::new(7).unwrap();
        for reading in [0, 511, ADC_MAX] {
            assert_eq!(table.position_of(reading), table.position_of(reading));
        }
    }

    #[test]
    fn test_dial_maps_readings_to_labels() {
        let dial = LabelDial::new(
            vec!["low".to_string(), "mid".to_string(), "high".to_string()],
            "unknown",
        )
        .unwrap();

        assert_eq!(dial.label_for(0), "low");
        assert_eq!(dial.label_for(511), "mid");
        assert_eq!(dial.label_for(ADC_MAX), "high");
    }

    #[test]
    fn test_dial_falls_back_for_out_of_range_reading() {
        let dial = LabelDial::new(
            vec!["a".to_string(), "b".to_string()],
            UNKNOWN_MACHINE_ROLE,
        )
        .unwrap();

        // Beyond the last boundary (1023 + increment/2); only a misbehaving
        // source can produce this, and it must surface as the fallback.
        assert_eq!(dial.label_for(2000), UNKNOWN_MACHINE_ROLE);
    }

    #[test]
    fn test_dial_rejects_short_label_lists() {
        let result = LabelDial::new(vec!["only".to_string()], UNKNOWN_ENVIRONMENT);
        assert!(matches!(
            result,
            Err(SelectionError::InvalidPositionCount(1))
        ));
    }
}
