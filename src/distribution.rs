// src/distribution.rs
//
// Whole-batch arithmetic: a record's percentage only exists relative
// to the sum of every value in the batch.

use thiserror::Error;

use crate::records::Record;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DistributionError {
    #[error("cannot compute percentages: batch total value is zero")]
    ZeroTotal,
}

/// Sum of all record values in the batch.
pub fn total_value(records: &[Record]) -> f64 {
    records.iter().map(|r| r.value).sum()
}

/// Set `percent` on every record as its share of the batch total.
/// An empty batch is a no-op.
pub fn compute_percentages(records: &mut [Record]) -> Result<(), DistributionError> {
    if records.is_empty() {
        return Ok(());
    }
    let total = total_value(records);
    if total == 0.0 {
        return Err(DistributionError::ZeroTotal);
    }
    for record in records.iter_mut() {
        record.percent = Some(100.0 * record.value / total);
    }
    Ok(())
}

/// Set `proportional` on every record with a percentage already
/// attached. No remainder redistribution is performed; the summed
/// error stays within one cent per record.
pub fn compute_proportional(records: &mut [Record], target_amount: f64) {
    for record in records.iter_mut() {
        if let Some(percent) = record.percent {
            record.proportional = Some(target_amount * percent / 100.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, value: f64) -> Record {
        Record {
            name: name.to_string(),
            code: "100000".to_string(),
            role: "0001 - COOPERADOS".to_string(),
            value,
            percent: None,
            proportional: None,
        }
    }

    #[test]
    fn two_record_reference_batch() {
        let mut records = vec![record("a", 89.16), record("b", 10.84)];
        compute_percentages(&mut records).unwrap();
        compute_proportional(&mut records, 100.0);

        assert!((records[0].percent.unwrap() - 89.16).abs() < 1e-9);
        assert!((records[1].percent.unwrap() - 10.84).abs() < 1e-9);
        assert!((records[0].proportional.unwrap() - 89.16).abs() < 1e-9);
        assert!((records[1].proportional.unwrap() - 10.84).abs() < 1e-9);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let mut records = vec![
            record("a", 12.37),
            record("b", 0.01),
            record("c", 1987.22),
            record("d", 456.78),
        ];
        compute_percentages(&mut records).unwrap();
        let sum: f64 = records.iter().map(|r| r.percent.unwrap()).sum();
        assert!((sum - 100.0).abs() < 1e-6);
    }

    #[test]
    fn proportionals_sum_to_target() {
        let mut records = vec![record("a", 33.33), record("b", 66.67), record("c", 0.5)];
        compute_percentages(&mut records).unwrap();
        compute_proportional(&mut records, 9902.53);
        let sum: f64 = records.iter().map(|r| r.proportional.unwrap()).sum();
        assert!((sum - 9902.53).abs() < 0.01 * records.len() as f64);
    }

    #[test]
    fn zero_total_is_an_error() {
        let mut records = vec![record("a", 0.0), record("b", 0.0)];
        assert_eq!(
            compute_percentages(&mut records),
            Err(DistributionError::ZeroTotal)
        );
        assert!(records.iter().all(|r| r.percent.is_none()));
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut records: Vec<Record> = Vec::new();
        assert_eq!(compute_percentages(&mut records), Ok(()));
    }

    #[test]
    fn proportional_skips_records_without_percent() {
        let mut records = vec![record("a", 1.0)];
        compute_proportional(&mut records, 100.0);
        assert_eq!(records[0].proportional, None);
    }
}
