use rust_htslib::bam;
use serde::{Deserialize, Serialize};

/// Record predicates selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFilter {
    #[default]
    All,
    Mapped,
    Unmapped,
    Paired,
    ProperPair,
    Duplicate,
    QcFail,
    Secondary,
    Supplementary,
    Reverse,
    /// Mapped with at least this mapping quality
    MinMapq(u8),
}

impl RecordFilter {
    pub fn matches(&self, record: &bam::Record) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::Mapped => !record.is_unmapped(),
            RecordFilter::Unmapped => record.is_unmapped(),
            RecordFilter::Paired => record.is_paired(),
            RecordFilter::ProperPair => record.is_paired() && record.is_proper_pair(),
            RecordFilter::Duplicate => record.is_duplicate(),
            RecordFilter::QcFail => record.is_quality_check_failed(),
            RecordFilter::Secondary => record.is_secondary(),
            RecordFilter::Supplementary => record.is_supplementary(),
            RecordFilter::Reverse => record.is_reverse(),
            RecordFilter::MinMapq(min) => !record.is_unmapped() && record.mapq() >= *min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::test_support::{aligned, unmapped, FLAG_DUP, FLAG_PAIRED, FLAG_PROPER};

    #[test]
    fn test_mapping_filters() {
        let mapped = aligned(0, 50, 30, 0);
        let lost = unmapped(50);
        assert!(RecordFilter::Mapped.matches(&mapped));
        assert!(!RecordFilter::Mapped.matches(&lost));
        assert!(RecordFilter::Unmapped.matches(&lost));
        assert!(RecordFilter::All.matches(&lost));
    }

    #[test]
    fn test_min_mapq_requires_mapped() {
        assert!(RecordFilter::MinMapq(20).matches(&aligned(0, 50, 20, 0)));
        assert!(!RecordFilter::MinMapq(20).matches(&aligned(0, 50, 19, 0)));
        assert!(!RecordFilter::MinMapq(0).matches(&unmapped(50)));
    }

    #[test]
    fn test_flag_filters() {
        let record = aligned(0, 50, 60, FLAG_PAIRED | FLAG_PROPER | FLAG_DUP);
        assert!(RecordFilter::Paired.matches(&record));
        assert!(RecordFilter::ProperPair.matches(&record));
        assert!(RecordFilter::Duplicate.matches(&record));
        assert!(!RecordFilter::Secondary.matches(&record));
        assert!(!RecordFilter::Reverse.matches(&record));
    }
}
