use crate::collectors::collector::StatCollector;
use crate::collectors::reference::RefTable;
use crate::collectors::report::{Report, ReportError, Section};
use anyhow::Result;
use rust_htslib::bam;
use std::collections::BTreeMap;

/// Value -> occurrence counts, kept sorted by value
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Histogram {
    bins: BTreeMap<u64, u64>,
    total: u64,
    sum: u128,
}

impl Histogram {
    pub fn add(&mut self, value: u64) {
        *self.bins.entry(value).or_insert(0) += 1;
        self.total += 1;
        self.sum += value as u128;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self, value: u64) -> u64 {
        self.bins.get(&value).copied().unwrap_or(0)
    }

    pub fn min(&self) -> Option<u64> {
        self.bins.keys().next().copied()
    }

    pub fn max(&self) -> Option<u64> {
        self.bins.keys().next_back().copied()
    }

    pub fn mean(&self) -> Option<f64> {
        (self.total > 0).then(|| self.sum as f64 / self.total as f64)
    }

    /// Most frequent value, smallest value on ties
    pub fn mode(&self) -> Option<u64> {
        self.bins
            .iter()
            .fold(None, |best: Option<(u64, u64)>, (&value, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((value, count)),
            })
            .map(|(value, _)| value)
    }

    fn write(&self, section: &mut Section<'_>) -> Result<(), ReportError> {
        section.insert("count", self.total)?;
        if let (Some(mean), Some(min), Some(max), Some(mode)) =
            (self.mean(), self.min(), self.max(), self.mode())
        {
            section.insert("mean", mean)?;
            section.insert("min", min)?;
            section.insert("max", max)?;
            section.insert("mode", mode)?;
        }
        section.insert("histogram", &self.bins)?;
        Ok(())
    }
}

/// Distribution of mapping qualities over mapped reads
pub struct MappingQualityHistogram {
    section: String,
    histogram: Histogram,
}

impl MappingQualityHistogram {
    pub fn new() -> Self {
        Self::named("mapq")
    }

    pub fn named(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            histogram: Histogram::default(),
        }
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }
}

impl Default for MappingQualityHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl StatCollector for MappingQualityHistogram {
    fn name(&self) -> &str {
        &self.section
    }

    fn process_alignment(&mut self, record: &bam::Record, _refs: &RefTable) -> Result<()> {
        if !record.is_unmapped() {
            self.histogram.add(record.mapq() as u64);
        }
        Ok(())
    }

    fn append_json(&self, report: &mut Report) -> Result<()> {
        let mut section = report.section(self.section.as_str())?;
        self.histogram.write(&mut section)?;
        Ok(())
    }
}

/// Distribution of query sequence lengths over primary alignments
pub struct ReadLengthHistogram {
    section: String,
    histogram: Histogram,
}

impl ReadLengthHistogram {
    pub fn new() -> Self {
        Self::named("read_length")
    }

    pub fn named(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            histogram: Histogram::default(),
        }
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }
}

impl Default for ReadLengthHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl StatCollector for ReadLengthHistogram {
    fn name(&self) -> &str {
        &self.section
    }

    fn process_alignment(&mut self, record: &bam::Record, _refs: &RefTable) -> Result<()> {
        // Only count primary alignments
        if !record.is_secondary() && !record.is_supplementary() {
            self.histogram.add(record.seq_len() as u64);
        }
        Ok(())
    }

    fn append_json(&self, report: &mut Report) -> Result<()> {
        let mut section = report.section(self.section.as_str())?;
        self.histogram.write(&mut section)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::test_support::*;
    use serde_json::json;

    #[test]
    fn test_histogram_summary() {
        let mut h = Histogram::default();
        for v in [10, 20, 20, 30] {
            h.add(v);
        }
        assert_eq!(h.total(), 4);
        assert_eq!(h.count(20), 2);
        assert_eq!(h.min(), Some(10));
        assert_eq!(h.max(), Some(30));
        assert_eq!(h.mode(), Some(20));
        assert_eq!(h.mean(), Some(20.0));
    }

    #[test]
    fn test_mode_ties_pick_smallest() {
        let mut h = Histogram::default();
        for v in [5, 3, 5, 3] {
            h.add(v);
        }
        assert_eq!(h.mode(), Some(3));
        assert_eq!(Histogram::default().mode(), None);
    }

    #[test]
    fn test_mapq_skips_unmapped() {
        let refs = ref_table();
        let mut mapq = MappingQualityHistogram::new();
        mapq.process_alignment(&aligned(0, 50, 60, 0), &refs).unwrap();
        mapq.process_alignment(&aligned(0, 50, 0, 0), &refs).unwrap();
        mapq.process_alignment(&unmapped(50), &refs).unwrap();

        let mut report = Report::new();
        mapq.append_json(&mut report).unwrap();
        let section = report.get("mapq").unwrap();
        assert_eq!(section["count"], json!(2));
        assert_eq!(section["histogram"], json!({"0": 1, "60": 1}));
        assert_eq!(section["mean"], json!(30.0));
    }

    #[test]
    fn test_read_length_primary_only() {
        let refs = ref_table();
        let mut lengths = ReadLengthHistogram::new();
        lengths.process_alignment(&aligned(0, 150, 60, 0), &refs).unwrap();
        lengths.process_alignment(&aligned(0, 100, 60, 0), &refs).unwrap();
        lengths
            .process_alignment(&aligned(0, 90, 60, FLAG_SECONDARY), &refs)
            .unwrap();
        lengths
            .process_alignment(&aligned(0, 80, 60, FLAG_SUPPLEMENTARY), &refs)
            .unwrap();

        let h = lengths.histogram();
        assert_eq!(h.total(), 2);
        assert_eq!(h.min(), Some(100));
        assert_eq!(h.max(), Some(150));
    }

    #[test]
    fn test_empty_histogram_report() {
        let mut report = Report::new();
        ReadLengthHistogram::new().append_json(&mut report).unwrap();
        assert_eq!(
            report.into_value(),
            json!({"read_length": {"count": 0, "histogram": {}}})
        );
    }
}
