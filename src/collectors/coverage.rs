use crate::collectors::collector::StatCollector;
use crate::collectors::reference::RefTable;
use crate::collectors::report::Report;
use anyhow::{anyhow, Result};
use rust_htslib::bam;
use rust_htslib::bam::record::Cigar;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
struct ReferenceCounts {
    name: String,
    length: u64,
    mapped_reads: u64,
    aligned_bases: u64,
}

/// Mapped reads and aligned bases per reference sequence
pub struct CoverageByReference {
    section: String,
    by_tid: BTreeMap<i32, ReferenceCounts>,
}

impl CoverageByReference {
    pub fn new() -> Self {
        Self::named("references")
    }

    pub fn named(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            by_tid: BTreeMap::new(),
        }
    }

    /// Mapped read count for a reference, by name
    pub fn mapped_reads(&self, name: &str) -> u64 {
        self.by_tid
            .values()
            .find(|c| c.name == name)
            .map(|c| c.mapped_reads)
            .unwrap_or(0)
    }

    fn aligned_bases(record: &bam::Record) -> u64 {
        record
            .cigar()
            .iter()
            .map(|op| match op {
                Cigar::Match(len) | Cigar::Equal(len) | Cigar::Diff(len) => *len as u64,
                _ => 0,
            })
            .sum()
    }
}

impl Default for CoverageByReference {
    fn default() -> Self {
        Self::new()
    }
}

impl StatCollector for CoverageByReference {
    fn name(&self) -> &str {
        &self.section
    }

    fn process_alignment(&mut self, record: &bam::Record, refs: &RefTable) -> Result<()> {
        if record.is_unmapped() || record.is_secondary() || record.is_supplementary() {
            return Ok(());
        }

        let tid = record.tid();
        if !self.by_tid.contains_key(&tid) {
            let reference = refs
                .get(tid)
                .ok_or_else(|| anyhow!("Alignment refers to unknown reference id {}", tid))?;
            // names decoded lossily from the header can collide
            let name = if self.by_tid.values().any(|c| c.name == reference.name) {
                format!("{}#{}", reference.name, tid)
            } else {
                reference.name.clone()
            };
            self.by_tid.insert(
                tid,
                ReferenceCounts {
                    name,
                    length: reference.length,
                    mapped_reads: 0,
                    aligned_bases: 0,
                },
            );
        }

        if let Some(counts) = self.by_tid.get_mut(&tid) {
            counts.mapped_reads += 1;
            counts.aligned_bases += Self::aligned_bases(record);
        }
        Ok(())
    }

    fn append_json(&self, report: &mut Report) -> Result<()> {
        let mut section = report.section(self.section.as_str())?;
        for counts in self.by_tid.values() {
            let mut entry = section.section(counts.name.as_str())?;
            entry.insert("length", counts.length)?;
            entry.insert("mapped_reads", counts.mapped_reads)?;
            entry.insert("aligned_bases", counts.aligned_bases)?;
            let mean_depth = if counts.length > 0 {
                counts.aligned_bases as f64 / counts.length as f64
            } else {
                0.0
            };
            entry.insert("mean_depth", mean_depth)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::reference::RefData;
    use crate::collectors::test_support::*;
    use serde_json::json;

    #[test]
    fn test_counts_per_reference() {
        let refs = ref_table();
        let mut coverage = CoverageByReference::new();
        for record in [
            aligned(0, 100, 60, 0),
            aligned(0, 100, 60, FLAG_REVERSE),
            aligned(1, 50, 60, 0),
            aligned(1, 50, 60, FLAG_SECONDARY),
            unmapped(100),
        ] {
            coverage.process_alignment(&record, &refs).unwrap();
        }

        assert_eq!(coverage.mapped_reads("chr1"), 2);
        assert_eq!(coverage.mapped_reads("chrM"), 1);

        let mut report = Report::new();
        coverage.append_json(&mut report).unwrap();
        let chr1 = &report.get("references").unwrap()["chr1"];
        assert_eq!(chr1["aligned_bases"], json!(200));
        assert_eq!(chr1["mean_depth"], json!(0.2));
    }

    #[test]
    fn test_same_named_references_stay_apart() {
        let refs: RefTable = [0u64, 1]
            .iter()
            .map(|&i| RefData {
                name: "chr\u{FFFD}".to_string(),
                length: 100 + i,
            })
            .collect();
        let mut coverage = CoverageByReference::new();
        coverage.process_alignment(&aligned(0, 10, 60, 0), &refs).unwrap();
        coverage.process_alignment(&aligned(1, 10, 60, 0), &refs).unwrap();

        let mut report = Report::new();
        coverage.append_json(&mut report).unwrap();
        let section = report.get("references").unwrap();
        assert_eq!(section["chr\u{FFFD}"]["length"], json!(100));
        assert_eq!(section["chr\u{FFFD}#1"]["length"], json!(101));
    }

    #[test]
    fn test_unknown_reference_is_error() {
        let refs = ref_table();
        let mut coverage = CoverageByReference::new();
        let err = coverage
            .process_alignment(&aligned(7, 10, 60, 0), &refs)
            .unwrap_err();
        assert!(err.to_string().contains("unknown reference id 7"));
    }
}
