use crate::collectors::collector::StatCollector;
use crate::collectors::reference::RefTable;
use crate::collectors::report::Report;
use anyhow::Result;
use rust_htslib::bam;
use serde::Serialize;

/// Flag-level read counts
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BasicCounts {
    pub total_reads: u64,
    pub mapped_reads: u64,
    pub unmapped_reads: u64,
    pub forward_strand: u64,
    pub reverse_strand: u64,
    pub failed_qc: u64,
    pub duplicates: u64,
    pub secondary: u64,
    pub supplementary: u64,
    pub paired_reads: u64,
    pub proper_pairs: u64,
    pub both_mates_mapped: u64,
    pub first_mates: u64,
    pub second_mates: u64,
    pub singletons: u64,
}

pub struct BasicStats {
    section: String,
    counts: BasicCounts,
}

impl BasicStats {
    pub fn new() -> Self {
        Self::named("basic")
    }

    pub fn named(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            counts: BasicCounts::default(),
        }
    }

    pub fn counts(&self) -> &BasicCounts {
        &self.counts
    }

    fn mapped_percent(&self) -> f64 {
        if self.counts.total_reads > 0 {
            (self.counts.mapped_reads as f64 / self.counts.total_reads as f64) * 100.0
        } else {
            0.0
        }
    }
}

impl Default for BasicStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StatCollector for BasicStats {
    fn name(&self) -> &str {
        &self.section
    }

    fn process_alignment(&mut self, record: &bam::Record, _refs: &RefTable) -> Result<()> {
        let c = &mut self.counts;
        c.total_reads += 1;

        if record.is_unmapped() {
            c.unmapped_reads += 1;
        } else {
            c.mapped_reads += 1;
            if record.is_reverse() {
                c.reverse_strand += 1;
            } else {
                c.forward_strand += 1;
            }
        }

        if record.is_quality_check_failed() {
            c.failed_qc += 1;
        }
        if record.is_duplicate() {
            c.duplicates += 1;
        }
        if record.is_secondary() {
            c.secondary += 1;
        }
        if record.is_supplementary() {
            c.supplementary += 1;
        }

        if record.is_paired() {
            c.paired_reads += 1;
            if record.is_proper_pair() {
                c.proper_pairs += 1;
            }
            if record.is_first_in_template() {
                c.first_mates += 1;
            }
            if record.is_last_in_template() {
                c.second_mates += 1;
            }
            if !record.is_unmapped() {
                if record.is_mate_unmapped() {
                    c.singletons += 1;
                } else {
                    c.both_mates_mapped += 1;
                }
            }
        }
        Ok(())
    }

    fn append_json(&self, report: &mut Report) -> Result<()> {
        let mut section = report.section(self.section.as_str())?;
        // struct fields go in declaration order
        if let serde_json::Value::Object(fields) = serde_json::to_value(&self.counts)? {
            for (key, value) in fields {
                section.insert(key, value)?;
            }
        }
        section.insert("mapped_percent", self.mapped_percent())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::test_support::*;
    use serde_json::json;

    #[test]
    fn test_counts_flags() {
        let refs = ref_table();
        let mut stats = BasicStats::new();
        let records = vec![
            aligned(0, 100, 60, FLAG_PAIRED | FLAG_PROPER | FLAG_READ1),
            aligned(0, 100, 60, FLAG_PAIRED | FLAG_PROPER | FLAG_READ2 | FLAG_REVERSE),
            aligned(1, 100, 0, FLAG_PAIRED | FLAG_MATE_UNMAPPED | FLAG_READ1 | FLAG_DUP),
            unmapped_with_flags(100, FLAG_PAIRED | FLAG_READ2),
        ];
        for record in &records {
            stats.process_alignment(record, &refs).unwrap();
        }

        let c = stats.counts();
        assert_eq!(c.total_reads, 4);
        assert_eq!(c.mapped_reads, 3);
        assert_eq!(c.unmapped_reads, 1);
        assert_eq!(c.forward_strand, 2);
        assert_eq!(c.reverse_strand, 1);
        assert_eq!(c.paired_reads, 4);
        assert_eq!(c.proper_pairs, 2);
        assert_eq!(c.first_mates, 2);
        assert_eq!(c.second_mates, 2);
        assert_eq!(c.singletons, 1);
        assert_eq!(c.both_mates_mapped, 2);
        assert_eq!(c.duplicates, 1);
    }

    #[test]
    fn test_report_section() {
        let refs = ref_table();
        let mut stats = BasicStats::named("flags");
        stats.process_alignment(&aligned(0, 10, 60, 0), &refs).unwrap();
        stats.process_alignment(&unmapped(10), &refs).unwrap();

        let mut report = Report::new();
        stats.append_json(&mut report).unwrap();
        let section = report.get("flags").unwrap();
        assert_eq!(section["total_reads"], json!(2));
        assert_eq!(section["mapped_reads"], json!(1));
        assert_eq!(section["mapped_percent"], json!(50.0));
    }
}
