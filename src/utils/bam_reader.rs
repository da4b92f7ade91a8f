// src/utils/bam_reader.rs
use anyhow::{Context, Result};
use rust_htslib::bam;

/// Alignment path that selects standard input
pub const STDIN_PATH: &str = "-";

pub struct BamReaderFactory;

impl BamReaderFactory {
    /// Open a SAM, BAM or CRAM file, or stdin for `-`. CRAM needs the reference it was written against.
    pub fn open(bam_path: &str, reference_path: Option<&str>) -> Result<bam::Reader> {
        let mut reader = if bam_path == STDIN_PATH {
            bam::Reader::from_stdin().context("Failed to read alignments from stdin")?
        } else {
            bam::Reader::from_path(bam_path)
                .with_context(|| format!("Failed to open alignment file {}", bam_path))?
        };
        if let Some(ref_path) = reference_path {
            reader
                .set_reference(ref_path)
                .with_context(|| format!("Failed to set reference {}", ref_path))?;
        }
        Ok(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.bam");
        let err = BamReaderFactory::open(path.to_str().unwrap(), None).unwrap_err();
        assert!(format!("{:#}", err).contains("absent.bam"));
    }
}
