use crate::collectors::{build_tree, CollectorTree, NodeId, RefTable, Report};
use crate::config::Config;
use crate::utils::bam_reader::BamReaderFactory;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rust_htslib::bam::{self, Read};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// How much input to consume and how often to emit live snapshots
#[derive(Debug, Clone, Default)]
pub struct RunLimits {
    pub update_interval: u64,
    pub max_records: Option<u64>,
}

impl RunLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            update_interval: config.update_interval,
            max_records: config.max_records,
        }
    }
}

pub fn run(
    bam_file: String,
    output_file: String,
    reference_file: Option<String>,
    config: Config,
) -> Result<()> {
    let limits = RunLimits::from_config(&config);
    let (mut tree, root) = build_tree(&config.collectors)?;

    let mut bam = BamReaderFactory::open(&bam_file, reference_file.as_deref())?;
    let refs = RefTable::from_header(bam.header());
    log::info!(
        "Collecting statistics from {} ({} reference sequences)",
        bam_file,
        refs.len()
    );

    let progress = ProgressBarBuilder::new("Collecting alignment statistics...")
        .with_template("{spinner:.green} [{elapsed_precise}] {msg}")
        .with_tick()
        .hidden(limits.update_interval > 0)
        .build()?;

    let stderr = io::stderr();
    let processed = collect(
        &mut tree,
        root,
        bam.records(),
        &refs,
        &limits,
        &progress,
        |report| {
            let mut out = stderr.lock();
            writeln!(out, "{}", report.to_json_string()?)?;
            Ok(())
        },
    )?;
    progress.finish_with_message(format!("Processed {} records", processed));

    let report = assemble_report(&tree, root, processed)?;
    write_report(&report, &output_file)?;
    log::info!("Report written to {}", output_file);
    Ok(())
}

/// Feed every record to the tree, emitting a snapshot every `update_interval` records.
///
/// Returns the number of records processed.
pub fn collect<I, E, F>(
    tree: &mut CollectorTree,
    root: NodeId,
    records: I,
    refs: &RefTable,
    limits: &RunLimits,
    progress: &ProgressBar,
    mut on_snapshot: F,
) -> Result<u64>
where
    I: IntoIterator<Item = std::result::Result<bam::Record, E>>,
    E: Into<anyhow::Error>,
    F: FnMut(&Report) -> Result<()>,
{
    let mut processed = 0u64;

    for result in records {
        if limits.max_records.is_some_and(|max| processed >= max) {
            log::info!("Stopping after {} records", processed);
            break;
        }

        let record = result.map_err(Into::<anyhow::Error>::into)?;
        tree.process_alignment(root, &record, refs)
            .with_context(|| format!("Failed to process record {}", processed + 1))?;
        processed += 1;

        if limits.update_interval > 0 && processed % limits.update_interval == 0 {
            let snapshot = assemble_report(tree, root, processed)?;
            on_snapshot(&snapshot)?;
        }

        if processed % 10000 == 0 {
            progress.set_message(format!("Processed {} reads...", processed));
        }
    }

    Ok(processed)
}

/// Section holding run metadata, ahead of the collectors' own fields
pub const RUN_SECTION: &str = "run";

/// The tree's report, prefixed with the number of records it covers
pub fn assemble_report(tree: &CollectorTree, root: NodeId, processed: u64) -> Result<Report> {
    let mut report = Report::new();
    report
        .section(RUN_SECTION)?
        .insert("records_processed", processed)?;
    tree.build_report(root, Some(report))
}

fn write_report(report: &Report, output_file: &str) -> Result<()> {
    let json = report.to_json_string_pretty()?;
    if output_file == "-" {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", json)?;
        out.flush()?;
    } else {
        let mut writer = BufWriter::new(
            File::create(output_file)
                .with_context(|| format!("Failed to create {}", output_file))?,
        );
        writeln!(writer, "{}", json)?;
        writer.flush()?;
    }
    Ok(())
}
