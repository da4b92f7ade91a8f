use crate::collectors::reference::RefTable;
use crate::collectors::report::Report;
use anyhow::Result;
use rust_htslib::bam;

/// A node's pluggable statistics logic.
///
/// Implementations only see their own state. Propagation to children is
/// handled by [`CollectorTree`](crate::collectors::CollectorTree), so a leaf
/// statistic and a grouping node look the same once placed in the tree.
pub trait StatCollector {
    /// Short identifier used in log messages
    fn name(&self) -> &str;

    /// Update statistics from a single alignment
    fn process_alignment(&mut self, record: &bam::Record, refs: &RefTable) -> Result<()>;

    /// Write the collected statistics into the shared report
    fn append_json(&self, report: &mut Report) -> Result<()>;

    /// When set, this node and its whole subtree are emitted into a fresh
    /// report which is then inserted into the parent's report under this key.
    fn nested_section(&self) -> Option<&str> {
        None
    }
}
