use crate::collectors::collector::StatCollector;
use crate::collectors::reference::RefTable;
use crate::collectors::report::Report;
use anyhow::Result;
use rust_htslib::bam;

/// A node without statistics of its own, used to hold children.
///
/// A named group emits its subtree into a nested object under its name,
/// an anonymous group writes its children's fields flat into the parent.
pub struct Group {
    name: Option<String>,
}

impl Group {
    pub fn anonymous() -> Self {
        Self { name: None }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl StatCollector for Group {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("group")
    }

    fn process_alignment(&mut self, _record: &bam::Record, _refs: &RefTable) -> Result<()> {
        Ok(())
    }

    fn append_json(&self, _report: &mut Report) -> Result<()> {
        Ok(())
    }

    fn nested_section(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
