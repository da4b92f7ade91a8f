use crate::collectors::collector::StatCollector;
use crate::collectors::filter::RecordFilter;
use crate::collectors::reference::RefTable;
use crate::collectors::report::Report;
use anyhow::Result;
use rust_htslib::bam;

type Predicate = Box<dyn Fn(&bam::Record) -> bool>;

/// Counts the records a predicate accepts, reported as `{name: {count: n}}`
pub struct RecordCounter {
    name: String,
    predicate: Predicate,
    count: u64,
}

impl RecordCounter {
    pub fn new(name: impl Into<String>, filter: RecordFilter) -> Self {
        Self::with_predicate(name, move |record| filter.matches(record))
    }

    pub fn with_predicate<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&bam::Record) -> bool + 'static,
    {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
            count: 0,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl StatCollector for RecordCounter {
    fn name(&self) -> &str {
        &self.name
    }

    fn process_alignment(&mut self, record: &bam::Record, _refs: &RefTable) -> Result<()> {
        if (self.predicate)(record) {
            self.count += 1;
        }
        Ok(())
    }

    fn append_json(&self, report: &mut Report) -> Result<()> {
        report.section(self.name.as_str())?.insert("count", self.count)?;
        Ok(())
    }
}
