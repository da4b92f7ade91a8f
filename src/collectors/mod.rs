pub mod basic;
pub mod collector;
pub mod counter;
pub mod coverage;
pub mod filter;
pub mod group;
pub mod histogram;
pub mod reference;
pub mod registry;
pub mod report;
pub mod tree;

// Re-export commonly used items
pub use collector::StatCollector;
pub use filter::RecordFilter;
pub use reference::{RefData, RefTable};
pub use registry::{build_tree, CollectorSpec};
pub use report::{Report, ReportError, Section};
pub use tree::{CollectorTree, NodeId, TreeError};
