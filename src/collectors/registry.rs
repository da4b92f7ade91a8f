use crate::collectors::basic::BasicStats;
use crate::collectors::collector::StatCollector;
use crate::collectors::counter::RecordCounter;
use crate::collectors::coverage::CoverageByReference;
use crate::collectors::filter::RecordFilter;
use crate::collectors::group::Group;
use crate::collectors::histogram::{MappingQualityHistogram, ReadLengthHistogram};
use crate::collectors::tree::{CollectorTree, NodeId, TreeError};
use serde::{Deserialize, Serialize};

/// Declarative description of one collector and, for groups, its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectorSpec {
    Counter {
        name: String,
        #[serde(default)]
        filter: RecordFilter,
    },
    Basic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Mapq {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    ReadLength {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    References {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Group {
        name: String,
        #[serde(default)]
        children: Vec<CollectorSpec>,
    },
}

impl CollectorSpec {
    fn instantiate(&self) -> Box<dyn StatCollector> {
        match self {
            CollectorSpec::Counter { name, filter } => Box::new(RecordCounter::new(name.as_str(), *filter)),
            CollectorSpec::Basic { name } => Box::new(match name {
                Some(name) => BasicStats::named(name.as_str()),
                None => BasicStats::new(),
            }),
            CollectorSpec::Mapq { name } => Box::new(match name {
                Some(name) => MappingQualityHistogram::named(name.as_str()),
                None => MappingQualityHistogram::new(),
            }),
            CollectorSpec::ReadLength { name } => Box::new(match name {
                Some(name) => ReadLengthHistogram::named(name.as_str()),
                None => ReadLengthHistogram::new(),
            }),
            CollectorSpec::References { name } => Box::new(match name {
                Some(name) => CoverageByReference::named(name.as_str()),
                None => CoverageByReference::new(),
            }),
            CollectorSpec::Group { name, .. } => Box::new(Group::named(name.as_str())),
        }
    }

    fn children(&self) -> &[CollectorSpec] {
        match self {
            CollectorSpec::Group { children, .. } => children,
            _ => &[],
        }
    }
}

/// The collectors used when no configuration names any
pub fn default_specs() -> Vec<CollectorSpec> {
    vec![
        CollectorSpec::Basic { name: None },
        CollectorSpec::Mapq { name: None },
        CollectorSpec::ReadLength { name: None },
        CollectorSpec::References { name: None },
    ]
}

/// Build a tree under an anonymous root group, children in `specs` order
pub fn build_tree(specs: &[CollectorSpec]) -> Result<(CollectorTree, NodeId), TreeError> {
    let mut tree = CollectorTree::new();
    let root = tree.insert(Group::anonymous());
    for spec in specs {
        attach(&mut tree, root, spec)?;
    }
    log::debug!("Built collector tree with {} nodes", tree.len());
    Ok((tree, root))
}

fn attach(tree: &mut CollectorTree, parent: NodeId, spec: &CollectorSpec) -> Result<(), TreeError> {
    let id = tree.insert_boxed(spec.instantiate());
    tree.add_child(parent, id)?;
    for child in spec.children() {
        attach(tree, id, child)?;
    }
    Ok(())
}
