use rust_htslib::bam::HeaderView;

/// One reference sequence (contig) an alignment can be placed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefData {
    pub name: String,
    pub length: u64,
}

/// The reference/contig table of an alignment file, indexed by target id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefTable {
    refs: Vec<RefData>,
}

impl RefTable {
    pub fn new(refs: Vec<RefData>) -> Self {
        Self { refs }
    }

    pub fn from_header(header: &HeaderView) -> Self {
        (0..header.target_count())
            .map(|tid| RefData {
                name: String::from_utf8_lossy(header.tid2name(tid)).into_owned(),
                length: header.target_len(tid).unwrap_or(0),
            })
            .collect()
    }

    /// Look up a record's target id. Negative ids (unplaced reads) yield `None`.
    pub fn get(&self, tid: i32) -> Option<&RefData> {
        usize::try_from(tid).ok().and_then(|i| self.refs.get(i))
    }

    pub fn name(&self, tid: i32) -> Option<&str> {
        self.get(tid).map(|r| r.name.as_str())
    }

    pub fn length(&self, tid: i32) -> Option<u64> {
        self.get(tid).map(|r| r.length)
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

impl FromIterator<RefData> for RefTable {
    fn from_iter<I: IntoIterator<Item = RefData>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
