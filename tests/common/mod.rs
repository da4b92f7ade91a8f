#![allow(dead_code)]

use bamstats_tree::{RefData, RefTable};
use rust_htslib::bam;
use rust_htslib::bam::record::{Cigar, CigarString};

pub const FLAG_PAIRED: u16 = 0x1;
pub const FLAG_PROPER: u16 = 0x2;
pub const FLAG_UNMAPPED: u16 = 0x4;
pub const FLAG_REVERSE: u16 = 0x10;
pub const FLAG_DUP: u16 = 0x400;

pub fn refs() -> RefTable {
    vec![("chr1", 248_956_422), ("chrY", 57_227_415)]
        .into_iter()
        .map(|(name, length)| RefData {
            name: name.to_string(),
            length,
        })
        .collect()
}

pub fn mapped(name: &str, tid: i32, mapq: u8, flags: u16) -> bam::Record {
    let mut record = bam::Record::new();
    let cigar = CigarString(vec![Cigar::Match(8)]);
    record.set(name.as_bytes(), Some(&cigar), b"ACGTACGT", &[35; 8]);
    record.set_tid(tid);
    record.set_pos(1000);
    record.set_mapq(mapq);
    record.set_flags(flags);
    record
}

pub fn unmapped(name: &str) -> bam::Record {
    let mut record = bam::Record::new();
    record.set(name.as_bytes(), None, b"ACGTACGT", &[35; 8]);
    record.set_tid(-1);
    record.set_pos(-1);
    record.set_flags(FLAG_UNMAPPED);
    record
}
