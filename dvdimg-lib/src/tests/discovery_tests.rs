use super::*;
use std::collections::HashMap;

use dvdimg_core::{DiscError, FileExtent, SECTOR_SIZE};

// -- Test helpers --

#[derive(Default)]
struct FakeFilesystem {
    files: HashMap<String, FileExtent>,
    broken: Vec<String>,
}

impl FakeFilesystem {
    fn with(mut self, name: &str, start: u64, sectors: u64) -> Self {
        self.files.insert(
            disc_path(name),
            FileExtent::new(start, sectors * SECTOR_SIZE as u64),
        );
        self
    }

    fn with_bytes(mut self, name: &str, start: u64, bytes: u64) -> Self {
        self.files.insert(disc_path(name), FileExtent::new(start, bytes));
        self
    }
}

impl FileLocator for FakeFilesystem {
    fn find_file(&mut self, path: &str) -> Result<Option<FileExtent>, DiscError> {
        if self.broken.iter().any(|p| p == path) {
            return Err(DiscError::invalid_filesystem("unreadable directory"));
        }
        Ok(self.files.get(path).copied())
    }
}

// -- Tests --

#[test]
fn empty_disc_has_no_blocks() {
    let mut fs = FakeFilesystem::default();
    let discovery = discover_layout(&mut fs);
    assert!(discovery.layout.entries().all(|(_, _, b)| !b.exists()));
    assert_eq!(discovery.titles_found, 0);
    assert!(discovery.status.is_success());
}

#[test]
fn video_manager_and_one_title() {
    let mut fs = FakeFilesystem::default()
        .with("VIDEO_TS.IFO", 100, 10)
        .with("VIDEO_TS.VOB", 110, 40)
        .with("VIDEO_TS.BUP", 150, 10)
        .with("VTS_01_0.IFO", 160, 8)
        .with("VTS_01_0.VOB", 168, 0)
        .with("VTS_01_1.VOB", 168, 500)
        .with("VTS_01_0.BUP", 668, 8);
    let discovery = discover_layout(&mut fs);
    let layout = &discovery.layout;

    assert_eq!(layout.block(0, Domain::Info), Block::new(100, 10));
    assert_eq!(layout.block(0, Domain::MenuVobs), Block::new(110, 40));
    assert_eq!(layout.block(0, Domain::TitleVobs), Block::MISSING);
    assert_eq!(layout.block(0, Domain::InfoBackup), Block::new(150, 10));
    assert_eq!(layout.block(1, Domain::Info), Block::new(160, 8));
    assert_eq!(layout.block(1, Domain::MenuVobs), Block::new(168, 0));
    assert_eq!(layout.block(1, Domain::TitleVobs), Block::new(168, 500));
    assert_eq!(layout.block(1, Domain::InfoBackup), Block::new(668, 8));
    assert_eq!(discovery.titles_found, 1);
    assert!(discovery.status.is_success());
}

#[test]
fn contiguous_parts_are_coalesced() {
    let mut fs = FakeFilesystem::default()
        .with("VTS_01_1.VOB", 10, 20)
        .with("VTS_01_2.VOB", 30, 15);
    let discovery = discover_layout(&mut fs);
    assert_eq!(
        discovery.layout.block(1, Domain::TitleVobs),
        Block::new(10, 35)
    );
    assert!(!discovery.status.contains(ExitStatus::MISMATCH));
}

#[test]
fn gap_between_parts_is_a_mismatch() {
    let mut fs = FakeFilesystem::default()
        .with("VTS_01_1.VOB", 10, 20)
        .with("VTS_01_2.VOB", 35, 15);
    let discovery = discover_layout(&mut fs);
    assert_eq!(
        discovery.layout.block(1, Domain::TitleVobs),
        Block::new(10, 35)
    );
    assert!(discovery.status.contains(ExitStatus::MISMATCH));
}

#[test]
fn missing_middle_part_is_skipped() {
    let mut fs = FakeFilesystem::default()
        .with("VTS_02_1.VOB", 0, 5)
        .with("VTS_02_3.VOB", 5, 5);
    let discovery = discover_layout(&mut fs);
    assert_eq!(discovery.layout.block(2, Domain::TitleVobs), Block::new(0, 10));
    assert!(discovery.status.is_success());
}

#[test]
fn later_part_without_first_is_adopted() {
    let mut fs = FakeFilesystem::default().with("VTS_03_2.VOB", 70, 5);
    let discovery = discover_layout(&mut fs);
    assert_eq!(discovery.layout.block(3, Domain::TitleVobs), Block::new(70, 5));
    assert!(discovery.status.contains(ExitStatus::MISMATCH));
}

#[test]
fn odd_byte_length_is_truncated() {
    let mut fs = FakeFilesystem::default().with_bytes("VTS_01_0.IFO", 40, 3 * 2048 + 5);
    let discovery = discover_layout(&mut fs);
    assert_eq!(discovery.layout.block(1, Domain::Info), Block::new(40, 3));
    assert!(discovery.status.is_success());
}

#[test]
fn titles_are_counted_by_information_file() {
    let mut fs = FakeFilesystem::default()
        .with("VIDEO_TS.IFO", 0, 1)
        .with("VTS_01_0.IFO", 1, 1)
        .with("VTS_05_0.IFO", 2, 1)
        .with("VTS_07_1.VOB", 3, 1);
    assert_eq!(discover_layout(&mut fs).titles_found, 2);
}

#[test]
fn failed_lookup_sets_io_and_continues() {
    let mut fs = FakeFilesystem::default().with("VTS_01_0.BUP", 9, 1);
    fs.broken.push(disc_path("VTS_01_0.IFO"));
    let discovery = discover_layout(&mut fs);
    assert!(discovery.status.contains(ExitStatus::IO));
    assert_eq!(discovery.layout.block(1, Domain::Info), Block::MISSING);
    assert_eq!(discovery.layout.block(1, Domain::InfoBackup), Block::new(9, 1));
}
