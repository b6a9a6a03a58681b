use super::*;
use std::fs;

fn sector_filled(value: u8) -> Vec<u8> {
    vec![value; SECTOR_SIZE]
}

fn write_sectors(dir: &Path, name: &str, first_value: u8, sectors: usize) {
    let mut data = Vec::new();
    for i in 0..sectors {
        data.extend_from_slice(&sector_filled(first_value + i as u8));
    }
    fs::write(dir.join(name), data).unwrap();
}

#[test]
fn opens_video_manager_files() {
    let dir = tempfile::tempdir().unwrap();
    write_sectors(dir.path(), "VIDEO_TS.IFO", 1, 2);
    let mut reader = VideoTsDir::open(dir.path()).unwrap();

    let file = reader.open(0, Domain::Info).unwrap().unwrap();
    assert_eq!(file.size_bytes(), 2 * SECTOR_SIZE as u64);
    assert!(reader.open(0, Domain::InfoBackup).unwrap().is_none());
    assert!(reader.open(0, Domain::TitleVobs).unwrap().is_none());
}

#[test]
fn names_match_case_insensitively() {
    let dir = tempfile::tempdir().unwrap();
    write_sectors(dir.path(), "vts_01_0.ifo", 1, 1);
    let mut reader = VideoTsDir::open(dir.path()).unwrap();
    assert!(reader.open(1, Domain::Info).unwrap().is_some());
}

#[test]
fn title_vobs_concatenate_parts() {
    let dir = tempfile::tempdir().unwrap();
    write_sectors(dir.path(), "VTS_01_1.VOB", 10, 3);
    write_sectors(dir.path(), "VTS_01_2.VOB", 20, 2);
    let mut reader = VideoTsDir::open(dir.path()).unwrap();

    let mut file = reader.open(1, Domain::TitleVobs).unwrap().unwrap();
    assert_eq!(file.size_bytes(), 5 * SECTOR_SIZE as u64);

    let mut buf = vec![0u8; SECTOR_SIZE];
    file.read_block(2, &mut buf).unwrap();
    assert_eq!(buf, sector_filled(12));
    file.read_block(3, &mut buf).unwrap();
    assert_eq!(buf, sector_filled(20));
    file.read_block(4, &mut buf).unwrap();
    assert_eq!(buf, sector_filled(21));
}

#[test]
fn parts_stop_at_first_gap() {
    let dir = tempfile::tempdir().unwrap();
    write_sectors(dir.path(), "VTS_02_1.VOB", 1, 1);
    write_sectors(dir.path(), "VTS_02_3.VOB", 1, 4);
    let mut reader = VideoTsDir::open(dir.path()).unwrap();
    let file = reader.open(2, Domain::TitleVobs).unwrap().unwrap();
    assert_eq!(file.size_bytes(), SECTOR_SIZE as u64);
}

#[test]
fn block_straddling_parts_is_stitched() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("VTS_03_1.VOB"), vec![1u8; SECTOR_SIZE + 100]).unwrap();
    fs::write(dir.path().join("VTS_03_2.VOB"), vec![2u8; SECTOR_SIZE - 100]).unwrap();
    let mut reader = VideoTsDir::open(dir.path()).unwrap();
    let mut file = reader.open(3, Domain::TitleVobs).unwrap().unwrap();

    let mut buf = vec![0u8; SECTOR_SIZE];
    file.read_block(1, &mut buf).unwrap();
    assert!(buf[..100].iter().all(|&b| b == 1));
    assert!(buf[100..].iter().all(|&b| b == 2));
}

#[test]
fn reading_past_end_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_sectors(dir.path(), "VTS_01_0.BUP", 1, 1);
    let mut reader = VideoTsDir::open(dir.path()).unwrap();
    let mut file = reader.open(1, Domain::InfoBackup).unwrap().unwrap();
    let mut buf = vec![0u8; SECTOR_SIZE];
    assert!(matches!(
        file.read_block(1, &mut buf),
        Err(DiscError::OutOfRange(1))
    ));
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(VideoTsDir::open(dir.path().join("VIDEO_TS")).is_err());
}

#[test]
fn subdirectories_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("VIDEO_TS.IFO")).unwrap();
    let mut reader = VideoTsDir::open(dir.path()).unwrap();
    assert!(reader.open(0, Domain::Info).unwrap().is_none());
}
