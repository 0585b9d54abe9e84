//! Request dispatch against a live store

mod common;

use common::{pattern, sector_of, CountingStore, SECTOR};
use ramdisk_core::disk::Timestamp;
use ramdisk_core::{dispatch, BlockRequest, DispatchError, RamDisk, RamDiskConfig, StoreError};

#[test]
fn test_round_trip() {
    let (mut store, _) = CountingStore::ready(256);

    for (start, count) in [(0u64, 1usize), (7, 3), (100, 16), (255, 1)] {
        let data = pattern(count, start as u8);
        dispatch(&mut store, BlockRequest::write_from(start, &data)).unwrap();

        let mut back = vec![0u8; count * SECTOR];
        let done = dispatch(&mut store, BlockRequest::read_into(start, &mut back)).unwrap();
        assert_eq!(done.sectors, count as u64);
        assert_eq!(back, data, "start {} count {}", start, count);
    }
}

#[test]
fn test_repeated_reads_match() {
    let (mut store, _) = CountingStore::ready(64);
    let data = pattern(4, 0x3C);
    dispatch(&mut store, BlockRequest::write_from(20, &data)).unwrap();

    let mut first = vec![0u8; 4 * SECTOR];
    let mut second = vec![0u8; 4 * SECTOR];
    dispatch(&mut store, BlockRequest::read_into(20, &mut first)).unwrap();
    dispatch(&mut store, BlockRequest::read_into(20, &mut second)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, data);
}

#[test]
fn test_capacity_boundary() {
    let (mut store, _) = CountingStore::ready(64);
    let data = pattern(4, 1);

    // ends exactly at capacity
    assert!(dispatch(&mut store, BlockRequest::write_from(60, &data)).is_ok());

    let err = dispatch(&mut store, BlockRequest::write_from(61, &data)).unwrap_err();
    assert_eq!(
        err,
        DispatchError::Store {
            index: 0,
            error: StoreError::OutOfBounds {
                sector: 61,
                count: 4,
                total: 64
            }
        }
    );

    let mut back = vec![0u8; SECTOR];
    assert!(dispatch(&mut store, BlockRequest::read_into(64, &mut back))
        .unwrap_err()
        .is_bounds());
}

#[test]
fn test_segments_land_consecutively() {
    let (mut store, counters) = CountingStore::ready(32);
    let a = pattern(2, 0xA0);
    let b = pattern(3, 0xB0);

    let done = dispatch(&mut store, BlockRequest::write(10, vec![&a[..], &b[..]])).unwrap();
    assert_eq!(done.sectors, 5);
    assert_eq!(counters.writes(), 2);

    let bytes = store.bytes();
    assert_eq!(sector_of(bytes, 10), sector_of(&a, 0));
    assert_eq!(sector_of(bytes, 11), sector_of(&a, 1));
    assert_eq!(sector_of(bytes, 12), sector_of(&b, 0));
    assert_eq!(sector_of(bytes, 14), sector_of(&b, 2));
    assert!(sector_of(bytes, 9).iter().all(|&x| x == 0));
    assert!(sector_of(bytes, 15).iter().all(|&x| x == 0));
}

#[test]
fn test_gather_read() {
    let (mut store, _) = CountingStore::ready(32);
    let data = pattern(5, 0x42);
    dispatch(&mut store, BlockRequest::write_from(3, &data)).unwrap();

    let mut head = vec![0u8; SECTOR];
    let mut tail = vec![0u8; 4 * SECTOR];
    dispatch(
        &mut store,
        BlockRequest::read(3, vec![&mut head[..], &mut tail[..]]),
    )
    .unwrap();
    assert_eq!(&head[..], &data[..SECTOR]);
    assert_eq!(&tail[..], &data[SECTOR..]);
}

#[test]
fn test_short_segment_rejected_without_access() {
    let (mut store, counters) = CountingStore::ready(32);
    let bad = vec![0xFFu8; 511];

    let err = dispatch(&mut store, BlockRequest::write_from(0, &bad)).unwrap_err();
    assert_eq!(err, DispatchError::MalformedSegment { index: 0, len: 511 });
    assert_eq!(counters.accesses(), 0);
    assert!(store.bytes().iter().all(|&x| x == 0));
}

#[test]
fn test_earlier_segments_kept_after_bounds_failure() {
    let (mut store, counters) = CountingStore::ready(16);
    let a = pattern(2, 7);
    let b = pattern(4, 8);

    let err = dispatch(&mut store, BlockRequest::write(13, vec![&a[..], &b[..]])).unwrap_err();
    assert_eq!(err.segment(), 1);
    assert!(err.is_bounds());
    assert_eq!(counters.writes(), 2);
    assert_eq!(sector_of(store.bytes(), 13), sector_of(&a, 0));
    assert_eq!(sector_of(store.bytes(), 14), sector_of(&a, 1));
    assert!(sector_of(store.bytes(), 15).iter().all(|&x| x == 0));
}

#[test]
fn test_device_requests_preserve_layout() {
    let (store, _) = CountingStore::new(4096);
    let mut disk = RamDisk::bring_up(
        store,
        RamDiskConfig::with_sectors(4096),
        Timestamp::new(1, 2, 3),
    )
    .ok()
    .expect("bring-up");

    let data = pattern(8, 0x99);
    disk.submit(BlockRequest::write_from(2000, &data)).unwrap();
    assert!(disk.submit(BlockRequest::write_from(4095, &data[..SECTOR])).is_ok());
    assert!(disk
        .submit(BlockRequest::write_from(4096, &data[..SECTOR]))
        .unwrap_err()
        .is_bounds());

    let mut mbr = vec![0u8; SECTOR];
    disk.submit(BlockRequest::read_into(0, &mut mbr)).unwrap();
    assert_eq!(&mbr[510..], &[0x55, 0xAA]);
    assert_eq!(disk.partitions().unwrap().count(), 7);
}
