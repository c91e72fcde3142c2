//! Wire compatibility tests
//!
//! These decode hand-assembled byte streams the way a newer or older feed
//! producer might write them, and check the reader copes.

use std::sync::Arc;

use livetiming::codec::{ObjectReader, decode, encode};
use livetiming::messages::{Message, SetDriverPosition, StartSessionTimeCountdown};
use livetiming::types::Value;
use livetiming::{Registry, TimingError};

const OBJECT: u8 = 1;
const U8: u8 = 6;
const STRING: u8 = 18;
const SET_DRIVER_POSITION: i32 = 13097688;
const START_COUNTDOWN: i32 = -63715761;

fn registry() -> Arc<Registry> {
    Arc::new(Registry::standard().expect("standard registry"))
}

fn object_header(tag: i32, field_count: u8) -> Vec<u8> {
    let mut bytes = vec![OBJECT];
    bytes.extend_from_slice(&tag.to_le_bytes());
    bytes.push(field_count);
    bytes
}

#[test]
fn fields_added_by_newer_producers_are_skipped() {
    let mut bytes = object_header(SET_DRIVER_POSITION, 3);
    bytes.extend_from_slice(&[0, U8, 7]);
    bytes.extend_from_slice(&[9, STRING, 3, b'n', b'e', b'w']);
    bytes.extend_from_slice(&[1, U8, 2]);

    let value = decode(&registry(), &bytes).expect("decodes");
    let message = Message::from_value(&value).expect("message");
    assert_eq!(message, SetDriverPosition::new(7, 2).expect("valid").into());
}

#[test]
fn fields_missing_from_older_producers_keep_defaults() {
    let mut bytes = object_header(SET_DRIVER_POSITION, 1);
    bytes.extend_from_slice(&[0, U8, 7]);

    let value = decode(&registry(), &bytes).expect("decodes");
    match Message::from_value(&value).expect("message") {
        Message::SetDriverPosition(message) => {
            assert_eq!(message.driver_id(), 7);
            assert_eq!(message.position(), 0);
        }
        other => panic!("unexpected message {other:?}"),
    }
}

#[test]
fn narrowed_integers_are_written_at_their_smallest_width() {
    let registry = registry();
    let message: Message = SetDriverPosition::new(7, 300).expect("valid").into();
    let bytes = encode(&registry, &message.to_value()).expect("encodes");

    let mut expected = object_header(SET_DRIVER_POSITION, 2);
    expected.extend_from_slice(&[0, U8, 7]);
    expected.extend_from_slice(&[1, 7]);
    expected.extend_from_slice(&300i16.to_le_bytes());
    assert_eq!(bytes, expected);
}

#[test]
fn singletons_decode_to_one_shared_instance() {
    let bytes = object_header(START_COUNTDOWN, 0);
    let registry = registry();

    let first = decode(&registry, &bytes).expect("decodes");
    let second = decode(&registry, &bytes).expect("decodes");
    match (&first, &second) {
        (Value::Object(a), Value::Object(b)) => {
            assert!(Arc::ptr_eq(a, b));
            assert!(Arc::ptr_eq(a, &StartSessionTimeCountdown::canonical()));
        }
        _ => panic!("expected objects, got {first:?} and {second:?}"),
    }
}

#[test]
fn unknown_type_tags_are_rejected() {
    let bytes = object_header(12345, 0);
    let error = decode(&registry(), &bytes).expect_err("unknown tag");
    assert!(matches!(error, TimingError::UnknownTypeTag { tag: 12345 }));
}

#[test]
fn unassigned_type_codes_are_rejected() {
    let error = decode(&registry(), &[17]).expect_err("code 17 is unassigned");
    assert!(matches!(error, TimingError::InvalidTypeCode { code: 17, .. }));
}

#[test]
fn truncated_objects_report_end_of_stream() {
    let mut bytes = object_header(SET_DRIVER_POSITION, 2);
    bytes.extend_from_slice(&[0, U8, 7, 1]);
    let error = decode(&registry(), &bytes).expect_err("truncated");
    assert!(matches!(error, TimingError::UnexpectedEof { .. }));
}

#[test]
fn a_stream_of_values_reads_back_in_order() {
    let registry = registry();
    let mut bytes = Vec::new();
    for position in 1..=3 {
        let message: Message = SetDriverPosition::new(position, position).expect("valid").into();
        bytes.extend(encode(&registry, &message.to_value()).expect("encodes"));
    }

    let mut reader = ObjectReader::new(bytes.as_slice(), Arc::clone(&registry));
    let mut positions = Vec::new();
    while let Some(value) = reader.read_next().expect("reads") {
        match Message::from_value(&value).expect("message") {
            Message::SetDriverPosition(message) => positions.push(message.position()),
            other => panic!("unexpected message {other:?}"),
        }
    }
    assert_eq!(positions, vec![1, 2, 3]);
}
