//! Property-based tests for the frame codec
//!
//! These tests verify invariants that must hold for all inputs:
//! - Any JSON value survives encode then decode unchanged
//! - Consecutive frames decode back in order
//! - The decoder never panics on arbitrary bytes
//!
//! Run with: cargo test --test property_tests

use proptest::prelude::*;
use serde_json::{Map, Value};

use serviceplex_mcp::core::transport::framing::{MAX_BODY_BYTES, parse_content_length};
use serviceplex_mcp::core::transport::{FrameReader, TransportResult, encode_frame};

/// Arbitrary JSON without floats (float text round-trips are not exact).
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        "\\PC*".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::btree_map("\\PC{0,12}", inner, 0..8)
                .prop_map(|fields| Value::Object(fields.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn decode_all(bytes: &[u8]) -> TransportResult<Vec<Value>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    runtime.block_on(async {
        let mut reader = FrameReader::new(bytes);
        let mut values = Vec::new();
        while let Some(value) = reader.read_frame().await? {
            values.push(value);
        }
        Ok(values)
    })
}

// ============================================================================
// ROUND-TRIP TESTS
// ============================================================================

mod round_trip_tests {
    use super::*;

    proptest! {
        /// Invariant: decode(encode(v)) == v
        #[test]
        fn single_frame(value in arb_json()) {
            let frame = encode_frame(&value).unwrap();
            let decoded = decode_all(&frame).unwrap();
            prop_assert_eq!(decoded, vec![value]);
        }

        /// Invariant: frames written back to back decode in order
        #[test]
        fn consecutive_frames(values in prop::collection::vec(arb_json(), 1..6)) {
            let mut stream = Vec::new();
            for value in &values {
                stream.extend(encode_frame(value).unwrap());
            }
            prop_assert_eq!(decode_all(&stream).unwrap(), values);
        }

        /// Invariant: the header states the exact body length in bytes
        #[test]
        fn header_matches_body_length(value in arb_json()) {
            let frame = encode_frame(&value).unwrap();
            let body_len = serde_json::to_vec(&value).unwrap().len();
            let header = format!("Content-Length: {}\r\n\r\n", body_len);
            prop_assert!(frame.starts_with(header.as_bytes()));
            prop_assert_eq!(frame.len(), header.len() + body_len);
        }
    }
}

// ============================================================================
// MALFORMED INPUT TESTS
// ============================================================================

mod malformed_input_tests {
    use super::*;

    proptest! {
        /// Invariant: the decoder returns an error, never panics, on garbage
        #[test]
        fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
            let _ = decode_all(&bytes);
        }

        /// Invariant: a truncated frame is always an error
        #[test]
        fn truncated_frame_is_error(value in arb_json(), cut in 1usize..16) {
            let frame = encode_frame(&value).unwrap();
            let cut = cut.min(frame.len() - 1);
            prop_assert!(decode_all(&frame[..frame.len() - cut]).is_err());
        }

        /// Invariant: accepted lengths are positive and within the body limit
        #[test]
        fn content_length_bounds(value in "\\PC{0,24}") {
            let header = format!("Content-Length: {}\r\n\r\n", value);
            if let Ok(length) = parse_content_length(header.as_bytes()) {
                prop_assert!(length > 0);
                prop_assert!(length <= MAX_BODY_BYTES);
            }
        }
    }
}
