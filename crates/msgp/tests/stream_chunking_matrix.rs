use msgp::{encode, StreamDecoder, Value};

/// Feeds `bytes` split at every combination of chunk boundaries (all
/// 2^(n-1) contiguous partitions) and asserts each run yields exactly
/// `expected`.
fn assert_all_partitions(bytes: &[u8], expected: &Value) {
    let n = bytes.len();
    assert!(n <= 16, "exhaustive partitioning is exponential");
    for mask in 0u32..(1 << (n - 1)) {
        let mut decoder = StreamDecoder::new();
        let mut values = Vec::new();
        let mut start = 0;
        for i in 0..n {
            let boundary = i + 1 == n || mask & (1 << i) != 0;
            if boundary {
                values.extend(decoder.feed(&bytes[start..=i]).unwrap());
                start = i + 1;
            }
        }
        assert_eq!(
            values.len(),
            1,
            "partition mask {mask:#b} of {bytes:02x?} yielded {values:?}"
        );
        assert_eq!(&values[0], expected);
        assert!(decoder.is_idle());
    }
}

/// Feeds `bytes` one byte at a time.
fn assert_byte_at_a_time(bytes: &[u8], expected: &Value) {
    let mut decoder = StreamDecoder::new();
    let mut values = Vec::new();
    for (i, byte) in bytes.iter().enumerate() {
        let step = decoder.feed(std::slice::from_ref(byte)).unwrap();
        if i + 1 < bytes.len() {
            assert!(step.is_empty(), "value completed early at byte {i}");
        }
        values.extend(step);
    }
    assert_eq!(values, vec![expected.clone()]);
}

#[test]
fn all_partitions_of_small_values() {
    let cases = vec![
        Value::Str("foo".into()),
        Value::Int(-12345),
        Value::UInt(0xdead_beef_cafe_f00d),
        Value::Float(0.1),
        Value::Bin(vec![1, 2, 3, 4]),
        Value::Array(vec![Value::Int(1), Value::Str("x".into())]),
        Value::Map(vec![("k".into(), Value::Array(vec![Value::Nil]))]),
    ];
    for value in cases {
        let bytes = encode(&value).unwrap();
        assert_all_partitions(&bytes, &value);
    }
}

#[test]
fn byte_at_a_time_for_larger_values() {
    let cases = vec![
        Value::Map(vec![
            ("a".into(), Value::Int(1)),
            (
                "b".into(),
                Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
            ),
        ]),
        Value::Str("a".repeat(300)),      // str16 header
        Value::Bin(vec![0xab; 300]),      // bin16 header
        Value::Array(vec![Value::Int(9); 20]), // array16 header
        Value::Ext(Box::new(msgp::Extension::new(5, Value::Bin(vec![7; 20])))),
    ];
    for value in cases {
        let bytes = encode(&value).unwrap();
        assert_byte_at_a_time(&bytes, &value);
    }
}

#[test]
fn split_mid_payload_scenario() {
    // A 3-byte fixstr split after two payload bytes: nothing after the
    // first chunk, "foo" after the second.
    let mut decoder = StreamDecoder::new();
    assert!(decoder.feed(&[0xa3, b'f', b'o']).unwrap().is_empty());
    assert_eq!(
        decoder.feed(&[b'o']).unwrap(),
        vec![Value::Str("foo".into())]
    );
}

#[test]
fn chunk_may_complete_one_value_and_start_the_next() {
    let mut decoder = StreamDecoder::new();
    // "ab" complete + the header of a following fixstr.
    let values = decoder.feed(&[0xa2, b'a', b'b', 0xa1]).unwrap();
    assert_eq!(values, vec![Value::Str("ab".into())]);
    assert_eq!(decoder.feed(&[b'c']).unwrap(), vec![Value::Str("c".into())]);
}

#[test]
fn back_to_back_roots_split_arbitrarily() {
    // Two values whose bytes are interleaved across three chunks.
    let mut stream = Vec::new();
    stream.extend(encode(&Value::Int(1000)).unwrap());
    stream.extend(encode(&Value::Str("next".into())).unwrap());
    let mut decoder = StreamDecoder::new();
    let mut values = Vec::new();
    values.extend(decoder.feed(&stream[..2]).unwrap());
    values.extend(decoder.feed(&stream[2..5]).unwrap());
    values.extend(decoder.feed(&stream[5..]).unwrap());
    assert_eq!(
        values,
        vec![Value::Int(1000), Value::Str("next".into())]
    );
}

#[test]
fn suspended_state_survives_many_feeds() {
    // A deeply nested value trickled in over dozens of calls, with empty
    // chunks sprinkled in.
    let value = Value::Array(vec![
        Value::Map(vec![(
            "k".into(),
            Value::Array(vec![Value::Str("abcdefgh".into()), Value::Int(-1)]),
        )]),
        Value::Bin(vec![9; 10]),
    ]);
    let bytes = encode(&value).unwrap();
    let mut decoder = StreamDecoder::new();
    let mut values = Vec::new();
    for byte in &bytes {
        values.extend(decoder.feed(&[]).unwrap());
        values.extend(decoder.feed(std::slice::from_ref(byte)).unwrap());
    }
    assert_eq!(values, vec![value]);
    assert!(decoder.is_idle());
}
