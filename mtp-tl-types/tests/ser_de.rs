use mtp_tl_types::{
    BareType, Boxed, Cursor, Deserializable, Error, Int128, Int256, Serializable, TlBytes,
    TlVector, ids, primes_from_bytes,
};
use mtp_tl_types::serialize::MAX_BYTES_LEN;

// ── Primitive round-trips ─────────────────────────────────────────────────────

#[test]
fn roundtrip_i32() {
    for v in [0i32, -1, i32::MAX, i32::MIN, 42] {
        let primes = v.to_primes();
        assert_eq!(primes.len(), v.serialized_len());
        assert_eq!(i32::from_primes(&primes).unwrap(), v);
    }
}

#[test]
fn roundtrip_i64() {
    for v in [0i64, -1, i64::MAX, i64::MIN, 1_234_567_890_123] {
        let primes = v.to_primes();
        assert_eq!(primes.len(), 2);
        assert_eq!(i64::from_primes(&primes).unwrap(), v);
    }
}

#[test]
fn long_is_low_half_first() {
    let primes = 0x1122_3344_5566_7788i64.to_primes();
    assert_eq!(primes, vec![0x5566_7788, 0x1122_3344]);
    assert_eq!(0x1122_3344_5566_7788i64.to_bytes(), 0x1122_3344_5566_7788i64.to_le_bytes());
}

#[test]
fn roundtrip_double() {
    for v in [0.0f64, -1.5, f64::MAX, std::f64::consts::PI] {
        assert_eq!(f64::from_primes(&v.to_primes()).unwrap(), v);
    }
}

#[test]
fn roundtrip_bool() {
    assert_eq!(true.to_primes(), vec![ids::BOOL_TRUE]);
    assert_eq!(false.to_primes(), vec![ids::BOOL_FALSE]);
    assert!(bool::from_primes(&[ids::BOOL_TRUE]).unwrap());
    assert!(!bool::from_primes(&[ids::BOOL_FALSE]).unwrap());
}

#[test]
fn bool_rejects_foreign_id() {
    assert_eq!(
        bool::from_primes(&[ids::INT]),
        Err(Error::UnexpectedConstructor { id: ids::INT, context: "Bool" }),
    );
}

// ── Fixed-size integers ───────────────────────────────────────────────────────

#[test]
fn roundtrip_int128() {
    let bytes: [u8; 16] = core::array::from_fn(|i| i as u8 + 1);
    let v = Int128::from(bytes);
    let primes = v.to_primes();
    assert_eq!(primes.len(), 4);
    assert_eq!(Int128::from_primes(&primes).unwrap(), v);
    assert_eq!(v.to_bytes(), bytes);
}

#[test]
fn roundtrip_int256() {
    let bytes: [u8; 32] = core::array::from_fn(|i| i as u8);
    let v = Int256::from(bytes);
    assert_eq!(v.serialized_len(), 8);
    assert_eq!(Int256::from_primes(&v.to_primes()).unwrap(), v);
    assert_eq!(<[u8; 32]>::from(v), bytes);
}

// ── String / bytes ────────────────────────────────────────────────────────────

#[test]
fn three_byte_string_is_one_word() {
    let primes = "abc".to_primes();
    assert_eq!(primes.len(), 1);
    assert_eq!(primes[0].to_le_bytes(), [3, b'a', b'b', b'c']);
}

#[test]
fn roundtrip_empty_string() {
    let primes = "".to_primes();
    assert_eq!(primes, vec![0]);
    assert_eq!(String::from_primes(&primes).unwrap(), "");
}

#[test]
fn short_string_is_padded() {
    let s = "hello world".to_owned();
    let bytes = s.to_bytes();
    assert_eq!(bytes.len(), 12);
    assert_eq!(bytes[0], 11);
    assert_eq!(String::from_bytes(&bytes).unwrap(), s);
}

#[test]
fn length_253_uses_short_prefix() {
    let data = vec![0x5au8; 253];
    let bytes = data.to_bytes();
    assert_eq!(bytes[0], 253);
    assert_eq!(bytes.len(), 256);
    assert_eq!(data.serialized_len(), 64);
    assert_eq!(Vec::<u8>::from_bytes(&bytes).unwrap(), data);
}

#[test]
fn length_254_uses_long_prefix() {
    let data = vec![0xa5u8; 254];
    let bytes = data.to_bytes();
    assert_eq!(&bytes[..4], &[0xfe, 254, 0, 0]);
    assert_eq!(bytes.len(), 260);
    assert_eq!(data.serialized_len(), 65);
    assert_eq!(Vec::<u8>::from_bytes(&bytes).unwrap(), data);
}

#[test]
fn roundtrip_long_bytes() {
    let data: Vec<u8> = (0..70_000u32).map(|i| (i % 251) as u8).collect();
    let v = TlBytes::from(data.clone());
    let primes = v.to_primes();
    assert_eq!(primes.len(), v.serialized_len());
    assert_eq!(TlBytes::from_primes(&primes).unwrap().as_bytes(), &data[..]);
}

#[test]
fn longest_representable_bytes_round_trip() {
    let data = vec![0x5au8; MAX_BYTES_LEN];
    let mut primes = Vec::new();
    data.serialize(&mut primes);
    assert_eq!(primes[0].to_le_bytes(), [0xfe, 0xff, 0xff, 0xff]);
    assert_eq!(primes.len(), data.serialized_len());
    assert_eq!(Vec::<u8>::from_primes(&primes).unwrap().len(), MAX_BYTES_LEN);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "exceeds the 24-bit length prefix")]
fn oversized_bytes_panic_in_debug() {
    let data = vec![0u8; MAX_BYTES_LEN + 1];
    let mut primes = Vec::new();
    data.serialize(&mut primes);
}

#[test]
fn truncated_string_fails() {
    let mut primes = "hello world".to_primes();
    primes.pop();
    assert_eq!(String::from_primes(&primes), Err(Error::InsufficientData));
}

#[test]
fn tl_bytes_copy_on_write() {
    let y = TlBytes::from("shared");
    let mut x = y.clone();
    assert!(x.shares_storage_with(&y));
    x.make_mut().extend_from_slice(b"!");
    assert!(!x.shares_storage_with(&y));
    assert_eq!(y.as_str(), Some("shared"));
    assert_eq!(x.as_str(), Some("shared!"));
}

// ── Vectors ───────────────────────────────────────────────────────────────────

#[test]
fn empty_vector_of_int_is_one_word() {
    let v: TlVector<i32> = TlVector::new();
    assert_eq!(v.to_primes(), vec![0]);
    assert!(TlVector::<i32>::from_primes(&[0]).unwrap().is_empty());
}

#[test]
fn vector_preserves_order() {
    let v: TlVector<TlBytes> = ["a", "bb", "ccc"].into_iter().map(TlBytes::from).collect();
    let primes = v.to_primes();
    assert_eq!(primes.len(), v.serialized_len());
    let back = TlVector::<TlBytes>::from_primes(&primes).unwrap();
    let strs: Vec<_> = back.iter().map(|s| s.as_str().unwrap().to_owned()).collect();
    assert_eq!(strs, ["a", "bb", "ccc"]);
}

#[test]
fn vector_has_no_inter_element_padding() {
    let v: TlVector<i32> = vec![7, 8, 9].into();
    assert_eq!(v.to_primes(), vec![3, 7, 8, 9]);
}

#[test]
fn boxed_vector_carries_header() {
    let v: Boxed<TlVector<i64>> = Boxed::new(vec![1, -1].into());
    let primes = v.to_primes();
    assert_eq!(primes[0], ids::VECTOR);
    assert_eq!(primes[1], 2);
    assert_eq!(primes.len(), 6);
    let back = Boxed::<TlVector<i64>>::from_primes(&primes).unwrap();
    assert_eq!(back.get().as_slice(), &[1, -1]);
}

#[test]
fn nested_vectors_roundtrip() {
    let inner: TlVector<i32> = vec![1, 2].into();
    let v: TlVector<TlVector<i32>> = vec![inner.clone(), TlVector::new(), inner].into();
    let primes = v.to_primes();
    assert_eq!(primes, vec![3, 2, 1, 2, 0, 2, 1, 2]);
    assert_eq!(TlVector::<TlVector<i32>>::from_primes(&primes).unwrap(), v);
}

#[test]
fn oversized_count_fails_without_allocating() {
    assert_eq!(TlVector::<i32>::from_primes(&[u32::MAX, 1]), Err(Error::InsufficientData));
}

#[test]
fn vector_copy_on_write() {
    let y: TlVector<i32> = vec![1, 2, 3].into();
    let mut x = y.clone();
    assert!(x.is_shared());
    x.push(4);
    assert_eq!(y.as_slice(), &[1, 2, 3]);
    assert_eq!(x.as_slice(), &[1, 2, 3, 4]);
    assert!(!y.is_shared());
}

// ── Boxed / bare ──────────────────────────────────────────────────────────────

#[test]
fn boxed_int_roundtrip() {
    let v = Boxed::new(5i32);
    assert_eq!(v.to_primes(), vec![ids::INT, 5]);
    assert_eq!(Boxed::<i32>::from_primes(&[ids::INT, 5]).unwrap().into_inner(), 5);
}

#[test]
fn boxed_mismatch_is_unexpected_constructor() {
    assert_eq!(
        Boxed::<i64>::from_primes(&[ids::INT, 5, 0]),
        Err(Error::UnexpectedConstructor { id: ids::INT, context: "long" }),
    );
}

#[test]
fn boxed_read_without_id_is_insufficient() {
    assert_eq!(Boxed::<i32>::from_primes(&[]), Err(Error::InsufficientData));
}

#[test]
fn check_constructor_rejects_illegal_id() {
    assert_eq!(bool::check_constructor(ids::BOOL_TRUE), Ok(ids::BOOL_TRUE));
    assert_eq!(
        bool::check_constructor(0x1234),
        Err(Error::BadConstructorId { id: 0x1234, type_name: "Bool" }),
    );
}

// ── Cursor ────────────────────────────────────────────────────────────────────

#[test]
fn truncated_long_is_insufficient() {
    assert_eq!(i64::from_primes(&[1]), Err(Error::InsufficientData));
}

#[test]
fn cursor_tracks_position() {
    let primes = [1u32, 2, 3];
    let mut cur = Cursor::from_slice(&primes);
    assert_eq!(i32::deserialize(&mut cur).unwrap(), 1);
    assert_eq!(cur.pos(), 1);
    assert_eq!(cur.read_to_end(), &[2, 3]);
    assert!(cur.is_empty());
}

#[test]
fn partial_word_is_rejected() {
    assert_eq!(primes_from_bytes(&[1, 2, 3]), Err(Error::InsufficientData));
    assert_eq!(i32::from_bytes(&[1, 0]), Err(Error::InsufficientData));
}

// ── Option passthrough ────────────────────────────────────────────────────────

#[test]
fn option_none_writes_nothing() {
    let v: Option<i32> = None;
    assert!(v.to_primes().is_empty());
    assert_eq!(v.serialized_len(), 0);
}

#[test]
fn option_some_writes_inner() {
    let v: Option<i32> = Some(42);
    assert_eq!(v.to_primes(), 42i32.to_primes());
}
