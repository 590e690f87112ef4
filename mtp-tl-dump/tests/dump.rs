use mtp_tl_dump::{DumpConfig, Registry, TextDumper, dump_to_text};
use mtp_tl_types::{Prime, Serializable, ids};

const PONG_TEXT: &str = "{ pong\n  msg_id: 4 [LONG],\n  ping_id: 7 [LONG]\n}";

fn pong() -> Vec<Prime> {
    let mut primes = vec![ids::PONG];
    4i64.serialize(&mut primes);
    7i64.serialize(&mut primes);
    primes
}

#[test]
fn dumps_pong() {
    assert_eq!(dump_to_text(&pong()), PONG_TEXT);
}

#[test]
fn dump_as_reads_bare_fields() {
    let text = TextDumper::new(Registry::global()).dump_as(&pong()[1..], ids::PONG);
    assert_eq!(text, PONG_TEXT);
}

#[test]
fn fieldless_constructor() {
    assert_eq!(dump_to_text(&[ids::BOOL_TRUE]), "{ boolTrue }");
}

#[test]
fn flags_gate_optional_fields() {
    let registry = Registry::builder()
        .schema("user#12345678 flags:# bot:flags.0?true name:flags.1?string id:long = User;")
        .build();
    let text = TextDumper::new(&registry).dump(&[0x12345678, 0b01, 9, 0]);
    assert_eq!(
        text,
        "{ user\n  flags: 0x00000001 [FLAGS],\n  bot: YES [ BY BIT 0 IN FIELD flags ],\n  \
         name: [ SKIPPED BY BIT 1 IN FIELD flags ],\n  id: 9 [LONG]\n}"
    );

    let mut primes = vec![0x12345678, 0b10];
    "ab".serialize(&mut primes);
    primes.extend([9, 0]);
    let text = TextDumper::new(&registry).dump(&primes);
    assert!(text.contains("bot: [ SKIPPED BY BIT 0 IN FIELD flags ]"));
    assert!(text.contains("name: \"ab\" [STRING]"));
}

#[test]
fn boxed_vector_of_longs() {
    let mut primes = vec![ids::MSGS_ACK, ids::VECTOR, 2];
    1i64.serialize(&mut primes);
    2i64.serialize(&mut primes);
    assert_eq!(
        dump_to_text(&primes),
        "{ msgs_ack\n  msg_ids: [ vector<long>\n    1 [LONG],\n    2 [LONG],\n  ]\n}"
    );
}

#[test]
fn empty_vector() {
    assert_eq!(dump_to_text(&[ids::VECTOR, 0]), "[ vector<Object> ]");
}

#[test]
fn container_of_messages() {
    let mut primes = vec![ids::MSG_CONTAINER, 1];
    100i64.serialize(&mut primes);
    primes.extend([1, 20]);
    primes.extend(pong());
    assert_eq!(
        dump_to_text(&primes),
        "{ msg_container\n  messages: [ vector<%Message>\n    { message\n      \
         msg_id: 100 [LONG],\n      seqno: 1 [INT],\n      bytes: 20 [INT],\n      \
         body: { pong\n        msg_id: 4 [LONG],\n        ping_id: 7 [LONG]\n      }\n    },\n  ]\n}"
    );
}

#[test]
fn dump_message_envelope() {
    let mut primes = Vec::new();
    100i64.serialize(&mut primes);
    primes.extend([3, 20]);
    primes.extend(pong());
    let text = TextDumper::new(Registry::global()).dump_message(&primes);
    assert!(text.starts_with("{ message\n  msg_id: 100 [LONG],\n  seqno: 3 [INT]"));
    assert!(text.contains("body: { pong"));
}

#[test]
fn unknown_constructor_is_reported() {
    assert_eq!(dump_to_text(&[0xdeadbeef]), "[UNKNOWN_TYPE_ID 0xdeadbeef]");
}

#[test]
fn truncated_input_ends_with_error() {
    let primes = pong();
    let text = dump_to_text(&primes[..4]);
    assert!(text.starts_with("{ pong\n  msg_id: 4 [LONG],\n  ping_id: "));
    assert!(text.ends_with("[ERROR] (insufficient data)"), "{text}");
}

#[test]
fn impossible_vector_count_is_an_error() {
    let text = dump_to_text(&[ids::VECTOR, 1_000_000, 1]);
    assert!(text.contains("[ERROR] ("));
}

#[test]
fn empty_input_is_an_error() {
    assert!(dump_to_text(&[]).starts_with("[ERROR] ("));
}

#[test]
fn garbage_never_panics() {
    let mut state: u32 = 0x2545_f491;
    let known = [ids::PONG, ids::VECTOR, ids::MSG_CONTAINER, ids::RPC_RESULT, ids::STRING];
    for round in 0..200 {
        let primes: Vec<Prime> = (0..64)
            .map(|i| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                if i % 7 == round % 7 { known[(state % 5) as usize] } else { state }
            })
            .collect();
        let _ = dump_to_text(&primes);
    }
}

#[test]
fn binary_bytes_are_hex() {
    let registry = Registry::builder().schema("blob#11111111 data:bytes = Blob;").build();
    let dumper = TextDumper::new(&registry);

    let mut primes = vec![0x11111111];
    [0xffu8, 0x00, 0x10][..].serialize(&mut primes);
    assert_eq!(dumper.dump(&primes), "{ blob\n  data: ff 00 10 [3 BYTES]\n}");

    let mut primes = vec![0x11111111];
    vec![0xffu8; 70].serialize(&mut primes);
    let preview = vec!["ff"; 16].join(" ");
    assert_eq!(
        dumper.dump(&primes),
        format!("{{ blob\n  data: {preview}... [70 BYTES]\n}}")
    );
}

#[test]
fn preview_length_is_configurable() {
    let registry = Registry::builder().schema("blob#11111111 data:bytes = Blob;").build();
    let config = DumpConfig { bytes_preview: 2, long_bytes_threshold: 4, ..DumpConfig::default() };
    let mut primes = vec![0x11111111];
    [0x80u8, 0x81, 0x82, 0x83, 0x84][..].serialize(&mut primes);
    let text = TextDumper::with_config(&registry, config).dump(&primes);
    assert!(text.contains("data: 80 81... [5 BYTES]"), "{text}");
}

#[test]
fn deep_nesting_does_not_overflow() {
    const DEPTH: usize = 100_000;
    let registry = Registry::builder().schema("wrap#aaaaaaaa inner:Object = Object;").build();
    let mut primes = vec![0xaaaaaaaa; DEPTH];
    primes.push(ids::BOOL_TRUE);

    let text = TextDumper::new(&registry).dump(&primes);
    assert!(!text.contains("[ERROR]"));
    assert_eq!(text.matches("{ wrap").count(), DEPTH);
    assert!(text.contains("{ boolTrue }"));
    assert!(text.ends_with('}'));
}

#[test]
fn indentation_is_capped() {
    let registry = Registry::builder().schema("wrap#aaaaaaaa inner:Object = Object;").build();
    let config = DumpConfig { max_indent: 3, ..DumpConfig::default() };
    let mut primes = vec![0xaaaaaaaa; 10];
    primes.push(ids::BOOL_TRUE);

    let text = TextDumper::with_config(&registry, config).dump(&primes);
    let widest = text.lines().map(|l| l.len() - l.trim_start().len()).max();
    assert_eq!(widest, Some(6));
}

#[test]
fn registry_has_pseudo_entries() {
    let registry = Registry::global();
    assert!(registry.contains(ids::MESSAGE));
    assert!(registry.contains(ids::MSG_CONTAINER));
    assert!(registry.contains(ids::DUMP_ROOT));
    assert_eq!(registry.id_of("pong"), Some(ids::PONG));
    assert_eq!(registry.id_of("help.configSimple"), Some(0x5a592a6c));
    assert!(registry.get(ids::PING).is_some_and(|info| info.is_function));
    assert!(registry.get(ids::PONG).is_some_and(|info| !info.is_function));
}

#[test]
fn later_schema_overrides_earlier() {
    let registry = Registry::builder().schema("pongish#347773c5 value:int = Pong;").build();
    assert_eq!(registry.get(ids::PONG).map(|i| i.name.as_str()), Some("pongish"));
}

#[test]
fn strict_build_reports_bad_lines() {
    assert!(Registry::builder().schema("broken#zz = X;").try_build().is_err());
    let lenient = Registry::builder().without_service_schema().schema("broken#zz = X;").build();
    assert_eq!(lenient.len(), 3);
}

#[cfg(feature = "gzip")]
fn gzip(primes: &[Prime]) -> Vec<Prime> {
    gzip_zeros_after(&mtp_tl_types::primes_to_bytes(primes), 0)
}

/// `gzip_packed` of `head` followed by `zeros` zero bytes.
#[cfg(feature = "gzip")]
fn gzip_zeros_after(head: &[u8], zeros: usize) -> Vec<Prime> {
    use std::io::Write;

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(head).unwrap();
    let chunk = vec![0u8; 64 * 1024];
    let mut left = zeros;
    while left > 0 {
        let n = left.min(chunk.len());
        encoder.write_all(&chunk[..n]).unwrap();
        left -= n;
    }
    let packed = encoder.finish().unwrap();

    let mut out = vec![ids::GZIP_PACKED];
    packed.serialize(&mut out);
    out
}

#[cfg(feature = "gzip")]
#[test]
fn gzip_packed_is_inflated() {
    assert_eq!(dump_to_text(&gzip(&pong())), format!("[GZIPPED] {PONG_TEXT}"));
}

#[cfg(feature = "gzip")]
#[test]
fn gzip_nesting_is_bounded() {
    let mut primes = pong();
    for _ in 0..5 {
        primes = gzip(&primes);
    }
    let text = dump_to_text(&primes);
    assert!(text.ends_with("[ERROR] (gzip_packed nested deeper than 4)"), "{text}");
}

#[cfg(feature = "gzip")]
#[test]
fn corrupt_gzip_is_an_error() {
    let mut primes = vec![ids::GZIP_PACKED];
    [1u8, 2, 3, 4, 5][..].serialize(&mut primes);
    let text = dump_to_text(&primes);
    assert!(text.starts_with("[GZIPPED] [ERROR] ("), "{text}");
}

#[cfg(feature = "gzip")]
#[test]
fn oversized_gzip_is_refused() {
    const MIB: usize = 1024 * 1024;
    let primes = gzip_zeros_after(&[], 24 * MIB);
    assert!(primes.len() < MIB / 4);

    let text = dump_to_text(&primes);
    assert_eq!(text, format!("[GZIPPED] [ERROR] (gzip inflate failed: payload exceeds {} bytes)", 16 * MIB));

    let registry = Registry::builder().build();
    let config = DumpConfig { max_inflated_bytes: MIB, ..DumpConfig::default() };
    let primes = gzip_zeros_after(&[], 4 * MIB);
    let text = TextDumper::with_config(&registry, config).dump(&primes);
    assert_eq!(text, format!("[GZIPPED] [ERROR] (gzip inflate failed: payload exceeds {MIB} bytes)"));
}

#[cfg(feature = "gzip")]
#[test]
fn gzip_at_the_limit_is_inflated() {
    let head = mtp_tl_types::primes_to_bytes(&pong());
    let config = DumpConfig { max_inflated_bytes: head.len() + 4096, ..DumpConfig::default() };
    let primes = gzip_zeros_after(&head, 4096);
    let text = TextDumper::with_config(Registry::global(), config).dump(&primes);
    assert_eq!(text, format!("[GZIPPED] {PONG_TEXT}"));
}
