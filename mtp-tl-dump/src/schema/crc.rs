/// Constructor ID of a definition written without `#id`.
///
/// The CRC32 of the whole line with runs of whitespace collapsed and the
/// trailing `;` dropped.
pub(crate) fn tl_id(definition: &str) -> u32 {
    let cleaned = definition.trim().trim_end_matches(';');
    let normalized = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    crc32(normalized.as_bytes())
}

/// CRC-32 (ISO 3309, reflected, polynomial 0xEDB88320).
fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_known_ids() {
        assert_eq!(tl_id("boolFalse = Bool"), 0xbc799737);
        assert_eq!(tl_id("boolTrue  =  Bool;"), 0x997275b5);
    }
}
