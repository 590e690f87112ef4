//! MTProto message identifiers and the single-message frame layout.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use mtp_tl_types::Prime;

/// Word offsets inside a framed message.
///
/// ```text
/// salt:       2 words
/// session_id: 2 words
/// msg_id:     2 words
/// seq_no:     1 word
/// length:     1 word (body length in bytes)
/// body:       length / 4 words
/// padding:    0..=3 random words
/// ```
pub mod layout {
    /// First salt word.
    pub const SALT: usize = 0;
    /// First session-id word.
    pub const SESSION_ID: usize = 2;
    /// First msg-id word.
    pub const MSG_ID: usize = 4;
    /// The seq-no word.
    pub const SEQ_NO: usize = 6;
    /// The body length word, in bytes.
    pub const LENGTH: usize = 7;
    /// First body word; also the total header size.
    pub const BODY: usize = 8;
}

/// A 64-bit MTProto message identifier.
///
/// The upper 32 bits are the (server-corrected) Unix time; the lower bits
/// count within the second. The two least significant bits are zero for
/// client messages.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MessageId(pub i64);

impl MessageId {
    /// Build an ID from the current clock shifted by `time_offset` seconds.
    pub(crate) fn now(time_offset: i32) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::from_unix(now.as_secs(), now.subsec_nanos(), time_offset)
    }

    /// ID for `secs` plus `time_offset` seconds, with `nanos` in the low half.
    ///
    /// Seconds wrap at 2^32, like the upper half of the ID.
    pub(crate) fn from_unix(secs: u64, nanos: u32, time_offset: i32) -> Self {
        let secs = u64::from((secs as u32).wrapping_add_signed(time_offset));
        Self(((secs << 32) | (u64::from(nanos) << 2)) as i64)
    }

    /// Unix time encoded in the upper half.
    pub fn unix_time(self) -> u32 { (self.0 as u64 >> 32) as u32 }

    /// Read an ID stored as two words, low half first.
    pub(crate) fn from_words(low: Prime, high: Prime) -> Self {
        Self((u64::from(low) | (u64::from(high) << 32)) as i64)
    }

    /// The two words of this ID, low half first.
    pub(crate) fn to_words(self) -> [Prime; 2] {
        [self.0 as u64 as Prime, (self.0 as u64 >> 32) as Prime]
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self { Self(id) }
}

/// Read a 64-bit value stored at `pos` in `words`, or 0 if out of range.
pub(crate) fn read_long(words: &[Prime], pos: usize) -> i64 {
    match words.get(pos..pos + 2) {
        Some(w) => MessageId::from_words(w[0], w[1]).0,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_seconds_past_2038() {
        let id = MessageId::from_unix(0x8000_0010, 3, -16);
        assert_eq!(id.unix_time(), 0x8000_0000);
        assert_eq!(id.0 as u64 & 0xffff_ffff, 12);

        let id = MessageId::from_unix(0x8000_0000, 0, 5);
        assert_eq!(id.unix_time(), 0x8000_0005);
        assert!(id.0 < 0);
    }

    #[test]
    fn offset_wraps_at_u32() {
        assert_eq!(MessageId::from_unix(0xffff_fffe, 0, 3).unix_time(), 1);
        assert_eq!(MessageId::from_unix(1, 0, -2).unix_time(), 0xffff_ffff);
    }
}
