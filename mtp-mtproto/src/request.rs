//! Outgoing message frames.
//!
//! A [`Request`] owns the whole prime buffer of one message: the eight-word
//! header, the body and, once finalized, the random padding. The buffer is
//! copy-on-write, so cloning a request to keep it for resending costs a
//! reference count until one of the copies is modified.

use std::time::Instant;

use mtp_tl_types::{ConstructorId, Deserializable, Prime, Serializable, TlVector, ids};
use rand::Rng;

use crate::message::{MessageId, layout, read_long};

/// Client-side handle of an RPC call.
pub type RequestId = i32;

/// Body tag of a sent-container record. No schema constructor is zero.
const SENT_CONTAINER_TAG: Prime = 0;

/// Number of random padding words after a body of `payload_words`.
///
/// Header plus body plus padding is always a multiple of four words.
pub fn padding_words(payload_words: usize) -> usize {
    (4 - (layout::BODY + payload_words) % 4) % 4
}

/// Already-serialized primes, written verbatim.
#[derive(Clone, Copy, Debug)]
pub struct RawPrimes<'a>(pub &'a [Prime]);

impl Serializable for RawPrimes<'_> {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        buf.extend(self.0.iter().copied());
    }

    fn serialized_len(&self) -> usize { self.0.len() }
}

/// One outgoing MTProto message.
#[derive(Clone, Debug)]
pub struct Request {
    data: TlVector<Prime>,
    request_id: RequestId,
    after: Option<RequestId>,
    needs_layer: bool,
    last_sent: Option<Instant>,
}

impl Request {
    /// Allocate a frame for a body of `payload_words` words.
    ///
    /// Capacity is reserved for `max(payload_words, max_words)` body words so
    /// the body can be appended without reallocating. Only the header exists
    /// afterwards, with its length word already set.
    pub fn prepare(payload_words: usize, max_words: usize) -> Self {
        let mut data = Vec::with_capacity(layout::BODY + payload_words.max(max_words) + 3);
        data.resize(layout::BODY, 0);
        data[layout::LENGTH] = (payload_words << 2) as Prime;
        Self {
            data: data.into(),
            request_id: 0,
            after: None,
            needs_layer: false,
            last_sent: None,
        }
    }

    /// Frame a serializable value as the message body.
    pub fn serialize<S: Serializable + ?Sized>(value: &S) -> Self {
        let mut request = Self::prepare(value.serialized_len(), 0);
        value.serialize(request.data.make_mut());
        request
    }

    /// Append a value to the body.
    ///
    /// The length word is not touched; it must already cover everything
    /// written, as set up by [`Request::prepare`].
    pub fn write<S: Serializable + ?Sized>(&mut self, value: &S) {
        value.serialize(self.data.make_mut());
    }

    /// Record of a sent container, kept so its ID can be mapped back to
    /// the messages it carried.
    pub fn sent_container(msg_ids: &[MessageId]) -> Self {
        let ids: TlVector<i64> = msg_ids.iter().map(|id| id.0).collect();
        let mut request = Self::prepare(1 + ids.serialized_len(), 0);
        request.write(&SENT_CONTAINER_TAG);
        request.write(&ids);
        request
    }

    /// Build a request carrying `body`, with this request's header and
    /// bookkeeping.
    pub fn with_body<S: Serializable + ?Sized>(&self, body: &S) -> Self {
        let mut wrapped = Self::serialize(body);
        let header = &self.primes()[..layout::LENGTH];
        wrapped.data.make_mut()[..layout::LENGTH].copy_from_slice(header);
        wrapped.request_id = self.request_id;
        wrapped.after = self.after;
        wrapped.needs_layer = self.needs_layer;
        wrapped.last_sent = self.last_sent;
        wrapped
    }

    /// Append random padding so the frame is a multiple of four words.
    ///
    /// Only a frame whose written body matches its length word is padded.
    /// A frame holding only its header, one already padded, or one whose
    /// body length disagrees with the length word is left alone.
    pub fn padding(&mut self) {
        if self.data.len() <= layout::BODY {
            return;
        }
        let payload = self.payload_words();
        let pad = padding_words(payload);
        let written = layout::BODY + payload;
        if self.data.len() != written {
            if self.data.len() != written + pad {
                log::warn!(
                    "[mtp] not padding frame: {} body words written, length word says {payload}",
                    self.data.len() - layout::BODY
                );
            }
            return;
        }
        let data = self.data.make_mut();
        data.resize(written + pad, 0);
        rand::thread_rng().fill(&mut data[written..]);
        log::trace!("[mtp] padded frame: {payload} body words + {pad} padding");
    }

    // ── Sizes ─────────────────────────────────────────────────────────────

    /// Body length in bytes, from the length word.
    pub fn inner_length(&self) -> usize {
        self.primes().get(layout::LENGTH).map_or(0, |&len| len as usize)
    }

    /// Body length in words.
    pub fn payload_words(&self) -> usize { self.inner_length() >> 2 }

    /// Words this message occupies inside a container:
    /// msg_id, seq_no, length and body.
    pub fn message_size(&self) -> usize { 4 + self.payload_words() }

    /// The whole frame.
    pub fn primes(&self) -> &[Prime] { self.data.as_slice() }

    /// The whole frame as little-endian bytes.
    pub fn to_bytes(&self) -> Vec<u8> { mtp_tl_types::primes_to_bytes(self.primes()) }

    /// The message part of the frame as it goes inside a container.
    ///
    /// Clipped to what has been written if the body is short.
    pub fn message_primes(&self) -> &[Prime] {
        let primes = self.primes();
        let end = (layout::MSG_ID + self.message_size()).min(primes.len());
        primes.get(layout::MSG_ID..end).unwrap_or(&[])
    }

    /// The body words, clipped to what has been written.
    pub fn body(&self) -> &[Prime] {
        let primes = self.primes();
        let end = (layout::BODY + self.payload_words()).min(primes.len());
        primes.get(layout::BODY..end).unwrap_or(&[])
    }

    /// Constructor ID of the body, if one has been written.
    pub fn constructor(&self) -> Option<ConstructorId> {
        self.primes().get(layout::BODY).copied()
    }

    // ── Header fields ─────────────────────────────────────────────────────

    /// Server salt.
    pub fn salt(&self) -> i64 { read_long(self.primes(), layout::SALT) }

    /// Session ID.
    pub fn session_id(&self) -> i64 { read_long(self.primes(), layout::SESSION_ID) }

    /// Message ID.
    pub fn msg_id(&self) -> MessageId { MessageId(read_long(self.primes(), layout::MSG_ID)) }

    /// Sequence number.
    pub fn seq_no(&self) -> i32 {
        self.primes().get(layout::SEQ_NO).map_or(0, |&s| s as i32)
    }

    /// Set the server salt.
    pub fn set_salt(&mut self, salt: i64) { self.write_long(layout::SALT, salt); }

    /// Set the session ID.
    pub fn set_session_id(&mut self, id: i64) { self.write_long(layout::SESSION_ID, id); }

    /// Set the message ID.
    pub fn set_msg_id(&mut self, id: MessageId) { self.write_long(layout::MSG_ID, id.0); }

    /// Set the sequence number.
    pub fn set_seq_no(&mut self, seq_no: i32) {
        self.data.make_mut()[layout::SEQ_NO] = seq_no as Prime;
    }

    fn write_long(&mut self, pos: usize, value: i64) {
        self.data.make_mut()[pos..pos + 2].copy_from_slice(&MessageId(value).to_words());
    }

    // ── Classification ────────────────────────────────────────────────────

    /// Whether the receiver must acknowledge this message.
    ///
    /// Containers, acks and the service notifications are not acknowledged;
    /// everything else is.
    pub fn needs_ack(&self) -> bool {
        match self.constructor() {
            None => false,
            Some(id) => !matches!(
                id,
                SENT_CONTAINER_TAG
                    | ids::MSG_CONTAINER
                    | ids::MSGS_ACK
                    | ids::HTTP_WAIT
                    | ids::BAD_MSG_NOTIFICATION
                    | ids::MSGS_ALL_INFO
                    | ids::MSGS_STATE_INFO
                    | ids::MSG_DETAILED_INFO
                    | ids::MSG_NEW_DETAILED_INFO
            ),
        }
    }

    /// True for records built by [`Request::sent_container`].
    pub fn is_sent_container(&self) -> bool {
        self.constructor() == Some(SENT_CONTAINER_TAG)
    }

    /// True when the body is a `msgs_state_req`.
    pub fn is_state_request(&self) -> bool {
        self.constructor() == Some(ids::MSGS_STATE_REQ)
    }

    /// IDs listed in a sent-container record.
    pub fn sent_container_ids(&self) -> Option<Vec<MessageId>> {
        if !self.is_sent_container() {
            return None;
        }
        let ids = TlVector::<i64>::from_primes(self.body().get(1..)?).ok()?;
        Some(ids.iter().map(|&id| MessageId(id)).collect())
    }

    // ── Bookkeeping ───────────────────────────────────────────────────────

    /// Client-side request handle.
    pub fn request_id(&self) -> RequestId { self.request_id }

    /// Set the client-side request handle.
    pub fn set_request_id(&mut self, id: RequestId) { self.request_id = id; }

    /// Request that must be answered before this one is invoked.
    pub fn after(&self) -> Option<RequestId> { self.after }

    /// Make this request wait for another.
    pub fn set_after(&mut self, after: Option<RequestId>) { self.after = after; }

    /// Whether the body still needs the layer wrapper.
    pub fn needs_layer(&self) -> bool { self.needs_layer }

    /// Mark whether the body still needs the layer wrapper.
    pub fn set_needs_layer(&mut self, needs_layer: bool) { self.needs_layer = needs_layer; }

    /// When this request was last handed to the transport.
    pub fn last_sent(&self) -> Option<Instant> { self.last_sent }

    /// Stamp the request as sent now.
    pub fn mark_sent(&mut self) { self.last_sent = Some(Instant::now()); }

    /// True when both values alias the same frame buffer.
    pub fn shares_buffer_with(&self, other: &Self) -> bool {
        self.data.shares_storage_with(&other.data)
    }
}
