//! MTProto client session state.

use mtp_tl_types::Error as TlError;

use crate::container;
use crate::layer::wrap_with_layer;
use crate::message::MessageId;
use crate::request::Request;
use crate::Result;

/// Session-level settings.
#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    /// API layer to wrap flagged requests in, if any.
    pub layer: Option<i32>,
    /// Clock skew in seconds vs. the server.
    pub time_offset: i32,
}

/// Tracks per-connection MTProto session state and finalizes outgoing
/// frames.
///
/// # Example
///
/// ```rust
/// use mtp_mtproto::{Request, Session, service::Ping};
///
/// let mut session = Session::new();
/// session.set_key_ready(0x1122);
///
/// let mut ping = Request::serialize(&Ping { ping_id: 7 });
/// let msg_id = session.finalize(&mut ping).unwrap();
/// assert_eq!(ping.msg_id(), msg_id);
/// assert_eq!(ping.primes().len() % 4, 0);
/// ```
#[derive(Debug)]
pub struct Session {
    session_id: i64,
    salt: i64,
    sequence: i32,
    last_msg_id: i64,
    key_ready: bool,
    config: SessionConfig,
}

impl Session {
    /// Create a fresh session with a random session ID.
    pub fn new() -> Self { Self::with_config(SessionConfig::default()) }

    /// Create a fresh session with the given settings.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            session_id: rand::random(),
            salt: 0,
            sequence: 0,
            last_msg_id: 0,
            key_ready: false,
            config,
        }
    }

    /// Session ID written into every frame.
    pub fn session_id(&self) -> i64 { self.session_id }

    /// Current server salt.
    pub fn salt(&self) -> i64 { self.salt }

    /// Replace the server salt, e.g. after `bad_server_salt`.
    pub fn set_salt(&mut self, salt: i64) { self.salt = salt; }

    /// Correct the clock skew used for message IDs.
    pub fn set_time_offset(&mut self, offset: i32) { self.config.time_offset = offset; }

    /// Mark the auth key as usable and install the first salt.
    pub fn set_key_ready(&mut self, first_salt: i64) {
        self.key_ready = true;
        self.salt = first_salt;
        log::debug!("[mtp] session {:#x}: auth key ready", self.session_id);
    }

    /// Whether frames can be finalized.
    pub fn is_key_ready(&self) -> bool { self.key_ready }

    /// Start over with a new session ID and counters, keeping the key.
    pub fn reset(&mut self) {
        self.session_id = rand::random();
        self.sequence = 0;
        self.last_msg_id = 0;
        log::info!("[mtp] session reset: new id {:#x}", self.session_id);
    }

    /// Allocate a message ID, strictly greater than the previous one.
    pub fn next_msg_id(&mut self) -> MessageId {
        let mut id = MessageId::now(self.config.time_offset).0;
        if self.last_msg_id >= id {
            id = self.last_msg_id + 4;
        }
        self.last_msg_id = id;
        MessageId(id)
    }

    /// Next seq_no: odd and advancing for content-related messages, even
    /// and unchanged otherwise.
    pub fn next_seq_no(&mut self, content_related: bool) -> i32 {
        if content_related {
            let n = self.sequence * 2 + 1;
            self.sequence += 1;
            n
        } else {
            self.sequence * 2
        }
    }

    /// Fill in the header, apply the layer wrapper if requested, and pad.
    ///
    /// Fails with `KeyNotReady` before [`Session::set_key_ready`].
    pub fn finalize(&mut self, request: &mut Request) -> Result<MessageId> {
        if !self.key_ready {
            return Err(TlError::KeyNotReady { operation: "finalize request" }.into());
        }
        if let Some(layer) = self.config.layer.filter(|_| request.needs_layer()) {
            *request = wrap_with_layer(request, layer);
        }
        let msg_id = self.next_msg_id();
        let seq_no = self.next_seq_no(request.needs_ack());
        request.set_salt(self.salt);
        request.set_session_id(self.session_id);
        request.set_msg_id(msg_id);
        request.set_seq_no(seq_no);
        request.padding();
        log::trace!("[mtp] finalized msg_id={msg_id} seq_no={seq_no}");
        Ok(msg_id)
    }

    /// Finalize `requests` and pack them into one container frame.
    ///
    /// Returns the container, ready to send, and a sent-container record
    /// listing the carried message IDs under the container's own ID.
    pub fn pack_container(&mut self, requests: &mut [Request]) -> Result<(Request, Request)> {
        let mut msg_ids = Vec::with_capacity(requests.len());
        for request in requests.iter_mut() {
            msg_ids.push(self.finalize(request)?);
        }
        let mut packed = container::pack(requests);
        let container_id = self.finalize(&mut packed)?;
        let mut record = Request::sent_container(&msg_ids);
        record.set_msg_id(container_id);
        Ok((packed, record))
    }
}

impl Default for Session {
    fn default() -> Self { Self::new() }
}
