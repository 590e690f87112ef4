//! `msg_container`: several messages sent as one.
//!
//! ```text
//! msg_container#73f1f8dc messages:vector<%Message> = MessageContainer;
//! message msg_id:long seqno:int bytes:int body:Object = Message;
//! ```

use mtp_tl_types::deserialize::Buffer;
use mtp_tl_types::{
    BareType, ConstructorId, Error as TlError, Identifiable, Prime, Result, Serializable, ids,
};

use crate::message::MessageId;
use crate::request::{RawPrimes, Request};

/// One message inside a container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerMessage {
    /// Message ID.
    pub msg_id: MessageId,
    /// Sequence number.
    pub seq_no: i32,
    /// Body words.
    pub body: Vec<Prime>,
}

/// Bare `msg_container`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MsgContainer {
    /// The carried messages, in order.
    pub messages: Vec<ContainerMessage>,
}

impl Identifiable for MsgContainer {
    const CONSTRUCTOR_ID: ConstructorId = ids::MSG_CONTAINER;
}

impl BareType for MsgContainer {
    const TYPE_NAME: &'static str = "MessageContainer";
    const CONSTRUCTORS: &'static [ConstructorId] = &[ids::MSG_CONTAINER];

    fn constructor_id(&self) -> ConstructorId { ids::MSG_CONTAINER }

    fn read_bare(_id: ConstructorId, buf: Buffer) -> Result<Self> {
        let count = buf.read_prime()? as usize;
        // Each message needs at least four header words.
        if count > buf.remaining() / 4 {
            return Err(TlError::InsufficientData);
        }
        let mut messages = Vec::with_capacity(count);
        for _ in 0..count {
            let header = buf.read_primes(4)?;
            let len = header[3] as usize;
            if len % 4 != 0 {
                return Err(TlError::BadLength { len });
            }
            let body = buf.read_primes(len / 4)?;
            messages.push(ContainerMessage {
                msg_id: MessageId::from_words(header[0], header[1]),
                seq_no: header[2] as i32,
                body: body.to_vec(),
            });
        }
        Ok(Self { messages })
    }

    fn write_bare(&self, buf: &mut impl Extend<Prime>) {
        buf.extend([self.messages.len() as Prime]);
        for m in &self.messages {
            buf.extend(m.msg_id.to_words());
            buf.extend([m.seq_no as Prime, (m.body.len() << 2) as Prime]);
            buf.extend(m.body.iter().copied());
        }
    }

    fn bare_len(&self) -> usize {
        1 + self.messages.iter().map(|m| 4 + m.body.len()).sum::<usize>()
    }
}

impl Serializable for MsgContainer {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        buf.extend([ids::MSG_CONTAINER]);
        self.write_bare(buf);
    }

    fn serialized_len(&self) -> usize { 1 + self.bare_len() }
}

/// Pack already-finalized requests into one container frame.
///
/// Each request contributes its msg_id, seq_no, length and body, copied
/// from its own frame; padding is not copied. The returned frame has no
/// header values yet.
pub fn pack(requests: &[Request]) -> Request {
    let size = 2 + requests.iter().map(Request::message_size).sum::<usize>();
    let mut container = Request::prepare(size, 0);
    container.write(&ids::MSG_CONTAINER);
    container.write(&(requests.len() as Prime));
    for request in requests {
        container.write(&RawPrimes(request.message_primes()));
    }
    log::debug!("[mtp] packed {} messages into a container of {size} words", requests.len());
    container
}
