//! MTProto message framing.
//!
//! This crate handles:
//! * Outgoing frames: header, body, random padding ([`Request`])
//! * Incoming frames ([`Response`])
//! * Message IDs and sequence numbers ([`Session`])
//! * `msg_container` packing and unpacking ([`container`])
//! * Received-ID bookkeeping ([`MsgIdsSet`])
//! * Service messages and the invocation wrappers ([`service`], [`layer`])
//!
//! It is intentionally transport-agnostic and crypto-free: frames are
//! handed out as plain primes, to be encrypted and sent by the caller.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod container;
mod error;
pub mod layer;
pub mod message;
pub mod msg_ids;
pub mod request;
pub mod response;
pub mod service;
pub mod session;

pub use container::{ContainerMessage, MsgContainer};
pub use error::{Error, Result};
pub use message::MessageId;
pub use msg_ids::MsgIdsSet;
pub use request::{Request, RequestId};
pub use response::Response;
pub use session::{Session, SessionConfig};
