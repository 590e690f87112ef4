//! # mtp: MTProto wire-codec core
//!
//! Three focused sub-crates wired together here for convenience:
//!
//! | Sub-crate      | Role                                                    |
//! |----------------|---------------------------------------------------------|
//! | `mtp-tl-types` | TL primitives over 4-byte primes, boxed/bare values     |
//! | `mtp-mtproto`  | Request envelopes, padding, containers, session state   |
//! | `mtp-tl-dump`  | Schema parser and text dumper for logs (`dump` feature) |
//!
//! ## Quick start
//!
//! ```rust
//! use mtp::mtproto::service::Ping;
//! use mtp::{Request, Session};
//!
//! let mut session = Session::new();
//! session.set_key_ready(0x1122_3344);
//!
//! let mut ping = Request::serialize(&Ping { ping_id: 42 });
//! session.finalize(&mut ping).unwrap();
//!
//! // Bytes handed to the encryption layer.
//! let wire = ping.to_bytes();
//! assert_eq!(wire.len() % 16, 0);
//! ```
//!
//! With the `dump` feature (on by default) a frame body reads back as text:
//!
//! ```rust
//! # #[cfg(feature = "dump")] {
//! use mtp::mtproto::service::Ping;
//! use mtp::Request;
//!
//! let ping = Request::serialize(&Ping { ping_id: 42 });
//! let text = mtp::dump::dump_to_text(ping.body());
//! assert!(text.starts_with("{ ping"));
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Re-export of [`mtp_tl_types`]: primes, cursors, boxed/bare codecs.
pub use mtp_tl_types as tl;

/// Re-export of [`mtp_mtproto`]: framing, containers, service messages.
pub use mtp_mtproto as mtproto;

/// Re-export of [`mtp_tl_dump`] (requires `feature = "dump"`).
#[cfg(feature = "dump")]
pub use mtp_tl_dump as dump;

// ─── Convenience re-exports ───────────────────────────────────────────────────

pub use mtp_tl_types::{Deserializable, Identifiable, Prime, RemoteCall, Serializable};

pub use mtp_mtproto::{MessageId, MsgIdsSet, Request, Response, Session, SessionConfig};
