//! Text dumps of TL values for logs and debugging.
//!
//! A [`TextDumper`] walks raw primes against a [`Registry`] of field
//! descriptors built from TL schema text and renders them as indented text.
//! It never fails: undecodable input ends the output with `[ERROR] (...)`.
//!
//! # Quick start
//!
//! ```rust
//! use mtp_tl_dump::dump_to_text;
//! use mtp_tl_types::{Serializable, ids};
//!
//! let mut pong = vec![ids::PONG];
//! pong.extend(4i64.to_primes());
//! pong.extend(7i64.to_primes());
//!
//! let text = dump_to_text(&pong);
//! assert_eq!(text, "{ pong\n  msg_id: 4 [LONG],\n  ping_id: 7 [LONG]\n}");
//! ```
//!
//! Extra schemas are added through the builder:
//!
//! ```rust
//! use mtp_tl_dump::{Registry, TextDumper};
//!
//! let registry = Registry::builder()
//!     .schema("point#1a2b3c4d x:int y:int = Point;")
//!     .build();
//! let text = TextDumper::new(&registry).dump(&[0x1a2b3c4d, 1, 2]);
//! assert!(text.starts_with("{ point"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dump;
mod error;
pub mod registry;
pub mod schema;

pub use config::DumpConfig;
pub use dump::{TextDumper, dump_to_text};
pub use error::DumpError;
pub use registry::Registry;
