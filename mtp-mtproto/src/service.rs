//! MTProto service messages.
//!
//! These are the messages the session layer itself produces or consumes:
//! acknowledgements, state requests, resend requests, RPC results and
//! errors, ping/pong, bad-message notifications and `gzip_packed`.

use mtp_tl_types::deserialize::Buffer;
use mtp_tl_types::{
    BareType, Boxed, ConstructorId, Deserializable, Error as TlError, Identifiable, Prime, Result,
    Serializable, TlBytes, TlVector, ids,
};

/// Implements `Serializable`/`Deserializable` for a single-constructor
/// bare type by boxing it.
macro_rules! boxed_codec {
    ($ty:ty) => {
        impl Serializable for $ty {
            fn serialize(&self, buf: &mut impl Extend<Prime>) {
                buf.extend([<$ty as Identifiable>::CONSTRUCTOR_ID]);
                self.write_bare(buf);
            }

            fn serialized_len(&self) -> usize { 1 + self.bare_len() }
        }

        impl Deserializable for $ty {
            fn deserialize(buf: Buffer) -> Result<Self> {
                Boxed::<$ty>::deserialize(buf).map(Boxed::into_inner)
            }
        }
    };
}

/// A service message whose only field is `msg_ids:Vector<long>`.
macro_rules! msg_ids_message {
    ($(#[$doc:meta])* $name:ident, $type_name:literal, $id:expr) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            /// The referenced message IDs.
            pub msg_ids: TlVector<i64>,
        }

        impl $name {
            /// Build from a list of IDs.
            pub fn new(msg_ids: impl IntoIterator<Item = i64>) -> Self {
                Self { msg_ids: msg_ids.into_iter().collect() }
            }
        }

        impl Identifiable for $name {
            const CONSTRUCTOR_ID: ConstructorId = $id;
        }

        impl BareType for $name {
            const TYPE_NAME: &'static str = $type_name;
            const CONSTRUCTORS: &'static [ConstructorId] = &[$id];

            fn constructor_id(&self) -> ConstructorId { $id }

            fn read_bare(_id: ConstructorId, buf: Buffer) -> Result<Self> {
                let msg_ids = Boxed::<TlVector<i64>>::deserialize(buf)?.into_inner();
                Ok(Self { msg_ids })
            }

            fn write_bare(&self, buf: &mut impl Extend<Prime>) {
                buf.extend([ids::VECTOR]);
                self.msg_ids.serialize(buf);
            }

            fn bare_len(&self) -> usize { 1 + self.msg_ids.serialized_len() }
        }

        boxed_codec!($name);
    };
}

msg_ids_message!(
    /// `msgs_ack#62d6b459 msg_ids:Vector<long> = MsgsAck`
    MsgsAck, "MsgsAck", ids::MSGS_ACK
);
msg_ids_message!(
    /// `msgs_state_req#da69fb52 msg_ids:Vector<long> = MsgsStateReq`
    MsgsStateReq, "MsgsStateReq", ids::MSGS_STATE_REQ
);
msg_ids_message!(
    /// `msg_resend_req#7d861a08 msg_ids:Vector<long> = MsgResendReq`
    MsgResendReq, "MsgResendReq", ids::MSG_RESEND_REQ
);

// ─── RPC results ─────────────────────────────────────────────────────────────

/// `rpc_result#f35c6d01 req_msg_id:long result:Object = RpcResult`
///
/// The result is kept undecoded; its type depends on the request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RpcResult {
    /// ID of the request being answered.
    pub req_msg_id: i64,
    /// Boxed result object, as sent.
    pub result: Vec<Prime>,
}

impl RpcResult {
    /// Decode the result as `T`.
    pub fn decode<T: Deserializable>(&self) -> Result<T> {
        T::from_primes(&self.result)
    }

    /// The result as an `rpc_error`, if it is one.
    pub fn error(&self) -> Option<RpcError> {
        if self.result.first() != Some(&ids::RPC_ERROR) {
            return None;
        }
        RpcError::from_primes(&self.result).ok()
    }
}

impl Identifiable for RpcResult {
    const CONSTRUCTOR_ID: ConstructorId = ids::RPC_RESULT;
}

impl BareType for RpcResult {
    const TYPE_NAME: &'static str = "RpcResult";
    const CONSTRUCTORS: &'static [ConstructorId] = &[ids::RPC_RESULT];

    fn constructor_id(&self) -> ConstructorId { ids::RPC_RESULT }

    fn read_bare(_id: ConstructorId, buf: Buffer) -> Result<Self> {
        let req_msg_id = i64::deserialize(buf)?;
        // `result:Object` runs to the end of the enclosing body.
        Ok(Self { req_msg_id, result: buf.read_to_end().to_vec() })
    }

    fn write_bare(&self, buf: &mut impl Extend<Prime>) {
        self.req_msg_id.serialize(buf);
        buf.extend(self.result.iter().copied());
    }

    fn bare_len(&self) -> usize { 2 + self.result.len() }
}

boxed_codec!(RpcResult);

/// `rpc_error#2144ca19 error_code:int error_message:string = RpcError`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RpcError {
    /// Numeric error class.
    pub error_code: i32,
    /// Error text such as `FLOOD_WAIT_30`.
    pub error_message: TlBytes,
}

impl Identifiable for RpcError {
    const CONSTRUCTOR_ID: ConstructorId = ids::RPC_ERROR;
}

impl BareType for RpcError {
    const TYPE_NAME: &'static str = "RpcError";
    const CONSTRUCTORS: &'static [ConstructorId] = &[ids::RPC_ERROR];

    fn constructor_id(&self) -> ConstructorId { ids::RPC_ERROR }

    fn read_bare(_id: ConstructorId, buf: Buffer) -> Result<Self> {
        Ok(Self {
            error_code: i32::deserialize(buf)?,
            error_message: TlBytes::deserialize(buf)?,
        })
    }

    fn write_bare(&self, buf: &mut impl Extend<Prime>) {
        self.error_code.serialize(buf);
        self.error_message.serialize(buf);
    }

    fn bare_len(&self) -> usize { 1 + self.error_message.serialized_len() }
}

boxed_codec!(RpcError);

// ─── Ping ────────────────────────────────────────────────────────────────────

/// `ping#7abe77ec ping_id:long = Pong`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ping {
    /// Echoed back in the pong.
    pub ping_id: i64,
}

impl Identifiable for Ping {
    const CONSTRUCTOR_ID: ConstructorId = ids::PING;
}

impl BareType for Ping {
    const TYPE_NAME: &'static str = "Ping";
    const CONSTRUCTORS: &'static [ConstructorId] = &[ids::PING];

    fn constructor_id(&self) -> ConstructorId { ids::PING }

    fn read_bare(_id: ConstructorId, buf: Buffer) -> Result<Self> {
        Ok(Self { ping_id: i64::deserialize(buf)? })
    }

    fn write_bare(&self, buf: &mut impl Extend<Prime>) { self.ping_id.serialize(buf); }

    fn bare_len(&self) -> usize { 2 }
}

boxed_codec!(Ping);

impl mtp_tl_types::RemoteCall for Ping {
    type Return = Pong;
}

/// `pong#347773c5 msg_id:long ping_id:long = Pong`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pong {
    /// ID of the message carrying the ping.
    pub msg_id: i64,
    /// The ping's `ping_id`.
    pub ping_id: i64,
}

impl Identifiable for Pong {
    const CONSTRUCTOR_ID: ConstructorId = ids::PONG;
}

impl BareType for Pong {
    const TYPE_NAME: &'static str = "Pong";
    const CONSTRUCTORS: &'static [ConstructorId] = &[ids::PONG];

    fn constructor_id(&self) -> ConstructorId { ids::PONG }

    fn read_bare(_id: ConstructorId, buf: Buffer) -> Result<Self> {
        Ok(Self { msg_id: i64::deserialize(buf)?, ping_id: i64::deserialize(buf)? })
    }

    fn write_bare(&self, buf: &mut impl Extend<Prime>) {
        self.msg_id.serialize(buf);
        self.ping_id.serialize(buf);
    }

    fn bare_len(&self) -> usize { 4 }
}

boxed_codec!(Pong);

// ─── Bad message notifications ───────────────────────────────────────────────

/// `bad_server_salt#edab447b bad_msg_id:long bad_msg_seqno:int error_code:int new_server_salt:long`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BadServerSalt {
    /// The rejected message.
    pub bad_msg_id: i64,
    /// Its seq_no.
    pub bad_msg_seqno: i32,
    /// Always 48.
    pub error_code: i32,
    /// Salt to use from now on.
    pub new_server_salt: i64,
}

/// `bad_msg_notification#a7eff811 bad_msg_id:long bad_msg_seqno:int error_code:int`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BadMsgInfo {
    /// The rejected message.
    pub bad_msg_id: i64,
    /// Its seq_no.
    pub bad_msg_seqno: i32,
    /// Why it was rejected (16/17 msg_id, 32/33 seq_no, ...).
    pub error_code: i32,
}

/// The `BadMsgNotification` type: either constructor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadMsgNotification {
    /// `bad_msg_notification`
    Notification(BadMsgInfo),
    /// `bad_server_salt`
    ServerSalt(BadServerSalt),
}

impl BareType for BadMsgNotification {
    const TYPE_NAME: &'static str = "BadMsgNotification";
    const CONSTRUCTORS: &'static [ConstructorId] = &[ids::BAD_MSG_NOTIFICATION, ids::BAD_SERVER_SALT];

    fn constructor_id(&self) -> ConstructorId {
        match self {
            Self::Notification(_) => ids::BAD_MSG_NOTIFICATION,
            Self::ServerSalt(_) => ids::BAD_SERVER_SALT,
        }
    }

    fn read_bare(id: ConstructorId, buf: Buffer) -> Result<Self> {
        let id = Self::check_constructor(id)?;
        let bad_msg_id = i64::deserialize(buf)?;
        let bad_msg_seqno = i32::deserialize(buf)?;
        let error_code = i32::deserialize(buf)?;
        match id {
            ids::BAD_SERVER_SALT => Ok(Self::ServerSalt(BadServerSalt {
                bad_msg_id,
                bad_msg_seqno,
                error_code,
                new_server_salt: i64::deserialize(buf)?,
            })),
            _ => Ok(Self::Notification(BadMsgInfo { bad_msg_id, bad_msg_seqno, error_code })),
        }
    }

    fn write_bare(&self, buf: &mut impl Extend<Prime>) {
        match self {
            Self::Notification(n) => {
                n.bad_msg_id.serialize(buf);
                n.bad_msg_seqno.serialize(buf);
                n.error_code.serialize(buf);
            }
            Self::ServerSalt(s) => {
                s.bad_msg_id.serialize(buf);
                s.bad_msg_seqno.serialize(buf);
                s.error_code.serialize(buf);
                s.new_server_salt.serialize(buf);
            }
        }
    }

    fn bare_len(&self) -> usize {
        match self {
            Self::Notification(_) => 4,
            Self::ServerSalt(_) => 6,
        }
    }
}

impl TryFrom<BadMsgNotification> for BadServerSalt {
    type Error = TlError;

    fn try_from(value: BadMsgNotification) -> Result<Self> {
        match value {
            BadMsgNotification::ServerSalt(s) => Ok(s),
            other => Err(TlError::WrongConstructorForConversion {
                id: other.constructor_id(),
                required: ids::BAD_SERVER_SALT,
            }),
        }
    }
}

impl TryFrom<BadMsgNotification> for BadMsgInfo {
    type Error = TlError;

    fn try_from(value: BadMsgNotification) -> Result<Self> {
        match value {
            BadMsgNotification::Notification(n) => Ok(n),
            other => Err(TlError::WrongConstructorForConversion {
                id: other.constructor_id(),
                required: ids::BAD_MSG_NOTIFICATION,
            }),
        }
    }
}

// ─── gzip_packed ─────────────────────────────────────────────────────────────

/// `gzip_packed#3072cfa1 packed_data:bytes = Object`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GzipPacked {
    /// Compressed serialization of the wrapped object.
    pub packed_data: TlBytes,
}

impl Identifiable for GzipPacked {
    const CONSTRUCTOR_ID: ConstructorId = ids::GZIP_PACKED;
}

impl BareType for GzipPacked {
    const TYPE_NAME: &'static str = "GzipPacked";
    const CONSTRUCTORS: &'static [ConstructorId] = &[ids::GZIP_PACKED];

    fn constructor_id(&self) -> ConstructorId { ids::GZIP_PACKED }

    fn read_bare(_id: ConstructorId, buf: Buffer) -> Result<Self> {
        Ok(Self { packed_data: TlBytes::deserialize(buf)? })
    }

    fn write_bare(&self, buf: &mut impl Extend<Prime>) { self.packed_data.serialize(buf); }

    fn bare_len(&self) -> usize { self.packed_data.serialized_len() }
}

boxed_codec!(GzipPacked);

/// Default inflated-size limit of [`GzipPacked::unpack`], in bytes.
#[cfg(feature = "gzip")]
pub const DEFAULT_MAX_UNPACKED_BYTES: usize = 16 * 1024 * 1024;

#[cfg(feature = "gzip")]
impl GzipPacked {
    /// Compress an object's primes.
    pub fn pack(primes: &[Prime]) -> crate::Result<Self> {
        use std::io::Write;

        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&mtp_tl_types::primes_to_bytes(primes))?;
        Ok(Self { packed_data: encoder.finish()?.into() })
    }

    /// Inflate back into the wrapped object's primes.
    ///
    /// Accepts gzip and falls back to a bare zlib stream. Payloads inflating
    /// past [`DEFAULT_MAX_UNPACKED_BYTES`] are refused.
    pub fn unpack(&self) -> crate::Result<Vec<Prime>> {
        self.unpack_with_limit(DEFAULT_MAX_UNPACKED_BYTES)
    }

    /// [`unpack`](Self::unpack) with an explicit inflated-size limit in bytes.
    pub fn unpack_with_limit(&self, limit: usize) -> crate::Result<Vec<Prime>> {
        use std::io::{self, Read};

        let data = self.packed_data.as_bytes();
        let cap = limit as u64 + 1;
        let mut out = Vec::new();
        let gzip = flate2::read::GzDecoder::new(data).take(cap).read_to_end(&mut out);
        if gzip.is_err() || out.is_empty() {
            out.clear();
            flate2::read::ZlibDecoder::new(data).take(cap).read_to_end(&mut out)?;
        }
        if out.len() > limit {
            log::debug!("[mtp] gzip_packed of {} bytes inflates past {limit}", data.len());
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("payload exceeds {limit} bytes"),
            )
            .into());
        }
        log::trace!("[mtp] inflated gzip_packed: {} -> {} bytes", data.len(), out.len());
        Ok(mtp_tl_types::primes_from_bytes(&out)?)
    }
}
