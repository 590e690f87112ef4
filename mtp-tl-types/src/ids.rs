//! Fixed constructor IDs used by the codec, the framing layer and the dumper.

use crate::ConstructorId;

// ─── Primitives ──────────────────────────────────────────────────────────────

/// `int`
pub const INT: ConstructorId = 0xa8509bda;
/// `long`
pub const LONG: ConstructorId = 0x22076cba;
/// `int128`
pub const INT128: ConstructorId = 0x4bb5362b;
/// `int256`
pub const INT256: ConstructorId = 0x0929c32f;
/// `double`
pub const DOUBLE: ConstructorId = 0x2210c154;
/// `string` and `bytes` share one ID.
pub const STRING: ConstructorId = 0xb5286e24;
/// `Vector t`
pub const VECTOR: ConstructorId = 0x1cb5c415;
/// `boolTrue`
pub const BOOL_TRUE: ConstructorId = 0x997275b5;
/// `boolFalse`
pub const BOOL_FALSE: ConstructorId = 0xbc799737;

// ─── Service messages ────────────────────────────────────────────────────────

/// `message msg_id:long seqno:int bytes:int body:Object = Message`
pub const MESSAGE: ConstructorId = 0x5bb8e511;
/// `msg_container`
pub const MSG_CONTAINER: ConstructorId = 0x73f1f8dc;
/// `rpc_result`
pub const RPC_RESULT: ConstructorId = 0xf35c6d01;
/// `rpc_error`
pub const RPC_ERROR: ConstructorId = 0x2144ca19;
/// `gzip_packed`
pub const GZIP_PACKED: ConstructorId = 0x3072cfa1;
/// `msgs_ack`
pub const MSGS_ACK: ConstructorId = 0x62d6b459;
/// `msgs_state_req`
pub const MSGS_STATE_REQ: ConstructorId = 0xda69fb52;
/// `msgs_state_info`
pub const MSGS_STATE_INFO: ConstructorId = 0x04deb57d;
/// `msgs_all_info`
pub const MSGS_ALL_INFO: ConstructorId = 0x8cc0d131;
/// `msg_resend_req`
pub const MSG_RESEND_REQ: ConstructorId = 0x7d861a08;
/// `msg_detailed_info`
pub const MSG_DETAILED_INFO: ConstructorId = 0x276d3ec6;
/// `msg_new_detailed_info`
pub const MSG_NEW_DETAILED_INFO: ConstructorId = 0x809db6df;
/// `bad_msg_notification`
pub const BAD_MSG_NOTIFICATION: ConstructorId = 0xa7eff811;
/// `bad_server_salt`
pub const BAD_SERVER_SALT: ConstructorId = 0xedab447b;
/// `new_session_created`
pub const NEW_SESSION_CREATED: ConstructorId = 0x9ec20908;
/// `http_wait`
pub const HTTP_WAIT: ConstructorId = 0x9299359f;
/// `ping`
pub const PING: ConstructorId = 0x7abe77ec;
/// `pong`
pub const PONG: ConstructorId = 0x347773c5;

// ─── Wrappers ────────────────────────────────────────────────────────────────

/// `invokeWithLayer {X:Type} layer:int query:!X = X`
pub const INVOKE_WITH_LAYER: ConstructorId = 0xda9b0d0d;
/// `invokeAfterMsg {X:Type} msg_id:long query:!X = X`
pub const INVOKE_AFTER_MSG: ConstructorId = 0xcb9f372d;

/// Synthetic tag that roots a text dump. Never appears on the wire.
pub const DUMP_ROOT: ConstructorId = 0xffffffff;
