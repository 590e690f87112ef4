//! Invocation wrappers: `invokeWithLayer` and `invokeAfterMsg`.

use mtp_tl_types::{ConstructorId, Identifiable, Prime, RemoteCall, Serializable, ids};

use crate::message::MessageId;
use crate::request::{RawPrimes, Request};

/// `invokeWithLayer#da9b0d0d {X:Type} layer:int query:!X = X`
#[derive(Clone, Debug, PartialEq)]
pub struct InvokeWithLayer<X> {
    /// API layer the query is written against.
    pub layer: i32,
    /// The wrapped call.
    pub query: X,
}

impl<X> Identifiable for InvokeWithLayer<X> {
    const CONSTRUCTOR_ID: ConstructorId = ids::INVOKE_WITH_LAYER;
}

impl<X: Serializable> Serializable for InvokeWithLayer<X> {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        buf.extend([Self::CONSTRUCTOR_ID]);
        self.layer.serialize(buf);
        self.query.serialize(buf);
    }

    fn serialized_len(&self) -> usize { 2 + self.query.serialized_len() }
}

impl<X: RemoteCall> RemoteCall for InvokeWithLayer<X> {
    type Return = X::Return;
}

/// `invokeAfterMsg#cb9f372d {X:Type} msg_id:long query:!X = X`
#[derive(Clone, Debug, PartialEq)]
pub struct InvokeAfterMsg<X> {
    /// Message that must be processed first.
    pub msg_id: i64,
    /// The wrapped call.
    pub query: X,
}

impl<X> Identifiable for InvokeAfterMsg<X> {
    const CONSTRUCTOR_ID: ConstructorId = ids::INVOKE_AFTER_MSG;
}

impl<X: Serializable> Serializable for InvokeAfterMsg<X> {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        buf.extend([Self::CONSTRUCTOR_ID]);
        self.msg_id.serialize(buf);
        self.query.serialize(buf);
    }

    fn serialized_len(&self) -> usize { 3 + self.query.serialized_len() }
}

impl<X: RemoteCall> RemoteCall for InvokeAfterMsg<X> {
    type Return = X::Return;
}

/// Re-frame `request` with its body wrapped in `invokeWithLayer`.
///
/// The result no longer needs the layer wrapper.
pub fn wrap_with_layer(request: &Request, layer: i32) -> Request {
    let mut wrapped = request.with_body(&InvokeWithLayer { layer, query: RawPrimes(request.body()) });
    wrapped.set_needs_layer(false);
    wrapped
}

/// Re-frame `request` so the server runs it after message `after`.
pub fn wrap_after(request: &Request, after: MessageId) -> Request {
    request.with_body(&InvokeAfterMsg { msg_id: after.0, query: RawPrimes(request.body()) })
}
