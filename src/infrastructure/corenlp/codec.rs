//! Length-delimited document codec
//!
//! The server exchanges documents as a single protobuf message prefixed by its
//! varint-encoded byte length. Any `prost::Message` can be carried; the
//! document schema itself is owned by the caller.

use prost::bytes::Buf;
use prost::{DecodeError, Message};

/// Encode one document with its varint length prefix
pub fn encode_delimited<D: Message>(doc: &D) -> Vec<u8> {
    doc.encode_length_delimited_to_vec()
}

/// Decode one length-prefixed document from the start of `buf`
pub fn decode_delimited<D: Message + Default>(buf: impl Buf) -> Result<D, DecodeError> {
    D::decode_length_delimited(buf)
}
