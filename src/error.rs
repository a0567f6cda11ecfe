//! Errors happening while decoding records.
//!
//! This is a private module. Its public items are re-exported by the parent.

use thiserror::Error;


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding a BER-encoded record.
///
/// Every variant is fatal for the record currently being decoded. The
/// decoder never hands out a partially decoded tree next to an error: either
/// the full record decodes or you get one of these.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum DecodeError {
    /// The input ended before the end of the encoded record.
    #[error("input ends before the end of the record")]
    InsufficientData,

    /// The length octets describe a length that doesn’t fit the host’s
    /// size type, or the record’s total length would wrap.
    #[error("record length overflows the host size type")]
    LengthOverflow,

    /// The identifier octets continue past the one supported
    /// continuation octet.
    #[error("tag numbers above 127 are not supported")]
    UnsupportedHighTag,

    /// The record claims more content octets than the input holds.
    #[error("record length exceeds the remaining input")]
    ExceedsBuffer,

    /// A child of a constructed record is empty or extends past the end
    /// of its parent’s content.
    #[error("malformed child record in constructed value")]
    MalformedChild,
}
