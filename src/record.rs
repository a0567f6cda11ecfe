//! BER encoded record trees.
//!
//! This is a private module. Its public items are re-exported by the parent.
//!
//! Every BER encoded value consists of identifier octets, length octets,
//! and content octets. The [`Record`] type represents one such value: the
//! identifier and length information form its header while the content is
//! held in a [`Value`] that depends on the type the identifier announces.
//! Constructed records hold their children as records in turn, making the
//! whole thing a tree.
//!
//! Decoding comes in two flavours. [`Record::decode`] parses the complete
//! tree up front and the result owns all of its data. [`Record::decode_lazy`]
//! only parses the header and keeps a reference to the content octets; the
//! content is decoded when first read. A lazily decoded record therefore
//! borrows the input buffer for as long as it lives.

use std::io;
use bytes::Bytes;
use crate::error::DecodeError;
use crate::hex::InvalidHex;
use crate::ident::{Ident, TagClass, UniversalTagType};
use crate::int::BigInt;
use crate::length::Length;
use crate::ostring::OctetString;


//------------ Record --------------------------------------------------------

/// A BER encoded record.
///
/// A record pairs a header – tag class, tag number, primitive or
/// constructed encoding, and the two lengths – with a [`Value`] holding the
/// decoded content. Which value variant a decoded record carries follows
/// from the header: constructed records hold children, universal primitive
/// records of a known type hold that type’s payload, and everything else
/// holds a plain copy of the content octets.
///
/// The lifetime argument ties a lazily decoded record to the buffer it was
/// decoded from. Records built through the constructors or through
/// [`decode`][Self::decode] don’t borrow anything and are `'static`.
///
/// Reading the value of a lazily decoded record realizes it first, which
/// is why the reading accessors take `&mut self`. Sharing a record tree
/// between threads consequently requires outside synchronization, which
/// the borrow checker will insist on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record<'a> {
    /// The decoded identifier octets.
    ident: Ident,

    /// The number of content octets.
    value_length: usize,

    /// The number of octets of the complete encoded record.
    ///
    /// For decoded records this is identifier plus length plus content
    /// octets. Records made by the constructors claim two header octets;
    /// the claim only becomes authoritative through an encode-decode
    /// round trip.
    total_length: usize,

    /// The content of the record.
    value: Value<'a>,
}

/// The content of a record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value<'a> {
    /// The still-encoded content octets of a lazily decoded record.
    ///
    /// Reading accessors replace this variant with the decoded one on
    /// first use. It never escapes through [`Record::value`].
    Deferred(&'a [u8]),

    /// A copy of the content octets of a record with no dedicated type.
    Generic(Bytes),

    /// The children of a constructed record, in encounter order.
    Children(Vec<Record<'a>>),

    /// The value of an INTEGER or ENUMERATED record.
    Integer(BigInt),

    /// The payload of an OCTET STRING record.
    OctetString(OctetString),

    /// The value of a BOOLEAN record.
    Boolean(bool),

    /// The (empty) content of a NULL record.
    Null,
}


//--- Decoding

impl Record<'static> {
    /// Decodes the record at the start of `data`.
    ///
    /// The complete tree is decoded up front and the returned record owns
    /// everything it holds. Input past the end of the record is ignored.
    pub fn decode(data: &[u8]) -> Result<Record<'static>, DecodeError> {
        Self::decode_eager(data).map_err(|err| {
            tracing::debug!(
                target: "berec::decode", error = %err,
                "failed to decode record"
            );
            err
        })
    }

    fn decode_eager(data: &[u8]) -> Result<Record<'static>, DecodeError> {
        let header = Header::decode(data)?;
        let content = &data[header.header_len..header.total_length];
        let value = if header.ident.constructed {
            Value::Children(decode_children_eager(content)?)
        }
        else {
            decode_primitive(header.ident, content)?
        };
        Ok(header.into_record(value))
    }
}

impl<'a> Record<'a> {
    /// Decodes the header of the record at the start of `data`.
    ///
    /// The content octets are not interpreted yet: the record keeps a
    /// reference to them and decodes them when first read. The input
    /// buffer has to outlive the record and everything realized from it.
    pub fn decode_lazy(data: &'a [u8]) -> Result<Record<'a>, DecodeError> {
        let header = Header::decode(data).map_err(|err| {
            tracing::debug!(
                target: "berec::decode", error = %err,
                "failed to decode record header"
            );
            err
        })?;
        let content = &data[header.header_len..header.total_length];
        Ok(header.into_record(Value::Deferred(content)))
    }

    /// Decodes the deferred content octets if there are any.
    ///
    /// Children of a constructed record are realized lazily in turn.
    fn realize(&mut self) -> Result<(), DecodeError> {
        let content = match self.value {
            Value::Deferred(content) => content,
            _ => return Ok(())
        };
        self.value = if self.ident.constructed {
            Value::Children(decode_children_lazy(content)?)
        }
        else {
            decode_primitive(self.ident, content)?
        };
        Ok(())
    }
}

/// Decodes the children filling a constructed record’s content octets.
fn decode_children_eager(
    mut content: &[u8]
) -> Result<Vec<Record<'static>>, DecodeError> {
    let mut children = Vec::new();
    while !content.is_empty() {
        let child = Record::decode_eager(content).map_err(child_err)?;
        content = advance(content, child.total_length)?;
        children.push(child);
    }
    Ok(children)
}

/// Decodes the children of a constructed record without their content.
fn decode_children_lazy(
    mut content: &[u8]
) -> Result<Vec<Record<'_>>, DecodeError> {
    let mut children = Vec::new();
    while !content.is_empty() {
        let header = Header::decode(content).map_err(child_err)?;
        let value = &content[header.header_len..header.total_length];
        let total_length = header.total_length;
        children.push(header.into_record(Value::Deferred(value)));
        content = advance(content, total_length)?;
    }
    Ok(children)
}

/// Moves the content window past a child of the given total length.
///
/// An empty child or one past the end of the window would keep the decode
/// loop from terminating, so both are fatal.
fn advance(content: &[u8], total_length: usize) -> Result<&[u8], DecodeError> {
    if total_length == 0 || total_length > content.len() {
        return Err(DecodeError::MalformedChild)
    }
    Ok(&content[total_length..])
}

/// Converts an error decoding a child into a malformed child error.
///
/// Running over the end of the parent’s content is a property of the
/// child, not of the input buffer, and is reported as such.
fn child_err(err: DecodeError) -> DecodeError {
    match err {
        DecodeError::ExceedsBuffer => DecodeError::MalformedChild,
        _ => err,
    }
}

/// Decodes the content octets of a primitive record.
fn decode_primitive(
    ident: Ident, content: &[u8]
) -> Result<Value<'static>, DecodeError> {
    match ident.universal_type() {
        UniversalTagType::Integer | UniversalTagType::Enumerated => {
            Ok(Value::Integer(BigInt::from_content(content)))
        }
        UniversalTagType::OctetString => {
            Ok(Value::OctetString(OctetString::from_content(content)))
        }
        UniversalTagType::Boolean => {
            let Some(&octet) = content.first() else {
                return Err(DecodeError::InsufficientData)
            };
            Ok(Value::Boolean(octet != 0))
        }
        UniversalTagType::Null => Ok(Value::Null),
        _ => Ok(Value::Generic(Bytes::copy_from_slice(content))),
    }
}


//--- Construction

impl Record<'static> {
    /// Creates an INTEGER record from a native unsigned integer.
    pub fn integer(value: u64) -> Self {
        let value = BigInt::from_u64(value);
        Self::primitive(
            UniversalTagType::Integer, value.byte_len(),
            Value::Integer(value),
        )
    }

    /// Creates an INTEGER record from a string of hex digits.
    ///
    /// The digits follow the rules of [`BigInt::from_hex`]: an optional
    /// `0x` prefix and at least one hex digit of either case.
    pub fn integer_from_hex(digits: &str) -> Result<Self, InvalidHex> {
        let value = BigInt::from_hex(digits)?;
        Ok(Self::primitive(
            UniversalTagType::Integer, value.byte_len(),
            Value::Integer(value),
        ))
    }

    /// Creates an ENUMERATED record.
    ///
    /// This is an integer record in all but the tag number.
    pub fn enumerated(value: u32) -> Self {
        let value = BigInt::from_u64(value.into());
        Self::primitive(
            UniversalTagType::Enumerated, value.byte_len(),
            Value::Integer(value),
        )
    }

    /// Creates an OCTET STRING record holding printable text.
    pub fn octet_string(text: &str) -> Self {
        Self::primitive(
            UniversalTagType::OctetString, text.len(),
            Value::OctetString(OctetString::new(text)),
        )
    }

    /// Creates an OCTET STRING record holding raw octets.
    pub fn octet_string_bytes(octets: &[u8]) -> Self {
        Self::primitive(
            UniversalTagType::OctetString, octets.len(),
            Value::OctetString(OctetString::from_bytes(octets)),
        )
    }

    /// Creates a BOOLEAN record.
    pub fn boolean(value: bool) -> Self {
        Self::primitive(UniversalTagType::Boolean, 1, Value::Boolean(value))
    }

    /// Creates a NULL record.
    pub fn null() -> Self {
        Self::primitive(UniversalTagType::Null, 0, Value::Null)
    }

    /// Creates a record of an arbitrary tag holding a copy of `value`.
    ///
    /// # Panics
    ///
    /// This function panics if the tag number is greater than
    /// [`Ident::MAX_NUMBER`].
    pub fn generic(
        class: TagClass, constructed: bool, number: u8, value: &[u8],
    ) -> Self {
        Record {
            ident: Ident::new(class, constructed, number),
            value_length: value.len(),
            total_length: value.len() + 2,
            value: Value::Generic(Bytes::copy_from_slice(value)),
        }
    }

    /// Creates a primitive record of a universal type.
    fn primitive(
        tag: UniversalTagType, value_length: usize, value: Value<'static>,
    ) -> Self {
        Record {
            ident: Ident::new(TagClass::Universal, false, tag.number()),
            value_length,
            total_length: value_length + 2,
            value,
        }
    }
}

impl<'a> Record<'a> {
    /// Creates a SEQUENCE record from its children.
    pub fn sequence(children: Vec<Record<'a>>) -> Self {
        Self::constructed(
            TagClass::Universal, UniversalTagType::Sequence.number(),
            children,
        )
    }

    /// Creates a SET record from its children.
    ///
    /// The children are kept in the order given; the codec never reorders
    /// a set.
    pub fn set(children: Vec<Record<'a>>) -> Self {
        Self::constructed(
            TagClass::Universal, UniversalTagType::Set.number(), children,
        )
    }

    /// Creates a constructed record from its children.
    ///
    /// The children are moved into the new record which becomes their
    /// exclusive owner.
    ///
    /// # Panics
    ///
    /// This function panics if the tag number is greater than
    /// [`Ident::MAX_NUMBER`].
    pub fn constructed(
        class: TagClass, number: u8, children: Vec<Record<'a>>,
    ) -> Self {
        let value_length = children.iter().map(|child| {
            child.total_length
        }).sum::<usize>();
        Record {
            ident: Ident::new(class, true, number),
            value_length,
            total_length: value_length + 2,
            value: Value::Children(children),
        }
    }
}


//--- Access

impl<'a> Record<'a> {
    /// Returns the tag class of the record.
    pub fn tag_class(&self) -> TagClass {
        self.ident.class
    }

    /// Returns the tag number of the record.
    pub fn tag_number(&self) -> u8 {
        self.ident.number
    }

    /// Returns whether the record uses constructed encoding.
    pub fn is_constructed(&self) -> bool {
        self.ident.constructed
    }

    /// Returns the number of content octets of the record.
    pub fn value_length(&self) -> usize {
        self.value_length
    }

    /// Returns the number of octets of the complete encoded record.
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Returns the universal type of the record.
    ///
    /// Returns [`UniversalTagType::NotApplicable`] for records of the
    /// other three classes.
    pub fn universal_tag_type(&self) -> UniversalTagType {
        self.ident.universal_type()
    }

    /// Returns the value of the record, realizing it first if necessary.
    ///
    /// Errors only if the record was decoded lazily and its content
    /// octets turn out to be malformed.
    pub fn value(&mut self) -> Result<&Value<'a>, DecodeError> {
        self.realize()?;
        Ok(&self.value)
    }

    /// Returns the children of the record, realizing it first if necessary.
    ///
    /// Returns an empty slice for primitive records.
    pub fn children(&mut self) -> Result<&[Record<'a>], DecodeError> {
        match self.value()? {
            Value::Children(children) => Ok(children),
            _ => Ok(&[]),
        }
    }
}


//--- Encoding

impl<'a> Record<'a> {
    /// Encodes the record into its BER representation.
    ///
    /// Encoding cannot fail. The length octets are derived from the size
    /// of the actually encoded content so the output is self-consistent
    /// even if the stored lengths haven’t been refreshed by a round trip.
    pub fn encode(&self) -> Vec<u8> {
        let mut target = Vec::with_capacity(self.total_length);
        self.append_encoded(&mut target);
        target
    }

    /// Writes the encoded record to the given writer.
    pub fn write_encoded<W: io::Write>(
        &self, target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(&self.encode())
    }

    /// Appends the encoded record to the end of `target`.
    fn append_encoded(&self, target: &mut Vec<u8>) {
        let mut content = Vec::with_capacity(self.value_length);
        self.append_encoded_value(&mut content);
        self.ident.append_encoded(target);
        Length::new(content.len()).append_encoded(target);
        target.extend_from_slice(&content);
    }

    /// Appends the encoded content octets to the end of `target`.
    ///
    /// Content that was never realized is still in encoded form and gets
    /// copied through verbatim.
    fn append_encoded_value(&self, target: &mut Vec<u8>) {
        match self.value {
            Value::Deferred(content) => target.extend_from_slice(content),
            Value::Generic(ref octets) => target.extend_from_slice(octets),
            Value::Children(ref children) => {
                for child in children {
                    child.append_encoded(target)
                }
            }
            Value::Integer(ref value) => {
                target.extend_from_slice(&value.to_bytes())
            }
            Value::OctetString(ref value) => {
                target.extend_from_slice(&value.to_content())
            }
            Value::Boolean(value) => {
                target.push(if value { 0xff } else { 0x00 })
            }
            Value::Null => { }
        }
    }
}


//--- Rendering

impl<'a> Record<'a> {
    /// Returns a human-readable dump of the record tree.
    ///
    /// The lines of [`to_text_lines`][Self::to_text_lines] joined with
    /// newlines. Reading the tree realizes any lazily decoded parts, so
    /// rendering can fail on malformed content.
    pub fn to_text(&mut self) -> Result<String, DecodeError> {
        self.to_text_lines().map(|lines| lines.join("\n"))
    }

    /// Returns a human-readable dump of the record tree, line by line.
    ///
    /// Each record contributes a line of the form
    /// `<type>[ (constructed)], Length: <header>+<content>` with a
    /// `, Value: …` suffix for the primitive types that have one. The
    /// lines of child records are indented by two spaces per level.
    pub fn to_text_lines(&mut self) -> Result<Vec<String>, DecodeError> {
        self.realize()?;
        let mut lines = vec![self.header_line()];
        if let Value::Children(ref mut children) = self.value {
            for child in children {
                for line in child.to_text_lines()? {
                    lines.push(format!("  {}", line));
                }
            }
        }
        Ok(lines)
    }

    /// Returns the rendered line of this record without its children.
    fn header_line(&self) -> String {
        let mut line = if self.ident.class == TagClass::Universal {
            self.ident.universal_type().to_string()
        }
        else {
            format!("{} ({})", self.ident.class, self.ident.number)
        };
        if self.ident.constructed {
            line.push_str(" (constructed)");
        }
        line.push_str(&format!(
            ", Length: {}+{}",
            self.total_length - self.value_length, self.value_length,
        ));
        match self.value {
            Value::Integer(ref value) => {
                match value.to_u64() {
                    Some(value) => {
                        line.push_str(&format!(", Value: {}", value))
                    }
                    None => line.push_str(&format!(", Value: 0x{}", value)),
                }
            }
            Value::Boolean(value) => {
                line.push_str(&format!(", Value: {}", value))
            }
            Value::OctetString(ref value) => {
                line.push_str(&format!(", Value: {}", value.as_str()))
            }
            _ => { }
        }
        line
    }
}


//------------ Header --------------------------------------------------------

/// The decoded identifier and length octets of a record.
struct Header {
    /// The decoded identifier octets.
    ident: Ident,

    /// The combined size of the identifier and length octets.
    header_len: usize,

    /// The number of content octets.
    value_length: usize,

    /// The number of octets of the complete encoded record.
    total_length: usize,
}

impl Header {
    /// Decodes the identifier and length octets at the start of `data`.
    ///
    /// Checks that the complete record – header and content – is present
    /// in `data` and that its total length doesn’t overflow.
    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let (ident, tag_len) = Ident::decode(data)?;
        let (length, length_len) = Length::decode(&data[tag_len..])?;
        let value_length = length.value();
        let header_len = tag_len + length_len;
        let total_length = header_len.checked_add(value_length).ok_or(
            DecodeError::LengthOverflow
        )?;
        if total_length > data.len() {
            return Err(DecodeError::ExceedsBuffer)
        }
        Ok(Header { ident, header_len, value_length, total_length })
    }

    /// Converts the header into a record with the given value.
    fn into_record<'a>(self, value: Value<'a>) -> Record<'a> {
        Record {
            ident: self.ident,
            value_length: self.value_length,
            total_length: self.total_length,
            value,
        }
    }
}


//============ Tests =========================================================
