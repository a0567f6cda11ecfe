//! The identifier octets of a BER encoded record.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::error::DecodeError;


//------------ TagClass ------------------------------------------------------

/// The class of a record’s tag.
///
/// The class is encoded in the top two bits of the first identifier octet.
/// Most well-known types live in the universal class; the other three
/// classes carry meaning only within a particular application or context.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TagClass {
    /// The universal class, encoded as bits `00`.
    Universal,

    /// The application class, encoded as bits `01`.
    Application,

    /// The context-specific class, encoded as bits `10`.
    ContextSpecific,

    /// The private class, encoded as bits `11`.
    Private,
}

impl TagClass {
    /// Returns the class encoded in the first identifier octet.
    fn from_octet(octet: u8) -> Self {
        match (octet & Ident::CLASS_MASK) >> 6 {
            0b00 => TagClass::Universal,
            0b01 => TagClass::Application,
            0b10 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    /// Returns the class bits positioned for the first identifier octet.
    fn to_octet(self) -> u8 {
        match self {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xc0,
        }
    }
}

impl fmt::Display for TagClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            TagClass::Universal => "Universal",
            TagClass::Application => "Application",
            TagClass::ContextSpecific => "ContextSpecific",
            TagClass::Private => "Private",
        })
    }
}


//------------ UniversalTagType ----------------------------------------------

/// The types defined for the universal tag class.
///
/// The variants cover the tag numbers assigned in clause 8.4 of X.690. The
/// extra variant [`NotApplicable`][Self::NotApplicable] serves as the
/// answer when asking a record of one of the other three classes for its
/// universal type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum UniversalTagType {
    EndOfContent = 0,
    Boolean = 1,
    Integer = 2,
    BitString = 3,
    OctetString = 4,
    Null = 5,
    ObjectIdentifier = 6,
    ObjectDescriptor = 7,
    External = 8,
    Real = 9,
    Enumerated = 10,
    EmbeddedPdv = 11,
    Utf8String = 12,
    RelativeObjectIdentifier = 13,
    Time = 14,
    Reserved = 15,
    Sequence = 16,
    Set = 17,
    NumericString = 18,
    PrintableString = 19,
    T61String = 20,
    VideotexString = 21,
    Ia5String = 22,
    UtcTime = 23,
    GeneralizedTime = 24,
    GraphicString = 25,
    VisibleString = 26,
    GeneralString = 27,
    UniversalString = 28,
    CharacterString = 29,
    BmpString = 30,
    Date = 31,
    TimeOfDay = 32,
    DateTime = 33,
    Duration = 34,
    ObjectIdentifierIri = 35,
    RelativeObjectIdentifierIri = 36,

    /// The record’s class isn’t universal or the number isn’t assigned.
    NotApplicable = 0xff,
}

impl UniversalTagType {
    /// Returns the type assigned to the given tag number.
    ///
    /// Returns [`NotApplicable`][Self::NotApplicable] for numbers that
    /// don’t have a universal type assigned.
    pub fn from_number(number: u8) -> Self {
        use UniversalTagType::*;

        match number {
            0 => EndOfContent,
            1 => Boolean,
            2 => Integer,
            3 => BitString,
            4 => OctetString,
            5 => Null,
            6 => ObjectIdentifier,
            7 => ObjectDescriptor,
            8 => External,
            9 => Real,
            10 => Enumerated,
            11 => EmbeddedPdv,
            12 => Utf8String,
            13 => RelativeObjectIdentifier,
            14 => Time,
            15 => Reserved,
            16 => Sequence,
            17 => Set,
            18 => NumericString,
            19 => PrintableString,
            20 => T61String,
            21 => VideotexString,
            22 => Ia5String,
            23 => UtcTime,
            24 => GeneralizedTime,
            25 => GraphicString,
            26 => VisibleString,
            27 => GeneralString,
            28 => UniversalString,
            29 => CharacterString,
            30 => BmpString,
            31 => Date,
            32 => TimeOfDay,
            33 => DateTime,
            34 => Duration,
            35 => ObjectIdentifierIri,
            36 => RelativeObjectIdentifierIri,
            _ => NotApplicable,
        }
    }

    /// Returns the tag number of the type.
    ///
    /// The number of [`NotApplicable`][Self::NotApplicable] is 0xFF which
    /// never appears in valid identifier octets.
    pub fn number(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for UniversalTagType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use UniversalTagType::*;

        f.write_str(match *self {
            EndOfContent => "EndOfContent",
            Boolean => "Boolean",
            Integer => "Integer",
            BitString => "BitString",
            OctetString => "OctetString",
            Null => "Null",
            ObjectIdentifier => "ObjectIdentifier",
            ObjectDescriptor => "ObjectDescriptor",
            External => "External",
            Real => "Real",
            Enumerated => "Enumerated",
            EmbeddedPdv => "EmbeddedPDV",
            Utf8String => "UTF8String",
            RelativeObjectIdentifier => "RelativeObjectIdentifier",
            Time => "Time",
            Reserved => "Reserved",
            Sequence => "Sequence",
            Set => "Set",
            NumericString => "NumericString",
            PrintableString => "PrintableString",
            T61String => "T61String",
            VideotexString => "VideotexString",
            Ia5String => "IA5String",
            UtcTime => "UTCTime",
            GeneralizedTime => "GeneralizedTime",
            GraphicString => "GraphicString",
            VisibleString => "VisibleString",
            GeneralString => "GeneralString",
            UniversalString => "UniversalString",
            CharacterString => "CharacterString",
            BmpString => "BMPString",
            Date => "Date",
            TimeOfDay => "TimeOfDay",
            DateTime => "DateTime",
            Duration => "Duration",
            ObjectIdentifierIri => "ObjectIdentifierIRI",
            RelativeObjectIdentifierIri => "RelativeObjectIdentifierIRI",
            NotApplicable => "Unknown",
        })
    }
}


//------------ Ident ---------------------------------------------------------

/// The decoded identifier octets of a record.
///
/// The identifier octets carry the tag class, whether the record uses
/// primitive or constructed encoding, and the tag number. Numbers up to 30
/// fit into the five low bits of the first octet. For larger numbers those
/// five bits are all set and the number continues in subsequent octets,
/// seven bits each with the top bit flagging continuation. Only a single
/// continuation octet is supported, limiting tag numbers to 127.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Ident {
    /// The tag class.
    pub class: TagClass,

    /// Whether the record uses constructed encoding.
    pub constructed: bool,

    /// The tag number.
    pub number: u8,
}

impl Ident {
    /// The mask for the class bits of the first octet.
    const CLASS_MASK: u8 = 0xc0;

    /// The mask for the constructed bit of the first octet.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The mask for the number bits of the first octet.
    ///
    /// If all five bits are set, the number continues in the next octet.
    const NUMBER_MASK: u8 = 0x1f;

    /// The continuation bit of a multi-octet tag number.
    const CONTINUATION_MASK: u8 = 0x80;

    /// The largest tag number that fits the first octet.
    pub const MAX_LOW_NUMBER: u8 = 30;

    /// The largest tag number that can be decoded and encoded.
    pub const MAX_NUMBER: u8 = 127;

    /// Creates a new identifier.
    ///
    /// # Panics
    ///
    /// This function panics if the tag number is greater than
    /// [`Ident::MAX_NUMBER`].
    pub fn new(class: TagClass, constructed: bool, number: u8) -> Self {
        assert!(number <= Self::MAX_NUMBER);
        Ident { class, constructed, number }
    }

    /// Decodes the identifier octets at the start of `data`.
    ///
    /// Returns the identifier and the number of octets it occupied.
    /// Errors with [`DecodeError::InsufficientData`] if the data runs out
    /// and with [`DecodeError::UnsupportedHighTag`] if the tag number
    /// continues past the one supported continuation octet.
    pub fn decode(data: &[u8]) -> Result<(Self, usize), DecodeError> {
        let Some(&first) = data.first() else {
            return Err(DecodeError::InsufficientData)
        };
        let class = TagClass::from_octet(first);
        let constructed = first & Self::CONSTRUCTED_MASK != 0;
        let number = first & Self::NUMBER_MASK;
        if number != Self::NUMBER_MASK {
            return Ok((Ident { class, constructed, number }, 1))
        }
        let Some(&second) = data.get(1) else {
            return Err(DecodeError::InsufficientData)
        };
        if second & Self::CONTINUATION_MASK != 0 {
            return Err(DecodeError::UnsupportedHighTag)
        }
        Ok((Ident { class, constructed, number: second }, 2))
    }

    /// Returns the number of octets of the encoded identifier.
    pub fn encoded_len(self) -> usize {
        if self.number > Self::MAX_LOW_NUMBER { 2 }
        else { 1 }
    }

    /// Appends the encoded identifier octets to the end of `target`.
    ///
    /// Numbers above 30 use the single-continuation-octet form so that a
    /// decoded identifier re-encodes to the octets it came from.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        let mut first = self.class.to_octet();
        if self.constructed {
            first |= Self::CONSTRUCTED_MASK;
        }
        if self.number > Self::MAX_LOW_NUMBER {
            target.push(first | Self::NUMBER_MASK);
            target.push(self.number);
        }
        else {
            target.push(first | self.number);
        }
    }

    /// Returns the universal type of the identifier.
    ///
    /// Returns [`UniversalTagType::NotApplicable`] if the class isn’t
    /// universal.
    pub fn universal_type(self) -> UniversalTagType {
        if self.class == TagClass::Universal {
            UniversalTagType::from_number(self.number)
        }
        else {
            UniversalTagType::NotApplicable
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    const CLASSES: &[TagClass] = &[
        TagClass::Universal, TagClass::Application,
        TagClass::ContextSpecific, TagClass::Private,
    ];

    fn encoded(ident: Ident) -> Vec<u8> {
        let mut target = Vec::new();
        ident.append_encoded(&mut target);
        target
    }

    #[test]
    fn decode_single_octet() {
        assert_eq!(
            Ident::decode(&[0x02]).unwrap(),
            (Ident::new(TagClass::Universal, false, 2), 1)
        );
        assert_eq!(
            Ident::decode(&[0x30]).unwrap(),
            (Ident::new(TagClass::Universal, true, 16), 1)
        );
        assert_eq!(
            Ident::decode(&[0x60]).unwrap(),
            (Ident::new(TagClass::Application, true, 0), 1)
        );
        assert_eq!(
            Ident::decode(&[0x81]).unwrap(),
            (Ident::new(TagClass::ContextSpecific, false, 1), 1)
        );
        assert_eq!(
            Ident::decode(&[0xde]).unwrap(),
            (Ident::new(TagClass::Private, false, 0x1e), 1)
        );
    }

    #[test]
    fn decode_continuation_octet() {
        assert_eq!(
            Ident::decode(&[0x1f, 31]).unwrap(),
            (Ident::new(TagClass::Universal, false, 31), 2)
        );
        assert_eq!(
            Ident::decode(&[0x7f, 0x45, 0xff]).unwrap(),
            (Ident::new(TagClass::Application, true, 0x45), 2)
        );
        assert_eq!(
            Ident::decode(&[0xdf, 127]).unwrap(),
            (Ident::new(TagClass::Private, false, 127), 2)
        );
    }

    #[test]
    fn decode_failures() {
        assert_eq!(Ident::decode(&[]), Err(DecodeError::InsufficientData));
        assert_eq!(
            Ident::decode(&[0x1f]), Err(DecodeError::InsufficientData)
        );
        assert_eq!(
            Ident::decode(&[0x1f, 0x81, 0x00]),
            Err(DecodeError::UnsupportedHighTag)
        );
    }

    #[test]
    fn encode_round_trip() {
        // Edge cases on both sides of the one/two octet boundary.
        let numbers: Vec<u8> = (0..3).chain(28..34).chain(125..128).collect();
        for &class in CLASSES {
            for &constructed in &[false, true] {
                for &number in &numbers {
                    let ident = Ident::new(class, constructed, number);
                    let data = encoded(ident);
                    assert_eq!(data.len(), ident.encoded_len());
                    assert_eq!(
                        data.len(),
                        if number > 30 { 2 } else { 1 }
                    );
                    assert_eq!(
                        Ident::decode(&data).unwrap(),
                        (ident, data.len())
                    );
                }
            }
        }
    }

    #[test]
    #[should_panic]
    fn reject_large_numbers() {
        let _ = Ident::new(TagClass::Universal, false, 128);
    }

    #[test]
    fn universal_type() {
        assert_eq!(
            Ident::new(TagClass::Universal, false, 2).universal_type(),
            UniversalTagType::Integer
        );
        assert_eq!(
            Ident::new(TagClass::Universal, true, 17).universal_type(),
            UniversalTagType::Set
        );
        assert_eq!(
            Ident::new(TagClass::Universal, false, 40).universal_type(),
            UniversalTagType::NotApplicable
        );
        assert_eq!(
            Ident::new(TagClass::ContextSpecific, false, 2).universal_type(),
            UniversalTagType::NotApplicable
        );
    }

    #[test]
    fn type_numbers() {
        for number in 0..=36 {
            let tag = UniversalTagType::from_number(number);
            assert_ne!(tag, UniversalTagType::NotApplicable);
            assert_eq!(tag.number(), number);
        }
        assert_eq!(
            UniversalTagType::from_number(37),
            UniversalTagType::NotApplicable
        );
    }
}
