//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::mem;
use crate::error::DecodeError;


//------------ Length --------------------------------------------------------

/// The definite length of a record’s content octets.
///
/// # BER Encoding
///
/// The length can be encoded in one of two ways, selected by the most
/// significant bit of the first octet. If the bit is clear, the remaining
/// bits of this one octet provide the length directly. This short form
/// covers lengths up to 127.
///
/// If the bit is set, the remaining bits of the first octet give the number
/// of octets that follow, which hold the big-endian encoding of the length.
/// The indefinite form, where that count is zero and the content is
/// terminated by a marker instead, is not supported; its first octet
/// decodes arithmetically, i.e., to a definite length of zero.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Length(usize);

impl Length {
    /// The number of octets of the native size type.
    const NATIVE_LEN: usize = mem::size_of::<usize>();

    /// Creates a length from the number of content octets.
    pub fn new(value: usize) -> Self {
        Length(value)
    }

    /// Returns the number of content octets.
    pub fn value(self) -> usize {
        self.0
    }

    /// Decodes the length octets at the start of `data`.
    ///
    /// Returns the length and the number of octets it occupied. Errors
    /// with [`DecodeError::InsufficientData`] if the data runs out before
    /// the announced number of length octets and with
    /// [`DecodeError::LengthOverflow`] if the encoded length doesn’t fit
    /// the native size type.
    pub fn decode(data: &[u8]) -> Result<(Self, usize), DecodeError> {
        let Some(&first) = data.first() else {
            return Err(DecodeError::InsufficientData)
        };
        if first & 0x80 == 0 {
            return Ok((Length(first as usize), 1))
        }
        let count = (first & 0x7f) as usize;
        let Some(octets) = data.get(1..1 + count) else {
            return Err(DecodeError::InsufficientData)
        };
        let mut res = 0usize;
        for &octet in octets {
            if res >> (usize::BITS - 8) != 0 {
                return Err(DecodeError::LengthOverflow)
            }
            res = (res << 8) | usize::from(octet);
        }
        Ok((Length(res), 1 + count))
    }

    /// Returns the number of octets of the encoded length.
    pub fn encoded_len(self) -> usize {
        if self.0 < 0x80 { 1 }
        else { 1 + Self::NATIVE_LEN - self.skip_len() }
    }

    /// Appends the encoded length octets to the end of `target`.
    ///
    /// Uses the short form for lengths below 128 and the minimal long
    /// form otherwise.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        if self.0 < 0x80 {
            target.push(self.0 as u8);
        }
        else {
            let octets = &self.0.to_be_bytes()[self.skip_len()..];
            target.push(0x80 | octets.len() as u8);
            target.extend_from_slice(octets);
        }
    }

    /// Returns the number of complete zero octets leading the length.
    fn skip_len(self) -> usize {
        (self.0.leading_zeros() / 8) as usize
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn encoded(length: Length) -> Vec<u8> {
        let mut target = Vec::new();
        length.append_encoded(&mut target);
        target
    }

    #[test]
    fn decode_short_form() {
        assert_eq!(Length::decode(&[0x00]).unwrap(), (Length(0), 1));
        assert_eq!(Length::decode(&[0x12]).unwrap(), (Length(0x12), 1));
        assert_eq!(Length::decode(&[0x7f]).unwrap(), (Length(0x7f), 1));
    }

    #[test]
    fn decode_long_form() {
        assert_eq!(Length::decode(&[0x81, 0x80]).unwrap(), (Length(128), 2));
        assert_eq!(Length::decode(&[0x81, 0xc8]).unwrap(), (Length(200), 2));
        assert_eq!(
            Length::decode(&[0x82, 0x01, 0x00]).unwrap(), (Length(256), 3)
        );
        assert_eq!(
            Length::decode(&[0x82, 0xf0, 0x0e, 0xff]).unwrap(),
            (Length(0xf00e), 3)
        );
        // Non-minimal encodings are fine in BER.
        assert_eq!(
            Length::decode(&[0x82, 0x00, 0x05]).unwrap(), (Length(5), 3)
        );
        // The indefinite form prefix decodes as a definite zero.
        assert_eq!(Length::decode(&[0x80]).unwrap(), (Length(0), 1));
    }

    #[test]
    fn decode_insufficient_data() {
        assert_eq!(Length::decode(&[]), Err(DecodeError::InsufficientData));
        assert_eq!(
            Length::decode(&[0x81]), Err(DecodeError::InsufficientData)
        );
        assert_eq!(
            Length::decode(&[0x82, 0x01]),
            Err(DecodeError::InsufficientData)
        );
    }

    #[test]
    fn decode_overflow() {
        // Nine octets of length can’t fit a 64 bit size type.
        assert_eq!(
            Length::decode(
                &[0x89, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
            ),
            Err(DecodeError::LengthOverflow)
        );
        let mut data = vec![0x89];
        data.extend_from_slice(&[0xff; 9]);
        assert_eq!(Length::decode(&data), Err(DecodeError::LengthOverflow));
    }

    #[test]
    fn encode() {
        fn step(value: usize, expected: &[u8]) {
            let length = Length::new(value);
            assert_eq!(encoded(length), expected);
            assert_eq!(length.encoded_len(), expected.len());
        }

        step(0, b"\x00");
        step(0x12, b"\x12");
        step(0x7f, b"\x7f");
        step(0x80, b"\x81\x80");
        step(200, b"\x81\xc8");
        step(0xff, b"\x81\xff");
        step(0x100, b"\x82\x01\x00");
        step(0xdead, b"\x82\xde\xad");
        step(0x01_0000, b"\x83\x01\x00\x00");
    }

    #[test]
    fn round_trip() {
        for value in [
            0, 1, 127, 128, 255, 256, 65535, 65536, 0xdead_beef, usize::MAX,
        ] {
            let data = encoded(Length::new(value));
            assert_eq!(
                Length::decode(&data).unwrap(), (Length(value), data.len())
            );
        }
    }
}
