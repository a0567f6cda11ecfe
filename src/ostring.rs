//! The payload of an OCTET STRING record.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::hex;


//------------ OctetString ---------------------------------------------------

/// The payload of an OCTET STRING record.
///
/// Octet strings frequently carry text, so the type keeps the payload in
/// one of two shapes. If every octet is printable ASCII, the payload is
/// kept as that text. Otherwise it is kept as the uppercase hex digits of
/// the raw octets. The [`is_printable`][Self::is_printable] flag tells the
/// two shapes apart.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct OctetString {
    /// The payload, either as text or as hex digits.
    value: String,

    /// Whether `value` holds text rather than hex digits.
    printable: bool,
}

impl OctetString {
    /// Creates a printable payload from a string.
    pub fn new(text: &str) -> Self {
        OctetString { value: text.into(), printable: true }
    }

    /// Creates a payload from raw octets, stored as hex digits.
    pub fn from_bytes(octets: &[u8]) -> Self {
        OctetString { value: hex::encode(octets), printable: false }
    }

    /// Creates a payload from the content octets of an encoded record.
    ///
    /// The payload becomes text if every octet is printable ASCII and the
    /// hex representation of the octets otherwise.
    pub(crate) fn from_content(content: &[u8]) -> Self {
        if content.iter().all(|&octet| is_printable(octet)) {
            OctetString {
                value: content.iter().map(|&octet| octet as char).collect(),
                printable: true,
            }
        }
        else {
            Self::from_bytes(content)
        }
    }

    /// Returns the payload string: text if printable, hex digits if not.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns whether the payload is printable text.
    pub fn is_printable(&self) -> bool {
        self.printable
    }

    /// Returns the content octets of the payload.
    pub(crate) fn to_content(&self) -> Vec<u8> {
        if self.printable {
            self.value.as_bytes().into()
        }
        else {
            // A non-printable payload only ever holds the digits written
            // by `from_bytes`.
            hex::decode(&self.value).expect("stored digits are valid hex")
        }
    }
}


/// Returns whether an octet is printable ASCII.
fn is_printable(octet: u8) -> bool {
    (0x20..=0x7e).contains(&octet)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn printable_content() {
        let value = OctetString::from_content(b"Hello");
        assert!(value.is_printable());
        assert_eq!(value.as_str(), "Hello");
        assert_eq!(value.to_content(), b"Hello");
        assert_eq!(value, OctetString::new("Hello"));
    }

    #[test]
    fn binary_content() {
        let value = OctetString::from_content(b"\xde\xad");
        assert!(!value.is_printable());
        assert_eq!(value.as_str(), "DEAD");
        assert_eq!(value.to_content(), b"\xde\xad");
        assert_eq!(value, OctetString::from_bytes(b"\xde\xad"));
    }

    #[test]
    fn printability_boundaries() {
        // 0x20 and 0x7E are the first and last printable octets.
        assert!(OctetString::from_content(b" ~").is_printable());
        assert!(!OctetString::from_content(b"\x1f").is_printable());
        assert!(!OctetString::from_content(b"\x7f").is_printable());
        assert!(!OctetString::from_content(b"ok\tso").is_printable());
        assert!(!OctetString::from_content(b"almost\x80").is_printable());
    }

    #[test]
    fn empty_content() {
        let value = OctetString::from_content(b"");
        assert!(value.is_printable());
        assert_eq!(value.as_str(), "");
        assert_eq!(value.to_content(), b"");
    }
}
