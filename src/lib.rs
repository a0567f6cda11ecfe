//! Handling of BER encoded record trees.
//!
//! This crate decodes data encoded in ASN.1’s _Basic Encoding Rules_ as
//! defined in ITU recommendation X.690 into a tree of tagged records,
//! gives typed access to the well-known primitive types, and encodes any
//! record tree back into its BER representation. It deals with the
//! framing layer shared by protocols such as LDAP and SNMP rather than
//! with any particular ASN.1 module: whatever the tags, the input becomes
//! a [`Record`] tree.
//!
//! The central type is [`Record`]. It is produced either by one of the
//! two decoding functions – [`Record::decode`] for parsing a complete
//! tree up front, [`Record::decode_lazy`] for deferring the content of
//! nested records until first read – or by the per-type constructors when
//! building a tree for encoding:
//!
//! ```
//! use berec::Record;
//!
//! let data = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02];
//! let mut record = Record::decode(&data)?;
//! assert!(record.is_constructed());
//! assert_eq!(record.children()?.len(), 2);
//! assert_eq!(record.encode(), data);
//!
//! let built = Record::sequence(vec![
//!     Record::integer(1), Record::integer(2),
//! ]);
//! assert_eq!(built.encode(), data);
//! # Ok::<_, berec::DecodeError>(())
//! ```
//!
//! The crate restricts itself to the definite length form and to tag
//! numbers up to 127. Integers of any size are carried in their encoded
//! representation by [`BigInt`]; there is no big integer arithmetic.

//--- Re-exports

pub use self::error::DecodeError;
pub use self::hex::InvalidHex;
pub use self::ident::{Ident, TagClass, UniversalTagType};
pub use self::int::BigInt;
pub use self::length::Length;
pub use self::ostring::OctetString;
pub use self::record::{Record, Value};


//--- Public modules

pub mod hex;


//--- Private modules

mod error;
mod ident;
mod int;
mod length;
mod ostring;
mod record;
