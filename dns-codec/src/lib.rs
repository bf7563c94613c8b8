//! An encoder and decoder for the DNS wire-message format, [sans I/O].
//!
//! [sans I/O]: https://sans-io.readthedocs.io/
//!
//! This crate turns a logical DNS message (header, flags, questions and resource
//! records) into the bytes defined by RFC 1035, and turns an arbitrary byte buffer
//! back into that logical structure, following name compression pointers along the
//! way. It does not open sockets; pair it with a transport such as UDP.
//!
//! Only a subset of the protocol is understood: the `QUERY`, `IQUERY` and `STATUS`
//! opcodes, the `IN` class, and the `A`, `NS`, `CNAME`, `PTR`, `MX`, `SRV`, `IXFR`,
//! `AXFR` and `*` record types. Anything else is reported as an error instead of
//! being silently mapped onto a known value.
//!
//! The crate is `no_std`, but needs an allocator. It is also
//! `#![forbid(unsafe_code)]`, and is intended to remain so.
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), dns_codec::Error> {
//! use dns_codec::{Message, RecordType};
//!
//! // A query for the A record of www.google.com, asking for recursion.
//! let query = Message::query(0x42, "www.google.com", RecordType::A, true)?;
//!
//! // Serialize the message into a buffer.
//! let mut buf = vec![0; 512];
//! assert!(query.space_needed() <= buf.len());
//! let len = query.write(&mut buf)?;
//! assert_eq!(len, 32);
//!
//! // The buffer would be sent over the network here. Decoding it gives back the
//! // same message.
//! let decoded = Message::read(&buf[..len])?;
//! assert_eq!(decoded, query);
//! assert!(decoded.flags().is_request());
//! assert_eq!(decoded.questions()[0].name().to_string(), "www.google.com");
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `std` (enabled by default) - Implements `std::error::Error` for the error types and
//!   adds conversions to and from `std::net::Ipv4Addr`. Disable this feature to use on
//!   `no_std` targets.

#![forbid(
    unsafe_code,
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    future_incompatible
)]
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

use alloc::vec::Vec;

use core::convert::{TryFrom, TryInto};
use core::fmt;
use core::iter;
use core::mem;
use core::str::FromStr;

#[cfg(feature = "std")]
use std::error::Error as StdError;

mod describe;
mod ser;

use ser::{ensure_space, Cursor, Serialize};

pub use describe::{Describe, Description, Iter as DescriptionIter, Value};
pub use ser::{DomainName, MAX_LABEL_LEN, MAX_NAME_LEN, MAX_POINTER_HOPS};

/// Macro to implement `Serialize` for a struct.
macro_rules! serialize {
    (
        $(#[$outer:meta])*
        pub struct $name:ident {
            $(
                $(#[$inner:meta])*
                $vis: vis $field:ident: $ty:ty,
            )*
        }
    ) => {
        $(#[$outer])*
        pub struct $name {
            $(
                $(#[$inner])*
                $vis $field: $ty,
            )*
        }

        impl Serialize for $name {
            fn serialized_len(&self) -> usize {
                let mut len = 0;
                $(
                    len += self.$field.serialized_len();
                )*
                len
            }

            fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
                let mut index = 0;
                $(
                    index += self.$field.serialize(&mut bytes[index..])?;
                )*
                Ok(index)
            }

            fn deserialize(cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), Error> {
                $(
                    let ($field, cursor) = <$ty as Serialize>::deserialize(cursor)?;
                )*
                Ok((Self { $($field,)* }, cursor))
            }
        }
    };
}

/// An enum with a bevy of given variants, each with a wire value, a display name and
/// the mnemonics it can be parsed from.
macro_rules! num_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident: $repr:ident {
            $(
                $(#[$inner:meta])*
                $variant:ident = $value:literal => $display:literal [$($mnemonic:literal),+],
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr($repr)]
        pub enum $name {
            $(
                $(#[$inner])*
                $variant = $value,
            )*
        }

        impl $name {
            /// Get the human-readable name of this value.
            pub fn name(self) -> &'static str {
                match self {
                    $(
                        $name::$variant => $display,
                    )*
                }
            }

            /// Get the short mnemonic for this value.
            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(
                        $name::$variant => num_enum!(@first $($mnemonic),+),
                    )*
                }
            }
        }

        impl TryFrom<$repr> for $name {
            type Error = InvalidCode;

            fn try_from(value: $repr) -> Result<Self, Self::Error> {
                match value {
                    $(
                        $value => Ok($name::$variant),
                    )*
                    _ => Err(InvalidCode {
                        kind: stringify!($name),
                        code: value.into(),
                    }),
                }
            }
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> Self {
                value as $repr
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if $(s.eq_ignore_ascii_case($mnemonic))||+ {
                        return Ok($name::$variant);
                    }
                )*

                Err(Error::Parse {
                    name: stringify!($name),
                })
            }
        }
    };
    (@first $first:literal $(, $rest:literal)*) => {
        $first
    };
}

/// Implement `Serialize` for an enum carried on the wire as a `u16`.
macro_rules! serialize_code {
    ($($name:ident),*) => {
        $(
            impl Serialize for $name {
                fn serialized_len(&self) -> usize {
                    mem::size_of::<u16>()
                }

                fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
                    u16::from(*self).serialize(bytes)
                }

                fn deserialize(cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), Error> {
                    let (value, cursor) = u16::deserialize(cursor)?;
                    Ok((value.try_into()?, cursor))
                }
            }
        )*
    };
}

/// An error that may occur while encoding or decoding a DNS message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// We are trying to write to a buffer, but the buffer doesn't have enough space.
    ///
    /// This error can be fixed by increasing the size of the buffer.
    NotEnoughWriteSpace {
        /// The number of bytes we tried to write.
        tried_to_write: usize,

        /// The number of bytes that were available in the buffer.
        available: usize,

        /// The type of the value that we tried to write.
        buffer_type: &'static str,
    },

    /// We attempted to read from a buffer, but we ran out of room before we could read the entire
    /// value.
    NotEnoughReadBytes {
        /// The position in the message where the read started.
        position: usize,

        /// The number of bytes we tried to read.
        tried_to_read: usize,

        /// The number of bytes that were left in the buffer.
        available: usize,
    },

    /// We tried to parse this value from text, but it was invalid.
    Parse {
        /// The name of the value we tried to parse.
        name: &'static str,
    },

    /// A label was longer than 63 bytes.
    LabelTooLong(usize),

    /// A name was longer than 255 bytes in wire form.
    NameTooLong(usize),

    /// A label contained a byte that is not ASCII.
    NonAsciiLabel,

    /// A label read from the wire contained a `.`, so it could not be told apart
    /// from two labels once printed.
    DotInLabel,

    /// A label length byte used one of the reserved label kinds (`0x40..=0xBF`).
    InvalidLabelLength(u8),

    /// A compression pointer did not point to an earlier name.
    BadPointer {
        /// The position of the pointer in the message.
        position: usize,

        /// The offset the pointer pointed to.
        target: usize,
    },

    /// A name followed more compression pointers than allowed.
    TooManyPointers(usize),

    /// We could not convert a raw number to a code.
    InvalidCode(InvalidCode),

    /// A section holds more records than its `u16` count can describe.
    TooManyRecords {
        /// The name of the section.
        section: &'static str,

        /// The number of records in it.
        count: usize,
    },

    /// The data of a record does not match its type.
    DataMismatch {
        /// The type of the record.
        ty: RecordType,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotEnoughWriteSpace {
                tried_to_write,
                available,
                buffer_type,
            } => {
                write!(
                    f,
                    "not enough write space: tried to write {} bytes of {}, but only {} were available",
                    tried_to_write, buffer_type, available
                )
            }
            Error::NotEnoughReadBytes {
                position,
                tried_to_read,
                available,
            } => {
                write!(
                    f,
                    "not enough read bytes: tried to read {} bytes at offset {}, but only {} were available",
                    tried_to_read, position, available
                )
            }
            Error::Parse { name } => {
                write!(f, "parse error: could not parse a {}", name)
            }
            Error::LabelTooLong(len) => {
                write!(f, "label too long: label was {} bytes long", len)
            }
            Error::NameTooLong(len) => {
                write!(f, "name too long: name was {} bytes long", len)
            }
            Error::NonAsciiLabel => f.write_str("label contains a non-ASCII byte"),
            Error::DotInLabel => f.write_str("label contains a '.'"),
            Error::InvalidLabelLength(len) => {
                write!(f, "invalid label length byte: {:#04x}", len)
            }
            Error::BadPointer { position, target } => {
                write!(
                    f,
                    "bad compression pointer at offset {}: points to offset {}",
                    position, target
                )
            }
            Error::TooManyPointers(hops) => {
                write!(f, "too many compression pointers: {} in one name", hops)
            }
            Error::InvalidCode(err) => {
                write!(f, "{}", err)
            }
            Error::TooManyRecords { section, count } => {
                write!(f, "too many records: {} {} records", count, section)
            }
            Error::DataMismatch { ty } => {
                write!(f, "record data does not match record type {}", ty.mnemonic())
            }
        }
    }
}

#[cfg(feature = "std")]
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::InvalidCode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvalidCode> for Error {
    fn from(err: InvalidCode) -> Self {
        Error::InvalidCode(err)
    }
}

/// A DNS message: a header followed by four sections of records.
///
/// The counts in the header are derived from the sections, so they can never
/// disagree with them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Message {
    /// The identifier pairing a request with its response.
    id: u16,

    /// The flags of the message.
    flags: Flags,

    /// The questions in the message.
    questions: Vec<Question>,

    /// The answers in the message.
    answers: Vec<ResourceRecord>,

    /// The authorities in the message.
    authorities: Vec<ResourceRecord>,

    /// The additional records in the message.
    additional: Vec<ResourceRecord>,
}

impl Message {
    /// Create a new message from its sections.
    pub fn new(
        id: u16,
        flags: Flags,
        questions: Vec<Question>,
        answers: Vec<ResourceRecord>,
        authorities: Vec<ResourceRecord>,
        additional: Vec<ResourceRecord>,
    ) -> Self {
        Self {
            id,
            flags,
            questions,
            answers,
            authorities,
            additional,
        }
    }

    /// Create a standard query asking a single question about `name` in class `IN`.
    ///
    /// # Errors
    ///
    /// This function fails if `name` is not a valid domain name; see [`DomainName::new`].
    pub fn query(
        id: u16,
        name: &str,
        ty: RecordType,
        recursion_desired: bool,
    ) -> Result<Self, Error> {
        let mut flags = Flags::new();
        flags
            .set_is_request(true)
            .set_opcode(Opcode::Query)
            .set_recursion_desired(recursion_desired);

        let question = Question::new(DomainName::new(name)?, ty, RecordClass::In);

        Ok(Self::new(
            id,
            flags,
            alloc::vec![question],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        ))
    }

    /// Get the ID of this message.
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Get a mutable reference to the ID of this message.
    pub fn id_mut(&mut self) -> &mut u16 {
        &mut self.id
    }

    /// Get the header of this message.
    ///
    /// # Errors
    ///
    /// This function raises [`Error::TooManyRecords`] if a section holds more than
    /// `u16::MAX` records.
    pub fn header(&self) -> Result<Header, Error> {
        fn count(section: &'static str, len: usize) -> Result<u16, Error> {
            u16::try_from(len).map_err(|_| Error::TooManyRecords {
                section,
                count: len,
            })
        }

        Ok(Header {
            id: self.id,
            flags: self.flags,
            question_count: count("Question", self.questions.len())?,
            answer_count: count("Answer", self.answers.len())?,
            authority_count: count("Authority", self.authorities.len())?,
            additional_count: count("Additional", self.additional.len())?,
        })
    }

    /// Get the flags for this message.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Get a mutable reference to the flags for this message.
    pub fn flags_mut(&mut self) -> &mut Flags {
        &mut self.flags
    }

    /// Get the questions in this message.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Get a mutable reference to the questions in this message.
    pub fn questions_mut(&mut self) -> &mut Vec<Question> {
        &mut self.questions
    }

    /// Get the answers in this message.
    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    /// Get a mutable reference to the answers in this message.
    pub fn answers_mut(&mut self) -> &mut Vec<ResourceRecord> {
        &mut self.answers
    }

    /// Get the authorities in this message.
    pub fn authorities(&self) -> &[ResourceRecord] {
        &self.authorities
    }

    /// Get a mutable reference to the authorities in this message.
    pub fn authorities_mut(&mut self) -> &mut Vec<ResourceRecord> {
        &mut self.authorities
    }

    /// Get the additional records in this message.
    pub fn additional(&self) -> &[ResourceRecord] {
        &self.additional
    }

    /// Get a mutable reference to the additional records in this message.
    pub fn additional_mut(&mut self) -> &mut Vec<ResourceRecord> {
        &mut self.additional
    }

    /// Get the buffer space needed to serialize this message.
    pub fn space_needed(&self) -> usize {
        self.serialized_len()
    }

    /// Write this message to a buffer.
    ///
    /// Returns the number of bytes written. Nothing is written if an error is
    /// returned.
    ///
    /// # Errors
    ///
    /// - [`Error::TooManyRecords`] if a section does not fit in its `u16` count.
    /// - [`Error::NotEnoughWriteSpace`] if `buffer` is shorter than [`space_needed`].
    ///
    /// [`space_needed`]: Message::space_needed
    pub fn write(&self, buffer: &mut [u8]) -> Result<usize, Error> {
        self.header()?;
        ensure_space(buffer, self.space_needed(), "Message")?;
        self.serialize(buffer)
    }

    /// Serialize this message into a freshly allocated buffer of exactly
    /// [`space_needed`] bytes.
    ///
    /// # Errors
    ///
    /// See [`write`].
    ///
    /// [`space_needed`]: Message::space_needed
    /// [`write`]: Message::write
    pub fn to_vec(&self) -> Result<Vec<u8>, Error> {
        self.header()?;

        let mut buffer = alloc::vec![0; self.space_needed()];
        let len = self.serialize(&mut buffer)?;
        buffer.truncate(len);
        Ok(buffer)
    }

    /// Read a message from a buffer.
    ///
    /// The counts in the header decide how many records are read from each section.
    /// Bytes after the last record are ignored.
    ///
    /// # Errors
    ///
    /// This function may raise one of the following errors:
    ///
    /// - [`Error::NotEnoughReadBytes`] if the buffer ends before the message does.
    /// - [`Error::InvalidCode`] if an opcode, record type or record class is unknown.
    /// - [`Error::BadPointer`] or [`Error::TooManyPointers`] if name compression is
    ///   malformed.
    /// - [`Error::InvalidLabelLength`], [`Error::NonAsciiLabel`], [`Error::DotInLabel`] or
    ///   [`Error::NameTooLong`] if a name is malformed.
    pub fn read(buffer: &[u8]) -> Result<Message, Error> {
        let (message, _) = Message::deserialize(Cursor::new(buffer))?;
        Ok(message)
    }
}

impl Serialize for Message {
    fn serialized_len(&self) -> usize {
        iter::once(Header::LEN)
            .chain(self.questions.iter().map(Serialize::serialized_len))
            .chain(self.answers.iter().map(Serialize::serialized_len))
            .chain(self.authorities.iter().map(Serialize::serialized_len))
            .chain(self.additional.iter().map(Serialize::serialized_len))
            .fold(0, |a, b| a.saturating_add(b))
    }

    fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
        let mut offset = 0;
        offset += self.header()?.serialize(&mut bytes[offset..])?;
        for question in self.questions.iter() {
            offset += question.serialize(&mut bytes[offset..])?;
        }
        for answer in self.answers.iter() {
            offset += answer.serialize(&mut bytes[offset..])?;
        }
        for authority in self.authorities.iter() {
            offset += authority.serialize(&mut bytes[offset..])?;
        }
        for additional in self.additional.iter() {
            offset += additional.serialize(&mut bytes[offset..])?;
        }
        Ok(offset)
    }

    fn deserialize(cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), Error> {
        /// Read `count` values of `T`.
        fn read_set<T: Serialize>(
            mut cursor: Cursor<'_>,
            count: u16,
        ) -> Result<(Vec<T>, Cursor<'_>), Error> {
            // The count is untrusted; every record takes at least one byte.
            let mut items = Vec::with_capacity(usize::from(count).min(cursor.len()));

            for _ in 0..count {
                let (item, next) = T::deserialize(cursor)?;
                items.push(item);
                cursor = next;
            }

            Ok((items, cursor))
        }

        let (header, cursor) = Header::deserialize(cursor)?;
        let (questions, cursor) = read_set(cursor, header.question_count)?;
        let (answers, cursor) = read_set(cursor, header.answer_count)?;
        let (authorities, cursor) = read_set(cursor, header.authority_count)?;
        let (additional, cursor) = read_set(cursor, header.additional_count)?;

        let message = Message {
            id: header.id,
            flags: header.flags,
            questions,
            answers,
            authorities,
            additional,
        };

        Ok((message, cursor))
    }
}

serialize! {
    /// The header for a DNS message.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Header {
        /// The ID of this message.
        id: u16,

        /// The flags associated with this message.
        flags: Flags,

        /// The number of questions in this message.
        question_count: u16,

        /// The number of answers in this message.
        answer_count: u16,

        /// The number of authorities in this message.
        authority_count: u16,

        /// The number of additional records in this message.
        additional_count: u16,
    }
}

impl Header {
    /// The size of a header on the wire.
    pub const LEN: usize = 12;

    /// Read just the header at the start of a message.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotEnoughReadBytes`] if `buffer` is shorter than 12 bytes,
    /// or with [`Error::InvalidCode`] if the opcode is unknown.
    pub fn read(buffer: &[u8]) -> Result<Header, Error> {
        let (header, _) = Header::deserialize(Cursor::new(buffer))?;
        Ok(header)
    }

    /// Get the ID of the message.
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Get the flags of the message.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Get the number of questions.
    pub fn question_count(&self) -> u16 {
        self.question_count
    }

    /// Get the number of answers.
    pub fn answer_count(&self) -> u16 {
        self.answer_count
    }

    /// Get the number of authority records.
    pub fn authority_count(&self) -> u16 {
        self.authority_count
    }

    /// Get the number of additional records.
    pub fn additional_count(&self) -> u16 {
        self.additional_count
    }
}

serialize! {
    /// The question in a DNS message.
    #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Question {
        /// The name of the question.
        name: DomainName,

        /// The type of the question.
        ty: RecordType,

        /// The class of the question.
        class: RecordClass,
    }
}

impl Question {
    /// Create a new question.
    pub fn new(name: DomainName, ty: RecordType, class: RecordClass) -> Self {
        Self { name, ty, class }
    }

    /// Get the name of the question.
    pub fn name(&self) -> &DomainName {
        &self.name
    }

    /// Get the type of the question.
    pub fn ty(&self) -> RecordType {
        self.ty
    }

    /// Get the class of the question.
    pub fn class(&self) -> RecordClass {
        self.class
    }
}

/// A resource record in a DNS message.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceRecord {
    /// The name of the resource record.
    name: DomainName,

    /// The type of the resource record.
    ty: RecordType,

    /// The class of the resource record.
    class: RecordClass,

    /// The time-to-live of the resource record, in seconds.
    ttl: i32,

    /// The data of the resource record.
    data: ResourceData,
}

impl ResourceRecord {
    /// Create a new `ResourceRecord`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::DataMismatch`] unless `data` is an address for type `A`
    /// and a name for every other type.
    pub fn new(
        name: DomainName,
        ty: RecordType,
        class: RecordClass,
        ttl: i32,
        data: impl Into<ResourceData>,
    ) -> Result<Self, Error> {
        let data = data.into();
        if !data.matches(ty) {
            return Err(Error::DataMismatch { ty });
        }

        Ok(Self {
            name,
            ty,
            class,
            ttl,
            data,
        })
    }

    /// Get the name of the resource record.
    pub fn name(&self) -> &DomainName {
        &self.name
    }

    /// Get the type of the resource record.
    pub fn ty(&self) -> RecordType {
        self.ty
    }

    /// Get the class of the resource record.
    pub fn class(&self) -> RecordClass {
        self.class
    }

    /// Get the time-to-live of the resource record.
    pub fn ttl(&self) -> i32 {
        self.ttl
    }

    /// Get the length of the record data on the wire.
    pub fn data_len(&self) -> u16 {
        // Names are capped at 255 bytes, so this always fits.
        self.data.serialized_len() as u16
    }

    /// Get the data of the resource record.
    pub fn data(&self) -> &ResourceData {
        &self.data
    }
}

impl Serialize for ResourceRecord {
    fn serialized_len(&self) -> usize {
        self.name.serialized_len()
            + self.ty.serialized_len()
            + self.class.serialized_len()
            + self.ttl.serialized_len()
            + mem::size_of::<u16>()
            + self.data.serialized_len()
    }

    fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
        let mut offset = 0;
        offset += self.name.serialize(&mut bytes[offset..])?;
        offset += self.ty.serialize(&mut bytes[offset..])?;
        offset += self.class.serialize(&mut bytes[offset..])?;
        offset += self.ttl.serialize(&mut bytes[offset..])?;
        offset += self.data_len().serialize(&mut bytes[offset..])?;
        offset += self.data.serialize(&mut bytes[offset..])?;
        Ok(offset)
    }

    fn deserialize(cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), Error> {
        let (name, cursor) = DomainName::deserialize(cursor)?;
        let (ty, cursor) = RecordType::deserialize(cursor)?;
        let (class, cursor) = RecordClass::deserialize(cursor)?;
        let (ttl, cursor) = i32::deserialize(cursor)?;

        // The data length is not trusted; the data decoder knows its own length.
        let cursor = cursor.advance(mem::size_of::<u16>())?;
        let (data, cursor) = ResourceData::deserialize(ty, cursor)?;

        let record = ResourceRecord {
            name,
            ty,
            class,
            ttl,
            data,
        };

        Ok((record, cursor))
    }
}

/// The data stored in a resource record.
///
/// Records of type `A` hold an address; every other type holds a name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceData {
    /// A domain name, as held by `NS`, `CNAME`, `PTR` and the other types.
    Name(DomainName),

    /// An IPv4 address, as held by `A` records.
    Ipv4(Ipv4Address),
}

impl ResourceData {
    /// Whether this kind of data belongs to records of type `ty`.
    pub fn matches(&self, ty: RecordType) -> bool {
        match self {
            ResourceData::Ipv4(_) => ty == RecordType::A,
            ResourceData::Name(_) => ty != RecordType::A,
        }
    }

    /// Get the name, if this data holds one.
    pub fn as_name(&self) -> Option<&DomainName> {
        match self {
            ResourceData::Name(name) => Some(name),
            ResourceData::Ipv4(_) => None,
        }
    }

    /// Get the address, if this data holds one.
    pub fn as_ipv4(&self) -> Option<Ipv4Address> {
        match self {
            ResourceData::Ipv4(ip) => Some(*ip),
            ResourceData::Name(_) => None,
        }
    }

    fn serialized_len(&self) -> usize {
        match self {
            ResourceData::Name(name) => name.serialized_len(),
            ResourceData::Ipv4(ip) => ip.serialized_len(),
        }
    }

    fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
        match self {
            ResourceData::Name(name) => name.serialize(bytes),
            ResourceData::Ipv4(ip) => ip.serialize(bytes),
        }
    }

    fn deserialize(ty: RecordType, cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), Error> {
        if ty == RecordType::A {
            let (ip, cursor) = Ipv4Address::deserialize(cursor)?;
            Ok((ResourceData::Ipv4(ip), cursor))
        } else {
            let (name, cursor) = DomainName::deserialize(cursor)?;
            Ok((ResourceData::Name(name), cursor))
        }
    }
}

impl fmt::Display for ResourceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceData::Name(name) => fmt::Display::fmt(name, f),
            ResourceData::Ipv4(ip) => fmt::Display::fmt(ip, f),
        }
    }
}

impl From<DomainName> for ResourceData {
    fn from(name: DomainName) -> Self {
        ResourceData::Name(name)
    }
}

impl From<Ipv4Address> for ResourceData {
    fn from(ip: Ipv4Address) -> Self {
        ResourceData::Ipv4(ip)
    }
}

/// An IPv4 address, as carried by `A` records.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv4Address([u8; 4]);

impl Ipv4Address {
    /// Create an address from its four octets.
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self([a, b, c, d])
    }

    /// Get the four octets of this address.
    pub const fn octets(self) -> [u8; 4] {
        self.0
    }
}

impl From<[u8; 4]> for Ipv4Address {
    fn from(octets: [u8; 4]) -> Self {
        Self(octets)
    }
}

impl From<Ipv4Address> for [u8; 4] {
    fn from(ip: Ipv4Address) -> Self {
        ip.0
    }
}

#[cfg(feature = "std")]
impl From<std::net::Ipv4Addr> for Ipv4Address {
    fn from(ip: std::net::Ipv4Addr) -> Self {
        Self(ip.octets())
    }
}

#[cfg(feature = "std")]
impl From<Ipv4Address> for std::net::Ipv4Addr {
    fn from(ip: Ipv4Address) -> Self {
        ip.0.into()
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

impl FromStr for Ipv4Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || Error::Parse {
            name: "IPv4 address",
        };

        let mut octets = [0u8; 4];
        let mut parts = s.split('.');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(err)?;

            // `u8::from_str` would also take a leading `+`.
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err());
            }

            *octet = part.parse().map_err(|_| err())?;
        }

        if parts.next().is_some() {
            return Err(err());
        }

        Ok(Self(octets))
    }
}

impl Serialize for Ipv4Address {
    fn serialized_len(&self) -> usize {
        4
    }

    fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
        ensure_space(bytes, 4, "Ipv4Address")?;
        bytes[..4].copy_from_slice(&self.0);
        Ok(4)
    }

    fn deserialize(cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), Error> {
        let (raw, cursor) = cursor.take(4)?;

        let mut octets = [0; 4];
        octets.copy_from_slice(raw);
        Ok((Self(octets), cursor))
    }
}

/// The flags associated with a DNS message.
///
/// The query/response bit is exposed as [`is_request`](Flags::is_request): a message
/// is a request when the bit is *clear*, as the protocol defines it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flags {
    is_request: bool,
    opcode: Opcode,
    authoritative: bool,
    truncated: bool,
    recursion_desired: bool,
    recursion_available: bool,
    response_code: u8,
}

impl Flags {
    // Values used to manipulate the raw word.
    const RAW_QR: u16 = 1 << 15;
    const RAW_OPCODE_SHIFT: u16 = 11;
    const RAW_OPCODE_MASK: u16 = 0b1111;
    const RAW_AA: u16 = 1 << 10;
    const RAW_TC: u16 = 1 << 9;
    const RAW_RD: u16 = 1 << 8;
    const RAW_RA: u16 = 1 << 7;
    const RAW_RCODE_SHIFT: u16 = 0;
    const RAW_RCODE_MASK: u16 = 0b1111;

    /// Create a new set of flags for a request, with every other bit cleared.
    ///
    /// This is the all-zero flags word.
    pub const fn new() -> Self {
        Self {
            is_request: true,
            opcode: Opcode::Query,
            authoritative: false,
            truncated: false,
            recursion_desired: false,
            recursion_available: false,
            response_code: 0,
        }
    }

    /// Use the standard set of flags for a DNS query.
    ///
    /// This is identical to `new()` but uses recursive querying.
    pub const fn standard_query() -> Self {
        let mut flags = Self::new();
        flags.recursion_desired = true;
        flags
    }

    /// Decode flags from their raw 16-bit word.
    ///
    /// The three reserved bits are ignored.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidCode`] if the opcode is unknown.
    pub fn from_raw(raw: u16) -> Result<Self, Error> {
        let opcode = (raw >> Self::RAW_OPCODE_SHIFT) & Self::RAW_OPCODE_MASK;

        Ok(Self {
            is_request: raw & Self::RAW_QR == 0,
            opcode: Opcode::try_from(opcode as u8)?,
            authoritative: raw & Self::RAW_AA != 0,
            truncated: raw & Self::RAW_TC != 0,
            recursion_desired: raw & Self::RAW_RD != 0,
            recursion_available: raw & Self::RAW_RA != 0,
            response_code: ((raw >> Self::RAW_RCODE_SHIFT) & Self::RAW_RCODE_MASK) as u8,
        })
    }

    /// Get the raw value of these flags.
    pub fn raw(self) -> u16 {
        let mut raw = u16::from(u8::from(self.opcode)) << Self::RAW_OPCODE_SHIFT;
        raw |= u16::from(self.response_code) << Self::RAW_RCODE_SHIFT;

        if !self.is_request {
            raw |= Self::RAW_QR;
        }
        if self.authoritative {
            raw |= Self::RAW_AA;
        }
        if self.truncated {
            raw |= Self::RAW_TC;
        }
        if self.recursion_desired {
            raw |= Self::RAW_RD;
        }
        if self.recursion_available {
            raw |= Self::RAW_RA;
        }

        raw
    }

    /// Get whether this message is a request rather than a response.
    pub fn is_request(&self) -> bool {
        self.is_request
    }

    /// Set whether this message is a request rather than a response.
    pub fn set_is_request(&mut self, is_request: bool) -> &mut Self {
        self.is_request = is_request;
        self
    }

    /// Get the opcode.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Set the opcode.
    pub fn set_opcode(&mut self, opcode: Opcode) -> &mut Self {
        self.opcode = opcode;
        self
    }

    /// Get whether this message is authoritative.
    pub fn authoritative(&self) -> bool {
        self.authoritative
    }

    /// Set whether this message is authoritative.
    pub fn set_authoritative(&mut self, authoritative: bool) -> &mut Self {
        self.authoritative = authoritative;
        self
    }

    /// Get whether this message is truncated.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Set whether this message is truncated.
    pub fn set_truncated(&mut self, truncated: bool) -> &mut Self {
        self.truncated = truncated;
        self
    }

    /// Get whether recursion is desired for this message.
    pub fn recursion_desired(&self) -> bool {
        self.recursion_desired
    }

    /// Set whether recursion is desired for this message.
    pub fn set_recursion_desired(&mut self, recursion_desired: bool) -> &mut Self {
        self.recursion_desired = recursion_desired;
        self
    }

    /// Get whether recursion is available for this message.
    pub fn recursion_available(&self) -> bool {
        self.recursion_available
    }

    /// Set whether recursion is available for this message.
    pub fn set_recursion_available(&mut self, recursion_available: bool) -> &mut Self {
        self.recursion_available = recursion_available;
        self
    }

    /// Get the 4-bit response code.
    pub fn response_code(&self) -> u8 {
        self.response_code
    }

    /// Set the response code.
    ///
    /// Only the low four bits are kept.
    pub fn set_response_code(&mut self, response_code: u8) -> &mut Self {
        self.response_code = response_code & Self::RAW_RCODE_MASK as u8;
        self
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();

        list.entry(&if self.is_request { "request" } else { "response" });
        list.entry(&self.opcode());

        if self.authoritative() {
            list.entry(&"authoritative");
        }

        if self.truncated() {
            list.entry(&"truncated");
        }

        if self.recursion_desired() {
            list.entry(&"recursion desired");
        }

        if self.recursion_available() {
            list.entry(&"recursion available");
        }

        list.entry(&self.response_code());

        list.finish()
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Flags {
    fn serialized_len(&self) -> usize {
        2
    }

    fn serialize(&self, buf: &mut [u8]) -> Result<usize, Error> {
        self.raw().serialize(buf)
    }

    fn deserialize(cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), Error> {
        let (raw, cursor) = u16::deserialize(cursor)?;
        Ok((Self::from_raw(raw)?, cursor))
    }
}

num_enum! {
    /// The operation code for the message.
    pub enum Opcode: u8 {
        /// A standard query.
        Query = 0 => "Standard Query" ["QUERY"],

        /// An inverse query.
        IQuery = 1 => "Inverse Query" ["IQUERY"],

        /// A server status request.
        Status = 2 => "Server Status Request" ["STATUS"],
    }
}

impl Default for Opcode {
    fn default() -> Self {
        Self::Query
    }
}

num_enum! {
    /// The class of a question or record.
    pub enum RecordClass: u16 {
        /// The Internet.
        In = 1 => "IN (Internet)" ["IN"],
    }
}

impl Default for RecordClass {
    fn default() -> Self {
        Self::In
    }
}

num_enum! {
    /// The record types that a question can ask for.
    pub enum RecordType: u16 {
        /// Get the host's IPv4 address.
        A = 1 => "A (Host Record)" ["A"],

        /// Get the authoritative name servers for a domain.
        NS = 2 => "NS (Authoritative Name Server)" ["NS"],

        /// Get the canonical name for a domain.
        CName = 5 => "CNAME (Canonical Name)" ["CNAME"],

        /// Get the domain pointer for a domain.
        Ptr = 12 => "PTR (Domain Name Pointer)" ["PTR"],

        /// Get the mail exchange for a domain.
        MX = 15 => "MX (Mail Exchange)" ["MX"],

        /// Get the server selection for a domain.
        Srv = 33 => "SRV (Service Selection)" ["SRV"],

        /// Get the incremental transfer for a domain.
        Ixfr = 251 => "IXFR (Incremental Zone Transfer)" ["IXFR"],

        /// Get the transfer of an entire zone for a domain.
        Axfr = 252 => "AXFR (Entire Zone Transfer)" ["AXFR"],

        /// Get every record for a domain.
        All = 255 => "* (All Records)" ["ALL", "*", "ANY"],
    }
}

impl Default for RecordType {
    fn default() -> Self {
        Self::A
    }
}

serialize_code!(RecordType, RecordClass);

/// The given value is not a valid code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCode {
    kind: &'static str,
    code: u16,
}

impl InvalidCode {
    /// Get the invalid code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Get the name of the field the code was read for, such as `"RecordType"`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl fmt::Display for InvalidCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} code: {}", self.kind, self.code)
    }
}

#[cfg(feature = "std")]
impl StdError for InvalidCode {}
