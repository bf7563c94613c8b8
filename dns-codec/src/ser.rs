//! A serializer/deserializer compatible with the DNS wire format.
//!
//! Various notes about the wire format:
//!
//! - All integers are in big endian format.
//! - Names consist of a series of labels, each prefixed with a length byte.
//! - Names end with a zero byte, or with a pointer to a previous name.
//! - Pointers are offsets into the whole message, so decoding needs access to the
//!   entire buffer and not just the current record.

use super::Error;

use alloc::string::String;
use alloc::vec::Vec;

use core::convert::TryFrom;
use core::fmt;
use core::iter;
use core::mem;

use memchr::Memchr;

/// An object that is able to be serialized to or deserialized from a series of bytes.
pub(crate) trait Serialize: Sized {
    /// The number of bytes needed to serialize this object.
    fn serialized_len(&self) -> usize;

    /// Serialize this object into a series of bytes.
    ///
    /// Returns the number of bytes written.
    fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error>;

    /// Deserialize this object from a series of bytes.
    ///
    /// Returns the object and the cursor positioned right after it.
    fn deserialize(cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), Error>;
}

/// A cursor into a series of bytes.
///
/// The cursor is `Copy` and is threaded by value through the decoders; a decoder
/// hands back the advanced cursor for the next one to use.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Cursor<'a> {
    /// The bytes being read.
    bytes: &'a [u8],

    /// The index into the bytes that we've read so far.
    cursor: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor from a series of bytes.
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// Get the absolute position of this cursor in the original bytes.
    pub(crate) fn position(&self) -> usize {
        self.cursor
    }

    /// Get the slice of remaining bytes.
    pub(crate) fn remaining(&self) -> &'a [u8] {
        self.bytes.get(self.cursor..).unwrap_or(&[])
    }

    /// Get the length of the slice of remaining bytes.
    pub(crate) fn len(&self) -> usize {
        self.remaining().len()
    }

    /// Get a new cursor at the given absolute position.
    pub(crate) fn at(&self, pos: usize) -> Self {
        Self {
            bytes: self.bytes,
            cursor: pos,
        }
    }

    /// Look at the next byte without consuming it.
    pub(crate) fn peek(&self) -> Result<u8, Error> {
        self.remaining()
            .first()
            .copied()
            .ok_or_else(|| self.read_error(1))
    }

    /// Consume the next `n` bytes.
    pub(crate) fn take(self, n: usize) -> Result<(&'a [u8], Self), Error> {
        let bytes = self
            .remaining()
            .get(..n)
            .ok_or_else(|| self.read_error(n))?;

        Ok((bytes, self.advance(n)?))
    }

    /// Advance the cursor by the given number of bytes.
    pub(crate) fn advance(mut self, n: usize) -> Result<Self, Error> {
        if n > self.len() {
            return Err(self.read_error(n));
        }

        self.cursor += n;
        Ok(self)
    }

    /// Error for when a read of `n` bytes failed.
    fn read_error(&self, n: usize) -> Error {
        Error::NotEnoughReadBytes {
            position: self.cursor,
            tried_to_read: n,
            available: self.len(),
        }
    }
}

/// Make sure `bytes` can hold `needed` bytes.
pub(crate) fn ensure_space(
    bytes: &[u8],
    needed: usize,
    buffer_type: &'static str,
) -> Result<(), Error> {
    if bytes.len() < needed {
        return Err(Error::NotEnoughWriteSpace {
            tried_to_write: needed,
            available: bytes.len(),
            buffer_type,
        });
    }

    Ok(())
}

macro_rules! serialize_num {
    ($($num_ty: ident),*) => {
        $(
            impl Serialize for $num_ty {
                fn serialized_len(&self) -> usize {
                    mem::size_of::<$num_ty>()
                }

                fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
                    ensure_space(bytes, mem::size_of::<$num_ty>(), stringify!($num_ty))?;

                    let value = (*self).to_be_bytes();
                    bytes[..mem::size_of::<$num_ty>()].copy_from_slice(&value);

                    Ok(mem::size_of::<$num_ty>())
                }

                fn deserialize(cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), Error> {
                    let (raw, cursor) = cursor.take(mem::size_of::<$num_ty>())?;

                    let mut value = [0; mem::size_of::<$num_ty>()];
                    value.copy_from_slice(raw);

                    Ok(($num_ty::from_be_bytes(value), cursor))
                }
            }
        )*
    }
}

serialize_num! {
    u8, u16, u32, i32
}

/// The longest label that fits behind a length byte.
pub const MAX_LABEL_LEN: usize = 63;

/// The longest name, in wire bytes, that we are willing to build or decode.
pub const MAX_NAME_LEN: usize = 255;

/// How many compression pointers a single name may follow.
pub const MAX_POINTER_HOPS: usize = 64;

const PTR_MASK: u8 = 0b1100_0000;

/// A domain name, stored as its sequence of labels.
///
/// Every label is between 1 and 63 ASCII bytes long. The root name has no labels
/// and is written as the single terminating zero byte.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomainName {
    labels: Vec<String>,
}

impl DomainName {
    /// Parse a dotted name such as `"www.example.com"`.
    ///
    /// Empty segments are skipped, so a trailing dot is accepted.
    ///
    /// # Errors
    ///
    /// - [`Error::LabelTooLong`] if a label is longer than 63 bytes.
    /// - [`Error::NonAsciiLabel`] if a label contains a non-ASCII byte.
    /// - [`Error::NameTooLong`] if the encoded name would exceed 255 bytes.
    pub fn new(name: &str) -> Result<Self, Error> {
        let labels = split_labels(name)
            .map(|label| check_label(label.as_bytes()).map(|()| String::from(label)))
            .collect::<Result<Vec<_>, _>>()?;

        let name = Self { labels };
        let len = name.wire_len();
        if len > MAX_NAME_LEN {
            return Err(Error::NameTooLong(len));
        }

        Ok(name)
    }

    /// The root name.
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether this is the root name.
    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Get an iterator over the labels of this name.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(String::as_str)
    }

    /// Decode a name starting at `position` inside of `message`.
    ///
    /// `message` has to be the entire message, since compression pointers are
    /// offsets from its start. Returns the name and the position right after it;
    /// for a compressed name that is right after the pointer.
    ///
    /// # Errors
    ///
    /// - [`Error::NotEnoughReadBytes`] if the name runs past the end of `message`.
    /// - [`Error::BadPointer`] if a pointer does not point backwards.
    /// - [`Error::TooManyPointers`] if the name follows too many pointers.
    /// - [`Error::InvalidLabelLength`] if a length byte uses the reserved label kinds.
    /// - [`Error::NonAsciiLabel`] if a label contains a non-ASCII byte.
    /// - [`Error::DotInLabel`] if a label contains a `.`.
    pub fn read_at(message: &[u8], position: usize) -> Result<(Self, usize), Error> {
        let (name, cursor) = Self::deserialize(Cursor::new(message).at(position))?;
        Ok((name, cursor.position()))
    }

    fn wire_len(&self) -> usize {
        self.labels
            .iter()
            .map(|label| 1 + label.len())
            .fold(1, |a, b| a.saturating_add(b))
    }
}

impl core::str::FromStr for DomainName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'a> TryFrom<&'a str> for DomainName {
    type Error = Error;

    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl fmt::Debug for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct NameFmt<'a>(&'a DomainName);

        impl fmt::Debug for NameFmt<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self.0, f)
            }
        }

        f.debug_tuple("DomainName").field(&NameFmt(self)).finish()
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.labels().enumerate().try_for_each(|(i, label)| {
            if i > 0 {
                f.write_str(".")?;
            }

            f.write_str(label)
        })
    }
}

impl Serialize for DomainName {
    fn serialized_len(&self) -> usize {
        self.wire_len()
    }

    fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
        ensure_space(bytes, self.wire_len(), "DomainName")?;

        let mut offset = 0;
        for label in &self.labels {
            let len = label.len();
            check_label(label.as_bytes())?;

            bytes[offset] = len as u8;
            bytes[offset + 1..=offset + len].copy_from_slice(label.as_bytes());
            offset += len + 1;
        }

        // The zero-length root label ends the name.
        bytes[offset] = 0;
        Ok(offset + 1)
    }

    fn deserialize(cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), Error> {
        let mut name = Self::default();
        let cursor = read_labels(cursor, &mut name, 0)?;
        Ok((name, cursor))
    }
}

/// Read labels into `name` until the terminator or a pointer is reached.
///
/// Every pointer has to point below the start of the run of labels it ends, so a
/// chain of pointers strictly moves backwards through the message and can never
/// loop.
fn read_labels<'a>(
    mut cursor: Cursor<'a>,
    name: &mut DomainName,
    hops: usize,
) -> Result<Cursor<'a>, Error> {
    let start = cursor.position();

    loop {
        let b1 = cursor.peek()?;

        if b1 == 0 {
            return cursor.advance(1);
        } else if b1 & PTR_MASK == PTR_MASK {
            let (ptr, next) = u16::deserialize(cursor)?;
            let target = usize::from(ptr & !(u16::from(PTR_MASK) << 8));

            if target >= start {
                return Err(Error::BadPointer {
                    position: cursor.position(),
                    target,
                });
            }

            if hops >= MAX_POINTER_HOPS {
                return Err(Error::TooManyPointers(hops + 1));
            }

            read_labels(cursor.at(target), name, hops + 1)?;

            // Resume right after the pointer, not wherever the target name ended.
            return Ok(next);
        } else if b1 & PTR_MASK != 0 {
            return Err(Error::InvalidLabelLength(b1));
        }

        let (label, next) = cursor.advance(1)?.take(usize::from(b1))?;
        check_label(label)?;

        name.labels.push(label.iter().copied().map(char::from).collect());
        let len = name.wire_len();
        if len > MAX_NAME_LEN {
            return Err(Error::NameTooLong(len));
        }

        cursor = next;
    }
}

/// Check that a label may be written behind a single length byte.
fn check_label(label: &[u8]) -> Result<(), Error> {
    if label.len() > MAX_LABEL_LEN {
        return Err(Error::LabelTooLong(label.len()));
    }

    if !label.is_ascii() {
        return Err(Error::NonAsciiLabel);
    }

    if label.contains(&b'.') {
        return Err(Error::DotInLabel);
    }

    Ok(())
}

/// Split a dotted name into its non-empty labels.
fn split_labels(name: &str) -> impl Iterator<Item = &str> + '_ {
    let mut last_index = 0;

    Memchr::new(b'.', name.as_bytes())
        .chain(iter::once(name.len()))
        .map(move |index| {
            let item = &name[last_index..index];
            last_index = index + 1;
            item
        })
        .filter(|item| !item.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::ToString;
    use alloc::vec;

    fn name(s: &str) -> DomainName {
        DomainName::new(s).unwrap()
    }

    #[test]
    fn cursor_peek_does_not_consume() {
        let cursor = Cursor::new(&[7, 8]);
        assert_eq!(cursor.peek().unwrap(), 7);
        assert_eq!(cursor.peek().unwrap(), 7);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn cursor_overrun_is_an_error() {
        let cursor = Cursor::new(&[1, 2, 3]).at(2);
        let err = cursor.take(2).unwrap_err();
        assert_eq!(
            err,
            Error::NotEnoughReadBytes {
                position: 2,
                tried_to_read: 2,
                available: 1,
            }
        );

        // Past the end is empty, not wrapped around.
        let past = Cursor::new(&[1, 2, 3]).at(5);
        assert_eq!(past.len(), 0);
        assert!(past.peek().is_err());
    }

    #[test]
    fn integers_are_big_endian() {
        let mut buf = [0; 4];
        assert_eq!(0x1234u16.serialize(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[0x12, 0x34]);

        assert_eq!((-2i32).serialize(&mut buf).unwrap(), 4);
        assert_eq!(buf, [0xFF, 0xFF, 0xFF, 0xFE]);

        let (value, cursor) = i32::deserialize(Cursor::new(&buf)).unwrap();
        assert_eq!(value, -2);
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn integer_into_short_buffer() {
        let mut buf = [0; 1];
        assert!(matches!(
            7u32.serialize(&mut buf),
            Err(Error::NotEnoughWriteSpace { tried_to_write: 4, available: 1, .. })
        ));
    }

    #[test]
    fn split_skips_empty_segments() {
        let labels: Vec<_> = split_labels("www.example.com.").collect();
        assert_eq!(labels, ["www", "example", "com"]);

        let labels: Vec<_> = split_labels("..a..b").collect();
        assert_eq!(labels, ["a", "b"]);

        assert_eq!(split_labels("").count(), 0);
        assert_eq!(split_labels(".").count(), 0);
    }

    #[test]
    fn name_wire_form() {
        let name = name("www.google.com");
        let mut buf = vec![0; name.serialized_len()];
        assert_eq!(name.serialize(&mut buf).unwrap(), 16);
        assert_eq!(
            buf,
            b"\x03www\x06google\x03com\x00"
        );
    }

    #[test]
    fn root_name_is_one_byte() {
        let root = DomainName::root();
        assert!(root.is_root());
        assert_eq!(root.serialized_len(), 1);
        assert_eq!(format!("{}", root), "");

        let mut buf = [0xFF; 1];
        root.serialize(&mut buf).unwrap();
        assert_eq!(buf, [0]);

        let (decoded, next) = DomainName::read_at(&buf, 0).unwrap();
        assert_eq!(decoded, root);
        assert_eq!(next, 1);
    }

    #[test]
    fn label_length_limit() {
        let max = "a".repeat(MAX_LABEL_LEN);
        let name = DomainName::new(&max).unwrap();

        let mut buf = vec![0; name.serialized_len()];
        name.serialize(&mut buf).unwrap();
        assert_eq!(buf[0], 63);

        let (decoded, next) = DomainName::read_at(&buf, 0).unwrap();
        assert_eq!(decoded, name);
        assert_eq!(next, 65);

        let too_long = "b".repeat(MAX_LABEL_LEN + 1);
        assert_eq!(
            DomainName::new(&too_long).unwrap_err(),
            Error::LabelTooLong(64)
        );
    }

    #[test]
    fn name_length_limit() {
        // 4 labels of 63 bytes encode to 4 * 64 + 1 = 257 bytes.
        let label = "c".repeat(MAX_LABEL_LEN);
        let long = [label.as_str(); 4].join(".");
        assert_eq!(DomainName::new(&long).unwrap_err(), Error::NameTooLong(257));
    }

    #[test]
    fn non_ascii_is_rejected() {
        assert_eq!(
            DomainName::new("bücher.example").unwrap_err(),
            Error::NonAsciiLabel
        );
        assert_eq!(
            DomainName::read_at(b"\x02\xC3\xBC\x00", 0).unwrap_err(),
            Error::NonAsciiLabel
        );
    }

    #[test]
    fn dot_inside_label_is_rejected() {
        assert_eq!(
            DomainName::read_at(b"\x03a.b\x01c\x00", 0).unwrap_err(),
            Error::DotInLabel
        );

        // Every decoded name prints as text that parses back to itself.
        let (decoded, _) = DomainName::read_at(b"\x01a\x01b\x01c\x00", 0).unwrap();
        assert_eq!(DomainName::new(&decoded.to_string()).unwrap(), decoded);
    }

    #[test]
    fn follows_pointer_and_resumes_after_it() {
        let buf = [0x03, 0x55, 0x55, 0x55, 0x00, 0x02, 0x56, 0x56, 0xC0, 0x00];
        let (decoded, next) = DomainName::read_at(&buf, 5).unwrap();
        assert_eq!(format!("{}", decoded), "VV.UUU");
        assert_eq!(next, 10);
    }

    #[test]
    fn pointer_chain() {
        // "com" at 0, "example" + ptr(0) at 5, "www" + ptr(5) at 15.
        let buf = b"\x03com\x00\x07example\xC0\x00\x03www\xC0\x05";
        let (decoded, next) = DomainName::read_at(buf, 15).unwrap();
        assert_eq!(decoded, name("www.example.com"));
        assert_eq!(next, buf.len());
    }

    #[test]
    fn self_pointer_is_rejected() {
        let buf = [0xC0, 0x00];
        assert_eq!(
            DomainName::read_at(&buf, 0).unwrap_err(),
            Error::BadPointer {
                position: 0,
                target: 0,
            }
        );
    }

    #[test]
    fn pointer_loop_is_rejected() {
        // The label at 0 points back at itself through its own start.
        let buf = [0x01, b'a', 0xC0, 0x00];
        assert!(matches!(
            DomainName::read_at(&buf, 0),
            Err(Error::BadPointer { position: 2, target: 0 })
        ));

        // Two names pointing at each other.
        let buf = [0x01, b'a', 0xC0, 0x04, 0x01, b'b', 0xC0, 0x00];
        assert!(matches!(
            DomainName::read_at(&buf, 4),
            Err(Error::BadPointer { position: 2, target: 4 })
        ));
    }

    #[test]
    fn forward_pointer_is_rejected() {
        let buf = [0xC0, 0x02, 0x00];
        assert!(matches!(
            DomainName::read_at(&buf, 0),
            Err(Error::BadPointer { target: 2, .. })
        ));
    }

    #[test]
    fn long_pointer_chain_is_bounded() {
        // A root name at 0, then a run of pointers each pointing at the previous one.
        let mut buf = vec![0u8];
        for i in 0..=MAX_POINTER_HOPS {
            let target = if i == 0 { 0 } else { 1 + (i - 1) * 2 };
            buf.push(0xC0);
            buf.push(target as u8);
        }

        let last = buf.len() - 2;
        assert_eq!(
            DomainName::read_at(&buf, last).unwrap_err(),
            Error::TooManyPointers(MAX_POINTER_HOPS + 1)
        );
    }

    #[test]
    fn truncated_name() {
        assert!(matches!(
            DomainName::read_at(b"\x05abc", 0),
            Err(Error::NotEnoughReadBytes { position: 1, tried_to_read: 5, .. })
        ));
        assert!(matches!(
            DomainName::read_at(b"\x03abc", 0),
            Err(Error::NotEnoughReadBytes { position: 4, .. })
        ));
        assert!(matches!(
            DomainName::read_at(b"\xC0", 0),
            Err(Error::NotEnoughReadBytes { .. })
        ));
    }

    #[test]
    fn reserved_label_kinds() {
        assert_eq!(
            DomainName::read_at(b"\x41abc", 0).unwrap_err(),
            Error::InvalidLabelLength(0x41)
        );
    }
}
