//! Human-readable descriptions of messages and their parts.
//!
//! A [`Description`] is an ordered list of labelled values, where a value may itself
//! be a nested description. A front end can render it as a tree without knowing
//! anything about the wire format.

use super::{
    DomainName, Flags, Header, Ipv4Address, Message, Opcode, Question, RecordClass,
    RecordType, ResourceData, ResourceRecord,
};

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use core::slice;

/// A single value in a [`Description`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A yes/no value.
    Bool(bool),

    /// A number.
    Integer(i64),

    /// A piece of text.
    Text(String),

    /// A nested description.
    Map(Description),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! integer_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(value.into())
                }
            }
        )*
    };
}

integer_value!(u8, u16, i32, u32, i64);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Description> for Value {
    fn from(value: Description) -> Self {
        Value::Map(value)
    }
}

/// An ordered list of `(label, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    entries: Vec<(String, Value)>,
}

impl Description {
    /// Create an empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style.
    pub fn with(mut self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(label, value);
        self
    }

    /// Add an entry.
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((label.into(), value.into()));
    }

    /// Get the value of the first entry with the given label.
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, value)| value)
    }

    /// Iterate over the entries in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Description {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`Description`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: slice::Iter<'a, (String, Value)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(label, value)| (label.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Something that can describe itself as a [`Description`].
pub trait Describe {
    /// Describe this value.
    fn describe(&self) -> Description;
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe(&self) -> Description {
        (**self).describe()
    }
}

impl Describe for DomainName {
    fn describe(&self) -> Description {
        Description::new().with("URL", self.to_string())
    }
}

impl Describe for Ipv4Address {
    fn describe(&self) -> Description {
        Description::new().with("IP", self.to_string())
    }
}

impl Describe for ResourceData {
    fn describe(&self) -> Description {
        match self {
            ResourceData::Name(name) => name.describe(),
            ResourceData::Ipv4(ip) => ip.describe(),
        }
    }
}

impl Describe for Opcode {
    fn describe(&self) -> Description {
        Description::new().with(self.name(), u8::from(*self))
    }
}

impl Describe for RecordType {
    fn describe(&self) -> Description {
        Description::new().with(self.name(), u16::from(*self))
    }
}

impl Describe for RecordClass {
    fn describe(&self) -> Description {
        Description::new().with(self.name(), u16::from(*self))
    }
}

impl Describe for Flags {
    fn describe(&self) -> Description {
        Description::new()
            .with("Is Request", self.is_request())
            .with("Opcode", self.opcode().describe())
            .with("Authoritative", self.authoritative())
            .with("Truncated", self.truncated())
            .with("Recursion Desired", self.recursion_desired())
            .with("Recursion Available", self.recursion_available())
            .with("Return Code", self.response_code())
    }
}

impl Describe for Header {
    fn describe(&self) -> Description {
        Description::new()
            .with("Identifier", self.id())
            .with("Flags", self.flags().describe())
            .with("Number of Questions", self.question_count())
            .with("Number of Answers", self.answer_count())
            .with("Number of Authority Answers", self.authority_count())
            .with("Number of Additional Answers", self.additional_count())
    }
}

impl Describe for Question {
    fn describe(&self) -> Description {
        Description::new()
            .with("Name", self.name().describe())
            .with("Type", self.ty().describe())
            .with("Class", self.class().describe())
    }
}

impl Describe for ResourceRecord {
    fn describe(&self) -> Description {
        Description::new()
            .with("Answer Name", self.name().describe())
            .with("Answer Type", self.ty().describe())
            .with("Answer Class", self.class().describe())
            .with("Time-To-Live", self.ttl())
            .with("Data Length", self.data_len())
            .with("Answer Data", self.data().describe())
    }
}

impl Describe for Message {
    fn describe(&self) -> Description {
        fn section<T: Describe>(items: &[T]) -> Description {
            items
                .iter()
                .enumerate()
                .fold(Description::new(), |desc, (i, item)| {
                    desc.with(i.to_string(), item.describe())
                })
        }

        // The header derived from the sections; counts past `u16::MAX` saturate.
        let header = Header {
            id: self.id(),
            flags: self.flags(),
            question_count: saturate(self.questions().len()),
            answer_count: saturate(self.answers().len()),
            authority_count: saturate(self.authorities().len()),
            additional_count: saturate(self.additional().len()),
        };

        Description::new()
            .with("Header", header.describe())
            .with("Questions", section(self.questions()))
            .with("Answers", section(self.answers()))
            .with("Authoritative Answers", section(self.authorities()))
            .with("Additional Answers", section(self.additional()))
    }
}

fn saturate(len: usize) -> u16 {
    if len > usize::from(u16::MAX) {
        u16::MAX
    } else {
        len as u16
    }
}
