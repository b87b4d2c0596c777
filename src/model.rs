//! The semantic model of a set of protocol documents.
//!
//! Everything in here is immutable once built, apart from [`Protocol::globals`],
//! which the resolver fills in while bindings are emitted.

use {
    crate::naming::to_camel,
    indexmap::{IndexMap, IndexSet},
    std::cell::RefCell,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ProtocolId(pub usize);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct InterfaceId {
    pub protocol: ProtocolId,
    pub index: usize,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MessageKind {
    Request,
    Event,
}

/// Points from an [`Arg`] back to the message that owns it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MessageId {
    pub interface: InterfaceId,
    pub kind: MessageKind,
    pub index: usize,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Description {
    pub summary: Option<String>,
    pub body: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum WireType {
    Int,
    Uint,
    Fixed,
    String,
    Object,
    NewId,
    Array,
    Fd,
}

impl WireType {
    pub fn from_name(s: &str) -> Option<Self> {
        let ty = match s {
            "int" => Self::Int,
            "uint" => Self::Uint,
            "fixed" => Self::Fixed,
            "string" => Self::String,
            "object" => Self::Object,
            "new_id" => Self::NewId,
            "array" => Self::Array,
            "fd" => Self::Fd,
            _ => return None,
        };
        Some(ty)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Fixed => "fixed",
            Self::String => "string",
            Self::Object => "object",
            Self::NewId => "new_id",
            Self::Array => "array",
            Self::Fd => "fd",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RequestKind {
    #[default]
    Normal,
    Destructor,
    Constructor,
}

#[derive(Debug)]
pub struct EnumEntry {
    pub name: String,
    pub value: i64,
    #[allow(dead_code)]
    pub since: u32,
    #[allow(dead_code)]
    pub deprecated_since: Option<u32>,
    pub summary: Option<String>,
    pub description: Option<Description>,
}

impl EnumEntry {
    /// The bit index if exactly one bit is set in the value.
    pub fn single_bit(&self) -> Option<u32> {
        let v = self.value;
        (v > 0 && v & (v - 1) == 0).then(|| v.trailing_zeros())
    }
}

#[derive(Debug)]
pub struct Enum {
    pub name: String,
    #[allow(dead_code)]
    pub since: u32,
    pub bitfield: bool,
    pub description: Option<Description>,
    pub entries: IndexMap<String, EnumEntry>,
}

impl Enum {
    pub fn type_name(&self) -> String {
        to_camel(&self.name)
    }

    /// The entries that occupy a storage bit of a bitfield, ordered by bit.
    ///
    /// Of several entries naming the same bit, only the first occupies it.
    pub fn flags(&self) -> Vec<(u32, &EnumEntry)> {
        let mut flags: Vec<(u32, &EnumEntry)> = vec![];
        for entry in self.entries.values() {
            if let Some(bit) = entry.single_bit()
                && !flags.iter().any(|f| f.0 == bit)
            {
                flags.push((bit, entry));
            }
        }
        flags.sort_by_key(|f| f.0);
        flags
    }
}

#[derive(Debug)]
pub struct Arg {
    pub parent: MessageId,
    pub name: String,
    pub ty: WireType,
    pub interface: Option<String>,
    pub enum_: Option<String>,
    pub allow_null: bool,
    /// Taken from the nested description if there is one.
    pub summary: Option<String>,
}

#[derive(Debug)]
pub struct Request {
    #[allow(dead_code)]
    pub opcode: u16,
    pub name: String,
    pub kind: RequestKind,
    #[allow(dead_code)]
    pub since: u32,
    #[allow(dead_code)]
    pub deprecated_since: Option<u32>,
    pub description: Option<Description>,
    pub args: Vec<Arg>,
}

impl Request {
    /// The interface named by the first `new_id` argument that names one.
    pub fn created_interface(&self) -> Option<&str> {
        self.args
            .iter()
            .filter(|a| a.ty == WireType::NewId)
            .find_map(|a| a.interface.as_deref())
    }
}

#[derive(Debug)]
pub struct Event {
    /// 1-based position among the events of the interface.
    pub number: u16,
    pub name: String,
    #[allow(dead_code)]
    pub since: u32,
    #[allow(dead_code)]
    pub deprecated_since: Option<u32>,
    pub description: Option<Description>,
    pub args: Vec<Arg>,
}

impl Event {
    pub fn opcode(&self) -> u16 {
        self.number - 1
    }
}

#[derive(Debug)]
pub struct Interface {
    pub id: InterfaceId,
    pub prefix: String,
    /// The declared name without the prefix.
    pub name: String,
    pub version: u32,
    pub description: Option<Description>,
    pub requests: IndexMap<String, Request>,
    pub events: IndexMap<String, Event>,
    pub enums: IndexMap<String, Enum>,
}

impl Interface {
    pub fn full_name(&self) -> String {
        format!("{}_{}", self.prefix, self.name)
    }

    pub fn handle_name(&self) -> String {
        to_camel(&self.name)
    }
}

#[derive(Debug)]
pub struct Protocol {
    pub id: ProtocolId,
    pub name: String,
    pub prefix: String,
    pub copyright: Option<String>,
    pub description: Option<Description>,
    /// Keyed by the declared name including the prefix.
    pub interfaces: IndexMap<String, Interface>,
    /// Prefixes of other namespaces referenced from this protocol.
    pub globals: RefCell<IndexSet<String>>,
}
