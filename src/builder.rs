//! Turns the element tree of one protocol document into a [`Protocol`].


use {
    crate::model::{
        Arg, Description, Enum, EnumEntry, Event, Interface, InterfaceId, MessageId,
        MessageKind, Protocol, ProtocolId, Request, RequestKind, WireType,
    },
    indexmap::IndexMap,
    protocol_tree::Element,
    std::{
        cell::RefCell,
        num::ParseIntError,
        str::ParseBoolError,
    },
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Expected a protocol element but found {0}")]
    UnexpectedRoot(String),
    #[error("Could not build protocol {0}")]
    Protocol(String, #[source] ProtocolError),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Protocol does not have a name")]
    MissingName,
    #[error("Unexpected element {0}")]
    UnexpectedElement(String),
    #[error("Could not build interface {0}")]
    Interface(String, #[source] InterfaceError),
    #[error("Duplicate interface {0}")]
    DuplicateInterface(String),
    #[error("Protocol does not contain any interfaces")]
    NoInterfaces,
    #[error("Interface {interface} has prefix {prefix} but the protocol uses prefix {expected}")]
    PrefixMismatch {
        interface: String,
        prefix: String,
        expected: String,
    },
}

#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("Interface has no name")]
    MissingName,
    #[error("Interface name {0} is not of the form prefix_name")]
    InvalidName(String),
    #[error("Interface has no version")]
    MissingVersion,
    #[error("Could not parse the version")]
    Version(#[source] ParseIntError),
    #[error("Version {0} is not positive")]
    NonPositiveVersion(i64),
    #[error("Version {0} does not fit into 32 bits")]
    VersionRange(i64),
    #[error("Unexpected element {0}")]
    UnexpectedElement(String),
    #[error("Too many messages")]
    TooManyMessages,
    #[error("Could not build request {0}")]
    Request(String, #[source] MessageError),
    #[error("Could not build event {0}")]
    Event(String, #[source] MessageError),
    #[error("Could not build enum {0}")]
    Enum(String, #[source] EnumError),
    #[error("Duplicate request {0}")]
    DuplicateRequest(String),
    #[error("Duplicate event {0}")]
    DuplicateEvent(String),
    #[error("Duplicate enum {0}")]
    DuplicateEnum(String),
}

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Message has no name")]
    MissingName,
    #[error("Could not parse the since attribute")]
    Since(#[source] ParseIntError),
    #[error("Could not parse the deprecated-since attribute")]
    DeprecatedSince(#[source] ParseIntError),
    #[error("Unknown request type {0}")]
    UnknownRequestKind(String),
    #[error("Unexpected element {0}")]
    UnexpectedElement(String),
    #[error("Could not build argument {0}")]
    Arg(String, #[source] ArgError),
}

#[derive(Debug, Error)]
pub enum ArgError {
    #[error("Argument has no name")]
    MissingName,
    #[error("Argument has no type")]
    MissingType,
    #[error("Unknown arg type {0}")]
    UnknownArgType(String),
    #[error("Could not parse the allow-null attribute")]
    AllowNull(#[source] ParseBoolError),
    #[error("new_id arguments cannot be nullable")]
    NullableNewId,
    #[error("The description has no summary")]
    MissingDescriptionSummary,
}

#[derive(Debug, Error)]
pub enum EnumError {
    #[error("Enum has no name")]
    MissingName,
    #[error("Could not parse the since attribute")]
    Since(#[source] ParseIntError),
    #[error("Could not parse the bitfield attribute")]
    Bitfield(#[source] ParseBoolError),
    #[error("Unexpected element {0}")]
    UnexpectedElement(String),
    #[error("Could not build entry {0}")]
    Entry(String, #[source] EntryError),
    #[error("Duplicate entry {0}")]
    DuplicateEntry(String),
    #[error("Entry {entry} sets bit {bit} which does not fit into 32 bits")]
    BitOutOfRange { entry: String, bit: u32 },
    #[error("The entry values do not fit into a single 32-bit integer type")]
    ValueRange,
}

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Entry has no name")]
    MissingName,
    #[error("Entry has no value")]
    MissingValue,
    #[error("Value {0} is not an integer literal")]
    InvalidValue(String),
    #[error("Could not parse the since attribute")]
    Since(#[source] ParseIntError),
    #[error("Could not parse the deprecated-since attribute")]
    DeprecatedSince(#[source] ParseIntError),
}

fn display_name(e: &Element) -> String {
    e.attr("name").unwrap_or("<unnamed>").to_owned()
}

fn parse_since(e: &Element) -> Result<u32, ParseIntError> {
    match e.attr("since") {
        Some(s) => s.parse(),
        None => Ok(1),
    }
}

fn parse_deprecated_since(e: &Element) -> Result<Option<u32>, ParseIntError> {
    e.attr("deprecated-since").map(|s| s.parse()).transpose()
}

fn parse_bool(e: &Element, name: &str) -> Result<bool, ParseBoolError> {
    match e.attr(name) {
        Some(s) => s.parse(),
        None => Ok(false),
    }
}

/// Parses an integer literal in decimal, hexadecimal (`0x`), octal (`0o`) or binary
/// (`0b`) notation with an optional sign.
pub fn parse_int_literal(s: &str) -> Option<i64> {
    let s = s.trim();
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (radix, digits) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ => (10, digits),
    };
    if digits.starts_with(['+', '-']) {
        return None;
    }
    let value = i64::try_from(u64::from_str_radix(digits, radix).ok()?).ok()?;
    Some(if neg { -value } else { value })
}

fn parse_description(e: &Element) -> Description {
    Description {
        summary: e.attr("summary").map(|s| s.to_owned()),
        body: e.text.clone(),
    }
}

pub fn build_protocol(root: &Element, id: ProtocolId) -> Result<Protocol, BuildError> {
    if root.name != "protocol" {
        return Err(BuildError::UnexpectedRoot(root.name.clone()));
    }
    parse_protocol(root, id).map_err(|e| BuildError::Protocol(display_name(root), e))
}

fn parse_protocol(root: &Element, id: ProtocolId) -> Result<Protocol, ProtocolError> {
    let name = root.attr("name").ok_or(ProtocolError::MissingName)?;
    let mut copyright = None;
    let mut description = None;
    let mut interfaces = IndexMap::new();
    for c in &root.children {
        match c.name.as_str() {
            "copyright" => copyright = Some(c.text.clone()),
            "description" => description = Some(parse_description(c)),
            "interface" => {
                let iid = InterfaceId {
                    protocol: id,
                    index: interfaces.len(),
                };
                let interface = parse_interface(c, iid)
                    .map_err(|e| ProtocolError::Interface(display_name(c), e))?;
                let full_name = interface.full_name();
                if interfaces.contains_key(&full_name) {
                    return Err(ProtocolError::DuplicateInterface(full_name));
                }
                interfaces.insert(full_name, interface);
            }
            n => return Err(ProtocolError::UnexpectedElement(n.to_owned())),
        }
    }
    let prefix = match interfaces.values().next() {
        Some(i) => i.prefix.clone(),
        None => return Err(ProtocolError::NoInterfaces),
    };
    if let Some(i) = interfaces.values().find(|i| i.prefix != prefix) {
        return Err(ProtocolError::PrefixMismatch {
            interface: i.full_name(),
            prefix: i.prefix.clone(),
            expected: prefix,
        });
    }
    Ok(Protocol {
        id,
        name: name.to_owned(),
        prefix,
        copyright,
        description,
        interfaces,
        globals: RefCell::default(),
    })
}

fn parse_interface(e: &Element, id: InterfaceId) -> Result<Interface, InterfaceError> {
    let full_name = e.attr("name").ok_or(InterfaceError::MissingName)?;
    let (prefix, name) = match full_name.split_once('_') {
        Some((p, n)) if !p.is_empty() && !n.is_empty() => (p, n),
        _ => return Err(InterfaceError::InvalidName(full_name.to_owned())),
    };
    let version: i64 = e
        .attr("version")
        .ok_or(InterfaceError::MissingVersion)?
        .parse()
        .map_err(InterfaceError::Version)?;
    if version <= 0 {
        return Err(InterfaceError::NonPositiveVersion(version));
    }
    let version = u32::try_from(version).map_err(|_| InterfaceError::VersionRange(version))?;
    let mut description = None;
    let mut requests = IndexMap::new();
    let mut events = IndexMap::new();
    let mut enums = IndexMap::new();
    for c in &e.children {
        match c.name.as_str() {
            "description" => description = Some(parse_description(c)),
            "request" => {
                let opcode =
                    u16::try_from(requests.len()).map_err(|_| InterfaceError::TooManyMessages)?;
                let mid = MessageId {
                    interface: id,
                    kind: MessageKind::Request,
                    index: requests.len(),
                };
                let request = parse_request(c, opcode, mid)
                    .map_err(|e| InterfaceError::Request(display_name(c), e))?;
                if requests.contains_key(&request.name) {
                    return Err(InterfaceError::DuplicateRequest(request.name));
                }
                requests.insert(request.name.clone(), request);
            }
            "event" => {
                let number = u16::try_from(events.len() + 1)
                    .map_err(|_| InterfaceError::TooManyMessages)?;
                let mid = MessageId {
                    interface: id,
                    kind: MessageKind::Event,
                    index: events.len(),
                };
                let event = parse_event(c, number, mid)
                    .map_err(|e| InterfaceError::Event(display_name(c), e))?;
                if events.contains_key(&event.name) {
                    return Err(InterfaceError::DuplicateEvent(event.name));
                }
                events.insert(event.name.clone(), event);
            }
            "enum" => {
                let en = parse_enum(c).map_err(|e| InterfaceError::Enum(display_name(c), e))?;
                if enums.contains_key(&en.name) {
                    return Err(InterfaceError::DuplicateEnum(en.name));
                }
                enums.insert(en.name.clone(), en);
            }
            n => return Err(InterfaceError::UnexpectedElement(n.to_owned())),
        }
    }
    Ok(Interface {
        id,
        prefix: prefix.to_owned(),
        name: name.to_owned(),
        version,
        description,
        requests,
        events,
        enums,
    })
}

fn parse_message_body(
    e: &Element,
    id: MessageId,
) -> Result<(Option<Description>, Vec<Arg>), MessageError> {
    let mut description = None;
    let mut args = vec![];
    for c in &e.children {
        match c.name.as_str() {
            "description" => description = Some(parse_description(c)),
            "arg" => args.push(parse_arg(c, id).map_err(|e| MessageError::Arg(display_name(c), e))?),
            n => return Err(MessageError::UnexpectedElement(n.to_owned())),
        }
    }
    Ok((description, args))
}

fn parse_request(e: &Element, opcode: u16, id: MessageId) -> Result<Request, MessageError> {
    let name = e.attr("name").ok_or(MessageError::MissingName)?;
    let mut kind = match e.attr("type") {
        None => RequestKind::Normal,
        Some("destructor") => RequestKind::Destructor,
        Some("constructor") => RequestKind::Constructor,
        Some(t) => return Err(MessageError::UnknownRequestKind(t.to_owned())),
    };
    let since = parse_since(e).map_err(MessageError::Since)?;
    let deprecated_since = parse_deprecated_since(e).map_err(MessageError::DeprecatedSince)?;
    let (description, args) = parse_message_body(e, id)?;
    if args.iter().any(|a| a.ty == WireType::NewId) {
        kind = RequestKind::Constructor;
    }
    Ok(Request {
        opcode,
        name: name.to_owned(),
        kind,
        since,
        deprecated_since,
        description,
        args,
    })
}

fn parse_event(e: &Element, number: u16, id: MessageId) -> Result<Event, MessageError> {
    let name = e.attr("name").ok_or(MessageError::MissingName)?;
    let since = parse_since(e).map_err(MessageError::Since)?;
    let deprecated_since = parse_deprecated_since(e).map_err(MessageError::DeprecatedSince)?;
    let (description, args) = parse_message_body(e, id)?;
    Ok(Event {
        number,
        name: name.to_owned(),
        since,
        deprecated_since,
        description,
        args,
    })
}

fn parse_arg(e: &Element, parent: MessageId) -> Result<Arg, ArgError> {
    let name = e.attr("name").ok_or(ArgError::MissingName)?;
    let ty = e.attr("type").ok_or(ArgError::MissingType)?;
    let ty = WireType::from_name(ty).ok_or_else(|| ArgError::UnknownArgType(ty.to_owned()))?;
    let allow_null = parse_bool(e, "allow-null").map_err(ArgError::AllowNull)?;
    if allow_null && ty == WireType::NewId {
        return Err(ArgError::NullableNewId);
    }
    let mut summary = e.attr("summary").map(|s| s.to_owned());
    for c in e.children_named("description") {
        let d = parse_description(c);
        summary = Some(d.summary.ok_or(ArgError::MissingDescriptionSummary)?);
    }
    Ok(Arg {
        parent,
        name: name.to_owned(),
        ty,
        interface: e.attr("interface").map(|s| s.to_owned()),
        enum_: e.attr("enum").map(|s| s.to_owned()),
        allow_null,
        summary,
    })
}

fn parse_enum(e: &Element) -> Result<Enum, EnumError> {
    let name = e.attr("name").ok_or(EnumError::MissingName)?;
    let since = parse_since(e).map_err(EnumError::Since)?;
    let bitfield = parse_bool(e, "bitfield").map_err(EnumError::Bitfield)?;
    let mut description = None;
    let mut entries = IndexMap::new();
    for c in &e.children {
        match c.name.as_str() {
            "description" => description = Some(parse_description(c)),
            "entry" => {
                let entry = parse_entry(c).map_err(|e| EnumError::Entry(display_name(c), e))?;
                if entries.contains_key(&entry.name) {
                    return Err(EnumError::DuplicateEntry(entry.name));
                }
                entries.insert(entry.name.clone(), entry);
            }
            n => return Err(EnumError::UnexpectedElement(n.to_owned())),
        }
    }
    let en = Enum {
        name: name.to_owned(),
        since,
        bitfield,
        description,
        entries,
    };
    if en.bitfield {
        if let Some((bit, entry)) = en.flags().into_iter().find(|f| f.0 >= 32) {
            return Err(EnumError::BitOutOfRange {
                entry: entry.name.clone(),
                bit,
            });
        }
    } else {
        let signed = en
            .entries
            .values()
            .all(|e| i32::try_from(e.value).is_ok());
        let unsigned = en
            .entries
            .values()
            .all(|e| u32::try_from(e.value).is_ok());
        if !signed && !unsigned {
            return Err(EnumError::ValueRange);
        }
    }
    Ok(en)
}

fn parse_entry(e: &Element) -> Result<EnumEntry, EntryError> {
    let name = e.attr("name").ok_or(EntryError::MissingName)?;
    let value = e.attr("value").ok_or(EntryError::MissingValue)?;
    let value = parse_int_literal(value).ok_or_else(|| EntryError::InvalidValue(value.to_owned()))?;
    let since = parse_since(e).map_err(EntryError::Since)?;
    let deprecated_since = parse_deprecated_since(e).map_err(EntryError::DeprecatedSince)?;
    let mut summary = e.attr("summary").map(|s| s.to_owned());
    let mut description = None;
    for c in e.children_named("description") {
        let d = parse_description(c);
        if d.summary.is_some() {
            summary = d.summary.clone();
        }
        description = Some(d);
    }
    Ok(EnumEntry {
        name: name.to_owned(),
        value,
        since,
        deprecated_since,
        summary,
        description,
    })
}
