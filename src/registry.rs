//! The arena holding every parsed protocol plus the namespace table grouping them
//! by prefix.

use {
    crate::{
        builder::{BuildError, build_protocol},
        model::{Interface, InterfaceId, MessageId, MessageKind, Protocol, ProtocolId},
    },
    indexmap::{IndexMap, IndexSet},
    protocol_tree::Element,
    std::cell::RefCell,
};

/// All protocols sharing one prefix.
#[derive(Clone, Debug)]
pub struct Namespace {
    pub prefix: String,
    pub protocols: Vec<ProtocolId>,
}

impl Namespace {
    fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            protocols: vec![],
        }
    }
}

/// Protocols are only added through `&mut self`, lookups during emission go through
/// `&self`. The namespace table and the per-protocol globals are the only state
/// that changes after all documents have been added.
#[derive(Debug, Default)]
pub struct Registry {
    protocols: Vec<Protocol>,
    namespaces: RefCell<IndexMap<String, Namespace>>,
}

impl Registry {
    /// Builds the protocol described by `root` and registers it.
    pub fn add(&mut self, root: &Element) -> Result<ProtocolId, BuildError> {
        let protocol = build_protocol(root, ProtocolId(self.protocols.len()))?;
        Ok(self.register(protocol))
    }

    fn register(&mut self, protocol: Protocol) -> ProtocolId {
        let id = protocol.id;
        self.namespaces
            .get_mut()
            .entry(protocol.prefix.clone())
            .or_insert_with(|| Namespace::new(&protocol.prefix))
            .protocols
            .push(id);
        log::debug!(
            "Registered protocol {} in namespace {}",
            protocol.name,
            protocol.prefix
        );
        self.protocols.push(protocol);
        id
    }

    pub fn protocol(&self, id: ProtocolId) -> &Protocol {
        &self.protocols[id.0]
    }

    pub fn protocols(&self) -> &[Protocol] {
        &self.protocols
    }

    pub fn interface(&self, id: InterfaceId) -> &Interface {
        &self.protocol(id.protocol).interfaces[id.index]
    }

    pub fn message_name(&self, id: MessageId) -> &str {
        let interface = self.interface(id.interface);
        match id.kind {
            MessageKind::Request => &interface.requests[id.index].name,
            MessageKind::Event => &interface.events[id.index].name,
        }
    }

    /// Returns the members of the namespace `prefix`, creating an empty namespace if
    /// none exists yet.
    pub fn namespace(&self, prefix: &str) -> Namespace {
        self.namespaces
            .borrow_mut()
            .entry(prefix.to_owned())
            .or_insert_with(|| Namespace::new(prefix))
            .clone()
    }

    /// The prefixes of all namespaces with at least one protocol, in the order in
    /// which they were first registered.
    pub fn prefixes(&self) -> Vec<String> {
        self.namespaces
            .borrow()
            .values()
            .filter(|ns| !ns.protocols.is_empty())
            .map(|ns| ns.prefix.clone())
            .collect()
    }

    /// The union of the globals of every protocol in the namespace `prefix`.
    pub fn namespace_globals(&self, prefix: &str) -> IndexSet<String> {
        let mut globals = IndexSet::new();
        for id in self.namespace(prefix).protocols {
            globals.extend(self.protocol(id).globals.borrow().iter().cloned());
        }
        globals
    }
}
