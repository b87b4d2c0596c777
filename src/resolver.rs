//! Lookups of interfaces and enums across protocol and namespace boundaries.

#[cfg(test)]
mod tests;

use {
    crate::{
        model::{Enum, Interface, InterfaceId, ProtocolId},
        registry::Registry,
    },
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Interface name {0} does not contain a prefix")]
    MalformedInterfaceName(String),
    #[error("No protocol in namespace {prefix} contains interface {name}")]
    UnknownInterface { prefix: String, name: String },
    #[error("Interface {interface} does not contain enum {name}")]
    UnknownEnum { interface: String, name: String },
    #[error("Enum reference {0} is neither of the form enum nor interface.enum")]
    MalformedEnumReference(String),
}

#[derive(Copy, Clone)]
pub struct Resolver<'a> {
    registry: &'a Registry,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Finds the interface declared as `name` (including its prefix) as seen from
    /// `protocol`.
    ///
    /// Interfaces outside the namespace of `protocol` are recorded in its globals.
    pub fn find_interface(
        &self,
        protocol: ProtocolId,
        name: &str,
    ) -> Result<&'a Interface, ResolveError> {
        let current = self.registry.protocol(protocol);
        if let Some(interface) = current.interfaces.get(name) {
            return Ok(interface);
        }
        let prefix = match name.split_once('_') {
            Some((prefix, _)) if !prefix.is_empty() => prefix,
            _ => return Err(ResolveError::MalformedInterfaceName(name.to_owned())),
        };
        let namespace = self.registry.namespace(prefix);
        let interface = namespace
            .protocols
            .iter()
            .find_map(|&id| self.registry.protocol(id).interfaces.get(name));
        let Some(interface) = interface else {
            return Err(ResolveError::UnknownInterface {
                prefix: prefix.to_owned(),
                name: name.to_owned(),
            });
        };
        log::trace!(
            "Resolved {} from protocol {} in protocol {}",
            name,
            current.name,
            self.registry.protocol(interface.id.protocol).name
        );
        if prefix != current.prefix && current.globals.borrow_mut().insert(prefix.to_owned()) {
            log::debug!("Protocol {} references namespace {}", current.name, prefix);
        }
        Ok(interface)
    }

    /// Finds the enum referenced as `name` or `interface.name` from within
    /// `interface`.
    pub fn find_enum(
        &self,
        interface: InterfaceId,
        name: &str,
    ) -> Result<(&'a Interface, &'a Enum), ResolveError> {
        let current = self.registry.interface(interface);
        let parts: Vec<_> = name.split('.').collect();
        let (owner, enum_name) = match parts[..] {
            [e] => (current, e),
            [i, e] => (self.find_interface(interface.protocol, i)?, e),
            _ => return Err(ResolveError::MalformedEnumReference(name.to_owned())),
        };
        match owner.enums.get(enum_name) {
            Some(en) => Ok((owner, en)),
            None => Err(ResolveError::UnknownEnum {
                interface: owner.full_name(),
                name: enum_name.to_owned(),
            }),
        }
    }
}
