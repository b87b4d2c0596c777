use crate::{
    model::{Arg, Interface},
    registry::Registry,
};

pub const FOO: &str = r#"<protocol name="foo">
  <interface name="foo_bar" version="3">
    <request name="baz">
      <arg name="count" type="uint" summary="number of things"/>
    </request>
  </interface>
</protocol>"#;

pub const EXT_CORE: &str = r#"<protocol name="ext_core">
  <copyright>
    Copyright 2024 Ext authors
  </copyright>
  <interface name="ext_surface" version="2">
    <enum name="kind">
      <entry name="plain" value="0"/>
      <entry name="fancy" value="1"/>
    </enum>
    <enum name="caps" bitfield="true">
      <entry name="a" value="1"/>
      <entry name="b" value="2"/>
    </enum>
  </interface>
  <interface name="ext_output" version="1">
    <event name="done"/>
  </interface>
</protocol>"#;

pub const EXT_EXTRA: &str = r#"<protocol name="ext_extra">
  <interface name="ext_seat" version="1">
    <request name="get_output">
      <arg name="id" type="new_id" interface="ext_output"/>
    </request>
  </interface>
</protocol>"#;

pub const APP: &str = r#"<protocol name="app">
  <interface name="app_window" version="1">
    <description summary="a window">
      A toplevel window.
    </description>
    <enum name="state">
      <entry name="normal" value="0"/>
      <entry name="maximized" value="1"/>
    </enum>
    <request name="attach">
      <arg name="surface" type="object" interface="ext_surface"/>
      <arg name="kind" type="uint" enum="ext_surface.kind"/>
      <arg name="caps" type="uint" enum="ext_surface.caps"/>
      <arg name="output" type="object" interface="ext_output" allow-null="true"/>
    </request>
    <request name="get_popup">
      <arg name="id" type="new_id" interface="app_popup"/>
      <arg name="parent" type="object" interface="app_window"/>
      <arg name="state" type="int" enum="state"/>
      <arg name="local_state" type="uint" enum="app_window.state"/>
    </request>
    <request name="bind">
      <arg name="name" type="uint"/>
      <arg name="id" type="new_id"/>
    </request>
    <request name="destroy" type="destructor"/>
    <event name="configure">
      <arg name="width" type="int"/>
      <arg name="title" type="string" allow-null="true"/>
      <arg name="seat" type="object" interface="ext_seat" allow-null="true"/>
      <arg name="anything" type="object"/>
      <arg name="states" type="array"/>
      <arg name="outputs" type="array" interface="ext_output"/>
      <arg name="caps" type="uint" enum="ext_surface.caps"/>
      <arg name="scale" type="fixed"/>
      <arg name="fd" type="fd"/>
    </event>
    <event name="popup_created">
      <arg name="popup" type="new_id" interface="app_popup"/>
    </event>
    <event name="close"/>
  </interface>
  <interface name="app_popup" version="1"/>
</protocol>"#;

pub fn registry(docs: &[&str]) -> Registry {
    let mut registry = Registry::default();
    for doc in docs {
        let root = protocol_tree::parse(doc.as_bytes()).unwrap();
        registry.add(&root).unwrap();
    }
    registry
}

pub fn interface<'a>(registry: &'a Registry, name: &str) -> &'a Interface {
    registry
        .protocols()
        .iter()
        .find_map(|p| p.interfaces.get(name))
        .unwrap()
}

/// Finds an argument of a request or, if there is no such request, an event.
pub fn arg<'a>(registry: &'a Registry, interface_name: &str, message: &str, name: &str) -> &'a Arg {
    let interface = interface(registry, interface_name);
    let args = match interface.requests.get(message) {
        Some(r) => &r.args,
        None => &interface.events[message].args,
    };
    args.iter().find(|a| a.name == name).unwrap()
}
