use crate::{
    resolver::{ResolveError, Resolver},
    test_utils::{APP, EXT_CORE, EXT_EXTRA, FOO, interface, registry},
};

#[test]
fn local_interface() {
    let registry = registry(&[EXT_CORE, EXT_EXTRA, APP]);
    let res = Resolver::new(&registry);
    let window = interface(&registry, "app_window");
    let popup = res.find_interface(window.id.protocol, "app_popup").unwrap();
    assert_eq!(popup.name, "popup");
    assert!(registry.protocol(window.id.protocol).globals.borrow().is_empty());
}

#[test]
fn external_interface_is_recorded_once() {
    let registry = registry(&[EXT_CORE, EXT_EXTRA, APP]);
    let res = Resolver::new(&registry);
    let app = interface(&registry, "app_window").id.protocol;
    let surface = res.find_interface(app, "ext_surface").unwrap();
    assert_eq!(surface.full_name(), "ext_surface");
    res.find_interface(app, "ext_surface").unwrap();
    // declared by the second protocol of the namespace
    let seat = res.find_interface(app, "ext_seat").unwrap();
    assert_eq!(registry.protocol(seat.id.protocol).name, "ext_extra");
    let globals = registry.protocol(app).globals.borrow();
    assert_eq!(globals.len(), 1);
    assert!(globals.contains("ext"));
}

#[test]
fn sibling_protocol_is_not_a_global() {
    let registry = registry(&[EXT_CORE, EXT_EXTRA]);
    let res = Resolver::new(&registry);
    let extra = interface(&registry, "ext_seat").id.protocol;
    let output = res.find_interface(extra, "ext_output").unwrap();
    assert_eq!(registry.protocol(output.id.protocol).name, "ext_core");
    assert!(registry.protocol(extra).globals.borrow().is_empty());
}

#[test]
fn unresolved_interfaces() {
    let registry = registry(&[EXT_CORE, FOO]);
    let res = Resolver::new(&registry);
    let foo = interface(&registry, "foo_bar").id.protocol;
    assert!(matches!(
        res.find_interface(foo, "ext_missing"),
        Err(ResolveError::UnknownInterface { prefix, .. }) if prefix == "ext"
    ));
    assert!(matches!(
        res.find_interface(foo, "nowhere_thing"),
        Err(ResolveError::UnknownInterface { prefix, .. }) if prefix == "nowhere"
    ));
    assert!(matches!(
        res.find_interface(foo, "noprefix"),
        Err(ResolveError::MalformedInterfaceName(_))
    ));
    // the lookup created an empty namespace, which has nothing to emit
    assert_eq!(registry.prefixes(), ["ext", "foo"]);
    assert!(registry.protocol(foo).globals.borrow().is_empty());
}

#[test]
fn enums() {
    let registry = registry(&[EXT_CORE, EXT_EXTRA, APP]);
    let res = Resolver::new(&registry);
    let window = interface(&registry, "app_window");
    let (owner, en) = res.find_enum(window.id, "state").unwrap();
    assert_eq!(owner.id, window.id);
    assert_eq!(en.name, "state");
    let (owner, _) = res.find_enum(window.id, "app_window.state").unwrap();
    assert_eq!(owner.id, window.id);
    assert!(registry.protocol(window.id.protocol).globals.borrow().is_empty());
    let (owner, en) = res.find_enum(window.id, "ext_surface.caps").unwrap();
    assert_eq!(owner.full_name(), "ext_surface");
    assert!(en.bitfield);
    res.find_enum(window.id, "ext_surface.kind").unwrap();
    assert_eq!(
        registry
            .protocol(window.id.protocol)
            .globals
            .borrow()
            .iter()
            .collect::<Vec<_>>(),
        ["ext"]
    );
}

#[test]
fn bad_enum_references() {
    let registry = registry(&[EXT_CORE, EXT_EXTRA, APP]);
    let res = Resolver::new(&registry);
    let window = interface(&registry, "app_window").id;
    assert!(matches!(
        res.find_enum(window, "ext_surface.kind.extra"),
        Err(ResolveError::MalformedEnumReference(_))
    ));
    assert!(matches!(
        res.find_enum(window, "missing"),
        Err(ResolveError::UnknownEnum { interface, name }) if interface == "app_window" && name == "missing"
    ));
    assert!(matches!(
        res.find_enum(window, "ext_output.kind"),
        Err(ResolveError::UnknownEnum { .. })
    ));
}
