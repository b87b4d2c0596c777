use crate::zig::{Field, Node, Variant, write_comment};

fn field(name: &str, ty: &str) -> Field {
    Field {
        name: name.to_owned(),
        ty: ty.to_owned(),
        default: None,
        comment: None,
    }
}

#[test]
fn assignment_of_struct() {
    let node = Node::Assignment {
        name: "Size".to_owned(),
        value: Box::new(Node::Struct {
            backing: None,
            fields: vec![
                field("width", "i32"),
                Field {
                    default: Some("0".to_owned()),
                    comment: Some("the\n   height".to_owned()),
                    ..field("height", "u32")
                },
            ],
        }),
    };
    assert_eq!(
        node.to_string(),
        "pub const Size = struct {width: i32,height: u32 = 0, // the height\n};\n"
    );
}

#[test]
fn packed_struct() {
    let node = Node::Struct {
        backing: Some("u32".to_owned()),
        fields: vec![field("type", "bool"), field("_padding", "u31")],
    };
    assert_eq!(
        node.to_string(),
        "packed struct(u32) {@\"type\": bool,_padding: u31,}"
    );
}

#[test]
fn union_with_extra() {
    let node = Node::Union {
        variants: vec![
            Variant {
                name: "done".to_owned(),
                payload: None,
                doc: Some("  all done\n\n  really\n".to_owned()),
            },
            Variant {
                name: "error".to_owned(),
                payload: Some(Node::Struct {
                    backing: None,
                    fields: vec![field("code", "u32")],
                }),
                doc: None,
            },
        ],
        extra: vec![Node::Fn {
            name: "f".to_owned(),
            params: vec![("x".to_owned(), "u8".to_owned())],
            ret: "void".to_owned(),
            body: Box::new(Node::Return(Box::new(Node::StructInit {
                ty: None,
                fields: vec![],
            }))),
        }],
    };
    assert_eq!(
        node.to_string(),
        "union(enum) {\n/// all done\n///\n/// really\ndone: void,@\"error\": struct {code: u32,},\n\
         \npub fn f(x: u8,) void {\nreturn .{};\n}\n}"
    );
}

#[test]
fn struct_init() {
    let node = Node::StructInit {
        ty: Some("Interface".to_owned()),
        fields: vec![
            ("name".to_owned(), "\"wl_surface\"".to_owned()),
            ("version".to_owned(), "6".to_owned()),
        ],
    };
    assert_eq!(
        node.to_string(),
        "Interface{.name = \"wl_surface\",.version = 6,}"
    );
}

#[test]
fn switch() {
    let node = Node::Return(Box::new(Node::Switch {
        value: "opcode".to_owned(),
        arms: vec![
            ("0".to_owned(), "Event.done".to_owned()),
            ("else".to_owned(), "unreachable".to_owned()),
        ],
    }));
    assert_eq!(
        node.to_string(),
        "return switch (opcode) {\n0 => Event.done,else => unreachable,};\n"
    );
}

#[test]
fn comments() {
    let mut out = String::new();
    write_comment(&mut out, Some("\n  Copyright 2024\n  Someone\n"), "//").unwrap();
    write_comment(&mut out, Some("   "), "//").unwrap();
    write_comment(&mut out, None, "//").unwrap();
    assert_eq!(out, "\n// Copyright 2024\n// Someone\n");
}
