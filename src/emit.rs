//! Generates the Zig bindings of interfaces and namespaces.


use {
    crate::{
        model::{Arg, Enum, Interface},
        naming::ident,
        registry::Registry,
        resolver::{ResolveError, Resolver},
        types::{TypeContext, arg_default, arg_type, decode_expr, return_type},
        zig::{Field, Node, Variant, write_comment},
    },
    std::fmt::{self, Write},
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Could not emit interface {0}")]
    Interface(String, #[source] ResolveError),
    #[error("Could not emit argument {arg} of {interface}.{message}")]
    Arg {
        interface: String,
        message: String,
        arg: String,
        #[source]
        source: ResolveError,
    },
    #[error("Could not write the output")]
    Format(#[from] fmt::Error),
}

/// Declarations every generated file starts from, relative to the runtime directory.
const SUPPORT_IMPORTS: &[(&str, &str)] = &[
    ("Proxy", "proxy.zig"),
    ("Interface", "proxy.zig"),
    ("Argument", "argument.zig"),
    ("Fixed", "argument.zig"),
    ("Client", "client.zig"),
];

pub struct Emitter<'a> {
    res: Resolver<'a>,
    runtime_dir: &'a str,
}

fn string_list<'a>(names: impl Iterator<Item = &'a String>) -> String {
    let names: String = names.map(|n| format!("\"{n}\",")).collect();
    format!("&.{{{names}}}")
}

fn metadata(interface: &Interface) -> Node {
    let mut fields = vec![
        ("name".to_owned(), format!("\"{}\"", interface.full_name())),
        ("version".to_owned(), interface.version.to_string()),
    ];
    if !interface.events.is_empty() {
        let mut signatures = String::from("&.{");
        for event in interface.events.values() {
            let args: Vec<_> = event.args.iter().map(|a| format!(".{}", a.ty.name())).collect();
            signatures.push_str(&format!("&.{{{}}},", args.join(", ")));
        }
        signatures.push('}');
        fields.push(("event_signatures".to_owned(), signatures));
        fields.push((
            "event_names".to_owned(),
            string_list(interface.events.keys()),
        ));
    }
    if !interface.requests.is_empty() {
        fields.push((
            "request_names".to_owned(),
            string_list(interface.requests.keys()),
        ));
    }
    Node::Assignment {
        name: "interface".to_owned(),
        value: Box::new(Node::StructInit {
            ty: Some("Interface".to_owned()),
            fields,
        }),
    }
}

fn bitfield(en: &Enum) -> Node {
    let mut fields: Vec<_> = en
        .flags()
        .into_iter()
        .map(|(_, entry)| Field {
            name: entry.name.clone(),
            ty: "bool".to_owned(),
            default: Some("false".to_owned()),
            comment: entry
                .summary
                .clone()
                .or_else(|| entry.description.as_ref().map(|d| d.body.clone())),
        })
        .collect();
    if fields.len() < 32 {
        fields.push(Field {
            name: "_padding".to_owned(),
            ty: format!("u{}", 32 - fields.len()),
            default: Some("0".to_owned()),
            comment: None,
        });
    }
    Node::Assignment {
        name: en.type_name(),
        value: Box::new(Node::Struct {
            backing: Some("u32".to_owned()),
            fields,
        }),
    }
}

pub fn write_enum<W: Write>(f: &mut W, en: &Enum) -> fmt::Result {
    write_comment(f, en.description.as_ref().map(|d| d.body.as_str()), "///")?;
    if en.bitfield {
        return write!(f, "{}", bitfield(en));
    }
    let signed = en.entries.values().all(|e| i32::try_from(e.value).is_ok());
    let backing = match signed {
        true => "c_int",
        false => "u32",
    };
    write!(f, "pub const {} = enum({backing}) {{", ident(&en.type_name()))?;
    for entry in en.entries.values() {
        let doc = match &entry.description {
            Some(d) => Some(d.body.as_str()),
            None => entry.summary.as_deref(),
        };
        write_comment(f, doc, "///")?;
        write!(f, "{} = {},", ident(&entry.name), entry.value)?;
    }
    writeln!(f, "}};")
}

impl<'a> Emitter<'a> {
    pub fn new(registry: &'a Registry, runtime_dir: &'a str) -> Self {
        Self {
            res: Resolver::new(registry),
            runtime_dir: runtime_dir.trim_end_matches('/'),
        }
    }

    fn arg_error(&self, arg: &Arg, source: ResolveError) -> EmitError {
        let registry = self.res.registry();
        EmitError::Arg {
            interface: registry.interface(arg.parent.interface).full_name(),
            message: registry.message_name(arg.parent).to_owned(),
            arg: arg.name.clone(),
            source,
        }
    }

    fn fields(&self, args: &[Arg], defaults: bool) -> Result<Vec<Field>, EmitError> {
        let mut fields = vec![];
        for arg in args {
            let ty = arg_type(&self.res, arg, TypeContext::Typed)
                .map_err(|e| self.arg_error(arg, e))?;
            fields.push(Field {
                name: arg.name.clone(),
                ty,
                default: arg_default(arg).filter(|_| defaults).map(|d| d.to_owned()),
                comment: arg.summary.clone(),
            });
        }
        Ok(fields)
    }

    fn from_args(&self, interface: &Interface) -> Result<Node, EmitError> {
        let mut arms = vec![];
        for event in interface.events.values() {
            let result = if event.args.is_empty() {
                format!("Event.{}", ident(&event.name))
            } else {
                let mut fields = vec![];
                for (i, arg) in event.args.iter().enumerate() {
                    let expr = decode_expr(&self.res, arg, i).map_err(|e| self.arg_error(arg, e))?;
                    fields.push((arg.name.clone(), expr));
                }
                let payload = Node::StructInit { ty: None, fields };
                Node::StructInit {
                    ty: Some("Event".to_owned()),
                    fields: vec![(event.name.clone(), payload.to_string())],
                }
                .to_string()
            };
            arms.push((event.opcode().to_string(), result));
        }
        arms.push(("else".to_owned(), "unreachable".to_owned()));
        let args_used = interface.events.values().any(|e| !e.args.is_empty());
        let args = match args_used {
            true => "args",
            false => "_",
        };
        Ok(Node::Fn {
            name: "from_args".to_owned(),
            params: vec![
                ("opcode".to_owned(), "u16".to_owned()),
                (args.to_owned(), "[]Argument".to_owned()),
            ],
            ret: "Event".to_owned(),
            body: Box::new(Node::Return(Box::new(Node::Switch {
                value: "opcode".to_owned(),
                arms,
            }))),
        })
    }

    fn event_union(&self, interface: &Interface) -> Result<Node, EmitError> {
        let mut variants = vec![];
        for event in interface.events.values() {
            let fields = self.fields(&event.args, false)?;
            variants.push(Variant {
                name: event.name.clone(),
                payload: (!fields.is_empty()).then(|| Node::Struct {
                    backing: None,
                    fields,
                }),
                doc: event.description.as_ref().map(|d| d.body.clone()),
            });
        }
        Ok(Node::Assignment {
            name: "Event".to_owned(),
            value: Box::new(Node::Union {
                variants,
                extra: vec![self.from_args(interface)?],
            }),
        })
    }

    fn request_union(&self, interface: &Interface) -> Result<Node, EmitError> {
        let mut variants = vec![];
        let mut arms = vec![];
        for request in interface.requests.values() {
            let fields = self.fields(&request.args, true)?;
            variants.push(Variant {
                name: request.name.clone(),
                payload: (!fields.is_empty()).then(|| Node::Struct {
                    backing: None,
                    fields,
                }),
                doc: request.description.as_ref().map(|d| d.body.clone()),
            });
            let ret = return_type(&self.res, interface, request)
                .map_err(|e| EmitError::Interface(interface.full_name(), e))?;
            arms.push((format!(".{}", ident(&request.name)), ret));
        }
        let return_type = Node::Fn {
            name: "ReturnType".to_owned(),
            params: vec![("request".to_owned(), "std.meta.Tag(Request)".to_owned())],
            ret: "type".to_owned(),
            body: Box::new(Node::Return(Box::new(Node::Switch {
                value: "request".to_owned(),
                arms,
            }))),
        };
        Ok(Node::Assignment {
            name: "Request".to_owned(),
            value: Box::new(Node::Union {
                variants,
                extra: vec![return_type],
            }),
        })
    }

    pub fn write_interface<W: Write>(&self, f: &mut W, interface: &Interface) -> Result<(), EmitError> {
        let event = match interface.events.is_empty() {
            true => None,
            false => Some(self.event_union(interface)?),
        };
        let request = self.request_union(interface)?;
        write_comment(
            f,
            interface.description.as_ref().map(|d| d.body.as_str()),
            "///",
        )?;
        writeln!(f, "pub const {} = enum(u32) {{", ident(&interface.handle_name()))?;
        writeln!(f, "_,")?;
        write!(f, "{}", metadata(interface))?;
        for en in interface.enums.values() {
            write_enum(f, en)?;
        }
        if let Some(event) = event {
            write!(f, "{event}")?;
        }
        write!(f, "{request}")?;
        writeln!(f, "}};")?;
        Ok(())
    }

    /// Writes the bindings of every protocol in the namespace `prefix`, followed by
    /// the imports they need.
    pub fn write_namespace<W: Write>(&self, f: &mut W, prefix: &str) -> Result<(), EmitError> {
        let registry = self.res.registry();
        let namespace = registry.namespace(prefix);
        for id in namespace.protocols {
            let protocol = registry.protocol(id);
            log::debug!("Emitting protocol {}", protocol.name);
            write_comment(f, protocol.copyright.as_deref(), "//")?;
            write_comment(
                f,
                protocol.description.as_ref().map(|d| d.body.as_str()),
                "//",
            )?;
            for interface in protocol.interfaces.values() {
                self.write_interface(f, interface)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "const std = @import(\"std\");")?;
        for (name, file) in SUPPORT_IMPORTS {
            let path = match self.runtime_dir {
                "" => file.to_string(),
                dir => format!("{dir}/{file}"),
            };
            writeln!(f, "const {name} = @import(\"{path}\").{name};")?;
        }
        for global in registry.namespace_globals(prefix) {
            writeln!(f, "const {global} = @import(\"{global}.zig\");")?;
        }
        Ok(())
    }
}
