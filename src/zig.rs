//! A small set of Zig syntax nodes and their textual form.
//!
//! Rendering does no layout beyond the line breaks comments require. The output is
//! expected to go through `zig fmt` afterwards.

#[cfg(test)]
mod tests;

use {
    crate::naming::ident,
    std::fmt::{self, Display, Formatter, Write},
};

#[derive(Debug, Clone)]
pub struct Variant {
    pub name: String,
    pub payload: Option<Node>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: String,
    pub default: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Node {
    /// `pub const name = value;`
    Assignment { name: String, value: Box<Node> },
    /// `union(enum) { ... }` followed by declarations inside the union.
    Union {
        variants: Vec<Variant>,
        extra: Vec<Node>,
    },
    /// `struct { ... }`, or `packed struct(backing) { ... }`.
    Struct {
        backing: Option<String>,
        fields: Vec<Field>,
    },
    /// `Type{ .name = value, ... }`, or `.{ ... }` without a type.
    StructInit {
        ty: Option<String>,
        fields: Vec<(String, String)>,
    },
    Fn {
        name: String,
        params: Vec<(String, String)>,
        ret: String,
        body: Box<Node>,
    },
    Return(Box<Node>),
    Switch {
        value: String,
        arms: Vec<(String, String)>,
    },
}

/// Writes `text` as comment lines with the given marker (`///` or `//`), one per
/// line of `text` with surrounding whitespace removed.
pub fn write_comment<W: Write>(f: &mut W, text: Option<&str>, marker: &str) -> fmt::Result {
    let Some(text) = text else {
        return Ok(());
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }
    for line in text.lines() {
        let line = line.trim();
        match line.is_empty() {
            true => write!(f, "\n{marker}")?,
            false => write!(f, "\n{marker} {line}")?,
        }
    }
    writeln!(f)
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Assignment { name, value } => {
                writeln!(f, "pub const {} = {};", ident(name), value)
            }
            Node::Union { variants, extra } => {
                write!(f, "union(enum) {{")?;
                for variant in variants {
                    write_comment(f, variant.doc.as_deref(), "///")?;
                    write!(f, "{}: ", ident(&variant.name))?;
                    match &variant.payload {
                        Some(p) => write!(f, "{p}")?,
                        None => write!(f, "void")?,
                    }
                    write!(f, ",")?;
                }
                for decl in extra {
                    write!(f, "\n{decl}")?;
                }
                write!(f, "}}")
            }
            Node::Struct { backing, fields } => {
                match backing {
                    Some(b) => write!(f, "packed struct({b}) {{")?,
                    None => write!(f, "struct {{")?,
                }
                for field in fields {
                    write!(f, "{}: {}", ident(&field.name), field.ty)?;
                    if let Some(default) = &field.default {
                        write!(f, " = {default}")?;
                    }
                    write!(f, ",")?;
                    if let Some(comment) = &field.comment {
                        let comment = single_line(comment);
                        if !comment.is_empty() {
                            writeln!(f, " // {comment}")?;
                        }
                    }
                }
                write!(f, "}}")
            }
            Node::StructInit { ty, fields } => {
                write!(f, "{}{{", ty.as_deref().unwrap_or("."))?;
                for (name, value) in fields {
                    write!(f, ".{} = {},", ident(name), value)?;
                }
                write!(f, "}}")
            }
            Node::Fn {
                name,
                params,
                ret,
                body,
            } => {
                write!(f, "\npub fn {}(", ident(name))?;
                for (name, ty) in params {
                    write!(f, "{name}: {ty},")?;
                }
                writeln!(f, ") {ret} {{")?;
                write!(f, "{body}")?;
                writeln!(f, "}}")
            }
            Node::Return(body) => writeln!(f, "return {body};"),
            Node::Switch { value, arms } => {
                writeln!(f, "switch ({value}) {{")?;
                for (pattern, result) in arms {
                    write!(f, "{pattern} => {result},")?;
                }
                write!(f, "}}")
            }
        }
    }
}
