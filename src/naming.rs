
use std::borrow::Cow;

pub fn to_camel(s: &str) -> String {
    let mut last_was_underscore = true;
    let mut res = String::new();
    for mut b in s.as_bytes().iter().copied() {
        if b == b'_' {
            last_was_underscore = true;
        } else {
            if last_was_underscore {
                b = b.to_ascii_uppercase()
            }
            res.push(b as char);
            last_was_underscore = false;
        }
    }
    res
}

const KEYWORDS: &[&str] = &[
    "addrspace",
    "align",
    "allowzero",
    "and",
    "anyframe",
    "anytype",
    "asm",
    "break",
    "callconv",
    "catch",
    "comptime",
    "const",
    "continue",
    "defer",
    "else",
    "enum",
    "errdefer",
    "error",
    "export",
    "extern",
    "fn",
    "for",
    "if",
    "inline",
    "linksection",
    "noalias",
    "noinline",
    "nosuspend",
    "opaque",
    "or",
    "orelse",
    "packed",
    "pub",
    "resume",
    "return",
    "struct",
    "suspend",
    "switch",
    "test",
    "threadlocal",
    "try",
    "union",
    "unreachable",
    "var",
    "volatile",
    "while",
];

const PRIMITIVES: &[&str] = &[
    "anyerror",
    "anyopaque",
    "bool",
    "c_char",
    "c_int",
    "c_long",
    "c_longdouble",
    "c_longlong",
    "c_short",
    "c_uint",
    "c_ulong",
    "c_ulonglong",
    "c_ushort",
    "comptime_float",
    "comptime_int",
    "f16",
    "f32",
    "f64",
    "f80",
    "f128",
    "false",
    "isize",
    "noreturn",
    "null",
    "true",
    "type",
    "undefined",
    "usize",
    "void",
];

fn is_int_type(s: &str) -> bool {
    match s.strip_prefix(['i', 'u']) {
        Some(bits) => !bits.is_empty() && bits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Returns `name` as a Zig identifier, using the `@"..."` form where the bare name
/// would not be accepted.
pub fn ident(name: &str) -> Cow<'_, str> {
    let plain = match name.as_bytes().first() {
        Some(b'a'..=b'z' | b'A'..=b'Z' | b'_') => name
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'0'..=b'9')),
        _ => false,
    };
    let reserved = name == "_"
        || KEYWORDS.contains(&name)
        || PRIMITIVES.contains(&name)
        || is_int_type(name);
    if plain && !reserved {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("@\"{}\"", name.escape_default()))
    }
}
