//! Maps wire arguments to Zig types and expressions.


use crate::{
    model::{Arg, Interface, Request, RequestKind, WireType},
    resolver::{ResolveError, Resolver},
};

/// Whether an argument is being rendered as it travels on the wire or as the typed
/// value handed to users of the bindings.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TypeContext {
    #[allow(dead_code)]
    Wire,
    Typed,
}

fn optional(nullable: bool, ty: String) -> String {
    match nullable {
        true => format!("?{ty}"),
        false => ty,
    }
}

/// The namespace qualifier needed to name something declared in `owner` from code
/// generated for `from`.
fn qualifier(from: &Interface, owner: &Interface) -> String {
    match owner.prefix == from.prefix {
        true => String::new(),
        false => format!("{}.", owner.prefix),
    }
}

/// The handle type of the interface `name` as seen from `from`.
pub fn handle_type(res: &Resolver<'_>, from: &Interface, name: &str) -> Result<String, ResolveError> {
    let interface = res.find_interface(from.id.protocol, name)?;
    Ok(format!("{}{}", qualifier(from, interface), interface.handle_name()))
}

/// The type of the enum referenced as `name` from `from`.
pub fn enum_type(res: &Resolver<'_>, from: &Interface, name: &str) -> Result<String, ResolveError> {
    let (owner, en) = res.find_enum(from.id, name)?;
    if owner.id == from.id {
        return Ok(en.type_name());
    }
    Ok(format!(
        "{}{}.{}",
        qualifier(from, owner),
        owner.handle_name(),
        en.type_name()
    ))
}

pub fn arg_type(res: &Resolver<'_>, arg: &Arg, ctx: TypeContext) -> Result<String, ResolveError> {
    let from = res.registry().interface(arg.parent.interface);
    let ty = match arg.ty {
        WireType::Int | WireType::Uint => match &arg.enum_ {
            Some(e) => enum_type(res, from, e)?,
            None if arg.ty == WireType::Int => "i32".to_owned(),
            None => "u32".to_owned(),
        },
        WireType::NewId => match (ctx, &arg.interface) {
            (TypeContext::Typed, Some(i)) => handle_type(res, from, i)?,
            _ => "u32".to_owned(),
        },
        WireType::Fixed => "Fixed".to_owned(),
        WireType::String => optional(arg.allow_null, "[:0]const u8".to_owned()),
        WireType::Object => match (ctx, &arg.interface) {
            (TypeContext::Wire, _) => "u32".to_owned(),
            (TypeContext::Typed, Some(i)) => optional(arg.allow_null, handle_type(res, from, i)?),
            (TypeContext::Typed, None) => optional(arg.allow_null, "u32".to_owned()),
        },
        WireType::Array => match &arg.interface {
            Some(i) => format!("[]{}", handle_type(res, from, i)?),
            None => "[]u8".to_owned(),
        },
        WireType::Fd => "std.posix.fd_t".to_owned(),
    };
    Ok(ty)
}

/// The default value of a request field, if it has one.
///
/// Only `new_id` fields have defaults since the client runtime allocates the id.
pub fn arg_default(arg: &Arg) -> Option<&'static str> {
    match (arg.ty, &arg.interface) {
        (WireType::NewId, Some(_)) => Some("@enumFromInt(0)"),
        (WireType::NewId, None) => Some("0"),
        _ => None,
    }
}

/// The expression converting the `index`-th raw argument of an event into the value
/// stored in the typed event payload.
pub fn decode_expr(res: &Resolver<'_>, arg: &Arg, index: usize) -> Result<String, ResolveError> {
    let from = res.registry().interface(arg.parent.interface);
    let raw = format!("args[{}].{}", index, arg.ty.name());
    let expr = match arg.ty {
        WireType::Int | WireType::Uint => match &arg.enum_ {
            Some(e) => match res.find_enum(from.id, e)?.1.bitfield {
                true => format!("@bitCast({raw})"),
                false => format!("@enumFromInt({raw})"),
            },
            None => raw,
        },
        WireType::NewId => match &arg.interface {
            Some(_) => format!("@enumFromInt({raw})"),
            None => raw,
        },
        WireType::Object => {
            let value = match &arg.interface {
                Some(_) => format!("@enumFromInt({raw})"),
                None => raw.clone(),
            };
            match arg.allow_null {
                true => format!("if ({raw} == 0) null else {value}"),
                false => value,
            }
        }
        WireType::Array => {
            let element = match &arg.interface {
                Some(i) => handle_type(res, from, i)?,
                None => "u8".to_owned(),
            };
            format!("{raw}.slice({element})")
        }
        WireType::Fixed | WireType::String | WireType::Fd => raw,
    };
    Ok(expr)
}

/// The type a request evaluates to once sent: the handle of the object it creates,
/// or `void`.
///
/// Constructors whose created interface is chosen at runtime evaluate to a
/// compile error in the generated code.
pub fn return_type(
    res: &Resolver<'_>,
    from: &Interface,
    request: &Request,
) -> Result<String, ResolveError> {
    if request.kind != RequestKind::Constructor {
        return Ok("void".to_owned());
    }
    match request.created_interface() {
        Some(i) => handle_type(res, from, i),
        None => Ok(format!(
            "@compileError(\"{}.{} creates an object whose interface is only known at runtime\")",
            from.handle_name(),
            request.name
        )),
    }
}
