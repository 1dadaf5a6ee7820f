//! One-line signatures of declared members.
//!
//! Every member renders as its name, an optional `{...}` descriptor tag listing what differs
//! from the default (accessibility, virtual state, accessor visibility, ...) and its shape.
//! Member lines never qualify type names with namespaces.
//!
//! | Member | Form |
//! |---|---|
//! | constructor, method | `Name<T>{desc}(args): Return` |
//! | event | `Name{desc}: Handler` |
//! | property | `Name{desc}[index]: Type` |
//! | field | `Name{desc}: Type` |
//! | nested type | `Outer+Name{desc}: kind` |

use crate::{
    metadata::{
        members::{
            declared_members, Event, Field, Member, MemberScope, Method, MethodRc, Property,
        },
        typesystem::{CilType, TypeAttributes, TypeKind},
    },
    surface::{config::ParameterLayout, names},
    Result,
};

fn desc(parts: &[&str]) -> String {
    if parts.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", parts.join(" "))
    }
}

fn virtual_tag(method: &Method) -> Option<&'static str> {
    if !method.is_virtual() {
        None
    } else if method.is_final() {
        Some("overriding")
    } else if method.is_abstract() {
        Some("abstract")
    } else {
        Some("overridable")
    }
}

fn accessor_tag(accessor: Option<MethodRc>, verb: &str) -> Option<String> {
    let accessor = accessor?;
    Some(match accessor.access().tag() {
        None => verb.to_string(),
        Some(visibility) => format!("{visibility}_{verb}"),
    })
}

fn nested_tag(ty: &CilType) -> Option<&'static str> {
    match ty.flags & TypeAttributes::VISIBILITY_MASK {
        TypeAttributes::NESTED_FAMILY => Some("family"),
        TypeAttributes::NESTED_FAM_OR_ASSEM => Some("family-or-assembly"),
        TypeAttributes::NESTED_ASSEMBLY => Some("assembly"),
        TypeAttributes::NESTED_FAM_AND_ASSEM => Some("assembly-and-family"),
        TypeAttributes::NESTED_PRIVATE => Some("private"),
        _ => None,
    }
}

fn render_callable(method: &Method, skip: usize, layout: ParameterLayout) -> Result<Vec<String>> {
    let name = if method.is_constructor() {
        names::type_name(&*method.declaring_type.get()?, false)
    } else {
        names::member_name(method, false)
    };

    let mut parts = Vec::new();
    if let Some(access) = method.access().tag() {
        parts.push(access);
    }
    if let Some(state) = virtual_tag(method) {
        parts.push(state);
    }

    let returns = match &method.return_type {
        Some(return_type) if !method.is_constructor() => {
            names::full_name(&*return_type.get()?, false)
        }
        _ => String::from("Void"),
    };

    let params = method.params.get(skip..).unwrap_or_default();
    Ok(names::enclose(
        &format!("{name}{}", desc(&parts)),
        '(',
        &names::parameters(params, false)?,
        ')',
        &format!(": {returns}"),
        layout,
    ))
}

/// Signature of a method or constructor. Constructors render the declaring type's name and
/// return `Void`.
///
/// # Errors
/// Returns [`crate::Error::MetadataUnavailable`] if a referenced type can't be resolved.
pub fn render_method(method: &Method, layout: ParameterLayout) -> Result<Vec<String>> {
    render_callable(method, 0, layout)
}

/// Signature of an extension method as seen on the extended type, without the receiver
///
/// # Errors
/// Returns [`crate::Error::MetadataUnavailable`] if a referenced type can't be resolved.
pub fn render_extension_method(method: &Method, layout: ParameterLayout) -> Result<Vec<String>> {
    render_callable(method, 1, layout)
}

/// Signature of an event, tagged with the visibility of its accessors
///
/// # Errors
/// Returns [`crate::Error::MetadataUnavailable`] if the handler type can't be resolved.
pub fn render_event(event: &Event) -> Result<String> {
    let tags: Vec<String> = [
        accessor_tag(event.adder(), "add"),
        accessor_tag(event.remover(), "remove"),
    ]
    .into_iter()
    .flatten()
    .collect();
    let parts: Vec<&str> = tags.iter().map(String::as_str).collect();

    Ok(format!(
        "{}{}: {}",
        event.name,
        desc(&parts),
        names::full_name(&*event.event_type.get()?, false)
    ))
}

/// Signature of a property, tagged with its accessors; indexers list their index parameters
///
/// # Errors
/// Returns [`crate::Error::MetadataUnavailable`] if a referenced type can't be resolved.
pub fn render_property(property: &Property, layout: ParameterLayout) -> Result<Vec<String>> {
    let tags: Vec<String> = [
        accessor_tag(property.getter(), "get"),
        accessor_tag(property.setter(), "set"),
    ]
    .into_iter()
    .flatten()
    .collect();
    let parts: Vec<&str> = tags.iter().map(String::as_str).collect();

    let head = format!("{}{}", property.name, desc(&parts));
    let tail = format!(
        ": {}",
        names::full_name(&*property.property_type.get()?, false)
    );

    if property.params.is_empty() {
        return Ok(vec![format!("{head}{tail}")]);
    }

    Ok(names::enclose(
        &head,
        '[',
        &names::parameters(&property.params, false)?,
        ']',
        &tail,
        layout,
    ))
}

/// Signature of a field
///
/// # Errors
/// Returns [`crate::Error::MetadataUnavailable`] if the field type can't be resolved.
pub fn render_field(field: &Field) -> Result<String> {
    let mut parts = Vec::new();
    if let Some(access) = field.access().tag() {
        parts.push(access);
    }
    if field.is_readonly() {
        parts.push("readonly");
    } else if field.is_literal() {
        parts.push("literal");
    }
    if field.is_special() {
        parts.push("special");
    }

    Ok(format!(
        "{}{}: {}",
        field.name,
        desc(&parts),
        names::full_name(&*field.field_type.get()?, false)
    ))
}

/// A nested type as listed among its enclosing type's members
#[must_use]
pub fn render_nested_type(ty: &CilType) -> String {
    let parts: Vec<&str> = nested_tag(ty).into_iter().collect();

    format!(
        "{}{}: {}",
        names::full_name(ty, false),
        desc(&parts),
        TypeKind::of(ty)
    )
}

/// Signature lines of one member
///
/// # Errors
/// Returns [`crate::Error::MetadataUnavailable`] if a referenced type can't be resolved.
pub fn render_member(member: &Member, layout: ParameterLayout) -> Result<Vec<String>> {
    match member {
        Member::NestedType(ty) => Ok(vec![render_nested_type(ty)]),
        Member::Constructor(method) | Member::Method(method) => render_method(method, layout),
        Member::Event(event) => Ok(vec![render_event(event)?]),
        Member::Property(property) => render_property(property, layout),
        Member::Field(field) => Ok(vec![render_field(field)?]),
    }
}

/// Signature lines of every member `ty` declares in `scope`, ordered by name, then member kind,
/// then rendered text
///
/// # Errors
/// Returns [`crate::Error::MetadataUnavailable`] if a referenced type can't be resolved.
pub fn members(ty: &CilType, scope: MemberScope, layout: ParameterLayout) -> Result<Vec<String>> {
    let mut rendered = Vec::new();
    for member in declared_members(ty, scope) {
        let lines = render_member(&member, layout)?;
        rendered.push((member.name().to_string(), member.kind_order(), lines));
    }

    rendered.sort();
    Ok(rendered
        .into_iter()
        .flat_map(|(_, _, lines)| lines)
        .collect())
}
