//! Display names of types and members, and parameter lists.
//!
//! All functions are pure and return owned strings or lines; composition into a view happens in
//! [`crate::surface::composer`]. The `namespaced` flag selects `Namespace.Name` over `Name` for
//! top-level types. Unbound generic parameters always render bare, whatever the flag says.
//!
//! # Examples
//!
//! ```rust
//! use apiscope::{Catalog, surface::names, metadata::typesystem::{CilPrimitiveKind, TypeBuilder}};
//!
//! let catalog = Catalog::new();
//! let corlib = catalog.add_module("System.Private.CoreLib", "System.Private.CoreLib.dll");
//! let int32 = TypeBuilder::new(&catalog, &corlib).primitive(CilPrimitiveKind::I4)?.build()?;
//! let array = catalog.make_array(&int32, 2);
//!
//! assert_eq!(names::full_name(&array, true), "System.Int32[,]");
//! assert_eq!(names::full_name(&array, false), "Int32[,]");
//! # Ok::<(), apiscope::Error>(())
//! ```

use std::iter;

use crate::{
    metadata::{
        members::{Method, ParamRc, PassMode},
        typesystem::{hierarchy::DEFAULT_MAX_DEPTH, CilFlavor, CilType, CilTypeRc, CilTypeRefList},
    },
    surface::config::ParameterLayout,
    Result,
};

/// One indentation step
pub const INDENT: &str = "  ";

/// Name of `ty` without its nesting prefix.
///
/// Arrays, pointers and by-ref types render their element (with its nesting prefix) followed by
/// `[]`, `*` or `&`; generic types render `Name<Arg, ...>` with the arity suffix stripped.
#[must_use]
pub fn type_name(ty: &CilType, namespaced: bool) -> String {
    if ty.flavor.has_element() {
        let element = ty
            .element_type()
            .map_or_else(|| ty.name.clone(), |element| full_name(&element, namespaced));

        return match ty.flavor {
            CilFlavor::Array { rank } => {
                format!("{}[{}]", element, ",".repeat(rank.max(1) as usize - 1))
            }
            CilFlavor::Pointer => format!("{element}*"),
            _ => format!("{element}&"),
        };
    }

    if ty.is_generic_parameter() {
        return ty.name.clone();
    }

    let name = if ty.is_generic_type() {
        format!(
            "{}{}",
            ty.simple_name(),
            generic_suffix(&ty.generic_args, namespaced)
        )
    } else {
        ty.name.clone()
    };

    if namespaced && !ty.is_nested() && !ty.namespace.is_empty() {
        format!("{}.{}", ty.namespace, name)
    } else {
        name
    }
}

/// The enclosing types of `ty`, outermost first, each followed by `+`. Empty if not nested.
#[must_use]
pub fn nesting_prefix(ty: &CilType, namespaced: bool) -> String {
    let mut chain: Vec<CilTypeRc> =
        iter::successors(ty.enclosing_type(), |enclosing| enclosing.enclosing_type())
            .take(DEFAULT_MAX_DEPTH)
            .collect();
    chain.reverse();

    chain
        .iter()
        .map(|enclosing| format!("{}+", type_name(enclosing, namespaced)))
        .collect()
}

/// Nesting prefix followed by the type name, e.g. `Acme.Outer+Inner`
#[must_use]
pub fn full_name(ty: &CilType, namespaced: bool) -> String {
    format!(
        "{}{}",
        nesting_prefix(ty, namespaced),
        type_name(ty, namespaced)
    )
}

/// `<Arg, ...>` for a list of generic parameters or arguments, empty if there are none
#[must_use]
pub fn generic_suffix(args: &CilTypeRefList, namespaced: bool) -> String {
    if args.is_empty() {
        return String::new();
    }

    let rendered: Vec<String> = args
        .iter()
        .map(|(_, arg)| match arg.upgrade() {
            Some(arg) if arg.is_generic_parameter() => arg.name.clone(),
            Some(arg) => full_name(&arg, namespaced),
            None => String::from("?"),
        })
        .collect();

    format!("<{}>", rendered.join(", "))
}

/// Method name with its generic suffix, e.g. `Map<T, U>`
#[must_use]
pub fn member_name(method: &Method, namespaced: bool) -> String {
    format!(
        "{}{}",
        method.name,
        generic_suffix(&method.generic_args, namespaced)
    )
}

/// One parameter as `[ref |out ]name[= default]: Type`.
///
/// `position` is the 1-based position used to name anonymous parameters `arg{position}`.
///
/// # Errors
/// Returns [`crate::Error::MetadataUnavailable`] if the parameter type can't be resolved.
pub fn parameter(param: &ParamRc, position: usize, namespaced: bool) -> Result<String> {
    let prefix = match param.pass_mode()? {
        PassMode::Value => "",
        PassMode::Ref => "ref ",
        PassMode::Out => "out ",
    };

    let declared = param.param_type.get()?;
    let shown = match declared.element_type() {
        Some(element) if declared.is_by_ref() => element,
        _ => declared,
    };

    let name = param
        .name
        .clone()
        .unwrap_or_else(|| format!("arg{position}"));

    let default = match &param.default {
        Some(value) if param.has_default() => format!("= {value}"),
        _ => String::new(),
    };

    Ok(format!(
        "{prefix}{name}{default}: {}",
        full_name(&shown, namespaced)
    ))
}

/// Every parameter rendered by [`parameter`], in order
///
/// # Errors
/// Returns [`crate::Error::MetadataUnavailable`] if a parameter type can't be resolved.
pub fn parameters(params: &[ParamRc], namespaced: bool) -> Result<Vec<String>> {
    params
        .iter()
        .enumerate()
        .map(|(index, param)| parameter(param, index + 1, namespaced))
        .collect()
}

/// Wrap rendered parameters in `open`/`close` between `head` and `tail`.
///
/// The compact layout yields a single line. The expanded layout puts every parameter on its own
/// line one step deeper, comma-terminated except for the last, and the closing delimiter back at
/// the head's indentation. An empty list always stays on one line.
#[must_use]
pub fn enclose(
    head: &str,
    open: char,
    params: &[String],
    close: char,
    tail: &str,
    layout: ParameterLayout,
) -> Vec<String> {
    if layout == ParameterLayout::Compact || params.is_empty() {
        return vec![format!("{head}{open}{}{close}{tail}", params.join(", "))];
    }

    let mut lines = Vec::with_capacity(params.len() + 2);
    lines.push(format!("{head}{open}"));
    for (index, param) in params.iter().enumerate() {
        let separator = if index + 1 < params.len() { "," } else { "" };
        lines.push(format!("{INDENT}{param}{separator}"));
    }
    lines.push(format!("{close}{tail}"));
    lines
}
