//! Resolution of extension methods contributed by any loaded module.
//!
//! An extension container is a static, top-level, non-generic type tagged with
//! [`EXTENSION_ATTRIBUTE`](crate::metadata::typesystem::EXTENSION_ATTRIBUTE). Its tagged static
//! methods with at least one parameter are candidates; the first parameter is the receiver.
//! A candidate applies to a target when [`can_extend`] accepts its receiver type.
//!
//! Nothing here fails because of a missing match: no applicable extension is an empty result.
//!
//! # Examples
//!
//! ```rust
//! use apiscope::{
//!     metadata::{
//!         members::{MethodBuilder, ParamBuilder},
//!         typesystem::{CilPrimitiveKind, TypeBuilder, EXTENSION_ATTRIBUTE},
//!     },
//!     surface::extensions,
//!     Catalog,
//! };
//!
//! let catalog = Catalog::new();
//! let module = catalog.add_module("Acme", "Acme.dll");
//! TypeBuilder::new(&catalog, &module).primitive(CilPrimitiveKind::Object)?.build()?;
//! let widget = TypeBuilder::new(&catalog, &module).class("Acme", "Widget").build()?;
//! let helpers = TypeBuilder::new(&catalog, &module)
//!     .class("Acme", "WidgetExtensions")
//!     .static_type()
//!     .attribute(EXTENSION_ATTRIBUTE)
//!     .build()?;
//! MethodBuilder::new(&catalog, &helpers, "Shake")
//!     .extension()
//!     .param(ParamBuilder::new(&catalog, &widget).name("widget").build())
//!     .build()?;
//!
//! let found = extensions::extensions(&catalog, &widget, 64)?;
//! assert_eq!(found.len(), 1);
//! assert_eq!(extensions::extension_methods(&helpers, &widget, 64)?[0].name, "Shake");
//! # Ok::<(), apiscope::Error>(())
//! ```

use crate::{
    metadata::{
        members::MethodRc,
        typesystem::{
            hierarchy::{base_chain, generic_definition, is_assignable_from},
            resolve_all, CilType, CilTypeRc,
        },
    },
    surface::{config::ParameterLayout, members::render_extension_method},
    Catalog, Result,
};

/// Is `ty` a type that declares extension methods
#[must_use]
pub fn is_extension_container(ty: &CilType) -> bool {
    ty.is_extension_container()
}

/// The extension methods `container` declares: static, tagged, with a receiver parameter
#[must_use]
pub fn candidates(container: &CilType) -> Vec<MethodRc> {
    container
        .methods
        .iter()
        .map(|(_, method)| method)
        .filter(|method| method.is_extension())
        .filter(|method| {
            if method.receiver().is_none() {
                log::trace!(
                    "Skipping '{}.{}': no receiver parameter",
                    container.name,
                    method.name
                );
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

/// Does an extension method with receiver type `receiver` apply to `target`.
///
/// 1. It does if `receiver` is assignable from `target`.
/// 2. Otherwise, if `receiver` is an open generic type and `target` a closed one, it does when
///    the receiver's generic definition is the target's definition, the definition of an
///    interface the target's definition declares, or the definition of a type on the target
///    definition's base chain. The bound arguments are not compared.
/// 3. Otherwise it doesn't.
///
/// # Errors
/// Returns [`crate::Error::RecursionLimit`] if a walk is deeper than `max_depth`, or
/// [`crate::Error::MetadataUnavailable`] if a relation can't be resolved.
pub fn can_extend(receiver: &CilTypeRc, target: &CilTypeRc, max_depth: usize) -> Result<bool> {
    if is_assignable_from(receiver, target, max_depth)? {
        return Ok(true);
    }

    if !receiver.is_open_generic() || !target.is_closed_generic() {
        return Ok(false);
    }

    let (Some(receiver_def), Some(target_def)) =
        (generic_definition(receiver), generic_definition(target))
    else {
        return Ok(false);
    };

    if receiver_def.is_same(&target_def) {
        return Ok(true);
    }

    let same_definition =
        |ty: &CilTypeRc| generic_definition(ty).is_some_and(|def| def.is_same(&receiver_def));

    if resolve_all(&target_def.interfaces)?
        .iter()
        .any(same_definition)
    {
        return Ok(true);
    }

    Ok(base_chain(&target_def, max_depth)?
        .iter()
        .rev()
        .any(same_definition))
}

fn receiver_type(method: &MethodRc) -> Result<Option<CilTypeRc>> {
    let Some(receiver) = method.receiver() else {
        return Ok(None);
    };

    let declared = receiver.param_type.get()?;
    match declared.element_type() {
        Some(element) if declared.is_by_ref() => Ok(Some(element)),
        _ => Ok(Some(declared)),
    }
}

/// The candidates of `container` applicable to `target`, ordered by name and then signature
///
/// # Errors
/// Returns [`crate::Error::RecursionLimit`] if a walk is deeper than `max_depth`, or
/// [`crate::Error::MetadataUnavailable`] if a relation can't be resolved.
pub fn extension_methods(
    container: &CilType,
    target: &CilTypeRc,
    max_depth: usize,
) -> Result<Vec<MethodRc>> {
    let mut applicable = Vec::new();
    for method in candidates(container) {
        let Some(receiver) = receiver_type(&method)? else {
            continue;
        };

        let applies = can_extend(&receiver, target, max_depth)?;
        log::trace!(
            "'{}.{}' {} '{}'",
            container.name,
            method.name,
            if applies { "extends" } else { "does not extend" },
            target.name
        );

        if applies {
            let signature = render_extension_method(&method, ParameterLayout::Compact)?;
            applicable.push((method.name.clone(), signature, method));
        }
    }

    applicable.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    Ok(applicable
        .into_iter()
        .map(|(_, _, method)| method)
        .collect())
}

/// Every extension container in `catalog` with at least one method applicable to `target`,
/// ordered by namespace and full name
///
/// # Errors
/// Returns [`crate::Error::RecursionLimit`] if a walk is deeper than `max_depth`, or
/// [`crate::Error::MetadataUnavailable`] if a relation can't be resolved.
pub fn extensions(
    catalog: &Catalog,
    target: &CilTypeRc,
    max_depth: usize,
) -> Result<Vec<CilTypeRc>> {
    let mut containers = Vec::new();
    for container in catalog.extension_containers() {
        if !extension_methods(container, target, max_depth)?.is_empty() {
            containers.push(container.clone());
        }
    }

    Ok(containers)
}
