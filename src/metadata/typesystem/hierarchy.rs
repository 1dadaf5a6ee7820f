//! Relation walks over type descriptors.
//!
//! Every walk follows [`CilTypeRef`](crate::metadata::typesystem::CilTypeRef) links and is
//! bounded by a caller supplied depth, so inconsistent metadata (e.g. a base cycle introduced by
//! a faulty host) surfaces as [`crate::Error::RecursionLimit`] instead of looping forever.

use std::collections::HashSet;

use crate::{
    metadata::{
        token::Token,
        typesystem::{resolve_all, CilFlavor, CilTypeRc},
    },
    surface::names,
    Error::RecursionLimit,
    Result,
};

/// The depth walks are bounded by unless configured otherwise
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Enclosing types of `ty`, outermost first. Empty for a type that isn't nested.
///
/// # Errors
/// Returns [`crate::Error::RecursionLimit`] if the chain is deeper than `max_depth`.
pub fn nesting_chain(ty: &CilTypeRc, max_depth: usize) -> Result<Vec<CilTypeRc>> {
    let mut chain = Vec::new();
    let mut current = ty.enclosing_type();

    while let Some(enclosing) = current {
        if chain.len() >= max_depth {
            return Err(RecursionLimit(max_depth));
        }

        current = enclosing.enclosing_type();
        chain.push(enclosing);
    }

    chain.reverse();
    Ok(chain)
}

/// Base types of `ty`, root first and immediate parent last. Empty for interfaces.
///
/// # Errors
/// Returns [`crate::Error::RecursionLimit`] if the chain is deeper than `max_depth`.
pub fn base_chain(ty: &CilTypeRc, max_depth: usize) -> Result<Vec<CilTypeRc>> {
    if ty.is_interface() {
        return Ok(Vec::new());
    }

    let mut chain = Vec::new();
    let mut current = ty.base();

    while let Some(base) = current {
        if chain.len() >= max_depth {
            return Err(RecursionLimit(max_depth));
        }

        current = base.base();
        chain.push(base);
    }

    chain.reverse();
    Ok(chain)
}

/// Directly declared interfaces of `ty`, sorted by namespace and then by namespaced full name
///
/// # Errors
/// Returns [`crate::Error::MetadataUnavailable`] if an interface can't be resolved.
pub fn interfaces(ty: &CilTypeRc) -> Result<Vec<CilTypeRc>> {
    let mut interfaces = resolve_all(&ty.interfaces)?;
    interfaces.sort_by_cached_key(|interface| {
        (
            interface.namespace.clone(),
            names::full_name(interface, true),
        )
    });

    Ok(interfaces)
}

/// Is a value of type `target` usable where `receiver` is expected.
///
/// Holds when both are the same type, `receiver` is on the base chain of `target`, or `receiver`
/// is an interface implemented by `target` or by one of its bases (including interfaces inherited
/// by interfaces). `System.Object` accepts every interface, as interfaces have no base chain to
/// reach it through. Generic variance is not considered.
///
/// # Errors
/// Returns [`crate::Error::RecursionLimit`] if a walk is deeper than `max_depth`, or
/// [`crate::Error::MetadataUnavailable`] if an interface can't be resolved.
pub fn is_assignable_from(
    receiver: &CilTypeRc,
    target: &CilTypeRc,
    max_depth: usize,
) -> Result<bool> {
    if receiver.is_same(target) {
        return Ok(true);
    }

    if receiver.flavor == CilFlavor::Object && target.is_interface() {
        return Ok(true);
    }

    let mut lineage = base_chain(target, max_depth)?;
    if lineage.iter().any(|base| base.is_same(receiver)) {
        return Ok(true);
    }

    if !receiver.is_interface() {
        return Ok(false);
    }

    lineage.push(target.clone());
    let mut visited = HashSet::new();
    for ty in &lineage {
        if implements(ty, receiver.token, &mut visited, 0, max_depth)? {
            return Ok(true);
        }
    }

    Ok(false)
}

fn implements(
    ty: &CilTypeRc,
    interface: Token,
    visited: &mut HashSet<Token>,
    depth: usize,
    max_depth: usize,
) -> Result<bool> {
    if depth > max_depth {
        return Err(RecursionLimit(max_depth));
    }

    for declared in resolve_all(&ty.interfaces)? {
        if declared.token == interface {
            return Ok(true);
        }

        if visited.insert(declared.token)
            && implements(&declared, interface, visited, depth + 1, max_depth)?
        {
            return Ok(true);
        }
    }

    Ok(false)
}

/// The generic definition of `ty`: the definition an instance was bound from, or `ty` itself if
/// it is a definition. `None` for non-generic types.
#[must_use]
pub fn generic_definition(ty: &CilTypeRc) -> Option<CilTypeRc> {
    if let Some(definition) = ty.instance_definition() {
        return Some(definition);
    }

    if ty.is_generic_definition() {
        return Some(ty.clone());
    }

    None
}
