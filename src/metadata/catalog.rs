//! The catalog of loaded modules and their types.
//!
//! A [`Catalog`] is the explicit, immutable-once-populated metadata source every query runs
//! against. It owns the strong references to all modules and type descriptors; descriptors refer
//! to each other through weak [`CilTypeRef`](crate::metadata::typesystem::CilTypeRef)s.
//!
//! # Catalog Architecture
//!
//! - **Token-based lookup**: primary index using metadata tokens (`SkipMap`)
//! - **Name-based lookup**: secondary indices for full names, namespaces and modules (`DashMap`)
//! - **Constructed types**: arrays, pointers, by-ref types and generic instances are deduplicated
//!   by structure, so the same construction always yields the same descriptor
//! - **Extension containers**: computed on first use and cached
//!
//! # Thread Safety
//!
//! All collections are lock-free or sharded, a populated `Catalog` is `Send + Sync` and can be
//! rendered from several threads at once. Population is expected to finish before the first
//! query; the extension container cache is not refreshed afterwards.
//!
//! # Examples
//!
//! ```rust
//! use apiscope::{Catalog, metadata::typesystem::TypeBuilder};
//!
//! let catalog = Catalog::new();
//! let module = catalog.add_module("Acme.Core, Version=1.0.0.0", "/opt/acme/Acme.Core.dll");
//! let shape = TypeBuilder::new(&catalog, &module)
//!     .class("Acme.Geometry", "Shape")
//!     .abstract_type()
//!     .build()?;
//!
//! assert!(catalog.get(&shape.token)?.is_same(&shape));
//! assert_eq!(catalog.find("Acme.Geometry.Shape").map(|ty| ty.token), Some(shape.token));
//! assert_eq!(catalog.modules().len(), 1);
//! # Ok::<(), apiscope::Error>(())
//! ```

use std::sync::{Arc, OnceLock};

use crossbeam_skiplist::SkipMap;
use dashmap::{mapref::entry::Entry, DashMap};

use crate::{
    metadata::{
        module::{Module, ModuleRc},
        token::{Token, TokenGenerator, TokenTable},
        typesystem::{
            hierarchy::DEFAULT_MAX_DEPTH, CilFlavor, CilPrimitiveKind, CilType, CilTypeRc,
        },
    },
    surface::names,
    Error::{MetadataUnavailable, RecursionLimit, TypeError, TypeNotFound},
    Result,
};

/// Structural identity of a constructed type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ConstructedKey {
    Array(Token, u32),
    Pointer(Token),
    ByRef(Token),
    Instance(Token, Vec<Token>),
}

/// Explicit snapshot of loaded modules and every type descriptor they declare or construct
pub struct Catalog {
    /// All modules, by token
    modules: SkipMap<Token, ModuleRc>,
    /// All types (declared and constructed), by token
    types: SkipMap<Token, CilTypeRc>,
    /// Declared types per module, in registration order
    types_by_module: DashMap<Token, Vec<Token>>,
    /// Declared types per full name
    types_by_fullname: DashMap<String, Vec<Token>>,
    /// Declared types per namespace
    types_by_namespace: DashMap<String, Vec<Token>>,
    /// Deduplication of constructed types
    constructed: DashMap<ConstructedKey, CilTypeRc>,
    /// Token allocation
    tokens: TokenGenerator,
    /// Lazily computed extension containers
    extension_containers: OnceLock<Vec<CilTypeRc>>,
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Catalog {
            modules: SkipMap::new(),
            types: SkipMap::new(),
            types_by_module: DashMap::new(),
            types_by_fullname: DashMap::new(),
            types_by_namespace: DashMap::new(),
            constructed: DashMap::new(),
            tokens: TokenGenerator::new(),
            extension_containers: OnceLock::new(),
        }
    }

    /// Allocate the next token in `table`
    pub fn next_token(&self, table: TokenTable) -> Token {
        self.tokens.next(table)
    }

    /// Load a module into the catalog
    ///
    /// ## Arguments
    /// * 'identity' - The module identity string, e.g. `Acme.Core, Version=1.0.0.0`
    /// * 'path'     - Where the module was loaded from
    pub fn add_module(&self, identity: &str, path: &str) -> ModuleRc {
        let module = Arc::new(Module::new(
            self.next_token(TokenTable::Module),
            identity,
            path,
        ));

        log::debug!("Registered module '{}' from '{}'", identity, path);
        self.modules.insert(module.token, module.clone());
        module
    }

    /// All modules, ascending by identity string
    #[must_use]
    pub fn modules(&self) -> Vec<ModuleRc> {
        let mut modules: Vec<ModuleRc> = self
            .modules
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        modules.sort_by(|a, b| a.identity.cmp(&b.identity));
        modules
    }

    /// Look up a module by its identity string
    ///
    /// # Errors
    /// Returns [`crate::Error::MetadataUnavailable`] if no such module is loaded.
    pub fn module(&self, identity: &str) -> Result<ModuleRc> {
        self.modules
            .iter()
            .find(|entry| entry.value().identity == identity)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| MetadataUnavailable(format!("module '{}' is not loaded", identity)))
    }

    /// Types declared by `module`, in registration order, without compiler-generated types
    ///
    /// # Errors
    /// Returns [`crate::Error::MetadataUnavailable`] if the module isn't part of this catalog.
    pub fn module_types(&self, module: &Module) -> Result<Vec<CilTypeRc>> {
        if !self.modules.contains_key(&module.token) {
            return Err(MetadataUnavailable(format!(
                "module '{}' is not loaded",
                module.identity
            )));
        }

        let tokens = self
            .types_by_module
            .get(&module.token)
            .map(|tokens| tokens.value().clone())
            .unwrap_or_default();
        self.resolve_declared(&tokens)
    }

    /// All declared types across modules, in token order, without compiler-generated types
    #[must_use]
    pub fn types(&self) -> Vec<CilTypeRc> {
        self.types
            .iter()
            .filter(|entry| entry.key().table() == TokenTable::TypeDef as u8)
            .map(|entry| entry.value().clone())
            .filter(|ty| !ty.is_compiler_generated())
            .collect()
    }

    /// Declared types in `namespace`, in token order, without compiler-generated types
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the index refers to a missing type.
    pub fn types_in_namespace(&self, namespace: &str) -> Result<Vec<CilTypeRc>> {
        let mut tokens = self
            .types_by_namespace
            .get(namespace)
            .map(|tokens| tokens.value().clone())
            .unwrap_or_default();
        tokens.sort();
        self.resolve_declared(&tokens)
    }

    fn resolve_declared(&self, tokens: &[Token]) -> Result<Vec<CilTypeRc>> {
        let mut types = Vec::with_capacity(tokens.len());
        for token in tokens {
            let ty = self.get(token)?;
            if !ty.is_compiler_generated() {
                types.push(ty);
            }
        }

        Ok(types)
    }

    /// Look up a type by its token
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if no type has this token.
    pub fn get(&self, token: &Token) -> Result<CilTypeRc> {
        self.types
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or(TypeNotFound(*token))
    }

    /// Find the first declared type with the given full name (`Namespace.Name`)
    #[must_use]
    pub fn find(&self, fullname: &str) -> Option<CilTypeRc> {
        let tokens = self.types_by_fullname.get(fullname)?;
        tokens
            .value()
            .iter()
            .find_map(|token| self.types.get(token).map(|entry| entry.value().clone()))
    }

    /// Look up the declared type backing a primitive
    ///
    /// # Errors
    /// Returns [`crate::Error::MetadataUnavailable`] if the core library wasn't registered.
    pub fn primitive(&self, kind: CilPrimitiveKind) -> Result<CilTypeRc> {
        let fullname = format!("{}.{}", kind.namespace(), kind.name());
        self.find(&fullname).ok_or_else(|| {
            MetadataUnavailable(format!("primitive '{}' is not registered", fullname))
        })
    }

    /// Number of types (declared and constructed)
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no types are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Add a declared type and index it
    pub(crate) fn register(&self, new_type: CilType) -> CilTypeRc {
        let new_type = Arc::new(new_type);

        log::debug!(
            "Registered type '{}' ({})",
            new_type.fullname(),
            new_type.token
        );

        self.types.insert(new_type.token, new_type.clone());
        self.types_by_fullname
            .entry(new_type.fullname())
            .or_default()
            .push(new_type.token);
        self.types_by_namespace
            .entry(new_type.namespace.clone())
            .or_default()
            .push(new_type.token);
        if let Some(module) = &new_type.module {
            self.types_by_module
                .entry(module.token)
                .or_default()
                .push(new_type.token);
        }

        new_type
    }

    /// Create an unbound generic parameter named `name`
    ///
    /// ## Arguments
    /// * 'name'   - The parameter name, e.g. `T`
    /// * 'index'  - The position in the owner's parameter list
    /// * 'method' - Whether it belongs to a method (true) or a type (false)
    pub fn make_generic_parameter(&self, name: &str, index: u32, method: bool) -> CilTypeRc {
        let parameter = Arc::new(CilType::new(
            self.next_token(TokenTable::GenericParam),
            None,
            CilFlavor::GenericParameter { index, method },
            String::new(),
            name.to_string(),
            0,
        ));

        self.types.insert(parameter.token, parameter.clone());
        parameter
    }

    /// The single-dimensional (`rank` 1) or multi-dimensional array of `element`
    pub fn make_array(&self, element: &CilTypeRc, rank: u32) -> CilTypeRc {
        let rank = rank.max(1);
        let suffix = format!("[{}]", ",".repeat(rank as usize - 1));

        self.make_constructed(
            ConstructedKey::Array(element.token, rank),
            element,
            CilFlavor::Array { rank },
            &suffix,
        )
    }

    /// The unmanaged pointer to `element`
    pub fn make_pointer(&self, element: &CilTypeRc) -> CilTypeRc {
        self.make_constructed(
            ConstructedKey::Pointer(element.token),
            element,
            CilFlavor::Pointer,
            "*",
        )
    }

    /// The by-reference type of `element`
    pub fn make_by_ref(&self, element: &CilTypeRc) -> CilTypeRc {
        self.make_constructed(
            ConstructedKey::ByRef(element.token),
            element,
            CilFlavor::ByRef,
            "&",
        )
    }

    fn make_constructed(
        &self,
        key: ConstructedKey,
        element: &CilTypeRc,
        flavor: CilFlavor,
        suffix: &str,
    ) -> CilTypeRc {
        let slot = match self.constructed.entry(key) {
            Entry::Occupied(existing) => return existing.get().clone(),
            Entry::Vacant(slot) => slot,
        };

        let mut constructed = CilType::new(
            self.next_token(TokenTable::TypeSpec),
            element.module.clone(),
            flavor,
            element.namespace.clone(),
            format!("{}{}", element.name, suffix),
            0,
        )
        .with_element(element);
        if constructed.is_array() {
            if let Some(array) = self.find("System.Array") {
                constructed = constructed.with_base(&array);
            }
        }

        let constructed = Arc::new(constructed);
        slot.insert(constructed.clone());
        self.types.insert(constructed.token, constructed.clone());
        constructed
    }

    /// Bind the parameters of the generic definition `definition` to `args`.
    ///
    /// The instance shares the definition's members; its base type and interfaces are the
    /// definition's with every type parameter replaced by the matching argument.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if `definition` isn't a generic definition or the
    /// number of arguments doesn't match, or [`crate::Error::RecursionLimit`] if substituting
    /// the relations nests deeper than the default depth limit.
    pub fn make_generic_instance(
        &self,
        definition: &CilTypeRc,
        args: &[CilTypeRc],
    ) -> Result<CilTypeRc> {
        self.instantiate(definition, args, 0)
    }

    fn instantiate(
        &self,
        definition: &CilTypeRc,
        args: &[CilTypeRc],
        depth: usize,
    ) -> Result<CilTypeRc> {
        if depth > DEFAULT_MAX_DEPTH {
            return Err(RecursionLimit(DEFAULT_MAX_DEPTH));
        }

        if !definition.is_generic_definition() {
            return Err(TypeError(format!(
                "'{}' is not a generic type definition",
                definition.fullname()
            )));
        }

        let arity = definition.generic_args.count();
        if arity != args.len() {
            return Err(TypeError(format!(
                "'{}' expects {} generic arguments, got {}",
                definition.fullname(),
                arity,
                args.len()
            )));
        }

        let key = ConstructedKey::Instance(
            definition.token,
            args.iter().map(|arg| arg.token).collect(),
        );

        // Published before its relations are substituted, so self-referencing relations such as
        // `Node<T> : IEquatable<Node<T>>` resolve to this very instance
        let instance = match self.constructed.entry(key.clone()) {
            Entry::Occupied(existing) => return Ok(existing.get().clone()),
            Entry::Vacant(slot) => {
                let mut instance = CilType::new(
                    self.next_token(TokenTable::TypeSpec),
                    definition.module.clone(),
                    definition.flavor.clone(),
                    definition.namespace.clone(),
                    definition.name.clone(),
                    definition.flags,
                )
                .with_definition(definition);
                instance.nested_types = definition.nested_types.clone();
                instance.methods = definition.methods.clone();
                instance.fields = definition.fields.clone();
                instance.properties = definition.properties.clone();
                instance.events = definition.events.clone();
                instance.custom_attributes = definition.custom_attributes.clone();
                for arg in args {
                    instance.generic_args.push(arg.into());
                }

                let instance = Arc::new(instance);
                slot.insert(instance.clone());
                instance
            }
        };
        self.types.insert(instance.token, instance.clone());

        if let Err(error) = self.bind_relations(&instance, definition, args, depth) {
            self.constructed.remove(&key);
            self.types.remove(&instance.token);
            log::debug!(
                "Discarded instance of '{}' ({}): {}",
                definition.fullname(),
                instance.token,
                error
            );
            return Err(error);
        }

        log::debug!(
            "Instantiated '{}' ({})",
            names::full_name(&instance, true),
            instance.token
        );
        Ok(instance)
    }

    fn bind_relations(
        &self,
        instance: &CilTypeRc,
        definition: &CilTypeRc,
        args: &[CilTypeRc],
        depth: usize,
    ) -> Result<()> {
        if let Some(base) = definition.base() {
            let base = self.substitute(&base, args, depth + 1)?;
            instance.set_base(&base)?;
        }

        for (_, interface) in definition.interfaces.iter() {
            let interface = self.substitute(&interface.get()?, args, depth + 1)?;
            instance.interfaces.push(interface.into());
        }

        Ok(())
    }

    fn substitute(&self, ty: &CilTypeRc, args: &[CilTypeRc], depth: usize) -> Result<CilTypeRc> {
        if depth > DEFAULT_MAX_DEPTH {
            return Err(RecursionLimit(DEFAULT_MAX_DEPTH));
        }

        match ty.flavor {
            CilFlavor::GenericParameter {
                index,
                method: false,
            } => Ok(args.get(index as usize).unwrap_or(ty).clone()),
            CilFlavor::Array { rank } => match ty.element_type() {
                Some(element) => {
                    let element = self.substitute(&element, args, depth + 1)?;
                    Ok(self.make_array(&element, rank))
                }
                None => Ok(ty.clone()),
            },
            CilFlavor::Pointer | CilFlavor::ByRef => {
                let Some(element) = ty.element_type() else {
                    return Ok(ty.clone());
                };
                let element = self.substitute(&element, args, depth + 1)?;
                if ty.is_pointer() {
                    Ok(self.make_pointer(&element))
                } else {
                    Ok(self.make_by_ref(&element))
                }
            }
            _ => match ty.instance_definition() {
                Some(definition) if ty.contains_generic_parameters() => {
                    let mut bound = Vec::with_capacity(ty.generic_args.count());
                    for (_, arg) in ty.generic_args.iter() {
                        bound.push(self.substitute(&arg.get()?, args, depth + 1)?);
                    }
                    self.instantiate(&definition, &bound, depth + 1)
                }
                _ => Ok(ty.clone()),
            },
        }
    }

    /// Every extension container across all modules, sorted by namespace and full name.
    ///
    /// Computed on first use; types registered afterwards are not picked up.
    pub fn extension_containers(&self) -> &[CilTypeRc] {
        self.extension_containers.get_or_init(|| {
            let mut containers: Vec<CilTypeRc> = self
                .types()
                .into_iter()
                .filter(|ty| ty.is_extension_container())
                .collect();
            containers.sort_by_cached_key(|ty| (ty.namespace.clone(), names::full_name(ty, true)));

            log::debug!("Found {} extension containers", containers.len());
            containers
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
