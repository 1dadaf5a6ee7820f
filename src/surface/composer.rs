//! Multi-line API-surface views.
//!
//! [`ApiSurface`] walks a type's hierarchy and lays out bracket lines and member lines with two
//! spaces of indentation per level:
//!
//! ```text
//! [class System.Object (instance API)]
//!   Equals{overridable}(obj: Object): Boolean
//!   [interface Acme.IDrawable]
//!     Draw{abstract}(): Void
//!   [class Acme.Widget (instance API)]
//!     Widget(): Void
//!     [extension Acme.WidgetExtensions] (Acme.dll)
//!       Shake(): Void
//! ```
//!
//! The root of the base chain sits at level 0 and every further base one level deeper. The
//! type's interfaces share the level of its immediate base, the type itself comes one level
//! below, and extensions one level below that. Types without bases (interfaces, `System.Object`)
//! put their interfaces at level 0 and themselves at level 1, or at level 0 with no interfaces.
//! The static view lists no interfaces, so a type without bases always sits at level 0 there.

use crate::{
    metadata::{
        members::MemberScope,
        typesystem::{
            hierarchy::{base_chain, interfaces},
            CilTypeRc, TypeKind,
        },
    },
    surface::{
        config::SurfaceConfig,
        extensions::{extension_methods, extensions},
        members::{members, render_extension_method},
        names::{full_name, INDENT},
    },
    Catalog, Result,
};

const INSTANCE_API: &str = " (instance API)";

/// Which sections a view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Chain,
    Static,
    Full,
}

/// The hierarchy of one type, with the levels every part is rendered at
struct Layout {
    bases: Vec<CilTypeRc>,
    interfaces: Vec<CilTypeRc>,
    interface_level: usize,
    self_level: usize,
}

impl Layout {
    fn of(ty: &CilTypeRc, config: &SurfaceConfig, mode: Mode) -> Result<Self> {
        let bases = base_chain(ty, config.max_depth)?;
        let interfaces = if mode == Mode::Static {
            Vec::new()
        } else {
            interfaces(ty)?
        };

        let (interface_level, self_level) = match bases.len() {
            0 if interfaces.is_empty() => (0, 0),
            0 => (0, 1),
            depth => (depth - 1, depth),
        };

        Ok(Layout {
            bases,
            interfaces,
            interface_level,
            self_level,
        })
    }
}

/// Renders textual API-surface views of the types in a [`Catalog`]
///
/// # Examples
///
/// ```rust
/// use apiscope::{
///     metadata::{members::MethodBuilder, typesystem::{CilPrimitiveKind, TypeBuilder}},
///     surface::ApiSurface,
///     Catalog,
/// };
///
/// let catalog = Catalog::new();
/// let corlib = catalog.add_module("System.Private.CoreLib", "System.Private.CoreLib.dll");
/// TypeBuilder::new(&catalog, &corlib).primitive(CilPrimitiveKind::Object)?.build()?;
/// TypeBuilder::new(&catalog, &corlib).primitive(CilPrimitiveKind::Void)?.build()?;
///
/// let app = catalog.add_module("App", "/srv/App.dll");
/// let foo = TypeBuilder::new(&catalog, &app).class("", "Foo").build()?;
/// MethodBuilder::constructor(&catalog, &foo).build()?;
///
/// let surface = ApiSurface::new(&catalog);
/// assert_eq!(
///     surface.full_api(&foo)?,
///     "[class System.Object (instance API)]\n  [class Foo (instance API)]\n    Foo(): Void"
/// );
/// # Ok::<(), apiscope::Error>(())
/// ```
pub struct ApiSurface<'a> {
    catalog: &'a Catalog,
    config: SurfaceConfig,
}

impl<'a> ApiSurface<'a> {
    /// Views over `catalog` with the default configuration
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_config(catalog, SurfaceConfig::default())
    }

    /// Views over `catalog` with a custom configuration
    #[must_use]
    pub fn with_config(catalog: &'a Catalog, config: SurfaceConfig) -> Self {
        ApiSurface { catalog, config }
    }

    /// The configuration in use
    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    fn bracket(&self, ty: &CilTypeRc, annotation: &str) -> String {
        format!(
            "[{} {}{}]",
            TypeKind::of(ty),
            full_name(ty, self.config.namespaced),
            annotation
        )
    }

    fn extension_bracket(&self, container: &CilTypeRc) -> String {
        let module = container
            .module
            .as_ref()
            .map(|module| module.file_name())
            .unwrap_or_default();

        format!(
            "[extension {}] ({})",
            full_name(container, self.config.namespaced),
            module
        )
    }

    fn push(lines: &mut Vec<String>, level: usize, line: &str) {
        lines.push(format!("{}{}", INDENT.repeat(level), line));
    }

    fn push_members(
        &self,
        lines: &mut Vec<String>,
        ty: &CilTypeRc,
        scope: MemberScope,
        level: usize,
    ) -> Result<()> {
        for line in members(ty, scope, self.config.parameter_layout)? {
            Self::push(lines, level, &line);
        }
        Ok(())
    }

    fn push_extensions(
        &self,
        lines: &mut Vec<String>,
        ty: &CilTypeRc,
        level: usize,
        with_methods: bool,
    ) -> Result<()> {
        for container in extensions(self.catalog, ty, self.config.max_depth)? {
            Self::push(lines, level, &self.extension_bracket(&container));
            if !with_methods {
                continue;
            }

            for method in extension_methods(&container, ty, self.config.max_depth)? {
                for line in render_extension_method(&method, self.config.parameter_layout)? {
                    Self::push(lines, level + 1, &line);
                }
            }
        }
        Ok(())
    }

    fn render(&self, ty: &CilTypeRc, mode: Mode) -> Result<String> {
        let layout = Layout::of(ty, &self.config, mode)?;
        let annotation = if mode == Mode::Full { INSTANCE_API } else { "" };
        let mut lines = Vec::new();

        for (level, base) in layout.bases.iter().enumerate() {
            Self::push(&mut lines, level, &self.bracket(base, annotation));
            let scope = match mode {
                Mode::Static => MemberScope::Static,
                Mode::Full => MemberScope::Instance,
                Mode::Chain => continue,
            };
            self.push_members(&mut lines, base, scope, level + 1)?;
        }

        for interface in &layout.interfaces {
            Self::push(&mut lines, layout.interface_level, &self.bracket(interface, ""));
            if mode == Mode::Full {
                self.push_members(
                    &mut lines,
                    interface,
                    MemberScope::Instance,
                    layout.interface_level + 1,
                )?;
            }
        }

        Self::push(&mut lines, layout.self_level, &self.bracket(ty, annotation));
        match mode {
            Mode::Static => {
                self.push_members(&mut lines, ty, MemberScope::Static, layout.self_level + 1)?;
            }
            Mode::Full => {
                self.push_members(&mut lines, ty, MemberScope::Instance, layout.self_level + 1)?;
                self.push_extensions(&mut lines, ty, layout.self_level + 1, true)?;
            }
            Mode::Chain => {
                self.push_extensions(&mut lines, ty, layout.self_level + 1, false)?;
            }
        }

        Ok(lines.join("\n"))
    }

    /// Bracket lines of the base chain, interfaces, the type and its extensions
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] or [`crate::Error::MetadataUnavailable`] if the
    /// hierarchy can't be walked.
    pub fn chain(&self, ty: &CilTypeRc) -> Result<String> {
        self.render(ty, Mode::Chain)
    }

    /// The base chain and the type, each followed by its declared static members
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] or [`crate::Error::MetadataUnavailable`] if the
    /// hierarchy can't be walked.
    pub fn static_api(&self, ty: &CilTypeRc) -> Result<String> {
        self.render(ty, Mode::Static)
    }

    /// The base chain, interfaces and the type, each followed by its declared instance members,
    /// then every applicable extension with its methods
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] or [`crate::Error::MetadataUnavailable`] if the
    /// hierarchy can't be walked.
    pub fn full_api(&self, ty: &CilTypeRc) -> Result<String> {
        self.render(ty, Mode::Full)
    }

    /// Every applicable extension container and its methods, without the hierarchy
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] or [`crate::Error::MetadataUnavailable`] if the
    /// hierarchy can't be walked.
    pub fn extensions_view(&self, ty: &CilTypeRc) -> Result<String> {
        let mut lines = Vec::new();
        self.push_extensions(&mut lines, ty, 0, true)?;
        Ok(lines.join("\n"))
    }

    /// One `Identity (path)` line per loaded module, ascending by identity
    #[must_use]
    pub fn modules(&self) -> String {
        self.catalog
            .modules()
            .iter()
            .map(|module| format!("{} ({})", module.identity, module.path))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn listed(&self, ty: &CilTypeRc) -> bool {
        self.config.include_hidden || ty.is_visible()
    }

    /// One line per distinct namespace of the listed types, ascending. The global (empty)
    /// namespace is not listed.
    #[must_use]
    pub fn namespaces(&self) -> String {
        let mut namespaces: Vec<String> = self
            .catalog
            .types()
            .into_iter()
            .filter(|ty| self.listed(ty) && !ty.namespace.is_empty())
            .map(|ty| ty.namespace.clone())
            .collect();
        namespaces.sort();
        namespaces.dedup();
        namespaces.join("\n")
    }

    /// `[kind Name]` for every listed type in `namespace`, ascending by name and then full name
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the namespace index is inconsistent.
    pub fn namespace_view(&self, namespace: &str) -> Result<String> {
        let mut types: Vec<(String, String, CilTypeRc)> = self
            .catalog
            .types_in_namespace(namespace)?
            .into_iter()
            .filter(|ty| self.listed(ty))
            .map(|ty| (full_name(&ty, false), full_name(&ty, true), ty))
            .collect();
        types.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        Ok(types
            .iter()
            .map(|(_, _, ty)| self.bracket(ty, ""))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
