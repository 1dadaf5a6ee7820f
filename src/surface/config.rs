//! Rendering configuration for API-surface views
//!
//! A [`SurfaceConfig`] controls how names are qualified, how parameter lists are laid out,
//! whether hidden types show up in namespace listings and how deep hierarchy walks may go.

use crate::metadata::typesystem::hierarchy::DEFAULT_MAX_DEPTH;

/// How parameter lists are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterLayout {
    /// All parameters on the member line, joined by `, `
    #[default]
    Compact,
    /// Every parameter on its own line, one indentation step deeper than the member
    Expanded,
}

/// Configuration for rendering API-surface views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfig {
    /// Qualify bracket-line type names with their namespace (member lines never are)
    pub namespaced: bool,

    /// List non-visible types in namespace listings and views
    pub include_hidden: bool,

    /// Layout of method, constructor and indexer parameter lists
    pub parameter_layout: ParameterLayout,

    /// Maximum length of base, nesting and interface walks (default: 64)
    pub max_depth: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            namespaced: true,
            include_hidden: false,
            parameter_layout: ParameterLayout::Compact,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SurfaceConfig {
    /// Bare type names everywhere
    #[must_use]
    pub fn compact() -> Self {
        Self {
            namespaced: false,
            ..Self::default()
        }
    }

    /// One parameter per line
    #[must_use]
    pub fn expanded() -> Self {
        Self {
            parameter_layout: ParameterLayout::Expanded,
            ..Self::default()
        }
    }

    /// Include types that aren't visible outside their module
    #[must_use]
    pub fn all() -> Self {
        Self {
            include_hidden: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let default = SurfaceConfig::default();
        assert!(default.namespaced);
        assert!(!default.include_hidden);
        assert_eq!(default.parameter_layout, ParameterLayout::Compact);
        assert_eq!(default.max_depth, 64);

        assert!(!SurfaceConfig::compact().namespaced);
        assert_eq!(
            SurfaceConfig::expanded().parameter_layout,
            ParameterLayout::Expanded
        );
        assert!(SurfaceConfig::all().include_hidden);
        assert_eq!(SurfaceConfig::all().max_depth, default.max_depth);
    }
}
