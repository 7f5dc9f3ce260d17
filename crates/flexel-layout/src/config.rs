//! Per-tree behavioral policy.

use crate::error::ConfigError;
use crate::measure::CloneNodeFunc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opt-in algorithm changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentalFeatures {
    /// Recompute the flex basis of every child on every pass, as browsers do.
    pub web_flex_basis: bool,
}

/// Layout configuration shared by every node of a [`crate::LayoutTree`].
///
/// Changing a config through [`crate::LayoutTree::set_config`] or
/// [`crate::LayoutTree::update_config`] invalidates every cached layout of that tree.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// New nodes start with `flex-direction: row` and `align-content: stretch`, and
    /// flex shorthands follow browser rules.
    pub use_web_defaults: bool,
    /// Stretch children of `AtMost` containers the way older releases did.
    pub use_legacy_stretch_behaviour: bool,
    point_scale_factor: f32,
    /// Experimental switches.
    pub experimental_features: ExperimentalFeatures,
    /// Dump the laid-out tree through `log::debug!` after each layout.
    pub print_tree: bool,
    #[serde(skip)]
    clone_node: Option<CloneNodeFunc>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_web_defaults: false,
            use_legacy_stretch_behaviour: false,
            point_scale_factor: 1.0,
            experimental_features: ExperimentalFeatures::default(),
            print_tree: false,
            clone_node: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("use_web_defaults", &self.use_web_defaults)
            .field("use_legacy_stretch_behaviour", &self.use_legacy_stretch_behaviour)
            .field("point_scale_factor", &self.point_scale_factor)
            .field("experimental_features", &self.experimental_features)
            .field("print_tree", &self.print_tree)
            .field("clone_node", &self.clone_node.is_some())
            .finish()
    }
}

impl Config {
    /// Create the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: enable web defaults.
    #[must_use]
    pub const fn with_web_defaults(mut self, enabled: bool) -> Self {
        self.use_web_defaults = enabled;
        self
    }

    /// Physical pixels per point. Zero disables pixel-grid rounding.
    #[must_use]
    pub const fn point_scale_factor(&self) -> f32 {
        self.point_scale_factor
    }

    /// Set the point scale factor. Negative and non-finite values are rejected and the
    /// prior value kept.
    pub fn set_point_scale_factor(&mut self, factor: f32) -> Result<(), ConfigError> {
        validate_scale_factor(factor)?;
        self.point_scale_factor = factor;
        Ok(())
    }

    /// Install the clone policy used for copy-on-write.
    pub fn set_clone_node_func(&mut self, func: Option<CloneNodeFunc>) {
        self.clone_node = func;
    }

    /// The installed clone policy, if any.
    #[must_use]
    pub fn clone_node_func(&self) -> Option<&CloneNodeFunc> {
        self.clone_node.as_ref()
    }

    /// Parse a config from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        validate_scale_factor(config.point_scale_factor)?;
        Ok(config)
    }

    /// Render the config as TOML. The clone policy is not serialized.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

fn validate_scale_factor(factor: f32) -> Result<(), ConfigError> {
    if factor.is_finite() && factor >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidPointScaleFactor(factor))
    }
}
