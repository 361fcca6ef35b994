use crate::error::TreeResult;
use serde::{Deserialize, Serialize};

/// What to do with a population round that finishes after it was superseded
/// (a newer round started, or the entry was collapsed meanwhile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePopulationPolicy {
    /// Drop the stale round. Lists delivered while collapsed are stored but
    /// not rendered.
    #[default]
    Discard,
    /// Render every round that completes, even on a collapsed entry.
    Apply,
}

/// Tree view settings shared by every entry of one tree.
///
/// Missing keys fall back to their defaults when loading from TOML:
///
/// ```toml
/// indent_px = 16
/// stale_populations = "apply"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Horizontal offset of each nested children container.
    pub indent_px: u32,
    /// Initial visibility of expand toggles; hosts may hide them per record.
    pub show_expand_toggle: bool,
    pub stale_populations: StalePopulationPolicy,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            indent_px: 12,
            show_expand_toggle: true,
            stale_populations: StalePopulationPolicy::Discard,
        }
    }
}

impl TreeConfig {
    pub fn from_toml_str(source: &str) -> TreeResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn discards_stale_populations(&self) -> bool {
        self.stale_populations == StalePopulationPolicy::Discard
    }
}
