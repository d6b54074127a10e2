//! Analyzer settings
//!
//! Every knob ships with a default taken from the live game data, so
//! running without a settings file works out of the box. A TOML file
//! can override any subset, which is how id changes after a game patch
//! are absorbed without a rebuild.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::game_data::{self, spell_id};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {}", path.display())]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid settings: {reason}")]
    Invalid { reason: String },
}

/// Tunables for the bonus-bolt attribution module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CastigationSettings {
    /// Talent that must be known for the module to activate.
    pub talent: u32,
    /// Ability whose indexed bolts carry the trigger.
    pub trigger_ability: u32,
    /// Healing counterpart reporting the same bolt indices.
    pub companion_heal_ability: u32,
    /// Bolt index that marks the bonus bolt.
    pub trigger_index: u32,
}

impl Default for CastigationSettings {
    fn default() -> Self {
        Self {
            talent: spell_id::CASTIGATION_TALENT,
            trigger_ability: spell_id::PENANCE,
            companion_heal_ability: spell_id::PENANCE_HEAL,
            trigger_index: game_data::CASTIGATION_BOLT_INDEX,
        }
    }
}

/// Tunables for the mitigation window module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevotionAuraSettings {
    /// Talent that must be known for the module to activate.
    pub talent: u32,
    /// Buff marking the aura's active windows on its owner.
    pub marker_buff: u32,
    /// Flat fraction of incoming damage the aura removes.
    pub reduction: f64,
    /// Abilities excluded from mitigation accounting.
    pub ignored_abilities: Vec<u32>,
}

impl Default for DevotionAuraSettings {
    fn default() -> Self {
        Self {
            talent: spell_id::DEVOTION_AURA_TALENT,
            marker_buff: spell_id::PROTECTION_OF_TYR,
            reduction: game_data::DEVOTION_AURA_REDUCTION,
            ignored_abilities: vec![spell_id::FALLING],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub castigation: CastigationSettings,
    pub devotion_aura: DevotionAuraSettings,
}

impl AnalyzerSettings {
    /// Loads settings from a TOML file. Missing keys fall back to
    /// their defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = toml::from_str(&raw).map_err(|source| SettingsError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values the analysis cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let f = self.devotion_aura.reduction;
        if !(f > 0.0 && f < 1.0) {
            return Err(SettingsError::Invalid {
                reason: format!("devotion_aura.reduction must be strictly between 0 and 1, got {f}"),
            });
        }
        if self.castigation.trigger_ability == 0 || self.castigation.companion_heal_ability == 0 {
            return Err(SettingsError::Invalid {
                reason: "castigation ability ids must be nonzero".into(),
            });
        }
        if self.devotion_aura.marker_buff == 0 {
            return Err(SettingsError::Invalid {
                reason: "devotion_aura.marker_buff must be nonzero".into(),
            });
        }
        Ok(())
    }
}
