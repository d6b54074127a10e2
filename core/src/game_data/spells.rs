//! Static ability and buff identifiers
//!
//! The analyzer treats ability metadata as an opaque lookup by id.
//! These are the identifiers the default module wiring keys on; all of
//! them can be overridden through `AnalyzerSettings` when a game patch
//! moves things around.

use phf::phf_map;

use crate::combat_log::{CombatEvent, EventKind};

// not exhaustive, only what the built-in modules reference
pub mod spell_id {
    /// Penance damage bolts
    pub const PENANCE: u32 = 47666;
    /// Penance healing bolts (friendly cast)
    pub const PENANCE_HEAL: u32 = 47750;
    /// Talent granting Penance a fourth bolt
    pub const CASTIGATION_TALENT: u32 = 193134;
    pub const ATONEMENT_HEAL_NON_CRIT: u32 = 81751;
    pub const ATONEMENT_HEAL_CRIT: u32 = 94472;
    /// Devotion Aura baseline talent
    pub const DEVOTION_AURA_TALENT: u32 = 183425;
    /// Marker applied to everyone covered by the concentrated aura
    pub const PROTECTION_OF_TYR: u32 = 211210;
    /// Environmental falling damage, unaffected by damage reductions
    pub const FALLING: u32 = 3;
}

/// With the Castigation talent, Penance fires bolts 0 through 3; the
/// fourth bolt is the one the talent added.
pub const CASTIGATION_BOLT_INDEX: u32 = 3;

/// Devotion Aura's damage reduction fraction
pub const DEVOTION_AURA_REDUCTION: f64 = 0.2;

/// Display names for the ids above
pub static SPELL_NAMES: phf::Map<u32, &'static str> = phf_map! {
    47666u32 => "Penance",
    47750u32 => "Penance",
    193134u32 => "Castigation",
    81751u32 => "Atonement",
    94472u32 => "Atonement",
    183425u32 => "Devotion Aura",
    211210u32 => "Protection of Tyr",
    3u32 => "Falling",
};

pub fn spell_name(id: u32) -> &'static str {
    SPELL_NAMES.get(&id).copied().unwrap_or("Unknown")
}

const ATONEMENT_HEAL_IDS: [u32; 2] = [
    spell_id::ATONEMENT_HEAL_NON_CRIT,
    spell_id::ATONEMENT_HEAL_CRIT,
];

/// Whether a heal event came from the Atonement passive. Default
/// related-heal classifier for the attribution module.
pub fn is_atonement_heal(event: &CombatEvent) -> bool {
    event.kind == EventKind::Heal && ATONEMENT_HEAL_IDS.contains(&event.ability_id)
}
