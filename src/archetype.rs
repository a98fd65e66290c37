//! The rover roster.
//!
//! Six immutable loadouts, chosen once before a run.  Each pairs a set of
//! stats with a procedural sprite generator; archetypes share no other
//! behaviour, so the roster is a static lookup table keyed by [`ArchetypeId`].

use crate::error::GameError;
use crate::rover::UpgradeLevels;
use crate::sprite::{self, SpriteGenerator};
use bevy::color::Srgba;
use bevy::log::warn;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArchetypeId {
    #[default]
    Atlas,
    Comet,
    Guardian,
    CryoFlux,
    Phantom,
    Vulcan,
}

impl ArchetypeId {
    pub const ALL: [ArchetypeId; 6] = [
        ArchetypeId::Atlas,
        ArchetypeId::Comet,
        ArchetypeId::Guardian,
        ArchetypeId::CryoFlux,
        ArchetypeId::Phantom,
        ArchetypeId::Vulcan,
    ];

    /// Stable lowercase id used in the leaderboard file.
    pub fn id(self) -> &'static str {
        archetype(self).id
    }

    /// Parse an id, falling back to the first archetype with a warning.
    pub fn lookup_or_default(id: &str) -> Self {
        id.parse().unwrap_or_else(|err: GameError| {
            warn!("{err}; falling back to {}", ArchetypeId::default());
            ArchetypeId::default()
        })
    }

    /// Next archetype in roster order, wrapping around.
    pub fn cycle(self) -> Self {
        let index = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ArchetypeId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ROSTER
            .iter()
            .find(|a| a.id.eq_ignore_ascii_case(wanted) || a.name.eq_ignore_ascii_case(wanted))
            .map(|a| a.key)
            .ok_or_else(|| GameError::UnknownArchetype { id: s.to_string() })
    }
}

/// A preconfigured rover loadout.
#[derive(Debug, Clone, Copy)]
pub struct RoverArchetype {
    pub key: ArchetypeId,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Movement speed at 1.0 multiplier (pixels per tick).
    pub base_speed: f32,
    pub coolant_capacity: f32,
    /// May be negative: a built-in vulnerability on that axis.
    pub starting_upgrades: UpgradeLevels,
    pub starting_shields: u32,
    pub color: Srgba,
    pub generator: SpriteGenerator,
}

static ROSTER: [RoverArchetype; 6] = [
    RoverArchetype {
        key: ArchetypeId::Atlas,
        id: "atlas",
        name: "Atlas",
        description: "Balanced all-rounder. No strengths, no weaknesses.",
        base_speed: 5.0,
        coolant_capacity: 100.0,
        starting_upgrades: UpgradeLevels::new(0, 0, 0),
        starting_shields: 1,
        color: Srgba::rgb(0.75, 0.75, 0.78),
        generator: sprite::atlas,
    },
    RoverArchetype {
        key: ArchetypeId::Comet,
        id: "comet",
        name: "Comet",
        description: "Fast and light, but its thin shell regulates poorly.",
        base_speed: 7.0,
        coolant_capacity: 70.0,
        starting_upgrades: UpgradeLevels::new(0, 0, -1),
        starting_shields: 1,
        color: Srgba::rgb(0.95, 0.8, 0.25),
        generator: sprite::comet,
    },
    RoverArchetype {
        key: ArchetypeId::Guardian,
        id: "guardian",
        name: "Guardian",
        description: "Slow armoured tank, insulated against both extremes.",
        base_speed: 4.0,
        coolant_capacity: 120.0,
        starting_upgrades: UpgradeLevels::new(1, 1, 0),
        starting_shields: 2,
        color: Srgba::rgb(0.35, 0.6, 0.35),
        generator: sprite::guardian,
    },
    RoverArchetype {
        key: ArchetypeId::CryoFlux,
        id: "cryoflux",
        name: "CryoFlux",
        description: "Huge coolant tanks and heat shielding; fragile in the cold.",
        base_speed: 5.0,
        coolant_capacity: 150.0,
        starting_upgrades: UpgradeLevels::new(1, -1, 1),
        starting_shields: 1,
        color: Srgba::rgb(0.4, 0.8, 0.95),
        generator: sprite::cryoflux,
    },
    RoverArchetype {
        key: ArchetypeId::Phantom,
        id: "phantom",
        name: "Phantom",
        description: "Quick scout with a smart thermostat; overheats easily.",
        base_speed: 6.0,
        coolant_capacity: 90.0,
        starting_upgrades: UpgradeLevels::new(-1, 0, 1),
        starting_shields: 1,
        color: Srgba::rgb(0.6, 0.45, 0.85),
        generator: sprite::phantom,
    },
    RoverArchetype {
        key: ArchetypeId::Vulcan,
        id: "vulcan",
        name: "Vulcan",
        description: "Forged for lava fields. Thrives in heat, hates the cold.",
        base_speed: 5.0,
        coolant_capacity: 80.0,
        starting_upgrades: UpgradeLevels::new(2, -1, 0),
        starting_shields: 1,
        color: Srgba::rgb(0.85, 0.3, 0.15),
        generator: sprite::vulcan,
    },
];

/// Static roster entry for an id.
pub fn archetype(id: ArchetypeId) -> &'static RoverArchetype {
    match id {
        ArchetypeId::Atlas => &ROSTER[0],
        ArchetypeId::Comet => &ROSTER[1],
        ArchetypeId::Guardian => &ROSTER[2],
        ArchetypeId::CryoFlux => &ROSTER[3],
        ArchetypeId::Phantom => &ROSTER[4],
        ArchetypeId::Vulcan => &ROSTER[5],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_UPGRADE_LEVEL, MIN_UPGRADE_LEVEL};

    #[test]
    fn table_keys_match_ids() {
        for id in ArchetypeId::ALL {
            assert_eq!(archetype(id).key, id);
            assert_eq!(id.id().parse::<ArchetypeId>(), Ok(id));
        }
    }

    #[test]
    fn starting_levels_are_in_range() {
        for id in ArchetypeId::ALL {
            let levels = archetype(id).starting_upgrades;
            assert_eq!(levels, levels.clamped());
            assert!(levels.heat_resistance >= MIN_UPGRADE_LEVEL);
            assert!(levels.heat_resistance <= MAX_UPGRADE_LEVEL);
        }
    }

    #[test]
    fn display_name_parses_too() {
        assert_eq!("CryoFlux".parse::<ArchetypeId>(), Ok(ArchetypeId::CryoFlux));
    }

    #[test]
    fn unknown_id_falls_back_to_atlas() {
        assert_eq!(ArchetypeId::lookup_or_default("zeppelin"), ArchetypeId::Atlas);
    }

    #[test]
    fn cycle_visits_every_archetype() {
        let mut seen = vec![ArchetypeId::Atlas];
        let mut current = ArchetypeId::Atlas.cycle();
        while current != ArchetypeId::Atlas {
            seen.push(current);
            current = current.cycle();
        }
        assert_eq!(seen.len(), ArchetypeId::ALL.len());
    }
}
