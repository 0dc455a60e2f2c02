//! Character sheet view
//!
//! Read-only projection of a [`Character`] with derived values filled in.

use serde::{Deserialize, Serialize};

use super::character::{Ability, AbilityScores, Character, InventoryItem};

/// floor((score - 10) / 2)
pub fn ability_modifier(score: u8) -> i32 {
    (i32::from(score) - 10).div_euclid(2)
}

/// floor((level - 1) / 4) + 2
pub fn proficiency_bonus(level: u8) -> i32 {
    (i32::from(level) - 1).div_euclid(4) + 2
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub name: String,
    pub race: String,
    #[serde(rename = "class")]
    pub character_class: String,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub max_hp: u64,
    pub current_hp: u64,
    /// Always 0 until temporary hit points are tracked
    pub temp_hp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityView {
    pub score: u8,
    pub modifier: i32,
}

impl AbilityView {
    fn of(ability: Ability, scores: &AbilityScores) -> Self {
        let score = ability.score(scores);
        Self {
            score,
            modifier: ability_modifier(score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetAbilities {
    pub strength: AbilityView,
    pub dexterity: AbilityView,
    pub constitution: AbilityView,
    pub intelligence: AbilityView,
    pub wisdom: AbilityView,
    pub charisma: AbilityView,
}

impl SheetAbilities {
    fn from_scores(scores: &AbilityScores) -> Self {
        Self {
            strength: AbilityView::of(Ability::Strength, scores),
            dexterity: AbilityView::of(Ability::Dexterity, scores),
            constitution: AbilityView::of(Ability::Constitution, scores),
            intelligence: AbilityView::of(Ability::Intelligence, scores),
            wisdom: AbilityView::of(Ability::Wisdom, scores),
            charisma: AbilityView::of(Ability::Charisma, scores),
        }
    }
}

/// Derived sheet for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub basic_info: BasicInfo,
    pub health: Health,
    pub ability_scores: SheetAbilities,
    pub proficiency_bonus: i32,
    pub inventory: Vec<InventoryItem>,
}

impl CharacterSheet {
    /// Pure; performs no I/O
    pub fn compute(character: &Character) -> Self {
        Self {
            basic_info: BasicInfo {
                name: character.name.clone(),
                race: character.race.clone(),
                character_class: character.character_class.clone(),
                level: character.level,
            },
            health: Health {
                max_hp: character.max_hp,
                current_hp: character.current_hp,
                temp_hp: 0,
            },
            ability_scores: SheetAbilities::from_scores(&character.ability_scores),
            proficiency_bonus: proficiency_bonus(character.level),
            inventory: character.inventory.clone(),
        }
    }
}

impl From<&Character> for CharacterSheet {
    fn from(character: &Character) -> Self {
        Self::compute(character)
    }
}
