//! Character record model
//!
//! The aggregate root and its embedded value objects. Deserialization is
//! routed through [`Character::from_value`], so every decoded record has
//! already passed validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validation::{
    FieldReader, FieldViolation, Validatable, ValidationErrors, ValidationResult, check_range,
    field_path,
};

pub const MIN_ABILITY_SCORE: i128 = 1;
pub const MAX_ABILITY_SCORE: i128 = 20;
pub const MIN_LEVEL: i128 = 1;
pub const MAX_LEVEL: i128 = 20;
pub const MIN_MAX_HP: i128 = 1;
/// Widest count a record can hold
pub const MAX_COUNT: i128 = u64::MAX as i128;

/// The six core abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// Canonical sheet order
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }

    pub fn score(&self, scores: &AbilityScores) -> u8 {
        match self {
            Ability::Strength => scores.strength,
            Ability::Dexterity => scores.dexterity,
            Ability::Constitution => scores.constitution,
            Ability::Intelligence => scores.intelligence,
            Ability::Wisdom => scores.wisdom,
            Ability::Charisma => scores.charisma,
        }
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ability scores, each in `[1, 20]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(
        strength: u8,
        dexterity: u8,
        constitution: u8,
        intelligence: u8,
        wisdom: u8,
        charisma: u8,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    /// Same score for every ability
    pub fn uniform(score: u8) -> Self {
        Self::new(score, score, score, score, score, score)
    }

    fn read(value: &Value, prefix: &str, errors: &mut ValidationErrors) -> Option<Self> {
        let reader = match FieldReader::new(value, prefix) {
            Ok(reader) => reader,
            Err(violation) => {
                errors.push(violation);
                return None;
            }
        };

        let mut scores = [0u8; 6];
        let mut complete = true;
        for (slot, ability) in scores.iter_mut().zip(Ability::ALL) {
            match reader.integer(
                errors,
                ability.as_str(),
                MIN_ABILITY_SCORE,
                Some(MAX_ABILITY_SCORE),
            ) {
                Some(n) => *slot = n as u8,
                None => complete = false,
            }
        }

        complete.then(|| {
            let [strength, dexterity, constitution, intelligence, wisdom, charisma] = scores;
            Self::new(strength, dexterity, constitution, intelligence, wisdom, charisma)
        })
    }

    fn check(&self, prefix: &str, errors: &mut ValidationErrors) {
        for ability in Ability::ALL {
            check_range(
                errors,
                &field_path(prefix, ability.as_str()),
                i128::from(ability.score(self)),
                MIN_ABILITY_SCORE,
                Some(MAX_ABILITY_SCORE),
            );
        }
    }
}

impl TryFrom<Value> for AbilityScores {
    type Error = ValidationErrors;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        let scores = Self::read(&value, "", &mut errors);
        match scores {
            Some(scores) if errors.is_empty() => Ok(scores),
            _ => Err(errors),
        }
    }
}

impl Validatable for AbilityScores {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();
        self.check("", &mut errors);
        errors.into_result(())
    }
}

/// An item carried by a character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u64,
    pub description: Option<String>,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, quantity: u64) -> Self {
        Self {
            name: name.into(),
            quantity,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn read(value: &Value, prefix: &str, errors: &mut ValidationErrors) -> Option<Self> {
        let reader = match FieldReader::new(value, prefix) {
            Ok(reader) => reader,
            Err(violation) => {
                errors.push(violation);
                return None;
            }
        };

        let name = reader.string(errors, "name");
        if let Some(name) = &name {
            if name.is_empty() {
                errors.push(FieldViolation::Empty {
                    field: reader.path("name"),
                });
            }
        }
        let quantity = reader.integer(errors, "quantity", 0, Some(MAX_COUNT));
        let description = reader.optional_string(errors, "description");

        Some(Self {
            name: name.filter(|n| !n.is_empty())?,
            quantity: quantity? as u64,
            description,
        })
    }

    fn check(&self, prefix: &str, errors: &mut ValidationErrors) {
        if self.name.is_empty() {
            errors.push(FieldViolation::Empty {
                field: field_path(prefix, "name"),
            });
        }
    }
}

impl TryFrom<Value> for InventoryItem {
    type Error = ValidationErrors;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        let item = Self::read(&value, "", &mut errors);
        match item {
            Some(item) if errors.is_empty() => Ok(item),
            _ => Err(errors),
        }
    }
}

/// A player character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Character {
    /// External key; preserved in its original case
    pub name: String,
    pub race: String,
    pub character_class: String,
    pub level: u8,
    pub ability_scores: AbilityScores,
    pub max_hp: u64,
    /// May exceed `max_hp`
    pub current_hp: u64,
    pub inventory: Vec<InventoryItem>,
}

impl Character {
    /// Validate and construct a character from raw JSON, reporting every
    /// violated field.
    pub fn from_value(value: &Value) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();
        let reader = FieldReader::new(value, "").map_err(ValidationErrors::from)?;

        let name = reader.string(&mut errors, "name");
        let race = reader.string(&mut errors, "race");
        let character_class = reader.string(&mut errors, "character_class");
        let level = reader.integer(&mut errors, "level", MIN_LEVEL, Some(MAX_LEVEL));

        let ability_scores = match reader.get("ability_scores") {
            Some(raw) => AbilityScores::read(raw, "ability_scores", &mut errors),
            None => {
                errors.push(FieldViolation::MissingField {
                    field: "ability_scores".to_string(),
                });
                None
            }
        };

        let max_hp = reader.integer(&mut errors, "max_hp", MIN_MAX_HP, Some(MAX_COUNT));
        let current_hp = reader.integer(&mut errors, "current_hp", 0, Some(MAX_COUNT));
        let inventory = Self::read_inventory(&reader, &mut errors);

        match (
            name,
            race,
            character_class,
            level,
            ability_scores,
            max_hp,
            current_hp,
            inventory,
        ) {
            (
                Some(name),
                Some(race),
                Some(character_class),
                Some(level),
                Some(ability_scores),
                Some(max_hp),
                Some(current_hp),
                Some(inventory),
            ) if errors.is_empty() => Ok(Self {
                name,
                race,
                character_class,
                level: level as u8,
                ability_scores,
                max_hp: max_hp as u64,
                current_hp: current_hp as u64,
                inventory,
            }),
            _ => Err(errors),
        }
    }

    fn read_inventory(
        reader: &FieldReader<'_>,
        errors: &mut ValidationErrors,
    ) -> Option<Vec<InventoryItem>> {
        let Some(raw) = reader.get("inventory") else {
            return Some(Vec::new());
        };
        let Some(entries) = raw.as_array() else {
            errors.push(FieldViolation::WrongType {
                field: "inventory".to_string(),
                expected: "a list".to_string(),
            });
            return None;
        };

        let mut items = Vec::with_capacity(entries.len());
        let mut complete = true;
        for (index, entry) in entries.iter().enumerate() {
            match InventoryItem::read(entry, &format!("inventory[{}]", index), errors) {
                Some(item) => items.push(item),
                None => complete = false,
            }
        }
        complete.then_some(items)
    }

    /// Case-insensitive comparison used for update name checks
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }
}

impl TryFrom<Value> for Character {
    type Error = ValidationErrors;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

impl Validatable for Character {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();
        check_range(
            &mut errors,
            "level",
            i128::from(self.level),
            MIN_LEVEL,
            Some(MAX_LEVEL),
        );
        self.ability_scores.check("ability_scores", &mut errors);
        check_range(&mut errors, "max_hp", i128::from(self.max_hp), MIN_MAX_HP, None);
        for (index, item) in self.inventory.iter().enumerate() {
            item.check(&format!("inventory[{}]", index), &mut errors);
        }
        errors.into_result(())
    }
}
