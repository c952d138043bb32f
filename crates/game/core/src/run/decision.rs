//! Decision points handed to the chooser.

use core::fmt;

use crate::skills::SkillKind;
use crate::stats::StatKind;

/// What the run is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChoiceKind {
    LevelUpStat,
    LearnSkill,
    UsePotion,
    InventoryFull,
    Shop,
}

/// One selectable answer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChoiceOption {
    /// Upgrade one base stat.
    Stat(StatKind),
    Skill(SkillKind),
    /// Drink the potion in `slot` before the fight.
    Potion { slot: usize, name: String },
    /// Start the fight.
    Fight,
    /// Swap the incoming item into `slot`, dropping the current occupant.
    Replace { slot: usize, name: String },
    /// Drop the incoming item.
    Discard,
    Buy {
        index: usize,
        name: String,
        price: u32,
    },
    Leave,
}

impl fmt::Display for ChoiceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceOption::Stat(stat) => write!(f, "Upgrade {stat}"),
            ChoiceOption::Skill(skill) => write!(f, "{skill}: {}", skill.description()),
            ChoiceOption::Potion { name, .. } => write!(f, "Drink {name}"),
            ChoiceOption::Fight => f.write_str("Fight"),
            ChoiceOption::Replace { name, .. } => write!(f, "Replace {name}"),
            ChoiceOption::Discard => f.write_str("Discard"),
            ChoiceOption::Buy { name, price, .. } => write!(f, "Buy {name} for {price}g"),
            ChoiceOption::Leave => f.write_str("Leave"),
        }
    }
}

/// A pause in the run: `kind` plus the valid options, answered by index.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub kind: ChoiceKind,
    pub prompt: String,
    pub options: Vec<ChoiceOption>,
}

impl Decision {
    pub fn new(kind: ChoiceKind, prompt: impl Into<String>, options: Vec<ChoiceOption>) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
            options,
        }
    }

    pub fn option(&self, index: usize) -> Option<&ChoiceOption> {
        self.options.get(index)
    }
}
