//! Simple lookup tables referenced by `Species` (spec.md §3): growth
//! habit and flower/fruit colour. Grounded on `Habit` / `Color` in
//! `original_source/bauble/plugins/plants/species_model.py`, both plain
//! name+code lookup rows with no further behaviour.

use crate::error::{BotanicError, Result};
use serde::{Deserialize, Serialize};

pub type HabitId = i64;
pub type ColorId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub id: ColorId,
    pub code: String,
    pub name: String,
}

macro_rules! lookup_ctor {
    ($ty:ident) => {
        impl $ty {
            pub fn create(code: &str, name: &str) -> Result<Self> {
                let code = code.trim().to_string();
                let name = name.trim().to_string();
                if code.is_empty() || name.is_empty() {
                    return Err(BotanicError::validation(concat!(
                        stringify!($ty),
                        " requires both a code and a name"
                    )));
                }
                Ok($ty { id: 0, code, name })
            }
        }
    };
}

lookup_ctor!(Habit);
lookup_ctor!(Color);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn habit_requires_code_and_name() {
        assert!(Habit::create("", "Tree").is_err());
        assert!(Habit::create("T", "Tree").is_ok());
    }

    #[test]
    fn color_requires_code_and_name() {
        assert!(Color::create("RD", "Red").is_ok());
    }
}
