//! Menu, cook roster and apparatus inventory.

use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::{ApparatusSpec, CookProfile, Food, KitchenError, Menu};

/// `menu.json`.
pub const MENU_FILE: &str = "menu.json";
/// `cooks.json`.
pub const COOKS_FILE: &str = "cooks.json";
/// `apparatuses.json`.
pub const APPARATUSES_FILE: &str = "apparatuses.json";

#[derive(Deserialize)]
struct MenuFile {
    foods: Vec<Food>,
}

#[derive(Deserialize)]
struct CooksFile {
    cooks: Vec<CookProfile>,
}

#[derive(Deserialize)]
struct ApparatusesFile {
    apparatuses: Vec<ApparatusSpec>,
}

/// Static data the kitchen is started with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Foods by 1-based id.
    pub menu: Menu,
    /// Cook roster; position is the cook id.
    pub cooks: Vec<CookProfile>,
    /// Apparatus inventory.
    pub apparatuses: Vec<ApparatusSpec>,
}

impl ReferenceData {
    /// Load the three reference files from `dir` and validate them.
    ///
    /// # Errors
    ///
    /// `ReferenceData` naming the offending file on any read, parse or
    /// validation failure.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, KitchenError> {
        let dir = dir.as_ref();
        let menu: MenuFile = read_json(&dir.join(MENU_FILE))?;
        let cooks: CooksFile = read_json(&dir.join(COOKS_FILE))?;
        let apparatuses: ApparatusesFile = read_json(&dir.join(APPARATUSES_FILE))?;
        let data = Self {
            menu: Menu::new(menu.foods),
            cooks: cooks.cooks,
            apparatuses: apparatuses.apparatuses,
        };
        data.validate().map_err(KitchenError::ReferenceData)?;
        tracing::info!(
            foods = data.menu.len(),
            cooks = data.cooks.len(),
            apparatuses = data.apparatuses.len(),
            dir = %dir.display(),
            "reference data loaded"
        );
        Ok(data)
    }

    /// Check ids, ranks and quantities.
    pub fn validate(&self) -> Result<(), String> {
        if self.menu.is_empty() {
            return Err("menu has no foods".into());
        }
        for (index, food) in self.menu.foods.iter().enumerate() {
            let expected = u32::try_from(index + 1).map_err(|_| "menu too large".to_string())?;
            if food.id != expected {
                return Err(format!("food `{}` has id {}, expected {expected}", food.name, food.id));
            }
            if food.preparation_time == 0 {
                return Err(format!("food {} has zero preparation_time", food.id));
            }
            if food.complexity == 0 {
                return Err(format!("food {} has zero complexity", food.id));
            }
        }
        if self.cooks.is_empty() {
            return Err("at least one cook must be defined".into());
        }
        for (id, cook) in self.cooks.iter().enumerate() {
            if cook.rank == 0 || cook.proficiency == 0 {
                return Err(format!("cook {id} needs positive rank and proficiency"));
            }
        }
        let mut names = HashSet::new();
        for apparatus in &self.apparatuses {
            if apparatus.quantity == 0 {
                return Err(format!("apparatus `{}` has zero quantity", apparatus.name));
            }
            if !names.insert(apparatus.name.as_str()) {
                return Err(format!("apparatus `{}` listed twice", apparatus.name));
            }
        }
        for food in &self.menu.foods {
            if let Some(name) = &food.cooking_apparatus {
                if !names.contains(name.as_str()) {
                    tracing::warn!(
                        food_id = food.id,
                        apparatus = %name,
                        "food names an unknown apparatus"
                    );
                }
            }
        }
        Ok(())
    }

    /// Highest rank on the roster.
    #[must_use]
    pub fn max_rank(&self) -> u32 {
        self.cooks.iter().map(|c| c.rank).max().unwrap_or(0)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, KitchenError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| KitchenError::ReferenceData(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| KitchenError::ReferenceData(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(id: u32, complexity: u32, apparatus: Option<&str>) -> Food {
        Food {
            id,
            name: format!("food-{id}"),
            preparation_time: 5,
            complexity,
            cooking_apparatus: apparatus.map(Into::into),
        }
    }

    fn data() -> ReferenceData {
        ReferenceData {
            menu: Menu::new(vec![food(1, 1, None), food(2, 3, Some("oven"))]),
            cooks: vec![CookProfile {
                rank: 3,
                proficiency: 2,
                name: "Head".into(),
                catch_phrase: String::new(),
            }],
            apparatuses: vec![ApparatusSpec {
                name: "oven".into(),
                quantity: 2,
            }],
        }
    }

    #[test]
    fn valid_data_passes() {
        assert!(data().validate().is_ok());
        assert_eq!(data().max_rank(), 3);
    }

    #[test]
    fn non_contiguous_ids_fail() {
        let mut d = data();
        d.menu.foods[1].id = 5;
        assert!(d.validate().unwrap_err().contains("expected 2"));
    }

    #[test]
    fn duplicate_apparatus_fails() {
        let mut d = data();
        d.apparatuses.push(d.apparatuses[0].clone());
        assert!(d.validate().unwrap_err().contains("twice"));
    }

    #[test]
    fn empty_roster_fails() {
        let mut d = data();
        d.cooks.clear();
        assert!(d.validate().is_err());
    }
}
