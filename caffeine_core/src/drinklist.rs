//! The user's custom drink list, persisted with file locking.
//!
//! Custom drinks are merged over the default catalog when logging, so a
//! user entry with the same name replaces the built-in one.

use crate::{DrinkCatalog, DrinkOption, Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Custom drinks saved by the user
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UserDrinkList {
    pub drinks: Vec<DrinkOption>,
}

impl UserDrinkList {
    /// Load the drink list with shared locking
    ///
    /// Returns an empty list if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No custom drink list found, using defaults only");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open drink list {:?}: {}. Ignoring it.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock drink list {:?}: {}. Ignoring it.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read drink list {:?}: {}. Ignoring it.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<UserDrinkList>(&contents) {
            Ok(list) => {
                tracing::debug!("Loaded {} custom drinks from {:?}", list.drinks.len(), path);
                Ok(list)
            }
            Err(e) => {
                tracing::warn!("Failed to parse drink list {:?}: {}. Ignoring it.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save the drink list atomically (temp file, fsync, rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "drink list path missing parent")
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} custom drinks to {:?}", self.drinks.len(), path);
        Ok(())
    }

    /// Add a custom drink
    ///
    /// Rejects empty names, negative values, and an exact duplicate
    /// (same name, caffeine and cost). A drink that only shares the name is
    /// allowed.
    pub fn add(&mut self, drink: DrinkOption) -> Result<()> {
        let name = drink.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::Catalog("drink name is empty".into()));
        }
        if !drink.caffeine_mg.is_finite() || drink.caffeine_mg < 0.0 {
            return Err(Error::Catalog(format!(
                "invalid caffeine amount {} for '{}'",
                drink.caffeine_mg, name
            )));
        }
        if !drink.cost.is_finite() || drink.cost < 0.0 {
            return Err(Error::Catalog(format!("invalid cost {} for '{}'", drink.cost, name)));
        }

        let drink = DrinkOption { name, ..drink };
        if self.drinks.contains(&drink) {
            return Err(Error::Catalog(format!(
                "'{}' with the same caffeine and cost already exists",
                drink.name
            )));
        }

        tracing::info!("Added custom drink '{}'", drink.name);
        self.drinks.push(drink);
        Ok(())
    }

    /// Load the list, modify it, and save it back
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut UserDrinkList) -> Result<()>,
    {
        let mut list = Self::load(path)?;
        f(&mut list)?;
        list.save(path)?;
        Ok(list)
    }

    /// The catalog to log from: custom drinks over `base`
    pub fn catalog(&self, base: &DrinkCatalog) -> DrinkCatalog {
        DrinkCatalog::merged(&self.drinks, base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_default_catalog;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("drinks.json");

        let mut list = UserDrinkList::default();
        list.add(DrinkOption::new("Cold Brew", 150.0, 180.0)).unwrap();
        list.save(&path).unwrap();

        let loaded = UserDrinkList::load(&path).unwrap();
        assert_eq!(loaded, list);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let list = UserDrinkList::load(&temp_dir.path().join("none.json")).unwrap();
        assert!(list.drinks.is_empty());
    }

    #[test]
    fn test_corrupted_list_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("drinks.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let list = UserDrinkList::load(&path).unwrap();
        assert!(list.drinks.is_empty());
    }

    #[test]
    fn test_exact_duplicate_rejected() {
        let mut list = UserDrinkList::default();
        list.add(DrinkOption::new("Cold Brew", 150.0, 180.0)).unwrap();

        let err = list.add(DrinkOption::new("  Cold Brew ", 150.0, 180.0));
        assert!(matches!(err, Err(Error::Catalog(_))));

        // Same name, different caffeine is a separate drink
        list.add(DrinkOption::new("Cold Brew", 200.0, 180.0)).unwrap();
        assert_eq!(list.drinks.len(), 2);
    }

    #[test]
    fn test_invalid_drinks_rejected() {
        let mut list = UserDrinkList::default();
        assert!(list.add(DrinkOption::new("", 10.0, 1.0)).is_err());
        assert!(list.add(DrinkOption::new("Bad", -10.0, 1.0)).is_err());
        assert!(list.add(DrinkOption::new("Bad", 10.0, f64::NAN)).is_err());
        assert!(list.drinks.is_empty());
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("drinks.json");

        UserDrinkList::update(&path, |list| {
            list.add(DrinkOption::new("Cortado", 85.0, 120.0))
        })
        .unwrap();

        let loaded = UserDrinkList::load(&path).unwrap();
        assert_eq!(loaded.drinks[0].name, "Cortado");
    }

    #[test]
    fn test_catalog_overrides_default_by_name() {
        let mut list = UserDrinkList::default();
        list.add(DrinkOption::new("Green Tea (240 ml)", 45.0, 30.0)).unwrap();

        let catalog = list.catalog(&build_default_catalog());
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.caffeine_for("Green Tea (240 ml)"), 45.0);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("drinks.json");

        UserDrinkList::default().save(&path).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "drinks.json")
            .collect();
        assert!(extras.is_empty(), "found extras: {:?}", extras);
    }
}
