//! Recipe store seam.
//!
//! The tool catalog (tool id -> install recipe) is owned by another
//! subsystem; the engine reads it through this trait. `StaticRecipes` is the
//! in-memory form hosting layers usually build from the catalog's JSON.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use remedy_common::Recipe;

/// Read-only access to the external tool catalog.
pub trait RecipeStore {
    fn get(&self, tool_id: &str) -> Option<&Recipe>;

    /// Whether `tool_id` is a catalogued tool at all.
    fn contains(&self, tool_id: &str) -> bool {
        self.get(tool_id).is_some()
    }
}

/// A store with no recipes. Diagnosis still works; recipe-dependent checks
/// are simply skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRecipes;

impl RecipeStore for EmptyRecipes {
    fn get(&self, _tool_id: &str) -> Option<&Recipe> {
        None
    }
}

/// In-memory recipe map.
#[derive(Debug, Clone, Default)]
pub struct StaticRecipes {
    recipes: HashMap<String, Recipe>,
}

impl StaticRecipes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tool_id: &str, recipe: Recipe) {
        self.recipes.insert(tool_id.to_string(), recipe);
    }

    /// Parse a `{tool_id: recipe}` JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let recipes: HashMap<String, Recipe> =
            serde_json::from_str(json).context("Failed to parse recipe catalog JSON")?;
        Ok(Self { recipes })
    }

    /// Load a `{tool_id: recipe}` JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe catalog {}", path.display()))?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl RecipeStore for StaticRecipes {
    fn get(&self, tool_id: &str) -> Option<&Recipe> {
        self.recipes.get(tool_id)
    }
}
