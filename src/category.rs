//! Fixed category registry for the attraction directory.
//!
//! The three categories and their priority order are part of the product
//! contract: search scans them in this order and ties in proximity search
//! break on it. Numeric identifiers belong to the storage schema and are
//! carried here as configuration, never invented.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The three attraction categories, in fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Fun,
    Hotels,
}

impl Category {
    /// Fixed scan order used wherever multiple categories must be walked
    /// deterministically.
    pub fn priority_order() -> [Category; 3] {
        [Category::Food, Category::Fun, Category::Hotels]
    }

    /// Case-insensitive parse of a category name.
    pub fn parse(name: &str) -> Option<Category> {
        match name.trim().to_lowercase().as_str() {
            "food" => Some(Category::Food),
            "fun" => Some(Category::Fun),
            "hotels" => Some(Category::Hotels),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Fun => "fun",
            Category::Hotels => "hotels",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from category names to the numeric identifiers the directory
/// store's schema uses. Total by construction: unknown names resolve to the
/// configured fallback id.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryIds {
    #[serde(default = "default_id_table")]
    table: HashMap<String, u32>,
    #[serde(default = "default_fallback_id")]
    fallback: u32,
}

fn default_id_table() -> HashMap<String, u32> {
    HashMap::from([
        ("food".to_string(), 1),
        ("fun".to_string(), 2),
        ("hotels".to_string(), 3),
    ])
}

fn default_fallback_id() -> u32 {
    1
}

impl Default for CategoryIds {
    fn default() -> Self {
        Self {
            table: default_id_table(),
            fallback: default_fallback_id(),
        }
    }
}

impl CategoryIds {
    /// Resolve a category name to its storage identifier, case-insensitively.
    /// Never fails; unrecognized names get the fallback id.
    pub fn resolve(&self, category_name: &str) -> u32 {
        let key = category_name.trim().to_lowercase();
        self.table.get(&key).copied().unwrap_or(self.fallback)
    }

    /// Reverse lookup for the storage boundary, where payloads carry the
    /// numeric identifier. Unknown ids resolve to the fallback id's name.
    pub fn name_for(&self, id: u32) -> String {
        self.table
            .iter()
            .find(|(_, v)| **v == id)
            .or_else(|| self.table.iter().find(|(_, v)| **v == self.fallback))
            .map(|(k, _)| k.clone())
            .unwrap_or_else(|| "food".to_string())
    }
}

/// User-controlled filter restricting which categories are searchable and
/// visible on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCategories {
    pub food: bool,
    pub fun: bool,
    pub hotels: bool,
}

impl Default for ActiveCategories {
    fn default() -> Self {
        Self::all()
    }
}

impl ActiveCategories {
    pub fn all() -> Self {
        Self {
            food: true,
            fun: true,
            hotels: true,
        }
    }

    pub fn none() -> Self {
        Self {
            food: false,
            fun: false,
            hotels: false,
        }
    }

    pub fn is_active(&self, category: Category) -> bool {
        match category {
            Category::Food => self.food,
            Category::Fun => self.fun,
            Category::Hotels => self.hotels,
        }
    }

    pub fn activate(&mut self, category: Category) {
        match category {
            Category::Food => self.food = true,
            Category::Fun => self.fun = true,
            Category::Hotels => self.hotels = true,
        }
    }

    pub fn toggle(&mut self, category: Category) {
        match category {
            Category::Food => self.food = !self.food,
            Category::Fun => self.fun = !self.fun,
            Category::Hotels => self.hotels = !self.hotels,
        }
    }
}
