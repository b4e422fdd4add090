//! Recipe types

use serde::{Deserialize, Serialize};

/// Recipe identifier.
///
/// Locally owned recipes carry an integer assigned by the store; recipes
/// materialized from an external source keep that source's native string id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeId {
    Local(i64),
    External(String),
}

impl RecipeId {
    /// The local id, if this recipe is owned by the store
    pub fn as_local(&self) -> Option<i64> {
        match self {
            RecipeId::Local(id) => Some(*id),
            RecipeId::External(_) => None,
        }
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipeId::Local(id) => write!(f, "{}", id),
            RecipeId::External(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for RecipeId {
    fn from(id: i64) -> Self {
        RecipeId::Local(id)
    }
}

/// Recipe difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Infer difficulty from the combined ingredient and step count.
    pub fn from_complexity(ingredient_count: usize, step_count: usize) -> Self {
        match ingredient_count + step_count {
            0..=8 => Difficulty::Easy,
            9..=15 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// Where a search result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Owned by the local store
    Internal,
    /// Fetched from TheMealDB
    MealDb,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Internal => write!(f, "internal"),
            Provenance::MealDb => write!(f, "mealdb"),
        }
    }
}

/// Normalized recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(rename = "prepTime")]
    pub prep_time: String,
    #[serde(rename = "cookTime")]
    pub cook_time: String,
    pub difficulty: Difficulty,
    pub cuisine: String,
    /// Only set on search results; stored records carry no provenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Provenance>,
}

impl Recipe {
    /// Build a stored recipe from a draft and its assigned id
    pub fn from_draft(id: impl Into<RecipeId>, draft: RecipeDraft) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            ingredients: draft.ingredients,
            steps: draft.steps,
            prep_time: draft.prep_time,
            cook_time: draft.cook_time,
            difficulty: draft.difficulty,
            cuisine: draft.cuisine,
            source: None,
        }
    }

    pub fn with_source(mut self, source: Provenance) -> Self {
        self.source = Some(source);
        self
    }
}

/// Create/update payload: every recipe field except `id` and `source`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(rename = "prepTime")]
    pub prep_time: String,
    #[serde(rename = "cookTime")]
    pub cook_time: String,
    pub difficulty: Difficulty,
    pub cuisine: String,
}
