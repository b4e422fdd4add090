//! TheMealDB record transformation
//!
//! TheMealDB exposes ingredients as twenty numbered `strIngredientN` /
//! `strMeasureN` pairs and instructions as one free-text blob. This module
//! turns those records into normalized [`Recipe`]s.

use once_cell::sync::Lazy;
use recipe_types::{Difficulty, Provenance, Recipe, RecipeId};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Number of positional ingredient/measure slots on a record
pub const INGREDIENT_SLOTS: usize = 20;

pub const DEFAULT_PREP_TIME: &str = "15 minutes";
pub const DEFAULT_COOK_TIME: &str = "30 minutes";
pub const DEFAULT_CUISINE: &str = "Unknown";

/// Fragments of this many characters or fewer are not steps
const MIN_STEP_CHARS: usize = 10;
const MAX_FALLBACK_STEPS: usize = 10;

/// Body of `search.php`
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub meals: Option<Vec<Meal>>,
}

/// One TheMealDB record, kept as raw JSON so a single odd field cannot fail
/// the whole response
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct Meal {
    pub fields: HashMap<String, Value>,
}

impl Meal {
    /// Strings as-is, numbers and booleans rendered as text
    fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<String> {
        self.text("idMeal")
    }

    pub fn title(&self) -> Option<String> {
        self.text("strMeal")
    }

    pub fn area(&self) -> Option<String> {
        self.text("strArea")
    }

    pub fn instructions(&self) -> Option<&str> {
        self.field("strInstructions")
    }

    pub fn ingredient(&self, slot: usize) -> Option<&str> {
        self.field(&format!("strIngredient{}", slot))
    }

    pub fn measure(&self, slot: usize) -> Option<&str> {
        self.field(&format!("strMeasure{}", slot))
    }
}

/// Convert a TheMealDB record into a normalized recipe
pub fn transform(meal: &Meal) -> Recipe {
    let ingredients = extract_ingredients(meal);
    let steps = parse_steps(meal.instructions().unwrap_or_default());
    let difficulty = Difficulty::from_complexity(ingredients.len(), steps.len());

    Recipe {
        id: RecipeId::External(meal.id().unwrap_or_default()),
        title: meal.title().unwrap_or_default(),
        ingredients,
        steps,
        prep_time: DEFAULT_PREP_TIME.to_string(),
        cook_time: DEFAULT_COOK_TIME.to_string(),
        difficulty,
        cuisine: meal.area().unwrap_or_else(|| DEFAULT_CUISINE.to_string()),
        source: Some(Provenance::MealDb),
    }
}

/// Collect `"<measure> <ingredient>"` entries in slot order
pub fn extract_ingredients(meal: &Meal) -> Vec<String> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let ingredient = meal.ingredient(slot)?.trim();
            if ingredient.is_empty() || ingredient == "null" {
                return None;
            }
            let measure = meal.measure(slot).map(str::trim).unwrap_or_default();
            if measure.is_empty() {
                Some(ingredient.to_string())
            } else {
                Some(format!("{} {}", measure, ingredient))
            }
        })
        .collect()
}

/// A way of cutting instructions into steps at explicit markers
struct StepStrategy {
    pattern: Regex,
}

impl StepStrategy {
    fn new(pattern: &str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("step pattern is valid"),
        }
    }

    /// Fragments after the first marker, or `None` if nothing qualifies
    fn extract(&self, text: &str) -> Option<Vec<String>> {
        let steps: Vec<String> = self
            .pattern
            .split(text)
            .skip(1)
            .map(str::trim)
            .filter(|s| is_substantial(s))
            .map(String::from)
            .collect();

        (!steps.is_empty()).then_some(steps)
    }
}

/// Most specific first
static STEP_STRATEGIES: Lazy<Vec<StepStrategy>> = Lazy::new(|| {
    vec![
        // STEP 1:, STEP 2 ...
        StepStrategy::new(r"(?im)STEP\s+\d+[:\s]*"),
        // 1. 2. ...
        StepStrategy::new(r"(?im)\d+\.\s*"),
        // lines opening with a sentence
        StepStrategy::new(r"(?im)^\s*[A-Z][^.]*\."),
    ]
});

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid pattern"));

fn is_substantial(fragment: &str) -> bool {
    fragment.chars().count() > MIN_STEP_CHARS
}

/// Split free-text instructions into steps
pub fn parse_steps(instructions: &str) -> Vec<String> {
    if instructions.is_empty() {
        return Vec::new();
    }

    let text = instructions.replace("\r\n", "\n").replace('\r', "\n");

    if let Some(steps) = STEP_STRATEGIES.iter().find_map(|s| s.extract(&text)) {
        return steps;
    }

    SENTENCE_END
        .split(&text)
        .map(str::trim)
        .filter(|s| is_substantial(s))
        .take(MAX_FALLBACK_STEPS)
        .map(String::from)
        .collect()
}
