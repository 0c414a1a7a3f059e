//! Widget Studio
//!
//! Prompt, schema and result types for every AI widget on the site.
//! Each widget builds a deterministic system instruction and user prompt,
//! makes exactly one gateway call, and returns typed content.
//!
//! Widgets that must never leave the page empty (testimonials, ingredient
//! spotlight, hero copy) also offer a `*_or_fallback` form that swaps in
//! static content when generation fails.

pub mod how_it_works;
pub mod hero;
pub mod meal_plan;
pub mod menu;
pub mod meta;
pub mod search;
pub mod spotlight;
pub mod suggestion;
pub mod testimonials;
pub mod workout;

pub use how_it_works::{Step, generate_how_it_works};
pub use hero::{HeroCopy, default_hero_copy, generate_hero_copies, hero_rotation};
pub use meal_plan::{DailyTotals, MealChoice, MealPlan, MealPlanRequest, generate_meal_plan};
pub use menu::{MENU, MenuItem, find_item, menu_listing};
pub use meta::{MetaDescription, generate_meta_description};
pub use search::generate_search_answer;
pub use spotlight::{IngredientSpotlight, generate_spotlight, spotlight_or_fallback};
pub use suggestion::{MenuSuggestion, generate_menu_suggestion};
pub use testimonials::{Testimonial, generate_testimonials, testimonials_or_fallback};
pub use workout::{
    Exercise, RecommendedMeal, WorkoutPlan, generate_exercise_alternative, generate_workout_plan,
    swap_exercise,
};

use crate::types::{Result, TaazaError};

/// Generated content, or static content shown in its place
#[derive(Debug, Clone, PartialEq)]
pub enum Generated<T> {
    Fresh(T),
    Fallback {
        content: T,
        /// Inline notice for the page, if any
        notice: Option<String>,
    },
}

impl<T> Generated<T> {
    pub fn content(&self) -> &T {
        match self {
            Self::Fresh(content) | Self::Fallback { content, .. } => content,
        }
    }

    pub fn into_content(self) -> T {
        match self {
            Self::Fresh(content) | Self::Fallback { content, .. } => content,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Fresh(_) => None,
            Self::Fallback { notice, .. } => notice.as_deref(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Reject blank user input before it reaches the gateway
fn require_input(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TaazaError::InvalidRequest(format!(
            "{} must not be empty.",
            field
        )));
    }
    Ok(())
}

/// `"None"` for blank optional inputs
fn or_none(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() { "None" } else { trimmed }
}
