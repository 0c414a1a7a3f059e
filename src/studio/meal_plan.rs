//! Meal Planner ("Nutri-AI")
//!
//! One-day plan (breakfast, lunch, dinner) picked from the menu, with a
//! motivating summary and estimated daily totals.

use serde::{Deserialize, Serialize};

use super::menu::{find_item, menu_listing};
use super::or_none;
use crate::ai::{CompletionGateway, PromptBuilder, SchemaDescriptor};
use crate::types::{Result, TaazaError};

/// Planner form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealPlanRequest {
    pub dietary_preferences: Vec<String>,
    pub health_goal: String,
    pub dislikes: String,
    pub nutritional_goals: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealChoice {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotals {
    /// Range, e.g. `1450-1550 kcal`
    pub calories: String,
    /// Approximation, e.g. `~105g`
    pub protein: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub breakfast: MealChoice,
    pub lunch: MealChoice,
    pub dinner: MealChoice,
    pub summary: String,
    pub daily_totals: DailyTotals,
}

impl MealPlan {
    pub fn meals(&self) -> [(&'static str, &MealChoice); 3] {
        [
            ("Breakfast", &self.breakfast),
            ("Lunch", &self.lunch),
            ("Dinner", &self.dinner),
        ]
    }

    /// Meals whose name is not on the menu
    pub fn off_menu_meals(&self) -> Vec<&str> {
        self.meals()
            .iter()
            .filter(|(_, meal)| find_item(&meal.name).is_none())
            .map(|(_, meal)| meal.name.as_str())
            .collect()
    }
}

pub fn system_instruction() -> String {
    PromptBuilder::new()
        .persona(
            "You are \"Nutri-AI,\" a highly efficient and brilliant personal nutritionist from Taazabites. \
             Your primary goal is to quickly and accurately generate a 1-day meal plan (Breakfast, Lunch, Dinner) \
             using *only* meals from the provided Taazabites Menu. Do not suggest any external food items.",
        )
        .section("Taazabites Menu (Source of Truth)", &menu_listing())
        .rule("Strictly Adhere to Menu", "Only select meals from the list above.")
        .rule(
            "Calculate Totals Accurately",
            "Sum the nutritional values for the selected meals. Present total calories as a range \
             (e.g., '1450-1550 kcal') and total protein as an approximation (e.g., '~105g').",
        )
        .rule(
            "Follow User Preferences",
            "Adhere strictly to the user's dietary preferences, goals, and dislikes.",
        )
        .rule(
            "Be Encouraging",
            "Maintain a cheerful, motivating tone. Provide a short, uplifting reason for each meal choice.",
        )
        .rule(
            "Summarize Powerfully",
            "End with a single, motivating summary sentence.",
        )
        .json_only("object")
        .build()
}

pub fn user_prompt(request: &MealPlanRequest) -> String {
    let preferences = if request.dietary_preferences.is_empty() {
        "None".to_string()
    } else {
        request.dietary_preferences.join(", ")
    };

    format!(
        "Create a 1-day plan for a user with these preferences:\n\
         - Dietary Preference: {}\n\
         - Health Goal: {}\n\
         - Specific Nutritional Goals: {}\n\
         - Dislikes/Allergies: {}",
        preferences,
        or_none(&request.health_goal),
        or_none(&request.nutritional_goals),
        or_none(&request.dislikes)
    )
}

pub fn schema() -> SchemaDescriptor {
    let meal = || {
        SchemaDescriptor::object()
            .required(
                "name",
                SchemaDescriptor::string("Name of the meal from the Taazabites Menu."),
            )
            .required(
                "reason",
                SchemaDescriptor::string("A brief, encouraging reason for choosing this meal."),
            )
    };

    SchemaDescriptor::object()
        .required("breakfast", meal())
        .required("lunch", meal())
        .required("dinner", meal())
        .required(
            "summary",
            SchemaDescriptor::string(
                "A single encouraging sentence summarizing the plan's benefits.",
            ),
        )
        .required(
            "dailyTotals",
            SchemaDescriptor::object()
                .required(
                    "calories",
                    SchemaDescriptor::string(
                        "Estimated total calories for the day, as a range. e.g., '1500-1600 kcal'",
                    ),
                )
                .required(
                    "protein",
                    SchemaDescriptor::string("Estimated total protein for the day. e.g., '~120g'"),
                ),
        )
}

pub async fn generate_meal_plan(
    gateway: &CompletionGateway,
    request: &MealPlanRequest,
) -> Result<MealPlan> {
    if request.health_goal.trim().is_empty() {
        return Err(TaazaError::InvalidRequest(
            "Please choose a health goal.".to_string(),
        ));
    }

    let plan: MealPlan = gateway
        .complete_json_as(&user_prompt(request), &system_instruction(), &schema())
        .await?;

    let off_menu = plan.off_menu_meals();
    if !off_menu.is_empty() {
        tracing::warn!(meals = ?off_menu, "Meal plan includes dishes not on the menu");
    }

    Ok(plan)
}
