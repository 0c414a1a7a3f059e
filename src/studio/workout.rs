//! Workout Coach ("Fit-AI")
//!
//! No-equipment home workout with a post-workout meal from the menu, and
//! single-exercise swaps that avoid anything already in the plan.

use serde::{Deserialize, Serialize};

use super::menu::menu_listing;
use super::require_input;
use crate::ai::{CompletionGateway, PromptBuilder, SchemaDescriptor};
use crate::types::{Result, TaazaError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    /// Time (`30 seconds`) or reps (`12 reps`)
    pub duration: String,
    pub instructions: String,
    pub tip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedMeal {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub workout_name: String,
    pub description: String,
    pub exercises: Vec<Exercise>,
    pub recommended_meal: RecommendedMeal,
}

fn exercise_schema() -> SchemaDescriptor {
    SchemaDescriptor::object()
        .required("name", SchemaDescriptor::string("The name of the exercise."))
        .required(
            "duration",
            SchemaDescriptor::string(
                "The duration (e.g., '30 seconds') or rep count (e.g., '12 reps').",
            ),
        )
        .required(
            "instructions",
            SchemaDescriptor::string(
                "Simple, step-by-step instructions on how to perform the exercise.",
            ),
        )
        .required(
            "tip",
            SchemaDescriptor::string(
                "A brief, actionable tip for proper form or a simple variation (e.g., 'Keep your back straight').",
            ),
        )
}

pub fn plan_schema() -> SchemaDescriptor {
    SchemaDescriptor::object()
        .required(
            "workoutName",
            SchemaDescriptor::string("A catchy name for the workout plan."),
        )
        .required(
            "description",
            SchemaDescriptor::string(
                "A brief, motivating description of the workout and its benefits.",
            ),
        )
        .required(
            "exercises",
            SchemaDescriptor::array_of(exercise_schema())
                .describe("A list of 4-6 exercises for the workout plan."),
        )
        .required(
            "recommendedMeal",
            SchemaDescriptor::object()
                .required(
                    "name",
                    SchemaDescriptor::string(
                        "The name of the recommended post-workout meal from the Taazabites menu.",
                    ),
                )
                .required(
                    "reason",
                    SchemaDescriptor::string(
                        "A brief reason why this meal is a good post-workout choice.",
                    ),
                ),
        )
}

pub fn plan_instruction() -> String {
    PromptBuilder::new()
        .persona(
            "You are \"Fit-AI,\" an expert AI fitness coach for Taazabites. Your role is to generate a simple, \
             effective, and encouraging \"no-equipment\" home workout plan. Additionally, you must recommend \
             ONE suitable post-workout meal from the Taazabites menu provided.",
        )
        .section("Taazabites Menu (for meal recommendation)", &menu_listing())
        .rule("No Equipment", "The workout must only use bodyweight exercises.")
        .rule(
            "Beginner Friendly",
            "Assume the user is a beginner. Keep instructions simple and clear.",
        )
        .rule(
            "Complement Meals",
            "The workout should be positioned as a perfect complement to a healthy diet from Taazabites.",
        )
        .rule(
            "Structure",
            "The plan should include a workout name, a brief motivating description, and a list of 4-6 exercises.",
        )
        .rule(
            "Exercise Details",
            "Each exercise must have a name, a duration/rep count (e.g., \"30 seconds\", \"15 reps\"), simple \
             step-by-step instructions, and a short, actionable 'tip' for proper form (e.g., 'Keep your back straight').",
        )
        .rule(
            "Recommend Meal",
            "Select one meal from the menu that is suitable for post-workout recovery (e.g., high in protein).",
        )
        .json_only("object")
        .build()
}

pub fn plan_prompt(goal: &str) -> String {
    format!(
        "Generate a no-equipment workout plan for a user whose health goal is: \"{}\".",
        goal.trim()
    )
}

pub fn alternative_instruction(goal: &str, current: &[Exercise], to_replace: &str) -> String {
    let existing: Vec<&str> = current.iter().map(|e| e.name.as_str()).collect();

    PromptBuilder::new()
        .persona(
            "You are \"Fit-AI,\" an expert AI fitness coach. Your role is to suggest a single, effective, \
             \"no-equipment\" home workout exercise as an alternative.",
        )
        .rule("No Equipment", "The exercise must only use bodyweight.")
        .rule(
            "Beginner Friendly",
            "The exercise must be suitable for a beginner.",
        )
        .rule(
            "Provide an Alternative",
            &format!("The user wants to replace the exercise: \"{}\".", to_replace),
        )
        .rule(
            "Be Unique",
            &format!(
                "The new exercise MUST NOT be one of the following already in their plan: {}.",
                existing.join(", ")
            ),
        )
        .rule(
            "Relevant to Goal",
            &format!(
                "The exercise should align with the user's primary goal: \"{}\".",
                goal.trim()
            ),
        )
        .rule(
            "Include Tip",
            "The exercise must include a short, actionable 'tip' for proper form or a simple variation.",
        )
        .json_only("object")
        .build()
}

pub fn alternative_prompt(goal: &str, to_replace: &str) -> String {
    format!(
        "Suggest a unique, no-equipment exercise to replace \"{}\" for someone whose goal is \"{}\". \
         The new exercise cannot be any of the ones they already have in their plan.",
        to_replace,
        goal.trim()
    )
}

pub async fn generate_workout_plan(gateway: &CompletionGateway, goal: &str) -> Result<WorkoutPlan> {
    require_input(goal, "Goal")?;
    gateway
        .complete_json_as(&plan_prompt(goal), &plan_instruction(), &plan_schema())
        .await
}

pub async fn generate_exercise_alternative(
    gateway: &CompletionGateway,
    goal: &str,
    current: &[Exercise],
    to_replace: &str,
) -> Result<Exercise> {
    require_input(goal, "Goal")?;
    require_input(to_replace, "Exercise to replace")?;

    let exercise: Exercise = gateway
        .complete_json_as(
            &alternative_prompt(goal, to_replace),
            &alternative_instruction(goal, current, to_replace),
            &exercise_schema(),
        )
        .await?;

    if current
        .iter()
        .any(|e| e.name.eq_ignore_ascii_case(exercise.name.trim()))
    {
        tracing::warn!(exercise = %exercise.name, "Alternative duplicates an exercise already in the plan");
    }

    Ok(exercise)
}

/// Replace the exercise at `index` in `plan` with a generated alternative.
///
/// The plan is left untouched on failure.
pub async fn swap_exercise(
    gateway: &CompletionGateway,
    plan: &mut WorkoutPlan,
    goal: &str,
    index: usize,
) -> Result<()> {
    let to_replace = plan
        .exercises
        .get(index)
        .map(|e| e.name.clone())
        .ok_or_else(|| {
            TaazaError::InvalidRequest(format!(
                "Exercise {} does not exist; the plan has {} exercises.",
                index + 1,
                plan.exercises.len()
            ))
        })?;

    let replacement =
        generate_exercise_alternative(gateway, goal, &plan.exercises, &to_replace).await?;
    plan.exercises[index] = replacement;
    Ok(())
}
