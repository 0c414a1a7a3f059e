//! Widget Commands
//!
//! Run a single site widget against the configured gateway and print the
//! result. Text output mirrors what the page renders; `--format json`
//! prints the typed payload.

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use crate::cli::{CommandContext, Output, OutputFormat};
use crate::studio::{
    self, Generated, HeroCopy, IngredientSpotlight, MealPlan, MealPlanRequest, Step, Testimonial,
    WorkoutPlan,
};
use crate::types::{Result, TaazaError};

fn print_generated<T: Serialize>(
    out: &Output,
    generated: &Generated<T>,
    format: OutputFormat,
    render: impl FnOnce(&Output, &T),
) -> Result<()> {
    match format {
        OutputFormat::Json => out.json(&json!({
            "content": generated.content(),
            "fallback": generated.is_fallback(),
            "notice": generated.notice(),
        })),
        OutputFormat::Text => {
            if let Some(notice) = generated.notice() {
                out.warning(notice);
            }
            render(out, generated.content());
            Ok(())
        }
    }
}

/// Meal planner
pub async fn meal_plan(
    ctx: &CommandContext,
    request: &MealPlanRequest,
    format: OutputFormat,
) -> Result<()> {
    let out = Output::new();
    let plan = studio::generate_meal_plan(&ctx.gateway, request).await?;

    match format {
        OutputFormat::Json => out.json(&plan),
        OutputFormat::Text => {
            render_meal_plan(&out, &plan);
            Ok(())
        }
    }
}

fn render_meal_plan(out: &Output, plan: &MealPlan) {
    out.header("Your Nutri-AI Plan");
    out.body(&plan.summary);
    for (label, meal) in plan.meals() {
        out.section(label);
        out.field("Dish", &meal.name);
        out.body(&meal.reason);
    }
    out.section("Daily Totals");
    out.field("Calories", &plan.daily_totals.calories);
    out.field("Protein", &plan.daily_totals.protein);
}

/// Workout generator, optionally saving the plan for `swap-exercise`
pub async fn workout(
    ctx: &CommandContext,
    goal: &str,
    save: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let out = Output::new();
    let plan = studio::generate_workout_plan(&ctx.gateway, goal).await?;

    if let Some(path) = save {
        std::fs::write(path, serde_json::to_string_pretty(&plan)?)?;
    }

    match format {
        OutputFormat::Json => out.json(&plan),
        OutputFormat::Text => {
            render_workout(&out, &plan);
            if let Some(path) = save {
                out.info(&format!("Plan saved to {}", path.display()));
            }
            Ok(())
        }
    }
}

/// Replace one exercise of a saved plan and write the plan back.
///
/// `index` is 1-based, as shown in the text output.
pub async fn swap_exercise(
    ctx: &CommandContext,
    plan_path: &Path,
    goal: &str,
    index: usize,
    format: OutputFormat,
) -> Result<()> {
    let out = Output::new();
    let content = std::fs::read_to_string(plan_path)?;
    let mut plan: WorkoutPlan = serde_json::from_str(&content)?;

    let position = index.checked_sub(1).ok_or_else(|| {
        TaazaError::InvalidRequest("Exercise numbers start at 1.".to_string())
    })?;
    let previous = plan.exercises.get(position).map(|e| e.name.clone());
    studio::swap_exercise(&ctx.gateway, &mut plan, goal, position).await?;

    std::fs::write(plan_path, serde_json::to_string_pretty(&plan)?)?;

    match format {
        OutputFormat::Json => out.json(&plan),
        OutputFormat::Text => {
            if let (Some(previous), Some(current)) = (previous, plan.exercises.get(position)) {
                out.success(&format!("Swapped '{}' for '{}'", previous, current.name));
            }
            out.field("Plan", &plan_path.display().to_string());
            render_workout(&out, &plan);
            Ok(())
        }
    }
}

fn render_workout(out: &Output, plan: &WorkoutPlan) {
    out.header(&plan.workout_name);
    out.body(&plan.description);
    for (i, exercise) in plan.exercises.iter().enumerate() {
        out.section(&format!("{}. {}", i + 1, exercise.name));
        out.field("Duration", &exercise.duration);
        out.body(&exercise.instructions);
        out.field("Tip", &exercise.tip);
    }
    out.section("Refuel With");
    out.field("Dish", &plan.recommended_meal.name);
    out.body(&plan.recommended_meal.reason);
}

/// Testimonials, falling back to the classics
pub async fn testimonials(ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let out = Output::new();
    let generated = studio::testimonials_or_fallback(&ctx.gateway).await;
    print_generated(&out, &generated, format, |out, list| {
        render_testimonials(out, list)
    })
}

fn render_testimonials(out: &Output, testimonials: &[Testimonial]) {
    out.header("What Our Customers Say");
    for t in testimonials {
        out.section(&format!("[{}] {}, {}", t.avatar, t.author, t.title));
        out.body(&format!("\"{}\"", t.quote));
    }
}

/// Hero rotation; the default copy always comes first
pub async fn hero(ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let out = Output::new();
    let copies = studio::hero_rotation(&ctx.gateway).await;

    match format {
        OutputFormat::Json => out.json(&copies),
        OutputFormat::Text => {
            render_hero(&out, &copies);
            Ok(())
        }
    }
}

fn render_hero(out: &Output, copies: &[HeroCopy]) {
    out.header("Hero Rotation");
    for (i, copy) in copies.iter().enumerate() {
        out.section(&format!("Slide {}", i + 1));
        for line in copy.headline_lines() {
            out.body(line);
        }
        out.field("Subheadline", &copy.subheadline);
    }
}

/// Meta description for the given day
pub async fn meta(ctx: &CommandContext, date: NaiveDate, format: OutputFormat) -> Result<()> {
    let out = Output::new();
    let meta = studio::generate_meta_description(&ctx.gateway, date).await?;

    match format {
        OutputFormat::Json => out.json(&meta),
        OutputFormat::Text => {
            out.body(&meta.description);
            out.field("Length", &meta.char_count().to_string());
            Ok(())
        }
    }
}

/// Free-text site search
pub async fn search(ctx: &CommandContext, query: &str, format: OutputFormat) -> Result<()> {
    let out = Output::new();
    let answer = studio::generate_search_answer(&ctx.gateway, query).await?;

    match format {
        OutputFormat::Json => out.json(&json!({ "query": query, "answer": answer })),
        OutputFormat::Text => {
            out.body(&answer);
            Ok(())
        }
    }
}

/// Craving-based menu suggestion
pub async fn suggest(ctx: &CommandContext, craving: &str, format: OutputFormat) -> Result<()> {
    let out = Output::new();
    let suggestion = studio::generate_menu_suggestion(&ctx.gateway, craving).await?;

    match format {
        OutputFormat::Json => out.json(&suggestion),
        OutputFormat::Text => {
            out.header(&suggestion.meal_name);
            out.body(&suggestion.reason);
            match suggestion.menu_item() {
                Some(item) => out.field("Nutrition", item.nutrition_info),
                None => out.warning("Suggested dish is not on the current menu."),
            }
            Ok(())
        }
    }
}

/// Ingredient spotlight, falling back to the static one
pub async fn spotlight(ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let out = Output::new();
    let generated = studio::spotlight_or_fallback(&ctx.gateway).await;
    print_generated(&out, &generated, format, render_spotlight)
}

fn render_spotlight(out: &Output, spotlight: &IngredientSpotlight) {
    out.header(&format!("Ingredient Spotlight: {}", spotlight.name));
    out.field("Title", &spotlight.title);
    out.body(&spotlight.description);
}

/// "How it works" steps
pub async fn how_it_works(ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let out = Output::new();
    let steps = studio::generate_how_it_works(&ctx.gateway).await?;

    match format {
        OutputFormat::Json => out.json(&steps),
        OutputFormat::Text => {
            render_steps(&out, &steps);
            Ok(())
        }
    }
}

fn render_steps(out: &Output, steps: &[Step]) {
    out.header("How It Works");
    for (i, step) in steps.iter().enumerate() {
        out.section(&format!("{}. {}", i + 1, step.title));
        out.body(&step.text);
        if !step.has_svg_icon() {
            out.warning("Step icon is not inline SVG.");
        }
    }
}
