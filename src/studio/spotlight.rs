//! Ingredient Spotlight ("Gourmet-AI")
//!
//! Tagline and description for one featured ingredient. Only ingredients
//! the site has imagery for are accepted; anything else falls back to the
//! static avocado spotlight.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Generated;
use crate::ai::{CompletionGateway, PromptBuilder, SchemaDescriptor};
use crate::types::Result;

pub const INGREDIENTS: &[&str] = &["Quinoa", "Paneer", "Chicken Breast", "Chia Seeds", "Avocado"];

const INVALID_INGREDIENT_NOTICE: &str = "AI did not return a valid ingredient.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSpotlight {
    pub name: String,
    /// Tagline; must not repeat the ingredient name
    pub title: String,
    pub description: String,
}

impl IngredientSpotlight {
    pub fn is_known_ingredient(&self) -> bool {
        INGREDIENTS.contains(&self.name.as_str())
    }

    pub fn title_mentions_name(&self) -> bool {
        self.title
            .to_lowercase()
            .contains(&self.name.to_lowercase())
    }
}

pub fn fallback_spotlight() -> IngredientSpotlight {
    IngredientSpotlight {
        name: "Avocado".to_string(),
        title: "The Nutrient-Dense Powerhouse".to_string(),
        description: "Packed with monounsaturated fats, fiber, and potassium, avocados support heart health, \
                      improve digestion, and provide a creamy, satisfying texture to our bowls. We source our \
                      Hass avocados from the best local farms."
            .to_string(),
    }
}

pub fn system_instruction() -> String {
    let list = INGREDIENTS.join(", ");
    PromptBuilder::new()
        .persona(
            "You are \"Gourmet-AI,\" a passionate food scientist and nutritionist for \"Taazabites.\" \
             Your mission is to craft a compelling \"Ingredient Spotlight.\"",
        )
        .section("Goal", "Spotlight one healthy ingredient from the provided list.")
        .rule(
            "Select One",
            &format!("Randomly choose ONE ingredient from this list: {}.", list),
        )
        .rule(
            "Content",
            "Create a catchy *title* (a tagline for the ingredient) and an engaging *description* \
             highlighting its health benefits and why Taazabites uses it.",
        )
        .rule(
            "Title Rule",
            "The generated 'title' must be a tagline and MUST NOT include the name of the ingredient itself. \
             The ingredient name is already provided in the 'name' field.",
        )
        .rule(
            "JSON Output ONLY",
            "Your entire response must be a single, valid JSON object matching the provided schema, containing \
             the *name* you chose, and the *title* and *description* you generated. Do not add any commentary.",
        )
        .build()
}

pub fn user_prompt() -> String {
    format!(
        "Generate an ingredient spotlight for one of these: {}.",
        INGREDIENTS.join(", ")
    )
}

pub fn schema() -> SchemaDescriptor {
    SchemaDescriptor::object()
        .required(
            "name",
            SchemaDescriptor::string("The name of the ingredient you chose from the list."),
        )
        .required(
            "title",
            SchemaDescriptor::string(
                "A catchy tagline for the ingredient. This tagline should NOT contain the ingredient's name.",
            ),
        )
        .required(
            "description",
            SchemaDescriptor::string("An engaging description of the ingredient's benefits."),
        )
}

pub async fn generate_spotlight(gateway: &CompletionGateway) -> Result<IngredientSpotlight> {
    gateway
        .complete_json_as(&user_prompt(), &system_instruction(), &schema())
        .await
}

/// Generated spotlight for a known ingredient, or the static avocado one
pub async fn spotlight_or_fallback(gateway: &CompletionGateway) -> Generated<IngredientSpotlight> {
    let notice = match generate_spotlight(gateway).await {
        Ok(spotlight) if spotlight.is_known_ingredient() => {
            if spotlight.title_mentions_name() {
                warn!(name = %spotlight.name, "Spotlight title repeats the ingredient name");
            }
            return Generated::Fresh(spotlight);
        }
        Ok(spotlight) => {
            warn!(name = %spotlight.name, "Spotlight ingredient not in the list");
            INVALID_INGREDIENT_NOTICE.to_string()
        }
        Err(e) => {
            warn!(error = %e, "Ingredient spotlight failed");
            e.user_message()
        }
    };

    Generated::Fallback {
        content: fallback_spotlight(),
        notice: Some(notice),
    }
}
