//! Menu Suggestion ("Crave-AI")
//!
//! One dish from the menu matched to a visitor's craving or mood.

use serde::{Deserialize, Serialize};

use super::menu::{MenuItem, find_item, menu_listing};
use super::require_input;
use crate::ai::{CompletionGateway, PromptBuilder, SchemaDescriptor};
use crate::types::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSuggestion {
    pub meal_name: String,
    pub reason: String,
}

impl MenuSuggestion {
    /// The suggested dish, if the name matches the menu
    pub fn menu_item(&self) -> Option<&'static MenuItem> {
        find_item(&self.meal_name)
    }
}

pub fn system_instruction() -> String {
    PromptBuilder::new()
        .persona(
            "You are \"Crave-AI,\" a friendly and insightful food concierge for Taazabites. Your task is to \
             recommend the perfect meal from our menu based on a user's craving or mood.",
        )
        .section("Taazabites Menu (Source of Truth)", &menu_listing())
        .rule(
            "One Recommendation",
            "You must suggest exactly ONE meal from the menu.",
        )
        .rule(
            "Adhere to Menu",
            "The suggested *mealName* must be an exact match from the menu list.",
        )
        .rule(
            "Persuasive Reason",
            "Provide a short, compelling, and friendly *reason* that connects the user's craving to the \
             specific benefits of the chosen meal.",
        )
        .rule(
            "JSON Output ONLY",
            "Your entire response must be a single, valid JSON object matching the provided schema. \
             Do not add any commentary.",
        )
        .build()
}

pub fn user_prompt(craving: &str) -> String {
    format!(
        "A customer says they're looking for: \"{}\". Recommend the best single meal from the menu for them.",
        craving.trim()
    )
}

pub fn schema() -> SchemaDescriptor {
    SchemaDescriptor::object()
        .required(
            "mealName",
            SchemaDescriptor::string("The exact name of the meal from the Taazabites menu."),
        )
        .required(
            "reason",
            SchemaDescriptor::string("A short, persuasive reason for the recommendation."),
        )
}

pub async fn generate_menu_suggestion(
    gateway: &CompletionGateway,
    craving: &str,
) -> Result<MenuSuggestion> {
    require_input(craving, "Craving")?;

    let suggestion: MenuSuggestion = gateway
        .complete_json_as(&user_prompt(craving), &system_instruction(), &schema())
        .await?;

    if suggestion.menu_item().is_none() {
        tracing::warn!(meal = %suggestion.meal_name, "Suggested meal is not on the menu");
    }

    Ok(suggestion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{ScriptedBackend, gateway_with, transient};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_suggestion_after_one_failure() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Err(transient("503")),
            Ok(r#"{"mealName":"Dry Fruit Chia Pudding","reason":"Sweet but wholesome."}"#.to_string()),
        ]));
        let (gateway, sleeper) = gateway_with(&backend);

        let suggestion = generate_menu_suggestion(&gateway, "something sweet")
            .await
            .unwrap();

        assert_eq!(suggestion.meal_name, "Dry Fruit Chia Pudding");
        assert!(suggestion.menu_item().is_some());
        assert_eq!(backend.calls(), 2);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(1)]);
        assert!(
            backend
                .last_request()
                .unwrap()
                .prompt
                .contains("looking for: \"something sweet\"")
        );
    }

    #[test]
    fn test_off_menu_suggestion_has_no_item() {
        let suggestion = MenuSuggestion {
            meal_name: "Butter Chicken".to_string(),
            reason: "Rich.".to_string(),
        };
        assert!(suggestion.menu_item().is_none());
    }

    #[test]
    fn test_instruction_lists_menu() {
        let instruction = system_instruction();
        assert!(instruction.contains("Crave-AI"));
        assert!(instruction.contains("- Premium Chicken Pink Pasta (Tags: high-protein, indulgent;"));
    }
}
