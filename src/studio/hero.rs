//! Hero Copy ("Vibe")
//!
//! Headline and sub-headline variations for the landing section. The
//! default copy always leads the rotation; generated variations are
//! appended when available.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai::{CompletionGateway, PromptBuilder, SchemaDescriptor};
use crate::constants::studio::HERO_VARIATIONS;
use crate::types::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroCopy {
    /// May contain `\n` between two short lines
    pub headline: String,
    pub subheadline: String,
}

impl HeroCopy {
    pub fn headline_lines(&self) -> impl Iterator<Item = &str> {
        self.headline.lines().map(str::trim)
    }
}

pub fn default_hero_copy() -> HeroCopy {
    HeroCopy {
        headline: "Success Tastes\nThis Good.".to_string(),
        subheadline: "Transform your health journey with premium, nutritionist-designed meals that empower your lifestyle.".to_string(),
    }
}

pub fn system_instruction() -> String {
    PromptBuilder::new()
        .persona(
            "You are \"Vibe,\" an elite-tier marketing and brand strategist for \"Taazabites,\" \
             Bengaluru's premier health food delivery service. Your mission is to craft hero section \
             copy that is not just catchy, but *transformative*.",
        )
        .section(
            "Target Audience",
            "High-achieving, busy professionals and fitness enthusiasts in Bengaluru who value their \
             time, health, and performance. They are discerning and seek premium, reliable solutions.",
        )
        .bullets(
            "Core Brand Voice",
            vec![
                "**Aspirational & Empowering:** Focus on the ultimate outcome: success, peak performance, feeling unstoppable.",
                "**Premium & Sophisticated:** Use elegant, confident language. Avoid clichés.",
                "**Effortless & Convenient:** Highlight how Taazabites simplifies their life.",
                "**Trustworthy & Expert-Backed:** Subtly reference nutritionist design and chef-craftsmanship.",
            ],
        )
        .section(
            "Your Task",
            "Generate fresh, compelling headline and sub-headline variations. The copy should evoke \
             feelings of empowerment, confidence, and relief. Seamlessly integrate primary keywords like \
             'AI meal planner', 'healthy meal delivery Bengaluru', and 'chef-crafted meals' into the copy, \
             ensuring it remains natural and aspirational.",
        )
        .bullets(
            "Tone Example (Excellent)",
            vec![
                "Headline: \"Success Tastes This Good.\"",
                "Sub-headline: \"Transform your health journey with premium, nutritionist-designed meals that empower your lifestyle.\"",
            ],
        )
        .text("Focus on strong verbs, benefits over features, and creating an emotional connection.")
        .build()
}

pub fn user_prompt() -> String {
    let current = default_hero_copy();
    format!(
        "Our brand helps busy professionals in Bengaluru achieve their health and performance goals with \
         chef-crafted, nutritionist-designed meals that are delicious and convenient. We also have a unique \
         AI Meal Planner.\n\n\
         Our current hero copy is:\n\
         - Headline: \"{}\"\n\
         - Sub-headline: \"{}\"\n\n\
         Please generate {} new, distinct variations for the headline and sub-headline.\n\
         - Headlines should be punchy and can be two short lines. Use a newline character (\\n) to separate lines.\n\
         - Sub-headlines should be inspiring and complement the main headline.\n\
         - Your entire response MUST be a single, valid JSON array matching the provided schema. Do not add any commentary.",
        current.headline.replace('\n', "\\n"),
        current.subheadline,
        HERO_VARIATIONS
    )
}

pub fn schema() -> SchemaDescriptor {
    SchemaDescriptor::array_of(
        SchemaDescriptor::object()
            .required(
                "headline",
                SchemaDescriptor::string(
                    "A punchy, aspirational main headline. Use \\n for line breaks.",
                ),
            )
            .required(
                "subheadline",
                SchemaDescriptor::string("A compelling, emotionally resonant sub-headline."),
            ),
    )
}

pub async fn generate_hero_copies(gateway: &CompletionGateway) -> Result<Vec<HeroCopy>> {
    gateway
        .complete_json_as(&user_prompt(), &system_instruction(), &schema())
        .await
}

/// Default copy followed by any generated variations.
///
/// Failures are logged; the default copy is always present.
pub async fn hero_rotation(gateway: &CompletionGateway) -> Vec<HeroCopy> {
    let mut rotation = vec![default_hero_copy()];
    match generate_hero_copies(gateway).await {
        Ok(copies) => rotation.extend(copies),
        Err(e) => warn!(error = %e, "Failed to fetch hero copy, keeping default"),
    }
    rotation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{ScriptedBackend, gateway_with};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_user_prompt_escapes_default_headline() {
        let prompt = user_prompt();
        assert!(prompt.contains("- Headline: \"Success Tastes\\nThis Good.\""));
        assert!(prompt.contains("generate 3 new, distinct variations"));
    }

    #[test]
    fn test_headline_lines() {
        let copy = default_hero_copy();
        let lines: Vec<_> = copy.headline_lines().collect();
        assert_eq!(lines, vec!["Success Tastes", "This Good."]);
    }

    #[tokio::test]
    async fn test_rotation_appends_generated_copy() {
        let body = json!([
            {"headline": "Fuel Your\nAmbition.", "subheadline": "Chef-crafted meals, delivered."},
            {"headline": "Eat Well.\nWin Big.", "subheadline": "Your AI meal planner awaits."}
        ])
        .to_string();
        let backend = Arc::new(ScriptedBackend::always(body));
        let (gateway, _) = gateway_with(&backend);

        let rotation = hero_rotation(&gateway).await;
        assert_eq!(rotation.len(), 3);
        assert_eq!(rotation[0], default_hero_copy());
        assert_eq!(rotation[1].headline, "Fuel Your\nAmbition.");
    }

    #[tokio::test]
    async fn test_rotation_keeps_default_on_failure() {
        let backend = Arc::new(ScriptedBackend::always("no json here"));
        let (gateway, _) = gateway_with(&backend);

        let rotation = hero_rotation(&gateway).await;
        assert_eq!(rotation, vec![default_hero_copy()]);
        assert_eq!(backend.calls(), 3);
    }
}
