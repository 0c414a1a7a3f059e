//! How It Works ("Clarity")
//!
//! Three service steps, each with a line-art SVG icon.

use serde::{Deserialize, Serialize};

use crate::ai::{CompletionGateway, PromptBuilder, SchemaDescriptor};
use crate::types::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub title: String,
    pub text: String,
    /// Inline SVG markup
    pub svg_icon: String,
}

impl Step {
    pub fn has_svg_icon(&self) -> bool {
        let icon = self.svg_icon.trim();
        icon.starts_with("<svg") && icon.ends_with("</svg>")
    }
}

pub fn system_instruction() -> String {
    PromptBuilder::new()
        .persona(
            "You are \"Clarity,\" an AI assistant that excels at making complex processes simple and engaging. \
             Your task is for \"Taazabites,\" a healthy meal delivery service.",
        )
        .section("Goal", "Generate the 3 core steps of the Taazabites service.")
        .rule(
            "3 Steps Only",
            "The output must be an array of exactly three step objects.",
        )
        .rule(
            "Content",
            "Each step must have a short, catchy *title* and clear, encouraging *text*.",
        )
        .rule(
            "SVG Icons",
            "Each step must include a simple, modern, and relevant line-art style *svgIcon* as a string. \
             The SVG should have attributes like viewBox=\"0 0 24 24\", fill=\"none\", stroke=\"currentColor\", \
             and stroke-width=\"2\". The icons should visually represent the step's theme (e.g., personalization, \
             cooking, enjoyment).",
        )
        .json_only("array")
        .build()
}

pub fn user_prompt() -> String {
    "Generate 3 \"How It Works\" steps for Taazabites, including titles, text, and SVG icons.".to_string()
}

pub fn schema() -> SchemaDescriptor {
    SchemaDescriptor::array_of(
        SchemaDescriptor::object()
            .required(
                "title",
                SchemaDescriptor::string("A short, catchy title for the step."),
            )
            .required(
                "text",
                SchemaDescriptor::string("A brief, encouraging description of the step."),
            )
            .required(
                "svgIcon",
                SchemaDescriptor::string(
                    "A string containing valid SVG code for a simple, modern line-art icon.",
                ),
            ),
    )
}

pub async fn generate_how_it_works(gateway: &CompletionGateway) -> Result<Vec<Step>> {
    let steps: Vec<Step> = gateway
        .complete_json_as(&user_prompt(), &system_instruction(), &schema())
        .await?;

    if steps.len() != 3 {
        tracing::warn!(count = steps.len(), "Expected exactly three steps");
    }

    Ok(steps)
}
