//! Meta Description
//!
//! Time-sensitive SEO description for the page head. The current date is
//! passed in so the prompt is deterministic for a given day.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ai::{CompletionGateway, PromptBuilder, SchemaDescriptor};
use crate::constants::studio::META_DESCRIPTION_MAX_CHARS;
use crate::types::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaDescription {
    pub description: String,
}

impl MetaDescription {
    pub fn char_count(&self) -> usize {
        self.description.chars().count()
    }

    /// The limit is requested, not enforced by the upstream
    pub fn within_limit(&self) -> bool {
        self.char_count() <= META_DESCRIPTION_MAX_CHARS
    }
}

pub fn system_instruction() -> String {
    PromptBuilder::new()
        .persona(
            "You are an expert SEO copywriter for \"Taazabites,\" a premium healthy food delivery service \
             in Bengaluru. Your task is to generate a single, compelling, time-sensitive meta description.",
        )
        .rule(
            "Character Limit",
            &format!(
                "Strictly adhere to a maximum of {} characters.",
                META_DESCRIPTION_MAX_CHARS
            ),
        )
        .rule(
            "Be Time-Sensitive",
            "Mention the current season, month, or a general time-based call to action (e.g., \"this week,\" \
             \"this season\") to create a sense of immediacy and freshness.",
        )
        .rule(
            "Include Keywords",
            "Naturally weave in essential keywords: \"healthy food delivery Bengaluru\", \"AI meal planner\", \
             and at least one of \"keto meals\" or \"high-protein\".",
        )
        .rule(
            "Call to Action",
            "End with a clear and concise call to action (e.g., \"Order now!\", \"Get your plan today.\").",
        )
        .rule(
            "JSON Output ONLY",
            "Your entire response must be a single, valid JSON object with a 'description' key. \
             Do not include any other text or commentary.",
        )
        .build()
}

/// Date rendered as `October 18`
pub fn format_date(date: NaiveDate) -> String {
    format!("{} {}", date.format("%B"), date.day())
}

pub fn user_prompt(date: NaiveDate) -> String {
    format!(
        "Generate a fresh meta description for our website. The current date is {}.",
        format_date(date)
    )
}

pub fn schema() -> SchemaDescriptor {
    SchemaDescriptor::object().required(
        "description",
        SchemaDescriptor::string(format!(
            "The generated meta description, max {} characters.",
            META_DESCRIPTION_MAX_CHARS
        )),
    )
}

pub async fn generate_meta_description(
    gateway: &CompletionGateway,
    date: NaiveDate,
) -> Result<MetaDescription> {
    let meta: MetaDescription = gateway
        .complete_json_as(&user_prompt(date), &system_instruction(), &schema())
        .await?;

    if !meta.within_limit() {
        tracing::warn!(
            chars = meta.char_count(),
            limit = META_DESCRIPTION_MAX_CHARS,
            "Meta description exceeds requested length"
        );
    }

    Ok(meta)
}
