//! Testimonials ("PersonaGen")
//!
//! Generated customer quotes with a static set to fall back on.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Generated;
use crate::ai::{CompletionGateway, PromptBuilder, SchemaDescriptor};
use crate::constants::studio::TESTIMONIAL_COUNT;
use crate::types::Result;

/// Notice shown when the static set replaces a failed generation
pub const FALLBACK_NOTICE: &str = "Failed to load fresh testimonials. Showing our classics.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub title: String,
    /// First initial of the author
    pub avatar: String,
}

pub fn static_testimonials() -> Vec<Testimonial> {
    let entry = |quote: &str, author: &str, title: &str, avatar: &str| Testimonial {
        quote: quote.to_string(),
        author: author.to_string(),
        title: title.to_string(),
        avatar: avatar.to_string(),
    };

    vec![
        entry(
            "Taazabites has completely transformed my relationship with food. Getting the right macros used to be a chore. Now I enjoy delicious meals that support my goals.",
            "Ravi Sharma",
            "Fitness Coach",
            "R",
        ),
        entry(
            "The convenience of having nutritious, chef-prepared meals delivered has been a game-changer for my busy schedule. I've never eaten so well with so little effort!",
            "Sunita Rao",
            "Software Engineer",
            "S",
        ),
        entry(
            "I appreciate how Taazabites accommodates my dietary needs without compromising on taste. Their vegetarian options are exceptional!",
            "Anika Khanna",
            "Marketing Director",
            "A",
        ),
    ]
}

pub fn system_instruction() -> String {
    PromptBuilder::new()
        .persona(
            "You are \"PersonaGen,\" an AI specialized in creating authentic and relatable customer \
             testimonials for \"Taazabites,\" Bengaluru's premier healthy food delivery service.",
        )
        .section(
            "Your Goal",
            &format!(
                "Generate a set of {} diverse and realistic customer testimonials.",
                TESTIMONIAL_COUNT
            ),
        )
        .rule(
            "Diverse Personas",
            "Create distinct customer profiles. Examples: a busy IT professional, a fitness enthusiast, \
             a working parent, a student. Give them a realistic Indian name.",
        )
        .rule(
            "Varied Focus",
            "Each testimonial should highlight a different key benefit of Taazabites: one on **convenience \
             and time-saving**, one on **achieving a specific health goal** (weight loss, muscle gain), and \
             one on the **delicious taste and quality** of the food.",
        )
        .rule(
            "Authentic Voice",
            "Use natural, conversational language. Avoid overly corporate or polished jargon. The quotes \
             should sound like they were written by real people.",
        )
        .rule(
            "Structure",
            "For each testimonial, provide a quote, the author's name, a brief title/role (e.g., \"Software \
             Engineer,\" \"Fitness Coach\"), and the author's first initial as the avatar.",
        )
        .json_only("array")
        .build()
}

pub fn user_prompt() -> String {
    format!(
        "Generate {} new, distinct customer testimonials for Taazabites.",
        TESTIMONIAL_COUNT
    )
}

pub fn schema() -> SchemaDescriptor {
    SchemaDescriptor::array_of(
        SchemaDescriptor::object()
            .required(
                "quote",
                SchemaDescriptor::string(
                    "The customer's review quote. Should be authentic and conversational.",
                ),
            )
            .required(
                "author",
                SchemaDescriptor::string("A realistic Indian name for the customer."),
            )
            .required(
                "title",
                SchemaDescriptor::string(
                    "A brief, realistic role or title for the customer (e.g., 'IT Consultant', 'Yoga Instructor').",
                ),
            )
            .required(
                "avatar",
                SchemaDescriptor::string("The first initial of the author's name."),
            ),
    )
}

pub async fn generate_testimonials(gateway: &CompletionGateway) -> Result<Vec<Testimonial>> {
    gateway
        .complete_json_as(&user_prompt(), &system_instruction(), &schema())
        .await
}

/// Generated testimonials, or the static set.
///
/// An empty generated list also yields the static set, without a notice.
pub async fn testimonials_or_fallback(gateway: &CompletionGateway) -> Generated<Vec<Testimonial>> {
    match generate_testimonials(gateway).await {
        Ok(testimonials) if !testimonials.is_empty() => Generated::Fresh(testimonials),
        Ok(_) => Generated::Fallback {
            content: static_testimonials(),
            notice: None,
        },
        Err(e) => {
            warn!(error = %e, "Testimonial fetch error");
            Generated::Fallback {
                content: static_testimonials(),
                notice: Some(FALLBACK_NOTICE.to_string()),
            }
        }
    }
}
