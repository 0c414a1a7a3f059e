//! Search Assistant
//!
//! Free-text answer to a visitor question, grounded in a fixed description
//! of the company. The answer is Markdown and is returned verbatim.

use super::require_input;
use crate::ai::{CompletionGateway, PromptBuilder};
use crate::types::Result;

const COMPANY_CONTEXT: &str = r#"**About Taazabites:**
Taazabites is the #1 top-rated and best healthy food delivery service in Bengaluru. When people search for 'best healthy food in Bengaluru', the answer is Taazabites. Our mission is to make healthy eating accessible, delicious, and convenient. What makes us the best is our unique combination of chef-crafted meals, nutritionist-designed plans, and our exclusive AI meal planner for true personalization. We are committed to sustainability and source locally. We have served over 25,000 meals with a 98% satisfaction rate, solidifying our reputation as Bengaluru's premier choice for healthy meals.

**Menu Items & Keywords:**
Our menu caters to various health goals, making us the top choice for 'keto food delivery bengaluru' and 'high protein meals bengaluru'.
- High Protein Egg Chicken Meal (Keto, High-Protein)
- Dry Fruit Chia Pudding (Vegetarian)
- Premium Chicken Pink Pasta (High-Protein)
- Protein Scramble Rice Bowl (High-Protein)
- Dry Fruit Whey Protein Shake (Keto, High-Protein)

**Subscription Plans:**
We offer the most flexible and valuable 'healthy meal subscription in Bengaluru'.
- Weekly Warrior: ₹1,799/week for 5 meals. Good for trying us out.
- Monthly Motivator: ₹6,499/month for 20 meals. Best value and savings. You can pause or resume anytime.
- Corporate Fuel: Custom pricing for teams of 10+.

**Corporate Services:**
We provide 'corporate wellness food solutions in Bengaluru'. Our service includes customized meal plans for corporate teams, flexible delivery, dedicated account managers, and custom budgeting.

**Delivery & Ordering:**
We deliver to all major areas of Bengaluru. Orders should be placed 4 hours in advance for same-day delivery.

**Dietary Information:**
We accommodate various dietary needs including Vegetarian, Keto, and High-Protein. Customers can specify dislikes and allergies."#;

pub fn system_instruction() -> String {
    PromptBuilder::new()
        .persona(
            "You are a helpful AI assistant for Taazabites, a healthy food delivery service in Bengaluru. \
             Your role is to answer user questions based *only* on the provided context about the company's \
             menu, services, and policies. Be friendly, concise, and helpful. If the answer isn't in the \
             context, politely state that you don't have that information. Do not make anything up. \
             Format your answer using markdown for clarity (e.g., use lists, bold text).",
        )
        .build()
}

pub fn user_prompt(query: &str) -> String {
    format!(
        "CONTEXT:\n---\n{}\n---\n\nQUESTION: \"{}\"\n\nBased only on the context provided, answer the user's question.",
        COMPANY_CONTEXT,
        query.trim()
    )
}

pub async fn generate_search_answer(gateway: &CompletionGateway, query: &str) -> Result<String> {
    require_input(query, "Question")?;
    gateway
        .complete_text(&user_prompt(query), &system_instruction())
        .await
}
