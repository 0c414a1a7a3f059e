//! System Instruction Builder
//!
//! Standardized construction of the system instructions sent with every
//! widget request. Each instruction follows the same layout:
//!
//! 1. **Persona**: who the model is and what it is asked to do
//! 2. **Sections**: reference material under a bold header (menu, audience)
//! 3. **Critical rules**: numbered, bold-titled constraints
//!
//! Output is deterministic for identical inputs.

/// Instruction section types
#[derive(Debug, Clone, PartialEq)]
pub enum PromptSection {
    /// Opening persona paragraph
    Persona(String),
    /// Text with optional bold header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Bulleted list with optional bold header
    Bullets {
        header: Option<String>,
        items: Vec<String>,
    },
    /// Numbered critical rules
    Rules(Vec<Rule>),
}

/// One numbered rule, optionally with a bold title
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub title: Option<String>,
    pub text: String,
}

/// Builder for widget system instructions
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the persona paragraph
    pub fn persona(mut self, text: &str) -> Self {
        self.sections.push(PromptSection::Persona(text.to_string()));
        self
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Add bulleted list with header
    pub fn bullets(mut self, header: &str, items: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Bullets {
            header: Some(header.to_string()),
            items: items.into_iter().map(String::from).collect(),
        });
        self
    }

    /// Add a titled rule. Consecutive rules share one numbered list.
    pub fn rule(self, title: &str, text: &str) -> Self {
        self.push_rule(Rule {
            title: Some(title.to_string()),
            text: text.to_string(),
        })
    }

    /// Final rule shared by every JSON widget
    pub fn json_only(self, shape: &str) -> Self {
        self.rule(
            "JSON Output ONLY",
            &format!(
                "Your entire response must be a single, valid JSON {} matching the provided schema. \
                 Do not include any text, markdown, or commentary outside of the JSON structure.",
                shape
            ),
        )
    }

    fn push_rule(mut self, rule: Rule) -> Self {
        if let Some(PromptSection::Rules(rules)) = self.sections.last_mut() {
            rules.push(rule);
        } else {
            self.sections.push(PromptSection::Rules(vec![rule]));
        }
        self
    }

    /// Build the final instruction string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Persona(text) => {
                    prompt.push_str(&text);
                    prompt.push_str("\n\n");
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("**{}:**\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Bullets { header, items } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("**{}:**\n", h));
                    }
                    for item in items {
                        prompt.push_str(&format!("- {}\n", item));
                    }
                    prompt.push('\n');
                }
                PromptSection::Rules(rules) => {
                    prompt.push_str("**CRITICAL RULES:**\n");
                    for (i, rule) in rules.iter().enumerate() {
                        match &rule.title {
                            Some(title) => prompt.push_str(&format!(
                                "{}.  **{}:** {}\n",
                                i + 1,
                                title,
                                rule.text
                            )),
                            None => prompt.push_str(&format!("{}.  {}\n", i + 1, rule.text)),
                        }
                    }
                    prompt.push('\n');
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_builder_basic() {
        let prompt = PromptBuilder::new()
            .persona("You are \"Crave-AI,\" a friendly food concierge.")
            .section("Taazabites Menu (Source of Truth)", "- Keto Bowl")
            .rule("One Recommendation", "Suggest exactly ONE meal.")
            .json_only("object")
            .build();

        assert!(prompt.starts_with("You are \"Crave-AI,\""));
        assert!(prompt.contains("**Taazabites Menu (Source of Truth):**\n- Keto Bowl"));
        assert!(prompt.contains("**CRITICAL RULES:**"));
        assert!(prompt.contains("1.  **One Recommendation:** Suggest exactly ONE meal."));
        assert!(prompt.contains("2.  **JSON Output ONLY:** Your entire response must be a single, valid JSON object"));
    }

    #[test]
    fn test_consecutive_rules_share_numbering() {
        let prompt = PromptBuilder::new()
            .rule("A", "first")
            .rule("B", "second")
            .rule("C", "third")
            .build();

        assert_eq!(prompt.matches("**CRITICAL RULES:**").count(), 1);
        assert!(prompt.contains("3.  **C:** third"));
    }

    #[test]
    fn test_bullets_section() {
        let prompt = PromptBuilder::new()
            .bullets("Core Brand Voice", vec!["Aspirational", "Premium"])
            .build();

        assert_eq!(prompt, "**Core Brand Voice:**\n- Aspirational\n- Premium");
    }

    #[test]
    fn test_build_is_deterministic() {
        let make = || {
            PromptBuilder::new()
                .persona("p")
                .text("t")
                .rule("r", "x")
                .build()
        };
        assert_eq!(make(), make());
    }
}
