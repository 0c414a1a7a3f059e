//! Menu Catalogue
//!
//! Fixed list of dishes the planner, workout coach and suggestion widgets
//! are allowed to recommend.

/// One dish on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub name: &'static str,
    pub tags: &'static [&'static str],
    pub nutrition_info: &'static str,
}

pub const MENU: &[MenuItem] = &[
    MenuItem {
        name: "High Protein Egg Chicken Meal",
        tags: &["high-protein", "keto", "chefs-pick"],
        nutrition_info: "Calories: 450 kcal, Protein: 42g, Net Carbs: 8g, Fat: 28g, Fiber: 2g",
    },
    MenuItem {
        name: "Quinoa Power Bowl with Grilled Paneer",
        tags: &["vegetarian", "high-protein", "healthy-start"],
        nutrition_info: "Calories: 480 kcal, Protein: 25g, Carbs: 50g, Fat: 20g, Fiber: 10g",
    },
    MenuItem {
        name: "Premium Chicken Pink Pasta",
        tags: &["high-protein", "indulgent"],
        nutrition_info: "Calories: 580 kcal, Protein: 38g, Carbs: 55g, Fat: 25g, Fiber: 5g",
    },
    MenuItem {
        name: "Dry Fruit Whey Protein Shake",
        tags: &["high-protein", "keto", "healthy-boost"],
        nutrition_info: "Calories: 380 kcal, Protein: 28g, Carbs: 30g, Fat: 18g, Sugar: 20g",
    },
    MenuItem {
        name: "Dry Fruit Chia Pudding",
        tags: &["vegetarian", "healthy-start", "healthy-boost"],
        nutrition_info: "Calories: 350 kcal, Protein: 12g, Carbs: 45g, Fat: 15g, Fiber: 15g",
    },
    MenuItem {
        name: "Protein Scramble Rice Bowl",
        tags: &["high-protein"],
        nutrition_info: "Calories: 520 kcal, Protein: 40g, Carbs: 35g, Fat: 24g, Fiber: 4g",
    },
];

impl MenuItem {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// `- Name (Tags: a, b; Nutrition: ...)`
    pub fn listing_line(&self) -> String {
        format!(
            "- {} (Tags: {}; Nutrition: {})",
            self.name,
            self.tags.join(", "),
            self.nutrition_info
        )
    }
}

/// Menu rendered for inclusion in a system instruction
pub fn menu_listing() -> String {
    MENU.iter()
        .map(MenuItem::listing_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Exact (case-insensitive, trimmed) lookup by dish name
pub fn find_item(name: &str) -> Option<&'static MenuItem> {
    let name = name.trim();
    MENU.iter().find(|item| item.name.eq_ignore_ascii_case(name))
}

pub fn items_tagged(tag: &str) -> impl Iterator<Item = &'static MenuItem> + '_ {
    MENU.iter().filter(move |item| item.has_tag(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_format() {
        let listing = menu_listing();
        assert_eq!(listing.lines().count(), 6);
        assert!(listing.starts_with(
            "- High Protein Egg Chicken Meal (Tags: high-protein, keto, chefs-pick; Nutrition: Calories: 450 kcal"
        ));
    }

    #[test]
    fn test_find_item() {
        assert!(find_item("  dry fruit chia pudding ").is_some());
        assert!(find_item("Pizza").is_none());
    }

    #[test]
    fn test_items_tagged() {
        let keto: Vec<_> = items_tagged("keto").map(|i| i.name).collect();
        assert_eq!(
            keto,
            vec!["High Protein Egg Chicken Meal", "Dry Fruit Whey Protein Shake"]
        );
    }
}
