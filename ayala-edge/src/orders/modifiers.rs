//! Modifier catalog
//!
//! Data-driven mapping from menu items to the modifier groups offered when
//! customizing them. A rule matches on category or name substrings; every
//! matching rule contributes its groups, in rule order. Adding a category
//! means adding a rule, never touching the resolution code.

use serde::{Deserialize, Serialize};
use shared::models::MenuItem;

/// Selection behavior of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKind {
    /// Selecting an option replaces the previous one
    Single,
    /// Options toggle independently
    Multiple,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierGroup {
    pub id: String,
    pub title: String,
    pub kind: ModifierKind,
    pub options: Vec<ModifierOption>,
}

impl ModifierGroup {
    pub fn new(id: &str, title: &str, kind: ModifierKind, options: &[(&str, &str)]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            options: options
                .iter()
                .map(|(id, label)| ModifierOption {
                    id: (*id).to_string(),
                    label: (*label).to_string(),
                })
                .collect(),
        }
    }

    pub fn option(&self, option_id: &str) -> Option<&ModifierOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Item predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "on", content = "text", rename_all = "snake_case")]
pub enum Matcher {
    CategoryContains(String),
    NameContains(String),
}

impl Matcher {
    pub fn matches(&self, item: &MenuItem) -> bool {
        match self {
            Matcher::CategoryContains(text) => item.category.contains(text.as_str()),
            Matcher::NameContains(text) => item.name.contains(text.as_str()),
        }
    }
}

/// Any matcher hit attaches all of `groups`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierRule {
    pub matchers: Vec<Matcher>,
    pub groups: Vec<ModifierGroup>,
}

impl ModifierRule {
    pub fn applies_to(&self, item: &MenuItem) -> bool {
        self.matchers.iter().any(|m| m.matches(item))
    }
}

/// Ordered rule table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierCatalog {
    pub rules: Vec<ModifierRule>,
}

impl ModifierCatalog {
    pub fn new(rules: Vec<ModifierRule>) -> Self {
        Self { rules }
    }

    /// Append a rule (evaluated after existing ones)
    pub fn push(&mut self, rule: ModifierRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Groups offered for `item`, in declaration order.
    ///
    /// When two rules declare the same group id, the first one wins, so a
    /// selection keyed by group id is never ambiguous.
    pub fn groups_for(&self, item: &MenuItem) -> Vec<&ModifierGroup> {
        let mut groups: Vec<&ModifierGroup> = Vec::new();
        for rule in self.rules.iter().filter(|r| r.applies_to(item)) {
            for group in &rule.groups {
                if !groups.iter().any(|g| g.id == group.id) {
                    groups.push(group);
                }
            }
        }
        groups
    }

    /// The house rule set
    pub fn builtin() -> Self {
        use Matcher::{CategoryContains as Cat, NameContains as Name};
        use ModifierKind::{Multiple, Single};

        let rule = |matchers: Vec<Matcher>, groups: Vec<ModifierGroup>| ModifierRule { matchers, groups };
        let cat = |s: &str| Cat(s.to_string());
        let name = |s: &str| Name(s.to_string());

        Self::new(vec![
            // Coffee & hot drinks
            rule(
                vec![cat("שתיה חמה"), name("קפה"), name("הפוך"), name("נס")],
                vec![
                    ModifierGroup::new(
                        "milk",
                        "סוג חלב",
                        Single,
                        &[
                            ("reg", "חלב רגיל"),
                            ("low", "חלב דל שומן"),
                            ("soy", "חלב סויה"),
                            ("almond", "חלב שקדים"),
                            ("oat", "חלב שיבולת שועל"),
                        ],
                    ),
                    ModifierGroup::new(
                        "prefs",
                        "העדפות",
                        Multiple,
                        &[
                            ("weak", "קפה חלש"),
                            ("strong", "קפה חזק"),
                            ("hot", "רותח"),
                            ("warm", "פושר"),
                            ("no_foam", "בלי קצף"),
                        ],
                    ),
                ],
            ),
            // Breakfast
            rule(
                vec![cat("בוקר")],
                vec![
                    ModifierGroup::new(
                        "eggs",
                        "סוג ביצים",
                        Single,
                        &[
                            ("sunny", "עין"),
                            ("over_easy", "עין הפוכה"),
                            ("scrambled", "מקושקשת"),
                            ("omelet", "חביתה"),
                            ("herbs", "חביתת ירק"),
                        ],
                    ),
                    ModifierGroup::new(
                        "bread",
                        "סוג לחם",
                        Single,
                        &[("grain", "לחם דגנים"), ("white", "לחם לבן"), ("gf", "לחם ללא גלוטן")],
                    ),
                    ModifierGroup::new(
                        "drink",
                        "שתיה קרה לבחירה",
                        Single,
                        &[
                            ("orange", "תפוזים"),
                            ("lemon", "לימונדה"),
                            ("grapefruit", "אשכוליות"),
                            ("water", "מים"),
                        ],
                    ),
                ],
            ),
            // Salads
            rule(
                vec![cat("סלט")],
                vec![
                    ModifierGroup::new(
                        "salad_mods",
                        "שינויים בסלט",
                        Multiple,
                        &[
                            ("sauce_side", "רוטב בצד"),
                            ("no_onion", "בלי בצל"),
                            ("no_parsley", "בלי פטרוזיליה"),
                            ("no_nuts", "בלי אגוזים"),
                            ("no_cheese", "בלי גבינה"),
                        ],
                    ),
                    ModifierGroup::new(
                        "bread",
                        "לחם בצד",
                        Single,
                        &[("grain", "לחם דגנים"), ("white", "לחם לבן"), ("none", "ללא לחם")],
                    ),
                ],
            ),
            // Sandwiches & toasts
            rule(
                vec![cat("כריכים"), cat("טוסט")],
                vec![
                    ModifierGroup::new(
                        "bread",
                        "סוג לחם",
                        Single,
                        &[("grain", "לחם דגנים"), ("white", "לחם לבן"), ("gf", "ללא גלוטן")],
                    ),
                    ModifierGroup::new(
                        "veggies",
                        "ירקות",
                        Multiple,
                        &[
                            ("no_onion", "בלי בצל"),
                            ("no_tomato", "בלי עגבניה"),
                            ("no_lettuce", "בלי חסה"),
                            ("well_done", "טוסט חזק"),
                        ],
                    ),
                ],
            ),
            // Pasta / mains
            rule(
                vec![cat("פסטה"), cat("עיקריות"), name("פסטה")],
                vec![
                    ModifierGroup::new(
                        "pasta_type",
                        "סוג פסטה",
                        Single,
                        &[("penne", "פנה"), ("fettuccine", "פוטוצ'יני")],
                    ),
                    ModifierGroup::new(
                        "pasta_mods",
                        "שינויים",
                        Multiple,
                        &[("no_parm", "בלי פרמז'ן"), ("sauce_side", "רוטב בצד")],
                    ),
                ],
            ),
            // Starters
            rule(
                vec![cat("ראשונות"), cat("נשנושים")],
                vec![ModifierGroup::new(
                    "sauces",
                    "רטבים",
                    Multiple,
                    &[("tahini", "טחינה בצד"), ("spicy", "חריף בצד"), ("no_sauce", "ללא רוטב")],
                )],
            ),
            // Cold drinks
            rule(
                vec![cat("שתיה קרה")],
                vec![ModifierGroup::new(
                    "serving",
                    "הגשה",
                    Multiple,
                    &[
                        ("extra_ice", "הרבה קרח"),
                        ("little_ice", "מעט קרח"),
                        ("no_ice", "ללא קרח"),
                        ("lemon_side", "לימון בצד"),
                        ("glass", "כוס זכוכית"),
                    ],
                )],
            ),
        ])
    }
}
