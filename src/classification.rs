/// Markers of money moving between the user's own accounts.
pub const TRANSFER_MARKERS: &[&str] = &["пополнение", "перевод", "top-up", "transfer"];

pub const UNCATEGORIZED: &str = "uncategorized";

const DEFAULT_RULES: &[(&str, &str)] = &[
    ("MAGNUM", "Еда"),
    ("WOLT.COM", "Еда"),
    ("МакДак", "Еда"),
    ("Beeline", "Связь"),
    ("Яндекс.Такси", "Транспорт"),
    ("Ali mart", "Разное"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRule {
    pub keyword: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Transfer,
    Expense { category: String },
}

/// Keyword → category table, matched in order. The first hit wins.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
    // lowercased once, parallel to `rules`
    needles: Vec<String>,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_RULES
                .iter()
                .map(|(keyword, category)| CategoryRule {
                    keyword: keyword.to_string(),
                    category: category.to_string(),
                })
                .collect(),
        )
    }
}

impl CategoryRules {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let needles = rules.iter().map(|rule| rule.keyword.to_lowercase()).collect();
        Self { rules, needles }
    }

    fn categorize_lowercase(&self, details: &str) -> &str {
        self.needles
            .iter()
            .zip(&self.rules)
            .find(|(needle, _)| !needle.is_empty() && details.contains(needle.as_str()))
            .map(|(_, rule)| rule.category.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    /// Transfers are checked before any category keyword.
    pub fn classify(&self, details: &str) -> Classification {
        let details = details.to_lowercase();

        if TRANSFER_MARKERS.iter().any(|marker| details.contains(marker)) {
            return Classification::Transfer;
        }

        Classification::Expense {
            category: self.categorize_lowercase(&details).to_owned(),
        }
    }
}
