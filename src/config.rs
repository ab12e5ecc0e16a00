//! Engine configuration
//!
//! Defines the serde schema for `config/org-chart.yaml`. Every section has a
//! built-in default, so an empty document is a valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Category label of the system-administration chain
pub const SYSTEM_ADMINISTRATION: &str = "Sistem Yönetimi";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub rules: CategoryRules,
    #[serde(default)]
    pub transform: TransformOptions,
    #[serde(default)]
    pub controller: ControllerConfig,
}

impl EngineConfig {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Load configuration from YAML string (for testing)
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.rules.validate()?;
        Ok(config)
    }
}

// =============================================================================
// CATEGORY RULES
// =============================================================================

/// A role category and the title keywords that select it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category label, also the GROUP node title
    pub name: String,
    /// Matched as substrings of the normalized title
    pub keywords: Vec<String>,
    /// Hint for renderers; not used by the engine
    #[serde(default)]
    pub color: Option<String>,
}

impl CategoryRule {
    pub fn new(name: &str, keywords: &[&str], color: &str) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            color: Some(color.to_string()),
        }
    }
}

/// Ordered keyword table; the first rule with a matching keyword wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRules {
    /// Category whose manager chains are collapsed into one group
    #[serde(default = "default_chain_category")]
    pub chain_category: String,
    pub categories: Vec<CategoryRule>,
}

fn default_chain_category() -> String {
    SYSTEM_ADMINISTRATION.to_string()
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            chain_category: default_chain_category(),
            categories: vec![
                CategoryRule::new(SYSTEM_ADMINISTRATION, &["sistem", "system", "admin"], "#6366f1"),
                CategoryRule::new(
                    "Yazılım Ekibi",
                    &["yazilim", "software", "developer", "gelistirici", "frontend", "backend"],
                    "#0ea5e9",
                ),
                CategoryRule::new(
                    "Mühendislik Grubu",
                    &["muhendis", "engineer", "architect", "mimar"],
                    "#14b8a6",
                ),
                CategoryRule::new("Teknik Personel", &["teknisyen", "technician"], "#f59e0b"),
                CategoryRule::new(
                    "Tasarım Ekibi",
                    &["tasarim", "design", "grafik", "graphic"],
                    "#ec4899",
                ),
                CategoryRule::new(
                    "Satış ve Pazarlama",
                    &["satis", "sales", "pazarlama", "marketing"],
                    "#22c55e",
                ),
                CategoryRule::new(
                    "Muhasebe ve Finans",
                    &["muhasebe", "accounting", "finans", "finance"],
                    "#a855f7",
                ),
            ],
        }
    }
}

impl CategoryRules {
    /// Load a standalone rules document
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let rules: CategoryRules = serde_yaml::from_str(yaml)?;
        rules.validate()?;
        Ok(rules)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for rule in &self.categories {
            if rule.name.trim().is_empty() {
                anyhow::bail!("category rule with empty name");
            }
            if rule.keywords.iter().any(|k| normalize_title(k).is_empty()) {
                anyhow::bail!("category '{}' has an empty keyword", rule.name);
            }
        }
        Ok(())
    }

    /// Derive the category of a role title.
    ///
    /// Unmatched titles are their own category, so only textually identical
    /// unmatched titles ever cluster together.
    pub fn categorize(&self, title: &str) -> String {
        let normalized = normalize_title(title);
        self.categories
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .any(|keyword| normalized.contains(&normalize_title(keyword)))
            })
            .map(|rule| rule.name.clone())
            .unwrap_or_else(|| title.trim().to_string())
    }

    pub fn is_chain_category(&self, category: &str) -> bool {
        category == self.chain_category
    }

    pub fn color_for(&self, category: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|rule| rule.name == category)
            .and_then(|rule| rule.color.as_deref())
    }
}

/// Fold a title for keyword matching.
///
/// Decomposes, drops combining marks, maps the dotless ı, lowercases and
/// collapses whitespace: "SİSTEM  Yöneticisi" becomes "sistem yoneticisi".
pub fn normalize_title(s: &str) -> String {
    let folded: String = s
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c == 'ı' { 'i' } else { c })
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

// =============================================================================
// TRANSFORM / CONTROLLER OPTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Name of the synthetic root added over several top-level departments
    #[serde(default = "default_root_label")]
    pub root_label: String,
    /// Department codes treated as functional roots and hidden with their subtree
    #[serde(default)]
    pub excluded_root_codes: Vec<String>,
}

fn default_root_label() -> String {
    "Organizasyon".to_string()
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            root_label: default_root_label(),
            excluded_root_codes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Upper bound for one commit (read + patch); `null` waits forever
    #[serde(default = "default_commit_timeout_ms")]
    pub commit_timeout_ms: Option<u64>,
}

fn default_commit_timeout_ms() -> Option<u64> {
    Some(30_000)
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            commit_timeout_ms: default_commit_timeout_ms(),
        }
    }
}

impl ControllerConfig {
    pub fn commit_timeout(&self) -> Option<Duration> {
        self.commit_timeout_ms.map(Duration::from_millis)
    }
}
