use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Reply shown instead of calling the model when a question is off topic
pub const OFF_TOPIC_REFUSAL: &str =
    "I'm sorry, but that topic is outside of my expertise in biology. Please ask a biology-related question!";

/// Built-in allow-list. Matching is a lowercase substring test.
pub const DEFAULT_BIOLOGY_KEYWORDS: &[&str] = &[
    "biology", "cell", "organism", "ecosystem", "biosphere", "species", "population",
    "community", "habitat", "niche", "cell membrane", "nucleus", "cytoplasm",
    "mitochondria", "ribosome", "endoplasmic reticulum", "golgi apparatus",
    "chloroplast", "cell wall", "plasma membrane", "dna", "rna", "gene",
    "chromosome", "allele", "genotype", "phenotype", "homozygous", "heterozygous",
    "mutation", "natural selection", "adaptation", "speciation", "phylogenetics",
    "extinction", "evolution", "common ancestor", "fossil record", "artificial selection",
    "biomass", "trophic levels", "food chain", "food web", "biogeochemical cycle",
    "symbiosis", "mutualism", "commensalism", "parasitism", "carrying capacity",
    "homeostasis", "metabolism", "photosynthesis", "cellular respiration", "hormones",
    "neurons", "immune system", "endocrine system", "cardiovascular system",
    "digestive system", "bacteria", "virus", "fungi", "protozoa", "microbiome",
    "antibiotics", "pathogen", "infection", "immunology", "vaccination",
    "protein", "enzyme", "amino acid", "mitosis", "meiosis", "genetics", "heredity",
    "inheritance",
];

/// Outcome of running a question through the topic gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicDecision {
    /// Forward to the model. `matched` is the first keyword hit, `None` when the gate is off.
    Accept { matched: Option<String> },
    /// Answer locally with [`OFF_TOPIC_REFUSAL`]
    Reject,
}

impl TopicDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, TopicDecision::Accept { .. })
    }
}

/// Topic gate settings as stored in the `[topic]` table of a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Turn the gate off to forward every question
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Replaces the built-in keyword list
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Appended to `keywords`
    #[serde(default)]
    pub extra_keywords: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_keywords() -> Vec<String> {
    DEFAULT_BIOLOGY_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            keywords: default_keywords(),
            extra_keywords: Vec::new(),
        }
    }
}

impl TopicConfig {
    /// Load topic settings from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read topic config {}", path.display()))?;
        let config: TopicConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse topic config {}", path.display()))?;
        Ok(config)
    }

    /// Save topic settings to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Keyword allow-list used to keep the tutor on biology questions.
///
/// This is a heuristic, not a classifier: "cell" also matches "cellphone",
/// and paraphrased questions that avoid every keyword are rejected.
#[derive(Debug, Clone)]
pub struct TopicPolicy {
    enabled: bool,
    keywords: Arc<Vec<String>>,
}

impl TopicPolicy {
    /// Gate using the built-in biology keywords
    pub fn new() -> Self {
        Self::from_keywords(DEFAULT_BIOLOGY_KEYWORDS.iter().copied())
    }

    /// Gate that accepts everything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            keywords: Arc::new(Vec::new()),
        }
    }

    /// Gate over a custom keyword list. Keywords are lowercased, blanks and duplicates dropped.
    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }

        Self {
            enabled: true,
            keywords: Arc::new(normalized),
        }
    }

    pub fn from_config(config: &TopicConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self::from_keywords(config.keywords.iter().chain(config.extra_keywords.iter()))
    }

    /// Load a policy from a TOML file holding a [`TopicConfig`]
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_config(&TopicConfig::load_from_file(path)?))
    }

    /// Decide whether a question should reach the model
    pub fn evaluate(&self, text: &str) -> TopicDecision {
        if !self.enabled {
            return TopicDecision::Accept { matched: None };
        }

        let lowered = text.to_lowercase();
        match self.keywords.iter().find(|keyword| lowered.contains(keyword.as_str())) {
            Some(keyword) => TopicDecision::Accept {
                matched: Some(keyword.clone()),
            },
            None => TopicDecision::Reject,
        }
    }

    pub fn accepts(&self, text: &str) -> bool {
        self.evaluate(text).is_accepted()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn refusal(&self) -> &'static str {
        OFF_TOPIC_REFUSAL
    }
}

impl Default for TopicPolicy {
    fn default() -> Self {
        Self::new()
    }
}
