//! Response rule table
//!
//! The table is plain configuration: built once when the process starts
//! (from the defaults below or a YAML file) and shared read-only between
//! sessions behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read rule table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rule table: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("rule {0:?} has no keywords")]
    EmptyRule(String),
}

/// A response category: its canned reply and the keywords that trigger it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRule {
    pub name: String,
    pub reply: String,
    pub keywords: Vec<String>,
}

/// A phrase check that only runs after no rule matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialPhrase {
    pub name: String,
    pub reply: String,
    pub phrases: Vec<String>,
}

/// Ordered rules, ordered special phrases, and the fallback reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    rules: Vec<ResponseRule>,
    #[serde(default)]
    special: Vec<SpecialPhrase>,
    fallback: String,
}

impl RuleTable {
    pub fn new(
        rules: Vec<ResponseRule>,
        special: Vec<SpecialPhrase>,
        fallback: impl Into<String>,
    ) -> Result<Self, RulesError> {
        let table = Self {
            rules,
            special,
            fallback: fallback.into(),
        };
        table.normalized()
    }

    /// Load a table from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RulesError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, RulesError> {
        let table: RuleTable = serde_yaml::from_str(yaml)?;
        table.normalized()
    }

    /// Lower-case every trigger once so matching only lower-cases the input
    fn normalized(mut self) -> Result<Self, RulesError> {
        for rule in &mut self.rules {
            rule.keywords = lowercase_all(&rule.keywords);
            if rule.keywords.is_empty() {
                return Err(RulesError::EmptyRule(rule.name.clone()));
            }
        }
        for phrase in &mut self.special {
            phrase.phrases = lowercase_all(&phrase.phrases);
            if phrase.phrases.is_empty() {
                return Err(RulesError::EmptyRule(phrase.name.clone()));
            }
        }
        Ok(self)
    }

    pub fn rules(&self) -> &[ResponseRule] {
        &self.rules
    }

    pub fn special(&self) -> &[SpecialPhrase] {
        &self.special
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

fn lowercase_all(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn rule(name: &str, reply: &str, keywords: &[&str]) -> ResponseRule {
    ResponseRule {
        name: name.to_string(),
        reply: reply.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn special(name: &str, reply: &str, phrases: &[&str]) -> SpecialPhrase {
    SpecialPhrase {
        name: name.to_string(),
        reply: reply.to_string(),
        phrases: phrases.iter().map(|p| p.to_string()).collect(),
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        let rules = vec![
            rule(
                "greeting",
                "Hello! I'm GraceBot, Grace Aliko's virtual assistant. How can I help you today?",
                &["hi", "hello", "hey", "greetings", "howdy"],
            ),
            rule(
                "skills",
                "Grace is skilled in full stack development (React, Next.js, Node.js, TypeScript) \
                 and NLP research (PyTorch, Hugging Face, NLTK). She's passionate about building \
                 accessible web applications and developing language technology for low-resource \
                 African languages.",
                &[
                    "skills",
                    "abilities",
                    "good at",
                    "expertise",
                    "tech stack",
                    "technologies",
                    "stack",
                    "framework",
                ],
            ),
            rule(
                "experience",
                "Grace has worked as a Senior Full Stack Developer at TechInnovate Ghana \
                 (2021-present), an NLP Research Assistant at African Languages Institute \
                 (2020-2021), and a Frontend Developer at Global Solutions Ltd (2018-2020).",
                &["experience", "work", "job", "career", "professional", "employment"],
            ),
            rule(
                "education",
                "Grace holds an MSc in Computational Linguistics from the University of Ghana \
                 (2019-2021) and a BSc in Computer Science from Kwame Nkrumah University of \
                 Science and Technology (2014-2018).",
                &[
                    "education",
                    "degree",
                    "university",
                    "school",
                    "study",
                    "studied",
                    "qualification",
                ],
            ),
            rule(
                "projects",
                "Grace has worked on several projects including an African Languages Translator, \
                 Twi NLP Toolkit, E-commerce Platform, and Language Learning App. You can check \
                 them out in the Projects section!",
                &[
                    "projects",
                    "portfolio",
                    "work",
                    "built",
                    "created",
                    "developed",
                    "applications",
                ],
            ),
            rule(
                "languages",
                "Grace is fluent in English and Twi. She also has programming experience with \
                 JavaScript/TypeScript, Python, SQL, and HTML/CSS.",
                &["languages", "speak", "programming languages", "coding languages"],
            ),
            rule(
                "contact",
                "You can reach Grace at hello@gracealiko.com or connect with her on LinkedIn and \
                 GitHub. There's also a contact form in the Contact section of this website.",
                &["contact", "email", "reach", "message", "connect"],
            ),
            rule(
                "location",
                "Grace is based in Accra, Ghana.",
                &[
                    "location", "live", "based", "country", "city", "where", "ghana", "accra",
                ],
            ),
            rule(
                "research",
                "Grace's research focuses on improving NLP for low-resource African languages, \
                 particularly Ghanaian languages like Twi, Ewe, and Ga. She's interested in \
                 transfer learning approaches and building better datasets for these languages.",
                &[
                    "research",
                    "nlp",
                    "language",
                    "african languages",
                    "low-resource",
                    "papers",
                    "publications",
                ],
            ),
            rule(
                "hobbies",
                "When not coding or researching, Grace enjoys exploring linguistic patterns, \
                 contributing to open source, and reading books on language evolution.",
                &[
                    "hobbies",
                    "interests",
                    "free time",
                    "fun",
                    "enjoy",
                    "passion",
                    "outside work",
                ],
            ),
        ];

        let special = vec![
            special(
                "identity",
                "I'm GraceBot, a virtual assistant for Grace Aliko's portfolio website. I can \
                 answer questions about Grace's background, skills, and projects!",
                &["who are you", "what are you"],
            ),
            special(
                "about",
                "Grace Aliko is a Ghanaian full stack developer and aspiring NLP researcher with a \
                 passion for building bridges between technology and African languages. She \
                 creates elegant, functional applications while researching ways to improve \
                 natural language processing for low-resource African languages.",
                &["who is grace", "about grace"],
            ),
            special(
                "gratitude",
                "You're welcome! Feel free to ask if you have any other questions about Grace.",
                &["thank"],
            ),
        ];

        Self {
            rules,
            special,
            fallback: "I don't have specific information about that yet. Grace is constantly \
                       updating me with new information. Feel free to ask something else!"
                .to_string(),
        }
    }
}
