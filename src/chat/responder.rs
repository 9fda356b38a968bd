//! Keyword responder

use std::sync::Arc;

use super::RuleTable;

/// What produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind<'a> {
    /// A table rule, and the keyword that triggered it
    Rule { rule: &'a str, keyword: &'a str },
    /// A special phrase checked after the table
    Special(&'a str),
    Fallback,
}

/// A reply together with the reason it was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub kind: MatchKind<'a>,
    pub reply: &'a str,
}

/// Maps free text to a canned reply using a shared [`RuleTable`]
///
/// Replies depend on the input text and the table only.
#[derive(Debug, Clone)]
pub struct Responder {
    table: Arc<RuleTable>,
}

impl Responder {
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// The reply for `input`
    pub fn respond(&self, input: &str) -> &str {
        self.resolve(input).reply
    }

    /// The reply for `input` and what matched
    ///
    /// Rules are tried in table order, keywords in rule order, and the first
    /// keyword found anywhere in the lower-cased input wins. Special phrases
    /// are only consulted when no rule matched.
    pub fn resolve(&self, input: &str) -> Resolution<'_> {
        let input = input.to_lowercase();

        for rule in self.table.rules() {
            if let Some(keyword) = rule.keywords.iter().find(|k| input.contains(k.as_str())) {
                return Resolution {
                    kind: MatchKind::Rule {
                        rule: rule.name.as_str(),
                        keyword: keyword.as_str(),
                    },
                    reply: rule.reply.as_str(),
                };
            }
        }

        for phrase in self.table.special() {
            if phrase.phrases.iter().any(|p| input.contains(p.as_str())) {
                return Resolution {
                    kind: MatchKind::Special(phrase.name.as_str()),
                    reply: phrase.reply.as_str(),
                };
            }
        }

        Resolution {
            kind: MatchKind::Fallback,
            reply: self.table.fallback(),
        }
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(Arc::new(RuleTable::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_of(responder: &Responder, rule: &str) -> String {
        let table = responder.table();
        table
            .rules()
            .iter()
            .map(|r| (&r.name, &r.reply))
            .chain(table.special().iter().map(|s| (&s.name, &s.reply)))
            .find(|(name, _)| name.as_str() == rule)
            .map(|(_, reply)| reply.clone())
            .unwrap()
    }

    #[test]
    fn test_greeting() {
        let responder = Responder::default();
        assert_eq!(
            responder.respond("Hi there"),
            reply_of(&responder, "greeting")
        );
        assert_eq!(
            responder.resolve("Hi there").kind,
            MatchKind::Rule {
                rule: "greeting",
                keyword: "hi"
            }
        );
    }

    #[test]
    fn test_skills_substring_match() {
        let responder = Responder::default();
        assert_eq!(
            responder.respond("What are your skills?"),
            reply_of(&responder, "skills")
        );
        assert_eq!(
            responder.respond("Which FRAMEWORKS do you use"),
            reply_of(&responder, "greeting"),
            "\"which\" contains \"hi\" and greeting comes first"
        );
    }

    #[test]
    fn test_fallback() {
        let responder = Responder::default();
        let resolution = responder.resolve("asdkjasdkj");
        assert_eq!(resolution.kind, MatchKind::Fallback);
        assert_eq!(resolution.reply, responder.table().fallback());
    }

    #[test]
    fn test_gratitude() {
        let responder = Responder::default();
        assert_eq!(
            responder.resolve("thank you so much").kind,
            MatchKind::Special("gratitude")
        );
    }

    #[test]
    fn test_table_checked_before_special_phrases() {
        let responder = Responder::default();
        assert_eq!(
            responder.respond("thanks for the info about your skills"),
            reply_of(&responder, "skills")
        );
    }

    #[test]
    fn test_special_phrases_in_order() {
        let responder = Responder::default();
        assert_eq!(
            responder.resolve("who are you?").kind,
            MatchKind::Special("identity")
        );
        assert_eq!(
            responder.resolve("Who is Grace?").kind,
            MatchKind::Special("about")
        );
    }

    #[test]
    fn test_first_rule_wins() {
        let responder = Responder::default();
        // "work" is a keyword of both experience and projects
        assert_eq!(
            responder.resolve("tell me about your work").kind,
            MatchKind::Rule {
                rule: "experience",
                keyword: "work"
            }
        );
    }

    #[test]
    fn test_deterministic() {
        let responder = Responder::default();
        let first = responder.respond("Where are you based?").to_string();
        for _ in 0..10 {
            assert_eq!(responder.respond("Where are you based?"), first);
        }
    }
}
