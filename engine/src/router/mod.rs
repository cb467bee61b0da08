//! Intent Router
//!
//! Turns raw message text into a [`RoutingDecision`]. An explicit slash
//! command always wins; anything else is classified by a fixed, ordered
//! keyword table where the first matching rule decides the route.
//!
//! The router is pure: no I/O, no shared state. Whether the chosen key is
//! actually registered is the orchestrator's concern.

use sdk::types::RoutingDecision;

/// Prefix marking an explicit agent command
pub const COMMAND_MARKER: char = '/';

/// Route used when no keyword rule matches
pub const GENERIC_ROUTE: &str = "generic";

/// One keyword classification rule
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    /// Lower-case substrings, any of which selects the route
    pub keywords: &'static [&'static str],

    /// Routing key produced on a match
    pub route: &'static str,
}

/// Default rules in priority order
pub const DEFAULT_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["sovereignty", "case", "statute", "law", "precedent"],
        route: "case_law_scholar",
    },
    KeywordRule {
        keywords: &["memo", "draft"],
        route: "memo_drafter",
    },
    KeywordRule {
        keywords: &["remind", "schedule"],
        route: "n8n_scheduler",
    },
    KeywordRule {
        keywords: &["weather", "help", "how do i", "what is"],
        route: "help",
    },
];

/// Keyword and command based intent classifier
#[derive(Debug, Clone)]
pub struct IntentRouter {
    rules: &'static [KeywordRule],
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentRouter {
    /// Create a router over [`DEFAULT_RULES`]
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES)
    }

    /// Create a router over a custom rule table
    pub fn with_rules(rules: &'static [KeywordRule]) -> Self {
        Self { rules }
    }

    /// Parse raw text into a routing decision
    ///
    /// `"/memo draft quarterly memo"` yields key `memo` and query
    /// `draft quarterly memo`. Plain text yields the classified key and the
    /// whole trimmed text as query.
    pub fn parse(&self, text: &str) -> RoutingDecision {
        let text = text.trim();

        if let Some(command) = text.strip_prefix(COMMAND_MARKER) {
            let command = command.trim_start();
            let (key, query) = match command.split_once(char::is_whitespace) {
                Some((key, rest)) => (key, rest.trim_start()),
                None => (command, ""),
            };
            return RoutingDecision::new(key, query);
        }

        RoutingDecision::new(self.classify(text), text)
    }

    /// Route key for non-command text
    pub fn classify(&self, text: &str) -> &'static str {
        let lowered = text.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(*kw)))
            .map(|rule| rule.route)
            .unwrap_or(GENERIC_ROUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (String, String) {
        let decision = IntentRouter::new().parse(text);
        (decision.key, decision.query)
    }

    #[test]
    fn test_command_with_query() {
        assert_eq!(
            parse("/memo draft quarterly memo"),
            ("memo".into(), "draft quarterly memo".into())
        );
    }

    #[test]
    fn test_command_without_query() {
        assert_eq!(parse("  /case_law  "), ("case_law".into(), String::new()));
    }

    #[test]
    fn test_command_skips_whitespace_run() {
        assert_eq!(
            parse("/convert \t  csv_to_xlsx now"),
            ("convert".into(), "csv_to_xlsx now".into())
        );
    }

    #[test]
    fn test_command_key_is_case_sensitive() {
        assert_eq!(parse("/Memo hi").0, "Memo");
    }

    #[test]
    fn test_command_overrides_keywords() {
        assert_eq!(parse("/memo about case law").0, "memo");
    }

    #[test]
    fn test_keyword_routes() {
        assert_eq!(parse("Tell me about tribal SOVEREIGNTY").0, "case_law_scholar");
        assert_eq!(parse("Please draft a letter").0, "memo_drafter");
        assert_eq!(parse("remind me tomorrow").0, "n8n_scheduler");
        assert_eq!(parse("How do I reset it?").0, "help");
        assert_eq!(parse("good morning").0, GENERIC_ROUTE);
    }

    #[test]
    fn test_legal_beats_drafting() {
        assert_eq!(parse("draft a memo on the statute").0, "case_law_scholar");
    }

    #[test]
    fn test_query_is_full_trimmed_text() {
        assert_eq!(
            parse("  What is tribal sovereignty?  "),
            ("case_law_scholar".into(), "What is tribal sovereignty?".into())
        );
    }

    #[test]
    fn test_custom_rules() {
        const RULES: &[KeywordRule] = &[KeywordRule {
            keywords: &["ping"],
            route: "pong",
        }];
        let router = IntentRouter::with_rules(RULES);
        assert_eq!(router.parse("ping!").key, "pong");
        assert_eq!(router.parse("case law").key, GENERIC_ROUTE);
    }

    #[test]
    fn test_space_after_marker_is_skipped() {
        let decision = IntentRouter::new().parse("/ foo");
        assert_eq!(decision.key, "foo");
        assert_eq!(decision.query, "");

        let decision = IntentRouter::new().parse("/   memo  draft it");
        assert_eq!(decision.key, "memo");
        assert_eq!(decision.query, "draft it");

        assert_eq!(IntentRouter::new().parse("/").key, "");
    }
}
