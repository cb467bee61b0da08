use chambers_engine::config::Config;
use chambers_engine::llm::{build_prompt, PromptContext};
use chambers_engine::memory::{ConversationMemory, InMemoryStore};
use chambers_engine::router::IntentRouter;
use proptest::prelude::*;
use sdk::Speaker;
use std::sync::Arc;

// Routing keys and queries without leading/trailing whitespace
fn token() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,15}"
}

proptest! {
    #[test]
    fn test_command_key_is_first_token(
        key in token(),
        gap in "[ \t]{1,4}",
        query in "[a-z0-9]([a-z0-9 ]{0,30}[a-z0-9])?",
    ) {
        let decision = IntentRouter::new().parse(&format!("/{}{}{}", key, gap, query));
        prop_assert_eq!(decision.key, key);
        prop_assert_eq!(decision.query, query);
    }

    #[test]
    fn test_bare_command_has_empty_query(key in token()) {
        let decision = IntentRouter::new().parse(&format!("  /{}  ", key));
        prop_assert_eq!(decision.key, key);
        prop_assert_eq!(decision.query, "");
    }

    #[test]
    fn test_legal_keywords_win_over_drafting(
        legal in "sovereignty|case|statute|law|precedent",
        drafting in "memo|draft",
        filler in "[a-z ]{0,20}",
        legal_first in any::<bool>(),
    ) {
        let text = if legal_first {
            format!("{} {} {}", legal, filler, drafting)
        } else {
            format!("{} {} {}", drafting, filler, legal)
        };
        prop_assert_eq!(IntentRouter::new().classify(&text), "case_law_scholar");
    }

    #[test]
    fn test_plain_query_is_trimmed_input(text in "[a-z][a-z ]{0,40}[a-z]") {
        let decision = IntentRouter::new().parse(&format!("  {}\n", text));
        prop_assert_eq!(decision.query, text);
    }

    #[test]
    fn test_line_context_prompt_shape(
        lines in prop::collection::vec("[A-Z]{1,5}: [a-z]{1,10}", 1..6),
        prompt in "[a-z?]{1,20}",
    ) {
        let full = build_prompt(&prompt, Some(&PromptContext::Lines(lines.clone())));
        let expected = format!("{}\n\n{}", lines.join("\n\n"), prompt);
        prop_assert_eq!(full, expected);
    }

    #[test]
    fn test_memory_keeps_newest_cap_entries(turns in 1usize..6, extra in 0usize..10) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let memory = ConversationMemory::new(Arc::new(InMemoryStore::new()), turns, "history:");
            let total = 2 * turns + extra;
            for i in 0..total {
                memory.append("p", Speaker::Bot, &i.to_string()).await.unwrap();
            }

            let history = memory.history("p").await;
            let expected: Vec<String> = (total.saturating_sub(2 * turns)..total)
                .map(|i| format!("BOT: {}", i))
                .collect();
            assert_eq!(history, expected);
        });
    }

    #[test]
    fn test_config_parsing_round_trip(
        log_level in "error|warn|info|debug|trace",
        backend in "openai|ollama",
        memory_backend in "sqlite|memory",
        turns in 1usize..100,
        fallback_max_tokens in 1u32..10_000,
    ) {
        let mut config = Config::default_config();
        config.core.log_level = log_level;
        config.llm.backend = backend;
        config.memory.backend = memory_backend;
        config.memory.turns = turns;
        config.orchestrator.fallback_max_tokens = fallback_max_tokens;

        let toml_string = toml::to_string(&config).expect("Failed to serialize config");
        let parsed = Config::from_toml(&toml_string).expect("Failed to parse config");

        prop_assert_eq!(parsed.core.log_level, config.core.log_level);
        prop_assert_eq!(parsed.llm.backend, config.llm.backend);
        prop_assert_eq!(parsed.memory.backend, config.memory.backend);
        prop_assert_eq!(parsed.memory.turns, config.memory.turns);
        prop_assert_eq!(
            parsed.orchestrator.fallback_max_tokens,
            config.orchestrator.fallback_max_tokens
        );
        prop_assert_eq!(parsed.orchestrator.system_prompt, config.orchestrator.system_prompt);
    }
}
