use pretty_assertions::assert_eq;
use serial_test::serial;

use folio::config::Config;
use folio::db::DatabaseBackend;

const LLM_VARS: &[&str] = &["LLM_MODEL", "LLM_URL", "LLM_API_KEY", "LLM_BASE_URL", "LLM_TIMEOUT"];

fn clear(vars: &[&str]) {
    for var in vars {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn llm_config_absent_without_env() {
    clear(LLM_VARS);

    let config = Config::from_env();
    assert!(config.llm.is_none());
}

#[test]
#[serial]
fn llm_config_from_proxy_url() {
    clear(LLM_VARS);
    std::env::set_var("LLM_URL", "https://example.test/functions/v1/complete");

    let config = Config::from_env();
    let llm = config.llm.expect("llm config");
    assert_eq!(llm.model, "gpt-4o-mini");
    assert_eq!(
        llm.url.as_deref(),
        Some("https://example.test/functions/v1/complete")
    );
    assert_eq!(llm.timeout_secs, 15);

    clear(LLM_VARS);
}

#[test]
#[serial]
fn blank_llm_url_counts_as_unset() {
    clear(LLM_VARS);
    std::env::set_var("LLM_URL", "   ");
    std::env::set_var("LLM_MODEL", "ollama/llama3");

    let config = Config::from_env();
    let llm = config.llm.expect("llm config");
    assert_eq!(llm.model, "ollama/llama3");
    assert!(llm.url.is_none());

    clear(LLM_VARS);
}

#[test]
#[serial]
fn api_keys_are_trimmed() {
    std::env::set_var("FOLIO_API_KEYS", " one , two ,,");

    let config = Config::from_env();
    assert_eq!(config.server.api_keys, vec!["one", "two"]);

    std::env::remove_var("FOLIO_API_KEYS");
    assert!(Config::from_env().server.api_keys.is_empty());
}

#[test]
#[serial]
fn retrieval_thresholds_come_from_env() {
    std::env::set_var("CONTENT_MATCH_THRESHOLD", "0.45");
    std::env::set_var("PROJECT_MATCH_LIMIT", "3");
    std::env::set_var("CHAT_TIMEOUT", "12");

    let retrieval = Config::from_env().retrieval;
    assert_eq!(retrieval.content_threshold, 0.45);
    assert_eq!(retrieval.project_limit, 3);
    assert_eq!(retrieval.chat_timeout_secs, 12);

    clear(&["CONTENT_MATCH_THRESHOLD", "PROJECT_MATCH_LIMIT", "CHAT_TIMEOUT"]);
}

#[test]
#[serial]
fn invalid_threshold_falls_back_to_default() {
    std::env::set_var("PROJECT_MATCH_THRESHOLD", "very-high");

    let config = Config::from_env();
    assert_eq!(config.retrieval.project_threshold, 0.7);

    std::env::remove_var("PROJECT_MATCH_THRESHOLD");
}

#[test]
#[serial]
fn missing_backend_url_selects_memory_store() {
    clear(&["BACKEND_URL", "BACKEND_API_KEY", "BACKEND_TIMEOUT"]);

    let backend = Config::from_env().backend;
    assert!(backend.url.is_none());
    assert_eq!(backend.timeout_secs, 10);

    let db = folio::db::connect(&backend).expect("memory backend");
    assert_eq!(db.name(), "memory");
}
