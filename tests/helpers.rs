#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use blog_summarizer::{
    archive::MemoryBlogArchive, config::Config, history::MemoryHistoryStore, AppState,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

pub const MODEL: &str = "gemini-test";
pub const API_KEY: &str = "test-key";
pub const SUMMARY: &str = "A short summary.";
pub const URDU: &str = "ایک مختصر خلاصہ۔";

pub const BLOG_HTML: &str = r#"<html><head><title>Post</title></head><body>
<nav>Home</nav>
<p>First paragraph.</p>
<article><p>Second <strong>paragraph</strong>.</p></article>
</body></html>"#;

pub fn test_config(gemini_base: &str, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("GEMINI_API_KEY".to_string(), API_KEY.to_string()),
        ("GEMINI_MODEL".to_string(), MODEL.to_string()),
        ("GEMINI_BASE_URL".to_string(), gemini_base.to_string()),
        ("FETCH_TIMEOUT_SECS".to_string(), "5".to_string()),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_vars(|key| vars.get(key).cloned()).unwrap()
}

pub struct TestApp {
    pub state: AppState,
    pub history: Arc<MemoryHistoryStore>,
    pub archive: Arc<MemoryBlogArchive>,
}

pub fn test_state(config: Config) -> TestApp {
    let history = Arc::new(MemoryHistoryStore::new());
    let archive = Arc::new(MemoryBlogArchive::new());
    let state = AppState::new(config, history.clone(), archive.clone()).unwrap();
    TestApp { state, history, archive }
}

pub fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
}

pub fn generate_path() -> String {
    format!("/models/{}:generateContent", MODEL)
}

/// Mounts the summarize and translate responses on `server`.
pub async fn mount_gemini(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(header("x-goog-api-key", API_KEY))
        .and(body_string_contains("Summarize this blog"))
        .respond_with(gemini_reply(SUMMARY))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(header("x-goog-api-key", API_KEY))
        .and(body_string_contains("Translate this into Urdu"))
        .respond_with(gemini_reply(URDU))
        .mount(server)
        .await;
}

pub async fn mount_blog(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(BLOG_HTML)
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}
