use lingo_notes_core::ports::{PortError, TranslationService};
use notes_api_lib::adapters::HttpTranslationAdapter;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn adapter_for(server: &MockServer) -> HttpTranslationAdapter {
    HttpTranslationAdapter::new(
        reqwest::Client::new(),
        format!("{}/v1/translate", server.uri()),
    )
}

#[tokio::test]
async fn extracts_the_target_language_translation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/translate"))
        .and(query_param("text", "hello"))
        .and(query_param("from", "en"))
        .and(query_param("to", "ko"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "from": "en",
            "to": "ko",
            "original_text": "hello",
            "translated_text": { "ko": "안녕" },
            "translated_characters": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = adapter_for(&server)
        .translate("hello", "en", "ko")
        .await
        .unwrap();

    assert_eq!(result.translated_text, "안녕");
    assert_eq!(result.text, "hello");
    assert_eq!(result.from, "en");
    assert_eq!(result.to, "ko");
}

#[tokio::test]
async fn sends_rapidapi_headers_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("X-RapidAPI-Key", "test-key"))
        .and(header("X-RapidAPI-Host", "nlp-translation.p.rapidapi.com"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "translated_text": { "fr": "bonjour" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let adapter = adapter_for(&server).with_rapidapi_credentials(
        "test-key".to_string(),
        "nlp-translation.p.rapidapi.com".to_string(),
    );
    let result = adapter.translate("hello", "en", "fr").await.unwrap();

    assert_eq!(result.translated_text, "bonjour");
}

#[tokio::test]
async fn non_200_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = adapter_for(&server)
        .translate("hello", "en", "ko")
        .await
        .unwrap_err();

    assert!(matches!(err, PortError::UnexpectedStatus(500)));
}

#[tokio::test]
async fn missing_target_entry_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "translated_text": { "ja": "こんにちは" } })),
        )
        .mount(&server)
        .await;

    let err = adapter_for(&server)
        .translate("hello", "en", "ko")
        .await
        .unwrap_err();

    assert!(matches!(err, PortError::MalformedResponse(_)));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>quota exceeded</html>"))
        .mount(&server)
        .await;

    let err = adapter_for(&server)
        .translate("hello", "en", "ko")
        .await
        .unwrap_err();

    assert!(matches!(err, PortError::MalformedResponse(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let adapter = HttpTranslationAdapter::new(reqwest::Client::new(), "http://127.0.0.1:1/v1/translate");

    let err = adapter.translate("hello", "en", "ko").await.unwrap_err();

    assert!(matches!(err, PortError::Transport(_)));
}
