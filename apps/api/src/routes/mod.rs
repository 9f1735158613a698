pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::network::handlers as network;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/health", get(health::health_handler))
        // Connection analysis
        .route(
            "/api/analyze-connections",
            post(network::handle_analyze_connections),
        )
        .route(
            "/api/analyze-multiple-csv",
            post(network::handle_analyze_multiple),
        )
        .route("/api/analyze/network", post(network::handle_network_analysis))
        // Profile & CV
        .route("/api/analyze", post(profile::handle_profile_analysis))
        .route("/api/optimize-profile", post(profile::handle_optimize_profile))
        .route("/api/custom-prompt", post(profile::handle_custom_prompt))
        .route("/api/chat", post(profile::handle_chat))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::{
        ApiKey, ChatCompletion, ChatMessage, Completion, CompletionOptions, LlmError, Usage,
    };

    const BOUNDARY: &str = "insights-test-boundary";

    const EXPORT: &str = "\
First Name,Last Name,Company,Position,Connected On
Ada,Lovelace,Analytical Engines,Senior Software Engineer,05 Jan 2023
Grace,Hopper,US Navy,Software Engineer,20 Jan 2023
Linus,Torvalds,Linux Foundation,Maintainer,01 Feb 2023
";

    /// Records every prompt and answers with a fixed reply.
    #[derive(Default)]
    struct StubCompletion {
        reply: String,
        fail: bool,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl StubCompletion {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                ..Self::default()
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail: true,
                ..Self::default()
            })
        }

        fn last_prompt(&self) -> Vec<ChatMessage> {
            self.seen.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl ChatCompletion for StubCompletion {
        async fn complete(
            &self,
            _api_key: &ApiKey,
            messages: &[ChatMessage],
            _options: CompletionOptions,
        ) -> Result<Completion, LlmError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            if self.fail {
                return Err(LlmError::Api {
                    status: 401,
                    message: "Incorrect API key provided".to_string(),
                });
            }
            Ok(Completion {
                content: self.reply.clone(),
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
            })
        }
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            field: &'a str,
            name: &'a str,
            content_type: &'a str,
            body: &'a str,
        },
    }

    fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
        let mut body = String::new();
        for part in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match part {
                Part::Text(name, value) => {
                    body.push_str(&format!(
                        "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                    ));
                }
                Part::File {
                    field,
                    name,
                    content_type,
                    body: content,
                } => {
                    body.push_str(&format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n{content}\r\n"
                    ));
                }
            }
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn csv_part<'a>(field: &'a str, name: &'a str, body: &'a str) -> Part<'a> {
        Part::File {
            field,
            name,
            content_type: "text/csv",
            body,
        }
    }

    fn app(llm: Arc<StubCompletion>) -> Router {
        build_router(AppState {
            llm,
            config: Config::default(),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, json) = send(app(StubCompletion::replying("")), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_analyze_connections_returns_content_and_series() {
        let llm = StubCompletion::replying(
            "1. Reconnect with former colleagues\n2. Grow your network in Europe\n3. Follow industry leaders",
        );
        let request = multipart_request(
            "/api/analyze-connections",
            &[
                Part::Text("apiKey", "sk-test"),
                csv_part("csvFile", "Connections.csv", EXPORT),
            ],
        );
        let (status, json) = send(app(llm.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalConnections"], 3);
        assert_eq!(json["headers"][2], "Company");
        assert_eq!(json["dataPreview"].as_array().unwrap().len(), 3);
        assert_eq!(json["cleanupSuggestions"][1], "Grow your network in Europe");
        assert_eq!(json["dashboard"]["profileScore"], 50);
        assert_eq!(json["usage"]["totalTokens"], 15);

        let viz = &json["visualization"];
        assert_eq!(viz["roles"]["synthetic"], false);
        assert_eq!(viz["roles"]["buckets"][0]["label"], "Software Engineer");
        assert_eq!(viz["roles"]["buckets"][0]["count"], 2);
        assert_eq!(viz["countries"]["synthetic"], true);
        assert_eq!(viz["connections"]["points"][0]["period"], "2023-01");

        let prompt = llm.last_prompt();
        assert!(prompt[1].content.contains("Total connections: 3"));
        assert!(prompt[1].content.contains("CSV File: Connections.csv"));
    }

    #[tokio::test]
    async fn test_analyze_connections_requires_api_key() {
        let request = multipart_request(
            "/api/analyze-connections",
            &[csv_part("csvFile", "Connections.csv", EXPORT)],
        );
        let (status, json) = send(app(StubCompletion::replying("")), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "API key is required");
    }

    #[tokio::test]
    async fn test_analyze_connections_requires_file() {
        let request = multipart_request("/api/analyze-connections", &[Part::Text("apiKey", "sk-test")]);
        let (status, json) = send(app(StubCompletion::replying("")), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "CSV file is required");
    }

    #[tokio::test]
    async fn test_header_only_csv_is_unprocessable_and_skips_llm() {
        let llm = StubCompletion::replying("unused");
        let request = multipart_request(
            "/api/analyze-connections",
            &[
                Part::Text("apiKey", "sk-test"),
                csv_part("csvFile", "empty.csv", "First Name,Company\n"),
            ],
        );
        let (status, _) = send(app(llm.clone()), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(llm.last_prompt().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_rejection_is_bad_gateway() {
        let request = multipart_request(
            "/api/analyze-connections",
            &[
                Part::Text("apiKey", "sk-wrong"),
                csv_part("csvFile", "Connections.csv", EXPORT),
            ],
        );
        let (status, json) = send(app(StubCompletion::failing()), request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "LLM_ERROR");
        assert_eq!(json["error"]["message"], "Incorrect API key provided");
    }

    #[tokio::test]
    async fn test_analyze_multiple_merges_files() {
        let llm = StubCompletion::replying("Your network is growing.");
        let request = multipart_request(
            "/api/analyze-multiple-csv",
            &[
                Part::Text("apiKey", "sk-test"),
                Part::Text("visualizationType", "countries"),
                csv_part("csvFiles", "a.csv", "Name,Location\nA,\"Oslo, Norway\"\nB,Norway\n"),
                csv_part("csvFiles", "b.csv", "Name,Location\nC,\"Paris, France\"\n"),
            ],
        );
        let (status, json) = send(app(llm.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalFiles"], 2);
        assert_eq!(json["totalConnections"], 3);
        assert_eq!(json["filesData"][1]["fileName"], "b.csv");
        assert_eq!(json["filesData"][1]["totalRows"], 1);

        let countries = &json["visualization"]["countries"];
        assert_eq!(countries["buckets"][0]["label"], "Norway");
        assert_eq!(countries["buckets"][0]["count"], 2);
        assert_eq!(countries["buckets"][1]["label"], "France");

        let prompt = llm.last_prompt();
        assert!(prompt[0].content.contains("geographical distribution"));
        assert!(prompt[1].content.contains("from 2 files"));
    }

    #[tokio::test]
    async fn test_analyze_multiple_accepts_empty_file_alongside_export() {
        let request = multipart_request(
            "/api/analyze-multiple-csv",
            &[
                Part::Text("apiKey", "sk-test"),
                csv_part("csvFiles", "Connections.csv", EXPORT),
                csv_part("csvFiles", "empty.csv", ""),
            ],
        );
        let (status, json) = send(app(StubCompletion::replying("ok")), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalFiles"], 2);
        assert_eq!(json["totalConnections"], 3);
        assert_eq!(json["filesData"][1]["fileName"], "empty.csv");
        assert_eq!(json["filesData"][1]["totalRows"], 0);
        assert_eq!(json["visualization"]["totalConnections"], 3);
    }

    #[tokio::test]
    async fn test_analyze_multiple_all_empty_is_unprocessable() {
        let request = multipart_request(
            "/api/analyze-multiple-csv",
            &[
                Part::Text("apiKey", "sk-test"),
                csv_part("csvFiles", "empty.csv", ""),
                csv_part("csvFiles", "headers.csv", "Name,Company\n"),
            ],
        );
        let (status, json) = send(app(StubCompletion::replying("")), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["message"], "No data available to process");
    }

    #[tokio::test]
    async fn test_analyze_multiple_requires_files() {
        let request = multipart_request("/api/analyze-multiple-csv", &[Part::Text("apiKey", "sk-test")]);
        let (status, json) = send(app(StubCompletion::replying("")), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "At least one CSV file is required");
    }

    #[tokio::test]
    async fn test_network_analysis_returns_insight_lines() {
        let llm = StubCompletion::replying("Insight one\n\nInsight two\n");
        let request = multipart_request(
            "/api/analyze/network",
            &[Part::Text("apiKey", "sk-test"), csv_part("file", "Connections.csv", EXPORT)],
        );
        let (status, json) = send(app(llm), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["insights"], serde_json::json!(["Insight one", "Insight two"]));
        assert_eq!(json["industries"]["field"], "Company");
        assert_eq!(json["totalConnections"], 3);
    }

    #[tokio::test]
    async fn test_custom_prompt_substitutes_goal_and_attaches_files() {
        let llm = StubCompletion::replying("Try a sharper headline.");
        let request = multipart_request(
            "/api/custom-prompt",
            &[
                Part::Text("apiKey", "sk-test"),
                Part::Text("customPrompt", "Rewrite my summary for [goal]"),
                Part::Text("goal", "engineering managers"),
                Part::File {
                    field: "linkedinFiles",
                    name: "profile.txt",
                    content_type: "text/plain",
                    body: "Staff engineer, 10 years of Rust",
                },
            ],
        );
        let (status, json) = send(app(llm.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["content"], "Try a sharper headline.");

        let prompt = llm.last_prompt();
        assert_eq!(prompt.len(), 3);
        assert_eq!(prompt[1].content, "Rewrite my summary for engineering managers");
        assert!(prompt[2].content.ends_with("Staff engineer, 10 years of Rust"));
    }

    #[tokio::test]
    async fn test_custom_prompt_requires_prompt() {
        let request = multipart_request("/api/custom-prompt", &[Part::Text("apiKey", "sk-test")]);
        let (status, json) = send(app(StubCompletion::replying("")), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Custom prompt is required");
    }

    #[tokio::test]
    async fn test_optimize_profile_defaults_goal_to_recruiters() {
        let llm = StubCompletion::replying("Add metrics to your experience.");
        let request = multipart_request(
            "/api/optimize-profile",
            &[
                Part::Text("apiKey", "sk-test"),
                Part::File {
                    field: "linkedinFiles",
                    name: "profile.txt",
                    content_type: "text/plain",
                    body: "Backend developer",
                },
            ],
        );
        let (status, _) = send(app(llm.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        let prompt = llm.last_prompt();
        assert!(prompt[0].content.ends_with("to attract recruiters."));
        assert!(prompt[1].content.contains("attract more recruiters"));
    }

    #[tokio::test]
    async fn test_optimize_profile_requires_linkedin_file() {
        let request = multipart_request("/api/optimize-profile", &[Part::Text("apiKey", "sk-test")]);
        let (status, _) = send(app(StubCompletion::replying("")), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_analysis_with_text_profile() {
        let llm = StubCompletion::replying("1. Profile Strengths ...");
        let request = multipart_request(
            "/api/analyze",
            &[
                Part::Text("apiKey", "sk-test"),
                Part::Text("goal", "investors"),
                Part::File {
                    field: "linkedinFile",
                    name: "profile.txt",
                    content_type: "text/plain",
                    body: "Founder and CEO",
                },
            ],
        );
        let (status, json) = send(app(llm.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["analysis"], "1. Profile Strengths ...");
        assert!(llm.last_prompt()[1].content.contains("Founder and CEO"));
    }

    #[tokio::test]
    async fn test_profile_analysis_unreadable_pdf_is_unprocessable() {
        let request = multipart_request(
            "/api/analyze",
            &[
                Part::Text("apiKey", "sk-test"),
                Part::File {
                    field: "linkedinFile",
                    name: "profile.pdf",
                    content_type: "application/pdf",
                    body: "not really a pdf",
                },
            ],
        );
        let (status, _) = send(app(StubCompletion::replying("")), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let llm = StubCompletion::replying("Hello! How can I help?");
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"apiKey": "sk-test", "messages": [{"role": "user", "content": "Hi"}]}"#,
            ))
            .unwrap();
        let (status, json) = send(app(llm.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["content"], "Hello! How can I help?");
        assert_eq!(llm.last_prompt(), vec![ChatMessage::user("Hi")]);
    }

    #[tokio::test]
    async fn test_chat_requires_messages() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"apiKey": "sk-test", "messages": []}"#))
            .unwrap();
        let (status, json) = send(app(StubCompletion::replying("")), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Valid messages array is required");
    }

    #[tokio::test]
    async fn test_upload_over_body_limit_is_rejected() {
        let state = AppState {
            llm: StubCompletion::replying(""),
            config: Config {
                max_upload_mb: 0,
                ..Config::default()
            },
        };
        let request = multipart_request(
            "/api/analyze-connections",
            &[
                Part::Text("apiKey", "sk-test"),
                csv_part("csvFile", "Connections.csv", EXPORT),
            ],
        );
        let (status, _) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
