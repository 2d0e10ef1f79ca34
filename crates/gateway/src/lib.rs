//! HTTP API gateway for Ragline.
//!
//! Two routes: `POST /chat` answers the open question at the end of a
//! conversation history, `GET /health` reports liveness. Built on Axum.
//!
//! Failure statuses are explicit: a malformed history is the caller's
//! fault (400), any upstream service failure is a bad gateway (502),
//! everything else is a 500.

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use ragline_core::message::ConversationTurn;
use ragline_core::{Error, ModelProfile};
use ragline_pipeline::{ChatPipeline, HybridRetriever};

/// Shared application state: the pipeline is immutable and safe for any
/// number of in-flight requests.
pub struct GatewayState {
    pub pipeline: ChatPipeline,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Builds each collaborator client once and shares it across requests;
/// the OpenAI client serves as both the completion and the embedding
/// service.
pub async fn start(config: ragline_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let profile: ModelProfile = config.chat_profile()?;

    let openai = Arc::new(ragline_providers::AzureOpenAiClient::new(
        config.openai.endpoint.clone(),
        config.openai.api_key.clone(),
        config.openai.api_version.clone(),
    ));
    let search = Arc::new(ragline_search::SearchIndexClient::new(
        config.search.endpoint.clone(),
        config.search.index.clone(),
        config.search.api_key.clone(),
    ));
    let store = Arc::new(ragline_chatlog::DocStoreClient::new(
        config.chatlog.endpoint.clone(),
        config.chatlog.api_key.clone(),
        config.chatlog.database.clone(),
        config.chatlog.container.clone(),
    ));

    let retriever = HybridRetriever::new(openai.clone(), search, config.embedding_deployment());
    let pipeline = ChatPipeline::new(openai, retriever, store, profile);

    let state = Arc::new(GatewayState { pipeline });
    let app = build_router(state);

    info!(addr = %addr, model = %config.chat_model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct AnswerResponse {
    answer: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(history): Json<Vec<ConversationTurn>>,
) -> Result<Json<AnswerResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(turns = history.len(), "Chat request received");

    match state.pipeline.answer(&history).await {
        Ok(answer) => Ok(Json(AnswerResponse { answer })),
        Err(e) => {
            error!(error = %e, "Chat request failed");
            Err(error_response(&e))
        }
    }
}

fn error_response(e: &Error) -> (StatusCode, Json<ErrorResponse>) {
    let status = if e.is_client_fault() {
        StatusCode::BAD_REQUEST
    } else {
        match e {
            Error::Provider(_) | Error::Search(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tower::ServiceExt;

    use ragline_chatlog::InMemoryChatLog;
    use ragline_core::error::{ProviderError, SearchError};
    use ragline_core::message::ChatMessage;
    use ragline_core::model::ModelKind;
    use ragline_core::retrieval::{HybridQuery, IndexDocument, RetrievedPassage, SearchOutcome};
    use ragline_core::service::{CompletionService, EmbeddingService, SearchIndex};

    struct StubCompletion {
        replies: Mutex<VecDeque<String>>,
    }

    impl StubCompletion {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl CompletionService for StubCompletion {
        async fn complete(
            &self,
            _deployment: &str,
            _messages: &[ChatMessage],
        ) -> Result<String, ProviderError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ProviderError::EmptyResponse("stub".into()))
        }
    }

    struct StubEmbedding;

    #[async_trait]
    impl EmbeddingService for StubEmbedding {
        async fn embed(&self, _deployment: &str, _text: &str) -> Result<Vec<f32>, ProviderError> {
            Ok(vec![0.1, 0.2])
        }
    }

    struct StubSearch {
        fail: bool,
    }

    #[async_trait]
    impl SearchIndex for StubSearch {
        async fn hybrid_search(&self, _q: &HybridQuery) -> Result<SearchOutcome, SearchError> {
            if self.fail {
                return Err(SearchError::Network("connection refused".into()));
            }
            Ok(SearchOutcome {
                passages: vec![RetrievedPassage {
                    id: "0".into(),
                    content: "Policy A".into(),
                }],
                extractive_answers: vec![],
            })
        }

        async fn upload(&self, _documents: &[IndexDocument]) -> Result<(), SearchError> {
            Ok(())
        }
    }

    fn test_app(search_fails: bool, store_fails: bool) -> Router {
        let completion = Arc::new(StubCompletion::new(&["composed query", "The answer."]));
        let retriever = HybridRetriever::new(
            Arc::new(StubEmbedding),
            Arc::new(StubSearch { fail: search_fails }),
            "ada-deploy",
        );
        let store = if store_fails {
            InMemoryChatLog::failing()
        } else {
            InMemoryChatLog::new()
        };
        let pipeline = ChatPipeline::new(
            completion,
            retriever,
            Arc::new(store),
            ModelProfile::new(ModelKind::Gpt35Turbo, "chat-deploy"),
        );
        build_router(Arc::new(GatewayState { pipeline }))
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = test_app(false, false);
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn chat_answers_open_question() {
        let app = test_app(false, false);
        let req = chat_request(
            r#"[{"user": "Hi", "assistant": "Hello!"}, {"user": "How long is leave?", "assistant": ""}]"#,
        );

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["answer"], "The answer.");
    }

    #[tokio::test]
    async fn empty_history_is_bad_request() {
        let app = test_app(false, false);
        let response = app.oneshot(chat_request("[]")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("history"));
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let app = test_app(true, false);
        let req = chat_request(r#"[{"user": "question?", "assistant": ""}]"#);

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn store_failure_still_returns_the_answer() {
        let app = test_app(false, true);
        let req = chat_request(r#"[{"user": "question?", "assistant": ""}]"#);

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["answer"], "The answer.");
    }
}
