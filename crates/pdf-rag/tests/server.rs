//! HTTP surface tests against a server bound to an ephemeral port

mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use common::{config_in, write_pdf, BagOfWordsEmbedder, RecordingLlm, LEGEND_PAGES};
use pdf_rag::server::{router, state::AppState};
use pdf_rag::{IngestPipeline, QueryResponse, RagConfig};

async fn spawn_server(config: RagConfig) -> SocketAddr {
    let state = AppState::with_providers(
        config,
        Arc::new(BagOfWordsEmbedder),
        Arc::new(RecordingLlm::default()),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    addr
}

async fn ingested_config(root: &std::path::Path) -> RagConfig {
    let mut config = config_in(root);
    write_pdf(&config.paths.data_path.join("legends.pdf"), &LEGEND_PAGES);
    IngestPipeline::new(config.clone(), Arc::new(BagOfWordsEmbedder))
        .run()
        .await
        .unwrap();
    config.retrieval.top_k = 1;
    config
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(config_in(dir.path())).await;

    let body = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_api_query_returns_answer_and_sources() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(ingested_config(dir.path()).await).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/query", addr))
        .json(&serde_json::json!({ "question": "Who uses a grappling hook?" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: QueryResponse = response.json().await.unwrap();
    assert_eq!(body.answer, "Pathfinder uses a grappling hook.");
    assert_eq!(body.sources.len(), 1);
    assert!(body.sources[0].ends_with("legends.pdf -> page 2"));
    assert!(body.response_time_secs >= 0.0);
}

#[tokio::test]
async fn test_api_query_rejects_blank_question() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(config_in(dir.path())).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/query", addr))
        .json(&serde_json::json!({ "question": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "invalid_request");
}

#[tokio::test]
async fn test_page_renders_form_then_answer() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(ingested_config(dir.path()).await).await;

    let page = reqwest::get(format!("http://{}/", addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Apex Legends InfoBot"));
    assert!(!page.contains("Answer :"));

    let page = reqwest::Client::new()
        .get(format!("http://{}/", addr))
        .query(&[("q", "Who uses a grappling hook?")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Response Time : "));
    assert!(page.contains("Answer : Pathfinder uses a grappling hook."));
    assert!(page.contains("<summary>Source(s)</summary>"));
    assert!(page.contains("legends.pdf -&gt; page 2"));
}
