use kvengine::ai::config::AiConfig;
use kvengine::ai::refine::{refine, refine_inner};
use kvengine::session::{Draft, Session};
use kvengine::warehouse::{category, write_words};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_config(server: &MockServer) -> AiConfig {
    AiConfig {
        api_key: "k".to_string(),
        model: "deepseek-chat".to_string(),
        chat_url: Some(format!("{}/chat/completions", server.uri())),
    }
}

const STREAM_BODY: &str = concat!(
    "data: {\"choices\":[{\"delta\":{\"content\":\"Plan 1: neon\"}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\" rain over\"}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\" chrome\"}}]}\n\n",
    "data: [DONE]\n\n",
);

#[tokio::test]
async fn streamed_fragments_concatenate_in_arrival_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(STREAM_BODY, "text/event-stream"))
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let text = refine_inner(&config, 1, "neon rain, chrome").await.unwrap();
    assert_eq!(text, "Plan 1: neon rain over chrome");
}

#[tokio::test]
async fn service_error_degrades_to_fallback_with_skeleton() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_raw("boom", "text/plain"))
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let text = refine(&config, 2, "neon rain, cyberpunk").await;
    assert!(text.contains("neon rain, cyberpunk"));
    assert!(text.contains("(Error)"));
}

#[tokio::test]
async fn failed_refine_still_queues_exactly_one_task() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_raw("boom", "text/plain"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let spec = category("Mood").unwrap();
    write_words(&dir.path().join(spec.path), &["calm".to_string()]).unwrap();

    let mut session = Session::new(dir.path());
    let config = mock_config(&server);
    let mut rng = StdRng::seed_from_u64(1);
    let drafts = session.generate(&mut rng, "", 1, Some(&config)).await.unwrap();

    assert_eq!(drafts.len(), 1);
    match &drafts[0] {
        Draft::Ready { skeleton, prompt } => {
            assert_eq!(skeleton, "calm");
            assert!(prompt.contains("calm"));
            assert!(prompt.contains("(Error)"));
        }
        Draft::Empty => panic!("draft should carry a skeleton"),
    }
    assert_eq!(session.queue.len(), 1);
}

#[tokio::test]
async fn successful_refine_queues_the_streamed_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(STREAM_BODY, "text/event-stream"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let spec = category("Mood").unwrap();
    write_words(&dir.path().join(spec.path), &["calm".to_string()]).unwrap();

    let mut session = Session::new(dir.path());
    let config = mock_config(&server);
    let mut rng = StdRng::seed_from_u64(1);
    session.generate(&mut rng, "", 1, Some(&config)).await.unwrap();

    assert_eq!(session.queue.tasks(), ["Plan 1: neon rain over chrome"]);
}
