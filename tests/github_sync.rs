use kvengine::github::{GithubConfig, GithubSync};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sync_for(server: &MockServer) -> GithubSync {
    GithubSync::new(GithubConfig {
        token: "t".to_string(),
        repo: "owner/repo".to_string(),
        branch: "main".to_string(),
        api_url: Some(server.uri()),
    })
}

fn json(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json")
}

#[tokio::test]
async fn probing_finds_legacy_pluralized_file_in_second_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/data/graphic"))
        .respond_with(json("[]"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/data/common"))
        .respond_with(json(
            r#"[{"name":"usage.txt","path":"data/common/usage.txt"},
                {"name":"Moods.txt","path":"data/common/moods.txt"}]"#,
        ))
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    assert_eq!(sync.resolve_remote_path("Mood").await, "data/common/moods.txt");
}

#[tokio::test]
async fn unresolved_category_synthesizes_default_path_and_creates() {
    let server = MockServer::start().await;
    // Directory listings and the file probe all miss.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/owner/repo/contents/data/graphic/LookLike.txt"))
        .respond_with(ResponseTemplate::new(201).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let path = sync
        .save_category("LookLike", &["film still".to_string()])
        .await
        .unwrap();
    assert_eq!(path, "data/graphic/LookLike.txt");
    server.verify().await;
}

#[tokio::test]
async fn stale_sha_is_refreshed_and_retried_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/data/graphic"))
        .respond_with(json(
            r#"[{"name":"moods.txt","path":"data/graphic/moods.txt"}]"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/data/graphic/moods.txt"))
        .respond_with(json(r#"{"sha":"abc123"}"#))
        .expect(2)
        .mount(&server)
        .await;
    // First write hits a stale sha; the retry with the re-read sha lands.
    Mock::given(method("PUT"))
        .and(path("/repos/owner/repo/contents/data/graphic/moods.txt"))
        .respond_with(ResponseTemplate::new(409))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/owner/repo/contents/data/graphic/moods.txt"))
        .respond_with(json("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let path = sync
        .save_category("Mood", &["calm".to_string(), "bold".to_string()])
        .await
        .unwrap();
    assert_eq!(path, "data/graphic/moods.txt");
    server.verify().await;
}

#[tokio::test]
async fn second_conflict_surfaces_as_error_not_a_loop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/data/graphic"))
        .respond_with(json(
            r#"[{"name":"moods.txt","path":"data/graphic/moods.txt"}]"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/data/graphic/moods.txt"))
        .respond_with(json(r#"{"sha":"abc123"}"#))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/owner/repo/contents/data/graphic/moods.txt"))
        .respond_with(ResponseTemplate::new(409))
        .expect(2)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let err = sync
        .save_category("Mood", &["calm".to_string()])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("after retry"));
    server.verify().await;
}
