mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use scaffolder_engine::{CodeHostClient, Session};
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{user, StubPrompt};

fn client_for(
    server: &MockServer,
    prompt: Arc<StubPrompt>,
    initial: Option<scaffolder_engine::AuthenticatedUser>,
) -> CodeHostClient {
    let base_url = Url::parse(&server.uri()).expect("server uri");
    let session = Arc::new(Session::new(prompt, initial));
    CodeHostClient::new(base_url, session).expect("client")
}

fn wire_repository(id: u64, owner: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("{owner}/{name}"),
        "description": "a starter",
        "language": "Rust",
        "owner": {
            "login": owner,
            "type": "User",
            "avatar_url": format!("https://avatars.example.com/{owner}"),
        },
    })
}

#[tokio::test]
async fn search_decodes_the_result_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "rust starter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                wire_repository(1, "octocat", "starter"),
                wire_repository(2, "octofan", "seed"),
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(StubPrompt::default()), None);

    let items = client.search("rust starter").await.expect("search");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].owner.login, "octocat");
    assert_eq!(items[1].name, "seed");
}

#[tokio::test]
async fn forbidden_lookup_forces_sign_in_and_retries_once() {
    let server = MockServer::start().await;
    // Specific mock first: the retry carries the fresh code-host token.
    Mock::given(method("GET"))
        .and(path("/repositories/42"))
        .and(header("Authorization", "token gh-fresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(wire_repository(42, "octocat", "starter")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repositories/42"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let prompt = Arc::new(StubPrompt::with_user(user("jwt-1", "gh-fresh")));
    let client = client_for(&server, prompt.clone(), None);

    let repository = client.get_repository("42").await.expect("repository");
    assert_eq!(repository.id, 42);
    assert_eq!(prompt.sign_ins.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn other_failures_do_not_trigger_re_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repositories/42"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let prompt = Arc::new(StubPrompt::with_user(user("jwt-1", "gh-fresh")));
    let client = client_for(&server, prompt.clone(), None);

    client.get_repository("42").await.unwrap_err();
    assert_eq!(prompt.sign_ins.load(Ordering::SeqCst), 0);
}
