use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ListResult, Player};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_without_paging_returns_bare_array() {
    let resp = app().oneshot(empty_request("GET", "/api/players/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let players: Vec<Player> = body_json(resp).await;
    assert_eq!(players.len(), 3);
    assert_eq!(players[0].player_name.as_deref(), Some("Mickey Mouse"));
}

#[tokio::test]
async fn list_with_paging_returns_envelope() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/players/?page=0&perPage=2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: ListResult<Player> = body_json(resp).await;
    assert_eq!(result.total_records, Some(3));
    assert_eq!(result.page, Some(0));
    assert_eq!(result.per_page, Some(2));
    assert_eq!(result.list.unwrap().len(), 2);
}

#[tokio::test]
async fn list_with_huge_page_returns_empty_envelope() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/players/?page=9223372036854775807&perPage=2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: ListResult<Player> = body_json(resp).await;
    assert_eq!(result.total_records, Some(3));
    assert!(result.list.unwrap().is_empty());
}

#[tokio::test]
async fn list_with_only_page_returns_bare_array() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/players?page=1"))
        .await
        .unwrap();

    let body: serde_json::Value = body_json(resp).await;
    assert!(body.is_array());
}

// --- get ---

#[tokio::test]
async fn get_seeded_player() {
    let resp = app().oneshot(empty_request("GET", "/api/players/1/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let player: Player = body_json(resp).await;
    assert_eq!(player.player_id, 1);
    assert_eq!(player.player_name.as_deref(), Some("Mickey Mouse"));
}

#[tokio::test]
async fn get_player_not_found() {
    let resp = app().oneshot(empty_request("GET", "/api/players/999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_player_bad_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/players/not-a-number"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- create ---

#[tokio::test]
async fn create_player_returns_201_with_new_id() {
    let resp = app()
        .oneshot(json_request("POST", "/api/players/", r#"{"playerName":"Pluto"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let player: Player = body_json(resp).await;
    assert_eq!(player.player_id, 4);
    assert_eq!(player.player_name.as_deref(), Some("Pluto"));
}

#[tokio::test]
async fn create_player_malformed_json_returns_4xx() {
    let resp = app()
        .oneshot(json_request("POST", "/api/players", "{not json"))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

// --- update ---

#[tokio::test]
async fn update_player_id_mismatch_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/api/players/2/",
            r#"{"playerId":3,"playerName":"Nope"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_player_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/api/players/42/",
            r#"{"playerId":42,"playerName":"Nope"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_player_returns_200_with_info() {
    let resp = app().oneshot(empty_request("DELETE", "/api/players/3/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: ListResult<Player> = body_json(resp).await;
    assert!(result.succeeded);
    assert_eq!(result.info, vec!["Delete Successful".to_string()]);
    assert!(result.list.is_none());
}

#[tokio::test]
async fn delete_player_not_found() {
    let resp = app().oneshot(empty_request("DELETE", "/api/players/77")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

// --- query ---

#[tokio::test]
async fn query_filters_by_name_case_insensitively() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/players/query/",
            r#"{"playerName":"DUCK"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: ListResult<Player> = body_json(resp).await;
    assert_eq!(result.total_records, Some(1));
    let list = result.list.unwrap();
    assert_eq!(list[0].player_name.as_deref(), Some("Donald Duck"));
}

#[tokio::test]
async fn query_without_name_matches_all_and_pages() {
    let resp = app()
        .oneshot(json_request("POST", "/api/players/query/?page=1&perPage=2", "{}"))
        .await
        .unwrap();

    let result: ListResult<Player> = body_json(resp).await;
    assert_eq!(result.total_records, Some(3));
    assert_eq!(result.page, Some(1));
    assert_eq!(result.list.unwrap().len(), 1);
}

// --- session ---

#[tokio::test]
async fn session_sets_cookie() {
    let resp = app().oneshot(empty_request("GET", "/api/session/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers()[http::header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("session="));
    let token: String = body_json(resp).await;
    assert!(cookie.contains(&token));
}

#[tokio::test]
async fn whoami_without_cookie_is_unauthorized() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/session/whoami/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn whoami_echoes_session_cookie() {
    let request = Request::builder()
        .uri("/api/session/whoami")
        .header(http::header::COOKIE, "theme=dark; session=abc123")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let token: String = body_json(resp).await;
    assert_eq!(token, "abc123");
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/players", r#"{"playerName":"Daisy"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Player = body_json(resp).await;
    let id = created.player_id;

    // update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/players/{id}"),
            &format!(r#"{{"playerId":{id},"playerName":"Daisy Duck"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Player = body_json(resp).await;
    assert_eq!(updated.player_name.as_deref(), Some("Daisy Duck"));

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/api/players/{id}/")))
        .await
        .unwrap();
    let fetched: Player = body_json(resp).await;
    assert_eq!(fetched, updated);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/api/players/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // get after delete — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/api/players/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete — seeded players only
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/players"))
        .await
        .unwrap();
    let players: Vec<Player> = body_json(resp).await;
    assert_eq!(players.len(), 3);
}
