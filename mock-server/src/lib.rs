use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default)]
    pub player_id: i64,
    pub player_name: Option<String>,
}

/// Paged list envelope, also used with an empty list for plain results.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    pub succeeded: bool,
    #[serde(default)]
    pub info: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<T>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Default)]
pub struct Store {
    players: BTreeMap<i64, Player>,
    next_id: i64,
}

impl Store {
    pub fn seeded() -> Self {
        let mut store = Store::default();
        for name in ["Mickey Mouse", "Donald Duck", "Goofy"] {
            store.insert(name);
        }
        store
    }

    fn insert(&mut self, name: &str) -> Player {
        self.next_id += 1;
        let player = Player {
            player_id: self.next_id,
            player_name: Some(name.to_string()),
        };
        self.players.insert(player.player_id, player.clone());
        player
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    let router = Router::new();
    let router = route(router, "/api/players", get(list_players).post(create_player));
    let router = route(router, "/api/players/query", post(query_players));
    let router = route(
        router,
        "/api/players/{id}",
        get(get_player).put(update_player).delete(delete_player),
    );
    let router = route(router, "/api/session", get(open_session));
    let router = route(router, "/api/session/whoami", get(whoami));
    router.with_state(db)
}

/// Register `path` with and without a trailing slash; clients always send one.
fn route(router: Router<Db>, path: &str, handler: MethodRouter<Db>) -> Router<Db> {
    router
        .route(path, handler.clone())
        .route(&format!("{path}/"), handler)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn paged(players: Vec<Player>, page: i64, per_page: i64) -> ListResult<Player> {
    let total = players.len() as i64;
    let skip = usize::try_from(page.max(0).saturating_mul(per_page.max(0))).unwrap_or(usize::MAX);
    let list = players
        .into_iter()
        .skip(skip)
        .take(usize::try_from(per_page.max(0)).unwrap_or(usize::MAX))
        .collect();
    ListResult {
        total_records: Some(total),
        page: Some(page),
        per_page: Some(per_page),
        succeeded: true,
        info: Vec::new(),
        list: Some(list),
    }
}

async fn list_players(State(db): State<Db>, Query(params): Query<PageParams>) -> Response {
    let players: Vec<Player> = db.read().await.players.values().cloned().collect();
    match (params.page, params.per_page) {
        (Some(page), Some(per_page)) => Json(paged(players, page, per_page)).into_response(),
        _ => Json(players).into_response(),
    }
}

async fn query_players(
    State(db): State<Db>,
    Query(params): Query<PageParams>,
    Json(criteria): Json<Player>,
) -> Json<ListResult<Player>> {
    let needle = criteria.player_name.map(|n| n.to_lowercase());
    let players: Vec<Player> = db
        .read()
        .await
        .players
        .values()
        .filter(|p| match (&needle, &p.player_name) {
            (None, _) => true,
            (Some(needle), Some(name)) => name.to_lowercase().contains(needle.as_str()),
            (Some(_), None) => false,
        })
        .cloned()
        .collect();

    let page = params.page.unwrap_or(0);
    let per_page = params
        .per_page
        .filter(|n| *n > 0)
        .unwrap_or(players.len().max(1) as i64);
    Json(paged(players, page, per_page))
}

async fn create_player(State(db): State<Db>, Json(input): Json<Player>) -> (StatusCode, Json<Player>) {
    let mut store = db.write().await;
    let player = store.insert(input.player_name.as_deref().unwrap_or_default());
    tracing::debug!(id = player.player_id, "player created");
    (StatusCode::CREATED, Json(player))
}

async fn get_player(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Player>, StatusCode> {
    let store = db.read().await;
    store.players.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_player(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<Player>,
) -> Result<Json<Player>, StatusCode> {
    if input.player_id != id {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut store = db.write().await;
    let player = store.players.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    player.player_name = input.player_name;
    Ok(Json(player.clone()))
}

async fn delete_player(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<ListResult<Player>>, StatusCode> {
    let mut store = db.write().await;
    store.players.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    tracing::debug!(id, "player deleted");
    Ok(Json(ListResult {
        total_records: None,
        page: None,
        per_page: None,
        succeeded: true,
        info: vec!["Delete Successful".to_string()],
        list: None,
    }))
}

async fn open_session() -> impl IntoResponse {
    let token = Uuid::new_v4();
    (
        AppendHeaders([(header::SET_COOKIE, format!("{SESSION_COOKIE}={token}; Path=/"))]),
        Json(token.to_string()),
    )
}

async fn whoami(headers: HeaderMap) -> Result<Json<String>, StatusCode> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| Json(token.to_string()))
        .ok_or(StatusCode::UNAUTHORIZED)
}
