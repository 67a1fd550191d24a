use std::sync::Arc;

use axum_test::TestServer;
use serde_json::Value;

use rec_blender::api::{create_router, AppState, RequestLimits};
use rec_blender::models::{
    ItemFeatures, ItemId, PairFeatures, PersonalRow, PopularRow, SimilarRow,
    UserFeatures, UserId,
};
use rec_blender::services::{Blender, OnnxModel};
use rec_blender::store::{CandidateTables, FeatureStore, POPULAR_POOL_SIZE};

const USER: i64 = 1374582;
const ITEM: i64 = 60064065;

// probabilities = [1 - p, p], p = sigmoid(0.001 * top_num)
const RANK_MODEL: &[u8] = include_bytes!("fixtures/rank_model.onnx");

/// Popularity chart 1..=30, one known user, one known item with two neighbours.
/// The model only looks at `top_num`, so item ranks decide the order.
fn create_test_blender() -> Blender {
    let popular = (1..=30).map(|id| PopularRow { item_id: ItemId(id) }).collect();
    let personal = vec![PersonalRow {
        user_id: UserId(USER),
        item_id: vec![ItemId(500), ItemId(501)],
    }];
    let similar = vec![SimilarRow {
        item_id: ItemId(ITEM),
        item_id_sim: vec![ItemId(ITEM), ItemId(700), ItemId(701)],
        score: vec![1.0, 0.6, 0.2],
    }];
    let candidates = CandidateTables::from_rows(popular, personal, similar, POPULAR_POOL_SIZE);

    let mut items: Vec<ItemFeatures> = (1..=30)
        .map(|id| ItemFeatures { item_id: ItemId(id), top_num: id * 10, name_len: 8 })
        .collect();
    items.push(ItemFeatures { item_id: ItemId(500), top_num: 5, name_len: 11 });
    items.push(ItemFeatures { item_id: ItemId(700), top_num: 1, name_len: 6 });

    let features = FeatureStore::from_rows(
        vec![UserFeatures { user_id: UserId(USER), main_genre: 2, count: 120 }],
        items,
        vec![PairFeatures { user_id: UserId(USER), item_id: ItemId(500), als_score: 0.7 }],
    );

    let model = OnnxModel::from_bytes(RANK_MODEL).unwrap();

    Blender::from_tables(Arc::new(candidates), Arc::new(features), Arc::new(model), 10)
}

fn create_test_server() -> TestServer {
    let state = AppState::new(create_test_blender(), RequestLimits::default());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn rec_list(body: &Value) -> Vec<i64> {
    body["rec_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_root_status() {
    let server = create_test_server();
    let response = server.get("/").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["loaded_at"].is_string());
}

#[tokio::test]
async fn test_known_user_and_item() {
    let server = create_test_server();

    let response = server
        .post(&format!("/get_rec?user_id={USER}&item_id={ITEM}"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["user_id"], USER);
    assert_eq!(body["item_id"], ITEM);

    // 700 (rank 1), 500 (rank 5), then popular items by rank, ascending score
    let list = rec_list(&body);
    assert_eq!(list, vec![700, 500, 1, 2, 3, 4, 5, 6, 7, 8]);

    assert_eq!(body["rec_from"]["sim_items"], 1);
    assert_eq!(body["rec_from"]["als_rec"], 1);
    assert_eq!(body["rec_from"]["pop_rec"], 8);
}

#[tokio::test]
async fn test_anonymous_request_uses_popularity_only() {
    let server = create_test_server();

    let response = server.post("/get_rec?user_id=-1&item_id=-1").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(rec_list(&body), (1..=10).collect::<Vec<i64>>());
    assert_eq!(body["rec_from"]["pop_rec"], 10);
    assert_eq!(body["rec_from"]["als_rec"], 0);
    assert_eq!(body["rec_from"]["sim_items"], 0);
}

#[tokio::test]
async fn test_unknown_user_with_known_item() {
    let server = create_test_server();

    let response = server
        .get(&format!("/get_rec?user_id=-1&item_id={ITEM}"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["user_id"], -1);

    // 700 (rank 1) first, 701 has no features and falls past the cut
    assert_eq!(rec_list(&body), vec![700, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(body["rec_from"]["pop_rec"], 9);
    assert_eq!(body["rec_from"]["als_rec"], 0);
    assert_eq!(body["rec_from"]["sim_items"], 1);
}

#[tokio::test]
async fn test_best_n_limits_output() {
    let server = create_test_server();

    let response = server
        .get(&format!("/get_rec?user_id={USER}&item_id={ITEM}&best_n=3"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let list = rec_list(&body);
    assert_eq!(list, vec![700, 500, 1]);

    let total: i64 = body["rec_from"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_i64().unwrap())
        .sum();
    assert!(total >= list.len() as i64);
}

#[tokio::test]
async fn test_non_numeric_id_is_generic_failure() {
    let server = create_test_server();

    let response = server.post("/get_rec?user_id=abc&item_id=1").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "Problem with request");
}

#[tokio::test]
async fn test_missing_id_is_generic_failure() {
    let server = create_test_server();

    let response = server.post("/get_rec?user_id=1").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "Problem with request");
}

#[tokio::test]
async fn test_out_of_range_best_n_is_rejected() {
    let server = create_test_server();

    for best_n in ["0", "101"] {
        let response = server
            .get(&format!("/get_rec?user_id=1&item_id=1&best_n={best_n}"))
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();

    let response = server.get("/get_rec?user_id=-1&item_id=-1").await;
    response.assert_status_ok();

    let header = response.headers().get("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
