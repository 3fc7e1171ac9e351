//! Integration tests for the category sort settings endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, put_json, seed_product};
use serde_json::json;
use sqlx::PgPool;

const CATEGORY: i64 = 7;

async fn fetch_settings(pool: &PgPool, category_id: i64) -> serde_json::Value {
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/categories/{category_id}/sort-settings"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Test: defaults
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_without_settings_reports_defaults(pool: PgPool) {
    let json = fetch_settings(&pool, CATEGORY).await;

    // test_config uses release date (code 1) as the global default.
    assert_eq!(json["data"]["base_sort"], 1);
    assert_eq!(json["data"]["show_by_default"], false);
    assert_eq!(json["data"]["has_own_settings"], false);
    assert_eq!(json["data"]["pin_source_category_id"], CATEGORY);
}

// ---------------------------------------------------------------------------
// Test: upsert round-trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn put_then_get_reflects_the_stored_settings(pool: PgPool) {
    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/categories/{CATEGORY}/sort-settings"),
        json!({"base_sort": 5, "show_by_default": true, "linked_category_id": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = fetch_settings(&pool, CATEGORY).await;
    assert_eq!(json["data"]["base_sort"], 5);
    assert_eq!(json["data"]["show_by_default"], true);
    assert_eq!(json["data"]["has_own_settings"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn zero_base_sort_inherits_the_global_default(pool: PgPool) {
    put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/categories/{CATEGORY}/sort-settings"),
        json!({"base_sort": 0, "show_by_default": false, "linked_category_id": null}),
    )
    .await;

    let json = fetch_settings(&pool, CATEGORY).await;
    assert_eq!(json["data"]["base_sort"], 1);
    assert_eq!(json["data"]["has_own_settings"], true);
}

// ---------------------------------------------------------------------------
// Test: linked categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn linked_category_redirects_the_pin_source(pool: PgPool) {
    put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/categories/{CATEGORY}/sort-settings"),
        json!({"base_sort": 3, "show_by_default": false, "linked_category_id": 12}),
    )
    .await;

    let json = fetch_settings(&pool, CATEGORY).await;
    assert_eq!(json["data"]["pin_source_category_id"], 12);
    // Base sort stays the category's own.
    assert_eq!(json["data"]["base_sort"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn linked_category_mirrors_its_source_pins(pool: PgPool) {
    const SOURCE: i64 = 12;

    // Both categories carry the same products; 7 mirrors 12's pins.
    let a = seed_product(&pool, CATEGORY, "Alpha", 100).await;
    let b = seed_product(&pool, CATEGORY, "Beta", 200).await;
    shelf_db::repositories::ProductRepo::assign_category(&pool, a, SOURCE)
        .await
        .unwrap();
    shelf_db::repositories::ProductRepo::assign_category(&pool, b, SOURCE)
        .await
        .unwrap();

    for category in [CATEGORY, SOURCE] {
        put_json(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/categories/{category}/sort-settings"),
            json!({
                "base_sort": 3,
                "show_by_default": false,
                "linked_category_id": if category == CATEGORY { Some(SOURCE) } else { None },
            }),
        )
        .await;
    }

    // Pin b first in the source category.
    put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/categories/{SOURCE}/products/order"),
        json!({"moves": [{"product_id": b, "old_position": 1, "new_position": 0}]}),
    )
    .await;

    // The mirroring category sees the same pin.
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/categories/{CATEGORY}/products?limit=10"),
    )
    .await;
    let window = body_json(response).await;
    let first = &window["data"]["items"][0];
    assert_eq!(first["product_id"].as_i64().unwrap(), b);
    assert_eq!(first["pinned"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn linked_source_pins_count_toward_the_total(pool: PgPool) {
    const SOURCE: i64 = 12;

    // c exists only in the source category but is pinned there, so the
    // mirroring category shows it on top of its own two products.
    let a = seed_product(&pool, CATEGORY, "Alpha", 100).await;
    let b = seed_product(&pool, CATEGORY, "Beta", 200).await;
    let c = seed_product(&pool, SOURCE, "Gamma", 300).await;

    put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/categories/{CATEGORY}/sort-settings"),
        json!({"base_sort": 3, "show_by_default": false, "linked_category_id": SOURCE}),
    )
    .await;
    put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/categories/{SOURCE}/products/order"),
        json!({"moves": [{"product_id": c, "old_position": 0, "new_position": 0}]}),
    )
    .await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/categories/{CATEGORY}/products?limit=10"),
    )
    .await;
    let window = body_json(response).await;

    let ids: Vec<i64> = window["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["product_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![c, a, b]);
    assert_eq!(window["data"]["items"][0]["pinned"], true);
    // One mirrored pin plus two own candidates.
    assert_eq!(window["data"]["total"], 3);
}

// ---------------------------------------------------------------------------
// Test: validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_base_sort_is_rejected(pool: PgPool) {
    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/categories/{CATEGORY}/sort-settings"),
        json!({"base_sort": 42, "show_by_default": false, "linked_category_id": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNSUPPORTED_SORT_CODE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn self_link_is_rejected(pool: PgPool) {
    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/categories/{CATEGORY}/sort-settings"),
        json!({"base_sort": 0, "show_by_default": false, "linked_category_id": CATEGORY}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
