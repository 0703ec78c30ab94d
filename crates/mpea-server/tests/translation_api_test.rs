//! Translation catalog CRUD, import and export over HTTP

#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use common::{admin_bearer, test_state};

#[actix_web::test]
async fn test_create_find_update_delete() {
    let state = test_state(&[]);
    let bearer = admin_bearer(&state).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/translations")
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({
            "fullKey": " home . title ",
            "namespace": "ignored",
            "label": "Title",
            "values": {"zh": "首页", "en": "Home", "fr": null}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let entry = &body["data"];
    assert_eq!(entry["fullKey"], "home.title");
    assert_eq!(entry["namespace"], "home");
    assert_eq!(entry["values"]["zh"], "首页");
    assert!(entry["values"].get("fr").is_none());
    assert_eq!(entry["updatedBy"], common::TEST_USERNAME);
    let id = entry["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/translations/{}", id))
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["label"], "Title");

    // Renaming the key moves it to the new namespace
    let req = test::TestRequest::put()
        .uri(&format!("/api/translations/{}", id))
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({"fullKey": "about.title", "label": ""}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["fullKey"], "about.title");
    assert_eq!(body["data"]["namespace"], "about");
    assert!(body["data"]["label"].is_null());
    assert_eq!(body["data"]["values"]["en"], "Home");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/translations/{}", id))
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/translations/{}", id))
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_rejects_empty_and_duplicate_keys() {
    let state = test_state(&[]);
    let bearer = admin_bearer(&state).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/translations")
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({"fullKey": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "fullKey is required");

    for expected in [StatusCode::OK, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/api/translations")
            .insert_header(("Authorization", bearer.as_str()))
            .set_json(json!({"fullKey": "nav.home"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_web::test]
async fn test_update_missing_entry() {
    let state = test_state(&[]);
    let bearer = admin_bearer(&state).await;
    let app = test_app!(state);

    let req = test::TestRequest::put()
        .uri("/api/translations/999")
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({"label": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_import_then_export_round_trip() {
    let state = test_state(&[]);
    let bearer = admin_bearer(&state).await;
    let app = test_app!(state);

    let payload = json!({
        "nav": {"home": "Home", "about": "About"},
        "steps": ["one", "two"],
        "footer": {"copyright": "MPEA"}
    });

    let req = test::TestRequest::post()
        .uri("/api/translations/import")
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({"locale": "en", "data": payload}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["count"], 5);
    assert_eq!(body["data"]["failed"], json!([]));

    let req = test::TestRequest::get()
        .uri("/api/translations/export/en")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], payload);

    // Importing another locale keeps the existing one
    let req = test::TestRequest::post()
        .uri("/api/translations/import")
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({"locale": "zh", "data": {"nav": {"home": "首页"}}}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["count"], 1);

    let req = test::TestRequest::get()
        .uri("/api/translations?namespace=nav&keyword=home")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["totalCount"], 1);
    let values = &body["data"]["pageItems"][0]["values"];
    assert_eq!(values["en"], "Home");
    assert_eq!(values["zh"], "首页");

    let req = test::TestRequest::get()
        .uri("/api/translations/export/zh")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], json!({"nav": {"home": "首页"}}));
}

#[actix_web::test]
async fn test_import_rejects_bad_input() {
    let state = test_state(&[]);
    let bearer = admin_bearer(&state).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/translations/import")
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({"locale": "fr", "data": {"a": "b"}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("zh, en"));

    let req = test::TestRequest::post()
        .uri("/api/translations/import")
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({"locale": "en", "data": ["a", "b"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_meta_lists_locales_and_namespaces() {
    let state = test_state(&[]);
    let bearer = admin_bearer(&state).await;
    let app = test_app!(state);

    for key in ["nav.home", "about.title", "nav.about", "plain"] {
        let req = test::TestRequest::post()
            .uri("/api/translations")
            .insert_header(("Authorization", bearer.as_str()))
            .set_json(json!({"fullKey": key}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/translations/meta")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["locales"], json!(["zh", "en"]));
    assert_eq!(body["data"]["namespaces"], json!(["about", "nav", "plain"]));
}

#[actix_web::test]
async fn test_search_limit_out_of_range() {
    let state = test_state(&[]);
    let bearer = admin_bearer(&state).await;
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/translations?limit=10001")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
