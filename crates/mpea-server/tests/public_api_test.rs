//! Public translations, contact submissions and their administration

#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use common::{admin_bearer, test_state};

#[actix_web::test]
async fn test_public_i18n_normalizes_locale() {
    let state = test_state(&[]);
    let bearer = admin_bearer(&state).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/translations/import")
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({"locale": "en", "data": {"nav": {"home": "Home"}, "list": ["a", "b"]}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/public/i18n/EN-us")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["locale"], "en");
    assert_eq!(
        body["data"],
        json!({"nav": {"home": "Home"}, "list": ["a", "b"]})
    );

    // Unknown locales fall back to the first allowed one
    let req = test::TestRequest::get().uri("/api/public/i18n/fr").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["locale"], "zh");
    assert_eq!(body["data"], json!({}));
}

#[actix_web::test]
async fn test_public_i18n_respects_configured_locales() {
    let state = test_state(&[("mpea.i18n.locales", "en,ja")]);
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/public/i18n/de").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["locale"], "en");

    let req = test::TestRequest::get().uri("/api/public/i18n/JA").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["locale"], "ja");
}

#[actix_web::test]
async fn test_contact_submission_is_rate_limited_per_ip() {
    let state = test_state(&[]);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/public/contact/parenting?lang=en")
        .insert_header(("x-forwarded-for", "203.0.113.5"))
        .set_json(json!({"childAge": 5, "interest": "music", "contact": "13800000000"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Submitted successfully");

    let req = test::TestRequest::post()
        .uri("/api/public/contact/business")
        .insert_header(("x-forwarded-for", "203.0.113.5"))
        .insert_header(("accept-language", "en-GB,en;q=0.8"))
        .set_json(json!({"company": "Acme", "phone": "010-1234"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Too many requests, please try again later");

    // Chinese is the default language
    let req = test::TestRequest::post()
        .uri("/api/public/contact/business")
        .insert_header(("x-forwarded-for", "203.0.113.5"))
        .set_json(json!({"company": "Acme", "phone": "010-1234"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "提交过于频繁，请稍后再试");

    let req = test::TestRequest::post()
        .uri("/api/public/contact/business")
        .insert_header(("x-forwarded-for", "203.0.113.6"))
        .set_json(json!({"company": "Acme", "phone": "010-1234", "lang": "zh"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "提交成功");
}

#[actix_web::test]
async fn test_contact_submission_validation() {
    let state = test_state(&[]);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/public/contact/business?lang=en")
        .insert_header(("x-forwarded-for", "203.0.113.9"))
        .set_json(json!({"company": "Acme", "phone": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid parameters");

    let req = test::TestRequest::post()
        .uri("/api/public/contact/parenting")
        .insert_header(("x-forwarded-for", "203.0.113.9"))
        .set_json(json!({"childAge": 40, "contact": "13800000000"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "参数错误");

    // Rejected submissions do not consume the rate limit window
    let req = test::TestRequest::post()
        .uri("/api/public/contact/parenting")
        .insert_header(("x-forwarded-for", "203.0.113.9"))
        .set_json(json!({"childAge": 4, "contact": "13800000000"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_parenting_child_age_sent_as_text() {
    let state = test_state(&[]);
    let bearer = admin_bearer(&state).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/public/contact/parenting")
        .insert_header(("x-forwarded-for", "198.51.100.1"))
        .set_json(json!({"childAge": "6", "contact": "13800000000"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/public/contact/parenting")
        .insert_header(("x-forwarded-for", "198.51.100.2"))
        .set_json(json!({"childAge": "six", "contact": "13800000000"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/contact-messages?type=parenting")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["totalCount"], 1);
    assert_eq!(body["data"]["pageItems"][0]["childAge"], 6);
}

#[actix_web::test]
async fn test_contact_message_administration() {
    let state = test_state(&[]);
    let bearer = admin_bearer(&state).await;
    let app = test_app!(state);

    let long_agent = "A".repeat(300);
    let req = test::TestRequest::post()
        .uri("/api/public/contact/parenting")
        .insert_header(("x-forwarded-for", "192.0.2.10, 10.0.0.1"))
        .insert_header(("user-agent", long_agent.as_str()))
        .set_json(json!({"childAge": 8, "contact": "13900000000", "problem": "sleep"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/public/contact/business")
        .insert_header(("x-forwarded-for", "192.0.2.11"))
        .set_json(json!({"company": "Kinder Co", "orgType": "school", "phone": "010-5555"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/contact-messages?type=parenting")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["totalCount"], 1);
    let message = &body["data"]["pageItems"][0];
    assert_eq!(message["type"], "parenting");
    assert_eq!(message["phone"], "13900000000");
    assert_eq!(message["ip"], "192.0.2.10");
    assert_eq!(message["status"], "new");
    assert_eq!(message["userAgent"].as_str().unwrap().chars().count(), 255);
    let id = message["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri("/api/contact-messages?keyword=kinder")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pageItems"][0]["orgType"], "school");

    let req = test::TestRequest::get()
        .uri("/api/contact-messages?status=archived")
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/contact-messages/{}/status", id))
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({"status": "bogus"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/contact-messages/{}/status", id))
        .insert_header(("Authorization", bearer.as_str()))
        .set_json(json!({"status": "processed"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/contact-messages/{}", id))
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "processed");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/contact-messages/{}", id))
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/contact-messages/{}", id))
        .insert_header(("Authorization", bearer.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
