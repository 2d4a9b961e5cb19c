
use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use test_utils::*;
use uuid::Uuid;

fn rejected_journey(company_id: Uuid) -> Value {
    json!({
        "companyId": company_id,
        "role": "SDE Intern",
        "overallResult": "Rejected",
        "stages": [
            { "stageType": "OnlineTest", "description": "Two DSA questions in 90 minutes", "result": "Rejected" }
        ]
    })
}

#[actix_rt::test]
async fn submitted_experience_is_listed_anonymously() {
    let ctx = TestContext::new();
    let alice = ctx.register("Alice", "alice@x.com").await;
    let acme = ctx.create_company("Acme").await;
    let app = spawn_app!(ctx);

    let submit = test::TestRequest::post()
        .uri("/api/experiences")
        .insert_header(bearer(&alice.token))
        .set_json(rejected_journey(acme.id))
        .to_request();
    let (status, created) = read_json(test::call_service(&app, submit).await).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].is_string());
    assert!(created.get("userId").is_none());

    let details = test::TestRequest::get()
        .uri(&format!("/api/companies/{}", acme.id))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, details).await).await;

    assert_eq!(status, StatusCode::OK);
    let experiences = body["experiences"].as_array().unwrap();
    assert_eq!(experiences.len(), 1);

    let experience = &experiences[0];
    assert_eq!(experience["overallResult"], "Rejected");
    assert_eq!(experience["companyName"], "Acme");
    assert_eq!(experience["stages"][0]["stageType"], "Online Test");
    assert_eq!(experience["stages"][0]["difficulty"], "Medium");
    for key in ["user", "userId", "author"] {
        assert!(experience.get(key).is_none(), "{key} leaked");
    }
    assert!(!experience.to_string().contains("Alice"));
}

#[actix_rt::test]
async fn submit_requires_authentication() {
    let ctx = TestContext::new();
    let acme = ctx.create_company("Acme").await;
    let app = spawn_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/experiences")
        .set_json(rejected_journey(acme.id))
        .to_request();

    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.store.experience_count(), 0);
}

#[actix_rt::test]
async fn submit_for_unknown_company_is_not_found() {
    let ctx = TestContext::new();
    let alice = ctx.register("Alice", "alice@x.com").await;
    let app = spawn_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/experiences")
        .insert_header(bearer(&alice.token))
        .set_json(rejected_journey(Uuid::new_v4()))
        .to_request();

    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn rejected_journey_without_rejected_stage_is_invalid() {
    let ctx = TestContext::new();
    let alice = ctx.register("Alice", "alice@x.com").await;
    let acme = ctx.create_company("Acme").await;
    let app = spawn_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/experiences")
        .insert_header(bearer(&alice.token))
        .set_json(json!({
            "companyId": acme.id,
            "role": "SDE",
            "overallResult": "Rejected",
            "stages": [
                { "stageType": "Online Test", "description": "Cleared", "result": "Selected" },
                { "stageType": "Technical", "description": "Not taken", "result": "Rejected", "included": false }
            ]
        }))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "overallResult");
    assert_eq!(ctx.store.experience_count(), 0);
}

#[actix_rt::test]
async fn only_included_described_stages_are_stored_in_order() {
    let ctx = TestContext::new();
    let alice = ctx.register("Alice", "alice@x.com").await;
    let acme = ctx.create_company("Acme").await;
    let app = spawn_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/experiences")
        .insert_header(bearer(&alice.token))
        .set_json(json!({
            "companyId": acme.id,
            "role": "Backend Engineer",
            "overallResult": "Selected",
            "stages": [
                { "stageType": "OT", "description": "Aptitude", "result": "Selected", "difficulty": "Easy" },
                { "stageType": "Technical", "description": "   ", "result": "Selected" },
                { "stageType": "Technical", "description": "Design a URL shortener", "result": "Selected", "difficulty": "Hard" },
                { "stageType": "HR", "description": "Skipped", "included": false }
            ]
        }))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::CREATED);
    let stages = body["stages"].as_array().unwrap();
    assert_eq!(stages.len(), 2);
    assert_eq!(stages[0]["stageType"], "Online Test");
    assert_eq!(stages[1]["description"], "Design a URL shortener");
    assert_eq!(stages[1]["difficulty"], "Hard");
}

#[actix_rt::test]
async fn single_round_payload_is_accepted() {
    let ctx = TestContext::new();
    let alice = ctx.register("Alice", "alice@x.com").await;
    let acme = ctx.create_company("Acme").await;
    let app = spawn_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/experiences")
        .insert_header(bearer(&alice.token))
        .set_json(json!({
            "companyId": acme.id,
            "roundType": "Technical",
            "description": "Linked lists and a bit of SQL",
            "result": "Qualified"
        }))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "Not specified");
    assert_eq!(body["overallResult"], "Pending");
    assert_eq!(body["stages"][0]["result"], "Selected");
}

#[actix_rt::test]
async fn unknown_stage_type_is_a_bad_request() {
    let ctx = TestContext::new();
    let alice = ctx.register("Alice", "alice@x.com").await;
    let acme = ctx.create_company("Acme").await;
    let app = spawn_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/experiences")
        .insert_header(bearer(&alice.token))
        .set_json(json!({
            "companyId": acme.id,
            "role": "SDE",
            "overallResult": "Pending",
            "stages": [{ "stageType": "Puzzle", "description": "?" }]
        }))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Puzzle"));
}

#[actix_rt::test]
async fn unknown_overall_result_is_reported_by_value() {
    let ctx = TestContext::new();
    let alice = ctx.register("Alice", "alice@x.com").await;
    let acme = ctx.create_company("Acme").await;
    let app = spawn_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/experiences")
        .insert_header(bearer(&alice.token))
        .set_json(json!({
            "companyId": acme.id,
            "role": "SDE",
            "overallResult": "Accepted",
            "stages": [{ "stageType": "HR", "description": "Offer call" }]
        }))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("Accepted"));
    assert_eq!(ctx.store.experience_count(), 0);
}

#[actix_rt::test]
async fn experiences_are_listed_newest_first() {
    let ctx = TestContext::new();
    let alice = ctx.register("Alice", "alice@x.com").await;
    let acme = ctx.create_company("Acme").await;
    let app = spawn_app!(ctx);

    for role in ["First", "Second", "Third"] {
        let mut payload = rejected_journey(acme.id);
        payload["role"] = json!(role);
        let req = test::TestRequest::post()
            .uri("/api/experiences")
            .insert_header(bearer(&alice.token))
            .set_json(payload)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/companies/{}", acme.id))
        .to_request();
    let (_, body) = read_json(test::call_service(&app, req).await).await;
    let roles: Vec<&str> = body["experiences"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["role"].as_str().unwrap())
        .collect();

    assert_eq!(roles, vec!["Third", "Second", "First"]);
}

#[actix_rt::test]
async fn delete_is_limited_to_owner_or_admin() {
    let ctx = TestContext::new();
    let alice = ctx.register("Alice", "alice@x.com").await;
    let bob = ctx.register("Bob", "bob@x.com").await;
    let admin = ctx.admin_token().await;
    let acme = ctx.create_company("Acme").await;
    let app = spawn_app!(ctx);

    let submit = test::TestRequest::post()
        .uri("/api/experiences")
        .insert_header(bearer(&alice.token))
        .set_json(rejected_journey(acme.id))
        .to_request();
    let (_, created) = read_json(test::call_service(&app, submit).await).await;
    let id = created["id"].as_str().unwrap().to_string();
    let experience_id = Uuid::parse_str(&id).unwrap();

    let as_bob = test::TestRequest::delete()
        .uri(&format!("/api/experiences/{}", id))
        .insert_header(bearer(&bob.token))
        .to_request();
    assert_eq!(test::call_service(&app, as_bob).await.status(), StatusCode::FORBIDDEN);
    assert!(ctx.store.experience(experience_id).is_some());

    let as_admin = test::TestRequest::delete()
        .uri(&format!("/api/experiences/{}", id))
        .insert_header(bearer(&admin))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, as_admin).await).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert!(ctx.store.experience(experience_id).is_none());

    let details = test::TestRequest::get()
        .uri(&format!("/api/companies/{}", acme.id))
        .to_request();
    let (_, body) = read_json(test::call_service(&app, details).await).await;
    assert!(body["experiences"].as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn owner_can_delete_own_experience() {
    let ctx = TestContext::new();
    let alice = ctx.register("Alice", "alice@x.com").await;
    let acme = ctx.create_company("Acme").await;
    let app = spawn_app!(ctx);

    let submit = test::TestRequest::post()
        .uri("/api/experiences")
        .insert_header(bearer(&alice.token))
        .set_json(rejected_journey(acme.id))
        .to_request();
    let (_, created) = read_json(test::call_service(&app, submit).await).await;

    let delete = test::TestRequest::delete()
        .uri(&format!("/api/experiences/{}", created["id"].as_str().unwrap()))
        .insert_header(bearer(&alice.token))
        .to_request();

    assert_eq!(test::call_service(&app, delete).await.status(), StatusCode::OK);
    assert_eq!(ctx.store.experience_count(), 0);
}

#[actix_rt::test]
async fn delete_error_cases() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;
    let app = spawn_app!(ctx);

    let anonymous = test::TestRequest::delete()
        .uri(&format!("/api/experiences/{}", Uuid::new_v4()))
        .to_request();
    assert_eq!(test::call_service(&app, anonymous).await.status(), StatusCode::UNAUTHORIZED);

    let missing = test::TestRequest::delete()
        .uri(&format!("/api/experiences/{}", Uuid::new_v4()))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, missing).await.status(), StatusCode::NOT_FOUND);

    let malformed = test::TestRequest::delete()
        .uri("/api/experiences/123")
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, malformed).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn attributed_listing_is_admin_only() {
    let ctx = TestContext::new();
    let alice = ctx.register("Alice", "alice@x.com").await;
    let admin = ctx.admin_token().await;
    let acme = ctx.create_company("Acme").await;
    let globex = ctx.create_company("Globex").await;
    let app = spawn_app!(ctx);

    for company_id in [acme.id, globex.id] {
        let req = test::TestRequest::post()
            .uri("/api/experiences")
            .insert_header(bearer(&alice.token))
            .set_json(rejected_journey(company_id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let anonymous = test::TestRequest::get().uri("/api/experiences").to_request();
    assert_eq!(test::call_service(&app, anonymous).await.status(), StatusCode::UNAUTHORIZED);

    let as_student = test::TestRequest::get()
        .uri("/api/experiences")
        .insert_header(bearer(&alice.token))
        .to_request();
    assert_eq!(test::call_service(&app, as_student).await.status(), StatusCode::FORBIDDEN);

    let all = test::TestRequest::get()
        .uri("/api/experiences")
        .insert_header(bearer(&admin))
        .to_request();
    let (status, body) = read_json(test::call_service(&app, all).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["author"]["name"], "Alice");
    assert_eq!(body[0]["author"]["role"], "student");

    let filtered = test::TestRequest::get()
        .uri(&format!("/api/experiences?companyId={}", acme.id))
        .insert_header(bearer(&admin))
        .to_request();
    let (_, body) = read_json(test::call_service(&app, filtered).await).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["companyName"], "Acme");

    let malformed = test::TestRequest::get()
        .uri("/api/experiences?companyId=acme")
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, malformed).await.status(), StatusCode::BAD_REQUEST);
}
