//! Recipe CRUD, ownership scoping, reconciliation, filtering, and images.

mod support;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
use serde_json::{json, Value};
use uuid::Uuid;

use larder::domain::AttributeKind;
use support::{bearer, seed_user, test_app, test_state};

async fn create_recipe<S, B>(app: &S, token: &str, payload: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let res = call_service(
        app,
        TestRequest::post()
            .uri("/api/v1/recipes")
            .insert_header(bearer(token))
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    read_body_json(res).await
}

fn sample_payload(title: &str) -> Value {
    json!({
        "title": title,
        "timeMinutes": 22,
        "price": "5.25",
        "description": "sample description",
        "link": "https://example.com/recipe.pdf",
    })
}

#[actix_web::test]
async fn recipes_require_authentication() {
    let (_store, state) = test_state();
    let app = init_service(test_app(state)).await;

    let res = call_service(&app, TestRequest::get().uri("/api/v1/recipes").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_and_retrieve_recipe() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_user, token) = seed_user(&store, "ada@example.com").await;

    let created = create_recipe(&app, &token, sample_payload("sample recipe")).await;
    assert_eq!(created["title"], "sample recipe");
    assert_eq!(created["timeMinutes"], 22);
    assert_eq!(created["price"], "5.25");
    assert_eq!(created["description"], "sample description");

    let id = created["id"].as_str().expect("id present");
    let res = call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/recipes/{id}"))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let detail: Value = read_body_json(res).await;
    assert_eq!(detail["id"], created["id"]);
    assert_eq!(detail["link"], "https://example.com/recipe.pdf");
}

#[actix_web::test]
async fn listing_is_limited_to_the_caller() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_ada, ada_token) = seed_user(&store, "ada@example.com").await;
    let (_eve, eve_token) = seed_user(&store, "other@example.com").await;

    create_recipe(&app, &ada_token, sample_payload("ada recipe")).await;
    create_recipe(&app, &eve_token, sample_payload("eve recipe")).await;

    let res = call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/recipes")
            .insert_header(bearer(&ada_token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = read_body_json(res).await;
    let recipes = body.as_array().expect("array");
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["title"], "ada recipe");
}

#[actix_web::test]
async fn partial_update_keeps_other_fields() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_user, token) = seed_user(&store, "ada@example.com").await;

    let created = create_recipe(&app, &token, sample_payload("sample recipe")).await;
    let id = created["id"].as_str().expect("id present");

    let res = call_service(
        &app,
        TestRequest::patch()
            .uri(&format!("/api/v1/recipes/{id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "new recipe title" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = read_body_json(res).await;
    assert_eq!(updated["title"], "new recipe title");
    assert_eq!(updated["link"], "https://example.com/recipe.pdf");
    assert_eq!(updated["price"], "5.25");
}

#[actix_web::test]
async fn full_update_replaces_scalar_fields() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_user, token) = seed_user(&store, "ada@example.com").await;

    let created = create_recipe(&app, &token, sample_payload("sample recipe")).await;
    let id = created["id"].as_str().expect("id present");

    let res = call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/v1/recipes/{id}"))
            .insert_header(bearer(&token))
            .set_json(json!({
                "title": "new recipe title",
                "description": "new recipe description",
                "timeMinutes": 10,
                "price": "2.50",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = read_body_json(res).await;
    assert_eq!(updated["title"], "new recipe title");
    assert_eq!(updated["description"], "new recipe description");
    assert_eq!(updated["timeMinutes"], 10);
    assert_eq!(updated["price"], "2.50");
    // Link was omitted from the full update, so it resets.
    assert_eq!(updated["link"], Value::Null);
}

#[actix_web::test]
async fn validation_failures_are_field_mapped() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_user, token) = seed_user(&store, "ada@example.com").await;

    let res = call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/recipes")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "t", "timeMinutes": 5, "price": "not-a-price" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "price");
}

#[actix_web::test]
async fn delete_removes_own_recipe() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_user, token) = seed_user(&store, "ada@example.com").await;

    let created = create_recipe(&app, &token, sample_payload("sample recipe")).await;
    let id = created["id"].as_str().expect("id present");

    let res = call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/v1/recipes/{id}"))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(!store.recipe_exists(Uuid::parse_str(id).expect("uuid")));
}

#[actix_web::test]
async fn cross_owner_access_is_not_found_and_leaves_the_row() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_ada, ada_token) = seed_user(&store, "ada@example.com").await;
    let (_eve, eve_token) = seed_user(&store, "other@example.com").await;

    let created = create_recipe(&app, &eve_token, sample_payload("eve recipe")).await;
    let id = created["id"].as_str().expect("id present");
    let uuid = Uuid::parse_str(id).expect("uuid");

    for request in [
        TestRequest::get().uri(&format!("/api/v1/recipes/{id}")),
        TestRequest::patch()
            .uri(&format!("/api/v1/recipes/{id}"))
            .set_json(json!({ "title": "hijacked" })),
        TestRequest::delete().uri(&format!("/api/v1/recipes/{id}")),
    ] {
        let res = call_service(&app, request.insert_header(bearer(&ada_token)).to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
    assert!(store.recipe_exists(uuid));
}

fn payload_with_tags(title: &str, tags: Value) -> Value {
    json!({
        "title": title,
        "timeMinutes": 10,
        "price": "2.50",
        "tags": tags,
    })
}

#[actix_web::test]
async fn creating_with_new_tags_creates_one_record_per_name() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (user, token) = seed_user(&store, "ada@example.com").await;

    let created = create_recipe(
        &app,
        &token,
        payload_with_tags(
            "new recipe title",
            json!([{ "name": "python" }, { "name": "cheese" }]),
        ),
    )
    .await;

    let tags = created["tags"].as_array().expect("tags array");
    assert_eq!(tags.len(), 2);
    assert_eq!(store.attribute_count(user.id, AttributeKind::Tag), 2);
}

#[actix_web::test]
async fn creating_with_existing_tag_reuses_the_record() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (user, token) = seed_user(&store, "ada@example.com").await;

    let first = create_recipe(
        &app,
        &token,
        payload_with_tags("first", json!([{ "name": "Indian" }])),
    )
    .await;
    let indian_id = first["tags"][0]["id"].as_str().expect("tag id").to_owned();

    let second = create_recipe(
        &app,
        &token,
        payload_with_tags(
            "Thai Prawn Curry",
            json!([{ "name": "Indian" }, { "name": "Breakfast" }]),
        ),
    )
    .await;

    let tags = second["tags"].as_array().expect("tags array");
    assert_eq!(tags.len(), 2);
    let ids: Vec<&str> = tags
        .iter()
        .map(|tag| tag["id"].as_str().expect("tag id"))
        .collect();
    assert!(ids.contains(&indian_id.as_str()));
    assert_eq!(store.attribute_count(user.id, AttributeKind::Tag), 2);
}

#[actix_web::test]
async fn duplicate_names_in_one_payload_collapse() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (user, token) = seed_user(&store, "ada@example.com").await;

    let created = create_recipe(
        &app,
        &token,
        payload_with_tags("dupes", json!([{ "name": "Vegan" }, { "name": "Vegan" }])),
    )
    .await;

    assert_eq!(created["tags"].as_array().expect("tags").len(), 1);
    assert_eq!(store.attribute_count(user.id, AttributeKind::Tag), 1);
}

#[actix_web::test]
async fn clearing_the_tag_list_keeps_the_records() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (user, token) = seed_user(&store, "ada@example.com").await;

    let created = create_recipe(
        &app,
        &token,
        payload_with_tags("breakfast", json!([{ "name": "Breakfast" }])),
    )
    .await;
    let id = created["id"].as_str().expect("id present");

    let res = call_service(
        &app,
        TestRequest::patch()
            .uri(&format!("/api/v1/recipes/{id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "tags": [] }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = read_body_json(res).await;
    assert_eq!(updated["tags"].as_array().expect("tags").len(), 0);
    // The record survives; only the association is gone.
    assert_eq!(store.attribute_count(user.id, AttributeKind::Tag), 1);
}

#[actix_web::test]
async fn omitting_the_tag_list_leaves_associations_untouched() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_user, token) = seed_user(&store, "ada@example.com").await;

    let created = create_recipe(
        &app,
        &token,
        payload_with_tags("lunch", json!([{ "name": "Lunch" }])),
    )
    .await;
    let id = created["id"].as_str().expect("id present");

    let res = call_service(
        &app,
        TestRequest::patch()
            .uri(&format!("/api/v1/recipes/{id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "renamed" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = read_body_json(res).await;
    assert_eq!(updated["tags"].as_array().expect("tags").len(), 1);
}

#[actix_web::test]
async fn updating_tags_swaps_the_association_set() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (user, token) = seed_user(&store, "ada@example.com").await;

    let created = create_recipe(
        &app,
        &token,
        payload_with_tags("dinner", json!([{ "name": "Dinner" }])),
    )
    .await;
    let id = created["id"].as_str().expect("id present");

    let res = call_service(
        &app,
        TestRequest::patch()
            .uri(&format!("/api/v1/recipes/{id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "tags": [{ "name": "Supper" }] }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = read_body_json(res).await;
    let tags = updated["tags"].as_array().expect("tags");
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["name"], "Supper");
    // Both tag records now exist for the user.
    assert_eq!(store.attribute_count(user.id, AttributeKind::Tag), 2);
}

#[actix_web::test]
async fn list_filters_by_tag_and_ingredient_ids() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_user, token) = seed_user(&store, "ada@example.com").await;

    let curry = create_recipe(
        &app,
        &token,
        json!({
            "title": "curry",
            "timeMinutes": 10,
            "price": "2.50",
            "tags": [{ "name": "Indian" }],
            "ingredients": [{ "name": "Rice" }],
        }),
    )
    .await;
    create_recipe(&app, &token, sample_payload("plain")).await;

    let tag_id = curry["tags"][0]["id"].as_str().expect("tag id");
    let ingredient_id = curry["ingredients"][0]["id"].as_str().expect("ingredient id");

    for uri in [
        format!("/api/v1/recipes?tags={tag_id}"),
        format!("/api/v1/recipes?ingredients={ingredient_id}"),
        format!("/api/v1/recipes?tags={tag_id}&ingredients={ingredient_id}"),
    ] {
        let res = call_service(
            &app,
            TestRequest::get()
                .uri(&uri)
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = read_body_json(res).await;
        let recipes = body.as_array().expect("array");
        assert_eq!(recipes.len(), 1, "uri: {uri}");
        assert_eq!(recipes[0]["title"], "curry");
    }
}

#[actix_web::test]
async fn malformed_filter_ids_are_rejected() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_user, token) = seed_user(&store, "ada@example.com").await;

    let res = call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/recipes?tags=1,2")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(res).await;
    assert_eq!(body["details"]["field"], "tags");
}

#[actix_web::test]
async fn image_upload_replaces_the_previous_blob() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_user, token) = seed_user(&store, "ada@example.com").await;

    let created = create_recipe(&app, &token, sample_payload("photogenic")).await;
    let id = created["id"].as_str().expect("id present");

    let upload = |bytes: &'static [u8]| {
        TestRequest::post()
            .uri(&format!("/api/v1/recipes/{id}/image"))
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", "image/png"))
            .set_payload(bytes)
            .to_request()
    };

    let res = call_service(&app, upload(b"first-png")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = read_body_json(res).await;
    let first_key = body["image"].as_str().expect("image key").to_owned();
    assert!(first_key.ends_with(".png"));

    let res = call_service(&app, upload(b"second-png")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = read_body_json(res).await;
    let second_key = body["image"].as_str().expect("image key").to_owned();
    assert_ne!(first_key, second_key);

    // The first blob is gone; only the replacement remains.
    assert_eq!(store.image_keys(), vec![second_key]);
}

#[actix_web::test]
async fn image_upload_rejects_unsupported_content_types() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_user, token) = seed_user(&store, "ada@example.com").await;

    let created = create_recipe(&app, &token, sample_payload("photogenic")).await;
    let id = created["id"].as_str().expect("id present");

    let res = call_service(
        &app,
        TestRequest::post()
            .uri(&format!("/api/v1/recipes/{id}/image"))
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", "text/plain"))
            .set_payload("not an image")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn image_upload_to_another_users_recipe_is_not_found() {
    let (store, state) = test_state();
    let app = init_service(test_app(state)).await;
    let (_ada, ada_token) = seed_user(&store, "ada@example.com").await;
    let (_eve, eve_token) = seed_user(&store, "other@example.com").await;

    let created = create_recipe(&app, &eve_token, sample_payload("eve recipe")).await;
    let id = created["id"].as_str().expect("id present");

    let res = call_service(
        &app,
        TestRequest::post()
            .uri(&format!("/api/v1/recipes/{id}/image"))
            .insert_header(bearer(&ada_token))
            .insert_header(("Content-Type", "image/jpeg"))
            .set_payload("sneaky")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    // The attempt leaves no orphan blob behind.
    assert!(store.image_keys().is_empty());
}
