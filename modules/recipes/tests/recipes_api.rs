//! Recipe endpoints through the real router.

mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};
use common::{create_test_app, dec, names};
use recipes::contract::model::{NewIngredient, NewTag, RecipePatch};
use serde_json::{json, Value};

const RECIPES_URL: &str = "/api/recipe/recipes/";

fn detail_url(id: impl std::fmt::Display) -> String {
    format!("{RECIPES_URL}{id}/")
}

fn titles(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("json array")
        .iter()
        .map(|v| v["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn login_required() {
    let app = create_test_app().await;
    let (status, _) = app.call(Method::GET, RECIPES_URL, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(Method::POST, RECIPES_URL, None, Some(json!({"title": "x"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn retrieve_recipes_newest_first() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("list@example.com").await;
    app.recipe(&user, "First", &[], &[]).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    app.recipe(&user, "Second", &[], &[]).await;

    let (status, body) = app.call(Method::GET, RECIPES_URL, Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Second", "First"]);
    let first = &body[0];
    assert_eq!(first["time_minutes"], 22);
    assert_eq!(first["price"], "5.50");
    assert!(first.get("description").is_none(), "list shape has no description");
}

#[tokio::test]
async fn recipes_limited_to_user() {
    let app = create_test_app().await;
    let other = app.user("other@example.com").await;
    let (user, token) = app.user_with_token("mine@example.com").await;
    let foreign = app.recipe(&other, "Not mine", &[], &[]).await;
    app.recipe(&user, "Mine", &[], &[]).await;

    let (_, body) = app.call(Method::GET, RECIPES_URL, Some(&token), None).await;
    assert_eq!(titles(&body), vec!["Mine"]);

    for method in [Method::GET, Method::PATCH, Method::DELETE] {
        let body = (method == Method::PATCH).then(|| json!({"title": "Stolen"}));
        let (status, _) = app
            .call(method, &detail_url(foreign.id), Some(&token), body)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    let untouched = app.service.get_recipe(other.id, foreign.id).await.unwrap();
    assert_eq!(untouched.title, "Not mine");
}

#[tokio::test]
async fn view_recipe_detail() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("detail@example.com").await;
    let recipe = app.recipe(&user, "Soup", &["Vegan"], &["Carrot"]).await;

    let (status, body) = app
        .call(Method::GET, &detail_url(recipe.id), Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], recipe.id.to_string());
    assert_eq!(body["description"], "");
    assert_eq!(names(&body["tags"]), vec!["Vegan"]);
    assert_eq!(names(&body["ingredients"]), vec!["Carrot"]);
}

#[tokio::test]
async fn create_basic_recipe() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("create@example.com").await;

    let payload = json!({
        "title": "Chocolate cheesecake",
        "time_minutes": 30,
        "price": "5.00",
        "description": "Rich and creamy",
        "link": "https://example.com/cheesecake",
    });
    let (status, body) = app
        .call(Method::POST, RECIPES_URL, Some(&token), Some(payload))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Chocolate cheesecake");
    assert_eq!(body["price"], "5.00");
    assert_eq!(body["description"], "Rich and creamy");

    let id = body["id"].as_str().unwrap().parse().unwrap();
    let stored = app.service.get_recipe(user.id, id).await.unwrap();
    assert_eq!(stored.user_id, user.id);
    assert_eq!(stored.time_minutes, 30);
    assert_eq!(stored.price, dec("5.00"));
    assert_eq!(stored.link, "https://example.com/cheesecake");
}

#[tokio::test]
async fn numeric_price_is_accepted_and_normalized() {
    let app = create_test_app().await;
    let (_, token) = app.user_with_token("number@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            RECIPES_URL,
            Some(&token),
            Some(json!({"title": "Toast", "time_minutes": 3, "price": 2.5})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["price"], "2.50");
}

#[tokio::test]
async fn invalid_recipe_fields_are_rejected() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("invalid@example.com").await;

    let cases = [
        (json!({"title": "x", "time_minutes": 1, "price": "1.234"}), "/price"),
        (json!({"title": "x", "time_minutes": 1, "price": "1000.00"}), "/price"),
        (json!({"title": "x", "time_minutes": -1, "price": "1.00"}), "/time_minutes"),
        (json!({"title": "  ", "time_minutes": 1, "price": "1.00"}), "/title"),
    ];
    for (payload, pointer) in cases {
        let (status, body) = app
            .call(Method::POST, RECIPES_URL, Some(&token), Some(payload))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{pointer}");
        assert_eq!(body["code"], "RECIPES_VALIDATION");
        assert_eq!(body["errors"][0]["pointer"], pointer);
    }

    let (status, body) = app
        .call(Method::POST, RECIPES_URL, Some(&token), Some(json!({"title": "x"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "RECIPES_INVALID_BODY");

    let stored = app
        .service
        .list_recipes(user.id, Default::default())
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn create_with_new_tags_and_ingredients() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("nested@example.com").await;

    let payload = json!({
        "title": "Thai prawn curry",
        "time_minutes": 30,
        "price": "2.50",
        "tags": [{"name": "Thai"}, {"name": "Dinner"}],
        "ingredients": [{"name": "Prawns"}, {"name": "Coconut milk"}],
    });
    let (status, body) = app
        .call(Method::POST, RECIPES_URL, Some(&token), Some(payload))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(names(&body["tags"]), vec!["Dinner", "Thai"]);
    assert_eq!(names(&body["ingredients"]), vec!["Coconut milk", "Prawns"]);

    let tags = app
        .service
        .list_tags(user.id, Default::default())
        .await
        .unwrap();
    assert_eq!(tags.len(), 2);
    assert!(tags.iter().all(|t| t.user_id == user.id));
}

#[tokio::test]
async fn create_reuses_existing_tags_and_ingredients() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("reuse@example.com").await;
    let indian = app
        .service
        .create_tag(user.id, NewTag { name: "Indian".into() })
        .await
        .unwrap();
    let lemon = app
        .service
        .create_ingredient(user.id, NewIngredient { name: "Lemon".into() })
        .await
        .unwrap();

    let payload = json!({
        "title": "Pongal",
        "time_minutes": 60,
        "price": "4.50",
        "tags": [{"name": "Indian"}, {"name": "Breakfast"}, {"name": "Indian"}],
        "ingredients": [{"name": "Lemon"}, {"name": "Fish sauce"}],
    });
    let (status, body) = app
        .call(Method::POST, RECIPES_URL, Some(&token), Some(payload))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let tag_ids: Vec<_> = body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(tag_ids.len(), 2);
    assert!(tag_ids.contains(&indian.id.to_string()));
    assert!(body["ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .any(|i| i["id"] == lemon.id.to_string()));

    let all_tags = app
        .service
        .list_tags(user.id, Default::default())
        .await
        .unwrap();
    assert_eq!(all_tags.len(), 2);
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("patch@example.com").await;
    let recipe = app.recipe(&user, "Sample recipe", &["Lunch"], &[]).await;

    let (status, body) = app
        .call(
            Method::PATCH,
            &detail_url(recipe.id),
            Some(&token),
            Some(json!({"title": "New recipe title"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "New recipe title");
    assert_eq!(body["price"], "5.50");
    assert_eq!(names(&body["tags"]), vec!["Lunch"]);
}

#[tokio::test]
async fn update_replaces_and_clears_tags() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("tags@example.com").await;
    let recipe = app.recipe(&user, "Oats", &["Breakfast"], &["Oats"]).await;
    let url = detail_url(recipe.id);

    let (status, body) = app
        .call(
            Method::PATCH,
            &url,
            Some(&token),
            Some(json!({"tags": [{"name": "Lunch"}]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body["tags"]), vec!["Lunch"]);
    assert_eq!(names(&body["ingredients"]), vec!["Oats"]);

    // the replaced tag still exists, it is only detached
    let tags = app
        .service
        .list_tags(user.id, Default::default())
        .await
        .unwrap();
    assert_eq!(tags.len(), 2);

    let (status, body) = app
        .call(
            Method::PATCH,
            &url,
            Some(&token),
            Some(json!({"tags": [], "ingredients": []})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["tags"].as_array().unwrap().is_empty());
    assert!(body["ingredients"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_through_service_validates_price() {
    let app = create_test_app().await;
    let user = app.user("svc@example.com").await;
    let recipe = app.recipe(&user, "Stew", &[], &[]).await;

    let err = app
        .service
        .update_recipe(
            user.id,
            recipe.id,
            RecipePatch {
                price: Some(dec("0.001")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("price"));

    let updated = app
        .service
        .update_recipe(
            user.id,
            recipe.id,
            RecipePatch {
                price: Some(dec("12.5")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price.to_string(), "12.50");
}

#[tokio::test]
async fn delete_recipe() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("delete@example.com").await;
    let recipe = app.recipe(&user, "Gone", &["Temp"], &["Salt"]).await;
    let url = detail_url(recipe.id);

    let (status, body) = app.call(Method::DELETE, &url, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.call(Method::GET, &url, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // tags and ingredients outlive the recipe
    let tags = app
        .service
        .list_tags(user.id, Default::default())
        .await
        .unwrap();
    assert_eq!(tags.len(), 1);
}

#[tokio::test]
async fn filter_recipes_by_tags() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("ftags@example.com").await;
    let r1 = app.recipe(&user, "Thai vegetable curry", &["Vegan"], &[]).await;
    let r2 = app.recipe(&user, "Aubergine with tahini", &["Vegetarian"], &[]).await;
    app.recipe(&user, "Fish and chips", &[], &[]).await;

    let url = format!("{RECIPES_URL}?tags={},{}", r1.tags[0].id, r2.tags[0].id);
    let (status, body) = app.call(Method::GET, &url, Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let mut got = titles(&body);
    got.sort();
    assert_eq!(got, vec!["Aubergine with tahini", "Thai vegetable curry"]);
}

#[tokio::test]
async fn filter_recipes_by_ingredients() {
    let app = create_test_app().await;
    let (user, token) = app.user_with_token("fing@example.com").await;
    let r1 = app.recipe(&user, "Posh beans on toast", &[], &["Feta cheese"]).await;
    app.recipe(&user, "Chicken cacciatore", &[], &["Chicken"]).await;
    let r3 = app.recipe(&user, "Steak and mushrooms", &[], &["Feta cheese", "Steak"]).await;

    let url = format!("{RECIPES_URL}?ingredients={}", r1.ingredients[0].id);
    let (_, body) = app.call(Method::GET, &url, Some(&token), None).await;

    let mut got = titles(&body);
    got.sort();
    assert_eq!(got, vec!["Posh beans on toast", "Steak and mushrooms"]);
    assert!(r3.ingredients.iter().any(|i| i.id == r1.ingredients[0].id));
}

#[tokio::test]
async fn filter_with_malformed_ids_is_rejected() {
    let app = create_test_app().await;
    let (_, token) = app.user_with_token("badq@example.com").await;

    let (status, body) = app
        .call(Method::GET, &format!("{RECIPES_URL}?tags=abc"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "RECIPES_INVALID_QUERY");
}
