use mockito::Matcher;
use recipe_nutrition::{AddResponse, ApiConfig, NewIngredient, NutritionClient, NutritionSource};

const AUTH: &str = "Basic Y29vazpzZWNyZXQ=";

fn client_for(server: &mockito::ServerGuard) -> NutritionClient {
    let _ = env_logger::try_init();
    NutritionClient::new(&ApiConfig {
        base_url: server.url(),
        username: "cook".to_string(),
        password: "secret".to_string(),
        timeout: Some(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_list_ingredients() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/ingredients.php")
        .match_header("authorization", AUTH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"name":"Plantain","carbs":31,"fat":0.4,"protein":1.3},
                {"name":"Kefir","carbs":"4.5","fat":"3.5","protein":"3.3"}
            ]"#,
        )
        .create_async()
        .await;

    let items = client_for(&server).list_ingredients().await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Plantain");
    assert_eq!(items[0].carbs, 31.0);
    assert_eq!(items[1].protein, 3.3);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_ingredients_non_array_is_empty() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/ingredients.php")
        .with_status(200)
        .with_body(r#"{"message":"no ingredients yet"}"#)
        .create_async()
        .await;

    let items = client_for(&server).list_ingredients().await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_list_ingredients_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/ingredients.php")
        .with_status(401)
        .with_body("bad credentials")
        .create_async()
        .await;

    let err = client_for(&server).list_ingredients().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "GET /ingredients.php failed: 401 bad credentials"
    );
}

#[tokio::test]
async fn test_add_ingredient_posts_form_and_decodes_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/ingredients.php")
        .match_header("authorization", AUTH)
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "Plantain".into()),
            Matcher::UrlEncoded("carbs".into(), "31".into()),
            Matcher::UrlEncoded("fat".into(), "0.4".into()),
            Matcher::UrlEncoded("protein".into(), "1.3".into()),
        ]))
        .with_status(201)
        .with_body(r#"{"id":7}"#)
        .create_async()
        .await;

    let response = client_for(&server)
        .add_ingredient(&NewIngredient::new("Plantain", 31.0, 0.4, 1.3))
        .await
        .unwrap();

    assert_eq!(response, AddResponse::Json(serde_json::json!({"id": 7})));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_add_ingredient_plain_text_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/ingredients.php")
        .with_status(200)
        .with_body("Ingredient saved")
        .create_async()
        .await;

    let response = client_for(&server)
        .add_ingredient(&NewIngredient::new("Kefir", 4.5, 3.5, 3.3))
        .await
        .unwrap();

    assert_eq!(response, AddResponse::Text("Ingredient saved".to_string()));
}

#[tokio::test]
async fn test_add_ingredient_failure_includes_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/ingredients.php")
        .with_status(400)
        .with_body("missing carbs")
        .create_async()
        .await;

    let err = client_for(&server)
        .add_ingredient(&NewIngredient::new("Kefir", 4.5, 3.5, 3.3))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "POST /ingredients.php failed: 400 missing carbs"
    );
}

#[tokio::test]
async fn test_seed_two_ingredients_posts_both() {
    let mut server = mockito::Server::new_async().await;
    let plantain = server
        .mock("POST", "/ingredients.php")
        .match_body(Matcher::UrlEncoded("name".into(), "Plantain".into()))
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;
    let kefir = server
        .mock("POST", "/ingredients.php")
        .match_body(Matcher::UrlEncoded("name".into(), "Kefir".into()))
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let responses = client_for(&server).seed_two_ingredients().await.unwrap();

    assert_eq!(responses.len(), 2);
    plantain.assert_async().await;
    kefir.assert_async().await;
}

#[tokio::test]
async fn test_seed_fails_when_one_post_fails() {
    let mut server = mockito::Server::new_async().await;
    let _plantain = server
        .mock("POST", "/ingredients.php")
        .match_body(Matcher::UrlEncoded("name".into(), "Plantain".into()))
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;
    let _kefir = server
        .mock("POST", "/ingredients.php")
        .match_body(Matcher::UrlEncoded("name".into(), "Kefir".into()))
        .with_status(409)
        .with_body("Kefir already exists")
        .create_async()
        .await;

    let err = client_for(&server).seed_two_ingredients().await.unwrap_err();
    assert!(err.to_string().contains("409"));
}

/// Requires a running nutrition service configured through
/// RECIPE_NUTRITION__API__* environment variables
#[tokio::test]
#[ignore]
async fn test_added_ingredient_appears_in_listing() {
    let config = recipe_nutrition::AppConfig::load().unwrap();
    let client = NutritionClient::new(&config.api).unwrap();

    let name = format!("Test ingredient {}", std::process::id());
    client
        .add_ingredient(&NewIngredient::new(name.as_str(), 1.0, 2.0, 3.0))
        .await
        .unwrap();

    let listing = client.list_ingredients().await.unwrap();
    assert!(listing.iter().any(|n| n.name == name));
}
