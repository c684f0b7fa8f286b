use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::NutritionError;
use crate::model::{NewIngredient, Nutrition};
use crate::nutrition::{AddResponse, Lookup, NutritionSource};

/// HTTP client for `{base}/ingredients.php`.
///
/// Every request carries the configured Basic credentials.
#[derive(Debug, Clone)]
pub struct NutritionClient {
    client: Client,
    endpoint: String,
}

impl NutritionClient {
    pub fn new(config: &ApiConfig) -> Result<Self, NutritionError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            basic_auth_header(&config.username, &config.password)?,
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: format!("{}/ingredients.php", config.base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn basic_auth_header(username: &str, password: &str) -> Result<HeaderValue, NutritionError> {
    let token = STANDARD.encode(format!("{}:{}", username, password));
    let mut value = HeaderValue::from_str(&format!("Basic {}", token))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Turn a non-success response into an error carrying status and body
async fn ensure_success(response: Response, operation: &str) -> Result<Response, NutritionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("{} failed with status {}", operation, status);
    Err(NutritionError::Status {
        operation: operation.to_string(),
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl NutritionSource for NutritionClient {
    async fn list_ingredients(&self) -> Result<Vec<Nutrition>, NutritionError> {
        debug!("GET {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;
        let response = ensure_success(response, "GET /ingredients.php").await?;

        let body: Value = serde_json::from_str(&response.text().await?)?;
        if !body.is_array() {
            debug!("Expected an array of ingredients, got {}", body);
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(body)?)
    }

    async fn search_ingredient(&self, name: &str) -> Result<Lookup, NutritionError> {
        debug!("GET {}?ingredient={}", self.endpoint, name);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("ingredient", name)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No nutrition found for '{}'", name);
            return Ok(Lookup::NotFound);
        }
        let response = ensure_success(response, "GET ?ingredient=").await?;

        // Some deployments answer an unknown name with 200 and a null body
        let body: Value = serde_json::from_str(&response.text().await?)?;
        if body.is_null() {
            debug!("No nutrition found for '{}'", name);
            return Ok(Lookup::NotFound);
        }
        let nutrition: Nutrition = serde_json::from_value(body)?;
        Ok(Lookup::Found(nutrition))
    }

    async fn add_ingredient(&self, payload: &NewIngredient) -> Result<AddResponse, NutritionError> {
        debug!("POST {} ({})", self.endpoint, payload.name);
        let response = self
            .client
            .post(&self.endpoint)
            .form(&payload.form_fields())
            .send()
            .await?;
        let response = ensure_success(response, "POST /ingredients.php").await?;

        Ok(AddResponse::from_body(response.text().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            username: "cook".to_string(),
            password: "secret".to_string(),
            timeout: Some(5),
        }
    }

    #[test]
    fn test_basic_auth_header() {
        let value = basic_auth_header("cook", "secret").unwrap();
        // base64("cook:secret")
        assert_eq!(value.to_str().unwrap(), "Basic Y29vazpzZWNyZXQ=");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let client = NutritionClient::new(&api_config("http://example.com/api/")).unwrap();
        assert_eq!(client.endpoint(), "http://example.com/api/ingredients.php");
    }

    #[tokio::test]
    async fn test_search_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ingredients.php")
            .match_query(mockito::Matcher::UrlEncoded(
                "ingredient".into(),
                "Kefir".into(),
            ))
            .match_header("authorization", "Basic Y29vazpzZWNyZXQ=")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"Kefir","carbs":4.5,"fat":3.5,"protein":3.3}"#)
            .create_async()
            .await;

        let client = NutritionClient::new(&api_config(&server.url())).unwrap();
        let result = client.search_ingredient("Kefir").await.unwrap();

        assert_eq!(
            result,
            Lookup::Found(Nutrition {
                name: "Kefir".to_string(),
                carbs: 4.5,
                fat: 3.5,
                protein: 3.3,
            })
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_not_found_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ingredients.php")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let client = NutritionClient::new(&api_config(&server.url())).unwrap();
        let result = client.search_ingredient("Unobtainium").await.unwrap();

        assert_eq!(result, Lookup::NotFound);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_null_body_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ingredients.php")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("null")
            .create_async()
            .await;

        let client = NutritionClient::new(&api_config(&server.url())).unwrap();
        let result = client.search_ingredient("X").await.unwrap();

        assert_eq!(result, Lookup::NotFound);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_server_error_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/ingredients.php")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("database offline")
            .create_async()
            .await;

        let client = NutritionClient::new(&api_config(&server.url())).unwrap();
        let err = client.search_ingredient("Kefir").await.unwrap_err();

        assert!(matches!(err, NutritionError::Status { status: 500, .. }));
        assert_eq!(
            err.to_string(),
            "GET ?ingredient= failed: 500 database offline"
        );
    }
}
