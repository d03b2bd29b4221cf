pub mod dto;

use std::env;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url, header::ACCEPT};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::AppError;

pub use dto::{Board, BoardList, Card, Label, NewCardRequest, UpdateCardRequest};

pub const TRELLO_API_URL: &str = "https://api.trello.com/1";

#[derive(Clone)]
pub struct TrelloConfig {
    pub api_key: String,
    pub token: String,
}

impl TrelloConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let api_key = env::var("TRELLO_API_KEY")
            .map_err(|_| AppError::Configuration("TRELLO_API_KEY is not set".to_string()))?;
        let token = env::var("TRELLO_TOKEN")
            .map_err(|_| AppError::Configuration("TRELLO_TOKEN is not set".to_string()))?;

        Ok(Self { api_key, token })
    }
}

// Keep the credentials out of any debug output.
impl std::fmt::Debug for TrelloConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrelloConfig")
            .field("api_key", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Read/write access to the one board being synchronized.
#[async_trait]
pub trait BoardClient: Send + Sync {
    async fn fetch_boards(&self) -> Result<Vec<Board>, AppError>;
    async fn fetch_lists(&self, board_id: &str) -> Result<Vec<BoardList>, AppError>;
    async fn fetch_labels(&self, board_id: &str) -> Result<Vec<Label>, AppError>;
    async fn create_label(&self, board_id: &str, name: &str, color: &str)
    -> Result<Label, AppError>;
    async fn fetch_cards(&self, list_id: &str) -> Result<Vec<Card>, AppError>;
    async fn create_card(&self, card: &NewCardRequest) -> Result<Card, AppError>;
    async fn update_card(
        &self,
        card_id: &str,
        update: &UpdateCardRequest,
    ) -> Result<Card, AppError>;
}

pub struct TrelloHttpClient {
    client: Client,
    config: TrelloConfig,
    base_url: String,
}

impl TrelloHttpClient {
    pub fn new(config: TrelloConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            config,
            base_url: TRELLO_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, AppError> {
        let auth = [
            ("key", self.config.api_key.as_str()),
            ("token", self.config.token.as_str()),
        ];
        Url::parse_with_params(
            &format!("{}/{}", self.base_url, endpoint),
            auth.iter().chain(params.iter()),
        )
        .map_err(|e| AppError::Configuration(format!("Invalid board API url: {}", e)))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, AppError> {
        debug!("GET /{}", endpoint);
        let response = self
            .client
            .get(self.url(endpoint, params)?)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        parse_response(response).await
    }

    async fn create<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, AppError> {
        debug!("POST /{}", endpoint);
        let response = self
            .client
            .post(self.url(endpoint, &[])?)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        parse_response(response).await
    }

    async fn update<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, AppError> {
        debug!("PUT /{}", endpoint);
        let response = self
            .client
            .put(self.url(endpoint, &[])?)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        parse_response(response).await
    }
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
    let status = response.status();
    let body = response.text().await?;

    if status != StatusCode::OK {
        return Err(AppError::Remote {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str::<T>(&body).map_err(|e| {
        tracing::error!("Failed to parse board response: {}", e);
        AppError::Parse(format!("Failed to parse board response: {}", e))
    })
}

#[async_trait]
impl BoardClient for TrelloHttpClient {
    async fn fetch_boards(&self) -> Result<Vec<Board>, AppError> {
        self.fetch("members/me/boards", &[("fields", "name")]).await
    }

    async fn fetch_lists(&self, board_id: &str) -> Result<Vec<BoardList>, AppError> {
        self.fetch(&format!("boards/{}/lists", board_id), &[("fields", "name")])
            .await
    }

    async fn fetch_labels(&self, board_id: &str) -> Result<Vec<Label>, AppError> {
        self.fetch(
            &format!("boards/{}/labels", board_id),
            &[("fields", "name,color")],
        )
        .await
    }

    async fn create_label(
        &self,
        board_id: &str,
        name: &str,
        color: &str,
    ) -> Result<Label, AppError> {
        self.create(
            &format!("boards/{}/labels", board_id),
            &dto::NewLabelRequest { name, color },
        )
        .await
    }

    async fn fetch_cards(&self, list_id: &str) -> Result<Vec<Card>, AppError> {
        self.fetch(&format!("lists/{}/cards", list_id), &[("fields", "name,due")])
            .await
    }

    async fn create_card(&self, card: &NewCardRequest) -> Result<Card, AppError> {
        self.create("cards", card).await
    }

    async fn update_card(
        &self,
        card_id: &str,
        update: &UpdateCardRequest,
    ) -> Result<Card, AppError> {
        self.update(&format!("cards/{}", card_id), update).await
    }
}
