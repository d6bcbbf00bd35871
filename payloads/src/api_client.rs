use crate::{
    CinemaId, MovieId, normalize, requests,
    responses::{self, Envelope},
};
use reqwest::StatusCode;
use resource::FailureMessage;
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for interfacing with the backend.
#[derive(Clone)]
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
    /// Bearer token of the authenticated user, sent with every request.
    pub token: Option<String>,
}

/// Helper methods for http actions
impl APIClient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            inner_client: reqwest::Client::new(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get(&self, path: &str) -> ReqwestResult {
        let request = self.inner_client.get(self.format_url(path));
        self.authorize(request).send().await
    }

    async fn get_with_query(
        &self,
        path: &str,
        query: &impl Serialize,
    ) -> ReqwestResult {
        let request = self.inner_client.get(self.format_url(path)).query(query);
        self.authorize(request).send().await
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request = self.inner_client.post(self.format_url(path)).json(body);
        self.authorize(request).send().await
    }

    async fn delete(&self, path: &str) -> ReqwestResult {
        let request = self.inner_client.delete(self.format_url(path));
        self.authorize(request).send().await
    }
}

/// Methods on the backend API
impl APIClient {
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let response = self.get("health_check").await?;
        ok_empty(response).await
    }

    /// Exchange credentials for a bearer token and the user profile.
    pub async fn login(
        &self,
        credentials: &requests::LoginCredentials,
    ) -> Result<responses::LoginResponse, ClientError> {
        let response = self.post("auth/login", credentials).await?;
        ok_body(response).await
    }

    pub async fn list_movies(
        &self,
    ) -> Result<Vec<responses::Movie>, ClientError> {
        let response = self.get("movies").await?;
        ok_body(response).await
    }

    /// Search the movie catalog by title.
    pub async fn search_movies(
        &self,
        query: &str,
    ) -> Result<Vec<responses::Movie>, ClientError> {
        let response = self.get_with_query("movies/search", &[("q", query)]).await?;
        ok_body(response).await
    }

    pub async fn get_movie(
        &self,
        movie_id: &MovieId,
    ) -> Result<responses::Movie, ClientError> {
        let response = self.get(&format!("movies/{movie_id}")).await?;
        ok_body(response).await
    }

    /// Fetch two movies at once for the side-by-side comparison.
    pub async fn compare_movies(
        &self,
        left: &MovieId,
        right: &MovieId,
    ) -> Result<(responses::Movie, responses::Movie), ClientError> {
        futures::try_join!(self.get_movie(left), self.get_movie(right))
    }

    pub async fn list_reviews(
        &self,
        movie_id: &MovieId,
    ) -> Result<Vec<responses::Review>, ClientError> {
        let response = self.get(&format!("movies/{movie_id}/reviews")).await?;
        ok_body(response).await
    }

    pub async fn create_review(
        &self,
        details: &requests::CreateReview,
    ) -> Result<responses::Review, ClientError> {
        let response = self.post("reviews", details).await?;
        ok_body(response).await
    }

    pub async fn list_cinemas(
        &self,
    ) -> Result<Vec<responses::Cinema>, ClientError> {
        let response = self.get("cinemas").await?;
        ok_body(response).await
    }

    pub async fn get_cinema(
        &self,
        cinema_id: &CinemaId,
    ) -> Result<responses::Cinema, ClientError> {
        let response = self.get(&format!("cinemas/{cinema_id}")).await?;
        ok_body(response).await
    }

    /// Movie ids in the current user's favorites.
    ///
    /// Favorite records come back in several shapes (populated movie,
    /// bare reference, legacy `movieId`), so each one goes through
    /// [`normalize::favorite_movie_id`]. Records without a recognizable id
    /// are skipped.
    pub async fn list_favorites(&self) -> Result<Vec<MovieId>, ClientError> {
        let response = self.get("favorites").await?;
        let records: Vec<serde_json::Value> = ok_body(response).await?;
        Ok(records
            .iter()
            .filter_map(|record| {
                let id = normalize::favorite_movie_id(record);
                if id.is_none() {
                    tracing::warn!(%record, "favorite without a movie id");
                }
                id
            })
            .collect())
    }

    pub async fn add_favorite(
        &self,
        movie_id: &MovieId,
    ) -> Result<(), ClientError> {
        let details = requests::AddFavorite {
            movie_id: movie_id.clone(),
        };
        let response = self.post("favorites", &details).await?;
        ok_empty(response).await
    }

    pub async fn remove_favorite(
        &self,
        movie_id: &MovieId,
    ) -> Result<(), ClientError> {
        let response = self.delete(&format!("favorites/{movie_id}")).await?;
        ok_empty(response).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A non-success status. `message` is taken from the error envelope
    /// when the body carried one.
    #[error("Request failed with status code {}", .status.as_u16())]
    APIError {
        status: StatusCode,
        message: Option<String>,
        body: String,
    },
    /// A success status whose envelope still reported `success: false`.
    #[error("{}", .message.as_deref().unwrap_or("La petición no tuvo éxito"))]
    Rejected { message: Option<String> },
    #[error("La respuesta no contiene datos")]
    MissingData,
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn from_error_response(status: StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<Envelope<IgnoredAny>>(&body)
            .ok()
            .and_then(|envelope| envelope.message);
        Self::APIError {
            status,
            message,
            body,
        }
    }
}

impl FailureMessage for ClientError {
    fn response_message(&self) -> Option<String> {
        match self {
            Self::APIError { message, .. } | Self::Rejected { message } => {
                message.clone()
            }
            _ => None,
        }
    }

    fn message(&self) -> Option<String> {
        match self {
            // Transport failures carry nothing worth showing.
            Self::Network(_) => None,
            _ => Some(self.to_string()),
        }
    }
}

/// Unwrap the envelope of a successful request into the desired type, or
/// return an appropriate error.
pub async fn ok_body<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::from_error_response(
            status,
            response.text().await?,
        ));
    }
    let envelope = response.json::<Envelope<T>>().await?;
    if !envelope.success {
        return Err(ClientError::Rejected {
            message: envelope.message,
        });
    }
    envelope.data.ok_or(ClientError::MissingData)
}

/// Check that a response without data is OK, returning a ClientError if
/// not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::from_error_response(
            status,
            response.text().await?,
        ));
    }
    if status == StatusCode::NO_CONTENT {
        return Ok(());
    }
    let envelope = response.json::<Envelope<IgnoredAny>>().await?;
    if !envelope.success {
        return Err(ClientError::Rejected {
            message: envelope.message,
        });
    }
    Ok(())
}
