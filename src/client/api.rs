use reqwest::{RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::controllers::DataResponse;
use crate::error::FieldError;
use crate::middleware::USER_ID_HEADER;
use crate::models::{AdminVoucher, Booking, SeatMap, UserProfile};
use crate::services::checkout::{CheckoutQuote, CheckoutRequest};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Outcome of a call that reached the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Ok(T),
    /// Non-2xx answer; `message` is what the user should be shown.
    Failed { status: u16, message: String },
}

impl<T> ApiResult<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            ApiResult::Ok(value) => Some(value),
            ApiResult::Failed { .. } => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ApiResult::Ok(_))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    errors: Option<Vec<FieldError>>,
}

/// Picks `message`, else the first of `errors`, else a generic text.
pub fn error_message(status: u16, body: &[u8]) -> String {
    let body: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    body.message
        .or_else(|| body.errors.and_then(|errs| errs.into_iter().next()).map(|e| e.message))
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    user_id: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { base_url, http, user_id: None })
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    // GET /api/v1/vouchers/{code}; пустой код уходит как "-"
    pub async fn admin_voucher(&self, code: &str) -> Result<ApiResult<AdminVoucher>, ClientError> {
        let code = match code.trim() {
            "" => "-",
            code => code,
        };
        let url = self.url(&["vouchers", code])?;
        self.send(self.http.get(url)).await
    }

    pub async fn current_user(&self) -> Result<ApiResult<UserProfile>, ClientError> {
        let url = self.url(&["users"])?;
        self.send(self.http.get(url)).await
    }

    pub async fn seat_map(&self, showtime_id: &str) -> Result<ApiResult<SeatMap>, ClientError> {
        let url = self.url(&["showtimes", "search", "seats", showtime_id])?;
        self.send(self.http.get(url)).await
    }

    pub async fn quote(&self, req: &CheckoutRequest) -> Result<ApiResult<CheckoutQuote>, ClientError> {
        let url = self.url(&["checkout", "quote"])?;
        self.send(self.http.post(url).json(req)).await
    }

    pub async fn book(&self, req: &CheckoutRequest) -> Result<ApiResult<Booking>, ClientError> {
        let url = self.url(&["bookings"])?;
        self.send(self.http.post(url).json(req)).await
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<ApiResult<T>, ClientError> {
        let request = match &self.user_id {
            Some(id) => request.header(USER_ID_HEADER, id),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            let envelope: DataResponse<T> =
                serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))?;
            return Ok(ApiResult::Ok(envelope.data));
        }

        let message = error_message(status.as_u16(), &body);
        warn!("API call failed with {}: {}", status, message);
        Ok(ApiResult::Failed { status: status.as_u16(), message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins() {
        let body = br#"{"message":"Voucher not found","errors":[{"field":"x","message":"other"}]}"#;
        assert_eq!(error_message(404, body), "Voucher not found");
    }

    #[test]
    fn falls_back_to_first_error() {
        let body = br#"{"errors":[{"field":"points","message":"too many"},{"field":"seats","message":"x"}]}"#;
        assert_eq!(error_message(422, body), "too many");
    }

    #[test]
    fn unknown_body_gets_generic_text() {
        assert_eq!(error_message(502, b"<html>bad gateway</html>"), "Request failed with status 502");
    }

    #[test]
    fn urls_are_built_under_api_v1() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        let url = client.url(&["vouchers", "PROMO 10"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/vouchers/PROMO%2010");
    }
}
