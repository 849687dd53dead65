use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::convert_provider::{ConversionRequest, ConvertProvider, RateQuote};
use crate::credentials::ApiCredentials;
use crate::error::NodeError;

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate.host";

/// `ConvertProvider` backed by the exchangerate.host `/convert` endpoint.
pub struct ExchangeRateHostProvider {
    base_url: String,
}

impl ExchangeRateHostProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateHostProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct ConvertResponse {
    #[serde(default)]
    success: bool,
    result: Option<f64>,
    info: Option<ConvertInfo>,
    date: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ConvertInfo {
    rate: Option<f64>,
}

#[async_trait]
impl ConvertProvider for ExchangeRateHostProvider {
    #[instrument(
        name = "ConvertFetch",
        skip(self, credentials),
        fields(from = %request.from, to = %request.to, amount = request.amount)
    )]
    async fn convert(
        &self,
        request: &ConversionRequest,
        credentials: &ApiCredentials,
    ) -> Result<RateQuote, NodeError> {
        let url = format!("{}/convert", self.base_url);
        debug!("Requesting conversion from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fxnode/1.0")
            .build()
            .map_err(|e| NodeError::Request(e.to_string()))?;

        // access_key is appended as a query parameter and must never be
        // echoed into the logs.
        let response = client
            .get(&url)
            .query(&[
                ("from", request.from.as_str()),
                ("to", request.to.as_str()),
                ("amount", &request.amount.to_string()),
                ("access_key", &credentials.api_key),
            ])
            .send()
            .await
            .map_err(|e| {
                NodeError::Request(format!(
                    "{} for pair: {}/{}",
                    e, request.from, request.to
                ))
            })?;

        if !response.status().is_success() {
            return Err(NodeError::Request(format!(
                "HTTP error: {} for pair: {}/{}",
                response.status(),
                request.from,
                request.to
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| NodeError::Request(e.to_string()))?;

        let data: ConvertResponse = serde_json::from_str(&text).map_err(|e| {
            debug!("Unparseable convert response: {e}");
            NodeError::Upstream
        })?;
        debug!(success = data.success, result = ?data.result, date = ?data.date, "Parsed convert response");

        if !data.success {
            return Err(NodeError::Upstream);
        }
        let converted = data.result.ok_or(NodeError::Upstream)?;

        Ok(RateQuote {
            converted,
            rate: data.info.and_then(|i| i.rate),
            date: data.date,
        })
    }
}
