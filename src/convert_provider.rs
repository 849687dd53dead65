//! Conversion abstraction the executor talks through.

use async_trait::async_trait;

use crate::credentials::ApiCredentials;
use crate::error::NodeError;

/// One conversion to perform, straight from the item's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// What the remote service answered for a validated, successful conversion.
///
/// `rate` and `date` stay optional; the executor decides how to fill the
/// gaps when shaping the output record.
#[derive(Debug, Clone)]
pub struct RateQuote {
    pub converted: f64,
    pub rate: Option<f64>,
    pub date: Option<String>,
}

#[async_trait]
pub trait ConvertProvider: Send + Sync {
    async fn convert(
        &self,
        request: &ConversionRequest,
        credentials: &ApiCredentials,
    ) -> Result<RateQuote, NodeError>;
}
