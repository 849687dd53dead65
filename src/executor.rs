//! The conversion executor: one sequential pass over the input items.
//!
//! For each item the executor extracts parameters, issues one request
//! through the [`ConvertProvider`] seam, and shapes one output record.
//! Items are strictly sequential; item i+1 does not start until item i's
//! outcome is final. Credentials are resolved once per pass and handed into
//! the per-item routine, never re-read mid-pass.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::convert_provider::{ConversionRequest, ConvertProvider, RateQuote};
use crate::credentials::{ApiCredentials, CREDENTIAL_PROFILE, CredentialResolver};
use crate::error::{ExecutionError, NodeError};
use crate::item::{ConversionParams, Item};
use crate::outcome::{ConversionRecord, ItemOutcome};

pub struct ConversionExecutor<'a> {
    provider: &'a dyn ConvertProvider,
    /// Failure-tolerant mode: capture per-item errors as records instead of
    /// aborting the pass.
    continue_on_fail: bool,
}

impl<'a> ConversionExecutor<'a> {
    pub fn new(provider: &'a dyn ConvertProvider, continue_on_fail: bool) -> Self {
        Self {
            provider,
            continue_on_fail,
        }
    }

    /// Run one pass over `items`.
    ///
    /// In tolerant mode the output has exactly one outcome per input item,
    /// in input order. In intolerant mode (the default) the first failure
    /// aborts the pass with an [`ExecutionError`] tagged with the failing
    /// item's index.
    pub async fn run(
        &self,
        items: &[Item],
        resolver: &dyn CredentialResolver,
    ) -> Result<Vec<ItemOutcome>, ExecutionError> {
        info!("Converting {} item(s)", items.len());

        // Resolved once for the whole pass. A failure here fails every item
        // before any network call goes out.
        let credentials = resolver.resolve(CREDENTIAL_PROFILE);

        let mut outcomes = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let result = match &credentials {
                Ok(credentials) => self.convert_item(item, credentials).await,
                Err(err) => Err(err.clone()),
            };

            match result {
                Ok(record) => outcomes.push(ItemOutcome::Success(record)),
                Err(err) if self.continue_on_fail => {
                    warn!("item {index} failed: {err}");
                    outcomes.push(ItemOutcome::Failure {
                        json: item.json.clone(),
                        error: err,
                        paired_item: index,
                    });
                }
                Err(err) => {
                    return Err(ExecutionError {
                        item_index: index,
                        source: err,
                    });
                }
            }
        }

        Ok(outcomes)
    }

    async fn convert_item(
        &self,
        item: &Item,
        credentials: &ApiCredentials,
    ) -> Result<ConversionRecord, NodeError> {
        let params = ConversionParams::from_item(item);
        debug!(
            from = %params.from_currency,
            to = %params.to_currency,
            amount = params.amount,
            "Extracted conversion parameters"
        );

        let request = ConversionRequest {
            from: params.from_currency.clone(),
            to: params.to_currency.clone(),
            amount: params.amount,
        };
        let quote = self.provider.convert(&request, credentials).await?;

        shape_record(&params, quote)
    }
}

/// Build the output record from a validated quote.
///
/// A response-provided rate is always preferred. Falling back to
/// `converted / amount` is only allowed for a non-zero amount; a zero
/// amount without an explicit rate is rejected rather than producing a
/// non-finite value.
fn shape_record(
    params: &ConversionParams,
    quote: RateQuote,
) -> Result<ConversionRecord, NodeError> {
    let rate = match quote.rate {
        Some(rate) => rate,
        None if params.amount == 0.0 => return Err(NodeError::ZeroAmount),
        None => quote.converted / params.amount,
    };

    Ok(ConversionRecord {
        from_currency: params.from_currency.clone(),
        to_currency: params.to_currency.clone(),
        original_amount: params.amount,
        converted_amount: quote.converted,
        rate,
        timestamp: quote.date.unwrap_or_else(|| Utc::now().to_rfc3339()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::ConfigCredentialResolver;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A provider test double that replays scripted results and records
    /// every request it receives.
    struct MockProvider {
        results: Mutex<VecDeque<Result<RateQuote, NodeError>>>,
        calls: Mutex<Vec<ConversionRequest>>,
    }

    impl MockProvider {
        fn new(results: Vec<Result<RateQuote, NodeError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ConvertProvider for MockProvider {
        async fn convert(
            &self,
            request: &ConversionRequest,
            _credentials: &ApiCredentials,
        ) -> Result<RateQuote, NodeError> {
            self.calls.lock().unwrap().push(request.clone());
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .expect("mock provider ran out of scripted results")
        }
    }

    fn quote(converted: f64, rate: Option<f64>, date: Option<&str>) -> RateQuote {
        RateQuote {
            converted,
            rate,
            date: date.map(str::to_string),
        }
    }

    fn item(parameters: serde_json::Value) -> Item {
        Item {
            json: json!({ "tag": "payload" }),
            parameters,
        }
    }

    fn resolver() -> ConfigCredentialResolver {
        ConfigCredentialResolver::new(Some("key".to_string()))
    }

    #[tokio::test]
    async fn test_one_outcome_per_item_in_order() {
        let provider = MockProvider::new(vec![
            Ok(quote(92.5, Some(0.925), Some("2024-05-01"))),
            Err(NodeError::Upstream),
            Ok(quote(10.0, Some(2.0), Some("2024-05-01"))),
        ]);
        let executor = ConversionExecutor::new(&provider, true);

        let items = vec![
            item(json!({ "amount": 100.0 })),
            item(json!({ "amount": 1.0 })),
            item(json!({ "amount": 5.0 })),
        ];
        let outcomes = executor.run(&items, &resolver()).await.unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_success());
        assert!(!outcomes[1].is_success());
        assert!(outcomes[2].is_success());
        match &outcomes[1] {
            ItemOutcome::Failure {
                paired_item, error, ..
            } => {
                assert_eq!(*paired_item, 1);
                assert_eq!(*error, NodeError::Upstream);
            }
            other => panic!("expected failure outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_intolerant_mode_aborts_on_first_failure() {
        let provider = MockProvider::new(vec![Err(NodeError::Upstream)]);
        let executor = ConversionExecutor::new(&provider, false);

        let items = vec![item(json!({ "amount": 1.0 })), item(json!({ "amount": 2.0 }))];
        let err = executor.run(&items, &resolver()).await.unwrap_err();

        assert_eq!(err.item_index, 0);
        assert_eq!(err.source, NodeError::Upstream);
        // Item 2 must never reach the provider.
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_every_item_without_requests() {
        let provider = MockProvider::new(vec![]);
        let executor = ConversionExecutor::new(&provider, true);
        let no_key = ConfigCredentialResolver::new(None);

        let items = vec![item(json!({})), item(json!({}))];
        let outcomes = executor.run(&items, &no_key).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            match outcome {
                ItemOutcome::Failure { error, .. } => {
                    assert!(matches!(error, NodeError::Credential(_)));
                }
                other => panic!("expected credential failure, got {other:?}"),
            }
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credentials_abort_at_first_item_when_intolerant() {
        let provider = MockProvider::new(vec![]);
        let executor = ConversionExecutor::new(&provider, false);
        let no_key = ConfigCredentialResolver::new(Some(String::new()));

        let items = vec![item(json!({})), item(json!({}))];
        let err = executor.run(&items, &no_key).await.unwrap_err();

        assert_eq!(err.item_index, 0);
        assert!(matches!(err.source, NodeError::Credential(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_response_rate_is_preferred_over_division() {
        let provider = MockProvider::new(vec![Ok(quote(92.5, Some(0.925), Some("2024-05-01")))]);
        let executor = ConversionExecutor::new(&provider, false);

        let items = vec![item(json!({
            "fromCurrency": "USD",
            "toCurrency": "EUR",
            "amount": 100.0
        }))];
        let outcomes = executor.run(&items, &resolver()).await.unwrap();

        match &outcomes[0] {
            ItemOutcome::Success(record) => {
                assert_eq!(record.from_currency, "USD");
                assert_eq!(record.to_currency, "EUR");
                assert_eq!(record.original_amount, 100.0);
                assert_eq!(record.converted_amount, 92.5);
                assert_eq!(record.rate, 0.925);
                assert_eq!(record.timestamp, "2024-05-01");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_computed_by_division_when_response_omits_it() {
        let provider = MockProvider::new(vec![Ok(quote(92.5, None, Some("2024-05-01")))]);
        let executor = ConversionExecutor::new(&provider, false);

        let items = vec![item(json!({ "amount": 100.0 }))];
        let outcomes = executor.run(&items, &resolver()).await.unwrap();

        match &outcomes[0] {
            ItemOutcome::Success(record) => {
                assert!((record.rate - 0.925).abs() < 1e-12);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_amount_without_rate_is_rejected() {
        let provider = MockProvider::new(vec![Ok(quote(0.0, None, None))]);
        let executor = ConversionExecutor::new(&provider, false);

        let items = vec![item(json!({ "amount": 0.0 }))];
        let err = executor.run(&items, &resolver()).await.unwrap_err();

        assert_eq!(err.item_index, 0);
        assert_eq!(err.source, NodeError::ZeroAmount);
    }

    #[tokio::test]
    async fn test_zero_amount_with_explicit_rate_succeeds() {
        let provider = MockProvider::new(vec![Ok(quote(0.0, Some(0.925), None))]);
        let executor = ConversionExecutor::new(&provider, false);

        let items = vec![item(json!({ "amount": 0.0 }))];
        let outcomes = executor.run(&items, &resolver()).await.unwrap();

        match &outcomes[0] {
            ItemOutcome::Success(record) => assert_eq!(record.rate, 0.925),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timestamp_falls_back_to_now() {
        let provider = MockProvider::new(vec![Ok(quote(1.0, Some(1.0), None))]);
        let executor = ConversionExecutor::new(&provider, false);

        let items = vec![item(json!({ "amount": 1.0 }))];
        let outcomes = executor.run(&items, &resolver()).await.unwrap();

        match &outcomes[0] {
            ItemOutcome::Success(record) => {
                chrono::DateTime::parse_from_rfc3339(&record.timestamp)
                    .expect("timestamp should be RFC 3339");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_outcome_carries_original_payload() {
        let provider = MockProvider::new(vec![Err(NodeError::Request("boom".to_string()))]);
        let executor = ConversionExecutor::new(&provider, true);

        let items = vec![item(json!({}))];
        let outcomes = executor.run(&items, &resolver()).await.unwrap();

        match &outcomes[0] {
            ItemOutcome::Failure { json, .. } => assert_eq!(json["tag"], "payload"),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
