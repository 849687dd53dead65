//! Input items and per-item parameter extraction.

use serde::Deserialize;
use serde_json::Value;

/// One unit of input flowing through the node.
///
/// `json` is the opaque payload the host attached to the item; `parameters`
/// holds the host-resolved parameter values for this item. Both default to
/// empty objects when absent from the items file.
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    #[serde(default = "empty_object")]
    pub json: Value,
    #[serde(default = "empty_object")]
    pub parameters: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// The three node parameters, after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionParams {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
}

impl ConversionParams {
    /// Read the parameters off an item, falling back to `USD`, `EUR` and `0`.
    ///
    /// No format or whitelist validation happens here; any string or number
    /// is passed through to the remote service as-is.
    pub fn from_item(item: &Item) -> Self {
        let get_str = |name: &str, default: &str| {
            item.parameters
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or(default)
                .to_string()
        };
        let amount = item
            .parameters
            .get("amount")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        Self {
            from_currency: get_str("fromCurrency", "USD"),
            to_currency: get_str("toCurrency", "EUR"),
            amount,
        }
    }
}
