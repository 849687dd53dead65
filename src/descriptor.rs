//! Static registration metadata consumed by a host's node discovery.

use serde::Serialize;
use serde_json::{Value, json};

use crate::credentials::CREDENTIAL_PROFILE;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub display_name: &'static str,
    pub name: &'static str,
    pub group: Vec<&'static str>,
    pub version: u32,
    pub description: &'static str,
    pub credentials: Vec<CredentialRef>,
    pub properties: Vec<NodeProperty>,
}

#[derive(Debug, Serialize)]
pub struct CredentialRef {
    pub name: &'static str,
    pub required: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub display_name: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub default: Value,
    pub description: &'static str,
    pub required: bool,
}

/// The currency exchange node as a host sees it.
pub fn descriptor() -> NodeDescriptor {
    NodeDescriptor {
        display_name: "Currency Exchange",
        name: "currencyExchange",
        group: vec!["transform"],
        version: 1,
        description: "Convert currencies using exchange rates from exchangerate.host",
        credentials: vec![CredentialRef {
            name: CREDENTIAL_PROFILE,
            required: true,
        }],
        properties: vec![
            NodeProperty {
                display_name: "From Currency",
                name: "fromCurrency",
                kind: "string",
                default: json!("USD"),
                description: "The currency to convert from (e.g., USD, EUR, GBP)",
                required: true,
            },
            NodeProperty {
                display_name: "To Currency",
                name: "toCurrency",
                kind: "string",
                default: json!("EUR"),
                description: "The currency to convert to (e.g., USD, EUR, GBP)",
                required: true,
            },
            NodeProperty {
                display_name: "Amount",
                name: "amount",
                kind: "number",
                default: json!(1),
                description: "The amount to convert",
                required: true,
            },
        ],
    }
}
