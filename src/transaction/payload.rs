//! Parsing and validation of the JSON body sent to create or update a transaction.

use axum::{Json, extract::rejection::JsonRejection};
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    transaction::{NewTransaction, TransactionType},
};

/// The only accepted date format, e.g. "2024-03-01".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The largest accepted amount. Keeps the ledger totals finite.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// The JSON body for creating or replacing a transaction.
///
/// Every key is required. The values are kept as sent by the client and are
/// validated when converting into a [NewTransaction].
#[derive(Debug, Deserialize)]
pub struct TransactionPayload {
    /// The date formatted as `YYYY-MM-DD`.
    pub date: String,
    /// Text detailing the transaction.
    pub description: String,
    /// The label used to group the transaction.
    pub category: String,
    /// Either "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The amount as a JSON number or as a string containing a number.
    pub amount: AmountInput,
}

/// An amount sent either as a JSON number or a numeric string, e.g. `150` or `"150.00"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A JSON number.
    Number(f64),
    /// A string that should contain a number.
    Text(String),
}

impl AmountInput {
    fn parse(self) -> Result<f64, Error> {
        let (amount, raw) = match self {
            AmountInput::Number(number) => (Some(number), number.to_string()),
            AmountInput::Text(text) => (text.trim().parse::<f64>().ok(), text),
        };

        match amount {
            Some(amount) if (0.0..=MAX_AMOUNT).contains(&amount) => Ok(amount),
            _ => Err(Error::InvalidAmount(raw)),
        }
    }
}

/// Parse a date formatted as `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

impl TryFrom<TransactionPayload> for NewTransaction {
    type Error = Error;

    fn try_from(payload: TransactionPayload) -> Result<Self, Self::Error> {
        let date = parse_date(&payload.date)?;
        let transaction_type = payload.transaction_type.parse::<TransactionType>()?;
        let amount = payload.amount.parse()?;

        Ok(NewTransaction {
            date,
            description: payload.description,
            category: payload.category,
            transaction_type,
            amount,
        })
    }
}

/// Validate the result of extracting a [TransactionPayload] from a request body.
///
/// # Errors
/// Returns an [Error::InvalidJson] if the body could not be extracted, e.g.
/// the body is not JSON or a key is missing, otherwise any of the validation
/// errors from converting the payload into a [NewTransaction].
pub fn parse_payload(
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Result<NewTransaction, Error> {
    let Json(payload) = payload.map_err(|rejection| Error::InvalidJson(rejection.body_text()))?;

    payload.try_into()
}
