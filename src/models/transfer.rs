//! Transfer request model.

use serde::Deserialize;

/// Request body for `POST /accounts/transfer/{id}`.
///
/// The source account is the `{id}` in the path; the body names the destination.
///
/// # JSON Example
///
/// ```json
/// {
///   "to_account": 2,
///   "amount": 200
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Destination account id
    #[serde(alias = "toAccount")]
    pub to_account: i64,

    /// Amount in minor units; must be positive
    pub amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_field_spellings() {
        let snake: TransferRequest = serde_json::from_str(r#"{"to_account":2,"amount":5}"#).unwrap();
        let camel: TransferRequest = serde_json::from_str(r#"{"toAccount":2,"amount":5}"#).unwrap();
        assert_eq!(snake.to_account, camel.to_account);
        assert_eq!(snake.amount, 5);
    }
}
