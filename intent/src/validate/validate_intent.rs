use crate::types::{error::IntentError, intent::PartialTransactionIntent};

/// Schema checks applied to an upstream extraction before it is normalized.
///
/// A record failing here is an extraction failure, never a normalized intent.
pub fn validate_extraction(raw: &PartialTransactionIntent) -> Result<(), IntentError> {
    if let Some(amount) = raw.amount {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(IntentError::InvalidAmount(format!(
                "amount must be a positive number, got {}",
                amount
            )));
        }
    }

    let has_destination = raw
        .destination_chain
        .as_deref()
        .is_some_and(|chain| !chain.trim().is_empty());

    if let Some(protocol) = raw.suggested_protocol {
        if protocol.is_cross_chain() && !has_destination {
            return Err(IntentError::MissingDestination {
                protocol: protocol.to_string(),
            });
        }
    }

    Ok(())
}

/// Decode and validate an extraction payload in one step
pub fn parse_extraction(payload: &str) -> Result<PartialTransactionIntent, IntentError> {
    let raw: PartialTransactionIntent = serde_json::from_str(payload)?;
    validate_extraction(&raw)?;
    Ok(raw)
}
