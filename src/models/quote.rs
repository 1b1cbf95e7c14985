use serde_json::Value;

use crate::errors::AppError;

/// Pull `body[asset][currency]` out of a simple-price style response.
pub fn extract_price(body: &Value, asset: &str, currency: &str) -> Result<f64, AppError> {
    let quotes = body
        .get(asset)
        .ok_or_else(|| AppError::Fetch(format!("response has no quotes for '{asset}'")))?;

    let price = quotes
        .get(currency)
        .ok_or_else(|| AppError::Fetch(format!("response has no '{currency}' quote for '{asset}'")))?
        .as_f64()
        .ok_or_else(|| AppError::Fetch(format!("'{asset}'/'{currency}' quote is not a number")))?;

    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::Fetch(format!(
            "'{asset}'/'{currency}' quote is not a positive price: {price}"
        )));
    }

    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_nested_price() {
        let body = json!({ "bitcoin": { "usd": 64123.5, "eur": 59000 } });
        assert_eq!(extract_price(&body, "bitcoin", "usd").unwrap(), 64_123.5);
        assert_eq!(extract_price(&body, "bitcoin", "eur").unwrap(), 59_000.0);
    }

    #[test]
    fn missing_asset_or_currency_is_fetch_error() {
        let body = json!({ "bitcoin": { "usd": 64123.5 } });
        assert!(matches!(
            extract_price(&body, "ethereum", "usd"),
            Err(AppError::Fetch(_))
        ));
        assert!(matches!(
            extract_price(&body, "bitcoin", "gbp"),
            Err(AppError::Fetch(_))
        ));
    }

    #[test]
    fn non_numeric_or_zero_quote_is_rejected() {
        let body = json!({ "bitcoin": { "usd": "64123.5", "eur": 0 } });
        assert!(extract_price(&body, "bitcoin", "usd").is_err());
        assert!(extract_price(&body, "bitcoin", "eur").is_err());
    }
}
