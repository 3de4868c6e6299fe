//! Parser for the service's encoded item strings.
//!
//! Grammar, as produced by the optimization service:
//!
//! ```text
//! item     := details " : " location
//! details  := name " (" "$" price ")"
//! location := store " - " address
//! ```
//!
//! Only the first `" : "`, `" ("` and `" - "` act as separators, so addresses
//! may contain further dashes. The price is the first `$`-prefixed number in
//! `details`.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::NormalizationError;
use crate::types::LineItem;

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+(?:\.\d*)?)").expect("valid regex"));

/// Parse one `"<name> ($<price>) : <store> - <address>"` string.
///
/// # Errors
///
/// Returns [`NormalizationError::Item`] carrying the raw string when any
/// separator is missing, a part is empty, or no price is present.
pub fn parse_line_item(raw: &str) -> Result<LineItem, NormalizationError> {
    let reject = |reason: &str| NormalizationError::Item {
        raw: raw.to_string(),
        reason: reason.to_string(),
    };

    let (details, location) = raw
        .split_once(" : ")
        .ok_or_else(|| reject("missing \" : \" between item and store"))?;
    let (name, _) = details
        .split_once(" (")
        .ok_or_else(|| reject("missing \" (\" before price"))?;
    let price = PRICE_RE
        .captures(details)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| reject("no $ price"))?;
    let unit_price = Decimal::from_str(price.as_str().trim_end_matches('.'))
        .map_err(|_| reject("price out of range"))?;
    let (store, address) = location
        .split_once(" - ")
        .ok_or_else(|| reject("missing \" - \" between store and address"))?;

    let name = name.trim();
    let store = store.trim();
    if name.is_empty() || store.is_empty() {
        return Err(reject("empty item or store name"));
    }

    Ok(LineItem {
        name: name.to_string(),
        unit_price,
        store: store.to_string(),
        store_address: address.trim().to_string(),
    })
}
