//! Shopper input and the request builder.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{Field, ValidationError};
use crate::types::OptimizationRequest;

pub const MIN_STORES: u8 = 1;
pub const MAX_STORES: u8 = 10;

/// The four search fields exactly as the shopper typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    pub home_address: String,
    /// Comma-separated items, e.g. `"bread, eggs, milk"`.
    pub grocery_list: String,
    pub budget: String,
    pub max_stores: String,
}

/// Split a comma-separated list into trimmed, non-empty items.
pub fn parse_grocery_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate `input` and convert it into an `OptimizationRequest`.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the first offending field, checked in
/// form order: address, grocery list, budget, max stores.
pub fn build_request(input: &SearchInput) -> Result<OptimizationRequest, ValidationError> {
    if input.home_address.trim().is_empty() {
        return Err(ValidationError::new(Field::HomeAddress, "address is required"));
    }

    let grocery_list = parse_grocery_list(&input.grocery_list);
    if grocery_list.is_empty() {
        return Err(ValidationError::new(Field::GroceryList, "list has no items"));
    }

    let budget = parse_budget(&input.budget)?;
    let max_stores = parse_max_stores(&input.max_stores)?;

    Ok(OptimizationRequest {
        user_address: input.home_address.clone(),
        grocery_list,
        max_stores,
        budget,
    })
}

fn parse_budget(raw: &str) -> Result<Decimal, ValidationError> {
    let budget = Decimal::from_str(raw.trim())
        .map_err(|_| ValidationError::new(Field::Budget, format!("{raw:?} is not a number")))?;
    if budget.is_sign_negative() && !budget.is_zero() {
        return Err(ValidationError::new(Field::Budget, "must not be negative"));
    }
    Ok(budget)
}

fn parse_max_stores(raw: &str) -> Result<u8, ValidationError> {
    let out_of_range = || {
        ValidationError::new(
            Field::MaxStores,
            format!("must be a whole number between {MIN_STORES} and {MAX_STORES}"),
        )
    };
    let value: i64 = raw.trim().parse().map_err(|_| out_of_range())?;
    u8::try_from(value)
        .ok()
        .filter(|n| (MIN_STORES..=MAX_STORES).contains(n))
        .ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> SearchInput {
        SearchInput {
            home_address: "123 Main St, Charlotte, NC 28202".to_string(),
            grocery_list: "bread, eggs,  milk ".to_string(),
            budget: "50.00".to_string(),
            max_stores: "3".to_string(),
        }
    }

    #[test]
    fn grocery_list_is_trimmed_and_split() {
        assert_eq!(parse_grocery_list("bread, eggs,  milk "), vec!["bread", "eggs", "milk"]);
    }

    #[test]
    fn grocery_list_drops_empty_entries() {
        assert_eq!(parse_grocery_list(" ,rice,, ,beans,"), vec!["rice", "beans"]);
    }

    #[test]
    fn build_valid_request() {
        let req = build_request(&input()).unwrap();
        assert_eq!(req.user_address, "123 Main St, Charlotte, NC 28202");
        assert_eq!(req.grocery_list, vec!["bread", "eggs", "milk"]);
        assert_eq!(req.max_stores, 3);
        assert_eq!(req.budget, Decimal::new(5000, 2));
    }

    #[test]
    fn build_is_deterministic() {
        assert_eq!(build_request(&input()).unwrap(), build_request(&input()).unwrap());
    }

    #[test]
    fn address_is_passed_through_unchanged() {
        let mut input = input();
        input.home_address = "  9 Elm St  ".to_string();
        assert_eq!(build_request(&input).unwrap().user_address, "  9 Elm St  ");
    }

    #[test]
    fn blank_address_is_rejected() {
        let mut input = input();
        input.home_address = "   ".to_string();
        assert_eq!(build_request(&input).unwrap_err().field, Field::HomeAddress);
    }

    #[test]
    fn empty_grocery_list_is_rejected() {
        let mut input = input();
        input.grocery_list = " , ,".to_string();
        assert_eq!(build_request(&input).unwrap_err().field, Field::GroceryList);
    }

    #[test]
    fn max_stores_bounds() {
        for raw in ["0", "11", "-1", "3.5", "three", "", "300"] {
            let mut input = input();
            input.max_stores = raw.to_string();
            let err = build_request(&input).unwrap_err();
            assert_eq!(err.field, Field::MaxStores, "input {raw:?}");
        }
        for raw in ["1", "10", " 4 "] {
            let mut input = input();
            input.max_stores = raw.to_string();
            assert!(build_request(&input).is_ok(), "input {raw:?}");
        }
    }

    #[test]
    fn budget_must_be_a_non_negative_number() {
        for raw in ["-0.01", "abc", ""] {
            let mut input = input();
            input.budget = raw.to_string();
            assert_eq!(build_request(&input).unwrap_err().field, Field::Budget, "input {raw:?}");
        }
        let mut input = input();
        input.budget = "0".to_string();
        assert_eq!(build_request(&input).unwrap().budget, Decimal::ZERO);
    }

    #[test]
    fn rejoined_list_reparses_to_the_same_items() {
        let req = build_request(&input()).unwrap();
        let rejoined = req.grocery_list.join(",");
        assert_eq!(parse_grocery_list(&rejoined), req.grocery_list);
    }
}
