//! Request, wire and plan types for the optimization service.
//!
//! # Design
//! `RawPlan` mirrors the service's JSON exactly and is only ever consumed by
//! the normalizer. `OptimizationPlan` is the display-ready result: item
//! strings are split into fields and route tags are typed. The mock-server
//! crate defines its own copies of the wire shapes; integration tests catch
//! schema drift between the two.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::NormalizationError;

/// Validated request derived from one `SearchInput`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationRequest {
    pub user_address: String,
    pub grocery_list: Vec<String>,
    pub max_stores: u8,
    /// Advisory only. Carried with the request but not sent to the service.
    pub budget: Decimal,
}

/// JSON body of `POST /optimize`.
#[derive(Debug, Serialize)]
pub(crate) struct OptimizeBody<'a> {
    pub csv_path: &'a str,
    pub grocery_list: &'a [String],
    pub max_stores: u8,
    pub user_address: &'a str,
}

/// Successful `POST /optimize` response, as sent by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawPlan {
    pub stores: Vec<String>,
    pub items: Vec<String>,
    pub item_total: Decimal,
    pub miles_traveled: Decimal,
    pub approximate_total_cost: Decimal,
    pub route_order: Vec<RawRouteStep>,
}

/// One entry of `route_order`. The tag stays a string so unknown values can
/// be reported instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRouteStep {
    pub step: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
}

/// One grocery item resolved to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub unit_price: Decimal,
    pub store: String,
    pub store_address: String,
}

impl LineItem {
    /// `"<store> - <address>"`, the form used by store route steps.
    pub fn store_location(&self) -> String {
        format!("{} - {}", self.store, self.store_address)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopKind {
    Start,
    Store,
    End,
}

impl StopKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "start" => Some(StopKind::Start),
            "store" => Some(StopKind::Store),
            "end" => Some(StopKind::End),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStep {
    pub step: u32,
    pub kind: StopKind,
    pub address: String,
}

/// Recomputed item total disagrees with the service's figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalMismatch {
    pub reported: Decimal,
    pub recomputed: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationWarning {
    ItemTotalMismatch(TotalMismatch),
}

/// Display-ready shopping plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationPlan {
    pub stores: Vec<String>,
    pub line_items: Vec<LineItem>,
    pub item_total: Decimal,
    pub miles_traveled: Decimal,
    pub approximate_total_cost: Decimal,
    pub route: Vec<RouteStep>,
    /// Item strings that could not be parsed; the rest of the plan is intact.
    pub rejected_items: Vec<NormalizationError>,
    pub warnings: Vec<NormalizationWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_plan_accepts_service_json() {
        let raw: RawPlan = serde_json::from_str(
            r#"{
                "stores": ["Target"],
                "items": ["bread ($2.30) : Target - 123 Main St, Charlotte, NC"],
                "item_total": 2.3,
                "miles_traveled": 3.42,
                "approximate_total_cost": 4.35,
                "route_order": [{"step": 1, "type": "start", "address": "home"}]
            }"#,
        )
        .unwrap();
        assert_eq!(raw.item_total, Decimal::new(23, 1));
        assert_eq!(raw.miles_traveled, Decimal::new(342, 2));
        assert_eq!(raw.route_order[0].kind, "start");
    }

    #[test]
    fn raw_plan_rejects_missing_route_order() {
        let result: Result<RawPlan, _> = serde_json::from_str(
            r#"{"stores": [], "items": [], "item_total": 0, "miles_traveled": 0, "approximate_total_cost": 0}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn stop_kind_from_tag() {
        assert_eq!(StopKind::from_tag("start"), Some(StopKind::Start));
        assert_eq!(StopKind::from_tag("store"), Some(StopKind::Store));
        assert_eq!(StopKind::from_tag("end"), Some(StopKind::End));
        assert_eq!(StopKind::from_tag("Store"), None);
    }

    #[test]
    fn optimize_body_uses_wire_field_names() {
        let items = vec!["milk".to_string()];
        let body = OptimizeBody {
            csv_path: "prices.csv",
            grocery_list: &items,
            max_stores: 2,
            user_address: "1 Elm St",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "csv_path": "prices.csv",
                "grocery_list": ["milk"],
                "max_stores": 2,
                "user_address": "1 Elm St"
            })
        );
    }
}
