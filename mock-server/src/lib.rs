//! Stand-in for the grocery optimization service.
//!
//! Serves the same `/optimize` contract as the real service over a small
//! in-memory price catalog. Store choice is deliberately simple (cheapest
//! matching offer per item, stores visited nearest first); it exists so
//! clients can be exercised end to end without the real optimizer.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

/// Travel surcharge added to the item total, in dollars per mile.
pub const COST_PER_MILE: f64 = 0.6;

pub const NO_COMBINATION: &str =
    "No valid combination found. Try changing your max stores or item list.";

/// One priced item at one store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Offer {
    pub store_name: String,
    pub address: String,
    pub item: String,
    pub price: f64,
    /// Distance from the shopper's home, standing in for geocoding.
    pub miles_from_home: f64,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub csv_path: Option<String>,
    #[serde(default)]
    pub grocery_list: Option<Vec<String>>,
    #[serde(default)]
    pub max_stores: Option<usize>,
    #[serde(default)]
    pub user_address: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteStep {
    pub step: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plan {
    pub stores: Vec<String>,
    pub items: Vec<String>,
    pub item_total: f64,
    pub miles_traveled: f64,
    pub approximate_total_cost: f64,
    pub route_order: Vec<RouteStep>,
}

pub type Catalog = Arc<Vec<Offer>>;

pub fn app() -> Router {
    app_with_catalog(default_catalog())
}

pub fn app_with_catalog(offers: Vec<Offer>) -> Router {
    let catalog: Catalog = Arc::new(offers);
    Router::new()
        .route("/", get(home))
        .route("/optimize", post(optimize))
        .with_state(catalog)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn home() -> &'static str {
    "Grocery optimizer API is running! Send POST to /optimize"
}

async fn optimize(State(catalog): State<Catalog>, Json(input): Json<OptimizeRequest>) -> Response {
    tracing::info!(
        csv_path = input.csv_path.as_deref().unwrap_or("-"),
        items = input.grocery_list.as_ref().map_or(0, Vec::len),
        "optimize request"
    );
    match plan(&catalog, &input) {
        Ok(plan) => Json(plan).into_response(),
        Err(message) => {
            tracing::info!(%message, "optimize request refused");
            Json(json!({ "error": message })).into_response()
        }
    }
}

/// Build a plan for `input`, or the error message the service would return.
pub fn plan(catalog: &[Offer], input: &OptimizeRequest) -> Result<Plan, String> {
    let address = input.user_address.as_deref().map(str::trim).unwrap_or("");
    let mut problems = Vec::new();
    if address.is_empty() {
        problems.push("Could not locate your address.");
    }
    let grocery_list = input.grocery_list.as_deref().unwrap_or(&[]);
    if grocery_list.is_empty() {
        problems.push("No item list.");
    }
    let max_stores = input.max_stores.unwrap_or(0);
    if max_stores == 0 {
        problems.push("Please indicate maximum stores.");
    }
    if !problems.is_empty() {
        return Err(problems.join(" "));
    }
    let address = input.user_address.clone().unwrap_or_default();

    let mut chosen: Vec<&Offer> = Vec::with_capacity(grocery_list.len());
    for wanted in grocery_list {
        let wanted = wanted.to_lowercase();
        let cheapest = catalog
            .iter()
            .filter(|offer| offer.item.to_lowercase().contains(&wanted))
            .min_by(|a, b| a.price.total_cmp(&b.price))
            .ok_or_else(|| NO_COMBINATION.to_string())?;
        chosen.push(cheapest);
    }

    let mut visits: Vec<&Offer> = Vec::new();
    for offer in catalog {
        let used = chosen.iter().any(|c| c.store_name == offer.store_name);
        if used && !visits.iter().any(|v| v.store_name == offer.store_name) {
            visits.push(offer);
        }
    }
    if visits.len() > max_stores {
        return Err(NO_COMBINATION.to_string());
    }
    visits.sort_by(|a, b| a.miles_from_home.total_cmp(&b.miles_from_home));

    let mut route_order = vec![RouteStep {
        step: 1,
        kind: "start".to_string(),
        address: address.clone(),
    }];
    for (i, visit) in visits.iter().enumerate() {
        route_order.push(RouteStep {
            step: i as u32 + 2,
            kind: "store".to_string(),
            address: format!("{} - {}", visit.store_name, visit.address),
        });
    }
    route_order.push(RouteStep {
        step: visits.len() as u32 + 2,
        kind: "end".to_string(),
        address,
    });

    // Stores lie on one road out of town: out to the farthest and back.
    let farthest = visits.last().map_or(0.0, |v| v.miles_from_home);
    let miles_traveled = round_cents(farthest * 2.0);
    let total_price: f64 = chosen.iter().map(|c| c.price).sum();

    Ok(Plan {
        stores: visits.iter().map(|v| v.store_name.clone()).collect(),
        items: chosen
            .iter()
            .map(|c| format!("{} (${}) : {} - {}", c.item, c.price, c.store_name, c.address))
            .collect(),
        item_total: round_cents(total_price),
        miles_traveled,
        approximate_total_cost: round_cents(total_price + miles_traveled * COST_PER_MILE),
        route_order,
    })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn offer(store: &str, address: &str, miles: f64, item: &str, price: f64) -> Offer {
    Offer {
        store_name: store.to_string(),
        address: address.to_string(),
        item: item.to_string(),
        price,
        miles_from_home: miles,
    }
}

/// A few Charlotte stores and staples.
pub fn default_catalog() -> Vec<Offer> {
    const TARGET: &str = "123 Main St, Charlotte, NC";
    const WALMART: &str = "456 Trade St, Charlotte, NC";
    const ALDI: &str = "789 Tryon St, Charlotte, NC";
    vec![
        offer("Target", TARGET, 1.2, "bread", 2.30),
        offer("Target", TARGET, 1.2, "eggs", 2.90),
        offer("Target", TARGET, 1.2, "milk", 3.60),
        offer("Target", TARGET, 1.2, "chicken", 8.10),
        offer("Walmart", WALMART, 1.9, "chicken", 7.50),
        offer("Walmart", WALMART, 1.9, "rice", 4.20),
        offer("Walmart", WALMART, 1.9, "bread", 2.50),
        offer("Walmart", WALMART, 1.9, "eggs", 3.10),
        offer("Aldi", ALDI, 3.4, "bananas", 0.25),
        offer("Aldi", ALDI, 3.4, "coffee", 6.99),
    ]
}
