//! Normalization from [`RawPlan`] to [`OptimizationPlan`].
//!
//! Item strings are parsed best-effort: a bad item is recorded in
//! `rejected_items` and the rest are kept. Route and store rules are checked
//! once everything is parsed; breaking one of them rejects the whole plan.
//! A disagreement between the recomputed and reported item total only adds
//! a warning, and the reported total is kept for display.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::{Invariant, NormalizationError};
use crate::item::parse_line_item;
use crate::types::{
    LineItem, NormalizationWarning, OptimizationPlan, RawPlan, RawRouteStep, RouteStep, StopKind,
    TotalMismatch,
};

/// Largest tolerated gap between the reported and recomputed item total.
pub const ITEM_TOTAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Normalizes a raw service response for a request that allowed at most
/// `max_stores` stores.
///
/// # Errors
///
/// - [`NormalizationError::Step`] for an unknown route tag or a step number
///   that is not a positive integer.
/// - [`NormalizationError::Invariant`] when the route shape, step order,
///   visited stores, store limit or distance rule is broken.
/// - [`NormalizationError::TotalOverflow`] when the line item prices do not
///   fit in a `Decimal` sum.
pub fn normalize(raw: &RawPlan, max_stores: u8) -> Result<OptimizationPlan, NormalizationError> {
    let mut line_items = Vec::with_capacity(raw.items.len());
    let mut rejected_items = Vec::new();
    for item in &raw.items {
        match parse_line_item(item) {
            Ok(line_item) => line_items.push(line_item),
            Err(error) => {
                tracing::warn!(%error, "dropping unparsable line item");
                rejected_items.push(error);
            }
        }
    }

    let route = raw
        .route_order
        .iter()
        .map(parse_route_step)
        .collect::<Result<Vec<_>, _>>()?;

    check_step_order(&route)?;
    check_route_shape(&route)?;
    check_stores_visited(&line_items, &route)?;

    let stores = dedup_preserving_order(&raw.stores);
    if stores.len() > usize::from(max_stores) {
        return Err(violation(
            Invariant::StoreLimit,
            format!("{} stores used, at most {max_stores} allowed", stores.len()),
        ));
    }

    if raw.miles_traveled.is_sign_negative() && !raw.miles_traveled.is_zero() {
        return Err(violation(
            Invariant::NonNegativeDistance,
            format!("miles_traveled is {}", raw.miles_traveled),
        ));
    }

    let mut warnings = Vec::new();
    let recomputed = line_items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.unit_price))
        .ok_or(NormalizationError::TotalOverflow)?;
    let drift = recomputed
        .checked_sub(raw.item_total)
        .ok_or(NormalizationError::TotalOverflow)?;
    if drift.abs() > ITEM_TOTAL_TOLERANCE {
        tracing::warn!(
            reported = %raw.item_total,
            %recomputed,
            "item total does not match line items"
        );
        warnings.push(NormalizationWarning::ItemTotalMismatch(TotalMismatch {
            reported: raw.item_total,
            recomputed,
        }));
    }

    Ok(OptimizationPlan {
        stores,
        line_items,
        item_total: raw.item_total,
        miles_traveled: raw.miles_traveled,
        approximate_total_cost: raw.approximate_total_cost,
        route,
        rejected_items,
        warnings,
    })
}

fn parse_route_step(raw: &RawRouteStep) -> Result<RouteStep, NormalizationError> {
    let invalid = || NormalizationError::Step {
        step: raw.step,
        tag: raw.kind.clone(),
    };
    let kind = StopKind::from_tag(&raw.kind).ok_or_else(invalid)?;
    let step = u32::try_from(raw.step).map_err(|_| invalid())?;
    Ok(RouteStep {
        step,
        kind,
        address: raw.address.clone(),
    })
}

fn violation(invariant: Invariant, detail: String) -> NormalizationError {
    NormalizationError::Invariant { invariant, detail }
}

fn check_step_order(route: &[RouteStep]) -> Result<(), NormalizationError> {
    let Some(first) = route.first() else {
        return Err(violation(Invariant::StepOrder, "route is empty".to_string()));
    };
    if first.step != 1 {
        return Err(violation(
            Invariant::StepOrder,
            format!("route starts at step {}", first.step),
        ));
    }
    for pair in route.windows(2) {
        if pair[1].step <= pair[0].step {
            return Err(violation(
                Invariant::StepOrder,
                format!("step {} follows step {}", pair[1].step, pair[0].step),
            ));
        }
    }
    Ok(())
}

fn check_route_shape(route: &[RouteStep]) -> Result<(), NormalizationError> {
    let count = |kind: StopKind| route.iter().filter(|s| s.kind == kind).count();
    let starts = count(StopKind::Start);
    let ends = count(StopKind::End);
    if starts != 1 || ends != 1 {
        return Err(violation(
            Invariant::RouteShape,
            format!("expected one start and one end, found {starts} and {ends}"),
        ));
    }
    let first_is_start = route.first().is_some_and(|s| s.kind == StopKind::Start);
    let last_is_end = route.last().is_some_and(|s| s.kind == StopKind::End);
    if !first_is_start || !last_is_end {
        return Err(violation(
            Invariant::RouteShape,
            "route must begin with start and finish with end".to_string(),
        ));
    }
    Ok(())
}

fn check_stores_visited(items: &[LineItem], route: &[RouteStep]) -> Result<(), NormalizationError> {
    let visited: HashSet<&str> = route
        .iter()
        .filter(|s| s.kind == StopKind::Store)
        .map(|s| s.address.as_str())
        .collect();
    for item in items {
        let location = item.store_location();
        if !visited.contains(location.as_str()) {
            return Err(violation(
                Invariant::StoresVisited,
                format!("{location:?} sells {:?} but is not on the route", item.name),
            ));
        }
    }
    Ok(())
}

fn dedup_preserving_order(stores: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    stores
        .iter()
        .filter(|store| seen.insert(store.as_str()))
        .cloned()
        .collect()
}
