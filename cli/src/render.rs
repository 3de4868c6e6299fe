use std::fmt::Write;

use grocery_core::{NormalizationWarning, OptimizationPlan, StopKind};

pub(crate) fn render_plan(plan: &OptimizationPlan) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Total cost:  ${:.2}", plan.approximate_total_cost);
    let _ = writeln!(out, "Distance:    {:.2} miles", plan.miles_traveled);
    let _ = writeln!(out, "Items total: ${:.2}", plan.item_total);

    let _ = writeln!(out, "\nShopping list");
    for item in &plan.line_items {
        let _ = writeln!(
            out,
            "  {:<24} ${:>7.2}  {}",
            item.name,
            item.unit_price,
            item.store_location()
        );
    }

    let _ = writeln!(out, "\nRoute");
    for step in &plan.route {
        let label = match step.kind {
            StopKind::Start => "Starting point",
            StopKind::Store => "Store stop",
            StopKind::End => "Return home",
        };
        let _ = writeln!(out, "  {}. {label}: {}", step.step, step.address);
    }

    let _ = writeln!(out, "\nStores: {}", plan.stores.join(", "));

    if !plan.rejected_items.is_empty() {
        let _ = writeln!(out, "\n{} item(s) could not be read:", plan.rejected_items.len());
        for error in &plan.rejected_items {
            let _ = writeln!(out, "  {error}");
        }
    }
    for warning in &plan.warnings {
        match warning {
            NormalizationWarning::ItemTotalMismatch(mismatch) => {
                let _ = writeln!(
                    out,
                    "\nnote: listed items add up to ${:.2}, service reports ${:.2}",
                    mismatch.recomputed, mismatch.reported
                );
            }
        }
    }

    out
}
