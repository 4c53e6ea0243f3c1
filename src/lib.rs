pub mod aggregator;
pub mod csv_handler;
pub mod error;
pub mod generator;
pub mod layout;
pub mod model;
pub mod report;

use crate::aggregator::RunContext;
use crate::error::PipelineResult;
use crate::layout::Layout;

/// Reads the fixtures under `layout` and writes both reports next to them.
///
/// Nothing is written when the catalog or the roster cannot be loaded.
pub fn build_reports(layout: Layout) -> PipelineResult<()> {
    let context = RunContext::load(layout)?;
    let sales_totals = context.compute_sales_totals();
    let product_totals = context.compute_product_totals();
    report::write_reports(
        context.layout(),
        &sales_totals,
        context.roster(),
        &product_totals,
        context.catalog(),
    )
}
