use crate::aggregator::{ProductTotals, SalesmanTotal};
use crate::csv_handler;
use crate::error::PipelineResult;
use crate::layout::Layout;
use crate::model::{Catalog, DocumentNumber, Roster};
use log::info;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

pub const SALESMAN_REPORT_HEADER: [&str; 3] = ["Name", "Surname", "TotalSales"];
pub const PRODUCT_REPORT_HEADER: [&str; 3] = ["Name", "UnitPrice", "QuantitySold"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesmanReportRow {
    pub name: String,
    pub surname: String,
    pub total: u64,
    #[serde(skip)]
    pub doc_number: DocumentNumber,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductReportRow {
    pub name: String,
    pub unit_price: u64,
    pub quantity: u64,
    #[serde(skip)]
    pub id: String,
}

/// Salesmen by revenue, highest first. Equal totals fall back to surname, name, document number.
pub fn salesman_rows(totals: &BTreeMap<DocumentNumber, SalesmanTotal>, roster: &Roster) -> Vec<SalesmanReportRow> {
    let mut rows: Vec<SalesmanReportRow> = roster
        .salesmen()
        .map(|salesman| SalesmanReportRow {
            name: salesman.first_name.clone(),
            surname: salesman.last_name.clone(),
            total: totals.get(&salesman.doc_number).map_or(0, |t| t.revenue),
            doc_number: salesman.doc_number,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.surname.cmp(&b.surname))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.doc_number.cmp(&b.doc_number))
    });
    rows
}

/// Catalog products by units sold, highest first. Equal quantities fall back to name, id.
pub fn product_rows(totals: &ProductTotals, catalog: &Catalog) -> Vec<ProductReportRow> {
    let mut rows: Vec<ProductReportRow> = catalog
        .products()
        .map(|product| ProductReportRow {
            name: product.name.clone(),
            unit_price: product.price,
            quantity: totals.get(&product.id).copied().unwrap_or(0),
            id: product.id.clone(),
        })
        .collect();
    rows.sort_by_key(|row| (Reverse(row.quantity), row.name.clone(), row.id.clone()));
    rows
}

/// Writes both report files under `layout`.
pub fn write_reports(
    layout: &Layout,
    sales_totals: &BTreeMap<DocumentNumber, SalesmanTotal>,
    roster: &Roster,
    product_totals: &ProductTotals,
    catalog: &Catalog,
) -> PipelineResult<()> {
    let path = layout.salesman_report_path();
    csv_handler::write_file(&path, &SALESMAN_REPORT_HEADER, &salesman_rows(sales_totals, roster))?;
    info!("Salesman report written to {}", path.display());

    let path = layout.product_report_path();
    csv_handler::write_file(&path, &PRODUCT_REPORT_HEADER, &product_rows(product_totals, catalog))?;
    info!("Product report written to {}", path.display());
    Ok(())
}
