use crate::csv_handler::{self, Loaded, ProductRaw, SaleRaw, SalesmanRaw, SkippedLine};
use crate::error::{PipelineError, PipelineResult};
use crate::layout::Layout;
use crate::model::{Catalog, DocumentNumber, ProductId, Roster, SalesRecord, Salesman};
use log::{error, info, trace, warn};
use std::collections::BTreeMap;
use std::path::Path;

pub fn load_products(path: &Path) -> PipelineResult<Loaded<Catalog>> {
    let loaded = csv_handler::load_file::<ProductRaw>(path)?;
    Ok(Loaded { value: loaded.value.into_iter().collect(), skipped: loaded.skipped })
}

pub fn load_salesmen(path: &Path) -> PipelineResult<Loaded<Roster>> {
    let loaded = csv_handler::load_file::<SalesmanRaw>(path)?;
    Ok(Loaded { value: loaded.value.into_iter().collect(), skipped: loaded.skipped })
}

pub fn read_sales(path: &Path) -> PipelineResult<Loaded<Vec<SalesRecord>>> {
    csv_handler::load_file::<SaleRaw>(path)
}

/// Revenue of one salesman and how their sales file was consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesmanTotal {
    pub revenue: u64,
    pub skipped: Vec<SkippedLine>,
    /// Lines naming a product that is not in the catalog.
    pub unknown_products: usize,
    pub missing_file: bool,
}

/// Quantity sold per catalog product.
pub type ProductTotals = BTreeMap<ProductId, u64>;

/// Reference tables of one aggregation run.
#[derive(Debug)]
pub struct RunContext {
    layout: Layout,
    catalog: Catalog,
    roster: Roster,
}

impl RunContext {
    /// Loads the catalog and the roster.
    ///
    /// An unreadable file counts as an empty table; an empty table aborts the run.
    pub fn load(layout: Layout) -> PipelineResult<Self> {
        let products_path = layout.products_path();
        let catalog = load_or_empty(&products_path, load_products);
        if catalog.is_empty() {
            return Err(PipelineError::EmptyCatalog(products_path));
        }

        let salesmen_path = layout.salesmen_path();
        let roster = load_or_empty(&salesmen_path, load_salesmen);
        if roster.is_empty() {
            return Err(PipelineError::EmptyRoster(salesmen_path));
        }

        info!("Loaded {} products and {} salesmen.", catalog.len(), roster.len());
        Ok(RunContext::new(layout, catalog, roster))
    }

    pub fn new(layout: Layout, catalog: Catalog, roster: Roster) -> Self {
        RunContext { layout, catalog, roster }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    fn sales_of(&self, salesman: &Salesman) -> Option<Loaded<Vec<SalesRecord>>> {
        let path = self.layout.sales_path(salesman);
        match read_sales(&path) {
            Ok(loaded) => Some(loaded),
            Err(e) => {
                warn!("Sales of {} {} not counted: {}", salesman.first_name, salesman.last_name, e);
                None
            }
        }
    }

    /// Revenue per salesman: `quantity x price` over every line naming a known product.
    pub fn compute_sales_totals(&self) -> BTreeMap<DocumentNumber, SalesmanTotal> {
        let mut totals = BTreeMap::new();
        for salesman in self.roster.salesmen() {
            let mut total = SalesmanTotal::default();
            match self.sales_of(salesman) {
                Some(loaded) => {
                    for record in &loaded.value {
                        match self.catalog.get(&record.product_id) {
                            Some(product) => {
                                let revenue = product
                                    .price
                                    .checked_mul(u64::from(record.quantity))
                                    .and_then(|amount| total.revenue.checked_add(amount));
                                total.revenue = revenue.unwrap_or_else(|| {
                                    warn!("Revenue of salesman {} overflows; capped at {}.", salesman.doc_number, u64::MAX);
                                    u64::MAX
                                });
                            }
                            None => {
                                trace!(
                                    "Product {} sold by {} is not in the catalog.",
                                    record.product_id, salesman.doc_number
                                );
                                total.unknown_products += 1;
                            }
                        }
                    }
                    total.skipped = loaded.skipped;
                }
                None => total.missing_file = true,
            }
            totals.insert(salesman.doc_number, total);
        }
        totals
    }

    /// Units sold per catalog product across every salesman's file.
    pub fn compute_product_totals(&self) -> ProductTotals {
        let mut totals: ProductTotals = self.catalog.products().map(|p| (p.id.clone(), 0)).collect();
        for salesman in self.roster.salesmen() {
            let Some(loaded) = self.sales_of(salesman) else {
                continue;
            };
            for record in loaded.value {
                if let Some(quantity) = totals.get_mut(&record.product_id) {
                    *quantity += u64::from(record.quantity);
                }
            }
        }
        totals
    }
}

fn load_or_empty<T: Default>(path: &Path, load: fn(&Path) -> PipelineResult<Loaded<T>>) -> T {
    match load(path) {
        Ok(loaded) => {
            if !loaded.skipped.is_empty() {
                warn!("{} lines of {} were skipped.", loaded.skipped.len(), path.display());
            }
            loaded.value
        }
        Err(e) => {
            error!("{}", e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    const PRODUCTS: &str = "ID;Name;Price\nP1;Bolt;10\nP2;Nut;4\nP3;Drill;250\n";
    const SALESMEN: &str = "DocType;DocNumber;FirstName;LastName\nCC;1001;Ana;Diaz\nCE;2002;Jhon;Rios\n";

    #[test]
    fn test_single_sale() {
        let dir = fixture(&[
            ("Product.csv", "ID;Name;Price\nP1;Bolt;10\n"),
            ("Salesman.csv", "DocType;DocNumber;FirstName;LastName\nCC;1001;Ana;Diaz\n"),
            ("Sales_CC_1001.csv", "ProductID;Quantity\nP1;3\n"),
        ]);
        let context = RunContext::load(Layout::new(dir.path())).unwrap();

        let sales = context.compute_sales_totals();
        assert_eq!(sales[&1001].revenue, 30);
        let products = context.compute_product_totals();
        assert_eq!(products["P1"], 3);
    }

    #[test]
    fn test_totals_across_salesmen() {
        let dir = fixture(&[
            ("Product.csv", PRODUCTS),
            ("Salesman.csv", SALESMEN),
            ("Sales_CC_1001.csv", "ProductID;Quantity\nP1;3\nP2;5\nP1;1\n"),
            ("Sales_CE_2002.csv", "ProductID;Quantity\nP3;2\nP2;1\n"),
        ]);
        let context = RunContext::load(Layout::new(dir.path())).unwrap();

        let sales = context.compute_sales_totals();
        assert_eq!(sales[&1001].revenue, 3 * 10 + 5 * 4 + 10);
        assert_eq!(sales[&2002].revenue, 2 * 250 + 4);

        let products = context.compute_product_totals();
        assert_eq!(products["P1"], 4);
        assert_eq!(products["P2"], 6);
        assert_eq!(products["P3"], 2);
    }

    #[test]
    fn test_unknown_product_contributes_nothing() {
        let dir = fixture(&[
            ("Product.csv", PRODUCTS),
            ("Salesman.csv", SALESMEN),
            ("Sales_CC_1001.csv", "ProductID;Quantity\nP1;2\nP9;7\n"),
        ]);
        let context = RunContext::load(Layout::new(dir.path())).unwrap();

        let sales = context.compute_sales_totals();
        assert_eq!(sales[&1001].revenue, 20);
        assert_eq!(sales[&1001].unknown_products, 1);
        assert!(sales[&1001].skipped.is_empty());

        let products = context.compute_product_totals();
        assert!(!products.contains_key("P9"));
        assert_eq!(products.values().sum::<u64>(), 2);
    }

    #[test]
    fn test_missing_sales_file_is_zero() {
        let dir = fixture(&[
            ("Product.csv", PRODUCTS),
            ("Salesman.csv", SALESMEN),
            ("Sales_CC_1001.csv", "ProductID;Quantity\nP3;1\n"),
        ]);
        let context = RunContext::load(Layout::new(dir.path())).unwrap();

        let sales = context.compute_sales_totals();
        assert_eq!(sales[&1001].revenue, 250);
        assert!(!sales[&1001].missing_file);
        assert_eq!(sales[&2002].revenue, 0);
        assert!(sales[&2002].missing_file);
    }

    #[test]
    fn test_malformed_lines_are_counted() {
        let dir = fixture(&[
            ("Product.csv", PRODUCTS),
            ("Salesman.csv", SALESMEN),
            ("Sales_CC_1001.csv", "ProductID;Quantity\nP1;2\nP2\nP2;two\nP3;1;x\nP2;1\n"),
        ]);
        let context = RunContext::load(Layout::new(dir.path())).unwrap();

        let sales = context.compute_sales_totals();
        let total = &sales[&1001];
        assert_eq!(total.revenue, 24);
        let lines: Vec<u64> = total.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }

    #[test]
    fn test_quoted_line_does_not_swallow_the_rest() {
        let dir = fixture(&[
            ("Product.csv", PRODUCTS),
            ("Salesman.csv", SALESMEN),
            ("Sales_CC_1001.csv", "ProductID;Quantity\n\"P1;2\nP1;3\nP1;4\n"),
        ]);
        let context = RunContext::load(Layout::new(dir.path())).unwrap();

        let sales = context.compute_sales_totals();
        assert_eq!(sales[&1001].revenue, 70);
        assert_eq!(sales[&1001].unknown_products, 1);
        assert!(sales[&1001].skipped.is_empty());
        assert_eq!(context.compute_product_totals()["P1"], 7);
    }

    #[test]
    fn test_revenue_caps_on_overflow() {
        let dir = fixture(&[
            ("Product.csv", "ID;Name;Price\nP1;Bolt;18446744073709551615\nP2;Nut;4\n"),
            ("Salesman.csv", SALESMEN),
            ("Sales_CC_1001.csv", "ProductID;Quantity\nP2;1\nP1;2\nP2;1\n"),
        ]);
        let context = RunContext::load(Layout::new(dir.path())).unwrap();

        let sales = context.compute_sales_totals();
        assert_eq!(sales[&1001].revenue, u64::MAX);
    }

    #[test]
    fn test_unsold_products_start_at_zero() {
        let dir = fixture(&[("Product.csv", PRODUCTS), ("Salesman.csv", SALESMEN)]);
        let context = RunContext::load(Layout::new(dir.path())).unwrap();

        let products = context.compute_product_totals();
        assert_eq!(products.len(), 3);
        assert!(products.values().all(|&q| q == 0));
    }

    #[test]
    fn test_missing_catalog_aborts() {
        let dir = fixture(&[("Salesman.csv", SALESMEN)]);
        let result = RunContext::load(Layout::new(dir.path()));

        assert!(matches!(result, Err(PipelineError::EmptyCatalog(_))));
    }

    #[test]
    fn test_empty_roster_aborts() {
        let dir = fixture(&[
            ("Product.csv", PRODUCTS),
            ("Salesman.csv", "DocType;DocNumber;FirstName;LastName\nCC;not-a-number;Ana;Diaz\n"),
        ]);
        let result = RunContext::load(Layout::new(dir.path()));

        assert!(matches!(result, Err(PipelineError::EmptyRoster(_))));
    }

    #[test]
    fn test_load_salesmen_skips_short_lines() {
        let dir = fixture(&[("Salesman.csv", "DocType;DocNumber;FirstName;LastName\nCC;1001;Ana\nTI;3003;Sara;Murillo\n")]);
        let loaded = load_salesmen(&dir.path().join("Salesman.csv")).unwrap();

        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.value.get(3003).map(|s| s.first_name.as_str()), Some("Sara"));
        assert_eq!(loaded.skipped.len(), 1);
        assert_eq!(loaded.skipped[0].line, 2);
    }
}
