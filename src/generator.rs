//! Random fixture generation: a product catalog, a salesman roster and one
//! sales file per salesman, laid out the way the report stage expects them.

use crate::csv_handler::{self, ProductRaw, SaleRaw, SalesmanRaw};
use crate::error::PipelineResult;
use crate::layout::Layout;
use crate::model::{Catalog, Product, Roster, SalesRecord, Salesman};
use log::{error, info};
use rand::Rng;
use rand::seq::SliceRandom;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub const DOCUMENT_TYPES: [&str; 3] = ["TI", "CC", "CE"];

const FIRST_NAMES: [&str; 13] = [
    "Sara", "Andrea", "Estefany", "Jessica", "Juliana", "Francisco", "Antonio", "Camilo", "Michael", "German",
    "Eduar", "Jhon", "Viviana",
];
const LAST_NAMES: [&str; 8] = ["Rios", "Cardona", "Rivera", "Alvares", "Murillo", "Montoya", "Contreras", "Jimenes"];
const PRODUCT_NAMES: [&str; 10] = [
    "Tornillo", "Tuerca", "Arandela", "Broca", "Atornillador", "Martillo", "Llave", "Serrucho", "Taladro",
    "Destornillador",
];

pub const PRICE_RANGE: RangeInclusive<u64> = 10_000..=100_000;
pub const DOC_NUMBER_RANGE: RangeInclusive<u64> = 1_000_000_000..=9_999_999_999;
pub const QUANTITY_RANGE: RangeInclusive<u32> = 1..=20;

#[derive(Debug, Clone, Copy)]
pub struct GeneratorConfig {
    pub products: usize,
    pub salesmen: usize,
    pub sales_per_salesman: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig { products: 10, salesmen: 10, sales_per_salesman: 10 }
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Products get sequential ids `P1..Pn`; display names may repeat.
pub fn generate_products<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Catalog {
    (1..=count)
        .map(|n| Product {
            id: format!("P{}", n),
            name: pick(rng, &PRODUCT_NAMES).to_string(),
            price: rng.gen_range(PRICE_RANGE),
        })
        .collect()
}

/// Document numbers are not deduplicated; a collision replaces the earlier salesman.
pub fn generate_salesmen<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Roster {
    (0..count)
        .map(|_| Salesman {
            doc_type: pick(rng, &DOCUMENT_TYPES).to_string(),
            doc_number: rng.gen_range(DOC_NUMBER_RANGE),
            first_name: pick(rng, &FIRST_NAMES).to_string(),
            last_name: pick(rng, &LAST_NAMES).to_string(),
        })
        .collect()
}

pub fn generate_sales<R: Rng + ?Sized>(rng: &mut R, count: usize, catalog: &Catalog) -> Vec<SalesRecord> {
    let products: Vec<&Product> = catalog.products().collect();
    if products.is_empty() {
        return Vec::new();
    }
    (0..count)
        .filter_map(|_| {
            products.choose(rng).map(|product| SalesRecord {
                product_id: product.id.clone(),
                quantity: rng.gen_range(QUANTITY_RANGE),
            })
        })
        .collect()
}

pub fn write_catalog(path: &Path, catalog: &Catalog) -> PipelineResult<()> {
    csv_handler::write_file(path, &csv_handler::PRODUCTS_HEADER, catalog.products().map(ProductRaw::from))
}

pub fn write_roster(path: &Path, roster: &Roster) -> PipelineResult<()> {
    csv_handler::write_file(path, &csv_handler::SALESMEN_HEADER, roster.salesmen().map(SalesmanRaw::from))
}

pub fn write_sales(path: &Path, sales: &[SalesRecord]) -> PipelineResult<()> {
    csv_handler::write_file(path, &csv_handler::SALES_HEADER, sales.iter().map(SaleRaw::from))
}

#[derive(Debug, Default)]
pub struct GenerationSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl GenerationSummary {
    fn record(&mut self, path: PathBuf, result: PipelineResult<()>) {
        match result {
            Ok(()) => {
                info!("Created {}", path.display());
                self.written.push(path);
            }
            Err(e) => {
                error!("Failed to write {}: {}", path.display(), e);
                self.failed.push(path);
            }
        }
    }
}

/// Generates the whole fixture set and writes it under `layout`.
///
/// A file that cannot be written is logged and left as is; the remaining
/// files are still produced.
pub fn run<R: Rng + ?Sized>(layout: &Layout, config: &GeneratorConfig, rng: &mut R) -> GenerationSummary {
    let mut summary = GenerationSummary::default();

    let roster = generate_salesmen(rng, config.salesmen);
    let path = layout.salesmen_path();
    summary.record(path.clone(), write_roster(&path, &roster));

    let catalog = generate_products(rng, config.products);
    let path = layout.products_path();
    summary.record(path.clone(), write_catalog(&path, &catalog));

    for salesman in roster.salesmen() {
        let sales = generate_sales(rng, config.sales_per_salesman, &catalog);
        let path = layout.sales_path(salesman);
        summary.record(path.clone(), write_sales(&path, &sales));
    }

    info!(
        "Fixture generation finished: {} files written, {} failed.",
        summary.written.len(),
        summary.failed.len()
    );
    summary
}
