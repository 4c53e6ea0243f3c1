use crate::model::Salesman;
use std::path::PathBuf;

pub const PRODUCTS_FILE: &str = "Product.csv";
pub const SALESMEN_FILE: &str = "Salesman.csv";
pub const SALESMAN_REPORT_FILE: &str = "Reporte_Ventas_Vendedores.csv";
pub const PRODUCT_REPORT_FILE: &str = "Reporte_Ventas_Productos.csv";

/// Where the pipeline finds its inputs and puts its outputs.
///
/// Both stages share this layout; it is the whole contract between them.
#[derive(Debug, Clone)]
pub struct Layout {
    dir: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::new(".")
    }
}

impl Layout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Layout { dir: dir.into() }
    }

    pub fn products_path(&self) -> PathBuf {
        self.dir.join(PRODUCTS_FILE)
    }

    pub fn salesmen_path(&self) -> PathBuf {
        self.dir.join(SALESMEN_FILE)
    }

    /// `Sales_<DocType>_<DocNumber>.csv`, the only link between a roster entry and its sales.
    pub fn sales_path(&self, salesman: &Salesman) -> PathBuf {
        self.dir
            .join(format!("Sales_{}_{}.csv", salesman.doc_type, salesman.doc_number))
    }

    pub fn salesman_report_path(&self) -> PathBuf {
        self.dir.join(SALESMAN_REPORT_FILE)
    }

    pub fn product_report_path(&self) -> PathBuf {
        self.dir.join(PRODUCT_REPORT_FILE)
    }
}
