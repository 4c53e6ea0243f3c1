use crate::error::{PipelineError, PipelineResult};
use crate::model::{Product, SalesRecord, Salesman};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

/// Every file of the pipeline is `;`-delimited with a single header line.
/// There is no quoting: a `"` is an ordinary character and each line stands alone.
pub const DELIMITER: u8 = b';';

pub const PRODUCTS_HEADER: [&str; 3] = ["ID", "Name", "Price"];
pub const SALESMEN_HEADER: [&str; 4] = ["DocType", "DocNumber", "FirstName", "LastName"];
pub const SALES_HEADER: [&str; 2] = ["ProductID", "Quantity"];

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductRaw {
    pub id: String,
    pub name: String,
    pub price: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SalesmanRaw {
    pub doc_type: String,
    pub doc_number: u64,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaleRaw {
    pub product_id: String,
    pub quantity: u32,
}

/// A line shape of one of the input files.
pub trait Row: DeserializeOwned {
    /// Exact number of fields a line must carry.
    const FIELDS: usize;
    type Record;

    fn into_record(self) -> Result<Self::Record, SkipReason>;
}

impl Row for ProductRaw {
    const FIELDS: usize = 3;
    type Record = Product;

    fn into_record(self) -> Result<Product, SkipReason> {
        Ok(Product { id: self.id, name: self.name, price: self.price })
    }
}

impl Row for SalesmanRaw {
    const FIELDS: usize = 4;
    type Record = Salesman;

    fn into_record(self) -> Result<Salesman, SkipReason> {
        // The document type ends up in a file name.
        if self.doc_type.is_empty() || !self.doc_type.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SkipReason::Malformed(format!("invalid document type {:?}", self.doc_type)));
        }
        Ok(Salesman {
            doc_type: self.doc_type,
            doc_number: self.doc_number,
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

impl Row for SaleRaw {
    const FIELDS: usize = 2;
    type Record = SalesRecord;

    fn into_record(self) -> Result<SalesRecord, SkipReason> {
        if self.quantity == 0 {
            return Err(SkipReason::Malformed("quantity must be positive".to_string()));
        }
        Ok(SalesRecord { product_id: self.product_id, quantity: self.quantity })
    }
}

impl From<&Product> for ProductRaw {
    fn from(product: &Product) -> Self {
        ProductRaw { id: product.id.clone(), name: product.name.clone(), price: product.price }
    }
}

impl From<&Salesman> for SalesmanRaw {
    fn from(salesman: &Salesman) -> Self {
        SalesmanRaw {
            doc_type: salesman.doc_type.clone(),
            doc_number: salesman.doc_number,
            first_name: salesman.first_name.clone(),
            last_name: salesman.last_name.clone(),
        }
    }
}

impl From<&SalesRecord> for SaleRaw {
    fn from(record: &SalesRecord) -> Self {
        SaleRaw { product_id: record.product_id.clone(), quantity: record.quantity }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    FieldCount { expected: usize, found: usize },
    Malformed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FieldCount { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            SkipReason::Malformed(msg) => write!(f, "{}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the file, header included.
    pub line: u64,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub enum LineOutcome<T> {
    Parsed(T),
    Skipped(SkippedLine),
}

/// A table read from a file together with the lines that did not make it in.
#[derive(Debug, Default)]
pub struct Loaded<T> {
    pub value: T,
    pub skipped: Vec<SkippedLine>,
}

/// Parses every data line of a delimited source, reporting each one as parsed or skipped.
pub fn read_rows<R: io::Read, T: Row>(source: R) -> impl Iterator<Item = LineOutcome<T::Record>> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(source);
    reader.into_records().map(|result| match result {
        Ok(record) => parse_record::<T>(&record),
        Err(e) => LineOutcome::Skipped(SkippedLine {
            line: e.position().map_or(0, |p| p.line()),
            reason: SkipReason::Malformed(e.to_string()),
        }),
    })
}

fn parse_record<T: Row>(record: &csv::StringRecord) -> LineOutcome<T::Record> {
    let line = record.position().map_or(0, |p| p.line());
    // Trailing empty fields (`P1;3;`) do not count.
    let mut found = record.len();
    while found > 0 && record[found - 1].is_empty() {
        found -= 1;
    }
    if found != T::FIELDS {
        return LineOutcome::Skipped(SkippedLine {
            line,
            reason: SkipReason::FieldCount { expected: T::FIELDS, found },
        });
    }
    let fields: csv::StringRecord = record.iter().take(found).collect();
    let parsed = fields
        .deserialize::<T>(None)
        .map_err(|e| SkipReason::Malformed(e.to_string()))
        .and_then(T::into_record);
    match parsed {
        Ok(value) => LineOutcome::Parsed(value),
        Err(reason) => LineOutcome::Skipped(SkippedLine { line, reason }),
    }
}

/// Reads a whole file, keeping the parsed records in order.
pub fn load_file<T: Row>(path: &Path) -> PipelineResult<Loaded<Vec<T::Record>>> {
    let file = File::open(path).map_err(|source| PipelineError::Io { path: path.to_path_buf(), source })?;
    let mut loaded = Loaded { value: Vec::new(), skipped: Vec::new() };
    for outcome in read_rows::<_, T>(file) {
        match outcome {
            LineOutcome::Parsed(record) => loaded.value.push(record),
            LineOutcome::Skipped(skipped) => {
                debug!("Skipping line {} of {}: {}", skipped.line, path.display(), skipped.reason);
                loaded.skipped.push(skipped);
            }
        }
    }
    Ok(loaded)
}

/// Writes a header line followed by one line per row.
pub fn write_rows<W, S, I>(target: W, header: &[&str], rows: I) -> csv::Result<()>
where
    W: io::Write,
    S: Serialize,
    I: IntoIterator<Item = S>,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(target);
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the rows into it.
pub fn write_file<S, I>(path: &Path, header: &[&str], rows: I) -> PipelineResult<()>
where
    S: Serialize,
    I: IntoIterator<Item = S>,
{
    let file = File::create(path).map_err(|source| PipelineError::Io { path: path.to_path_buf(), source })?;
    write_rows(file, header, rows).map_err(|source| PipelineError::Csv { path: path.to_path_buf(), source })
}
