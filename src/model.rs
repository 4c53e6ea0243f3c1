use log::warn;
use std::collections::BTreeMap;

pub type ProductId = String;
pub type DocumentNumber = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salesman {
    pub doc_type: String,
    pub doc_number: DocumentNumber,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRecord {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Product reference table, keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
}

impl Catalog {
    pub fn insert(&mut self, product: Product) {
        if let Some(previous) = self.products.insert(product.id.clone(), product) {
            warn!("Product id {} appears more than once; keeping the last entry.", previous.id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> + '_ {
        self.products.values()
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        let mut catalog = Catalog::default();
        iter.into_iter().for_each(|product| catalog.insert(product));
        catalog
    }
}

/// Salesman reference table, keyed by document number.
///
/// A repeated document number replaces the earlier salesman. The overwrite is
/// logged rather than rejected so that generated rosters behave the same way
/// when written and when read back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    salesmen: BTreeMap<DocumentNumber, Salesman>,
}

impl Roster {
    /// Returns the salesman that was replaced, if any.
    pub fn insert(&mut self, salesman: Salesman) -> Option<Salesman> {
        let previous = self.salesmen.insert(salesman.doc_number, salesman);
        if let Some(previous) = &previous {
            warn!(
                "Document number {} is duplicated; {} {} ({}) was overwritten.",
                previous.doc_number, previous.first_name, previous.last_name, previous.doc_type
            );
        }
        previous
    }

    pub fn get(&self, doc_number: DocumentNumber) -> Option<&Salesman> {
        self.salesmen.get(&doc_number)
    }

    pub fn len(&self) -> usize {
        self.salesmen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.salesmen.is_empty()
    }

    pub fn salesmen(&self) -> impl Iterator<Item = &Salesman> + '_ {
        self.salesmen.values()
    }
}

impl FromIterator<Salesman> for Roster {
    fn from_iter<I: IntoIterator<Item = Salesman>>(iter: I) -> Self {
        let mut roster = Roster::default();
        for salesman in iter {
            roster.insert(salesman);
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salesman(doc_number: u64, first_name: &str) -> Salesman {
        Salesman {
            doc_type: "CC".to_string(),
            doc_number,
            first_name: first_name.to_string(),
            last_name: "Rios".to_string(),
        }
    }

    #[test]
    fn test_roster_collision_overwrites() {
        let mut roster = Roster::default();
        assert!(roster.insert(salesman(1001, "Sara")).is_none());
        let replaced = roster.insert(salesman(1001, "Camilo"));

        assert_eq!(replaced.map(|s| s.first_name), Some("Sara".to_string()));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(1001).unwrap().first_name, "Camilo");
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog: Catalog = vec![Product { id: "P1".into(), name: "Bolt".into(), price: 10 }]
            .into_iter()
            .collect();

        assert_eq!(catalog.get("P1").map(|p| p.price), Some(10));
        assert!(catalog.get("P9").is_none());
    }
}
