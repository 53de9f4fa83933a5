use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use shopforge_core::{CatalogTable, CustomerTable, TransactionTable};

const PRODUCT_HEADER: &[&str] = &[
    "brand",
    "category_level1_typ",
    "category_level2_typ",
    "cost",
    "product_group_id",
    "product_id",
];

const CUSTOMER_HEADER: &[&str] = &[
    "customer_id",
    "gender_cd",
    "registration_dt",
    "birthdate_dt",
    "base_dt",
];

const TRANSACTION_HEADER: &[&str] = &[
    "basket_id",
    "transaction_dt",
    "product_id",
    "customer_id",
    "transaction_type",
    "product_qty",
    "return_qty",
    "final_net_sales",
];

/// Write the product catalog as CSV, returning bytes written.
pub fn write_catalog_csv(path: &Path, table: &CatalogTable) -> Result<u64, csv::Error> {
    write_rows_csv(path, PRODUCT_HEADER, &table.products)
}

/// Write the customer registry as CSV, returning bytes written.
pub fn write_customers_csv(path: &Path, table: &CustomerTable) -> Result<u64, csv::Error> {
    write_rows_csv(path, CUSTOMER_HEADER, &table.customers)
}

/// Write the transactions table as CSV, returning bytes written.
pub fn write_transactions_csv(path: &Path, table: &TransactionTable) -> Result<u64, csv::Error> {
    write_rows_csv(path, TRANSACTION_HEADER, &table.lines)
}

/// Write rows as CSV with an explicit header, so empty tables still come
/// out schema-valid (header-only).
fn write_rows_csv<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[T],
) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
