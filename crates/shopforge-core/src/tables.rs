use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Product id emitted when a weighted group has no catalog members.
pub const SENTINEL_PRODUCT_ID: i64 = -1;

/// One product in the mock catalog.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Product {
    pub brand: String,
    pub category_level1_typ: String,
    pub category_level2_typ: String,
    pub cost: f64,
    /// Many products share one group; baskets sample groups, not products.
    pub product_group_id: i64,
    pub product_id: i64,
}

/// The product catalog table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CatalogTable {
    pub products: Vec<Product>,
}

impl CatalogTable {
    /// Product ids per group, in catalog order.
    pub fn products_by_group(&self) -> BTreeMap<i64, Vec<i64>> {
        let mut map: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
        for product in &self.products {
            map.entry(product.product_group_id)
                .or_default()
                .push(product.product_id);
        }
        map
    }

    /// Cost lookup keyed by product id.
    pub fn costs_by_product(&self) -> HashMap<i64, f64> {
        self.products
            .iter()
            .map(|product| (product.product_id, product.cost))
            .collect()
    }
}

/// One customer in the registry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Customer {
    pub customer_id: i64,
    pub gender_cd: Option<String>,
    /// Null when the drawn registration date postdates `base_dt`.
    pub registration_dt: Option<NaiveDate>,
    pub birthdate_dt: NaiveDate,
    pub base_dt: NaiveDate,
}

/// The customer registry table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CustomerTable {
    pub customers: Vec<Customer>,
}

/// Kind of transaction line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Purchase,
    Return,
    Exchange,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Return => "return",
            TransactionType::Exchange => "exchange",
        }
    }
}

/// One line of the transactions table. Lines sharing a `basket_id` form one
/// basket bought in a single purchase event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransactionLine {
    pub basket_id: u64,
    pub transaction_dt: NaiveDate,
    pub product_id: i64,
    pub customer_id: i64,
    pub transaction_type: TransactionType,
    pub product_qty: u32,
    pub return_qty: u32,
    pub final_net_sales: f64,
}

/// The transactions table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TransactionTable {
    pub lines: Vec<TransactionLine>,
}
