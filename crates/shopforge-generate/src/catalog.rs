//! Product catalog provider.
//!
//! Enumerates every brand x category-level-1 x category-level-2 combination
//! of each configured group and prices it uniformly within the group's
//! range. Product ids are sequential so reruns with the same group specs
//! keep ids stable.

use rand::Rng;

use shopforge_core::{CatalogConfig, CatalogTable, Product};

use crate::sampling::uniform_f64;

const PRODUCT_ID_BASE: i64 = 20_000;

/// Build the product catalog table from group specs.
pub fn generate_catalog<R: Rng + ?Sized>(config: &CatalogConfig, rng: &mut R) -> CatalogTable {
    let mut products = Vec::new();

    for group in &config.groups {
        let (price_min, price_max) = group.price.bounds();

        for brand in group.brand.values() {
            for category_l1 in group.category_l1.values() {
                for category_l2 in group.category_l2.values() {
                    let product_id = PRODUCT_ID_BASE + products.len() as i64;
                    products.push(Product {
                        brand: brand.clone(),
                        category_level1_typ: category_l1.clone(),
                        category_level2_typ: category_l2.clone(),
                        cost: uniform_f64(rng, price_min, price_max),
                        product_group_id: group.product_group_id,
                        product_id,
                    });
                }
            }
        }
    }

    CatalogTable { products }
}
