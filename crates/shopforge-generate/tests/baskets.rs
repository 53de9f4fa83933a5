use std::collections::HashMap;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use shopforge_core::{
    BasketConfig, CatalogTable, CountSpan, GroupWeight, Product, SENTINEL_PRODUCT_ID,
    TransactionType,
};
use shopforge_generate::{GenerationReport, PurchaseEvents, expand_baskets};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn product(product_id: i64, group_id: i64, cost: f64) -> Product {
    Product {
        brand: "ASOS".to_string(),
        category_level1_typ: "Clothes".to_string(),
        category_level2_typ: "Jeans".to_string(),
        cost,
        product_group_id: group_id,
        product_id,
    }
}

fn events(count: usize) -> PurchaseEvents {
    let mut stream = PurchaseEvents::default();
    for idx in 0..count {
        stream.customer_ids.push(30_000 + idx as i64 % 7);
        stream
            .dates
            .push(date(2022, 1, 1) + chrono::Duration::days(idx as i64 % 300));
    }
    stream
}

fn single_group_config() -> BasketConfig {
    BasketConfig {
        return_prob: 0.0,
        exchange_prob: 0.0,
        items_cnt: CountSpan(1, 1),
        items_groups: vec![GroupWeight {
            group_id: 1,
            weight: 100.0,
        }],
    }
}

#[test]
fn single_group_draws_members_and_joins_costs() {
    let catalog = CatalogTable {
        products: vec![product(101, 1, 40.0), product(102, 1, 60.0)],
    };
    let config = single_group_config();
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let mut report = GenerationReport::new("test".to_string());

    let table = expand_baskets(&events(100), &catalog, &config, &mut rng, &mut report)
        .expect("expand baskets");

    assert_eq!(table.lines.len(), 100);
    let costs: HashMap<i64, f64> = catalog.costs_by_product();
    for line in &table.lines {
        assert!(line.product_id == 101 || line.product_id == 102);
        assert_eq!(line.transaction_type, TransactionType::Purchase);
        assert_eq!(line.final_net_sales, costs[&line.product_id]);
    }
    assert!(report.warnings.is_empty());
}

#[test]
fn forced_returns_relabel_without_duplication() {
    let catalog = CatalogTable {
        products: vec![product(101, 1, 40.0)],
    };
    let mut config = single_group_config();
    config.return_prob = 1.0;
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut report = GenerationReport::new("test".to_string());

    let table = expand_baskets(&events(50), &catalog, &config, &mut rng, &mut report)
        .expect("expand baskets");

    assert_eq!(table.lines.len(), 50);
    for line in &table.lines {
        assert_eq!(line.transaction_type, TransactionType::Return);
        assert_eq!(line.return_qty, 1);
        assert_eq!(line.final_net_sales, 40.0);
    }
}

#[test]
fn forced_exchanges_double_the_row_count() {
    let catalog = CatalogTable {
        products: vec![product(101, 1, 40.0)],
    };
    let mut config = single_group_config();
    config.exchange_prob = 1.0;
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let mut report = GenerationReport::new("test".to_string());

    let table = expand_baskets(&events(40), &catalog, &config, &mut rng, &mut report)
        .expect("expand baskets");

    assert_eq!(table.lines.len(), 80);
    let (originals, duplicates) = table.lines.split_at(40);
    for line in originals {
        assert_eq!(line.transaction_type, TransactionType::Purchase);
        assert_eq!(line.return_qty, 0);
    }
    for line in duplicates {
        assert_eq!(line.transaction_type, TransactionType::Exchange);
        assert_eq!(line.product_qty, 1);
        assert_eq!(line.return_qty, 1);
        assert_eq!(line.final_net_sales, 0.0);
    }
}

#[test]
fn every_exchange_pairs_with_a_purchase_line() {
    let catalog = CatalogTable {
        products: vec![
            product(101, 1, 40.0),
            product(102, 1, 60.0),
            product(201, 2, 15.0),
        ],
    };
    let config = BasketConfig {
        return_prob: 0.5,
        exchange_prob: 0.5,
        items_cnt: CountSpan(1, 4),
        items_groups: vec![
            GroupWeight {
                group_id: 1,
                weight: 100.0,
            },
            GroupWeight {
                group_id: 2,
                weight: 50.0,
            },
        ],
    };
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let mut report = GenerationReport::new("test".to_string());

    let table = expand_baskets(&events(120), &catalog, &config, &mut rng, &mut report)
        .expect("expand baskets");

    for line in &table.lines {
        if line.transaction_type == TransactionType::Exchange {
            let paired = table.lines.iter().any(|other| {
                other.transaction_type == TransactionType::Purchase
                    && other.basket_id == line.basket_id
                    && other.product_id == line.product_id
            });
            assert!(
                paired,
                "exchange line in basket {} lacks its purchase line",
                line.basket_id
            );
        }
        if line.return_qty == 1 {
            assert_ne!(line.transaction_type, TransactionType::Purchase);
        }
    }
}

#[test]
fn basket_sizes_stay_within_configured_bounds() {
    let catalog = CatalogTable {
        products: vec![product(101, 1, 40.0)],
    };
    let mut config = single_group_config();
    config.items_cnt = CountSpan(2, 4);
    let mut rng = ChaCha8Rng::seed_from_u64(14);
    let mut report = GenerationReport::new("test".to_string());

    let table = expand_baskets(&events(60), &catalog, &config, &mut rng, &mut report)
        .expect("expand baskets");

    let mut sizes: HashMap<u64, usize> = HashMap::new();
    for line in &table.lines {
        if line.transaction_type != TransactionType::Exchange {
            *sizes.entry(line.basket_id).or_insert(0) += 1;
        }
    }
    assert_eq!(sizes.len(), 60);
    for (basket_id, size) in sizes {
        assert!(
            (2..=4).contains(&size),
            "basket {basket_id} holds {size} items"
        );
    }
}

#[test]
fn missing_group_degrades_to_sentinel_with_warning() {
    let catalog = CatalogTable {
        products: vec![product(101, 1, 40.0)],
    };
    let mut config = single_group_config();
    config.items_groups = vec![GroupWeight {
        group_id: 9,
        weight: 100.0,
    }];
    let mut rng = ChaCha8Rng::seed_from_u64(15);
    let mut report = GenerationReport::new("test".to_string());

    let table = expand_baskets(&events(25), &catalog, &config, &mut rng, &mut report)
        .expect("expand baskets");

    assert_eq!(table.lines.len(), 25);
    for line in &table.lines {
        assert_eq!(line.product_id, SENTINEL_PRODUCT_ID);
        assert_eq!(line.final_net_sales, 0.0);
    }
    assert_eq!(report.warnings_by_code["missing_group_products"], 1);
    assert_eq!(report.warnings[0].group_id, Some(9));
}

#[test]
fn empty_event_stream_yields_empty_table() {
    let catalog = CatalogTable {
        products: vec![product(101, 1, 40.0)],
    };
    let config = single_group_config();
    let mut rng = ChaCha8Rng::seed_from_u64(16);
    let mut report = GenerationReport::new("test".to_string());

    let table = expand_baskets(
        &PurchaseEvents::default(),
        &catalog,
        &config,
        &mut rng,
        &mut report,
    )
    .expect("expand baskets");

    assert!(table.lines.is_empty());
}
