//! Basket expander.
//!
//! Expands every purchase event into a basket of 1..K transaction lines:
//! a weighted product-group draw per item slot, a uniform product within
//! the group, a cost join against the catalog, then return/exchange
//! perturbation. Everything is drawn in flattened batch passes across all
//! baskets, mirroring the lifecycle simulator's cohort semantics.

use rand::Rng;
use rand::distr::Distribution;
use tracing::warn;

use shopforge_core::{
    BasketConfig, CatalogTable, SENTINEL_PRODUCT_ID, TransactionLine, TransactionTable,
    TransactionType,
};

use crate::errors::GenerationError;
use crate::lifecycle::PurchaseEvents;
use crate::model::{GenerationIssue, GenerationReport};
use crate::sampling::weighted_index;

/// Expand purchase events into the transaction-line table.
///
/// A group that carries sampling weight but has no catalog members degrades
/// to the sentinel product id with zero net sales; the mismatch is recorded
/// on the report instead of aborting the run.
pub fn expand_baskets<R: Rng + ?Sized>(
    events: &PurchaseEvents,
    catalog: &CatalogTable,
    config: &BasketConfig,
    rng: &mut R,
    report: &mut GenerationReport,
) -> Result<TransactionTable, GenerationError> {
    let n_events = events.len();

    let (items_min, items_max) = config.items_cnt.bounds();
    let basket_sizes: Vec<u32> = (0..n_events)
        .map(|_| rng.random_range(items_min..=items_max))
        .collect();

    // One flattened slot per item across all baskets; basket id, customer
    // and date are replicated once per slot.
    let total_items: usize = basket_sizes.iter().map(|&size| size as usize).sum();
    let mut basket_ids = Vec::with_capacity(total_items);
    let mut customer_ids = Vec::with_capacity(total_items);
    let mut dates = Vec::with_capacity(total_items);
    for (event_idx, &size) in basket_sizes.iter().enumerate() {
        for _ in 0..size {
            basket_ids.push(event_idx as u64);
            customer_ids.push(events.customer_ids[event_idx]);
            dates.push(events.dates[event_idx]);
        }
    }

    let weights: Vec<f64> = config.items_groups.iter().map(|entry| entry.weight).collect();
    let group_dist = weighted_index(&weights, "baskets.items_groups")?;
    let item_groups: Vec<i64> = (0..total_items)
        .map(|_| config.items_groups[group_dist.sample(rng)].group_id)
        .collect();

    let products_by_group = catalog.products_by_group();
    let mut missing_items = 0_u64;
    let item_products: Vec<i64> = item_groups
        .iter()
        .map(|group_id| match products_by_group.get(group_id) {
            Some(products) if !products.is_empty() => products[rng.random_range(0..products.len())],
            _ => {
                missing_items += 1;
                SENTINEL_PRODUCT_ID
            }
        })
        .collect();

    if missing_items > 0 {
        for (group_id, count) in missing_group_counts(&item_groups, &item_products) {
            let issue = GenerationIssue {
                level: "warning".to_string(),
                code: "missing_group_products".to_string(),
                message: format!(
                    "group {group_id} has sampling weight but no catalog products; \
                     {count} item(s) emitted with sentinel product id"
                ),
                group_id: Some(group_id),
            };
            warn!(group_id, count, "{}", issue.message);
            report.record_warning(issue);
        }
    }

    let flag_return: Vec<bool> = (0..total_items)
        .map(|_| rng.random_bool(config.return_prob))
        .collect();
    let flag_exchange: Vec<bool> = (0..total_items)
        .map(|_| rng.random_bool(config.exchange_prob))
        .collect();

    let costs = catalog.costs_by_product();
    let mut lines: Vec<TransactionLine> = (0..total_items)
        .map(|idx| TransactionLine {
            basket_id: basket_ids[idx],
            transaction_dt: dates[idx],
            product_id: item_products[idx],
            customer_id: customer_ids[idx],
            transaction_type: TransactionType::Purchase,
            product_qty: 1,
            return_qty: 0,
            final_net_sales: costs.get(&item_products[idx]).copied().unwrap_or(0.0),
        })
        .collect();

    // Returned-not-exchanged lines are relabeled in place; net sales stay,
    // recording the return against the original sale.
    for (idx, line) in lines.iter_mut().enumerate() {
        if flag_return[idx] && !flag_exchange[idx] {
            line.transaction_type = TransactionType::Return;
            line.return_qty = 1;
        }
    }

    // Exchanged lines are duplicated: the original purchase stays untouched
    // and a zero-value exchange record is appended after all originals.
    let exchanges: Vec<TransactionLine> = lines
        .iter()
        .zip(&flag_exchange)
        .filter(|&(_, &exchanged)| exchanged)
        .map(|(line, _)| TransactionLine {
            transaction_type: TransactionType::Exchange,
            product_qty: 1,
            return_qty: 1,
            final_net_sales: 0.0,
            ..line.clone()
        })
        .collect();
    lines.extend(exchanges);

    Ok(TransactionTable { lines })
}

fn missing_group_counts(item_groups: &[i64], item_products: &[i64]) -> Vec<(i64, u64)> {
    let mut counts: std::collections::BTreeMap<i64, u64> = std::collections::BTreeMap::new();
    for (group_id, product_id) in item_groups.iter().zip(item_products) {
        if *product_id == SENTINEL_PRODUCT_ID {
            *counts.entry(*group_id).or_insert(0) += 1;
        }
    }
    counts.into_iter().collect()
}
