use std::collections::HashMap;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use shopforge_core::{Customer, CustomerTable, LifecycleConfig};
use shopforge_generate::simulate_lifecycles;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn registry(registrations: &[Option<NaiveDate>]) -> CustomerTable {
    let customers = registrations
        .iter()
        .enumerate()
        .map(|(idx, registration_dt)| Customer {
            customer_id: 30_000 + idx as i64,
            gender_cd: None,
            registration_dt: *registration_dt,
            birthdate_dt: date(1990, 1, 1),
            base_dt: date(2023, 4, 1),
        })
        .collect();
    CustomerTable { customers }
}

fn spread_registry(count: usize) -> CustomerTable {
    let registrations: Vec<_> = (0..count)
        .map(|idx| Some(date(2020, 1, 1) + chrono::Duration::days(idx as i64 % 1000)))
        .collect();
    registry(&registrations)
}

fn dates_per_customer(
    events: &shopforge_generate::PurchaseEvents,
) -> HashMap<i64, Vec<NaiveDate>> {
    let mut map: HashMap<i64, Vec<NaiveDate>> = HashMap::new();
    for (customer_id, event_date) in events.customer_ids.iter().zip(&events.dates) {
        map.entry(*customer_id).or_default().push(*event_date);
    }
    map
}

#[test]
fn no_trans_flag_excludes_customers_entirely() {
    let mut config = LifecycleConfig::default();
    config.first_trans.no_trans = 1.0;
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let events =
        simulate_lifecycles(&spread_registry(50), &config, &mut rng).expect("simulate lifecycles");
    assert!(events.is_empty());
}

#[test]
fn first_event_never_precedes_registration() {
    let config = LifecycleConfig::default();
    let customers = spread_registry(200);
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    let events = simulate_lifecycles(&customers, &config, &mut rng).expect("simulate lifecycles");

    let registrations: HashMap<i64, NaiveDate> = customers
        .customers
        .iter()
        .filter_map(|customer| {
            customer
                .registration_dt
                .map(|registration| (customer.customer_id, registration))
        })
        .collect();

    for (customer_id, dates) in dates_per_customer(&events) {
        let registration = registrations[&customer_id];
        let first = dates.first().expect("customer has events");
        assert!(
            *first >= registration,
            "customer {customer_id}: first event {first} precedes registration {registration}"
        );
    }
}

#[test]
fn event_dates_strictly_increase_per_customer() {
    let config = LifecycleConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let events = simulate_lifecycles(&spread_registry(100), &config, &mut rng)
        .expect("simulate lifecycles");

    for (customer_id, dates) in dates_per_customer(&events) {
        for pair in dates.windows(2) {
            assert!(
                pair[0] < pair[1],
                "customer {customer_id}: dates {} and {} not strictly increasing",
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn forced_same_day_first_purchase() {
    let mut config = LifecycleConfig::default();
    config.first_trans.no_trans = 0.0;
    config.first_trans.reg_purch_prob = 1.0;
    config.first_trans.lost_perc = 1.0;
    let registration = date(2023, 1, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let events = simulate_lifecycles(&registry(&[Some(registration)]), &config, &mut rng)
        .expect("simulate lifecycles");

    assert_eq!(events.len(), 1);
    assert_eq!(events.customer_ids[0], 30_000);
    assert_eq!(events.dates[0], registration);
}

#[test]
fn null_registration_contributes_nothing() {
    let mut config = LifecycleConfig::default();
    config.first_trans.no_trans = 0.0;
    let customers = registry(&[None, Some(date(2021, 6, 1))]);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let events = simulate_lifecycles(&customers, &config, &mut rng).expect("simulate lifecycles");

    assert!(!events.is_empty());
    assert!(events.customer_ids.iter().all(|id| *id == 30_001));
}

#[test]
fn empty_registry_yields_empty_stream() {
    let config = LifecycleConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    let events = simulate_lifecycles(&registry(&[]), &config, &mut rng)
        .expect("simulate lifecycles");
    assert!(events.is_empty());
}

#[test]
fn lost_customers_stop_after_one_event() {
    let mut config = LifecycleConfig::default();
    config.first_trans.no_trans = 0.0;
    config.first_trans.lost_perc = 1.0;
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let events = simulate_lifecycles(&spread_registry(80), &config, &mut rng)
        .expect("simulate lifecycles");

    let per_customer = dates_per_customer(&events);
    assert_eq!(per_customer.len(), 80);
    assert!(per_customer.values().all(|dates| dates.len() == 1));
}

#[test]
fn event_volume_stays_within_lifetime_bound() {
    let config = LifecycleConfig::default();
    let count = 60;
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let events = simulate_lifecycles(&spread_registry(count), &config, &mut rng)
        .expect("simulate lifecycles");

    // Gaps are at least one day, so a customer can never emit more events
    // than its lifetime holds days (plus the first purchase).
    let (_, life_max) = config.lifetime_years.bounds();
    let max_per_customer = (life_max * 12.0 * 30.0) as usize + 1;
    assert!(events.len() <= count * max_per_customer);
}
