//! Customer lifecycle simulator.
//!
//! Turns the customer registry into an irregular purchase-event stream:
//! each customer gets zero or more purchase dates, governed by onboarding
//! probabilities, a per-customer lifetime boundary, and exponentially
//! distributed inter-purchase gaps. All draws happen in batch passes over
//! the whole cohort so entities with wildly different lifetimes stay
//! consistent with one another.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;
use rand_distr::{Distribution, Exp};
use tracing::debug;

use shopforge_core::{CustomerTable, LifecycleConfig};

use crate::errors::GenerationError;
use crate::sampling::uniform_f64;

const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// Flattened purchase-event stream: one (customer id, date) pair per basket,
/// kept as two parallel sequences.
#[derive(Debug, Clone, Default)]
pub struct PurchaseEvents {
    pub customer_ids: Vec<i64>,
    pub dates: Vec<NaiveDate>,
}

impl PurchaseEvents {
    pub fn len(&self) -> usize {
        self.customer_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customer_ids.is_empty()
    }

    fn push(&mut self, customer_id: i64, date: NaiveDate) {
        self.customer_ids.push(customer_id);
        self.dates.push(date);
    }
}

/// Purchase cursor for one customer. A deactivated cursor never reactivates,
/// and every advance moves at least one day toward the lifetime boundary, so
/// the round loop terminates.
#[derive(Debug, Clone, Copy)]
enum Cursor {
    Active(NaiveDateTime),
    Deactivated,
}

struct CustomerState {
    customer_id: i64,
    cursor: Cursor,
    lifetime_end: NaiveDateTime,
    gap_dist: Exp<f64>,
}

/// Simulate purchase events for every customer in the registry.
///
/// Events are emitted round-major: every first purchase, then one round of
/// follow-up purchases per iteration, each round in input customer order.
pub fn simulate_lifecycles<R: Rng + ?Sized>(
    customers: &CustomerTable,
    config: &LifecycleConfig,
    rng: &mut R,
) -> Result<PurchaseEvents, GenerationError> {
    let n = customers.customers.len();

    // One batch pass per parameter, over the whole cohort in input order.
    let no_trans: Vec<bool> = (0..n)
        .map(|_| rng.random_bool(config.first_trans.no_trans))
        .collect();
    let same_day: Vec<bool> = (0..n)
        .map(|_| rng.random_bool(config.first_trans.reg_purch_prob))
        .collect();
    let (month_min, month_max) = config.first_trans.month_after_reg.bounds();
    let delay_months: Vec<f64> = same_day
        .iter()
        .map(|&flag| {
            if flag {
                0.0
            } else {
                uniform_f64(rng, month_min, month_max)
            }
        })
        .collect();
    let lost: Vec<bool> = (0..n)
        .map(|_| rng.random_bool(config.first_trans.lost_perc))
        .collect();
    let (life_min, life_max) = config.lifetime_years.bounds();
    let lifetime_months: Vec<f64> = (0..n)
        .map(|_| uniform_f64(rng, life_min * 12.0, life_max * 12.0))
        .collect();
    let (freq_min, freq_max) = config.freq_cnt.bounds();
    let freqs: Vec<u32> = (0..n)
        .map(|_| rng.random_range(freq_min..=freq_max))
        .collect();

    let mut events = PurchaseEvents::default();
    let mut states: Vec<CustomerState> = Vec::with_capacity(n);

    // First purchase: registration date plus the onboarding delay. Customers
    // flagged no-trans or lacking a registration date contribute nothing;
    // one-and-done customers start out deactivated after their single event.
    for (idx, customer) in customers.customers.iter().enumerate() {
        let Some(registration) = customer.registration_dt else {
            continue;
        };
        if no_trans[idx] {
            continue;
        }

        let registered = registration.and_time(NaiveTime::MIN);
        let first = registered + days_delta(delay_months[idx] * DAYS_PER_MONTH);
        events.push(customer.customer_id, first.date());

        let cursor = if lost[idx] {
            Cursor::Deactivated
        } else {
            Cursor::Active(first)
        };
        states.push(CustomerState {
            customer_id: customer.customer_id,
            cursor,
            lifetime_end: registered + days_delta(lifetime_months[idx] * DAYS_PER_MONTH),
            gap_dist: Exp::new(f64::from(freqs[idx])).map_err(|err| {
                GenerationError::InvalidConfig(format!("lifecycle.freq_cnt: {err}"))
            })?,
        });
    }

    // Follow-up rounds: advance every active cursor by an exponential gap
    // (mean 1/frequency years, floored at one day), deactivating cursors
    // that cross their lifetime boundary.
    let mut active = states
        .iter()
        .filter(|state| matches!(state.cursor, Cursor::Active(_)))
        .count();
    let mut rounds = 0_u64;

    while active > 0 {
        rounds += 1;
        for state in states.iter_mut() {
            let Cursor::Active(cursor) = state.cursor else {
                continue;
            };
            let gap_years = state.gap_dist.sample(rng);
            let advanced = cursor + days_delta((gap_years * DAYS_PER_YEAR).max(1.0));
            if advanced > state.lifetime_end {
                state.cursor = Cursor::Deactivated;
                active -= 1;
            } else {
                state.cursor = Cursor::Active(advanced);
                events.push(state.customer_id, advanced.date());
            }
        }
    }

    debug!(
        customers = n,
        events = events.len(),
        rounds,
        "lifecycle simulation finished"
    );

    Ok(events)
}

fn days_delta(days: f64) -> Duration {
    Duration::milliseconds((days * 86_400_000.0).round() as i64)
}
