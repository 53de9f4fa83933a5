//! Customer registry provider.
//!
//! Draws registration dates, birthdates and gender codes for a cohort of
//! sequential customer ids. Each attribute is drawn in one batch pass over
//! the whole cohort, in input order.

use chrono::Duration;
use rand::Rng;
use rand::distr::Distribution;

use shopforge_core::{Customer, CustomerConfig, CustomerTable};

use crate::errors::GenerationError;
use crate::sampling::{uniform_f64, weighted_index};

const CUSTOMER_ID_BASE: i64 = 30_000;

/// Build the customer registry table.
pub fn generate_customers<R: Rng + ?Sized>(
    config: &CustomerConfig,
    rng: &mut R,
) -> Result<CustomerTable, GenerationError> {
    let n = config.n_customers as usize;

    let (reg_min, reg_max) = config.registration_dt.bounds();
    let reg_days = reg_max.signed_duration_since(reg_min).num_days();
    let registrations: Vec<_> = (0..n)
        .map(|_| reg_min + Duration::days(rng.random_range(0..=reg_days)))
        .collect();

    let (age_min, age_max) = config.age.bounds();
    let birthdates: Vec<_> = (0..n)
        .map(|_| {
            let age_years = uniform_f64(rng, age_min, age_max);
            config.base_date - Duration::days((age_years * 365.0) as i64)
        })
        .collect();

    let weights: Vec<f64> = config.gender_cd.iter().map(|entry| entry.weight).collect();
    let gender_dist = weighted_index(&weights, "customers.gender_cd")?;
    let genders: Vec<Option<String>> = (0..n)
        .map(|_| config.gender_cd[gender_dist.sample(rng)].code.clone())
        .collect();

    let customers = (0..n)
        .map(|idx| {
            // A registration later than the collection date is unknowable at
            // the source; such rows carry a null registration.
            let registration_dt = Some(registrations[idx]).filter(|dt| *dt <= config.base_date);
            Customer {
                customer_id: CUSTOMER_ID_BASE + idx as i64,
                gender_cd: genders[idx].clone(),
                registration_dt,
                birthdate_dt: birthdates[idx],
                base_dt: config.base_date,
            }
        })
        .collect();

    Ok(CustomerTable { customers })
}
