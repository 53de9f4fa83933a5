use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// A `[a, b]` range of reals. Bounds are normalized on read, so an inverted
/// pair is treated as `[min, max]` rather than rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct Span(pub f64, pub f64);

impl Span {
    /// Normalized `(min, max)` bounds.
    pub fn bounds(&self) -> (f64, f64) {
        if self.0 <= self.1 {
            (self.0, self.1)
        } else {
            (self.1, self.0)
        }
    }
}

/// A `[a, b]` range of counts, inclusive on both ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct CountSpan(pub u32, pub u32);

impl CountSpan {
    /// Normalized `(min, max)` bounds.
    pub fn bounds(&self) -> (u32, u32) {
        if self.0 <= self.1 {
            (self.0, self.1)
        } else {
            (self.1, self.0)
        }
    }
}

/// A `[a, b]` range of calendar dates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct DateSpan(pub NaiveDate, pub NaiveDate);

impl DateSpan {
    /// Normalized `(min, max)` bounds.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        if self.0 <= self.1 {
            (self.0, self.1)
        } else {
            (self.1, self.0)
        }
    }
}

/// One value or a list of values; group specs accept both spellings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn values(&self) -> &[String] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values.as_slice(),
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// One product group: every brand x category combination becomes a product.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProductGroupSpec {
    /// Group id referenced by basket sampling weights.
    pub product_group_id: i64,
    pub brand: OneOrMany,
    pub category_l1: OneOrMany,
    pub category_l2: OneOrMany,
    /// Cost range for products in this group.
    pub price: Span,
}

/// Configuration for the product catalog provider.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogConfig {
    pub groups: Vec<ProductGroupSpec>,
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<()> {
        for group in &self.groups {
            let id = group.product_group_id;
            if group.brand.values().is_empty() {
                return Err(ConfigError::Empty(format!("catalog group {id}: brand")));
            }
            if group.category_l1.values().is_empty() {
                return Err(ConfigError::Empty(format!(
                    "catalog group {id}: category_l1"
                )));
            }
            if group.category_l2.values().is_empty() {
                return Err(ConfigError::Empty(format!(
                    "catalog group {id}: category_l2"
                )));
            }
            let (price_min, _) = group.price.bounds();
            if !price_min.is_finite() || price_min <= 0.0 {
                return Err(ConfigError::InvalidRange(format!(
                    "catalog group {id}: price must be positive, got {price_min}"
                )));
            }
        }
        Ok(())
    }
}

/// A gender code and its unnormalized sampling weight. A missing code models
/// customers whose gender is unknown.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenderWeight {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub weight: f64,
}

/// Configuration for the customer registry provider.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CustomerConfig {
    /// Date on which the customer database was collected. Registration dates
    /// never exceed this date; offending rows are nulled at the source.
    pub base_date: NaiveDate,
    pub n_customers: u64,
    /// Range registration dates are drawn from.
    pub registration_dt: DateSpan,
    /// Customer age range in years, relative to `base_date`.
    pub age: Span,
    pub gender_cd: Vec<GenderWeight>,
}

impl CustomerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.gender_cd.is_empty() {
            return Err(ConfigError::Empty("customers.gender_cd".to_string()));
        }
        for entry in &self.gender_cd {
            check_weight("customers.gender_cd", entry.weight)?;
        }
        let (age_min, _) = self.age.bounds();
        if !age_min.is_finite() || age_min < 0.0 {
            return Err(ConfigError::InvalidRange(format!(
                "customers.age must be non-negative, got {age_min}"
            )));
        }
        Ok(())
    }
}

/// Parameters governing the first purchase of a customer's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FirstTransConfig {
    /// Probability that a customer registers but never purchases.
    pub no_trans: f64,
    /// Probability that the first purchase lands on the registration date.
    pub reg_purch_prob: f64,
    /// Delay range, in months, before the first purchase when it is not
    /// same-day.
    pub month_after_reg: Span,
    /// Probability that a customer churns after exactly one purchase.
    pub lost_perc: f64,
}

/// Configuration for the customer lifecycle simulator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LifecycleConfig {
    /// Active purchasing lifetime per customer, in years.
    pub lifetime_years: Span,
    pub first_trans: FirstTransConfig,
    /// Annual purchase frequency range, integer, inclusive.
    pub freq_cnt: CountSpan,
}

impl LifecycleConfig {
    pub fn validate(&self) -> Result<()> {
        check_probability("lifecycle.first_trans.no_trans", self.first_trans.no_trans)?;
        check_probability(
            "lifecycle.first_trans.reg_purch_prob",
            self.first_trans.reg_purch_prob,
        )?;
        check_probability("lifecycle.first_trans.lost_perc", self.first_trans.lost_perc)?;
        let (month_min, _) = self.first_trans.month_after_reg.bounds();
        if !month_min.is_finite() || month_min < 0.0 {
            return Err(ConfigError::InvalidRange(format!(
                "lifecycle.first_trans.month_after_reg must be non-negative, got {month_min}"
            )));
        }
        let (life_min, _) = self.lifetime_years.bounds();
        if !life_min.is_finite() || life_min < 0.0 {
            return Err(ConfigError::InvalidRange(format!(
                "lifecycle.lifetime_years must be non-negative, got {life_min}"
            )));
        }
        let (freq_min, _) = self.freq_cnt.bounds();
        if freq_min == 0 {
            return Err(ConfigError::InvalidRange(
                "lifecycle.freq_cnt lower bound must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A product group id and its unnormalized basket sampling weight.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GroupWeight {
    pub group_id: i64,
    pub weight: f64,
}

/// Configuration for the basket expander.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BasketConfig {
    /// Per-line probability that a purchased item is returned.
    pub return_prob: f64,
    /// Per-line probability that a purchased item is exchanged.
    pub exchange_prob: f64,
    /// Items per basket, inclusive.
    pub items_cnt: CountSpan,
    /// Sampling weights over product groups.
    pub items_groups: Vec<GroupWeight>,
}

impl BasketConfig {
    pub fn validate(&self) -> Result<()> {
        check_probability("baskets.return_prob", self.return_prob)?;
        check_probability("baskets.exchange_prob", self.exchange_prob)?;
        let (items_min, _) = self.items_cnt.bounds();
        if items_min == 0 {
            return Err(ConfigError::InvalidRange(
                "baskets.items_cnt lower bound must be at least 1".to_string(),
            ));
        }
        if self.items_groups.is_empty() {
            return Err(ConfigError::Empty("baskets.items_groups".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for entry in &self.items_groups {
            check_weight("baskets.items_groups", entry.weight)?;
            if !seen.insert(entry.group_id) {
                return Err(ConfigError::Duplicate(format!(
                    "baskets.items_groups: group {} listed twice",
                    entry.group_id
                )));
            }
        }
        Ok(())
    }
}

/// Full parameter set for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SimulationConfig {
    pub catalog: CatalogConfig,
    pub customers: CustomerConfig,
    pub lifecycle: LifecycleConfig,
    pub baskets: BasketConfig,
}

impl SimulationConfig {
    /// Validate every component section once, before any generation runs.
    pub fn validate(&self) -> Result<()> {
        self.catalog.validate()?;
        self.customers.validate()?;
        self.lifecycle.validate()?;
        self.baskets.validate()?;
        Ok(())
    }
}

fn check_probability(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability(format!(
            "{field} must be within [0, 1], got {value}"
        )))
    }
}

fn check_weight(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight(format!(
            "{field} weights must be positive, got {value}"
        )))
    }
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            groups: vec![
                ProductGroupSpec {
                    product_group_id: 1,
                    brand: "ASOS".into(),
                    category_l1: "Clothes".into(),
                    category_l2: vec!["Pants", "Shorts", "Jeans"].into(),
                    price: Span(40.0, 80.0),
                },
                ProductGroupSpec {
                    product_group_id: 2,
                    brand: "ASOS".into(),
                    category_l1: "Clothes".into(),
                    category_l2: vec!["T-shirt", "Socks", "Underwear"].into(),
                    price: Span(10.0, 30.0),
                },
                ProductGroupSpec {
                    product_group_id: 2,
                    brand: "ASOS".into(),
                    category_l1: "Clothes".into(),
                    category_l2: vec!["Shirts", "formal"].into(),
                    price: Span(80.0, 120.0),
                },
                ProductGroupSpec {
                    product_group_id: 3,
                    brand: "ASOS".into(),
                    category_l1: "Clothes".into(),
                    category_l2: vec!["Outwear", "jacket"].into(),
                    price: Span(300.0, 350.0),
                },
                ProductGroupSpec {
                    product_group_id: 4,
                    brand: "Nike".into(),
                    category_l1: "Sportswear".into(),
                    category_l2: vec!["Running", "Yoga", "Functional", "Football"].into(),
                    price: Span(50.0, 80.0),
                },
                ProductGroupSpec {
                    product_group_id: 5,
                    brand: vec!["Nike", "Reebok", "ASOS"].into(),
                    category_l1: "Sportswear".into(),
                    category_l2: vec!["Trainers", "Football shoes"].into(),
                    price: Span(80.0, 500.0),
                },
                ProductGroupSpec {
                    product_group_id: 6,
                    brand: vec!["Nike", "Reebok", "ASOS"].into(),
                    category_l1: "Gifts".into(),
                    category_l2: vec!["gift card", "gift basket"].into(),
                    price: Span(100.0, 100.0),
                },
            ],
        }
    }
}

impl Default for CustomerConfig {
    fn default() -> Self {
        Self {
            base_date: day(2023, 4, 1),
            n_customers: 10_000,
            registration_dt: DateSpan(day(2020, 1, 1), day(2023, 4, 1)),
            age: Span(20.0, 60.0),
            gender_cd: vec![
                GenderWeight {
                    code: Some("Male".to_string()),
                    weight: 0.2,
                },
                GenderWeight {
                    code: Some("Female".to_string()),
                    weight: 0.4,
                },
                GenderWeight {
                    code: Some("Other".to_string()),
                    weight: 0.2,
                },
                GenderWeight {
                    code: None,
                    weight: 0.1,
                },
            ],
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            lifetime_years: Span(0.5, 2.5),
            first_trans: FirstTransConfig {
                no_trans: 0.1,
                reg_purch_prob: 0.6,
                month_after_reg: Span(0.0, 3.0),
                lost_perc: 0.5,
            },
            freq_cnt: CountSpan(3, 10),
        }
    }
}

impl Default for BasketConfig {
    fn default() -> Self {
        Self {
            return_prob: 0.05,
            exchange_prob: 0.05,
            items_cnt: CountSpan(1, 5),
            items_groups: vec![
                GroupWeight {
                    group_id: 1,
                    weight: 100.0,
                },
                GroupWeight {
                    group_id: 2,
                    weight: 100.0,
                },
                GroupWeight {
                    group_id: 3,
                    weight: 100.0,
                },
                GroupWeight {
                    group_id: 4,
                    weight: 100.0,
                },
                GroupWeight {
                    group_id: 5,
                    weight: 100.0,
                },
                GroupWeight {
                    group_id: 6,
                    weight: 10.0,
                },
            ],
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            customers: CustomerConfig::default(),
            lifecycle: LifecycleConfig::default(),
            baskets: BasketConfig::default(),
        }
    }
}
