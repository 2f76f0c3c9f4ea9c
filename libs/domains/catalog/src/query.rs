//! Normalization of raw query-string input into a typed catalog request.
//!
//! Normalization never fails: malformed values fall back to defaults.

use std::collections::BTreeSet;
use strum::Display;

use crate::filter::SortSpec;
use crate::models::RawProductQuery;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SortDirection {
    #[strum(serialize = "asc")]
    Ascending,
    #[default]
    #[strum(serialize = "desc")]
    Descending,
}

impl SortDirection {
    /// Only the exact string `asc` selects ascending order.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("asc") => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    /// MongoDB sort value: `1` or `-1`.
    pub fn as_i32(self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// Inclusive price interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

/// A normalized catalog request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// 1-based, never 0
    pub page: u64,
    /// Never 0
    pub limit: u64,
    pub sort_by: Option<String>,
    pub order: SortDirection,
    pub search: Option<String>,
    pub price: PriceRange,
    /// Empty means any brand
    pub brands: BTreeSet<String>,
    /// Empty means any category
    pub categories: BTreeSet<String>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: None,
            order: SortDirection::default(),
            search: None,
            price: PriceRange::default(),
            brands: BTreeSet::new(),
            categories: BTreeSet::new(),
        }
    }
}

impl ProductQuery {
    pub fn from_raw(raw: &RawProductQuery) -> Self {
        let defaults = PriceRange::default();

        Self {
            page: parse_count(raw.page.as_deref(), DEFAULT_PAGE),
            limit: parse_count(raw.limit.as_deref(), DEFAULT_LIMIT),
            sort_by: non_empty(raw.sort_by.as_deref()),
            order: SortDirection::from_param(raw.order.as_deref()),
            search: non_empty(raw.search.as_deref()),
            price: PriceRange {
                min: parse_price(raw.min_price.as_deref(), defaults.min),
                max: parse_price(raw.max_price.as_deref(), defaults.max),
            },
            brands: parse_set(raw.brands.as_deref()),
            categories: parse_set(raw.categories.as_deref()),
        }
    }

    /// Documents to skip before this page starts.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `None` leaves ordering to the store.
    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort_by.as_ref().map(|field| SortSpec {
            field: field.clone(),
            direction: self.order,
        })
    }
}

/// Positive integer parameter read from its leading digits, so `2.5` and
/// `2abc` both mean 2. No digits or zero means `default`, negatives clamp to 1.
fn parse_count(raw: Option<&str>, default: u64) -> u64 {
    let Some(text) = raw.map(str::trim_start) else {
        return default;
    };

    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits = &unsigned[..count_digits(unsigned.as_bytes())];

    if digits.bytes().all(|b| b == b'0') {
        // also covers "no digits at all"
        return default;
    }
    if negative {
        return 1;
    }
    digits.parse::<u64>().unwrap_or(u64::MAX)
}

fn parse_price(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(|text| leading_float(text.trim_start()))
        .filter(|value| value.is_finite())
        .unwrap_or(default)
}

/// Longest decimal prefix of `text`: sign, digits, fraction, exponent.
fn leading_float(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    text[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn parse_set(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|text| {
        text.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.filter(|text| !text.is_empty()).map(str::to_string)
}
