//! Store-independent predicate and ordering for catalog queries.
//!
//! A [`ProductFilter`] is a conjunction of [`Facet`]s. Each store adapter
//! translates it into its own query language; [`ProductFilter::matches`] is
//! the in-process reading that every translation must agree with.

use mongodb::bson::Bson;
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{Product, bson_number};
use crate::query::{PriceRange, ProductQuery, SortDirection};

/// Case-insensitive literal substring match on `productName`.
#[derive(Debug, Clone)]
pub struct TextFacet {
    term: String,
    matcher: Option<Regex>,
}

impl TextFacet {
    pub fn new(term: impl Into<String>) -> Self {
        let term = term.into();
        let matcher = RegexBuilder::new(&regex::escape(&term))
            .case_insensitive(true)
            .build()
            .ok();
        Self { term, matcher }
    }

    /// The raw search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The term with regex metacharacters escaped.
    pub fn pattern(&self) -> String {
        regex::escape(&self.term)
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match &self.matcher {
            Some(re) => re.is_match(haystack),
            None => haystack.to_lowercase().contains(&self.term.to_lowercase()),
        }
    }
}

impl PartialEq for TextFacet {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Facet {
    Text(TextFacet),
    Price(PriceRange),
    Brand(BTreeSet<String>),
    Category(BTreeSet<String>),
}

impl Facet {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Facet::Text(text) => product
                .product_name
                .as_deref()
                .is_some_and(|name| text.is_match(name)),
            Facet::Price(range) => product.price.is_some_and(|price| range.contains(price)),
            Facet::Brand(brands) => product
                .brand
                .as_ref()
                .is_some_and(|brand| brands.contains(brand)),
            Facet::Category(categories) => product
                .category
                .as_ref()
                .is_some_and(|category| categories.contains(category)),
        }
    }
}

/// Conjunction of facets; an absent facet constrains nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductFilter {
    facets: Vec<Facet>,
}

impl ProductFilter {
    pub fn new(facets: Vec<Facet>) -> Self {
        Self { facets }
    }

    /// The price facet is always present. Empty brand or category sets
    /// produce no facet at all.
    pub fn from_query(query: &ProductQuery) -> Self {
        let mut facets = Vec::with_capacity(4);

        if let Some(term) = &query.search {
            facets.push(Facet::Text(TextFacet::new(term.as_str())));
        }

        facets.push(Facet::Price(query.price));

        if !query.brands.is_empty() {
            facets.push(Facet::Brand(query.brands.clone()));
        }
        if !query.categories.is_empty() {
            facets.push(Facet::Category(query.categories.clone()));
        }

        Self { facets }
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.facets.iter().all(|facet| facet.matches(product))
    }
}

/// Single-key ordering requested by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Any field name; not validated
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let ord = compare_fields(a.field(&self.field).as_ref(), b.field(&self.field).as_ref());
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// What to fetch once the filter has selected documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindSpec {
    /// `None` keeps store order
    pub sort: Option<SortSpec>,
    pub skip: u64,
    pub limit: u64,
}

impl FindSpec {
    pub fn from_query(query: &ProductQuery) -> Self {
        Self {
            sort: query.sort_spec(),
            skip: query.skip(),
            limit: query.limit,
        }
    }
}

/// Missing values sort before everything else, as MongoDB does.
fn compare_fields(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => compare_bson(x, y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Cross-type BSON ordering following MongoDB's comparison order.
pub fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    if let (Some(x), Some(y)) = (bson_number(a), bson_number(b)) {
        return x.total_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => x.bytes().cmp(&y.bytes()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::MinKey => 0,
        Bson::Null | Bson::Undefined => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 2,
        Bson::Symbol(_) | Bson::String(_) => 3,
        Bson::Document(_) => 4,
        Bson::Array(_) => 5,
        Bson::Binary(_) => 6,
        Bson::ObjectId(_) => 7,
        Bson::Boolean(_) => 8,
        Bson::DateTime(_) => 9,
        Bson::Timestamp(_) => 10,
        Bson::RegularExpression(_) => 11,
        Bson::DbPointer(_) => 12,
        Bson::JavaScriptCode(_) | Bson::JavaScriptCodeWithScope(_) => 13,
        Bson::MaxKey => 14,
    }
}
