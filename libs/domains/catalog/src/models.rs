use mongodb::bson::{Bson, Document, oid::ObjectId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::{IntoParams, ToSchema};

/// A catalog document as stored in the products collection.
///
/// Only the fields the query pipeline inspects are typed; everything else is
/// kept verbatim in `attributes` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Document id, rendered as a 24-character hex string
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id",
        deserialize_with = "deserialize_object_id"
    )]
    #[schema(value_type = Option<String>, example = "65f1c0a2b3d4e5f601234567")]
    pub id: Option<ObjectId>,

    #[serde(
        rename = "productName",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub product_name: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub brand: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub category: Option<String>,

    /// Integer and double prices are both accepted
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_price",
        deserialize_with = "lenient_number"
    )]
    pub price: Option<f64>,

    /// Every other field of the document
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub attributes: Document,
}

impl Product {
    /// Look up any field by its stored name, typed or not.
    pub fn field(&self, name: &str) -> Option<Bson> {
        match name {
            "_id" => self.id.map(Bson::ObjectId),
            "productName" => self.product_name.clone().map(Bson::String),
            "brand" => self.brand.clone().map(Bson::String),
            "category" => self.category.clone().map(Bson::String),
            "price" => self.price.map(Bson::Double),
            other => self.attributes.get(other).cloned(),
        }
    }
}

fn serialize_object_id<S: Serializer>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error> {
    match id {
        Some(oid) => serializer.serialize_str(&oid.to_hex()),
        None => serializer.serialize_none(),
    }
}

fn deserialize_object_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ObjectId>, D::Error> {
    match Option::<Bson>::deserialize(deserializer)? {
        Some(Bson::ObjectId(oid)) => Ok(Some(oid)),
        Some(Bson::String(hex)) => ObjectId::parse_str(&hex)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Bson>::deserialize(deserializer)? {
        Some(Bson::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Bson>::deserialize(deserializer)?.and_then(|value| bson_number(&value)))
}

/// Numeric value of a BSON scalar, if it is a number.
pub(crate) fn bson_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(d) => Some(*d),
        Bson::Decimal128(d) => d.to_string().parse().ok(),
        _ => None,
    }
}

fn serialize_price<S: Serializer>(price: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    const EXACT_INT: f64 = 9_007_199_254_740_992.0;
    match price {
        Some(p) if p.fract() == 0.0 && p.abs() <= EXACT_INT => serializer.serialize_i64(*p as i64),
        Some(p) => serializer.serialize_f64(*p),
        None => serializer.serialize_none(),
    }
}

/// Query string of `GET /products`, exactly as received.
///
/// Every parameter is optional text; [`crate::query::ProductQuery::from_raw`]
/// turns it into a typed request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RawProductQuery {
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Page size (default 12)
    pub limit: Option<String>,
    /// Field to sort by; store order when absent
    pub sort_by: Option<String>,
    /// `asc` for ascending, anything else descending
    pub order: Option<String>,
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
    /// Inclusive lower price bound (default 0)
    pub min_price: Option<String>,
    /// Inclusive upper price bound (default unbounded)
    pub max_price: Option<String>,
    /// Comma-separated brand names
    pub brands: Option<String>,
    /// Comma-separated category names
    pub categories: Option<String>,
}

impl RawProductQuery {
    /// Fold decoded query-string pairs into one value per parameter.
    ///
    /// A repeated key keeps all of its values joined with `,` in arrival
    /// order, so `page=1&page=2` reads as page 1 and
    /// `brands=A&brands=B` as both brands. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut raw.page,
                "limit" => &mut raw.limit,
                "sortBy" => &mut raw.sort_by,
                "order" => &mut raw.order,
                "search" => &mut raw.search,
                "minPrice" => &mut raw.min_price,
                "maxPrice" => &mut raw.max_price,
                "brands" => &mut raw.brands,
                "categories" => &mut raw.categories,
                _ => continue,
            };
            match slot {
                Some(existing) => {
                    existing.push(',');
                    existing.push_str(value.as_ref());
                }
                None => *slot = Some(value.as_ref().to_string()),
            }
        }
        raw
    }
}

/// One page of matching products with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// `ceil(totalProducts / limit)`
    pub total_pages: u64,
    /// The requested page, even past the last one
    pub current_page: u64,
    /// Matching documents across all pages
    pub total_products: u64,
}

impl ProductPage {
    pub fn new(products: Vec<Product>, total_products: u64, page: u64, limit: u64) -> Self {
        Self {
            products,
            total_pages: total_products.div_ceil(limit.max(1)),
            current_page: page,
            total_products,
        }
    }
}
