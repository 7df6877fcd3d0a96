//! Product records.
//!
//! A [`Product`] is the validated payload sent to the catalog API. It can
//! only be built through [`crate::validation::validate`], so holding a
//! `Product` means every field has passed the form schema.
//!
//! A [`StoredProduct`] is what the API hands back when listing. It is
//! decoded leniently because records written by other clients are not
//! guaranteed to satisfy the schema.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CategoryId, ProductCode, ProductId};

/// A validated product, ready to be saved.
///
/// Serializes with the camelCase keys the catalog API expects; `price` is
/// written as a JSON number and `dateAdded` as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    product_code: ProductCode,
    name: String,
    category_id: CategoryId,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    quantity: u64,
    date_added: NaiveDate,
    description: String,
}

impl Product {
    /// Assemble a product from already-validated parts.
    pub(crate) const fn from_validated(
        product_code: ProductCode,
        name: String,
        category_id: CategoryId,
        price: Decimal,
        quantity: u64,
        date_added: NaiveDate,
        description: String,
    ) -> Self {
        Self {
            product_code,
            name,
            category_id,
            price,
            quantity,
            date_added,
            description,
        }
    }

    #[must_use]
    pub const fn product_code(&self) -> &ProductCode {
        &self.product_code
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub const fn quantity(&self) -> u64 {
        self.quantity
    }

    #[must_use]
    pub const fn date_added(&self) -> NaiveDate {
        self.date_added
    }

    /// Free-text description; empty when the field was left blank.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A product record as returned by the catalog API's list endpoint.
///
/// Apart from `id`, a field holding a value of the wrong shape (`""` for a
/// date, `"5"` for a quantity, `null` for a name) decodes as missing instead
/// of failing the record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProduct {
    pub id: ProductId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub product_code: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::category_id")]
    pub category_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date_added: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
}

/// Field decoders for records written by other clients.
mod lenient {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};

    use crate::types::CategoryId;
    use crate::validation::DATE_FORMAT;

    /// Any JSON value, sorted by the shapes the fields below can use.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Int(i64),
        Float(f64),
        Text(String),
        Other(#[allow(dead_code)] IgnoredAny),
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Loose::deserialize(deserializer)? {
            Loose::Text(s) => Some(s),
            Loose::Int(i) => Some(i.to_string()),
            Loose::Float(f) => Some(f.to_string()),
            Loose::Other(_) => None,
        })
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(text(deserializer)?.unwrap_or_default())
    }

    pub fn category_id<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<CategoryId>, D::Error> {
        Ok(text(deserializer)?
            .filter(|s| !s.trim().is_empty())
            .map(CategoryId::from))
    }

    pub fn decimal<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        Ok(match Loose::deserialize(deserializer)? {
            Loose::Int(i) => Some(Decimal::from(i)),
            Loose::Float(f) => Decimal::try_from(f).ok(),
            Loose::Text(s) => s.trim().parse().ok(),
            Loose::Other(_) => None,
        })
    }

    pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        Ok(match Loose::deserialize(deserializer)? {
            Loose::Int(i) => Some(i),
            Loose::Float(f) => Decimal::try_from(f)
                .ok()
                .filter(|d| d.fract().is_zero())
                .and_then(|d| d.to_i64()),
            Loose::Text(s) => s.trim().parse().ok(),
            Loose::Other(_) => None,
        })
    }

    /// `YYYY-MM-DD`, also taking the date part of an ISO 8601 datetime.
    pub fn date<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Ok(match Loose::deserialize(deserializer)? {
            Loose::Text(s) => NaiveDate::parse_and_remainder(s.trim(), DATE_FORMAT)
                .ok()
                .map(|(date, _)| date),
            Loose::Int(_) | Loose::Float(_) | Loose::Other(_) => None,
        })
    }
}
