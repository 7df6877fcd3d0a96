//! Declarative validation schema for the product create form.
//!
//! Each [`Field`] owns an ordered list of `(Rule, message)` pairs. Validation
//! walks every field (it never stops at the first bad field) and records the
//! message of the *first* rule that fails for each one. Only when no field
//! fails is a [`Product`] assembled.
//!
//! All raw values are trimmed before any rule runs. A field whose rule list
//! does not start with [`Rule::Required`] is optional: when empty, the rest of
//! its rules are skipped.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Product, ProductCode};

/// Maximum length of a product name, in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Maximum length of a product description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Wire format of the `dateAdded` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Raw Form Input
// =============================================================================

/// Raw create-form values, exactly as submitted.
///
/// Every field is a string so that invalid input (e.g. `price=abc`) can be
/// reported per field and echoed back to the user unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductForm {
    pub product_code: String,
    pub name: String,
    pub category_id: String,
    pub price: String,
    pub quantity: String,
    pub date_added: String,
    pub description: String,
}

impl ProductForm {
    /// The raw value submitted for `field`.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::ProductCode => &self.product_code,
            Field::Name => &self.name,
            Field::CategoryId => &self.category_id,
            Field::Price => &self.price,
            Field::Quantity => &self.quantity,
            Field::DateAdded => &self.date_added,
            Field::Description => &self.description,
        }
    }
}

// =============================================================================
// Fields and Rules
// =============================================================================

/// A create-form field. Ordered as the fields appear on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ProductCode,
    Name,
    CategoryId,
    Price,
    Quantity,
    DateAdded,
    Description,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Self; 7] = [
        Self::ProductCode,
        Self::Name,
        Self::CategoryId,
        Self::Price,
        Self::Quantity,
        Self::DateAdded,
        Self::Description,
    ];

    /// The form/wire name of the field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ProductCode => "productCode",
            Self::Name => "name",
            Self::CategoryId => "categoryId",
            Self::Price => "price",
            Self::Quantity => "quantity",
            Self::DateAdded => "dateAdded",
            Self::Description => "description",
        }
    }

    /// The ordered rules for this field, each with its failure message.
    #[must_use]
    pub const fn rules(self) -> &'static [(Rule, &'static str)] {
        match self {
            Self::ProductCode => &[
                (Rule::Required, "Product code is required"),
                (
                    Rule::ProductCode,
                    "Product code must match the format PROD-XXXX",
                ),
            ],
            Self::Name => &[
                (Rule::Required, "Product name is required"),
                (
                    Rule::MaxChars(NAME_MAX_CHARS),
                    "Product name must not exceed 100 characters",
                ),
            ],
            Self::CategoryId => &[(Rule::Required, "Category is required")],
            Self::Price => &[
                (Rule::Required, "Price is required"),
                (Rule::Number, "Price must be a number"),
                (Rule::Positive, "Price must be greater than 0"),
            ],
            Self::Quantity => &[
                (Rule::Required, "Quantity is required"),
                (Rule::Number, "Quantity must be a number"),
                (Rule::Integer, "Quantity must be a whole number"),
                (Rule::Positive, "Quantity must be greater than 0"),
                (Rule::FitsU64, "Quantity is too large"),
            ],
            Self::DateAdded => &[
                (Rule::Required, "Date added is required"),
                (Rule::Date, "Date added must be a valid date"),
                (
                    Rule::NotAfterToday,
                    "Date added cannot be later than today",
                ),
            ],
            Self::Description => &[(
                Rule::MaxChars(DESCRIPTION_MAX_CHARS),
                "Description must not exceed 500 characters",
            )],
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single predicate over a trimmed field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty after trimming.
    Required,
    /// Matches `PROD-NNNN`.
    ProductCode,
    /// At most this many characters (Unicode scalar values).
    MaxChars(usize),
    /// Parses as a decimal number.
    Number,
    /// Parses as a number strictly greater than zero.
    Positive,
    /// Parses as a number with no fractional part.
    Integer,
    /// Parses as an integer that fits in a `u64`.
    FitsU64,
    /// Parses as a `YYYY-MM-DD` calendar date.
    Date,
    /// Parses as a date on or before `today`.
    NotAfterToday,
}

impl Rule {
    /// Whether `value` satisfies this rule.
    ///
    /// Rules that need a parsed value return `false` when parsing fails;
    /// they are always listed after the rule that reports the parse error.
    #[must_use]
    pub fn check(self, value: &str, today: NaiveDate) -> bool {
        match self {
            Self::Required => !value.is_empty(),
            Self::ProductCode => ProductCode::parse(value).is_ok(),
            Self::MaxChars(max) => value.chars().count() <= max,
            Self::Number => parse_decimal(value).is_some(),
            Self::Positive => parse_decimal(value).is_some_and(|d| d > Decimal::ZERO),
            Self::Integer => parse_decimal(value).is_some_and(|d| d.fract().is_zero()),
            Self::FitsU64 => parse_quantity(value).is_some(),
            Self::Date => parse_date(value).is_some(),
            Self::NotAfterToday => parse_date(value).is_some_and(|d| d <= today),
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Field-level validation failures: each failing field mapped to the message
/// of its first failing rule, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    /// The error message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// Whether `field` failed.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate failures in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

// =============================================================================
// Evaluation
// =============================================================================

/// The message of the first rule `value` fails for `field`, if any.
#[must_use]
pub fn first_failure(field: Field, value: &str, today: NaiveDate) -> Option<&'static str> {
    let value = value.trim();
    let rules = field.rules();
    let required = matches!(rules.first(), Some((Rule::Required, _)));

    if value.is_empty() && !required {
        return None;
    }

    rules
        .iter()
        .find(|(rule, _)| !rule.check(value, today))
        .map(|(_, message)| *message)
}

/// Validate a submitted form against the schema.
///
/// Every field is checked. `today` is the latest acceptable `dateAdded`.
///
/// # Errors
///
/// Returns the per-field failures if any field breaks a rule.
pub fn validate(form: &ProductForm, today: NaiveDate) -> Result<Product, FieldErrors> {
    let mut errors = FieldErrors::default();

    for field in Field::ALL {
        if let Some(message) = first_failure(field, form.value(field), today) {
            errors.insert(field, message);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // Every parser below is the one its rules use, so none of them can
    // fail once the schema has passed.
    assemble(form).ok_or(errors)
}

fn assemble(form: &ProductForm) -> Option<Product> {
    Some(Product::from_validated(
        ProductCode::parse(form.product_code.trim()).ok()?,
        form.name.trim().to_owned(),
        CategoryId::new(form.category_id.trim()),
        parse_decimal(form.price.trim())?,
        parse_quantity(form.quantity.trim())?,
        parse_date(form.date_added.trim())?,
        form.description.trim().to_owned(),
    ))
}

/// Plain decimal notation only; digit separators such as `1_000` are not
/// numbers on the form.
fn parse_decimal(value: &str) -> Option<Decimal> {
    if value.contains('_') {
        return None;
    }
    value.parse::<Decimal>().ok()
}

fn parse_quantity(value: &str) -> Option<u64> {
    parse_decimal(value)
        .filter(|d| d.fract().is_zero())
        .and_then(|d| d.to_u64())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn valid_form() -> ProductForm {
        ProductForm {
            product_code: "PROD-0001".to_string(),
            name: "Widget".to_string(),
            category_id: "1".to_string(),
            price: "10".to_string(),
            quantity: "5".to_string(),
            date_added: "2024-01-01".to_string(),
            description: String::new(),
        }
    }

    fn error_for(form: &ProductForm, field: Field) -> Option<&'static str> {
        validate(form, today()).err().and_then(|e| e.get(field))
    }

    #[test]
    fn test_valid_form_builds_product() {
        let product = validate(&valid_form(), today()).unwrap();
        assert_eq!(product.product_code().as_str(), "PROD-0001");
        assert_eq!(product.name(), "Widget");
        assert_eq!(product.category_id().as_str(), "1");
        assert_eq!(product.price(), Decimal::from(10));
        assert_eq!(product.quantity(), 5);
        assert_eq!(product.date_added(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(product.description(), "");
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = validate(&ProductForm::default(), today()).unwrap_err();

        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get(Field::ProductCode), Some("Product code is required"));
        assert_eq!(errors.get(Field::Name), Some("Product name is required"));
        assert_eq!(errors.get(Field::CategoryId), Some("Category is required"));
        assert_eq!(errors.get(Field::Price), Some("Price is required"));
        assert_eq!(errors.get(Field::Quantity), Some("Quantity is required"));
        assert_eq!(errors.get(Field::DateAdded), Some("Date added is required"));
        assert!(!errors.contains(Field::Description));
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let form = ProductForm {
            name: "   ".to_string(),
            ..valid_form()
        };
        assert_eq!(error_for(&form, Field::Name), Some("Product name is required"));
    }

    #[test]
    fn test_product_code_format() {
        for code in ["PROD-1", "PROD-12345", "prod-0001", "P-0001", "PROD-00a1"] {
            let form = ProductForm {
                product_code: code.to_string(),
                ..valid_form()
            };
            assert_eq!(
                error_for(&form, Field::ProductCode),
                Some("Product code must match the format PROD-XXXX"),
                "{code:?}"
            );
        }
    }

    #[test]
    fn test_name_length_boundary() {
        let at_limit = ProductForm {
            name: "n".repeat(NAME_MAX_CHARS),
            ..valid_form()
        };
        assert!(validate(&at_limit, today()).is_ok());

        let over = ProductForm {
            name: "n".repeat(NAME_MAX_CHARS + 1),
            ..valid_form()
        };
        assert_eq!(
            error_for(&over, Field::Name),
            Some("Product name must not exceed 100 characters")
        );
    }

    #[test]
    fn test_name_length_counts_characters_not_bytes() {
        let form = ProductForm {
            name: "ư".repeat(NAME_MAX_CHARS),
            ..valid_form()
        };
        assert!(validate(&form, today()).is_ok());
    }

    #[test]
    fn test_price_must_be_positive() {
        for price in ["0", "0.00", "-1", "-0.01"] {
            let form = ProductForm {
                price: price.to_string(),
                ..valid_form()
            };
            assert_eq!(
                error_for(&form, Field::Price),
                Some("Price must be greater than 0"),
                "{price:?}"
            );
        }

        let small = ProductForm {
            price: "0.01".to_string(),
            ..valid_form()
        };
        assert_eq!(validate(&small, today()).unwrap().price(), Decimal::new(1, 2));
    }

    #[test]
    fn test_price_must_be_a_number() {
        let form = ProductForm {
            price: "ten".to_string(),
            ..valid_form()
        };
        assert_eq!(error_for(&form, Field::Price), Some("Price must be a number"));
    }

    #[test]
    fn test_quantity_rules_in_order() {
        let cases = [
            ("abc", "Quantity must be a number"),
            ("2.5", "Quantity must be a whole number"),
            ("-2.5", "Quantity must be a whole number"),
            ("0", "Quantity must be greater than 0"),
            ("-3", "Quantity must be greater than 0"),
            ("1_000", "Quantity must be a number"),
            ("99999999999999999999999", "Quantity is too large"),
        ];

        for (quantity, expected) in cases {
            let form = ProductForm {
                quantity: quantity.to_string(),
                ..valid_form()
            };
            assert_eq!(error_for(&form, Field::Quantity), Some(expected), "{quantity:?}");
        }
    }

    #[test]
    fn test_quantity_accepts_large_whole_numbers() {
        let form = ProductForm {
            quantity: "99999999999".to_string(),
            ..valid_form()
        };
        assert_eq!(validate(&form, today()).unwrap().quantity(), 99_999_999_999);

        // Beyond the 2^53 range a browser number input can represent.
        let form = ProductForm {
            quantity: "9007199254740993".to_string(),
            ..valid_form()
        };
        assert_eq!(
            validate(&form, today()).unwrap().quantity(),
            9_007_199_254_740_993
        );
    }

    #[test]
    fn test_digit_separators_are_not_numbers() {
        for price in ["1_000", "10_0.5", "_5"] {
            let form = ProductForm {
                price: price.to_string(),
                ..valid_form()
            };
            assert_eq!(
                error_for(&form, Field::Price),
                Some("Price must be a number"),
                "{price:?}"
            );
        }
    }

    #[test]
    fn test_quantity_accepts_integral_decimal() {
        let form = ProductForm {
            quantity: "3.0".to_string(),
            ..valid_form()
        };
        assert_eq!(validate(&form, today()).unwrap().quantity(), 3);
    }

    #[test]
    fn test_date_added_boundaries() {
        let same_day = ProductForm {
            date_added: "2024-06-15".to_string(),
            ..valid_form()
        };
        assert!(validate(&same_day, today()).is_ok());

        let tomorrow = ProductForm {
            date_added: "2024-06-16".to_string(),
            ..valid_form()
        };
        assert_eq!(
            error_for(&tomorrow, Field::DateAdded),
            Some("Date added cannot be later than today")
        );

        let garbage = ProductForm {
            date_added: "2024-02-30".to_string(),
            ..valid_form()
        };
        assert_eq!(
            error_for(&garbage, Field::DateAdded),
            Some("Date added must be a valid date")
        );
    }

    #[test]
    fn test_description_is_optional_with_limit() {
        let exactly = ProductForm {
            description: "d".repeat(DESCRIPTION_MAX_CHARS),
            ..valid_form()
        };
        assert!(validate(&exactly, today()).is_ok());

        let over = ProductForm {
            description: "d".repeat(DESCRIPTION_MAX_CHARS + 1),
            ..valid_form()
        };
        assert_eq!(
            error_for(&over, Field::Description),
            Some("Description must not exceed 500 characters")
        );
    }

    #[test]
    fn test_all_fields_evaluated() {
        let form = ProductForm {
            product_code: "bad".to_string(),
            price: "0".to_string(),
            quantity: "0".to_string(),
            ..valid_form()
        };
        let errors = validate(&form, today()).unwrap_err();
        let failed: Vec<Field> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(failed, vec![Field::ProductCode, Field::Price, Field::Quantity]);
    }

    #[test]
    fn test_values_are_trimmed() {
        let form = ProductForm {
            product_code: " PROD-0002 ".to_string(),
            name: "  Gadget ".to_string(),
            price: " 4.50 ".to_string(),
            ..valid_form()
        };
        let product = validate(&form, today()).unwrap();
        assert_eq!(product.product_code().as_str(), "PROD-0002");
        assert_eq!(product.name(), "Gadget");
        assert_eq!(product.price(), Decimal::new(450, 2));
    }

    #[test]
    fn test_form_deserializes_camel_case_with_defaults() {
        let form: ProductForm =
            serde_json::from_str(r#"{"productCode": "PROD-0001", "dateAdded": "2024-01-01"}"#)
                .unwrap();
        assert_eq!(form.product_code, "PROD-0001");
        assert_eq!(form.date_added, "2024-01-01");
        assert!(form.name.is_empty());
    }

    #[test]
    fn test_field_errors_display() {
        let form = ProductForm {
            name: String::new(),
            category_id: String::new(),
            ..valid_form()
        };
        let errors = validate(&form, today()).unwrap_err();
        assert_eq!(
            errors.to_string(),
            "name: Product name is required; categoryId: Category is required"
        );
    }
}
