use serde_json::Value;

use super::{parse_object, text, Rejection};

pub const QUANTITY_MIN: i64 = 0;
pub const QUANTITY_MAX: i64 = 100;

/// One validated product attribute. A payload is decoded into a list of these,
/// so an unknown key can never reach the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductField {
    Name(String),
    Description(String),
    Sku(String),
    Manufacturer(String),
    Quantity(i32),
}

impl ProductField {
    pub fn decode(key: &str, value: &Value) -> Result<Self, Rejection> {
        match key {
            "name" => Ok(ProductField::Name(text("name", value)?)),
            "description" => Ok(ProductField::Description(text("description", value)?)),
            "sku" => Ok(ProductField::Sku(text("sku", value)?)),
            "manufacturer" => Ok(ProductField::Manufacturer(text("manufacturer", value)?)),
            "quantity" => Ok(ProductField::Quantity(quantity(value)?)),
            other => Err(Rejection::UnknownField(other.to_string())),
        }
    }
}

/// Complete product payload for create and replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub sku: String,
    pub manufacturer: String,
    pub quantity: i32,
}

impl ProductDraft {
    pub fn into_fields(self) -> Vec<ProductField> {
        vec![
            ProductField::Name(self.name),
            ProductField::Description(self.description),
            ProductField::Sku(self.sku),
            ProductField::Manufacturer(self.manufacturer),
            ProductField::Quantity(self.quantity),
        ]
    }
}

/// Partial update; may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductPatch(pub Vec<ProductField>);

fn decode_fields(body: &[u8]) -> Result<Vec<ProductField>, Rejection> {
    let map = parse_object(body)?;
    map.iter().map(|(k, v)| ProductField::decode(k, v)).collect()
}

pub fn decode_draft(body: &[u8]) -> Result<ProductDraft, Rejection> {
    let (mut name, mut description, mut sku, mut manufacturer, mut qty) = (None, None, None, None, None);
    for field in decode_fields(body)? {
        match field {
            ProductField::Name(v) => name = Some(v),
            ProductField::Description(v) => description = Some(v),
            ProductField::Sku(v) => sku = Some(v),
            ProductField::Manufacturer(v) => manufacturer = Some(v),
            ProductField::Quantity(v) => qty = Some(v),
        }
    }
    Ok(ProductDraft {
        name: name.ok_or(Rejection::MissingField("name"))?,
        description: description.ok_or(Rejection::MissingField("description"))?,
        sku: sku.ok_or(Rejection::MissingField("sku"))?,
        manufacturer: manufacturer.ok_or(Rejection::MissingField("manufacturer"))?,
        quantity: qty.ok_or(Rejection::MissingField("quantity"))?,
    })
}

pub fn decode_patch(body: &[u8]) -> Result<ProductPatch, Rejection> {
    Ok(ProductPatch(decode_fields(body)?))
}

/// JSON integer (no fractional part, `50.0` included) within 0..=100.
fn quantity(value: &Value) -> Result<i32, Rejection> {
    let Some(n) = value.as_i64() else {
        return Err(Rejection::InvalidField { field: "quantity", reason: "must be an integer" });
    };
    if !(QUANTITY_MIN..=QUANTITY_MAX).contains(&n) {
        return Err(Rejection::InvalidField { field: "quantity", reason: "must be between 0 and 100" });
    }
    Ok(n as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{"name":"Lamp","description":"Desk lamp","sku":"L-1","manufacturer":"Acme","quantity":50}"#;

    #[test]
    fn full_payload_decodes() {
        let draft = decode_draft(FULL.as_bytes()).unwrap();
        assert_eq!(draft.quantity, 50);
        assert_eq!(draft.into_fields().len(), 5);
    }

    #[test]
    fn quantity_accepted_iff_integral_and_in_range() {
        for (raw, ok) in [("0", true), ("100", true), ("-1", false), ("101", false), ("150", false), ("2.5", false), ("50.0", false), ("\"5\"", false)] {
            let body = format!(r#"{{"quantity":{raw}}}"#);
            assert_eq!(decode_patch(body.as_bytes()).is_ok(), ok, "quantity {raw}");
        }
    }

    #[test]
    fn unknown_field_rejected_on_patch_and_draft() {
        let body = br#"{"owner_user_id":9,"quantity":5}"#;
        assert_eq!(decode_patch(body), Err(Rejection::UnknownField("owner_user_id".into())));
        let body = FULL.replace("}", r#","date_added":"2024-01-01"}"#);
        assert_eq!(decode_draft(body.as_bytes()), Err(Rejection::UnknownField("date_added".into())));
    }

    #[test]
    fn draft_requires_every_field() {
        let body = br#"{"name":"Lamp","description":"Desk lamp","sku":"L-1","manufacturer":"Acme"}"#;
        assert_eq!(decode_draft(body), Err(Rejection::MissingField("quantity")));
    }

    #[test]
    fn empty_patch_is_allowed() {
        assert_eq!(decode_patch(b"{}"), Ok(ProductPatch::default()));
    }

    #[test]
    fn blank_text_rejected() {
        let body = br#"{"sku":""}"#;
        assert!(matches!(decode_patch(body), Err(Rejection::InvalidField { field: "sku", .. })));
    }
}
