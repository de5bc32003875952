//! `state-valuations` section of the manifest (spec §4.7).
//!
//! `variables` is a list of `Padding | Attribute` entries with no explicit
//! discriminator tag, discriminated instead by which keys are present —
//! grounded on the Python `OneOfSchema`-based `ValuationFieldSchema`
//! discriminator (`original_source/umbi/io/index/state_valuations.py`).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub struct ValuationPadding {
    pub padding: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValuationAttribute {
    pub name: String,
    pub ty: crate::datatypes::CommonType,
    pub size: Option<u32>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValuationField {
    Padding(ValuationPadding),
    Attribute(ValuationAttribute),
}

#[derive(Serialize, Deserialize)]
struct PaddingWire {
    padding: u32,
}

#[derive(Serialize, Deserialize)]
struct AttributeWire {
    name: String,
    #[serde(rename = "type")]
    ty: crate::datatypes::CommonType,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper: Option<f64>,
}

impl Serialize for ValuationField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ValuationField::Padding(p) => PaddingWire { padding: p.padding }.serialize(serializer),
            ValuationField::Attribute(a) => AttributeWire {
                name: a.name.clone(),
                ty: a.ty,
                size: a.size,
                lower: a.lower,
                upper: a.upper,
            }
            .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ValuationField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let obj = value.as_object().ok_or_else(|| D::Error::custom("expected a JSON object"))?;
        if obj.contains_key("padding") {
            let wire: PaddingWire = serde_json::from_value(value).map_err(D::Error::custom)?;
            Ok(ValuationField::Padding(ValuationPadding { padding: wire.padding }))
        } else if obj.contains_key("name") {
            let wire: AttributeWire = serde_json::from_value(value).map_err(D::Error::custom)?;
            Ok(ValuationField::Attribute(ValuationAttribute {
                name: wire.name,
                ty: wire.ty,
                size: wire.size,
                lower: wire.lower,
                upper: wire.upper,
            }))
        } else {
            Err(D::Error::custom("state-valuations field is neither padding nor attribute"))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateValuations {
    pub alignment: u32,
    pub variables: Vec<ValuationField>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn discriminates_padding_vs_attribute_by_shape() {
        let json = serde_json::json!([
            {"padding": 3},
            {"name": "x", "type": "int32", "size": 32}
        ]);
        let fields: Vec<ValuationField> = serde_json::from_value(json).unwrap();
        assert_eq!(fields[0], ValuationField::Padding(ValuationPadding { padding: 3 }));
        match &fields[1] {
            ValuationField::Attribute(a) => assert_eq!(a.name, "x"),
            _ => panic!("expected attribute"),
        }
    }
}
