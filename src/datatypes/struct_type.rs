//! Struct type declarations (component C3 types, spec §3.3).

use crate::datatypes::CommonType;
use crate::error::UmbError;
use std::num::NonZeroU32;

/// One attribute of a struct: a named, typed field.
#[derive(Debug, Clone, PartialEq)]
pub struct StructAttribute {
    pub name: String,
    pub ty: CommonType,
    /// Mandatory and positive for fixed-size-in-bits types (`bool`, `int`,
    /// `uint`, `double` — where it must be exactly 64); absent for
    /// variable-size types (`string`, `rational`).
    pub size: Option<u32>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl StructAttribute {
    pub fn new(name: impl Into<String>, ty: CommonType, size: Option<u32>) -> anyhow::Result<Self> {
        let attr = Self { name: name.into(), ty, size, lower: None, upper: None };
        attr.validate()?;
        Ok(attr)
    }

    pub fn is_variable_size(&self) -> bool {
        matches!(self.ty, CommonType::String | CommonType::Rational)
    }

    fn validate(&self) -> anyhow::Result<()> {
        match self.ty {
            CommonType::Bool | CommonType::Int | CommonType::Uint => {
                if !matches!(self.size, Some(s) if s > 0) {
                    anyhow::bail!(UmbError::SchemaViolation(format!(
                        "struct attribute {} of type {:?} requires a positive size",
                        self.name, self.ty
                    )));
                }
            }
            CommonType::Double => {
                if self.size != Some(64) {
                    anyhow::bail!(UmbError::SchemaViolation(format!(
                        "struct attribute {} of type double must declare size=64",
                        self.name
                    )));
                }
            }
            CommonType::String | CommonType::Rational => {
                if self.size.is_some() {
                    anyhow::bail!(UmbError::SchemaViolation(format!(
                        "struct attribute {} of variable-size type {:?} must not declare a size",
                        self.name, self.ty
                    )));
                }
            }
            other => anyhow::bail!(UmbError::UnsupportedType(format!(
                "{other:?} is not a valid struct attribute type"
            ))),
        }
        Ok(())
    }
}

/// One field of a struct: either padding bits or a named attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum StructField {
    Padding(NonZeroU32),
    Attribute(StructAttribute),
}

/// A struct type: an alignment (in bits) and an ordered field list.
#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub alignment: u32,
    pub fields: Vec<StructField>,
}

impl StructType {
    pub fn new(alignment: u32, fields: Vec<StructField>) -> anyhow::Result<Self> {
        if alignment == 0 {
            anyhow::bail!(UmbError::SchemaViolation("struct alignment must be positive".to_string()));
        }
        Ok(Self { alignment, fields })
    }

    pub fn attributes(&self) -> impl Iterator<Item = &StructAttribute> {
        self.fields.iter().filter_map(|f| match f {
            StructField::Attribute(a) => Some(a),
            StructField::Padding(_) => None,
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&StructAttribute> {
        self.attributes().find(|a| a.name == name)
    }

    /// Whether any field requires byte-aligned placement, i.e. the struct
    /// has variable size and therefore needs a chunk CSR when vectorized.
    pub fn has_variable_size_fields(&self) -> bool {
        self.attributes().any(|a| a.is_variable_size())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn double_attribute_requires_size_64() {
        assert!(StructAttribute::new("x", CommonType::Double, Some(32)).is_err());
        assert!(StructAttribute::new("x", CommonType::Double, Some(64)).is_ok());
    }

    #[test]
    fn string_attribute_rejects_declared_size() {
        assert!(StructAttribute::new("s", CommonType::String, Some(8)).is_err());
        assert!(StructAttribute::new("s", CommonType::String, None).is_ok());
    }
}
