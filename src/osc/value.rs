//! Value kinds and decoded inbound values

use rosc::OscType;
use serde::{Deserialize, Serialize};

/// Type expected for the first argument of a message at a given address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Any numeric OSC argument, widened to f64
    Number,
    /// OSC string argument
    Text,
    /// Numeric argument read as 0 = false, anything else = true
    Boolean,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Number => write!(f, "number"),
            ValueKind::Text => write!(f, "string"),
            ValueKind::Boolean => write!(f, "boolean"),
        }
    }
}

/// Inbound value already narrowed to its registered kind
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl DecodedValue {
    /// Decode the first positional argument of a message against `kind`.
    ///
    /// On mismatch, returns the runtime type name of what was received.
    pub fn decode(kind: ValueKind, arg: Option<&OscType>) -> Result<Self, &'static str> {
        match (kind, arg) {
            (ValueKind::Number, Some(arg)) => numeric(arg)
                .map(DecodedValue::Number)
                .ok_or_else(|| type_name(Some(arg))),
            (ValueKind::Text, Some(OscType::String(s))) => Ok(DecodedValue::Text(s.clone())),
            (ValueKind::Boolean, Some(arg)) => numeric(arg)
                .map(|n| DecodedValue::Bool(n != 0.0))
                .ok_or_else(|| type_name(Some(arg))),
            (_, other) => Err(type_name(other)),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DecodedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

fn numeric(arg: &OscType) -> Option<f64> {
    match arg {
        OscType::Int(i) => Some(*i as f64),
        OscType::Float(f) => Some(*f as f64),
        OscType::Long(l) => Some(*l as f64),
        OscType::Double(d) => Some(*d),
        _ => None,
    }
}

/// Runtime type name used in mismatch reports
pub fn type_name(arg: Option<&OscType>) -> &'static str {
    match arg {
        None => "nothing",
        Some(OscType::Int(_) | OscType::Float(_) | OscType::Long(_) | OscType::Double(_)) => {
            "number"
        }
        Some(OscType::String(_)) => "string",
        Some(OscType::Bool(_)) => "boolean",
        Some(OscType::Blob(_)) => "blob",
        Some(OscType::Nil) => "nil",
        Some(_) => "other",
    }
}

/// Booleans travel as integer 0/1
pub fn bool_to_arg(value: bool) -> OscType {
    OscType::Int(if value { 1 } else { 0 })
}
