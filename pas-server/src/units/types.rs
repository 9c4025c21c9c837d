//! Unit API response DTOs.
//!
//! The unit API is loose about types: identifiers and postal codes arrive as
//! numbers or strings, the 24h flag as `0`/`1` or a boolean, and nested
//! groups are sometimes missing. Every optional field is read leniently, so
//! a malformed field is dropped instead of failing the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a field, turning any shape mismatch into `None`.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(d)?;
    Ok(T::deserialize(value).ok())
}

/// An identifier sent as a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Text(String),
}

impl RawId {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawId::Int(n) => Some(*n),
            RawId::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Free text that is sometimes sent as a number (phones, postal codes).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawText {
    Text(String),
    Number(serde_json::Number),
}

impl RawText {
    pub fn into_string(self) -> String {
        match self {
            RawText::Text(s) => s,
            RawText::Number(n) => n.to_string(),
        }
    }
}

/// The 24-hour availability flag.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum RawFlag {
    Int(i64),
    Bool(bool),
}

impl RawFlag {
    pub fn is_set(self) -> bool {
        match self {
            RawFlag::Int(n) => n == 1,
            RawFlag::Bool(b) => b,
        }
    }
}

/// A health unit as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUnit {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawId>,

    #[serde(default, deserialize_with = "lenient")]
    pub nome: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub telefone: Option<RawText>,

    #[serde(default, deserialize_with = "lenient")]
    pub disponibilidade_24h: Option<RawFlag>,

    #[serde(default, deserialize_with = "lenient")]
    pub tempo_espera_geral: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub local: Option<RawLocal>,

    #[serde(default, deserialize_with = "lenient")]
    pub categoria: Option<RawCategoryGroup>,

    #[serde(default, deserialize_with = "lenient")]
    pub especialidades: Option<RawSpecialtyGroup>,
}

/// `local`: the unit's addresses. Only the first is used.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLocal {
    #[serde(default)]
    pub endereco: Vec<RawAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAddress {
    #[serde(default, deserialize_with = "lenient")]
    pub cep: Option<RawText>,

    #[serde(default, deserialize_with = "lenient")]
    pub logradouro: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub bairro: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub cidade: Option<String>,
}

/// `categoria: { categoria: [{ id, nome }] }`
#[derive(Debug, Clone, Deserialize)]
pub struct RawCategoryGroup {
    #[serde(default)]
    pub categoria: Vec<RawNamed>,
}

/// `especialidades: { especialidades: [{ id, nome }] }`
#[derive(Debug, Clone, Deserialize)]
pub struct RawSpecialtyGroup {
    #[serde(default)]
    pub especialidades: Vec<RawNamed>,
}

/// A named catalog item: category, specialty.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNamed {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawId>,

    #[serde(default, deserialize_with = "lenient")]
    pub nome: Option<String>,
}
