//! Conversion from API DTOs to domain records.

use crate::domain::{Address, Cep, UnitRecord, WaitTime};

use super::types::{RawAddress, RawUnit};

/// Why a raw unit was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("missing or non-numeric id")]
    MissingId,
    #[error("missing or empty name")]
    MissingName,
}

/// Build a [`UnitRecord`] from a raw API unit.
///
/// Units without an identifier or a name are rejected. Every other field
/// falls back to an empty value.
pub fn convert_unit(raw: RawUnit) -> Result<UnitRecord, ConversionError> {
    let id = raw
        .id
        .as_ref()
        .and_then(|id| id.as_i64())
        .ok_or(ConversionError::MissingId)?;

    let name = raw
        .nome
        .filter(|n| !n.trim().is_empty())
        .ok_or(ConversionError::MissingName)?;

    let address = raw
        .local
        .and_then(|l| l.endereco.into_iter().next())
        .map(convert_address)
        .unwrap_or_default();

    let category = raw
        .categoria
        .and_then(|g| g.categoria.into_iter().next())
        .and_then(|c| c.nome)
        .filter(|n| !n.trim().is_empty());

    let specialties = raw
        .especialidades
        .map(|g| {
            g.especialidades
                .into_iter()
                .filter_map(|s| s.nome)
                .collect()
        })
        .unwrap_or_default();

    let wait_time = raw
        .tempo_espera_geral
        .as_deref()
        .map(WaitTime::parse)
        .unwrap_or_default();

    Ok(UnitRecord {
        id,
        name,
        address,
        phone: raw.telefone.map(|t| t.into_string()),
        available_24h: raw.disponibilidade_24h.is_some_and(|f| f.is_set()),
        category,
        specialties,
        wait_time,
    })
}

fn convert_address(raw: RawAddress) -> Address {
    Address {
        cep: raw
            .cep
            .and_then(|c| Cep::parse(&c.into_string()).ok()),
        street: raw.logradouro.unwrap_or_default(),
        neighborhood: raw.bairro.unwrap_or_default(),
        city: raw.cidade.unwrap_or_default(),
    }
}
