//! FolhaSalarial (payroll sheet) Model
//!
//! Amounts are `Decimal`. The backend sends them either as JSON numbers or
//! as strings; both decode.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::error::{ModelError, ModelResult};
use crate::util;
use crate::validation::validate_date_range;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolhaSalarial {
    pub id: i64,
    pub funcionario_id: i64,
    #[serde(with = "util::date")]
    pub periodo_inicio: NaiveDate,
    #[serde(with = "util::date")]
    pub periodo_fim: NaiveDate,
    pub salario_base: Decimal,
    #[serde(default)]
    pub bonus: Decimal,
    #[serde(default)]
    pub descontos: Decimal,
    /// Absent until the sheet is paid
    #[serde(default, with = "util::option_date")]
    pub data_pagamento: Option<NaiveDate>,
}

impl FolhaSalarial {
    /// base + bonus - descontos
    pub fn net(&self) -> Decimal {
        self.salario_base + self.bonus - self.descontos
    }

    pub fn is_paid(&self) -> bool {
        self.data_pagamento.is_some()
    }

    pub fn validate(&self) -> ModelResult<()> {
        validate_date_range(self.periodo_inicio, Some(self.periodo_fim), "periodo_fim")?;
        for (field, value) in [
            ("salario_base", self.salario_base),
            ("bonus", self.bonus),
            ("descontos", self.descontos),
        ] {
            if value.is_sign_negative() {
                return Err(ModelError::validation(field, "must not be negative"));
            }
        }
        Ok(())
    }
}

impl Entity for FolhaSalarial {
    const KIND: EntityKind = EntityKind::FolhaSalarial;

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// Create / update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolhaSalarialInput {
    pub funcionario_id: i64,
    #[serde(with = "util::date")]
    pub periodo_inicio: NaiveDate,
    #[serde(with = "util::date")]
    pub periodo_fim: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub salario_base: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub bonus: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub descontos: Decimal,
    #[serde(skip_serializing_if = "Option::is_none", with = "util::option_date", default)]
    pub data_pagamento: Option<NaiveDate>,
}

impl FolhaSalarialInput {
    pub fn validate(&self) -> ModelResult<()> {
        validate_date_range(self.periodo_inicio, Some(self.periodo_fim), "periodo_fim")
    }
}
