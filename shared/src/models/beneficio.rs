//! Beneficio (benefit) and FuncionarioBeneficio (benefit assignment) Models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::error::ModelResult;
use crate::util;
use crate::validation::{MAX_NAME_LEN, validate_date_range, validate_required_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BenefitType {
    #[serde(rename = "Saude", alias = "saude", alias = "Saúde")]
    Health,
    #[serde(rename = "Transporte", alias = "transporte")]
    Transport,
    #[serde(rename = "Alimentacao", alias = "alimentacao", alias = "Alimentação")]
    Food,
    #[serde(rename = "Seguro", alias = "seguro")]
    Insurance,
    #[serde(rename = "Outro", alias = "outro")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssignmentState {
    #[default]
    #[serde(rename = "Ativo", alias = "ativo")]
    Active,
    #[serde(rename = "Inativo", alias = "inativo")]
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beneficio {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub descricao: String,
    pub tipo: BenefitType,
}

impl Beneficio {
    pub fn validate(&self) -> ModelResult<()> {
        validate_required_text(&self.nome, "nome", MAX_NAME_LEN)
    }
}

impl Entity for Beneficio {
    const KIND: EntityKind = EntityKind::Beneficio;

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.nome.as_str(), self.descricao.as_str()]
    }
}

/// Links one employee to one benefit over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncionarioBeneficio {
    pub id: i64,
    pub funcionario_id: i64,
    pub beneficio_id: i64,
    #[serde(with = "util::date")]
    pub data_inicio: NaiveDate,
    /// Open-ended when absent
    #[serde(default, with = "util::option_date")]
    pub data_fim: Option<NaiveDate>,
    #[serde(default)]
    pub estado: AssignmentState,
}

impl FuncionarioBeneficio {
    pub fn validate(&self) -> ModelResult<()> {
        validate_date_range(self.data_inicio, self.data_fim, "data_fim")
    }

    /// Active on `day`: state is active and the day falls inside the range
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.estado == AssignmentState::Active
            && day >= self.data_inicio
            && self.data_fim.is_none_or(|end| day <= end)
    }
}

impl Entity for FuncionarioBeneficio {
    const KIND: EntityKind = EntityKind::FuncionarioBeneficio;

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> Vec<&str> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_open_ended_assignment() {
        let a = FuncionarioBeneficio {
            id: 1,
            funcionario_id: 2,
            beneficio_id: 3,
            data_inicio: d(2024, 1, 1),
            data_fim: None,
            estado: AssignmentState::Active,
        };
        assert!(a.validate().is_ok());
        assert!(a.is_active_on(d(2030, 1, 1)));
        assert!(!a.is_active_on(d(2023, 12, 31)));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let a = FuncionarioBeneficio {
            id: 1,
            funcionario_id: 2,
            beneficio_id: 3,
            data_inicio: d(2024, 6, 1),
            data_fim: Some(d(2024, 5, 1)),
            estado: AssignmentState::Inactive,
        };
        assert!(a.validate().is_err());
        assert!(!a.is_active_on(d(2024, 5, 15)));
    }
}
