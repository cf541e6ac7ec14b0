//! Licenca (leave request) Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::error::{ModelError, ModelResult};
use crate::util;
use crate::validation::{MAX_NOTE_LEN, validate_date_range, validate_optional_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
    #[serde(rename = "Ferias", alias = "ferias", alias = "Férias")]
    Vacation,
    #[serde(rename = "Medica", alias = "medica", alias = "Médica")]
    Medical,
    #[serde(rename = "Maternidade", alias = "maternidade")]
    Maternity,
    #[serde(rename = "Paternidade", alias = "paternidade")]
    Paternity,
    #[serde(rename = "Outro", alias = "outro")]
    Other,
}

/// Approval state. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LeaveState {
    #[default]
    #[serde(rename = "Pendente", alias = "pendente")]
    Pending,
    #[serde(rename = "Aprovada", alias = "aprovada", alias = "Aprovado")]
    Approved,
    #[serde(rename = "Rejeitada", alias = "rejeitada", alias = "Rejeitado")]
    Rejected,
}

impl LeaveState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Approved => "Aprovada",
            Self::Rejected => "Rejeitada",
        }
    }

    /// Only `Pending -> Approved` and `Pending -> Rejected` are allowed
    pub fn transition(self, to: LeaveState) -> ModelResult<LeaveState> {
        match (self, to) {
            (Self::Pending, Self::Approved | Self::Rejected) => Ok(to),
            _ => Err(ModelError::InvalidTransition {
                entity: "licenca",
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Licenca {
    pub id: i64,
    pub funcionario_id: i64,
    pub tipo: LeaveType,
    #[serde(with = "util::date")]
    pub data_inicio: NaiveDate,
    #[serde(with = "util::date")]
    pub data_fim: NaiveDate,
    #[serde(default)]
    pub motivo: Option<String>,
    #[serde(default)]
    pub estado: LeaveState,
}

impl Licenca {
    /// Inclusive length in calendar days
    pub fn days(&self) -> i64 {
        (self.data_fim - self.data_inicio).num_days() + 1
    }

    pub fn approve(&mut self) -> ModelResult<()> {
        self.estado = self.estado.transition(LeaveState::Approved)?;
        Ok(())
    }

    pub fn reject(&mut self) -> ModelResult<()> {
        self.estado = self.estado.transition(LeaveState::Rejected)?;
        Ok(())
    }

    pub fn validate(&self) -> ModelResult<()> {
        validate_date_range(self.data_inicio, Some(self.data_fim), "data_fim")?;
        validate_optional_text(&self.motivo, "motivo", MAX_NOTE_LEN)
    }
}

impl Entity for Licenca {
    const KIND: EntityKind = EntityKind::Licenca;

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> Vec<&str> {
        self.motivo.as_deref().into_iter().collect()
    }
}

/// Create payload. New requests always start `Pendente` on the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicencaInput {
    pub funcionario_id: i64,
    pub tipo: LeaveType,
    #[serde(with = "util::date")]
    pub data_inicio: NaiveDate,
    #[serde(with = "util::date")]
    pub data_fim: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivo: Option<String>,
}

impl LicencaInput {
    pub fn validate(&self) -> ModelResult<()> {
        validate_date_range(self.data_inicio, Some(self.data_fim), "data_fim")?;
        validate_optional_text(&self.motivo, "motivo", MAX_NOTE_LEN)
    }
}

/// Payload for the approve / reject action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicencaDecision {
    pub estado: LeaveState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leave(estado: LeaveState) -> Licenca {
        Licenca {
            id: 1,
            funcionario_id: 4,
            tipo: LeaveType::Vacation,
            data_inicio: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            data_fim: NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
            motivo: None,
            estado,
        }
    }

    #[test]
    fn test_pending_can_be_decided() {
        let mut l = leave(LeaveState::Pending);
        l.approve().unwrap();
        assert_eq!(l.estado, LeaveState::Approved);

        let mut l = leave(LeaveState::Pending);
        l.reject().unwrap();
        assert_eq!(l.estado, LeaveState::Rejected);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut l = leave(LeaveState::Approved);
        assert!(matches!(l.reject(), Err(ModelError::InvalidTransition { .. })));
        assert_eq!(l.estado, LeaveState::Approved);

        let mut l = leave(LeaveState::Rejected);
        assert!(l.approve().is_err());
        assert!(LeaveState::Pending.transition(LeaveState::Pending).is_err());
    }

    #[test]
    fn test_days_and_range() {
        let l = leave(LeaveState::Pending);
        assert_eq!(l.days(), 10);
        assert!(l.validate().is_ok());

        let mut bad = leave(LeaveState::Pending);
        bad.data_fim = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert!(matches!(bad.validate(), Err(ModelError::InvalidRange { .. })));
    }
}
