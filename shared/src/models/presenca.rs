//! Presenca (attendance) Model

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::util;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presenca {
    pub id: i64,
    pub funcionario_id: i64,
    #[serde(with = "util::date")]
    pub data: NaiveDate,
    #[serde(default, with = "util::option_time")]
    pub hora_entrada: Option<NaiveTime>,
    #[serde(default, with = "util::option_time")]
    pub hora_saida: Option<NaiveTime>,
    #[serde(default)]
    pub observacao: String,
}

impl Presenca {
    /// A day without an entry time is an absence
    pub fn is_absence(&self) -> bool {
        self.hora_entrada.is_none()
    }

    /// Time between entry and exit. `None` while the employee is still in
    /// or when the record is an absence.
    pub fn worked(&self) -> Option<TimeDelta> {
        match (self.hora_entrada, self.hora_saida) {
            (Some(entrada), Some(saida)) if saida >= entrada => Some(saida - entrada),
            _ => None,
        }
    }
}

impl Entity for Presenca {
    const KIND: EntityKind = EntityKind::Presenca;

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.observacao.as_str()]
    }
}
