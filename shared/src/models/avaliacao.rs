//! Avaliacao (performance review) Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::error::ModelResult;
use crate::util;
use crate::validation::{MAX_NOTE_LEN, validate_optional_text, validate_rating};

/// Bucketed overall rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingLabel {
    #[serde(rename = "Excelente")]
    Excellent,
    #[serde(rename = "Bom")]
    Good,
    #[serde(rename = "Regular")]
    Fair,
    #[serde(rename = "Precisa Melhorar")]
    NeedsImprovement,
}

impl RatingLabel {
    pub fn from_average(avg: f64) -> Self {
        if avg >= 4.5 {
            Self::Excellent
        } else if avg >= 3.5 {
            Self::Good
        } else if avg >= 2.5 {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avaliacao {
    pub id: i64,
    pub funcionario_id: i64,
    #[serde(with = "util::date")]
    pub data_avaliacao: NaiveDate,
    pub assiduidade: u8,
    pub competencia_tecnica: u8,
    pub soft_skills: u8,
    #[serde(default)]
    pub comentarios: Option<String>,
}

impl Avaliacao {
    pub fn average(&self) -> f64 {
        let sum = u32::from(self.assiduidade)
            + u32::from(self.competencia_tecnica)
            + u32::from(self.soft_skills);
        f64::from(sum) / 3.0
    }

    pub fn label(&self) -> RatingLabel {
        RatingLabel::from_average(self.average())
    }

    pub fn validate(&self) -> ModelResult<()> {
        validate_rating(self.assiduidade, "assiduidade")?;
        validate_rating(self.competencia_tecnica, "competencia_tecnica")?;
        validate_rating(self.soft_skills, "soft_skills")?;
        validate_optional_text(&self.comentarios, "comentarios", MAX_NOTE_LEN)
    }
}

impl Entity for Avaliacao {
    const KIND: EntityKind = EntityKind::Avaliacao;

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> Vec<&str> {
        self.comentarios.as_deref().into_iter().collect()
    }
}
