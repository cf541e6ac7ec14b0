//! Cargo (position) Model

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::error::ModelResult;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub descricao: String,
    /// Seniority level label, e.g. "Junior"
    #[serde(default)]
    pub nivel: Option<String>,
    /// Owning department; a position may be unattached
    #[serde(default)]
    pub departamento_id: Option<i64>,
}

impl Cargo {
    pub fn validate(&self) -> ModelResult<()> {
        validate_required_text(&self.nome, "nome", MAX_NAME_LEN)?;
        validate_optional_text(&self.nivel, "nivel", MAX_SHORT_TEXT_LEN)?;
        if self.descricao.len() > MAX_NOTE_LEN {
            return Err(crate::error::ModelError::validation("descricao", "is too long"));
        }
        Ok(())
    }
}

impl Entity for Cargo {
    const KIND: EntityKind = EntityKind::Cargo;

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.nome.as_str(), self.descricao.as_str()];
        if let Some(n) = &self.nivel {
            fields.push(n);
        }
        fields
    }
}

/// Create / update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CargoInput {
    pub nome: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nivel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departamento_id: Option<i64>,
}
