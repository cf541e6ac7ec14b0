//! Departamento (department) Model

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::error::ModelResult;
use crate::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Departamento {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
}

impl Departamento {
    pub fn validate(&self) -> ModelResult<()> {
        validate_required_text(&self.nome, "nome", MAX_NAME_LEN)?;
        validate_optional_text(&self.descricao, "descricao", MAX_NOTE_LEN)
    }
}

impl Entity for Departamento {
    const KIND: EntityKind = EntityKind::Departamento;

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.nome.as_str()];
        if let Some(d) = &self.descricao {
            fields.push(d);
        }
        fields
    }
}

/// Create / update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartamentoInput {
    pub nome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
}
