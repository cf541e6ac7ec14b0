//! CRUD intents sent through the gateway's `mutate` entry point

use serde::{Deserialize, Serialize};

use crate::error::ModelResult;
use crate::models::{
    Avaliacao, Beneficio, Cargo, CargoInput, Departamento, DepartamentoInput, FolhaSalarial,
    FolhaSalarialInput, Funcionario, FuncionarioBeneficio, FuncionarioInput, Licenca,
    LicencaDecision, LicencaInput, Presenca, UserCreate, UserUpdate,
};
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_email, validate_optional_text,
    validate_required_text,
};

/// Generic CRUD operation.
///
/// `B` is the payload type for create and update (usually an `*Input` model).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CrudAction<B> {
    /// Create
    Create(B),
    /// Update (needs the record ID)
    Update { id: i64, data: B },
    /// Delete (only needs the record ID)
    Delete { id: i64 },
}

impl<B> CrudAction<B> {
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Create(_) => None,
            Self::Update { id, .. } | Self::Delete { id } => Some(*id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    pub fn payload(&self) -> Option<&B> {
        match self {
            Self::Create(data) | Self::Update { data, .. } => Some(data),
            Self::Delete { .. } => None,
        }
    }
}

/// Body of a create or update request, checked before anything is sent
pub trait Payload: Serialize + Send + Sync {
    fn check(&self) -> ModelResult<()> {
        Ok(())
    }
}

impl Payload for serde_json::Value {}
impl Payload for LicencaDecision {}
impl Payload for Presenca {}

impl Payload for DepartamentoInput {
    fn check(&self) -> ModelResult<()> {
        validate_required_text(&self.nome, "nome", MAX_NAME_LEN)?;
        validate_optional_text(&self.descricao, "descricao", MAX_NOTE_LEN)
    }
}

impl Payload for CargoInput {
    fn check(&self) -> ModelResult<()> {
        validate_required_text(&self.nome, "nome", MAX_NAME_LEN)
    }
}

impl Payload for UserUpdate {
    fn check(&self) -> ModelResult<()> {
        validate_optional_text(&self.username, "username", MAX_NAME_LEN)?;
        validate_optional_email(&self.email, "email")
    }
}

macro_rules! payload_via_validate {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Payload for $ty {
                fn check(&self) -> ModelResult<()> {
                    self.validate()
                }
            }
        )*
    };
}

payload_via_validate!(
    FuncionarioInput,
    LicencaInput,
    FolhaSalarialInput,
    Funcionario,
    Departamento,
    Cargo,
    Licenca,
    Avaliacao,
    FolhaSalarial,
    Beneficio,
    FuncionarioBeneficio,
    UserCreate,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DepartamentoInput;

    #[test]
    fn test_crud_action_update() {
        let action = CrudAction::Update {
            id: 12,
            data: DepartamentoInput {
                nome: "Recursos Humanos".to_string(),
                descricao: None,
            },
        };

        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("\"type\":\"Update\""));
        assert!(json.contains("\"id\":12"));
        assert_eq!(action.id(), Some(12));
        assert_eq!(action.payload().unwrap().nome, "Recursos Humanos");
    }

    #[test]
    fn test_crud_action_delete() {
        let action = CrudAction::<DepartamentoInput>::Delete { id: 3 };
        assert_eq!(action.name(), "delete");
        assert!(action.payload().is_none());
    }

    #[test]
    fn test_payload_check() {
        let blank = DepartamentoInput::default();
        assert!(blank.check().is_err());
        let ok = DepartamentoInput {
            nome: "Financas".to_string(),
            descricao: None,
        };
        assert!(ok.check().is_ok());
        assert!(serde_json::json!({"anything": 1}).check().is_ok());
    }
}
