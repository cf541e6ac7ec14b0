//! Funcionario (employee) Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::error::ModelResult;
use crate::util;
use crate::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_email,
    validate_optional_text, validate_required_text,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M", alias = "m")]
    Male,
    #[serde(rename = "F", alias = "f")]
    Female,
    #[serde(rename = "O", alias = "o")]
    Other,
}

/// Closed set of employment states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmployeeStatus {
    #[default]
    #[serde(rename = "Ativo", alias = "ativo", alias = "Active", alias = "active")]
    Active,
    #[serde(rename = "Inativo", alias = "inativo", alias = "Inactive", alias = "inactive")]
    Inactive,
    #[serde(rename = "Suspenso", alias = "suspenso", alias = "Suspended", alias = "suspended")]
    Suspended,
}

/// Badge kind marker reported by the QR endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrKind {
    #[serde(alias = "estatico", alias = "Static", alias = "STATIC")]
    Static,
    #[serde(alias = "dinamico", alias = "Dynamic", alias = "DYNAMIC")]
    Dynamic,
}

impl std::fmt::Display for QrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Dynamic => f.write_str("dynamic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funcionario {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub sobrenome: String,
    /// National identity document number
    #[serde(default)]
    pub bi: String,
    #[serde(default, with = "util::option_date")]
    pub data_nascimento: Option<NaiveDate>,
    pub sexo: Sex,
    #[serde(default)]
    pub estado_civil: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(with = "util::date")]
    pub data_admissao: NaiveDate,
    #[serde(default)]
    pub estado: EmployeeStatus,
    /// Photo path or URL
    #[serde(default)]
    pub foto: Option<String>,
    #[serde(default)]
    pub cargo_id: Option<i64>,
    #[serde(default)]
    pub departamento_id: Option<i64>,
    /// Present only on records served by the QR endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_tipo: Option<QrKind>,
}

impl Funcionario {
    pub fn full_name(&self) -> String {
        if self.sobrenome.is_empty() {
            self.nome.clone()
        } else {
            format!("{} {}", self.nome, self.sobrenome)
        }
    }

    pub fn is_active(&self) -> bool {
        self.estado == EmployeeStatus::Active
    }

    pub fn validate(&self) -> ModelResult<()> {
        validate_required_text(&self.nome, "nome", MAX_NAME_LEN)?;
        validate_required_text(&self.bi, "bi", MAX_SHORT_TEXT_LEN)?;
        validate_optional_email(&self.email, "email")?;
        validate_optional_text(&self.telefone, "telefone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.endereco, "endereco", MAX_ADDRESS_LEN)?;
        Ok(())
    }
}

impl Entity for Funcionario {
    const KIND: EntityKind = EntityKind::Funcionario;

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.nome.as_str(), self.sobrenome.as_str(), self.bi.as_str()];
        if let Some(email) = &self.email {
            fields.push(email);
        }
        fields
    }
}

/// Create / update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FuncionarioInput {
    pub nome: String,
    pub sobrenome: String,
    pub bi: String,
    #[serde(skip_serializing_if = "Option::is_none", with = "util::option_date", default)]
    pub data_nascimento: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexo: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado_civil: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", with = "util::option_date", default)]
    pub data_admissao: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<EmployeeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departamento_id: Option<i64>,
}

impl FuncionarioInput {
    pub fn validate(&self) -> ModelResult<()> {
        validate_required_text(&self.nome, "nome", MAX_NAME_LEN)?;
        validate_required_text(&self.sobrenome, "sobrenome", MAX_NAME_LEN)?;
        validate_required_text(&self.bi, "bi", MAX_SHORT_TEXT_LEN)?;
        validate_optional_email(&self.email, "email")?;
        validate_optional_text(&self.endereco, "endereco", MAX_ADDRESS_LEN)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_record() {
        let f: Funcionario = serde_json::from_value(json!({
            "id": 7,
            "nome": "Ana",
            "sexo": "F",
            "data_admissao": "2021-02-01T00:00:00"
        }))
        .unwrap();
        assert_eq!(f.id, 7);
        assert_eq!(f.estado, EmployeeStatus::Active);
        assert_eq!(f.data_admissao, NaiveDate::from_ymd_opt(2021, 2, 1).unwrap());
        assert!(f.qr_tipo.is_none());
    }

    #[test]
    fn test_status_is_closed() {
        let res: Result<EmployeeStatus, _> = serde_json::from_value(json!("Reformado"));
        assert!(res.is_err());
        let s: EmployeeStatus = serde_json::from_value(json!("suspenso")).unwrap();
        assert_eq!(s, EmployeeStatus::Suspended);
    }

    #[test]
    fn test_qr_kind_aliases() {
        let k: QrKind = serde_json::from_value(json!("dinamico")).unwrap();
        assert_eq!(k, QrKind::Dynamic);
        assert_eq!(serde_json::to_value(QrKind::Static).unwrap(), json!("static"));
    }

    #[test]
    fn test_input_rejects_bad_email() {
        let input = FuncionarioInput {
            nome: "Ana".into(),
            sobrenome: "Silva".into(),
            bi: "004512LA041".into(),
            email: Some("ana.silva".into()),
            ..Default::default()
        };
        assert_eq!(input.validate().unwrap_err().field(), Some("email"));
    }
}
