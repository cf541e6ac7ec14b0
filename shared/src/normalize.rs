//! Field-casing normalization
//!
//! The backend returns the same record with lowercase keys on some endpoints
//! and capitalized keys on others (`nome` vs `Nome`, `departamento_id` vs
//! `Departamento_ID`). Every raw object goes through [`normalize`] once, at
//! the gateway, so the rest of the client only sees canonical keys.
//!
//! Rules per known field:
//! - a canonical key that is present and non-null wins;
//! - otherwise the first alias that is present and non-null is copied in;
//! - original keys are never removed.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::entity::EntityKind;
use crate::error::{ModelError, ModelResult};

/// One canonical field and the alternative spellings the backend uses for it
#[derive(Debug, Clone, Copy)]
pub struct FieldAlias {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

const fn field(canonical: &'static str, aliases: &'static [&'static str]) -> FieldAlias {
    FieldAlias { canonical, aliases }
}

const ID: FieldAlias = field("id", &["ID", "Id"]);
const FUNCIONARIO_ID: FieldAlias = field(
    "funcionario_id",
    &["Funcionario_ID", "FuncionarioID", "Funcionario_Id", "ID_Funcionario"],
);
const NOME: FieldAlias = field("nome", &["Nome"]);

const FUNCIONARIO: &[FieldAlias] = &[
    ID,
    NOME,
    field("sobrenome", &["Sobrenome", "Apelido"]),
    field("bi", &["BI", "Bi"]),
    field("data_nascimento", &["Data_Nascimento", "DataNascimento"]),
    field("sexo", &["Sexo"]),
    field("estado_civil", &["Estado_Civil", "EstadoCivil"]),
    field("email", &["Email", "EMail"]),
    field("telefone", &["Telefone"]),
    field("endereco", &["Endereco"]),
    field("data_admissao", &["Data_Admissao", "DataAdmissao"]),
    field("estado", &["Estado", "Status"]),
    field("foto", &["Foto"]),
    field("cargo_id", &["Cargo_ID", "CargoID", "Cargo_Id"]),
    field("departamento_id", &["Departamento_ID", "DepartamentoID", "Departamento_Id"]),
    field("qr_tipo", &["QR_Tipo", "Tipo_QR", "tipo_qr"]),
];

const DEPARTAMENTO: &[FieldAlias] = &[ID, NOME, field("descricao", &["Descricao"])];

const CARGO: &[FieldAlias] = &[
    ID,
    NOME,
    field("descricao", &["Descricao"]),
    field("nivel", &["Nivel"]),
    field("departamento_id", &["Departamento_ID", "DepartamentoID", "Departamento_Id"]),
];

const PRESENCA: &[FieldAlias] = &[
    ID,
    FUNCIONARIO_ID,
    field("data", &["Data"]),
    field("hora_entrada", &["Hora_Entrada", "HoraEntrada"]),
    field("hora_saida", &["Hora_Saida", "HoraSaida"]),
    field("observacao", &["Observacao", "Obs"]),
];

const LICENCA: &[FieldAlias] = &[
    ID,
    FUNCIONARIO_ID,
    field("tipo", &["Tipo", "Tipo_Licenca"]),
    field("data_inicio", &["Data_Inicio", "DataInicio"]),
    field("data_fim", &["Data_Fim", "DataFim"]),
    field("motivo", &["Motivo"]),
    field("estado", &["Estado", "Status"]),
];

const AVALIACAO: &[FieldAlias] = &[
    ID,
    FUNCIONARIO_ID,
    field("data_avaliacao", &["Data_Avaliacao", "DataAvaliacao"]),
    field("assiduidade", &["Assiduidade"]),
    field("competencia_tecnica", &["Competencia_Tecnica", "CompetenciaTecnica"]),
    field("soft_skills", &["Soft_Skills", "SoftSkills"]),
    field("comentarios", &["Comentarios"]),
];

const FOLHA_SALARIAL: &[FieldAlias] = &[
    ID,
    FUNCIONARIO_ID,
    field("periodo_inicio", &["Periodo_Inicio", "PeriodoInicio"]),
    field("periodo_fim", &["Periodo_Fim", "PeriodoFim"]),
    field("salario_base", &["Salario_Base", "SalarioBase"]),
    field("bonus", &["Bonus"]),
    field("descontos", &["Descontos"]),
    field("data_pagamento", &["Data_Pagamento", "DataPagamento"]),
];

const BENEFICIO: &[FieldAlias] = &[
    ID,
    NOME,
    field("descricao", &["Descricao"]),
    field("tipo", &["Tipo"]),
];

const FUNCIONARIO_BENEFICIO: &[FieldAlias] = &[
    ID,
    FUNCIONARIO_ID,
    field("beneficio_id", &["Beneficio_ID", "BeneficioID", "Beneficio_Id"]),
    field("data_inicio", &["Data_Inicio", "DataInicio"]),
    field("data_fim", &["Data_Fim", "DataFim"]),
    field("estado", &["Estado", "Status"]),
];

/// Mapping table for an entity kind
pub fn field_map(kind: EntityKind) -> &'static [FieldAlias] {
    match kind {
        EntityKind::Funcionario => FUNCIONARIO,
        EntityKind::Departamento => DEPARTAMENTO,
        EntityKind::Cargo => CARGO,
        EntityKind::Presenca => PRESENCA,
        EntityKind::Licenca => LICENCA,
        EntityKind::Avaliacao => AVALIACAO,
        EntityKind::FolhaSalarial => FOLHA_SALARIAL,
        EntityKind::Beneficio => BENEFICIO,
        EntityKind::FuncionarioBeneficio => FUNCIONARIO_BENEFICIO,
    }
}

fn present(map: &Map<String, Value>, key: &str) -> Option<Value> {
    map.get(key).filter(|v| !v.is_null()).cloned()
}

/// Normalize one raw backend object into canonical keys.
///
/// The output keeps every original key, so older render paths that still
/// read `Nome` keep working.
pub fn normalize(kind: EntityKind, raw: &Value) -> ModelResult<Map<String, Value>> {
    let Value::Object(source) = raw else {
        return Err(ModelError::malformed(
            kind.label(),
            format!("expected object, got {}", type_name(raw)),
        ));
    };

    let mut out = source.clone();
    for f in field_map(kind) {
        if present(source, f.canonical).is_some() {
            continue;
        }
        if let Some(v) = f.aliases.iter().find_map(|alias| present(source, alias)) {
            out.insert(f.canonical.to_string(), v);
        }
    }
    Ok(out)
}

/// Normalize and decode into the typed entity.
pub fn normalize_into<T: DeserializeOwned>(kind: EntityKind, raw: &Value) -> ModelResult<T> {
    let map = normalize(kind, raw)?;
    serde_json::from_value(Value::Object(map)).map_err(|e| {
        tracing::warn!(kind = %kind, error = %e, "normalized payload failed to decode");
        ModelError::malformed(kind.label(), e.to_string())
    })
}

/// Normalize every element of a JSON array. One bad item fails the batch.
pub fn normalize_all<T: DeserializeOwned>(kind: EntityKind, raw: &[Value]) -> ModelResult<Vec<T>> {
    raw.iter().map(|item| normalize_into(kind, item)).collect()
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Funcionario, QrKind};
    use serde_json::json;

    fn lowercase_payload() -> Value {
        json!({
            "id": 42,
            "nome": "Maria",
            "sobrenome": "Silva",
            "bi": "001234567LA042",
            "sexo": "F",
            "email": "maria.silva@iamc.ao",
            "data_admissao": "2020-03-10",
            "estado": "Ativo",
            "departamento_id": 2,
            "cargo_id": 5
        })
    }

    fn capitalized_payload() -> Value {
        json!({
            "ID": 42,
            "Nome": "Maria",
            "Sobrenome": "Silva",
            "BI": "001234567LA042",
            "Sexo": "F",
            "Email": "maria.silva@iamc.ao",
            "Data_Admissao": "2020-03-10T00:00:00",
            "Estado": "Ativo",
            "Departamento_ID": 2,
            "Cargo_ID": 5,
            "QR_Tipo": "dinamico"
        })
    }

    #[test]
    fn test_both_casings_yield_same_entity() {
        let lower: Funcionario = normalize_into(EntityKind::Funcionario, &lowercase_payload()).unwrap();
        let upper: Funcionario = normalize_into(EntityKind::Funcionario, &capitalized_payload()).unwrap();

        // qr_tipo only exists in the capitalized variant
        assert_eq!(upper.qr_tipo, Some(QrKind::Dynamic));
        assert_eq!(lower.qr_tipo, None);
        let upper = Funcionario { qr_tipo: None, ..upper };
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_canonical_key_wins_over_alias() {
        let raw = json!({"id": 1, "nome": "Explicit", "Nome": "Alias"});
        let map = normalize(EntityKind::Departamento, &raw).unwrap();
        assert_eq!(map["nome"], json!("Explicit"));
    }

    #[test]
    fn test_null_canonical_falls_back_to_alias() {
        let raw = json!({"id": 1, "nome": null, "Nome": "Alias"});
        let map = normalize(EntityKind::Departamento, &raw).unwrap();
        assert_eq!(map["nome"], json!("Alias"));
    }

    #[test]
    fn test_original_keys_retained() {
        let map = normalize(EntityKind::Funcionario, &capitalized_payload()).unwrap();
        assert_eq!(map["Nome"], json!("Maria"));
        assert_eq!(map["nome"], json!("Maria"));
        assert_eq!(map["departamento_id"], json!(2));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = normalize(EntityKind::Cargo, &json!([1, 2])).unwrap_err();
        assert!(matches!(err, ModelError::Malformed { .. }));
    }

    #[test]
    fn test_every_kind_maps_id() {
        for kind in EntityKind::ALL {
            assert!(field_map(kind).iter().any(|f| f.canonical == "id"), "{kind}");
        }
    }
}
