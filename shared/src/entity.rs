//! Entity kinds and the trait every HR record implements

use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// The nine HR record kinds served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Funcionario,
    Departamento,
    Cargo,
    Presenca,
    Licenca,
    Avaliacao,
    FolhaSalarial,
    Beneficio,
    FuncionarioBeneficio,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Funcionario,
        EntityKind::Departamento,
        EntityKind::Cargo,
        EntityKind::Presenca,
        EntityKind::Licenca,
        EntityKind::Avaliacao,
        EntityKind::FolhaSalarial,
        EntityKind::Beneficio,
        EntityKind::FuncionarioBeneficio,
    ];

    /// Path segment under `/api/iamc/`
    pub fn path(&self) -> &'static str {
        match self {
            Self::Funcionario => "funcionarios",
            Self::Departamento => "departamentos",
            Self::Cargo => "cargos",
            Self::Presenca => "presencas",
            Self::Licenca => "licencas",
            Self::Avaliacao => "avaliacoes",
            Self::FolhaSalarial => "folha-salarial",
            Self::Beneficio => "beneficios",
            Self::FuncionarioBeneficio => "funcionario-beneficios",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Funcionario => "funcionario",
            Self::Departamento => "departamento",
            Self::Cargo => "cargo",
            Self::Presenca => "presenca",
            Self::Licenca => "licenca",
            Self::Avaliacao => "avaliacao",
            Self::FolhaSalarial => "folha_salarial",
            Self::Beneficio => "beneficio",
            Self::FuncionarioBeneficio => "funcionario_beneficio",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A backend-owned HR record.
///
/// Client copies are advisory: they are replaced wholesale on every fetch and
/// never patched in place.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> i64;

    /// Text fields matched by the free-text search box.
    fn search_text(&self) -> Vec<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_unique() {
        let mut paths: Vec<_> = EntityKind::ALL.iter().map(|k| k.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), EntityKind::ALL.len());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EntityKind::FolhaSalarial).unwrap();
        assert_eq!(json, "\"folha_salarial\"");
    }
}
