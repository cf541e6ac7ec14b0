//! Demonstration dataset
//!
//! Shown by list views configured with a fallback when the backend cannot be
//! reached on first load. Always flagged as demo data by the controller.

use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{Cargo, Departamento, EmployeeStatus, Funcionario, Sex};
use shared::{Entity, EntityKind};

const PEOPLE: [(&str, &str, Sex); 25] = [
    ("Ana", "Silva", Sex::Female),
    ("Bruno", "Costa", Sex::Male),
    ("Carla", "Mendes", Sex::Female),
    ("Daniel", "Neto", Sex::Male),
    ("Elsa", "Tavares", Sex::Female),
    ("Fernando", "Gomes", Sex::Male),
    ("Graca", "Lopes", Sex::Female),
    ("Helder", "Pinto", Sex::Male),
    ("Ines", "Cardoso", Sex::Female),
    ("Joao", "Silva", Sex::Male),
    ("Katia", "Ramos", Sex::Female),
    ("Luis", "Monteiro", Sex::Male),
    ("Marta", "Rocha", Sex::Female),
    ("Nuno", "Ferreira", Sex::Male),
    ("Olga", "Teixeira", Sex::Female),
    ("Paulo", "Correia", Sex::Male),
    ("Quiteria", "Vaz", Sex::Female),
    ("Rui", "Moreira", Sex::Male),
    ("Sara", "Domingos", Sex::Female),
    ("Tiago", "Lourenco", Sex::Male),
    ("Urbana", "Fonseca", Sex::Female),
    ("Vitor", "Baptista", Sex::Male),
    ("Wanda", "Sebastiao", Sex::Female),
    ("Xavier", "Miranda", Sex::Male),
    ("Yolanda", "Cunha", Sex::Female),
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn funcionarios() -> Vec<Funcionario> {
    PEOPLE
        .iter()
        .enumerate()
        .map(|(i, (nome, sobrenome, sexo))| {
            let n = i as i64 + 1;
            let departamento_id = n % 4 + 1;
            Funcionario {
                id: n,
                nome: nome.to_string(),
                sobrenome: sobrenome.to_string(),
                bi: format!("00{:04}LA0{:02}", 1000 + n * 37, n),
                data_nascimento: Some(date(1980 + (i as i32 % 15), (i as u32 % 12) + 1, 10)),
                sexo: *sexo,
                estado_civil: Some(if i % 3 == 0 { "Casado(a)" } else { "Solteiro(a)" }.to_string()),
                email: Some(format!(
                    "{}.{}@iamc.ao",
                    nome.to_lowercase(),
                    sobrenome.to_lowercase()
                )),
                telefone: Some(format!("+244 923 {:03} {:03}", 100 + n, 500 + n)),
                endereco: Some("Luanda".to_string()),
                data_admissao: date(2015 + (i as i32 % 9), (i as u32 % 12) + 1, 1),
                estado: if n % 10 == 0 {
                    EmployeeStatus::Inactive
                } else {
                    EmployeeStatus::Active
                },
                foto: None,
                cargo_id: Some(departamento_id * 2 - (n % 2)),
                departamento_id: Some(departamento_id),
                qr_tipo: None,
            }
        })
        .collect()
}

pub fn departamentos() -> Vec<Departamento> {
    [
        ("Recursos Humanos", "Gestao de pessoal"),
        ("Financas", "Contabilidade e tesouraria"),
        ("Tecnologia", "Sistemas e suporte"),
        ("Operacoes", "Logistica e manutencao"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (nome, descricao))| Departamento {
        id: i as i64 + 1,
        nome: nome.to_string(),
        descricao: Some(descricao.to_string()),
    })
    .collect()
}

pub fn cargos() -> Vec<Cargo> {
    [
        ("Tecnico de RH", "Junior", 1),
        ("Gestor de RH", "Senior", 1),
        ("Contabilista", "Pleno", 2),
        ("Director Financeiro", "Senior", 2),
        ("Programador", "Pleno", 3),
        ("Administrador de Sistemas", "Senior", 3),
        ("Motorista", "Junior", 4),
        ("Chefe de Operacoes", "Senior", 4),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (nome, nivel, departamento_id))| Cargo {
        id: i as i64 + 1,
        nome: nome.to_string(),
        descricao: String::new(),
        nivel: Some(nivel.to_string()),
        departamento_id: Some(departamento_id),
    })
    .collect()
}

/// Demonstration rows for `T`, if the dataset covers its kind
pub fn rows_for<T: Entity>() -> Option<Vec<T>> {
    fn retype<S: Serialize, T: Entity>(rows: Vec<S>) -> Option<Vec<T>> {
        let value = serde_json::to_value(rows).ok()?;
        serde_json::from_value(value).ok()
    }
    match T::KIND {
        EntityKind::Funcionario => retype(funcionarios()),
        EntityKind::Departamento => retype(departamentos()),
        EntityKind::Cargo => retype(cargos()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_shape() {
        let rows = funcionarios();
        assert_eq!(rows.len(), 25);
        let silva = rows
            .iter()
            .filter(|f| f.search_text().iter().any(|s| s.to_lowercase().contains("silva")))
            .count();
        assert_eq!(silva, 2);
        assert!(rows.iter().all(|f| f.validate().is_ok()));

        let departamentos = departamentos();
        for f in &rows {
            let dep = f.departamento_id.unwrap();
            assert!(departamentos.iter().any(|d| d.id == dep));
            let cargo = cargos().into_iter().find(|c| Some(c.id) == f.cargo_id).unwrap();
            assert_eq!(cargo.departamento_id, Some(dep));
        }
    }

    #[test]
    fn test_rows_for_kind() {
        assert_eq!(rows_for::<Departamento>().unwrap(), departamentos());
        assert!(rows_for::<shared::models::Licenca>().is_none());
    }
}
