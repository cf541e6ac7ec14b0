//! Badge workflow against a stateful mock backend

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use iamc_client::{ClientConfig, Level, Notifier, QrBadgeManager};
use serde_json::{Value, json};
use shared::IdsRequest;
use shared::models::QrKind;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const EMPLOYEES: [(i64, &str); 4] = [(3, "Carla"), (5, "Elsa"), (9, "Ines"), (11, "Katia")];

/// Employees holding a badge, plus ids the backend refuses to issue for
#[derive(Clone, Default)]
struct BackendState {
    badged: Arc<Mutex<BTreeSet<i64>>>,
    refuse: Arc<BTreeSet<i64>>,
}

fn id_from_path(req: &Request) -> i64 {
    req.url.path().rsplit('/').next().unwrap().parse().unwrap()
}

/// Badge list uses capitalized keys, the other list lowercase ones
fn employee_json(id: i64, name: &str, capitalized: bool) -> Value {
    if capitalized {
        json!({"ID": id, "Nome": name, "Sobrenome": "Teste", "BI": format!("BI{id}"), "Sexo": "F", "Data_Admissao": "2020-01-01", "QR_Tipo": "estatico"})
    } else {
        json!({"id": id, "nome": name, "sobrenome": "Teste", "bi": format!("BI{id}"), "sexo": "F", "data_admissao": "2020-01-01"})
    }
}

async fn start_backend(state: BackendState) -> MockServer {
    let server = MockServer::start().await;

    let s = state.clone();
    Mock::given(method("GET"))
        .and(path("/qr/funcionarios"))
        .respond_with(move |_: &Request| {
            let badged = s.badged.lock().unwrap();
            let data: Vec<Value> = EMPLOYEES
                .iter()
                .filter(|(id, _)| badged.contains(id))
                .map(|(id, name)| employee_json(*id, name, true))
                .collect();
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": data}))
        })
        .mount(&server)
        .await;

    let s = state.clone();
    Mock::given(method("GET"))
        .and(path("/qr/funcionarios-sin-qr"))
        .respond_with(move |_: &Request| {
            let badged = s.badged.lock().unwrap();
            let data: Vec<Value> = EMPLOYEES
                .iter()
                .filter(|(id, _)| !badged.contains(id))
                .map(|(id, name)| employee_json(*id, name, false))
                .collect();
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": data}))
        })
        .mount(&server)
        .await;

    let s = state.clone();
    Mock::given(method("POST"))
        .and(path("/qr/generar-estatico"))
        .respond_with(move |req: &Request| {
            let body: IdsRequest = serde_json::from_slice(&req.body).unwrap();
            let mut badged = s.badged.lock().unwrap();
            let refused: Vec<i64> = body.ids.iter().copied().filter(|id| s.refuse.contains(id)).collect();
            badged.extend(body.ids.iter().copied().filter(|id| !s.refuse.contains(id)));
            if refused.is_empty() {
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "QR gerados"}))
            } else {
                ResponseTemplate::new(500).set_body_json(json!({
                    "success": false,
                    "error": format!("falha ao gerar QR para {refused:?}")
                }))
            }
        })
        .mount(&server)
        .await;

    let s = state.clone();
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/qr/eliminar/\d+$"))
        .respond_with(move |req: &Request| {
            if s.badged.lock().unwrap().remove(&id_from_path(req)) {
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "QR eliminado"}))
            } else {
                ResponseTemplate::new(404).set_body_json(json!({"success": false, "error": "Funcionario sem QR"}))
            }
        })
        .mount(&server)
        .await;

    let s = state;
    Mock::given(method("GET"))
        .and(path_regex(r"^/qr/descargar/\d+$"))
        .respond_with(move |req: &Request| {
            let id = id_from_path(req);
            if s.badged.lock().unwrap().contains(&id) {
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(format!("PNG{id}").into_bytes())
            } else {
                ResponseTemplate::new(404).set_body_json(json!({"error": "Funcionario sem QR"}))
            }
        })
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_badge_lifecycle() -> anyhow::Result<()> {
    let state = BackendState {
        refuse: Arc::new(BTreeSet::from([5])),
        ..Default::default()
    };
    let server = start_backend(state.clone()).await;
    let gateway = Arc::new(ClientConfig::new(server.uri()).build_gateway()?);
    let notifier = Notifier::new(32);
    let mut notes = notifier.subscribe();
    let manager = QrBadgeManager::new(gateway, notifier);

    manager.refresh().await?;
    {
        let mut p = manager.partitions().await;
        assert!(p.with_badge().items().is_empty());
        assert_eq!(p.without_badge().ids(), BTreeSet::from([3, 5, 9, 11]));
        p.without_badge_mut().set_all_visible(true);
    }

    // Partial failure: only what the backend actually issued moves over
    let outcome = manager.generate(&[3, 5, 9], QrKind::Static).await?;
    assert_eq!(outcome.succeeded, vec![3, 9]);
    assert_eq!(outcome.failed, vec![5]);
    assert!(outcome.backend_error.is_some());
    {
        let p = manager.partitions().await;
        assert_eq!(p.with_badge().ids(), BTreeSet::from([3, 9]));
        assert_eq!(p.without_badge().ids(), BTreeSet::from([5, 11]));
        assert_eq!(p.without_badge().selected_ids(), vec![5, 11]);
        assert_eq!(p.badge_kind(9), Some(QrKind::Static));
        assert_eq!(p.with_badge().items()[0].nome, "Carla");
    }
    let levels: Vec<Level> = std::iter::from_fn(|| notes.try_recv().ok()).map(|n| n.level).collect();
    assert!(levels.contains(&Level::Error));

    // Viewing registers a transient URL that closing revokes
    let view = manager.view(3).await?;
    assert_eq!(view.bytes(), b"PNG3");
    assert_eq!(manager.blobs().live_count(), 1);
    drop(view);
    assert_eq!(manager.blobs().live_count(), 0);

    let dir = tempfile::tempdir()?;
    let saved = manager.download(9, dir.path()).await?;
    assert_eq!(std::fs::read(saved)?, b"PNG9");
    assert_eq!(manager.blobs().live_count(), 0);

    // Delete twice: the second answer comes from the backend, not a crash
    manager.delete(3).await?;
    let again = manager.delete(3).await.unwrap_err();
    assert!(again.is_not_found());
    {
        let p = manager.partitions().await;
        assert_eq!(p.with_badge().ids(), BTreeSet::from([9]));
        assert_eq!(p.without_badge().ids(), BTreeSet::from([3, 5, 11]));
    }
    assert_eq!(*state.badged.lock().unwrap(), BTreeSet::from([9]));

    assert!(manager.view(3).await.is_err());
    assert_eq!(manager.blobs().live_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_regenerate_needs_delete_first() -> anyhow::Result<()> {
    let state = BackendState::default();
    state.badged.lock().unwrap().insert(11);
    let server = start_backend(state).await;
    let gateway = Arc::new(ClientConfig::new(server.uri()).build_gateway()?);
    let manager = QrBadgeManager::new(gateway, Notifier::default());
    manager.refresh().await?;

    let err = manager.generate(&[11], QrKind::Static).await.unwrap_err();
    assert!(err.is_validation());

    manager.delete(11).await?;
    let outcome = manager.generate(&[11], QrKind::Static).await?;
    assert!(outcome.is_complete());
    Ok(())
}
