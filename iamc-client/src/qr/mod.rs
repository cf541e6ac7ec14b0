//! QR badge lifecycle
//!
//! An employee either holds a badge (static or dynamic) or does not:
//!
//! ```text
//! NoBadge --generate(static | dynamic)--> HasBadge(kind) --delete--> NoBadge
//! ```
//!
//! There is no static <-> dynamic switch; a badge has to be deleted first.
//! The manager keeps the two partitions ("with badge", "without badge") as
//! disjoint collection controllers and re-fetches both after every backend
//! call. Outcomes are judged from the fresh partitions, never from what the
//! call was expected to do.

mod backend;
mod import;

pub use backend::{BulkOutcome, GenerateReport, ImportReport, QrBackend};
pub use import::{TEMPLATE_COLUMNS, check_import_file, csv_template};

use std::collections::BTreeSet;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashSet;
use shared::Page;
use shared::models::{Funcionario, QrKind};
use tokio::sync::{Mutex, MutexGuard};

use crate::blob::{BlobHandle, BlobStore};
use crate::collection::{Applied, CollectionController};
use crate::error::{ClientError, ClientResult};
use crate::notify::Notifier;
use crate::query::FilterValue;

const PNG: &str = "image/png";
const ARCHIVE_NAME: &str = "qr_codes.zip";

/// The two badge partitions. Their id sets never overlap.
///
/// Rows are only replaced by the manager; callers get read access plus the
/// view inputs and selection of each side.
#[derive(Debug)]
pub struct Partitions {
    with_badge: CollectionController<Funcionario>,
    without_badge: CollectionController<Funcionario>,
}

impl Partitions {
    fn new(page_size: usize) -> Self {
        Self {
            with_badge: CollectionController::client_side().with_page_size(page_size),
            without_badge: CollectionController::client_side().with_page_size(page_size),
        }
    }

    pub fn with_badge(&self) -> &CollectionController<Funcionario> {
        &self.with_badge
    }

    pub fn without_badge(&self) -> &CollectionController<Funcionario> {
        &self.without_badge
    }

    pub fn with_badge_mut(&mut self) -> PartitionMut<'_> {
        PartitionMut {
            inner: &mut self.with_badge,
        }
    }

    pub fn without_badge_mut(&mut self) -> PartitionMut<'_> {
        PartitionMut {
            inner: &mut self.without_badge,
        }
    }

    /// Kind of the badge an employee holds. Records without a kind marker
    /// count as dynamic.
    pub fn badge_kind(&self, id: i64) -> Option<QrKind> {
        self.with_badge
            .items()
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.qr_tipo.unwrap_or(QrKind::Dynamic))
    }

    fn enforce_disjoint(&mut self) {
        let badged = self.with_badge.ids();
        let before = self.without_badge.items().len();
        self.without_badge.retain_items(|f| !badged.contains(&f.id));
        let dropped = before - self.without_badge.items().len();
        if dropped > 0 {
            tracing::warn!(dropped, "employees reported in both badge partitions");
        }
    }
}

/// Selection and view inputs of one partition
#[derive(Debug)]
pub struct PartitionMut<'a> {
    inner: &'a mut CollectionController<Funcionario>,
}

impl Deref for PartitionMut<'_> {
    type Target = CollectionController<Funcionario>;

    fn deref(&self) -> &Self::Target {
        self.inner
    }
}

impl PartitionMut<'_> {
    pub fn select(&mut self, id: i64) {
        self.inner.select(id);
    }

    pub fn deselect(&mut self, id: i64) {
        self.inner.deselect(id);
    }

    pub fn toggle(&mut self, id: i64) -> bool {
        self.inner.toggle(id)
    }

    pub fn set_all_visible(&mut self, checked: bool) {
        self.inner.set_all_visible(checked);
    }

    pub fn clear_selection(&mut self) {
        self.inner.clear_selection();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.inner.set_search_term(term);
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.inner.set_filter(key, value);
    }

    pub fn clear_filters(&mut self) {
        self.inner.clear_filters();
    }

    pub fn set_page(&mut self, page: usize) {
        self.inner.set_page(page);
    }

    pub fn set_page_size(&mut self, page_size: usize) -> ClientResult<()> {
        self.inner.set_page_size(page_size)
    }
}

/// A badge image open in a viewer. Dropping it revokes the image URL.
#[derive(Debug)]
pub struct BadgeView {
    pub id: i64,
    handle: BlobHandle,
}

impl BadgeView {
    pub fn url(&self) -> String {
        self.handle.url()
    }

    pub fn bytes(&self) -> &[u8] {
        self.handle.bytes()
    }

    pub fn mime(&self) -> &'static str {
        self.handle.mime()
    }

    /// Close the viewer
    pub fn close(self) {}
}

/// Ids claimed by a running call; released on drop
struct InFlight<'a> {
    set: &'a DashSet<i64>,
    ids: Vec<i64>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        for id in &self.ids {
            self.set.remove(id);
        }
    }
}

pub struct QrBadgeManager {
    backend: Arc<dyn QrBackend>,
    partitions: Mutex<Partitions>,
    /// Held for a whole refresh, fetch included
    refresh_turn: Mutex<()>,
    in_flight: DashSet<i64>,
    blobs: BlobStore,
    notifier: Notifier,
}

impl QrBadgeManager {
    pub fn new(backend: Arc<dyn QrBackend>, notifier: Notifier) -> Self {
        Self {
            backend,
            partitions: Mutex::new(Partitions::new(crate::collection::PAGE_SIZE_OPTIONS[0])),
            refresh_turn: Mutex::new(()),
            in_flight: DashSet::new(),
            blobs: BlobStore::new(),
            notifier,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.partitions = Mutex::new(Partitions::new(page_size));
        self
    }

    pub fn with_blob_store(mut self, blobs: BlobStore) -> Self {
        self.blobs = blobs;
        self
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Both partitions, for reading rows and editing selections
    pub async fn partitions(&self) -> MutexGuard<'_, Partitions> {
        self.partitions.lock().await
    }

    pub fn is_busy(&self, id: i64) -> bool {
        self.in_flight.contains(&id)
    }

    fn claim(&self, ids: &[i64]) -> ClientResult<InFlight<'_>> {
        let mut claimed = InFlight {
            set: &self.in_flight,
            ids: Vec::with_capacity(ids.len()),
        };
        let mut busy = Vec::new();
        for &id in ids {
            if self.in_flight.insert(id) {
                claimed.ids.push(id);
            } else {
                busy.push(id);
            }
        }
        if busy.is_empty() {
            Ok(claimed)
        } else {
            tracing::debug!(?busy, "duplicate badge submission ignored");
            Err(ClientError::Busy(busy))
        }
    }

    /// Re-fetch both partitions.
    ///
    /// Refreshes run one after another, so a refresh started after a
    /// mutation always applies rows fetched after that mutation. Only a
    /// failure that was actually applied is reported.
    pub async fn refresh(&self) -> ClientResult<()> {
        let _turn = self.refresh_turn.lock().await;
        let (with_ticket, without_ticket) = {
            let mut p = self.partitions.lock().await;
            (p.with_badge.begin_fetch(), p.without_badge.begin_fetch())
        };
        let (with, without) = tokio::join!(
            self.backend.list_with_badge(),
            self.backend.list_without_badge()
        );

        let mut p = self.partitions.lock().await;
        let mut failure = None;
        match with {
            Ok(rows) => {
                p.with_badge.apply_page(with_ticket, Page::single(rows));
            }
            Err(e) => {
                if p.with_badge.apply_failure(with_ticket, &e) == Applied::Fresh {
                    failure = Some(e);
                }
            }
        }
        match without {
            Ok(rows) => {
                p.without_badge.apply_page(without_ticket, Page::single(rows));
            }
            Err(e) => {
                if p.without_badge.apply_failure(without_ticket, &e) == Applied::Fresh {
                    failure = failure.or(Some(e));
                }
            }
        }
        p.enforce_disjoint();
        tracing::debug!(
            with_badge = p.with_badge.items().len(),
            without_badge = p.without_badge.items().len(),
            "badge partitions refreshed"
        );

        match failure {
            Some(e) => {
                self.notifier.error(format!("Falha ao atualizar listas de QR: {e}"));
                Err(e)
            }
            None => Ok(()),
        }
    }

    /// Refresh after a mutation. A failed refresh leaves the previous rows in
    /// place; its message is returned so it can be reported with the outcome.
    async fn refresh_after(&self) -> Option<String> {
        self.refresh().await.err().map(|e| e.to_string())
    }

    /// Issue badges of `kind` for `ids`.
    ///
    /// Refused before any request when `ids` is empty, when one of them
    /// already holds a badge, or when one of them is part of a call still in
    /// flight. Once the request is sent the call returns `Ok` with the outcome
    /// measured on the refreshed partitions, including partial failure.
    pub async fn generate(&self, ids: &[i64], kind: QrKind) -> ClientResult<BulkOutcome> {
        let ids: Vec<i64> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        if ids.is_empty() {
            return Err(ClientError::validation("select at least one employee"));
        }
        {
            let p = self.partitions.lock().await;
            let badged: Vec<i64> = ids.iter().copied().filter(|id| p.with_badge.contains(*id)).collect();
            if !badged.is_empty() {
                return Err(ClientError::validation(format!(
                    "employees {badged:?} already hold a badge; delete it first"
                )));
            }
        }
        let _claim = self.claim(&ids)?;

        tracing::info!(?ids, %kind, "generating badges");
        let call = self.backend.generate(&ids, kind).await;
        let mut backend_error = call.as_ref().err().map(ToString::to_string);
        if let Some(refresh_error) = self.refresh_after().await {
            backend_error.get_or_insert(refresh_error);
        }

        let mut p = self.partitions.lock().await;
        let (succeeded, failed): (Vec<i64>, Vec<i64>) =
            ids.iter().copied().partition(|id| p.with_badge.contains(*id));
        p.without_badge.deselect_many(succeeded.iter().copied());
        drop(p);

        let outcome = BulkOutcome {
            succeeded,
            failed,
            backend_error,
        };
        self.report("generate", &outcome, |n| format!("{n} QR ({kind}) gerado(s)"));
        Ok(outcome)
    }

    /// Fetch a badge image and register it for display
    pub async fn view(&self, id: i64) -> ClientResult<BadgeView> {
        let bytes = self.badge_bytes(id).await?;
        Ok(BadgeView {
            id,
            handle: self.blobs.register(bytes, PNG),
        })
    }

    /// Save a badge as `qr_{id}.png` in `dir`
    pub async fn download(&self, id: i64, dir: &Path) -> ClientResult<PathBuf> {
        let bytes = self.badge_bytes(id).await?;
        let handle = self.blobs.register(bytes, PNG);
        let target = dir.join(format!("qr_{id}.png"));
        let written = tokio::fs::write(&target, handle.bytes()).await;
        handle.revoke();
        written.inspect_err(|e| {
            self.notifier.error(format!("Falha ao guardar QR {id}: {e}"));
        })?;
        tracing::info!(id, path = %target.display(), "badge saved");
        Ok(target)
    }

    /// Save the badges of `ids` as one archive, `qr_codes.zip`, in `dir`
    pub async fn download_many(&self, ids: &[i64], dir: &Path) -> ClientResult<PathBuf> {
        if ids.is_empty() {
            return Err(ClientError::validation("select at least one employee"));
        }
        let bytes = self.backend.badge_archive(ids).await.inspect_err(|e| {
            self.notifier.error(format!("Falha ao descarregar QR: {e}"));
        })?;
        let target = dir.join(ARCHIVE_NAME);
        tokio::fs::write(&target, &bytes).await?;
        tracing::info!(count = ids.len(), path = %target.display(), "badge archive saved");
        Ok(target)
    }

    async fn badge_bytes(&self, id: i64) -> ClientResult<Vec<u8>> {
        self.backend.badge_image(id).await.inspect_err(|e| {
            self.notifier.error(format!("Falha ao obter QR {id}: {e}"));
        })
    }

    /// Delete one badge. Whatever the backend answers is returned; the
    /// partitions are refreshed either way.
    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        let _claim = self.claim(&[id])?;
        let call = self.backend.delete_badge(id).await;
        self.refresh_after().await;

        let mut p = self.partitions.lock().await;
        if !p.with_badge.contains(id) {
            p.with_badge.deselect(id);
        }
        drop(p);

        match call {
            Ok(()) => {
                tracing::info!(id, "badge deleted");
                self.notifier.success(format!("QR do funcionario {id} eliminado"));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "badge delete failed");
                self.notifier.error(format!("Falha ao eliminar QR {id}: {e}"));
                Err(e)
            }
        }
    }

    /// Delete several badges, one request each. An id counts as deleted when
    /// its request was accepted and it is gone from the refreshed badge list.
    pub async fn delete_many(&self, ids: &[i64]) -> ClientResult<BulkOutcome> {
        let ids: Vec<i64> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        if ids.is_empty() {
            return Err(ClientError::validation("select at least one employee"));
        }
        let _claim = self.claim(&ids)?;

        let mut rejected = BTreeSet::new();
        let mut errors = Vec::new();
        for &id in &ids {
            if let Err(e) = self.backend.delete_badge(id).await {
                tracing::warn!(id, error = %e, "badge delete failed");
                rejected.insert(id);
                errors.push(format!("{id}: {e}"));
            }
        }
        if let Some(refresh_error) = self.refresh_after().await {
            errors.push(refresh_error);
        }

        let mut p = self.partitions.lock().await;
        let (succeeded, failed): (Vec<i64>, Vec<i64>) = ids
            .iter()
            .copied()
            .partition(|id| !rejected.contains(id) && !p.with_badge.contains(*id));
        p.with_badge.deselect_many(succeeded.iter().copied());
        drop(p);

        let outcome = BulkOutcome {
            succeeded,
            failed,
            backend_error: (!errors.is_empty()).then(|| errors.join("; ")),
        };
        self.report("delete", &outcome, |n| format!("{n} QR eliminado(s)"));
        Ok(outcome)
    }

    /// Upload an employee list, then refresh both partitions
    pub async fn import_employees(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<ImportReport> {
        check_import_file(file_name, &bytes)?;
        let call = self.backend.import_employees(file_name, bytes).await;
        self.refresh_after().await;
        match call {
            Ok(report) => {
                tracing::info!(file_name, imported = ?report.imported, errors = report.errors.len(), "employees imported");
                let message = report
                    .message
                    .clone()
                    .unwrap_or_else(|| "Importacao concluida".to_string());
                if report.errors.is_empty() {
                    self.notifier.success(message);
                } else {
                    self.notifier.warning(format!("{message} ({} linha(s) com erro)", report.errors.len()));
                }
                Ok(report)
            }
            Err(e) => {
                self.notifier.error(format!("Falha ao importar {file_name}: {e}"));
                Err(e)
            }
        }
    }

    fn report(&self, op: &str, outcome: &BulkOutcome, success: impl FnOnce(usize) -> String) {
        if !outcome.succeeded.is_empty() {
            self.notifier.success(success(outcome.succeeded.len()));
        }
        if !outcome.is_complete() {
            tracing::warn!(op, failed = ?outcome.failed, error = ?outcome.backend_error, "bulk badge call incomplete");
            let mut message = if outcome.failed.is_empty() {
                format!("Operacao {op} incompleta")
            } else {
                format!("Operacao {op} falhou para {:?}", outcome.failed)
            };
            if let Some(reason) = &outcome.backend_error {
                message.push_str(": ");
                message.push_str(reason);
            }
            self.notifier.error(message);
        }
    }
}
