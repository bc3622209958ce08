//! Sync engine: pulls scans from the server and reconciles the local session.
//!
//! The engine is driven one `tick` at a time. Every method takes `&mut self`,
//! so a tick (including its network awaits) finishes before the next one can
//! start and nothing else can touch the session underneath it.

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::api::{HourlyStats, ScanApi};
use crate::cache::LocalCache;
use crate::error::{Error, Result};
use crate::gate::ConfirmationGate;
use crate::models::{ScanCandidate, ScanId, ScanRecord};
use crate::policy::{classify, Classification};

/// How a new scan was classified, for audio/flash feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanEventKind {
    Recognized,
    New,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanEvent {
    pub kind: ScanEventKind,
    pub data: String,
    pub scan_count: Option<u32>,
}

/// Result of feeding one candidate through the ingestion policy
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Payload already cached
    Ignored,
    /// Recognized product saved and cached
    Persisted(ScanRecord),
    /// Unknown product now waiting for confirmation
    Escalated,
    /// Unknown product dropped because another confirmation is pending
    Suppressed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Confirmation pending or cooling down; nothing fetched
    Skipped,
    /// Server had no new scan
    NoCandidate,
    Ingested(IngestOutcome),
}

/// Client-side state owned by the engine: the cache and the gate.
#[derive(Debug, Default)]
pub struct Session {
    cache: LocalCache,
    gate: ConfirmationGate,
    loaded: bool,
}

impl Session {
    #[must_use]
    pub fn new(gate: ConfirmationGate) -> Self {
        Self {
            cache: LocalCache::new(),
            gate,
            loaded: false,
        }
    }

    #[must_use]
    pub const fn cache(&self) -> &LocalCache {
        &self.cache
    }

    #[must_use]
    pub const fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    /// Whether the cache holds a server snapshot yet.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }
}

pub struct SyncEngine<A> {
    api: A,
    session: Session,
    events: Option<mpsc::UnboundedSender<ScanEvent>>,
}

impl<A: ScanApi> SyncEngine<A> {
    pub fn new(api: A, session: Session) -> Self {
        Self {
            api,
            session,
            events: None,
        }
    }

    /// Receive a `ScanEvent` for every scan that is auto-saved or escalated.
    ///
    /// Replaces any earlier subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ScanEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.events = Some(sender);
        receiver
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn cache(&self) -> &LocalCache {
        &self.session.cache
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Replace the cache with the server's full history.
    pub async fn load(&mut self) -> Result<usize> {
        let records = self.api.fetch_history().await?;
        let count = records.len();
        self.session.cache.load_all(records);
        self.session.loaded = true;
        tracing::info!("Loaded {count} scans from server");
        Ok(count)
    }

    /// Reload after an external change such as a bulk clear elsewhere.
    pub async fn refresh(&mut self) -> Result<usize> {
        self.load().await
    }

    /// Run one polling step.
    ///
    /// Until the history has been loaded, each tick retries the load first
    /// so dedup never runs against an empty cache.
    pub async fn tick(&mut self) -> Result<TickOutcome> {
        if self.session.gate.is_busy(Instant::now()) {
            return Ok(TickOutcome::Skipped);
        }

        if !self.session.loaded {
            self.load().await?;
        }

        let candidates = self.api.fetch_latest().await?;
        let mut candidates = candidates.into_iter();
        let Some(candidate) = candidates.next() else {
            return Ok(TickOutcome::NoCandidate);
        };
        if !candidates.as_slice().is_empty() {
            tracing::debug!(
                "Server reported {} extra scans; using the first",
                candidates.len()
            );
        }

        self.ingest(candidate).await.map(TickOutcome::Ingested)
    }

    /// Classify a candidate and act on it.
    ///
    /// Recognized products are saved even while a confirmation is pending;
    /// only escalation is exclusive.
    pub async fn ingest(&mut self, candidate: ScanCandidate) -> Result<IngestOutcome> {
        match classify(&self.session.cache, candidate) {
            Classification::Ignore => Ok(IngestOutcome::Ignored),
            Classification::AutoPersist(candidate) => {
                self.emit(ScanEventKind::Recognized, &candidate);
                let record = self.persist(&candidate).await?;
                Ok(IngestOutcome::Persisted(record))
            }
            Classification::Escalate(candidate) => {
                if self.session.gate.is_awaiting() {
                    tracing::debug!(
                        "Confirmation pending; dropping unknown scan {}",
                        candidate.data
                    );
                    return Ok(IngestOutcome::Suppressed);
                }
                self.emit(ScanEventKind::New, &candidate);
                tracing::info!("Unknown scan {} needs confirmation", candidate.data);
                self.session.gate.open(candidate)?;
                Ok(IngestOutcome::Escalated)
            }
        }
    }

    /// Operator-initiated escalation of an arbitrary candidate.
    pub fn open(&mut self, candidate: ScanCandidate) -> Result<()> {
        self.session.gate.open(candidate)
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> Result<()> {
        self.session.gate.set_label(label)
    }

    /// Accept the pending scan and save it.
    ///
    /// If saving fails the scan goes back into the gate with the chosen
    /// label, so the operator can retry.
    pub async fn resolve_accept(&mut self, label: &str) -> Result<ScanRecord> {
        let candidate = self.session.gate.resolve_accept(label, Instant::now())?;
        match self.persist(&candidate).await {
            Ok(record) => Ok(record),
            Err(error) => {
                if let Err(reopen_error) = self.session.gate.open(candidate) {
                    tracing::warn!("Failed to restore pending scan: {reopen_error}");
                }
                Err(error)
            }
        }
    }

    pub fn resolve_ignore(&mut self) -> Result<ScanCandidate> {
        let candidate = self.session.gate.resolve_ignore(Instant::now())?;
        tracing::info!("Ignored scan {}", candidate.data);
        Ok(candidate)
    }

    /// Delete a scan on the server, then locally.
    ///
    /// An id the server no longer knows counts as deleted. Any other failure
    /// leaves the cache untouched.
    pub async fn delete(&mut self, id: ScanId) -> Result<Option<ScanRecord>> {
        match self.api.delete(id).await {
            Ok(()) => {}
            Err(Error::NotFound(_)) => {
                tracing::debug!("Scan {id} already gone on server");
            }
            Err(error) => return Err(error),
        }

        let removed = self.session.cache.remove(id);
        tracing::info!("Deleted scan {id}");
        Ok(removed)
    }

    /// Delete every scan on the server, then empty the cache.
    pub async fn clear_all(&mut self) -> Result<()> {
        self.api.delete_all().await?;
        self.session.cache.clear_all();
        tracing::info!("Cleared all scans");
        Ok(())
    }

    pub async fn hourly_stats(&self) -> Result<HourlyStats> {
        self.api.hourly_stats().await
    }

    async fn persist(&mut self, candidate: &ScanCandidate) -> Result<ScanRecord> {
        let record = self.api.persist(candidate).await.inspect_err(|error| {
            tracing::warn!("Failed to save scan {}: {error}", candidate.data);
        })?;
        self.session.cache.insert(record.clone());
        tracing::info!(
            "Saved scan {} as #{} ({})",
            record.data,
            record.id,
            record.display_name()
        );
        Ok(record)
    }

    fn emit(&self, kind: ScanEventKind, candidate: &ScanCandidate) {
        if let Some(sender) = &self.events {
            let _ = sender.send(ScanEvent {
                kind,
                data: candidate.data.clone(),
                scan_count: candidate.scan_count,
            });
        }
    }
}
