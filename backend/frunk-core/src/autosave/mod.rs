//! Per-note debounced autosave.
//!
//! Each edit to a note (re)starts a quiet-period timer keyed by the note id.
//! When the timer runs out the latest snapshot is persisted.
//!
//! # Persist lanes
//!
//! Every note has a lane (an async mutex). Persists for one note run one at a
//! time through its lane, so a timer that fires while an earlier request for
//! the same note is still in flight waits for it and then sends the newer
//! snapshot. Notes do not block each other.
//!
//! A timer can be cancelled only while it is still waiting. Once its persist
//! has started it runs to completion.

use crate::error::api::ApiError;

use common::{Note, NoteDraft, NoteId};

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, trace, warn};
use tokio::sync::{Mutex as AsyncMutex, mpsc, oneshot};

/// Backend that stores a note snapshot.
pub trait PersistNote: Send + Sync + 'static {
    fn persist(
        &self,
        note_id: NoteId,
        draft: NoteDraft,
    ) -> impl Future<Output = Result<Option<Note>, ApiError>> + Send;
}

/// Outcome of a background persist.
#[derive(Debug)]
pub struct AutosaveEvent {
    pub note_id: NoteId,
    pub outcome: Result<Option<Note>, ApiError>,
}

struct PendingSave {
    generation: u64,
    draft: NoteDraft,
    cancel: oneshot::Sender<()>,
}

#[derive(Default)]
struct Lanes {
    pending: Mutex<HashMap<NoteId, PendingSave>>,
    lanes: Mutex<HashMap<NoteId, Arc<AsyncMutex<()>>>>,
    in_flight: Mutex<HashMap<NoteId, usize>>,
    next_generation: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Lanes {
    fn lane(&self, note_id: NoteId) -> Arc<AsyncMutex<()>> {
        Arc::clone(lock(&self.lanes).entry(note_id).or_default())
    }

    /// Drop the note's lane once no persist holds or waits on it.
    ///
    /// Clones are only handed out under the map lock, so a count of one
    /// under that lock means the map holds the last reference.
    fn release_lane(&self, note_id: NoteId, lane: Arc<AsyncMutex<()>>) {
        let mut lanes = lock(&self.lanes);
        drop(lane);
        if lanes
            .get(&note_id)
            .is_some_and(|held| Arc::strong_count(held) == 1)
        {
            lanes.remove(&note_id);
        }
    }

    fn take_pending(&self, note_id: NoteId) -> Option<PendingSave> {
        lock(&self.pending).remove(&note_id)
    }

    /// Remove the pending entry if it still belongs to `generation`.
    fn claim(&self, note_id: NoteId, generation: u64) -> Option<NoteDraft> {
        let mut pending = lock(&self.pending);
        match pending.get(&note_id) {
            Some(save) if save.generation == generation => {
                pending.remove(&note_id).map(|save| save.draft)
            }
            _ => None,
        }
    }

    fn set_in_flight(&self, note_id: NoteId, delta: isize) {
        let mut in_flight = lock(&self.in_flight);
        let count = in_flight.entry(note_id).or_insert(0);
        *count = count.saturating_add_signed(delta);
        if *count == 0 {
            in_flight.remove(&note_id);
        }
    }

    async fn run<P: PersistNote>(
        &self,
        persister: &P,
        note_id: NoteId,
        draft: NoteDraft,
    ) -> Result<Option<Note>, ApiError> {
        let lane = self.lane(note_id);
        self.set_in_flight(note_id, 1);
        let outcome = {
            let _turn = lane.lock().await;
            trace!("Persisting note {note_id}");
            persister.persist(note_id, draft).await
        };
        self.set_in_flight(note_id, -1);
        self.release_lane(note_id, lane);

        if let Err(e) = &outcome {
            warn!("Persisting note {note_id} failed: {e}");
        }
        outcome
    }
}

/// Debounced, per-note serialized autosave.
pub struct Autosaver<P: PersistNote> {
    persister: Arc<P>,
    quiet: Duration,
    lanes: Arc<Lanes>,
    events_tx: mpsc::UnboundedSender<AutosaveEvent>,
}

impl<P: PersistNote> Autosaver<P> {
    /// Create an autosaver and the receiver its background persists report to.
    pub fn new(
        persister: Arc<P>,
        quiet: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<AutosaveEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let autosaver = Self {
            persister,
            quiet,
            lanes: Arc::new(Lanes::default()),
            events_tx,
        };
        (autosaver, events_rx)
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Persist `draft` once `note_id` has been quiet for the quiet period.
    ///
    /// Replaces (and cancels) any timer already waiting for this note.
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, note_id: NoteId, draft: NoteDraft) {
        let generation = self.lanes.next_generation.fetch_add(1, Ordering::Relaxed);
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let replaced = lock(&self.lanes.pending).insert(
            note_id,
            PendingSave {
                generation,
                draft,
                cancel: cancel_tx,
            },
        );
        if let Some(previous) = replaced {
            let _ = previous.cancel.send(());
            trace!("Restarted autosave timer for note {note_id}");
        } else {
            trace!("Started autosave timer for note {note_id}");
        }

        let lanes = Arc::clone(&self.lanes);
        let persister = Arc::clone(&self.persister);
        let events_tx = self.events_tx.clone();
        let quiet = self.quiet;

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(quiet) => {}
                _ = cancel_rx => {
                    trace!("Autosave timer for note {note_id} cancelled");
                    return;
                }
            }

            let Some(draft) = lanes.claim(note_id, generation) else {
                trace!("Autosave for note {note_id} superseded");
                return;
            };

            let outcome = lanes.run(persister.as_ref(), note_id, draft).await;
            if events_tx.send(AutosaveEvent { note_id, outcome }).is_err() {
                debug!("Autosave receiver gone; dropping result for note {note_id}");
            }
        });
    }

    /// Cancel a waiting timer. Returns `true` when one was waiting.
    pub fn cancel(&self, note_id: NoteId) -> bool {
        match self.lanes.take_pending(note_id) {
            Some(save) => {
                let _ = save.cancel.send(());
                true
            }
            None => false,
        }
    }

    /// Cancel every waiting timer, discarding the snapshots.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<PendingSave> = lock(&self.lanes.pending)
            .drain()
            .map(|(_, save)| save)
            .collect();
        let count = drained.len();
        for save in drained {
            let _ = save.cancel.send(());
        }
        if count > 0 {
            debug!("Cancelled {count} pending autosaves");
        }
        count
    }

    pub fn is_pending(&self, note_id: NoteId) -> bool {
        lock(&self.lanes.pending).contains_key(&note_id)
    }

    /// Waiting on a timer or being persisted.
    pub fn is_busy(&self, note_id: NoteId) -> bool {
        self.is_pending(note_id) || lock(&self.lanes.in_flight).contains_key(&note_id)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.lanes.pending).len()
    }

    pub(crate) fn lane_count(&self) -> usize {
        lock(&self.lanes.lanes).len()
    }

    /// Persist immediately through the note's lane, superseding any waiting timer.
    pub async fn persist_now(
        &self,
        note_id: NoteId,
        draft: NoteDraft,
    ) -> Result<Option<Note>, ApiError> {
        if self.cancel(note_id) {
            debug!("Immediate save of note {note_id} supersedes its pending autosave");
        }
        self.lanes.run(self.persister.as_ref(), note_id, draft).await
    }

    /// Persist every waiting snapshot now instead of at the end of its timer.
    pub async fn flush(&self) -> Vec<AutosaveEvent> {
        let drained: Vec<(NoteId, PendingSave)> = lock(&self.lanes.pending).drain().collect();
        let mut events = Vec::with_capacity(drained.len());

        for (note_id, save) in drained {
            let _ = save.cancel.send(());
            let outcome = self
                .lanes
                .run(self.persister.as_ref(), note_id, save.draft)
                .await;
            events.push(AutosaveEvent { note_id, outcome });
        }

        if !events.is_empty() {
            debug!("Flushed {} pending autosaves", events.len());
        }
        events
    }
}
