// Unit tests for the per-note autosaver
// Time is paused: sleeps advance the clock instantly once every task is idle

use crate::autosave::{Autosaver, PersistNote};
use crate::error::api::ApiError;

use common::{Note, NoteDraft, NoteId};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const QUIET: Duration = Duration::from_millis(500);

/// Persister that records calls and how many overlap per note.
#[derive(Default)]
struct RecordingPersister {
    latency: Duration,
    fail: bool,
    calls: Mutex<Vec<(NoteId, String)>>,
    active: Mutex<HashMap<NoteId, usize>>,
    max_overlap: Mutex<usize>,
}

impl RecordingPersister {
    fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn titles(&self) -> Vec<(NoteId, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn max_overlap(&self) -> usize {
        *self.max_overlap.lock().unwrap()
    }
}

impl PersistNote for RecordingPersister {
    async fn persist(&self, note_id: NoteId, draft: NoteDraft) -> Result<Option<Note>, ApiError> {
        {
            let mut active = self.active.lock().unwrap();
            let count = active.entry(note_id).or_insert(0);
            *count += 1;
            let mut max = self.max_overlap.lock().unwrap();
            *max = (*max).max(*count);
        }
        self.calls.lock().unwrap().push((note_id, draft.title.clone()));

        tokio::time::sleep(self.latency).await;

        *self.active.lock().unwrap().get_mut(&note_id).unwrap() -= 1;
        if self.fail {
            return Err(ApiError::request(500, "boom"));
        }
        Ok(None)
    }
}

fn draft(title: &str) -> NoteDraft {
    NoteDraft {
        title: title.to_string(),
        ..NoteDraft::default()
    }
}

/// **VALUE**: Verifies two edits inside the quiet period produce one persist of the final state.
///
/// **WHY THIS MATTERS**: Every keystroke schedules a save; without debouncing
/// the server would get one PUT per character.
///
/// **BUG THIS CATCHES**: Would catch the old timer not being cancelled on reschedule.
#[tokio::test(start_paused = true)]
async fn given_two_edits_within_quiet_period_when_timer_fires_then_one_persist() {
    // GIVEN: An autosaver with a 500ms quiet period
    let persister = Arc::new(RecordingPersister::default());
    let (autosaver, mut events) = Autosaver::new(Arc::clone(&persister), QUIET);

    // WHEN: The note is edited twice, 200ms apart
    autosaver.schedule(1, draft("first"));
    tokio::time::sleep(Duration::from_millis(200)).await;
    autosaver.schedule(1, draft("second"));

    // THEN: Nothing is saved before the second edit has been quiet for 500ms
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(persister.titles().is_empty());
    assert!(autosaver.is_pending(1));

    // AND: Exactly one persist carrying the final state follows
    let event = events.recv().await.unwrap();
    assert_eq!(event.note_id, 1);
    assert!(event.outcome.is_ok());
    assert_eq!(persister.titles(), vec![(1, "second".to_string())]);
    assert!(!autosaver.is_busy(1));
}

/// **VALUE**: Verifies timers for different notes are independent.
///
/// **WHY THIS MATTERS**: Editing note B must not postpone or drop note A's save.
///
/// **BUG THIS CATCHES**: Would catch a single global timer instead of one per note.
#[tokio::test(start_paused = true)]
async fn given_edits_to_two_notes_when_quiet_then_both_persisted() {
    let persister = Arc::new(RecordingPersister::default());
    let (autosaver, mut events) = Autosaver::new(Arc::clone(&persister), QUIET);

    autosaver.schedule(1, draft("a"));
    tokio::time::sleep(Duration::from_millis(300)).await;
    autosaver.schedule(2, draft("b"));

    let first = events.recv().await.unwrap();
    let second = events.recv().await.unwrap();

    assert_eq!((first.note_id, second.note_id), (1, 2));
    assert_eq!(
        persister.titles(),
        vec![(1, "a".to_string()), (2, "b".to_string())]
    );
}

/// **VALUE**: Verifies persists for one note never overlap.
///
/// **WHY THIS MATTERS**: A timer that fires while an earlier PUT is still in
/// flight could otherwise land before it and be overwritten by older content.
///
/// **BUG THIS CATCHES**: Would catch the per-note lane being bypassed.
#[tokio::test(start_paused = true)]
async fn given_slow_persist_when_next_timer_fires_then_waits_for_lane() {
    // GIVEN: Persists that take a full second
    let persister = Arc::new(RecordingPersister::with_latency(Duration::from_secs(1)));
    let (autosaver, mut events) = Autosaver::new(Arc::clone(&persister), QUIET);

    // WHEN: A second edit's timer fires while the first persist is in flight
    autosaver.schedule(1, draft("old"));
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(autosaver.is_busy(1));
    autosaver.schedule(1, draft("new"));

    events.recv().await.unwrap();
    events.recv().await.unwrap();

    // THEN: Both ran, in order, one at a time
    assert_eq!(
        persister.titles(),
        vec![(1, "old".to_string()), (1, "new".to_string())]
    );
    assert_eq!(persister.max_overlap(), 1);
}

/// **VALUE**: Verifies an immediate save supersedes the waiting timer.
///
/// **WHY THIS MATTERS**: Tag toggles save at once; the debounced copy of the
/// same note would otherwise be sent again afterwards.
///
/// **BUG THIS CATCHES**: Would catch `persist_now` leaving the timer armed.
#[tokio::test(start_paused = true)]
async fn given_pending_timer_when_persisted_now_then_timer_dropped() {
    let persister = Arc::new(RecordingPersister::default());
    let (autosaver, mut events) = Autosaver::new(Arc::clone(&persister), QUIET);

    autosaver.schedule(1, draft("typed"));
    let outcome = autosaver.persist_now(1, draft("tagged")).await;
    tokio::time::sleep(QUIET * 2).await;

    assert!(outcome.is_ok());
    assert_eq!(persister.titles(), vec![(1, "tagged".to_string())]);
    assert!(events.try_recv().is_err());
}

/// **VALUE**: Verifies cancellation discards a waiting save.
///
/// **BUG THIS CATCHES**: Would catch a cancelled timer still firing.
#[tokio::test(start_paused = true)]
async fn given_pending_timers_when_cancelled_then_nothing_persisted() {
    let persister = Arc::new(RecordingPersister::default());
    let (autosaver, _events) = Autosaver::new(Arc::clone(&persister), QUIET);

    autosaver.schedule(1, draft("a"));
    autosaver.schedule(2, draft("b"));
    assert_eq!(autosaver.pending_count(), 2);

    assert!(autosaver.cancel(1));
    assert!(!autosaver.cancel(1));
    assert_eq!(autosaver.cancel_all(), 1);
    tokio::time::sleep(QUIET * 2).await;

    assert!(persister.titles().is_empty());
}

/// **VALUE**: Verifies flushing persists every waiting snapshot without waiting.
///
/// **WHY THIS MATTERS**: Logging out inside the quiet period must not lose the last edit.
///
/// **BUG THIS CATCHES**: Would catch flushed timers also firing later (double save).
#[tokio::test(start_paused = true)]
async fn given_pending_timers_when_flushed_then_persisted_once() {
    let persister = Arc::new(RecordingPersister::default());
    let (autosaver, mut events) = Autosaver::new(Arc::clone(&persister), QUIET);

    autosaver.schedule(3, draft("last words"));
    let flushed = autosaver.flush().await;
    tokio::time::sleep(QUIET * 2).await;

    assert_eq!(flushed.len(), 1);
    assert_eq!(flushed[0].note_id, 3);
    assert_eq!(persister.titles(), vec![(3, "last words".to_string())]);
    assert!(events.try_recv().is_err());
    assert_eq!(autosaver.pending_count(), 0);
}

/// **VALUE**: Verifies failures are reported through the event channel.
///
/// **BUG THIS CATCHES**: Would catch background errors being swallowed.
#[tokio::test(start_paused = true)]
async fn given_failing_backend_when_timer_fires_then_error_reported() {
    let persister = Arc::new(RecordingPersister::failing());
    let (autosaver, mut events) = Autosaver::new(Arc::clone(&persister), QUIET);

    autosaver.schedule(9, draft("x"));
    let event = events.recv().await.unwrap();

    assert_eq!(event.note_id, 9);
    assert_eq!(event.outcome.unwrap_err().status_code(), Some(500));
}

/// **VALUE**: Verifies a note's lane is dropped once its persists are done.
///
/// **WHY THIS MATTERS**: A long session edits many notes; lanes for idle
/// notes would otherwise pile up for the life of the autosaver.
///
/// **BUG THIS CATCHES**: Would catch a lane left in the map after the last
/// holder finished, or one removed while another persist still waits on it.
#[tokio::test(start_paused = true)]
async fn given_overlapping_persists_when_all_finish_then_lane_released() {
    // GIVEN: A slow persister
    let persister = Arc::new(RecordingPersister::with_latency(Duration::from_millis(100)));
    let (autosaver, mut events) = Autosaver::new(Arc::clone(&persister), QUIET);

    // WHEN: Two immediate saves of the same note overlap
    let (first, second) = tokio::join!(
        autosaver.persist_now(1, draft("one")),
        autosaver.persist_now(1, draft("two"))
    );

    // THEN: Both ran one after the other and the lane is gone
    assert!(first.is_ok() && second.is_ok());
    assert_eq!(persister.max_overlap(), 1);
    assert_eq!(autosaver.lane_count(), 0);

    // AND: A timer-driven save of another note also leaves no lane behind
    autosaver.schedule(2, draft("three"));
    let event = events.recv().await.unwrap();
    assert_eq!(event.note_id, 2);
    assert_eq!(autosaver.lane_count(), 0);
    assert_eq!(persister.titles().len(), 3);
}
