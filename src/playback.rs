//! Timed playback of a story group: a pure tick-driven state machine plus an
//! async session that drives it with a single cancellable timer task.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::plugins::stories::models::StoryGroup;
use crate::plugins::stories::views::ViewTracker;

/// How long each story stays on screen.
pub const STORY_DURATION: Duration = Duration::from_secs(10);
/// How often the timer advances elapsed time.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Closed,
    Playing { index: usize, elapsed: Duration },
    Paused { index: usize, elapsed: Duration },
}

/// Result of advancing the clock by one tick.
#[derive(Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still on the same story (or not playing at all).
    Stayed,
    /// Moved to the next story; the new story should be marked viewed.
    Advanced(Uuid),
    /// Ran past the last story; playback is closed and the timer must stop.
    Finished,
}

/// Pure playback state machine over one story group. Knows nothing about
/// timers or the network; the session below supplies both.
pub struct Playback {
    story_ids: Vec<Uuid>,
    story_duration: Duration,
    state: PlaybackState,
}

impl Playback {
    /// Opens playback on a group. Returns the machine and the story to mark
    /// viewed immediately; an empty group opens straight into `Closed`.
    pub fn open(group: &StoryGroup) -> (Self, Option<Uuid>) {
        Self::open_with_duration(group, STORY_DURATION)
    }

    pub fn open_with_duration(group: &StoryGroup, story_duration: Duration) -> (Self, Option<Uuid>) {
        let story_ids: Vec<Uuid> = group.stories.iter().map(|s| s.id).collect();
        let first = story_ids.first().copied();
        let state = if first.is_some() {
            PlaybackState::Playing { index: 0, elapsed: Duration::ZERO }
        } else {
            PlaybackState::Closed
        };
        (Self { story_ids, story_duration, state }, first)
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == PlaybackState::Closed
    }

    fn current_index(&self) -> Option<usize> {
        match self.state {
            PlaybackState::Playing { index, .. } | PlaybackState::Paused { index, .. } => Some(index),
            PlaybackState::Closed => None,
        }
    }

    /// Advances elapsed time while `Playing`; no-op in `Paused` or `Closed`.
    pub fn tick(&mut self, delta: Duration) -> TickOutcome {
        let PlaybackState::Playing { index, elapsed } = self.state else {
            return TickOutcome::Stayed;
        };
        let elapsed = elapsed + delta;
        if elapsed < self.story_duration {
            self.state = PlaybackState::Playing { index, elapsed };
            return TickOutcome::Stayed;
        }
        if index + 1 < self.story_ids.len() {
            self.state = PlaybackState::Playing { index: index + 1, elapsed: Duration::ZERO };
            TickOutcome::Advanced(self.story_ids[index + 1])
        } else {
            self.state = PlaybackState::Closed;
            TickOutcome::Finished
        }
    }

    /// Freezes elapsed time. The accrued elapsed survives a later `resume`.
    pub fn pause(&mut self) {
        if let PlaybackState::Playing { index, elapsed } = self.state {
            self.state = PlaybackState::Paused { index, elapsed };
        }
    }

    pub fn resume(&mut self) {
        if let PlaybackState::Paused { index, elapsed } = self.state {
            self.state = PlaybackState::Playing { index, elapsed };
        }
    }

    /// Explicit forward navigation. Returns the story to (re-)mark viewed;
    /// past the last story playback closes.
    pub fn next(&mut self) -> Option<Uuid> {
        let index = self.current_index()?;
        if index + 1 < self.story_ids.len() {
            self.set_index(index + 1);
            Some(self.story_ids[index + 1])
        } else {
            self.close();
            None
        }
    }

    /// Explicit backward navigation; no-op on the first story. Re-marking an
    /// already-viewed story is idempotent, so the returned id is always marked.
    pub fn prev(&mut self) -> Option<Uuid> {
        let index = self.current_index()?;
        if index == 0 {
            return None;
        }
        self.set_index(index - 1);
        Some(self.story_ids[index - 1])
    }

    pub fn close(&mut self) {
        self.state = PlaybackState::Closed;
    }

    fn set_index(&mut self, index: usize) {
        // navigation resets elapsed but preserves paused-ness
        self.state = match self.state {
            PlaybackState::Paused { .. } => PlaybackState::Paused { index, elapsed: Duration::ZERO },
            _ => PlaybackState::Playing { index, elapsed: Duration::ZERO },
        };
    }

    /// Progress fraction for one story's bar: 1.0 before the current index,
    /// `elapsed/story_duration` at it, 0.0 after it (and everywhere when closed).
    pub fn progress(&self, index: usize) -> f32 {
        match self.state {
            PlaybackState::Playing { index: cur, elapsed }
            | PlaybackState::Paused { index: cur, elapsed } => {
                if index < cur {
                    1.0
                } else if index == cur {
                    (elapsed.as_secs_f32() / self.story_duration.as_secs_f32()).min(1.0)
                } else {
                    0.0
                }
            }
            PlaybackState::Closed => 0.0,
        }
    }
}

/// Destination for best-effort view marking during playback.
#[async_trait]
pub trait ViewSink: Send + Sync + 'static {
    async fn mark_viewed(&self, story_id: Uuid) -> anyhow::Result<u64>;
}

pub type DynViewSink = Arc<dyn ViewSink>;

/// In-process sink marking views directly through the tracker.
pub struct TrackerSink {
    tracker: ViewTracker,
    viewer: Uuid,
}

impl TrackerSink {
    pub fn new(tracker: ViewTracker, viewer: Uuid) -> Self {
        Self { tracker, viewer }
    }
}

#[async_trait]
impl ViewSink for TrackerSink {
    async fn mark_viewed(&self, story_id: Uuid) -> anyhow::Result<u64> {
        Ok(self.tracker.mark_viewed(story_id, self.viewer).await?)
    }
}

/// Drives a `Playback` with a timer. At most one timer task exists, only
/// while `Playing`; pause, close and drop all cancel it. View marking is
/// best-effort: failures are logged and playback continues.
pub struct PlaybackSession {
    inner: Arc<Mutex<Playback>>,
    sink: DynViewSink,
    timer: Option<tokio::task::JoinHandle<()>>,
    tick_interval: Duration,
}

impl PlaybackSession {
    pub fn open(group: &StoryGroup, sink: DynViewSink) -> Self {
        Self::open_with_timing(group, sink, STORY_DURATION, TICK_INTERVAL)
    }

    pub fn open_with_timing(
        group: &StoryGroup,
        sink: DynViewSink,
        story_duration: Duration,
        tick_interval: Duration,
    ) -> Self {
        let (playback, first) = Playback::open_with_duration(group, story_duration);
        let mut session = Self {
            inner: Arc::new(Mutex::new(playback)),
            sink,
            timer: None,
            tick_interval,
        };
        if let Some(id) = first {
            session.mark_best_effort(id);
            session.spawn_timer();
        }
        session
    }

    pub fn state(&self) -> PlaybackState {
        *self.inner.lock().state()
    }

    pub fn progress(&self, index: usize) -> f32 {
        self.inner.lock().progress(index)
    }

    pub fn pause(&mut self) {
        self.cancel_timer();
        self.inner.lock().pause();
    }

    pub fn resume(&mut self) {
        let resumed = {
            let mut playback = self.inner.lock();
            playback.resume();
            matches!(playback.state(), PlaybackState::Playing { .. })
        };
        if resumed {
            self.spawn_timer();
        }
    }

    pub fn next(&mut self) {
        let marked = self.inner.lock().next();
        match marked {
            Some(id) => self.mark_best_effort(id),
            None => self.cancel_timer(),
        }
    }

    pub fn prev(&mut self) {
        if let Some(id) = self.inner.lock().prev() {
            self.mark_best_effort(id);
        }
    }

    pub fn close(&mut self) {
        self.cancel_timer();
        self.inner.lock().close();
    }

    fn mark_best_effort(&self, story_id: Uuid) {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(e) = sink.mark_viewed(story_id).await {
                tracing::warn!(%story_id, error = %e, "failed to mark story viewed");
            }
        });
    }

    fn spawn_timer(&mut self) {
        self.cancel_timer();
        let inner = Arc::clone(&self.inner);
        let sink = Arc::clone(&self.sink);
        let tick = self.tick_interval;
        self.timer = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.tick().await; // completes immediately
            loop {
                interval.tick().await;
                let outcome = inner.lock().tick(tick);
                match outcome {
                    TickOutcome::Stayed => {}
                    TickOutcome::Advanced(id) => {
                        if let Err(e) = sink.mark_viewed(id).await {
                            tracing::warn!(story_id = %id, error = %e, "failed to mark story viewed");
                        }
                    }
                    TickOutcome::Finished => break,
                }
            }
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
