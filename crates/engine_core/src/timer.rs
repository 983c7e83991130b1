//! One-shot deferred events on the millisecond timeline.

/// A queue of one-shot events, each due at an absolute time in milliseconds.
///
/// Events are never cancelled; whoever drains the queue decides at fire time
/// whether an event is still relevant.
#[derive(Debug)]
pub struct TimerQueue<E> {
    entries: Vec<(f64, E)>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Schedule `event` to fire once `now_ms >= due_ms`.
    pub fn schedule(&mut self, due_ms: f64, event: E) {
        self.entries.push((due_ms, event));
    }

    /// Remove and return every event due at `now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<E> {
        if !self.entries.iter().any(|(due, _)| *due <= now_ms) {
            return Vec::new();
        }
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|(due, _)| *due <= now_ms);
        self.entries = pending;
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, event)| event).collect()
    }

    /// Iterate pending events without firing them.
    pub fn pending(&self) -> impl Iterator<Item = &E> {
        self.entries.iter().map(|(_, event)| event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
