/// Bounded log of recent simulation events for a stats display
use std::collections::VecDeque;

const MAX_EVENTS: usize = 100;

#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<String>,
    capacity: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(MAX_EVENTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an event, dropping the oldest once full. Also emitted at debug level.
    pub fn log(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::debug!(target: "runegrid::events", "{}", msg);

        if self.capacity == 0 {
            return;
        }
        if self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(msg);
    }

    /// Most recent `count` events, oldest first
    pub fn recent(&self, count: usize) -> Vec<String> {
        let skip = self.events.len().saturating_sub(count);
        self.events.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
