//! Restartable serial consumption of reactions from one session.

use std::time::Duration;

use crate::broker::ReactionEvent;
use crate::reaction::consume::ConsumptionSession;

/// A finite, lazily-driven sequence of consumed reactions.
///
/// Each step runs one fresh consumption wait; the first exhausted wait ends
/// the sequence permanently. A new monitor over the same session restarts
/// the sequence, but a single monitor never resumes after ending.
pub struct SerialReactionMonitor {
    session: ConsumptionSession,
    budget: Duration,
    limit: Option<usize>,
    yielded: usize,
    done: bool,
}

impl SerialReactionMonitor {
    pub fn new(session: ConsumptionSession, budget: Duration, limit: Option<usize>) -> Self {
        Self {
            session,
            budget,
            limit,
            yielded: 0,
            done: false,
        }
    }

    /// The next consumed reaction, or `None` once the sequence has ended.
    pub async fn next(&mut self) -> Option<ReactionEvent> {
        if self.done {
            return None;
        }
        if let Some(limit) = self.limit
            && self.yielded >= limit
        {
            self.done = true;
            return None;
        }

        match self.session.consume_one(self.budget).await {
            Some(event) => {
                self.yielded += 1;
                Some(event)
            }
            None => {
                self.done = true;
                None
            }
        }
    }

    /// End the sequence without waiting for another event.
    pub fn stop(&mut self) {
        self.done = true;
        self.session.cancel();
    }

    /// Whether the watched message was observed to be deleted.
    pub fn target_gone(&self) -> bool {
        self.session.target_gone()
    }

    /// Access the underlying session, e.g. to swap the allowed symbols.
    pub fn session_mut(&mut self) -> &mut ConsumptionSession {
        &mut self.session
    }
}
