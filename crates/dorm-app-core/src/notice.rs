// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Notice queue (toasts) with TTL and dedupe, reporting the outcome of user actions.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Action completed.
    Info,
    /// Action skipped or partially applied.
    Warn,
    /// Action failed.
    Error,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

/// Identifier for a notice entry.
pub type NoticeId = u64;

/// A queued notice.
#[derive(Debug, Clone)]
pub struct Notice {
    /// Stable identifier.
    pub id: NoticeId,
    /// Severity.
    pub kind: NoticeKind,
    /// Short title line.
    pub title: String,
    /// Optional detail text.
    pub body: Option<String>,
    /// Time-to-live duration.
    pub ttl: Duration,
    /// Creation (or last refresh) time.
    pub created: Instant,
}

impl Notice {
    fn alive(&self, now: Instant) -> bool {
        now.duration_since(self.created) < self.ttl
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.title)?;
        if let Some(body) = &self.body {
            write!(f, ": {body}")?;
        }
        Ok(())
    }
}

/// Bounded in-memory notice queue.
pub struct NoticeService {
    queue: VecDeque<Notice>,
    max: usize,
    ttl: Duration,
    dedupe_window: Duration,
    next_id: NoticeId,
}

impl NoticeService {
    /// Create a queue holding at most `max` notices, each living for `ttl`.
    pub fn new(max: usize, ttl: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            max: max.max(1),
            ttl,
            dedupe_window: Duration::from_millis(500),
            next_id: 1,
        }
    }

    /// Push a notice. An identical notice pushed within the dedupe window is
    /// refreshed instead of duplicated.
    pub fn push<S, B>(&mut self, kind: NoticeKind, title: S, body: B, now: Instant) -> NoticeId
    where
        S: Into<String>,
        B: Into<Option<String>>,
    {
        let title = title.into();
        let body = body.into();

        if let Some(existing) = self.queue.iter_mut().find(|n| {
            n.kind == kind
                && n.title == title
                && n.body == body
                && now.duration_since(n.created) <= self.dedupe_window
        }) {
            existing.created = now;
            return existing.id;
        }

        let id = self.next_id;
        self.next_id += 1;
        if self.queue.len() == self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(Notice {
            id,
            kind,
            title,
            body,
            ttl: self.ttl,
            created: now,
        });
        id
    }

    /// Shorthand for an [`NoticeKind::Info`] notice without body.
    pub fn info(&mut self, title: impl Into<String>, now: Instant) -> NoticeId {
        self.push(NoticeKind::Info, title, None, now)
    }

    /// Drop expired notices.
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue.retain(|n| n.alive(now));
    }

    /// Notices still alive at `now`, oldest first.
    pub fn visible(&self, now: Instant) -> Vec<&Notice> {
        self.queue.iter().filter(|n| n.alive(now)).collect()
    }

    /// Remove and return every notice alive at `now`; expired ones are discarded.
    pub fn drain(&mut self, now: Instant) -> Vec<Notice> {
        self.queue.drain(..).filter(|n| n.alive(now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_pushes_are_deduped() {
        let mut svc = NoticeService::new(4, Duration::from_secs(4));
        let t0 = Instant::now();
        let a = svc.info("Знімок створено", t0);
        let b = svc.info("Знімок створено", t0 + Duration::from_millis(100));
        assert_eq!(a, b);
        assert_eq!(svc.visible(t0 + Duration::from_millis(100)).len(), 1);
    }

    #[test]
    fn queue_is_bounded_and_expires() {
        let mut svc = NoticeService::new(2, Duration::from_secs(1));
        let t0 = Instant::now();
        svc.info("a", t0);
        svc.info("b", t0);
        svc.info("c", t0);
        let titles: Vec<_> = svc.visible(t0).iter().map(|n| n.title.clone()).collect();
        assert_eq!(titles, ["b", "c"]);

        svc.retain_visible(t0 + Duration::from_secs(2));
        assert!(svc.visible(t0).is_empty());
    }

    #[test]
    fn drain_empties_queue() {
        let mut svc = NoticeService::new(4, Duration::from_secs(4));
        let t0 = Instant::now();
        svc.push(NoticeKind::Warn, "Не знайдено", Some("Шафа".into()), t0);
        let drained = svc.drain(t0);
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].to_string(), "[warn] Не знайдено: Шафа");
        assert!(svc.visible(t0).is_empty());
    }
}
