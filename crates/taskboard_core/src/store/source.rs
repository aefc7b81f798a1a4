use std::cell::Cell;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

/// Supplies completion timestamps as RFC 3339 strings.
pub trait Clock {
    fn now(&self) -> String;
}

/// Supplies fresh task ids. Every call must return an id never handed out before.
pub trait IdSource {
    fn next_id(&self) -> String;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        let now = OffsetDateTime::now_utc();
        now.format(&Rfc3339).unwrap_or_else(|_| now.to_string())
    }
}

pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn next_id(&self) -> String {
        format!("task-{}", Uuid::new_v4().simple())
    }
}

/// Always reports the same instant.
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}

/// Hands out `task-1`, `task-2`, ... in order.
#[derive(Default)]
pub struct SequentialIds {
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let value = self.next.get() + 1;
        self.next.set(value);
        format!("task-{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, IdSource, SequentialIds, SystemClock, UuidIdSource};
    use std::collections::HashSet;
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;

    #[test]
    fn system_clock_emits_rfc3339() {
        let stamp = SystemClock.now();
        OffsetDateTime::parse(&stamp, &Rfc3339).unwrap();
    }

    #[test]
    fn uuid_ids_are_prefixed_and_distinct() {
        let ids: HashSet<String> = (0..64).map(|_| UuidIdSource.next_id()).collect();
        assert_eq!(ids.len(), 64);
        assert!(ids.iter().all(|id| id.starts_with("task-") && id.len() == 37));
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next_id(), "task-1");
        assert_eq!(ids.next_id(), "task-2");
    }
}
