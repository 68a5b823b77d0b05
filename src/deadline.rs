use std::time::{Duration, Instant};

/// Overall time budget shared by every lookup and probe of a single scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// Starts the clock now. `None` means no overall budget.
    pub fn after(budget: Option<Duration>) -> Self {
        Self {
            at: budget.and_then(|budget| Instant::now().checked_add(budget)),
        }
    }

    pub fn unbounded() -> Self {
        Self { at: None }
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// The stricter of two budgets.
    pub fn earliest(self, other: Deadline) -> Deadline {
        let at = match (self.at, other.at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self { at }
    }

    /// Shrinks `timeout` so a single operation never outlives the budget.
    pub fn cap(&self, timeout: Duration) -> Duration {
        match self.remaining() {
            Some(left) => left.min(timeout),
            None => timeout,
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_never_expires() {
        let deadline = Deadline::unbounded();
        assert!(!deadline.expired());
        assert_eq!(deadline.remaining(), None);
        assert_eq!(deadline.cap(Duration::from_secs(3)), Duration::from_secs(3));
    }

    #[test]
    fn zero_budget_is_expired_and_caps_to_zero() {
        let deadline = Deadline::after(Some(Duration::ZERO));
        assert!(deadline.expired());
        assert_eq!(deadline.cap(Duration::from_secs(3)), Duration::ZERO);
    }

    #[test]
    fn earliest_keeps_the_tighter_budget() {
        let short = Deadline::after(Some(Duration::from_secs(1)));
        let long = Deadline::after(Some(Duration::from_secs(3600)));

        assert_eq!(short.earliest(long), short);
        assert_eq!(long.earliest(short), short);
        assert_eq!(Deadline::unbounded().earliest(short), short);
        assert_eq!(Deadline::unbounded().earliest(Deadline::unbounded()), Deadline::unbounded());
    }

    #[test]
    fn generous_budget_keeps_short_timeout() {
        let deadline = Deadline::after(Some(Duration::from_secs(3600)));
        assert!(!deadline.expired());
        assert_eq!(deadline.cap(Duration::from_secs(3)), Duration::from_secs(3));
    }
}
