use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    remaining: Duration,
}

/// Short-lived messages for the player, newest last.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
    lifetime: Duration,
}

impl Notices {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            lifetime,
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.queue.push_back(Notice {
            text: text.into(),
            remaining: self.lifetime,
        });
    }

    pub fn tick(&mut self, dt: Duration) {
        for notice in &mut self.queue {
            notice.remaining = notice.remaining.saturating_sub(dt);
        }
        self.queue.retain(|notice| !notice.remaining.is_zero());
    }

    /// The message currently on screen.
    pub fn latest(&self) -> Option<&str> {
        self.queue.back().map(|notice| notice.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_expire_after_their_lifetime() {
        let mut notices = Notices::new(Duration::from_millis(2000));
        notices.push("first");
        notices.tick(Duration::from_millis(1500));
        notices.push("second");
        assert_eq!(notices.latest(), Some("second"));

        notices.tick(Duration::from_millis(500));
        assert_eq!(notices.latest(), Some("second"));
        assert_eq!(notices.queue.len(), 1);

        notices.tick(Duration::from_millis(1500));
        assert_eq!(notices.latest(), None);
    }
}
