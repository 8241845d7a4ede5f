use std::time::Duration;
use tokio::time::Instant;

/// Quiet period before typed search text is applied.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Trailing-edge debounce for search box input.
///
/// Every `input` supersedes the pending value and restarts the quiet period,
/// so only the last keystroke's value is ever yielded by `poll`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a keystroke's resulting text.
    pub fn input(&mut self, text: impl Into<String>) {
        self.pending = Some((text.into(), Instant::now()));
    }

    /// Take the pending text if the quiet period has elapsed.
    pub fn poll(&mut self) -> Option<String> {
        let ready = matches!(&self.pending, Some((_, at)) if at.elapsed() >= self.delay);
        if ready {
            self.pending.take().map(|(text, _)| text)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time;

    #[tokio::test]
    async fn test_nothing_pending_initially() {
        let mut d = Debouncer::default();
        assert!(!d.is_pending());
        assert_eq!(d.poll(), None);
    }

    #[tokio::test]
    async fn test_fires_after_quiet_period() {
        time::pause();
        let mut d = Debouncer::default();
        d.input("rust");

        time::advance(Duration::from_millis(499)).await;
        assert_eq!(d.poll(), None);

        time::advance(Duration::from_millis(1)).await;
        assert_eq!(d.poll(), Some("rust".to_string()));
        // Fires once
        assert_eq!(d.poll(), None);
    }

    #[tokio::test]
    async fn test_rapid_keystrokes_collapse_to_last() {
        time::pause();
        let mut d = Debouncer::default();
        let mut applied = Vec::new();

        for text in ["t", "te", "tec"] {
            d.input(text);
            time::advance(Duration::from_millis(200)).await;
            if let Some(q) = d.poll() {
                applied.push(q);
            }
        }

        time::advance(Duration::from_millis(500)).await;
        if let Some(q) = d.poll() {
            applied.push(q);
        }

        assert_eq!(applied, vec!["tec".to_string()]);
    }

    #[tokio::test]
    async fn test_keystroke_restarts_quiet_period() {
        time::pause();
        let mut d = Debouncer::default();
        d.input("a");
        time::advance(Duration::from_millis(400)).await;
        d.input("ab");
        time::advance(Duration::from_millis(400)).await;
        assert_eq!(d.poll(), None);
        time::advance(Duration::from_millis(100)).await;
        assert_eq!(d.poll(), Some("ab".to_string()));
    }

    #[tokio::test]
    async fn test_cancel_drops_pending() {
        time::pause();
        let mut d = Debouncer::default();
        d.input("abc");
        d.cancel();
        time::advance(Duration::from_secs(1)).await;
        assert_eq!(d.poll(), None);
    }
}
