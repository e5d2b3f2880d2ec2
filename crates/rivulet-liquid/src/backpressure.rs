/// Tracks queue growth across invocations and decides when to shed work.
#[derive(Debug, Clone, Default)]
pub struct Backpressure {
    /// Queue length recorded after the previous invocation.
    last_count: usize,
    streak_running: bool,
    streak_start_ms: u64,
}

impl Backpressure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the post-loop queue length. Returns how many of the oldest
    /// entries to drop, if the queue has grown for longer than `window_ms`
    /// and still holds more than `cap` entries.
    pub fn update(&mut self, queue_len: usize, now_ms: u64, window_ms: u64, cap: usize) -> Option<usize> {
        let prev = self.last_count;
        self.last_count = queue_len;

        if queue_len <= prev {
            self.streak_running = false;
        } else if !self.streak_running {
            self.streak_start_ms = now_ms;
            self.streak_running = true;
        }

        // Clock went backwards.
        if self.streak_running && self.streak_start_ms > now_ms {
            self.streak_running = false;
        }

        if self.streak_running && now_ms - self.streak_start_ms > window_ms && queue_len > cap {
            let excess = queue_len - cap;
            self.streak_running = false;
            self.last_count = cap;
            return Some(excess);
        }
        None
    }

    pub fn is_growing(&self) -> bool {
        self.streak_running
    }

    pub fn last_count(&self) -> usize {
        self.last_count
    }
}
