/// Whole-second countdown for a mini-game. The host calls `tick` once per
/// wall-clock second while the session is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    limit: u32,
    remaining: u32,
}

impl Countdown {
    pub fn new(limit_secs: u32) -> Self {
        Self { limit: limit_secs, remaining: limit_secs }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn elapsed(&self) -> u32 {
        self.limit - self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Returns true on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}
