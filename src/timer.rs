/// Elapsed-time accumulator advanced only by explicit `tick(dt)` calls.
///
/// Every gameplay clock in the crate is one of these, so anything that stops
/// calling `update` (the pause menu, an end screen) freezes time for it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stopwatch {
    elapsed: f32,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(elapsed: f32) -> Self {
        Self { elapsed }
    }

    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn reached(&self, seconds: f32) -> bool {
        self.elapsed >= seconds
    }

    /// Edge-triggered interval check: true once `interval` has passed, then
    /// starts over from zero.  Overshoot is discarded, so the effective period
    /// is the interval rounded up to the caller's tick granularity.
    pub fn lap(&mut self, interval: f32) -> bool {
        if self.reached(interval) {
            self.restart();
            true
        } else {
            false
        }
    }
}
