//! Monotonic order indices for resolved assets.

/// Hands out a strictly increasing, gapless sequence starting at 1.
///
/// One assigner belongs to one resolver session. It carries no synchronisation; callers sharing
/// a resolver across threads must serialise access themselves.
#[derive(Debug, Default)]
pub struct OrderAssigner {
  current: usize,
}

impl OrderAssigner {
  /// Create an assigner whose first index will be 1.
  pub fn new() -> Self {
    Self::default()
  }

  /// Advance the counter and return the new index.
  pub fn next_order(&mut self) -> usize {
    self.current += 1;
    self.current
  }

  /// Number of indices handed out so far.
  pub fn issued(&self) -> usize {
    self.current
  }
}
