// Injectable randomness source for suggestion selection, so tests can pin
// which catalog entry gets drawn.
use rand::Rng;

pub trait SuggestionPicker: Send {
    /// Pick an index in `0..len`. `len` is always >= 1.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform selection backed by the thread-local RNG.
pub struct RandomPicker;

impl SuggestionPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always returns the same index (clamped to the list). Test helper, but
/// also useful for demos that want repeatable output.
pub struct FixedPicker(pub usize);

impl SuggestionPicker for FixedPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}
