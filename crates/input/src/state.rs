use glam::DVec2;
use std::collections::BTreeMap;

/// Per-frame input snapshot written by the host and read by the simulation.
///
/// Symbols are host-defined strings. Asking for a symbol that was never set is
/// not an error: it simply reads as not held.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: BTreeMap<String, bool>,
    pointer_sample: Option<DVec2>,
    previous_sample: Option<DVec2>,
    pointer_motion: DVec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one symbol's held state.
    pub fn set(&mut self, symbol: &str, held: bool) {
        match self.held.get_mut(symbol) {
            Some(slot) => *slot = held,
            None => {
                self.held.insert(symbol.to_owned(), held);
            }
        }
    }

    pub fn press(&mut self, symbol: &str) {
        self.set(symbol, true);
    }

    pub fn release(&mut self, symbol: &str) {
        self.set(symbol, false);
    }

    /// Overwrite the whole symbol map. Symbols not listed become not held.
    pub fn replace_all<I, S>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        self.held.clear();
        self.held
            .extend(symbols.into_iter().map(|(s, held)| (s.into(), held)));
    }

    /// Release every symbol.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, symbol: &str) -> bool {
        self.held.get(symbol).copied().unwrap_or(false)
    }

    /// Symbols currently held, in sorted order.
    pub fn held_symbols(&self) -> impl Iterator<Item = &str> {
        self.held
            .iter()
            .filter(|(_, held)| **held)
            .map(|(s, _)| s.as_str())
    }

    /// Record the host's absolute pointer position for this frame.
    pub fn set_pointer_sample(&mut self, x: f64, y: f64) {
        let sample = DVec2::new(x, y);
        if sample.is_finite() {
            self.pointer_sample = Some(sample);
        } else {
            tracing::debug!(x, y, "ignoring non-finite pointer sample");
        }
    }

    /// The pointer left the window. The next sample starts a fresh baseline
    /// instead of producing a jump.
    pub fn clear_pointer_sample(&mut self) {
        self.pointer_sample = None;
        self.previous_sample = None;
    }

    /// Accumulate relative pointer motion (raw device deltas).
    pub fn add_pointer_motion(&mut self, dx: f64, dy: f64) {
        let d = DVec2::new(dx, dy);
        if d.is_finite() {
            self.pointer_motion += d;
        }
    }

    /// Consume this frame's pointer delta.
    ///
    /// The delta is the change since the previously consumed sample plus any
    /// relative motion. Afterwards the current sample becomes the baseline and
    /// the motion accumulator is zeroed, so a second call in the same frame
    /// returns zero. The very first sample only establishes the baseline.
    pub fn take_pointer_delta(&mut self) -> DVec2 {
        let mut delta = std::mem::take(&mut self.pointer_motion);
        if let (Some(current), Some(previous)) = (self.pointer_sample, self.previous_sample) {
            delta += current - previous;
        }
        if self.pointer_sample.is_some() {
            self.previous_sample = self.pointer_sample;
        }
        delta
    }
}
