//! Per-slot accumulated stream state
//!
//! A [`SlotBoard`] holds a fixed number of slots. A slot is `None` until a
//! request starts and again after the user accepts or discards it.

use super::StreamEvent;

/// Text accumulated for one suggestion or completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    /// Accumulated text; replaced by the error message on failure
    pub text: String,
    done: bool,
    failed: bool,
}

impl Slot {
    pub fn new() -> Self {
        Self::default()
    }

    /// No further text will arrive
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Finished with an in-stream error
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Finished without producing any text
    pub fn is_empty_result(&self) -> bool {
        self.done && !self.failed && self.text.is_empty()
    }

    /// Can be appended to the story
    pub fn is_acceptable(&self) -> bool {
        !self.failed && !self.text.is_empty()
    }

    fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn mark_done(&mut self) {
        self.done = true;
    }

    fn fail(&mut self, message: &str) {
        self.text = format!("Error: {}", message);
        self.failed = true;
        self.done = true;
    }
}

/// Fixed-size set of optional slots addressed by index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBoard {
    slots: Vec<Option<Slot>>,
}

impl SlotBoard {
    /// Create a board with `capacity` cleared slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Open every slot with empty text for a new request
    pub fn start(&mut self) {
        for slot in &mut self.slots {
            *slot = Some(Slot::new());
        }
    }

    /// Apply one stream event
    ///
    /// Returns false when the event addressed a cleared or out-of-range slot
    /// and was dropped.
    pub fn apply(&mut self, event: &StreamEvent) -> bool {
        let idx = event.idx();
        let Some(slot) = self.slots.get_mut(idx).and_then(Option::as_mut) else {
            log::debug!("Dropping {:?} for inactive slot {}", event, idx);
            return false;
        };

        match event {
            StreamEvent::Chunk { text, .. } => slot.append(text),
            StreamEvent::Done { .. } => slot.mark_done(),
            StreamEvent::Error { text, .. } => slot.fail(text),
        }
        true
    }

    pub fn get(&self, idx: usize) -> Option<&Slot> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    /// Clear a slot, returning what it held
    pub fn take(&mut self, idx: usize) -> Option<Slot> {
        self.slots.get_mut(idx).and_then(Option::take)
    }

    /// Clear every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Iterate over all positions, cleared ones included
    pub fn iter(&self) -> impl Iterator<Item = Option<&Slot>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// At least one slot is open
    pub fn has_active(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    /// Index of the next open slot after `from`, wrapping around
    pub fn next_active(&self, from: usize) -> Option<usize> {
        let len = self.slots.len();
        (1..=len)
            .map(|step| (from + step) % len)
            .find(|&idx| self.slots[idx].is_some())
    }

    /// Index of the previous open slot before `from`, wrapping around
    pub fn prev_active(&self, from: usize) -> Option<usize> {
        let len = self.slots.len();
        (1..=len)
            .map(|step| (from + len - step) % len)
            .find(|&idx| self.slots[idx].is_some())
    }
}

#[cfg(test)]
#[path = "slots_tests.rs"]
mod slots_tests;
