//! Presentational animation cues.
//!
//! Cues describe visual transitions only. They are emitted next to state
//! mutations, never instead of them, and a sink may drop or delay them
//! freely without affecting timeline state.

/// Visual transition requested by a user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationCue {
    /// Short shrink-and-restore feedback on a pressed button.
    PressFeedback,
    /// Row grows slightly while held.
    RowPressIn,
    /// Row returns to rest scale after a hold.
    RowPressOut,
    /// Overlay and delete affordance fade in.
    RevealDelete,
    /// Overlay and delete affordance fade out.
    HideDelete,
}

impl PresentationCue {
    /// Suggested duration of the transition in milliseconds.
    pub fn duration_ms(self) -> u32 {
        match self {
            Self::PressFeedback => 200,
            Self::RowPressIn | Self::RowPressOut => 150,
            Self::RevealDelete | Self::HideDelete => 200,
        }
    }
}

/// Receiver for presentation cues, implemented by the rendering layer.
pub trait CueSink {
    fn play(&mut self, cue: PresentationCue);
}

/// Sink that discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCues;

impl CueSink for NoopCues {
    fn play(&mut self, _cue: PresentationCue) {}
}

/// Sink that records cues in order; used by hosts that poll for pending
/// animations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedCues {
    cues: Vec<PresentationCue>,
}

impl RecordedCues {
    pub fn cues(&self) -> &[PresentationCue] {
        &self.cues
    }

    /// Returns recorded cues and clears the buffer.
    pub fn drain(&mut self) -> Vec<PresentationCue> {
        std::mem::take(&mut self.cues)
    }
}

impl CueSink for RecordedCues {
    fn play(&mut self, cue: PresentationCue) {
        self.cues.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::{CueSink, PresentationCue, RecordedCues};

    #[test]
    fn recorded_cues_drain_in_order() {
        let mut sink = RecordedCues::default();
        sink.play(PresentationCue::RevealDelete);
        sink.play(PresentationCue::HideDelete);

        assert_eq!(
            sink.drain(),
            vec![PresentationCue::RevealDelete, PresentationCue::HideDelete]
        );
        assert!(sink.cues().is_empty());
    }

    #[test]
    fn row_press_cues_are_shorter_than_overlay_fades() {
        assert!(
            PresentationCue::RowPressIn.duration_ms() < PresentationCue::RevealDelete.duration_ms()
        );
    }
}
