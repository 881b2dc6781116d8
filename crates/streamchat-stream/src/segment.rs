//! Thinking/response segment classification.
//!
//! Reasoning models wrap intermediate reasoning in a `<think>` ... `</think>`
//! block. The classifier only recognises a delimiter when it arrives as a
//! whole fragment; a delimiter split across two fragments is treated as
//! ordinary content.

/// Marker that opens a thinking segment
pub const THINK_START: &str = "<think>";
/// Marker that closes a thinking segment
pub const THINK_END: &str = "</think>";

/// The segment a fragment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Thinking,
    Response,
}

/// What a single fragment turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    /// The start delimiter; the classifier is now inside thinking
    EnterThinking,
    /// The end delimiter; the classifier is now back in the response
    ExitThinking,
    /// Ordinary text belonging to the given segment
    Content(SegmentKind),
}

impl Fragment {
    /// Segment the fragment belongs to once its own transition is applied
    pub fn segment(&self) -> SegmentKind {
        match self {
            Fragment::EnterThinking => SegmentKind::Thinking,
            Fragment::ExitThinking => SegmentKind::Response,
            Fragment::Content(kind) => *kind,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct SegmentClassifier {
    inside_thinking: bool,
}

impl SegmentClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_segment(&self) -> SegmentKind {
        if self.inside_thinking {
            SegmentKind::Thinking
        } else {
            SegmentKind::Response
        }
    }

    /// Classify the next fragment. Empty fragments are ignored and leave the
    /// state untouched.
    pub fn classify(&mut self, text: &str) -> Option<Fragment> {
        if text.is_empty() {
            return None;
        }

        if !self.inside_thinking && text == THINK_START {
            self.inside_thinking = true;
            return Some(Fragment::EnterThinking);
        }

        if self.inside_thinking && text == THINK_END {
            self.inside_thinking = false;
            return Some(Fragment::ExitThinking);
        }

        Some(Fragment::Content(self.current_segment()))
    }
}
