/// Layer progression: an ordered set of challenges and the cursor through
/// them. The cursor only ever moves forward; index == len is the terminal
/// victory state and is sticky — further submissions are no-ops.

use super::layer::ChallengeLayer;

/// Result of submitting one line of input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// The current layer accepted the input. `terminal` is true when this
    /// advance completed the final layer.
    Advanced { terminal: bool },
    /// The current layer rejected the input. Carries the layer's hint,
    /// if it has one, for display.
    Rejected { hint: Option<&'static str> },
    /// The sequence is already complete; nothing happened.
    NoOp,
}

pub struct ChallengeSequence {
    layers: Vec<ChallengeLayer>,
    current: usize,
}

impl ChallengeSequence {
    pub fn new(layers: Vec<ChallengeLayer>) -> Self {
        ChallengeSequence { layers, current: 0 }
    }

    /// Evaluate `input` against the current layer.
    pub fn submit(&mut self, input: &str) -> Outcome {
        let layer = match self.layers.get(self.current) {
            Some(l) => l,
            None => return Outcome::NoOp,
        };

        if layer.validator.accepts(input) {
            self.current += 1;
            Outcome::Advanced { terminal: self.is_terminal() }
        } else {
            let hint = if layer.hint.is_empty() { None } else { Some(layer.hint) };
            Outcome::Rejected { hint }
        }
    }

    /// The layer currently gating progress, or None once complete.
    pub fn current_layer(&self) -> Option<&ChallengeLayer> {
        self.layers.get(self.current)
    }

    /// 1-based number of the current layer, for user-facing text.
    pub fn layer_number(&self) -> usize {
        self.current + 1
    }

    pub fn is_terminal(&self) -> bool {
        self.current >= self.layers.len()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layer::{security_layers, Validator};

    fn built_in() -> ChallengeSequence {
        ChallengeSequence::new(security_layers())
    }

    #[test]
    fn correct_answer_advances() {
        let mut seq = built_in();
        assert_eq!(seq.submit("xyzxyz"), Outcome::Advanced { terminal: false });
        assert_eq!(seq.current, 1);
    }

    #[test]
    fn same_answer_fails_next_layer() {
        // After layer 1 passes, the same input is judged by layer 2's rule.
        let mut seq = built_in();
        assert_eq!(seq.submit("xyzxyz"), Outcome::Advanced { terminal: false });
        assert!(matches!(seq.submit("xyzxyz"), Outcome::Rejected { .. }));
        assert_eq!(seq.current, 1);
    }

    #[test]
    fn rejection_carries_hint() {
        let mut seq = built_in();
        assert_eq!(
            seq.submit("wrong"),
            Outcome::Rejected { hint: Some("Hint: Look for the longest repeating sequence...") },
        );
    }

    #[test]
    fn rejection_without_hint_carries_none() {
        let mut seq = ChallengeSequence::new(vec![ChallengeLayer::new(
            "prompt",
            Validator::Exact("yes"),
            "",
        )]);
        assert_eq!(seq.submit("no"), Outcome::Rejected { hint: None });
    }

    #[test]
    fn layer_two_is_case_insensitive() {
        let mut seq = built_in();
        seq.submit("xyzxyz");
        assert_eq!(seq.submit("ACCESS"), Outcome::Advanced { terminal: false });

        let mut seq = built_in();
        seq.submit("xyzxyz");
        assert_eq!(seq.submit("access"), Outcome::Advanced { terminal: false });

        let mut seq = built_in();
        seq.submit("xyzxyz");
        assert!(matches!(seq.submit("accesss"), Outcome::Rejected { hint: Some(_) }));
    }

    #[test]
    fn layer_three_is_exact() {
        let mut seq = built_in();
        seq.submit("xyzxyz");
        seq.submit("access");
        assert!(matches!(seq.submit("2.0"), Outcome::Rejected { .. }));
        assert_eq!(seq.submit("2"), Outcome::Advanced { terminal: false });
    }

    #[test]
    fn four_correct_answers_reach_victory() {
        let mut seq = built_in();
        assert_eq!(seq.submit("xyzxyz"), Outcome::Advanced { terminal: false });
        assert_eq!(seq.submit("access"), Outcome::Advanced { terminal: false });
        assert_eq!(seq.submit("2"), Outcome::Advanced { terminal: false });
        assert_eq!(seq.submit(""), Outcome::Advanced { terminal: true });
        assert_eq!(seq.current, 4);
        assert!(seq.is_terminal());
    }

    #[test]
    fn terminal_sequence_is_inert() {
        let mut seq = built_in();
        for input in ["xyzxyz", "access", "2", ""] {
            seq.submit(input);
        }
        assert_eq!(seq.submit("xyzxyz"), Outcome::NoOp);
        assert_eq!(seq.submit(""), Outcome::NoOp);
        assert_eq!(seq.current, 4);
    }

    #[test]
    fn index_is_monotone_and_bounded() {
        let mut seq = built_in();
        let mut last = 0;
        // A mix of right and wrong answers; the cursor must never move
        // backward or pass the layer count.
        for input in ["nope", "xyzxyz", "xyzxyz", "ACCESS", "3", "2", "go", "go"] {
            seq.submit(input);
            assert!(seq.current >= last);
            assert!(seq.current <= seq.len());
            last = seq.current;
        }
    }
}
