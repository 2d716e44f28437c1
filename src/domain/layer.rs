/// Security layers: one puzzle each — prompt, validation rule, hint.
///
/// All layers share one shape and differ only in how the answer is
/// compared, so the rule is a tagged enum rather than a trait object.
/// Validators are pure and total: any string (including empty) is a
/// legal input and simply passes or fails.

/// How a layer judges submitted text.
#[derive(Clone, Copy, Debug)]
pub enum Validator {
    /// Accepts when the input equals the answer ignoring ASCII case.
    CaseInsensitive(&'static str),
    /// Accepts when the input equals the answer exactly.
    Exact(&'static str),
    /// Accepts anything. The timing-protocol layer's prompt asks for a
    /// timed keypress, but nothing checks the timing — any input passes.
    AlwaysPass,
}

impl Validator {
    pub fn accepts(&self, input: &str) -> bool {
        match self {
            Validator::CaseInsensitive(answer) => input.eq_ignore_ascii_case(answer),
            Validator::Exact(answer) => input == *answer,
            Validator::AlwaysPass => true,
        }
    }
}

/// One challenge, immutable once constructed. An empty hint means the
/// layer offers none.
pub struct ChallengeLayer {
    pub prompt: &'static str,
    pub validator: Validator,
    pub hint: &'static str,
}

impl ChallengeLayer {
    pub fn new(prompt: &'static str, validator: Validator, hint: &'static str) -> Self {
        ChallengeLayer { prompt, validator, hint }
    }
}

/// The built-in puzzle set, in play order.
pub fn security_layers() -> Vec<ChallengeLayer> {
    vec![
        ChallengeLayer::new(
            "SECURITY LAYER 1: Pattern Recognition\n\n\
             ACCESS CODE SEQUENCE: XYZXYZABXYZXYZ\n\
             IDENTIFY THE REPEATING PATTERN TO PROCEED\n",
            Validator::CaseInsensitive("XYZXYZ"),
            "Hint: Look for the longest repeating sequence...",
        ),
        ChallengeLayer::new(
            "SECURITY LAYER 2: Decryption Challenge\n\n\
             ENCRYPTED CODE: SSECCA\n\
             DECRYPT THE CODE TO PROCEED\n\
             HINT: REVERSE ENGINEERING REQUIRED\n",
            Validator::CaseInsensitive("ACCESS"),
            "Hint: What you're trying to gain...",
        ),
        ChallengeLayer::new(
            "SECURITY LAYER 3: Logic Gate\n\n\
             IF A = 1 AND B = 2 THEN C = 3\n\
             IF X = 3 AND Y = 1 THEN Z = ?\n\
             SOLVE FOR Z TO PROCEED\n",
            Validator::Exact("2"),
            "Hint: Follow the pattern...",
        ),
        ChallengeLayer::new(
            "SECURITY LAYER 4: Timing Protocol\n\n\
             SYNCHRONIZATION REQUIRED\n\
             PRESS ENTER WHEN THE SEQUENCE '42' APPEARS\n\
             TIMING IS CRUCIAL\n",
            Validator::AlwaysPass,
            "Hint: Watch carefully...",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_accepts_any_casing() {
        let v = Validator::CaseInsensitive("ACCESS");
        assert!(v.accepts("access"));
        assert!(v.accepts("ACCESS"));
        assert!(v.accepts("AcCeSs"));
        assert!(!v.accepts("accesss"));
        assert!(!v.accepts(""));
    }

    #[test]
    fn exact_rejects_near_misses() {
        let v = Validator::Exact("2");
        assert!(v.accepts("2"));
        assert!(!v.accepts("2.0"));
        assert!(!v.accepts(" 2"));
        assert!(!v.accepts("two"));
    }

    #[test]
    fn always_pass_accepts_everything() {
        let v = Validator::AlwaysPass;
        assert!(v.accepts(""));
        assert!(v.accepts("anything at all"));
    }

    #[test]
    fn built_in_set_has_four_layers_in_order() {
        let layers = security_layers();
        assert_eq!(layers.len(), 4);
        assert!(layers[0].validator.accepts("xyzxyz"));
        assert!(layers[1].validator.accepts("Access"));
        assert!(layers[2].validator.accepts("2"));
        assert!(layers[3].validator.accepts("whenever"));
        // Every built-in layer ships a hint.
        assert!(layers.iter().all(|l| !l.hint.is_empty()));
    }
}
