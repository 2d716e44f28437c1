/// Session orchestration: the top-level phase machine.
///
/// Idle    — matrix rain runs, waiting for the start command
/// Active  — security layers accept typed answers
/// Victory — terminal state, input is dead
///
/// One periodic tick drives the rain while Idle; one input-submitted
/// event drives the challenge sequence while Active. The controller is
/// the only component that writes to the display and feedback sinks.

use crate::domain::layer::security_layers;
use crate::domain::rain::RainField;
use crate::domain::sequence::{ChallengeSequence, Outcome};
use super::sink::{DisplaySink, FeedbackSink};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Active,
    Victory,
}

/// The command that leaves the idle phase, matched case-insensitively.
const START_COMMAND: &str = "start";

/// Hidden message spelled out one character at a time across rain columns.
const START_MESSAGE: &str = "TYPE START TO BEGIN";

const INTRO_TEXT: &str = "INITIALIZING SYSTEM INGRESS PROTOCOL...\n\n\
                          WARNING: UNAUTHORIZED ACCESS DETECTED\n\
                          SECURITY SYSTEMS ENGAGED\n\n";

const DENIED_TEXT: &str = "\nACCESS DENIED. TRY AGAIN.\n";

const VICTORY_BANNER: &str = "\nACCESS GRANTED - WELCOME TO THE MAINFRAME\n\n\
                              █▀▄▀█ ▄▀█ █ █▄░█ █▀▀ █▀█ ▄▀█ █▀▄▀█ █▀▀\n\
                              █░▀░█ █▀█ █ █░▀█ █▀░ █▀▄ █▀█ █░▀░█ ██▄\n\n\
                              SYSTEM STATUS: COMPROMISED\n\
                              ROOT ACCESS: ENABLED\n\
                              SECURITY: DISABLED\n\n\
                              CONGRATULATIONS, YOU'VE SUCCESSFULLY INFILTRATED THE SYSTEM.\n";

pub struct SessionController {
    phase: Phase,
    rain: RainField,
    sequence: ChallengeSequence,
    width: usize,
    height: usize,
}

impl SessionController {
    pub fn new(width: usize, height: usize) -> Self {
        SessionController {
            phase: Phase::Idle,
            rain: RainField::new(),
            sequence: ChallengeSequence::new(security_layers()),
            width,
            height,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Periodic tick. Drives the rain animation while Idle; a no-op in
    /// every other phase (the animation simply stops being rendered).
    pub fn on_tick(&mut self, display: &mut dyn DisplaySink) {
        if self.phase != Phase::Idle {
            return;
        }
        let grid = self.rain.tick(self.width, self.height, START_MESSAGE);
        display.render_frame(&grid);
    }

    /// One submitted line of input, routed by phase.
    pub fn on_input(
        &mut self,
        input: &str,
        display: &mut dyn DisplaySink,
        feedback: &mut dyn FeedbackSink,
    ) {
        match self.phase {
            Phase::Idle => self.handle_idle_input(input, display),
            Phase::Active => self.handle_answer(input, display, feedback),
            Phase::Victory => {}
        }
    }

    fn handle_idle_input(&mut self, input: &str, display: &mut dyn DisplaySink) {
        if !input.eq_ignore_ascii_case(START_COMMAND) {
            return;
        }
        self.phase = Phase::Active;
        display.clear();
        display.append_text(INTRO_TEXT);
        if let Some(layer) = self.sequence.current_layer() {
            display.append_text(layer.prompt);
        }
    }

    fn handle_answer(
        &mut self,
        input: &str,
        display: &mut dyn DisplaySink,
        feedback: &mut dyn FeedbackSink,
    ) {
        // 1-based number of the layer being attempted, captured before
        // the cursor moves.
        let attempted = self.sequence.layer_number();

        match self.sequence.submit(input) {
            Outcome::Advanced { terminal } => {
                feedback.signal(true);
                display.append_text(&format!(
                    "\nSECURITY LAYER {attempted} BYPASSED...\n\n"
                ));
                if terminal {
                    self.phase = Phase::Victory;
                    display.append_text(VICTORY_BANNER);
                } else if let Some(layer) = self.sequence.current_layer() {
                    display.append_text(layer.prompt);
                }
            }
            Outcome::Rejected { hint } => {
                feedback.signal(false);
                display.append_text(DENIED_TEXT);
                if let Some(hint) = hint {
                    display.append_text(&format!("\n{hint}\n"));
                }
            }
            Outcome::NoOp => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeDisplay {
        frames: Vec<(usize, usize)>, // (rows, cols) per rendered frame
        appended: Vec<String>,
        clears: usize,
    }

    impl DisplaySink for FakeDisplay {
        fn render_frame(&mut self, grid: &[Vec<char>]) {
            let cols = grid.first().map_or(0, |r| r.len());
            self.frames.push((grid.len(), cols));
        }
        fn append_text(&mut self, text: &str) {
            self.appended.push(text.to_string());
        }
        fn clear(&mut self) {
            self.clears += 1;
        }
    }

    impl FakeDisplay {
        fn appearances(&self, needle: &str) -> usize {
            self.appended.iter().filter(|t| t.contains(needle)).count()
        }
    }

    #[derive(Default)]
    struct FakeFeedback {
        signals: Vec<bool>,
    }

    impl FeedbackSink for FakeFeedback {
        fn signal(&mut self, success: bool) {
            self.signals.push(success);
        }
    }

    fn session() -> (SessionController, FakeDisplay, FakeFeedback) {
        (
            SessionController::new(80, 25),
            FakeDisplay::default(),
            FakeFeedback::default(),
        )
    }

    #[test]
    fn tick_renders_full_frames_while_idle() {
        let (mut s, mut d, _) = session();
        s.on_tick(&mut d);
        s.on_tick(&mut d);
        assert_eq!(d.frames, vec![(25, 80), (25, 80)]);
    }

    #[test]
    fn start_command_is_case_insensitive() {
        let (mut s, mut d, mut f) = session();
        s.on_input("START", &mut d, &mut f);
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(d.clears, 1);
        assert_eq!(d.appearances("SECURITY LAYER 1"), 1);
        assert!(f.signals.is_empty());
    }

    #[test]
    fn other_input_is_ignored_while_idle() {
        let (mut s, mut d, mut f) = session();
        s.on_input("help", &mut d, &mut f);
        s.on_input("", &mut d, &mut f);
        assert_eq!(s.phase(), Phase::Idle);
        assert!(d.appended.is_empty());
        assert_eq!(d.clears, 0);
        assert!(f.signals.is_empty());
    }

    #[test]
    fn tick_stops_driving_rain_once_active() {
        let (mut s, mut d, mut f) = session();
        s.on_input("start", &mut d, &mut f);
        s.on_tick(&mut d);
        s.on_tick(&mut d);
        assert!(d.frames.is_empty());
    }

    #[test]
    fn correct_answer_advances_with_success_signal() {
        let (mut s, mut d, mut f) = session();
        s.on_input("start", &mut d, &mut f);
        s.on_input("xyzxyz", &mut d, &mut f);
        assert_eq!(f.signals, vec![true]);
        assert_eq!(d.appearances("SECURITY LAYER 1 BYPASSED"), 1);
        assert_eq!(d.appearances("SECURITY LAYER 2"), 1);
    }

    #[test]
    fn wrong_answer_is_denied_with_hint() {
        let (mut s, mut d, mut f) = session();
        s.on_input("start", &mut d, &mut f);
        s.on_input("letmein", &mut d, &mut f);
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(f.signals, vec![false]);
        assert_eq!(d.appearances("ACCESS DENIED"), 1);
        assert_eq!(d.appearances("longest repeating sequence"), 1);
    }

    #[test]
    fn full_run_emits_victory_banner_once() {
        let (mut s, mut d, mut f) = session();
        s.on_input("start", &mut d, &mut f);
        for answer in ["xyzxyz", "ACCESS", "2", ""] {
            s.on_input(answer, &mut d, &mut f);
        }
        assert_eq!(s.phase(), Phase::Victory);
        assert_eq!(f.signals, vec![true, true, true, true]);
        assert_eq!(d.appearances("WELCOME TO THE MAINFRAME"), 1);
        assert_eq!(d.appearances("SECURITY LAYER 4 BYPASSED"), 1);
    }

    #[test]
    fn null_feedback_is_a_valid_substitute() {
        use crate::sim::sink::NullFeedback;

        let (mut s, mut d, _) = session();
        let mut quiet = NullFeedback;
        s.on_input("start", &mut d, &mut quiet);
        s.on_input("xyzxyz", &mut d, &mut quiet);
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(d.appearances("SECURITY LAYER 1 BYPASSED"), 1);
    }

    #[test]
    fn input_after_victory_is_dead() {
        let (mut s, mut d, mut f) = session();
        s.on_input("start", &mut d, &mut f);
        for answer in ["xyzxyz", "ACCESS", "2", ""] {
            s.on_input(answer, &mut d, &mut f);
        }
        let appended = d.appended.len();
        let signals = f.signals.len();
        s.on_input("start", &mut d, &mut f);
        s.on_input("xyzxyz", &mut d, &mut f);
        assert_eq!(s.phase(), Phase::Victory);
        assert_eq!(d.appended.len(), appended);
        assert_eq!(f.signals.len(), signals);
    }
}
