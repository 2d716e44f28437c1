/// Capability seams between the session core and the platform shell.
/// The session controller is the only component that talks to these;
/// everything below it is pure state.

pub trait DisplaySink {
    /// Replace the whole visible region with a character grid
    /// (idle-phase rain animation).
    fn render_frame(&mut self, grid: &[Vec<char>]);

    /// Append text in terminal-log style (active/victory phases).
    fn append_text(&mut self, text: &str);

    /// Wipe the visible region (used on the idle → active transition).
    fn clear(&mut self);
}

pub trait FeedbackSink {
    /// One pass/fail pulse per submission outcome. Delivery is
    /// fire-and-forget: implementations must not fail into the caller.
    fn signal(&mut self, success: bool);
}

/// Feedback that goes nowhere. A fully valid substitute wherever real
/// feedback is unavailable.
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn signal(&mut self, _success: bool) {}
}
