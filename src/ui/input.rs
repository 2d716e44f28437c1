/// Line input: accumulates typed characters into a submit buffer.
///
/// The game consumes whole submitted lines, not held keys, so this
/// tracks an edit buffer instead of key-down state:
///   - printable chars append, Backspace deletes
///   - Enter moves the buffer into the submitted queue
///   - Esc or Ctrl+C requests quit
///
/// Drained once per loop iteration, non-blocking.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEventKind, KeyModifiers};

pub struct LineInput {
    buffer: String,
    submitted: Vec<String>,
    quit: bool,
    saw_key_press: bool,
}

impl LineInput {
    pub fn new() -> Self {
        LineInput {
            buffer: String::new(),
            submitted: Vec::new(),
            quit: false,
            saw_key_press: false,
        }
    }

    /// Drain all pending terminal events and update the edit buffer.
    /// Call once per frame.
    pub fn drain_events(&mut self) {
        self.saw_key_press = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            let key = match event::read() {
                Ok(Event::Key(key)) => key,
                _ => continue,
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            self.saw_key_press = true;

            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            {
                self.quit = true;
                continue;
            }

            match key.code {
                KeyCode::Enter => {
                    self.submitted.push(std::mem::take(&mut self.buffer));
                }
                KeyCode::Backspace => {
                    self.buffer.pop();
                }
                KeyCode::Esc => self.quit = true,
                KeyCode::Char(c) => self.buffer.push(c),
                _ => {}
            }
        }
    }

    /// Lines completed with Enter since the last call, oldest first.
    pub fn take_submitted(&mut self) -> Vec<String> {
        std::mem::take(&mut self.submitted)
    }

    /// The line currently being edited (echoed after the prompt).
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Did any key press arrive in the latest drain? Used for the
    /// any-key-exits behavior on the victory screen.
    pub fn key_pressed(&self) -> bool {
        self.saw_key_press
    }
}
