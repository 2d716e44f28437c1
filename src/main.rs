/// Entry point and session loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use config::GameConfig;
use sim::session::{Phase, SessionController};
use ui::input::LineInput;
use ui::renderer::TerminalDisplay;
use ui::sound::{AudioFeedback, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    let mut display = TerminalDisplay::new();
    if let Err(e) = display.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = if config.sound { SoundEngine::new() } else { None };
    let mut feedback = AudioFeedback::new(sound);
    let mut session = SessionController::new(config.display_width, config.display_height);

    let result = session_loop(&mut session, &mut display, &mut feedback, &config);

    if let Err(e) = display.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Session error: {e}");
    }
}

fn session_loop(
    session: &mut SessionController,
    display: &mut TerminalDisplay,
    feedback: &mut AudioFeedback,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = LineInput::new();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let mut last_tick = Instant::now();

    loop {
        // Phase before this frame's events: a key arriving while the
        // victory screen is already up exits, the keystroke that caused
        // the transition does not.
        let was_victory = session.phase() == Phase::Victory;

        input.drain_events();
        if input.quit_requested() {
            break;
        }
        if was_victory && input.key_pressed() {
            break;
        }

        for line in input.take_submitted() {
            session.on_input(&line, display, feedback);
        }
        if !was_victory && session.phase() == Phase::Victory {
            feedback.play_victory();
        }

        if last_tick.elapsed() >= tick_rate {
            session.on_tick(display);
            last_tick = Instant::now();
        }

        display.render(input.pending())?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}
