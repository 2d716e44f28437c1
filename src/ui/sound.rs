/// Tone feedback: procedural beeps via rodio.
///
/// All tones are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without the "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each feedback tone.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_pass: Arc<Vec<u8>>,
        sfx_fail: Arc<Vec<u8>>,
        sfx_victory: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        /// None when no output device is available; the game then runs
        /// silently.
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            let sfx_pass = Arc::new(make_wav(&gen_tone(1000.0, 0.1, 0.3)));
            let sfx_fail = Arc::new(make_wav(&gen_tone(500.0, 0.1, 0.3)));
            let sfx_victory = Arc::new(make_wav(&gen_victory()));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_pass,
                sfx_fail,
                sfx_victory,
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        /// Layer bypassed: 1 kHz blip.
        pub fn play_pass(&self) { self.play(&self.sfx_pass); }
        /// Access denied: 500 Hz blip.
        pub fn play_fail(&self) { self.play(&self.sfx_fail); }
        /// Mainframe reached: ascending fanfare.
        pub fn play_victory(&self) { self.play(&self.sfx_victory); }
    }

    // ── Waveform generators — all produce Vec<f32> mono samples ──

    /// Single sine tone with a linear fade-out envelope.
    fn gen_tone(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                (t * freq * 2.0 * std::f32::consts::PI).sin() * env * volume
            })
            .collect()
    }

    /// Victory: ascending arpeggio C5→E5→G5→C6 with a sustained last note.
    fn gen_victory() -> Vec<f32> {
        let notes = [523.0_f32, 659.0, 784.0, 1047.0];
        let note_dur = 0.1;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                // Sine + harmonics for a retro square-ish timbre
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.6
                    + (t * freq * 2.0 * 2.0 * std::f32::consts::PI).sin() * 0.3
                    + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.1;
                samples.push(wave * env * 0.3);
            }
        }
        // Sustain the top note and let it ring out
        let last_freq = 1047.0_f32;
        let n = (SAMPLE_RATE as f32 * 0.25) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            samples.push((t * last_freq * 2.0 * std::f32::consts::PI).sin() * env * 0.3);
        }
        samples
    }

    // ── WAV encoder — wraps f32 samples into a valid WAV buffer ──

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ── Public API — compiles to no-ops when sound is off ──

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_pass(&self) {}
    pub fn play_fail(&self) {}
    pub fn play_victory(&self) {}
}

// ── Feedback seam adapter ──

use crate::sim::sink::FeedbackSink;

/// Adapts the optional sound engine to the session's feedback seam.
/// An absent engine (no device, feature off, disabled in config) means
/// silence — a fully valid substitute; delivery never fails upward.
pub struct AudioFeedback {
    engine: Option<SoundEngine>,
}

impl AudioFeedback {
    pub fn new(engine: Option<SoundEngine>) -> Self {
        AudioFeedback { engine }
    }

    /// Fanfare for the active → victory transition. Separate from the
    /// pass/fail seam: the shell triggers it on the phase change.
    pub fn play_victory(&self) {
        if let Some(sfx) = &self.engine {
            sfx.play_victory();
        }
    }
}

impl FeedbackSink for AudioFeedback {
    fn signal(&mut self, success: bool) {
        if let Some(sfx) = &self.engine {
            if success {
                sfx.play_pass();
            } else {
                sfx.play_fail();
            }
        }
    }
}
