/// Matrix rain: falling character columns with an embedded hidden message.
///
/// Pure simulation — no I/O. Each tick the field may spawn one column,
/// advances every column, culls the ones that fell past the bottom, and
/// rasterizes the survivors into a `height × width` char grid for the
/// presentation layer.
///
/// The hidden message is spread opportunistically: at spawn time a column
/// occasionally reserves one character of the message at a random slot in
/// its buffer. The cursor into the message wraps around, so the message is
/// repeated indefinitely but never guaranteed fully visible at once.

use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
    Rng, SeedableRng,
};

/// Glyph alphabet for ordinary rain characters: a-z, A-Z, 0-9.
const GLYPHS: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Chance per tick that a column appends its next buffered character.
const APPEND_CHANCE: f32 = 0.3;
/// Chance per tick that the field spawns a new column.
const SPAWN_CHANCE: f32 = 0.1;
/// Chance that a freshly spawned column carries a hidden-message character.
const MESSAGE_CHANCE: f32 = 0.1;
/// Upper bound on concurrently active columns.
const MAX_COLUMNS: usize = 80;

// ── RainColumn ──

/// One falling stream of characters.
///
/// `y` is the real-valued head position; buffered chars trail upward from
/// it. `message_pos` is only meaningful while `message_char` is set.
pub struct RainColumn {
    x: usize,
    y: f32,
    speed: f32,
    chars: Vec<char>,
    length: usize,
    message_char: Option<char>,
    message_pos: usize,
}

impl RainColumn {
    fn new<R: Rng>(x: usize, speed: f32, message_char: Option<char>, rng: &mut R) -> Self {
        let length = rng.random_range(5..=15);
        let message_pos = if message_char.is_some() {
            rng.random_range(0..length)
        } else {
            0
        };
        RainColumn {
            x,
            y: 0.0,
            speed,
            chars: Vec::with_capacity(length),
            length,
            message_char,
            message_pos,
        }
    }

    /// Advance one tick. Returns false once the trailing character has
    /// fallen off the bottom of the display; such a column is discarded.
    fn advance<R: Rng>(&mut self, height: usize, rng: &mut R) -> bool {
        self.y += self.speed;
        if self.chars.len() < self.length && rng.random::<f32>() < APPEND_CHANCE {
            let ch = match self.message_char {
                Some(m) if self.chars.len() == self.message_pos => m,
                _ => GLYPHS[rng.random_range(0..GLYPHS.len())] as char,
            };
            self.chars.push(ch);
        }
        self.y - self.chars.len() as f32 <= height as f32
    }
}

// ── RainField ──

/// The set of active columns plus the spawn logic and the message cursor.
pub struct RainField {
    columns: Vec<RainColumn>,
    message_cursor: usize,
    rng: StdRng,
    rand_chance: Uniform<f32>,
    rand_speed: Uniform<f32>,
}

impl RainField {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Deterministic field for tests.
    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        RainField {
            columns: Vec::new(),
            message_cursor: 0,
            rng,
            rand_chance: Uniform::new(0.0, 1.0).expect("valid range"),
            rand_speed: Uniform::new_inclusive(0.2, 0.5).expect("valid range"),
        }
    }

    /// Advance the whole field one tick and rasterize it.
    ///
    /// Returns a `height × width` grid of chars, blank except where a
    /// column's buffered characters land. Cell ties between overlapping
    /// columns are last-write-wins; iteration order carries no meaning.
    pub fn tick(&mut self, width: usize, height: usize, message: &str) -> Vec<Vec<char>> {
        self.spawn(width, message);

        let rng = &mut self.rng;
        self.columns.retain_mut(|col| col.advance(height, rng));

        self.rasterize(width, height)
    }

    fn spawn(&mut self, width: usize, message: &str) {
        if width == 0 || self.columns.len() >= MAX_COLUMNS {
            return;
        }
        if self.rand_chance.sample(&mut self.rng) >= SPAWN_CHANCE {
            return;
        }

        let x = self.rng.random_range(0..width);
        let speed = self.rand_speed.sample(&mut self.rng);

        let message_char = if self.rand_chance.sample(&mut self.rng) < MESSAGE_CHANCE {
            self.next_message_char(message)
        } else {
            None
        };

        let col = RainColumn::new(x, speed, message_char, &mut self.rng);
        self.columns.push(col);
    }

    /// Take the next hidden-message character, advancing the cursor
    /// cyclically (wraps to the start after the last character).
    fn next_message_char(&mut self, message: &str) -> Option<char> {
        let ch = message.chars().nth(self.message_cursor)?;
        self.message_cursor = (self.message_cursor + 1) % message.chars().count();
        Some(ch)
    }

    fn rasterize(&self, width: usize, height: usize) -> Vec<Vec<char>> {
        let mut grid = vec![vec![' '; width]; height];
        for col in &self.columns {
            if col.x >= width {
                continue;
            }
            let head = col.y.floor() as i64;
            for (i, &ch) in col.chars.iter().enumerate() {
                let row = head - i as i64;
                if row >= 0 && (row as usize) < height {
                    grid[row as usize][col.x] = ch;
                }
            }
        }
        grid
    }
}

// ── Tests ──
