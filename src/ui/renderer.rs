/// Presentation layer: double-buffered, diff-based terminal display.
///
/// How it works:
///   1. Build the next frame into the `front` buffer (array of Cell)
///   2. Compare each cell with the `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Two screen modes, fed through the DisplaySink seam:
///   - a full character grid (idle-phase rain), replaced every tick
///   - an append-only scrollback (active/victory phases), tail-clipped
/// Both share the bottom row: a `> ` prompt echoing the line being typed.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::sim::sink::DisplaySink;

/// Scrollback kept in memory; older lines fall off the top.
const MAX_LOG_LINES: usize = 400;

const PHOSPHOR: Color = Color::Rgb { r: 0, g: 255, b: 0 };
const PHOSPHOR_DIM: Color = Color::Rgb { r: 0, g: 140, b: 0 };
const SCREEN_BG: Color = Color::Black;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: PHOSPHOR };

    /// Sentinel used to invalidate the back buffer: differs from any
    /// real cell, so every position gets diff'd on the next flush.
    const INVALID: Cell = Cell { ch: '\u{0}', fg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y), truncated at the right edge.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell { ch, fg });
            cx += 1;
        }
    }
}

// ── TerminalDisplay ──

/// What the session last pushed through the sink.
enum Screen {
    /// Idle-phase rain grid, replaced wholesale each tick.
    Rain(Vec<Vec<char>>),
    /// Terminal-log scrollback.
    Log,
}

pub struct TerminalDisplay {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    screen: Screen,
    log: Vec<String>,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        TerminalDisplay {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            screen: Screen::Log,
            log: vec![String::new()],
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(SCREEN_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Draw the current screen plus the input echo line. Call once per
    /// loop iteration; cheap when nothing changed.
    pub fn render(&mut self, pending_input: &str) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(SCREEN_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        let rain_grid = match &self.screen {
            Screen::Rain(grid) => Some(grid.clone()),
            Screen::Log => None,
        };
        match rain_grid {
            Some(grid) => self.compose_rain(&grid),
            None => self.compose_log(),
        }
        self.compose_input_line(pending_input);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Compose: build front buffer content ──

    fn compose_rain(&mut self, grid: &[Vec<char>]) {
        let rows = self.term_h.saturating_sub(1);
        for (y, row) in grid.iter().take(rows).enumerate() {
            for (x, &ch) in row.iter().enumerate() {
                if ch != ' ' {
                    self.front.set(x, y, Cell { ch, fg: PHOSPHOR });
                }
            }
        }
    }

    fn compose_log(&mut self) {
        let rows = self.term_h.saturating_sub(1);
        let start = self.log.len().saturating_sub(rows);
        let tail: Vec<String> = self.log[start..].to_vec();
        for (y, line) in tail.iter().enumerate() {
            self.front.put_str(0, y, line, PHOSPHOR);
        }
    }

    fn compose_input_line(&mut self, pending: &str) {
        let y = self.term_h.saturating_sub(1);
        self.front.put_str(0, y, "> ", PHOSPHOR_DIM);
        self.front.put_str(2, y, pending, PHOSPHOR);
        // Block cursor at the end of the edit buffer.
        let cx = 2 + pending.chars().count();
        self.front.set(cx, y, Cell { ch: '█', fg: PHOSPHOR_DIM });
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(SCREEN_BG)
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Log maintenance ──

    fn push_text(&mut self, text: &str) {
        for (i, part) in text.split('\n').enumerate() {
            if i == 0 {
                match self.log.last_mut() {
                    Some(last) => last.push_str(part),
                    None => self.log.push(part.to_string()),
                }
            } else {
                self.log.push(part.to_string());
            }
        }
        if self.log.len() > MAX_LOG_LINES {
            let excess = self.log.len() - MAX_LOG_LINES;
            self.log.drain(..excess);
        }
    }
}

// ── The sink seam consumed by the session controller ──

impl DisplaySink for TerminalDisplay {
    fn render_frame(&mut self, grid: &[Vec<char>]) {
        self.screen = Screen::Rain(grid.to_vec());
    }

    fn append_text(&mut self, text: &str) {
        self.screen = Screen::Log;
        self.push_text(text);
    }

    fn clear(&mut self) {
        self.screen = Screen::Log;
        self.log.clear();
        self.log.push(String::new());
    }
}
