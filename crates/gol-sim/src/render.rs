//! Render sinks that paint grid snapshots.

use gol_core::ALIVE;
use gol_world::Snapshot;
use std::io::Write;
use tracing::warn;

/// Paints a snapshot. Failures stay inside the sink; the simulation loop
/// never sees them.
pub trait RenderSink {
    fn render(&mut self, snapshot: Snapshot<'_>);
}

impl<F> RenderSink for F
where
    F: FnMut(Snapshot<'_>),
{
    fn render(&mut self, snapshot: Snapshot<'_>) {
        self(snapshot)
    }
}

/// RGBA image buffer, one pixel per cell: white when alive, black when dead
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; 4 * width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, r: usize, c: usize) -> [u8; 4] {
        let i = 4 * (r * self.width + c);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

impl RenderSink for PixelBuffer {
    fn render(&mut self, snapshot: Snapshot<'_>) {
        if snapshot.width != self.width || snapshot.height != self.height {
            warn!(
                "Snapshot {}x{} does not fit pixel buffer {}x{}; skipping frame",
                snapshot.width, snapshot.height, self.width, self.height
            );
            return;
        }

        for (pixel, &state) in self.data.chunks_exact_mut(4).zip(snapshot.cells) {
            let bw = 255 * state;
            pixel.copy_from_slice(&[bw, bw, bw, 255]);
        }
    }
}

/// Writes each frame as text, one character per cell
pub struct TextSink<W: Write> {
    out: W,
    alive: char,
    dead: char,
    cursor_home: bool,
    buffer: String,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            alive: '█',
            dead: ' ',
            cursor_home: false,
            buffer: String::new(),
        }
    }

    pub fn with_glyphs(mut self, alive: char, dead: char) -> Self {
        self.alive = alive;
        self.dead = dead;
        self
    }

    /// Prefix each frame with an ANSI cursor-home sequence so frames
    /// overwrite each other in a terminal
    pub fn with_cursor_home(mut self, enabled: bool) -> Self {
        self.cursor_home = enabled;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TextSink<W> {
    fn render(&mut self, snapshot: Snapshot<'_>) {
        self.buffer.clear();
        if self.cursor_home {
            self.buffer.push_str("\x1b[H");
        }
        let (alive, dead) = (self.alive, self.dead);
        for row in snapshot.cells.chunks(snapshot.width) {
            self.buffer
                .extend(row.iter().map(|&s| if s == ALIVE { alive } else { dead }));
            self.buffer.push('\n');
        }

        let result = self
            .out
            .write_all(self.buffer.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!("Failed to write frame {}: {}", snapshot.generation, e);
        }
    }
}
