//! Player — the interactive terminal host.
//!
//! Drives a `Session` from a `FrameTicker`: waits for the next frame while
//! polling input, ticks the session, and paints the result. The player owns
//! no simulation state of its own; it translates keys into start, stop and
//! reset, and terminal resizes into an immediate redraw.

use std::io::{self, Write};
use std::time::Instant;

use anyhow::{bail, Result};
use crossterm::{cursor, event, execute, queue, style, terminal};
use log::debug;

use crate::config::{matches_binding, SimConfig};
use crate::engine::program::Program;
use crate::renderer::{Projection, Renderer};
use crate::scheduler::{CancelHandle, FrameTicker};
use crate::session::{FrameSink, Session};
use crate::types::{Cell, FrameView, NamedColor, Style, Surface};

/// Rows reserved above the canvas for the key-hint bar.
const CANVAS_OFFSET: u16 = 1;
/// Rows the key-hint bar and the status bar take together.
const CHROME_ROWS: u16 = 2;
const MIN_ROWS: u16 = CHROME_ROWS + 1;
const MIN_COLS: u16 = 20;

// ---------------------------------------------------------------------------
// Terminal sink
// ---------------------------------------------------------------------------

/// Paints rasterized frames to a terminal, sending only the cells that
/// changed since the previous frame.
pub struct TerminalSink<W: Write> {
    out: W,
    renderer: Renderer,
    prev: Vec<Vec<Cell>>,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, projection: Projection) -> Self {
        TerminalSink {
            out,
            renderer: Renderer::new(projection),
            prev: Vec::new(),
        }
    }

    pub fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Forget what is on screen so the next frame is painted in full.
    pub fn invalidate(&mut self) {
        self.prev.clear();
    }

    fn paint_full(&mut self, grid: &[Vec<Cell>]) -> Result<()> {
        for (y, row) in grid.iter().enumerate() {
            queue!(self.out, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
            for cell in row {
                queue!(
                    self.out,
                    style::PrintStyledContent(style::StyledContent::new(
                        to_content_style(&cell.style),
                        cell.ch
                    ))
                )?;
            }
        }
        Ok(())
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    fn present(&mut self, view: &FrameView<'_>) -> Result<()> {
        let grid = self.renderer.rasterize(view);
        let same_size = grid.len() == self.prev.len()
            && grid.first().map(Vec::len) == self.prev.first().map(Vec::len);

        if same_size {
            for change in Renderer::diff(&self.prev, &grid) {
                queue!(
                    self.out,
                    cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                    style::PrintStyledContent(style::StyledContent::new(
                        to_content_style(&change.cell.style),
                        change.cell.ch
                    )),
                )?;
            }
        } else {
            self.paint_full(&grid)?;
        }

        self.out.flush()?;
        self.prev = grid;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

pub struct Player {
    session: Session<TerminalSink<io::Stdout>>,
    config: SimConfig,
    title: String,
}

impl Player {
    pub fn new(config: SimConfig, program: Program, title: impl Into<String>) -> Result<Self> {
        let sink = TerminalSink::new(io::stdout(), config.projection());
        let mut session = Session::from_config(&config, sink)?;
        session.load_program(program);
        Ok(Player {
            session,
            config,
            title: title.into(),
        })
    }

    /// Run the simulation in the terminal until the user quits.
    ///
    /// Sets up the terminal, enters the frame loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        if term_w < MIN_COLS || term_h < MIN_ROWS {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                MIN_COLS,
                MIN_ROWS,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(term_w, term_h);

        // Always restore terminal state.
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, term_w: u16, term_h: u16) -> Result<()> {
        self.relayout(term_w, term_h)?;

        let mut ticker = FrameTicker::new(self.config.fps, Instant::now());
        let cancel = ticker.handle();

        while let Some(wait) = ticker.time_until_next(Instant::now()) {
            if event::poll(wait)? {
                self.handle_event(event::read()?, &cancel)?;
                continue;
            }
            self.session.tick()?;
            ticker.advance(Instant::now());
            self.render_status()?;
        }

        debug!("frame loop ended after {} frames", ticker.frames());
        Ok(())
    }

    fn handle_event(&mut self, ev: event::Event, cancel: &CancelHandle) -> Result<()> {
        match ev {
            event::Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                let keys = &self.config.key_bindings;
                if matches_binding(&keys.quit, &key)
                    || matches_binding("Esc", &key)
                    || matches_binding("Ctrl-c", &key)
                {
                    cancel.cancel();
                } else if matches_binding(&keys.toggle_run, &key) {
                    self.session.toggle();
                    self.render_status()?;
                } else if matches_binding(&keys.reset, &key) {
                    self.session.reset()?;
                    self.render_status()?;
                } else if matches_binding(&keys.step, &key) && !self.session.is_running() {
                    self.session.step_once()?;
                    self.render_status()?;
                }
            }
            event::Event::Resize(w, h) => self.relayout(w, h)?,
            _ => {}
        }
        Ok(())
    }

    /// Clear the screen and repaint everything for a terminal of `w`x`h`.
    fn relayout(&mut self, w: u16, h: u16) -> Result<()> {
        let sink = self.session.sink_mut();
        sink.invalidate();
        execute!(sink.out_mut(), terminal::Clear(terminal::ClearType::All))?;
        self.session
            .resize(Surface::new(w, h.saturating_sub(CHROME_ROWS)))?;
        self.render_menubar(w)?;
        self.render_status()
    }

    // -----------------------------------------------------------------------
    // Chrome
    // -----------------------------------------------------------------------

    fn render_menubar(&mut self, width: u16) -> Result<()> {
        let keys = &self.config.key_bindings;
        let items = [
            format!("[{}] run/pause", keys.toggle_run),
            format!("[{}] reset", keys.reset),
            format!("[{}] step", keys.step),
            format!("[{}][Esc] quit", keys.quit),
        ];
        let title = format!(" {} ", self.title);

        let out = self.session.sink_mut().out_mut();
        queue!(
            out,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                queue!(out, style::Print("  "))?;
            }
            print_key_hint(out, item)?;
        }
        let title_x = width.saturating_sub(title.chars().count() as u16);
        queue!(
            out,
            cursor::MoveTo(title_x, 0),
            style::PrintStyledContent(style::StyledContent::new(
                to_content_style(&Style::fg(NamedColor::Green).bold()),
                title
            )),
        )?;
        out.flush()?;
        Ok(())
    }

    fn render_status(&mut self) -> Result<()> {
        let surface = self.session.surface();
        let status_y = surface.height + CANVAS_OFFSET;
        let status = status_line(&self.session);

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        let out = self.session.sink_mut().out_mut();
        queue!(
            out,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        out.flush()?;
        Ok(())
    }
}

/// Text of the bottom status bar: coordinate readout, progress through the
/// queue and run state.
pub fn status_line<S: FrameSink>(session: &Session<S>) -> String {
    let readout = session.readout();
    let state = if readout.idle {
        "\u{25b6} robot ready"
    } else if session.is_finished() {
        "finished"
    } else if session.is_running() {
        "running"
    } else {
        "paused"
    };
    let queued = session.queue().len();
    let current = session.engine().cursor().command_index().min(queued);
    format!(
        " X: {} Y: {} | heading {:.0}\u{b0} | command {}/{} | {} ",
        readout.x, readout.y, readout.heading, current, queued, state,
    )
}

/// Print a key hint, bolding any text inside `[...]` brackets and dimming the
/// rest.
fn print_key_hint<W: Write>(out: &mut W, item: &str) -> Result<()> {
    let mut rest = item;
    while let Some(open) = rest.find('[') {
        if open > 0 {
            print_with(out, style::Attribute::Dim, &rest[..open])?;
        }
        rest = &rest[open..];
        let Some(close) = rest.find(']') else {
            break;
        };
        print_with(out, style::Attribute::Bold, &rest[..=close])?;
        rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
        print_with(out, style::Attribute::Dim, rest)?;
    }
    Ok(())
}

fn print_with<W: Write>(out: &mut W, attr: style::Attribute, text: &str) -> Result<()> {
    queue!(
        out,
        style::SetAttribute(attr),
        style::Print(text),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: NamedColor) -> style::Color {
    match c {
        NamedColor::Black => style::Color::Black,
        NamedColor::Red => style::Color::Red,
        NamedColor::Green => style::Color::Green,
        NamedColor::Yellow => style::Color::Yellow,
        NamedColor::Blue => style::Color::Blue,
        NamedColor::Magenta => style::Color::Magenta,
        NamedColor::Cyan => style::Color::Cyan,
        NamedColor::White => style::Color::White,
        NamedColor::DarkGrey => style::Color::DarkGrey,
    }
}
