use crate::{Coords, TermInt};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

pub type Cell = (TermInt, TermInt);

/// Terminal screen with a local copy of every printed cell, so a message
/// box can be hidden again without redrawing the game.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Cell,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error disabling raw mode")?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking)
            .context("Error showing cursor")?;
        execute!(self.stdout, LeaveAlternateScreen).context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("Error reading key")? {
                return Ok(ev);
            }
        }
    }

    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1)).context("Error polling events")? {
            if let Event::Key(ev) = read().context("Error reading event")? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Cell {
        (self.width, self.height)
    }

    /// Frames a grid of `size` tiles. Tile `(x, y)` sits at terminal cell
    /// `(x, y)`, inside the frame.
    pub fn draw_borders(&mut self, size: Cell) -> Result<()> {
        let (width, height) = (size.0 + 2, size.1 + 2);
        let end_x = width - 1;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == width - 1 {'+'} else {'-'};
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..height - 1 {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        self.flush()
    }

    /// Prints the tiles of `rows` that differ from what is on screen.
    pub fn draw_grid(&mut self, rows: &[Vec<char>]) -> Result<()> {
        for (y, row) in rows.iter().enumerate() {
            for (x, &ch) in row.iter().enumerate() {
                let cell = (x as TermInt + 1, y as TermInt + 1);
                if self.screen_at(cell) != Some(ch) {
                    self.print_at(cell, ch)?;
                }
            }
        }

        self.flush()
    }

    /// Prints `glyph` on the grid tile `pos`, if it maps to a terminal cell.
    pub fn draw_tile(&mut self, pos: Coords, glyph: char) -> Result<()> {
        if pos.0 < 1 || pos.1 < 1 || pos.0 > i32::from(self.width) || pos.1 > i32::from(self.height) {
            return Ok(());
        }
        self.print_at((pos.0 as TermInt, pos.1 as TermInt), glyph)
    }

    pub fn draw_line(&mut self, y: TermInt, text: &str) -> Result<()> {
        let padded = format!("{text: <width$}", text = text, width = self.width as usize);
        for (x, ch) in padded.chars().enumerate().take(self.width as usize) {
            self.print_at((x as TermInt, y), ch)?;
        }
        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let cell = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(ch) = self.screen_at(cell) {
                    self.print_at_no_save(cell, ch)?;
                }
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, cell: Cell, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(cell.0, cell.1), style::Print(ch))
            .context("Error printing")?;
        if let Some(i) = self.screen_index(cell) {
            self.screen[i] = ch;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_at_no_save(&mut self, cell: Cell, ch: char) -> Result<()> {
        // Message boxes stay out of the screen buffer so hiding them can
        // restore what was underneath.
        queue!(self.stdout, cursor::MoveTo(cell.0, cell.1), style::Print(ch))
            .context("Error printing")
    }

    fn screen_index(&self, cell: Cell) -> Option<usize> {
        if cell.0 >= self.width || cell.1 >= self.height {
            return None;
        }
        Some(self.width as usize * cell.1 as usize + cell.0 as usize)
    }

    fn screen_at(&self, cell: Cell) -> Option<char> {
        self.screen_index(cell).map(|i| self.screen[i])
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Cell) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Cell {
        self.top_left
    }
}
