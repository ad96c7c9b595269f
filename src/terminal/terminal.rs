use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, TerminalEvent};
use crate::ui::span::SpanLine;
use crate::ui::style::Color;
use crate::ui::view::FormView;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::{Attribute, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Inline terminal surface: the form is redrawn in place below the prompt
/// line instead of taking over the screen.
pub struct Terminal {
    stdout: Stdout,
    drawn_lines: u16,
    cursor_row: u16,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            stdout: io::stdout(),
            drawn_lines: 0,
            cursor_row: 0,
        })
    }

    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    pub fn show_cursor(&mut self) -> io::Result<()> {
        execute!(self.stdout, cursor::Show)?;
        Ok(())
    }

    pub fn poll_event(&mut self, timeout: Duration) -> io::Result<TerminalEvent> {
        if !event::poll(timeout)? {
            return Ok(TerminalEvent::Tick);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Ok(TerminalEvent::Key(map_key_event(key)))
            }
            Event::Resize(width, height) => Ok(TerminalEvent::Resize { width, height }),
            _ => Ok(TerminalEvent::Tick),
        }
    }

    /// Replaces the previously drawn block with `view`.
    pub fn draw(&mut self, view: &FormView) -> io::Result<()> {
        queue!(self.stdout, cursor::Hide, cursor::MoveToColumn(0))?;
        if self.cursor_row > 0 {
            queue!(self.stdout, cursor::MoveUp(self.cursor_row))?;
        }
        queue!(self.stdout, terminal::Clear(terminal::ClearType::FromCursorDown))?;

        for (idx, line) in view.lines.iter().enumerate() {
            if idx > 0 {
                write!(self.stdout, "\r\n")?;
            }
            self.render_line(line)?;
        }

        let last_row = view.lines.len().saturating_sub(1) as u16;
        self.drawn_lines = view.lines.len() as u16;
        self.cursor_row = last_row;

        if let Some(pos) = view.cursor {
            let row = pos.row.min(last_row);
            if last_row > row {
                queue!(self.stdout, cursor::MoveUp(last_row - row))?;
            }
            queue!(self.stdout, cursor::MoveToColumn(pos.col), cursor::Show)?;
            self.cursor_row = row;
        }

        self.stdout.flush()
    }

    /// Leaves the cursor on a fresh line below the drawn block.
    pub fn finish(&mut self) -> io::Result<()> {
        let last_row = self.drawn_lines.saturating_sub(1);
        if last_row > self.cursor_row {
            queue!(self.stdout, cursor::MoveDown(last_row - self.cursor_row))?;
        }
        write!(self.stdout, "\r\n")?;
        self.drawn_lines = 0;
        self.cursor_row = 0;
        self.stdout.flush()
    }

    fn render_line(&mut self, line: &SpanLine) -> io::Result<()> {
        for span in line {
            let has_style = span.style.color.is_some() || span.style.bold || span.style.dim;

            if let Some(fg) = span.style.color {
                queue!(self.stdout, SetForegroundColor(map_color(fg)))?;
            }
            if span.style.bold {
                queue!(self.stdout, SetAttribute(Attribute::Bold))?;
            }
            if span.style.dim {
                queue!(self.stdout, SetAttribute(Attribute::Dim))?;
            }

            write!(self.stdout, "{}", span.text)?;

            if has_style {
                queue!(self.stdout, SetAttribute(Attribute::Reset), ResetColor)?;
            }
        }
        Ok(())
    }
}

fn map_color(color: Color) -> crossterm::style::Color {
    match color {
        Color::DarkGrey => crossterm::style::Color::DarkGrey,
        Color::Red => crossterm::style::Color::Red,
        Color::Green => crossterm::style::Color::Green,
        Color::Yellow => crossterm::style::Color::Yellow,
        Color::Cyan => crossterm::style::Color::Cyan,
    }
}

fn map_key_event(event: crossterm::event::KeyEvent) -> KeyEvent {
    KeyEvent {
        code: map_key_code(event.code),
        modifiers: map_key_modifiers(event.modifiers),
    }
}

fn map_key_code(code: crossterm::event::KeyCode) -> KeyCode {
    match code {
        crossterm::event::KeyCode::Char(ch) => KeyCode::Char(ch),
        crossterm::event::KeyCode::Backspace => KeyCode::Backspace,
        crossterm::event::KeyCode::Enter => KeyCode::Enter,
        crossterm::event::KeyCode::Esc => KeyCode::Esc,
        crossterm::event::KeyCode::Up => KeyCode::Up,
        crossterm::event::KeyCode::Down => KeyCode::Down,
        crossterm::event::KeyCode::Tab => KeyCode::Tab,
        crossterm::event::KeyCode::BackTab => KeyCode::BackTab,
        _ => KeyCode::Unknown,
    }
}

fn map_key_modifiers(modifiers: crossterm::event::KeyModifiers) -> KeyModifiers {
    let mut mapped = KeyModifiers::NONE;
    if modifiers.contains(crossterm::event::KeyModifiers::SHIFT) {
        mapped |= KeyModifiers::SHIFT;
    }
    if modifiers.contains(crossterm::event::KeyModifiers::CONTROL) {
        mapped |= KeyModifiers::CONTROL;
    }
    if modifiers.contains(crossterm::event::KeyModifiers::ALT) {
        mapped |= KeyModifiers::ALT;
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::{map_key_code, map_key_event};
    use crate::terminal::{KeyCode, KeyModifiers};
    use crossterm::event::KeyCode as CtKeyCode;

    #[test]
    fn unhandled_keys_map_to_unknown() {
        for code in [CtKeyCode::Left, CtKeyCode::Right, CtKeyCode::Delete, CtKeyCode::F(1)] {
            assert_eq!(map_key_code(code), KeyCode::Unknown, "code {code:?}");
        }
        assert_eq!(map_key_code(CtKeyCode::Backspace), KeyCode::Backspace);
        assert_eq!(map_key_code(CtKeyCode::Char('x')), KeyCode::Char('x'));
    }

    #[test]
    fn modifiers_are_carried_over() {
        let event = crossterm::event::KeyEvent::new(
            CtKeyCode::Char('s'),
            crossterm::event::KeyModifiers::CONTROL,
        );
        let mapped = map_key_event(event);
        assert_eq!(mapped.code, KeyCode::Char('s'));
        assert!(mapped.modifiers.contains(KeyModifiers::CONTROL));
        assert!(!mapped.modifiers.contains(KeyModifiers::SHIFT));
    }
}
