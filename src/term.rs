use crate::config::{HostConfig, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::display::Display;
use crate::error::HostError;
use crate::frame::RenderBuffer;
use crate::input::{EventSource, InputEvent, PhysicalKey};
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::debug;
use std::io;
use std::time::Duration;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// canvas bounds: x grows right, y grows *up* in tui so rows are negated
const X_BOUNDS: [f64; 2] = [0.0, (SCREEN_WIDTH - 1) as f64];
const Y_BOUNDS: [f64; 2] = [-((SCREEN_HEIGHT - 1) as f64), 0.0];

/// monochrome display in a terminal, rendered using TUI and crossterm
///
/// Terminals only report key presses, never releases, so a key is treated as
/// tapped: it is released again at the start of the next poll.
pub struct TermFrontend {
    terminal: Option<Terminal<CrosstermBackend<io::Stdout>>>,
    title: &'static str,
    tapped: Vec<PhysicalKey>,
}

impl TermFrontend {
    pub fn new(config: &HostConfig) -> Result<Self, HostError> {
        enable_raw_mode().map_err(|e| HostError::Surface(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| HostError::Surface(e.to_string()))?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| HostError::Surface(e.to_string()))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok(TermFrontend {
            terminal: Some(terminal),
            title: config.title,
            tapped: Vec::new(),
        })
    }
}

/// canvas coordinates of every lit pixel
fn lit_points(frame: &RenderBuffer) -> Vec<(f64, f64)> {
    (0..SCREEN_HEIGHT)
        .flat_map(|y| (0..SCREEN_WIDTH).map(move |x| (x, y)))
        .filter(|&(x, y)| frame.is_lit(x, y))
        .map(|(x, y)| (x as f64, -(y as f64)))
        .collect()
}

impl Display for TermFrontend {
    fn present(&mut self, frame: &RenderBuffer) -> Result<(), HostError> {
        let terminal = self
            .terminal
            .as_mut()
            .ok_or_else(|| HostError::Surface(String::from("terminal already released")))?;
        let coords = lit_points(frame);
        let title = self.title;
        // one terminal cell per pixel, plus the border
        terminal.draw(|f| {
            let size = Rect::new(
                0,
                0,
                2 + SCREEN_WIDTH as u16,
                2 + SCREEN_HEIGHT as u16,
            )
            .intersection(f.size());
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(X_BOUNDS)
                .y_bounds(Y_BOUNDS)
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &coords,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(mut terminal) = self.terminal.take() {
            // best effort: there's nowhere left to report failures to
            let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
            let _ = terminal.show_cursor();
            let _ = disable_raw_mode();
            debug!("terminal restored");
        }
    }
}

impl EventSource for TermFrontend {
    fn pending_events(&mut self) -> Result<Vec<InputEvent>, HostError> {
        let mut events: Vec<InputEvent> = self.tapped.drain(..).map(InputEvent::KeyUp).collect();
        while poll(Duration::from_millis(0))? {
            if let Event::Key(key) = read()? {
                match translate(key) {
                    Some(InputEvent::KeyDown(k)) => {
                        self.tapped.push(k);
                        events.push(InputEvent::KeyDown(k));
                    }
                    Some(other) => events.push(other),
                    None => debug!("ignoring {:?}", key.code),
                }
            }
        }
        Ok(events)
    }
}

impl Drop for TermFrontend {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// raw mode swallows SIGINT, so ctrl-c closes like a window would
fn translate(key: KeyEvent) -> Option<InputEvent> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputEvent::Close)
        }
        KeyCode::Char(c) => Some(InputEvent::KeyDown(PhysicalKey::Char(
            c.to_ascii_lowercase(),
        ))),
        KeyCode::Esc => Some(InputEvent::KeyDown(PhysicalKey::Escape)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PIXEL_COUNT;

    #[test]
    fn test_bounds() {
        assert_eq!(X_BOUNDS, [0.0, 63.0]);
        assert_eq!(Y_BOUNDS, [-31.0, 0.0]);
    }

    #[test]
    fn test_blank_frame_has_no_points() {
        assert!(lit_points(&RenderBuffer::new()).is_empty());
    }

    #[test]
    fn test_points_are_flipped() {
        let mut plane = [0u8; PIXEL_COUNT];
        plane[SCREEN_WIDTH * 2 + 5] = 1;
        let mut frame = RenderBuffer::new();
        frame.decode(&plane);
        assert_eq!(lit_points(&frame), vec![(5.0, -2.0)]);
    }

    #[test]
    fn test_translate() {
        let k = |code, modifiers| KeyEvent::new(code, modifiers);
        assert_eq!(
            translate(k(KeyCode::Char('W'), KeyModifiers::SHIFT)),
            Some(InputEvent::KeyDown(PhysicalKey::Char('w')))
        );
        assert_eq!(
            translate(k(KeyCode::Esc, KeyModifiers::NONE)),
            Some(InputEvent::KeyDown(PhysicalKey::Escape))
        );
        assert_eq!(
            translate(k(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputEvent::Close)
        );
        assert_eq!(translate(k(KeyCode::F(1), KeyModifiers::NONE)), None);
    }
}
