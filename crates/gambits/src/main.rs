mod form;
mod input;
mod logging;
mod waitlist;

use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use gambits_config::{Config, ConfigError};
use gambits_core::{BackgroundStyle, Viewport};
use gambits_field::{BackgroundState, ShapeBuffer, to_color};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};

use crate::form::{EmailForm, FormStatus};
use crate::waitlist::{Submission, WaitlistClient};

const HEADLINE: &str = "Victory favors the bold.";
const SUBHEADLINE: &str = "Make every move count: Gambits is a chess trainer for players who attack.";
const SUBMITTING_TEXT: &str = "Sacrificing...";
const SUCCESS_TITLE: &str = "Checkmate!";
const SUCCESS_TEXT: &str = "You've successfully joined the waitlist. We'll be in touch soon.";
const FOOTNOTE: &str = "Join the queue. No spam, just gambits.";

/// Upper bound on how long the loop sleeps while no frame is pending, so
/// finished signups still show up promptly.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Width of the form column.
const FORM_WIDTH: u16 = 56;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let log_path = logging::init(gambits_config::data_dir()).ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(ConfigError::NoConfigDir) => {
            tracing::warn!("No config directory on this platform, using defaults");
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };
    if let Some(path) = &log_path {
        tracing::info!("Logging to {}", path.display());
    }

    let terminal = ratatui::init();
    let result = execute!(stdout(), EnableMouseCapture, EnableFocusChange)
        .map_err(color_eyre::Report::from)
        .and_then(|()| App::new(config).run(terminal));
    // Best effort: the terminal is being torn down either way.
    let _ = execute!(stdout(), DisableMouseCapture, DisableFocusChange);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    /// Background currently shown; changes with Tab.
    style: BackgroundStyle,
    ripples_enabled: bool,
    /// Terminal size in cells.
    size: (u16, u16),
    background: BackgroundState,
    /// Shapes drawn by the last background frame.
    shapes: ShapeBuffer,
    form: EmailForm,
    waitlist: WaitlistClient,
    submission: Option<Submission>,
}

impl App {
    /// Construct a new instance of [`App`]. The background stays idle until
    /// [`run`](Self::run) knows the terminal size.
    pub fn new(config: Config) -> Self {
        let style = config.background.style;
        let ripples_enabled = config.field.ripples_enabled;
        let background = BackgroundState::mount(
            &config.background,
            config.field.clone(),
            config.grid.clone(),
            None,
            StdRng::from_os_rng(),
            Instant::now(),
        );
        let waitlist = WaitlistClient::new(config.waitlist.endpoint.clone());
        Self {
            running: false,
            config,
            style,
            ripples_enabled,
            size: (0, 0),
            background,
            shapes: ShapeBuffer::new(),
            form: EmailForm::new(),
            waitlist,
            submission: None,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let size = terminal.size()?;
        self.size = (size.width, size.height);
        self.mount_background();

        while self.running {
            self.background.frame(Instant::now(), &mut self.shapes);
            self.poll_submission();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }

        self.background.unmount();
        Ok(())
    }

    /// Tear down the current background and mount `self.style` over the
    /// whole terminal.
    fn mount_background(&mut self) {
        let (cols, rows) = self.size;
        self.background.unmount();
        self.shapes.reset();

        let mut background = self.config.background.clone();
        background.style = self.style;
        let mut field = self.config.field.clone();
        field.ripples_enabled = self.ripples_enabled;

        self.background = BackgroundState::mount(
            &background,
            field,
            self.config.grid.clone(),
            Viewport::from_cells(cols, rows),
            StdRng::from_os_rng(),
            Instant::now(),
        );
    }

    fn poll_submission(&mut self) {
        let Some(result) = self.submission.as_ref().and_then(Submission::poll) else {
            return;
        };
        self.submission = None;
        self.form.finish(result);
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let palette = &self.config.field.palette;
        let accent = to_color(palette.accent);
        let text = to_color(palette.particle);

        if self.background.is_active() {
            frame.render_widget(&self.shapes, area);
        }

        let rows = Layout::vertical([
            Constraint::Fill(1),   // Top padding
            Constraint::Length(1), // Headline
            Constraint::Length(1), // Spacing
            Constraint::Length(2), // Subheadline
            Constraint::Length(2), // Spacing
            Constraint::Length(3), // Email input
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Call to action
            Constraint::Length(1), // Footnote
            Constraint::Fill(1),   // Bottom padding
            Constraint::Length(1), // Help text
        ])
        .split(area);

        let headline = Paragraph::new(HEADLINE.bold().fg(text)).alignment(Alignment::Center);
        frame.render_widget(headline, rows[1]);

        let subheadline = Paragraph::new(SUBHEADLINE.fg(Color::Gray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(subheadline, centered(rows[3], FORM_WIDTH));

        match self.form.status() {
            FormStatus::Submitted => {
                let title = Paragraph::new(SUCCESS_TITLE.bold().fg(accent))
                    .alignment(Alignment::Center);
                frame.render_widget(title, rows[5]);
                let body = Paragraph::new(SUCCESS_TEXT.fg(text))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true });
                frame.render_widget(body, centered(rows[6], FORM_WIDTH + 20));
                let again = Line::from(vec![
                    "enter".bold().fg(accent),
                    " add another email".dark_gray(),
                ])
                .centered();
                frame.render_widget(again, rows[7]);
            }
            status => {
                let input_area = centered(rows[5], FORM_WIDTH);
                let border = match status {
                    FormStatus::Error(_) => Style::new().fg(accent),
                    _ => Style::new().fg(Color::DarkGray),
                };
                let input = if self.form.email().is_empty() {
                    Line::from("Enter your email".dark_gray())
                } else {
                    Line::from(self.form.email().fg(text))
                };
                frame.render_widget(Clear, input_area);
                frame.render_widget(
                    Paragraph::new(input).block(
                        Block::bordered()
                            .border_type(BorderType::Rounded)
                            .border_style(border),
                    ),
                    input_area,
                );
                if self.form.is_editable() {
                    let cursor_x = input_area.x + 1 + self.form.email().chars().count() as u16;
                    if cursor_x < input_area.right().saturating_sub(1) {
                        frame.set_cursor_position((cursor_x, input_area.y + 1));
                    }
                }

                if let FormStatus::Error(message) = status {
                    let error = Paragraph::new(message.as_str().fg(accent))
                        .alignment(Alignment::Center);
                    frame.render_widget(error, rows[6]);
                }

                let cta = match status {
                    FormStatus::Submitting => Line::from(SUBMITTING_TEXT.bold().fg(accent)),
                    _ => Line::from(vec![
                        "enter".bold().fg(accent),
                        " ".into(),
                        self.config.waitlist.cta_text.as_str().fg(text),
                    ]),
                };
                frame.render_widget(cta.centered(), rows[7]);
                frame.render_widget(Line::from(FOOTNOTE.dark_gray()).centered(), rows[8]);
            }
        }

        let ripples = if self.ripples_enabled { "on" } else { "off" };
        let help = Line::from(vec![
            "esc".bold().fg(accent),
            " quit  ".dark_gray(),
            "tab".bold().fg(accent),
            format!(" background: {}  ", self.style.name()).dark_gray(),
            "ctrl-r".bold().fg(accent),
            format!(" ripples: {ripples}").dark_gray(),
        ])
        .centered();
        frame.render_widget(help, rows[10]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits no longer than the next background frame.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let timeout = self
            .background
            .timeout(Instant::now())
            .map_or(IDLE_POLL, |t| t.min(IDLE_POLL));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                event => self.on_field_event(&event),
            }
        }
        Ok(())
    }

    /// Forward mouse, focus and resize events to the background.
    fn on_field_event(&mut self, event: &Event) {
        let Some(field_event) = input::field_event(event) else {
            return;
        };
        if let Event::Resize(cols, rows) = *event {
            self.size = (cols, rows);
            // A background that never mounted (zero-sized terminal) gets a
            // second chance once there is room to draw.
            if !self.background.is_active() {
                self.mount_background();
                return;
            }
        }
        self.background.handle_event(field_event);
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc)
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (KeyModifiers::CONTROL, KeyCode::Char('r') | KeyCode::Char('R')) => {
                self.toggle_ripples()
            }
            (_, KeyCode::Tab) => self.cycle_background(),
            (_, KeyCode::Enter) => self.submit(),
            (_, KeyCode::Backspace) => self.form.backspace(),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => self.form.push_char(c),
            _ => {}
        }
    }

    /// Cycle through the background styles, remounting each time.
    fn cycle_background(&mut self) {
        self.style = self.style.next();
        tracing::info!("Switching background to {}", self.style.name());
        self.mount_background();
    }

    fn toggle_ripples(&mut self) {
        self.ripples_enabled = !self.ripples_enabled;
        self.background.set_ripples_enabled(self.ripples_enabled);
    }

    fn submit(&mut self) {
        if *self.form.status() == FormStatus::Submitted {
            self.form.reset();
            return;
        }
        if let Some(email) = self.form.begin_submit() {
            tracing::debug!("Submitting waitlist signup to {}", self.waitlist.endpoint());
            self.submission = Some(self.waitlist.submit(email));
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// A horizontally centred strip of at most `width` columns.
fn centered(area: Rect, width: u16) -> Rect {
    let [_, middle, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .areas(area);
    middle
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(app: &mut App, cols: u16, rows: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(cols, rows)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_renders_landing_copy() {
        let mut app = App::new(Config::default());
        let screen = screen_text(&mut app, 100, 30);
        assert!(screen.contains(HEADLINE));
        assert!(screen.contains("Enter your email"));
        assert!(screen.contains(&Config::default().waitlist.cta_text));
    }

    #[test]
    fn test_invalid_email_shows_error() {
        let mut app = App::new(Config::default());
        for c in "nope".chars() {
            app.on_key_event(key(KeyCode::Char(c)));
        }
        app.on_key_event(key(KeyCode::Enter));
        assert!(app.submission.is_none());
        let screen = screen_text(&mut app, 100, 30);
        assert!(screen.contains(form::EMAIL_INVALID));
    }

    #[test]
    fn test_tab_cycles_background() {
        let mut app = App::new(Config::default());
        app.size = (80, 24);
        app.mount_background();
        assert!(app.background.is_active());

        app.on_key_event(key(KeyCode::Tab));
        assert_eq!(app.background.style(), BackgroundStyle::GridWarp);
        assert!(app.background.is_active());

        app.on_key_event(key(KeyCode::Tab));
        assert_eq!(app.background.style(), BackgroundStyle::None);
        assert!(!app.background.is_active());
    }

    #[test]
    fn test_resize_remounts_idle_background() {
        let mut app = App::new(Config::default());
        assert!(!app.background.is_active());
        app.on_field_event(&Event::Resize(80, 24));
        assert!(app.background.is_active());
        assert_eq!(app.background.viewport(), Viewport::new(800.0, 480.0));
    }

    #[test]
    fn test_escape_quits() {
        let mut app = App::new(Config::default());
        app.running = true;
        app.on_key_event(key(KeyCode::Esc));
        assert!(!app.running);
    }
}
