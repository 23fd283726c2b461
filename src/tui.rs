//! Terminal User Interface for the greenhouse lighting controller
//!
//! Stands in for the control-room window: readings, the illuminance gauge,
//! status summary, control buttons (as key bindings) and the event log.

use crate::*;
use crate::display::{self, DisplayModel, LightIndicator, LuxLevel};
use crate::scheduler::{Scheduler, Tick};
use chrono::{Local, Timelike};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, BorderType, Paragraph, List, ListItem, Gauge},
    Frame, Terminal,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;

/// Longest wait for a key before re-checking the scheduler
const INPUT_POLL: Duration = Duration::from_millis(100);

const ORANGE: Color = Color::Rgb(255, 165, 0);

pub struct TuiApp {
    controller: SharedController,
    scheduler: Scheduler,
    rng: StdRng,
    clock_text: String,
    should_quit: bool,
    help_visible: bool,
}

impl TuiApp {
    pub fn new(controller: SharedController) -> Self {
        Self {
            controller,
            scheduler: Scheduler::new(Instant::now()),
            rng: StdRng::from_entropy(),
            clock_text: Local::now().format("%H:%M:%S").to_string(),
            should_quit: false,
            help_visible: false,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.tui_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.controller.write().shutdown(Local::now());
        result
    }

    async fn tui_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| self.ui(f))?;

            if self.should_quit {
                break;
            }

            let timeout = self.scheduler.until_next(Instant::now()).min(INPUT_POLL);
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_input(key.code, key.modifiers);
                    }
                }
            }

            for tick in self.scheduler.poll(Instant::now()) {
                self.on_tick(tick);
            }
        }

        Ok(())
    }

    fn on_tick(&mut self, tick: Tick) {
        let now = Local::now();
        match tick {
            Tick::Clock => self.clock_text = now.format("%H:%M:%S").to_string(),
            Tick::Data => {
                let outcome = self.controller.write().data_tick(now, &mut self.rng);
                debug!(?outcome, "data tick");
            }
        }
    }

    fn handle_input(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if self.help_visible {
            self.help_visible = false;
            return;
        }

        let now = Local::now();
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::F(1) => self.help_visible = true,
            KeyCode::Char('1') => {
                self.controller.write().command(ModeCommand::SetForcedOn, now);
            },
            KeyCode::Char('0') => {
                self.controller.write().command(ModeCommand::SetForcedOff, now);
            },
            KeyCode::Char('a') => {
                self.controller.write().command(ModeCommand::SetAuto, now);
            },
            KeyCode::Char('c') => {
                self.controller.write().clear_log(now);
            },
            _ => {}
        }
    }

    fn ui(&self, f: &mut Frame) {
        if self.help_visible {
            self.render_help(f);
            return;
        }

        let model = {
            let controller = self.controller.read();
            display::render(controller.state(), controller.log(), Local::now().hour())
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Title
                Constraint::Length(5),  // Readings
                Constraint::Length(3),  // Gauge
                Constraint::Length(8),  // Status + controls
                Constraint::Min(6),     // Log
                Constraint::Length(3),  // Footer
            ])
            .split(f.area());

        self.render_title(f, chunks[0]);
        self.render_readings(f, chunks[1], &model);
        self.render_gauge(f, chunks[2], &model);
        self.render_status(f, chunks[3], &model);
        self.render_log(f, chunks[4], &model);
        self.render_footer(f, chunks[5], &model);
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let title = Paragraph::new("GREENHOUSE LIGHTING CONTROL")
            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Double));
        f.render_widget(title, area);
    }

    fn render_readings(&self, f: &mut Frame, area: Rect, model: &DisplayModel) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(35),
                Constraint::Percentage(35),
            ])
            .split(area);

        let lux_color = match model.lux_level {
            LuxLevel::High => Color::Red,
            LuxLevel::Low => ORANGE,
            LuxLevel::Normal => Color::Green,
        };

        let panels = [
            ("Time", self.clock_text.as_str(), Color::Cyan),
            ("Indoor", model.indoor_text.as_str(), lux_color),
            ("Outdoor", model.outdoor_text.as_str(), Color::Yellow),
        ];

        for ((title, value, color), chunk) in panels.into_iter().zip(chunks.iter()) {
            let text = Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(Block::default().title(title).borders(Borders::ALL));
            f.render_widget(text, *chunk);
        }
    }

    fn render_gauge(&self, f: &mut Frame, area: Rect, model: &DisplayModel) {
        let color = match model.light {
            LightIndicator::On => Color::LightGreen,
            LightIndicator::Off => Color::Red,
        };

        let gauge = Gauge::default()
            .block(Block::default().title("Indoor Illuminance").borders(Borders::ALL))
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .ratio(model.progress_ratio().clamp(0.0, 1.0))
            .label(format!("{:.0} / {:.0} lx", model.progress, config::PROGRESS_MAX_LUX));
        f.render_widget(gauge, area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect, model: &DisplayModel) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let status_text: Vec<Line> = model
            .status_lines
            .iter()
            .map(|line| Line::from(line.as_str()))
            .collect();

        let status = Paragraph::new(status_text)
            .block(Block::default()
                .title("System Status")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)));
        f.render_widget(status, chunks[0]);

        let controls = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("[1] ", Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD)),
                Span::raw("Force light ON"),
            ]),
            Line::from(vec![
                Span::styled("[0] ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::raw("Force light OFF"),
            ]),
            Line::from(vec![
                Span::styled("[a] ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw("Automatic mode"),
            ]),
            Line::from(vec![
                Span::styled("[c] ", Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
                Span::raw("Clear event log"),
            ]),
        ])
        .block(Block::default()
            .title("Controls")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)));
        f.render_widget(controls, chunks[1]);
    }

    fn render_log(&self, f: &mut Frame, area: Rect, model: &DisplayModel) {
        let log_items: Vec<ListItem> = model
            .log_lines
            .iter()
            .take(area.height.saturating_sub(2) as usize)
            .map(|msg| {
                let style = if msg.contains("WARNING") {
                    Style::default().fg(ORANGE)
                } else if msg.contains("OPERATOR") {
                    Style::default().fg(Color::Cyan)
                } else if msg.contains("Auto:") || msg.contains("Manual:") {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                ListItem::new(msg.as_str()).style(style)
            })
            .collect();

        let log_list = List::new(log_items)
            .block(Block::default().title("Event Log").borders(Borders::ALL));
        f.render_widget(log_list, area);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect, model: &DisplayModel) {
        let footer = Paragraph::new(Line::from(vec![
            Span::raw(model.footer.as_str()),
            Span::styled("   ? help  q quit", Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(footer, area);
    }

    fn render_help(&self, f: &mut Frame) {
        let help_text = vec![
            Line::from(Span::styled("GREENHOUSE LIGHTING CONTROL - HELP", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("BASIC CONTROLS:"),
            Line::from("  q, ESC       - Quit"),
            Line::from("  ?, F1        - Show this help"),
            Line::from(""),
            Line::from("LIGHTING:"),
            Line::from("  1            - Force light ON (disables automatic control)"),
            Line::from("  0            - Force light OFF (disables automatic control)"),
            Line::from("  a            - Return to automatic mode"),
            Line::from("  c            - Clear the event log"),
            Line::from(""),
            Line::from(Span::styled("AUTOMATIC MODE:", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
            Line::from(format!(
                "Daytime {:02}:00-{:02}:00: light off above {:.0} lx.",
                config::DAY_START_HOUR, config::DAY_END_HOUR, config::DAY_THRESHOLD_LUX
            )),
            Line::from(format!("Night: light off above {:.0} lx.", config::NIGHT_THRESHOLD_LUX)),
            Line::from("Readings refresh every 3 seconds."),
            Line::from(""),
            Line::from("Press any key to close help..."),
        ];

        let help_block = Paragraph::new(help_text)
            .block(Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_type(BorderType::Double))
            .style(Style::default().bg(Color::Black));

        let area = centered_rect(70, 70, f.area());
        f.render_widget(Block::default().style(Style::default().bg(Color::Black)), f.area());
        f.render_widget(help_block, area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(70, 70, outer);
        assert!(inner.width < outer.width && inner.height < outer.height);
        assert!(inner.x > 0 && inner.y > 0);
    }

    #[test]
    fn test_keys_drive_controller() {
        let controller = create_controller();
        let mut app = TuiApp::new(controller.clone());

        app.handle_input(KeyCode::Char('1'), KeyModifiers::NONE);
        assert_eq!(controller.read().state().mode, LightingMode::ForcedOn);
        assert!(controller.read().state().is_light_on);

        app.handle_input(KeyCode::Char('0'), KeyModifiers::NONE);
        assert!(!controller.read().state().is_light_on);

        app.handle_input(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(controller.read().state().mode, LightingMode::Auto);

        app.handle_input(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(controller.read().log().len(), 1);

        app.handle_input(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let controller = create_controller();
        let mut app = TuiApp::new(controller.clone());

        app.handle_input(KeyCode::F(1), KeyModifiers::NONE);
        assert!(app.help_visible);
        app.handle_input(KeyCode::Char('1'), KeyModifiers::NONE);
        assert!(!app.help_visible);
        assert_eq!(controller.read().state().mode, LightingMode::Auto);
    }

    #[test]
    fn test_data_tick_updates_readings() {
        let controller = create_controller();
        let mut app = TuiApp::new(controller.clone());

        app.on_tick(Tick::Data);
        assert!(controller.read().state().last_update.is_some());
    }
}
