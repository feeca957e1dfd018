// Live alert monitor using ratatui. The dashboard never runs its own
// countdown: the banner and progress bar are derived from the scheduler's
// `current()` deadline, and dismissals arrive as scheduler events.
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph},
};
use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use crate::alerts::catalog::{IncidentCategory, Urgency};
use crate::alerts::scheduler::{AlertEvent, AlertScheduler, DismissReason};

/// Categories reachable via digit keys 1-8. Emergency has its own key.
const DIGIT_CATEGORIES: [IncidentCategory; 8] = [
    IncidentCategory::Drowsiness,
    IncidentCategory::Phone,
    IncidentCategory::Overspeed,
    IncidentCategory::Distraction,
    IncidentCategory::AggressiveDriving,
    IncidentCategory::LaneDeparture,
    IncidentCategory::WeatherAlert,
    IncidentCategory::Fatigue,
];

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub events: VecDeque<AlertEvent>,
    pub alerts_issued: u64,
    pub start_time: Instant,
    pub paused: bool,
    pub show_help: bool,
    pub refresh_rate: Duration,
    pub max_events: usize,
}

impl Default for DashboardState {
    fn default() -> Self {
        DashboardState {
            events: VecDeque::new(),
            alerts_issued: 0,
            start_time: Instant::now(),
            paused: false,
            show_help: false,
            refresh_rate: Duration::from_millis(200),
            max_events: 50,
        }
    }
}

impl DashboardState {
    pub fn new(refresh_rate_ms: u64) -> Self {
        DashboardState {
            refresh_rate: Duration::from_millis(refresh_rate_ms),
            ..Default::default()
        }
    }

    pub fn add_event(&mut self, event: AlertEvent) {
        if matches!(event, AlertEvent::Issued { .. }) {
            self.alerts_issued += 1;
        }
        self.events.push_back(event);
        if self.events.len() > self.max_events {
            self.events.pop_front();
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

pub struct Dashboard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    state: DashboardState,
    scheduler: AlertScheduler,
}

impl Dashboard {
    pub fn new(scheduler: AlertScheduler, refresh_rate_ms: u64) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Dashboard {
            terminal,
            state: DashboardState::new(refresh_rate_ms),
            scheduler,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        use tokio::time::interval;

        let mut events = self.scheduler.subscribe();
        let mut refresh_timer = interval(self.state.refresh_rate);

        loop {
            tokio::select! {
                Ok(alert_event) = events.recv() => {
                    self.state.add_event(alert_event);
                }

                _ = refresh_timer.tick() => {
                    if !self.state.paused {
                        self.draw()?;
                    }

                    if crossterm::event::poll(Duration::from_millis(10))? {
                        if let Event::Key(key) = event::read()? {
                            if key.kind == KeyEventKind::Press && !self.handle_key(key.code) {
                                break;
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns false when the dashboard should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('p') => self.state.toggle_pause(),
            KeyCode::Char('h') | KeyCode::F(1) => self.state.toggle_help(),
            KeyCode::Char('d') => self.scheduler.dismiss(),
            KeyCode::Char('a') => {
                let audio = self.scheduler.audio();
                audio.set_enabled(!audio.is_enabled());
            }
            KeyCode::Char('t') => self.scheduler.test_audio(),
            KeyCode::Char('e') => {
                self.scheduler.show_emergency_alert("Manual emergency trigger");
            }
            KeyCode::Char(c @ '1'..='8') => {
                let idx = (c as usize) - ('1' as usize);
                self.scheduler.show_alert(DIGIT_CATEGORIES[idx], 0.85);
            }
            _ => {}
        }
        true
    }

    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let show_help = self.state.show_help;
        let state = self.state.clone();
        let current = self.scheduler.current();
        let audio_on = self.scheduler.audio().is_enabled();

        self.terminal.draw(|f| {
            if show_help {
                render_help_popup(f);
            } else {
                render_main_layout(f, &state, current.as_ref(), audio_on);
            }
        })?;
        Ok(())
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn render_main_layout(
    f: &mut Frame,
    state: &DashboardState,
    current: Option<&crate::alerts::scheduler::ActiveAlert>,
    audio_on: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(6), // Alert banner
            Constraint::Min(0),    // Event history
            Constraint::Length(1), // Status line
        ])
        .split(f.size());

    render_header(f, chunks[0], state, audio_on);
    render_alert_banner(f, chunks[1], current);
    render_event_history(f, chunks[2], state);
    render_status_line(f, chunks[3], state);
}

fn render_header(f: &mut Frame, area: Rect, state: &DashboardState, audio_on: bool) {
    let uptime_str = format_duration(state.uptime());
    let status = if state.paused { " [PAUSED]" } else { "" };
    let audio_str = if audio_on { "on" } else { "off" };

    let header_text = vec![
        Line::from(vec![
            Span::styled(
                "driveguard Alert Monitor",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(status, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::raw("Uptime: "),
            Span::styled(uptime_str, Style::default().fg(Color::Green)),
            Span::raw(" | Alerts: "),
            Span::styled(state.alerts_issued.to_string(), Style::default().fg(Color::Yellow)),
            Span::raw(" | Audio: "),
            Span::styled(
                audio_str,
                Style::default().fg(if audio_on { Color::Green } else { Color::Gray }),
            ),
        ]),
    ];

    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).title("Driver Safety Alerts"));
    f.render_widget(header, area);
}

fn render_alert_banner(
    f: &mut Frame,
    area: Rect,
    current: Option<&crate::alerts::scheduler::ActiveAlert>,
) {
    let Some(active) = current else {
        let placeholder = Paragraph::new("All clear - no active alert")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Current Alert"));
        f.render_widget(placeholder, area);
        return;
    };

    let color = urgency_color(active.suggestion.urgency);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let banner_text = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", active.suggestion.urgency.to_string().to_uppercase()),
                Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                active.category.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            active.suggestion.message.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("Action: "),
            Span::styled(active.suggestion.action_label(), Style::default().fg(color)),
            Span::raw("  (press 'd' to dismiss)"),
        ]),
    ];

    let banner = Paragraph::new(banner_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title("Current Alert"),
    );
    f.render_widget(banner, chunks[0]);

    let progress = active.progress(Instant::now());
    let label = match active.remaining(Instant::now()) {
        Some(remaining) => format!("{:.1}s", remaining.as_secs_f64()),
        None => "until dismissed".to_string(),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(progress)
        .label(label);
    f.render_widget(gauge, chunks[1]);
}

fn render_event_history(f: &mut Frame, area: Rect, state: &DashboardState) {
    let available_height = area.height.saturating_sub(2);
    let max_events = (available_height as usize).max(1);

    let items: Vec<ListItem> = state
        .events
        .iter()
        .rev()
        .take(max_events)
        .map(|event| {
            let (icon, color, timestamp, text) = format_event_for_list(event);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{icon} "), Style::default().fg(color)),
                Span::styled(format!("[{timestamp}] "), Style::default().fg(Color::Gray)),
                Span::raw(text),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Recent Alerts"));
    f.render_widget(list, area);
}

fn render_status_line(f: &mut Frame, area: Rect, state: &DashboardState) {
    let status_text = if state.paused {
        "[PAUSED] 'p' resume | 1-8 trigger | 'e' emergency | 'd' dismiss | 'a' audio | 'q' quit"
    } else {
        "1-8 trigger | 'e' emergency | 'd' dismiss | 'a' audio | 't' test | 'h' help | 'q' quit"
    };

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(status, area);
}

fn render_help_popup(f: &mut Frame) {
    let area = centered_rect(60, 70, f.size());

    f.render_widget(Clear, area);

    let help_text = vec![
        Line::from(Span::styled(
            "driveguard Alert Monitor - Help",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::raw("Controls:"),
        Line::raw("  1-8          - Trigger an incident category"),
        Line::raw("  e            - Raise an emergency alert"),
        Line::raw("  d            - Dismiss the current alert"),
        Line::raw("  a            - Toggle audio warnings"),
        Line::raw("  t            - Play the audio test pattern"),
        Line::raw("  p            - Pause/Resume redraws"),
        Line::raw("  h / F1       - Show/Hide help"),
        Line::raw("  q / Esc      - Quit"),
        Line::raw(""),
        Line::raw("Categories by key:"),
        Line::raw("  1 drowsiness   2 phone          3 overspeed    4 distraction"),
        Line::raw("  5 aggressive   6 lane departure 7 weather      8 fatigue"),
        Line::raw(""),
        Line::raw("The progress bar counts down the alert's display time;"),
        Line::raw("emergency alerts stay until dismissed."),
        Line::raw(""),
        Line::raw("Press 'h' again to close this help."),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_alignment(Alignment::Center),
        )
        .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(help, area);
}

pub fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Low => Color::Blue,
        Urgency::Medium => Color::Yellow,
        Urgency::High => Color::LightRed,
        Urgency::Critical => Color::Red,
    }
}

fn format_event_for_list(event: &AlertEvent) -> (&'static str, Color, String, String) {
    match event {
        AlertEvent::Issued { category, suggestion, confidence, at } => (
            "⚠",
            urgency_color(suggestion.urgency),
            at.format("%H:%M:%S").to_string(),
            format!(
                "{}: {} ({:.0}%)",
                category,
                suggestion.message,
                confidence * 100.0
            ),
        ),
        AlertEvent::Dismissed { reason, at } => {
            let text = match reason {
                DismissReason::Expired => "Alert expired",
                DismissReason::Superseded => "Alert superseded by newer incident",
                DismissReason::Manual => "Alert dismissed",
            };
            ("·", Color::Gray, at.format("%H:%M:%S").to_string(), text.to_string())
        }
    }
}

fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
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
    use crate::alerts::catalog::Suggestion;
    use chrono::Utc;

    fn issued_event() -> AlertEvent {
        AlertEvent::Issued {
            category: IncidentCategory::Phone,
            suggestion: Suggestion {
                message: "📱 Please put your phone away while driving (88% confidence)"
                    .to_string(),
                icon: "📱".to_string(),
                action: Some("phone_away".to_string()),
                urgency: Urgency::High,
                duration_ms: 8_000,
            },
            confidence: 0.88,
            at: Utc::now(),
        }
    }

    #[test]
    fn test_state_counts_issued_alerts() {
        let mut state = DashboardState::new(200);
        state.add_event(issued_event());
        state.add_event(AlertEvent::Dismissed {
            reason: DismissReason::Manual,
            at: Utc::now(),
        });
        assert_eq!(state.alerts_issued, 1);
        assert_eq!(state.events.len(), 2);
    }

    #[test]
    fn test_state_caps_event_history() {
        let mut state = DashboardState::new(200);
        for _ in 0..(state.max_events + 10) {
            state.add_event(issued_event());
        }
        assert_eq!(state.events.len(), state.max_events);
    }

    #[test]
    fn test_urgency_colors_escalate() {
        assert_eq!(urgency_color(Urgency::Low), Color::Blue);
        assert_eq!(urgency_color(Urgency::Critical), Color::Red);
    }

    #[test]
    fn test_digit_categories_exclude_emergency() {
        assert!(!DIGIT_CATEGORIES.contains(&IncidentCategory::Emergency));
        assert_eq!(DIGIT_CATEGORIES.len(), 8);
    }
}
