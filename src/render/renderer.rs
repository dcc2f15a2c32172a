use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Campaign, CampaignStatus, Mode, Order, Position, WorldState};
use crate::metrics::GameMetrics;

/// Everything the renderer reads for one frame
pub struct Screen<'a> {
    pub campaign: &'a Campaign,
    pub world: Option<&'a WorldState>,
    pub metrics: &'a GameMetrics,
    /// Latest advisory or status message
    pub message: Option<&'a str>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, screen: &Screen<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(2), // Message
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(screen), chunks[0]);

        let mode = screen.world.map(|w| w.mode);
        let show_grid = screen.campaign.status() == CampaignStatus::Playing
            && !matches!(mode, Some(Mode::Paused) | None);

        match screen.world {
            Some(world) if show_grid => {
                frame.render_widget(self.render_grid(world), chunks[1]);
            }
            _ => frame.render_widget(self.render_overlay(screen), chunks[1]),
        }

        frame.render_widget(self.render_message(screen), chunks[2]);
        frame.render_widget(self.render_controls(), chunks[3]);
    }

    fn render_grid(&self, world: &WorldState) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(world.grid_height);

        for y in 0..world.grid_height {
            let mut spans = Vec::with_capacity(world.grid_width);

            for x in 0..world.grid_width {
                let pos = Position::new(x as i32, y as i32);
                spans.push(cell_span(world, pos));
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Number Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, screen: &Screen<'_>) -> Paragraph<'_> {
        let campaign = screen.campaign;
        let level = campaign.current_level();
        let (rule, rule_color) = match level.order {
            Order::Ascending => ("EAT ASCENDING", Color::Green),
            Order::Descending => ("EAT DESCENDING", Color::LightRed),
        };

        let remaining = screen
            .world
            .map(|w| {
                let mut values = w.token_values();
                values.sort_unstable();
                values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("  ")
            })
            .unwrap_or_default();

        let text = vec![
            Line::from(vec![
                Span::styled("Level ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{}/{}", campaign.level_number(), campaign.level_count()),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {}    ", level.name)),
                Span::styled(rule, Style::default().fg(rule_color).add_modifier(Modifier::BOLD)),
                Span::raw("    "),
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    campaign.total_score().to_string(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Time: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    screen.metrics.format_time(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(vec![
                Span::styled("Left: ", Style::default().fg(Color::Gray)),
                Span::styled(remaining, Style::default().fg(Color::Red)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_overlay(&self, screen: &Screen<'_>) -> Paragraph<'_> {
        let campaign = screen.campaign;
        let paused = screen.world.map(|w| w.mode) == Some(Mode::Paused);

        let (title, color, key, action) = match campaign.status() {
            CampaignStatus::Menu => ("NUMBER SNAKE", Color::Cyan, "Enter", "to start"),
            CampaignStatus::Playing if paused => ("PAUSED", Color::Yellow, "P", "to resume"),
            CampaignStatus::Playing => ("GET READY", Color::Cyan, "Enter", "to start"),
            CampaignStatus::LevelComplete => {
                ("LEVEL COMPLETE", Color::Green, "Enter", "for the next level")
            }
            CampaignStatus::GameOver => ("GAME OVER", Color::Red, "Enter", "to try again"),
            CampaignStatus::Victory => ("VICTORY", Color::Yellow, "Enter", "to play again"),
        };

        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];

        if let Some(mistake) = campaign.last_mistake() {
            text.push(Line::from(vec![
                Span::styled("You ate ", Style::default().fg(Color::Gray)),
                Span::styled(
                    mistake.wrong.to_string(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" but needed ", Style::default().fg(Color::Gray)),
                Span::styled(
                    mistake.correct.to_string(),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
            ]));
            text.push(Line::from(""));
        }

        text.push(Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                campaign.total_score().to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled("    Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                screen.metrics.best_score.to_string(),
                Style::default().fg(Color::White),
            ),
        ]));
        text.push(Line::from(""));

        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                key,
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {action} or "), Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_message(&self, screen: &Screen<'_>) -> Paragraph<'_> {
        let waiting = screen.world.map(|w| w.mode) == Some(Mode::WaitingInput)
            && screen.campaign.status() == CampaignStatus::Playing;

        let text = match screen.message {
            Some(message) => message.to_string(),
            None if waiting => "Press an arrow key to start moving!".to_string(),
            None => String::new(),
        };

        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(Color::Magenta),
        )))
        .alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("H", Style::default().fg(Color::Cyan)),
            Span::raw(" hint | "),
            Span::styled("R", Style::default().fg(Color::Cyan)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Four-column cell for one grid position
fn cell_span(world: &WorldState, pos: Position) -> Span<'static> {
    if pos == world.snake.head() {
        return Span::styled(
            " @@ ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    }

    if let Some(segment) = world.snake.body.iter().find(|s| s.position == pos) {
        return match segment.value {
            // Digested token
            Some(value) => Span::styled(
                format!("{value:^4}"),
                Style::default().fg(Color::Black).bg(Color::Green),
            ),
            None => Span::styled(" oo ", Style::default().fg(Color::Green)),
        };
    }

    if let Some(index) = world.token_at(pos) {
        return Span::styled(
            format!("{:^4}", world.tokens[index].value),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        );
    }

    if world.has_obstacle(pos) {
        return Span::styled(" ## ", Style::default().fg(Color::Gray));
    }

    Span::styled(" .  ", Style::default().fg(Color::DarkGray))
}
