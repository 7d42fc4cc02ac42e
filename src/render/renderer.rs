use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{BoardView, Cell, Position, SnakeId, SnakeView};
use crate::metrics::GameMetrics;

const SNAKE_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Magenta,
    Color::Yellow,
    Color::Blue,
    Color::LightRed,
];

/// What the interactive mode wants shown around the board
#[derive(Debug, Clone, Copy, Default)]
pub struct Hud {
    /// Snake steered by the keyboard, if any
    pub player: Option<SnakeId>,
    pub paused: bool,
    /// Whether the round is over and the result panel should replace the board
    pub round_over: bool,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn snake_color(id: SnakeId) -> Color {
        SNAKE_COLORS[id.0 % SNAKE_COLORS.len()]
    }

    pub fn render(&self, frame: &mut Frame, view: &BoardView, metrics: &GameMetrics, hud: Hud) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board and scoreboard
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(view, metrics, hud), chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
            .split(chunks[1]);

        if hud.round_over {
            frame.render_widget(self.render_game_over(view, hud), body[0]);
        } else {
            frame.render_widget(self.render_grid(view), body[0]);
        }
        frame.render_widget(self.render_scoreboard(view, hud), body[1]);

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, view: &BoardView) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(view.size);

        for y in 0..view.size {
            let mut spans = Vec::with_capacity(view.size);

            for x in 0..view.size {
                let cell = match view.cell(Position::new(x as i32, y as i32)) {
                    Some(Cell::Head(id)) => Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Self::snake_color(id))
                            .add_modifier(Modifier::BOLD),
                    ),
                    Some(Cell::Body(id)) => {
                        Span::styled("□ ", Style::default().fg(Self::snake_color(id)))
                    }
                    Some(Cell::Food) => Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Some(Cell::Empty) | None => {
                        Span::styled(". ", Style::default().fg(Color::DarkGray))
                    }
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake Arena "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, view: &BoardView, metrics: &GameMetrics, hud: Hud) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Turn: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.turn.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Alive: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}/{}", view.alive_snakes().count(), view.snakes.len()),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{} food, len {}", metrics.best_food, metrics.best_length),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Won: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.record(), Style::default().fg(Color::White)),
        ];
        if hud.paused {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn scoreboard_line(snake: &SnakeView, hud: Hud) -> Line<'static> {
        let marker = if hud.player == Some(snake.id) { "▶ " } else { "  " };
        let mut name_style = Style::default().fg(Self::snake_color(snake.id));
        if !snake.is_alive() {
            name_style = name_style.add_modifier(Modifier::CROSSED_OUT | Modifier::DIM);
        }

        Line::from(vec![
            Span::raw(marker),
            Span::styled(snake.name.clone(), name_style),
            Span::raw(format!("  len {:>3}  food {:>3}", snake.body.len(), snake.score)),
        ])
    }

    fn render_scoreboard(&self, view: &BoardView, hud: Hud) -> Paragraph<'_> {
        let lines: Vec<Line> = view
            .snakes
            .iter()
            .map(|snake| Self::scoreboard_line(snake, hud))
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Snakes "),
        )
    }

    fn render_game_over(&self, view: &BoardView, hud: Hud) -> Paragraph<'_> {
        let headline = match (view.sole_survivor(), hud.player) {
            (Some(snake), Some(player)) if snake.id == player => "YOU WIN".to_string(),
            (Some(snake), _) => format!("{} WINS", snake.name.to_uppercase()),
            (None, _) => "GAME OVER".to_string(),
        };
        let player_score = hud
            .player
            .and_then(|id| view.snake(id))
            .map(|snake| snake.score)
            .unwrap_or(0);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                headline,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Food eaten: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    player_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Turns: ", Style::default().fg(Color::Yellow)),
                Span::styled(view.turn.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Yellow)),
            Span::raw(" to pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Grid, Snake, SnakeStatus};
    use ratatui::{Terminal, backend::TestBackend};

    fn view() -> BoardView {
        let snakes = [
            Snake::with_body(
                SnakeId(0),
                "you",
                vec![Position::new(0, 0), Position::new(1, 0)],
                0,
            ),
            Snake::new(SnakeId(1), "ai", Position::new(3, 3), 0),
        ];
        let mut grid = Grid::new(4).unwrap();
        grid.rebuild_from(&snakes);
        BoardView::capture(7, &grid, &snakes)
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_colors_cycle_through_palette() {
        assert_eq!(Renderer::snake_color(SnakeId(0)), Color::Cyan);
        assert_eq!(
            Renderer::snake_color(SnakeId(SNAKE_COLORS.len())),
            Color::Cyan
        );
    }

    #[test]
    fn test_renders_board_and_scoreboard() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let metrics = GameMetrics::new();
        let hud = Hud {
            player: Some(SnakeId(0)),
            ..Default::default()
        };

        terminal
            .draw(|frame| Renderer::new().render(frame, &view(), &metrics, hud))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Snake Arena"));
        assert!(text.contains("Turn:"));
        assert!(text.contains("you"));
        assert!(text.contains("■"));
    }

    #[test]
    fn test_renders_game_over_panel() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let metrics = GameMetrics::new();
        let hud = Hud {
            player: Some(SnakeId(0)),
            round_over: true,
            ..Default::default()
        };

        terminal
            .draw(|frame| Renderer::new().render(frame, &view(), &metrics, hud))
            .unwrap();

        assert!(buffer_text(&terminal).contains("YOU WIN"));
    }

    #[test]
    fn test_no_winner_while_several_snakes_live() {
        let snakes = [
            Snake::new(SnakeId(0), "you", Position::new(0, 0), 0),
            Snake::new(SnakeId(1), "ai-1", Position::new(2, 2), 0),
            Snake::new(SnakeId(2), "ai-2", Position::new(3, 3), 0),
        ];
        let mut grid = Grid::new(4).unwrap();
        grid.rebuild_from(&snakes);
        let mut view = BoardView::capture(3, &grid, &snakes);
        view.snakes[0].status = SnakeStatus::Dead;

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let hud = Hud {
            player: Some(SnakeId(0)),
            round_over: true,
            ..Default::default()
        };
        terminal
            .draw(|frame| Renderer::new().render(frame, &view, &GameMetrics::new(), hud))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("GAME OVER"));
        assert!(!text.contains("WINS"));
    }

    #[test]
    fn test_header_and_footer_show_record_and_keys() {
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        let mut metrics = GameMetrics::new();
        metrics.rounds = 3;
        metrics.wins = 1;

        terminal
            .draw(|frame| Renderer::new().render(frame, &view(), &metrics, Hud::default()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Won: 1/3"));
        assert!(text.contains("to restart"));
    }
}
