use crate::ai::SearchStats;
use crate::game::{Cell, GameState, GameStatus, Player, Position};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(
    frame: &mut Frame,
    game_state: &GameState,
    selected_column: usize,
    message: &Option<String>,
    game_mode: &str,
    stats: Option<&SearchStats>,
) {
    let board_height = game_state.board().rows() as u16 + 4;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),         // Header
            Constraint::Min(board_height), // Board
            Constraint::Length(3),         // Message
            Constraint::Length(4),         // Controls
        ])
        .split(frame.area());

    render_header(frame, game_state, game_mode, chunks[0]);
    render_board(frame, game_state, selected_column, chunks[1]);
    render_message(frame, message, stats, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn player_color(player: Player) -> Color {
    match player {
        Player::One => Color::Red,
        Player::Two => Color::Yellow,
    }
}

fn render_header(
    frame: &mut Frame,
    game_state: &GameState,
    game_mode: &str,
    area: ratatui::layout::Rect,
) {
    let current_player = game_state.current_player();
    let color = player_color(current_player);

    let status = match game_state.status() {
        GameStatus::InProgress => {
            format!("Current Player: {}  |  {}", current_player.name(), game_mode)
        }
        GameStatus::Won(line) => format!("{} wins  |  {}", line.player.name(), game_mode),
        GameStatus::Tied => format!("Draw  |  {}", game_mode),
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(
    frame: &mut Frame,
    game_state: &GameState,
    selected_column: usize,
    area: ratatui::layout::Rect,
) {
    let board = game_state.board();
    let winning: &[Position] = game_state
        .winner()
        .map(|line| line.cells.as_slice())
        .unwrap_or(&[]);
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")]; // Padding (3 chars to match "  ║")
    for col in 0..board.cols() {
        if col == selected_column {
            col_line.push(Span::styled(
                format!("{:^3}", col + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(format!("{:^3}", col + 1)));
        }
    }
    col_line.push(Span::raw("  ")); // Suffix padding to match " ║"
    lines.push(Line::from(col_line));

    let rule = "═".repeat(board.cols() * 3 + 1);

    // Top border
    lines.push(Line::from(format!("  ╔{rule}╗")));

    // Board rows
    for row in 0..board.rows() {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..board.cols() {
            let cell = board.get(row, col);
            let (symbol, mut style) = match cell.owner() {
                None => (" . ", Style::default().fg(Color::DarkGray)),
                Some(player) => (" ● ", Style::default().fg(player_color(player))),
            };
            if cell != Cell::Empty && winning.contains(&Position::new(row, col)) {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            row_spans.push(Span::styled(symbol, style));
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    // Bottom border
    lines.push(Line::from(format!("  ╚{rule}╝")));

    // Selection indicator
    let mut indicator_line = vec![Span::raw("   ")]; // Align with board (3 chars to match "  ║")
    for col in 0..board.cols() {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  ")); // Suffix padding to match " ║"
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(
    frame: &mut Frame,
    message: &Option<String>,
    stats: Option<&SearchStats>,
    area: ratatui::layout::Rect,
) {
    let text = match (message.as_deref(), stats) {
        (Some(msg), _) => msg.to_string(),
        (None, Some(stats)) => format!(
            "Last search: {} nodes, {} cutoffs{}",
            stats.nodes_visited,
            stats.cutoffs,
            if stats.budget_exhausted { " (budget hit)" } else { "" }
        ),
        (None, None) => String::new(),
    };
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: ratatui::layout::Rect) {
    let line1 = Line::from("←/→: Move  |  Enter: Drop  |  R: Restart  |  Q: Quit");
    let line2 = Line::from(vec![
        Span::styled("D", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(": cycle difficulty (easy → medium → hard)"),
    ]);

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
