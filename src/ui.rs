use crate::app::App;
use crate::grid::CellState;
use crate::palette;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 30;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

fn state_color(state: CellState) -> Color {
    let [r, g, b] = palette::style(state).fill;
    Color::Rgb(r, g, b)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);

    render_sidebar(frame, layout[0], app);
    render_canvas(frame, layout[1], app);

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Status
            Constraint::Length(7), // Parameters
            Constraint::Length(5), // Counts
            Constraint::Min(8),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_counts_box(frame, sections[2], app);
    render_controls_box(frame, sections[3]);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Forest Fire ");
    let sim = &app.simulation;

    let progress = sim.progress();
    let progress_width = (area.width.saturating_sub(4)) as usize;
    let filled = ((progress * progress_width as f32) as usize).min(progress_width);
    let empty = progress_width.saturating_sub(filled);

    let (status_text, status_color) = if sim.is_burned_out() {
        ("BURNED OUT", Color::Green)
    } else if sim.is_playing() {
        ("PLAYING", BORDER_COLOR)
    } else {
        ("PAUSED", HIGHLIGHT_COLOR)
    };

    let message = app.status_message.as_deref().unwrap_or("");

    let content = vec![
        Line::from(Span::styled(
            format!("Tick {}  ({:.0}% burned)", sim.tick(), progress * 100.0),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(Color::Red)),
            Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(status_text, Style::default().fg(status_color))),
        Line::from(Span::styled(message.to_string(), Style::default().fg(DIM_TEXT_COLOR))),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");
    let settings = app.simulation.settings();
    let (ix, iy) = app.simulation.grid().ignition();

    let make_line = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {}: ", label), Style::default().fg(DIM_TEXT_COLOR)),
            Span::styled(value, Style::default().fg(TEXT_COLOR)),
        ])
    };

    let seed = settings
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "random".to_string());

    let content = vec![
        make_line("Grid", format!("{}x{}", settings.width, settings.height)),
        make_line("Burn", format!("{}%", settings.burn_chance)),
        make_line("Interval", format!("{}ms", settings.interval().as_millis())),
        make_line("Seed", seed),
        make_line("Ignition", format!("({}, {})", ix, iy)),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_counts_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Trees ");
    let counts = app.simulation.counts();

    let make_line = |state: CellState, count: usize| {
        Line::from(vec![
            Span::styled("██ ", Style::default().fg(state_color(state))),
            Span::styled(
                format!("{:<9}{:>5}", state.name(), count),
                Style::default().fg(TEXT_COLOR),
            ),
        ])
    };

    let content = vec![
        make_line(CellState::Unburned, counts.unburned),
        make_line(CellState::Burning, counts.burning),
        make_line(CellState::Burnt, counts.burnt),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "play/pause"),
        make_control("S/.", "step"),
        make_control("R", "reset"),
        make_control("P", "save png"),
        make_control("H", "help"),
        make_control("Q", "quit"),
    ];

    let paragraph = Paragraph::new(content).block(styled_block(" Controls "));
    frame.render_widget(paragraph, area);
}

/// Size of one cell on screen: two columns per row keeps cells roughly square
pub fn cell_size(inner: Rect, grid_width: usize, grid_height: usize) -> (u16, u16) {
    let rows = (inner.height as usize / grid_height.max(1)).max(1);
    let cols = (inner.width as usize / grid_width.max(1)).max(1);
    let cell_height = rows.min(cols / 2).max(1);
    ((cell_height * 2) as u16, cell_height as u16)
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let grid = app.simulation.grid();
    let (cell_width, cell_height) = cell_size(inner, grid.width(), grid.height());

    let board_width = (grid.width() as u16).saturating_mul(cell_width).min(inner.width);
    let board_height = (grid.height() as u16).saturating_mul(cell_height).min(inner.height);
    let board = Rect {
        x: inner.x + (inner.width - board_width) / 2,
        y: inner.y + (inner.height - board_height) / 2,
        width: board_width,
        height: board_height,
    };

    let cell_text = "█".repeat(cell_width as usize);
    let mut lines = Vec::with_capacity(grid.height() * cell_height as usize);
    for row in grid.rows() {
        let line = Line::from(
            row.iter()
                .map(|state| Span::styled(cell_text.clone(), Style::default().fg(state_color(*state))))
                .collect::<Vec<_>>(),
        );
        for _ in 0..cell_height {
            lines.push(line.clone());
        }
    }

    frame.render_widget(Paragraph::new(lines), board);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let canvas_width = area.width.saturating_sub(SIDEBAR_WIDTH);

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(24);
    let x = SIDEBAR_WIDTH + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    }
    .intersection(area);
    if help_area.is_empty() {
        return;
    }

    // Clear the background
    frame.render_widget(Clear, help_area);

    let burn_chance = app.simulation.settings().burn_chance;
    let content = vec![
        Line::from(""),
        Line::from(Span::styled("FOREST FIRE", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("One tree starts burning. Each tick a burning tree burns out, and every unburned tree next to it (up, down, left, right) catches fire with some probability."),
        Line::from(""),
        Line::from(Span::styled("RULES:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from(vec![
            Span::styled("Green", Style::default().fg(state_color(CellState::Unburned))),
            Span::raw(format!(" trees ignite with {}% odds per burning neighbour", burn_chance)),
        ]),
        Line::from(vec![
            Span::styled("Red", Style::default().fg(state_color(CellState::Burning))),
            Span::raw(" trees burn for exactly one tick"),
        ]),
        Line::from(vec![
            Span::styled("Gray", Style::default().fg(state_color(CellState::Burnt))),
            Span::raw(" trees and the border never burn again"),
        ]),
        Line::from(""),
        Line::from(Span::styled("CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Play/Pause, S or .=Step, R=Reset (new ignition point), P=Save PNG, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let is_scrollable = content_height > visible_height;

    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}
