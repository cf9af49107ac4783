// Terminal user interface
// Layout, drawing, mouse/keyboard dispatch and outcome modals

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

use crate::tks_board::Pos;
use crate::tks_color::{Depth, Palette};
use crate::tks_config::{Config, GameConfig};
use crate::tks_game::{CellView, Game, GameState, Outcome};
use crate::tks_lang::{fill, Assets, Lang};

// Status messages fall back to the controls hint after this long
const STATUS_TTL: Duration = Duration::from_millis(2000);
const TOP_HEIGHT: u16 = 5;
const FOOTER_HEIGHT: u16 = 3;

/// Glyph and color pairs for the board
struct Glyphs {
    unopened: (&'static str, Color),
    mine: (&'static str, Color),
    flag: (&'static str, Color),
}

impl Glyphs {
    fn new(ascii: bool, palette: &Palette) -> Self {
        Glyphs {
            unopened: (if ascii { "." } else { "■" }, palette.tone(Color::Gray)),
            mine: (if ascii { "*" } else { "☼" }, palette.tone(Color::Black)),
            flag: (if ascii { "F" } else { "⚑" }, palette.tone(Color::Red)),
        }
    }
}

// Runtime UI variables; rects are refreshed on every draw for mouse hit testing
#[derive(Debug)]
struct UiState {
    cursor: Pos,
    left_press: Option<Pos>,
    status: Option<(&'static str, Instant)>,
    showing_outcome: Option<Outcome>,
    board_rect: Option<Rect>,
    new_game_rect: Option<Rect>,
    new_game_hovered: bool,
    new_game_pressed: bool,
    modal_rect: Option<Rect>,
    modal_close_rect: Option<Rect>,
    modal_close_hovered: bool,
    modal_close_pressed: bool,
    exit_requested: bool,
}

impl UiState {
    fn new() -> Self {
        UiState {
            cursor: (0, 0),
            left_press: None,
            status: None,
            showing_outcome: None,
            board_rect: None,
            new_game_rect: None,
            new_game_hovered: false,
            new_game_pressed: false,
            modal_rect: None,
            modal_close_rect: None,
            modal_close_hovered: false,
            modal_close_pressed: false,
            exit_requested: false,
        }
    }

    fn set_status(&mut self, msg: &'static str) {
        self.status = Some((msg, Instant::now()));
    }

    fn info_line(&self, a: &Assets) -> &'static str {
        match self.status {
            Some((msg, t0)) if t0.elapsed() < STATUS_TTL => msg,
            _ => a.hint,
        }
    }

    fn close_modal(&mut self) {
        self.showing_outcome = None;
        self.modal_rect = None;
        self.modal_close_rect = None;
        self.modal_close_hovered = false;
        self.modal_close_pressed = false;
    }
}

pub fn run(cfg: &Config, game_cfg: GameConfig, lang: &Lang) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut terminal = match setup_terminal(io::stdout()) {
        Ok(t) => t,
        Err(e) => {
            // leave the shell usable even when the screen could not be taken over
            let _ = restore_terminal(&mut io::stdout());
            return Err(e);
        }
    };

    let res = event_loop(&mut terminal, cfg, game_cfg, &lang.assets);

    restore_terminal(terminal.backend_mut())?;
    terminal.show_cursor()?;
    res
}

fn setup_terminal<W: io::Write>(mut out: W) -> Result<Terminal<CrosstermBackend<W>>, Box<dyn Error>> {
    execute!(out, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(out))?)
}

/// Undo raw mode, mouse capture and the alternate screen
fn restore_terminal<W: io::Write>(out: &mut W) -> Result<(), Box<dyn Error>> {
    let raw = disable_raw_mode();
    execute!(out, DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    raw?;
    Ok(())
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, cfg: &Config, game_cfg: GameConfig, a: &Assets) -> Result<(), Box<dyn Error>> {
    let palette = Palette::new(Depth::detect());
    let glyphs = Glyphs::new(cfg.ascii_icons, &palette);
    let mut game = Game::new(game_cfg);
    let mut ui = UiState::new();
    ui.set_status(a.status_started);

    let tick_rate = Duration::from_millis(200);
    while !ui.exit_requested {
        terminal.draw(|f| draw(f, &game, &mut ui, &glyphs, &palette, a))?;

        if !event::poll(tick_rate)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => handle_key(key, &mut game, &mut ui, a),
            Event::Mouse(me) => handle_mouse(me, &mut game, &mut ui, a),
            _ => {}
        }
    }
    Ok(())
}

fn start_new_game(game: &mut Game, ui: &mut UiState, a: &Assets) {
    game.new_game();
    ui.close_modal();
    ui.left_press = None;
    ui.set_status(a.status_started);
}

fn report(outcome: Option<Outcome>, ui: &mut UiState, a: &Assets) {
    match outcome {
        Some(Outcome::Won) => ui.set_status(a.status_won),
        Some(Outcome::Lost) => ui.set_status(a.status_lost),
        None => return,
    }
    ui.showing_outcome = outcome;
}

fn handle_key(key: KeyEvent, game: &mut Game, ui: &mut UiState, a: &Assets) {
    // Windows reports releases too
    if key.kind != KeyEventKind::Press {
        return;
    }
    if ui.showing_outcome.is_some() {
        match key.code {
            KeyCode::F(2) | KeyCode::Char('n') | KeyCode::Char('N') => start_new_game(game, ui, a),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => ui.close_modal(),
            _ => {}
        }
        return;
    }
    let max = game.size() - 1;
    let (r, c) = ui.cursor;
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => ui.exit_requested = true,
        KeyCode::F(2) | KeyCode::Char('n') | KeyCode::Char('N') => start_new_game(game, ui, a),
        KeyCode::Up => ui.cursor = (r.saturating_sub(1), c),
        KeyCode::Down => ui.cursor = ((r + 1).min(max), c),
        KeyCode::Left => ui.cursor = (r, c.saturating_sub(1)),
        KeyCode::Right => ui.cursor = (r, (c + 1).min(max)),
        KeyCode::Char(' ') | KeyCode::Enter => {
            let outcome = game.on_left_click(ui.cursor);
            report(outcome, ui, a);
        }
        KeyCode::Char('f') | KeyCode::Char('F') => {
            let outcome = game.on_right_click(ui.cursor);
            report(outcome, ui, a);
        }
        _ => {}
    }
}

fn handle_mouse(me: MouseEvent, game: &mut Game, ui: &mut UiState, a: &Assets) {
    // with a modal open only its CLOSE button (or a right click anywhere) reacts
    if ui.showing_outcome.is_some() {
        let in_btn = ui.modal_close_rect.is_some_and(|r| contains(r, me.column, me.row));
        match me.kind {
            MouseEventKind::Moved => ui.modal_close_hovered = in_btn,
            MouseEventKind::Down(MouseButton::Left) => ui.modal_close_pressed = in_btn,
            MouseEventKind::Up(MouseButton::Left) => {
                if ui.modal_close_pressed && in_btn {
                    ui.close_modal();
                }
                ui.modal_close_pressed = false;
            }
            MouseEventKind::Down(MouseButton::Right) => ui.close_modal(),
            _ => {}
        }
        return;
    }

    let in_new = ui.new_game_rect.is_some_and(|r| contains(r, me.column, me.row));
    let cell = ui.board_rect.and_then(|r| cell_at(r, game.size(), me.column, me.row));
    match me.kind {
        MouseEventKind::Moved => {
            ui.new_game_hovered = in_new;
            if let Some(pos) = cell {
                ui.cursor = pos;
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            ui.new_game_pressed = in_new;
            ui.left_press = cell;
            if let Some(pos) = cell {
                ui.cursor = pos;
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            // pressed look follows the pointer, like a held button
            ui.left_press = cell;
            ui.new_game_hovered = in_new;
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if ui.new_game_pressed && in_new {
                start_new_game(game, ui, a);
            } else if let (Some(pressed), Some(released)) = (ui.left_press, cell) {
                if pressed == released {
                    let outcome = game.on_left_click(released);
                    report(outcome, ui, a);
                }
            }
            ui.left_press = None;
            ui.new_game_pressed = false;
        }
        MouseEventKind::Down(MouseButton::Right) => {
            if let Some(pos) = cell {
                ui.cursor = pos;
                let outcome = game.on_right_click(pos);
                report(outcome, ui, a);
            }
        }
        _ => {}
    }
}

fn draw<B: Backend>(f: &mut Frame<B>, game: &Game, ui: &mut UiState, glyphs: &Glyphs, palette: &Palette, a: &Assets) {
    let size = f.size();
    let n = game.size() as u16;
    let board_w = n * 2 + 3;
    let board_h = n + 2;
    let min_twidth = board_w.max(a.hint.width() as u16 + 4).max(44);
    let min_theight = TOP_HEIGHT + board_h + FOOTER_HEIGHT;
    // If terminal too small, render a centered warning and skip normal UI
    if size.width < min_twidth || size.height < min_theight {
        ui.board_rect = None;
        ui.new_game_rect = None;
        let warn_lines = vec![
            Spans::from(Span::raw(a.tsmsg_line1)),
            Spans::from(Span::raw(fill(a.tsmsg_line2, &[&min_twidth, &min_theight]))),
        ];
        let warn = Paragraph::new(Text::from(warn_lines))
            .block(Block::default().borders(Borders::ALL).title(a.tsmsg_title))
            .alignment(Alignment::Center);
        f.render_widget(Clear, size);
        let w = 40u16.min(size.width);
        let h = 4u16.min(size.height);
        f.render_widget(warn, center_rect(w, h, size));
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([Constraint::Length(TOP_HEIGHT), Constraint::Min(board_h), Constraint::Length(FOOTER_HEIGHT)].as_ref())
        .split(size);

    draw_top(f, chunks[0], game, ui, palette, a);

    // board
    let board_area = center_rect(board_w, board_h, chunks[1]);
    ui.board_rect = Some(board_area);
    let board_bg = palette.tone(Color::DarkGray);
    let open_bg = palette.tone(Color::Gray);
    let cursor_bg = palette.tone(Color::LightBlue);
    let mut lines = Vec::with_capacity(game.size());
    for row in 0..game.size() {
        let mut spans = Vec::with_capacity(game.size() + 1);
        for col in 0..game.size() {
            let (s, mut style) = match game.view((row, col)) {
                CellView::Hidden => (glyphs.unopened.0.to_string(), Style::default().fg(glyphs.unopened.1).bg(board_bg)),
                CellView::Flagged => (glyphs.flag.0.to_string(), Style::default().fg(glyphs.flag.1).bg(board_bg)),
                CellView::RevealedBlank => (" ".to_string(), Style::default().bg(open_bg)),
                CellView::RevealedNumber(k) => (
                    k.to_string(),
                    Style::default().fg(palette.number(k)).bg(open_bg).add_modifier(Modifier::BOLD),
                ),
                CellView::RevealedMine => (glyphs.mine.0.to_string(), Style::default().fg(glyphs.mine.1).bg(palette.tone(Color::LightRed))),
                CellView::RevealedMineHighlighted => (
                    glyphs.mine.0.to_string(),
                    Style::default().fg(palette.tone(Color::White)).bg(palette.tone(Color::Red)).add_modifier(Modifier::BOLD),
                ),
            };
            if ui.cursor == (row, col) && game.view((row, col)) == CellView::Hidden {
                style = style.bg(cursor_bg);
            }
            if ui.left_press == Some((row, col)) && game.view((row, col)) == CellView::Hidden {
                style = style.bg(open_bg).fg(open_bg);
            }
            spans.push(Span::styled(format!(" {}", s), style));
        }
        // right padding column in board color
        spans.push(Span::styled(" ", Style::default().bg(board_bg)));
        lines.push(Spans::from(spans));
    }
    let paragraph = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL)).alignment(Alignment::Left);
    f.render_widget(paragraph, board_area);

    // footer
    let footer = Paragraph::new(Spans::from(Span::styled(a.footer_keys, Style::default().fg(palette.tone(Color::Yellow)))))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(footer, chunks[2]);

    // outcome modal
    ui.modal_rect = None;
    ui.modal_close_rect = None;
    if let Some(outcome) = ui.showing_outcome {
        let (title, message) = match outcome {
            Outcome::Won => (a.win_title, a.win_message),
            Outcome::Lost => (a.loss_title, a.loss_message),
        };
        let mw = (message.width() as u16 + 6).max(30).min(size.width);
        let mrect = center_rect(mw, 7, size);
        ui.modal_rect = Some(mrect);
        f.render_widget(Clear, mrect);
        let body = Paragraph::new(Text::from(vec![Spans::from(Span::raw("")), Spans::from(Span::raw(message))]))
            .block(Block::default().borders(Borders::ALL).title(title).title_alignment(Alignment::Center))
            .alignment(Alignment::Center);
        f.render_widget(body, mrect);

        let btn_w = a.btn_close.width() as u16;
        let btn_rect = Rect::new(mrect.x + mrect.width.saturating_sub(btn_w) / 2, mrect.y + mrect.height.saturating_sub(2), btn_w, 1);
        ui.modal_close_rect = Some(btn_rect);
        f.render_widget(Paragraph::new(Span::styled(a.btn_close, button_style(ui.modal_close_hovered, ui.modal_close_pressed))), btn_rect);
    }
}

fn draw_top<B: Backend>(f: &mut Frame<B>, area: Rect, game: &Game, ui: &mut UiState, palette: &Palette, a: &Assets) {
    f.render_widget(Block::default().borders(Borders::ALL), area);
    let inner = Rect::new(area.x + 1, area.y + 1, area.width.saturating_sub(2), area.height.saturating_sub(2));
    if inner.height < 3 {
        ui.new_game_rect = None;
        return;
    }

    let title = Paragraph::new(Span::styled(a.title, Style::default().fg(palette.tone(Color::White)).add_modifier(Modifier::BOLD)))
        .alignment(Alignment::Center);
    f.render_widget(title, Rect::new(inner.x, inner.y, inner.width, 1));

    let stats_row = Rect::new(inner.x, inner.y + 1, inner.width, 1);
    let mines = fill(a.mines_fmt, &[&game.mines_remaining()]);
    f.render_widget(Paragraph::new(Span::styled(format!(" {}", mines), Style::default().fg(palette.tone(Color::Yellow)))), stats_row);
    let btn_w = (a.btn_new_game.width() as u16).min(stats_row.width);
    let btn_rect = Rect::new(stats_row.x + stats_row.width.saturating_sub(btn_w + 1), stats_row.y, btn_w, 1);
    ui.new_game_rect = Some(btn_rect);
    f.render_widget(Paragraph::new(Span::styled(a.btn_new_game, button_style(ui.new_game_hovered, ui.new_game_pressed))), btn_rect);

    let info = Paragraph::new(Span::styled(ui.info_line(a), info_style(game.state(), palette))).alignment(Alignment::Center);
    f.render_widget(info, Rect::new(inner.x, inner.y + 2, inner.width, 1));
}

fn info_style(state: GameState, palette: &Palette) -> Style {
    match state {
        GameState::InProgress => Style::default(),
        GameState::Won => Style::default().fg(palette.tone(Color::Green)).add_modifier(Modifier::BOLD),
        GameState::Lost => Style::default().fg(palette.tone(Color::Red)).add_modifier(Modifier::BOLD),
    }
}

fn button_style(hovered: bool, pressed: bool) -> Style {
    let bg = if pressed {
        Color::Green
    } else if hovered {
        Color::White
    } else {
        Color::Gray
    };
    Style::default().bg(bg).fg(Color::Black).add_modifier(Modifier::BOLD)
}

fn contains(r: Rect, col: u16, row: u16) -> bool {
    col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}

/// Map a terminal position to a board cell; each cell is two columns wide inside the border
fn cell_at(board: Rect, size: usize, col: u16, row: u16) -> Option<Pos> {
    let x0 = board.x + 1;
    let y0 = board.y + 1;
    if col < x0 || row < y0 {
        return None;
    }
    let c = ((col - x0) / 2) as usize;
    let r = (row - y0) as usize;
    (r < size && c < size).then_some((r, c))
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
