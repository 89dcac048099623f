use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, List, ListItem, Paragraph, Wrap},
    Frame,
};

#[cfg(test)]
extern crate insta;

use tuinav::tree::RowKind;

use crate::app::{row_key, App, Focus, RowContent, SidebarRow};
use crate::widgets::{
    cursor_bg, panel_block, panel_title, push_highlighted_name, push_selection_cursor,
    ItemContext, PanelState, UiColors,
};

/// Main render function called from the event loop.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let colors = UiColors::from_palette(&app.palette());

    frame.render_widget(Block::default().style(Style::default().bg(colors.bg)), area);

    // Top-level vertical layout:
    //   [breadcrumb bar]
    //   [sidebar | details]
    //   [help bar]
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(outer[1]);

    app.click_regions.clear();
    app.click_regions.register(main[0], Focus::Sidebar);
    app.click_regions.register(main[1], Focus::Details);

    render_breadcrumb(frame, app, outer[0], &colors);
    render_sidebar(frame, app, main[0], &colors);
    render_details(frame, app, main[1], &colors);
    render_help_bar(frame, app, outer[2], &colors);
}

/// Catalog title followed by the path to the current item.
fn render_breadcrumb(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let separator = Style::default().fg(colors.help);
    let mut spans = vec![Span::styled(
        format!(" {}", app.catalog.title),
        Style::default().fg(colors.active_border).bold(),
    )];

    if let Some(selection) = &app.router.current {
        if let Some(r) = app.catalog.refs.get(selection.ref_index) {
            if !r.is_main {
                spans.push(Span::styled(" > ", separator));
                spans.push(Span::styled(r.title.clone(), Style::default().fg(colors.ref_title)));
            }
        }
        for name in app.path_names(selection.ref_index, &selection.item_id) {
            spans.push(Span::styled(" > ", separator));
            spans.push(Span::styled(name, Style::default().fg(colors.leaf)));
        }
    }

    spans.push(Span::styled(
        format!("  [{}]", app.router.view_mode),
        Style::default().fg(colors.value),
    ));

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.bar_bg));
    frame.render_widget(bar, area);
}

/// The navigation tree for every ref, one row per line.
pub fn render_sidebar(frame: &mut Frame, app: &mut App, area: Rect, colors: &UiColors) {
    let viewport = area.height.saturating_sub(2) as usize;
    app.ensure_visible(viewport);

    let ps = PanelState::from_app(app, Focus::Sidebar, colors).with_scores(app.compute_row_scores());
    let block = panel_block(panel_title(&app.catalog.title, &ps), &ps, false);

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .enumerate()
        .skip(app.scroll)
        .take(viewport)
        .map(|(index, row)| {
            let is_cursor = ps.is_focused && index == app.cursor;
            sidebar_item(row, is_cursor, &ps, colors)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn sidebar_item(
    row: &SidebarRow,
    is_cursor: bool,
    ps: &PanelState,
    colors: &UiColors,
) -> ListItem<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let muted = Style::default().fg(colors.help);

    match &row.content {
        RowContent::Node(node) => {
            push_selection_cursor(&mut spans, is_cursor, colors);
            spans.push(Span::raw("  ".repeat(node.depth)));
            let (icon, color) = match node.kind {
                RowKind::Branch { expanded: true, .. } => ("▾ ", colors.branch),
                RowKind::Branch { .. } => ("▸ ", colors.branch),
                RowKind::Leaf => ("• ", colors.leaf),
            };
            spans.push(Span::styled(icon, Style::default().fg(color)));

            let base = if node.selected {
                Style::default()
                    .fg(colors.active_item)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color)
            };
            let ctx = ItemContext::new(&row_key(row.ref_index, &node.id), is_cursor, ps);
            push_highlighted_name(&mut spans, &node.name, base, &ctx, ps, colors);
        }
        RowContent::RefTitle(title) => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled("◆ ", Style::default().fg(colors.ref_title)));
            spans.push(Span::styled(
                title.clone(),
                Style::default().fg(colors.ref_title).bold(),
            ));
        }
        RowContent::Heading(name) => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(name.clone(), Style::default().fg(colors.heading).bold()));
        }
        RowContent::Loading(text) => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(text.clone(), muted.add_modifier(Modifier::ITALIC)));
        }
        RowContent::Skeleton(width) => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled("░".repeat(*width), muted));
        }
        RowContent::ErrorNotice(headline) => {
            push_selection_cursor(&mut spans, is_cursor, colors);
            let style = Style::default().fg(colors.error);
            spans.push(Span::styled("! ", style.bold()));
            spans.push(Span::styled(headline.clone(), style));
        }
        RowContent::ErrorDetail(line) => {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(line.clone(), muted));
        }
        RowContent::AuthPrompt => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                "Browse this secure collection",
                Style::default().fg(colors.value),
            ));
        }
        RowContent::Login => {
            push_selection_cursor(&mut spans, is_cursor, colors);
            spans.push(Span::styled(
                "[ Login ]",
                Style::default().fg(colors.active_border).bold(),
            ));
        }
        RowContent::AuthPending => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                "Waiting for authentication…",
                muted.add_modifier(Modifier::ITALIC),
            ));
        }
        RowContent::AuthWarning(warning) => {
            let style = Style::default().fg(colors.warning);
            spans.push(Span::raw("  "));
            spans.push(Span::styled("! ", style.bold()));
            spans.push(Span::styled(warning.clone(), style));
        }
        RowContent::AuthConcluded(url) => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("Authentication on {url} seems to have concluded"),
                Style::default().fg(colors.value),
            ));
        }
        RowContent::Refresh => {
            push_selection_cursor(&mut spans, is_cursor, colors);
            spans.push(Span::styled(
                "[ Refresh ]",
                Style::default().fg(colors.active_border).bold(),
            ));
        }
    }

    let item = ListItem::new(Line::from(spans));
    if is_cursor {
        item.style(cursor_bg(colors))
    } else {
        item
    }
}

fn render_details(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let ps = PanelState::from_app(app, Focus::Details, colors);
    let block = panel_block(panel_title("Details", &ps), &ps, true);

    let label = |text: &str| Span::styled(format!("{text:<7}"), Style::default().fg(colors.help));
    let value = Style::default().fg(colors.value);

    let lines = match (app.current_item(), &app.router.current) {
        (Some((r, item)), Some(selection)) => {
            let kind = match (item.has_children(), item.is_component) {
                (true, true) => "component",
                (true, false) => "group",
                (false, _) => "entry",
            };
            let path = app.path_names(selection.ref_index, &item.id).join(" / ");
            vec![
                Line::from(Span::styled(
                    item.name.clone(),
                    Style::default().fg(colors.leaf).bold(),
                )),
                Line::default(),
                Line::from(vec![label("id"), Span::styled(r.qualified_id(&item.id), value)]),
                Line::from(vec![label("kind"), Span::styled(kind, value)]),
                Line::from(vec![label("path"), Span::styled(path, value)]),
                Line::from(vec![
                    label("href"),
                    Span::styled(app.current_href().unwrap_or_default(), value),
                ]),
                Line::from(vec![
                    label("mode"),
                    Span::styled(app.router.view_mode.to_string(), value),
                ]),
                Line::from(vec![label("from"), Span::styled(r.title.clone(), value)]),
            ]
        }
        _ => vec![Line::from(Span::styled(
            "Nothing selected. Press Enter on an item to open it.",
            Style::default().fg(colors.help),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_help_bar(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let text = if app.filtering {
        " type to filter  ↑↓ move  enter apply  esc clear"
    } else if app.focus() == Focus::Sidebar {
        " ↑↓ move  ←→ fold  enter open  / filter  v mode  p print  r reload  tab focus  q quit"
    } else {
        " tab focus  v mode  p print  [ ] theme  q quit"
    };
    let bar = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(colors.help))))
        .style(Style::default().bg(colors.bar_bg));
    frame.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Action;
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use ratatui::{backend::TestBackend, Terminal};
    use tuinav::auth::{AuthOpener, AuthSurface};
    use tuinav::catalog::Catalog;

    /// Opener that never produces a surface; nothing is spawned.
    struct NoopOpener;

    impl AuthOpener for NoopOpener {
        fn open(&mut self, _url: &str, _window_name: &str) -> Option<Box<dyn AuthSurface>> {
            None
        }
    }

    fn sample_app() -> App {
        let catalog = Catalog::from_json_str(include_str!("../fixtures/sample.catalog.json"))
            .expect("Failed to parse sample catalog");
        App::with_opener(catalog, Box::new(NoopOpener)).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn buffer_to_string(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer().clone();
        let mut output = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                let cell = &buffer[(x, y)];
                output.push_str(cell.symbol());
            }
            // Trim trailing whitespace per line for cleaner snapshots
            let trimmed = output.trim_end();
            output = trimmed.to_string();
            output.push('\n');
        }
        output
    }

    fn render_to_string(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        buffer_to_string(&terminal)
    }

    fn render_sidebar_to_string(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        let colors = UiColors::from_palette(&app.palette());
        terminal
            .draw(|frame| render_sidebar(frame, app, frame.area(), &colors))
            .unwrap();
        buffer_to_string(&terminal)
    }

    fn click(app: &mut App, column: u16, row: u16) -> Action {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
        .unwrap()
    }

    fn index_of(app: &App, content: &RowContent) -> usize {
        app.rows
            .iter()
            .position(|row| &row.content == content)
            .unwrap_or_else(|| panic!("no row {content:?}"))
    }

    // ── Snapshot tests ──────────────────────────────────────────────────

    #[test]
    fn snapshot_sidebar_initial() {
        let mut app = sample_app();
        let output = render_sidebar_to_string(&mut app, 36, 17);
        insta::assert_snapshot!(output);
    }

    #[test]
    fn snapshot_sidebar_after_interaction() {
        let mut app = sample_app();
        app.activate(2).unwrap();
        let login = index_of(&app, &RowContent::Login);
        app.activate(login).unwrap();
        let notice = index_of(
            &app,
            &RowContent::ErrorNotice("Something went wrong".to_string()),
        );
        app.activate(notice).unwrap();
        app.set_focus(Focus::Details);

        let output = render_sidebar_to_string(&mut app, 36, 19);
        insta::assert_snapshot!(output);
    }

    // ── Layout tests ────────────────────────────────────────────────────

    #[test]
    fn test_render_empty_selection() {
        let mut app = sample_app();
        let output = render_to_string(&mut app, 100, 24);
        assert!(output.contains(" Design System  [story]"));
        assert!(output.contains(" Details "));
        assert!(output.contains("Nothing selected."));
        assert!(output.contains("/ filter"));
    }

    #[test]
    fn test_render_registers_click_regions() {
        let mut app = sample_app();
        render_to_string(&mut app, 100, 24);
        assert_eq!(app.click_regions.regions().len(), 2);
        assert_eq!(app.click_regions.handle_click(1, 2), Some(&Focus::Sidebar));
        assert_eq!(app.click_regions.handle_click(60, 2), Some(&Focus::Details));
    }

    #[test]
    fn test_render_details_for_selection() {
        let mut app = sample_app();
        app.activate(2).unwrap();
        let output = render_to_string(&mut app, 100, 24);

        assert!(output.contains("Design System > Components > Button > Primary  [story]"));
        assert!(output.contains("id     button--primary"));
        assert!(output.contains("kind   entry"));
        assert!(output.contains("path   Components / Button / Primary"));
        assert!(output.contains("href   ?path=/story/button--primary"));
    }

    #[test]
    fn test_render_docs_mode() {
        let mut app = sample_app();
        app.activate(2).unwrap();
        press(&mut app, KeyCode::Char('v'));
        let output = render_to_string(&mut app, 100, 24);
        assert!(output.contains("href   ?path=/docs/button--primary"));
        assert!(output.contains("[docs]"));
    }

    #[test]
    fn test_render_ref_selection_breadcrumb() {
        let mut app = sample_app();
        let index = app.row_index_of(1, "old-button").unwrap();
        app.activate(index).unwrap();
        let output = render_to_string(&mut app, 100, 24);
        assert!(output.contains("Design System > Legacy > Old Button"));
        assert!(output.contains("id     legacy_old-button"));
    }

    #[test]
    fn test_render_filter_in_title() {
        let mut app = sample_app();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('h'));
        let output = render_to_string(&mut app, 100, 24);
        assert!(output.contains(" Design System /h "));
        assert!(output.contains("type to filter"));
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let mut app = sample_app();
        app.cursor = 14;
        let output = render_sidebar_to_string(&mut app, 36, 8);
        assert!(app.scroll > 0);
        assert!(output.contains("! Something went wrong"));
        assert!(!output.contains("Introduction"));
    }

    #[test]
    fn test_click_on_sidebar_bottom_border_is_ignored() {
        // 80x9: sidebar spans rows 1..=7, rows 0..5 of the list sit on 2..=6
        let mut app = sample_app();
        render_to_string(&mut app, 80, 9);
        let rows_before = app.rows.clone();

        assert_eq!(click(&mut app, 2, 7), Action::None);
        assert_eq!(app.router.current, None);
        assert_eq!(app.rows, rows_before);

        click(&mut app, 2, 4);
        let current = app.router.current.clone().unwrap();
        assert_eq!(current.item_id, "button--primary");
    }
}
