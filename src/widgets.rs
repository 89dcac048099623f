//! Reusable UI widget helpers for the sidebar and details panels.
//!
//! These helpers keep border, cursor, and filter-highlight styling
//! consistent between panels.

use std::collections::HashMap;

use ratatui::{
    style::{Color, Modifier, Style, Stylize},
    text::Span,
    widgets::{Block, Borders, Padding},
};

use crate::app::{fuzzy_match_indices, App, Focus, MatchScores};

use nucleo_matcher::{Config, Matcher};
use ratatui_themes::ThemePalette;

/// Semantic color palette derived from the active theme.
/// Maps abstract UI roles to concrete `Color` values.
pub struct UiColors {
    pub branch: Color,
    pub leaf: Color,
    pub heading: Color,
    pub ref_title: Color,
    pub active_item: Color,
    pub value: Color,
    pub warning: Color,
    pub error: Color,
    pub help: Color,
    pub active_border: Color,
    pub inactive_border: Color,
    pub selected_bg: Color,
    pub bg: Color,
    pub bar_bg: Color,
}

impl UiColors {
    pub fn from_palette(p: &ThemePalette) -> Self {
        let bar_bg = match p.bg {
            Color::Rgb(r, g, b) => Color::Rgb(
                r.saturating_add(10),
                g.saturating_add(10),
                b.saturating_add(15),
            ),
            _ => Color::Rgb(30, 30, 40),
        };

        let selected_bg = match p.selection {
            Color::Rgb(r, g, b) => Color::Rgb(r, g, b),
            _ => Color::Rgb(40, 40, 60),
        };

        Self {
            branch: p.info,
            leaf: p.fg,
            heading: p.muted,
            ref_title: p.secondary,
            active_item: p.success,
            value: p.accent,
            warning: p.warning,
            error: p.error,
            help: p.muted,
            active_border: p.accent,
            inactive_border: p.muted,
            selected_bg,
            bg: p.bg,
            bar_bg,
        }
    }
}

/// State for computing panel-level styling decisions.
/// Built once per panel per render, then passed to row-level helpers.
pub struct PanelState {
    pub is_focused: bool,
    pub is_filtering: bool,
    pub has_filter: bool,
    pub border_color: Color,
    pub filter_text: String,
    pub match_scores: HashMap<String, MatchScores>,
}

impl PanelState {
    pub fn from_app(app: &App, panel: Focus, colors: &UiColors) -> Self {
        let is_focused = app.focus() == panel;
        let is_filtering = app.filtering && is_focused;
        let has_filter = app.filter_active() && is_focused;
        let border_color = if is_focused {
            colors.active_border
        } else {
            colors.inactive_border
        };
        let filter_text = if is_focused {
            app.filter().to_string()
        } else {
            String::new()
        };

        PanelState {
            is_focused,
            is_filtering,
            has_filter,
            border_color,
            filter_text,
            match_scores: HashMap::new(),
        }
    }

    pub fn with_scores(mut self, scores: HashMap<String, MatchScores>) -> Self {
        self.match_scores = scores;
        self
    }

    /// Whether any filter is visually active (typing or applied).
    pub fn filter_visible(&self) -> bool {
        self.is_filtering || self.has_filter
    }
}

/// Panel title with an optional filter indicator.
pub fn panel_title(name: &str, ps: &PanelState) -> String {
    if ps.filter_visible() {
        format!(" {} /{} ", name, ps.filter_text)
    } else {
        format!(" {} ", name)
    }
}

/// Styled `Block` for a panel. Only the details panel uses horizontal padding.
pub fn panel_block(title: String, ps: &PanelState, with_padding: bool) -> Block<'static> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ps.border_color))
        .title(title)
        .title_style(Style::default().fg(ps.border_color).bold());
    if with_padding {
        block = block.padding(Padding::horizontal(1));
    }
    block
}

/// Push the cursor gutter (`▶ ` or two spaces) onto spans.
pub fn push_selection_cursor(spans: &mut Vec<Span<'static>>, is_cursor: bool, colors: &UiColors) {
    if is_cursor {
        spans.push(Span::styled(
            "▶ ",
            Style::default()
                .fg(colors.active_border)
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::raw("  "));
    }
}

/// `(normal_style, highlight_style)` for an item, for use with
/// `build_highlighted_text`.
fn highlight_styles(base_color: Color, bg_color: Color, is_cursor: bool) -> (Style, Style) {
    if is_cursor {
        (
            Style::default()
                .fg(base_color)
                .add_modifier(Modifier::BOLD),
            Style::default()
                .fg(bg_color)
                .bg(base_color)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default().fg(base_color),
            Style::default()
                .fg(base_color)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
    }
}

/// Match state of one row within a filtered panel.
pub struct ItemContext {
    pub is_cursor: bool,
    pub is_match: bool,
    pub name_matches: bool,
}

impl ItemContext {
    pub fn new(key: &str, is_cursor: bool, ps: &PanelState) -> Self {
        let (is_match, name_matches) = item_match_state(key, ps);
        Self {
            is_cursor,
            is_match,
            name_matches,
        }
    }
}

/// Push a row name, styled by cursor position and filter state.
///
/// 1. Cursor + name matches filter: inverted highlight on matched chars
/// 2. Not matching at all: dimmed
/// 3. Name matches: bold+underlined on matched chars
/// 4. No filter, or matched via the ancestor path only: plain (bold under the cursor)
pub fn push_highlighted_name(
    spans: &mut Vec<Span<'static>>,
    text: &str,
    base_style: Style,
    ctx: &ItemContext,
    ps: &PanelState,
    colors: &UiColors,
) {
    let has_scores = !ps.match_scores.is_empty();
    let base_color = base_style.fg.unwrap_or(colors.leaf);

    if !ctx.is_match && has_scores {
        spans.push(Span::styled(
            text.to_string(),
            Style::default().fg(colors.help).add_modifier(Modifier::DIM),
        ));
    } else if has_scores && ctx.name_matches {
        let (normal, highlight) = highlight_styles(base_color, colors.bg, ctx.is_cursor);
        spans.extend(build_highlighted_text(
            text,
            &ps.filter_text,
            normal.patch(base_style),
            highlight,
        ));
    } else if ctx.is_cursor {
        spans.push(Span::styled(
            text.to_string(),
            base_style.add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(text.to_string(), base_style));
    }
}

/// Background for the row under the cursor.
pub fn cursor_bg(colors: &UiColors) -> Style {
    Style::default().bg(colors.selected_bg)
}

/// Look up match scores for a row key. Returns `(is_match, name_matches)`.
pub fn item_match_state(key: &str, ps: &PanelState) -> (bool, bool) {
    let scores = ps.match_scores.get(key);
    let is_match = scores.map(|s| s.overall()).unwrap_or(1) > 0 || ps.match_scores.is_empty();
    let name_matches = scores.map(|s| s.name_score).unwrap_or(0) > 0;
    (is_match, name_matches)
}

/// Spans with the fuzzy-matched characters of `text` highlighted.
pub fn build_highlighted_text(
    text: &str,
    pattern: &str,
    normal_style: Style,
    highlight_style: Style,
) -> Vec<Span<'static>> {
    let mut matcher = Matcher::new(Config::DEFAULT);
    let (_score, indices) = fuzzy_match_indices(text, pattern, &mut matcher);

    if indices.is_empty() {
        return vec![Span::styled(text.to_string(), normal_style)];
    }

    let mut spans = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut last_idx = 0;

    for &match_idx in &indices {
        let idx = match_idx as usize;
        if idx >= chars.len() {
            continue;
        }

        if last_idx < idx {
            let before: String = chars[last_idx..idx].iter().collect();
            spans.push(Span::styled(before, normal_style));
        }

        spans.push(Span::styled(chars[idx].to_string(), highlight_style));
        last_idx = idx + 1;
    }

    if last_idx < chars.len() {
        let after: String = chars[last_idx..].iter().collect();
        spans.push(Span::styled(after, normal_style));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(scores: HashMap<String, MatchScores>, filter: &str) -> PanelState {
        PanelState {
            is_focused: true,
            is_filtering: true,
            has_filter: true,
            border_color: Color::Cyan,
            filter_text: filter.to_string(),
            match_scores: scores,
        }
    }

    #[test]
    fn test_panel_title_shows_filter() {
        let ps = panel(HashMap::new(), "btn");
        assert_eq!(panel_title("Sidebar", &ps), " Sidebar /btn ");
    }

    #[test]
    fn test_item_match_state_without_scores_matches_everything() {
        let ps = panel(HashMap::new(), "");
        assert_eq!(item_match_state("0:button", &ps), (true, false));
    }

    #[test]
    fn test_item_match_state_path_only_match() {
        let mut scores = HashMap::new();
        scores.insert(
            "0:input".to_string(),
            MatchScores {
                name_score: 0,
                path_score: 12,
            },
        );
        scores.insert(
            "0:home".to_string(),
            MatchScores {
                name_score: 0,
                path_score: 0,
            },
        );
        let ps = panel(scores, "forms");
        assert_eq!(item_match_state("0:input", &ps), (true, false));
        assert_eq!(item_match_state("0:home", &ps), (false, false));
    }

    #[test]
    fn test_build_highlighted_text_splits_on_matches() {
        let normal = Style::default();
        let highlight = Style::default().add_modifier(Modifier::BOLD);
        let spans = build_highlighted_text("Button", "btn", normal, highlight);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Button");
        assert!(spans.iter().any(|s| s.style == highlight));
    }

    #[test]
    fn test_build_highlighted_text_no_match() {
        let spans = build_highlighted_text("Button", "zzz", Style::default(), Style::default());
        assert_eq!(spans.len(), 1);
    }
}
