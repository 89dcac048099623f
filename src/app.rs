use std::collections::{HashMap, HashSet};
use std::time::Instant;

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher};
use ratatui::layout::Rect;
use ratatui_interact::components::InputState;
use ratatui_interact::state::FocusManager;
use ratatui_interact::traits::ClickRegionRegistry;
use ratatui_themes::{ThemeName, ThemePalette};
use tracing::{debug, info};

use tuinav::auth::{AuthOpener, AuthState};
use tuinav::catalog::{Catalog, Ref, RefState};
use tuinav::interaction::{Navigator, ViewMode};
use tuinav::item::Item;
use tuinav::placeholder::{LoaderSize, Placeholder};
use tuinav::tree::{build_forest, flatten, leaf_href, FlatRow};
use tuinav::Result;

/// Per-field match scores for a sidebar row.
/// Keeps name and path scores separate so highlighting can be applied
/// to the name only.
#[derive(Debug, Clone, Copy)]
pub struct MatchScores {
    /// Score from matching against the item's name.
    pub name_score: u32,
    /// Score from matching against the full ancestor path.
    pub path_score: u32,
}

impl MatchScores {
    /// Overall score: the best of name and path.
    pub fn overall(&self) -> u32 {
        self.name_score.max(self.path_score)
    }
}

/// Actions that the event loop should take after handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Print the current item's href and exit.
    Accept,
    /// Re-read the catalog from disk.
    Reload,
}

/// Which panel has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Sidebar,
    Details,
}

/// The item the navigation layer currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub ref_index: usize,
    pub item_id: String,
}

/// Receives navigation requests from the sidebar sessions.
///
/// Clicks are scoped to the ref they happened in, so a request names an
/// item of that ref.
#[derive(Debug, Default)]
pub struct Router {
    pub view_mode: ViewMode,
    scope: usize,
    pub current: Option<Selection>,
}

impl Navigator for Router {
    fn select_item(&mut self, id: &str) {
        debug!(ref_index = self.scope, id, "navigate");
        self.current = Some(Selection {
            ref_index: self.scope,
            item_id: id.to_string(),
        });
    }
}

/// What a sidebar line shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowContent {
    /// Title line of a composed ref.
    RefTitle(String),
    /// Uppercased name of a root group.
    Heading(String),
    Node(FlatRow),
    Loading(String),
    /// One bar of a skeleton loader, `n` cells wide.
    Skeleton(usize),
    ErrorNotice(String),
    ErrorDetail(String),
    AuthPrompt,
    Login,
    AuthPending,
    AuthWarning(String),
    AuthConcluded(String),
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow {
    pub ref_index: usize,
    pub content: RowContent,
}

impl SidebarRow {
    /// Whether Enter or a click does something on this row.
    pub fn is_actionable(&self) -> bool {
        matches!(
            self.content,
            RowContent::Node(_) | RowContent::ErrorNotice(_) | RowContent::Login | RowContent::Refresh
        )
    }

    pub fn node(&self) -> Option<&FlatRow> {
        match &self.content {
            RowContent::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Stable identity used to keep the cursor in place across rebuilds.
    fn identity(&self) -> (usize, String) {
        let key = match &self.content {
            RowContent::Node(node) => format!("node:{}", node.id),
            RowContent::ErrorNotice(_) => "error".to_string(),
            RowContent::Login => "login".to_string(),
            RowContent::Refresh => "refresh".to_string(),
            other => format!("{other:?}"),
        };
        (self.ref_index, key)
    }
}

/// Key into [`App::compute_row_scores`] for a node row.
pub fn row_key(ref_index: usize, id: &str) -> String {
    format!("{ref_index}:{id}")
}

const SKELETON_WIDTHS: [usize; 3] = [12, 16, 9];

/// Main application state.
pub struct App {
    pub catalog: Catalog,
    pub router: Router,

    /// Flattened sidebar, rebuilt after every state change.
    pub rows: Vec<SidebarRow>,
    pub cursor: usize,
    pub scroll: usize,

    pub focus_manager: FocusManager<Focus>,

    /// Filter input state (using ratatui-interact's InputState).
    pub filter_input: InputState,
    /// Whether the user is typing a filter.
    pub filtering: bool,

    /// Refs whose error description is expanded.
    pub revealed_errors: HashSet<usize>,

    pub theme_name: ThemeName,

    /// Panel areas from the last render, for mouse hit-testing.
    pub click_regions: ClickRegionRegistry<Focus>,

    opener: Box<dyn AuthOpener>,
}

impl App {
    /// Build the app; `opener` launches auth surfaces for protected refs.
    pub fn with_opener(catalog: Catalog, opener: Box<dyn AuthOpener>) -> Result<Self> {
        let mut focus_manager = FocusManager::new();
        focus_manager.register(Focus::Sidebar);
        focus_manager.register(Focus::Details);
        focus_manager.set(Focus::Sidebar);

        let mut app = Self {
            catalog,
            router: Router::default(),
            rows: Vec::new(),
            cursor: 0,
            scroll: 0,
            focus_manager,
            filter_input: InputState::empty(),
            filtering: false,
            revealed_errors: HashSet::new(),
            theme_name: ThemeName::default(),
            click_regions: ClickRegionRegistry::new(),
            opener,
        };
        app.refresh()?;
        Ok(app)
    }

    /// Get the current theme palette.
    pub fn palette(&self) -> ThemePalette {
        self.theme_name.palette()
    }

    /// Cycle to the next theme.
    pub fn next_theme(&mut self) {
        self.theme_name = self.theme_name.next();
    }

    /// Cycle to the previous theme.
    pub fn prev_theme(&mut self) {
        self.theme_name = self.theme_name.prev();
    }

    /// Get the current focus panel.
    pub fn focus(&self) -> Focus {
        self.focus_manager
            .current()
            .copied()
            .unwrap_or(Focus::Sidebar)
    }

    /// Set the focus to a specific panel.
    pub fn set_focus(&mut self, panel: Focus) {
        // Clear filter when changing panels
        if self.focus() != panel {
            self.filtering = false;
            self.filter_input.clear();
        }
        self.focus_manager.set(panel);
    }

    pub fn filter(&self) -> &str {
        self.filter_input.text()
    }

    /// Whether a filter is applied, regardless of whether the user is still
    /// typing it.
    pub fn filter_active(&self) -> bool {
        !self.filter().is_empty()
    }

    // --- Catalog state ---

    /// Select `item_id` in the main collection and expand its ancestors.
    pub fn reveal(&mut self, item_id: &str) -> Result<bool> {
        let Some(ref_index) = self.catalog.refs.iter().position(|r| r.is_main) else {
            return Ok(false);
        };
        if !self.catalog.reveal(item_id) {
            return Ok(false);
        }
        self.router.current = Some(Selection {
            ref_index,
            item_id: item_id.to_string(),
        });
        self.sync_selection();
        self.refresh()?;
        if let Some(index) = self.row_index_of(ref_index, item_id) {
            self.cursor = index;
        }
        Ok(true)
    }

    /// Swap in a freshly loaded catalog. Dropping the old one stops any
    /// pending auth polls. A selection in the main collection survives.
    pub fn replace_catalog(&mut self, catalog: Catalog) -> Result<()> {
        let previous = self.router.current.take();
        self.catalog = catalog;
        self.revealed_errors.clear();
        self.cursor = 0;
        self.scroll = 0;
        info!(refs = self.catalog.refs.len(), "catalog reloaded");

        if let Some(selection) = previous {
            let was_main = self
                .catalog
                .refs
                .get(selection.ref_index)
                .is_some_and(|r| r.is_main);
            if was_main && self.reveal(&selection.item_id)? {
                return Ok(());
            }
        }
        self.refresh()
    }

    /// Rebuild the sidebar rows, keeping the cursor on the same row when it
    /// still exists.
    pub fn refresh(&mut self) -> Result<()> {
        let anchor = self.rows.get(self.cursor).map(SidebarRow::identity);
        self.rows = self.build_rows()?;
        if let Some(anchor) = anchor {
            if let Some(index) = self.rows.iter().position(|row| row.identity() == anchor) {
                self.cursor = index;
            }
        }
        self.settle_cursor();
        Ok(())
    }

    fn build_rows(&self) -> Result<Vec<SidebarRow>> {
        let mut rows = Vec::new();
        for (ref_index, r) in self.catalog.refs.iter().enumerate() {
            let mut contents = Vec::new();
            if !r.is_main {
                contents.push(RowContent::RefTitle(r.title.clone()));
            }

            match &r.state {
                RefState::Ready(collection) => {
                    let dataset = collection.dataset();
                    let expanded = r.session.expanded();
                    let selected = r.session.selected();
                    let partition = collection.partition()?;

                    let others = build_forest(dataset, expanded, selected, &partition.others, 0)?;
                    contents.extend(flatten(&others).into_iter().map(RowContent::Node));
                    for group in &partition.roots {
                        contents.push(RowContent::Heading(group.name.to_uppercase()));
                        let children =
                            build_forest(dataset, expanded, selected, &group.children, 0)?;
                        contents.extend(flatten(&children).into_iter().map(RowContent::Node));
                    }
                }
                RefState::Auth(gate) => match gate.state() {
                    AuthState::Unauthenticated => {
                        contents.push(RowContent::AuthPrompt);
                        contents.push(RowContent::Login);
                    }
                    AuthState::PendingConfirmation => {
                        contents.push(RowContent::AuthPending);
                        if let Some(warning) = gate.warning() {
                            contents.push(RowContent::AuthWarning(warning.to_string()));
                        }
                    }
                    AuthState::Attempted => {
                        contents.push(RowContent::AuthConcluded(gate.url().to_string()));
                        contents.push(RowContent::Refresh);
                    }
                },
                RefState::Loading | RefState::Error(_) => {
                    if let Some(placeholder) = r.placeholder() {
                        self.push_placeholder(&mut contents, ref_index, &placeholder);
                    }
                }
            }

            rows.extend(
                contents
                    .into_iter()
                    .map(|content| SidebarRow { ref_index, content }),
            );
        }
        Ok(rows)
    }

    fn push_placeholder(
        &self,
        contents: &mut Vec<RowContent>,
        ref_index: usize,
        placeholder: &Placeholder,
    ) {
        contents.push(match placeholder {
            Placeholder::Loading(_) => RowContent::Loading(placeholder.headline().to_string()),
            Placeholder::Error { .. } => RowContent::ErrorNotice(placeholder.headline().to_string()),
        });
        match placeholder {
            Placeholder::Loading(LoaderSize::Multiple) => {
                contents.extend(SKELETON_WIDTHS.iter().map(|w| RowContent::Skeleton(*w)));
            }
            Placeholder::Loading(LoaderSize::Single) => {}
            Placeholder::Error { description } => {
                if self.revealed_errors.contains(&ref_index) {
                    contents.extend(
                        description
                            .lines()
                            .map(|line| RowContent::ErrorDetail(line.to_string())),
                    );
                }
            }
        }
    }

    /// Echo the router's current item into every ref's Selected store.
    fn sync_selection(&mut self) {
        let current = self.router.current.clone();
        for (index, r) in self.catalog.refs.iter_mut().enumerate() {
            let active = current
                .as_ref()
                .filter(|s| s.ref_index == index)
                .map(|s| s.item_id.as_str());
            r.session.sync_selection(active);
        }
    }

    pub fn row_index_of(&self, ref_index: usize, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| {
            row.ref_index == ref_index && row.node().is_some_and(|node| node.id == id)
        })
    }

    fn item(&self, ref_index: usize, id: &str) -> Option<&Item> {
        self.catalog
            .refs
            .get(ref_index)?
            .collection()?
            .dataset()
            .get(id)
    }

    /// Names from the top of the tree down to `id`, inclusive.
    pub fn path_names(&self, ref_index: usize, id: &str) -> Vec<String> {
        let Some(collection) = self.catalog.refs.get(ref_index).and_then(Ref::collection) else {
            return Vec::new();
        };
        let dataset = collection.dataset();
        let mut names: Vec<String> = dataset
            .ancestors(id)
            .into_iter()
            .rev()
            .filter_map(|ancestor| dataset.get(ancestor).map(|item| item.name.clone()))
            .collect();
        if let Some(item) = dataset.get(id) {
            names.push(item.name.clone());
        }
        names
    }

    /// The ref and item the router currently points at.
    pub fn current_item(&self) -> Option<(&Ref, &Item)> {
        let selection = self.router.current.as_ref()?;
        let r = self.catalog.refs.get(selection.ref_index)?;
        let item = self.item(selection.ref_index, &selection.item_id)?;
        Some((r, item))
    }

    /// Link for the current item: `#id` for a branch, a view path otherwise.
    pub fn current_href(&self) -> Option<String> {
        let (r, item) = self.current_item()?;
        let id = r.qualified_id(&item.id);
        if item.has_children() {
            Some(format!("#{id}"))
        } else {
            Some(leaf_href(&id, self.router.view_mode))
        }
    }

    // --- Interaction ---

    /// Route a click on a node of `ref_index` through its session.
    pub fn click_node(&mut self, ref_index: usize, id: &str) -> Result<Option<String>> {
        let Some(r) = self.catalog.refs.get_mut(ref_index) else {
            return Ok(None);
        };
        let RefState::Ready(collection) = &r.state else {
            return Ok(None);
        };
        self.router.scope = ref_index;
        let target = r.session.click(collection.dataset(), id, &mut self.router)?;
        if target.is_some() {
            self.sync_selection();
        }
        self.refresh()?;
        Ok(target)
    }

    /// Open the auth surface of the gate at `ref_index`.
    pub fn start_auth(&mut self, ref_index: usize, now: Instant) -> bool {
        let Some(Ref {
            state: RefState::Auth(gate),
            ..
        }) = self.catalog.refs.get_mut(ref_index)
        else {
            return false;
        };
        gate.start_auth(self.opener.as_mut(), now).is_some()
    }

    /// Drive every auth gate's poll. Returns true when the sidebar changed.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        let mut changed = false;
        for r in &mut self.catalog.refs {
            if let RefState::Auth(gate) = &mut r.state {
                if let Some(event) = gate.tick(now) {
                    debug!(ref_id = %r.id, ?event, "auth gate event");
                    changed = true;
                }
            }
        }
        if changed {
            self.refresh()?;
        }
        Ok(changed)
    }

    /// Earliest instant at which [`App::tick`] has work to do.
    pub fn next_poll_due(&self) -> Option<Instant> {
        self.catalog
            .refs
            .iter()
            .filter_map(|r| match &r.state {
                RefState::Auth(gate) => gate.next_poll_due(),
                _ => None,
            })
            .min()
    }

    /// Activate the row at `index`, as Enter or a click does.
    pub fn activate(&mut self, index: usize) -> Result<Action> {
        let Some(row) = self.rows.get(index).cloned() else {
            return Ok(Action::None);
        };
        self.cursor = index;
        match row.content {
            RowContent::Node(node) => {
                self.click_node(row.ref_index, &node.id)?;
            }
            RowContent::ErrorNotice(_) => {
                if !self.revealed_errors.remove(&row.ref_index) {
                    self.revealed_errors.insert(row.ref_index);
                }
                self.refresh()?;
            }
            RowContent::Login => {
                self.start_auth(row.ref_index, Instant::now());
                self.refresh()?;
            }
            RowContent::Refresh => return Ok(Action::Reload),
            _ => {}
        }
        Ok(Action::None)
    }

    // --- Cursor movement ---

    /// Rows the cursor may rest on: actionable rows, narrowed to matching
    /// nodes while a filter is applied.
    fn navigable_indices(&self) -> Vec<usize> {
        if self.filter_active() {
            let scores = self.compute_row_scores();
            self.rows
                .iter()
                .enumerate()
                .filter(|(_, row)| {
                    row.node().is_some_and(|node| {
                        scores
                            .get(&row_key(row.ref_index, &node.id))
                            .is_some_and(|s| s.overall() > 0)
                    })
                })
                .map(|(index, _)| index)
                .collect()
        } else {
            self.rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.is_actionable())
                .map(|(index, _)| index)
                .collect()
        }
    }

    /// Move the cursor onto an actionable row after the rows changed.
    fn settle_cursor(&mut self) {
        if self.rows.get(self.cursor).is_some_and(SidebarRow::is_actionable) {
            return;
        }
        let candidates = self.navigable_indices();
        self.cursor = candidates
            .iter()
            .find(|&&index| index > self.cursor)
            .or_else(|| candidates.iter().rev().find(|&&index| index < self.cursor))
            .copied()
            .unwrap_or(0);
    }

    pub fn move_up(&mut self) {
        let candidates = self.navigable_indices();
        let previous = candidates.iter().rev().find(|&&index| index < self.cursor);
        match previous {
            Some(&index) => self.cursor = index,
            // Wrap around while filtering
            None if self.filter_active() => {
                if let Some(&last) = candidates.last() {
                    self.cursor = last;
                }
            }
            None => {}
        }
    }

    pub fn move_down(&mut self) {
        let candidates = self.navigable_indices();
        let next = candidates.iter().find(|&&index| index > self.cursor);
        match next {
            Some(&index) => self.cursor = index,
            None if self.filter_active() => {
                if let Some(&first) = candidates.first() {
                    self.cursor = first;
                }
            }
            None => {}
        }
    }

    /// Right: open a collapsed branch through the click protocol, or step
    /// into an expanded one.
    fn expand_or_enter(&mut self) -> Result<()> {
        let Some(row) = self.rows.get(self.cursor).cloned() else {
            return Ok(());
        };
        let Some(node) = row.node() else {
            return Ok(());
        };
        if !node.is_branch() {
            return Ok(());
        }
        if node.is_expanded() {
            self.move_down();
        } else {
            self.click_node(row.ref_index, &node.id)?;
        }
        Ok(())
    }

    /// Left: close an expanded branch, otherwise jump to the parent row.
    fn collapse_or_parent(&mut self) -> Result<()> {
        let Some(row) = self.rows.get(self.cursor).cloned() else {
            return Ok(());
        };
        let Some(node) = row.node() else {
            return Ok(());
        };
        if node.is_expanded() {
            self.click_node(row.ref_index, &node.id)?;
            return Ok(());
        }
        let parent = self
            .item(row.ref_index, &node.id)
            .and_then(|item| item.parent_id.clone());
        if let Some(index) = parent.and_then(|parent| self.row_index_of(row.ref_index, &parent)) {
            self.cursor = index;
        }
        Ok(())
    }

    /// Ensure the scroll offset keeps the cursor visible within the given
    /// viewport height.
    pub fn ensure_visible(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + viewport_height {
            self.scroll = self.cursor + 1 - viewport_height;
        }
        let max_scroll = self.rows.len().saturating_sub(viewport_height);
        self.scroll = self.scroll.min(max_scroll);
    }

    // --- Filtering ---

    /// Score every node row against the filter, keyed by [`row_key`].
    pub fn compute_row_scores(&self) -> HashMap<String, MatchScores> {
        let pattern = self.filter();
        let mut scores = HashMap::new();
        if pattern.is_empty() {
            return scores;
        }
        let mut matcher = Matcher::new(Config::DEFAULT);
        for row in &self.rows {
            let Some(node) = row.node() else {
                continue;
            };
            let path = self.path_names(row.ref_index, &node.id).join(" / ");
            scores.insert(
                row_key(row.ref_index, &node.id),
                MatchScores {
                    name_score: fuzzy_match_score(&node.name, pattern, &mut matcher),
                    path_score: fuzzy_match_score(&path, pattern, &mut matcher),
                },
            );
        }
        scores
    }

    /// After the filter text changes, move the cursor to the nearest match
    /// if it is not already on one.
    fn auto_select_next_match(&mut self) {
        if !self.filter_active() {
            return;
        }
        let candidates = self.navigable_indices();
        if candidates.contains(&self.cursor) {
            return;
        }
        if let Some(&index) = candidates
            .iter()
            .find(|&&index| index > self.cursor)
            .or_else(|| candidates.first())
        {
            self.cursor = index;
        }
    }

    fn clear_filter(&mut self) {
        self.filtering = false;
        self.filter_input.clear();
    }

    // --- Events ---

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> Result<Action> {
        use crossterm::event::KeyCode;

        if self.filtering {
            return self.handle_filter_key(key);
        }

        match key.code {
            KeyCode::Char('q') => return Ok(Action::Quit),
            KeyCode::Char('p') => {
                if self.router.current.is_some() {
                    return Ok(Action::Accept);
                }
            }
            KeyCode::Char('r') => return Ok(Action::Reload),
            KeyCode::Char('v') => {
                self.router.view_mode = self.router.view_mode.toggle();
            }
            KeyCode::Char(']') | KeyCode::Char('T') => self.next_theme(),
            KeyCode::Char('[') => self.prev_theme(),
            KeyCode::Tab => {
                self.clear_filter();
                self.focus_manager.next();
            }
            KeyCode::BackTab => {
                self.clear_filter();
                self.focus_manager.prev();
            }
            KeyCode::Esc => self.clear_filter(),
            _ if self.focus() != Focus::Sidebar => {}
            KeyCode::Char('/') => {
                self.filtering = true;
                self.filter_input.clear();
            }
            KeyCode::Enter | KeyCode::Char(' ') => return self.activate(self.cursor),
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Left | KeyCode::Char('h') => self.collapse_or_parent()?,
            KeyCode::Right | KeyCode::Char('l') => self.expand_or_enter()?,
            _ => {}
        }
        Ok(Action::None)
    }

    fn handle_filter_key(&mut self, key: crossterm::event::KeyEvent) -> Result<Action> {
        use crossterm::event::KeyCode;

        match key.code {
            KeyCode::Esc => self.clear_filter(),
            KeyCode::Enter => {
                // Keep the filter applied; leave typing mode
                self.filtering = false;
            }
            KeyCode::Tab => {
                self.clear_filter();
                self.focus_manager.next();
            }
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Backspace => {
                self.filter_input.delete_char_backward();
                self.auto_select_next_match();
            }
            KeyCode::Char(c) => {
                self.filter_input.insert_char(c);
                self.auto_select_next_match();
            }
            _ => {}
        }
        Ok(Action::None)
    }

    /// Handle a mouse event and return the resulting Action.
    pub fn handle_mouse(&mut self, event: crossterm::event::MouseEvent) -> Result<Action> {
        use crossterm::event::{MouseButton, MouseEventKind};

        let col = event.column;
        let row = event.row;

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(&clicked_panel) = self.click_regions.handle_click(col, row) else {
                    return Ok(Action::None);
                };
                self.set_focus(clicked_panel);
                if clicked_panel != Focus::Sidebar {
                    return Ok(Action::None);
                }
                if let Some(area) = self.sidebar_area() {
                    let inner_top = area.y + 1; // border
                    let inner_bottom = (area.y + area.height).saturating_sub(1);
                    if row >= inner_top && row < inner_bottom {
                        let index = self.scroll + (row - inner_top) as usize;
                        if self.rows.get(index).is_some_and(SidebarRow::is_actionable) {
                            return self.activate(index);
                        }
                    }
                }
                Ok(Action::None)
            }
            MouseEventKind::ScrollUp => {
                self.move_up();
                Ok(Action::None)
            }
            MouseEventKind::ScrollDown => {
                self.move_down();
                Ok(Action::None)
            }
            _ => Ok(Action::None),
        }
    }

    /// The sidebar area from the last render.
    fn sidebar_area(&self) -> Option<Rect> {
        self.click_regions
            .regions()
            .iter()
            .find(|r| r.data == Focus::Sidebar)
            .map(|r| r.area)
    }
}

/// Fuzzy match score of `text` against `pattern`, 0 when it does not match.
pub fn fuzzy_match_score(text: &str, pattern: &str, matcher: &mut Matcher) -> u32 {
    use nucleo_matcher::Utf32Str;

    let pattern = Pattern::parse(pattern, CaseMatching::Smart, Normalization::Smart);

    let mut haystack_buf = Vec::new();
    let haystack = Utf32Str::new(text, &mut haystack_buf);

    pattern.score(haystack, matcher).unwrap_or(0)
}

/// Fuzzy match and return both score and matched char positions.
/// Indices are sorted and deduplicated as recommended by nucleo-matcher.
pub fn fuzzy_match_indices(
    text: &str,
    pattern_str: &str,
    matcher: &mut Matcher,
) -> (u32, Vec<u32>) {
    use nucleo_matcher::Utf32Str;

    let pattern = Pattern::parse(pattern_str, CaseMatching::Smart, Normalization::Smart);

    let mut haystack_buf = Vec::new();
    let haystack = Utf32Str::new(text, &mut haystack_buf);

    let mut indices = Vec::new();
    if let Some(score) = pattern.indices(haystack, matcher, &mut indices) {
        indices.sort_unstable();
        indices.dedup();
        (score, indices)
    } else {
        (0, Vec::new())
    }
}
