//! Immediate-mode item submission surface
//!
//! The frame callback declares windows, menus, sections, buttons and text
//! every frame. `Ui` lays them out in a simple flow, records each item (path,
//! kind, open/checked state, rect) so the test engine can find and drive it,
//! and lowers the frame into a flat [`DrawList`] of rectangles.
//!
//! Ids are derived from the id stack: a window pushes its title, tree nodes
//! and menus push their label, collapsing headers push nothing.

use glint_platform::{
    DrawList, Event, Framebuffer, InputEvent, MouseButton, MouseEvent, RasterOptions, Rect,
};
use glint_test_engine::{EngineUi, ItemAction, ItemId, ItemInfo, ItemKind, UiDriver};
use glint_theme::{Color, ColorSlot, Style};
use rustc_hash::{FxHashMap, FxHashSet};

const CHAR_WIDTH: f32 = 7.0;
const LINE_HEIGHT: f32 = 19.0;
const TITLE_BAR_HEIGHT: f32 = 19.0;
const INDENT: f32 = 21.0;
const LABEL_HEIGHT: f32 = 6.0;
const MARK_SIZE: f32 = 7.0;
const MIN_WINDOW_WIDTH: f32 = 200.0;
const MIN_POPUP_WIDTH: f32 = 120.0;
const WINDOW_SPACING: (f32, f32) = (400.0, 340.0);
const WINDOWS_PER_ROW: usize = 3;
const CLEAR_COLOR: Color = Color::rgb(0.45, 0.55, 0.60);

/// Window that receives items submitted outside any explicit window
pub const DEFAULT_WINDOW: &str = "Debug";

/// Flow layout for one window, menu bar or popup
#[derive(Clone, Copy, Debug)]
struct Layout {
    x: f32,
    y: f32,
    cursor_x: f32,
    cursor_y: f32,
    max_x: f32,
    max_y: f32,
    indent: f32,
    horizontal: bool,
}

impl Layout {
    fn new(x: f32, y: f32, horizontal: bool) -> Self {
        Self {
            x,
            y,
            cursor_x: x,
            cursor_y: y,
            max_x: x,
            max_y: y,
            indent: 0.0,
            horizontal,
        }
    }

    fn place(&mut self, width: f32, height: f32, spacing: [f32; 2]) -> Rect {
        let rect = if self.horizontal {
            let rect = Rect::new(self.cursor_x, self.y, width, height);
            self.cursor_x += width + spacing[0];
            rect
        } else {
            let rect = Rect::new(self.x + self.indent, self.cursor_y, width, height);
            self.cursor_y += height + spacing[1];
            rect
        };
        self.max_x = self.max_x.max(rect.right());
        self.max_y = self.max_y.max(rect.bottom());
        rect
    }
}

/// A window being submitted
struct WindowFrame {
    x: f32,
    y: f32,
    item: usize,
    background: usize,
    title_bar: usize,
    /// Rects stretched to the final window width (menu bars)
    full_width: Vec<(usize, Rect)>,
    outer_ids: Vec<String>,
    outer_layouts: Vec<Layout>,
}

/// Item submission surface; one per runner, reused every frame
pub struct Ui {
    style: Style,
    surface: (u32, u32),
    draw_list: DrawList,
    items: Vec<ItemInfo>,
    previous_items: Vec<ItemInfo>,
    id_stack: Vec<String>,
    layouts: Vec<Layout>,
    windows: Vec<WindowFrame>,
    open: FxHashMap<ItemId, bool>,
    window_positions: FxHashMap<String, (f32, f32)>,
    pending: Vec<(ItemId, ItemAction)>,
    clicked: FxHashSet<ItemId>,
    activated: FxHashSet<ItemId>,
    mouse: Option<(f32, f32)>,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui {
    pub fn new() -> Self {
        Self {
            style: Style::default(),
            surface: (0, 0),
            draw_list: DrawList::new(CLEAR_COLOR.to_rgba8()),
            items: Vec::new(),
            previous_items: Vec::new(),
            id_stack: Vec::new(),
            layouts: Vec::new(),
            windows: Vec::new(),
            open: FxHashMap::default(),
            window_positions: FxHashMap::default(),
            pending: Vec::new(),
            clicked: FxHashSet::default(),
            activated: FxHashSet::default(),
            mouse: None,
        }
    }

    // =========================================================================
    // Frame lifecycle
    // =========================================================================

    /// Start a frame: route input, apply injected actions
    pub fn begin_frame(&mut self, events: &[Event], surface: (u32, u32), style: &Style) {
        self.style = style.clone();
        self.surface = surface;
        self.previous_items = std::mem::take(&mut self.items);
        self.activated.clear();
        self.clicked.clear();
        self.id_stack.clear();
        self.layouts.clear();
        self.windows.clear();
        self.draw_list.clear(CLEAR_COLOR.to_rgba8());

        for event in events {
            if let Event::Input(input) = event {
                self.handle_input(input);
            }
        }

        for (id, action) in std::mem::take(&mut self.pending) {
            match action {
                ItemAction::Open => {
                    self.open.insert(id, true);
                }
                ItemAction::Close => {
                    self.open.insert(id, false);
                }
                ItemAction::Click => {
                    self.clicked.insert(id);
                }
            }
            // Injected interactions move the virtual mouse like a user would
            if let Some(item) = self.previous_items.iter().find(|item| item.id == id) {
                let rect = item.rect;
                self.mouse = Some((rect.x + rect.width / 2.0, rect.y + rect.height / 2.0));
            }
        }
    }

    /// Finish the frame: close open windows, draw the cursor
    pub fn end_frame(&mut self) {
        while !self.windows.is_empty() {
            self.end_window();
        }
        if let Some((x, y)) = self.mouse {
            self.draw_list.push_cursor(x, y);
        }
    }

    fn handle_input(&mut self, input: &InputEvent) {
        match input {
            InputEvent::Mouse(MouseEvent::Moved { x, y }) => self.mouse = Some((*x, *y)),
            InputEvent::Mouse(MouseEvent::ButtonPressed {
                button: MouseButton::Left,
                x,
                y,
            }) => {
                self.mouse = Some((*x, *y));
                if let Some(id) = self.hit_test(*x, *y) {
                    self.clicked.insert(id);
                }
            }
            InputEvent::Mouse(MouseEvent::Left) => self.mouse = None,
            _ => {}
        }
    }

    /// Topmost interactive item of the previous frame under the point
    fn hit_test(&self, x: f32, y: f32) -> Option<ItemId> {
        self.previous_items
            .iter()
            .rev()
            .filter(|item| !matches!(item.kind, ItemKind::Window | ItemKind::Text))
            .find(|item| item.rect.contains(x, y))
            .map(|item| item.id)
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn items(&self) -> &[ItemInfo] {
        &self.items
    }

    pub fn mouse_position(&self) -> Option<(f32, f32)> {
        self.mouse
    }

    // =========================================================================
    // Windows
    // =========================================================================

    /// Submit a window and its contents
    pub fn window(&mut self, title: &str, contents: impl FnOnce(&mut Ui)) {
        self.begin_window(title);
        contents(self);
        self.end_window();
    }

    pub fn begin_window(&mut self, title: &str) {
        let count = self.window_positions.len();
        let (x, y) = *self
            .window_positions
            .entry(title.to_string())
            .or_insert_with(|| {
                let column = (count % WINDOWS_PER_ROW) as f32;
                let row = (count / WINDOWS_PER_ROW) as f32;
                (20.0 + column * WINDOW_SPACING.0, 20.0 + row * WINDOW_SPACING.1)
            });

        let path = vec![title.to_string()];
        let item = self.items.len();
        self.items.push(ItemInfo {
            id: ItemId::from_path(&path),
            path,
            kind: ItemKind::Window,
            open: None,
            checked: None,
            rect: Rect::new(x, y, 0.0, 0.0),
        });

        let background = self
            .draw_list
            .push_rect(Rect::new(x, y, 0.0, 0.0), self.rgba(ColorSlot::WindowBg));
        let title_bar = self.draw_list.push_rect(
            Rect::new(x, y, 0.0, TITLE_BAR_HEIGHT),
            self.rgba(ColorSlot::TitleBgActive),
        );
        let padding = self.style.window_padding;
        self.draw_label(x + padding[0], Rect::new(x, y, 0.0, TITLE_BAR_HEIGHT), title);

        self.windows.push(WindowFrame {
            x,
            y,
            item,
            background,
            title_bar,
            full_width: Vec::new(),
            outer_ids: std::mem::replace(&mut self.id_stack, vec![title.to_string()]),
            outer_layouts: std::mem::replace(
                &mut self.layouts,
                vec![Layout::new(
                    x + padding[0],
                    y + TITLE_BAR_HEIGHT + padding[1],
                    false,
                )],
            ),
        });
    }

    pub fn end_window(&mut self) {
        let Some(frame) = self.windows.pop() else {
            tracing::warn!("end_window called without a matching begin_window");
            return;
        };
        let padding = self.style.window_padding;
        let content = self
            .layouts
            .first()
            .copied()
            .unwrap_or_else(|| Layout::new(frame.x, frame.y + TITLE_BAR_HEIGHT, false));
        let width = (content.max_x + padding[0] - frame.x).max(MIN_WINDOW_WIDTH);
        let height = (content.max_y + padding[1] - frame.y).max(TITLE_BAR_HEIGHT + padding[1]);
        let rect = Rect::new(frame.x, frame.y, width, height);

        self.draw_list.set_rect(frame.background, rect);
        self.draw_list
            .set_rect(frame.title_bar, Rect::new(frame.x, frame.y, width, TITLE_BAR_HEIGHT));
        for (index, bar) in &frame.full_width {
            self.draw_list
                .set_rect(*index, Rect::new(frame.x, bar.y, width, bar.height));
        }
        if let Some(item) = self.items.get_mut(frame.item) {
            item.rect = rect;
        }

        self.id_stack = frame.outer_ids;
        self.layouts = frame.outer_layouts;
    }

    fn ensure_window(&mut self) {
        if self.windows.is_empty() {
            self.begin_window(DEFAULT_WINDOW);
        }
    }

    // =========================================================================
    // Menus
    // =========================================================================

    /// A horizontal menu bar spanning the window
    pub fn menu_bar(&mut self, contents: impl FnOnce(&mut Ui)) {
        self.ensure_window();
        let row_y = self.layout().cursor_y;
        let start_x = self.layout().x;
        let background = self.draw_list.push_rect(
            Rect::new(start_x, row_y, 0.0, LINE_HEIGHT),
            self.rgba(ColorSlot::MenuBarBg),
        );

        self.layouts.push(Layout::new(start_x, row_y, true));
        contents(self);
        let bar = self.layouts.pop().unwrap_or_else(|| Layout::new(start_x, row_y, true));

        let spacing = self.style.item_spacing;
        let rect = self.layout().place(bar.max_x - start_x, LINE_HEIGHT, spacing);
        if let Some(frame) = self.windows.last_mut() {
            frame.full_width.push((background, rect));
        }
    }

    /// A menu header; `contents` runs while the menu is open
    pub fn menu(&mut self, label: &str, contents: impl FnOnce(&mut Ui)) -> bool {
        self.ensure_window();
        let padding = self.style.frame_padding;
        let below = self.layout().horizontal;
        let rect = self.place(label_width(label) + padding[0] * 2.0, LINE_HEIGHT);
        let path = self.item_path(label);
        let id = ItemId::from_path(&path);
        let open = self.toggle_open(id);

        if open || self.hovered(rect) {
            let slot = if open {
                ColorSlot::HeaderActive
            } else {
                ColorSlot::HeaderHovered
            };
            self.draw_list.push_rect(rect, self.rgba(slot));
        }
        self.draw_label(rect.x + padding[0], rect, label);
        self.push_item(path, ItemKind::Menu, Some(open), None, rect);

        if open {
            let (x, y) = if below {
                (rect.x, rect.bottom())
            } else {
                (rect.right(), rect.y)
            };
            let window_padding = self.style.window_padding;
            let background = self
                .draw_list
                .push_rect(Rect::new(x, y, 0.0, 0.0), self.rgba(ColorSlot::PopupBg));
            self.layouts.push(Layout::new(
                x + window_padding[0],
                y + window_padding[1],
                false,
            ));
            self.id_stack.push(label.to_string());
            contents(self);
            self.id_stack.pop();
            if let Some(popup) = self.layouts.pop() {
                let width = (popup.max_x + window_padding[0] - x).max(MIN_POPUP_WIDTH);
                let height = popup.max_y + window_padding[1] - y;
                self.draw_list
                    .set_rect(background, Rect::new(x, y, width, height));
            }
        }
        open
    }

    /// A plain menu entry; returns true when clicked
    pub fn menu_item(&mut self, label: &str) -> bool {
        self.menu_entry(label, None)
    }

    /// A checkable menu entry bound to `selected`; returns true when clicked
    pub fn menu_item_toggle(&mut self, label: &str, selected: &mut bool) -> bool {
        self.menu_entry(label, Some(selected))
    }

    fn menu_entry(&mut self, label: &str, selected: Option<&mut bool>) -> bool {
        self.ensure_window();
        let padding = self.style.frame_padding;
        let rect = self.place(INDENT + label_width(label) + padding[0] * 2.0, LINE_HEIGHT);
        let path = self.item_path(label);
        let id = ItemId::from_path(&path);
        let pressed = self.take_click(id);

        let checked = selected.map(|selected| {
            if pressed {
                *selected = !*selected;
            }
            *selected
        });

        if self.hovered(rect) {
            self.draw_list
                .push_rect(rect, self.rgba(ColorSlot::HeaderHovered));
        }
        if checked == Some(true) {
            self.draw_mark(rect.x + padding[0], rect, ColorSlot::CheckMark);
        }
        self.draw_label(rect.x + INDENT, rect, label);
        self.push_item(path, ItemKind::MenuItem, None, checked, rect);
        pressed
    }

    // =========================================================================
    // Widgets
    // =========================================================================

    /// A collapsible section; returns whether it is open. Does not push an id.
    pub fn collapsing_header(&mut self, label: &str) -> bool {
        self.ensure_window();
        let padding = self.style.frame_padding;
        let rect = self.place(INDENT + label_width(label) + padding[0] * 2.0, LINE_HEIGHT);
        let path = self.item_path(label);
        let id = ItemId::from_path(&path);
        let open = self.toggle_open(id);

        let slot = if open {
            ColorSlot::HeaderActive
        } else if self.hovered(rect) {
            ColorSlot::HeaderHovered
        } else {
            ColorSlot::Header
        };
        self.draw_list.push_rect(rect, self.rgba(slot));
        self.draw_mark(rect.x + padding[0], rect, ColorSlot::Text);
        self.draw_label(rect.x + INDENT, rect, label);
        self.push_item(path, ItemKind::CollapsingHeader, Some(open), None, rect);
        open
    }

    /// A tree node; `contents` runs indented, inside the node's id scope,
    /// while the node is open
    pub fn tree_node(&mut self, label: &str, contents: impl FnOnce(&mut Ui)) -> bool {
        self.ensure_window();
        let padding = self.style.frame_padding;
        let rect = self.place(INDENT + label_width(label) + padding[0] * 2.0, LINE_HEIGHT);
        let path = self.item_path(label);
        let id = ItemId::from_path(&path);
        let open = self.toggle_open(id);

        if self.hovered(rect) {
            self.draw_list
                .push_rect(rect, self.rgba(ColorSlot::HeaderHovered));
        }
        self.draw_mark(rect.x + padding[0], rect, ColorSlot::Text);
        self.draw_label(rect.x + INDENT, rect, label);
        self.push_item(path, ItemKind::TreeNode, Some(open), None, rect);

        if open {
            self.id_stack.push(label.to_string());
            self.layout().indent += INDENT;
            contents(self);
            self.layout().indent -= INDENT;
            self.id_stack.pop();
        }
        open
    }

    /// A push button; returns true on the frame it is clicked
    pub fn button(&mut self, label: &str) -> bool {
        self.ensure_window();
        let padding = self.style.frame_padding;
        let rect = self.place(label_width(label) + padding[0] * 2.0, LINE_HEIGHT);
        let path = self.item_path(label);
        let id = ItemId::from_path(&path);
        let pressed = self.take_click(id);

        let slot = if pressed {
            ColorSlot::ButtonActive
        } else if self.hovered(rect) {
            ColorSlot::ButtonHovered
        } else {
            ColorSlot::Button
        };
        self.draw_list.push_rect(rect, self.rgba(slot));
        self.draw_label(rect.x + padding[0], rect, label);
        self.push_item(path, ItemKind::Button, None, None, rect);
        pressed
    }

    pub fn text(&mut self, text: &str) {
        self.ensure_window();
        let rect = self.place(label_width(text), LINE_HEIGHT);
        self.draw_label(rect.x, rect, text);
        let path = self.item_path(text);
        self.push_item(path, ItemKind::Text, None, None, rect);
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn layout(&mut self) -> &mut Layout {
        if self.layouts.is_empty() {
            self.layouts.push(Layout::new(0.0, 0.0, false));
        }
        let last = self.layouts.len() - 1;
        &mut self.layouts[last]
    }

    fn place(&mut self, width: f32, height: f32) -> Rect {
        let spacing = self.style.item_spacing;
        self.layout().place(width, height, spacing)
    }

    fn item_path(&self, label: &str) -> Vec<String> {
        let mut path = self.id_stack.clone();
        path.push(label.to_string());
        path
    }

    fn push_item(
        &mut self,
        path: Vec<String>,
        kind: ItemKind,
        open: Option<bool>,
        checked: Option<bool>,
        rect: Rect,
    ) {
        self.items.push(ItemInfo {
            id: ItemId::from_path(&path),
            path,
            kind,
            open,
            checked,
            rect,
        });
    }

    /// Consume a pending click for `id`
    fn take_click(&mut self, id: ItemId) -> bool {
        if self.clicked.remove(&id) {
            self.activated.insert(id);
            true
        } else {
            false
        }
    }

    /// Current open state, flipped when clicked this frame
    fn toggle_open(&mut self, id: ItemId) -> bool {
        let mut open = self.open.get(&id).copied().unwrap_or(false);
        if self.take_click(id) {
            open = !open;
        }
        self.open.insert(id, open);
        open
    }

    fn hovered(&self, rect: Rect) -> bool {
        self.mouse.is_some_and(|(x, y)| rect.contains(x, y))
    }

    fn rgba(&self, slot: ColorSlot) -> [u8; 4] {
        let color = self.style.color(slot);
        color.with_alpha(color.a * self.style.alpha).to_rgba8()
    }

    /// Text is previewed as a bar as wide as the glyph run
    fn draw_label(&mut self, x: f32, row: Rect, label: &str) {
        let y = row.y + (row.height - LABEL_HEIGHT) / 2.0;
        let color = self.rgba(ColorSlot::Text);
        self.draw_list
            .push_rect(Rect::new(x, y, label_width(label), LABEL_HEIGHT), color);
    }

    fn draw_mark(&mut self, x: f32, row: Rect, slot: ColorSlot) {
        let y = row.y + (row.height - MARK_SIZE) / 2.0;
        let color = self.rgba(slot);
        self.draw_list
            .push_rect(Rect::new(x, y, MARK_SIZE, MARK_SIZE), color);
    }
}

fn label_width(label: &str) -> f32 {
    label.chars().count() as f32 * CHAR_WIDTH
}

impl UiDriver for Ui {
    fn items(&self) -> &[ItemInfo] {
        &self.items
    }

    fn was_activated(&self, id: ItemId) -> bool {
        self.activated.contains(&id)
    }

    fn inject(&mut self, id: ItemId, action: ItemAction) {
        self.pending.push((id, action));
    }

    fn surface_size(&self) -> (u32, u32) {
        self.surface
    }

    fn rasterize(&self, region: Rect, options: RasterOptions) -> Framebuffer {
        let mut image = Framebuffer::new(region.width.ceil() as u32, region.height.ceil() as u32);
        image.rasterize(&self.draw_list, (region.x, region.y), options);
        image
    }
}

impl EngineUi for Ui {
    fn begin_window(&mut self, title: &str) {
        Ui::begin_window(self, title);
    }

    fn text(&mut self, text: &str) {
        Ui::text(self, text);
    }

    fn end_window(&mut self) {
        Ui::end_window(self);
    }
}
