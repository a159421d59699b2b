//! Single-line search box with IME support.
//!
//! Editing logic lives in `TextBuffer`, which has no GPUI dependency. The
//! `TextEditor` entity wires it to actions, the mouse and the platform input
//! handler; `SearchInput` is the public wrapper the panel embeds.

use std::ops::Range;

use gpui::{
    div, fill, point, prelude::*, px, relative, size, App, Bounds, ClipboardItem, Context,
    CursorStyle, Element, ElementId, ElementInputHandler, Entity, EntityInputHandler, EventEmitter,
    FocusHandle, Focusable, GlobalElementId, Hsla, IntoElement, LayoutId, MouseButton,
    MouseDownEvent, MouseMoveEvent, MouseUpEvent, PaintQuad, ParentElement, Pixels, Point, Render,
    ShapedLine, SharedString, Style, Styled, TextRun, UTF16Selection, UnderlineStyle, Window,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::actions::{
    Backspace, Copy, Cut, Delete, End, Home, MoveLeft, MoveRight, Paste, SelectLeft, SelectRight,
    Submit, TextSelectAll,
};
use crate::theme::ThemeExt;

#[derive(Debug, Clone)]
pub enum SearchInputEvent {
    /// The text changed. Carries the full new text.
    Changed(String),
    /// Enter was pressed.
    Submit,
}

// =============================================================================
// TextBuffer
// =============================================================================

/// Text plus selection and IME composition state.
///
/// Offsets are UTF-8 byte offsets on grapheme boundaries. The platform IME
/// speaks UTF-16, hence the conversion helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    selected: Range<usize>,
    reversed: bool,
    marked: Option<Range<usize>>,
}

impl TextBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace everything and put the caret at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.selected = self.text.len()..self.text.len();
        self.reversed = false;
        self.marked = None;
    }

    /// The active end of the selection.
    pub fn caret(&self) -> usize {
        if self.reversed {
            self.selected.start
        } else {
            self.selected.end
        }
    }

    pub fn selection(&self) -> Range<usize> {
        self.selected.clone()
    }

    pub fn selected_text(&self) -> Option<&str> {
        (!self.selected.is_empty()).then(|| &self.text[self.selected.clone()])
    }

    pub fn move_to(&mut self, offset: usize) {
        self.selected = offset..offset;
        self.reversed = false;
    }

    /// Extend the selection so its active end lands on `offset`.
    pub fn select_to(&mut self, offset: usize) {
        if self.reversed {
            self.selected.start = offset;
        } else {
            self.selected.end = offset;
        }
        if self.selected.end < self.selected.start {
            self.reversed = !self.reversed;
            self.selected = self.selected.end..self.selected.start;
        }
    }

    pub fn select_all(&mut self) {
        self.selected = 0..self.text.len();
        self.reversed = false;
    }

    pub fn previous_boundary(&self, offset: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .rev()
            .find_map(|(idx, _)| (idx < offset).then_some(idx))
            .unwrap_or(0)
    }

    pub fn next_boundary(&self, offset: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .find_map(|(idx, _)| (idx > offset).then_some(idx))
            .unwrap_or(self.text.len())
    }

    /// Range an edit applies to: explicit, else the IME composition, else the selection.
    fn edit_range(&self, range_utf16: Option<&Range<usize>>) -> Range<usize> {
        range_utf16
            .map(|r| self.range_from_utf16(r))
            .or_else(|| self.marked.clone())
            .unwrap_or_else(|| self.selected.clone())
    }

    /// Replace text and collapse the caret after it. Ends any composition.
    pub fn replace(&mut self, range_utf16: Option<&Range<usize>>, new_text: &str) {
        let range = self.edit_range(range_utf16);
        self.text.replace_range(range.clone(), new_text);
        self.move_to(range.start + new_text.len());
        self.marked = None;
    }

    /// Replace text as an in-progress IME composition.
    pub fn replace_and_mark(
        &mut self,
        range_utf16: Option<&Range<usize>>,
        new_text: &str,
        selected_utf16: Option<&Range<usize>>,
    ) {
        let range = self.edit_range(range_utf16);
        self.text.replace_range(range.clone(), new_text);

        self.marked = (!new_text.is_empty()).then(|| range.start..range.start + new_text.len());

        let caret = range.start + new_text.len();
        self.selected = selected_utf16
            .map(|r| self.range_from_utf16(r))
            .map(|r| r.start + range.start..r.end + range.start)
            .unwrap_or(caret..caret);
        self.reversed = false;
    }

    /// Delete the selection, or one grapheme before the caret.
    pub fn delete_backward(&mut self) {
        if self.selected.is_empty() {
            self.select_to(self.previous_boundary(self.caret()));
        }
        self.replace(None, "");
    }

    /// Delete the selection, or one grapheme after the caret.
    pub fn delete_forward(&mut self) {
        if self.selected.is_empty() {
            self.select_to(self.next_boundary(self.caret()));
        }
        self.replace(None, "");
    }

    // -------------------------------------------------------------------------
    // UTF-16 conversion
    // -------------------------------------------------------------------------

    pub fn offset_to_utf16(&self, offset: usize) -> usize {
        self.text[..offset].encode_utf16().count()
    }

    pub fn offset_from_utf16(&self, offset_utf16: usize) -> usize {
        let mut utf8 = 0;
        let mut utf16 = 0;
        for ch in self.text.chars() {
            if utf16 >= offset_utf16 {
                break;
            }
            utf16 += ch.len_utf16();
            utf8 += ch.len_utf8();
        }
        utf8
    }

    pub fn range_to_utf16(&self, range: &Range<usize>) -> Range<usize> {
        self.offset_to_utf16(range.start)..self.offset_to_utf16(range.end)
    }

    pub fn range_from_utf16(&self, range: &Range<usize>) -> Range<usize> {
        self.offset_from_utf16(range.start)..self.offset_from_utf16(range.end)
    }
}

// =============================================================================
// SearchInput
// =============================================================================

/// Search box. Re-emits the inner editor's events.
pub struct SearchInput {
    editor: Entity<TextEditor>,
}

impl SearchInput {
    pub fn new(
        placeholder: impl Into<SharedString>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let editor = cx.new(|cx| TextEditor::new(placeholder.into(), window, cx));

        cx.subscribe(&editor, |_this, _editor, event: &SearchInputEvent, cx| {
            cx.emit(event.clone());
        })
        .detach();

        Self { editor }
    }

    pub fn text<'a>(&self, cx: &'a App) -> &'a str {
        self.editor.read(cx).buffer.text()
    }

    /// Replace the text without emitting `Changed`.
    pub fn set_text(&self, text: impl Into<String>, cx: &mut App) {
        self.editor.update(cx, |editor, cx| {
            editor.buffer.set_text(text);
            cx.notify();
        });
    }

    pub fn clear(&self, cx: &mut App) {
        self.set_text("", cx);
    }
}

impl EventEmitter<SearchInputEvent> for SearchInput {}

impl Focusable for SearchInput {
    fn focus_handle(&self, cx: &App) -> FocusHandle {
        self.editor.read(cx).focus_handle.clone()
    }
}

impl Render for SearchInput {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        self.editor.clone()
    }
}

// =============================================================================
// TextEditor
// =============================================================================

struct TextEditor {
    buffer: TextBuffer,
    placeholder: SharedString,
    focus_handle: FocusHandle,
    /// Shaped line and bounds from the last paint, for hit testing.
    last_layout: Option<ShapedLine>,
    last_bounds: Option<Bounds<Pixels>>,
    is_selecting: bool,
}

impl TextEditor {
    fn new(placeholder: SharedString, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let focus_handle = cx.focus_handle();

        cx.on_focus(&focus_handle, window, |this: &mut Self, _window, cx| {
            this.buffer.select_all();
            cx.notify();
        })
        .detach();

        Self {
            buffer: TextBuffer::default(),
            placeholder,
            focus_handle,
            last_layout: None,
            last_bounds: None,
            is_selecting: false,
        }
    }

    /// Run an edit and emit `Changed` if the text moved.
    fn edit(&mut self, cx: &mut Context<Self>, f: impl FnOnce(&mut TextBuffer)) {
        let before = self.buffer.text().to_string();
        f(&mut self.buffer);
        if self.buffer.text() != before {
            cx.emit(SearchInputEvent::Changed(self.buffer.text().to_string()));
        }
        cx.notify();
    }

    fn navigate(&mut self, cx: &mut Context<Self>, f: impl FnOnce(&mut TextBuffer)) {
        f(&mut self.buffer);
        cx.notify();
    }

    fn index_for_mouse_position(&self, position: Point<Pixels>) -> usize {
        if self.buffer.text().is_empty() {
            return 0;
        }
        let (Some(bounds), Some(line)) = (self.last_bounds.as_ref(), self.last_layout.as_ref())
        else {
            return 0;
        };

        if position.y < bounds.top() {
            0
        } else if position.y > bounds.bottom() {
            self.buffer.text().len()
        } else {
            line.closest_index_for_x(position.x - bounds.left())
        }
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    fn backspace(&mut self, _: &Backspace, _window: &mut Window, cx: &mut Context<Self>) {
        self.edit(cx, TextBuffer::delete_backward);
    }

    fn delete(&mut self, _: &Delete, _window: &mut Window, cx: &mut Context<Self>) {
        self.edit(cx, TextBuffer::delete_forward);
    }

    fn left(&mut self, _: &MoveLeft, _window: &mut Window, cx: &mut Context<Self>) {
        self.navigate(cx, |b| {
            let selection = b.selection();
            if selection.is_empty() {
                b.move_to(b.previous_boundary(b.caret()));
            } else {
                b.move_to(selection.start);
            }
        });
    }

    fn right(&mut self, _: &MoveRight, _window: &mut Window, cx: &mut Context<Self>) {
        self.navigate(cx, |b| {
            let selection = b.selection();
            if selection.is_empty() {
                b.move_to(b.next_boundary(b.caret()));
            } else {
                b.move_to(selection.end);
            }
        });
    }

    fn select_left(&mut self, _: &SelectLeft, _window: &mut Window, cx: &mut Context<Self>) {
        self.navigate(cx, |b| b.select_to(b.previous_boundary(b.caret())));
    }

    fn select_right(&mut self, _: &SelectRight, _window: &mut Window, cx: &mut Context<Self>) {
        self.navigate(cx, |b| b.select_to(b.next_boundary(b.caret())));
    }

    fn select_all(&mut self, _: &TextSelectAll, _window: &mut Window, cx: &mut Context<Self>) {
        self.navigate(cx, TextBuffer::select_all);
    }

    fn home(&mut self, _: &Home, _window: &mut Window, cx: &mut Context<Self>) {
        self.navigate(cx, |b| b.move_to(0));
    }

    fn end(&mut self, _: &End, _window: &mut Window, cx: &mut Context<Self>) {
        self.navigate(cx, |b| b.move_to(b.text().len()));
    }

    fn copy(&mut self, _: &Copy, _window: &mut Window, cx: &mut Context<Self>) {
        if let Some(selected) = self.buffer.selected_text() {
            cx.write_to_clipboard(ClipboardItem::new_string(selected.to_string()));
        }
    }

    fn paste(&mut self, _: &Paste, _window: &mut Window, cx: &mut Context<Self>) {
        if let Some(text) = cx.read_from_clipboard().and_then(|item| item.text()) {
            let text = text.replace(['\r', '\n'], " ");
            self.edit(cx, |b| b.replace(None, &text));
        }
    }

    fn cut(&mut self, _: &Cut, _window: &mut Window, cx: &mut Context<Self>) {
        if let Some(selected) = self.buffer.selected_text() {
            cx.write_to_clipboard(ClipboardItem::new_string(selected.to_string()));
            self.edit(cx, |b| b.replace(None, ""));
        }
    }

    fn submit(&mut self, _: &Submit, _window: &mut Window, cx: &mut Context<Self>) {
        cx.emit(SearchInputEvent::Submit);
    }

    // -------------------------------------------------------------------------
    // Mouse
    // -------------------------------------------------------------------------

    fn on_mouse_down(&mut self, event: &MouseDownEvent, _window: &mut Window, cx: &mut Context<Self>) {
        self.is_selecting = true;
        let index = self.index_for_mouse_position(event.position);
        if event.modifiers.shift {
            self.navigate(cx, |b| b.select_to(index));
        } else {
            self.navigate(cx, |b| b.move_to(index));
        }
    }

    fn on_mouse_up(&mut self, _: &MouseUpEvent, _window: &mut Window, _cx: &mut Context<Self>) {
        self.is_selecting = false;
    }

    fn on_mouse_move(&mut self, event: &MouseMoveEvent, _window: &mut Window, cx: &mut Context<Self>) {
        if self.is_selecting {
            let index = self.index_for_mouse_position(event.position);
            self.navigate(cx, |b| b.select_to(index));
        }
    }
}

impl EventEmitter<SearchInputEvent> for TextEditor {}

impl Focusable for TextEditor {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

// =============================================================================
// Platform Input (IME)
// =============================================================================

impl EntityInputHandler for TextEditor {
    fn text_for_range(
        &mut self,
        range_utf16: Range<usize>,
        actual_range: &mut Option<Range<usize>>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<String> {
        let range = self.buffer.range_from_utf16(&range_utf16);
        actual_range.replace(self.buffer.range_to_utf16(&range));
        self.buffer.text().get(range).map(str::to_string)
    }

    fn selected_text_range(
        &mut self,
        _ignore_disabled_input: bool,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<UTF16Selection> {
        Some(UTF16Selection {
            range: self.buffer.range_to_utf16(&self.buffer.selected),
            reversed: self.buffer.reversed,
        })
    }

    fn marked_text_range(&self, _window: &mut Window, _cx: &mut Context<Self>) -> Option<Range<usize>> {
        self.buffer
            .marked
            .as_ref()
            .map(|r| self.buffer.range_to_utf16(r))
    }

    fn unmark_text(&mut self, _window: &mut Window, _cx: &mut Context<Self>) {
        self.buffer.marked = None;
    }

    fn replace_text_in_range(
        &mut self,
        range_utf16: Option<Range<usize>>,
        new_text: &str,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.edit(cx, |b| b.replace(range_utf16.as_ref(), new_text));
    }

    fn replace_and_mark_text_in_range(
        &mut self,
        range_utf16: Option<Range<usize>>,
        new_text: &str,
        new_selected_range_utf16: Option<Range<usize>>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.edit(cx, |b| {
            b.replace_and_mark(
                range_utf16.as_ref(),
                new_text,
                new_selected_range_utf16.as_ref(),
            )
        });
    }

    fn bounds_for_range(
        &mut self,
        range_utf16: Range<usize>,
        element_bounds: Bounds<Pixels>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<Bounds<Pixels>> {
        let layout = self.last_layout.as_ref()?;
        let range = self.buffer.range_from_utf16(&range_utf16);

        Some(Bounds::from_corners(
            point(
                element_bounds.left() + layout.x_for_index(range.start),
                element_bounds.top(),
            ),
            point(
                element_bounds.left() + layout.x_for_index(range.end),
                element_bounds.bottom(),
            ),
        ))
    }

    fn character_index_for_point(
        &mut self,
        point: Point<Pixels>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<usize> {
        let bounds = self.last_bounds.as_ref()?;
        let layout = self.last_layout.as_ref()?;

        let local = bounds.localize(&point)?;
        let index = layout.index_for_x(local.x)?;
        Some(self.buffer.offset_to_utf16(index))
    }
}

impl Render for TextEditor {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let is_focused = self.focus_handle.is_focused(window);

        div()
            .id("search-input")
            .key_context("SearchInput")
            .track_focus(&self.focus_handle)
            .cursor(CursorStyle::IBeam)
            .on_action(cx.listener(Self::backspace))
            .on_action(cx.listener(Self::delete))
            .on_action(cx.listener(Self::left))
            .on_action(cx.listener(Self::right))
            .on_action(cx.listener(Self::select_left))
            .on_action(cx.listener(Self::select_right))
            .on_action(cx.listener(Self::select_all))
            .on_action(cx.listener(Self::home))
            .on_action(cx.listener(Self::end))
            .on_action(cx.listener(Self::copy))
            .on_action(cx.listener(Self::paste))
            .on_action(cx.listener(Self::cut))
            .on_action(cx.listener(Self::submit))
            .on_mouse_down(MouseButton::Left, cx.listener(Self::on_mouse_down))
            .on_mouse_up(MouseButton::Left, cx.listener(Self::on_mouse_up))
            .on_mouse_up_out(MouseButton::Left, cx.listener(Self::on_mouse_up))
            .on_mouse_move(cx.listener(Self::on_mouse_move))
            .w_full()
            .px_3()
            .py_2()
            .bg(theme.surface)
            .rounded(theme.radius)
            .border_1()
            .border_color(theme.border)
            .when(is_focused, |this| this.border_color(theme.border_focused))
            .child(TextLine {
                editor: cx.entity().clone(),
            })
    }
}

// =============================================================================
// TextLine Element
// =============================================================================

/// Paints the text, caret and selection, and registers the IME handler.
struct TextLine {
    editor: Entity<TextEditor>,
}

struct TextLinePrepaint {
    line: Option<ShapedLine>,
    caret: Option<PaintQuad>,
    selection: Option<PaintQuad>,
}

impl IntoElement for TextLine {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

/// Runs for `len` bytes, underlining the composition range.
fn text_runs(len: usize, marked: Option<&Range<usize>>, base: TextRun, color: Hsla) -> Vec<TextRun> {
    let Some(marked) = marked else {
        return vec![TextRun { len, ..base }];
    };

    [
        TextRun {
            len: marked.start,
            ..base.clone()
        },
        TextRun {
            len: marked.end - marked.start,
            underline: Some(UnderlineStyle {
                color: Some(color),
                thickness: px(1.0),
                wavy: false,
            }),
            ..base.clone()
        },
        TextRun {
            len: len.saturating_sub(marked.end),
            ..base
        },
    ]
    .into_iter()
    .filter(|run| run.len > 0)
    .collect()
}

impl Element for TextLine {
    type RequestLayoutState = ();
    type PrepaintState = TextLinePrepaint;

    fn id(&self) -> Option<ElementId> {
        None
    }

    fn source_location(&self) -> Option<&'static core::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        window: &mut Window,
        cx: &mut App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        let mut style = Style::default();
        style.size.width = relative(1.).into();
        style.size.height = window.line_height().into();
        (window.request_layout(style, [], cx), ())
    }

    fn prepaint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        window: &mut Window,
        cx: &mut App,
    ) -> Self::PrepaintState {
        let editor = self.editor.read(cx);
        let theme = cx.theme();
        let buffer = &editor.buffer;
        let is_empty = buffer.text().is_empty();
        let is_focused = editor.focus_handle.is_focused(window);
        let style = window.text_style();

        let (display_text, color) = if is_empty {
            (editor.placeholder.clone(), theme.text_placeholder)
        } else {
            (SharedString::from(buffer.text().to_string()), theme.text)
        };

        let base = TextRun {
            len: display_text.len(),
            font: style.font(),
            color,
            background_color: None,
            underline: None,
            strikethrough: None,
        };
        let marked = if is_empty { None } else { buffer.marked.as_ref() };
        let runs = text_runs(display_text.len(), marked, base, color);

        let font_size = style.font_size.to_pixels(window.rem_size());
        let line = window
            .text_system()
            .shape_line(display_text, font_size, &runs, None);

        let selection = buffer.selection();
        let caret_at = |x: Pixels| {
            fill(
                Bounds::new(point(bounds.left() + x, bounds.top()), size(px(2.), bounds.size.height)),
                theme.accent,
            )
        };

        let (selection_quad, caret_quad) = if !is_empty && !selection.is_empty() {
            let quad = fill(
                Bounds::from_corners(
                    point(bounds.left() + line.x_for_index(selection.start), bounds.top()),
                    point(bounds.left() + line.x_for_index(selection.end), bounds.bottom()),
                ),
                theme.selection,
            );
            (Some(quad), None)
        } else if is_focused {
            let x = if is_empty { px(0.) } else { line.x_for_index(buffer.caret()) };
            (None, Some(caret_at(x)))
        } else {
            (None, None)
        };

        TextLinePrepaint {
            line: Some(line),
            caret: caret_quad,
            selection: selection_quad,
        }
    }

    fn paint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        prepaint: &mut Self::PrepaintState,
        window: &mut Window,
        cx: &mut App,
    ) {
        let focus_handle = self.editor.read(cx).focus_handle.clone();
        window.handle_input(
            &focus_handle,
            ElementInputHandler::new(bounds, self.editor.clone()),
            cx,
        );

        if let Some(selection) = prepaint.selection.take() {
            window.paint_quad(selection);
        }

        if let Some(line) = prepaint.line.take() {
            let _ = line.paint(bounds.origin, window.line_height(), window, cx);
            self.editor.update(cx, |editor, _cx| {
                editor.last_layout = Some(line);
                editor.last_bounds = Some(bounds);
            });
        }

        if let Some(caret) = prepaint.caret.take() {
            window.paint_quad(caret);
        }
    }
}
