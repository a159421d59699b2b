//! Picker panel: search box, close button and thumbnail grid.
//!
//! The panel owns no search state. It forwards input to the `PickerSession`
//! and re-renders from the snapshots the session publishes.

use std::rc::Rc;

use gifpick_core::PickerConfig;
use gifpick_engine::{EscapeOutcome, PickerSession, PickerState, PickerView, Tile, ViewStatus};
use gpui::{
    div, img, prelude::*, px, relative, AnyElement, App, AsyncApp, Context, Entity, FocusHandle,
    Focusable, IntoElement, ObjectFit, ParentElement, Render, SharedString, Styled, StyledImage,
    WeakEntity, Window,
};
use gpui_component::{v_virtual_list, VirtualListScrollHandle};

use crate::actions::{CursorDown, CursorUp, Dismiss, NextTile, PrevTile};
use crate::theme::{Theme, ThemeExt};
use crate::views::grid::{row_sizes, rows, scroll_to_cursor};
use crate::views::{SearchInput, SearchInputEvent};

pub struct PickerPanel {
    session: PickerSession,
    view: PickerView,
    visible: bool,
    modal: bool,
    search_input: Entity<SearchInput>,
    focus_handle: FocusHandle,
    scroll_handle: VirtualListScrollHandle,
}

impl PickerPanel {
    /// Create the panel and mount the session (loads trending).
    pub fn new(
        session: PickerSession,
        config: &PickerConfig,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let focus_handle = cx.focus_handle();
        let placeholder = SharedString::from(config.placeholder.clone());
        let search_input = cx.new(|cx| SearchInput::new(placeholder, window, cx));

        cx.subscribe(&search_input, Self::on_search_input_event)
            .detach();

        // Snapshots arrive from tokio worker threads; apply them on the foreground
        let mut state_rx = session.subscribe();
        cx.spawn(async move |this: WeakEntity<Self>, cx: &mut AsyncApp| {
            while state_rx.changed().await.is_ok() {
                let state = state_rx.borrow_and_update().clone();
                if this
                    .update(cx, |this, cx| this.on_state_changed(&state, cx))
                    .is_err()
                {
                    break;
                }
            }
        })
        .detach();

        search_input.update(cx, |input, cx| {
            let handle = input.focus_handle(cx);
            window.focus(&handle, cx);
        });

        let view = PickerView::build(&session.snapshot(), config.visible, config.modal);
        session.mount();

        Self {
            session,
            view,
            visible: config.visible,
            modal: config.modal,
            search_input,
            focus_handle,
            scroll_handle: VirtualListScrollHandle::new(),
        }
    }

    fn on_state_changed(&mut self, state: &PickerState, cx: &mut Context<Self>) {
        self.view = PickerView::build(state, self.visible, self.modal);
        if !self.view.tiles.is_empty() {
            scroll_to_cursor(&self.scroll_handle, state.cursor(), cx.theme().columns);
        }
        cx.notify();
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    fn on_search_input_event(
        &mut self,
        _search_input: Entity<SearchInput>,
        event: &SearchInputEvent,
        _cx: &mut Context<Self>,
    ) {
        match event {
            SearchInputEvent::Changed(text) => {
                self.session.on_search_change(text);
            }
            SearchInputEvent::Submit => {
                self.session.submit();
            }
        }
    }

    fn on_cursor_up(&mut self, _: &CursorUp, _window: &mut Window, cx: &mut Context<Self>) {
        let columns = cx.theme().columns as isize;
        self.session.move_cursor(-columns);
    }

    fn on_cursor_down(&mut self, _: &CursorDown, _window: &mut Window, cx: &mut Context<Self>) {
        let columns = cx.theme().columns as isize;
        self.session.move_cursor(columns);
    }

    fn on_next_tile(&mut self, _: &NextTile, _window: &mut Window, _cx: &mut Context<Self>) {
        self.session.move_cursor(1);
    }

    fn on_prev_tile(&mut self, _: &PrevTile, _window: &mut Window, _cx: &mut Context<Self>) {
        self.session.move_cursor(-1);
    }

    fn on_dismiss(&mut self, _: &Dismiss, _window: &mut Window, cx: &mut Context<Self>) {
        match self.session.on_escape() {
            EscapeOutcome::Cleared { .. } => {
                self.search_input.update(cx, |input, cx| input.clear(cx));
            }
            EscapeOutcome::CloseRequested => tracing::debug!("close requested via escape"),
            EscapeOutcome::Ignored => {}
        }
    }


    // -------------------------------------------------------------------------
    // Render Helpers
    // -------------------------------------------------------------------------

    fn render_tile(tile: &Tile, theme: &Theme) -> gpui::Stateful<gpui::Div> {
        let height = theme.tile_height(tile.size);

        div()
            .id(("gif-tile", tile.index))
            .w(theme.tile_width)
            .h(height)
            .flex_shrink_0()
            .rounded(theme.radius)
            .overflow_hidden()
            .bg(theme.surface)
            .cursor_pointer()
            .border_2()
            .border_color(gpui::transparent_black())
            .when(tile.is_cursor, |this| this.border_color(theme.cursor))
            .hover(|style| style.bg(theme.surface_hover))
            .child(
                img(SharedString::from(tile.src.clone()))
                    .size_full()
                    .object_fit(ObjectFit::Cover),
            )
    }

    fn render_status(&self, theme: &Theme) -> AnyElement {
        let message = match &self.view.status {
            ViewStatus::Loading => Some(("Searching…".to_string(), theme.text_muted)),
            ViewStatus::Error(message) => Some((message.clone(), theme.error)),
            _ => self
                .view
                .message()
                .map(|message| (message.to_string(), theme.text_muted)),
        };

        div()
            .id("gif-status")
            .size_full()
            .flex()
            .items_center()
            .justify_center()
            .when_some(message, |this, (text, color)| {
                this.child(div().text_color(color).text_sm().child(text))
            })
            .into_any_element()
    }

    fn render_grid(&self, cx: &mut Context<Self>) -> AnyElement {
        let theme = cx.theme().clone();
        let sizes = Rc::new(row_sizes(&self.view.tiles, &theme));

        v_virtual_list(
            cx.entity().clone(),
            "gif-grid",
            sizes,
            |this, range, _window, cx| {
                let theme = cx.theme().clone();
                let all_rows = rows(this.view.tiles.len(), theme.columns);

                let mut elements = Vec::with_capacity(range.len());
                for row_ix in range {
                    let Some(tiles) = all_rows.get(row_ix).cloned() else {
                        elements.push(div().into_any_element());
                        continue;
                    };

                    let mut row = div().flex().gap(theme.tile_gap).items_start();
                    for tile in &this.view.tiles[tiles] {
                        // Bind the item drawn in this frame, not whatever sits at
                        // the index when the click lands.
                        let Some(item) = this.view.item(tile.index).cloned() else {
                            continue;
                        };
                        let tile = Self::render_tile(tile, &theme).on_click(cx.listener(
                            move |this: &mut Self, _event: &gpui::ClickEvent, _window, _cx| {
                                this.session.on_select(&item);
                            },
                        ));
                        row = row.child(tile);
                    }
                    elements.push(row.into_any_element());
                }
                elements
            },
        )
        .track_scroll(&self.scroll_handle)
        .w_full()
        .h_full()
        .into_any_element()
    }

    fn render_header(&self, theme: &Theme, cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .w_full()
            .flex()
            .items_center()
            .gap_2()
            .child(div().flex_1().child(self.search_input.clone()))
            .child(
                div()
                    .id("close-picker")
                    .px_2()
                    .text_color(theme.text_muted)
                    .text_xl()
                    .cursor_pointer()
                    .hover(|style| style.text_color(theme.text))
                    .child("×")
                    .on_click(cx.listener(|this, _event: &gpui::ClickEvent, _window, _cx| {
                        this.session.request_close();
                    })),
            )
    }
}

impl Focusable for PickerPanel {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for PickerPanel {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if !self.view.visible {
            return div().id("gif-picker-hidden").into_any_element();
        }

        let theme = cx.theme().clone();
        let body = match self.view.status {
            ViewStatus::Results => self.render_grid(cx),
            _ => self.render_status(&theme),
        };

        let panel = div()
            .id("gif-picker")
            .key_context("Picker")
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(Self::on_cursor_up))
            .on_action(cx.listener(Self::on_cursor_down))
            .on_action(cx.listener(Self::on_next_tile))
            .on_action(cx.listener(Self::on_prev_tile))
            .on_action(cx.listener(Self::on_dismiss))
            .flex()
            .flex_col()
            .gap_2()
            .p_3()
            .bg(theme.background)
            .rounded(theme.radius)
            .border_1()
            .border_color(theme.border)
            .overflow_hidden()
            .font_family(theme.font_family.clone())
            .text_size(theme.font_size)
            .child(self.render_header(&theme, cx))
            .child(div().w_full().flex_1().overflow_hidden().child(body));

        if self.modal {
            div()
                .id("gif-picker-backdrop")
                .size_full()
                .bg(theme.backdrop)
                .flex()
                .items_center()
                .justify_center()
                .child(panel.w(theme.grid_width() + px(24.)).h(relative(0.8)))
                .into_any_element()
        } else {
            panel.size_full().into_any_element()
        }
    }
}
