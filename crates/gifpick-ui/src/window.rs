//! Picker window and application entry point.

use std::sync::Arc;

use gifpick_core::PickerConfig;
use gifpick_engine::PickerSession;
use gpui::{
    px, size, App, AppContext, AsyncApp, Bounds, Task, TitlebarOptions, WindowBackgroundAppearance,
    WindowBounds, WindowHandle, WindowKind, WindowOptions,
};
use reqwest_client::ReqwestClient;
use tokio::sync::mpsc::Receiver;

use crate::keymap::apply_keybindings;
use crate::theme::Theme;
use crate::views::PickerPanel;

pub const DEFAULT_WIDTH: f32 = 660.0;
pub const DEFAULT_HEIGHT: f32 = 560.0;

/// User agent for thumbnail downloads.
const USER_AGENT: &str = concat!("gifpick/", env!("CARGO_PKG_VERSION"));

/// Window options for the layout. Bounds are filled in once `App` is available.
fn create_window_options(modal: bool) -> WindowOptions {
    if modal {
        WindowOptions {
            titlebar: None,
            focus: true,
            show: true,
            kind: WindowKind::PopUp,
            is_movable: false,
            window_background: WindowBackgroundAppearance::Transparent,
            ..Default::default()
        }
    } else {
        WindowOptions {
            titlebar: Some(TitlebarOptions {
                title: Some("gifpick".into()),
                ..Default::default()
            }),
            focus: true,
            show: true,
            kind: WindowKind::Normal,
            is_movable: true,
            window_background: WindowBackgroundAppearance::Opaque,
            ..Default::default()
        }
    }
}

// =============================================================================
// Picker Window
// =============================================================================

/// Owns the picker window and the task that waits for close requests.
///
/// Close requests come from the session's close callback, which may run on
/// any thread, so they travel over a channel:
///
/// ```text
/// [close callback] ---(channel)---> [GPUI async task] ---> cx.quit()
/// ```
pub struct PickerWindow {
    window_handle: WindowHandle<PickerPanel>,
    _close_task: Task<()>,
}

impl PickerWindow {
    /// Open the window. Returns `None` if the platform refused.
    pub fn new(
        config: &PickerConfig,
        session: PickerSession,
        close_rx: Receiver<()>,
        cx: &mut App,
    ) -> Option<Self> {
        let window_size = size(px(DEFAULT_WIDTH), px(DEFAULT_HEIGHT));
        let bounds = Bounds::centered(None, window_size, cx);
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            ..create_window_options(config.modal)
        };

        let window_handle = cx
            .open_window(options, |window, cx| {
                cx.new(|cx| PickerPanel::new(session, config, window, cx))
            })
            .ok()?;

        let close_task = cx.spawn(async move |cx: &mut AsyncApp| {
            Self::wait_for_close(close_rx, cx).await;
        });

        Some(Self {
            window_handle,
            _close_task: close_task,
        })
    }

    async fn wait_for_close(mut rx: Receiver<()>, cx: &mut AsyncApp) {
        if rx.recv().await.is_some() {
            tracing::info!("Picker closed");
            let _ = cx.update(|app| app.quit());
        }
    }

    pub fn handle(&self) -> WindowHandle<PickerPanel> {
        self.window_handle
    }
}

impl gpui::Global for PickerWindow {}

// =============================================================================
// App Entry Point
// =============================================================================

/// Run the picker until it is closed.
///
/// `close_rx` should receive a message when the session's close callback
/// fires.
pub fn run_picker(config: PickerConfig, session: PickerSession, close_rx: Receiver<()>) {
    let mut app = gpui::Application::new();
    match ReqwestClient::user_agent(USER_AGENT) {
        Ok(client) => app = app.with_http_client(Arc::new(client)),
        Err(e) => tracing::warn!("No HTTP client for thumbnails: {}", e),
    }

    app.run(move |cx| {
        gpui_component::init(cx);
        cx.set_global(Theme::default());
        apply_keybindings(&config.keys, cx);

        let Some(window) = PickerWindow::new(&config, session, close_rx, cx) else {
            tracing::error!("Failed to open picker window");
            cx.quit();
            return;
        };

        cx.activate(true);
        cx.set_global(window);
    });
}
