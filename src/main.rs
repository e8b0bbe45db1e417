use ancillary_editor::app::App;
use ancillary_editor::config::{default_webview_data_dir, APP_TITLE};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let webview_data_dir =
        default_webview_data_dir().expect("should resolve and create WebView2 data directory");
    tracing::info!(data_dir = %webview_data_dir.display(), "starting {APP_TITLE}");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title(APP_TITLE))
                .with_data_directory(webview_data_dir),
        )
        .launch(App);
}
