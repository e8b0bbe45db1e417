use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::{ProjectDirs, UserDirs};

pub const APP_TITLE: &str = "GMP Ancillary Materials for ACTRIS";
pub const DOWNLOAD_BASE_NAME: &str = "GMP_ancillary_materials";
pub const DOWNLOAD_EXTENSION: &str = "xlsx";
pub const UPLOAD_EXTENSIONS: &[&str] = &["xlsx"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Also write every save to `mirror_dir/<uploaded file name>`.
    pub mirror_upload: bool,
    pub mirror_dir: PathBuf,
    /// Starting directory of the download dialog.
    pub download_dir: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            mirror_upload: false,
            mirror_dir: PathBuf::from("."),
            download_dir: PathBuf::from("."),
        }
    }
}

impl EditorConfig {
    pub fn desktop_defaults() -> Result<Self> {
        let mirror_dir =
            std::env::current_dir().context("failed to resolve working directory")?;
        let download_dir = UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| mirror_dir.clone());

        Ok(Self {
            mirror_upload: false,
            mirror_dir,
            download_dir,
        })
    }

    pub fn with_mirror(mut self, mirror_dir: impl Into<PathBuf>) -> Self {
        self.mirror_upload = true;
        self.mirror_dir = mirror_dir.into();
        self
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "hellhbbd", "ancillary-editor")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}
