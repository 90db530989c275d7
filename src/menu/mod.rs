//! Version switcher: template loading, rendering and manifest wiring.

pub mod render;
pub mod versions;

use tracing::info;

use crate::errors::BuildError;
use crate::manifest::{self, Manifest};
use crate::types::VersionsInfo;
use crate::util::download::read_local_or_remote;

pub use render::{MENU_CSS_FILE_NAME, MENU_JS_FILE_NAME};
pub use versions::{build_versions, OptionVersion, VersionState};

/// Menu template references. For each asset a local file takes precedence over a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFiles {
    pub js_url: Option<String>,
    pub js_file: Option<String>,
    pub css_url: Option<String>,
    pub css_file: Option<String>,
}

impl MenuFiles {
    pub fn has_js(&self) -> bool {
        non_empty(&self.js_file).is_some() || non_empty(&self.js_url).is_some()
    }

    pub fn has_css(&self) -> bool {
        non_empty(&self.css_file).is_some() || non_empty(&self.css_url).is_some()
    }
}

/// Raw template content, fetched once per run. Empty means "no such asset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuContent {
    pub js: Vec<u8>,
    pub css: Vec<u8>,
}

impl MenuContent {
    pub fn is_empty(&self) -> bool {
        self.js.is_empty() && self.css.is_empty()
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Load the configured menu templates.
pub fn get_template_content(files: &MenuFiles) -> Result<MenuContent, BuildError> {
    let mut content = MenuContent::default();
    if files.has_js() {
        content.js = menu_file_content(non_empty(&files.js_file), non_empty(&files.js_url))?;
    }
    if files.has_css() {
        content.css = menu_file_content(non_empty(&files.css_file), non_empty(&files.css_url))?;
    }
    Ok(content)
}

fn menu_file_content(file: Option<&str>, url: Option<&str>) -> Result<Vec<u8>, BuildError> {
    if let Some(f) = file {
        return crate::util::fs::read_file(std::path::Path::new(f));
    }
    match url {
        Some(u) => read_local_or_remote(u),
        None => Ok(Vec::new()),
    }
}

/// Request to set `edit_uri` in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditUri {
    pub version: String,
    /// Documentation root relative to the checkout (`""` or `docs`).
    pub docs_dir_base: String,
    pub override_existing: bool,
}

/// Render the menu assets of one version and wire them into its manifest.
///
/// The manifest is read from the version's documentation root, asset paths are appended to
/// `extra_javascript`/`extra_css`, `edit_uri` is set when requested and `site_url` is blanked.
pub fn build(
    versions_info: &VersionsInfo,
    branches: &[String],
    content: &MenuContent,
    edit_uri: Option<&EditUri>,
) -> Result<(), BuildError> {
    let manifest_path = versions_info.current_path.join(manifest::FILE_NAME);
    let mut manif = Manifest::read(&manifest_path)?;

    let docs_dir = manif.docs_dir(&manifest_path);
    info!("using docs_dir from manifest: {}", docs_dir.display());

    let mut js_path = None;
    let mut css_path = None;
    if !content.is_empty() {
        let versions = build_versions(
            &versions_info.current,
            branches,
            &versions_info.latest,
            &versions_info.experimental,
        )?;
        let model = render::menu_model(&versions_info.latest, &versions_info.current, &versions);
        js_path = render::write_asset(&docs_dir, "js", MENU_JS_FILE_NAME, &content.js, &model)?;
        css_path = render::write_asset(&docs_dir, "css", MENU_CSS_FILE_NAME, &content.css, &model)?;
    }

    if let Some(p) = js_path.as_deref() {
        manif.append_extra_js(p);
    }
    if let Some(p) = css_path.as_deref() {
        manif.append_extra_css(p);
    }
    if let Some(e) = edit_uri {
        manif.add_edit_uri(&e.version, &e.docs_dir_base, e.override_existing);
    }
    manif.reset_site_url();

    manif.write(&manifest_path)
}
