//! Rendering of the version-switcher script and stylesheet.

use std::path::Path;

use handlebars::Handlebars;
use serde_json::{json, Value};
use tracing::debug;

use super::versions::OptionVersion;
use crate::errors::BuildError;

pub const MENU_JS_FILE_NAME: &str = "multidoc-menu.js";
pub const MENU_CSS_FILE_NAME: &str = "multidoc-menu.css";

/// Model exposed to menu templates: `latest`, `current` and the ordered `versions`.
pub fn menu_model(latest: &str, current: &str, versions: &[OptionVersion]) -> Value {
    json!({
        "latest": latest,
        "current": current,
        "versions": versions,
    })
}

/// Evaluate a menu template against `model`. Output is not HTML-escaped.
pub fn render_template(template: &str, model: &Value) -> Result<String, BuildError> {
    let mut hb = Handlebars::new();
    hb.register_escape_fn(handlebars::no_escape);
    hb.set_strict_mode(false);
    hb.render_template(template, model)
        .map_err(|e| BuildError::Template(e.to_string()))
}

/// Render `template` into `<docs_dir>/theme/<kind>/<file_name>`.
///
/// Returns the path to reference from the manifest (relative to `docs_dir`), or `None` when
/// there is no template for this asset.
pub fn write_asset(
    docs_dir: &Path,
    kind: &str,
    file_name: &str,
    template: &[u8],
    model: &Value,
) -> Result<Option<String>, BuildError> {
    if template.is_empty() {
        return Ok(None);
    }
    let rendered = render_template(&String::from_utf8_lossy(template), model)?;
    let target = docs_dir.join("theme").join(kind).join(file_name);
    crate::util::fs::write_file(&target, rendered.as_bytes())?;
    debug!("menu: wrote {}", target.display());
    Ok(Some(format!("theme/{kind}/{file_name}")))
}
