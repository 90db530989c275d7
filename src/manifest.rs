//! The MkDocs manifest (`mkdocs.yml`) as an ordered, mostly opaque YAML mapping.
//!
//! Only `docs_dir`, `edit_uri`, `extra_javascript`, `extra_css` and `site_url` are interpreted;
//! every other key round-trips untouched. Python tags such as `!!python/name:pkg.func` or
//! `!!python/object/apply:os.getenv ["NAME"]` are not representable in the YAML data model, so
//! each one (with its inline argument) is swapped for a plain hex placeholder before parsing and
//! restored verbatim after serializing.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};

use crate::errors::BuildError;

pub const FILE_NAME: &str = "mkdocs.yml";

/// Placeholder prefix standing in for a python tag while the document is parsed.
pub const TEMP_PREFIX: &str = "MULTIDOC_TEMP_";

/// https://www.mkdocs.org/user-guide/configuration/#docs_dir
pub const DEFAULT_DOCS_DIR: &str = "docs";

const KEY_DOCS_DIR: &str = "docs_dir";
const KEY_EDIT_URI: &str = "edit_uri";
const KEY_EXTRA_JS: &str = "extra_javascript";
const KEY_EXTRA_CSS: &str = "extra_css";
const KEY_SITE_URL: &str = "site_url";

// Tag, then an optional inline flow sequence or quoted scalar argument on the same line.
static PYTHON_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"!!python/[^\s\[\]{},]+(?:[ \t]+(?:\[[^\]\n]*\]|'[^'\n]*'|"[^"\n]*"))?"#)
        .expect("valid python tag regex")
});

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{}([0-9a-f]+)", regex::escape(TEMP_PREFIX)))
        .expect("valid placeholder regex")
});

/// Replace python tags with plain placeholders.
pub fn escape_python_tags(text: &str) -> String {
    PYTHON_TAG_RE
        .replace_all(text, |caps: &Captures| {
            let hex: String = caps[0].bytes().map(|b| format!("{b:02x}")).collect();
            format!("{TEMP_PREFIX}{hex}")
        })
        .into_owned()
}

/// Inverse of [`escape_python_tags`]. Placeholders that do not decode are left alone.
pub fn unescape_python_tags(text: &str) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures| {
            decode_hex(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_hex(hex: &str) -> Option<String> {
    if hex.len() % 2 != 0 {
        return None;
    }
    let bytes = (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    doc: Mapping,
}

impl Manifest {
    /// Parse manifest text. An empty document is an empty mapping; any other non-mapping is an error.
    pub fn parse(text: &str) -> Result<Manifest, BuildError> {
        let escaped = escape_python_tags(text);
        let value: Value = serde_yaml::from_str(&escaped)
            .map_err(|e| BuildError::parse("MkDocs manifest", e))?;
        match value {
            Value::Null => Ok(Manifest::default()),
            Value::Mapping(doc) => Ok(Manifest { doc }),
            other => Err(BuildError::parse(
                "MkDocs manifest",
                format!("expected a mapping at the top level, found {}", kind(&other)),
            )),
        }
    }

    pub fn read(path: &Path) -> Result<Manifest, BuildError> {
        let raw = crate::util::fs::read_file(path)?;
        Manifest::parse(&String::from_utf8_lossy(&raw)).map_err(|e| match e {
            BuildError::Parse { what, detail } => BuildError::Parse {
                what: format!("{what} {}", path.display()),
                detail,
            },
            other => other,
        })
    }

    pub fn to_yaml(&self) -> Result<String, BuildError> {
        let out = serde_yaml::to_string(&self.doc)
            .map_err(|e| BuildError::parse("MkDocs manifest (serialize)", e))?;
        Ok(unescape_python_tags(&out))
    }

    pub fn write(&self, path: &Path) -> Result<(), BuildError> {
        crate::util::fs::write_file(path, self.to_yaml()?.as_bytes())
    }

    pub fn mapping(&self) -> &Mapping {
        &self.doc
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.doc.get(key).and_then(Value::as_str)
    }

    /// `docs_dir` if set, else the MkDocs default.
    pub fn docs_dir_attribute(&self) -> &str {
        self.get_str(KEY_DOCS_DIR).unwrap_or(DEFAULT_DOCS_DIR)
    }

    /// Absolute content directory: `docs_dir` resolved against the manifest location.
    pub fn docs_dir(&self, manifest_path: &Path) -> PathBuf {
        manifest_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(self.docs_dir_attribute())
    }

    pub fn edit_uri(&self) -> Option<&str> {
        self.get_str(KEY_EDIT_URI)
    }

    pub fn site_url(&self) -> Option<&str> {
        self.get_str(KEY_SITE_URL)
    }

    pub fn extra_javascript(&self) -> Vec<String> {
        string_list(self.doc.get(KEY_EXTRA_JS))
    }

    pub fn extra_css(&self) -> Vec<String> {
        string_list(self.doc.get(KEY_EXTRA_CSS))
    }

    /// Append to `extra_javascript` (list semantics: duplicates are kept).
    pub fn append_extra_js(&mut self, file: &str) {
        self.append_to_list(KEY_EXTRA_JS, file);
    }

    /// Append to `extra_css` (list semantics: duplicates are kept).
    pub fn append_extra_css(&mut self, file: &str) {
        self.append_to_list(KEY_EXTRA_CSS, file);
    }

    fn append_to_list(&mut self, key: &str, file: &str) {
        if file.is_empty() {
            return;
        }
        let entry = Value::String(file.to_string());
        match self.doc.get_mut(key) {
            Some(Value::Sequence(seq)) => seq.push(entry),
            Some(slot) => {
                // Replace in place so the key keeps its position in the document.
                let previous = std::mem::replace(slot, Value::Null);
                *slot = match previous {
                    Value::String(s) => Value::Sequence(vec![Value::String(s), entry]),
                    _ => Value::Sequence(vec![entry]),
                };
            }
            None => {
                self.doc.insert(Value::from(key), Value::Sequence(vec![entry]));
            }
        }
    }

    /// Set `edit_uri` to `edit/<version>/<docs_dir_base>/<docs_dir>/`.
    ///
    /// An existing non-empty value is kept unless `override_existing`. An empty version means `master`.
    pub fn add_edit_uri(&mut self, version: &str, docs_dir_base: &str, override_existing: bool) {
        let has_value = self.edit_uri().map(|s| !s.is_empty()).unwrap_or(false);
        if has_value && !override_existing {
            return;
        }
        let v = if version.is_empty() { "master" } else { version };
        let docs_dir = self.docs_dir_attribute().to_string();
        let uri = format!("{}/", join_url_path(&["edit", v, docs_dir_base, &docs_dir]));
        self.doc.insert(Value::from(KEY_EDIT_URI), Value::String(uri));
    }

    /// Blank `site_url` so a version sub-site does not claim the canonical root.
    pub fn reset_site_url(&mut self) {
        self.doc
            .insert(Value::from(KEY_SITE_URL), Value::String(String::new()));
    }
}

/// Join URL path segments, skipping empty ones and collapsing `.` and duplicate slashes.
fn join_url_path(segments: &[&str]) -> String {
    segments
        .iter()
        .flat_map(|s| s.split('/'))
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/")
}

fn string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Sequence(seq)) => seq
            .iter()
            .filter_map(|x| x.as_str().map(|s| s.to_string()))
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
