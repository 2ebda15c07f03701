//! The discovery engine: strategy-ordered search over a document's script
//! tags, context tailoring, and the directory ascension walk.
//!
//! Every strategy is an async operation returning `Option`; strategies are
//! chained strictly sequentially because only a failure may trigger the next
//! attempt. No state is shared between concurrent discoveries: each request
//! builds its own chain of intermediate values.

use crate::config::AmdConfig;
use crate::config::ConfigValue;
use crate::config::RawConfig;
use crate::fs::FileSystem;
use crate::fs::LocalFs;
use crate::html::script_tags;
use crate::html::ScriptTag;
use crate::locate::config_from_source;
use crate::path;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Recognized HTML file extensions. Deliberately case-sensitive: only the
/// all-lower and all-upper spellings qualify.
const HTML_EXTENSIONS: &[&str] = &[".html", ".htm", ".HTML", ".HTM"];

fn is_html_name(name: &str) -> bool {
  HTML_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Whether a `src` path names an AMD loader script. A suffix test, not a
/// path-segment test: builds commonly rename the loader to things like
/// `jquery-require.js` or `mycurl.js`, which still count.
fn is_loader_path(src: &str) -> bool {
  src.ends_with("curl.js") || src.ends_with("require.js")
}

/// Rewrites a just-extracted configuration so its `baseDir` is resolved
/// against the file the configuration was found in. An explicit `baseDir` or
/// `baseUrl` is taken as relative to that file's directory; with neither set,
/// the configuration is assumed to govern modules alongside the file itself.
fn tailor(file: &Path, raw: RawConfig) -> AmdConfig {
  let file_dir = file.parent().unwrap_or(Path::new("/"));
  let entry_str = |key: &str| {
    raw
      .entries
      .get(key)
      .and_then(ConfigValue::as_str)
      .map(str::to_owned)
  };
  let base = raw
    .base_dir
    .clone()
    .or_else(|| entry_str("baseDir"))
    .or_else(|| entry_str("baseUrl"));
  let base_dir = match base {
    Some(base) => path::resolve(file_dir, &base),
    None => path::normalize(file_dir),
  };
  AmdConfig {
    base_dir,
    entries: raw.entries,
  }
}

/// Discovers AMD loader configuration without executing any code.
///
/// The file system is injected so editors and tests can serve virtual trees;
/// [`discover_config`] is the convenience entry point over the local disk.
pub struct ConfigFinder {
  fs: Arc<dyn FileSystem>,
}

impl ConfigFinder {
  pub fn new(fs: Arc<dyn FileSystem>) -> ConfigFinder {
    ConfigFinder { fs }
  }

  /// Finds the configuration governing `context` (a file or directory path):
  /// an upward walk from the containing directory toward the filesystem
  /// root, trying every HTML file at each level and stopping at the first
  /// that yields configuration.
  ///
  /// All failure modes resolve to `None`; nothing here errors or panics.
  pub async fn discover(&self, context: &Path) -> Option<AmdConfig> {
    let mut current = context.to_path_buf();
    loop {
      let dir = current.parent()?.to_path_buf();
      debug!(dir = %dir.display(), "searching directory for loader configuration");
      match self.fs.list_files(&dir).await {
        Ok(names) => {
          for name in names {
            if !is_html_name(&name) {
              continue;
            }
            let file = dir.join(&name);
            if let Some(config) = self.config_from_html_file(&file).await {
              debug!(file = %file.display(), "loader configuration found");
              return Some(config);
            }
          }
        }
        // A directory we cannot list holds no configuration for us; the
        // ascension continues regardless.
        Err(err) => debug!(dir = %dir.display(), error = %err, "directory listing failed"),
      }
      current = dir;
    }
  }

  /// Runs the ordered script-tag strategies over one HTML file and tailors
  /// any result to that file's location.
  async fn config_from_html_file(&self, file: &Path) -> Option<AmdConfig> {
    let contents = self.fs.get_contents(file).await.ok()?;
    let tags = script_tags(&contents);
    let raw = match self.config_from_loader_pair(file, &tags).await {
      Some(raw) => Some(raw),
      None => self.config_from_tags(file, &tags).await,
    }?;
    Some(tailor(file, raw))
  }

  /// Dual-tag loader-bootstrap idiom: a document whose first script tag
  /// loads `curl.js`/`require.js` and whose second loads the file that
  /// configures the loader and kicks off the app. Applies only to documents
  /// with exactly two script tags; anything else is a clean non-match.
  async fn config_from_loader_pair(
    &self,
    html_file: &Path,
    tags: &[ScriptTag],
  ) -> Option<RawConfig> {
    let [loader_tag, app_tag] = tags else {
      return None;
    };
    let loader_src = loader_tag.attr("src")?;
    if !is_loader_path(loader_src) {
      return None;
    }
    let app_src = app_tag.attr("src")?;
    let app_file = path::resolve(html_file.parent()?, app_src);
    let code = self.fs.get_contents(&app_file).await.ok()?;
    Some(RawConfig::from_entries(config_from_source(&code)?))
  }

  /// Per-tag strategies in document order: the `data-main` convention first,
  /// then the tag's own code. The first tag yielding a result stops the
  /// search.
  async fn config_from_tags(&self, html_file: &Path, tags: &[ScriptTag]) -> Option<RawConfig> {
    for tag in tags {
      if let Some(raw) = self.config_from_data_main(html_file, tag).await {
        return Some(raw);
      }
      if let Some(raw) = self.config_from_script_code(html_file, tag).await {
        return Some(raw);
      }
    }
    None
  }

  /// `data-main` convention: the attribute's directory part becomes the
  /// default `baseDir`. When the attribute points at a `.js` file, that file
  /// is additionally fetched and mined for configuration; an extracted
  /// configuration wins, but inherits the computed `baseDir` if it does not
  /// set one itself.
  async fn config_from_data_main(&self, html_file: &Path, tag: &ScriptTag) -> Option<RawConfig> {
    let data_main = tag.attr("data-main").filter(|v| !v.is_empty())?;
    let base_dir = path::dir_of(data_main).map(str::to_owned);
    let mut raw = RawConfig {
      base_dir: base_dir.clone(),
      entries: Default::default(),
    };
    if data_main.ends_with(".js") {
      let js_file = path::resolve(html_file.parent()?, data_main);
      if let Ok(code) = self.fs.get_contents(&js_file).await {
        if let Some(entries) = config_from_source(&code) {
          // The extracted configuration wins, but falls back to the baseDir
          // computed from the attribute when it sets none itself.
          let extracted_base = entries
            .get("baseDir")
            .and_then(ConfigValue::as_str)
            .map(str::to_owned);
          raw = RawConfig {
            base_dir: extracted_base.or(base_dir),
            entries,
          };
        }
      }
    }
    Some(raw)
  }

  /// Inline/external script code idiom: the tag's own code, inline or
  /// fetched through its `src`, run through the locator and evaluator.
  /// A `src` naming the loader itself is never fetched: the loader's own
  /// internal default-config literal is not the document's configuration.
  async fn config_from_script_code(&self, html_file: &Path, tag: &ScriptTag) -> Option<RawConfig> {
    let entries = match &tag.code {
      Some(code) => config_from_source(code)?,
      None => {
        let src = tag.attr("src").filter(|v| !v.is_empty())?;
        if is_loader_path(src) {
          return None;
        }
        let js_file = path::resolve(html_file.parent()?, src);
        let code = self.fs.get_contents(&js_file).await.ok()?;
        config_from_source(&code)?
      }
    };
    Some(RawConfig::from_entries(entries))
  }
}

/// Discovers configuration for a path on the local file system. See
/// [`ConfigFinder::discover`].
pub async fn discover_config(context: &Path) -> Option<AmdConfig> {
  ConfigFinder::new(Arc::new(LocalFs)).discover(context).await
}
