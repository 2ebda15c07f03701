use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Directory portion of a loader-style reference (`data-main`, `src`), which
/// always uses `/` separators regardless of platform.
///
/// Returns `None` when the reference has no directory part at all, e.g.
/// `dir_of("main")`.
pub fn dir_of(reference: &str) -> Option<&str> {
  let (dir, _) = reference.rsplit_once('/')?;
  Some(dir)
}

/// Lexically normalizes a path: strips `.` components and folds `..` into the
/// preceding component where possible. Purely textual; never touches the
/// filesystem, so symlinks are not resolved.
pub fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::Prefix(_) | Component::RootDir => out.push(component),
      Component::CurDir => {}
      Component::ParentDir => {
        // `..` at the root stays at the root; `..` at the start of a relative
        // path has to be kept as-is.
        match out.components().next_back() {
          Some(Component::Normal(_)) => {
            out.pop();
          }
          Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
          _ => out.push(component),
        }
      }
      Component::Normal(_) => out.push(component),
    }
  }
  out
}

/// Resolves a loader-style reference against a base directory. An absolute
/// reference ignores the base, like `path.resolve` in the original loaders.
pub fn resolve(base: &Path, reference: &str) -> PathBuf {
  let reference = Path::new(reference);
  if reference.is_absolute() {
    normalize(reference)
  } else {
    normalize(&base.join(reference))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dir_of_strips_last_segment() {
    assert_eq!(dir_of("app/main"), Some("app"));
    assert_eq!(dir_of("a/b/c.js"), Some("a/b"));
    assert_eq!(dir_of("main"), None);
    assert_eq!(dir_of("/main"), Some(""));
  }

  #[test]
  fn normalize_folds_dots() {
    assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
    assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
  }

  #[test]
  fn resolve_relative_and_absolute() {
    assert_eq!(
      resolve(Path::new("/proj/web"), "scripts"),
      PathBuf::from("/proj/web/scripts")
    );
    assert_eq!(
      resolve(Path::new("/proj/web"), "../lib/x.js"),
      PathBuf::from("/proj/lib/x.js")
    );
    assert_eq!(resolve(Path::new("/proj"), "/abs/dir"), PathBuf::from("/abs/dir"));
  }
}
