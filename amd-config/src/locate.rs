//! Locating the loader-configuration object literal inside a syntax tree.
//!
//! Two idioms are recognized, tried in a fixed order with the first match
//! winning:
//!
//! 1. Reference idiom: the configuration function is called with a bare
//!    identifier (`var cfg = {...}; curl(cfg);`), conventional with the curl
//!    loader. The config block is found through the variable declaration
//!    binding that identifier.
//! 2. Direct idiom: the configuration object appears inline in a call to the
//!    configuration function (`require({...})`, `requirejs.config({...})`)
//!    or near an assignment to `require`.
//!
//! Both idioms reuse the same "object literal with a recognized configuration
//! key" pattern so unrelated object literals do not produce false positives.

use crate::ast::parse_source;
use crate::config::ConfigMap;
use crate::eval::eval_object;
use crate::matcher::{and, arr, bind, bind_str, contains, has, obj, or, text, Pat};
use serde_json::Value;
use tracing::trace;

/// Keys that mark an object literal as loader configuration.
const CONFIG_KEYS: &[&str] = &["baseUrl", "paths", "packages"];

/// Recognized names for the configuration function.
const LOADER_NAMES: &[&str] = &["curl", "require", "requirejs"];

fn name_pat(names: &[&str]) -> Pat {
  or(names.iter().map(|name| text(name)).collect())
}

/// An object literal owning at least one property with the given key, whether
/// written as a valued member or a shorthand. Direct keys serialize as the
/// key string itself under `Direct`.
fn object_with_key(key: Pat) -> Pat {
  let valued = obj(vec![(
    "Valued",
    obj(vec![("key", obj(vec![("Direct", key.clone())]))]),
  )]);
  let shorthand = obj(vec![(
    "Shorthand",
    obj(vec![("identifier", obj(vec![("name", key)]))]),
  )]);
  obj(vec![
    ("$t", text("LiteralObjectExpr")),
    ("members", has(obj(vec![("typ", or(vec![valued, shorthand]))]))),
  ])
}

fn config_block_pat() -> Pat {
  object_with_key(name_pat(CONFIG_KEYS))
}

/// An expression referring to the configuration function: a recognized loader
/// name, or `<name>.config`.
fn config_fn_pat() -> Pat {
  let loader_id = obj(vec![
    ("$t", text("IdentifierExpr")),
    ("name", name_pat(LOADER_NAMES)),
  ]);
  let config_member = obj(vec![
    ("$t", text("MemberExpr")),
    (
      "left",
      obj(vec![("$t", text("IdentifierExpr")), ("name", name_pat(LOADER_NAMES))]),
    ),
    ("right", text("config")),
  ]);
  or(vec![loader_id, config_member])
}

/// Reference idiom: first recover the name of the identifier passed to the
/// configuration function, then find the declaration binding that name to an
/// object literal with a recognized key.
fn find_reference_config(tree: &Value) -> Option<&Value> {
  let call_with_identifier = contains(obj(vec![
    ("$t", text("CallExpr")),
    ("callee", config_fn_pat()),
    (
      "arguments",
      arr(vec![obj(vec![
        ("$t", text("IdentifierExpr")),
        ("name", bind_str("config_name")),
      ])]),
    ),
  ]));
  let call = call_with_identifier.matches(tree)?;
  let config_name = call.capture_str("config_name")?;
  trace!(config_name, "configuration passed by reference");

  let declaration = contains(obj(vec![
    ("$t", text("VarDecl")),
    (
      "declarators",
      has(and(vec![
        obj(vec![("pattern", obj(vec![("name", text(config_name))]))]),
        contains(bind("config", config_block_pat())),
      ])),
    ),
  ]));
  declaration.matches(tree)?.capture("config")
}

/// Direct idiom: a call to the configuration function (or an assignment to
/// `require`) containing an object literal with a recognized key, first
/// depth-first match.
fn find_direct_config(tree: &Value) -> Option<&Value> {
  let config_call = obj(vec![("$t", text("CallExpr")), ("callee", config_fn_pat())]);
  let require_assignment = obj(vec![
    ("$t", text("BinaryExpr")),
    ("operator", text("Assignment")),
    ("left", obj(vec![("name", text("require"))])),
  ]);
  let pat = contains(and(vec![
    or(vec![config_call, require_assignment]),
    contains(bind("config", config_block_pat())),
  ]));
  pat.matches(tree)?.capture("config")
}

/// Returns the AST subtree of the loader-configuration object literal, or
/// `None` when neither idiom matches.
pub fn find_config_block(tree: &Value) -> Option<&Value> {
  find_reference_config(tree).or_else(|| find_direct_config(tree))
}

/// Parses source text and statically evaluates its configuration block, if
/// any. Malformed source and absent configuration both yield `None`.
pub fn config_from_source(code: &str) -> Option<ConfigMap> {
  let tree = parse_source(code)?;
  let block = find_config_block(&tree)?;
  eval_object(block)
}
