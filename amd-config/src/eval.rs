//! Static partial evaluation of JavaScript expression trees.
//!
//! Only the object/array/primitive-literal sublanguage is understood; every
//! other expression kind evaluates to [`ConfigValue::Unknown`]. Evaluation is
//! total: it never errors and never panics, because "not statically known" is
//! a first-class result here, not a failure.

use crate::config::ConfigMap;
use crate::config::ConfigValue;
use serde_json::Value;
use tracing::debug;

/// Evaluates an expression node to its statically-known value.
pub fn eval_expr(node: &Value) -> ConfigValue {
  match node.get("$t").and_then(Value::as_str) {
    Some("LiteralObjectExpr") => match eval_object(node) {
      Some(entries) => ConfigValue::Obj(entries),
      None => ConfigValue::Unknown,
    },
    Some("LiteralArrayExpr") => eval_array(node),
    Some("LiteralStringExpr") => match node.get("value").and_then(Value::as_str) {
      Some(s) => ConfigValue::Str(s.to_owned()),
      None => ConfigValue::Unknown,
    },
    Some("LiteralNumberExpr") => match node.get("value").and_then(Value::as_f64) {
      Some(n) => ConfigValue::Num(n),
      None => ConfigValue::Unknown,
    },
    Some("LiteralBooleanExpr") => match node.get("value").and_then(Value::as_bool) {
      Some(b) => ConfigValue::Bool(b),
      None => ConfigValue::Unknown,
    },
    Some("LiteralNull") => ConfigValue::Null,
    _ => ConfigValue::Unknown,
  }
}

/// Evaluates an object literal node to a key/value mapping, or `None` if the
/// node is not an object literal at all.
///
/// Properties whose key is statically known always land in the mapping, with
/// `Unknown` standing in for values that cannot be determined (getters,
/// method members, arbitrary expressions). Properties whose key itself is
/// computed are dropped: this is a best-effort static reading, not a
/// completeness check. Duplicate keys are last-write-wins, like an actual
/// object literal.
pub fn eval_object(node: &Value) -> Option<ConfigMap> {
  if node.get("$t").and_then(Value::as_str) != Some("LiteralObjectExpr") {
    return None;
  }
  let members = node.get("members")?.as_array()?;
  let mut entries = ConfigMap::default();
  for member in members {
    let Some(typ) = member.get("typ") else {
      continue;
    };
    if let Some(valued) = typ.get("Valued") {
      // A direct key serializes as the key string itself; a computed key as
      // its expression node.
      let key = valued
        .get("key")
        .and_then(|k| k.get("Direct"))
        .and_then(Value::as_str);
      let Some(key) = key else {
        debug!("dropping object property with computed key");
        continue;
      };
      let value = match valued
        .get("value")
        .and_then(|v| v.get("Property"))
        .and_then(|p| p.get("initializer"))
      {
        Some(expr) if !expr.is_null() => eval_expr(expr),
        // Getter/setter/method members: key known, value not.
        _ => ConfigValue::Unknown,
      };
      entries.insert(key.to_owned(), value);
    } else if let Some(shorthand) = typ.get("Shorthand") {
      // `{baseUrl}` names the key but its value is a variable reference.
      let name = shorthand
        .get("identifier")
        .and_then(|id| id.get("name"))
        .and_then(Value::as_str);
      if let Some(name) = name {
        entries.insert(name.to_owned(), ConfigValue::Unknown);
      }
    }
    // Rest members have no static key.
  }
  Some(entries)
}

fn eval_array(node: &Value) -> ConfigValue {
  let Some(elements) = node.get("elements").and_then(Value::as_array) else {
    return ConfigValue::Unknown;
  };
  // Gaps and spreads hold Unknown in place so positional meaning survives.
  let values = elements
    .iter()
    .map(|element| match element.get("Single") {
      Some(expr) => eval_expr(expr),
      None => ConfigValue::Unknown,
    })
    .collect();
  ConfigValue::Arr(values)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::parse_source;
  use crate::matcher::{bind, contains, obj, text};

  fn first_object(code: &str) -> ConfigMap {
    let tree = parse_source(code).unwrap();
    let pat = contains(bind("obj", obj(vec![("$t", text("LiteralObjectExpr"))])));
    let m = pat.matches(&tree).unwrap();
    eval_object(m.capture("obj").unwrap()).unwrap()
  }

  #[test]
  fn reproduces_literal_objects() {
    let entries = first_object("var c = {baseUrl: \"scripts\", 'paths': {jquery: \"libs/jq\"}};");
    assert_eq!(entries["baseUrl"], ConfigValue::Str("scripts".into()));
    let ConfigValue::Obj(paths) = &entries["paths"] else {
      panic!("paths should be a nested mapping");
    };
    assert_eq!(paths["jquery"], ConfigValue::Str("libs/jq".into()));
  }

  #[test]
  fn unknown_values_keep_their_keys() {
    let entries = first_object("var c = {baseUrl: computeBase(), paths: {}, shorthand};");
    assert_eq!(entries["baseUrl"], ConfigValue::Unknown);
    assert_eq!(entries["paths"], ConfigValue::Obj(ConfigMap::default()));
    assert_eq!(entries["shorthand"], ConfigValue::Unknown);
  }

  #[test]
  fn null_is_distinct_from_unknown() {
    let entries = first_object("var c = {explicit: null, opaque: mystery()};");
    assert_eq!(entries["explicit"], ConfigValue::Null);
    assert_eq!(entries["opaque"], ConfigValue::Unknown);
    assert_ne!(entries["explicit"], entries["opaque"]);
  }

  #[test]
  fn computed_keys_are_dropped() {
    let entries = first_object("var c = {[dynamic()]: \"x\", fixed: \"y\"};");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries["fixed"], ConfigValue::Str("y".into()));
  }

  #[test]
  fn duplicate_keys_are_last_write_wins() {
    let entries = first_object("var c = {a: \"first\", a: \"second\"};");
    assert_eq!(entries["a"], ConfigValue::Str("second".into()));
  }

  #[test]
  fn arrays_preserve_length_and_position() {
    let entries = first_object("var c = {packages: [\"p\", compute(), \"q\", 7, true]};");
    let ConfigValue::Arr(items) = &entries["packages"] else {
      panic!("packages should be a sequence");
    };
    assert_eq!(items.len(), 5);
    assert_eq!(items[0], ConfigValue::Str("p".into()));
    assert_eq!(items[1], ConfigValue::Unknown);
    assert_eq!(items[2], ConfigValue::Str("q".into()));
    assert_eq!(items[3], ConfigValue::Num(7.0));
    assert_eq!(items[4], ConfigValue::Bool(true));
  }

  #[test]
  fn evaluation_is_idempotent() {
    let code = "var c = {a: [1, x(), \"s\"], b: {c: \"d\"}};";
    assert_eq!(first_object(code), first_object(code));
  }

  #[test]
  fn non_literal_nodes_are_unknown() {
    let tree = parse_source("var c = someCall();").unwrap();
    assert_eq!(eval_object(&tree), None);
  }
}
