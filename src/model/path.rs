//! Dot-path lookups and wildcard queries over a [`Value`] tree.
//!
//! A path is a dot-separated list of mapping keys or list indices, e.g.
//! `entities.Customer.fields.customerId`. Queries additionally accept `*`
//! (every child, one level) and `..` (the current node and all of its
//! descendants), e.g. `..fields.*`. A leading `$` and `[*]` / `[n]` brackets
//! are accepted as aliases.

use super::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Key(&'a str),
    Any,
    Descendants,
}

fn normalize(pattern: &str) -> String {
    let pattern = pattern.strip_prefix('$').unwrap_or(pattern);
    let pattern = pattern.replace("[*]", ".*").replace('[', ".").replace(']', "");
    if pattern.starts_with("..") {
        pattern
    } else {
        pattern.trim_start_matches('.').to_string()
    }
}

fn parse_pattern(pattern: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    for (i, part) in pattern.split('.').enumerate() {
        match part {
            "" if i == 0 && pattern.is_empty() => {}
            "" => {
                if segments.last() != Some(&Segment::Descendants) {
                    segments.push(Segment::Descendants);
                }
            }
            "*" => segments.push(Segment::Any),
            key => segments.push(Segment::Key(key)),
        }
    }
    segments
}

fn child<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Map(map) => map.get(key),
        Value::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match value {
        Value::Map(map) => map.get_mut(key),
        Value::List(items) => key.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
        _ => None,
    }
}

/// Follow a plain dotted path
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    path.split('.').try_fold(root, child)
}

pub fn lookup_mut<'a>(root: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    if path.is_empty() {
        return Some(root);
    }
    path.split('.').try_fold(root, child_mut)
}

/// Run a wildcard query, returning every match with its concrete path
pub fn select<'a>(root: &'a Value, pattern: &str) -> Vec<(String, &'a Value)> {
    let pattern = normalize(pattern);
    let segments = parse_pattern(&pattern);
    let mut out = Vec::new();
    select_into(root, String::new(), &segments, &mut out);
    out
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn for_each_child<'a>(value: &'a Value, prefix: &str, mut f: impl FnMut(String, &'a Value)) {
    match value {
        Value::Map(map) => {
            for (key, child) in map {
                f(join(prefix, key), child);
            }
        }
        Value::List(items) => {
            for (i, child) in items.iter().enumerate() {
                f(join(prefix, &i.to_string()), child);
            }
        }
        _ => {}
    }
}

fn select_into<'a>(
    value: &'a Value,
    path: String,
    segments: &[Segment<'_>],
    out: &mut Vec<(String, &'a Value)>,
) {
    let Some((first, rest)) = segments.split_first() else {
        out.push((path, value));
        return;
    };
    match first {
        Segment::Key(key) => {
            if let Some(next) = child(value, key) {
                select_into(next, join(&path, key), rest, out);
            }
        }
        Segment::Any => {
            for_each_child(value, &path, |child_path, child| {
                select_into(child, child_path, rest, out)
            });
        }
        Segment::Descendants => {
            select_into(value, path.clone(), rest, out);
            for_each_child(value, &path, |child_path, child| {
                select_into(child, child_path, segments, out)
            });
        }
    }
}
