//! Projecting a `PathInfo` back into the declarative record shape it was
//! inferred from (the inverse of `slicepack_schema::infer_path_info`).

use serde_yaml::{Mapping, Value};
use slicepack_schema::{GenerateKind, PathInfo, PathKind, Until};

/// Render a Unix permission mode the way the declarative format expects:
/// a leading `0` followed by octal digits. `0` itself means "inherit" and
/// is never rendered.
fn render_mode(mode: u32) -> Option<String> {
    if mode == 0 {
        None
    } else {
        Some(format!("0{mode:o}"))
    }
}

/// Render one content-path declaration back into its record form.
///
/// The self-copy shorthand is preserved on the way out: a `Copy` with no
/// explicit `source` (meaning "copy from the same path") is rendered with
/// no `copy` key at all, the same as it would be written by hand.
pub fn path_record(info: &PathInfo) -> Mapping {
    let mut record = Mapping::new();

    match &info.kind {
        PathKind::Dir => {
            record.insert(Value::from("make"), Value::from(true));
        }
        PathKind::Copy { source: Some(src) } => {
            record.insert(Value::from("copy"), Value::from(src.clone()));
        }
        PathKind::Copy { source: None } | PathKind::Glob => {}
        PathKind::Text { body } => {
            record.insert(Value::from("text"), Value::from(body.clone()));
        }
        PathKind::Symlink { target } => {
            record.insert(Value::from("symlink"), Value::from(target.clone()));
        }
        PathKind::Generate { kind } => {
            let tag = match kind {
                GenerateKind::Manifest => "manifest".to_string(),
                GenerateKind::Unknown(other) => other.clone(),
                GenerateKind::None => String::new(),
            };
            record.insert(Value::from("generate"), Value::from(tag));
        }
    }

    if let Some(mode) = render_mode(info.mode) {
        record.insert(Value::from("mode"), Value::from(mode));
    }
    if info.mutable {
        record.insert(Value::from("mutable"), Value::from(true));
    }
    if info.until == Until::Mutate {
        record.insert(Value::from("until"), Value::from("mutate"));
    }
    if info.arch.len() == 1 {
        record.insert(Value::from("arch"), Value::from(info.arch[0].clone()));
    } else if !info.arch.is_empty() {
        record.insert(
            Value::from("arch"),
            Value::from(info.arch.clone()),
        );
    }

    record
}
