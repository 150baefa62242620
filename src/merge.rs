use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ThemeError;
use crate::theme::{Section, Theme};

/// Deep-merge `overlay` on top of `base`.
/// If the overlay holds an object for a key, recurse into the base's object at
/// that key (or an empty one). Otherwise, `overlay`'s value wins, arrays included.
pub fn deep_merge(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, overlay_val) in overlay {
        match (base.remove(&key), overlay_val) {
            (Some(Value::Object(base_obj)), Value::Object(overlay_obj)) => {
                base.insert(key, Value::Object(deep_merge(base_obj, overlay_obj)));
            }
            (_, Value::Object(overlay_obj)) => {
                base.insert(key, Value::Object(deep_merge(Map::new(), overlay_obj)));
            }
            (_, overlay_val) => {
                base.insert(key, overlay_val);
            }
        }
    }
    base
}

/// Non-consuming merge of two JSON values.
///
/// Two objects are deep-merged; any other overlay replaces the base.
pub fn merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_obj), Value::Object(overlay_obj)) => {
            Value::Object(deep_merge(base_obj.clone(), overlay_obj.clone()))
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Merge a partial theme onto `base` and produce a fully-populated [`Theme`].
///
/// A non-object overlay carries no sections and is ignored. A known property
/// that is `null` or not a string is dropped from the overlay, so it keeps the
/// base value while the rest of the overlay still applies. A known section
/// that is neither an object nor `null` fails the whole merge; nothing is
/// half-applied.
pub fn merge_theme(base: &Theme, overlay: &Value) -> Result<Theme, ThemeError> {
    let Value::Object(overlay_obj) = overlay else {
        if !overlay.is_null() {
            warn!("ignoring theme overlay that is not an object");
        }
        return Ok(base.clone());
    };

    let Value::Object(base_obj) = base.to_value()? else {
        return Err(ThemeError::InvalidTheme {
            reason: "theme did not serialize to an object".into(),
        });
    };

    let mut overlay_obj = overlay_obj.clone();
    drop_unusable_leaves(&mut overlay_obj);
    let sections = overlay_obj.len();
    let merged = deep_merge(base_obj, overlay_obj);
    debug!(sections, "merged theme overlay");

    serde_json::from_value(Value::Object(merged)).map_err(|e| ThemeError::InvalidTheme {
        reason: e.to_string(),
    })
}

/// Remove `null` sections and non-string known properties from a theme overlay.
fn drop_unusable_leaves(overlay: &mut Map<String, Value>) {
    for section in Section::ALL {
        let name = section.as_str();
        if overlay.get(name).is_some_and(Value::is_null) {
            overlay.remove(name);
            continue;
        }
        let Some(Value::Object(props)) = overlay.get_mut(name) else {
            continue;
        };
        for (property, _) in section.properties() {
            let unusable = match props.get(*property) {
                None | Some(Value::String(_)) => false,
                Some(Value::Null) => true,
                Some(other) => {
                    warn!(
                        section = name,
                        property = *property,
                        value = %other,
                        "ignoring non-string theme value"
                    );
                    true
                }
            };
            if unusable {
                props.remove(*property);
            }
        }
    }
}
