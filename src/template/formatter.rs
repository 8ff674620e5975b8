//! Single-pass placeholder substitution engine

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::types::{Bindings, TemplateError, TemplateResult};

/// Behavior when a placeholder has no binding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Fail with `TemplateError::MissingBinding`
    #[default]
    Error,

    /// Leave the `{name}` span in the output unchanged
    Keep,

    /// Substitute empty text
    Empty,
}

/// Formatting options
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Policy for placeholders with no binding
    pub missing: MissingPolicy,
}

/// A scanned piece of a template: literal text, or a placeholder with
/// the byte span of its `{name}` marker.
enum Segment<'a> {
    Literal(&'a str),
    Placeholder {
        name: &'a str,
        start: usize,
        end: usize,
    },
}

/// Scan a template left to right into literal and placeholder segments.
///
/// Placeholder names are the exact characters between `{` and `}`; no
/// identifier syntax is enforced beyond delimiter matching. An
/// unterminated `{`, an empty `{}`, or a `}` outside a placeholder is
/// malformed (there is no escape convention).
fn scan(template: &str) -> TemplateResult<Vec<Segment<'_>>> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                if literal_start < i {
                    segments.push(Segment::Literal(&template[literal_start..i]));
                }

                let close = match template[i + 1..].find('}') {
                    Some(offset) => i + 1 + offset,
                    None => {
                        return Err(TemplateError::Malformed {
                            position: i,
                            reason: "unterminated placeholder".to_string(),
                        })
                    }
                };

                let name = &template[i + 1..close];
                if name.is_empty() {
                    return Err(TemplateError::Malformed {
                        position: i,
                        reason: "empty placeholder".to_string(),
                    });
                }

                segments.push(Segment::Placeholder {
                    name,
                    start: i,
                    end: close + 1,
                });
                i = close + 1;
                literal_start = i;
            }
            b'}' => {
                return Err(TemplateError::Malformed {
                    position: i,
                    reason: "unmatched '}'".to_string(),
                });
            }
            _ => i += 1,
        }
    }

    if literal_start < bytes.len() {
        segments.push(Segment::Literal(&template[literal_start..]));
    }

    Ok(segments)
}

/// Substitute `{name}` placeholders in a template using the given bindings.
///
/// Literal text is copied byte-for-byte in order. The result is all or
/// nothing: on error no partial output is produced. Fails fast on the
/// first placeholder with no binding; use [`format_with`] to select a
/// different policy.
pub fn format(template: &str, bindings: &Bindings) -> TemplateResult<String> {
    format_with(template, bindings, &FormatOptions::default())
}

/// Substitute `{name}` placeholders with an explicit [`FormatOptions`]
pub fn format_with(
    template: &str,
    bindings: &Bindings,
    options: &FormatOptions,
) -> TemplateResult<String> {
    let mut output = String::with_capacity(template.len());

    for segment in scan(template)? {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Placeholder { name, start, end } => match bindings.get(name) {
                Some(value) => output.push_str(value),
                None => match options.missing {
                    MissingPolicy::Error => {
                        return Err(TemplateError::MissingBinding(name.to_string()))
                    }
                    MissingPolicy::Keep => output.push_str(&template[start..end]),
                    MissingPolicy::Empty => {}
                },
            },
        }
    }

    Ok(output)
}

/// List the placeholder names in a template, unique, in first-appearance
/// order. Checks well-formedness without requiring any bindings.
pub fn placeholders(template: &str) -> TemplateResult<Vec<String>> {
    let mut names: Vec<String> = Vec::new();

    for segment in scan(template)? {
        if let Segment::Placeholder { name, .. } = segment {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }

    Ok(names)
}

/// Substitute `{name}` placeholders in every string of a JSON value,
/// object keys included
pub fn format_value(
    value: &serde_json::Value,
    bindings: &Bindings,
    options: &FormatOptions,
) -> TemplateResult<serde_json::Value> {
    match value {
        serde_json::Value::String(s) => Ok(serde_json::Value::String(format_with(
            s, bindings, options,
        )?)),
        serde_json::Value::Array(arr) => {
            let rendered: Result<Vec<_>, _> = arr
                .iter()
                .map(|v| format_value(v, bindings, options))
                .collect();
            Ok(serde_json::Value::Array(rendered?))
        }
        serde_json::Value::Object(obj) => {
            let mut rendered = serde_json::Map::new();
            for (key, val) in obj {
                let rendered_key = format_with(key, bindings, options)?;
                let rendered_val = format_value(val, bindings, options)?;
                rendered.insert(rendered_key, rendered_val);
            }
            Ok(serde_json::Value::Object(rendered))
        }
        // Numbers, booleans, null are passed through as-is
        _ => Ok(value.clone()),
    }
}
