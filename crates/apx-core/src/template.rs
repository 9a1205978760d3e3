//! Placeholder substitution for template files.
//!
//! Templates carry `$name` or `${name}` placeholders, where a name is
//! `[A-Za-z_][A-Za-z0-9_]*`; `$$` escapes a literal `$`. Strict rendering
//! treats an unresolved or malformed placeholder as an error; safe
//! rendering passes it through verbatim.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

/// How rendering reacts to placeholders it cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Every placeholder must resolve; malformed syntax is a template defect.
    Strict,
    /// Unresolved and malformed placeholders stay verbatim in the output.
    Safe,
}

/// Placeholder name to replacement value, built per template invocation.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    values: HashMap<String, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one substitution.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Render a template string with the given substitutions.
pub fn render_str(input: &str, subs: &Substitutions, mode: RenderMode) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    let mut base = 0usize;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let dollar = base + pos;
        let after = &rest[pos + 1..];

        let consumed = if after.starts_with('$') {
            out.push('$');
            1
        } else if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) if is_name(&braced[..end]) => {
                    let name = &braced[..end];
                    match subs.get(name) {
                        Some(value) => out.push_str(value),
                        None => match mode {
                            RenderMode::Strict => {
                                return Err(Error::UnresolvedPlaceholder {
                                    name: name.to_string(),
                                });
                            }
                            RenderMode::Safe => {
                                out.push_str("${");
                                out.push_str(name);
                                out.push('}');
                            }
                        },
                    }
                    end + 2
                }
                _ => match mode {
                    RenderMode::Strict => {
                        return Err(Error::MalformedPlaceholder { offset: dollar });
                    }
                    RenderMode::Safe => {
                        out.push('$');
                        0
                    }
                },
            }
        } else {
            let len = name_len(after);
            if len == 0 {
                match mode {
                    RenderMode::Strict => {
                        return Err(Error::MalformedPlaceholder { offset: dollar });
                    }
                    RenderMode::Safe => {
                        out.push('$');
                        0
                    }
                }
            } else {
                let name = &after[..len];
                match subs.get(name) {
                    Some(value) => out.push_str(value),
                    None => match mode {
                        RenderMode::Strict => {
                            return Err(Error::UnresolvedPlaceholder {
                                name: name.to_string(),
                            });
                        }
                        RenderMode::Safe => {
                            out.push('$');
                            out.push_str(name);
                        }
                    },
                }
                len
            }
        };

        rest = &after[consumed..];
        base = dollar + 1 + consumed;
    }

    out.push_str(rest);
    Ok(out)
}

/// Render a template file to an output path, overwriting any existing file.
pub fn render_file(
    template: &Path,
    output: &Path,
    subs: &Substitutions,
    mode: RenderMode,
) -> Result<()> {
    if !template.exists() {
        return Err(Error::TemplateNotFound {
            path: template.to_path_buf(),
        });
    }
    let content = fs::read_to_string(template)?;
    let rendered = render_str(&content, subs, mode)?;
    fs::write(output, rendered)?;
    info!("rendered {} -> {}", template.display(), output.display());
    Ok(())
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Length of the longest valid placeholder name at the start of `s`.
fn name_len(s: &str) -> usize {
    let mut len = 0;
    for c in s.chars() {
        let ok = if len == 0 {
            c.is_ascii_alphabetic() || c == '_'
        } else {
            c.is_ascii_alphanumeric() || c == '_'
        };
        if !ok {
            break;
        }
        len += c.len_utf8();
    }
    len
}
