use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("template '{template}' has no value for placeholder '{{{field}}}'")]
    MissingField {
        template: &'static str,
        field: String,
    },

    #[error("template '{template}' has no placeholder named '{{{field}}}'")]
    UnknownField {
        template: &'static str,
        field: String,
    },
}

/// Fills `{name}` placeholders in a template.
///
/// A placeholder is `{` + `[a-z0-9_]+` + `}`. Any other brace (JSON examples
/// in schema text, for instance) is copied through untouched. Substitution is
/// single-pass: braces inside supplied values are never expanded.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    name: &'static str,
    template: &'static str,
    values: BTreeMap<&'static str, String>,
}

impl PromptBuilder {
    pub fn new(name: &'static str, template: &'static str) -> Self {
        Self {
            name,
            template,
            values: BTreeMap::new(),
        }
    }

    pub fn set(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    /// Validates that every placeholder has a value and every value has a
    /// placeholder, then substitutes.
    pub fn build(self) -> Result<String, PromptError> {
        let placeholders: BTreeSet<&str> = scan(self.template)
            .filter_map(|seg| match seg {
                Segment::Field(f) => Some(f),
                Segment::Text(_) => None,
            })
            .collect();

        if let Some(missing) = placeholders.iter().find(|f| !self.values.contains_key(*f)) {
            return Err(PromptError::MissingField {
                template: self.name,
                field: missing.to_string(),
            });
        }
        if let Some(unknown) = self.values.keys().find(|k| !placeholders.contains(*k)) {
            return Err(PromptError::UnknownField {
                template: self.name,
                field: unknown.to_string(),
            });
        }

        let mut out = String::with_capacity(self.template.len() + 256);
        for seg in scan(self.template) {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Field(f) => {
                    if let Some(v) = self.values.get(f) {
                        out.push_str(v);
                    }
                }
            }
        }
        Ok(out)
    }
}

enum Segment<'a> {
    Text(&'a str),
    Field(&'a str),
}

fn scan(template: &str) -> impl Iterator<Item = Segment<'_>> {
    let mut rest = template;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let mut search_from = 0;
        loop {
            let Some(rel) = rest[search_from..].find('{') else {
                let text = rest;
                rest = "";
                return Some(Segment::Text(text));
            };
            let open = search_from + rel;
            if let Some(len) = placeholder_len(&rest[open + 1..]) {
                if open > 0 {
                    let text = &rest[..open];
                    rest = &rest[open..];
                    return Some(Segment::Text(text));
                }
                let field = &rest[1..1 + len];
                rest = &rest[len + 2..];
                return Some(Segment::Field(field));
            }
            search_from = open + 1;
        }
    })
}

/// Length of the identifier if `s` starts with `ident}`.
fn placeholder_len(s: &str) -> Option<usize> {
    let len = s
        .bytes()
        .take_while(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'_')
        .count();
    (len > 0 && s.as_bytes().get(len) == Some(&b'}')).then_some(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_named_placeholders() {
        let out = PromptBuilder::new("t", "직무: {role}, 경력: {years}년")
            .set("role", "백엔드 개발자")
            .set("years", "3")
            .build()
            .unwrap();
        assert_eq!(out, "직무: 백엔드 개발자, 경력: 3년");
    }

    #[test]
    fn test_json_braces_pass_through() {
        let template = "응답 형식:\n{\n  \"difficulty\": \"{tier}\"\n}";
        let out = PromptBuilder::new("t", template)
            .set("tier", "MIDDLE")
            .build()
            .unwrap();
        assert_eq!(out, "응답 형식:\n{\n  \"difficulty\": \"MIDDLE\"\n}");
    }

    #[test]
    fn test_missing_field_fails_fast() {
        let err = PromptBuilder::new("interview", "{role} / {tier}")
            .set("role", "x")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            PromptError::MissingField {
                template: "interview",
                field: "tier".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = PromptBuilder::new("t", "{role}")
            .set("role", "x")
            .set("rol", "typo")
            .build()
            .unwrap_err();
        assert!(matches!(err, PromptError::UnknownField { .. }));
    }

    #[test]
    fn test_values_are_not_re_expanded() {
        let out = PromptBuilder::new("t", "A {summary} B")
            .set("summary", "literal {role}")
            .build()
            .unwrap();
        assert_eq!(out, "A literal {role} B");
    }

    #[test]
    fn test_repeated_placeholder_uses_same_value() {
        let out = PromptBuilder::new("t", "{role} 분야의 {role}")
            .set("role", "QA")
            .build()
            .unwrap();
        assert_eq!(out, "QA 분야의 QA");
    }
}
