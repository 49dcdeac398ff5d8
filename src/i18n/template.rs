//! Message template rendering (a small subset of Fluent syntax).
//!
//! Supported:
//! - text with `{ $name }` placeables
//! - string literals `{ "{" }`
//! - selectors `{ $count -> [one] one item *[other] { $count } items }`
//!   with exact-number keys (`[0]`), English plural categories and
//!   string keys; `*` marks the default variant
//!
//! A template that fails to parse renders verbatim.

use std::collections::HashMap;

use crate::rpc::messages::TranslateArgValue;

#[derive(Debug, Clone, PartialEq)]
enum Element {
    Text(String),
    Var(String),
    Select {
        var: String,
        variants: Vec<Variant>,
        default: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Variant {
    key: String,
    pattern: Vec<Element>,
}

/// Render `template`, substituting `args`.
///
/// Missing variables render as `{$name}` so the gap is visible.
pub fn render(template: &str, args: &HashMap<String, TranslateArgValue>) -> String {
    let chars: Vec<char> = template.chars().collect();
    let mut parser = Parser { chars: &chars, pos: 0 };
    match parser.pattern(false) {
        Some(elements) if parser.pos == chars.len() => {
            let mut out = String::with_capacity(template.len());
            write_elements(&elements, args, &mut out);
            out
        }
        _ => template.to_string(),
    }
}

/// Format a number for display: integers without a fraction, other
/// values with at most two decimals and no trailing zeros.
///
/// Every non-finite value prints as `NaN`: JSON carries them all as
/// `null`, so infinities cannot be told apart from NaN after a round trip.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "NaN".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let s = format!("{:.2}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

// ── Rendering ─────────────────────────────────────────────────

fn write_elements(elements: &[Element], args: &HashMap<String, TranslateArgValue>, out: &mut String) {
    for el in elements {
        match el {
            Element::Text(t) => out.push_str(t),
            Element::Var(name) => match args.get(name) {
                Some(TranslateArgValue::Str(s)) => out.push_str(s),
                Some(TranslateArgValue::Number(n)) => out.push_str(&format_number(*n)),
                None => {
                    out.push_str("{$");
                    out.push_str(name);
                    out.push('}');
                }
            },
            Element::Select {
                var,
                variants,
                default,
            } => {
                let chosen = select_variant(args.get(var), variants).unwrap_or(*default);
                write_elements(&variants[chosen].pattern, args, out);
            }
        }
    }
}

fn select_variant(value: Option<&TranslateArgValue>, variants: &[Variant]) -> Option<usize> {
    match value? {
        TranslateArgValue::Number(n) if !n.is_finite() => None,
        TranslateArgValue::Number(n) => {
            let exact = variants
                .iter()
                .position(|v| v.key.parse::<f64>().is_ok_and(|k| k == *n));
            exact.or_else(|| {
                let category = plural_category(*n);
                variants.iter().position(|v| v.key == category)
            })
        }
        TranslateArgValue::Str(s) => variants.iter().position(|v| v.key == *s),
    }
}

/// English cardinal plural rule.
fn plural_category(n: f64) -> &'static str {
    if n == 1.0 { "one" } else { "other" }
}

// ── Parsing ───────────────────────────────────────────────────

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Parse text and placeables. Inside a variant (`nested`), stops
    /// before the next variant key or the closing `}` of the selector.
    fn pattern(&mut self, nested: bool) -> Option<Vec<Element>> {
        let mut elements = Vec::new();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if nested && (c == '}' || self.at_variant_key()) {
                break;
            }
            if c == '{' {
                if !text.is_empty() {
                    elements.push(Element::Text(core::mem::take(&mut text)));
                }
                self.pos += 1;
                elements.push(self.placeable()?);
            } else if c == '}' {
                return None;
            } else {
                text.push(c);
                self.pos += 1;
            }
        }
        if !text.is_empty() {
            elements.push(Element::Text(text));
        }
        Some(elements)
    }

    fn at_variant_key(&self) -> bool {
        match self.peek() {
            Some('[') => true,
            Some('*') => self.chars.get(self.pos + 1) == Some(&'['),
            _ => false,
        }
    }

    /// Parse the inside of `{ ... }`; the opening brace is consumed.
    fn placeable(&mut self) -> Option<Element> {
        self.skip_ws();
        let element = match self.peek()? {
            '"' => Element::Text(self.string_literal()?),
            '$' => {
                self.pos += 1;
                let name = self.identifier()?;
                self.skip_ws();
                if self.peek() == Some('-') && self.chars.get(self.pos + 1) == Some(&'>') {
                    self.pos += 2;
                    self.select(name)?
                } else {
                    Element::Var(name)
                }
            }
            _ => return None,
        };
        self.skip_ws();
        if self.peek()? != '}' {
            return None;
        }
        self.pos += 1;
        Some(element)
    }

    fn select(&mut self, var: String) -> Option<Element> {
        let mut variants = Vec::new();
        let mut default = None;
        loop {
            self.skip_ws();
            match self.peek()? {
                '}' => break,
                '*' => {
                    self.pos += 1;
                    default = Some(variants.len());
                }
                '[' => {}
                _ => return None,
            }
            if self.peek()? != '[' {
                return None;
            }
            self.pos += 1;
            let start = self.pos;
            while self.peek()? != ']' {
                self.pos += 1;
            }
            let key: String = self.chars[start..self.pos].iter().collect();
            self.pos += 1;
            let mut pattern = self.pattern(true)?;
            trim_pattern(&mut pattern);
            variants.push(Variant {
                key: key.trim().to_string(),
                pattern,
            });
        }
        Some(Element::Select {
            var,
            variants,
            default: default?,
        })
    }

    fn identifier(&mut self) -> Option<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        Some(self.chars[start..self.pos].iter().collect())
    }

    fn string_literal(&mut self) -> Option<String> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.peek()? {
                '"' => {
                    self.pos += 1;
                    return Some(out);
                }
                '\\' => {
                    self.pos += 1;
                    out.push(self.peek()?);
                    self.pos += 1;
                }
                c => {
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
    }
}

fn trim_pattern(pattern: &mut Vec<Element>) {
    if let Some(Element::Text(t)) = pattern.first_mut() {
        *t = t.trim_start().to_string();
    }
    if let Some(Element::Text(t)) = pattern.last_mut() {
        *t = t.trim_end().to_string();
    }
    pattern.retain(|e| !matches!(e, Element::Text(t) if t.is_empty()));
}
