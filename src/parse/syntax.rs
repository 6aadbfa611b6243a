//! Directive syntax: `{{name}}`, `{{name|opt:val,opt}}` and `{{opt:val}}`
//!
//! Directives live in element ids and text content. Option lists are coerced
//! into JSON (bare words quoted, bare keys become `key:true`) and decoded with
//! serde, so values come back as booleans, numbers or strings.

use crate::data::value::{js_number_string, parse_js_number};
use crate::errors::DirectiveError;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

lazy_static! {
    static ref RE_DOUBLEBRACE: Regex = Regex::new(r"\{\{([^}]+)\}\}").unwrap();
    static ref RE_UNDERSCOREUNICODE: Regex = Regex::new(r"_x([0-9A-Za-z]+)_").unwrap();
    pub(crate) static ref RE_NUMBER: Regex = Regex::new(r"^[-+]?[0-9]*\.?[0-9]+$").unwrap();
}

/// A single option value
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum OptValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl OptValue {
    /// JavaScript truthiness: `false`, `0`, `NaN` and `""` are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            OptValue::Bool(b) => *b,
            OptValue::Number(n) => *n != 0.0 && !n.is_nan(),
            OptValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            OptValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            OptValue::Number(n) => *n,
            OptValue::Text(s) => parse_js_number(s),
        }
    }
}

impl fmt::Display for OptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptValue::Bool(b) => write!(f, "{}", b),
            OptValue::Number(n) => f.write_str(&js_number_string(*n)),
            OptValue::Text(s) => f.write_str(s),
        }
    }
}

pub type Options = HashMap<String, OptValue>;

/// Parsed form of a directive tag
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Directive {
    pub name: String,
    pub opts: Options,
}

impl Directive {
    /// First of `keys` present in the options
    pub fn first_key<'k>(&self, keys: &[&'k str]) -> Option<&'k str> {
        first_key(&self.opts, keys)
    }

    /// Value of the first of `keys` present in the options
    pub fn opt(&self, keys: &[&str]) -> Option<&OptValue> {
        self.first_key(keys).and_then(|k| self.opts.get(k))
    }

    /// Whether the first of `keys` present holds a truthy value
    pub fn flag(&self, keys: &[&str]) -> bool {
        self.opt(keys).map(OptValue::is_truthy).unwrap_or(false)
    }
}

pub fn first_key<'k>(opts: &Options, keys: &[&'k str]) -> Option<&'k str> {
    keys.iter().copied().find(|k| opts.contains_key(*k))
}

/// Whether `text` contains at least one `{{...}}` tag
pub fn has_directive(text: &str) -> bool {
    RE_DOUBLEBRACE.is_match(text)
}

/// Convert an illustration tool's `_xHEX_` escapes back into characters
pub fn decode_illustrator(text: &str) -> String {
    RE_UNDERSCOREUNICODE
        .replace_all(text, |caps: &Captures| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(|c| c.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn encode_token(token: &str) -> String {
    let token = token.trim();
    if token == "true" || token == "false" {
        token.to_string()
    } else if RE_NUMBER.is_match(token) {
        // ".5" and "+1" are numbers but not JSON
        js_number_string(parse_js_number(token))
    } else {
        serde_json::Value::String(token.to_string()).to_string()
    }
}

fn encode_key(key: &str) -> String {
    serde_json::Value::String(key.trim().to_string()).to_string()
}

/// Rewrite an option list literal into a JSON object
fn json_encode_literal(text: &str) -> String {
    let pairs: Vec<String> = text
        .split(',')
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| {
            let mut tokens = segment.split(':');
            let key = encode_key(tokens.next().unwrap_or_default());
            let rest: Vec<String> = tokens.map(encode_token).collect();
            if rest.is_empty() {
                format!("{}:true", key)
            } else {
                format!("{}:{}", key, rest.join(":"))
            }
        })
        .collect();
    format!("{{{}}}", pairs.join(","))
}

fn parse_options(text: &str) -> Result<Options, DirectiveError> {
    let json = json_encode_literal(text);
    serde_json::from_str(&json).map_err(|e| DirectiveError::Json {
        text: text.to_string(),
        reason: e.to_string(),
    })
}

/// Parse the first directive found in `text`
///
/// Text without a tag is returned whole as the name, so re-parsing a bare
/// name is a no-op.
pub fn syntax(text: &str) -> Result<Directive, DirectiveError> {
    let text = decode_illustrator(text);
    let Some(caps) = RE_DOUBLEBRACE.captures(&text) else {
        return Ok(Directive { name: text, opts: Options::new() });
    };
    let body = &caps[1];

    if let Some((name, opts)) = body.split_once('|') {
        Ok(Directive {
            name: name.trim_matches(|c| c == ' ' || c == '-').to_string(),
            opts: parse_options(opts)?,
        })
    } else if body.contains(':') {
        Ok(Directive { name: String::new(), opts: parse_options(body)? })
    } else {
        Ok(Directive { name: body.trim().to_string(), opts: Options::new() })
    }
}

/// Remove every tag from `text`
pub fn strip_directives(text: &str) -> String {
    RE_DOUBLEBRACE.replace_all(text, "").trim().to_string()
}

/// Replace every tag in `template` with the output of `f`, which receives the
/// full `{{...}}` match
pub fn replace_directives<F>(template: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    RE_DOUBLEBRACE
        .replace_all(template, |caps: &Captures| f(&caps[0]))
        .into_owned()
}
