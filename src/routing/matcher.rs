//! Route pattern compilation and matching.
//!
//! # Responsibilities
//! - Parse pattern strings (`/user/:action(edit|list)/:id([0-9]+)`) into segments
//! - Validate constraint syntax at registration time
//! - Match split path components positionally and extract captures
//!
//! # Design Decisions
//! - Patterns are compiled once; constraint text is never re-parsed per request
//! - Alternations of plain words and digit classes avoid the regex engine
//! - Other constraints compile to a regex anchored to the whole component
//! - Capture names play no part in route identity, only in extraction

use std::collections::HashMap;
use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::config::RoutingConfig;
use crate::routing::RouteError;

/// Rule a captured component must satisfy.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// One of a fixed set of literal words, e.g. `(edit|list|delete)`.
    OneOf(Vec<String>),
    /// A non-empty run of ASCII digits, e.g. `([0-9]+)` or `(\d+)`.
    Digits,
    /// Any other expression, anchored to the full component.
    Pattern(Regex),
}

impl Constraint {
    fn accepts(&self, value: &str, case_sensitive: bool) -> bool {
        match self {
            Constraint::OneOf(words) => words.iter().any(|w| {
                if case_sensitive {
                    w == value
                } else {
                    w.eq_ignore_ascii_case(value)
                }
            }),
            Constraint::Digits => value.bytes().all(|b| b.is_ascii_digit()),
            Constraint::Pattern(re) => re.is_match(value),
        }
    }

    fn same_rule(&self, other: &Constraint, case_sensitive: bool) -> bool {
        match (self, other) {
            (Constraint::OneOf(a), Constraint::OneOf(b)) => {
                let normalize = |words: &[String]| {
                    let mut words: Vec<String> = if case_sensitive {
                        words.to_vec()
                    } else {
                        words.iter().map(|w| w.to_ascii_lowercase()).collect()
                    };
                    words.sort();
                    words.dedup();
                    words
                };
                normalize(a) == normalize(b)
            }
            (Constraint::Digits, Constraint::Digits) => true,
            (Constraint::Pattern(a), Constraint::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// One compiled component of a route pattern.
#[derive(Debug, Clone)]
pub enum Segment {
    Literal(String),
    Capture {
        name: String,
        constraint: Option<Constraint>,
    },
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
    case_sensitive: bool,
}

impl RoutePattern {
    /// Compile a pattern string.
    pub fn parse(source: &str, options: &RoutingConfig) -> Result<Self, RouteError> {
        let invalid = |reason: String| RouteError::InvalidPattern {
            pattern: source.to_string(),
            reason,
        };

        let rest = source
            .strip_prefix('/')
            .ok_or_else(|| invalid("pattern must start with '/'".to_string()))?;

        let mut components: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };
        if !options.strict && components.last() == Some(&"") {
            components.pop();
        }

        let mut segments = Vec::with_capacity(components.len());
        let mut seen = Vec::new();
        for component in components {
            let segment = parse_segment(component, options.case_sensitive).map_err(invalid)?;
            if let Segment::Capture { name, .. } = &segment {
                if seen.contains(name) {
                    return Err(invalid(format!("capture '{}' appears twice", name)));
                }
                seen.push(name.clone());
            }
            segments.push(segment);
        }

        Ok(Self {
            source: source.to_string(),
            segments,
            case_sensitive: options.case_sensitive,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match raw path components, returning percent-decoded captures.
    ///
    /// Literals and constraints see the component as sent; only the stored
    /// capture value is decoded.
    pub fn matches(&self, components: &[&str]) -> Option<HashMap<String, String>> {
        if components.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, component) in self.segments.iter().zip(components) {
            match segment {
                Segment::Literal(lit) => {
                    let equal = if self.case_sensitive {
                        lit == *component
                    } else {
                        lit.eq_ignore_ascii_case(component)
                    };
                    if !equal {
                        return None;
                    }
                }
                Segment::Capture { name, constraint } => {
                    if component.is_empty() {
                        return None;
                    }
                    if let Some(rule) = constraint {
                        if !rule.accepts(component, self.case_sensitive) {
                            return None;
                        }
                    }
                    let value = urlencoding::decode(component)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| component.to_string());
                    params.insert(name.clone(), value);
                }
            }
        }
        Some(params)
    }

    /// True when both patterns accept exactly the same paths.
    pub fn same_shape(&self, other: &RoutePattern) -> bool {
        if self.segments.len() != other.segments.len() {
            return false;
        }
        self.segments.iter().zip(&other.segments).all(|pair| match pair {
            (Segment::Literal(a), Segment::Literal(b)) => {
                if self.case_sensitive {
                    a == b
                } else {
                    a.eq_ignore_ascii_case(b)
                }
            }
            (
                Segment::Capture { constraint: a, .. },
                Segment::Capture { constraint: b, .. },
            ) => match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => a.same_rule(b, self.case_sensitive),
                _ => false,
            },
            _ => false,
        })
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Split a request path into raw components.
pub fn split_path<'a>(path: &'a str, options: &RoutingConfig) -> Vec<&'a str> {
    let rest = path.strip_prefix('/').unwrap_or(path);
    if rest.is_empty() {
        return Vec::new();
    }

    let mut components: Vec<&str> = rest.split('/').collect();
    if !options.strict && components.last() == Some(&"") {
        components.pop();
    }

    components
}

fn parse_segment(component: &str, case_sensitive: bool) -> Result<Segment, String> {
    let Some(capture) = component.strip_prefix(':') else {
        return Ok(Segment::Literal(component.to_string()));
    };

    let (name, constraint) = match capture.find('(') {
        Some(open) => {
            let body = capture[open..]
                .strip_prefix('(')
                .and_then(|b| b.strip_suffix(')'))
                .ok_or_else(|| format!("constraint on ':{}' must end with ')'", capture))?;
            (&capture[..open], Some(parse_constraint(body, case_sensitive)?))
        }
        None => {
            if capture.contains(')') {
                return Err(format!("unbalanced ')' in ':{}'", capture));
            }
            (capture, None)
        }
    };

    if name.is_empty() {
        return Err("capture name is empty".to_string());
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("capture name '{}' has invalid characters", name));
    }

    Ok(Segment::Capture {
        name: name.to_string(),
        constraint,
    })
}

fn parse_constraint(body: &str, case_sensitive: bool) -> Result<Constraint, String> {
    if body.is_empty() {
        return Err("constraint is empty".to_string());
    }

    let mut depth = 0i32;
    for c in body.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(format!("unbalanced ')' in constraint '{}'", body));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(format!("unbalanced '(' in constraint '{}'", body));
    }

    if body == "[0-9]+" || body == r"\d+" {
        return Ok(Constraint::Digits);
    }

    let alternatives: Vec<&str> = body.split('|').collect();
    if alternatives.iter().any(|a| a.is_empty()) {
        return Err(format!("empty alternative in constraint '{}'", body));
    }
    let plain = |a: &&str| a.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    if alternatives.iter().all(plain) {
        return Ok(Constraint::OneOf(
            alternatives.into_iter().map(str::to_string).collect(),
        ));
    }

    RegexBuilder::new(&format!("^(?:{})$", body))
        .case_insensitive(!case_sensitive)
        .build()
        .map(Constraint::Pattern)
        .map_err(|e| format!("constraint '{}' is not a valid expression: {}", body, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> RoutingConfig {
        RoutingConfig::default()
    }

    fn parts(path: &str) -> Vec<&str> {
        split_path(path, &opts())
    }

    #[test]
    fn test_classifies_segments() {
        let pattern = RoutePattern::parse("/:model/:action(edit|list|delete)/:id([0-9]+)", &opts()).unwrap();
        let segments = pattern.segments();
        assert_eq!(segments.len(), 3);
        assert!(matches!(&segments[0], Segment::Capture { name, constraint: None } if name == "model"));
        assert!(matches!(
            &segments[1],
            Segment::Capture { constraint: Some(Constraint::OneOf(words)), .. } if words.len() == 3
        ));
        assert!(matches!(&segments[2], Segment::Capture { constraint: Some(Constraint::Digits), .. }));
    }

    #[test]
    fn test_root_pattern_has_no_segments() {
        let pattern = RoutePattern::parse("/", &opts()).unwrap();
        assert!(pattern.segments().is_empty());
        assert_eq!(pattern.matches(&parts("/")), Some(HashMap::new()));
        assert!(pattern.matches(&parts("/a")).is_none());
    }

    #[test]
    fn test_digit_constraint() {
        let pattern = RoutePattern::parse(r"/widgets/:id(\d+)", &opts()).unwrap();
        let params = pattern.matches(&parts("/widgets/42")).unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert!(pattern.matches(&parts("/widgets/abc")).is_none());
        assert!(pattern.matches(&parts("/widgets/4a")).is_none());
    }

    #[test]
    fn test_capture_rejects_empty_component() {
        let pattern = RoutePattern::parse("/a/:x/b", &opts()).unwrap();
        assert!(pattern.matches(&parts("/a//b")).is_none());
        assert!(pattern.matches(&parts("/a/1/b")).is_some());
    }

    #[test]
    fn test_regex_constraint_is_anchored() {
        let pattern = RoutePattern::parse("/files/:name([a-z]+\\.txt)", &opts()).unwrap();
        assert!(pattern.matches(&parts("/files/notes.txt")).is_some());
        assert!(pattern.matches(&parts("/files/notes.txt.bak")).is_none());
    }

    #[test]
    fn test_malformed_constraints() {
        for bad in [
            "/a/:id([0-9]+",
            "/a/:id()",
            "/a/:(edit)",
            "/a/:id(a||b)",
            "/a/:id((a)",
            "/a/:id(a))",
            "/a/:id([)",
            "/a/:id/:id",
            "no-leading-slash",
        ] {
            assert!(
                matches!(RoutePattern::parse(bad, &opts()), Err(RouteError::InvalidPattern { .. })),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parenthesis_outside_capture_is_literal() {
        let pattern = RoutePattern::parse("/docs/(draft)", &opts()).unwrap();
        assert!(matches!(&pattern.segments()[1], Segment::Literal(l) if l == "(draft)"));
    }

    #[test]
    fn test_trailing_slash_and_case() {
        let pattern = RoutePattern::parse("/Games/", &opts()).unwrap();
        assert!(pattern.matches(&parts("/games")).is_some());
        assert!(pattern.matches(&parts("/games/")).is_some());

        let strict = RoutingConfig { case_sensitive: true, strict: true };
        let pattern = RoutePattern::parse("/Games", &strict).unwrap();
        assert!(pattern.matches(&split_path("/Games", &strict)).is_some());
        assert!(pattern.matches(&split_path("/games", &strict)).is_none());
        assert!(pattern.matches(&split_path("/Games/", &strict)).is_none());
    }

    #[test]
    fn test_captures_are_percent_decoded() {
        let pattern = RoutePattern::parse("/user/:name", &opts()).unwrap();
        let params = pattern.matches(&parts("/user/ada%20lovelace")).unwrap();
        assert_eq!(params["name"], "ada lovelace");
    }

    #[test]
    fn test_same_shape_ignores_capture_names() {
        let a = RoutePattern::parse("/games/:id([0-9]+)", &opts()).unwrap();
        let b = RoutePattern::parse("/games/:gameId(\\d+)", &opts()).unwrap();
        let c = RoutePattern::parse("/games/:id", &opts()).unwrap();
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));

        let x = RoutePattern::parse("/:a(edit|list)", &opts()).unwrap();
        let y = RoutePattern::parse("/:b(list|edit)", &opts()).unwrap();
        assert!(x.same_shape(&y));
    }

    #[test]
    fn test_same_shape_folds_alternation_case() {
        let x = RoutePattern::parse("/:a(Edit|list)", &opts()).unwrap();
        let y = RoutePattern::parse("/:a(edit|LIST)", &opts()).unwrap();
        assert!(x.same_shape(&y));

        let strict = RoutingConfig { case_sensitive: true, strict: false };
        let x = RoutePattern::parse("/:a(Edit|list)", &strict).unwrap();
        let y = RoutePattern::parse("/:a(edit|list)", &strict).unwrap();
        assert!(!x.same_shape(&y));
    }

    #[test]
    fn test_literals_are_not_percent_decoded() {
        let pattern = RoutePattern::parse("/consoles", &opts()).unwrap();
        assert!(pattern.matches(&parts("/consoles")).is_some());
        assert!(pattern.matches(&parts("/con%73oles")).is_none());

        let pattern = RoutePattern::parse("/user/:name/profile", &opts()).unwrap();
        let params = pattern.matches(&parts("/user/a%2Fb/profile")).unwrap();
        assert_eq!(params["name"], "a/b");
    }
}
