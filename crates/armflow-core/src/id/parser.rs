//! Segment-driven parser and formatter for ARM resource identifiers

use super::segment::{Segment, SegmentKind};
use crate::error::{IdError, Result};

/// Parses and formats one identifier grammar.
#[derive(Debug, Clone, Copy)]
pub struct Parser {
    description: &'static str,
    segments: &'static [Segment],
}

impl Parser {
    pub const fn new(description: &'static str, segments: &'static [Segment]) -> Self {
        Self {
            description,
            segments,
        }
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn segments(&self) -> &'static [Segment] {
        self.segments
    }

    /// Parse `input` into the values of the variable segments, in declared order.
    ///
    /// With `insensitively` set, literal segments match ignoring ASCII case.
    /// Only use that for ids echoed back by the API, never for user input.
    pub fn parse(&self, input: &str, insensitively: bool) -> Result<Vec<String>> {
        if input.trim().is_empty() {
            return Err(IdError::Empty {
                description: self.description,
                input: input.to_string(),
            });
        }

        let trimmed = input.strip_prefix('/').unwrap_or(input);
        let tokens: Vec<&str> = trimmed.split('/').collect();
        let mut values = Vec::with_capacity(self.segments.len());

        let (segments, tokens) = match self.segments.split_first() {
            Some((first, rest)) if first.kind == SegmentKind::Scope => {
                let split = Self::scope_split(&tokens, rest);
                let scope = &tokens[..split];
                if scope.iter().all(|t| t.is_empty()) {
                    return Err(self.missing(input, first));
                }
                values.push(format!("/{}", scope.join("/")));
                (rest, &tokens[split..])
            }
            _ => (self.segments, &tokens[..]),
        };

        let mut tokens = tokens.iter();
        for segment in segments {
            let token = match tokens.next() {
                Some(token) if !token.is_empty() => *token,
                _ => return Err(self.missing(input, segment)),
            };

            match segment.literal() {
                Some(expected) => {
                    let matched = if insensitively {
                        token.eq_ignore_ascii_case(expected)
                    } else {
                        token == expected
                    };
                    if !matched {
                        return Err(IdError::UnexpectedSegment {
                            description: self.description,
                            input: input.to_string(),
                            expected,
                            found: token.to_string(),
                        });
                    }
                }
                None => values.push(token.to_string()),
            }
        }

        let trailing: Vec<&str> = tokens.copied().collect();
        if !trailing.is_empty() {
            return Err(IdError::TrailingSegments {
                description: self.description,
                input: input.to_string(),
                trailing: trailing.join("/"),
            });
        }

        Ok(values)
    }

    /// Index where the scope ends and the fixed tail begins.
    ///
    /// The tail is located by its leading literals (at most two), searched
    /// from the right and ignoring case so the strict pass below reports the
    /// mismatch. A tail cut short still anchors on what remains, so the
    /// segment loop names the first absent segment. With no anchor at all,
    /// the whole input is scope and the tail is missing.
    fn scope_split(tokens: &[&str], tail: &[Segment]) -> usize {
        let anchor: Vec<&str> = tail
            .iter()
            .map_while(Segment::literal)
            .take(2)
            .collect();
        if anchor.is_empty() {
            return tokens.len().saturating_sub(tail.len());
        }

        let anchored_at = |start: usize| {
            tokens[start..]
                .iter()
                .zip(&anchor)
                .all(|(token, literal)| token.eq_ignore_ascii_case(literal))
        };
        let complete = (0..tokens.len())
            .rev()
            .filter(|&start| tokens.len() - start >= anchor.len())
            .find(|&start| anchored_at(start));
        let partial = || {
            (tokens.len().saturating_sub(anchor.len() - 1)..tokens.len())
                .find(|&start| anchored_at(start))
        };
        complete.or_else(partial).unwrap_or(tokens.len())
    }

    /// Render the canonical form from variable values in declared order.
    pub fn format(&self, values: &[&str]) -> String {
        let mut out = String::new();
        let mut values = values.iter();
        for segment in self.segments {
            match (segment.literal(), segment.kind) {
                (Some(literal), _) => {
                    out.push('/');
                    out.push_str(literal);
                }
                (None, SegmentKind::Scope) => {
                    let scope = values.next().copied().unwrap_or_default();
                    out.push('/');
                    out.push_str(scope.trim_matches('/'));
                }
                (None, _) => {
                    out.push('/');
                    out.push_str(values.next().copied().unwrap_or_default());
                }
            }
        }
        out
    }

    /// Human-readable label such as `Virtual Machine (Resource Group "rg" / Name "vm1")`.
    pub fn describe(&self, values: &[&str]) -> String {
        let parts: Vec<String> = self
            .segments
            .iter()
            .filter(|s| s.is_variable())
            .zip(values)
            .filter(|(s, _)| s.kind != SegmentKind::SubscriptionId)
            .map(|(s, v)| format!("{} {:?}", s.label, v))
            .collect();
        format!("{} ({})", self.description, parts.join(" / "))
    }

    fn missing(&self, input: &str, segment: &Segment) -> IdError {
        IdError::MissingSegment {
            description: self.description,
            input: input.to_string(),
            segment: segment.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEGMENTS: &[Segment] = &[
        Segment::fixed("subscriptions"),
        Segment::subscription_id(),
        Segment::fixed("resourceGroups"),
        Segment::resource_group(),
        Segment::fixed("providers"),
        Segment::provider("Microsoft.Widgets"),
        Segment::fixed("widgets"),
        Segment::user("widget_name", "Name"),
    ];
    const PARSER: Parser = Parser::new("Widget", SEGMENTS);
    const VALID: &str =
        "/subscriptions/sub/resourceGroups/rg1/providers/Microsoft.Widgets/widgets/w1";

    #[test]
    fn test_parse_extracts_values_in_order() {
        let values = PARSER.parse(VALID, false).unwrap();
        assert_eq!(values, vec!["sub", "rg1", "w1"]);
    }

    #[test]
    fn test_format_inverts_parse() {
        let values = PARSER.parse(VALID, false).unwrap();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        assert_eq!(PARSER.format(&refs), VALID);
    }

    #[test]
    fn test_truncation_names_first_missing_segment() {
        let expected = [
            "subscriptions",
            "subscription_id",
            "resourceGroups",
            "resource_group_name",
            "providers",
            "Microsoft.Widgets",
            "widgets",
            "widget_name",
        ];
        let tokens: Vec<&str> = VALID.trim_start_matches('/').split('/').collect();
        for (cut, segment) in expected.iter().enumerate() {
            let truncated = format!("/{}", tokens[..cut].join("/"));
            let err = PARSER.parse(&truncated, false).unwrap_err();
            match err {
                IdError::MissingSegment { segment: found, .. } => assert_eq!(found, *segment),
                other => panic!("unexpected error for {truncated:?}: {other}"),
            }
        }
    }

    #[test]
    fn test_trailing_slash_is_rejected() {
        let err = PARSER.parse(&format!("{VALID}/"), false).unwrap_err();
        assert!(matches!(err, IdError::TrailingSegments { .. }));
    }

    #[test]
    fn test_literal_case_is_strict() {
        let input = VALID.replace("resourceGroups", "resourcegroups");
        let err = PARSER.parse(&input, false).unwrap_err();
        assert_eq!(
            err,
            IdError::UnexpectedSegment {
                description: "Widget",
                input: input.clone(),
                expected: "resourceGroups",
                found: "resourcegroups".to_string(),
            }
        );

        let values = PARSER.parse(&input, true).unwrap();
        assert_eq!(values, vec!["sub", "rg1", "w1"]);
    }

    #[test]
    fn test_describe_skips_subscription() {
        assert_eq!(
            PARSER.describe(&["sub", "rg1", "w1"]),
            r#"Widget (Resource Group "rg1" / Name "w1")"#
        );
    }

    #[test]
    fn test_scope_segment_captures_prefix() {
        const SCOPED: &[Segment] = &[
            Segment::scope("scope", "Scope"),
            Segment::fixed("providers"),
            Segment::provider("Microsoft.Widgets"),
            Segment::fixed("links"),
            Segment::user("link_name", "Name"),
        ];
        let parser = Parser::new("Widget Link", SCOPED);
        let input = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Widgets/links/l1";
        let values = parser.parse(input, false).unwrap();
        assert_eq!(values, vec!["/subscriptions/sub/resourceGroups/rg", "l1"]);

        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        assert_eq!(parser.format(&refs), input);

        let err = parser
            .parse("/providers/Microsoft.Widgets/links/l1", false)
            .unwrap_err();
        assert!(matches!(
            err,
            IdError::MissingSegment {
                segment: "scope",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            PARSER.parse("  ", false).unwrap_err(),
            IdError::Empty { .. }
        ));
    }
}
