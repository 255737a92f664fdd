//! Permutation template parsing.
//!
//! Templates follow the Midjourney permutation convention: brace-delimited,
//! comma-separated option groups inside otherwise literal text. `"{a,b} on
//! {x,y,z}"` expands to six prompts. Groups do not nest.

use thiserror::Error;

/// Syntax faults a template can carry. Positions are byte offsets into the
/// template string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateSyntaxError {
    #[error("unbalanced braces ({open} opening, {close} closing)")]
    UnbalancedBraces { open: usize, close: usize },
    #[error("nested permutation group at byte {position}")]
    NestedGroup { position: usize },
    #[error("closing brace without a matching open at byte {position}")]
    StrayClose { position: usize },
    #[error("permutation group {index} has no usable options")]
    EmptyGroup { index: usize },
}

/// A successfully parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    /// Option groups in order of appearance. Options are trimmed and
    /// non-empty.
    pub groups: Vec<Vec<String>>,
    /// Number of prompts the template expands to: the product of the group
    /// sizes, or 1 when there are no groups.
    pub expansion: u64,
}

impl ParsedTemplate {
    /// True when the template contains no permutation groups at all.
    pub fn is_literal(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Parses a permutation template in a single pass.
///
/// Options are split on commas, trimmed, and dropped when empty; a group
/// whose options all vanish this way is an [`TemplateSyntaxError::EmptyGroup`].
/// A template with no braces is valid and expands to exactly one prompt.
///
/// ```
/// use srefkit_core::permutation::parse_template;
///
/// let parsed = parse_template("{oil,acrylic} portrait of {a cat,a fox}").unwrap();
/// assert_eq!(parsed.expansion, 4);
/// assert_eq!(parse_template("plain prompt").unwrap().expansion, 1);
/// ```
pub fn parse_template(template: &str) -> Result<ParsedTemplate, TemplateSyntaxError> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut open_braces = 0usize;
    let mut close_braces = 0usize;
    // Body of the group currently being scanned, if any.
    let mut current: Option<String> = None;

    for (position, ch) in template.char_indices() {
        match ch {
            '{' => {
                open_braces += 1;
                if current.is_some() {
                    return Err(TemplateSyntaxError::NestedGroup { position });
                }
                current = Some(String::new());
            }
            '}' => {
                close_braces += 1;
                let body = match current.take() {
                    Some(body) => body,
                    None => return Err(TemplateSyntaxError::StrayClose { position }),
                };
                let options: Vec<String> = body
                    .split(',')
                    .map(str::trim)
                    .filter(|opt| !opt.is_empty())
                    .map(str::to_owned)
                    .collect();
                if options.is_empty() {
                    return Err(TemplateSyntaxError::EmptyGroup {
                        index: groups.len() + 1,
                    });
                }
                groups.push(options);
            }
            _ => {
                if let Some(body) = current.as_mut() {
                    body.push(ch);
                }
            }
        }
    }

    if current.is_some() {
        return Err(TemplateSyntaxError::UnbalancedBraces {
            open: open_braces,
            close: close_braces,
        });
    }

    let expansion = groups
        .iter()
        .fold(1u64, |acc, group| acc.saturating_mul(group.len() as u64));

    Ok(ParsedTemplate { groups, expansion })
}

/// Expansion count of a template, without keeping the parsed groups around.
pub fn expansion_count(template: &str) -> Result<u64, TemplateSyntaxError> {
    parse_template(template).map(|parsed| parsed.expansion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_template_expands_to_one() {
        let parsed = parse_template("a quiet portrait --sref 1234567890").unwrap();
        assert!(parsed.is_literal());
        assert_eq!(parsed.expansion, 1);
    }

    #[test]
    fn group_product_is_expansion_count() {
        let parsed = parse_template("{a,b,c} next to {x,y}").unwrap();
        assert_eq!(parsed.groups.len(), 2);
        assert_eq!(parsed.expansion, 6);
    }

    #[test]
    fn options_are_trimmed() {
        let parsed = parse_template("{ red , deep blue ,green }").unwrap();
        assert_eq!(parsed.groups[0], vec!["red", "deep blue", "green"]);
    }

    #[test]
    fn empty_options_are_dropped() {
        let parsed = parse_template("{a,,b,}").unwrap();
        assert_eq!(parsed.groups[0], vec!["a", "b"]);
        assert_eq!(parsed.expansion, 2);
    }

    #[test]
    fn all_empty_group_is_rejected() {
        assert_eq!(
            parse_template("{ , ,}"),
            Err(TemplateSyntaxError::EmptyGroup { index: 1 })
        );
        assert_eq!(
            parse_template("{}"),
            Err(TemplateSyntaxError::EmptyGroup { index: 1 })
        );
    }

    #[test]
    fn unterminated_group_is_unbalanced() {
        assert_eq!(
            parse_template("{a,b"),
            Err(TemplateSyntaxError::UnbalancedBraces { open: 1, close: 0 })
        );
    }

    #[test]
    fn stray_close_is_rejected() {
        assert_eq!(
            parse_template("a} {b,c}"),
            Err(TemplateSyntaxError::StrayClose { position: 1 })
        );
    }

    #[test]
    fn nesting_is_rejected() {
        assert_eq!(
            parse_template("{a,{b,c}}"),
            Err(TemplateSyntaxError::NestedGroup { position: 3 })
        );
    }

    #[test]
    fn multibyte_text_parses() {
        let parsed = parse_template("{état,êtres} café").unwrap();
        assert_eq!(parsed.groups[0], vec!["état", "êtres"]);
        assert_eq!(parsed.expansion, 2);
    }

    #[test]
    fn expansion_saturates_instead_of_overflowing() {
        let group = format!("{{{}}}", vec!["o"; 64].join(","));
        // 11 groups of 64 options overflow u64; the count saturates.
        let template = vec![group; 11].join(" ");
        assert_eq!(expansion_count(&template).unwrap(), u64::MAX);
    }
}
