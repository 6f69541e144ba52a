mod error;
mod grammar;
mod lower;

use winnow::Parser;

pub use error::ParseError;

use crate::Rule;

/// Rules read from DSL text, in definition order.
#[derive(Debug)]
pub struct ParsedRuleSet {
    pub rules: Vec<Rule>,
}

/// Parse DSL text into rules.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid DSL syntax or a rule body
/// is not a known predicate with valid arguments.
pub fn parse(input: &str) -> Result<ParsedRuleSet, ParseError> {
    let defs = grammar::rule_defs.parse(input).map_err(|e| {
        let message = e.inner().to_string();
        let message = if message.is_empty() {
            "unexpected input".to_owned()
        } else {
            message
        };
        ParseError::at(input, e.offset(), message)
    })?;

    let rules = defs
        .into_iter()
        .map(|def| {
            let check = lower::check(&def.body).map_err(|message| {
                ParseError::at(
                    input,
                    input.len() - def.remaining,
                    format!("rule '{}': {message}", def.name),
                )
            })?;
            let rule = Rule::new(&def.name, check);
            Ok(match def.description {
                Some(description) => rule.with_description(description),
                None => rule,
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;
    Ok(ParsedRuleSet { rules })
}

/// Parse a single rule expression, such as a rule table cell.
pub(crate) fn parse_check(input: &str) -> Result<crate::Check, String> {
    let node = grammar::expression
        .parse(input)
        .map_err(|e| format!("at offset {}: {}", e.offset(), e.inner()))?;
    lower::check(&node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{in_range, not_missing, Check};

    #[test]
    fn parse_rules_in_order() {
        let parsed = parse(
            "# demographics\n\
             rule age_range \"Adults up to 95\":\n    inRange(age, 18, 95)\n\
             rule age_present: notMissing(age)\n",
        )
        .unwrap();
        assert_eq!(parsed.rules.len(), 2);
        assert_eq!(parsed.rules[0].name(), "age_range");
        assert_eq!(parsed.rules[0].description(), Some("Adults up to 95"));
        assert_eq!(parsed.rules[0].check(), &Check::from(in_range("age", 18, 95)));
        assert_eq!(parsed.rules[1].check(), &Check::from(not_missing("age")));
    }

    #[test]
    fn empty_input_has_no_rules() {
        assert!(parse("").unwrap().rules.is_empty());
        assert!(parse("  # only a comment\n").unwrap().rules.is_empty());
    }

    #[test]
    fn syntax_error_is_located() {
        let err = parse("rule a: notMissing(age)\nrule b notMissing(x)").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn vocabulary_error_points_at_rule() {
        let err = parse("rule a: notMissing(age)\n\n  rule b: isPrime(x)").unwrap_err();
        assert_eq!((err.line, err.column), (3, 3));
        assert_eq!(err.message, "rule 'b': unknown predicate 'isPrime'");
    }

    #[test]
    fn parse_check_reports_offset() {
        assert!(parse_check("inRange(age, 18, 95)").is_ok());
        let err = parse_check("inRange(age, 18").unwrap_err();
        assert!(err.starts_with("at offset"), "{err}");
    }
}
