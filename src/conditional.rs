//! Conditional formatting evaluation
//!
//! Picks the differential format (dxf) that applies to a cell. Blocks whose
//! range covers the cell are visited in document order, rules within a block
//! in document order. Matching rules fold into a running minimum over
//! priority: a rule replaces the current pick when its priority is less than
//! or equal to it, so ties go to the later rule.

use crate::cell_ref::{parse_sqref, CellRange};
use crate::types::{CfCondition, CfOperator, CfRule, ConditionalFormatting};

/// What a rule gets to see of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSubject<'a> {
    /// Numeric value, for numeric cells only.
    pub number: Option<f64>,
    /// Raw cell text (shared strings already looked up).
    pub text: &'a str,
}

impl<'a> CellSubject<'a> {
    pub const fn new(number: Option<f64>, text: &'a str) -> Self {
        Self { number, text }
    }

    pub const fn empty() -> Self {
        Self {
            number: None,
            text: "",
        }
    }

    fn is_blank(&self) -> bool {
        self.number.is_none() && self.text.trim().is_empty()
    }
}

/// A rule operand, as written in the rule's formula.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Number(f64),
    Text(String),
}

impl Operand {
    fn parse(formula: &str) -> Self {
        let formula = formula.trim();
        if let Some(inner) = formula
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            return Self::Text(inner.replace("\"\"", "\""));
        }
        formula
            .parse::<f64>()
            .map_or_else(|_| Self::Text(formula.to_string()), Self::Number)
    }

    fn text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    fn number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

/// Conditional formatting block with its ranges parsed up front.
#[derive(Debug)]
struct PreparedBlock<'a> {
    /// `None` covers the whole sheet.
    ranges: Option<Vec<CellRange>>,
    rules: &'a [CfRule],
}

impl PreparedBlock<'_> {
    fn covers(&self, col: u32, row: u32) -> bool {
        self.ranges
            .as_ref()
            .is_none_or(|ranges| ranges.iter().any(|r| r.contains(col, row)))
    }
}

/// Conditional rules of one sheet.
#[derive(Debug, Default)]
pub struct ConditionalEvaluator<'a> {
    blocks: Vec<PreparedBlock<'a>>,
}

impl<'a> ConditionalEvaluator<'a> {
    pub fn new(blocks: &'a [ConditionalFormatting]) -> Self {
        Self {
            blocks: blocks
                .iter()
                .map(|cf| PreparedBlock {
                    ranges: cf.sqref.as_deref().map(parse_sqref),
                    rules: &cf.rules,
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The dxf id of the winning rule for the cell at `(col, row)`.
    pub fn select(&self, col: u32, row: u32, subject: &CellSubject<'_>) -> Option<u32> {
        let mut lowest: Option<i32> = None;
        let mut selected = None;

        for block in self.blocks.iter().filter(|b| b.covers(col, row)) {
            for rule in block.rules {
                if !rule_matches(&rule.condition, subject) {
                    continue;
                }
                if lowest.is_none_or(|min| rule.priority <= min) {
                    lowest = Some(rule.priority);
                    selected = rule.dxf_id;
                }
            }
        }
        selected
    }
}

/// Test one condition against a cell.
pub fn rule_matches(condition: &CfCondition, subject: &CellSubject<'_>) -> bool {
    match condition {
        CfCondition::CellIs { operator, formulas } => cell_is(*operator, formulas, subject),
        CfCondition::BeginsWith { text } => contains_ci(subject.text, text, Position::Start),
        CfCondition::EndsWith { text } => contains_ci(subject.text, text, Position::End),
        CfCondition::ContainsText { text } => contains_ci(subject.text, text, Position::Anywhere),
        CfCondition::NotContainsText { text } => {
            !contains_ci(subject.text, text, Position::Anywhere)
        }
        CfCondition::ContainsBlanks => subject.is_blank(),
        CfCondition::NotContainsBlanks => !subject.is_blank(),
        CfCondition::Unsupported => false,
    }
}

fn cell_is(operator: CfOperator, formulas: &[String], subject: &CellSubject<'_>) -> bool {
    let operands: Vec<Operand> = formulas.iter().map(|f| Operand::parse(f)).collect();
    let Some(first) = operands.first() else {
        log::trace!("cellIs rule without operands");
        return false;
    };

    match operator {
        CfOperator::Equal => equals(first, subject),
        CfOperator::NotEqual => !equals(first, subject),
        CfOperator::BeginsWith => contains_ci(subject.text, &first.text(), Position::Start),
        CfOperator::EndsWith => contains_ci(subject.text, &first.text(), Position::End),
        CfOperator::Contains => contains_ci(subject.text, &first.text(), Position::Anywhere),
        CfOperator::NotContains => !contains_ci(subject.text, &first.text(), Position::Anywhere),
        CfOperator::GreaterThan => compare(first, subject, |v, x| v > x),
        CfOperator::GreaterThanOrEqual => compare(first, subject, |v, x| v >= x),
        CfOperator::LessThan => compare(first, subject, |v, x| v < x),
        CfOperator::LessThanOrEqual => compare(first, subject, |v, x| v <= x),
        CfOperator::Between => between(&operands, subject).unwrap_or(false),
        CfOperator::NotBetween => between(&operands, subject).is_some_and(|inside| !inside),
    }
}

fn equals(operand: &Operand, subject: &CellSubject<'_>) -> bool {
    match (operand, subject.number) {
        (Operand::Number(x), Some(v)) => (v - x).abs() < f64::EPSILON,
        (Operand::Number(_), None) => false,
        (Operand::Text(s), _) => subject.text.trim().eq_ignore_ascii_case(s),
    }
}

fn compare(operand: &Operand, subject: &CellSubject<'_>, op: impl Fn(f64, f64) -> bool) -> bool {
    match (subject.number, operand.number()) {
        (Some(v), Some(x)) => op(v, x),
        (_, None) => {
            log::trace!("non-numeric operand {operand:?}");
            false
        }
        (None, Some(_)) => false,
    }
}

/// `Some(inside)` when both bounds and the cell are numeric.
fn between(operands: &[Operand], subject: &CellSubject<'_>) -> Option<bool> {
    let (Some(a), Some(b)) = (
        operands.first().and_then(Operand::number),
        operands.get(1).and_then(Operand::number),
    ) else {
        log::trace!("between rule needs two numeric operands, got {operands:?}");
        return None;
    };
    let value = subject.number?;
    Some(value >= a.min(b) && value <= a.max(b))
}

#[derive(Clone, Copy)]
enum Position {
    Start,
    End,
    Anywhere,
}

fn contains_ci(haystack: &str, needle: &str, position: Position) -> bool {
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    match position {
        Position::Start => haystack.starts_with(&needle),
        Position::End => haystack.ends_with(&needle),
        Position::Anywhere => haystack.contains(&needle),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn cell_is_rule(priority: i32, dxf: u32, operator: CfOperator, formulas: &[&str]) -> CfRule {
        CfRule {
            priority,
            dxf_id: Some(dxf),
            condition: CfCondition::CellIs {
                operator,
                formulas: formulas.iter().map(ToString::to_string).collect(),
            },
        }
    }

    fn num(v: f64) -> CellSubject<'static> {
        CellSubject::new(Some(v), "")
    }

    #[test]
    fn test_operand_parsing() {
        assert_eq!(Operand::parse(" 10 "), Operand::Number(10.0));
        assert_eq!(Operand::parse("\"a\"\"b\""), Operand::Text("a\"b".to_string()));
        assert_eq!(Operand::parse("\"5\""), Operand::Text("5".to_string()));
        assert_eq!(Operand::parse("$A$1"), Operand::Text("$A$1".to_string()));
    }

    #[test]
    fn test_numeric_operators() {
        let gt = CfCondition::CellIs {
            operator: CfOperator::GreaterThan,
            formulas: vec!["5".to_string()],
        };
        assert!(rule_matches(&gt, &num(6.0)));
        assert!(!rule_matches(&gt, &num(5.0)));
        assert!(!rule_matches(&gt, &CellSubject::new(None, "6")));

        let between = CfCondition::CellIs {
            operator: CfOperator::Between,
            formulas: vec!["10".to_string(), "1".to_string()],
        };
        assert!(rule_matches(&between, &num(1.0)));
        assert!(rule_matches(&between, &num(10.0)));
        assert!(!rule_matches(&between, &num(11.0)));

        let not_between = CfCondition::CellIs {
            operator: CfOperator::NotBetween,
            formulas: vec!["1".to_string(), "10".to_string()],
        };
        assert!(rule_matches(&not_between, &num(11.0)));
        assert!(!rule_matches(&not_between, &num(5.0)));
    }

    #[test]
    fn test_unparseable_operand_never_matches() {
        for operator in [CfOperator::LessThan, CfOperator::Between, CfOperator::NotBetween] {
            let cond = CfCondition::CellIs {
                operator,
                formulas: vec!["abc".to_string(), "def".to_string()],
            };
            assert!(!rule_matches(&cond, &num(1.0)), "{operator:?}");
        }
        let empty = CfCondition::CellIs {
            operator: CfOperator::Equal,
            formulas: Vec::new(),
        };
        assert!(!rule_matches(&empty, &num(1.0)));
    }

    #[test]
    fn test_text_operators() {
        let subject = CellSubject::new(None, "Overdue invoice");
        let eq = CfCondition::CellIs {
            operator: CfOperator::Equal,
            formulas: vec!["\"overdue invoice\"".to_string()],
        };
        assert!(rule_matches(&eq, &subject));
        assert!(rule_matches(
            &CfCondition::BeginsWith {
                text: "over".to_string()
            },
            &subject
        ));
        assert!(rule_matches(
            &CfCondition::NotContainsText {
                text: "paid".to_string()
            },
            &subject
        ));
        assert!(!rule_matches(
            &CfCondition::EndsWith {
                text: "over".to_string()
            },
            &subject
        ));
    }

    #[test]
    fn test_blanks() {
        assert!(rule_matches(&CfCondition::ContainsBlanks, &CellSubject::new(None, "  ")));
        assert!(rule_matches(&CfCondition::NotContainsBlanks, &num(0.0)));
        assert!(!rule_matches(&CfCondition::Unsupported, &CellSubject::empty()));
    }

    #[test]
    fn test_lowest_priority_wins() {
        let blocks = vec![ConditionalFormatting {
            sqref: Some("A1:A10".to_string()),
            rules: vec![
                cell_is_rule(2, 20, CfOperator::GreaterThan, &["0"]),
                cell_is_rule(1, 10, CfOperator::GreaterThan, &["0"]),
            ],
        }];
        let eval = ConditionalEvaluator::new(&blocks);
        assert_eq!(eval.select(0, 3, &num(5.0)), Some(10));
        assert_eq!(eval.select(1, 3, &num(5.0)), None);
    }

    #[test]
    fn test_tie_goes_to_later_rule() {
        let blocks = vec![
            ConditionalFormatting {
                sqref: None,
                rules: vec![cell_is_rule(1, 1, CfOperator::Equal, &["5"])],
            },
            ConditionalFormatting {
                sqref: Some("B2".to_string()),
                rules: vec![cell_is_rule(1, 2, CfOperator::Equal, &["5"])],
            },
        ];
        let eval = ConditionalEvaluator::new(&blocks);
        assert_eq!(eval.select(1, 1, &num(5.0)), Some(2));
        assert_eq!(eval.select(7, 7, &num(5.0)), Some(1));
    }

    #[test]
    fn test_running_minimum_over_interleaved_priorities() {
        let blocks = vec![ConditionalFormatting {
            sqref: None,
            rules: vec![
                cell_is_rule(3, 30, CfOperator::GreaterThan, &["0"]),
                cell_is_rule(1, 10, CfOperator::GreaterThan, &["0"]),
                cell_is_rule(2, 20, CfOperator::GreaterThan, &["0"]),
                cell_is_rule(1, 11, CfOperator::GreaterThan, &["0"]),
                cell_is_rule(1, 12, CfOperator::LessThan, &["0"]),
            ],
        }];
        let eval = ConditionalEvaluator::new(&blocks);
        assert_eq!(eval.select(0, 0, &num(5.0)), Some(11));
    }

    #[test]
    fn test_multi_range_sqref() {
        let blocks = vec![ConditionalFormatting {
            sqref: Some("A1:A2 C1:C2".to_string()),
            rules: vec![CfRule {
                priority: 1,
                dxf_id: Some(0),
                condition: CfCondition::NotContainsBlanks,
            }],
        }];
        let eval = ConditionalEvaluator::new(&blocks);
        assert_eq!(eval.select(2, 1, &num(1.0)), Some(0));
        assert_eq!(eval.select(1, 1, &num(1.0)), None);
    }
}
