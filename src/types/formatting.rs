use serde::{Deserialize, Serialize};

/// A conditional formatting block: a target range and its rules.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalFormatting {
    /// Space separated ranges like "A1:A10 C1:C10". `None` covers the whole sheet.
    #[serde(default)]
    pub sqref: Option<String>,
    /// Rules in document order.
    pub rules: Vec<CfRule>,
}

/// A single conditional formatting rule.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CfRule {
    /// Lower number = higher precedence.
    pub priority: i32,
    /// Differential format applied when the rule matches.
    #[serde(default)]
    pub dxf_id: Option<u32>,
    pub condition: CfCondition,
}

/// What a rule tests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CfCondition {
    /// Compare the cell against one or two formula literals.
    CellIs {
        operator: CfOperator,
        #[serde(default)]
        formulas: Vec<String>,
    },
    BeginsWith {
        text: String,
    },
    EndsWith {
        text: String,
    },
    ContainsText {
        text: String,
    },
    NotContainsText {
        text: String,
    },
    ContainsBlanks,
    NotContainsBlanks,
    /// Color scales, data bars, icon sets and the rest: never match here.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CfOperator {
    Equal,
    NotEqual,
    BeginsWith,
    EndsWith,
    #[serde(alias = "containsText")]
    Contains,
    #[serde(alias = "notContainsText")]
    NotContains,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Between,
    NotBetween,
}
