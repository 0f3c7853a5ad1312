//! Query conditions.
//!
//! A [`Where`] is one filter clause of a collection query: a field, an
//! operator, the conjunction joining it to the previous clause, and a value.

use crate::field::FieldType;
use netric_types::wire::{as_object, opt_string, pick};
use netric_types::{Error, Result, display_value};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

/// How a condition joins the conditions before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BLogic {
    #[default]
    And,
    Or,
}

impl BLogic {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for BLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BLogic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            other => Err(Error::InvalidData(format!("unknown conjunction: {other}"))),
        }
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    IsEqual,
    IsNotEqual,
    BeginsWith,
    Contains,
    IsGreater,
    IsGreaterOrEqual,
    IsLess,
    IsLessOrEqual,
    DayIsEqual,
    MonthIsEqual,
    YearIsEqual,
    LastXDays,
    LastXWeeks,
    LastXMonths,
    LastXYears,
    NextXDays,
    NextXWeeks,
    NextXMonths,
    NextXYears,
}

impl Operator {
    pub const ALL: [Operator; 19] = [
        Self::IsEqual,
        Self::IsNotEqual,
        Self::BeginsWith,
        Self::Contains,
        Self::IsGreater,
        Self::IsGreaterOrEqual,
        Self::IsLess,
        Self::IsLessOrEqual,
        Self::DayIsEqual,
        Self::MonthIsEqual,
        Self::YearIsEqual,
        Self::LastXDays,
        Self::LastXWeeks,
        Self::LastXMonths,
        Self::LastXYears,
        Self::NextXDays,
        Self::NextXWeeks,
        Self::NextXMonths,
        Self::NextXYears,
    ];

    /// The wire spelling, e.g. `is_greater_or_equal`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IsEqual => "is_equal",
            Self::IsNotEqual => "is_not_equal",
            Self::BeginsWith => "begins_with",
            Self::Contains => "contains",
            Self::IsGreater => "is_greater",
            Self::IsGreaterOrEqual => "is_greater_or_equal",
            Self::IsLess => "is_less",
            Self::IsLessOrEqual => "is_less_or_equal",
            Self::DayIsEqual => "day_is_equal",
            Self::MonthIsEqual => "month_is_equal",
            Self::YearIsEqual => "year_is_equal",
            Self::LastXDays => "last_x_days",
            Self::LastXWeeks => "last_x_weeks",
            Self::LastXMonths => "last_x_months",
            Self::LastXYears => "last_x_years",
            Self::NextXDays => "next_x_days",
            Self::NextXWeeks => "next_x_weeks",
            Self::NextXMonths => "next_x_months",
            Self::NextXYears => "next_x_years",
        }
    }

    /// The label shown in condition pickers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::IsEqual => "is equal to",
            Self::IsNotEqual => "is not equal to",
            Self::BeginsWith => "begins with",
            Self::Contains => "contains",
            Self::IsGreater => "is greater than",
            Self::IsGreaterOrEqual => "is greater than or equal to",
            Self::IsLess => "is less than",
            Self::IsLessOrEqual => "is less than or equal to",
            Self::DayIsEqual => "day is equal to",
            Self::MonthIsEqual => "month is equal to",
            Self::YearIsEqual => "year is equal to",
            Self::LastXDays => "within last (x) days",
            Self::LastXWeeks => "within last (x) weeks",
            Self::LastXMonths => "within last (x) months",
            Self::LastXYears => "within last (x) years",
            Self::NextXDays => "within next (x) days",
            Self::NextXWeeks => "within next (x) weeks",
            Self::NextXMonths => "within next (x) months",
            Self::NextXYears => "within next (x) years",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::InvalidOperator(s.to_string()))
    }
}

const EQUALITY: &[Operator] = &[Operator::IsEqual, Operator::IsNotEqual];

const RELATIONAL: &[Operator] = &[
    Operator::IsGreater,
    Operator::IsLess,
    Operator::IsGreaterOrEqual,
    Operator::IsLessOrEqual,
];

const DATE_BUCKETS: &[Operator] = &[
    Operator::DayIsEqual,
    Operator::MonthIsEqual,
    Operator::YearIsEqual,
    Operator::LastXDays,
    Operator::LastXWeeks,
    Operator::LastXMonths,
    Operator::LastXYears,
    Operator::NextXDays,
    Operator::NextXWeeks,
    Operator::NextXMonths,
    Operator::NextXYears,
];

const REFERENCE_OPERATORS: &[&[Operator]] = &[EQUALITY];
const NUMERIC_OPERATORS: &[&[Operator]] = &[EQUALITY, RELATIONAL, &[Operator::BeginsWith]];
const TEMPORAL_OPERATORS: &[&[Operator]] = &[EQUALITY, RELATIONAL, DATE_BUCKETS];
const TEXT_OPERATORS: &[&[Operator]] = &[EQUALITY, &[Operator::Contains, Operator::BeginsWith]];

/// A single filter condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Where {
    pub field_name: String,
    /// `None` until one of the operator setters is called.
    pub operator: Option<Operator>,
    pub b_logic: BLogic,
    pub value: Value,
}

impl Where {
    /// Creates an `and` condition on `field_name` with no operator yet.
    #[must_use]
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            operator: None,
            b_logic: BLogic::And,
            value: Value::Null,
        }
    }

    /// Creates a condition joined with `b_logic`.
    #[must_use]
    pub fn with_logic(field_name: impl Into<String>, b_logic: BLogic) -> Self {
        Self {
            b_logic,
            ..Self::new(field_name)
        }
    }

    fn set(&mut self, operator: Operator, value: impl Into<Value>) -> &mut Self {
        self.operator = Some(operator);
        self.value = value.into();
        self
    }

    pub fn equal_to(&mut self, value: impl Into<Value>) -> &mut Self {
        self.set(Operator::IsEqual, value)
    }

    pub fn does_not_equal(&mut self, value: impl Into<Value>) -> &mut Self {
        self.set(Operator::IsNotEqual, value)
    }

    /// Matches values beginning with `value`.
    pub fn like(&mut self, value: impl Into<Value>) -> &mut Self {
        self.set(Operator::BeginsWith, value)
    }

    pub fn contains(&mut self, value: impl Into<Value>) -> &mut Self {
        self.set(Operator::Contains, value)
    }

    pub fn is_greater_than(&mut self, value: impl Into<Value>) -> &mut Self {
        self.set(Operator::IsGreater, value)
    }

    pub fn is_greater_or_equal_to(&mut self, value: impl Into<Value>) -> &mut Self {
        self.set(Operator::IsGreaterOrEqual, value)
    }

    pub fn is_less_than(&mut self, value: impl Into<Value>) -> &mut Self {
        self.set(Operator::IsLess, value)
    }

    pub fn is_less_or_equal_to(&mut self, value: impl Into<Value>) -> &mut Self {
        self.set(Operator::IsLessOrEqual, value)
    }

    /// The operator's wire spelling, or `""` when unset.
    #[must_use]
    pub fn operator_str(&self) -> &'static str {
        self.operator.map_or("", Operator::as_str)
    }

    /// Returns the operators offered for a field type, with display labels.
    #[must_use]
    pub fn get_operators_for_field_type(field_type: FieldType) -> Vec<(Operator, &'static str)> {
        let groups = match field_type {
            FieldType::Fkey
            | FieldType::FkeyMulti
            | FieldType::Object
            | FieldType::ObjectMulti
            | FieldType::Bool => REFERENCE_OPERATORS,
            FieldType::Number | FieldType::Integer => NUMERIC_OPERATORS,
            FieldType::Date | FieldType::Timestamp => TEMPORAL_OPERATORS,
            _ => TEXT_OPERATORS,
        };

        groups
            .iter()
            .flat_map(|group| group.iter())
            .map(|op| (*op, op.label()))
            .collect()
    }

    /// Renders e.g. `and status is equal 2`.
    #[must_use]
    pub fn get_human_desc(&self, hide_blogic: bool) -> String {
        let operator = self.operator_str().replace('_', " ");
        let value = display_value(&self.value);

        let mut parts: Vec<&str> = Vec::with_capacity(4);
        if !hide_blogic {
            parts.push(self.b_logic.as_str());
        }
        parts.push(&self.field_name);
        if !operator.is_empty() {
            parts.push(&operator);
        }
        parts.push(&value);
        parts.join(" ")
    }

    /// Serializes to `{blogic, field_name, operator, value}`.
    #[must_use]
    pub fn to_data(&self) -> Value {
        json!({
            "blogic": self.b_logic.as_str(),
            "field_name": self.field_name,
            "operator": self.operator_str(),
            "value": self.value,
        })
    }

    /// Parses the wire shape. `fieldName`/`field` and `bLogic` are also accepted.
    pub fn from_data(data: &Value) -> Result<Self> {
        let map = as_object(data, "condition")?;

        let field_name = pick(map, &["field_name", "fieldName", "field"])
            .and_then(opt_string)
            .unwrap_or_default();

        let b_logic = match pick(map, &["blogic", "bLogic"]).and_then(Value::as_str) {
            Some(s) => s.parse()?,
            None => BLogic::And,
        };

        let operator = match pick(map, &["operator"]).and_then(Value::as_str) {
            Some("") | None => None,
            Some(s) => Some(s.parse()?),
        };

        let value = map.get("value").cloned().unwrap_or(Value::Null);

        Ok(Self {
            field_name,
            operator,
            b_logic,
            value,
        })
    }
}
