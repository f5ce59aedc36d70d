//! Condition operators.
//!
//! Operators are tagged on the wire with the strings the rule DSL uses (`==`, `in`,
//! `is_null`, ...). Tags outside the supported set deserialize to
//! [`Operator::Unknown`], which every evaluation treats as false, and serialize back
//! to the original tag so a rule survives a round trip untouched.

/// A comparison operator in a rule condition.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// `==`: equality, with a relative tolerance when either side is numeric.
    Equal,
    /// `!=`: negation of `==`.
    NotEqual,
    /// `<`: strict less-than.
    LessThan,
    /// `<=`: less-than-or-equal.
    LessThanOrEqual,
    /// `>`: strict greater-than.
    GreaterThan,
    /// `>=`: greater-than-or-equal.
    GreaterThanOrEqual,
    /// `in`: membership of the resolved value in the condition value.
    In,
    /// `not_in`: negated membership.
    NotIn,
    /// `is_null`: the resolved value is absent, null, or the empty string.
    IsNull,
    /// `is_not_null`: the resolved value is present and not the empty string.
    IsNotNull,
    /// Any unrecognized tag, preserved verbatim. Always evaluates false.
    Unknown(String),
}

impl Operator {
    /// Parse a wire tag. Unrecognized tags become [`Operator::Unknown`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "<" => Self::LessThan,
            "<=" => Self::LessThanOrEqual,
            ">" => Self::GreaterThan,
            ">=" => Self::GreaterThanOrEqual,
            "in" => Self::In,
            "not_in" => Self::NotIn,
            "is_null" => Self::IsNull,
            "is_not_null" => Self::IsNotNull,
            _ => Self::Unknown(tag.to_string()),
        }
    }

    /// The wire tag for this operator.
    pub fn as_tag(&self) -> &str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
            Self::Unknown(tag) => tag,
        }
    }
}

impl Default for Operator {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl serde::Serialize for Operator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> serde::Deserialize<'de> for Operator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
