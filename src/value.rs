use std::fmt;

/// A literal value as it appears in source: the payload of `Literal` nodes
/// and of literal tokens.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(n1), Self::Number(n2)) => n1 == n2,
            (Self::Str(s1), Self::Str(s2)) => s1 == s2,
            (Self::Bool(b1), Self::Bool(b2)) => b1 == b2,
            (Self::Nil, Self::Nil) => true,
            _ => false,
        }
    }
}
// Numbers hash by variant only, so 0.0 and -0.0 land in the same bucket.
impl Eq for Value {}
impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Str(s) => s.hash(state),
            Self::Nil | Self::Number(_) => (),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_lox() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::from(42.0).to_string(), "42");
        assert_eq!(Value::from(45.67).to_string(), "45.67");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::from(1.0), Value::Number(1.0));
        assert_ne!(Value::from(1.0), Value::from("1"));
        assert_ne!(Value::Nil, Value::from(false));
    }
}
