use std::fmt::{self, Display};

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Bool(bool),
    Nil,
    Number(f64),
    String(String),
}

impl Value {
    /// Values of different variants are never equal, and numbers compare as
    /// IEEE 754 doubles, so `NaN` is not equal to itself.
    pub fn is_equal(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Nil, Nil) => true,
            (Bool(s), Bool(o)) => s == o,
            (Number(s), Number(o)) => s == o,
            (String(s), String(o)) => s == o,
            _ => false,
        }
    }

    pub fn is_truthy(&self) -> bool {
        use Value::*;
        match self {
            Bool(false) | Nil => false,
            _ => true,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::Number(_) => "number",
            Value::String(_) => "string",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Value::*;
        match self {
            Bool(b) => write!(f, "{}", b),
            Nil => write!(f, "nil"),
            Number(n) => fmt_number(*n, f),
            String(s) => write!(f, "{}", s),
        }
    }
}

/// Shortest round-tripping digits. Decimal exponents below -4 or from 21 up
/// switch to `1.5e+21` form, with at least two exponent digits.
fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        return write!(f, "NaN");
    }
    if n.is_infinite() {
        return write!(f, "{}Inf", if n > 0.0 { '+' } else { '-' });
    }

    let scientific = format!("{:e}", n);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return write!(f, "{}", n),
    };

    if n != 0.0 && (exponent < -4 || exponent >= 21) {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        write!(f, "{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_and_false_are_the_only_falsy_values() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::String("".into()).is_truthy());
    }

    #[test]
    fn different_variants_are_never_equal() {
        assert!(!Value::Nil.is_equal(&Value::Bool(false)));
        assert!(!Value::Number(1.0).is_equal(&Value::String("1".into())));
        assert!(!Value::String("".into()).is_equal(&Value::Nil));
    }

    #[test]
    fn nan_is_not_equal_to_itself() {
        let nan = Value::Number(f64::NAN);
        assert!(!nan.is_equal(&nan));
    }

    #[test]
    fn whole_numbers_display_without_a_fraction() {
        assert_eq!("3", Value::Number(3.0).to_string());
        assert_eq!("2.5", Value::Number(2.5).to_string());
        assert_eq!("-45", Value::Number(-45.0).to_string());
    }

    #[test]
    fn very_large_and_small_numbers_use_exponents() {
        assert_eq!("1e+21", Value::Number(1e21).to_string());
        assert_eq!("-1.5e+300", Value::Number(-1.5e300).to_string());
        assert_eq!("1e-05", Value::Number(0.00001).to_string());
        assert_eq!("1.25e-07", Value::Number(1.25e-7).to_string());
    }

    #[test]
    fn numbers_near_the_exponent_cutoff_stay_decimal() {
        assert_eq!("100000000000000000000", Value::Number(1e20).to_string());
        assert_eq!("0.0001", Value::Number(0.0001).to_string());
        assert_eq!("0", Value::Number(0.0).to_string());
    }

    #[test]
    fn non_finite_numbers() {
        assert_eq!("+Inf", Value::Number(f64::INFINITY).to_string());
        assert_eq!("-Inf", Value::Number(f64::NEG_INFINITY).to_string());
        assert_eq!("NaN", Value::Number(f64::NAN).to_string());
    }
}
