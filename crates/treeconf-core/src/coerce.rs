//! Typed access to stored values
//!
//! Values keep the type the YAML parser gave them. A request for the
//! same type returns the value as is; a string is parsed when a number or
//! boolean is requested; any scalar can be read as a string.

use crate::value::Value;

/// Conversion from a stored [`Value`] to a concrete Rust type
///
/// `from_value` returns `None` when the value cannot be represented as
/// `Self`; callers turn that into a type coercion error carrying the key.
pub trait FromValue: Sized {
    /// Name of the target type used in error messages
    fn type_name() -> String;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn type_name() -> String {
        "value".into()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for String {
    fn type_name() -> String {
        "string".into()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Sequence(_) | Value::Mapping(_) => None,
            scalar => Some(scalar.to_string()),
        }
    }
}

/// Only `true` and `false` are accepted, in any case
impl FromValue for bool {
    fn type_name() -> String {
        "boolean".into()
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

macro_rules! impl_from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn type_name() -> String {
                    stringify!($ty).into()
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Integer(i) => <$ty>::try_from(*i).ok(),
                        Value::String(s) => s.parse().ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

/// Plain decimal text: optional sign, digits, optional fractional digits
fn is_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && fraction.is_none_or(digits)
}

macro_rules! impl_from_value_float {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn type_name() -> String {
                    stringify!($ty).into()
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Float(f) => Some(*f as $ty),
                        Value::Integer(i) => Some(*i as $ty),
                        Value::String(s) if is_decimal(s) => s.parse().ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_value_float!(f32, f64);

/// Every element is converted; one failure fails the whole list.
/// A single scalar becomes a one-element list.
impl<T: FromValue> FromValue for Vec<T> {
    fn type_name() -> String {
        format!("list of {}", T::type_name())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Sequence(items) => items.iter().map(T::from_value).collect(),
            Value::Mapping(_) => None,
            scalar => T::from_value(scalar).map(|v| vec![v]),
        }
    }
}

/// Null reads as `None`
impl<T: FromValue> FromValue for Option<T> {
    fn type_name() -> String {
        format!("optional {}", T::type_name())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_integer_is_returned_unchanged() {
        assert_eq!(i64::from_value(&Value::Integer(37)), Some(37));
        assert_eq!(i32::from_value(&Value::Integer(37)), Some(37));
    }

    #[test]
    fn test_integer_from_string() {
        assert_eq!(i64::from_value(&Value::String("8080".into())), Some(8080));
        assert_eq!(i64::from_value(&Value::String("-12".into())), Some(-12));
        assert_eq!(i64::from_value(&Value::String("value1".into())), None);
        assert_eq!(i64::from_value(&Value::String("1.5".into())), None);
    }

    #[test]
    fn test_integer_range_checked() {
        assert_eq!(u8::from_value(&Value::Integer(255)), Some(255));
        assert_eq!(u8::from_value(&Value::Integer(256)), None);
        assert_eq!(u32::from_value(&Value::Integer(-1)), None);
    }

    #[test]
    fn test_float_never_narrows_to_integer() {
        assert_eq!(i64::from_value(&Value::Float(3.0)), None);
    }

    #[test]
    fn test_float_conversions() {
        assert_eq!(f64::from_value(&Value::Float(0.5)), Some(0.5));
        assert_eq!(f64::from_value(&Value::Integer(2)), Some(2.0));
        assert_eq!(f64::from_value(&Value::String("2.25".into())), Some(2.25));
        assert_eq!(f64::from_value(&Value::Bool(true)), None);
    }

    #[test]
    fn test_float_from_text_is_plain_decimal_only() {
        assert_eq!(f64::from_value(&Value::String("-12.5".into())), Some(-12.5));
        assert_eq!(f64::from_value(&Value::String("+3".into())), Some(3.0));
        for text in ["nan", "NaN", "inf", "infinity", "-inf", "1e3", "1.", ".5", "", "1_000"] {
            assert_eq!(f64::from_value(&Value::String(text.into())), None, "{}", text);
        }
    }

    #[test]
    fn test_string_accepts_any_scalar() {
        assert_eq!(String::from_value(&Value::Integer(37)), Some("37".into()));
        assert_eq!(String::from_value(&Value::Bool(false)), Some("false".into()));
        assert_eq!(String::from_value(&Value::Float(1.5)), Some("1.5".into()));
        assert_eq!(String::from_value(&Value::Null), Some("null".into()));
        assert_eq!(String::from_value(&Value::from(vec!["a"])), None);
    }

    #[test]
    fn test_strict_boolean_coercion() {
        assert_eq!(bool::from_value(&Value::Bool(true)), Some(true));
        assert_eq!(bool::from_value(&Value::String("TRUE".into())), Some(true));
        assert_eq!(bool::from_value(&Value::String("False".into())), Some(false));
        assert_eq!(bool::from_value(&Value::String("yes".into())), None);
        assert_eq!(bool::from_value(&Value::String("1".into())), None);
        assert_eq!(bool::from_value(&Value::Integer(1)), None);
    }

    #[test]
    fn test_list_elements_coerced_independently() {
        let seq = Value::Sequence(vec![Value::Integer(1), Value::String("2".into())]);
        assert_eq!(Vec::<i64>::from_value(&seq), Some(vec![1, 2]));

        let bad = Value::Sequence(vec![Value::Integer(1), Value::String("two".into())]);
        assert_eq!(Vec::<i64>::from_value(&bad), None);
    }

    #[test]
    fn test_scalar_as_single_element_list() {
        assert_eq!(
            Vec::<String>::from_value(&Value::String("only".into())),
            Some(vec!["only".to_string()])
        );
    }

    #[test]
    fn test_option_maps_null_to_none() {
        assert_eq!(Option::<i64>::from_value(&Value::Null), Some(None));
        assert_eq!(Option::<i64>::from_value(&Value::Integer(5)), Some(Some(5)));
        assert_eq!(Option::<i64>::from_value(&Value::String("x".into())), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(i64::type_name(), "i64");
        assert_eq!(Vec::<String>::type_name(), "list of string");
    }
}
