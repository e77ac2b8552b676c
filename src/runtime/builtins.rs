//! Built-in functions pre-bound in `global_scope` (spec.md §6).

use std::io::Write;

use crate::error::PolyscriptError;
use crate::position::Span;
use crate::runtime::value::Value;

/// `(name, param names)` for every built-in, in bootstrap order. Used both
/// to populate the global scope with `Value::BuiltIn` entries and to check
/// arity before [`call`] runs.
pub const BUILTIN_NAMES: &[(&str, &[&str])] = &[
    ("print", &["__input"]),
    ("clear", &[]),
    ("isInteger", &["__input"]),
    ("isFloat", &["__input"]),
    ("isString", &["__input"]),
    ("isList", &["__input"]),
    ("isFunction", &["__input"]),
    ("isEnum", &["__input"]),
    ("isNull", &["__input"]),
    ("length", &["__input"]),
];

/// Runs the built-in named `name` against already-evaluated `args`. The
/// caller has already checked arity against [`BUILTIN_NAMES`].
pub fn call(name: &str, args: Vec<Value>, span: &Span) -> Result<Value, PolyscriptError> {
    match name {
        "print" => {
            print!("{}", args[0].bare());
            let _ = std::io::stdout().flush();
            Ok(Value::Null)
        }
        "clear" => {
            print!("\x1B[2J\x1B[1;1H");
            let _ = std::io::stdout().flush();
            Ok(Value::Null)
        }
        "isInteger" => Ok(Value::bool(matches!(args[0], Value::Integer(_)))),
        "isFloat" => Ok(Value::bool(matches!(args[0], Value::Float(_)))),
        "isString" => Ok(Value::bool(matches!(args[0], Value::String(_)))),
        "isList" => Ok(Value::bool(matches!(args[0], Value::List(_)))),
        // Fixes a copy/paste bug in the original bootstrap, which bound
        // `isFunction` to the `print` implementation.
        "isFunction" => Ok(Value::bool(matches!(args[0], Value::Function { .. } | Value::BuiltIn { .. }))),
        "isEnum" => Ok(Value::bool(matches!(args[0], Value::Enum { .. } | Value::EnumValue { .. }))),
        "isNull" => Ok(Value::bool(matches!(args[0], Value::Null))),
        "length" => match &args[0] {
            Value::String(s) => Ok(Value::Integer(s.chars().count() as i64)),
            Value::List(items) => Ok(Value::Integer(items.borrow().len() as i64)),
            other => Err(PolyscriptError::runtime(
                format!("length: expected a String or List, got {}", other.type_name()),
                span.start.clone(),
                span.end.clone(),
            )),
        },
        other => unreachable!("'{other}' is not a registered built-in"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn span() -> Span {
        let p = Position::start("<test>");
        Span::point(p)
    }

    #[test]
    fn length_of_string_and_list() {
        assert!(matches!(call("length", vec![Value::String("abc".into())], &span()), Ok(Value::Integer(3))));
    }

    #[test]
    fn length_rejects_other_types() {
        assert!(call("length", vec![Value::Integer(1)], &span()).is_err());
    }

    #[test]
    fn is_function_is_not_the_print_bug() {
        assert!(matches!(
            call("isFunction", vec![Value::BuiltIn { name: "print".into(), params: vec!["__input".into()] }], &span()),
            Ok(Value::Integer(1))
        ));
        assert!(matches!(call("isFunction", vec![Value::Integer(1)], &span()), Ok(Value::Integer(0))));
    }
}
