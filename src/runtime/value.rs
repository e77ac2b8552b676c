//! The closed set of runtime values, and the arithmetic/comparison dispatch
//! table over them (spec.md §4.3).

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::PolyscriptError;
use crate::lang::ast::Node;
use crate::lang::token::TokenKind;
use crate::position::Span;
use crate::runtime::context::Context;

/// A handle to a function's defining context.
///
/// Ordinarily strong: the closure keeps its scope alive. A named function
/// declaration binds itself into the very context it captures, which would
/// otherwise form an uncollectable `Rc` cycle (context → binding → function
/// → same context); that one case downgrades to `Weak` instead, per the
/// closure/context design note.
#[derive(Clone)]
pub enum ContextHandle {
    Strong(Rc<RefCell<Context>>),
    Weak(Weak<RefCell<Context>>),
}

impl ContextHandle {
    pub fn upgrade(&self) -> Option<Rc<RefCell<Context>>> {
        match self {
            ContextHandle::Strong(rc) => Some(rc.clone()),
            ContextHandle::Weak(weak) => weak.upgrade(),
        }
    }
}

#[derive(Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    String(String),
    List(Rc<RefCell<Vec<Value>>>),
    Function {
        name: Option<String>,
        params: Vec<String>,
        body: Rc<Node>,
        defining_context: ContextHandle,
    },
    BuiltIn {
        name: String,
        params: Vec<String>,
    },
    Enum {
        name: String,
        members: Rc<Vec<String>>,
    },
    EnumValue {
        enum_name: String,
        member: String,
        index: i64,
    },
    Namespace {
        name: String,
        context: Rc<RefCell<Context>>,
    },
    Object {
        name: String,
        context: Rc<RefCell<Context>>,
        /// `Some(body)` on the blueprint bound by an `object` declaration;
        /// `None` on an instance produced by `new`.
        blueprint_body: Option<Rc<Node>>,
    },
}

impl Value {
    pub fn bool(b: bool) -> Value {
        Value::Integer(if b { 1 } else { 0 })
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Integer(v) => *v != 0,
            Value::Float(v) => *v != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Function { .. } => "Function",
            Value::BuiltIn { .. } => "Function",
            Value::Enum { .. } => "Enum",
            Value::EnumValue { .. } => "EnumValue",
            Value::Namespace { .. } => "Namespace",
            Value::Object { .. } => "Object",
        }
    }

    /// The top-level `print`/REPL form: strings render unquoted. Everything
    /// else matches [`fmt::Display`].
    pub fn bare(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{}", format_float(*v)),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Function { name: Some(n), .. } => write!(f, "<function {n}>"),
            Value::Function { name: None, .. } => write!(f, "<anonymous function>"),
            Value::BuiltIn { name, .. } => write!(f, "<function {name}>"),
            Value::Enum { name, .. } => write!(f, "<enum {name}>"),
            Value::EnumValue { enum_name, member, .. } => write!(f, "{enum_name}.{member}"),
            Value::Namespace { name, .. } => write!(f, "<namespace {name}>"),
            Value::Object { name, .. } => write!(f, "<object {name}>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Integer(v) => write!(f, "Integer({v})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::String(v) => write!(f, "String({v:?})"),
            Value::List(v) => write!(f, "List(len={})", v.borrow().len()),
            Value::Function { name, .. } => write!(f, "Function({name:?})"),
            Value::BuiltIn { name, .. } => write!(f, "BuiltIn({name})"),
            Value::Enum { name, .. } => write!(f, "Enum({name})"),
            Value::EnumValue { enum_name, member, .. } => write!(f, "EnumValue({enum_name}.{member})"),
            Value::Namespace { name, .. } => write!(f, "Namespace({name})"),
            Value::Object { name, .. } => write!(f, "Object({name})"),
        }
    }
}

/// Shortest round-trip decimal, with a guaranteed `.0`/`.`-bearing form so a
/// whole-valued `Float` never prints identically to an `Integer`.
fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let s = format!("{v}");
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{s}.0")
    }
}

fn type_error(span: &Span) -> PolyscriptError {
    PolyscriptError::runtime("Invalid operation", span.start.clone(), span.end.clone())
}

fn division_by_zero(span: &Span) -> PolyscriptError {
    PolyscriptError::runtime("Division by zero", span.start.clone(), span.end.clone())
}

/// Deep, cross-type equality used by `==`/`!=`. Undefined combinations (e.g.
/// `List == Function`) are simply unequal, never an error (spec.md §4.3).
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::Integer(x), Value::Float(y)) | (Value::Float(y), Value::Integer(x)) => *x as f64 == *y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::List(x), Value::List(y)) => {
            let xb = x.borrow();
            let yb = y.borrow();
            xb.len() == yb.len() && xb.iter().zip(yb.iter()).all(|(l, r)| values_equal(l, r))
        }
        (Value::EnumValue { enum_name: e1, member: m1, .. }, Value::EnumValue { enum_name: e2, member: m2, .. }) => {
            e1 == e2 && m1 == m2
        }
        (Value::Enum { name: n1, .. }, Value::Enum { name: n2, .. }) => n1 == n2,
        (Value::Function { name: n1, .. }, Value::Function { name: n2, .. }) => n1 == n2,
        (Value::BuiltIn { name: n1, .. }, Value::BuiltIn { name: n2, .. }) => n1 == n2,
        (Value::Namespace { context: c1, .. }, Value::Namespace { context: c2, .. }) => Rc::ptr_eq(c1, c2),
        (Value::Object { context: c1, .. }, Value::Object { context: c2, .. }) => Rc::ptr_eq(c1, c2),
        _ => false,
    }
}

/// Dispatches a binary operator token to its value-level semantics.
/// `and`/`or` are short-circuited by the evaluator before either operand
/// reaches here and never appear as `op`.
pub fn binary_op(op: &TokenKind, left: Value, right: Value, span: &Span) -> Result<Value, PolyscriptError> {
    match op {
        TokenKind::Plus => add(left, right, span),
        TokenKind::Minus => sub(left, right, span),
        TokenKind::Mul => mul(left, right, span),
        TokenKind::Div => div(left, right, span),
        TokenKind::Mod => rem(left, right, span),
        TokenKind::Pow => pow(left, right, span),
        TokenKind::Ee => Ok(Value::bool(values_equal(&left, &right))),
        TokenKind::Ne => Ok(Value::bool(!values_equal(&left, &right))),
        TokenKind::Lt | TokenKind::Gt | TokenKind::Lte | TokenKind::Gte => compare(op, left, right, span),
        _ => Err(type_error(span)),
    }
}

fn add(left: Value, right: Value, span: &Span) -> Result<Value, PolyscriptError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
        (Value::Integer(a), Value::Float(b)) => Ok(Value::Float(a as f64 + b)),
        (Value::Float(a), Value::Integer(b)) => Ok(Value::Float(a + b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
        (Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::List(Rc::new(RefCell::new(items))))
        }
        (Value::List(a), other) => {
            let mut items = a.borrow().clone();
            items.push(other);
            Ok(Value::List(Rc::new(RefCell::new(items))))
        }
        _ => Err(type_error(span)),
    }
}

fn sub(left: Value, right: Value, span: &Span) -> Result<Value, PolyscriptError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a - b)),
        (Value::Integer(a), Value::Float(b)) => Ok(Value::Float(a as f64 - b)),
        (Value::Float(a), Value::Integer(b)) => Ok(Value::Float(a - b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
        _ => Err(type_error(span)),
    }
}

fn mul(left: Value, right: Value, span: &Span) -> Result<Value, PolyscriptError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a * b)),
        (Value::Integer(a), Value::Float(b)) => Ok(Value::Float(a as f64 * b)),
        (Value::Float(a), Value::Integer(b)) => Ok(Value::Float(a * b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
        (Value::List(a), Value::Integer(n)) | (Value::Integer(n), Value::List(a)) => {
            if n < 0 {
                return Err(PolyscriptError::runtime(
                    "cannot repeat a list a negative number of times",
                    span.start.clone(),
                    span.end.clone(),
                ));
            }
            let base = a.borrow().clone();
            let mut items = Vec::with_capacity(base.len() * n as usize);
            for _ in 0..n {
                items.extend(base.iter().cloned());
            }
            Ok(Value::List(Rc::new(RefCell::new(items))))
        }
        _ => Err(type_error(span)),
    }
}

fn div(left: Value, right: Value, span: &Span) -> Result<Value, PolyscriptError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            if b == 0 {
                return Err(division_by_zero(span));
            }
            if a % b == 0 {
                Ok(Value::Integer(a / b))
            } else {
                Ok(Value::Float(a as f64 / b as f64))
            }
        }
        (Value::Integer(a), Value::Float(b)) => {
            if b == 0.0 {
                return Err(division_by_zero(span));
            }
            Ok(Value::Float(a as f64 / b))
        }
        (Value::Float(a), Value::Integer(b)) => {
            if b == 0 {
                return Err(division_by_zero(span));
            }
            Ok(Value::Float(a / b as f64))
        }
        (Value::Float(a), Value::Float(b)) => {
            if b == 0.0 {
                return Err(division_by_zero(span));
            }
            Ok(Value::Float(a / b))
        }
        _ => Err(type_error(span)),
    }
}

fn rem(left: Value, right: Value, span: &Span) -> Result<Value, PolyscriptError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            if b == 0 {
                return Err(division_by_zero(span));
            }
            Ok(Value::Integer(a % b))
        }
        (Value::Integer(a), Value::Float(b)) => {
            if b == 0.0 {
                return Err(division_by_zero(span));
            }
            Ok(Value::Float(a as f64 % b))
        }
        (Value::Float(a), Value::Integer(b)) => {
            if b == 0 {
                return Err(division_by_zero(span));
            }
            Ok(Value::Float(a % b as f64))
        }
        (Value::Float(a), Value::Float(b)) => {
            if b == 0.0 {
                return Err(division_by_zero(span));
            }
            Ok(Value::Float(a % b))
        }
        _ => Err(type_error(span)),
    }
}

fn pow(left: Value, right: Value, span: &Span) -> Result<Value, PolyscriptError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            if b >= 0 {
                Ok(Value::Integer(a.pow(b as u32)))
            } else {
                Ok(Value::Float((a as f64).powi(b as i32)))
            }
        }
        (Value::Integer(a), Value::Float(b)) => Ok(Value::Float((a as f64).powf(b))),
        (Value::Float(a), Value::Integer(b)) => Ok(Value::Float(a.powi(b as i32))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a.powf(b))),
        _ => Err(type_error(span)),
    }
}

fn compare(op: &TokenKind, left: Value, right: Value, span: &Span) -> Result<Value, PolyscriptError> {
    let ordering = match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
        (Value::Integer(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => a.partial_cmp(b),
        _ => None,
    };
    let Some(ordering) = ordering else {
        return Err(type_error(span));
    };
    use std::cmp::Ordering::*;
    let result = match op {
        TokenKind::Lt => ordering == Less,
        TokenKind::Gt => ordering == Greater,
        TokenKind::Lte => ordering != Greater,
        TokenKind::Gte => ordering != Less,
        _ => unreachable!("caller only passes comparison operators"),
    };
    Ok(Value::bool(result))
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
    fn int_plus_int_stays_int() {
        let v = binary_op(&TokenKind::Plus, Value::Integer(2), Value::Integer(3), &span()).unwrap();
        assert!(matches!(v, Value::Integer(5)));
    }

    #[test]
    fn int_plus_float_promotes() {
        let v = binary_op(&TokenKind::Plus, Value::Integer(2), Value::Float(0.5), &span()).unwrap();
        assert!(matches!(v, Value::Float(f) if f == 2.5));
    }

    #[test]
    fn division_by_zero_is_runtime_error() {
        let err = binary_op(&TokenKind::Div, Value::Integer(1), Value::Integer(0), &span()).unwrap_err();
        assert!(matches!(err, PolyscriptError::Runtime { message, .. } if message == "Division by zero"));
    }

    #[test]
    fn string_plus_int_is_type_error() {
        let err = binary_op(&TokenKind::Plus, Value::String("a".into()), Value::Integer(1), &span());
        assert!(err.is_err());
    }

    #[test]
    fn list_append_and_concat() {
        let list = Value::List(Rc::new(RefCell::new(vec![Value::Integer(1)])));
        let appended = binary_op(&TokenKind::Plus, list.clone(), Value::Integer(2), &span()).unwrap();
        match appended {
            Value::List(items) => assert_eq!(items.borrow().len(), 2),
            _ => panic!("expected list"),
        }

        let other = Value::List(Rc::new(RefCell::new(vec![Value::Integer(9)])));
        let concatenated = binary_op(&TokenKind::Plus, list, other, &span()).unwrap();
        match concatenated {
            Value::List(items) => assert_eq!(items.borrow().len(), 2),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn deep_list_equality() {
        let a = Value::List(Rc::new(RefCell::new(vec![Value::Integer(1), Value::Integer(2)])));
        let b = Value::List(Rc::new(RefCell::new(vec![Value::Integer(1), Value::Integer(2)])));
        assert!(values_equal(&a, &b));
    }

    #[test]
    fn float_display_always_has_a_point() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(1.5), "1.5");
    }

    #[test]
    fn truthiness_matches_spec() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Integer(0).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
        assert!(Value::Integer(1).is_truthy());
        assert!(Value::String("x".into()).is_truthy());
    }
}
