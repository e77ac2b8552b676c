//! AST × Context → Value. Single-pass tree walk; dispatch is an exhaustive
//! match over [`NodeKind`] (spec.md §4.5).

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::PolyscriptError;
use crate::lang::ast::{Node, NodeKind};
use crate::lang::token::TokenKind;
use crate::position::Span;
use crate::runtime::builtins;
use crate::runtime::context::{AssignError, Context};
use crate::runtime::control::{EvalResult, Unwind};
use crate::runtime::value::{self, ContextHandle, Value};

/// The evaluator carries no state of its own; every call threads the
/// context explicitly, matching the teacher's pattern of passing scope
/// rather than stashing it on `self`.
pub struct Evaluator;

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator
    }

    pub fn eval(&self, node: &Node, ctx: &Rc<RefCell<Context>>) -> EvalResult {
        match &node.kind {
            NodeKind::IntLit(v) => Ok(Value::Integer(*v)),
            NodeKind::FloatLit(v) => Ok(Value::Float(*v)),
            NodeKind::StringLit(s) => Ok(Value::String(s.clone())),
            NodeKind::NullLit => Ok(Value::Null),
            NodeKind::ListLit(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for el in elements {
                    items.push(self.eval(el, ctx)?);
                }
                Ok(Value::List(Rc::new(RefCell::new(items))))
            }

            NodeKind::VarAccess { name } => ctx
                .borrow()
                .get(name)
                .ok_or_else(|| undefined_name(name, &node.span).into()),

            NodeKind::VarAssign { name, value, writable, declare } => {
                let evaluated = self.eval(value, ctx)?;
                if *declare {
                    ctx.borrow_mut().declare(name.clone(), evaluated.clone(), *writable);
                } else {
                    ctx.borrow_mut().assign(name, evaluated.clone()).map_err(|e| match e {
                        AssignError::Immutable => immutable_assignment(name, &node.span),
                        AssignError::Undefined => undefined_name(name, &node.span),
                    })?;
                }
                Ok(evaluated)
            }

            NodeKind::Attribute { target, name } => {
                let target_value = self.eval(target, ctx)?;
                self.eval_attribute(&target_value, name, &node.span)
            }

            NodeKind::AttributeAssign { target, name, value } => {
                let target_value = self.eval(target, ctx)?;
                let evaluated = self.eval(value, ctx)?;
                match &target_value {
                    Value::Namespace { context, .. } | Value::Object { context, .. } => {
                        context.borrow_mut().declare(name.clone(), evaluated.clone(), true);
                        Ok(evaluated)
                    }
                    other => Err(not_a_member_container(other, &node.span).into()),
                }
            }

            NodeKind::Index { target, index } => {
                let target_value = self.eval(target, ctx)?;
                let index_value = self.eval(index, ctx)?;
                self.eval_index(&target_value, &index_value, &node.span)
            }

            NodeKind::BinOp { left, op, right } => self.eval_binop(left, op, right, ctx, &node.span),

            NodeKind::UnaryOp { op, operand } => self.eval_unaryop(op, operand, ctx, &node.span),

            NodeKind::If { cases, else_body } => {
                for case in cases {
                    if self.eval(&case.cond, ctx)?.is_truthy() {
                        let child = Context::new("if", Some(ctx.clone()));
                        return self.eval(&case.body, &child);
                    }
                }
                if let Some(else_body) = else_body {
                    let child = Context::new("else", Some(ctx.clone()));
                    self.eval(else_body, &child)
                } else {
                    Ok(Value::Null)
                }
            }

            NodeKind::While { cond, body } => self.eval_while(cond, body, ctx),

            NodeKind::For { name, start, end, step, body } => self.eval_for(name, start, end, step.as_deref(), body, ctx),

            NodeKind::FnDecl { name, params, body, .. } => {
                let handle = match name {
                    Some(_) => ContextHandle::Weak(Rc::downgrade(ctx)),
                    None => ContextHandle::Strong(ctx.clone()),
                };
                let function = Value::Function {
                    name: name.clone(),
                    params: params.clone(),
                    body: Rc::new((**body).clone()),
                    defining_context: handle,
                };
                if let Some(name) = name {
                    ctx.borrow_mut().declare(name.clone(), function.clone(), true);
                }
                Ok(function)
            }

            NodeKind::Call { callee, args } => {
                let callee_value = self.eval(callee, ctx)?;
                let mut arg_values = Vec::with_capacity(args.len());
                for a in args {
                    arg_values.push(self.eval(a, ctx)?);
                }
                self.eval_call(&callee_value, arg_values, &node.span)
            }

            NodeKind::Return(expr) => {
                let value = match expr {
                    Some(e) => self.eval(e, ctx)?,
                    None => Value::Null,
                };
                Err(Unwind::Return(value))
            }
            NodeKind::Break => Err(Unwind::Break),
            NodeKind::Continue => Err(Unwind::Continue),

            NodeKind::EnumDecl { name, members } => {
                let enum_value = Value::Enum { name: name.clone(), members: Rc::new(members.clone()) };
                ctx.borrow_mut().declare(name.clone(), enum_value.clone(), true);
                Ok(enum_value)
            }

            NodeKind::NamespaceDecl { name, body } => {
                let child = Context::new(name.clone(), Some(ctx.clone()));
                self.eval(body, &child)?;
                let namespace = Value::Namespace { name: name.clone(), context: child };
                ctx.borrow_mut().declare(name.clone(), namespace.clone(), true);
                Ok(namespace)
            }

            NodeKind::ObjectDecl { name, body } => {
                let blueprint = Value::Object {
                    name: name.clone(),
                    context: ctx.clone(),
                    blueprint_body: Some(Rc::new((**body).clone())),
                };
                ctx.borrow_mut().declare(name.clone(), blueprint.clone(), true);
                Ok(blueprint)
            }

            NodeKind::New { name, args } => {
                let mut arg_values = Vec::with_capacity(args.len());
                for a in args {
                    arg_values.push(self.eval(a, ctx)?);
                }
                self.eval_new(name, arg_values, ctx, &node.span)
            }

            NodeKind::Block(stmts) => {
                let mut result = Value::Null;
                for stmt in stmts {
                    result = self.eval(stmt, ctx)?;
                }
                Ok(result)
            }
        }
    }

    fn eval_binop(&self, left: &Node, op: &TokenKind, right: &Node, ctx: &Rc<RefCell<Context>>, span: &Span) -> EvalResult {
        if matches!(op, TokenKind::Keyword(k) if k == "and") {
            let left_value = self.eval(left, ctx)?;
            return if !left_value.is_truthy() { Ok(left_value) } else { self.eval(right, ctx) };
        }
        if matches!(op, TokenKind::Keyword(k) if k == "or") {
            let left_value = self.eval(left, ctx)?;
            return if left_value.is_truthy() { Ok(left_value) } else { self.eval(right, ctx) };
        }

        let left_value = self.eval(left, ctx)?;
        let right_value = self.eval(right, ctx)?;
        value::binary_op(op, left_value, right_value, span).map_err(Unwind::Error)
    }

    fn eval_unaryop(&self, op: &TokenKind, operand: &Node, ctx: &Rc<RefCell<Context>>, span: &Span) -> EvalResult {
        let value = self.eval(operand, ctx)?;
        match op {
            TokenKind::Keyword(k) if k == "not" => Ok(Value::bool(!value.is_truthy())),
            TokenKind::Minus => match value {
                Value::Integer(v) => Ok(Value::Integer(-v)),
                Value::Float(v) => Ok(Value::Float(-v)),
                _ => Err(type_error(span).into()),
            },
            TokenKind::Plus => match value {
                Value::Integer(_) | Value::Float(_) => Ok(value),
                _ => Err(type_error(span).into()),
            },
            _ => Err(type_error(span).into()),
        }
    }

    fn eval_while(&self, cond: &Node, body: &Node, ctx: &Rc<RefCell<Context>>) -> EvalResult {
        loop {
            let iter_ctx = Context::new("while", Some(ctx.clone()));
            if !self.eval(cond, &iter_ctx)?.is_truthy() {
                return Ok(Value::Null);
            }
            match self.eval(body, &iter_ctx) {
                Ok(_) => {}
                Err(Unwind::Break) => return Ok(Value::Null),
                Err(Unwind::Continue) => continue,
                Err(other) => return Err(other),
            }
        }
    }

    fn eval_for(
        &self,
        name: &str,
        start: &Node,
        end: &Node,
        step: Option<&Node>,
        body: &Node,
        ctx: &Rc<RefCell<Context>>,
    ) -> EvalResult {
        let start_value = as_i64(self.eval(start, ctx)?, &start.span)?;
        let end_value = as_i64(self.eval(end, ctx)?, &end.span)?;
        let step_value = match step {
            Some(s) => as_i64(self.eval(s, ctx)?, &s.span)?,
            None => 1,
        };
        if step_value == 0 {
            return Err(PolyscriptError::runtime("for-loop step cannot be zero", start.span.start.clone(), end.span.end.clone()).into());
        }

        let mut i = start_value;
        while (step_value > 0 && i < end_value) || (step_value < 0 && i > end_value) {
            let iter_ctx = Context::new("for", Some(ctx.clone()));
            iter_ctx.borrow_mut().declare(name.to_string(), Value::Integer(i), true);
            match self.eval(body, &iter_ctx) {
                Ok(_) => {}
                Err(Unwind::Break) => break,
                Err(Unwind::Continue) => {}
                Err(other) => return Err(other),
            }
            i += step_value;
        }
        Ok(Value::Null)
    }

    fn eval_call(&self, callee: &Value, args: Vec<Value>, span: &Span) -> EvalResult {
        match callee {
            Value::Function { name, params, body, defining_context } => {
                if args.len() != params.len() {
                    return Err(arity_mismatch(name.as_deref(), params.len(), args.len(), span).into());
                }
                let defining = defining_context
                    .upgrade()
                    .ok_or_else(|| dead_closure(name.as_deref(), span))?;
                let frame_name = name.clone().unwrap_or_else(|| "<anonymous function>".to_string());
                let call_ctx = Context::new(frame_name.clone(), Some(defining));
                for (param, arg) in params.iter().zip(args.into_iter()) {
                    call_ctx.borrow_mut().declare(param.clone(), arg, true);
                }
                match self.eval(body, &call_ctx) {
                    Ok(v) => Ok(v),
                    Err(Unwind::Return(v)) => Ok(v),
                    Err(Unwind::Break) | Err(Unwind::Continue) => {
                        Err(PolyscriptError::runtime("'break'/'continue' outside a loop", span.start.clone(), span.end.clone()).into())
                    }
                    Err(Unwind::Error(e)) => Err(Unwind::Error(e.with_context(frame_name))),
                }
            }
            Value::BuiltIn { name, params } => {
                if args.len() != params.len() {
                    return Err(arity_mismatch(Some(name), params.len(), args.len(), span).into());
                }
                builtins::call(name, args, span).map_err(|e| Unwind::Error(e.with_context(name.clone())))
            }
            other => Err(PolyscriptError::runtime(
                format!("'{}' is not callable", other.type_name()),
                span.start.clone(),
                span.end.clone(),
            )
            .into()),
        }
    }

    fn eval_attribute(&self, target: &Value, name: &str, span: &Span) -> EvalResult {
        match target {
            Value::Namespace { context, .. } | Value::Object { context, .. } => context
                .borrow()
                .get(name)
                .ok_or_else(|| missing_member(name, span).into()),
            Value::Enum { name: enum_name, members } => {
                if let Some(index) = members.iter().position(|m| m == name) {
                    Ok(Value::EnumValue { enum_name: enum_name.clone(), member: name.to_string(), index: index as i64 })
                } else {
                    Err(missing_member(name, span).into())
                }
            }
            other => Err(not_a_member_container(other, span).into()),
        }
    }

    fn eval_index(&self, target: &Value, index: &Value, span: &Span) -> EvalResult {
        let Value::List(items) = target else {
            return Err(PolyscriptError::runtime(
                format!("cannot index into a {}", target.type_name()),
                span.start.clone(),
                span.end.clone(),
            )
            .into());
        };
        let Value::Integer(i) = index else {
            return Err(type_error(span).into());
        };
        let items = items.borrow();
        let len = items.len() as i64;
        if *i < 0 || *i >= len {
            return Err(PolyscriptError::runtime("list index out of range", span.start.clone(), span.end.clone()).into());
        }
        Ok(items[*i as usize].clone())
    }

    fn eval_new(&self, name: &str, args: Vec<Value>, ctx: &Rc<RefCell<Context>>, span: &Span) -> EvalResult {
        let blueprint = ctx.borrow().get(name).ok_or_else(|| undefined_name(name, span))?;
        let (parent, body) = match blueprint {
            Value::Object { context, blueprint_body: Some(body), .. } => (context, body),
            _ => return Err(PolyscriptError::runtime(format!("'{name}' is not an object blueprint"), span.start.clone(), span.end.clone()).into()),
        };

        let instance_ctx = Context::new(name.to_string(), Some(parent));
        let instance = Value::Object { name: name.to_string(), context: instance_ctx.clone(), blueprint_body: None };
        instance_ctx.borrow_mut().declare("self", instance.clone(), false);

        self.eval(&body, &instance_ctx).map_err(|u| push_unwind_context(u, name))?;

        if let Some(init) = instance_ctx.borrow().get("init") {
            self.eval_call(&init, args, span).map_err(|u| push_unwind_context(u, name))?;
        }

        Ok(instance)
    }
}

/// Tags an escaping runtime error with the name of the call frame it's
/// leaving; leaves `Return`/`Break`/`Continue` untouched.
fn push_unwind_context(unwind: Unwind, name: &str) -> Unwind {
    match unwind {
        Unwind::Error(e) => Unwind::Error(e.with_context(name)),
        other => other,
    }
}

fn as_i64(value: Value, span: &Span) -> Result<i64, Unwind> {
    match value {
        Value::Integer(v) => Ok(v),
        _ => Err(PolyscriptError::runtime("for-loop bounds must be integers", span.start.clone(), span.end.clone()).into()),
    }
}

fn type_error(span: &Span) -> PolyscriptError {
    PolyscriptError::runtime("Invalid operation", span.start.clone(), span.end.clone())
}

fn undefined_name(name: &str, span: &Span) -> PolyscriptError {
    PolyscriptError::runtime(format!("'{name}' is not defined"), span.start.clone(), span.end.clone())
}

fn immutable_assignment(name: &str, span: &Span) -> PolyscriptError {
    PolyscriptError::runtime(format!("'{name}' is const and cannot be reassigned"), span.start.clone(), span.end.clone())
}

fn missing_member(name: &str, span: &Span) -> PolyscriptError {
    PolyscriptError::runtime(format!("no member named '{name}'"), span.start.clone(), span.end.clone())
}

fn not_a_member_container(value: &Value, span: &Span) -> PolyscriptError {
    PolyscriptError::runtime(format!("'{}' has no attributes", value.type_name()), span.start.clone(), span.end.clone())
}

fn arity_mismatch(name: Option<&str>, expected: usize, got: usize, span: &Span) -> PolyscriptError {
    let label = name.unwrap_or("<anonymous function>");
    PolyscriptError::runtime(
        format!("'{label}' expects {expected} argument(s), got {got}"),
        span.start.clone(),
        span.end.clone(),
    )
}

fn dead_closure(name: Option<&str>, span: &Span) -> PolyscriptError {
    let label = name.unwrap_or("<anonymous function>");
    PolyscriptError::runtime(
        format!("'{label}'s defining scope no longer exists"),
        span.start.clone(),
        span.end.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::parse_source;

    fn run(src: &str) -> EvalResult {
        let ast = parse_source("<test>", src).expect("parse");
        let global = Context::new("global", None);
        Evaluator::new().eval(&ast, &global)
    }

    fn run_value(src: &str) -> Value {
        match run(src) {
            Ok(v) => v,
            Err(Unwind::Return(v)) => v,
            Err(other) => panic!("unexpected unwind: {other:?}"),
        }
    }

    #[test]
    fn arithmetic_precedence() {
        assert!(matches!(run_value("1 + 2 * 3"), Value::Integer(7)));
        assert!(matches!(run_value("(1 + 2) * 3"), Value::Integer(9)));
        assert!(matches!(run_value("2 ^ 3 ^ 2"), Value::Integer(512)));
    }

    #[test]
    fn closures_capture_defining_scope() {
        let v = run_value(
            "fn make(n) { fn() -> n + 1 }\nvar f = make(10)\nf()",
        );
        assert!(matches!(v, Value::Integer(11)));
    }

    #[test]
    fn for_loop_accumulates() {
        let v = run_value("var s = 0\nfor i = 1 to 5 { s = s + i }\ns");
        assert!(matches!(v, Value::Integer(10)));
    }

    #[test]
    fn early_return_via_list_index_call_form() {
        let v = run_value(
            "fn find(xs, t) {\nfor i = 0 to length(xs) {\nif xs.(i) == t { return i }\n}\nreturn -1\n}\nfind([3,1,4,1,5], 4)",
        );
        assert!(matches!(v, Value::Integer(2)));
    }

    #[test]
    fn const_reassignment_is_runtime_error() {
        let err = run("const x = 1\nx = 2").unwrap_err();
        assert!(matches!(err, Unwind::Error(PolyscriptError::Runtime { .. })));
    }

    #[test]
    fn short_circuit_and_or() {
        assert!(matches!(run_value("false and (1 / 0)"), Value::Integer(0)));
        assert!(matches!(run_value("true or (1 / 0)"), Value::Integer(1)));
    }

    #[test]
    fn type_error_on_string_plus_int() {
        let err = run(r#"1 + "a""#).unwrap_err();
        assert!(matches!(err, Unwind::Error(PolyscriptError::Runtime { message, .. }) if message == "Invalid operation"));
    }

    #[test]
    fn for_step_zero_is_runtime_error() {
        let err = run("for i = 1 to 5 step 0 { i }").unwrap_err();
        assert!(matches!(err, Unwind::Error(PolyscriptError::Runtime { .. })));
    }

    #[test]
    fn builtin_length_dispatches_on_type() {
        assert!(matches!(run_value(r#"length("abc")"#), Value::Integer(3)));
        assert!(matches!(run_value("length([1,2,3])"), Value::Integer(3)));
    }

    #[test]
    fn constructor_can_assign_self_attributes() {
        let v = run_value(
            "object Point {\nfn init(x, y) {\nself.x = x\nself.y = y\n}\n}\nvar p = new Point(3, 4)\np.x + p.y",
        );
        assert!(matches!(v, Value::Integer(7)));
    }

    #[test]
    fn namespace_member_is_assignable() {
        let v = run_value("namespace N {\nvar count = 0\n}\nN.count = 5\nN.count");
        assert!(matches!(v, Value::Integer(5)));
    }

    #[test]
    fn assigning_to_a_non_attribute_is_a_syntax_error() {
        let ast = crate::lang::parse_source("<test>", "1 + 1 = 2");
        assert!(matches!(ast, Err(PolyscriptError::InvalidSyntax { .. })));
    }

    #[test]
    fn traceback_accumulates_outermost_first_innermost_last() {
        let err = run("fn outer() { inner() }\nfn inner() { 1 / 0 }\nouter()").unwrap_err();
        match err {
            Unwind::Error(PolyscriptError::Runtime { traceback, .. }) => {
                assert_eq!(traceback.0, vec!["outer".to_string(), "inner".to_string()]);
            }
            other => panic!("expected runtime error, got {other:?}"),
        }
    }
}
