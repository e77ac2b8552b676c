//! Back end: values, lexical scope, and the tree-walking evaluator.

pub mod builtins;
pub mod context;
pub mod control;
pub mod evaluator;
pub mod value;

use std::cell::RefCell;
use std::rc::Rc;

pub use context::Context;
pub use evaluator::Evaluator;
pub use value::Value;

/// Builds a fresh `global_scope`, seeded in the same order as the original
/// driver: `__name__`, `null`, `false`, `true`, then the built-ins. Every
/// name here is an ordinary writable binding — a Polyscript program can
/// rebind `true` or `print` in its own scope, just as the source allowed.
pub fn bootstrap_global() -> Rc<RefCell<Context>> {
    let global = Context::new("<global>", None);
    {
        let mut table = global.borrow_mut();
        table.declare("__name__", Value::String("main".to_string()), true);
        table.declare("null", Value::Null, true);
        table.declare("false", Value::bool(false), true);
        table.declare("true", Value::bool(true), true);
        for (name, params) in builtins::BUILTIN_NAMES {
            table.declare(
                *name,
                Value::BuiltIn { name: (*name).to_string(), params: params.iter().map(|p| p.to_string()).collect() },
                true,
            );
        }
    }
    global
}
