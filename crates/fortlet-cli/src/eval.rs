//! Evaluator for fortlet programs
//!
//! A tree-walking interpreter over the front end's syntax tree. Expressions
//! produce a `Value`; statements produce a `ControlFlow` signal that
//! sequences, blocks, loops and method bodies pass upward until something
//! consumes it.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use fortlet_ast::ast::{BinOp, Expr, Lit, Stmt, WriteArg};
use fortlet_types::{OpClass, Type};

use crate::console::Console;
use crate::env::{ScopeId, Scopes};
use crate::error::{EvalError, EvalResult, Mismatch};
use crate::program::{Method, RunConfig};
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

/// Outcome of executing a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    /// Normal completion, the next statement runs
    Normal,
    /// Leave the innermost loop
    Break,
    /// Leave the current method
    Return,
}

/// Execution state for one run: the method table, the scope arena, the
/// console and the chain of active method calls.
pub struct Interpreter<'a, R, W> {
    methods: &'a HashMap<String, Method>,
    scopes: &'a mut Scopes,
    console: &'a mut Console<R, W>,
    config: &'a RunConfig,
    /// Names of the methods currently executing, innermost last.
    calls: Vec<&'a str>,
}

impl<'a, R: BufRead, W: Write> Interpreter<'a, R, W> {
    pub fn new(
        methods: &'a HashMap<String, Method>,
        scopes: &'a mut Scopes,
        console: &'a mut Console<R, W>,
        config: &'a RunConfig,
    ) -> Self {
        Self {
            methods,
            scopes,
            console,
            config,
            calls: Vec::new(),
        }
    }

    /// Evaluate an expression
    pub fn eval_expr(&mut self, scope: ScopeId, expr: &Expr) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.eval_expr_inner(scope, expr))
    }

    fn eval_expr_inner(&mut self, scope: ScopeId, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Lit(Lit::Int(v)) => Ok(Value::Int(*v)),
            Expr::Lit(Lit::Bool(b)) => Ok(Value::Bool(*b)),

            Expr::Var(name) => {
                let slot = self.scopes.slot(scope, name)?;
                if !slot.assigned {
                    return Err(EvalError::UninitializedVariable(name.clone()));
                }
                Ok(slot.value)
            }

            // Both operands always run, left first; `and`/`or` do not
            // short-circuit.
            Expr::Binary { lhs, op, rhs } => {
                let l = self.eval_expr(scope, lhs)?;
                let r = self.eval_expr(scope, rhs)?;
                apply_binop(*op, l, r)
            }

            Expr::Call { method, args } => self.invoke(scope, method, args),
        }
    }

    /// Call `name`, evaluating `args` in the caller's `scope`. The callee
    /// runs in a scope of its own with no parent: it sees neither the
    /// caller's locals nor the program fields.
    pub fn invoke(&mut self, scope: ScopeId, name: &str, args: &[Expr]) -> EvalResult<Value> {
        self.call(scope, name, args, None)
    }

    /// Call the entry method with no arguments. Unlike other calls, its
    /// scope hangs off the program scope so the fields are visible.
    pub fn invoke_entry(&mut self, name: &str) -> EvalResult<Value> {
        let root = self.scopes.root();
        self.call(root, name, &[], Some(root))
    }

    fn call(
        &mut self,
        scope: ScopeId,
        name: &str,
        args: &[Expr],
        parent: Option<ScopeId>,
    ) -> EvalResult<Value> {
        let methods = self.methods;
        let method = methods
            .get(name)
            .ok_or_else(|| EvalError::UndeclaredMethod(name.to_string()))?;

        if self.calls.len() >= self.config.max_call_depth as usize {
            return Err(EvalError::CallDepthExceeded(self.config.max_call_depth));
        }

        tracing::debug!(method = name, args = args.len(), depth = self.calls.len(), "invoke");

        let callee = match parent {
            Some(parent) => self.scopes.push(parent),
            None => self.scopes.push_detached(),
        };
        let result = self
            .bind_args(method, scope, callee, args)
            .and_then(|()| self.run_method(method, callee));
        self.scopes.pop(callee);

        if let Ok(value) = &result {
            tracing::debug!(method = name, result = %value, "return");
        }
        result
    }

    /// Evaluate arguments one by one and bind each to the next parameter.
    /// Surplus arguments are rejected as soon as the first one is evaluated;
    /// a shortfall only once all of them are.
    fn bind_args(
        &mut self,
        method: &Method,
        caller: ScopeId,
        callee: ScopeId,
        args: &[Expr],
    ) -> EvalResult<()> {
        let expected = method.param_count();
        let count_error = || EvalError::ArgumentCount {
            method: method.name().to_string(),
            expected,
            found: args.len(),
        };
        for (i, arg) in args.iter().enumerate() {
            let value = self.eval_expr(caller, arg)?;
            let param = method.params().get(i).ok_or_else(count_error)?;
            self.scopes.declare_and_assign(callee, param, value)?;
        }
        if args.len() != expected {
            return Err(count_error());
        }
        Ok(())
    }

    /// Run a method body in `scope`, which already holds the parameters.
    pub(crate) fn run_method(&mut self, method: &'a Method, scope: ScopeId) -> EvalResult<Value> {
        // The return slot is always an Int, whatever the declared return
        // type. A method declared `boolean` therefore cannot assign its
        // result.
        self.scopes.declare(scope, method.name(), Type::Int)?;

        self.calls.push(method.name());
        let flow = self.exec_seq(scope, method.body());
        self.calls.pop();
        // A stray break that reaches the method body ends it like a normal
        // completion.
        flow?;

        if method.return_type() == Type::NoType {
            return Ok(Value::Untyped);
        }
        let slot = self.scopes.slot(scope, method.name())?;
        if !slot.assigned {
            return Err(EvalError::UninitializedVariable(method.name().to_string()));
        }
        Ok(slot.value)
    }

    /// Run statements in order, stopping at the first one that does not
    /// complete normally and passing its signal on.
    pub fn exec_seq(&mut self, scope: ScopeId, stmts: &[Stmt]) -> EvalResult<ControlFlow> {
        for stmt in stmts {
            let flow = self.exec_stmt(scope, stmt)?;
            if flow != ControlFlow::Normal {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Execute a statement
    pub fn exec_stmt(&mut self, scope: ScopeId, stmt: &Stmt) -> EvalResult<ControlFlow> {
        ensure_sufficient_stack(|| self.exec_stmt_inner(scope, stmt))
    }

    fn exec_stmt_inner(&mut self, scope: ScopeId, stmt: &Stmt) -> EvalResult<ControlFlow> {
        match stmt {
            Stmt::Declare { name, ty } => {
                self.scopes.declare(scope, name, Type::from_name(ty.as_str()))?;
                Ok(ControlFlow::Normal)
            }

            Stmt::Assign { name, value } => {
                let v = self.eval_expr(scope, value)?;
                self.scopes.assign(scope, name, v)?;
                Ok(ControlFlow::Normal)
            }

            Stmt::Block(stmts) => {
                let inner = self.scopes.push(scope);
                let flow = self.exec_seq(inner, stmts);
                self.scopes.pop(inner);
                flow
            }

            Stmt::Seq(stmts) => self.exec_seq(scope, stmts),

            Stmt::If { cond, then_, else_ } => {
                if self.condition(scope, cond, "if")? {
                    self.exec_stmt(scope, then_)
                } else if let Some(else_) = else_ {
                    self.exec_stmt(scope, else_)
                } else {
                    Ok(ControlFlow::Normal)
                }
            }

            Stmt::While { cond, body } => self.exec_while(scope, cond, body),

            Stmt::Break => Ok(ControlFlow::Break),

            Stmt::Return => {
                if let Some(method) = self.calls.last() {
                    self.scopes.lookup(scope, method)?;
                }
                Ok(ControlFlow::Return)
            }

            Stmt::Read(names) => {
                for name in names {
                    let v = self.console.read_int()?;
                    self.scopes.assign(scope, name, Value::Int(v))?;
                }
                Ok(ControlFlow::Normal)
            }

            Stmt::Write(args) => {
                for arg in args {
                    match arg {
                        WriteArg::Expr(expr) => {
                            let text = self
                                .eval_expr(scope, expr)?
                                .render()
                                .ok_or(EvalError::TypeMismatch(Mismatch::Unprintable))?;
                            self.console.write_item(&text)?;
                        }
                        WriteArg::Text(text) => self.console.write_item(text)?,
                    }
                }
                self.console.end_line()?;
                Ok(ControlFlow::Normal)
            }

            Stmt::Invoke(expr) => {
                self.eval_expr(scope, expr)?;
                Ok(ControlFlow::Normal)
            }
        }
    }

    /// Run a loop. The body runs before the condition is first tested, and
    /// it runs in the loop's own scope: only a `Block` body gets a fresh
    /// scope per iteration.
    fn exec_while(&mut self, scope: ScopeId, cond: &Expr, body: &Stmt) -> EvalResult<ControlFlow> {
        let mut iteration = 0u64;
        loop {
            tracing::trace!(iteration, "loop body");
            match self.exec_stmt(scope, body)? {
                ControlFlow::Break => return Ok(ControlFlow::Normal),
                ControlFlow::Return => return Ok(ControlFlow::Return),
                ControlFlow::Normal => {}
            }
            if !self.condition(scope, cond, "while")? {
                return Ok(ControlFlow::Normal);
            }
            iteration += 1;
        }
    }

    fn condition(&mut self, scope: ScopeId, cond: &Expr, construct: &'static str) -> EvalResult<bool> {
        match self.eval_expr(scope, cond)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::TypeMismatch(Mismatch::Condition {
                construct,
                found: other.ty(),
            })),
        }
    }
}

/// Apply a binary operator to two evaluated operands.
pub fn apply_binop(op: BinOp, l: Value, r: Value) -> EvalResult<Value> {
    use BinOp::*;

    let mismatch = || {
        EvalError::TypeMismatch(Mismatch::Operands {
            op,
            lhs: l.ty(),
            rhs: r.ty(),
        })
    };
    if !OpClass::of(op).accepts(l.ty(), r.ty()) {
        return Err(mismatch());
    }

    match (op, l, r) {
        (Eq, _, _) => Ok(Value::Bool(l == r)),
        (Ne, _, _) => Ok(Value::Bool(l != r)),

        (And, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a && b)),
        (Or, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a || b)),

        (Div | Mod, Value::Int(_), Value::Int(0)) => Err(EvalError::DivisionByZero(op)),

        (_, Value::Int(a), Value::Int(b)) => Ok(match op {
            Add => Value::Int(a.wrapping_add(b)),
            Sub => Value::Int(a.wrapping_sub(b)),
            Mul => Value::Int(a.wrapping_mul(b)),
            Div => Value::Int(a.wrapping_div(b)),
            Mod => Value::Int(a.wrapping_rem(b)),
            Lt => Value::Bool(a < b),
            Gt => Value::Bool(a > b),
            Le => Value::Bool(a <= b),
            Ge => Value::Bool(a >= b),
            Eq | Ne | And | Or => return Err(mismatch()),
        }),

        _ => Err(mismatch()),
    }
}
