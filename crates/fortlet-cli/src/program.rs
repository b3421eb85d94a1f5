//! Method table, field initializers and the run entry point.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use fortlet_ast::ast::{self, Expr, MethodDecl, Stmt};
use fortlet_types::Type;

use crate::console::Console;
use crate::env::Scopes;
use crate::error::{EvalError, EvalResult};
use crate::eval::Interpreter;
use crate::value::Value;

/// Maximum call depth to keep deep recursion from overflowing the host stack
pub const MAX_CALL_DEPTH: u32 = 1000;

/// Limits applied while a program runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub max_call_depth: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_call_depth: MAX_CALL_DEPTH,
        }
    }
}

/// A callable method. Its body always ends with an implicit `return`.
#[derive(Debug, Clone)]
pub struct Method {
    name: String,
    ret_ty: Type,
    params: Vec<String>,
    body: Vec<Stmt>,
}

impl Method {
    pub fn new(name: impl Into<String>, ret_ty: Type, params: Vec<String>, mut body: Vec<Stmt>) -> Self {
        body.push(Stmt::Return);
        Self {
            name: name.into(),
            ret_ty,
            params,
            body,
        }
    }

    pub fn from_decl(decl: &MethodDecl) -> Self {
        Self::new(
            decl.name.clone(),
            Type::from_type_name(decl.ret_ty.as_ref()),
            decl.params.clone(),
            decl.body.clone(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> Type {
        self.ret_ty
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn body(&self) -> &[Stmt] {
        &self.body
    }
}

/// A program: field declarations, a method table and an entry method.
///
/// The program-level scope holds the fields. It is rebuilt at the start of
/// every `run`, so a program may be run more than once. Only the entry
/// method's scope hangs off it; every other call gets a detached scope.
#[derive(Debug, Default)]
pub struct Program {
    name: String,
    fields: Vec<Stmt>,
    scopes: Scopes,
    methods: HashMap<String, Method>,
    entry: Option<String>,
    config: RunConfig,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RunConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Register everything the front end produced.
    pub fn from_ast(tree: &ast::Program, config: RunConfig) -> EvalResult<Self> {
        let mut program = Self::with_config(config);
        program.set_name(&tree.name);
        for field in &tree.fields {
            program.add_field(field.clone());
        }
        for decl in &tree.methods {
            program.add_method(Method::from_decl(decl))?;
        }
        if let Some(entry) = &tree.entry {
            program.set_entry(entry);
        }
        Ok(program)
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_field(&mut self, stmt: Stmt) {
        self.fields.push(stmt);
    }

    /// Register a method. Names are unique.
    pub fn add_method(&mut self, method: Method) -> EvalResult<()> {
        if self.methods.contains_key(method.name()) {
            return Err(EvalError::Redeclaration(method.name().to_string()));
        }
        self.methods.insert(method.name().to_string(), method);
        Ok(())
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    /// Designate the entry method by name. It is resolved when the program
    /// runs.
    pub fn set_entry(&mut self, name: &str) {
        self.entry = Some(name.to_string());
    }

    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    /// Run field declarations in a fresh program scope, then call the entry
    /// method with no arguments. Output is flushed whether or not the run
    /// succeeds.
    pub fn run<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> EvalResult<()> {
        let entry = self.entry.clone().ok_or(EvalError::MissingEntryPoint)?;
        tracing::debug!(program = %self.name, entry = %entry, "run");

        self.scopes = Scopes::new();
        let root = self.scopes.root();
        let result = {
            let mut interp = Interpreter::new(&self.methods, &mut self.scopes, console, &self.config);
            interp
                .exec_seq(root, &self.fields)
                .and_then(|_| interp.invoke_entry(&entry))
        };
        let flushed = console.flush();

        match &result {
            Ok(_) => tracing::debug!(program = %self.name, "run complete"),
            Err(e) => tracing::debug!(program = %self.name, error = %e, "run failed"),
        }
        result?;
        flushed
    }

    /// Evaluate `expr` in the program-level scope.
    pub fn evaluate<R: BufRead, W: Write>(
        &mut self,
        expr: &Expr,
        console: &mut Console<R, W>,
    ) -> EvalResult<Value> {
        let root = self.scopes.root();
        let mut interp = Interpreter::new(&self.methods, &mut self.scopes, console, &self.config);
        interp.eval_expr(root, expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortlet_ast::ast::{BinOp, WriteArg};
    use std::io::Cursor;

    fn console() -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(Vec::new()), Vec::new())
    }

    #[test]
    fn body_ends_with_implicit_return() {
        let m = Method::new("m", Type::Int, vec![], vec![Stmt::Break]);
        assert_eq!(m.body().len(), 2);
        assert!(matches!(m.body().last(), Some(Stmt::Return)));
    }

    #[test]
    fn duplicate_method_is_redeclaration() {
        let mut p = Program::new();
        p.add_method(Method::new("f", Type::NoType, vec![], vec![])).unwrap();
        assert_eq!(
            p.add_method(Method::new("f", Type::Int, vec![], vec![])),
            Err(EvalError::Redeclaration("f".into()))
        );
    }

    #[test]
    fn missing_entry_runs_nothing() {
        let mut p = Program::new();
        p.add_field(Stmt::write(vec![WriteArg::Text("field".into())]));
        let mut c = console();
        assert_eq!(p.run(&mut c), Err(EvalError::MissingEntryPoint));
        assert!(c.into_output().is_empty());
    }

    #[test]
    fn entry_sees_fields() {
        let mut p = Program::new();
        p.add_field(Stmt::declare("limit", "int"));
        p.add_field(Stmt::assign("limit", Expr::int(10)));
        p.add_method(Method::new(
            "main",
            Type::NoType,
            vec![],
            vec![Stmt::write(vec![WriteArg::Expr(Expr::var("limit"))])],
        ))
        .unwrap();
        p.set_entry("main");
        let mut c = console();
        p.run(&mut c).unwrap();
        assert_eq!(String::from_utf8(c.into_output()).unwrap(), "10 \n");
    }

    #[test]
    fn program_can_run_twice() {
        let mut p = Program::new();
        p.add_field(Stmt::declare("limit", "int"));
        p.add_field(Stmt::assign("limit", Expr::int(3)));
        p.add_method(Method::new(
            "main",
            Type::NoType,
            vec![],
            vec![Stmt::write(vec![WriteArg::Expr(Expr::var("limit"))])],
        ))
        .unwrap();
        p.set_entry("main");
        let mut c = console();
        p.run(&mut c).unwrap();
        p.run(&mut c).unwrap();
        assert_eq!(String::from_utf8(c.into_output()).unwrap(), "3 \n3 \n");
    }

    #[test]
    fn unknown_entry_is_undeclared_method() {
        let mut p = Program::new();
        p.set_entry("start");
        let mut c = console();
        assert_eq!(p.run(&mut c), Err(EvalError::UndeclaredMethod("start".into())));
    }

    #[test]
    fn entry_with_parameters_gets_too_few_arguments() {
        let mut p = Program::new();
        p.add_method(Method::new("main", Type::NoType, vec!["x".into()], vec![]))
            .unwrap();
        p.set_entry("main");
        let mut c = console();
        assert_eq!(p.run(&mut c).unwrap_err().kind(), "ArgumentCountError");
    }

    #[test]
    fn evaluate_calls_into_the_method_table() {
        let mut p = Program::new();
        p.add_method(Method::new(
            "m",
            Type::Int,
            vec!["p".into()],
            vec![Stmt::assign(
                "m",
                Expr::binary(Expr::var("p"), BinOp::Mul, Expr::int(2)),
            )],
        ))
        .unwrap();
        let mut c = console();
        let v = p.evaluate(&Expr::call("m", vec![Expr::int(4)]), &mut c).unwrap();
        assert_eq!(v, Value::Int(8));
    }

    #[test]
    fn from_ast_registers_everything() {
        let tree = ast::Program {
            name: "demo".into(),
            fields: vec![Stmt::declare("x", "int")],
            methods: vec![MethodDecl::new("main", None, &[], vec![])],
            entry: Some("main".into()),
        };
        let p = Program::from_ast(&tree, RunConfig::default()).unwrap();
        assert_eq!(p.name(), "demo");
        assert_eq!(p.entry(), Some("main"));
        assert_eq!(p.method("main").unwrap().return_type(), Type::NoType);
    }
}
