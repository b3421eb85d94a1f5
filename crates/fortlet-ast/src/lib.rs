pub mod ast {
    use serde::{Deserialize, Serialize};

    /// A whole program as handed over by the front end.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct Program {
        #[serde(default)]
        pub name: String,
        /// Field declarations, executed into the program-level scope.
        #[serde(default)]
        pub fields: Vec<Stmt>,
        #[serde(default)]
        pub methods: Vec<MethodDecl>,
        /// Name of the entry method, if the front end designated one.
        #[serde(default)]
        pub entry: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MethodDecl {
        pub name: String,
        /// `None` for methods without a result.
        #[serde(default)]
        pub ret_ty: Option<TypeName>,
        #[serde(default)]
        pub params: Vec<String>,
        pub body: Vec<Stmt>,
    }

    /// A type as written in the source (`int`, `boolean`).
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TypeName(pub String);

    impl TypeName {
        pub fn new(text: impl Into<String>) -> Self {
            TypeName(text.into())
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub enum Stmt {
        Declare {
            name: String,
            ty: TypeName,
        },
        Assign {
            name: String,
            value: Expr,
        },
        /// Statements run in a fresh child scope.
        Block(Vec<Stmt>),
        /// Statements run in the enclosing scope.
        Seq(Vec<Stmt>),
        If {
            cond: Expr,
            then_: Box<Stmt>,
            #[serde(default)]
            else_: Option<Box<Stmt>>,
        },
        /// Body first, condition after (do-while shape).
        While {
            cond: Expr,
            body: Box<Stmt>,
        },
        Break,
        Return,
        Read(Vec<String>),
        Write(Vec<WriteArg>),
        /// Expression evaluated for its side effects.
        Invoke(Expr),
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub enum WriteArg {
        Expr(Expr),
        Text(String),
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub enum Expr {
        Lit(Lit),
        Var(String),
        Binary {
            lhs: Box<Expr>,
            op: BinOp,
            rhs: Box<Expr>,
        },
        Call {
            method: String,
            #[serde(default)]
            args: Vec<Expr>,
        },
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub enum Lit {
        Int(i64),
        Bool(bool),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum BinOp {
        // arithmetic
        Add,
        Sub,
        Mul,
        Div,
        Mod,
        // logical
        And,
        Or,
        // equality
        Eq,
        Ne,
        // relational
        Lt,
        Gt,
        Le,
        Ge,
    }

    impl BinOp {
        pub fn symbol(self) -> &'static str {
            match self {
                BinOp::Add => "+",
                BinOp::Sub => "-",
                BinOp::Mul => "*",
                BinOp::Div => "/",
                BinOp::Mod => "%",
                BinOp::And => "and",
                BinOp::Or => "or",
                BinOp::Eq => "==",
                BinOp::Ne => "!=",
                BinOp::Lt => "<",
                BinOp::Gt => ">",
                BinOp::Le => "<=",
                BinOp::Ge => ">=",
            }
        }
    }

    // Node constructors used by front ends and tests.

    impl Expr {
        pub fn int(v: i64) -> Self {
            Expr::Lit(Lit::Int(v))
        }

        pub fn bool(b: bool) -> Self {
            Expr::Lit(Lit::Bool(b))
        }

        pub fn var(name: impl Into<String>) -> Self {
            Expr::Var(name.into())
        }

        pub fn binary(lhs: Expr, op: BinOp, rhs: Expr) -> Self {
            Expr::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            }
        }

        pub fn call(method: impl Into<String>, args: Vec<Expr>) -> Self {
            Expr::Call {
                method: method.into(),
                args,
            }
        }
    }

    impl Stmt {
        pub fn declare(name: impl Into<String>, ty: &str) -> Self {
            Stmt::Declare {
                name: name.into(),
                ty: TypeName::new(ty),
            }
        }

        pub fn assign(name: impl Into<String>, value: Expr) -> Self {
            Stmt::Assign {
                name: name.into(),
                value,
            }
        }

        pub fn if_(cond: Expr, then_: Stmt, else_: Option<Stmt>) -> Self {
            Stmt::If {
                cond,
                then_: Box::new(then_),
                else_: else_.map(Box::new),
            }
        }

        pub fn while_(cond: Expr, body: Stmt) -> Self {
            Stmt::While {
                cond,
                body: Box::new(body),
            }
        }

        pub fn write(args: Vec<WriteArg>) -> Self {
            Stmt::Write(args)
        }

        pub fn read(names: &[&str]) -> Self {
            Stmt::Read(names.iter().map(|n| n.to_string()).collect())
        }
    }

    impl MethodDecl {
        pub fn new(
            name: impl Into<String>,
            ret_ty: Option<&str>,
            params: &[&str],
            body: Vec<Stmt>,
        ) -> Self {
            MethodDecl {
                name: name.into(),
                ret_ty: ret_ty.map(TypeName::new),
                params: params.iter().map(|p| p.to_string()).collect(),
                body,
            }
        }
    }
}
