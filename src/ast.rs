use std::rc::Rc;

/// Represents a literal value in the language.
///
/// `LiteralValue` covers the raw constants that can appear directly in source
/// code apart from strings, which get their own node because the template
/// rewriter treats them specially.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Real(f64),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// The no-value sentinel `none`.
    None,
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Parsed source only ever contains `Str` for string literals. The template
/// rewriter replaces each of them by a plain `Str` or by a `Concat` whose
/// parts are constants and `Stringify` nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, boolean, `none`).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// A string literal.
    Str {
        /// The unescaped text of the literal.
        value: String,
        /// Line number in the source code.
        line:  usize,
    },
    /// Concatenation of the parts with an empty separator.
    Concat {
        /// The parts, evaluated left to right.
        parts: Vec<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// The string form of an expression.
    Stringify {
        /// The expression to stringify.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A unary operation (e.g. negation).
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation (addition, comparison, etc.).
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Conditional expression `condition ? then : else`.
    Conditional {
        /// The condition.
        condition:   Box<Self>,
        /// Expression evaluated if the condition is truthy.
        then_branch: Box<Self>,
        /// Expression evaluated otherwise.
        else_branch: Box<Self>,
        /// Line number in the source code.
        line:        usize,
    },
    /// Call expression (e.g. `f(x)`).
    Call {
        /// The expression producing the callee.
        callee:    Box<Self>,
        /// Arguments to the call.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Indexing expression (e.g. `items[2]`).
    Index {
        /// The list or string to index into.
        target: Box<Self>,
        /// The index to access.
        index:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// List literal expression.
    ListLiteral {
        /// Elements of the list.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Anonymous function `fn(params) => body`.
    Lambda {
        /// Parameter names.
        params: Vec<String>,
        /// Body expression.
        body:   Rc<Self>,
        /// Line number in the source code.
        line:   usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use stencil::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Str { line, .. }
            | Self::Concat { line, .. }
            | Self::Stringify { line, .. }
            | Self::Variable { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::Conditional { line, .. }
            | Self::Call { line, .. }
            | Self::Index { line, .. }
            | Self::ListLiteral { line, .. }
            | Self::Lambda { line, .. } => *line,
        }
    }
}

/// How a function definition is bound when its statement executes.
///
/// The parser always produces `Bare`; the template rewriter picks one of the
/// other modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Bound as an ordinary function.
    Bare,
    /// Bound through the emission runtime's decorate hook.
    Gathering,
    /// Reserved name; bound as an ordinary function and never wrapped.
    Reserved,
}

/// Represents a named function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The name of the function.
    pub name:   String,
    /// The parameter names.
    pub params: Vec<String>,
    /// The statements of the body.
    pub body:   Vec<Statement>,
    /// How the definition is bound.
    pub wrap:   WrapMode,
    /// Line number in the source code.
    pub line:   usize,
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A named function definition.
    Function(Rc<FunctionDef>),
    /// A standalone expression whose value is discarded.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// A standalone expression whose value is handed to the gather hook.
    Emit {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// A variable assignment binding a name to an expression.
    Assignment {
        /// The name of the variable.
        name:  String,
        /// The value which is being assigned.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// A compound assignment consisting of a variable and an operation.
    CompoundAssignment {
        /// The name of the variable.
        name:  String,
        /// The binary operation (e.g., `+=`, `-=`, etc.).
        op:    BinaryOperator,
        /// The value to be combined with the current variable value.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// Assignment to a list element, `name[index] = value`.
    IndexAssignment {
        /// The name of the list variable.
        name:  String,
        /// The index expression.
        index: Expr,
        /// The value which is being stored.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// `if` statement with optional `else` branch.
    If {
        /// The condition.
        condition:   Expr,
        /// Statements executed when the condition is truthy.
        then_branch: Vec<Self>,
        /// Statements executed otherwise.
        else_branch: Option<Vec<Self>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `for` loop over a list or string.
    For {
        /// The loop variable name.
        var:      String,
        /// The iterated expression.
        iterable: Expr,
        /// The loop body.
        body:     Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// `while` loop.
    While {
        /// The condition checked before each iteration.
        condition: Expr,
        /// The loop body.
        body:      Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `return` with an optional value.
    Return {
        /// The returned expression; `none` when absent.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `break`
    Break {
        /// Line number in the source code.
        line: usize,
    },
    /// `continue`
    Continue {
        /// Line number in the source code.
        line: usize,
    },
    /// `import a.b`, loading a template unit.
    Import {
        /// The dotted unit name as written.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
}

impl Statement {
    /// Gets the line number from `self`.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::Function(def) => def.line,
            Self::Expression { line, .. }
            | Self::Emit { line, .. }
            | Self::Assignment { line, .. }
            | Self::CompoundAssignment { line, .. }
            | Self::IndexAssignment { line, .. }
            | Self::If { line, .. }
            | Self::For { line, .. }
            | Self::While { line, .. }
            | Self::Return { line, .. }
            | Self::Break { line }
            | Self::Continue { line }
            | Self::Import { line, .. } => *line,
        }
    }
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic, comparisons, membership and the
/// short-circuiting logical operators.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication or repetition (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Membership (`in`)
    In,
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `!x`).
    Not,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, In, Less, LessEqual, Mod, Mul, NotEqual,
            Or, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
            In => "in",
            And => "and",
            Or => "or",
        };
        write!(f, "{operator}")
    }
}
