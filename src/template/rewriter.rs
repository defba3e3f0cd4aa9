use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{Expr, FunctionDef, Statement, WrapMode},
    error::TemplateError,
    interpreter::parser::core::parse_expression_source,
    template::{
        diagnostics::truncate_fragment,
        emission::is_reserved_name,
        splitter::{Segment, split, strip_comments},
    },
};

/// Result type of the rewriting pass.
pub type RewriteResult<T> = Result<T, TemplateError>;

/// How a function definition is treated by the rewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionClass {
    /// An ordinary function; it becomes a gathering function.
    Plain,
    /// The definition was already rewritten; it is left alone.
    AlreadyWrapped,
    /// A dunder function; it runs without a gathering buffer.
    Reserved,
}

/// Classifies a function definition.
///
/// # Example
/// ```
/// use stencil::{
///     ast::{FunctionDef, WrapMode},
///     template::rewriter::{FunctionClass, classify},
/// };
///
/// let def = FunctionDef { name:   "__init__".to_string(),
///                         params: Vec::new(),
///                         body:   Vec::new(),
///                         wrap:   WrapMode::Bare,
///                         line:   1, };
/// assert_eq!(classify(&def), FunctionClass::Reserved);
/// ```
#[must_use]
pub fn classify(def: &FunctionDef) -> FunctionClass {
    match def.wrap {
        WrapMode::Gathering | WrapMode::Reserved => FunctionClass::AlreadyWrapped,
        WrapMode::Bare if is_reserved_name(&def.name) => FunctionClass::Reserved,
        WrapMode::Bare => FunctionClass::Plain,
    }
}

/// Applies the template rewrite rules to a parsed unit.
///
/// - Every string literal is split on its interpolation markers and turned
///   into a concatenation of its literal text and stringified expressions.
/// - Every expression statement becomes an emit statement.
/// - Every function definition gets the wrap mode of its class.
///
/// The whole tree is visited, including function bodies, lambda bodies and
/// the expressions found inside interpolations.
///
/// # Errors
/// `TemplateError` when a literal has unbalanced markers or an
/// interpolated segment is not a valid expression.
pub fn rewrite_program(statements: Vec<Statement>, file: &str) -> RewriteResult<Vec<Statement>> {
    Rewriter { file }.block(statements)
}

struct Rewriter<'a> {
    file: &'a str,
}

impl Rewriter<'_> {
    fn block(&self, statements: Vec<Statement>) -> RewriteResult<Vec<Statement>> {
        statements.into_iter()
                  .map(|statement| self.statement(statement))
                  .collect()
    }

    fn statement(&self, statement: Statement) -> RewriteResult<Statement> {
        Ok(match statement {
               Statement::Function(def) => Statement::Function(self.function(def)?),
               Statement::Expression { expr, line } | Statement::Emit { expr, line } => {
                   Statement::Emit { expr: self.expr(expr)?,
                                     line }
               },
               Statement::Assignment { name, value, line } => {
                   Statement::Assignment { name,
                                           value: self.expr(value)?,
                                           line }
               },
               Statement::CompoundAssignment { name,
                                               op,
                                               value,
                                               line, } => {
                   Statement::CompoundAssignment { name,
                                                   op,
                                                   value: self.expr(value)?,
                                                   line }
               },
               Statement::IndexAssignment { name,
                                            index,
                                            value,
                                            line, } => {
                   Statement::IndexAssignment { name,
                                                index: self.expr(index)?,
                                                value: self.expr(value)?,
                                                line }
               },
               Statement::If { condition,
                               then_branch,
                               else_branch,
                               line, } => {
                   Statement::If { condition: self.expr(condition)?,
                                   then_branch: self.block(then_branch)?,
                                   else_branch: else_branch.map(|b| self.block(b)).transpose()?,
                                   line }
               },
               Statement::For { var,
                                iterable,
                                body,
                                line, } => {
                   Statement::For { var,
                                    iterable: self.expr(iterable)?,
                                    body: self.block(body)?,
                                    line }
               },
               Statement::While { condition, body, line } => {
                   Statement::While { condition: self.expr(condition)?,
                                      body: self.block(body)?,
                                      line }
               },
               Statement::Return { value, line } => {
                   Statement::Return { value: value.map(|v| self.expr(v)).transpose()?,
                                       line }
               },
               other @ (Statement::Break { .. }
                        | Statement::Continue { .. }
                        | Statement::Import { .. }) => other,
           })
    }

    fn function(&self, def: Rc<FunctionDef>) -> RewriteResult<Rc<FunctionDef>> {
        let class = classify(&def);
        if class == FunctionClass::AlreadyWrapped {
            return Ok(def);
        }

        let def = Rc::unwrap_or_clone(def);
        trace!(function = %def.name, ?class, "rewriting function");

        Ok(Rc::new(FunctionDef { wrap: match class {
                                     FunctionClass::Reserved => WrapMode::Reserved,
                                     _ => WrapMode::Gathering,
                                 },
                                 body: self.block(def.body)?,
                                 ..def }))
    }

    fn expr(&self, expr: Expr) -> RewriteResult<Expr> {
        Ok(match expr {
               Expr::Str { value, line } => self.literal(&value, line)?,
               Expr::Concat { parts, line } => {
                   Expr::Concat { parts: self.exprs(parts)?,
                                  line }
               },
               Expr::Stringify { expr, line } => {
                   Expr::Stringify { expr: Box::new(self.expr(*expr)?),
                                     line }
               },
               Expr::UnaryOp { op, expr, line } => {
                   Expr::UnaryOp { op,
                                   expr: Box::new(self.expr(*expr)?),
                                   line }
               },
               Expr::BinaryOp { left,
                                op,
                                right,
                                line, } => {
                   Expr::BinaryOp { left: Box::new(self.expr(*left)?),
                                    op,
                                    right: Box::new(self.expr(*right)?),
                                    line }
               },
               Expr::Conditional { condition,
                                   then_branch,
                                   else_branch,
                                   line, } => {
                   Expr::Conditional { condition:   Box::new(self.expr(*condition)?),
                                       then_branch: Box::new(self.expr(*then_branch)?),
                                       else_branch: Box::new(self.expr(*else_branch)?),
                                       line, }
               },
               Expr::Call { callee,
                            arguments,
                            line, } => {
                   Expr::Call { callee: Box::new(self.expr(*callee)?),
                                arguments: self.exprs(arguments)?,
                                line }
               },
               Expr::Index { target, index, line } => {
                   Expr::Index { target: Box::new(self.expr(*target)?),
                                 index: Box::new(self.expr(*index)?),
                                 line }
               },
               Expr::ListLiteral { elements, line } => {
                   Expr::ListLiteral { elements: self.exprs(elements)?,
                                       line }
               },
               Expr::Lambda { params, body, line } => {
                   Expr::Lambda { params,
                                  body: Rc::new(self.expr(Rc::unwrap_or_clone(body))?),
                                  line }
               },
               other @ (Expr::Literal { .. } | Expr::Variable { .. }) => other,
           })
    }

    fn exprs(&self, exprs: Vec<Expr>) -> RewriteResult<Vec<Expr>> {
        exprs.into_iter().map(|expr| self.expr(expr)).collect()
    }

    /// Desugars one string literal.
    fn literal(&self, text: &str, line: usize) -> RewriteResult<Expr> {
        let segments = split(text).map_err(|imbalance| {
                                      TemplateError::UnbalancedMarkers {
                                          file: self.file.to_string(),
                                          line,
                                          fragment: truncate_fragment(&strip_comments(text)),
                                          imbalance,
                                      }
                                  })?;

        if let [Segment::Literal(value)] = segments.as_slice() {
            return Ok(Expr::Str { value: value.clone(),
                                  line });
        }

        let mut parts = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment {
                Segment::Literal(value) if value.is_empty() => {},
                Segment::Literal(value) => parts.push(Expr::Str { value, line }),
                Segment::Expression(source) if source.trim().is_empty() => {},
                Segment::Expression(source) => {
                    let parsed = parse_expression_source(&source, line).map_err(|cause| {
                        TemplateError::MalformedInterpolation { file: self.file.to_string(),
                                                                line,
                                                                fragment: truncate_fragment(&source),
                                                                cause }
                    })?;
                    parts.push(Expr::Stringify { expr: Box::new(self.expr(parsed)?),
                                                 line });
                },
            }
        }

        Ok(Expr::Concat { parts, line })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        interpreter::{lexer::tokenize, parser::core::parse_program},
        template::splitter::MarkerImbalance,
    };

    fn rewrite(source: &str) -> RewriteResult<Vec<Statement>> {
        let tokens = tokenize(source, 1).unwrap();
        let statements = parse_program(&mut tokens.iter().peekable()).unwrap();
        rewrite_program(statements, "test.tmpl")
    }

    fn only_emitted(source: &str) -> Expr {
        match rewrite(source).unwrap().remove(0) {
            Statement::Emit { expr, .. } => expr,
            other => panic!("expected an emit, got {other:?}"),
        }
    }

    #[test]
    fn expression_statements_become_emits() {
        let statements = rewrite("1\nx = 2\nx").unwrap();

        assert!(matches!(statements[0], Statement::Emit { .. }));
        assert!(matches!(statements[1], Statement::Assignment { .. }));
        assert!(matches!(statements[2], Statement::Emit { .. }));
    }

    #[test]
    fn plain_literal_stays_a_string() {
        assert_eq!(only_emitted("\"plain ## gone\""),
                   Expr::Str { value: "plain ".to_string(),
                               line:  1, });
    }

    #[test]
    fn interpolated_literal_becomes_concat() {
        let Expr::Concat { parts, .. } = only_emitted("\"a{{x}}b{{ }}\"") else {
            panic!("expected a concatenation");
        };

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0],
                   Expr::Str { value: "a".to_string(),
                               line:  1, });
        assert!(matches!(&parts[1], Expr::Stringify { expr, .. }
                         if matches!(**expr, Expr::Variable { ref name, .. } if name == "x")));
        assert_eq!(parts[2],
                   Expr::Str { value: "b".to_string(),
                               line:  1, });
    }

    #[test]
    fn nested_literals_are_rewritten_too() {
        let Expr::Concat { parts, .. } = only_emitted("\"{{ '[{{y}}]' }}\"") else {
            panic!("expected a concatenation");
        };
        let Expr::Stringify { expr, .. } = &parts[0] else {
            panic!("expected a stringified segment");
        };

        assert!(matches!(**expr, Expr::Concat { .. }));
    }

    #[test]
    fn functions_are_classified() {
        let statements = rewrite("fn f() { 1 }\nfn __init__() { 2 }").unwrap();
        let wraps = statements.iter()
                              .filter_map(|statement| match statement {
                                  Statement::Function(def) => Some(def.wrap),
                                  _ => None,
                              })
                              .collect::<Vec<_>>();

        assert_eq!(wraps, vec![WrapMode::Gathering, WrapMode::Reserved]);
    }

    #[test]
    fn rewriting_twice_changes_nothing() {
        let once = rewrite("fn f() { \"a{{1}}\" }").unwrap();
        let twice = rewrite_program(once.clone(), "test.tmpl").unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn nested_function_bodies_are_rewritten() {
        let statements = rewrite("fn outer() {\n  fn inner() { 1 }\n  inner()\n}").unwrap();
        let Statement::Function(outer) = &statements[0] else {
            panic!("expected a function");
        };

        assert!(matches!(&outer.body[0], Statement::Function(def) if def.wrap == WrapMode::Gathering));
        assert!(matches!(outer.body[1], Statement::Emit { .. }));
    }

    #[test]
    fn unbalanced_literal_is_a_compile_error() {
        let error = rewrite("x = 1\ny = \"a{{b\"").unwrap_err();

        assert_eq!(error,
                   TemplateError::UnbalancedMarkers { file:      "test.tmpl".to_string(),
                                                      line:      2,
                                                      fragment:  "a{{b".to_string(),
                                                      imbalance: MarkerImbalance::Unclosed { depth: 1 }, });
    }

    #[test]
    fn malformed_segment_is_a_compile_error() {
        let error = rewrite("\"{{ 1 + }}\"").unwrap_err();

        assert!(matches!(error, TemplateError::MalformedInterpolation { ref fragment, line: 1, .. }
                                if fragment == " 1 + "));
    }
}
