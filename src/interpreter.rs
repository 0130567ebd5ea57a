use std::io::Write;

use crate::{
    error::{Error, Result},
    expr::{self, Expr},
    stmt::Stmt,
    token::{Token, TokenKind},
    value::Value,
};

/// Walks statements and expressions. `print` output goes to `writer`.
pub struct Interpreter<W> {
    writer: W,
}

impl <W: Write> Interpreter<W> {
    pub fn new(writer: W) -> Self {
        Interpreter { writer }
    }

    /// Executes statements in order, stopping at the first error.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        for s in statements.iter() {
            self.execute(s)?;
        }
        Ok(())
    }

    pub fn evaluate(&mut self, e: &Expr) -> Result<Value> {
        match e {
            Expr::Binary(b) => self.binary(b),
            Expr::Group(g) => self.evaluate(&g.inner),
            Expr::Literal(l) => Ok(l.value.clone()),
            Expr::Unary(u) => self.unary(u),
        }
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn execute(&mut self, s: &Stmt) -> Result<()> {
        match s {
            Stmt::Expression(e) => {
                self.evaluate(&e.expression)?;
            },
            Stmt::Print(p) => {
                let value = self.evaluate(&p.expression)?;
                writeln!(self.writer, "{}", value)?;
            },
        }
        Ok(())
    }

    fn binary(&mut self, e: &expr::Binary) -> Result<Value> {
        let left = self.evaluate(e.left.as_ref())?;
        let right = self.evaluate(e.right.as_ref())?;
        let op = &e.operator;

        use Value::{Number, String};
        match op.kind {
            TokenKind::Minus => compute_if_numbers(op, left, right, |l, r| l - r),
            TokenKind::Plus => match (left, right) {
                (Number(left), Number(right)) => Ok(Number(left + right)),
                (String(mut left), String(right)) => {
                    left.push_str(right.as_str());
                    Ok(String(left))
                },
                _ => Err(Error::runtime(op.clone(), "operands to + must both be numbers or strings")),
            },
            TokenKind::Slash => compute_if_numbers(op, left, right, |l, r| l / r),
            TokenKind::Star => compute_if_numbers(op, left, right, |l, r| l * r),
            TokenKind::Greater => compute_if_numbers(op, left, right, |l, r| l > r),
            TokenKind::GreaterEqual => compute_if_numbers(op, left, right, |l, r| l >= r),
            TokenKind::Less => compute_if_numbers(op, left, right, |l, r| l < r),
            TokenKind::LessEqual => compute_if_numbers(op, left, right, |l, r| l <= r),
            TokenKind::EqualEqual => Ok(Value::Bool(left.is_equal(&right))),
            TokenKind::BangEqual => Ok(Value::Bool(!left.is_equal(&right))),
            _ => Err(Error::runtime(op.clone(), format!("unknown binary operator {}", op.lexeme))),
        }
    }

    fn unary(&mut self, e: &expr::Unary) -> Result<Value> {
        let operand = self.evaluate(e.operand.as_ref())?;
        let op = &e.operator;

        match (&op.kind, operand) {
            (TokenKind::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
            (TokenKind::Minus, _) => Err(Error::runtime(op.clone(), "operand to - must be a number")),
            (TokenKind::Bang, operand) => Ok(Value::Bool(!operand.is_truthy())),
            _ => Err(Error::runtime(op.clone(), format!("unknown unary operator {}", op.lexeme))),
        }
    }
}

fn compute_if_numbers<T: Into<Value>>(
    op: &Token,
    left: Value,
    right: Value,
    f: impl Fn(f64, f64) -> T
) -> Result<Value> {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => Ok(f(left, right).into()),
        (left, right) => Err(Error::runtime(
            op.clone(),
            format!(
                "operands to {} must both be numbers, got {} and {}",
                op.lexeme,
                left.type_name(),
                right.type_name()
            ),
        )),
    }
}
