use crate::{
    expr::Expr,
    stmt::Stmt,
};

/// Renders an expression in prefix form, e.g. `(+ 1 (* 2 3))`.
pub fn print(e: &Expr) -> String {
    match e {
        Expr::Binary(b) => parenthesize(
            b.operator.lexeme.as_str(),
            &[b.left.as_ref(), b.right.as_ref()]
        ),
        Expr::Group(g) => parenthesize("group", &[g.inner.as_ref()]),
        Expr::Literal(l) => l.value.to_string(),
        Expr::Unary(u) => parenthesize(
            u.operator.lexeme.as_str(),
            &[u.operand.as_ref()]
        ),
    }
}

pub fn print_stmt(s: &Stmt) -> String {
    match s {
        Stmt::Expression(e) => parenthesize("expr", &[&e.expression]),
        Stmt::Print(p) => parenthesize("print", &[&p.expression]),
    }
}

fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
    let mut s = String::new();
    s.push('(');
    s.push_str(name);

    for e in exprs.iter() {
        s.push(' ');
        s.push_str(print(e).as_str());
    }

    s.push(')');
    s
}
