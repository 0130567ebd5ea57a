use crate::token::Token;
use crate::value::Value;
use astgen::generate_ast;

generate_ast!(
    Expr,
    [
        Binary   => { left: Box<Expr>, operator: Token, right: Box<Expr> };
        Group    => { inner: Box<Expr> };
        Literal  => { value: Value };
        Unary    => { operator: Token, operand: Box<Expr> };
    ]
);
