use std::io::{self, Write};

use crate::{
    error::{Diagnostics, Error, ErrorKind},
    interpreter::Interpreter,
    parser::Parser,
    printer,
    scanner::Scanner,
    stmt::Stmt,
    token::Token,
    value::Value,
};

/// One interpreter session. Program output goes to `Out`, diagnostics to
/// `ErrOut`, one per line. The error flags describe the most recent `run`.
pub struct Lox<Out, ErrOut> {
    interpreter: Interpreter<Out>,
    err_out: ErrOut,
    had_syntax_error: bool,
    had_runtime_error: bool,
}

impl <Out: Write, ErrOut: Write> Lox<Out, ErrOut> {
    pub fn new(out: Out, err_out: ErrOut) -> Self {
        Self {
            interpreter: Interpreter::new(out),
            err_out,
            had_syntax_error: false,
            had_runtime_error: false,
        }
    }

    pub fn had_syntax_error(&self) -> bool {
        self.had_syntax_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Scans, parses and executes `source`. Nothing is executed if any
    /// syntax error was found. The returned error is only ever a failure to
    /// write to one of the sinks.
    pub fn run(&mut self, source: &str) -> io::Result<()> {
        let statements = match self.front_end(source)? {
            Some(statements) => statements,
            None => return Ok(()),
        };

        match self.interpreter.interpret(&statements) {
            Ok(()) => Ok(()),
            Err(e) => self.report_runtime(e),
        }
    }

    /// Parses `source` and writes each statement's tree to the output sink
    /// instead of executing it.
    pub fn print_ast(&mut self, source: &str) -> io::Result<()> {
        if let Some(statements) = self.front_end(source)? {
            let out = self.interpreter.writer_mut();
            for s in statements.iter() {
                writeln!(out, "{}", printer::print_stmt(s))?;
            }
        }
        Ok(())
    }

    /// Evaluates `source` as a single expression and returns its value.
    pub fn run_expression(&mut self, source: &str) -> io::Result<Option<Value>> {
        self.reset();

        let tokens = match self.scan(source)? {
            Some(tokens) => tokens,
            None => return Ok(None),
        };

        let expression = match Parser::new(tokens.into_iter()).parse_expression() {
            Ok(e) => e,
            Err(e) => {
                self.had_syntax_error = true;
                writeln!(self.err_out, "{}", e)?;
                return Ok(None);
            },
        };

        match self.interpreter.evaluate(&expression) {
            Ok(value) => Ok(Some(value)),
            Err(e) => self.report_runtime(e).map(|_| None),
        }
    }

    pub fn into_parts(self) -> (Out, ErrOut) {
        (self.interpreter.into_writer(), self.err_out)
    }

    fn reset(&mut self) {
        self.had_syntax_error = false;
        self.had_runtime_error = false;
    }

    /// Resets the flags, then scans and parses. `None` means a syntax error
    /// was reported.
    fn front_end(&mut self, source: &str) -> io::Result<Option<Vec<Stmt>>> {
        self.reset();

        let tokens = match self.scan(source)? {
            Some(tokens) => tokens,
            None => return Ok(None),
        };

        let (statements, errors) = Parser::new(tokens.into_iter()).parse();
        if !errors.is_empty() {
            self.report_syntax(errors)?;
            return Ok(None);
        }

        Ok(Some(statements))
    }

    fn scan(&mut self, source: &str) -> io::Result<Option<Vec<Token>>> {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        if !errors.is_empty() {
            self.report_syntax(errors)?;
            return Ok(None);
        }
        Ok(Some(tokens))
    }

    fn report_syntax(&mut self, errors: Diagnostics) -> io::Result<()> {
        self.had_syntax_error = true;
        writeln!(self.err_out, "{}", errors)
    }

    fn report_runtime(&mut self, e: Error) -> io::Result<()> {
        if let ErrorKind::Io(_) = e.kind() {
            return Err(e.into());
        }
        self.had_runtime_error = true;
        writeln!(self.err_out, "{}", e)
    }
}
