use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, RawTemplatePart, Token, TokenKind};
use std::rc::Rc;
use thiserror::Error;

/// Parser error type
#[derive(Debug, Error)]
#[error("{message} (line {}, column {})", .location.line, .location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for the script subset
pub struct Parser {
    source: Rc<str>,
    tokens: Vec<Token>,
    position: usize,
    /// Current statement/expression nesting
    depth: usize,
}

/// Deepest statement/expression nesting accepted before parsing gives up
const MAX_NESTING_DEPTH: usize = 512;

/// Tokenize and parse a whole script
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    Parser::new(source)?.parse_program()
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            source: Rc::from(source),
            tokens,
            position: 0,
            depth: 0,
        })
    }

    /// Parse the whole input as the body of the implicit top-level function
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            program.body.push(self.parse_statement()?);
        }

        Ok(program)
    }

    /// Parse a standalone expression that must consume all input
    pub fn parse_standalone_expression(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if !self.is_at_end() {
            return Err(self.unexpected());
        }
        Ok(expr)
    }

    fn enter_nesting(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError {
                message: "Code is nested too deeply".to_string(),
                location: self.current_location(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    // ===== Statements =====

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        self.enter_nesting()?;
        let stmt = self.parse_statement_inner();
        self.depth -= 1;
        stmt
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        match self.peek_kind() {
            TokenKind::Let | TokenKind::Const | TokenKind::Var => {
                let stmt = self.parse_variable_declaration()?;
                self.consume_semicolon()?;
                Ok(stmt)
            }
            TokenKind::Function => {
                let def = self.parse_function(true)?;
                Ok(Stmt::FunctionDecl(def))
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Throw => {
                self.advance();
                if self.peek().newline_before {
                    return Err(ParseError {
                        message: "Illegal newline after throw".to_string(),
                        location: self.current_location(),
                    });
                }
                let expr = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(Stmt::Throw { expr, location: loc })
            }
            TokenKind::Break => {
                self.advance();
                self.consume_semicolon()?;
                Ok(Stmt::Break(loc))
            }
            TokenKind::Continue => {
                self.advance();
                self.consume_semicolon()?;
                Ok(Stmt::Continue(loc))
            }
            TokenKind::LBrace => {
                let body = self.parse_block()?;
                Ok(Stmt::Block(body, loc))
            }
            TokenKind::Semicolon => {
                self.advance();
                Ok(Stmt::Empty(loc))
            }
            _ => {
                let expr = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(Stmt::Expression(expr, loc))
            }
        }
    }

    /// Parse `{ statements }`
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect_token(&TokenKind::LBrace, "Expected '{'")?;
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        self.expect_token(&TokenKind::RBrace, "Expected '}' to close block")?;
        Ok(statements)
    }

    /// Parse `let|const|var name [= expr], ...` without the terminating semicolon
    fn parse_variable_declaration(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        let kind = self.parse_decl_kind()?;

        let mut declarations = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            let init = if self.match_token(&TokenKind::Eq) {
                Some(self.parse_assignment()?)
            } else {
                if kind == DeclKind::Const {
                    return Err(ParseError {
                        message: "Missing initializer in const declaration".to_string(),
                        location: self.current_location(),
                    });
                }
                None
            };
            declarations.push((name, init));

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(Stmt::VarDecl {
            kind,
            declarations,
            location: loc,
        })
    }

    fn parse_decl_kind(&mut self) -> Result<DeclKind, ParseError> {
        if self.match_token(&TokenKind::Let) {
            Ok(DeclKind::Let)
        } else if self.match_token(&TokenKind::Const) {
            Ok(DeclKind::Const)
        } else if self.match_token(&TokenKind::Var) {
            Ok(DeclKind::Var)
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'return'

        // A line break right after `return` ends the statement
        let expr = if self.at_statement_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;

        Ok(Stmt::Return {
            expr,
            location: loc,
        })
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'if'

        self.expect_token(&TokenKind::LParen, "Expected '(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_token(&TokenKind::RParen, "Expected ')' after if condition")?;

        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'while'

        self.expect_token(&TokenKind::LParen, "Expected '(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_token(&TokenKind::RParen, "Expected ')' after while condition")?;
        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::While {
            condition,
            body,
            location: loc,
        })
    }

    fn parse_do_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'do'

        let body = Box::new(self.parse_statement()?);
        self.expect_token(&TokenKind::While, "Expected 'while' after do body")?;
        self.expect_token(&TokenKind::LParen, "Expected '(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_token(&TokenKind::RParen, "Expected ')' after do-while condition")?;
        // The semicolon after do-while is always optional
        self.match_token(&TokenKind::Semicolon);

        Ok(Stmt::DoWhile {
            body,
            condition,
            location: loc,
        })
    }

    /// Parse `for (init; cond; update)`, `for (x of iterable)` or `for (k in object)`
    fn parse_for_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'for'
        self.expect_token(&TokenKind::LParen, "Expected '(' after 'for'")?;

        // for-of / for-in heads: [let|const|var] name (of|in) expr
        let decl_offset = usize::from(matches!(
            self.peek_kind(),
            TokenKind::Let | TokenKind::Const | TokenKind::Var
        ));
        let name_is_ident = matches!(
            self.peek_ahead(decl_offset).map(|t| &t.kind),
            Some(TokenKind::Ident(_))
        );
        let iter_kind = match self.peek_ahead(decl_offset + 1).map(|t| &t.kind) {
            Some(TokenKind::Ident(word)) if word == "of" => Some(IterKind::Of),
            Some(TokenKind::In) => Some(IterKind::In),
            _ => None,
        };

        if let (true, Some(iter_kind)) = (name_is_ident, iter_kind) {
            let kind = if decl_offset == 1 {
                Some(self.parse_decl_kind()?)
            } else {
                None
            };
            let name = self.expect_identifier()?;
            self.advance(); // consume 'of' / 'in'
            let iterable = self.parse_expression()?;
            self.expect_token(&TokenKind::RParen, "Expected ')' after for-loop head")?;
            let body = Box::new(self.parse_statement()?);

            return Ok(Stmt::ForEach {
                kind,
                name,
                iter_kind,
                iterable,
                body,
                location: loc,
            });
        }

        let init = if self.check(&TokenKind::Semicolon) {
            None
        } else if decl_offset == 1 {
            Some(Box::new(self.parse_variable_declaration()?))
        } else {
            let init_loc = self.current_location();
            Some(Box::new(Stmt::Expression(self.parse_expression()?, init_loc)))
        };
        self.expect_token(&TokenKind::Semicolon, "Expected ';' after for-loop initializer")?;

        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_token(&TokenKind::Semicolon, "Expected ';' after for-loop condition")?;

        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_token(&TokenKind::RParen, "Expected ')' after for-loop head")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::For {
            init,
            condition,
            update,
            body,
            location: loc,
        })
    }

    fn parse_try_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'try'

        let block = self.parse_block()?;

        let mut catch_param = None;
        let catch_block = if self.match_token(&TokenKind::Catch) {
            if self.match_token(&TokenKind::LParen) {
                catch_param = Some(self.expect_identifier()?);
                self.expect_token(&TokenKind::RParen, "Expected ')' after catch parameter")?;
            }
            Some(self.parse_block()?)
        } else {
            None
        };

        let finally_block = if self.match_token(&TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };

        if catch_block.is_none() && finally_block.is_none() {
            return Err(ParseError {
                message: "Missing catch or finally after try".to_string(),
                location: self.current_location(),
            });
        }

        Ok(Stmt::Try {
            block,
            catch_param,
            catch_block,
            finally_block,
            location: loc,
        })
    }

    /// Parse `function [name](params) { body }`
    fn parse_function(&mut self, require_name: bool) -> Result<Rc<FunctionDef>, ParseError> {
        let loc = self.current_location();
        let start = self.peek().start;
        self.expect_token(&TokenKind::Function, "Expected 'function'")?;

        let name = if let TokenKind::Ident(name) = self.peek_kind() {
            self.advance();
            Some(name)
        } else if require_name {
            return Err(ParseError {
                message: format!("Expected function name, found {}", self.peek().kind),
                location: self.current_location(),
            });
        } else {
            None
        };

        self.expect_token(&TokenKind::LParen, "Expected '(' after function name")?;
        let params = self.parse_parameter_list()?;
        self.expect_token(&TokenKind::RParen, "Expected ')' after parameters")?;
        let body = self.parse_block()?;

        Ok(Rc::new(FunctionDef {
            name,
            params,
            body: FunctionBody::Block(body),
            is_arrow: false,
            source: self.source_since(start),
            location: loc,
        }))
    }

    /// Parse identifiers separated by commas, stopping before ')'
    fn parse_parameter_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut params = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(params);
        }

        loop {
            params.push(self.expect_identifier()?);
            if !self.match_token(&TokenKind::Comma) || self.check(&TokenKind::RParen) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse an arrow function starting at its parameter list
    fn parse_arrow_function(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();
        let start = self.peek().start;

        let params = if self.match_token(&TokenKind::LParen) {
            let params = self.parse_parameter_list()?;
            self.expect_token(&TokenKind::RParen, "Expected ')' after arrow parameters")?;
            params
        } else {
            vec![self.expect_identifier()?]
        };
        self.expect_token(&TokenKind::Arrow, "Expected '=>'")?;

        let body = if self.check(&TokenKind::LBrace) {
            FunctionBody::Block(self.parse_block()?)
        } else {
            FunctionBody::Expression(Box::new(self.parse_assignment()?))
        };

        Ok(Expr::Function(Rc::new(FunctionDef {
            name: None,
            params,
            body,
            is_arrow: true,
            source: self.source_since(start),
            location: loc,
        })))
    }

    /// Whether the tokens at the cursor start an arrow function
    fn is_arrow_ahead(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Ident(_) => {
                matches!(self.peek_ahead(1).map(|t| &t.kind), Some(TokenKind::Arrow))
            }
            TokenKind::LParen => {
                let mut depth = 0usize;
                let mut index = self.position;
                while let Some(token) = self.tokens.get(index) {
                    match token.kind {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => {
                            depth -= 1;
                            if depth == 0 {
                                return matches!(
                                    self.tokens.get(index + 1).map(|t| &t.kind),
                                    Some(TokenKind::Arrow)
                                );
                            }
                        }
                        TokenKind::Eof => return false,
                        _ => {}
                    }
                    index += 1;
                }
                false
            }
            _ => false,
        }
    }

    // ===== Expressions =====

    /// Parse expression (top-level entry point)
    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// Parse assignment (right-associative) or an arrow function
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        self.enter_nesting()?;
        let expr = self.parse_assignment_inner();
        self.depth -= 1;
        expr
    }

    fn parse_assignment_inner(&mut self) -> Result<Expr, ParseError> {
        if self.is_arrow_ahead() {
            return self.parse_arrow_function();
        }

        let expr = self.parse_conditional()?;

        let loc = self.current_location();
        let op = match self.peek_kind() {
            TokenKind::Eq => None,
            TokenKind::PlusEq => Some(BinOp::Add),
            TokenKind::MinusEq => Some(BinOp::Sub),
            TokenKind::StarEq => Some(BinOp::Mul),
            TokenKind::SlashEq => Some(BinOp::Div),
            TokenKind::PercentEq => Some(BinOp::Mod),
            _ => return Ok(expr),
        };
        self.advance();

        if !matches!(
            expr,
            Expr::Identifier(..) | Expr::Member { .. } | Expr::Index { .. }
        ) {
            return Err(ParseError {
                message: "Invalid left-hand side in assignment".to_string(),
                location: loc,
            });
        }

        let value = Box::new(self.parse_assignment()?);
        Ok(Expr::Assign {
            op,
            target: Box::new(expr),
            value,
            location: loc,
        })
    }

    /// Parse ternary: condition ? then_expr : else_expr
    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_nullish()?;

        if self.match_token(&TokenKind::Question) {
            let loc = self.previous_location();
            let then_expr = Box::new(self.parse_assignment()?);
            self.expect_token(&TokenKind::Colon, "Expected ':' in conditional expression")?;
            let else_expr = Box::new(self.parse_assignment()?);

            return Ok(Expr::Conditional {
                condition: Box::new(expr),
                then_expr,
                else_expr,
                location: loc,
            });
        }

        Ok(expr)
    }

    fn parse_nullish(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_or()?;

        while self.match_token(&TokenKind::QuestionQuestion) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_logical_or()?);
            left = Expr::Logical {
                op: LogicalOp::Nullish,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.match_token(&TokenKind::OrOr) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_logical_and()?);
            left = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        while self.match_token(&TokenKind::AndAnd) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_equality()?);
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::Ne,
                TokenKind::EqEqEq => BinOp::StrictEq,
                TokenKind::NotEqEq => BinOp::StrictNe,
                _ => break,
            };
            let loc = self.current_location();
            self.advance();
            let right = Box::new(self.parse_relational()?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Le => BinOp::Le,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Ge => BinOp::Ge,
                _ => break,
            };
            let loc = self.current_location();
            self.advance();
            let right = Box::new(self.parse_additive()?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let loc = self.current_location();
            self.advance();
            let right = Box::new(self.parse_multiplicative()?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_exponent()?;

        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            let loc = self.current_location();
            self.advance();
            let right = Box::new(self.parse_exponent()?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse `**` (right-associative, binds tighter than `*`)
    fn parse_exponent(&mut self) -> Result<Expr, ParseError> {
        let unary_base = matches!(
            self.peek_kind(),
            TokenKind::Minus | TokenKind::Plus | TokenKind::Bang | TokenKind::Typeof
        );
        let base = self.parse_unary()?;

        if self.match_token(&TokenKind::StarStar) {
            let loc = self.previous_location();
            // `-2 ** 2` is ambiguous; `(-2) ** 2` is fine
            if unary_base {
                return Err(ParseError {
                    message: "Unary operator used immediately before exponentiation expression; \
                              parenthesize the operand"
                        .to_string(),
                    location: loc,
                });
            }
            let exponent = Box::new(self.parse_exponent()?);
            return Ok(Expr::Binary {
                op: BinOp::Pow,
                left: Box::new(base),
                right: exponent,
                location: loc,
            });
        }

        Ok(base)
    }

    /// Parse unary: - + ! typeof ++x --x
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        let op = match self.peek_kind() {
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Plus => Some(UnOp::Plus),
            TokenKind::Bang => Some(UnOp::Not),
            TokenKind::Typeof => Some(UnOp::TypeOf),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = Box::new(self.parse_unary()?);
            return Ok(Expr::Unary {
                op,
                operand,
                location: loc,
            });
        }

        let update = match self.peek_kind() {
            TokenKind::PlusPlus => Some(UpdateOp::Inc),
            TokenKind::MinusMinus => Some(UpdateOp::Dec),
            _ => None,
        };
        if let Some(op) = update {
            self.advance();
            let target = self.parse_unary()?;
            self.check_update_target(&target, loc)?;
            return Ok(Expr::Update {
                op,
                prefix: true,
                target: Box::new(target),
                location: loc,
            });
        }

        self.parse_postfix()
    }

    fn check_update_target(&self, target: &Expr, loc: SourceLocation) -> Result<(), ParseError> {
        if matches!(
            target,
            Expr::Identifier(..) | Expr::Member { .. } | Expr::Index { .. }
        ) {
            Ok(())
        } else {
            Err(ParseError {
                message: "Invalid left-hand side expression in update operation".to_string(),
                location: loc,
            })
        }
    }

    /// Parse postfix (x++ x--, only on the same line)
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_call_member()?;
        let loc = self.current_location();

        if self.peek().newline_before {
            return Ok(expr);
        }

        let op = match self.peek_kind() {
            TokenKind::PlusPlus => UpdateOp::Inc,
            TokenKind::MinusMinus => UpdateOp::Dec,
            _ => return Ok(expr),
        };
        self.check_update_target(&expr, loc)?;
        self.advance();

        Ok(Expr::Update {
            op,
            prefix: false,
            target: Box::new(expr),
            location: loc,
        })
    }

    /// Parse calls, member access and indexing: a.b, a[b], a(b)
    fn parse_call_member(&mut self) -> Result<Expr, ParseError> {
        let mut expr = if self.check(&TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            let loc = self.current_location();

            if self.match_token(&TokenKind::Dot) {
                let property = self.expect_property_name()?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property,
                    location: loc,
                };
            } else if self.match_token(&TokenKind::LBracket) {
                let index = Box::new(self.parse_expression()?);
                self.expect_token(&TokenKind::RBracket, "Expected ']' after index")?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index,
                    location: loc,
                };
            } else if self.check(&TokenKind::LParen) {
                self.advance();
                let args = self.parse_argument_list()?;
                self.expect_token(&TokenKind::RParen, "Expected ')' after arguments")?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    location: loc,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse `new Callee(args)`; the argument list is optional
    fn parse_new(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'new'

        let mut callee = self.parse_primary()?;
        while self.match_token(&TokenKind::Dot) {
            let member_loc = self.previous_location();
            let property = self.expect_property_name()?;
            callee = Expr::Member {
                object: Box::new(callee),
                property,
                location: member_loc,
            };
        }

        let args = if self.match_token(&TokenKind::LParen) {
            let args = self.parse_argument_list()?;
            self.expect_token(&TokenKind::RParen, "Expected ')' after arguments")?;
            args
        } else {
            Vec::new()
        };

        Ok(Expr::New {
            callee: Box::new(callee),
            args,
            location: loc,
        })
    }

    /// Parse argument list: (expr, expr, ...), trailing comma allowed
    fn parse_argument_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        while !self.check(&TokenKind::RParen) {
            args.push(self.parse_assignment()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(args)
    }

    /// Parse primary (literals, identifiers, grouping, arrays, objects, functions)
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        match self.peek_kind() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Number(n, loc))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Str(Rc::from(s.as_str()), loc))
            }
            TokenKind::Template(parts) => {
                self.advance();
                self.parse_template(parts, loc)
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true, loc))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false, loc))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expr::Null(loc))
            }
            TokenKind::Undefined => {
                self.advance();
                Ok(Expr::Undefined(loc))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Identifier(name, loc))
            }
            TokenKind::Function => Ok(Expr::Function(self.parse_function(false)?)),
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_token(&TokenKind::RParen, "Expected ')' after expression")?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                while !self.check(&TokenKind::RBracket) {
                    elements.push(self.parse_assignment()?);
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect_token(&TokenKind::RBracket, "Expected ']' after array elements")?;
                Ok(Expr::Array(elements, loc))
            }
            TokenKind::LBrace => self.parse_object_literal(),
            _ => Err(self.unexpected()),
        }
    }

    /// Parse `{ key: value, "quoted": value, shorthand }`
    fn parse_object_literal(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();
        self.expect_token(&TokenKind::LBrace, "Expected '{'")?;

        let mut properties = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let key_loc = self.current_location();
            let (key, shorthand_ok) = match self.peek_kind() {
                TokenKind::Ident(name) => (name, true),
                TokenKind::Str(s) => (s, false),
                TokenKind::Number(n) => (crate::memory::value::format_number(n), false),
                kind if keyword_text(&kind).is_some() => {
                    (keyword_text(&kind).unwrap_or_default().to_string(), false)
                }
                _ => return Err(self.unexpected()),
            };
            self.advance();

            let value = if self.match_token(&TokenKind::Colon) {
                self.parse_assignment()?
            } else if shorthand_ok {
                Expr::Identifier(key.clone(), key_loc)
            } else {
                return Err(ParseError {
                    message: format!("Expected ':' after property name, found {}", self.peek().kind),
                    location: self.current_location(),
                });
            };
            properties.push((key, value));

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_token(&TokenKind::RBrace, "Expected '}' after object properties")?;
        Ok(Expr::Object(properties, loc))
    }

    /// Turn raw template parts into text and parsed substitutions
    fn parse_template(
        &mut self,
        parts: Vec<RawTemplatePart>,
        loc: SourceLocation,
    ) -> Result<Expr, ParseError> {
        let mut parsed = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                RawTemplatePart::Text(text) => parsed.push(TemplatePart::Text(text)),
                RawTemplatePart::Expr(source, expr_loc) => {
                    let expr = Parser::new(&source)
                        .and_then(|mut inner| inner.parse_standalone_expression())
                        .map_err(|err| ParseError {
                            message: format!("In template substitution: {}", err.message),
                            location: expr_loc,
                        })?;
                    parsed.push(TemplatePart::Expr(expr));
                }
            }
        }
        Ok(Expr::Template(parsed, loc))
    }

    // ===== Helper methods =====

    /// Accept an explicit `;` or an inserted one (line break, `}` or end of input)
    fn consume_semicolon(&mut self) -> Result<(), ParseError> {
        if self.match_token(&TokenKind::Semicolon) || self.at_statement_end() {
            Ok(())
        } else {
            Err(ParseError {
                message: format!("Expected ';', found {}", self.peek().kind),
                location: self.current_location(),
            })
        }
    }

    fn at_statement_end(&self) -> bool {
        self.peek().newline_before
            || matches!(
                self.peek_kind(),
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
            )
    }

    fn source_since(&self, start: usize) -> Rc<str> {
        let end = self.previous().end;
        Rc::from(self.source.get(start..end).unwrap_or_default())
    }

    fn unexpected(&self) -> ParseError {
        ParseError {
            message: format!("Unexpected token: {}", self.peek().kind),
            location: self.current_location(),
        }
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.position].kind.clone()
    }

    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    fn previous_location(&self) -> SourceLocation {
        self.previous().location
    }

    fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    fn expect_token(&mut self, kind: &TokenKind, message: &str) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                message: format!("{}, found {}", message, self.peek().kind),
                location: self.current_location(),
            })
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = self.peek_kind() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError {
                message: format!("Expected identifier, found {}", self.peek().kind),
                location: self.current_location(),
            })
        }
    }

    /// Property names after `.` may be keywords (`x.new`, `e.catch`)
    fn expect_property_name(&mut self) -> Result<String, ParseError> {
        let kind = self.peek_kind();
        if let TokenKind::Ident(name) = kind {
            self.advance();
            return Ok(name);
        }
        if let Some(text) = keyword_text(&kind) {
            self.advance();
            return Ok(text.to_string());
        }
        Err(ParseError {
            message: format!("Expected property name, found {}", self.peek().kind),
            location: self.current_location(),
        })
    }
}

/// Source spelling of keyword tokens, for contexts where keywords act as names
fn keyword_text(kind: &TokenKind) -> Option<&'static str> {
    Some(match kind {
        TokenKind::Let => "let",
        TokenKind::Const => "const",
        TokenKind::Var => "var",
        TokenKind::Function => "function",
        TokenKind::Return => "return",
        TokenKind::If => "if",
        TokenKind::Else => "else",
        TokenKind::While => "while",
        TokenKind::Do => "do",
        TokenKind::For => "for",
        TokenKind::In => "in",
        TokenKind::Break => "break",
        TokenKind::Continue => "continue",
        TokenKind::Throw => "throw",
        TokenKind::Try => "try",
        TokenKind::Catch => "catch",
        TokenKind::Finally => "finally",
        TokenKind::New => "new",
        TokenKind::Typeof => "typeof",
        TokenKind::True => "true",
        TokenKind::False => "false",
        TokenKind::Null => "null",
        TokenKind::Undefined => "undefined",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source).unwrap().parse_program().unwrap()
    }

    #[test]
    fn test_parse_console_call() {
        let program = parse("console.log(\"hi\")");

        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Stmt::Expression(Expr::Call { callee, args, .. }, _) => {
                assert_eq!(callee.describe(), "console.log");
                assert_eq!(args.len(), 1);
            }
            other => panic!("Expected call statement, got {:?}", other),
        }
    }

    #[test]
    fn test_semicolon_insertion() {
        let program = parse("let a = 1\nlet b = 2\na + b");
        assert_eq!(program.body.len(), 3);

        let err = Parser::new("let a = 1 let b = 2")
            .unwrap()
            .parse_program()
            .unwrap_err();
        assert!(err.message.starts_with("Expected ';'"));
    }

    #[test]
    fn test_return_newline_ends_statement() {
        let program = parse("return\n42");

        assert_eq!(program.body.len(), 2);
        assert!(matches!(program.body[0], Stmt::Return { expr: None, .. }));
    }

    #[test]
    fn test_precedence() {
        let program = parse("1 + 2 * 3 ** 2");

        match &program.body[0] {
            Stmt::Expression(Expr::Binary { op, right, .. }, _) => {
                assert_eq!(*op, BinOp::Add);
                assert!(matches!(**right, Expr::Binary { op: BinOp::Mul, .. }));
            }
            other => panic!("Expected binary expression, got {:?}", other),
        }
    }

    #[test]
    fn test_arrow_functions() {
        let program = parse("const f = (a, b) => a + b\nconst g = x => { return x }");

        match &program.body[1] {
            Stmt::VarDecl { declarations, .. } => match &declarations[0].1 {
                Some(Expr::Function(def)) => {
                    assert!(def.is_arrow);
                    assert_eq!(def.params, vec!["x".to_string()]);
                    assert_eq!(&*def.source, "x => { return x }");
                }
                other => panic!("Expected arrow function, got {:?}", other),
            },
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_function_declaration_keeps_source() {
        let program = parse("function rev(s) { return s }");

        match &program.body[0] {
            Stmt::FunctionDecl(def) => {
                assert_eq!(def.name.as_deref(), Some("rev"));
                assert_eq!(&*def.source, "function rev(s) { return s }");
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_for_of_and_classic_for() {
        let program = parse("for (const c of s) {}\nfor (let i = 0; i < 3; i++) {}\nfor (k in o) {}");

        assert!(matches!(
            program.body[0],
            Stmt::ForEach {
                iter_kind: IterKind::Of,
                kind: Some(DeclKind::Const),
                ..
            }
        ));
        assert!(matches!(program.body[1], Stmt::For { .. }));
        assert!(matches!(
            program.body[2],
            Stmt::ForEach {
                iter_kind: IterKind::In,
                kind: None,
                ..
            }
        ));
    }

    #[test]
    fn test_try_catch_finally() {
        let program = parse("try { f() } catch (e) { g(e) } finally { h() }");

        match &program.body[0] {
            Stmt::Try {
                catch_param,
                catch_block,
                finally_block,
                ..
            } => {
                assert_eq!(catch_param.as_deref(), Some("e"));
                assert!(catch_block.is_some());
                assert!(finally_block.is_some());
            }
            other => panic!("Expected try statement, got {:?}", other),
        }
    }

    #[test]
    fn test_object_literal_and_template() {
        let program = parse("const o = { a: 1, 'b c': 2, d }\n`x=${o.a}`");

        match &program.body[0] {
            Stmt::VarDecl { declarations, .. } => match &declarations[0].1 {
                Some(Expr::Object(props, _)) => {
                    let keys: Vec<&str> = props.iter().map(|(k, _)| k.as_str()).collect();
                    assert_eq!(keys, ["a", "b c", "d"]);
                }
                other => panic!("Expected object literal, got {:?}", other),
            },
            other => panic!("Expected declaration, got {:?}", other),
        }
        assert!(matches!(
            &program.body[1],
            Stmt::Expression(Expr::Template(parts, _), _) if parts.len() == 2
        ));
    }

    #[test]
    fn test_new_error() {
        let program = parse("throw new Error(\"bad\")");

        match &program.body[0] {
            Stmt::Throw {
                expr: Expr::New { callee, args, .. },
                ..
            } => {
                assert_eq!(callee.describe(), "Error");
                assert_eq!(args.len(), 1);
            }
            other => panic!("Expected throw of new expression, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = Parser::new("1 = 2").unwrap().parse_program().unwrap_err();
        assert_eq!(err.message, "Invalid left-hand side in assignment");
    }

    #[test]
    fn test_unexpected_token_location() {
        let err = Parser::new("let x = ;").unwrap().parse_program().unwrap_err();
        assert_eq!(err.message, "Unexpected token: ';'");
        assert_eq!(err.location, SourceLocation::new(1, 9));
    }

    #[test]
    fn test_unary_before_exponent_is_rejected() {
        let err = parse_source("-2 ** 2").unwrap_err();
        assert!(err.message.starts_with("Unary operator used immediately before exponentiation"));
        assert_eq!(err.location, SourceLocation::new(1, 4));

        assert!(parse_source("(-2) ** 2").is_ok());
        assert!(parse_source("2 ** -2").is_ok());
        assert!(parse_source("-(2 ** 2)").is_ok());
    }
}
