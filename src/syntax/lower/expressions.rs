//! Lowering of expressions: chain folding, reference flattening and call
//! normalization.

use smol_str::SmolStr;

use super::{Lowerer, expr_elements};
use crate::base::Span;
use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
use crate::syntax::ast::{
    Argument, ArrayAccess, ArrayInitializer, BinaryExpression, BinaryOperator, Call,
    ElementAccess, EnumReference, Expression, FunctionCallExpression, LeftExpression, Literal,
    LiteralValue, ParenExpression, UnaryExpression, UnaryOperator, VariableReference,
};

impl Lowerer<'_> {
    // =========================================================================
    // Entry
    // =========================================================================

    pub(super) fn lower_expr_element(&mut self, element: &SyntaxElement) -> Option<Expression> {
        match element {
            SyntaxElement::Token(token) => self.lower_literal_token(token),
            SyntaxElement::Node(node) => match node.kind() {
                SyntaxKind::BIN_EXPR => self.fold_binary_chain(node),
                SyntaxKind::UNARY_EXPR => self.lower_unary(node),
                SyntaxKind::PAREN_EXPR => self.lower_paren(node),
                SyntaxKind::VARIABLE_REF => Some(self.lower_reference_expr(node)),
                SyntaxKind::CALL_EXPR => Some(Expression::FunctionCallExpression(
                    FunctionCallExpression {
                        call: self.lower_call_expr(node),
                        span: self.span(node),
                    },
                )),
                SyntaxKind::ARRAY_INIT => Some(self.lower_array_init(node)),
                other => {
                    self.internal(
                        node,
                        format!("unhandled expression: {}", other.display_name()),
                    );
                    None
                }
            },
        }
    }

    /// Placeholder for an expression a parse error already reported.
    pub(super) fn missing_expr(&self, span: Span) -> Expression {
        Expression::Literal(Literal {
            value: LiteralValue::Number(0.0),
            span,
        })
    }

    // =========================================================================
    // Literals
    // =========================================================================

    fn lower_literal_token(&mut self, token: &SyntaxToken) -> Option<Expression> {
        let span = self.token_span(token);
        let text = token.text();
        let value = match token.kind() {
            SyntaxKind::TRUE_KW => LiteralValue::Bool(true),
            SyntaxKind::FALSE_KW => LiteralValue::Bool(false),
            SyntaxKind::NUMBER => match parse_number(text) {
                Some(value) => LiteralValue::Number(value),
                None => {
                    self.internal_at(
                        token.text_range(),
                        format!("malformed numeric literal '{}'", text),
                    );
                    LiteralValue::Number(0.0)
                }
            },
            // Strings drop their quotes; escapes stay for the runtime
            SyntaxKind::STRING => LiteralValue::String(SmolStr::new(&text[1..text.len() - 1])),
            // Time literals and direct addresses keep the raw token image
            SyntaxKind::TIME_LITERAL | SyntaxKind::DIRECT_ADDRESS => {
                LiteralValue::String(SmolStr::new(text))
            }
            SyntaxKind::ENUM_REFERENCE => {
                let (type_name, member) = text.split_once('#').unwrap_or((text, ""));
                return Some(Expression::EnumReference(EnumReference {
                    type_name: SmolStr::new(type_name),
                    member: SmolStr::new(member),
                    span,
                }));
            }
            other => {
                self.internal_at(
                    token.text_range(),
                    format!("unhandled literal token: {}", other.display_name()),
                );
                return None;
            }
        };
        Some(Expression::Literal(Literal { value, span }))
    }

    // =========================================================================
    // Operators
    // =========================================================================

    /// Fold the flat `operand op operand op ...` chain of a `BIN_EXPR` node
    /// into strictly binary, left-associative trees. A single-operand chain
    /// degenerates to its sole child.
    fn fold_binary_chain(&mut self, node: &SyntaxNode) -> Option<Expression> {
        let operands = expr_elements(node);
        let operators: Vec<_> = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter_map(|t| binary_op(t.kind()))
            .collect();

        let mut iter = operands.iter();
        let first = iter.next()?;
        let mut acc = self
            .lower_expr_element(first)
            .unwrap_or_else(|| self.missing_expr(self.span(node)));

        for (op, operand) in operators.into_iter().zip(iter) {
            let right = self
                .lower_expr_element(operand)
                .unwrap_or_else(|| self.missing_expr(self.span(node)));
            let span = span_union(acc.span(), right.span());
            acc = Expression::BinaryExpression(BinaryExpression {
                left: Box::new(acc),
                operator: op,
                right: Box::new(right),
                span,
            });
        }
        Some(acc)
    }

    fn lower_unary(&mut self, node: &SyntaxNode) -> Option<Expression> {
        let span = self.span(node);
        let operator = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find_map(|t| match t.kind() {
                SyntaxKind::NOT_KW => Some(UnaryOperator::Not),
                SyntaxKind::MINUS => Some(UnaryOperator::Neg),
                _ => None,
            })?;
        let operand = expr_elements(node)
            .first()
            .and_then(|e| self.lower_expr_element(e))
            .unwrap_or_else(|| self.missing_expr(span));
        Some(Expression::UnaryExpression(UnaryExpression {
            operator,
            operand: Box::new(operand),
            span,
        }))
    }

    fn lower_paren(&mut self, node: &SyntaxNode) -> Option<Expression> {
        let span = self.span(node);
        let expr = expr_elements(node)
            .first()
            .and_then(|e| self.lower_expr_element(e))
            .unwrap_or_else(|| self.missing_expr(span));
        Some(Expression::ParenExpression(ParenExpression {
            expr: Box::new(expr),
            span,
        }))
    }

    // =========================================================================
    // References and calls
    // =========================================================================

    /// A reference path in expression position:
    /// - `obj.member` (two plain elements) reads a member - the runtime
    ///   sees a call with empty arguments;
    /// - `x[i]` (one indexed element) is an array access;
    /// - anything else stays a variable reference.
    fn lower_reference_expr(&mut self, node: &SyntaxNode) -> Expression {
        let span = self.span(node);
        let elements = self.lower_access_elements(node);

        match elements.as_slice() {
            [object, member] if object.index.is_none() && member.index.is_none() => {
                Expression::FunctionCallExpression(FunctionCallExpression {
                    call: Call {
                        name: None,
                        object: Some(object.name.clone()),
                        member: Some(member.name.clone()),
                        args: Vec::new(),
                    },
                    span,
                })
            }
            [single] if single.index.is_some() => {
                let array = Expression::VariableReference(VariableReference {
                    elements: vec![ElementAccess {
                        name: single.name.clone(),
                        index: None,
                    }],
                    span,
                });
                let index = single.index.clone().unwrap_or_else(|| self.missing_expr(span));
                Expression::ArrayAccess(ArrayAccess {
                    array: Box::new(array),
                    index: Box::new(index),
                    span,
                })
            }
            _ => Expression::VariableReference(VariableReference { elements, span }),
        }
    }

    /// Flatten a reference path into its ordered element accesses.
    fn lower_access_elements(&mut self, node: &SyntaxNode) -> Vec<ElementAccess> {
        let parts: Vec<_> = node
            .children()
            .filter(|n| n.kind() == SyntaxKind::ACCESS_ELEMENT)
            .collect();
        parts
            .iter()
            .filter_map(|part| {
                let name = super::name_token(part)?;
                let index = expr_elements(part)
                    .first()
                    .and_then(|e| self.lower_expr_element(e));
                Some(ElementAccess {
                    name: SmolStr::new(name.text()),
                    index,
                })
            })
            .collect()
    }

    /// The flattened target of an assignment.
    pub(super) fn lower_left_expression(&mut self, node: &SyntaxNode) -> LeftExpression {
        LeftExpression {
            elements: self.lower_access_elements(node),
            span: self.span(node),
        }
    }

    /// Normalize a `CALL_EXPR` node (reference path plus argument list).
    pub(super) fn lower_call_expr(&mut self, node: &SyntaxNode) -> Call {
        let mut call = node
            .children()
            .find(|n| n.kind() == SyntaxKind::VARIABLE_REF)
            .map(|path| self.call_from_reference(&path))
            .unwrap_or_else(|| {
                self.internal(node, "call without a callee");
                Call {
                    name: None,
                    object: None,
                    member: None,
                    args: Vec::new(),
                }
            });

        if let Some(arg_list) = node
            .children()
            .find(|n| n.kind() == SyntaxKind::ARG_LIST)
        {
            call.args = self.lower_arguments(&arg_list);
        }
        call
    }

    /// Build the callee from a reference path: one element is a plain call,
    /// two are a member call.
    pub(super) fn call_from_reference(&mut self, node: &SyntaxNode) -> Call {
        let elements = self.lower_access_elements(node);
        match elements.as_slice() {
            [single] if single.index.is_none() => Call {
                name: Some(single.name.clone()),
                object: None,
                member: None,
                args: Vec::new(),
            },
            [object, member] if object.index.is_none() && member.index.is_none() => Call {
                name: None,
                object: Some(object.name.clone()),
                member: Some(member.name.clone()),
                args: Vec::new(),
            },
            _ => {
                self.internal(node, "unsupported callee shape");
                let joined: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
                Call {
                    name: Some(SmolStr::new(joined.join("."))),
                    object: None,
                    member: None,
                    args: Vec::new(),
                }
            }
        }
    }

    fn lower_arguments(&mut self, arg_list: &SyntaxNode) -> Vec<Argument> {
        let nodes: Vec<_> = arg_list
            .children()
            .filter(|n| n.kind() == SyntaxKind::ARGUMENT)
            .collect();
        nodes
            .iter()
            .filter_map(|arg| self.lower_argument(arg))
            .collect()
    }

    fn lower_argument(&mut self, node: &SyntaxNode) -> Option<Argument> {
        let named = super::child_token(node, SyntaxKind::ASSIGN).is_some();
        if named {
            let name = super::name_token(node).map(|t| SmolStr::new(t.text()));
            let value = self
                .initializer_after_assign(node)
                .unwrap_or_else(|| self.missing_expr(self.span(node)));
            Some(Argument { name, value })
        } else {
            let value = expr_elements(node)
                .first()
                .and_then(|e| self.lower_expr_element(e))?;
            Some(Argument { name: None, value })
        }
    }

    fn lower_array_init(&mut self, node: &SyntaxNode) -> Expression {
        let parts = expr_elements(node);
        let elements = parts
            .iter()
            .filter_map(|e| self.lower_expr_element(e))
            .collect();
        Expression::ArrayInitializer(ArrayInitializer {
            elements,
            span: self.span(node),
        })
    }
}

// =============================================================================
// Free helpers
// =============================================================================

fn binary_op(kind: SyntaxKind) -> Option<BinaryOperator> {
    match kind {
        SyntaxKind::OR_KW => Some(BinaryOperator::Or),
        SyntaxKind::XOR_KW => Some(BinaryOperator::Xor),
        SyntaxKind::AND_KW => Some(BinaryOperator::And),
        SyntaxKind::EQ => Some(BinaryOperator::Eq),
        SyntaxKind::NEQ => Some(BinaryOperator::Neq),
        SyntaxKind::LT => Some(BinaryOperator::Lt),
        SyntaxKind::LT_EQ => Some(BinaryOperator::LtEq),
        SyntaxKind::GT => Some(BinaryOperator::Gt),
        SyntaxKind::GT_EQ => Some(BinaryOperator::GtEq),
        SyntaxKind::PLUS => Some(BinaryOperator::Add),
        SyntaxKind::MINUS => Some(BinaryOperator::Sub),
        SyntaxKind::STAR => Some(BinaryOperator::Mul),
        SyntaxKind::SLASH => Some(BinaryOperator::Div),
        SyntaxKind::MOD_KW => Some(BinaryOperator::Mod),
        _ => None,
    }
}

/// Parse a numeric literal, including `16#FF`-style base-prefixed forms.
fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    if let Some((radix, digits)) = cleaned.split_once('#') {
        let radix: u32 = radix.parse().ok()?;
        if !(2..=36).contains(&radix) {
            return None;
        }
        let value = i64::from_str_radix(digits, radix).ok()?;
        Some(value as f64)
    } else {
        // JSON has no representation for non-finite values
        cleaned.parse().ok().filter(|v: &f64| v.is_finite())
    }
}

/// The smallest span covering both inputs.
fn span_union(a: Span, b: Span) -> Span {
    Span {
        start: a.start.min(b.start),
        end: a.end.max(b.end),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_number;

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("3.14"), Some(3.14));
        assert_eq!(parse_number("1_000"), Some(1000.0));
        assert_eq!(parse_number("16#FF"), Some(255.0));
        assert_eq!(parse_number("2#1010"), Some(10.0));
        assert_eq!(parse_number("99#1"), None);
    }
}
