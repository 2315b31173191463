//! Lowering of statements.

use smol_str::SmolStr;

use super::{Lowerer, child_token, expr_elements, is_statement_kind};
use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode};
use crate::syntax::ast::{
    Assignment, CallStatement, CaseBranch, CaseStatement, ElsifBranch, Expression, ForStatement,
    IfStatement, RepeatStatement, ReturnStatement, Statement, WhileStatement,
};

impl Lowerer<'_> {
    pub(super) fn lower_statement(&mut self, node: &SyntaxNode) -> Option<Statement> {
        match node.kind() {
            SyntaxKind::ASSIGNMENT_STMT => self.lower_assignment(node),
            SyntaxKind::CALL_STMT => self.lower_call_statement(node),
            SyntaxKind::IF_STMT => Some(self.lower_if(node)),
            SyntaxKind::WHILE_STMT => Some(self.lower_while(node)),
            SyntaxKind::REPEAT_STMT => Some(self.lower_repeat(node)),
            SyntaxKind::FOR_STMT => Some(self.lower_for(node)),
            SyntaxKind::CASE_STMT => Some(self.lower_case(node)),
            SyntaxKind::RETURN_STMT => Some(Statement::Return(ReturnStatement {
                span: self.span(node),
            })),
            other => {
                self.internal(
                    node,
                    format!("unhandled statement: {}", other.display_name()),
                );
                None
            }
        }
    }

    /// Direct statement children of a block or branch node.
    pub(super) fn lower_statement_list(&mut self, node: &SyntaxNode) -> Vec<Statement> {
        let nodes: Vec<_> = node
            .children()
            .filter(|n| is_statement_kind(n.kind()))
            .collect();
        nodes
            .iter()
            .filter_map(|stmt| self.lower_statement(stmt))
            .collect()
    }

    // =========================================================================
    // Assignment and calls
    // =========================================================================

    fn lower_assignment(&mut self, node: &SyntaxNode) -> Option<Statement> {
        let exprs = expr_elements(node);
        let target_element = exprs.first()?;

        let target = match target_element {
            SyntaxElement::Node(target_node)
                if target_node.kind() == SyntaxKind::VARIABLE_REF =>
            {
                self.lower_left_expression(target_node)
            }
            _ => {
                self.internal(node, "assignment target is not a reference");
                return None;
            }
        };

        let span = self.span(node);
        let value = exprs
            .get(1)
            .and_then(|e| self.lower_expr_element(e))
            .unwrap_or_else(|| self.missing_expr(span));

        Some(Statement::Assignment(Assignment {
            target,
            value,
            span,
        }))
    }

    fn lower_call_statement(&mut self, node: &SyntaxNode) -> Option<Statement> {
        let callee = node.children().find(|n| {
            matches!(n.kind(), SyntaxKind::CALL_EXPR | SyntaxKind::VARIABLE_REF)
        })?;
        let call = match callee.kind() {
            SyntaxKind::CALL_EXPR => self.lower_call_expr(&callee),
            _ => self.call_from_reference(&callee),
        };
        Some(Statement::FunctionCall(CallStatement {
            call,
            span: self.span(node),
        }))
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn lower_if(&mut self, node: &SyntaxNode) -> Statement {
        let span = self.span(node);
        let condition = self.first_expr_or_missing(node, span);
        let then_branch = self.lower_statement_list(node);

        let branch_nodes: Vec<_> = node
            .children()
            .filter(|n| n.kind() == SyntaxKind::ELSIF_BRANCH)
            .collect();
        let elsif_branches = branch_nodes
            .iter()
            .map(|branch| {
                let branch_span = self.span(branch);
                ElsifBranch {
                    condition: self.first_expr_or_missing(branch, branch_span),
                    body: self.lower_statement_list(branch),
                    span: branch_span,
                }
            })
            .collect();

        let else_branch = node
            .children()
            .find(|n| n.kind() == SyntaxKind::ELSE_BRANCH)
            .map(|branch| self.lower_statement_list(&branch));

        Statement::If(IfStatement {
            condition,
            then_branch,
            elsif_branches,
            else_branch,
            span,
        })
    }

    fn lower_while(&mut self, node: &SyntaxNode) -> Statement {
        let span = self.span(node);
        Statement::While(WhileStatement {
            condition: self.first_expr_or_missing(node, span),
            body: self.lower_statement_list(node),
            span,
        })
    }

    fn lower_repeat(&mut self, node: &SyntaxNode) -> Statement {
        let span = self.span(node);
        // Statements are statement nodes; the only expression element
        // directly under REPEAT_STMT is the UNTIL condition.
        Statement::Repeat(RepeatStatement {
            body: self.lower_statement_list(node),
            until: self.first_expr_or_missing(node, span),
            span,
        })
    }

    fn lower_for(&mut self, node: &SyntaxNode) -> Statement {
        let span = self.span(node);
        let variable = child_token(node, SyntaxKind::IDENTIFIER)
            .map(|t| SmolStr::new(t.text()))
            .unwrap_or_default();

        let exprs = expr_elements(node);
        let from = exprs
            .first()
            .and_then(|e| self.lower_expr_element(e))
            .unwrap_or_else(|| self.missing_expr(span));
        let to = exprs
            .get(1)
            .and_then(|e| self.lower_expr_element(e))
            .unwrap_or_else(|| self.missing_expr(span));
        let by = if child_token(node, SyntaxKind::BY_KW).is_some() {
            exprs.get(2).and_then(|e| self.lower_expr_element(e))
        } else {
            None
        };

        Statement::For(ForStatement {
            variable,
            from,
            to,
            by,
            body: self.lower_statement_list(node),
            span,
        })
    }

    fn lower_case(&mut self, node: &SyntaxNode) -> Statement {
        let span = self.span(node);
        let selector = self.first_expr_or_missing(node, span);

        let branch_nodes: Vec<_> = node
            .children()
            .filter(|n| n.kind() == SyntaxKind::CASE_BRANCH)
            .collect();
        let branches = branch_nodes
            .iter()
            .map(|branch| {
                let branch_span = self.span(branch);
                CaseBranch {
                    label: self.first_expr_or_missing(branch, branch_span),
                    body: self.lower_statement_list(branch),
                    span: branch_span,
                }
            })
            .collect();

        let else_branch = node
            .children()
            .find(|n| n.kind() == SyntaxKind::ELSE_BRANCH)
            .map(|branch| self.lower_statement_list(&branch));

        Statement::Case(CaseStatement {
            selector,
            branches,
            else_branch,
            span,
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// The first expression element directly under `node`, or a placeholder
    /// when a parse error left none behind.
    fn first_expr_or_missing(
        &mut self,
        node: &SyntaxNode,
        span: crate::base::Span,
    ) -> Expression {
        expr_elements(node)
            .first()
            .and_then(|e| self.lower_expr_element(e))
            .unwrap_or_else(|| self.missing_expr(span))
    }
}
