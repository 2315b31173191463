//! Lowering of POUs, variable blocks and type declarations.

use smol_str::SmolStr;

use super::{Lowerer, expr_elements, is_statement_kind, name_token};
use crate::base::Span;
use crate::parser::{ErrorCode, SyntaxKind, SyntaxNode};
use crate::syntax::ast::{
    ArrayDimension, ArrayType, EnumType, FunctionBlock, FunctionDef, ProgramDecl, RangeConstraint,
    SimpleType, Statement, StructMember, StructType, TypeDecl, TypeDeclaration, VarBlockKind,
    VarDecl, VarDeclaration,
};

impl Lowerer<'_> {
    // =========================================================================
    // POUs
    // =========================================================================

    pub(super) fn lower_program(&mut self, node: &SyntaxNode) -> ProgramDecl {
        let (name, name_span) = self.decl_name(node);
        ProgramDecl {
            name,
            var_declarations: self.lower_var_blocks(node),
            body: self.lower_pou_body(node),
            span: self.span(node),
            name_span,
        }
    }

    pub(super) fn lower_function_block(&mut self, node: &SyntaxNode) -> FunctionBlock {
        let (name, name_span) = self.decl_name(node);
        FunctionBlock {
            name,
            var_declarations: self.lower_var_blocks(node),
            body: self.lower_pou_body(node),
            span: self.span(node),
            name_span,
        }
    }

    pub(super) fn lower_function(&mut self, node: &SyntaxNode) -> FunctionDef {
        let (name, name_span) = self.decl_name(node);
        let return_type = node
            .children()
            .find(|n| n.kind() == SyntaxKind::RETURN_TYPE)
            .and_then(|rt| {
                rt.children()
                    .next()
                    .and_then(|ty| self.lower_type(&ty))
            });
        FunctionDef {
            name,
            return_type,
            var_declarations: self.lower_var_blocks(node),
            body: self.lower_pou_body(node),
            span: self.span(node),
            name_span,
        }
    }

    /// The declared name and its span; recovery leaves some declarations
    /// nameless, which the validator reports against the whole node.
    fn decl_name(&mut self, node: &SyntaxNode) -> (SmolStr, Span) {
        match name_token(node) {
            Some(token) => (SmolStr::new(token.text()), self.token_span(&token)),
            None => (SmolStr::default(), self.span(node)),
        }
    }

    /// Collect the statement body of a POU: either the items of an explicit
    /// `BEGIN .. END` block or the direct body items of the declaration.
    /// Enum and struct declarations found among the items are hoisted.
    fn lower_pou_body(&mut self, node: &SyntaxNode) -> Vec<Statement> {
        let body_node = node
            .children()
            .find(|n| n.kind() == SyntaxKind::POU_BODY);
        let items_of = body_node.as_ref().unwrap_or(node);
        self.lower_body_items(items_of)
    }

    pub(super) fn lower_body_items(&mut self, node: &SyntaxNode) -> Vec<Statement> {
        let mut statements = Vec::new();
        for child in node.children() {
            let kind = child.kind();
            if is_statement_kind(kind) {
                if let Some(stmt) = self.lower_statement(&child) {
                    statements.push(stmt);
                }
            } else {
                match kind {
                    SyntaxKind::ENUM_DECL => {
                        let decl = self.lower_enum(&child);
                        self.hoisted_enums.push(decl);
                    }
                    SyntaxKind::STRUCT_DECL => {
                        let decl = self.lower_struct(&child);
                        self.hoisted_structs.push(decl);
                    }
                    SyntaxKind::TYPE_ALIAS => {
                        let decl = self.lower_type_alias(&child);
                        statements.push(Statement::TypeDeclaration(decl));
                    }
                    // Structure handled elsewhere or produced by recovery
                    SyntaxKind::VAR_BLOCK
                    | SyntaxKind::RETURN_TYPE
                    | SyntaxKind::ERROR => {}
                    other => self.internal(
                        &child,
                        format!("unhandled body item: {}", other.display_name()),
                    ),
                }
            }
        }
        statements
    }

    // =========================================================================
    // Variable declarations
    // =========================================================================

    fn lower_var_blocks(&mut self, node: &SyntaxNode) -> Vec<VarDeclaration> {
        let blocks: Vec<_> = node
            .children()
            .filter(|n| n.kind() == SyntaxKind::VAR_BLOCK)
            .collect();
        blocks.iter().map(|block| self.lower_var_block(block)).collect()
    }

    fn lower_var_block(&mut self, node: &SyntaxNode) -> VarDeclaration {
        let kind = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find_map(|t| match t.kind() {
                SyntaxKind::VAR_KW => Some(VarBlockKind::Var),
                SyntaxKind::VAR_INPUT_KW => Some(VarBlockKind::VarInput),
                SyntaxKind::VAR_OUTPUT_KW => Some(VarBlockKind::VarOutput),
                SyntaxKind::VAR_IN_OUT_KW => Some(VarBlockKind::VarInOut),
                _ => None,
            })
            .unwrap_or(VarBlockKind::Var);

        let declarations = node
            .children()
            .filter(|n| n.kind() == SyntaxKind::VAR_LINE)
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|line| self.lower_var_line(&line))
            .collect();

        VarDeclaration {
            kind,
            declarations,
            span: self.span(node),
        }
    }

    fn lower_var_line(&mut self, node: &SyntaxNode) -> Option<VarDecl> {
        let name = name_token(node)?;

        let mut ty = node
            .children()
            .find(|n| {
                matches!(n.kind(), SyntaxKind::TYPE_REF | SyntaxKind::ARRAY_TYPE)
            })
            .and_then(|t| self.lower_type(&t));

        // A `( lo .. hi )` constraint binds to the simple type it follows
        if let Some(constraint_node) = node
            .children()
            .find(|n| n.kind() == SyntaxKind::RANGE_CONSTRAINT)
        {
            let constraint = self.lower_range_constraint(&constraint_node);
            match &mut ty {
                Some(TypeDecl::SimpleType(simple)) => simple.constraint = constraint,
                _ => self.warn(
                    &constraint_node,
                    "a range constraint is only valid on a simple type",
                    ErrorCode::E0303,
                ),
            }
        }

        let initializer = self.initializer_after_assign(node);

        Some(VarDecl {
            name: SmolStr::new(name.text()),
            ty,
            initializer,
            span: self.span(node),
        })
    }

    fn lower_range_constraint(&mut self, node: &SyntaxNode) -> Option<RangeConstraint> {
        let exprs = expr_elements(node);
        let mut iter = exprs.iter();
        let min = iter.next().and_then(|e| self.lower_expr_element(e))?;
        let max = iter.next().and_then(|e| self.lower_expr_element(e))?;
        Some(RangeConstraint { min, max })
    }

    /// The expression element following the `:=` token, if any.
    pub(super) fn initializer_after_assign(
        &mut self,
        node: &SyntaxNode,
    ) -> Option<crate::syntax::ast::Expression> {
        let mut seen_assign = false;
        for element in node.children_with_tokens() {
            if !seen_assign {
                if let Some(token) = element.as_token() {
                    if token.kind() == SyntaxKind::ASSIGN {
                        seen_assign = true;
                    }
                }
                continue;
            }
            if super::is_expr_element(&element) {
                return self.lower_expr_element(&element);
            }
        }
        None
    }

    // =========================================================================
    // Type declarations
    // =========================================================================

    pub(super) fn lower_type(&mut self, node: &SyntaxNode) -> Option<TypeDecl> {
        match node.kind() {
            SyntaxKind::TYPE_REF => {
                let token = node
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .find(|t| !t.kind().is_trivia())?;
                Some(TypeDecl::SimpleType(SimpleType {
                    name: SmolStr::new(token.text()),
                    constraint: None,
                    span: self.span(node),
                }))
            }
            SyntaxKind::ARRAY_TYPE => self.lower_array_type(node),
            other => {
                self.internal(
                    node,
                    format!("unhandled type reference: {}", other.display_name()),
                );
                None
            }
        }
    }

    fn lower_array_type(&mut self, node: &SyntaxNode) -> Option<TypeDecl> {
        let dimensions = node
            .children()
            .filter(|n| n.kind() == SyntaxKind::ARRAY_DIMENSION)
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|dim| {
                let exprs = expr_elements(&dim);
                let mut iter = exprs.iter();
                let start = iter.next().and_then(|e| self.lower_expr_element(e))?;
                let end = iter.next().and_then(|e| self.lower_expr_element(e))?;
                Some(ArrayDimension { start, end })
            })
            .collect();

        let element = node
            .children()
            .find(|n| {
                matches!(n.kind(), SyntaxKind::TYPE_REF | SyntaxKind::ARRAY_TYPE)
            })
            .and_then(|t| self.lower_type(&t));
        let element = match element {
            Some(ty) => ty,
            None => {
                self.internal(node, "array type without an element type");
                return None;
            }
        };

        Some(TypeDecl::ArrayType(ArrayType {
            dimensions,
            element: Box::new(element),
            span: self.span(node),
        }))
    }

    pub(super) fn lower_enum(&mut self, node: &SyntaxNode) -> EnumType {
        let (name, name_span) = self.decl_name(node);
        // The first identifier is the type name; the rest are members
        let members = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::IDENTIFIER)
            .skip(1)
            .map(|t| SmolStr::new(t.text()))
            .collect();
        EnumType {
            name,
            members,
            span: self.span(node),
            name_span,
        }
    }

    pub(super) fn lower_struct(&mut self, node: &SyntaxNode) -> StructType {
        let (name, name_span) = self.decl_name(node);
        let members = node
            .children()
            .filter(|n| n.kind() == SyntaxKind::STRUCT_MEMBER)
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|member| self.lower_struct_member(&member))
            .collect();
        StructType {
            name,
            members,
            span: self.span(node),
            name_span,
        }
    }

    fn lower_struct_member(&mut self, node: &SyntaxNode) -> Option<StructMember> {
        let name = name_token(node)?;
        let ty = node
            .children()
            .find(|n| {
                matches!(n.kind(), SyntaxKind::TYPE_REF | SyntaxKind::ARRAY_TYPE)
            })
            .and_then(|t| self.lower_type(&t))?;
        let initializer = self.initializer_after_assign(node);
        Some(StructMember {
            name: SmolStr::new(name.text()),
            ty,
            initializer,
            span: self.span(node),
        })
    }

    pub(super) fn lower_type_alias(&mut self, node: &SyntaxNode) -> TypeDeclaration {
        let (name, _) = self.decl_name(node);
        let ty = node
            .children()
            .find(|n| {
                matches!(n.kind(), SyntaxKind::TYPE_REF | SyntaxKind::ARRAY_TYPE)
            })
            .and_then(|t| self.lower_type(&t));
        let initializer = self.initializer_after_assign(node);
        TypeDeclaration {
            name,
            ty,
            initializer,
            span: self.span(node),
        }
    }
}
