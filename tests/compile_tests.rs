//! End-to-end scenarios over the batch compiler.

use stc::syntax::ast::{
    BinaryOperator, Expression, LiteralValue, Program, Statement, TypeDecl,
};
use stc::{SourceFile, compile};

fn file(name: &str, content: &str) -> SourceFile {
    SourceFile {
        file_name: name.to_string(),
        content: content.to_string(),
        uri: None,
    }
}

fn compile_one(content: &str) -> stc::CompileResult {
    compile(&[file("main.st", content)])
}

fn ast_of(content: &str) -> Program {
    let result = compile_one(content);
    assert!(
        result.success,
        "expected a clean compile, got {:?}",
        result.diagnostics
    );
    result.ast.expect("ast expected on success")
}

// =============================================================================
// Scenario: minimal program
// =============================================================================

#[test]
fn test_minimal_program() {
    let ast = ast_of("PROGRAM P VAR x : INT := 0; END_VAR BEGIN x := x + 1; END END_PROGRAM");

    assert_eq!(ast.programs.len(), 1);
    let program = &ast.programs[0];
    assert_eq!(program.name, "P");

    let Statement::Assignment(assignment) = &program.body[0] else {
        panic!("expected an assignment, got {:?}", program.body[0]);
    };
    assert_eq!(assignment.target.elements[0].name, "x");

    let Expression::BinaryExpression(binary) = &assignment.value else {
        panic!("expected a binary RHS, got {:?}", assignment.value);
    };
    assert_eq!(binary.operator, BinaryOperator::Add);
    let Expression::VariableReference(left) = binary.left.as_ref() else {
        panic!("expected a variable reference on the left");
    };
    assert_eq!(left.elements[0].name, "x");
    let Expression::Literal(right) = binary.right.as_ref() else {
        panic!("expected a literal on the right");
    };
    assert_eq!(right.value, LiteralValue::Number(1.0));
}

// =============================================================================
// Scenario: timer member read
// =============================================================================

#[test]
fn test_timer_member_read() {
    let ast = ast_of(
        "FUNCTION_BLOCK FB VAR t : TON; done : BOOL; END_VAR done := t.Q; END_FUNCTION_BLOCK",
    );

    let fb = &ast.function_blocks[0];
    let t_decl = &fb.var_declarations[0].declarations[0];
    assert_eq!(t_decl.name, "t");
    let Some(TypeDecl::SimpleType(simple)) = &t_decl.ty else {
        panic!("expected a simple type for t, got {:?}", t_decl.ty);
    };
    assert_eq!(simple.name, "TON");

    let Statement::Assignment(assignment) = &fb.body[0] else {
        panic!("expected an assignment");
    };
    let Expression::FunctionCallExpression(call_expr) = &assignment.value else {
        panic!("expected a member-read call, got {:?}", assignment.value);
    };
    assert_eq!(call_expr.call.object.as_deref(), Some("t"));
    assert_eq!(call_expr.call.member.as_deref(), Some("Q"));
    assert!(call_expr.call.name.is_none());
    assert!(call_expr.call.args.is_empty());
}

// =============================================================================
// Scenario: named arguments with a time literal
// =============================================================================

#[test]
fn test_named_arguments_with_time_literal() {
    let ast = ast_of(
        "FUNCTION_BLOCK FB VAR t : TON; END_VAR t(IN := TRUE, PT := T#500ms); END_FUNCTION_BLOCK",
    );

    let fb = &ast.function_blocks[0];
    let Statement::FunctionCall(call_stmt) = &fb.body[0] else {
        panic!("expected a call statement, got {:?}", fb.body[0]);
    };
    let call = &call_stmt.call;
    assert_eq!(call.name.as_deref(), Some("t"));
    assert_eq!(call.args.len(), 2);

    assert_eq!(call.args[0].name.as_deref(), Some("IN"));
    let Expression::Literal(in_value) = &call.args[0].value else {
        panic!("expected a literal for IN");
    };
    assert_eq!(in_value.value, LiteralValue::Bool(true));

    assert_eq!(call.args[1].name.as_deref(), Some("PT"));
    let Expression::Literal(pt_value) = &call.args[1].value else {
        panic!("expected a raw literal for PT, got {:?}", call.args[1].value);
    };
    assert_eq!(pt_value.value, LiteralValue::String("T#500ms".into()));
}

// =============================================================================
// Scenario: duplicate POU names
// =============================================================================

#[test]
fn test_duplicate_pou_names() {
    let result = compile_one(
        "PROGRAM A BEGIN END END_PROGRAM FUNCTION_BLOCK A VAR END_VAR END_FUNCTION_BLOCK",
    );
    assert!(!result.success);
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    let diagnostic = &result.diagnostics[0].diagnostic;
    assert_eq!(diagnostic.message, "Duplicate name: A");
    // Points at the second A, not the first
    assert!(diagnostic.span.start.column > 10);
}

// =============================================================================
// Scenario: missing END_IF
// =============================================================================

#[test]
fn test_missing_end_if_reports_once() {
    let result = compile_one("PROGRAM P BEGIN IF TRUE THEN x := 1; END END_PROGRAM");
    assert!(!result.success);
    let syntax_errors: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.diagnostic.source == Some("syntax"))
        .collect();
    assert_eq!(syntax_errors.len(), 1, "{:?}", result.diagnostics);
    assert!(syntax_errors[0].diagnostic.message.contains("END_IF"));
}

// =============================================================================
// AST shape invariants
// =============================================================================

#[test]
fn test_left_associative_chains() {
    let ast = ast_of("PROGRAM P VAR x : INT; END_VAR BEGIN x := 1 + 2 + 3; END END_PROGRAM");
    let Statement::Assignment(assignment) = &ast.programs[0].body[0] else {
        panic!("expected an assignment");
    };
    // ((1 + 2) + 3): the right operand of the outer node is a leaf
    let Expression::BinaryExpression(outer) = &assignment.value else {
        panic!("expected a binary expression");
    };
    assert!(matches!(outer.right.as_ref(), Expression::Literal(_)));
    let Expression::BinaryExpression(inner) = outer.left.as_ref() else {
        panic!("expected the chain to fold to the left");
    };
    assert!(matches!(inner.left.as_ref(), Expression::Literal(_)));
    assert!(matches!(inner.right.as_ref(), Expression::Literal(_)));
}

#[test]
fn test_precedence_layers() {
    let ast = ast_of("PROGRAM P VAR x : BOOL; END_VAR BEGIN x := 1 + 2 * 3 < 10 AND TRUE; END END_PROGRAM");
    let Statement::Assignment(assignment) = &ast.programs[0].body[0] else {
        panic!("expected an assignment");
    };
    // AND is the loosest binder here
    let Expression::BinaryExpression(and) = &assignment.value else {
        panic!("expected AND at the top");
    };
    assert_eq!(and.operator, BinaryOperator::And);
    let Expression::BinaryExpression(cmp) = and.left.as_ref() else {
        panic!("expected the comparison under AND");
    };
    assert_eq!(cmp.operator, BinaryOperator::Lt);
    let Expression::BinaryExpression(add) = cmp.left.as_ref() else {
        panic!("expected the addition under the comparison");
    };
    assert_eq!(add.operator, BinaryOperator::Add);
    let Expression::BinaryExpression(mul) = add.right.as_ref() else {
        panic!("expected the multiplication bound tighter than +");
    };
    assert_eq!(mul.operator, BinaryOperator::Mul);
}

#[test]
fn test_spans_enclose_children() {
    let ast = ast_of("PROGRAM P\nVAR x : INT;\nEND_VAR\nBEGIN\nx := x + 1;\nEND\nEND_PROGRAM");
    let program = &ast.programs[0];
    assert!(ast.span.encloses(&program.span));
    for block in &program.var_declarations {
        assert!(program.span.encloses(&block.span));
        for decl in &block.declarations {
            assert!(block.span.encloses(&decl.span));
        }
    }
    for statement in &program.body {
        assert!(program.span.encloses(&statement.span()));
    }
}

#[test]
fn test_elsif_branches_extracted() {
    let ast = ast_of(
        "PROGRAM P VAR x : INT; END_VAR BEGIN \
         IF x = 1 THEN x := 10; ELSIF x = 2 THEN x := 20; ELSIF x = 3 THEN x := 30; \
         ELSE x := 0; END_IF END END_PROGRAM",
    );
    let Statement::If(if_stmt) = &ast.programs[0].body[0] else {
        panic!("expected an IF");
    };
    assert_eq!(if_stmt.then_branch.len(), 1);
    assert_eq!(if_stmt.elsif_branches.len(), 2);
    assert_eq!(if_stmt.else_branch.as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_case_branches_split_around_else() {
    let ast = ast_of(
        "PROGRAM P VAR x : INT; END_VAR BEGIN \
         CASE x OF 1: x := 10; x := 11; 2: x := 20; ELSE x := 0; END_CASE \
         END END_PROGRAM",
    );
    let Statement::Case(case) = &ast.programs[0].body[0] else {
        panic!("expected a CASE");
    };
    assert_eq!(case.branches.len(), 2);
    assert_eq!(case.branches[0].body.len(), 2);
    assert_eq!(case.branches[1].body.len(), 1);
    assert_eq!(case.else_branch.as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_enum_reference_resolution() {
    let ast = ast_of(
        "TYPE Color : (RED, GREEN, BLUE); END_TYPE \
         PROGRAM P VAR c : Color; END_VAR BEGIN c := Color#RED; END END_PROGRAM",
    );
    let decl = &ast.programs[0].var_declarations[0].declarations[0];
    let Some(TypeDecl::EnumTypeReference(enum_ref)) = &decl.ty else {
        panic!("expected the Color type to resolve, got {:?}", decl.ty);
    };
    assert_eq!(enum_ref.name, "Color");

    let Statement::Assignment(assignment) = &ast.programs[0].body[0] else {
        panic!("expected an assignment");
    };
    let Expression::EnumReference(value) = &assignment.value else {
        panic!("expected an enum reference value, got {:?}", assignment.value);
    };
    assert_eq!(value.type_name, "Color");
    assert_eq!(value.member, "RED");
}

#[test]
fn test_struct_reference_resolution() {
    let ast = ast_of(
        "TYPE Motor : STRUCT speed : INT; running : BOOL; END_STRUCT; END_TYPE \
         PROGRAM P VAR m : Motor; END_VAR BEGIN m.speed := 10; END END_PROGRAM",
    );
    let decl = &ast.programs[0].var_declarations[0].declarations[0];
    let Some(TypeDecl::StructType(resolved)) = &decl.ty else {
        panic!("expected the Motor type to resolve, got {:?}", decl.ty);
    };
    assert_eq!(resolved.name, "Motor");
    assert_eq!(resolved.members.len(), 2);
}

#[test]
fn test_array_declaration_and_access() {
    let ast = ast_of(
        "PROGRAM P VAR a : ARRAY[1..10] OF INT := [1, 2, 3]; i : INT; END_VAR \
         BEGIN a[i] := a[1] + 1; END END_PROGRAM",
    );
    let decl = &ast.programs[0].var_declarations[0].declarations[0];
    let Some(TypeDecl::ArrayType(array)) = &decl.ty else {
        panic!("expected an array type, got {:?}", decl.ty);
    };
    assert_eq!(array.dimensions.len(), 1);
    assert!(matches!(
        decl.initializer,
        Some(Expression::ArrayInitializer(_))
    ));

    let Statement::Assignment(assignment) = &ast.programs[0].body[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(assignment.target.elements[0].name, "a");
    assert!(assignment.target.elements[0].index.is_some());
}

#[test]
fn test_direct_address_argument_stays_raw() {
    let ast = ast_of(
        "PROGRAM P VAR ok : BOOL; END_VAR BEGIN Check(%IX0.0); END END_PROGRAM",
    );
    let Statement::FunctionCall(call_stmt) = &ast.programs[0].body[0] else {
        panic!("expected a call");
    };
    let Expression::Literal(value) = &call_stmt.call.args[0].value else {
        panic!("expected a literal argument");
    };
    assert_eq!(value.value, LiteralValue::String("%IX0.0".into()));
}

// =============================================================================
// Serialized AST contract
// =============================================================================

#[test]
fn test_ast_serializes_with_type_tags() {
    let ast = ast_of("PROGRAM P VAR x : INT; END_VAR BEGIN x := x + 1; END END_PROGRAM");
    let value = serde_json::to_value(&ast).expect("ast serializes");

    let statement = &value["programs"][0]["body"][0];
    assert_eq!(statement["$type"], "Assignment");
    assert_eq!(statement["value"]["$type"], "BinaryExpression");
    assert_eq!(statement["value"]["operator"], "+");
    assert_eq!(statement["value"]["right"]["value"], 1.0);

    let var_decl = &value["programs"][0]["varDeclarations"][0];
    assert_eq!(var_decl["kind"], "VAR");
    assert_eq!(var_decl["declarations"][0]["ty"]["$type"], "SimpleType");
}
