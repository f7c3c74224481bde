//! Integration tests for pdep-parser crate.

use pdep_lexer::TokenKind;
use pdep_parser::{Dialect, ParseError, ParserConfig, parse};
use pdep_syntax::{ArrayStyle, Ast, LiteralKind, Modifiers, NodeId, NodeKind};

fn parse_with(dialect: Dialect, source: &str) -> Result<Ast, ParseError> {
    parse(source, &ParserConfig::new().dialect(dialect).file("t.php"))
}

fn parse_ok(source: &str) -> Ast {
    match parse_with(Dialect::Generic, source) {
        Ok(ast) => ast,
        Err(e) => panic!("failed to parse {source:?}: {e}"),
    }
}

/// `(Kind image children...)`
fn sexp(ast: &Ast, id: NodeId) -> String {
    let node = ast.node(id);
    let mut out = format!("({:?}", node.kind());
    if !node.image().is_empty() {
        out.push(' ');
        out.push_str(node.image());
    }
    for &child in node.children() {
        out.push(' ');
        out.push_str(&sexp(ast, child));
    }
    out.push(')');
    out
}

/// The single expression of `<?php {source};`.
fn expr(source: &str) -> String {
    let ast = parse_ok(&format!("<?php {source};"));
    let statement = ast.children(ast.root())[0];
    assert_eq!(ast.node(statement).kind(), NodeKind::ExpressionStatement);
    sexp(&ast, ast.children(statement)[0])
}

fn statements(ast: &Ast) -> Vec<NodeKind> {
    ast.children(ast.root())
        .iter()
        .map(|&id| ast.node(id).kind())
        .collect()
}

fn find(ast: &Ast, kind: NodeKind) -> Vec<NodeId> {
    ast.find_all(|k| k == kind)
}

fn expect_unexpected(result: Result<Ast, ParseError>, image: &str) {
    match result {
        Err(ParseError::UnexpectedToken { token, file }) => {
            assert_eq!(token.image, image);
            assert_eq!(file, "t.php");
        }
        Err(other) => panic!("expected unexpected token `{image}`, got {other}"),
        Ok(ast) => panic!("expected unexpected token `{image}`, parsed {}", sexp(&ast, ast.root())),
    }
}

// ============================================================================
// Tree Invariants
// ============================================================================

const SAMPLES: &[&str] = &[
    "<?php function foo(Bar $x, $y = 42) {}",
    "<?php $a = [1, 'two' => array(3, 4), &$ref, list(, $b)];",
    "<?php\nnamespace A\\B;\nuse C\\D as E;\nclass F extends G implements H {\n    const X = 1;\n    private static $y = [1, 2];\n    public function z(): self { return $this->y[0] <=> 1; }\n}\n",
    "<?php if ($a): echo 1; elseif ($b): echo 2; else: echo 3; endif;",
    "<?php foreach ($items as $key => &$value) { $value = $value ** 2 ?? null; }",
    "<?php try { f(); } catch (A | B $e) { throw $e; } finally { g(); }",
    "<?php $s = <<<EOT\nline\nEOT;\n$t = \"$s\";",
    "<p><?php echo $x ?></p><?= $y ?>",
    "<?php $f = static function (&$a, ...$b) use ($c) { yield $a => $b; };",
    "<?php switch ($x) { case 1: case 2: break; default: continue 2; }",
];

#[test]
fn test_child_spans_nest_inside_parents() {
    for source in SAMPLES {
        let ast = parse_ok(source);
        for (id, node) in ast.iter() {
            for &child in node.children() {
                assert!(
                    node.span().contains(ast.node(child).span()),
                    "{source:?}: {:?} escapes {:?}",
                    ast.node(child).kind(),
                    ast.node(id).kind()
                );
            }
        }
    }
}

#[test]
fn test_parent_links_match_child_lists() {
    for source in SAMPLES {
        let ast = parse_ok(source);
        assert_eq!(ast.parent(ast.root()), None);
        for (id, node) in ast.iter() {
            for &child in node.children() {
                assert_eq!(ast.parent(child), Some(id), "{source:?}");
            }
            if id != ast.root() {
                let parent = node.parent().unwrap();
                assert!(ast.children(parent).contains(&id), "{source:?}");
            }
        }
        assert_eq!(ast.descendants(ast.root()).count() + 1, ast.len());
    }
}

#[test]
fn test_spans_cover_source_text() {
    let source = "<?php $total = $a + $b * 2;";
    let ast = parse_ok(source);
    let binary = find(&ast, NodeKind::BinaryExpression)[0];
    assert_eq!(&source[ast.node(binary).span().range()], "$a + $b * 2");
    let statement = ast.children(ast.root())[0];
    assert_eq!(&source[ast.node(statement).span().range()], "$total = $a + $b * 2;");
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_function_with_two_parameters() {
    let ast = parse_ok("<?php function foo(Bar $x, $y = 42) {}");
    assert_eq!(statements(&ast), vec![NodeKind::Function]);

    let function = ast.children(ast.root())[0];
    assert_eq!(ast.node(function).image(), "foo");
    assert_eq!(
        sexp(&ast, function),
        "(Function foo (FormalParameters \
         (FormalParameter $x (ClassOrInterfaceReference Bar) (VariableDeclarator $x)) \
         (FormalParameter $y (VariableDeclarator $y (Literal(Integer) 42)))) \
         (ScopeStatement))"
    );
}

#[test]
fn test_variadic_parameter() {
    let ast = parse_ok("<?php function f($a, ...$rest) {}");
    let parameters = find(&ast, NodeKind::FormalParameter);
    assert!(!ast.node(parameters[0]).modifiers().contains(Modifiers::VARIADIC));
    assert!(ast.node(parameters[1]).modifiers().contains(Modifiers::VARIADIC));
}

#[test]
fn test_by_reference_parameter() {
    let ast = parse_ok("<?php function f(array &$a) {}");
    let parameter = find(&ast, NodeKind::FormalParameter)[0];
    assert_eq!(ast.node(parameter).modifiers(), Modifiers::BY_REFERENCE);
    assert_eq!(ast.node(ast.children(parameter)[0]).kind(), NodeKind::TypeArray);
}

#[test]
fn test_callable_is_case_insensitive() {
    let ast = parse_ok("<?php function f(callable $a, Callable $b, CALLABLE $c) {}");
    let types = find(&ast, NodeKind::TypeCallable);
    assert_eq!(types.len(), 3);
    for id in types {
        assert_eq!(ast.node(id).image(), "callable");
        assert!(ast.node(id).children().is_empty());
    }
}

#[test]
fn test_scalar_type_hints() {
    let ast = parse_with(Dialect::Php70, "<?php function f(int $a, string $b): bool {}").unwrap();
    let scalars: Vec<&str> = find(&ast, NodeKind::ScalarType)
        .into_iter()
        .map(|id| ast.node(id).image())
        .collect();
    assert_eq!(scalars, vec!["int", "string", "bool"]);

    let ast = parse_with(Dialect::Php56, "<?php function f(int $a) {}").unwrap();
    assert!(find(&ast, NodeKind::ScalarType).is_empty());
    let reference = find(&ast, NodeKind::ClassOrInterfaceReference)[0];
    assert_eq!(ast.node(reference).image(), "int");
}

#[test]
fn test_return_type_self_and_parent() {
    let source = "<?php class A extends B { function f(): self {} function g(): parent {} function h(): array {} }";
    let ast = parse_with(Dialect::Php70, source).unwrap();
    let methods = find(&ast, NodeKind::Method);
    let return_kinds: Vec<NodeKind> = methods
        .iter()
        .map(|&m| ast.node(ast.children(m)[1]).kind())
        .collect();
    assert_eq!(
        return_kinds,
        vec![NodeKind::SelfReference, NodeKind::ParentReference, NodeKind::TypeArray]
    );
}

#[test]
fn test_class_members() {
    let source = "<?php
abstract class A extends B implements C, D {
    const X = 1;
    private $p = [1];
    var $q;
    public static function f(array $a = array()) {}
    abstract protected function g();
    function h() {}
}";
    let ast = parse_ok(source);
    let class = ast.children(ast.root())[0];
    assert_eq!(ast.node(class).kind(), NodeKind::Class);
    assert_eq!(ast.node(class).image(), "A");
    assert_eq!(ast.node(class).modifiers(), Modifiers::ABSTRACT);

    let members: Vec<(NodeKind, Modifiers)> = ast
        .child_nodes(class)
        .map(|(_, node)| (node.kind(), node.modifiers()))
        .collect();
    assert_eq!(
        members,
        vec![
            (NodeKind::ClassReference, Modifiers::NONE),
            (NodeKind::ClassOrInterfaceReference, Modifiers::NONE),
            (NodeKind::ClassOrInterfaceReference, Modifiers::NONE),
            (NodeKind::ConstantDefinition, Modifiers::NONE),
            (NodeKind::FieldDeclaration, Modifiers::PRIVATE),
            (NodeKind::FieldDeclaration, Modifiers::PUBLIC),
            (NodeKind::Method, Modifiers::PUBLIC | Modifiers::STATIC),
            (NodeKind::Method, Modifiers::PROTECTED | Modifiers::ABSTRACT),
            (NodeKind::Method, Modifiers::PUBLIC),
        ]
    );

    let default = find(&ast, NodeKind::Array(ArrayStyle::Call));
    assert_eq!(default.len(), 1);
}

#[test]
fn test_static_property_is_implicitly_public() {
    let ast = parse_ok("<?php class A { static $x = 1; }");
    let field = find(&ast, NodeKind::FieldDeclaration)[0];
    assert_eq!(ast.node(field).modifiers(), Modifiers::STATIC | Modifiers::PUBLIC);
}

#[test]
fn test_interface_declaration() {
    let ast = parse_ok("<?php interface I extends A, B { function f(); }");
    let interface = ast.children(ast.root())[0];
    assert_eq!(
        sexp(&ast, interface),
        "(Interface I (ClassOrInterfaceReference A) (ClassOrInterfaceReference B) \
         (Method f (FormalParameters)))"
    );
}

#[test]
fn test_trait_use_with_adaptations() {
    let source = "<?php class A { use T1, T2 { T1::f insteadof T2; T2::f as protected g; h as i; } }";
    let ast = parse_with(Dialect::Php54, source).unwrap();
    let use_node = find(&ast, NodeKind::TraitUse)[0];
    assert_eq!(
        sexp(&ast, use_node),
        "(TraitUse use (TraitReference T1) (TraitReference T2) (TraitAdaptation \
         (TraitAdaptationPrecedence f (TraitReference T1) (TraitReference T2)) \
         (TraitAdaptationAlias f (TraitReference T2) (Identifier g)) \
         (TraitAdaptationAlias h (Identifier i))))"
    );
    let alias = find(&ast, NodeKind::TraitAdaptationAlias)[0];
    assert_eq!(ast.node(alias).modifiers(), Modifiers::PROTECTED);
}

#[test]
fn test_trait_declaration_needs_php54() {
    let ast = parse_with(Dialect::Php54, "<?php trait T { function f() {} }").unwrap();
    assert_eq!(statements(&ast), vec![NodeKind::Trait]);
    expect_unexpected(parse_with(Dialect::Php53, "<?php trait T {}"), "T");
}

#[test]
fn test_doc_comments_attach_to_declarations() {
    let source = "<?php
/** Class doc */
class A {
    // plain
    /** Method doc */
    public function f() {}
    public $p;
}
/** stray */
$x = 1;
function g() {}";
    let ast = parse_ok(source);
    let class = find(&ast, NodeKind::Class)[0];
    assert_eq!(ast.node(class).comment(), Some("/** Class doc */"));
    let method = find(&ast, NodeKind::Method)[0];
    assert_eq!(ast.node(method).comment(), Some("/** Method doc */"));
    let field = find(&ast, NodeKind::FieldDeclaration)[0];
    assert_eq!(ast.node(field).comment(), None);
    let function = find(&ast, NodeKind::Function)[0];
    assert_eq!(ast.node(function).comment(), None);
}

#[test]
fn test_constants() {
    let ast = parse_ok("<?php const A = 1, B = 'b'; class C { const D = self::A; }");
    let declarators: Vec<&str> = find(&ast, NodeKind::ConstantDeclarator)
        .into_iter()
        .map(|id| ast.node(id).image())
        .collect();
    assert_eq!(declarators, vec!["A", "B", "D"]);

    let reference = find(&ast, NodeKind::MemberPrimaryPrefix)[0];
    assert_eq!(
        sexp(&ast, reference),
        "(MemberPrimaryPrefix :: (SelfReference self) (ConstantPostfix A (Identifier A)))"
    );
}

#[test]
fn test_constant_expressions_follow_dialect() {
    let ast = parse_with(Dialect::Php56, "<?php const A = 1 + 2 * 3;").unwrap();
    let declarator = find(&ast, NodeKind::ConstantDeclarator)[0];
    assert_eq!(
        sexp(&ast, declarator),
        "(ConstantDeclarator A (BinaryExpression + (Literal(Integer) 1) \
         (BinaryExpression * (Literal(Integer) 2) (Literal(Integer) 3))))"
    );

    expect_unexpected(parse_with(Dialect::Php55, "<?php const A = 1 + 2;"), "+");
    expect_unexpected(parse_with(Dialect::Php70, "<?php const A = 1 << 2;"), "<<");
    assert!(parse_with(Dialect::Generic, "<?php const A = 1 << 2;").is_ok());
}

fn constant_value(dialect: Dialect, source: &str) -> String {
    let ast = parse_with(dialect, source).unwrap();
    let declarator = find(&ast, NodeKind::ConstantDeclarator)[0];
    sexp(&ast, ast.children(declarator)[0])
}

#[test]
fn test_constant_expression_precedence() {
    assert_eq!(
        constant_value(Dialect::Generic, "<?php const A = 1 << 2 + 1;"),
        "(BinaryExpression << (Literal(Integer) 1) \
         (BinaryExpression + (Literal(Integer) 2) (Literal(Integer) 1)))"
    );
    assert_eq!(
        constant_value(Dialect::Php56, "<?php const A = 1 - 2 - 3;"),
        "(BinaryExpression - (BinaryExpression - (Literal(Integer) 1) (Literal(Integer) 2)) \
         (Literal(Integer) 3))"
    );
    assert_eq!(
        constant_value(Dialect::Php56, "<?php const A = (1 + 2) * 3;"),
        "(BinaryExpression * (ParenthesizedExpression \
         (BinaryExpression + (Literal(Integer) 1) (Literal(Integer) 2))) (Literal(Integer) 3))"
    );
    assert_eq!(
        constant_value(Dialect::Php56, "<?php const A = 1 | 2 & 3 . 'x';"),
        "(BinaryExpression | (Literal(Integer) 1) (BinaryExpression & (Literal(Integer) 2) \
         (BinaryExpression . (Literal(Integer) 3) (Literal(String) 'x'))))"
    );
}

// ============================================================================
// Namespaces and Imports
// ============================================================================

#[test]
fn test_namespace_statement_and_siblings() {
    let ast = parse_ok("<?php namespace A\\B; class C {}");
    assert_eq!(statements(&ast), vec![NodeKind::Namespace, NodeKind::Class]);
    let namespace = ast.children(ast.root())[0];
    assert_eq!(ast.node(namespace).image(), "A\\B");
    assert!(ast.children(namespace).is_empty());
}

#[test]
fn test_braced_namespaces() {
    let ast = parse_ok("<?php namespace A { function f() {} } namespace { f(); }");
    let namespaces = find(&ast, NodeKind::Namespace);
    assert_eq!(namespaces.len(), 2);
    assert_eq!(ast.node(namespaces[0]).image(), "A");
    assert_eq!(ast.node(namespaces[1]).image(), "");
    assert_eq!(ast.children(namespaces[1]).len(), 1);
}

#[test]
fn test_namespace_relative_name_is_expression() {
    let ast = parse_ok("<?php namespace\\f();");
    assert_eq!(statements(&ast), vec![NodeKind::ExpressionStatement]);
    let call = find(&ast, NodeKind::FunctionPostfix)[0];
    assert_eq!(ast.node(call).image(), "namespace\\f");
}

#[test]
fn test_use_statements() {
    let ast = parse_ok("<?php use A\\B as C, \\D; use function E\\f; use G\\{H, I as J};");
    let imports: Vec<String> = find(&ast, NodeKind::UseImport)
        .into_iter()
        .map(|id| sexp(&ast, id))
        .collect();
    assert_eq!(
        imports,
        vec![
            "(UseImport A\\B (Identifier C))",
            "(UseImport \\D)",
            "(UseImport E\\f)",
            "(UseImport G\\H)",
            "(UseImport G\\I (Identifier J))",
        ]
    );
    let uses = find(&ast, NodeKind::UseStatement);
    assert_eq!(ast.node(uses[1]).image(), "function");
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_inline_html_and_echo_tags() {
    let ast = parse_ok("<p><?php echo 1; ?></p><?= $x ?>");
    assert_eq!(
        statements(&ast),
        vec![
            NodeKind::InlineHtml,
            NodeKind::EchoStatement,
            NodeKind::InlineHtml,
            NodeKind::EchoStatement,
        ]
    );
}

#[test]
fn test_alternative_if() {
    let ast = parse_ok("<?php if ($a): echo 1; elseif ($b): echo 2; else: echo 3; endif;");
    let statement = ast.children(ast.root())[0];
    assert_eq!(
        sexp(&ast, statement),
        "(IfStatement if (Variable $a) (ScopeStatement (EchoStatement echo (Literal(Integer) 1))) \
         (ElseIfStatement elseif (Variable $b) (ScopeStatement (EchoStatement echo (Literal(Integer) 2))) \
         (ScopeStatement (EchoStatement echo (Literal(Integer) 3)))))"
    );
}

#[test]
fn test_loops() {
    let ast = parse_ok(
        "<?php for ($i = 0; $i < 10; $i++) {} for (;;) break; while ($x) continue; do { } while ($y); while (1): endwhile;",
    );
    assert_eq!(
        statements(&ast),
        vec![
            NodeKind::ForStatement,
            NodeKind::ForStatement,
            NodeKind::WhileStatement,
            NodeKind::DoWhileStatement,
            NodeKind::WhileStatement,
        ]
    );
    let fors = find(&ast, NodeKind::ForStatement);
    let clauses: Vec<NodeKind> = ast
        .child_nodes(fors[0])
        .map(|(_, node)| node.kind())
        .collect();
    assert_eq!(
        clauses,
        vec![
            NodeKind::ForInit,
            NodeKind::ForCondition,
            NodeKind::ForUpdate,
            NodeKind::ScopeStatement,
        ]
    );
    assert_eq!(ast.children(fors[1]).len(), 1);
}

#[test]
fn test_foreach_by_reference() {
    let ast = parse_ok("<?php foreach ($a as $k => &$v) {}");
    let statement = ast.children(ast.root())[0];
    assert_eq!(
        sexp(&ast, statement),
        "(ForeachStatement foreach (Variable $a) (Variable $k) (Variable $v) (ScopeStatement))"
    );
    let value = ast.children(statement)[2];
    assert_eq!(ast.node(value).modifiers(), Modifiers::BY_REFERENCE);
}

#[test]
fn test_switch() {
    let ast = parse_ok("<?php switch ($a) { case 1: echo 1; break; default: }");
    let statement = ast.children(ast.root())[0];
    assert_eq!(
        sexp(&ast, statement),
        "(SwitchStatement switch (Variable $a) \
         (SwitchLabel case (Literal(Integer) 1) (EchoStatement echo (Literal(Integer) 1)) (BreakStatement break)) \
         (SwitchLabel default))"
    );
}

#[test]
fn test_try_catch_finally() {
    let ast = parse_ok("<?php try { f(); } catch (A $e) {} catch (B | C $e) {} finally {}");
    let catches = find(&ast, NodeKind::CatchStatement);
    assert_eq!(catches.len(), 2);
    assert_eq!(ast.children(catches[1]).len(), 4);
    assert_eq!(find(&ast, NodeKind::FinallyStatement).len(), 1);

    expect_unexpected(
        parse_with(Dialect::Php70, "<?php try {} catch (B | C $e) {}"),
        "|",
    );
    expect_unexpected(parse_with(Dialect::Generic, "<?php try {} echo 1;"), "echo");
}

#[test]
fn test_labels_and_goto() {
    let ast = parse_ok("<?php start: foo(); goto start;");
    assert_eq!(
        statements(&ast),
        vec![
            NodeKind::LabelStatement,
            NodeKind::ExpressionStatement,
            NodeKind::GotoStatement,
        ]
    );
    let label = ast.children(ast.root())[0];
    assert_eq!(ast.node(label).image(), "start");
}

#[test]
fn test_misc_statements() {
    let ast = parse_ok(
        "<?php global $a, $$b; static $c = 1, $d; unset($a[1], $b); declare(ticks=1); return; ;",
    );
    assert_eq!(
        statements(&ast),
        vec![
            NodeKind::GlobalStatement,
            NodeKind::StaticVariableDeclaration,
            NodeKind::UnsetStatement,
            NodeKind::DeclareStatement,
            NodeKind::ReturnStatement,
            NodeKind::EmptyStatement,
        ]
    );
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_precedence() {
    assert_eq!(
        expr("$a = 1 + 2 * 3"),
        "(AssignmentExpression = (Variable $a) (BinaryExpression + (Literal(Integer) 1) \
         (BinaryExpression * (Literal(Integer) 2) (Literal(Integer) 3))))"
    );
    assert_eq!(
        expr("$a and $b || $c"),
        "(BinaryExpression and (Variable $a) (BinaryExpression || (Variable $b) (Variable $c)))"
    );
    assert_eq!(
        expr("$a . $b + $c"),
        "(BinaryExpression + (BinaryExpression . (Variable $a) (Variable $b)) (Variable $c))"
    );
}

#[test]
fn test_right_associative_operators() {
    assert_eq!(
        expr("2 ** 3 ** 2"),
        "(BinaryExpression ** (Literal(Integer) 2) (BinaryExpression ** (Literal(Integer) 3) (Literal(Integer) 2)))"
    );
    assert_eq!(
        expr("-2 ** 2"),
        "(UnaryExpression - (BinaryExpression ** (Literal(Integer) 2) (Literal(Integer) 2)))"
    );
    assert_eq!(
        expr("$a ?? $b ?? $c"),
        "(BinaryExpression ?? (Variable $a) (BinaryExpression ?? (Variable $b) (Variable $c)))"
    );
    assert_eq!(
        expr("$a = $b += 1"),
        "(AssignmentExpression = (Variable $a) (AssignmentExpression += (Variable $b) (Literal(Integer) 1)))"
    );
}

#[test]
fn test_assignment_inside_negation() {
    assert_eq!(
        expr("!$a = f()"),
        "(UnaryExpression ! (AssignmentExpression = (Variable $a) \
         (FunctionPostfix f (Identifier f) (Arguments))))"
    );
}

#[test]
fn test_assign_by_reference() {
    let ast = parse_ok("<?php $a = &$b;");
    let assignment = find(&ast, NodeKind::AssignmentExpression)[0];
    assert_eq!(ast.node(assignment).image(), "=&");
    assert_eq!(ast.node(assignment).modifiers(), Modifiers::BY_REFERENCE);
}

#[test]
fn test_conditional() {
    assert_eq!(
        expr("$a ? $b : $c ? $d : $e"),
        "(ConditionalExpression ? (ConditionalExpression ? (Variable $a) (Variable $b) (Variable $c)) \
         (Variable $d) (Variable $e))"
    );
    assert_eq!(
        expr("$a ?: $b"),
        "(ConditionalExpression ? (Variable $a) (Variable $b))"
    );
}

#[test]
fn test_spaceship() {
    let source = "<?php $a <=> $b;";
    let ast = parse_ok(source);
    let binaries = find(&ast, NodeKind::BinaryExpression);
    assert_eq!(binaries.len(), 1);
    let node = ast.node(binaries[0]);
    assert_eq!(node.image(), "<=>");
    assert_eq!(&source[node.span().range()], "$a <=> $b");
}

#[test]
fn test_unary_and_casts() {
    assert_eq!(
        expr("(INT) $a"),
        "(CastExpression (int) (Variable $a))"
    );
    assert_eq!(expr("@f()"), "(UnaryExpression @ (FunctionPostfix f (Identifier f) (Arguments)))");
    assert_eq!(expr("++$i"), "(PreIncrementExpression ++ (Variable $i))");
    assert_eq!(expr("$i--"), "(PostDecrementExpression -- (Variable $i))");
    assert_eq!(
        expr("$x instanceof Foo"),
        "(InstanceOfExpression instanceof (Variable $x) (ClassReference Foo))"
    );
}

#[test]
fn test_member_access() {
    assert_eq!(
        expr("$a->b()->c"),
        "(MemberPrimaryPrefix -> (MemberPrimaryPrefix -> (Variable $a) \
         (MethodPostfix b (Identifier b) (Arguments))) (PropertyPostfix c (Identifier c)))"
    );
    assert_eq!(
        expr("Foo::bar(1)"),
        "(MemberPrimaryPrefix :: (ClassReference Foo) \
         (MethodPostfix bar (Identifier bar) (Arguments (Literal(Integer) 1))))"
    );
    assert_eq!(
        expr("\\A\\B::$c"),
        "(MemberPrimaryPrefix :: (ClassReference \\A\\B) (PropertyPostfix $c (Variable $c)))"
    );
    assert_eq!(
        expr("static::X"),
        "(MemberPrimaryPrefix :: (StaticReference static) (ConstantPostfix X (Identifier X)))"
    );
    assert_eq!(
        expr("$a->list[0]"),
        "(MemberPrimaryPrefix -> (Variable $a) (PropertyPostfix list \
         (ArrayIndexExpression (Identifier list) (Literal(Integer) 0))))"
    );
}

#[test]
fn test_variables() {
    assert_eq!(expr("$$a"), "(VariableVariable $ (Variable $a))");
    assert_eq!(
        expr("${'a' . 'b'}"),
        "(CompoundVariable $ (BinaryExpression . (Literal(String) 'a') (Literal(String) 'b')))"
    );
    assert_eq!(expr("$a[] = 1"), "(AssignmentExpression = (ArrayIndexExpression (Variable $a)) (Literal(Integer) 1))");
    assert_eq!(
        expr("$s{0}"),
        "(StringIndexExpression (Variable $s) (Literal(Integer) 0))"
    );
}

#[test]
fn test_array_styles_differ_only_in_style() {
    let call = expr("array(1, 'k' => 2, &$v)");
    let bracket = expr("[1, 'k' => 2, &$v]");
    assert_eq!(call.replace("Array(Call)", "Array(Bracket)"), bracket);
    assert_eq!(
        bracket,
        "(Array(Bracket) (ArrayElement (Literal(Integer) 1)) \
         (ArrayElement (Literal(String) 'k') (Literal(Integer) 2)) (ArrayElement (Variable $v)))"
    );

    let ast = parse_ok("<?php [&$v];");
    let element = find(&ast, NodeKind::ArrayElement)[0];
    assert_eq!(ast.node(element).modifiers(), Modifiers::BY_REFERENCE);
}

#[test]
fn test_list_with_empty_slot() {
    let ast = parse_ok("<?php list(, $b) = $c;");
    let list = find(&ast, NodeKind::ListExpression)[0];
    let elements = ast.children(list);
    assert_eq!(elements.len(), 2);
    assert!(ast.children(elements[0]).is_empty());
    assert!(ast.node(elements[0]).span().is_empty());
    assert_eq!(sexp(&ast, elements[1]), "(ArrayElement (Variable $b))");
}

#[test]
fn test_arguments_unpacking_and_reference() {
    let ast = parse_ok("<?php f(...$args, &$r, 3);");
    let arguments = find(&ast, NodeKind::Arguments)[0];
    let modifiers: Vec<Modifiers> = ast
        .child_nodes(arguments)
        .map(|(_, node)| node.modifiers())
        .collect();
    assert_eq!(
        modifiers,
        vec![Modifiers::VARIADIC, Modifiers::BY_REFERENCE, Modifiers::NONE]
    );
}

#[test]
fn test_closures() {
    let ast = parse_ok("<?php $f = function ($x) use (&$y, $z): int { return $x; };");
    let closure = find(&ast, NodeKind::Closure)[0];
    assert_eq!(
        sexp(&ast, closure),
        "(Closure (FormalParameters (FormalParameter $x (VariableDeclarator $x))) \
         (ClosureUses use (Variable $y) (Variable $z)) (ScalarType int) \
         (ScopeStatement (ReturnStatement return (Variable $x))))"
    );
    let uses = find(&ast, NodeKind::ClosureUses)[0];
    let first = ast.children(uses)[0];
    assert_eq!(ast.node(first).modifiers(), Modifiers::BY_REFERENCE);

    let ast = parse_ok("<?php static function () {};");
    let closure = find(&ast, NodeKind::Closure)[0];
    assert_eq!(ast.node(closure).modifiers(), Modifiers::STATIC);
}

#[test]
fn test_function_statement_can_be_closure_call() {
    let ast = parse_ok("<?php function () { return 1; };");
    assert_eq!(statements(&ast), vec![NodeKind::ExpressionStatement]);
    assert_eq!(find(&ast, NodeKind::Closure).len(), 1);
}

#[test]
fn test_allocation() {
    assert_eq!(
        expr("new Foo(1)"),
        "(AllocationExpression new (ClassReference Foo) (Arguments (Literal(Integer) 1)))"
    );
    assert_eq!(expr("new static"), "(AllocationExpression new (StaticReference static))");
    assert_eq!(
        expr("new $cls->name"),
        "(AllocationExpression new (MemberPrimaryPrefix -> (Variable $cls) \
         (PropertyPostfix name (Identifier name))))"
    );
    assert_eq!(expr("clone $a"), "(CloneExpression clone (Variable $a))");
}

#[test]
fn test_language_constructs() {
    assert_eq!(
        expr("isset($a, $b[1])"),
        "(IssetExpression isset (Variable $a) (ArrayIndexExpression (Variable $b) (Literal(Integer) 1)))"
    );
    assert_eq!(expr("empty($a)"), "(EmptyExpression empty (Variable $a))");
    assert_eq!(expr("die(1)"), "(ExitExpression die (Literal(Integer) 1))");
    assert_eq!(expr("exit"), "(ExitExpression exit)");
    assert_eq!(
        expr("print $a . 'x'"),
        "(PrintExpression print (BinaryExpression . (Variable $a) (Literal(String) 'x')))"
    );
    assert_eq!(
        expr("require_once __DIR__ . '/a.php'"),
        "(RequireExpression require_once (BinaryExpression . (MagicConstant __DIR__) (Literal(String) '/a.php')))"
    );
}

#[test]
fn test_yield() {
    let ast = parse_ok("<?php function g() { yield; yield $v; $x = yield $k => $v; }");
    let yields: Vec<usize> = find(&ast, NodeKind::YieldExpression)
        .into_iter()
        .map(|id| ast.children(id).len())
        .collect();
    assert_eq!(yields, vec![0, 1, 2]);
}

#[test]
fn test_literals() {
    assert_eq!(expr("1.5"), "(Literal(Float) 1.5)");
    assert_eq!(expr("TRUE"), "(Literal(Boolean) TRUE)");
    assert_eq!(expr("null"), "(Literal(Null) null)");
    assert_eq!(expr("\"a $b\""), "(Literal(String) \"a $b\")");
    assert_eq!(expr("FOO"), "(Constant FOO)");
    assert_eq!(expr("__LINE__"), "(MagicConstant __LINE__)");
}

#[test]
fn test_interpolated_strings_are_single_literals() {
    assert_eq!(
        expr(r#""Hello {$user["name"]}""#),
        r#"(Literal(String) "Hello {$user["name"]}")"#
    );
    assert_eq!(
        expr(r#"$a . "{$o->m("x")}" . $b"#),
        r#"(BinaryExpression . (BinaryExpression . (Variable $a) (Literal(String) "{$o->m("x")}")) (Variable $b))"#
    );

    let ast = parse_ok("<?php echo `ls {$dirs['x']}`, \"done\";");
    let literals = ast.find_all(|kind| kind == NodeKind::Literal(LiteralKind::String));
    assert_eq!(literals.len(), 2);
    assert_eq!(ast.node(literals[0]).image(), "`ls {$dirs['x']}`");
}

// ============================================================================
// Heredoc
// ============================================================================

#[test]
fn test_heredoc_node() {
    let ast = parse_ok("<?php $a = <<<EOT\nhello\nworld\nEOT;\n");
    let heredoc = find(&ast, NodeKind::Heredoc)[0];
    assert_eq!(ast.node(heredoc).image(), "hello\nworld");
    let span = ast.node(heredoc).span();
    assert_eq!((span.start.line, span.end.line), (1, 4));
}

#[test]
fn test_positions_after_heredoc() {
    let ast = parse_ok("<?php\n$a = <<<EOT\nx\nEOT;\n$b = 1;\n");
    let statements = ast.children(ast.root());
    let second = ast.node(statements[1]).span();
    assert_eq!((second.start.line, second.start.column), (5, 1));
    assert_eq!((second.end.line, second.end.column), (5, 8));
}

#[test]
fn test_php52_heredoc_swallows_next_token() {
    let source = "<?php $a = <<<EOT\nx\nEOT\n/*\"*/;";
    assert!(parse_with(Dialect::Php52, source).is_ok());
    assert!(parse_with(Dialect::Generic, source).is_ok());

    let source = "<?php $a = <<<EOT\nx\nEOT;";
    assert!(parse_with(Dialect::Generic, source).is_ok());
    assert_eq!(
        parse_with(Dialect::Php52, source).unwrap_err(),
        ParseError::UnexpectedEndOfInput {
            file: "t.php".to_string()
        }
    );
}

// ============================================================================
// Dialect Gates
// ============================================================================

#[test]
fn test_short_arrays_need_php54() {
    expect_unexpected(parse_with(Dialect::Php53, "<?php $a = [1, 2];"), "[");
    let ast = parse_with(Dialect::Php54, "<?php $a = [1, 2];").unwrap();
    assert_eq!(find(&ast, NodeKind::Array(ArrayStyle::Bracket)).len(), 1);
    assert!(parse_with(Dialect::Php53, "<?php $a = array(1, 2); $a[0];").is_ok());
}

#[test]
fn test_namespaces_need_php53() {
    expect_unexpected(parse_with(Dialect::Php52, "<?php namespace A;"), "namespace");
    expect_unexpected(parse_with(Dialect::Php52, "<?php use A\\B;"), "use");
    expect_unexpected(parse_with(Dialect::Php52, "<?php \\strlen($a);"), "\\");
    assert!(parse_with(Dialect::Php53, "<?php namespace A; use B\\C; \\strlen($a);").is_ok());
}

#[test]
fn test_closures_need_php53() {
    expect_unexpected(parse_with(Dialect::Php52, "<?php $f = function () {};"), "function");
    expect_unexpected(parse_with(Dialect::Php52, "<?php function () {};"), "(");
    expect_unexpected(
        parse_with(Dialect::Php52, "<?php class A { function f() { return static::X; } }"),
        "::",
    );
    expect_unexpected(parse_with(Dialect::Php52, "<?php $a = new static;"), "static");
    assert!(parse_with(Dialect::Php52, "<?php function f() { static $n = 0; }").is_ok());
    assert!(
        parse_with(
            Dialect::Php53,
            "<?php $f = function () {}; $a = new static; static::f();"
        )
        .is_ok()
    );
}

#[test]
fn test_generators_and_finally_need_php55() {
    expect_unexpected(
        parse_with(Dialect::Php54, "<?php function g() { yield 1; }"),
        "yield",
    );
    expect_unexpected(parse_with(Dialect::Php54, "<?php try { f(); } finally { g(); }"), "finally");
    expect_unexpected(
        parse_with(Dialect::Php54, "<?php try { f(); } catch (E $e) {} finally { g(); }"),
        "finally",
    );
    let source = "<?php function g() { try { yield 1; } finally { g(); } }";
    let ast = parse_with(Dialect::Php55, source).unwrap();
    assert_eq!(find(&ast, NodeKind::YieldExpression).len(), 1);
    assert_eq!(find(&ast, NodeKind::FinallyStatement).len(), 1);
}

#[test]
fn test_pow_assignment_needs_php56() {
    expect_unexpected(parse_with(Dialect::Php55, "<?php $a **= 2;"), "**=");
    let ast = parse_with(Dialect::Php56, "<?php $a **= 2;").unwrap();
    let assignment = find(&ast, NodeKind::AssignmentExpression)[0];
    assert_eq!(ast.node(assignment).image(), "**=");
}

#[test]
fn test_callable_names_a_class_before_php54() {
    let source = "<?php function f(callable $x) {}";
    let ast = parse_with(Dialect::Php53, source).unwrap();
    assert!(find(&ast, NodeKind::TypeCallable).is_empty());
    let reference = find(&ast, NodeKind::ClassOrInterfaceReference)[0];
    assert_eq!(ast.node(reference).image(), "callable");

    let ast = parse_with(Dialect::Php54, source).unwrap();
    assert_eq!(find(&ast, NodeKind::TypeCallable).len(), 1);
}

#[test]
fn test_php7_operators_and_return_types() {
    expect_unexpected(parse_with(Dialect::Php56, "<?php $a <=> $b;"), "<=>");
    expect_unexpected(parse_with(Dialect::Php56, "<?php $a ?? $b;"), "??");
    expect_unexpected(parse_with(Dialect::Php56, "<?php function f(): int {}"), ":");
    assert!(parse_with(Dialect::Php70, "<?php $a <=> $b ?? $c;").is_ok());
    assert!(parse_with(Dialect::Php70, "<?php function f(): int {}").is_ok());
}

#[test]
fn test_variadics_need_php56() {
    expect_unexpected(parse_with(Dialect::Php55, "<?php function f(...$x) {}"), "...");
    expect_unexpected(parse_with(Dialect::Php55, "<?php f(...$x);"), "...");
    expect_unexpected(parse_with(Dialect::Php55, "<?php $a ** 2;"), "**");
    assert!(parse_with(Dialect::Php56, "<?php function f(...$x) {} f(...$x); $a ** 2;").is_ok());
}

#[test]
fn test_every_dialect_parses_common_code() {
    let source = "<?php
class A {
    private $items = array();
    public function add($item) {
        $this->items[] = $item;
        return count($this->items) > 0 ? true : false;
    }
}
";
    for dialect in Dialect::ALL {
        assert!(parse_with(dialect, source).is_ok(), "{dialect}");
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_truncated_input() {
    for source in ["<?php function f(", "<?php class A {", "<?php $a = ", "<?php if ($a"] {
        assert_eq!(
            parse_with(Dialect::Generic, source).unwrap_err(),
            ParseError::UnexpectedEndOfInput {
                file: "t.php".to_string()
            },
            "{source:?}"
        );
    }
}

#[test]
fn test_unexpected_token_names_token() {
    let error = parse_with(Dialect::Generic, "<?php $a = ;").unwrap_err();
    let token = error.token().unwrap();
    assert_eq!(token.kind, TokenKind::Semicolon);
    assert_eq!((token.span.start.line, token.span.start.column), (1, 12));
    assert_eq!(error.to_string(), "t.php: unexpected token `;` at line 1, column 12");
    assert_eq!(error.file(), "t.php");
}

#[test]
fn test_unknown_character_is_reported() {
    let error = parse_with(Dialect::Generic, "<?php $a = 'open").unwrap_err();
    assert_eq!(error.token().map(|t| t.kind), Some(TokenKind::Unknown));
}

#[test]
fn test_empty_and_html_only_files() {
    let ast = parse_ok("");
    assert!(ast.children(ast.root()).is_empty());
    assert_eq!(ast.node(ast.root()).image(), "t.php");
    let ast = parse_ok("<html></html>");
    assert_eq!(statements(&ast), vec![NodeKind::InlineHtml]);
}

// ============================================================================
// Threads
// ============================================================================

#[test]
fn test_parses_on_separate_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Ast>();
    assert_send_sync::<ParseError>();
    assert_send_sync::<LiteralKind>();

    let sources = ["<?php class A {}", "<?php function f() {}", "<?php $x = [1];"];
    let counts: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| scope.spawn(move || parse_ok(source).len()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(counts.iter().all(|&n| n > 1));
}
