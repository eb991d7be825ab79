use super::*;
use tyg_emitter::Printer;
use tyg_parser::{ParsedModule, parse_module};

fn render(ty: &TypeExpr) -> String {
    let mut module = parse_module("test.py", "pass\n").expect("source should parse");
    let node = type_to_node(&mut module.arena, ty);
    Printer::expression_text(&module.arena, node)
}

/// Annotation of the module's first statement, which must be `x: T = ...`.
fn annotation(module: &ParsedModule) -> NodeIndex {
    match module.body().first().and_then(|statement| module.arena.data(*statement)) {
        Some(NodeData::AnnAssign { annotation, .. }) => *annotation,
        _ => panic!("expected an annotated assignment"),
    }
}

fn read_annotation(source: &str) -> Option<TypeExpr> {
    let module = parse_module("test.py", source).expect("source should parse");
    node_to_type(&module.arena, annotation(&module))
}

#[test]
fn test_render_nested_generics() {
    let ty = TypeExpr::dict(TypeExpr::atomic("str"), TypeExpr::list(TypeExpr::atomic("int")));
    assert_eq!(render(&ty), "Dict[str, List[int]]");
}

#[test]
fn test_render_none_and_ellipsis() {
    assert_eq!(render(&TypeExpr::optional(TypeExpr::none())), "Optional[None]");
    assert_eq!(render(&TypeExpr::tuple_of_any()), "Tuple[Any, ...]");
}

#[test]
fn test_render_union_and_dotted_name() {
    let ty = TypeExpr::union_of([TypeExpr::atomic("str"), TypeExpr::atomic("int")]);
    assert_eq!(render(&ty), ty.to_string());
    assert_eq!(render(&TypeExpr::atomic("models.User")), "models.User");
}

#[test]
fn test_read_subscripted_annotation() {
    let ty = read_annotation("x: Dict[str, List[int]] = {}\n").expect("annotation");
    assert_eq!(ty.to_string(), "Dict[str, List[int]]");
}

#[test]
fn test_read_string_annotation() {
    assert_eq!(read_annotation("x: 'User' = None\n"), Some(TypeExpr::atomic("User")));
    assert_eq!(
        read_annotation("x: \"Optional[User]\" = None\n"),
        Some(TypeExpr::optional(TypeExpr::atomic("User")))
    );
}

#[test]
fn test_read_union_spellings() {
    let expected = TypeExpr::union_of([TypeExpr::atomic("int"), TypeExpr::none()]);
    assert_eq!(read_annotation("x: int | None = None\n"), Some(expected.clone()));
    assert_eq!(read_annotation("x: Union[int, None] = None\n"), Some(expected));
}

#[test]
fn test_read_dotted_annotation() {
    assert_eq!(read_annotation("x: typing.List = []\n"), Some(TypeExpr::atomic("typing.List")));
}

#[test]
fn test_call_is_not_an_annotation() {
    assert_eq!(read_annotation("x: make() = 1\n"), None);
}

#[test]
fn test_rendered_annotation_reads_back() {
    let ty = TypeExpr::iterator(TypeExpr::tuple(vec![TypeExpr::atomic("int"), TypeExpr::atomic("str")]));
    let mut module = parse_module("test.py", "pass\n").expect("source should parse");
    let node = type_to_node(&mut module.arena, &ty);
    assert_eq!(node_to_type(&module.arena, node), Some(ty));
}
