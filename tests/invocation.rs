/// Handler invocation tests
///
/// Leading parameters come from the container, trailing parameters from the
/// caller-supplied extras.

use hemlock_di::{capability, extra, extras, Cap, Container, DiError, Owned, Resolver};
use std::convert::Infallible;
use std::sync::Arc;

#[derive(Debug)]
struct Database {
    name: String,
}

struct Request {
    path: &'static str,
}

trait Renderer: Send + Sync {
    fn render(&self, body: &str) -> String;
}

capability!(dyn Renderer => [render]);

struct Html;

impl Renderer for Html {
    fn render(&self, body: &str) -> String {
        format!("<p>{}</p>", body)
    }
}

fn container() -> Container {
    let mut container = Container::new();
    container
        .singleton(|| Ok::<_, Infallible>(Database { name: "main".to_string() }))
        .instance(Html)
        .implements::<Html, dyn Renderer, _>(|h| h);
    container
}

#[test]
fn test_leading_param_resolved_trailing_param_passed_verbatim() {
    let container = container();

    let (db_name, id) = container
        .call(
            |db: Arc<Database>, id: &'static str| (db.name.clone(), id),
            extras!["42"],
        )
        .unwrap();

    assert_eq!(db_name, "main");
    assert_eq!(id, "42");
}

#[test]
fn test_all_params_resolved_without_extras() {
    let container = container();

    let out = container
        .call(
            |db: Arc<Database>, renderer: Cap<dyn Renderer>| renderer.render(&db.name),
            vec![],
        )
        .unwrap();

    assert_eq!(out, "<p>main</p>");
}

#[test]
fn test_all_params_from_extras() {
    let container = Container::new();

    let sum = container
        .call(|a: u32, b: u32| a + b, extras![2u32, 3u32])
        .unwrap();

    assert_eq!(sum, 5);
}

#[test]
fn test_route_handler_with_request_scope() {
    let root = container();

    let mut scope = root.scope();
    scope.instance(Request { path: "/posts" });

    let handler = |req: Arc<Request>, renderer: Cap<dyn Renderer>, slug: String, page: u32| {
        renderer.render(&format!("{}/{}?page={}", req.path, slug, page))
    };

    let body = scope
        .call(handler, extras!["hello-world".to_string(), 2u32])
        .unwrap();
    assert_eq!(body, "<p>/posts/hello-world?page=2</p>");

    // The parent has no request
    let err = root
        .call(handler, extras!["hello-world".to_string(), 2u32])
        .unwrap_err();
    assert!(matches!(err, DiError::NotFound { .. }));
}

#[test]
fn test_value_params_are_resolved_by_value() {
    let mut container = Container::new();
    container.instance("site".to_string()).instance(8080u16).instance(true);

    let out = container
        .call(
            |name: String, port: u16, debug: bool| format!("{}:{}:{}", name, port, debug),
            vec![],
        )
        .unwrap();

    assert_eq!(out, "site:8080:true");
}

#[test]
fn test_owned_param_clones_registered_value() {
    #[derive(Clone, Debug, PartialEq)]
    struct Settings {
        retries: u8,
    }

    let mut container = Container::new();
    container.instance(Settings { retries: 3 });

    let mut settings = container
        .call(|settings: Owned<Settings>| settings.into_inner(), vec![])
        .unwrap();
    settings.retries = 9;

    assert_eq!(settings, Settings { retries: 9 });
    assert_eq!(container.make_required::<Settings>().retries, 3);
}

#[test]
fn test_too_many_extras_is_arity_error() {
    let container = container();

    match container.call(|id: &'static str| id, extras!["1", "2"]) {
        Err(DiError::Arity { parameters, extras, .. }) => {
            assert_eq!(parameters, 1);
            assert_eq!(extras, 2);
        }
        other => panic!("expected arity error, got {:?}", other),
    }
}

#[test]
fn test_wrong_extra_type_is_type_mismatch() {
    let container = container();

    let err = container
        .call(|_db: Arc<Database>, id: u64| id, extras!["not a number"])
        .unwrap_err();
    assert!(matches!(err, DiError::TypeMismatch(_)));
}

#[test]
fn test_unresolvable_leading_param_fails() {
    struct Missing;

    let container = container();
    let err = container
        .call(|_missing: Arc<Missing>, id: &'static str| id, extras!["1"])
        .unwrap_err();

    match err {
        DiError::NotFound { requested, registered } => {
            assert!(requested.ends_with("Missing"));
            assert_eq!(registered.len(), 2);
        }
        other => panic!("expected not found, got {:?}", other),
    }
}

#[test]
fn test_handler_outputs_are_returned_in_order() {
    let container = container();

    let (a, b, c) = container
        .call(|db: Arc<Database>| (1, db.name.clone(), 'x'), vec![])
        .unwrap();

    assert_eq!((a, b.as_str(), c), (1, "main", 'x'));
}

#[test]
fn test_zero_param_handler() {
    let container = Container::new();
    assert_eq!(container.call(|| 7, vec![]).unwrap(), 7);
    assert!(container.call(|| 7, extras![1u8]).is_err());
}

#[test]
fn test_call_with_plain_function() {
    fn describe(db: Arc<Database>, suffix: String) -> String {
        format!("{}-{}", db.name, suffix)
    }

    let container = container();
    assert_eq!(
        container.call_required(describe, vec![extra("replica".to_string())]),
        "main-replica"
    );
}

#[test]
fn test_cap_param_accepts_capability_extra() {
    let container = Container::new();
    let renderer: Arc<dyn Renderer> = Arc::new(Html);

    let out = container
        .call(|r: Cap<dyn Renderer>| r.render("x"), vec![extra(renderer)])
        .unwrap();
    assert_eq!(out, "<p>x</p>");
}

#[test]
fn test_resolve_into_slots() {
    let container = container();

    let mut db: Option<Arc<Database>> = None;
    let mut renderer: Option<Cap<dyn Renderer>> = None;
    container.resolve_into(&mut db).unwrap();
    container.resolve_into(&mut renderer).unwrap();

    assert_eq!(db.unwrap().name, "main");
    assert_eq!(renderer.map(|r| r.render("ok")).unwrap(), "<p>ok</p>");

    let mut missing: Option<Arc<Request>> = None;
    assert!(container.resolve_into(&mut missing).is_err());
    assert!(missing.is_none());
}

#[test]
fn test_resolve_tuple_of_slots() {
    let container = container();

    let (db, renderer): (Arc<Database>, Cap<dyn Renderer>) = container.resolve().unwrap();
    assert_eq!(renderer.render(&db.name), "<p>main</p>");
}
