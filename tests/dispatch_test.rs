//! Tests del ciclo de vida de un request, sin sockets
//! tests/dispatch_test.rs

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http_router::dispatch::{Context, Dispatcher, HandlerResult, ResourceStore};
use http_router::http::{Method, Request, Response, StatusCode};
use http_router::router::{Router, Value};

/// Almacenamiento en memoria que cuenta las lecturas
#[derive(Default)]
struct MemoryStore {
    files: HashMap<String, Vec<u8>>,
    reads: AtomicUsize,
}

impl ResourceStore for MemoryStore {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
    }
}

fn text(body: &str) -> HandlerResult {
    Ok(Response::new().with_status(StatusCode::OK).with_body(body))
}

fn three_vars(ctx: &Context<'_>) -> HandlerResult {
    let args = ctx.args();
    text(&format!(
        "{} {} {}",
        args.str("a").unwrap_or("?"),
        args.str("b").unwrap_or("?"),
        args.str("c").unwrap_or("?")
    ))
}

fn one_var(ctx: &Context<'_>) -> HandlerResult {
    text(&format!("{} rat", ctx.args().str("a").unwrap_or("?")))
}

fn integer_arg(ctx: &Context<'_>) -> HandlerResult {
    let arg = ctx.arg("arg").ok_or("missing arg")?;
    text(arg.type_name())
}

fn test_app() -> (Dispatcher, Arc<MemoryStore>) {
    let mut router = Router::new().with_name("Test App");

    router.add_filter("list", |raw| Ok(Value::List(raw.split(',').map(String::from).collect())));

    router.get("basic_endpoint", "/simple/endpoint", |_| text("simple endpoint")).unwrap();
    router
        .get("url_params", "/params", |ctx| {
            let req = ctx.request();
            text(&format!("{} {}", req.arg("a").unwrap_or("?"), req.arg("b").unwrap_or("?")))
        })
        .unwrap();
    router.get("three_vars", "/vars/<a>/<b>/not/<c>", three_vars).unwrap();
    router.get("one_var", "/vars/<a>/rat", one_var).unwrap();
    router.get("integer_arg", "/integer/<int:arg>", integer_arg).unwrap();
    router
        .get("list_me", "/list/<list:var>", |ctx| {
            let items = ctx.arg("var").and_then(Value::as_list).unwrap_or_default();
            text(&format!("{}/{}", items.join("/"), ctx.arg("var").map_or("", Value::type_name)))
        })
        .unwrap();
    router
        .get("redirection", "/redirect/<arg>", |ctx| {
            let arg = ctx.args().str("arg").unwrap_or_default().to_string();
            let target = ctx.url_for("one_var", &[("a", arg)])?;
            ctx.redirect(&target)
        })
        .unwrap();
    router
        .get("loop", "/loop", |ctx| ctx.redirect("/loop"))
        .unwrap();
    router
        .register("json", "/json", Method::GET, "application/json", |_| {
            // Sin status: el dispatcher usa 200
            Ok(Response::new().with_mimetype("text/plain").with_body(r#"{"data": "value"}"#))
        })
        .unwrap();
    router
        .get("failing", "/failing", |_| Err("database unavailable".into()))
        .unwrap();
    router
        .get("panicking", "/panicking", |_| panic!("handler exploded"))
        .unwrap();
    router
        .post("echo", "/echo", |ctx| {
            Ok(Response::new().with_body_bytes(ctx.request().body().to_vec()))
        })
        .unwrap();

    router.static_resource("notes.txt");
    router.static_file("/missing", "missing.txt", "text/plain");

    let mut files = HashMap::new();
    files.insert("notes.txt".to_string(), b"some notes\n".to_vec());
    let store = Arc::new(MemoryStore {
        files,
        reads: AtomicUsize::new(0),
    });

    (router.build(Arc::clone(&store)), store)
}

fn get(app: &Dispatcher, target: &str) -> Response {
    app.dispatch(Request::new("GET", target))
}

fn assert_res(res: &Response, status: StatusCode, body: Option<&str>) {
    assert_eq!(res.status(), Some(status), "body = {:?}", res.body_text());
    if let Some(body) = body {
        assert_eq!(res.body_text(), body);
    }
}

// ==================== Endpoints ====================

#[test]
fn test_simple_endpoint() {
    let (app, _) = test_app();
    assert_res(&get(&app, "/simple/endpoint"), StatusCode::OK, Some("simple endpoint"));
}

#[test]
fn test_trailing_slash() {
    let (app, _) = test_app();
    assert_res(&get(&app, "/simple/endpoint/"), StatusCode::OK, Some("simple endpoint"));
}

#[test]
fn test_url_params() {
    let (app, _) = test_app();
    let req = Request::new("GET", "/params").with_query("a=hello&b=there");
    assert_res(&app.dispatch(req), StatusCode::OK, Some("hello there"));
}

#[test]
fn test_url_params_decoded() {
    let (app, _) = test_app();
    assert_res(&get(&app, "/params?a=hello%20big&b=world"), StatusCode::OK, Some("hello big world"));
}

#[test]
fn test_three_vars() {
    let (app, _) = test_app();
    assert_res(&get(&app, "/vars/hello/there/not/me"), StatusCode::OK, Some("hello there me"));
}

#[test]
fn test_one_var() {
    let (app, _) = test_app();
    assert_res(&get(&app, "/vars/large/rat"), StatusCode::OK, Some("large rat"));
}

#[test]
fn test_literal_precedence() {
    let mut router = Router::new();
    router.get("one_var", "/vars/<a>/rat", one_var).unwrap();
    router.get("literal", "/vars/large/rat", |_| text("literal branch")).unwrap();
    let app = router.build(MemoryStore::default());

    assert_res(&get(&app, "/vars/large/rat"), StatusCode::OK, Some("literal branch"));
    assert_res(&get(&app, "/vars/small/rat"), StatusCode::OK, Some("small rat"));
}

#[test]
fn test_arg_type() {
    let (app, _) = test_app();
    assert_res(&get(&app, "/integer/6"), StatusCode::OK, Some("int"));
}

#[test]
fn test_arg_type_mismatch() {
    let (app, _) = test_app();
    let res = get(&app, "/integer/abc");
    assert_res(&res, StatusCode::BAD_REQUEST, None);
    assert!(res.body_text().contains("Wrong type in URL variable 'arg'"));
}

#[test]
fn test_custom_filter() {
    let (app, _) = test_app();
    assert_res(&get(&app, "/list/a,b,c"), StatusCode::OK, Some("a/b/c/list"));
}

#[test]
fn test_redirect() {
    let (app, _) = test_app();
    assert_res(&get(&app, "/redirect/huge"), StatusCode::OK, Some("huge rat"));
}

#[test]
fn test_redirect_loop_is_500() {
    let (app, _) = test_app();
    let res = get(&app, "/loop");
    assert_res(&res, StatusCode::INTERNAL_SERVER_ERROR, None);
    assert!(res.body_text().contains("too many internal redirects"));
}

#[test]
fn test_route_mimetype_and_default_status() {
    let (app, _) = test_app();
    let res = get(&app, "/json");
    assert_res(&res, StatusCode::OK, Some(r#"{"data": "value"}"#));
    assert_eq!(res.mimetype(), "application/json");
}

#[test]
fn test_post_body() {
    let (app, _) = test_app();
    let res = app.dispatch(Request::new("POST", "/echo").with_body(b"payload"));
    assert_res(&res, StatusCode::OK, Some("payload"));
}

// ==================== Errores ====================

#[test]
fn test_partial_path() {
    let (app, _) = test_app();
    assert_res(&get(&app, "/vars/large"), StatusCode::NOT_FOUND, None);
}

#[test]
fn test_no_such_path() {
    let (app, _) = test_app();
    assert_res(&get(&app, "/fake/path"), StatusCode::NOT_FOUND, Some("No route for GET /fake/path"));
}

#[test]
fn test_wrong_method_is_404() {
    let (app, _) = test_app();
    let res = app.dispatch(Request::new("DELETE", "/simple/endpoint"));
    assert_res(&res, StatusCode::NOT_FOUND, None);
}

#[test]
fn test_invalid_url_query() {
    let (app, _) = test_app();
    let req = Request::new("GET", "/simple/endpoint").with_query("a=g&g");
    assert_res(&app.dispatch(req), StatusCode::BAD_REQUEST, None);
}

#[test]
fn test_invalid_method() {
    let (app, _) = test_app();
    for method in ["PATCHFOO", "PUTDELETE", "get"] {
        let res = app.dispatch(Request::new(method, "/simple/endpoint"));
        assert_res(&res, StatusCode::BAD_REQUEST, Some(&format!("Invalid method: {}", method)));
    }
}

#[test]
fn test_handler_error_is_500() {
    let (app, _) = test_app();
    let res = get(&app, "/failing");
    assert_res(&res, StatusCode::INTERNAL_SERVER_ERROR, None);
    assert!(res.body_text().contains("database unavailable"));
}

#[test]
fn test_handler_panic_is_500_and_app_survives() {
    let (app, _) = test_app();
    let res = get(&app, "/panicking");
    assert_res(&res, StatusCode::INTERNAL_SERVER_ERROR, None);
    assert!(res.body_text().contains("handler exploded"));

    // El dispatcher sigue atendiendo
    assert_res(&get(&app, "/simple/endpoint"), StatusCode::OK, Some("simple endpoint"));
}

#[test]
fn test_error_handler() {
    let mut router = Router::new();
    router.on_error(StatusCode::NOT_FOUND, "text/html", |_| {
        Response::new().with_status(StatusCode::NOT_FOUND).with_body("Hit the 404 handler.")
    });
    let app = router.build(MemoryStore::default());

    let res = get(&app, "/lsdasdads");
    assert_res(&res, StatusCode::NOT_FOUND, Some("Hit the 404 handler."));
    assert_eq!(res.mimetype(), "text/html");
}

#[test]
fn test_render_error_for_unregistered_code() {
    let (app, _) = test_app();
    let res = app.render_error(StatusCode::from_u16(418), "teapot");
    assert_res(&res, StatusCode::INTERNAL_SERVER_ERROR, Some("teapot"));
}

// ==================== Recursos estáticos ====================

#[test]
fn test_static_resource() {
    let (app, store) = test_app();

    let res = get(&app, "/static/notes.txt");
    assert_res(&res, StatusCode::OK, Some("some notes\n"));
    assert_eq!(res.mimetype(), "text/plain");

    let again = get(&app, "/static/notes.txt");
    assert_eq!(again.body(), res.body());
    assert_eq!(store.reads.load(Ordering::SeqCst), 1);
    assert_eq!(app.statics().cached(), 1);
}

#[test]
fn test_static_resource_missing() {
    let (app, _) = test_app();
    let res = get(&app, "/missing");
    assert_res(&res, StatusCode::NOT_FOUND, Some("Static resource not found: missing.txt"));
}

#[test]
fn test_static_still_validates_method() {
    let (app, store) = test_app();
    let res = app.dispatch(Request::new("PATCHFOO", "/static/notes.txt"));
    assert_res(&res, StatusCode::BAD_REQUEST, None);
    assert_eq!(store.reads.load(Ordering::SeqCst), 0);
}

// ==================== URLs ====================

#[test]
fn test_url_for() {
    let (app, _) = test_app();
    assert_eq!(app.url_for("one_var", &[("a", 1)]).unwrap(), "/vars/1/rat");
    assert_eq!(
        app.url_for("three_vars", &[("a", "x"), ("b", "y"), ("c", "z")]).unwrap(),
        "/vars/x/y/not/z"
    );
    assert!(app.url_for("one_var", &[("b", 1)]).is_err());
    assert!(app.url_for("unknown", &[("a", 1)]).is_err());
}

#[test]
fn test_url_for_round_trips() {
    let (app, _) = test_app();
    let url = app.url_for("one_var", &[("a", "big")]).unwrap();
    assert_res(&get(&app, &url), StatusCode::OK, Some("big rat"));

    // Estos valores no ocuparían exactamente un segmento
    assert!(app.url_for("one_var", &[("a", "")]).is_err());
    assert!(app.url_for("one_var", &[("a", "x/y")]).is_err());
}

#[test]
fn test_app_name() {
    let (app, _) = test_app();
    assert_eq!(app.name(), "Test App");
}
