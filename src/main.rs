//! # HTTP Router - Entry Point
//! src/main.rs
//!
//! Punto de entrada: lee la configuración, inicializa los logs, registra la
//! aplicación de ejemplo y arranca el servidor.

use http_router::config::Config;
use http_router::dispatch::{Context, FsStore, HandlerResult};
use http_router::http::{Method, Response, StatusCode};
use http_router::router::{RouteError, Router, Value};
use http_router::server::Server;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Sample<'a> {
    app: &'a str,
    data: &'a str,
    data2: &'a str,
}

fn index(_ctx: &Context<'_>) -> HandlerResult {
    let html = [
        "<h1>Welcome!</h1>",
        "<p>A small segment-tree router over HTTP/1.0.</p>",
        "<p>Try <a href='/json'>a json endpoint</a>, ",
        "<a href='/vars/large/rat'>a URL variable</a> ",
        "or <a href='/integer/6'>a typed one</a>.</p>",
    ];
    Ok(Response::new().with_body(&html.concat()))
}

fn name(ctx: &Context<'_>) -> HandlerResult {
    Ok(Response::new().with_body(ctx.app_name()))
}

fn json(ctx: &Context<'_>) -> HandlerResult {
    let body = serde_json::to_string(&Sample {
        app: ctx.app_name(),
        data: "value",
        data2: "value2",
    })?;
    Ok(Response::new().with_body(&body))
}

fn one_var(ctx: &Context<'_>) -> HandlerResult {
    let a = ctx.arg("a").map(Value::to_string).unwrap_or_default();
    Ok(Response::new().with_body(&format!("{} rat", a)))
}

fn integer_arg(ctx: &Context<'_>) -> HandlerResult {
    let arg = ctx.args().int("arg").ok_or("missing integer argument")?;
    Ok(Response::new().with_body(&format!("{} is an int; doubled {}", arg, arg * 2)))
}

fn list_me(ctx: &Context<'_>) -> HandlerResult {
    let items = ctx.arg("var").and_then(Value::as_list).unwrap_or_default();
    Ok(Response::new().with_body(&items.join("/")))
}

fn redirection(ctx: &Context<'_>) -> HandlerResult {
    let arg = ctx.arg("arg").map(Value::to_string).unwrap_or_default();
    let target = ctx.url_for("one_var", &[("a", arg)])?;
    ctx.redirect(&target)
}

fn echo(ctx: &Context<'_>) -> HandlerResult {
    Ok(Response::new()
        .with_status(StatusCode::OK)
        .with_body_bytes(ctx.request().body().to_vec()))
}

/// Registra la aplicación de ejemplo
fn build_app(router: &mut Router) -> Result<(), RouteError> {
    router.add_filter("list", |raw| {
        Ok(Value::List(raw.split(',').map(String::from).collect()))
    });

    router.register("index", "/", Method::GET, "text/html", index)?;
    router.get("name", "/name", name)?;
    router.register("json", "/json", Method::GET, "application/json", json)?;
    router.get("one_var", "/vars/<a>/rat", one_var)?;
    router.get("integer_arg", "/integer/<int:arg>", integer_arg)?;
    router.get("list_me", "/list/<list:var>", list_me)?;
    router.get("redirection", "/redirect/<arg>", redirection)?;
    router.post("echo", "/echo", echo)?;

    router.static_resource("style.css");
    router.static_file("/favicon.ico", "favicon.ico", "image/x-icon");

    router.on_error(StatusCode::NOT_FOUND, "text/html", |message| {
        Response::new().with_body(&format!("<h1>Not Found</h1><p>{}</p>", message))
    });

    Ok(())
}

fn main() {
    let config = Config::new();

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("http_router=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(2);
    }

    tracing::info!(
        address = %config.address(),
        static_dir = %config.static_dir,
        buffer_size = config.buffer_size,
        "configuration loaded"
    );

    let mut router = Router::new().with_name("http_router demo");
    if let Err(e) = build_app(&mut router) {
        tracing::error!(error = %e, "route registration failed");
        std::process::exit(1);
    }

    let app = router.build(FsStore::new(&config.static_dir));
    let server = Server::new(config, app);

    // Bloquea el thread para siempre
    if let Err(e) = server.run() {
        tracing::error!(error = %e, "fatal server error");
        std::process::exit(1);
    }
}
