//! Request-scoped resolution in a toy router.
//!
//! A root container holds the application-wide bindings. Each request clones
//! it, registers the request and response as instances, then calls the route
//! handler with the path parameters passed as trailing extras.
//!
//! Run with `RUST_LOG=hemlock_di=trace cargo run --example request_scope` to
//! see resolution events.

use hemlock_di::{
    capability, extras, Cap, Container, ContainerConfig, DiResult, FactoryArgs,
    FactoryError, Resolver, ServiceModule,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ===== Application =====

#[derive(Debug)]
struct App {
    name: String,
}

#[derive(Debug)]
struct Request {
    method: &'static str,
    path: String,
}

#[derive(Debug, Default)]
struct Response {
    status: Mutex<u16>,
    headers: Mutex<Vec<(String, String)>>,
}

impl Response {
    fn set_status(&self, status: u16) {
        if let Ok(mut current) = self.status.lock() {
            *current = status;
        }
    }

    fn header(&self, name: &str, value: &str) {
        if let Ok(mut headers) = self.headers.lock() {
            headers.push((name.to_string(), value.to_string()));
        }
    }

    fn status(&self) -> u16 {
        self.status.lock().map(|s| *s).unwrap_or(500)
    }
}

// ===== Services =====

trait Renderer: Send + Sync {
    fn render(&self, template: &str, data: &str) -> String;
}

trait HtmlRenderer: Send + Sync {
    fn render(&self, template: &str, data: &str) -> String;
    fn escape(&self, raw: &str) -> String;
}

capability!(dyn Renderer => [render]);
capability!(dyn HtmlRenderer => [render, escape]);

struct PlainRenderer {
    app: String,
}

impl Renderer for PlainRenderer {
    fn render(&self, template: &str, data: &str) -> String {
        format!("[{}] {}: {}", self.app, template, data)
    }
}

struct HtmlTemplates;

impl Renderer for HtmlTemplates {
    fn render(&self, template: &str, data: &str) -> String {
        format!("<{}>{}</{}>", template, self.escape(data), template)
    }
}

impl HtmlRenderer for HtmlTemplates {
    fn render(&self, template: &str, data: &str) -> String {
        Renderer::render(self, template, data)
    }

    fn escape(&self, raw: &str) -> String {
        raw.replace('<', "&lt;").replace('>', "&gt;")
    }
}

struct PostRepository {
    posts: HashMap<String, String>,
}

impl PostRepository {
    fn find(&self, id: &str) -> Option<&String> {
        self.posts.get(id)
    }
}

// ===== Providers =====

struct ViewModule;

impl ServiceModule for ViewModule {
    fn register(&self, container: &mut Container) -> DiResult<()> {
        container
            .try_singleton(|app: Arc<App>| {
                Ok::<_, FactoryError>(PlainRenderer {
                    app: app.name.clone(),
                })
            })?
            .instance(HtmlTemplates)
            .implements::<PlainRenderer, dyn Renderer, _>(|r| r)
            .implements::<HtmlTemplates, dyn Renderer, _>(|r| r)
            .implements::<HtmlTemplates, dyn HtmlRenderer, _>(|r| r);
        Ok(())
    }
}

struct DatabaseModule;

impl ServiceModule for DatabaseModule {
    fn register(&self, container: &mut Container) -> DiResult<()> {
        container.try_singleton(|_: Arc<App>| {
            let mut posts = HashMap::new();
            posts.insert("42".to_string(), "The answer".to_string());
            posts.insert("7".to_string(), "Lucky <number>".to_string());
            Ok::<_, FactoryError>(PostRepository { posts })
        })?;
        Ok(())
    }

    fn boot(&self, container: &Container) -> DiResult<()> {
        let repository = container.make::<PostRepository>()?;
        tracing::info!(posts = repository.posts.len(), "post repository ready");
        Ok(())
    }
}

// ===== Routing =====

/// Handles one request against a fresh scope cloned from the root.
fn dispatch<H, P>(
    root: &Container,
    app: &Arc<App>,
    request: Request,
    handler: H,
    params: Vec<String>,
) -> DiResult<(u16, String)>
where
    H: hemlock_di::Handler<P, Output = String>,
{
    let mut scope = root.clone_scope(FactoryArgs::new().with(app.clone()));
    let response = Arc::new(Response::default());
    scope.instance(request).instance_arc(response.clone());

    let extras = params.into_iter().map(hemlock_di::extra).collect();
    let body = scope.call(handler, extras)?;
    Ok((response.status(), body))
}

fn show_post(
    request: Arc<Request>,
    response: Arc<Response>,
    posts: Arc<PostRepository>,
    renderer: Cap<dyn Renderer>,
    id: String,
) -> String {
    response.header("Content-Type", "text/html");
    match posts.find(&id) {
        Some(title) => {
            response.set_status(200);
            renderer.render("h1", title)
        }
        None => {
            response.set_status(404);
            renderer.render("p", &format!("{} {} not found", request.method, request.path))
        }
    }
}

fn main() -> DiResult<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let app = Arc::new(App {
        name: "hemlock-blog".to_string(),
    });

    let config = ContainerConfig::from_env()?;
    let mut root = Container::with_config(FactoryArgs::new().with(app.clone()), config);
    root.install(&[&ViewModule, &DatabaseModule])?;

    println!("Registered services:");
    for descriptor in root.descriptors() {
        println!("  {}", descriptor);
    }

    for id in ["42", "7", "99"] {
        let request = Request {
            method: "GET",
            path: format!("/posts/{}", id),
        };
        let (status, body) = dispatch(&root, &app, request, show_post, vec![id.to_string()])?;
        println!("GET /posts/{} -> {} {}", id, status, body);
    }

    // The narrowest renderer wins a capability request; ask for the wider one explicitly
    let html = root.make_capability::<dyn HtmlRenderer>()?;
    println!("escaped: {}", html.escape("<b>"));

    // Handlers may also take fixed extras built with the macro
    root.instance_arc(app.clone());
    let greeting = root.call(
        |app: Arc<App>, who: &'static str| format!("{} greets {}", app.name, who),
        extras!["visitor"],
    )?;
    println!("{}", greeting);

    Ok(())
}
