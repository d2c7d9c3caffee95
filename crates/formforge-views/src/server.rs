//! The application builder: routes, engine, and settings combined into a
//! runnable axum server.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use formforge_core::Settings;
//! use formforge_views::server::App;
//! use formforge_views::views::{RedirectView, View};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = App::new(Settings::default())
//!     .route("/", Arc::new(RedirectView::new("/contact/")));
//! // app.run("0.0.0.0:8000").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{RawPathParams, Request};
use axum::response::IntoResponse;
use axum::routing::any;
use tracing::Instrument;

use formforge_core::logging::request_span;
use formforge_core::{ForgeError, ForgeResult, Settings};
use formforge_http::HttpRequest;
use formforge_template::Engine;

use crate::views::View;

/// Routes, settings, and the shared template engine.
///
/// Paths use axum's syntax, so `/pages/{pk}/` captures `pk` as a URL
/// parameter the view reads from `request.params()`.
pub struct App {
    settings: Settings,
    engine: Option<Arc<Engine>>,
    routes: Vec<(String, Arc<dyn View>)>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            engine: None,
            routes: Vec::new(),
        }
    }

    /// Share a template engine with the application.
    #[must_use]
    pub fn engine(mut self, engine: Arc<Engine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Mount a view at a path.
    #[must_use]
    pub fn route(mut self, path: &str, view: Arc<dyn View>) -> Self {
        self.routes.push((path.to_string(), view));
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn template_engine(&self) -> Option<&Arc<Engine>> {
        self.engine.as_ref()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Convert the application into an axum router.
    ///
    /// Every mounted path accepts any HTTP method; method filtering is the
    /// view's job via its `dispatch`.
    pub fn into_axum_router(self) -> axum::Router {
        let mut router = axum::Router::new();
        for (path, view) in self.routes {
            let handler = move |params: RawPathParams, req: Request<Body>| {
                let view = view.clone();
                async move {
                    let (parts, body) = req.into_parts();
                    let body_bytes = axum::body::to_bytes(body, usize::MAX)
                        .await
                        .unwrap_or_default()
                        .to_vec();

                    let mut request = HttpRequest::from_axum(parts, body_bytes);
                    for (name, value) in &params {
                        request
                            .params_mut()
                            .insert(name.to_string(), value.to_string());
                    }

                    let span = request_span(request.method().as_str(), request.path());
                    async move {
                        let response = view.dispatch(request).await;
                        tracing::info!(status = response.status().as_u16(), "request handled");
                        response
                    }
                    .instrument(span)
                    .await
                    .into_response()
                }
            };
            router = router.route(&path, any(handler));
        }
        router
    }

    /// Run the application as an HTTP server.
    ///
    /// # Errors
    ///
    /// Fails when the address cannot be bound or the server stops with an
    /// I/O error.
    pub async fn run(self, addr: &str) -> ForgeResult<()> {
        let debug = self.settings.debug;
        let router = self.into_axum_router();
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            ForgeError::ImproperlyConfigured(format!("failed to bind to {addr}: {e}"))
        })?;

        if debug {
            tracing::info!("starting development server at http://{addr}/");
        }

        axum::serve(listener, router).await?;
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.routes.len())
            .field("has_engine", &self.engine.is_some())
            .field("debug", &self.settings.debug)
            .finish()
    }
}
