//! # Web Interface
//!
//! A small server-rendered UI over the same command layer the CLI uses.
//!
//! One [`State`] is shared behind an `RwLock`. Page handlers take the read
//! lock; mutations take the write lock, run the command (which writes the
//! affected file) and release it before redirecting to the print page.
//! A [`watcher`] task reloads the whole `State` when files under the root
//! change, so edits made by hand or through the CLI show up without a
//! restart.
//!
//! Mesh files under the root are served read-only at `/files/`.

pub mod error;
pub mod form;
pub mod handlers;
pub mod routes;
pub mod templates;
pub mod views;
pub mod watcher;

use crate::config::DisplayConfig;
use crate::error::{PrintedError, Result};
use crate::state::State;
use axum::http::HeaderMap;
use axum::response::{Html, Redirect};
use minijinja::Environment;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

pub use error::WebError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

const HX_TARGET: &str = "HX-Target";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix the app is mounted under behind a proxy, e.g. `/printed`.
    pub root_path: String,
    pub display: DisplayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            root_path: String::new(),
            display: DisplayConfig::default(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub state: Arc<RwLock<State>>,
    pub templates: Arc<Environment<'static>>,
    pub root: PathBuf,
    pub root_path: String,
}

impl AppState {
    pub fn new(state: State, display: &DisplayConfig, root_path: &str) -> Result<Self> {
        let templates = templates::environment(display)
            .map_err(|e| PrintedError::Server(format!("template setup failed: {}", e)))?;
        Ok(Self {
            root: state.root().to_path_buf(),
            state: Arc::new(RwLock::new(state)),
            templates: Arc::new(templates),
            root_path: root_path.trim_end_matches('/').to_string(),
        })
    }

    pub fn read(&self) -> std::result::Result<RwLockReadGuard<'_, State>, WebError> {
        self.state.read().map_err(|_| WebError::Poisoned)
    }

    pub fn write(&self) -> std::result::Result<RwLockWriteGuard<'_, State>, WebError> {
        self.state.write().map_err(|_| WebError::Poisoned)
    }

    pub fn render<T: Serialize>(
        &self,
        page: &str,
        headers: &HeaderMap,
        context: &T,
    ) -> std::result::Result<Html<String>, WebError> {
        let target = headers.get(HX_TARGET).and_then(|v| v.to_str().ok());
        let name = templates::template_name(&self.templates, page, target);
        let template = self.templates.get_template(&name)?;
        Ok(Html(template.render(context)?))
    }

    pub fn redirect_to_print(&self, name: &str) -> Redirect {
        Redirect::to(&format!(
            "{}/print/{}",
            self.root_path,
            urlencoding::encode(name)
        ))
    }
}

/// Serves the UI until ctrl-c.
pub async fn serve(root: PathBuf, config: ServerConfig) -> Result<()> {
    let state = State::collect_all(&root)?;
    let app = AppState::new(state, &config.display, &config.root_path)?;
    let _watcher = watcher::spawn(root.clone(), Arc::clone(&app.state))
        .map_err(|e| PrintedError::Server(format!("could not watch {}: {}", root.display(), e)))?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| PrintedError::InvalidInput(format!("invalid listen address: {}", e)))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, root = %root.display(), root_path = %config.root_path, "serving");

    axum::serve(listener, routes::router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("could not listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
