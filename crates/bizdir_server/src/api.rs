//! HTTP routes for the directory browser.

use crate::render::{self, ResultsPanel};
use crate::session::{SessionStore, expired_cookie, session_cookie};
use crate::{BootstrapOutcome, DirectoryConfig, ensure_database};
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bizdir_core::{DisplayTable, FilterSet};
use bizdir_database::{Directory, create_pool};
use bizdir_error::{BizdirError, BizdirResult, QueryError, QueryErrorKind, ServerError, ServerErrorKind};
use indicatif::ProgressBar;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<DirectoryConfig>,
    sessions: Arc<SessionStore>,
    directory: Arc<OnceCell<Arc<Directory>>>,
}

impl AppState {
    /// State that opens the directory on first use, downloading it if needed.
    pub fn new(config: DirectoryConfig) -> Self {
        let sessions = SessionStore::new(*config.session_idle(), *config.default_page_size());
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            directory: Arc::new(OnceCell::new()),
        }
    }

    /// State over an already opened directory.
    pub fn with_directory(config: DirectoryConfig, directory: Directory) -> Self {
        let state = Self::new(config);
        Self {
            directory: Arc::new(OnceCell::new_with(Some(Arc::new(directory)))),
            ..state
        }
    }

    /// Server configuration.
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// The opened directory.
    ///
    /// A failed open is not cached, so the next request tries again once.
    pub async fn directory(&self) -> BizdirResult<Arc<Directory>> {
        self.directory
            .get_or_try_init(|| open_directory(Arc::clone(&self.config)))
            .await
            .cloned()
    }
}

#[instrument(skip(config), fields(path = %config.db_path().display()))]
async fn open_directory(config: Arc<DirectoryConfig>) -> BizdirResult<Arc<Directory>> {
    let outcome = ensure_database(
        config.db_path(),
        config.db_url().as_deref(),
        *config.download_timeout(),
        &ProgressBar::hidden(),
    )
    .await?;
    if let BootstrapOutcome::Downloaded { bytes } = outcome {
        info!(bytes, "Database bootstrapped");
    }

    let directory = blocking(move || {
        let pool = create_pool(config.db_path(), *config.pool_size())?;
        Directory::open(pool)
    })
    .await?;
    Ok(Arc::new(directory))
}

/// Runs blocking database work off the async executor.
async fn blocking<T, E, F>(work: F) -> Result<T, BizdirError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<BizdirError> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(Into::into),
        Err(e) => Err(QueryError::new(QueryErrorKind::Worker(e.to_string())).into()),
    }
}

/// Creates the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(index))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/search", get(search))
        .route("/page/next", post(next_page))
        .route("/page/prev", post(prev_page))
        .route("/export/page.csv", get(export_page))
        .route("/export/all.csv", get(export_all))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until the process is stopped.
///
/// # Errors
///
/// Returns a [`ServerError`] if the socket cannot be bound or the server
/// loop fails.
pub async fn serve(config: DirectoryConfig) -> Result<(), ServerError> {
    let addr = *config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Bind(format!("{}: {}", addr, e))))?;
    info!(%addr, "Listening");

    let app = create_router(AppState::new(config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

fn with_cookie(mut response: Response, cookie: String) -> Response {
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

fn see_other() -> Response {
    Redirect::to("/").into_response()
}

fn fatal(err: &BizdirError) -> Response {
    error!(error = %err, "Directory unavailable");
    (StatusCode::INTERNAL_SERVER_ERROR, Html(render::error_page(&err.to_string()))).into_response()
}

/// Health check endpoint.
#[instrument(skip_all)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Login form, or the directory once the gate is passed.
#[instrument(skip_all)]
async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut handle = state.sessions.resolve(&headers);
    if !handle.session.authenticated {
        return Html(render::login_page(false)).into_response();
    }

    let directory = match state.directory().await {
        Ok(directory) => directory,
        Err(e) => return fatal(&e),
    };

    let filters = handle.session.filters.clone();
    let mut page = handle.session.page;
    let lookup = Arc::clone(&directory);
    let result = blocking(move || {
        let result = lookup.page(&filters, &mut page)?;
        Ok::<_, QueryError>((result, page))
    })
    .await;

    let panel = match result {
        Ok((result, page)) => {
            handle.session.page = page;
            state.sessions.save(&handle);
            let table = DisplayTable::new(directory.schema(), &result.records);
            ResultsPanel::Page {
                page: result,
                table,
            }
        }
        Err(e) => {
            warn!(error = %e, "Query failed");
            ResultsPanel::Failed(e.to_string())
        }
    };

    let html = render::directory_page(
        directory.options(),
        &handle.session.filters,
        handle.session.page.page_size(),
        &panel,
    );
    Html(html).into_response()
}

#[derive(Deserialize)]
struct LoginForm {
    password: String,
}

#[instrument(skip_all)]
async fn login(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<LoginForm>) -> Response {
    let mut handle = state.sessions.resolve(&headers);
    let ok = state.config.gate().verify(&form.password);
    drop(form);

    if ok {
        handle.session.authenticated = true;
        let handle = state.sessions.renew(handle);
        info!(session_id = %handle.id, "Login succeeded");
        with_cookie(see_other(), session_cookie(&handle.id))
    } else {
        if !handle.is_new {
            state.sessions.remove(&handle.id);
        }
        warn!("Wrong password");
        (StatusCode::UNAUTHORIZED, Html(render::login_page(true))).into_response()
    }
}

#[instrument(skip_all)]
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = crate::session::session_id(&headers) {
        state.sessions.remove(&id);
    }
    with_cookie(Redirect::to("/").into_response(), expired_cookie())
}

/// Query string of the filter form.
#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    keyword: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    page_size: Option<String>,
}

impl SearchParams {
    fn filters(self) -> FilterSet {
        FilterSet::default()
            .with_keyword(self.keyword.unwrap_or_default())
            .with_city(self.city.unwrap_or_default())
            .with_state(self.state.unwrap_or_default())
            .with_zip_prefix(self.zip.unwrap_or_default())
    }
}

#[instrument(skip_all)]
async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let mut handle = state.sessions.resolve(&headers);
    if !handle.session.authenticated {
        return see_other();
    }

    if let Some(size) = params
        .page_size
        .as_deref()
        .and_then(|s| s.trim().parse::<u32>().ok())
    {
        handle.session.page.set_page_size(size);
    }
    handle.session.filters = params.filters();
    state.sessions.save(&handle);
    see_other()
}

#[instrument(skip_all)]
async fn next_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut handle = state.sessions.resolve(&headers);
    if !handle.session.authenticated {
        return see_other();
    }
    let directory = match state.directory().await {
        Ok(directory) => directory,
        Err(e) => return fatal(&e),
    };

    let filters = handle.session.filters.clone();
    let mut page = handle.session.page;
    match blocking(move || directory.next_page(&filters, &mut page).map(|_| page)).await {
        Ok(page) => {
            handle.session.page = page;
            state.sessions.save(&handle);
        }
        Err(e) => warn!(error = %e, "Could not advance page"),
    }
    see_other()
}

#[instrument(skip_all)]
async fn prev_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut handle = state.sessions.resolve(&headers);
    if handle.session.authenticated {
        handle.session.page.prev();
        state.sessions.save(&handle);
    }
    see_other()
}

fn csv_response(filename: &str, body: String) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

fn export_failed(err: &BizdirError) -> Response {
    warn!(error = %err, "Export failed");
    let status = if err.is_fatal() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, format!("Export failed: {}", err)).into_response()
}

#[instrument(skip_all)]
async fn export_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut handle = state.sessions.resolve(&headers);
    if !handle.session.authenticated {
        return see_other();
    }
    let directory = match state.directory().await {
        Ok(directory) => directory,
        Err(e) => return export_failed(&e),
    };

    let filters = handle.session.filters.clone();
    let mut page = handle.session.page;
    let result = blocking(move || {
        let result = directory.page(&filters, &mut page)?;
        let table = DisplayTable::new(directory.schema(), &result.records);
        Ok::<_, QueryError>((bizdir_database::page_csv(&table), page))
    })
    .await;

    match result {
        Ok((csv, page)) => {
            handle.session.page = page;
            state.sessions.save(&handle);
            let filename = bizdir_database::page_export_filename(page.page());
            info!(filename = %filename, "Page exported");
            csv_response(&filename, csv)
        }
        Err(e) => export_failed(&e),
    }
}

#[instrument(skip_all)]
async fn export_all(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = state.sessions.resolve(&headers);
    if !handle.session.authenticated {
        return see_other();
    }
    let directory = match state.directory().await {
        Ok(directory) => directory,
        Err(e) => return export_failed(&e),
    };

    let filters = handle.session.filters.clone();
    let result = blocking(move || {
        let records = directory.export_all(&filters)?;
        Ok::<_, QueryError>((bizdir_database::records_csv(directory.schema(), &records), records.len()))
    })
    .await;

    match result {
        Ok((csv, row_count)) => {
            info!(row_count, "Full export");
            csv_response(bizdir_database::FULL_EXPORT_FILENAME, csv)
        }
        Err(e) => export_failed(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_keep_raw_values() {
        let params = SearchParams {
            keyword: Some("cafe".into()),
            city: Some("(any)".into()),
            state: None,
            zip: Some(" 941 ".into()),
            page_size: None,
        };
        let filters = params.filters();
        assert_eq!(filters.keyword_value(), Some("cafe"));
        assert_eq!(filters.city_value(), None);
        assert_eq!(filters.state_value(), None);
        assert_eq!(filters.zip_prefix_value(), Some("941"));
    }
}
