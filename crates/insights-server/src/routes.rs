//! Route handlers.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | [`index`] |
//! | `POST /upload` | [`upload`] |
//! | `POST /clear` | [`clear`] |
//! | `GET /api/pages/{slug}` | [`page_json`] |
//! | `GET /api/dataset` | [`dataset_json`] |
//! | `GET /healthz` | [`healthz`] |
//!
//! Polars work (loading, aggregation, drawing) runs on the blocking pool.
//! The JSON routes only read existing sessions; they never start one.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use order_insights::{
    DatasetInfo, DocumentContext, InsightsError, LoadedDataset, Page, PageView, ParseError, load_csv_bytes,
    render_document, render_page,
};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::{AppState, SessionSnapshot};

pub const SESSION_COOKIE: &str = "insights_session";

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    fn page(&self) -> Result<Page, InsightsError> {
        match self.page.as_deref() {
            None | Some("") => Ok(Page::default()),
            Some(raw) => raw.parse(),
        }
    }

    /// Where to send the browser after a form post. Unknown pages fall back
    /// to the welcome page.
    fn redirect_target(&self) -> String {
        format!("/?page={}", self.page().unwrap_or_default().slug())
    }
}

/// Session id from the `Cookie` header, if present and well formed.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .find_map(|id| Uuid::parse_str(id.trim()).ok())
}

/// Attach `Set-Cookie` when the session was just created.
fn with_session_cookie(mut response: Response, session: &SessionSnapshot) -> Response {
    if session.is_new {
        let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", session.id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}

// ============================================================================
// HTML
// ============================================================================

pub async fn index(
    State(app): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> ApiResult<Response> {
    let page = query.page()?;
    let session = app.sessions.checkout(session_id(&headers));
    debug!("GET / page={} session={}", page.slug(), session.id);

    let config = app.config.clone();
    let snapshot = session.clone();
    let html = tokio::task::spawn_blocking(move || {
        let view = render_page(page, &snapshot.dataset, &config.dashboard);
        let ctx = DocumentContext {
            dataset: snapshot.dataset.dataset().map(|d| &d.info),
            upload_error: snapshot.upload_error.as_deref(),
            interactive: true,
        };
        render_document(&view, &ctx, &config.dashboard)
    })
    .await??;

    Ok(with_session_cookie(Html(html).into_response(), &session))
}

pub async fn upload(
    State(app): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let session = app.sessions.checkout(session_id(&headers));
    let limit = app.config.dashboard.max_upload_bytes;

    let mut received: Option<(String, Result<Vec<u8>, String>)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                received = Some(("upload".to_string(), Err(multipart_message(e.status(), &e.body_text(), limit))));
                break;
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let name = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| multipart_message(e.status(), &e.body_text(), limit));
        received = Some((name, bytes));
        break;
    }

    let outcome: Result<(String, LoadedDataset), String> = match received {
        None => Err(format!("Failed to load upload: {}", ParseError::Empty)),
        Some((name, Err(message))) => Err(format!("Failed to load {name}: {message}")),
        Some((name, Ok(bytes))) => {
            let config = app.config.dashboard.clone();
            let file_name = name.clone();
            let loaded =
                tokio::task::spawn_blocking(move || load_csv_bytes(&file_name, &bytes, &config)).await?;
            match loaded {
                Ok(dataset) => Ok((name, dataset)),
                Err(e) => Err(format!("Failed to load {name}: {e}")),
            }
        }
    };

    match outcome {
        Ok((name, dataset)) => {
            info!("Session {} loaded '{}' ({} rows)", session.id, name, dataset.info.row_count);
            app.sessions.set_dataset(session.id, dataset);
        }
        Err(message) => {
            warn!("Session {}: {}", session.id, message);
            app.sessions.set_upload_error(session.id, message);
        }
    }

    let redirect = Redirect::to(&query.redirect_target()).into_response();
    Ok(with_session_cookie(redirect, &session))
}

fn multipart_message(status: axum::http::StatusCode, body: &str, limit: usize) -> String {
    if status == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        format!("Upload exceeds the {limit} byte limit")
    } else {
        body.to_string()
    }
}

pub async fn clear(
    State(app): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    let session = app.sessions.checkout(session_id(&headers));
    app.sessions.clear(session.id);
    debug!("Session {} cleared its dataset", session.id);

    with_session_cookie(Redirect::to(&query.redirect_target()).into_response(), &session)
}

// ============================================================================
// JSON API
// ============================================================================

pub async fn page_json(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult<Json<PageView>> {
    let page: Page = slug.parse()?;
    let dataset = app
        .sessions
        .get(session_id(&headers))
        .map(|session| session.dataset)
        .unwrap_or_default();

    let config = app.config.clone();
    let view = tokio::task::spawn_blocking(move || render_page(page, &dataset, &config.dashboard)).await?;

    Ok(Json(view))
}

pub async fn dataset_json(State(app): State<AppState>, headers: HeaderMap) -> ApiResult<Json<DatasetInfo>> {
    let info = app
        .sessions
        .get(session_id(&headers))
        .and_then(|session| session.dataset.dataset().map(|d| d.info.clone()))
        .ok_or(InsightsError::NoDataLoaded)?;

    Ok(Json(info))
}

pub async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_from_cookie_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={id}; other=1")).unwrap(),
        );
        assert_eq!(session_id(&headers), Some(id));
    }

    #[test]
    fn test_session_id_ignores_malformed_values() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("insights_session=not-a-uuid"));
        assert_eq!(session_id(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("insights_session_old=abc"));
        assert_eq!(session_id(&headers), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn test_page_query() {
        let query = PageQuery {
            page: Some("factors-and-causes".into()),
        };
        assert_eq!(query.page().unwrap(), Page::FactorsAndCauses);
        assert_eq!(query.redirect_target(), "/?page=factors-and-causes");

        let unknown = PageQuery {
            page: Some("nope".into()),
        };
        assert!(unknown.page().is_err());
        assert_eq!(unknown.redirect_target(), "/?page=welcome");
        assert_eq!(PageQuery::default().page().unwrap(), Page::Welcome);
    }
}
