use crate::errors::CalcError;
use crate::server::{session_cookie, session_id};
use crate::session::form::SubmissionForm;
use crate::session::store::SessionAccess;
use crate::session::{SessionView, SubmissionOutcome};
use crate::state::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use portable_atomic::Ordering::Relaxed;
use std::sync::Arc;

fn view_response(state: &AppState, access: SessionAccess<SessionView>) -> Response {
    if access.created {
        state.counters.sessions_created.fetch_add(1, Relaxed);
        tracing::info!(session = %access.id, "session created");
    }
    if let Some(old) = access.evicted {
        state.counters.sessions_evicted.fetch_add(1, Relaxed);
        tracing::warn!(session = %old, "session store full, evicted stalest session");
    }

    let mut headers = HeaderMap::new();
    if access.created {
        if let Some(cookie) = session_cookie(&state.config.session_cookie, access.id) {
            headers.insert(header::SET_COOKIE, cookie);
        }
    }
    (headers, Json(access.value)).into_response()
}

fn store_error(e: CalcError) -> Response {
    tracing::error!(error = %e, "session store unavailable");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
        .into_response()
}

/// GET /api/session -- current form values, log and chart. Never creates a session.
pub async fn get_session(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let existing = match session_id(&headers, &state.config.session_cookie) {
        Some(id) => match state.sessions.peek(id, |s| s.view(None)) {
            Ok(view) => view,
            Err(e) => return store_error(e),
        },
        None => None,
    };
    let view = existing.unwrap_or_else(|| state.sessions.blank().view(None));
    Json(view).into_response()
}

/// POST /api/calculate -- run one submission and record it on success.
/// Any failure, including an unreadable body, is reported as a generic input error.
pub async fn post_calculate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<SubmissionForm>, FormRejection>,
) -> Response {
    state.counters.submissions.fetch_add(1, Relaxed);
    let id = session_id(&headers, &state.config.session_cookie);

    let result = state.sessions.with_session(id, |session| {
        let outcome = match &form {
            Ok(Form(form)) => session.submit(form),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "form rejected");
                SubmissionOutcome::InputError
            }
        };
        (outcome, session.view(Some(&outcome)))
    });

    let access = match result {
        Ok(access) => access,
        Err(e) => return store_error(e),
    };

    let (outcome, view) = access.value;
    match outcome {
        SubmissionOutcome::Recorded(entry) => {
            state.counters.entries_recorded.fetch_add(1, Relaxed);
            tracing::info!(
                session = %access.id,
                kpi_criteria = entry.kpi_criteria,
                asb_yield = entry.asb_yield,
                price = entry.price,
                log_len = view.log.len(),
                "entry recorded"
            );
        }
        SubmissionOutcome::InputError => {
            state.counters.input_errors.fetch_add(1, Relaxed);
        }
    }

    view_response(
        &state,
        SessionAccess {
            id: access.id,
            created: access.created,
            evicted: access.evicted,
            value: view,
        },
    )
}

/// POST /api/reset -- drop the log and distribution, keep price bounds.
pub async fn post_reset(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    state.counters.resets.fetch_add(1, Relaxed);
    let id = session_id(&headers, &state.config.session_cookie);

    match state.sessions.with_session(id, |session| {
        session.reset();
        session.view(None)
    }) {
        Ok(access) => {
            tracing::info!(session = %access.id, "session reset");
            view_response(&state, access)
        }
        Err(e) => store_error(e),
    }
}

/// GET /api/counters -- request counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Response {
    let active_sessions = match state.sessions.len() {
        Ok(n) => n,
        Err(e) => return store_error(e),
    };
    Json(serde_json::json!({
        "submissions": state.counters.submissions.load(Relaxed),
        "entries_recorded": state.counters.entries_recorded.load(Relaxed),
        "input_errors": state.counters.input_errors.load(Relaxed),
        "resets": state.counters.resets.load(Relaxed),
        "sessions_created": state.counters.sessions_created.load(Relaxed),
        "sessions_evicted": state.counters.sessions_evicted.load(Relaxed),
        "active_sessions": active_sessions,
    }))
    .into_response()
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::server::router;
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(AppConfig::default()))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, serde_json::Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, cookie, serde_json::from_slice(&body).unwrap())
    }

    fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_calculate_records_and_sets_cookie() {
        let app = app();
        let (status, cookie, body) = send(
            &app,
            post_form(
                "/api/calculate",
                None,
                "ac_performance=95&std_dev=5&price_max=&price_min=&kpi_criteria=900",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(cookie.unwrap().starts_with("asb_session="));
        assert_eq!(body["asb_yield"], 0.841345);
        assert_eq!(body["price"], 205.0);
        assert_eq!(body["log"].as_array().unwrap().len(), 1);
        assert_eq!(body["chart"]["x"], serde_json::json!([900.0]));
    }

    #[tokio::test]
    async fn test_session_follows_cookie_and_chart_sorts() {
        let app = app();
        let (_, cookie, _) = send(
            &app,
            post_form(
                "/api/calculate",
                None,
                "ac_performance=95&std_dev=5&price_max=&price_min=&kpi_criteria=1000",
            ),
        )
        .await;
        let cookie = cookie.unwrap();

        for kpi in ["600", "800"] {
            let (_, again, _) = send(
                &app,
                post_form(
                    "/api/calculate",
                    Some(&cookie),
                    &format!("ac_performance=&std_dev=&price_max=&price_min=&kpi_criteria={kpi}"),
                ),
            )
            .await;
            assert!(again.is_none(), "known session should not get a new cookie");
        }

        let (_, _, body) = send(&app, get("/api/session", Some(&cookie))).await;
        let raw: Vec<f64> = body["log"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["kpi_criteria"].as_f64().unwrap())
            .collect();
        assert_eq!(raw, vec![1000.0, 600.0, 800.0]);
        assert_eq!(body["chart"]["x"], serde_json::json!([600.0, 800.0, 1000.0]));
        assert_eq!(body["ac_performance"], 95.0);
    }

    #[tokio::test]
    async fn test_missing_form_key_is_input_error() {
        let app = app();
        let (_, cookie, _) = send(
            &app,
            post_form(
                "/api/calculate",
                None,
                "ac_performance=95&std_dev=5&price_max=&price_min=&kpi_criteria=900",
            ),
        )
        .await;
        let cookie = cookie.unwrap();

        let (status, _, body) =
            send(&app, post_form("/api/calculate", Some(&cookie), "kpi_criteria=600")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["asb_yield"], "입력 오류");
        assert_eq!(body["price"], "입력 오류");
        assert_eq!(body["log"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_input_marks_both_fields_and_records_nothing() {
        let app = app();
        let (status, _, body) = send(
            &app,
            post_form("/api/calculate", None, "ac_performance=95&std_dev=0&price_max=&price_min=&kpi_criteria=900"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["asb_yield"], "입력 오류");
        assert_eq!(body["price"], "입력 오류");
        assert!(body["log"].as_array().unwrap().is_empty());
        assert!(body["chart"].is_null());
    }

    #[tokio::test]
    async fn test_wrong_content_type_is_input_error() {
        let app = app();
        let req = Request::builder()
            .method("POST")
            .uri("/api/calculate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, _, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["asb_yield"], "입력 오류");
    }

    #[tokio::test]
    async fn test_reset_keeps_bounds() {
        let app = app();
        let (_, cookie, _) = send(
            &app,
            post_form(
                "/api/calculate",
                None,
                "ac_performance=95&std_dev=5&price_max=300&price_min=100&kpi_criteria=900",
            ),
        )
        .await;
        let cookie = cookie.unwrap();

        let (status, _, body) = send(&app, post_form("/api/reset", Some(&cookie), "")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["log"].as_array().unwrap().is_empty());
        assert!(body["ac_performance"].is_null());
        assert!(body["std_dev"].is_null());
        assert_eq!(body["price_max"], 300.0);
        assert_eq!(body["price_min"], 100.0);
    }

    #[tokio::test]
    async fn test_get_session_without_cookie_is_blank() {
        let app = app();
        let (status, cookie, body) = send(&app, get("/api/session", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(cookie.is_none());
        assert_eq!(body["price_max"], 220.0);
        assert!(body["asb_yield"].is_null());
    }

    #[tokio::test]
    async fn test_counters_track_outcomes() {
        let app = app();
        send(
            &app,
            post_form(
                "/api/calculate",
                None,
                "ac_performance=95&std_dev=5&price_max=&price_min=&kpi_criteria=900",
            ),
        )
        .await;
        send(&app, post_form("/api/calculate", None, "kpi_criteria=abc")).await;

        let (_, _, body) = send(&app, get("/api/counters", None)).await;
        assert_eq!(body["submissions"], 2);
        assert_eq!(body["entries_recorded"], 1);
        assert_eq!(body["input_errors"], 1);
        assert_eq!(body["sessions_created"], 2);
        assert_eq!(body["active_sessions"], 2);
    }

    #[tokio::test]
    async fn test_calculate_is_post_only() {
        let app = app();
        let response = app.oneshot(get("/api/calculate", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
