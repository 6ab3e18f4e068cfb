use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response, Sse},
    routing::{get, post},
    Json, Router,
};
use futures_util::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    achievements::ACHIEVEMENTS,
    config::Config,
    rate_limiter::{rate_limit_middleware, RateLimiter},
    shop::PRODUCTS,
    state::AppState,
};

#[derive(Clone)]
pub struct AppContext {
    pub state: AppState,
    pub config: Config,
    pub rate_limiter: RateLimiter,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct ApiResponse {
    success: bool,
    message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,

    #[schema(example = 200)]
    code: u32,
}

impl ApiResponse {
    pub fn success(message: String, data: Value) -> Self {
        Self {
            success: true,
            message,
            data: { if data.is_null() { None } else { Some(data) } },
            code: 200,
        }
    }

    pub fn failure(message: impl Into<String>, code: u32) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            code,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct SessionRequest {
    session_id: Option<String>,
    uid: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    display_name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ActionRequest {
    session_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LikeRequest {
    session_id: String,
    recipient_uid: String,
}

#[derive(Deserialize, ToSchema)]
pub struct PurchaseRequest {
    session_id: String,
    product_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct MissionRequest {
    session_id: String,
    mission_id: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create_or_validate_session,
        register_member,
        get_member,
        member_progress,
        record_post,
        record_comment,
        record_message,
        record_like,
        record_referral,
        daily_check_in,
        list_products,
        purchase_product,
        todays_missions,
        complete_mission,
        list_achievements,
        leaderboard_standings,
        health_check,
    ),
    components(schemas(
        ApiResponse,
        SessionRequest,
        RegisterRequest,
        ActionRequest,
        LikeRequest,
        PurchaseRequest,
        MissionRequest,
    )),
    tags((name = "Clubhouse", description = "Membership club progression API"))
)]
struct ApiDoc;

pub fn create_api_router(context: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            context
                .config
                .server
                .cors_origins
                .iter()
                .map(|origin| origin.parse().unwrap())
                .collect::<Vec<_>>(),
        )
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::HeaderName::from_static("x-session-id"),
            axum::http::header::CACHE_CONTROL,
        ])
        .allow_credentials(true);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/sessions", post(create_or_validate_session))
        .route("/members", post(register_member))
        .route("/members/{uid}", get(get_member))
        .route("/members/{uid}/progress", get(member_progress))
        .route("/events", get(sse_handler))
        .route("/activity/post", post(record_post))
        .route("/activity/comment", post(record_comment))
        .route("/activity/message", post(record_message))
        .route("/activity/like", post(record_like))
        .route("/activity/referral", post(record_referral))
        .route("/checkin", post(daily_check_in))
        .route("/shop/products", get(list_products))
        .route("/shop/purchase", post(purchase_product))
        .route("/missions/today", get(todays_missions))
        .route("/missions/complete", post(complete_mission))
        .route("/achievements", get(list_achievements))
        .route("/leaderboard", get(leaderboard_standings))
        .route("/health", get(health_check))
        .layer(axum::middleware::from_fn(rate_limit_middleware))
        .layer(axum::Extension(context.rate_limiter.clone()))
        .layer(cors)
        .with_state(context)
}

fn ok(message: &str, data: Value) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse::success(message.to_string(), data)),
    )
        .into_response()
}

fn fail(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiResponse::failure(message, status.as_u16() as u32)),
    )
        .into_response()
}

async fn resolve_member(context: &AppContext, session_id: &str) -> Result<String, Response> {
    context
        .state
        .sessions
        .resolve_uid(session_id)
        .await
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid or expired session"))
}

fn outcome_json(outcome: &crate::state::ActionOutcome) -> Value {
    json!({
        "profile": outcome.profile,
        "unlocked": outcome.unlocked,
    })
}

#[utoipa::path(
    post,
    path = "/sessions",
    tag = "Session",
    request_body = SessionRequest,
    responses(
        (status = 200, description = "Session created or validated", body = ApiResponse),
        (status = 404, description = "Unknown member", body = ApiResponse)
    )
)]
async fn create_or_validate_session(
    State(context): State<AppContext>,
    Json(req): Json<SessionRequest>,
) -> Response {
    if let Some(session_id) = req.session_id {
        if let Some(session) = context.state.sessions.get_session(&session_id).await {
            return ok(
                "Session validated.",
                json!({
                    "session_id": session.token,
                    "uid": session.uid,
                    "status": "validated",
                    "created_at": session.created_at,
                    "expires_at": session.expires_at
                }),
            );
        }
    }

    if let Some(uid) = req.uid {
        if context.state.profiles.contains(&uid).await {
            let session = context.state.sessions.create_session(uid).await;
            return ok(
                "Session created.",
                json!({
                    "session_id": session.token,
                    "uid": session.uid,
                    "status": "created",
                    "created_at": session.created_at,
                    "expires_at": session.expires_at
                }),
            );
        }
    }

    fail(StatusCode::NOT_FOUND, "Unknown member")
}

#[utoipa::path(
    post,
    path = "/members",
    tag = "Members",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Member registered", body = ApiResponse)
    )
)]
async fn register_member(
    State(context): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let (profile, session) = context.state.register_member(req.display_name).await;

    ok(
        "Member registered.",
        json!({
            "profile": profile,
            "session_id": session.token,
            "expires_at": session.expires_at
        }),
    )
}

#[utoipa::path(
    get,
    path = "/members/{uid}",
    tag = "Members",
    params(("uid" = String, Path, description = "Member uid")),
    responses(
        (status = 200, description = "Member profile", body = ApiResponse),
        (status = 404, description = "Unknown member", body = ApiResponse)
    )
)]
async fn get_member(State(context): State<AppContext>, Path(uid): Path<String>) -> Response {
    match context.state.profiles.get(&uid).await {
        Some(profile) => ok("Member profile.", json!({ "profile": profile })),
        None => fail(StatusCode::NOT_FOUND, "Unknown member"),
    }
}

#[utoipa::path(
    get,
    path = "/members/{uid}/progress",
    tag = "Members",
    params(("uid" = String, Path, description = "Member uid")),
    responses(
        (status = 200, description = "Level, rank and streak progress", body = ApiResponse),
        (status = 404, description = "Unknown member", body = ApiResponse)
    )
)]
async fn member_progress(State(context): State<AppContext>, Path(uid): Path<String>) -> Response {
    match context.state.member_progress(&uid).await {
        Some(progress) => ok("Member progress.", json!(progress)),
        None => fail(StatusCode::NOT_FOUND, "Unknown member"),
    }
}

async fn sse_handler(
    State(context): State<AppContext>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = context.state.events.subscribe();

    let stream = stream::unfold(receiver, |mut rx| async move {
        match rx.recv().await {
            Ok(event) => {
                let event_data = serde_json::to_string(&event).unwrap_or_default();
                let sse_event = axum::response::sse::Event::default().data(event_data);
                Some((Ok(sse_event), rx))
            }
            Err(_) => None,
        }
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(std::time::Duration::from_secs(30))
            .text("keep-alive"),
    )
}

#[utoipa::path(
    post,
    path = "/activity/post",
    tag = "Activity",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Post recorded", body = ApiResponse),
        (status = 401, description = "Invalid session", body = ApiResponse)
    )
)]
async fn record_post(
    State(context): State<AppContext>,
    Json(req): Json<ActionRequest>,
) -> Response {
    let uid = match resolve_member(&context, &req.session_id).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    match context.state.record_post(&uid).await {
        Ok(outcome) => ok("Post recorded.", outcome_json(&outcome)),
        Err(e) => fail(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

#[utoipa::path(
    post,
    path = "/activity/comment",
    tag = "Activity",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Comment recorded", body = ApiResponse),
        (status = 401, description = "Invalid session", body = ApiResponse)
    )
)]
async fn record_comment(
    State(context): State<AppContext>,
    Json(req): Json<ActionRequest>,
) -> Response {
    let uid = match resolve_member(&context, &req.session_id).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    match context.state.record_comment(&uid).await {
        Ok(outcome) => ok("Comment recorded.", outcome_json(&outcome)),
        Err(e) => fail(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

#[utoipa::path(
    post,
    path = "/activity/message",
    tag = "Activity",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Message recorded", body = ApiResponse),
        (status = 401, description = "Invalid session", body = ApiResponse)
    )
)]
async fn record_message(
    State(context): State<AppContext>,
    Json(req): Json<ActionRequest>,
) -> Response {
    let uid = match resolve_member(&context, &req.session_id).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    match context.state.record_message(&uid).await {
        Ok(outcome) => ok("Message recorded.", outcome_json(&outcome)),
        Err(e) => fail(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

#[utoipa::path(
    post,
    path = "/activity/like",
    tag = "Activity",
    request_body = LikeRequest,
    responses(
        (status = 200, description = "Like recorded", body = ApiResponse),
        (status = 401, description = "Invalid session", body = ApiResponse)
    )
)]
async fn record_like(State(context): State<AppContext>, Json(req): Json<LikeRequest>) -> Response {
    let uid = match resolve_member(&context, &req.session_id).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    match context.state.record_like(&uid, &req.recipient_uid).await {
        Ok(outcome) => ok("Like recorded.", outcome_json(&outcome)),
        Err(e) => fail(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

#[utoipa::path(
    post,
    path = "/activity/referral",
    tag = "Activity",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Referral recorded", body = ApiResponse),
        (status = 401, description = "Invalid session", body = ApiResponse)
    )
)]
async fn record_referral(
    State(context): State<AppContext>,
    Json(req): Json<ActionRequest>,
) -> Response {
    let uid = match resolve_member(&context, &req.session_id).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    match context.state.record_referral(&uid).await {
        Ok(outcome) => ok("Referral recorded.", outcome_json(&outcome)),
        Err(e) => fail(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

#[utoipa::path(
    post,
    path = "/checkin",
    tag = "Activity",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Daily check-in recorded", body = ApiResponse),
        (status = 401, description = "Invalid session", body = ApiResponse)
    )
)]
async fn daily_check_in(
    State(context): State<AppContext>,
    Json(req): Json<ActionRequest>,
) -> Response {
    let uid = match resolve_member(&context, &req.session_id).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    match context.state.check_in(&uid).await {
        Ok(outcome) => {
            let streak_days = outcome.profile.streak_days;
            let multiplier = crate::streak::bonus_multiplier(streak_days);
            let mut data = outcome_json(&outcome);
            data["streak_days"] = json!(streak_days);
            data["multiplier"] = json!(multiplier);
            ok("Checked in.", data)
        }
        Err(e) => fail(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

#[utoipa::path(
    get,
    path = "/shop/products",
    tag = "Shop",
    responses(
        (status = 200, description = "Product catalog", body = ApiResponse)
    )
)]
async fn list_products() -> Response {
    ok(
        "Product catalog.",
        json!({
            "products": PRODUCTS,
            "count": PRODUCTS.len()
        }),
    )
}

#[utoipa::path(
    post,
    path = "/shop/purchase",
    tag = "Shop",
    request_body = PurchaseRequest,
    responses(
        (status = 200, description = "Purchase complete", body = ApiResponse),
        (status = 400, description = "Rank or balance rejection", body = ApiResponse),
        (status = 401, description = "Invalid session", body = ApiResponse),
        (status = 404, description = "Unknown product", body = ApiResponse)
    )
)]
async fn purchase_product(
    State(context): State<AppContext>,
    Json(req): Json<PurchaseRequest>,
) -> Response {
    let uid = match resolve_member(&context, &req.session_id).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    if crate::shop::get_product(&req.product_id).is_none() {
        return fail(StatusCode::NOT_FOUND, "Unknown product");
    }

    match context.state.purchase(&uid, &req.product_id).await {
        Ok(outcome) => ok("Purchase complete.", outcome_json(&outcome)),
        Err(e) => fail(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

#[utoipa::path(
    get,
    path = "/missions/today",
    tag = "Missions",
    responses(
        (status = 200, description = "Today's mission board", body = ApiResponse)
    )
)]
async fn todays_missions(State(context): State<AppContext>) -> Response {
    context.state.rotate_missions_if_needed().await;
    let (date, missions) = context.state.missions.today().await;

    ok(
        "Today's missions.",
        json!({
            "date": date,
            "missions": missions,
            "count": missions.len()
        }),
    )
}

#[utoipa::path(
    post,
    path = "/missions/complete",
    tag = "Missions",
    request_body = MissionRequest,
    responses(
        (status = 200, description = "Mission completed", body = ApiResponse),
        (status = 400, description = "Mission rejected", body = ApiResponse),
        (status = 401, description = "Invalid session", body = ApiResponse)
    )
)]
async fn complete_mission(
    State(context): State<AppContext>,
    Json(req): Json<MissionRequest>,
) -> Response {
    let uid = match resolve_member(&context, &req.session_id).await {
        Ok(uid) => uid,
        Err(response) => return response,
    };

    match context.state.complete_mission(&uid, &req.mission_id).await {
        Ok(outcome) => ok("Mission completed.", outcome_json(&outcome)),
        Err(e) => fail(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

#[utoipa::path(
    get,
    path = "/achievements",
    tag = "Achievements",
    responses(
        (status = 200, description = "Achievement catalog", body = ApiResponse)
    )
)]
async fn list_achievements() -> Response {
    ok(
        "Achievement catalog.",
        json!({
            "achievements": ACHIEVEMENTS,
            "count": ACHIEVEMENTS.len()
        }),
    )
}

#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "Leaderboard",
    responses(
        (status = 200, description = "Current standings", body = ApiResponse)
    )
)]
async fn leaderboard_standings(State(context): State<AppContext>) -> Response {
    let standings = context.state.current_leaderboard().await;

    ok(
        "Current standings.",
        json!({
            "standings": standings,
            "count": standings.len()
        }),
    )
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service healthy", body = ApiResponse)
    )
)]
async fn health_check() -> Response {
    ok(
        "Healthy.",
        json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now()
        }),
    )
}
