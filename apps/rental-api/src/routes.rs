//! Axum router and all HTTP handlers.
//!
//! `build_router` is the single entry point; `main.rs` serves it and the
//! tests in `tests/` drive it in-process. Handlers only extract, call a
//! service and shape the JSON.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use rental_core::{NewCatalogItem, OrderStatus, RentalRequest};

use crate::auth::MaybeIdentity;
use crate::error::{expose_internal_errors, success, ApiError, ApiResult};
use crate::services::health_service::ServingStatus;
use crate::services::review_service::NewReviewRequest;
use crate::services::user_service::{LoginRequest, RegisterRequest};
use crate::services::{
    CatalogService, HealthService, OrderService, QuoteService, ReviewService, UserService,
};
use crate::AppState;

/// JSON body whose rejection renders as an [`ApiError`].
type JsonBody<T> = Result<Json<T>, JsonRejection>;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/quote", post(quote))
        .route("/orders/status/{order_id}", put(update_order_status))
        .route("/users", post(register))
        .route("/users/login", post(login))
        .route("/products", get(list_products).post(create_product))
        .route("/products/{key}", get(get_product))
        .route("/reviews", post(create_review).get(list_reviews))
        .route("/reviews/approve/{email}", put(approve_review))
        .route("/reviews/delete/{email}", delete(delete_review));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(middleware::map_response_with_state(
            state.clone(),
            expose_internal_errors,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

async fn health(State(st): State<AppState>) -> impl IntoResponse {
    let report = HealthService::new(st.db.clone()).check().await;
    let status = match report.status {
        ServingStatus::Serving => StatusCode::OK,
        ServingStatus::NotServing => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(report))
}

// ---------------------------------------------------------------------------
// /api/orders
// ---------------------------------------------------------------------------

async fn create_order(
    State(st): State<AppState>,
    identity: MaybeIdentity,
    body: JsonBody<RentalRequest>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = body?;
    let order = OrderService::new(st.db.clone())
        .create_order(identity.identity(), &request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(success("Order created successfully", json!({ "order": order }))),
    ))
}

async fn quote(
    State(st): State<AppState>,
    body: JsonBody<RentalRequest>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = body?;
    let quote = QuoteService::new(st.db.clone()).compute_quote(&request).await?;
    let quote = serde_json::to_value(quote).map_err(ApiError::internal)?;

    Ok(Json(success("Quote calculated successfully", quote)))
}

async fn list_orders(
    State(st): State<AppState>,
    identity: MaybeIdentity,
) -> ApiResult<impl IntoResponse> {
    let orders = OrderService::new(st.db.clone())
        .list_orders(identity.identity())
        .await?;
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: OrderStatus,
}

async fn update_order_status(
    State(st): State<AppState>,
    identity: MaybeIdentity,
    Path(order_id): Path<String>,
    body: JsonBody<StatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = body?;
    let order = OrderService::new(st.db.clone())
        .update_order_status(identity.identity(), &order_id, request.status)
        .await?;

    Ok(Json(success(
        "Order approved/rejected successfully",
        json!({ "order": order }),
    )))
}

// ---------------------------------------------------------------------------
// /api/users
// ---------------------------------------------------------------------------

async fn register(
    State(st): State<AppState>,
    body: JsonBody<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = body?;
    let user = UserService::new(st.db.clone()).register(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(success("User registered successfully", json!({ "user": user }))),
    ))
}

async fn login(
    State(st): State<AppState>,
    body: JsonBody<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = body?;
    let response = UserService::new(st.db.clone())
        .login(&st.jwt, &request)
        .await?;
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// /api/products
// ---------------------------------------------------------------------------

async fn list_products(State(st): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(CatalogService::new(st.db.clone()).list().await?))
}

async fn get_product(
    State(st): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(CatalogService::new(st.db.clone()).get(&key).await?))
}

async fn create_product(
    State(st): State<AppState>,
    identity: MaybeIdentity,
    body: JsonBody<NewCatalogItem>,
) -> ApiResult<impl IntoResponse> {
    let Json(item) = body?;
    let created = CatalogService::new(st.db.clone())
        .create(identity.identity(), &item)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(success("Product added successfully", json!({ "product": created }))),
    ))
}

// ---------------------------------------------------------------------------
// /api/reviews
// ---------------------------------------------------------------------------

async fn create_review(
    State(st): State<AppState>,
    identity: MaybeIdentity,
    body: JsonBody<NewReviewRequest>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = body?;
    let review = ReviewService::new(st.db.clone())
        .create(identity.identity(), &request)
        .await?;

    Ok(Json(success("Review added successfully", json!({ "review": review }))))
}

async fn list_reviews(
    State(st): State<AppState>,
    identity: MaybeIdentity,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        ReviewService::new(st.db.clone())
            .list(identity.identity())
            .await?,
    ))
}

async fn approve_review(
    State(st): State<AppState>,
    identity: MaybeIdentity,
    Path(email): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let review = ReviewService::new(st.db.clone())
        .approve(identity.identity(), &email)
        .await?;

    Ok(Json(success("Review approved successfully", json!({ "review": review }))))
}

async fn delete_review(
    State(st): State<AppState>,
    identity: MaybeIdentity,
    Path(email): Path<String>,
) -> ApiResult<impl IntoResponse> {
    ReviewService::new(st.db.clone())
        .delete(identity.identity(), &email)
        .await?;

    Ok(Json(success("Review deleted successfully", json!({}))))
}
