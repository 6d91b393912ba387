use axum::{
    routing::{delete, get, post},
    Router,
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::AppState;
use crate::api::models::{
    BlogRequest, BlogResponse, BulkDeleteRequest, BulkDeleteResponse, DeleteRequest,
    DeleteResponse, HistoryEntry, SaveBlogRequest, SaveBlogResponse,
};
use crate::api::response;
use crate::error::AppError;
use crate::pipeline::digest_blog;

pub const HISTORY_FAILURE_MESSAGE: &str = "Failed to load history";
pub const SAVE_FAILURE_MESSAGE: &str = "Failed to save blog";

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/blog", post(blog_handler))
        .route("/history", get(list_history_handler).delete(delete_history_handler))
        .route("/history/bulk", delete(bulk_delete_history_handler))
        .route("/saveBlog", post(save_blog_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn blog_handler(
    State(state): State<AppState>,
    payload: Result<Json<BlogRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let err = AppError::from(rejection);
            error!(error = %err, "Blog request failed");
            return err.into_response();
        }
    };

    info!(url = %req.url, "Processing blog request");
    let start_time = Instant::now();

    match digest_blog(&state, &req.url).await {
        Ok(digest) => {
            info!(url = %req.url, elapsed = ?start_time.elapsed(), "Blog summarized");
            response::success(BlogResponse::from(digest)).into_response()
        }
        Err(err @ AppError::InvalidInput(_)) => {
            warn!(error = %err, "Rejected blog request");
            err.into_response()
        }
        Err(err) => {
            error!(url = %req.url, error = %err, elapsed = ?start_time.elapsed(), "Blog request failed");
            err.into_response()
        }
    }
}

async fn list_history_handler(State(state): State<AppState>) -> Response {
    match state.history.list().await {
        Ok(records) => {
            let entries: Vec<HistoryEntry> = records.into_iter().map(HistoryEntry::from).collect();
            response::success(entries).into_response()
        }
        Err(err) => {
            error!(error = %err, "Listing history failed");
            response::error(StatusCode::INTERNAL_SERVER_ERROR, HISTORY_FAILURE_MESSAGE).into_response()
        }
    }
}

async fn delete_history_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload.inspect_err(|rejection| {
        error!(error = %rejection.body_text(), "Malformed delete request");
    }) else {
        return response::failure(DeleteResponse { success: false }).into_response();
    };

    match state.history.delete(req.id).await {
        Ok(()) => {
            info!(id = req.id, "History entry deleted");
            response::success(DeleteResponse { success: true }).into_response()
        }
        Err(err) => {
            error!(id = req.id, error = %err, "Deleting history entry failed");
            response::failure(DeleteResponse { success: false }).into_response()
        }
    }
}

async fn bulk_delete_history_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkDeleteRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload.inspect_err(|rejection| {
        error!(error = %rejection.body_text(), "Malformed bulk delete request");
    }) else {
        return response::failure(BulkDeleteResponse { success: false, deleted: 0 }).into_response();
    };

    match state.history.delete_many(&req.ids).await {
        Ok(deleted) => {
            info!(requested = req.ids.len(), deleted, "History entries deleted");
            response::success(BulkDeleteResponse { success: true, deleted }).into_response()
        }
        Err(err) => {
            error!(requested = req.ids.len(), error = %err, "Bulk delete failed");
            response::failure(BulkDeleteResponse { success: false, deleted: 0 }).into_response()
        }
    }
}

async fn save_blog_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveBlogRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload.inspect_err(|rejection| {
        error!(error = %rejection.body_text(), "Malformed save request");
    }) else {
        return save_failure().into_response();
    };

    match state.archive.save(&req.url, &req.full_text).await {
        Ok(id) => {
            info!(id, url = %req.url, "Blog archived");
            response::success(SaveBlogResponse { success: true, id: Some(id), error: None })
                .into_response()
        }
        Err(err) => {
            error!(url = %req.url, error = %err, "Archiving blog failed");
            save_failure().into_response()
        }
    }
}

fn save_failure() -> (StatusCode, Json<SaveBlogResponse>) {
    response::failure(SaveBlogResponse {
        success: false,
        id: None,
        error: Some(SAVE_FAILURE_MESSAGE.to_string()),
    })
}
