use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        import::{ImportResult, ImportScoresRequest},
        score::{
            EventScoresQuery, MyScoresQuery, RejectScoreRequest, ScoreResponse,
            SubmitScoreRequest, UpdateScoreRequest,
        },
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::CurrentUser;

use super::services;

#[utoipa::path(
    post,
    path = "/api/scores",
    request_body = SubmitScoreRequest,
    responses(
        (status = 201, description = "Score submitted and awaiting approval", body = ScoreResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "scores"
)]
pub async fn submit_score(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<SubmitScoreRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let score = services::submit_score(db.pool(), &actor, &req).await?;

    Ok((StatusCode::CREATED, Json(ScoreResponse::from(score))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/scores/my-scores",
    params(MyScoresQuery),
    responses(
        (status = 200, description = "The caller's scores, newest first", body = PaginatedResponse<ScoreResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "scores"
)]
pub async fn my_scores(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<MyScoresQuery>,
) -> Result<Response, WebError> {
    query.pagination.validate().map_err(WebError::BadRequest)?;

    let (scores, total) = services::my_scores(db.pool(), &actor, &query).await?;

    let data: Vec<ScoreResponse> = scores.into_iter().map(ScoreResponse::from).collect();
    let response = PaginatedResponse::new(
        data,
        query.pagination.page,
        query.pagination.page_size,
        total,
    );

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/scores/event/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        EventScoresQuery
    ),
    responses(
        (status = 200, description = "All scores for the event, highest first", body = PaginatedResponse<ScoreResponse>),
        (status = 404, description = "Event not found")
    ),
    tag = "scores"
)]
pub async fn event_scores(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<EventScoresQuery>,
) -> Result<Response, WebError> {
    query.pagination.validate().map_err(WebError::BadRequest)?;

    let (scores, total) = services::event_scores(db.pool(), event_id, &query).await?;

    let data: Vec<ScoreResponse> = scores.into_iter().map(ScoreResponse::from).collect();
    let response = PaginatedResponse::new(
        data,
        query.pagination.page,
        query.pagination.page_size,
        total,
    );

    Ok(Json(response).into_response())
}

#[utoipa::path(
    put,
    path = "/api/scores/{score_id}",
    params(
        ("score_id" = Uuid, Path, description = "Score id")
    ),
    request_body = UpdateScoreRequest,
    responses(
        (status = 200, description = "Score updated", body = ScoreResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "Score not found"),
        (status = 409, description = "Score is already approved or rejected")
    ),
    tag = "scores"
)]
pub async fn update_score(
    State(db): State<Database>,
    Path(score_id): Path<Uuid>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<UpdateScoreRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    if req.is_empty() {
        return Err(WebError::BadRequest("No fields to update".to_string()));
    }

    let score = services::update_score(db.pool(), &actor, score_id, &req).await?;

    Ok(Json(ScoreResponse::from(score)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/scores/{score_id}",
    params(
        ("score_id" = Uuid, Path, description = "Score id")
    ),
    responses(
        (status = 204, description = "Score deleted"),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "Score not found")
    ),
    tag = "scores"
)]
pub async fn delete_score(
    State(db): State<Database>,
    Path(score_id): Path<Uuid>,
    CurrentUser(actor): CurrentUser,
) -> Result<Response, WebError> {
    services::delete_score(db.pool(), &actor, score_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    put,
    path = "/api/scores/{score_id}/approve",
    params(
        ("score_id" = Uuid, Path, description = "Score id")
    ),
    responses(
        (status = 200, description = "Score approved", body = ScoreResponse),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Score not found"),
        (status = 409, description = "Score is not pending")
    ),
    tag = "scores"
)]
pub async fn approve_score(
    State(db): State<Database>,
    Path(score_id): Path<Uuid>,
    CurrentUser(actor): CurrentUser,
) -> Result<Response, WebError> {
    let score = services::approve_score(db.pool(), &actor, score_id).await?;

    Ok(Json(ScoreResponse::from(score)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/scores/{score_id}/reject",
    params(
        ("score_id" = Uuid, Path, description = "Score id")
    ),
    request_body = RejectScoreRequest,
    responses(
        (status = 200, description = "Score rejected", body = ScoreResponse),
        (status = 400, description = "Missing rejection reason"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Score not found"),
        (status = 409, description = "Score is not pending")
    ),
    tag = "scores"
)]
pub async fn reject_score(
    State(db): State<Database>,
    Path(score_id): Path<Uuid>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<RejectScoreRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let score = services::reject_score(db.pool(), &actor, score_id, &req).await?;

    Ok(Json(ScoreResponse::from(score)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/scores/import-issf",
    request_body = ImportScoresRequest,
    responses(
        (status = 201, description = "Import completed; failed rows are reported per row", body = ImportResult),
        (status = 403, description = "Admin access required")
    ),
    tag = "scores"
)]
pub async fn import_issf_scores(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<ImportScoresRequest>,
) -> Result<Response, WebError> {
    let result = services::import_issf_scores(db.pool(), &actor, &req.scores).await?;

    Ok((StatusCode::CREATED, Json(result)).into_response())
}
