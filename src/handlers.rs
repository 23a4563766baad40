// handlers.rs
use axum::{
    extract::{FromRequest, FromRequestParts, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{
    required, Created, Message, NewOption, NewPoll, NewVote, OptionView, PollView, Tally,
    DESCRIPTION_MAX_LEN, LABEL_MAX_LEN, TITLE_MAX_LEN,
};
use crate::poll;

/// JSON body extractor whose rejections render as a 400 `{"msg": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor; an id that does not parse is a 404 `{"msg": ...}`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Resource not found.".to_string())
}

/// Create a poll
pub async fn create_poll(
    State(pool): State<SqlitePool>,
    ApiJson(body): ApiJson<NewPoll>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    if body.titulo.is_none() || body.descricao.is_none() {
        return Err(AppError::Validation(
            "Fields \"titulo\" and \"descricao\" are required.".to_string(),
        ));
    }
    let titulo = required("titulo", body.titulo, TITLE_MAX_LEN)?;
    let descricao = required("descricao", body.descricao, DESCRIPTION_MAX_LEN)?;

    let id = poll::create_poll(&pool, &titulo, &descricao).await?;

    Ok((
        StatusCode::CREATED,
        Json(Created { msg: "Poll created.", id }),
    ))
}

/// List every poll
pub async fn list_polls(State(pool): State<SqlitePool>) -> Result<Json<Vec<PollView>>, AppError> {
    let polls = poll::list_polls(&pool).await?;
    Ok(Json(polls.into_iter().map(PollView::from).collect()))
}

pub async fn get_poll(
    State(pool): State<SqlitePool>,
    ApiPath(poll_id): ApiPath<i64>,
) -> Result<Json<PollView>, AppError> {
    let poll = poll::get_poll(&pool, poll_id).await?;
    Ok(Json(poll.into()))
}

pub async fn delete_poll(
    State(pool): State<SqlitePool>,
    ApiPath(poll_id): ApiPath<i64>,
) -> Result<Json<Message>, AppError> {
    poll::delete_poll(&pool, poll_id).await?;
    Ok(Json(Message { msg: "Poll deleted." }))
}

pub async fn list_options(
    State(pool): State<SqlitePool>,
    ApiPath(poll_id): ApiPath<i64>,
) -> Result<Json<Vec<OptionView>>, AppError> {
    let options = poll::list_options(&pool, poll_id).await?;
    Ok(Json(options.into_iter().map(OptionView::from).collect()))
}

/// Add an option to a poll. The poll is looked up before the JSON body is
/// mapped onto [`NewOption`], so a missing poll is a 404 whatever fields the
/// body carries.
pub async fn add_option(
    State(pool): State<SqlitePool>,
    ApiPath(poll_id): ApiPath<i64>,
    ApiJson(body): ApiJson<Value>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    poll::get_poll(&pool, poll_id).await?;

    let body: NewOption =
        serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))?;
    let opcao = required("opcao", body.opcao, LABEL_MAX_LEN)?;

    let id = poll::add_option(&pool, poll_id, &opcao).await?;

    Ok((
        StatusCode::CREATED,
        Json(Created { msg: "Option added to poll.", id }),
    ))
}

pub async fn delete_option(
    State(pool): State<SqlitePool>,
    ApiPath((poll_id, option_id)): ApiPath<(i64, i64)>,
) -> Result<Json<Message>, AppError> {
    poll::delete_option(&pool, poll_id, option_id).await?;
    Ok(Json(Message { msg: "Poll option deleted." }))
}

/// Vote for an option
pub async fn vote(
    State(pool): State<SqlitePool>,
    ApiPath(poll_id): ApiPath<i64>,
    ApiJson(body): ApiJson<NewVote>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let option_id = body
        .enquete_opcoes_id
        .ok_or_else(|| AppError::missing_field("enquete_opcoes_id"))?;

    poll::cast_vote(&pool, poll_id, option_id).await?;

    Ok((StatusCode::CREATED, Json(Message { msg: "Vote recorded." })))
}

pub async fn results(
    State(pool): State<SqlitePool>,
    ApiPath(poll_id): ApiPath<i64>,
) -> Result<Json<Tally>, AppError> {
    Ok(Json(poll::tally(&pool, poll_id).await?))
}
