// src/poll.rs
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{is_unique_violation, AppError};
use crate::models::{Poll, PollOption, Tally, Vote};

async fn poll_exists<'e, E>(executor: E, poll_id: i64) -> Result<bool, sqlx::Error>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM enquetes WHERE id = ?")
        .bind(poll_id)
        .fetch_optional(executor)
        .await?;

    Ok(row.is_some())
}

pub async fn create_poll(pool: &SqlitePool, titulo: &str, descricao: &str) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM enquetes WHERE titulo = ?")
        .bind(titulo)
        .fetch_optional(&mut *tx)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict(format!("A poll titled \"{titulo}\" already exists.")));
    }

    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO enquetes (titulo, descricao, data) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(titulo)
    .bind(descricao)
    .bind(Utc::now().naive_utc())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("A poll titled \"{titulo}\" already exists."))
        } else {
            e.into()
        }
    })?;

    tx.commit().await?;
    info!(poll_id = id, "Poll created");

    Ok(id)
}

pub async fn list_polls(pool: &SqlitePool) -> Result<Vec<Poll>, AppError> {
    let polls = sqlx::query_as::<_, Poll>(
        "SELECT id, titulo, descricao, data FROM enquetes ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(polls)
}

pub async fn get_poll(pool: &SqlitePool, poll_id: i64) -> Result<Poll, AppError> {
    sqlx::query_as::<_, Poll>("SELECT id, titulo, descricao, data FROM enquetes WHERE id = ?")
        .bind(poll_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(AppError::poll_not_found)
}

/// Deletes the poll; its options and their votes go with it through the
/// `ON DELETE CASCADE` foreign keys.
pub async fn delete_poll(pool: &SqlitePool, poll_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM enquetes WHERE id = ?")
        .bind(poll_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(AppError::poll_not_found());
    }

    tx.commit().await?;
    info!(poll_id, "Poll deleted");

    Ok(())
}

pub async fn add_option(pool: &SqlitePool, poll_id: i64, opcao: &str) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    if !poll_exists(&mut *tx, poll_id).await? {
        return Err(AppError::poll_not_found());
    }

    // Labels are unique across every poll, not just this one.
    let taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM enquete_opcoes WHERE opcao = ?")
        .bind(opcao)
        .fetch_optional(&mut *tx)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict(format!("Option \"{opcao}\" already exists.")));
    }

    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO enquete_opcoes (opcao, enquete_id) VALUES (?, ?) RETURNING id",
    )
    .bind(opcao)
    .bind(poll_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Option \"{opcao}\" already exists."))
        } else {
            e.into()
        }
    })?;

    tx.commit().await?;
    info!(poll_id, option_id = id, "Option added");

    Ok(id)
}

pub async fn list_options(pool: &SqlitePool, poll_id: i64) -> Result<Vec<PollOption>, AppError> {
    let mut tx = pool.begin().await?;

    if !poll_exists(&mut *tx, poll_id).await? {
        return Err(AppError::poll_not_found());
    }

    let options = sqlx::query_as::<_, PollOption>(
        "SELECT id, opcao, enquete_id FROM enquete_opcoes WHERE enquete_id = ? ORDER BY id",
    )
    .bind(poll_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(options)
}

/// The option is matched by id alone; it is deleted even when it belongs to
/// a poll other than `poll_id`.
pub async fn delete_option(pool: &SqlitePool, poll_id: i64, option_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    if !poll_exists(&mut *tx, poll_id).await? {
        return Err(AppError::poll_not_found());
    }

    let owner: Option<(i64,)> = sqlx::query_as("DELETE FROM enquete_opcoes WHERE id = ? RETURNING enquete_id")
        .bind(option_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some((owner,)) = owner else {
        return Err(AppError::option_not_found());
    };
    if owner != poll_id {
        warn!(poll_id, option_id, owner, "Deleted option belongs to another poll");
    }

    tx.commit().await?;
    info!(poll_id, option_id, "Option deleted");

    Ok(())
}

/// Records one vote. Like [`delete_option`], the option lookup is global.
pub async fn cast_vote(pool: &SqlitePool, poll_id: i64, option_id: i64) -> Result<Vote, AppError> {
    let mut tx = pool.begin().await?;

    if !poll_exists(&mut *tx, poll_id).await? {
        return Err(AppError::poll_not_found());
    }

    let owner: Option<(i64,)> = sqlx::query_as("SELECT enquete_id FROM enquete_opcoes WHERE id = ?")
        .bind(option_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some((owner,)) = owner else {
        return Err(AppError::option_not_found());
    };
    if owner != poll_id {
        warn!(poll_id, option_id, owner, "Vote cast for an option of another poll");
    }

    let vote = sqlx::query_as::<_, Vote>(
        r#"
        INSERT INTO votos (enquete_opcoes_id, data)
        VALUES (?, ?)
        RETURNING id, data, enquete_opcoes_id
        "#,
    )
    .bind(option_id)
    .bind(Utc::now().naive_utc())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(poll_id, option_id, vote_id = vote.id, "Vote recorded");

    Ok(vote)
}

/// Vote count for every option of the poll, options without votes included.
pub async fn tally(pool: &SqlitePool, poll_id: i64) -> Result<Tally, AppError> {
    let mut tx = pool.begin().await?;

    if !poll_exists(&mut *tx, poll_id).await? {
        return Err(AppError::poll_not_found());
    }

    let rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT o.opcao, COUNT(v.id) AS vote_count
        FROM enquete_opcoes o
        LEFT JOIN votos v ON v.enquete_opcoes_id = o.id
        WHERE o.enquete_id = ?
        GROUP BY o.id, o.opcao
        "#,
    )
    .bind(poll_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(rows.into_iter().collect())
}
