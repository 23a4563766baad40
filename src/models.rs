// models.rs
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const TITLE_MAX_LEN: usize = 30;
pub const DESCRIPTION_MAX_LEN: usize = 200;
pub const LABEL_MAX_LEN: usize = 100;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Poll {
    pub id: i64,
    pub titulo: String,
    pub descricao: String,
    pub data: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PollOption {
    pub id: i64,
    pub opcao: String,
    pub enquete_id: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Vote {
    pub id: i64,
    pub data: NaiveDateTime,
    pub enquete_opcoes_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct NewPoll {
    pub titulo: Option<String>,
    pub descricao: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewOption {
    pub opcao: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewVote {
    pub enquete_opcoes_id: Option<i64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PollView {
    pub id: i64,
    pub titulo: String,
    pub descricao: String,
    pub data: String,
}

impl From<Poll> for PollView {
    fn from(poll: Poll) -> Self {
        Self {
            id: poll.id,
            titulo: poll.titulo,
            descricao: poll.descricao,
            data: poll.data.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct OptionView {
    pub id: i64,
    pub opcao: String,
}

impl From<PollOption> for OptionView {
    fn from(option: PollOption) -> Self {
        Self {
            id: option.id,
            opcao: option.opcao,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub msg: &'static str,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub msg: &'static str,
}

/// Vote count per option label.
pub type Tally = BTreeMap<String, i64>;

/// Returns the field's value, or a validation error naming it when absent
/// or longer than `max_len` characters.
pub fn required(field: &str, value: Option<String>, max_len: usize) -> Result<String, AppError> {
    let value = value.ok_or_else(|| AppError::missing_field(field))?;

    if value.chars().count() > max_len {
        return Err(AppError::Validation(format!(
            "Field \"{field}\" must be at most {max_len} characters."
        )));
    }

    Ok(value)
}
