use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::{Task, User};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub passport_serie: i64,
    pub passport_number: i64,
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub address: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            passport_serie: record.passport_serie,
            passport_number: record.passport_number,
            surname: record.surname,
            name: record.name,
            patronymic: record.patronymic,
            address: record.address,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskRecord {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Task {
            id: record.id,
            user_id: record.user_id,
            description: record.description,
            start_time: record.start_time,
            end_time: record.end_time,
        }
    }
}
