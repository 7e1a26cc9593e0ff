use std::sync::Arc;

use timetrack_core::{
    build_user_query, BuiltQuery, NewUser, Passport, User, UserFilter, UserInfoProvider,
};

use crate::{models::UserRecord, Database, Error, Result};

/// User records: creation, filtered lookup, full replace and deletion.
#[derive(Clone)]
pub struct UserRepository {
    db: Database,
    info: Arc<dyn UserInfoProvider>,
}

impl UserRepository {
    pub fn new(db: Database, info: Arc<dyn UserInfoProvider>) -> Self {
        Self { db, info }
    }

    /// Look the passport up in the info service, then store the enriched user.
    pub async fn register(&self, passport: Passport) -> Result<i64> {
        let info = self.info.user_info(&passport).await?;
        tracing::debug!(passport = %passport, "User info resolved");

        self.create(&NewUser::from_info(passport, info)).await
    }

    pub async fn create(&self, user: &NewUser) -> Result<i64> {
        let query = BuiltQuery::new(
            r#"
            INSERT INTO users (passport_serie, passport_number, surname, name, patronymic, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(user.passport_serie)
        .bind(user.passport_number)
        .bind(user.surname.as_str())
        .bind(user.name.as_str())
        .bind(user.patronymic.as_str())
        .bind(user.address.as_str());

        let id = self.db.insert_returning_id(query).await?;
        tracing::info!(user_id = id, "Created user");

        Ok(id)
    }

    pub async fn find(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let pagination = filter.pagination();
        if pagination.offset.is_some_and(|offset| offset < 0) {
            return Err(Error::InvalidInput("offset must not be negative".to_string()));
        }
        if pagination.limit.is_some_and(|limit| limit < 0) {
            return Err(Error::InvalidInput("limit must not be negative".to_string()));
        }

        let records = self
            .db
            .query_many::<UserRecord>(build_user_query(filter))
            .await?;

        Ok(records.into_iter().map(User::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        self.find(&UserFilter::new().id(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found("user", id))
    }

    /// Replace every field of user `id`.
    pub async fn update(&self, id: i64, user: &NewUser) -> Result<()> {
        let query = BuiltQuery::new(
            r#"
            UPDATE users
            SET passport_serie = $1, passport_number = $2,
                surname = $3, name = $4, patronymic = $5, address = $6
            WHERE id = $7
            "#,
        )
        .bind(user.passport_serie)
        .bind(user.passport_number)
        .bind(user.surname.as_str())
        .bind(user.name.as_str())
        .bind(user.patronymic.as_str())
        .bind(user.address.as_str())
        .bind(id);

        if self.db.execute(query).await? == 0 {
            return Err(Error::not_found("user", id));
        }

        tracing::info!(user_id = id, "Updated user");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let query = BuiltQuery::new("DELETE FROM users WHERE id = $1").bind(id);

        if self.db.execute(query).await? == 0 {
            return Err(Error::not_found("user", id));
        }

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}
