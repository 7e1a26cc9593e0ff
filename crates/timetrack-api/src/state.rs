use std::sync::Arc;

use timetrack_core::UserInfoProvider;
use timetrack_db::{Database, TaskRepository, UserRepository};

#[derive(Clone)]
pub struct ApiState {
    pub users: UserRepository,
    pub tasks: TaskRepository,
}

impl ApiState {
    pub fn new(db: Database, info: Arc<dyn UserInfoProvider>) -> Self {
        Self {
            users: UserRepository::new(db.clone(), info),
            tasks: TaskRepository::new(db),
        }
    }
}
