pub mod duration;
pub mod error;
pub mod filter;
pub mod info;
pub mod query;
pub mod task;
pub mod user;

// Re-exports
pub use duration::{aggregate, AggregationPeriod, ElapsedTime};
pub use error::{Error, Result};
pub use filter::{Field, Pagination, UserFilter};
pub use info::{UserInfo, UserInfoProvider};
pub use query::{build_user_query, BuiltQuery, QueryArg};
pub use task::{Task, TaskTime};
pub use user::{NewUser, Passport, User};
