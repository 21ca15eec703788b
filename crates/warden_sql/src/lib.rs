pub mod sql;

pub use sql::postgres::PostgresClient;
