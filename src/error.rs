use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

///Failures propagate and stop the run; there is no retry or recovery layer.
#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("postgres error: {0}")]
    Postgres(#[from] postgres::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("config error: {0}")]
    Config(String),
}
