use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("migration not found: {0}")]
    NotFound(String),

    #[error("migration implementation not found: {0}")]
    ImplementationNotFound(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn error_display_includes_context() {
        let e = Error::NotFound("2024_01_01_000000_create_users_table".into());
        assert_eq!(
            e.to_string(),
            "migration not found: 2024_01_01_000000_create_users_table"
        );

        let e = Error::ImplementationNotFound("CreateUsersTable".into());
        assert_eq!(
            e.to_string(),
            "migration implementation not found: CreateUsersTable"
        );

        let e = Error::Settings("store unavailable".into());
        assert_eq!(e.to_string(), "settings error: store unavailable");

        let e = Error::Other("misc".into());
        assert_eq!(e.to_string(), "misc");
    }
}
