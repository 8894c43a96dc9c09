use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Json {
        action: String,
        file_description: String,
        path: String,
        original: serde_json::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Malformed wait command `{}`: expected `wait <amount> <unit>`", .0)]
    MalformedWait(String),

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),
}

impl Error {
    pub fn json_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_json::Error,
    ) -> Self {
        Self::Json {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }
}
