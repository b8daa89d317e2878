use log::error;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Command specification `{}` is unbalanced", .spec)]
    UnbalancedGrammar { spec: String },

    #[error(
        "Command specification `{}` has a permutation group with {} branches (limit is {})",
        .spec,
        .branches,
        .limit
    )]
    TooManyBranches {
        spec: String,
        branches: usize,
        limit: usize,
    },

    #[error("Cannot merge tree rooted at `{}` into tree rooted at `{}`", .source_keyword, .target_keyword)]
    RootMismatch {
        target_keyword: String,
        source_keyword: String,
    },

    #[error("No nested shell is registered as `{}`", .0)]
    UnknownMode(String),

    #[error("{}", .0)]
    Command(String),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),
}

impl Error {
    pub fn unbalanced(spec: &str) -> Self {
        error!("Unbalanced command specification: {spec:?}");
        Self::UnbalancedGrammar {
            spec: spec.to_string(),
        }
    }

    /// Shorthand for a handler failure the shell loop reports and recovers from.
    pub fn command<S: Into<String>>(message: S) -> Self {
        Self::Command(message.into())
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
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
