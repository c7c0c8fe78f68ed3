#![deny(unsafe_code)]

use std::path::PathBuf;

use sheetmap_model::TargetTable;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML schema {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported schema {name} version {version}")]
    UnsupportedSchema { name: String, version: u32 },

    #[error("target table '{table}' is not defined")]
    MissingTable { table: TargetTable },

    #[error("target table '{table}' is defined more than once")]
    DuplicateTable { table: TargetTable },

    #[error("column '{column}' is defined more than once in '{table}'")]
    DuplicateColumn { table: TargetTable, column: String },

    #[error("column '{table}.{column}' has no usable header patterns")]
    EmptyPatterns { table: TargetTable, column: String },

    #[error("column '{table}.{column}' references unknown column '{target}'")]
    UnknownReference {
        table: TargetTable,
        column: String,
        target: String,
    },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
