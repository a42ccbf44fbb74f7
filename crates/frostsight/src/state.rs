use frostsight_core::Result;
use serde::Serialize;

/// Outcome of one page fetch as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum FetchState<T> {
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> FetchState<T> {
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(v) => Self::Loaded(v),
            Err(e) => Self::Error(e.to_string()),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> FetchState<Vec<T>> {
    /// Rows to render; loading and failed fetches render as an empty table.
    pub fn rows(&self) -> &[T] {
        self.data().map(Vec::as_slice).unwrap_or(&[])
    }
}
