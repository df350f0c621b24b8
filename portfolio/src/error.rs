use crate::contact::ContactError;
use crate::database::CacheError;
use crate::models::Notice;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown collection {0}")]
    UnknownCollection(String),

    #[error("Project {0} not found")]
    ProjectNotFound(String),

    #[error(transparent)]
    Contact(#[from] ContactError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::UnknownCollection(_) | AppError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Contact(ContactError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Contact(ContactError::Busy) => StatusCode::CONFLICT,
            AppError::Contact(_) => StatusCode::BAD_GATEWAY,
            AppError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn notice(&self) -> Notice {
        match self {
            AppError::UnknownCollection(name) => {
                Notice::error("Not Found", format!("There is no {name} collection."))
            }
            AppError::ProjectNotFound(_) => {
                Notice::error("Project Not Found", "This project does not exist.")
            }
            AppError::Contact(e) => e.notice(),
            AppError::Cache(_) => Notice::error("Oops!", "Something went wrong."),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        (status, Json(self.notice())).into_response()
    }
}
