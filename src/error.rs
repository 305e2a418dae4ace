use std::{fmt::Display, sync::Arc};

use actix_web::{http::StatusCode, HttpResponse};

use crate::ErrorResponse;

pub trait IntoAppError<R> {
    fn into_app_err<'a>(
        self,
        info: impl Into<Arc<str>>,
        kind: AppErrorKind,
        extra_details: &'a [&'a str],
    ) -> R;
}

/// Boundary error of the service. `info` is the only part that ever reaches a
/// client, `detailed_info` stays in the logs.
#[derive(Debug, Clone)]
pub struct AppError {
    kind: AppErrorKind,
    info: Arc<str>,
    detailed_info: Arc<str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppErrorKind {
    Api,
    Extraction,
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{kind}\nINFO: {info}\n{details}",
            kind = self.kind,
            info = self.info,
            details = self.detailed_info
        )
    }
}

impl Display for AppErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Self::Api => "API ERROR",
            Self::Extraction => "EXTRACTION ERROR",
        };

        write!(f, "{str}")
    }
}

impl<E: Display> IntoAppError<AppError> for E {
    fn into_app_err<'a>(
        self,
        info: impl Into<Arc<str>>,
        kind: AppErrorKind,
        extra_details: &'a [&'a str],
    ) -> AppError {
        let app_err = AppError {
            kind,
            info: info.into(),
            detailed_info: AppError::format_detailed_info(self, extra_details),
        };

        log::error!("{app_err}");
        app_err
    }
}

impl<T, E> IntoAppError<Result<T, AppError>> for Result<T, E>
where
    E: IntoAppError<AppError>,
{
    fn into_app_err<'a>(
        self,
        info: impl Into<Arc<str>>,
        kind: AppErrorKind,
        extra_details: &'a [&'a str],
    ) -> Result<T, AppError> {
        self.map_err(|err| err.into_app_err(info, kind, extra_details))
    }
}

impl AppError {
    pub fn new(kind: AppErrorKind, info: impl Into<Arc<str>>, extra_details: &[&str]) -> Self {
        let app_err = Self {
            kind,
            info: info.into(),
            detailed_info: AppError::format_detailed_info("", extra_details),
        };

        log::error!("{app_err}");
        app_err
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            AppErrorKind::Api => StatusCode::BAD_REQUEST,
            AppErrorKind::Extraction => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.info.to_string(),
        })
    }

    fn format_detailed_info<D: Display>(err: D, extra_details: &[&str]) -> Arc<str> {
        format!(
            "DETAILS:\n{extra}{err}",
            err = if err.to_string().is_empty() {
                "".to_owned()
            } else {
                format!("\n\nERROR: {err}")
            },
            extra = extra_details.join("\n")
        )
        .into()
    }
}
