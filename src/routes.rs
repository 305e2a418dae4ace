use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppErrorKind},
    extractor::{FormatPreset, MediaFormat},
    AppData,
};

const MAX_VIDEO_FORMATS: usize = 5;
const MAX_AUDIO_FORMATS: usize = 3;

#[derive(Debug, Deserialize)]
pub struct VideoInfoRequest {
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct VideoInfoResponse {
    title: Option<Arc<str>>,
    thumbnail: Option<Arc<str>>,
    duration: Option<f64>,
    video_formats: Vec<VideoFormatEntry>,
    audio_formats: Vec<AudioFormatEntry>,
}

#[derive(Debug, Serialize)]
struct VideoFormatEntry {
    format_id: Option<Arc<str>>,
    ext: Option<Arc<str>>,
    quality: u64,
    filesize: u64,
}

#[derive(Debug, Serialize)]
struct AudioFormatEntry {
    format_id: Option<Arc<str>>,
    ext: Option<Arc<str>>,
    abr: f64,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    url: Option<String>,
    format: Option<String>,
}

#[derive(Debug, Serialize)]
struct DownloadResponse {
    download_url: Arc<str>,
    title: Option<Arc<str>>,
    ext: Arc<str>,
}

#[derive(Debug, Serialize)]
struct ServiceDescriptor {
    message: &'static str,
    version: &'static str,
    status: &'static str,
    endpoints: EndpointListing,
}

#[derive(Debug, Serialize)]
struct EndpointListing {
    health: &'static str,
    info: &'static str,
    download: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    message: &'static str,
}

#[get("/")]
pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json(ServiceDescriptor {
        message: "YouTube Downloader API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        endpoints: EndpointListing {
            health: "/health",
            info: "/api/info (POST)",
            download: "/api/download (POST)",
        },
    })
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok",
        message: "Server is running",
    })
}

#[post("/api/info")]
pub async fn get_video_info(
    data: web::Data<AppData>,
    web::Json(VideoInfoRequest { url }): web::Json<VideoInfoRequest>,
) -> HttpResponse {
    let Some(url) = required_url(&url) else {
        return AppError::new(AppErrorKind::Api, "URL requerida", &[]).to_response();
    };

    let info = match data.extractor().extract(url, None).await {
        Ok(info) => info,
        Err(err) => return err.to_response(),
    };

    let (video_formats, audio_formats) = partition_formats(&info.formats);

    HttpResponse::Ok().json(VideoInfoResponse {
        title: info.title,
        thumbnail: info.thumbnail,
        duration: info.duration,
        video_formats,
        audio_formats,
    })
}

#[post("/api/download")]
pub async fn get_download_url(
    data: web::Data<AppData>,
    web::Json(DownloadRequest { url, format }): web::Json<DownloadRequest>,
) -> HttpResponse {
    let Some(url) = required_url(&url) else {
        return AppError::new(AppErrorKind::Api, "URL requerida", &[]).to_response();
    };

    if is_incomplete_watch_url(url) {
        return AppError::new(
            AppErrorKind::Api,
            "URL de YouTube inválida o incompleta",
            &[&format!("URL: {url}")],
        )
        .to_response();
    }

    let requested_format = format.unwrap_or_else(|| "mp4".to_owned());
    let preset = FormatPreset::from_request(&requested_format);

    let info = match data.extractor().extract(url, Some(preset)).await {
        Ok(info) => info,
        Err(err) => return err.to_response(),
    };

    let Some(download_url) = info.resolve_download_url() else {
        return AppError::new(
            AppErrorKind::Extraction,
            "No se pudo obtener URL de descarga",
            &[&format!("URL: {url}")],
        )
        .to_response();
    };

    HttpResponse::Ok().json(DownloadResponse {
        download_url,
        title: info.title,
        // when the tool reports no extension, echo the requested format back
        ext: info.ext.unwrap_or_else(|| requested_format.as_str().into()),
    })
}

fn required_url(url: &Option<String>) -> Option<&str> {
    url.as_deref().filter(|url| !url.is_empty())
}

/// Heuristic rejection of watch URLs whose video id is missing, e.g.
/// `watch?v=` or `watch?v=null` produced by a broken frontend.
fn is_incomplete_watch_url(url: &str) -> bool {
    url.contains("v=null") || url.ends_with("v=")
}

fn partition_formats(
    formats: &[MediaFormat],
) -> (Vec<VideoFormatEntry>, Vec<AudioFormatEntry>) {
    let video_formats = formats
        .iter()
        .filter(|format| format.has_video() && format.has_audio())
        .take(MAX_VIDEO_FORMATS)
        .map(|format| VideoFormatEntry {
            format_id: format.format_id.clone(),
            ext: format.ext.clone(),
            quality: format.height.unwrap_or(0),
            filesize: format.filesize.unwrap_or(0),
        })
        .collect();

    let audio_formats = formats
        .iter()
        .filter(|format| format.has_audio() && !format.has_video())
        .take(MAX_AUDIO_FORMATS)
        .map(|format| AudioFormatEntry {
            format_id: format.format_id.clone(),
            ext: format.ext.clone(),
            abr: format.abr.unwrap_or(0.0),
        })
        .collect();

    (video_formats, audio_formats)
}
