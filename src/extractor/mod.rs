use std::path::Path;

use anyhow::anyhow;
use tokio::process::Command;

use crate::error::{AppError, AppErrorKind, IntoAppError};

pub mod descriptor;
pub mod format_preset;

pub use descriptor::{MediaDescriptor, MediaFormat};
pub use format_preset::FormatPreset;

// Spoofed browser identity to reduce bot-detection friction on the video host.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const REFERER: &str = "https://www.youtube.com/";
const EXTRA_HEADERS: [&str; 3] = [
    "Accept:text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    "Accept-Language:en-us,en;q=0.5",
    "Sec-Fetch-Mode:navigate",
];

/// Immutable configuration for the extraction tool, built once at startup and
/// handed to the handlers through `AppData`.
#[derive(Debug, Clone)]
pub struct YtDlpConfig {
    pub binary: String,
    pub user_agent: String,
    pub referer: String,
    pub headers: Vec<String>,
}

impl YtDlpConfig {
    pub fn from_env() -> Self {
        Self {
            binary: std::env::var("YTDLP_PATH").unwrap_or_else(|_| find_ytdlp()),
            user_agent: USER_AGENT.to_owned(),
            referer: REFERER.to_owned(),
            headers: EXTRA_HEADERS.iter().map(|header| (*header).to_owned()).collect(),
        }
    }
}

fn find_ytdlp() -> String {
    let common_paths = [
        "/opt/homebrew/bin/yt-dlp",
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
    ];

    for path in common_paths {
        if Path::new(path).exists() {
            return path.to_owned();
        }
    }

    "yt-dlp".to_owned()
}

#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    config: YtDlpConfig,
}

impl YtDlpExtractor {
    pub fn new(config: YtDlpConfig) -> Self {
        Self { config }
    }

    /// Resolve `url` into a [`MediaDescriptor`] without downloading any media.
    ///
    /// The tool performs all network I/O; the call is awaited without a
    /// timeout, so a hanging upstream resolution blocks this request only.
    pub async fn extract(
        &self,
        url: &str,
        preset: Option<FormatPreset>,
    ) -> Result<MediaDescriptor, AppError> {
        let stdout = match self.dump_json(url, preset).await {
            Ok(stdout) => stdout,
            Err(err) => {
                let raw = err.to_string();
                return Err(AppError::new(
                    AppErrorKind::Extraction,
                    user_message(&raw),
                    &[&format!("URL: {url}"), &format!("TOOL OUTPUT: {}", raw.trim())],
                ));
            }
        };

        serde_json::from_slice(&stdout).into_app_err(
            "No se pudo interpretar la respuesta del extractor",
            AppErrorKind::Extraction,
            &[&format!("URL: {url}")],
        )
    }

    // `--add-header` is repeatable, one FIELD:VALUE per flag.
    fn build_args(&self, url: &str, preset: Option<FormatPreset>) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_owned(),
            "--no-playlist".to_owned(),
            "--no-warnings".to_owned(),
            "--quiet".to_owned(),
            "--user-agent".to_owned(),
            self.config.user_agent.clone(),
            "--referer".to_owned(),
            self.config.referer.clone(),
        ];

        for header in &self.config.headers {
            args.push("--add-header".to_owned());
            args.push(header.clone());
        }

        if let Some(preset) = preset {
            args.push("-f".to_owned());
            args.push(preset.selector().to_owned());
        }

        args.push(url.to_owned());
        args
    }

    async fn dump_json(&self, url: &str, preset: Option<FormatPreset>) -> anyhow::Result<Vec<u8>> {
        let args = self.build_args(url, preset);

        let out = Command::new(&self.config.binary).args(&args).output().await?;

        if out.status.code().unwrap_or(1) != 0 {
            return Err(anyhow!(String::from_utf8(out.stderr).unwrap_or(
                "failed to parse stderr of extraction tool".to_owned()
            )));
        }

        Ok(out.stdout)
    }
}

/// Map the tool's raw error output to the message shown to clients.
///
/// Known host-side rejections get a friendly text; anything else surfaces the
/// tool's own `ERROR:` line.
fn user_message(raw: &str) -> String {
    if raw.contains("Sign in to confirm") || raw.contains("bot") {
        return "YouTube está bloqueando la descarga. Intenta con otro video o más tarde."
            .to_owned();
    }

    if raw.contains("Video unavailable") {
        return "Video no disponible o privado".to_owned();
    }

    if raw.contains("This video is not available") {
        return "Este video no está disponible en tu región".to_owned();
    }

    raw.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("ERROR:").map(|rest| rest.trim().to_owned()))
        .unwrap_or_else(|| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                "extraction tool failed without output".to_owned()
            } else {
                trimmed.to_owned()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_args_uses_repeatable_singular_header_flag() {
        let extractor = YtDlpExtractor::new(YtDlpConfig {
            binary: "yt-dlp".to_owned(),
            user_agent: "test-agent".to_owned(),
            referer: "https://www.youtube.com/".to_owned(),
            headers: vec![
                "Accept:text/html".to_owned(),
                "Sec-Fetch-Mode:navigate".to_owned(),
            ],
        });

        let url = "https://youtube.com/watch?v=HYd9B6YvIHM";
        let args = extractor.build_args(url, Some(FormatPreset::Mp3));

        let header_flag_positions: Vec<usize> = args
            .iter()
            .enumerate()
            .filter(|(_, arg)| *arg == "--add-header")
            .map(|(pos, _)| pos)
            .collect();

        assert_eq!(header_flag_positions.len(), 2);
        assert_eq!(args[header_flag_positions[0] + 1], "Accept:text/html");
        assert_eq!(args[header_flag_positions[1] + 1], "Sec-Fetch-Mode:navigate");

        // the plural spelling is not a yt-dlp option
        assert_eq!(args.iter().any(|arg| arg == "--add-headers"), false);

        assert_eq!(args.last().map(String::as_str), Some(url));
    }

    #[test]
    fn test_build_args_appends_preset_selector() {
        let extractor = YtDlpExtractor::new(YtDlpConfig {
            binary: "yt-dlp".to_owned(),
            user_agent: "test-agent".to_owned(),
            referer: "https://www.youtube.com/".to_owned(),
            headers: Vec::new(),
        });

        let args = extractor.build_args("https://youtu.be/abc", Some(FormatPreset::Mp4));
        let format_flag = args.iter().position(|arg| arg == "-f").unwrap();
        assert_eq!(args[format_flag + 1], FormatPreset::Mp4.selector());

        let args = extractor.build_args("https://youtu.be/abc", None);
        assert_eq!(args.iter().any(|arg| arg == "-f"), false);
    }

    #[test]
    fn test_user_message_rewrites_known_host_rejections() {
        assert_eq!(
            user_message("ERROR: [youtube] abc: Sign in to confirm you're not a bot"),
            "YouTube está bloqueando la descarga. Intenta con otro video o más tarde."
        );

        assert_eq!(
            user_message("ERROR: [youtube] abc: Video unavailable. This video is private"),
            "Video no disponible o privado"
        );

        assert_eq!(
            user_message(
                "ERROR: [youtube] abc: This video is not available in your country"
            ),
            "Este video no está disponible en tu región"
        );
    }

    #[test]
    fn test_user_message_surfaces_unknown_error_line() {
        let raw = "WARNING: some noise\nERROR: Unsupported URL: ftp://nope";
        assert_eq!(user_message(raw), "Unsupported URL: ftp://nope");
    }

    #[test]
    fn test_user_message_falls_back_to_raw_output() {
        assert_eq!(user_message("  connection reset by peer  "), "connection reset by peer");
        assert_eq!(user_message("   "), "extraction tool failed without output");
    }
}
