use actix_cors::Cors;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use log::LevelFilter;

use video_downloader_api::extractor::{YtDlpConfig, YtDlpExtractor};
use video_downloader_api::routes::{get_download_url, get_video_info, health_check, home};
use video_downloader_api::AppData;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let addr;
    if cfg!(not(debug_assertions)) {
        addr = dotenv::var("API_ADDRESS_PROD")
            .expect("environment variable 'API_ADDRESS_PROD' should exist for production builds");

        simple_logging::log_to_file("info.log", LevelFilter::Info)
            .expect("logger should not fail to initialize");
    } else {
        addr = dotenv::var("API_ADDRESS_DEV")
            .expect("environment variable 'API_ADDRESS_DEV' should exist for debug builds");

        simple_logging::log_to_stderr(LevelFilter::Info);
    };

    let config = YtDlpConfig::from_env();
    log::info!("using extraction tool at '{}'", config.binary);

    let data = Data::new(AppData::new(YtDlpExtractor::new(config)));

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(data.clone())
            .wrap(cors)
            .service(home)
            .service(health_check)
            .service(get_video_info)
            .service(get_download_url)
    })
    .bind((addr, 5000))?
    .run()
    .await
}
