use actix_web::{http::header, web, HttpResponse, Responder};
use clap::Parser;
use sha2::{Digest, Sha256};

pub mod cache;
pub mod dates;
pub mod sheet;

use cache::{CachedFeed, FeedCache};
use sheet::{FeedError, Rss};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>"#;

#[derive(Parser, Debug)]
#[clap(about, version, author)]
pub struct Args {
    /// Document key of the published spreadsheet.
    #[clap(short, long, env = "SPREADSHEET_KEY")]
    pub spreadsheet_key: String,

    #[clap(short, long, default_value = "0.0.0.0")]
    pub ip: String,

    #[clap(short, long, default_value = "3000", env = "PORT")]
    pub port: u16,

    /// Maximum number of feed entries.
    #[clap(short, long, default_value = "20")]
    pub limit: usize,
}

pub struct AppState {
    pub config: Args,
    pub cache: FeedCache,
}

impl AppState {
    pub fn new(config: Args) -> Self {
        Self {
            config,
            cache: FeedCache::new(),
        }
    }
}

/// Fetches the spreadsheet, renders the feed and publishes it to the cache.
pub async fn refresh(state: &AppState) -> Result<(), FeedError> {
    let url = sheet::export_url(&state.config.spreadsheet_key);
    let csv = sheet::fetch_csv(&url).await?;
    let feed = Rss::from_csv(csv.as_slice(), state.config.limit)?;
    let xml = feed.to_xml()?;
    let digest = format!("{:x}", Sha256::digest(xml.as_bytes()));

    tracing::info!(bytes = xml.len(), %digest, "feed cache refreshed");
    state
        .cache
        .publish(CachedFeed {
            body: xml.into_bytes(),
            digest,
        })
        .await;
    Ok(())
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/rss")
            .route(web::get().to(rss_feed))
            .route(web::route().to(method_not_allowed)),
    );
}

async fn rss_feed(app_data: web::Data<AppState>) -> impl Responder {
    match app_data.cache.snapshot().await {
        Some(feed) => {
            let mut body = Vec::with_capacity(XML_DECLARATION.len() + feed.body.len());
            body.extend_from_slice(XML_DECLARATION.as_bytes());
            body.extend_from_slice(&feed.body);

            HttpResponse::Ok()
                .insert_header((header::CONTENT_TYPE, "application/rss+xml"))
                .body(body)
        }
        None => HttpResponse::NotFound().finish(),
    }
}

async fn method_not_allowed() -> impl Responder {
    HttpResponse::MethodNotAllowed().finish()
}
