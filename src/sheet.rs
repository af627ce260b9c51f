use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates::{format_rfc822, parse_date};

pub const TITLE: &str = "Federal Government 2017";
pub const LINK: &str = "http://jlord.us/federal-gov/";
pub const DESCRIPTION: &str = "Summaries of events from the US Government.";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("invalid csv: {0}")]
    Parse(#[from] csv::Error),
    #[error("spreadsheet has no data rows")]
    EmptyInput,
    #[error("feed serialization failed: {0}")]
    Serialize(#[from] quick_xml::SeError),
}

pub fn export_url(key: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{key}/export?format=csv")
}

pub async fn fetch_csv(url: &str) -> Result<Vec<u8>, FeedError> {
    let response = reqwest::get(url).await?;
    Ok(response.bytes().await?.to_vec())
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename = "rss")]
pub struct Rss {
    #[serde(rename = "@version")]
    pub version: String,
    pub channel: Channel,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub title: String,
    pub link: String,
    pub description: String,
    #[serde(rename = "item", default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "pubDate", default, skip_serializing_if = "String::is_empty")]
    pub pub_date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
}

impl Rss {
    /// Builds a feed from raw CSV, keeping at most `limit` of the newest
    /// rows. Rows are presumed appended chronologically, so the last row
    /// becomes the first item.
    pub fn from_csv<R: Read>(reader: R, limit: usize) -> Result<Self, FeedError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let records = rdr.records().collect::<Result<Vec<_>, _>>()?;

        if records.len() < 2 {
            return Err(FeedError::EmptyInput);
        }

        let headers = &records[0];
        let rows = &records[1..];
        let start = rows.len().saturating_sub(limit);
        let items = rows[start..]
            .iter()
            .rev()
            .map(|row| Item::from_record(headers, row))
            .collect();

        Ok(Rss {
            version: "2.0".into(),
            channel: Channel {
                title: TITLE.into(),
                link: LINK.into(),
                description: DESCRIPTION.into(),
                items,
            },
        })
    }

    pub fn to_xml(&self) -> Result<String, FeedError> {
        Ok(quick_xml::se::to_string(self)?)
    }
}

impl Item {
    fn from_record(headers: &StringRecord, fields: &StringRecord) -> Self {
        // Rows shorter than the header read as empty fields.
        let get = |i: usize| fields.get(i).unwrap_or("").to_string();

        let mut item = Item::default();
        let mut categories = Vec::new();
        for (i, name) in headers.iter().enumerate() {
            match name {
                "date" => item.pub_date = format_rfc822(parse_date(&get(i))),
                "description" => item.title = get(i),
                "article" => item.link = get(i),
                "activity" | "branch" => categories.push(get(i)),
                "detail" => item.description = get(i),
                _ => {}
            }
        }
        item.category = categories.join(",");
        item
    }
}
