use crate::app::ports::HttpClientPort;
use crate::error::{Result, StationError};
use crate::types::RawMetadataRow;
use csv::ReaderBuilder;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Downloads the tab-delimited station metadata feed.
pub struct MetadataFetcher {
    http: Arc<dyn HttpClientPort>,
    url: String,
}

impl MetadataFetcher {
    pub fn new(http: Arc<dyn HttpClientPort>, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Fetch and parse the feed into data rows.
    ///
    /// Transport failures and non-success statuses yield an empty list; only
    /// an unparseable body is an error.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<Vec<RawMetadataRow>> {
        let resp = match self.http.get(&self.url).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Metadata feed unavailable: {}", e);
                return Ok(Vec::new());
            }
        };
        if !resp.is_success() {
            warn!("Metadata feed responded with status {}", resp.status);
            return Ok(Vec::new());
        }

        let rows = parse_feed(&resp.bytes)?;
        info!("Fetched {} metadata rows ({} bytes)", rows.len(), resp.bytes.len());
        Ok(rows)
    }
}

/// Parse a tab-delimited feed body, dropping the header and footer lines.
///
/// Fields are decoded lossily, so a stray non-UTF-8 byte only mangles the
/// field it sits in.
pub fn parse_feed(body: &[u8]) -> Result<Vec<RawMetadataRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut rows = Vec::new();
    for (i, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|e| StationError::FeedParse(format!("line {}: {}", i + 1, e)))?;
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect::<RawMetadataRow>(),
        );
    }

    if rows.len() < 2 {
        return Ok(Vec::new());
    }
    rows.pop();
    rows.remove(0);
    Ok(rows)
}
