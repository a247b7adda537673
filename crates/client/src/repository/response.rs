//! Repository contents API response envelope and decoding.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;

use showdetails_core::ShowDetails;

use super::RepositoryError;

/// Raw response from the contents-by-path endpoint.
///
/// `content` is base64, wrapped at 60 columns with `\n`.
#[derive(Debug, Deserialize)]
pub struct ContentEnvelope {
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
}

impl ContentEnvelope {
    /// Decode the wrapped content to UTF-8 text.
    pub fn decode_text(&self) -> Result<String, RepositoryError> {
        if let Some(encoding) = self.encoding.as_deref()
            && !encoding.eq_ignore_ascii_case("base64")
        {
            return Err(RepositoryError::Decode(format!("unsupported encoding: {encoding}")));
        }

        let compact: String = self.content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;

        String::from_utf8(bytes).map_err(|e| RepositoryError::Decode(e.to_string()))
    }

    /// Decode and parse the wrapped document.
    pub fn into_show_details(self) -> Result<ShowDetails, RepositoryError> {
        let text = self.decode_text()?;
        let details: ShowDetails =
            serde_json::from_str(text.trim_start_matches('\u{feff}')).map_err(|e| RepositoryError::Parse(e.to_string()))?;

        if details.show_id.trim().is_empty() {
            return Err(RepositoryError::Parse("showId is empty".into()));
        }

        Ok(details)
    }
}
