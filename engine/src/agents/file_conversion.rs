//! File conversion agent
//!
//! Understands requests such as `csv_to_xlsx report` or `pdf to docx` and
//! acknowledges the conversion, asking for the file to be uploaded. The
//! conversion itself happens once the upload arrives, outside this agent.

use async_trait::async_trait;
use sdk::errors::AgentError;
use sdk::Responder;
use std::fmt;

/// Conversions the agent accepts
pub const SUPPORTED: &[(Format, Format)] = &[
    (Format::Csv, Format::Xlsx),
    (Format::Xlsx, Format::Csv),
    (Format::Pdf, Format::Docx),
];

/// A document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Xlsx,
    Pdf,
    Docx,
}

impl Format {
    fn parse(s: &str) -> Option<Self> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Some(Format::Csv),
            "xlsx" => Some(Format::Xlsx),
            "pdf" => Some(Format::Pdf),
            "docx" => Some(Format::Docx),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Format::Csv => "CSV",
            Format::Xlsx => "XLSX",
            Format::Pdf => "PDF",
            Format::Docx => "DOCX",
        };
        write!(f, "{}", s)
    }
}

/// Find the first `<from>_to_<to>` token or `<from> to <to>` phrase
fn parse_pair(query: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = query.split_whitespace().collect();

    for token in &tokens {
        if let Some((from, to)) = token.to_lowercase().split_once("_to_") {
            return Some((from.to_string(), to.to_string()));
        }
    }

    tokens.windows(3).find_map(|w| {
        if w[1].eq_ignore_ascii_case("to") {
            Some((w[0].to_lowercase(), w[2].to_lowercase()))
        } else {
            None
        }
    })
}

fn supported_list() -> String {
    SUPPORTED
        .iter()
        .map(|(from, to)| format!("{} → {}", from, to))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Acknowledges file conversion requests
#[derive(Debug, Default)]
pub struct FileConversion;

impl FileConversion {
    pub fn new() -> Self {
        Self
    }

    fn usage() -> String {
        format!(
            "📄 Tell me what to convert, e.g. `/convert csv_to_xlsx` or `/convert pdf to docx`.\n\
             Supported: {}",
            supported_list()
        )
    }
}

#[async_trait]
impl Responder for FileConversion {
    fn name(&self) -> &str {
        "file_conversion"
    }

    async fn run(&self, query: &str) -> Result<String, AgentError> {
        if query.trim().is_empty() {
            return Ok(Self::usage());
        }

        let unsupported = || {
            AgentError::InvalidRequest(format!(
                "Unsupported conversion. Supported: {}",
                supported_list()
            ))
        };

        let (from, to) = parse_pair(query).ok_or_else(unsupported)?;
        let pair = Format::parse(&from).zip(Format::parse(&to));

        match pair {
            Some(pair) if SUPPORTED.contains(&pair) => Ok(format!(
                "📄 Ready to convert {} → {}. Upload the {} file and I'll send back the {}.",
                pair.0, pair.1, pair.0, pair.1
            )),
            _ => Err(unsupported()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair_forms() {
        assert_eq!(
            parse_pair("please csv_to_xlsx this"),
            Some(("csv".into(), "xlsx".into()))
        );
        assert_eq!(
            parse_pair("convert PDF to DOCX now"),
            Some(("pdf".into(), "docx".into()))
        );
        assert_eq!(parse_pair("just a file"), None);
    }

    #[tokio::test]
    async fn test_supported_pair_acknowledged() {
        let reply = FileConversion::new().run("xlsx to csv").await.unwrap();
        assert!(reply.contains("XLSX → CSV"));
        assert!(reply.contains("Upload the XLSX file"));
    }

    #[tokio::test]
    async fn test_unsupported_pair_rejected() {
        let err = FileConversion::new().run("docx_to_pdf").await.unwrap_err();
        match err {
            AgentError::InvalidRequest(msg) => assert!(msg.contains("CSV → XLSX")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(FileConversion::new().run("mp3 to wav").await.is_err());
        assert!(FileConversion::new().run("hello there").await.is_err());
    }

    #[tokio::test]
    async fn test_empty_query_shows_usage() {
        let reply = FileConversion::new().run("  ").await.unwrap();
        assert!(reply.contains("Supported:"));
    }
}
