//! Query-string extraction and validation.
//!
//! A missing `domain` and a malformed one are deliberately indistinguishable
//! to the caller: both produce the same 400 message.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::whois::error::{LookupError, DOMAIN_INVALID, FORMAT_INVALID};

static DOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("domain pattern is valid")
});

/// Raw `domain` / `format` parameters as they arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupQuery {
    pub domain: Option<String>,
    pub format: Option<String>,
}

impl LookupQuery {
    /// Parse a raw query string. The first occurrence of a key wins.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut parsed = Self::default();
        let Some(query) = query else {
            return parsed;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "domain" if parsed.domain.is_none() => parsed.domain = Some(value.into_owned()),
                "format" if parsed.format.is_none() => parsed.format = Some(value.into_owned()),
                _ => {}
            }
        }
        parsed
    }

    /// Validate both parameters, domain first.
    pub fn validate(&self) -> Result<(DomainName, OutputFormat), LookupError> {
        let domain = DomainName::parse(self.domain.as_deref())?;
        let format = OutputFormat::parse(self.format.as_deref())?;
        Ok((domain, format))
    }
}

/// A syntactically plausible hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainName(String);

impl DomainName {
    pub fn parse(raw: Option<&str>) -> Result<Self, LookupError> {
        match raw {
            Some(raw) if DOMAIN_PATTERN.is_match(raw) => Ok(Self(raw.to_string())),
            _ => Err(LookupError::InvalidInput(DOMAIN_INVALID)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Representation requested from the provider and returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
}

impl OutputFormat {
    /// Absent or empty means JSON; anything else must match exactly.
    pub fn parse(raw: Option<&str>) -> Result<Self, LookupError> {
        match raw {
            None | Some("") | Some("json") => Ok(OutputFormat::Json),
            Some("xml") => Ok(OutputFormat::Xml),
            Some(_) => Err(LookupError::InvalidInput(FORMAT_INVALID)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Xml => "application/xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
