//! Wire format of tagged package messages.
//!
//! A package message is an ordinary email sent from the service mailbox to
//! itself. Two custom headers identify it:
//!
//! ```text
//! project-name: Demo
//! project-version: 1.0
//! ```
//!
//! The body is a multipart/mixed message with a plain-text signature part
//! and exactly one `application/zip` attachment. The attachment filename is
//! informational only; install directories are derived from the headers.

use lettre::message::header::{ContentType, Header, HeaderName, HeaderValue};
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;
use mailparse::{MailHeaderMap, ParsedMail};

use crate::{MailpackError, Result};

pub const PROJECT_NAME_HEADER: &str = "project-name";
pub const PROJECT_VERSION_HEADER: &str = "project-version";

/// Content type of the archive attachment.
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// Decorative text part; never parsed.
pub const SIGNATURE: &str = "Sent by mailpack. This message carries a project archive.";

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProjectNameHeader(String);

impl Header for ProjectNameHeader {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str(PROJECT_NAME_HEADER)
    }

    fn parse(s: &str) -> std::result::Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProjectVersionHeader(String);

impl Header for ProjectVersionHeader {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str(PROJECT_VERSION_HEADER)
    }

    fn parse(s: &str) -> std::result::Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

/// Addressing and tags of a package message, without its attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEnvelope {
    pub address: String,
    pub subject: String,
    pub project_name: String,
    pub project_version: String,
}

impl TaggedEnvelope {
    /// Envelope sent from `address` to itself, tagged with `subject` as the
    /// project name.
    pub fn new(address: &str, subject: &str, version: &str) -> Self {
        Self {
            address: address.to_string(),
            subject: subject.to_string(),
            project_name: subject.to_string(),
            project_version: version.to_string(),
        }
    }

    /// Render the full RFC 5322 message, optionally carrying an archive.
    pub fn render(&self, attachment: Option<(&str, Vec<u8>)>) -> Result<Vec<u8>> {
        let mailbox: Mailbox = self.address.parse().map_err(|e| {
            MailpackError::Config(format!("Invalid mailbox address \"{}\": {}", self.address, e))
        })?;
        let content_type = ContentType::parse(ARCHIVE_CONTENT_TYPE)
            .map_err(|e| MailpackError::Malformed(e.to_string()))?;

        let mut body = MultiPart::mixed().singlepart(SinglePart::plain(SIGNATURE.to_string()));
        if let Some((file_name, data)) = attachment {
            body = body.singlepart(Attachment::new(file_name.to_string()).body(data, content_type));
        }

        let message = Message::builder()
            .from(mailbox.clone())
            .to(mailbox)
            .subject(self.subject.clone())
            .header(ProjectNameHeader(self.project_name.clone()))
            .header(ProjectVersionHeader(self.project_version.clone()))
            .multipart(body)
            .map_err(|e| MailpackError::Malformed(e.to_string()))?;

        Ok(message.formatted())
    }
}

/// Header-only view of a tagged message, as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub project_name: String,
    pub project_version: String,
    pub subject: Option<String>,
}

impl HeaderView {
    /// Parse a raw header block.
    ///
    /// Returns `None` unless both project headers are present and
    /// non-empty; unparseable input is treated the same way.
    pub fn parse(raw: &[u8]) -> Option<Self> {
        let (headers, _) = match mailparse::parse_headers(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("Skipping unparseable header block: {}", e);
                return None;
            }
        };

        let project_name = non_empty(headers.get_first_value(PROJECT_NAME_HEADER))?;
        let project_version = non_empty(headers.get_first_value(PROJECT_VERSION_HEADER))?;

        Some(Self {
            project_name,
            project_version,
            subject: headers.get_first_value("Subject"),
        })
    }

    pub fn matches(&self, name: &str, version: &str) -> bool {
        self.project_name == name && self.project_version == version
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// An archive pulled out of a fully fetched package message.
#[derive(Clone, PartialEq, Eq)]
pub struct ProjectArchiveInfo {
    pub file_name: String,
    pub project_name: String,
    pub version: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for ProjectArchiveInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectArchiveInfo")
            .field("file_name", &self.file_name)
            .field("project_name", &self.project_name)
            .field("version", &self.version)
            .field("data", &format_args!("{} bytes", self.data.len()))
            .finish()
    }
}

impl ProjectArchiveInfo {
    /// Locate the archive part of a full message.
    ///
    /// `Ok(None)` when the message is not a tagged message or carries no
    /// archive part.
    pub fn from_message(raw: &[u8]) -> Result<Option<Self>> {
        let mail = mailparse::parse_mail(raw)
            .map_err(|e| MailpackError::Malformed(e.to_string()))?;

        let project_name = non_empty(mail.headers.get_first_value(PROJECT_NAME_HEADER));
        let version = non_empty(mail.headers.get_first_value(PROJECT_VERSION_HEADER));
        let (project_name, version) = match (project_name, version) {
            (Some(name), Some(version)) => (name, version),
            _ => return Ok(None),
        };

        let part = match find_archive_part(&mail) {
            Some(part) => part,
            None => return Ok(None),
        };

        let file_name = part
            .get_content_disposition()
            .params
            .get("filename")
            .cloned()
            .or_else(|| part.ctype.params.get("name").cloned())
            .unwrap_or_else(|| format!("{}.zip", project_name));
        let data = part
            .get_body_raw()
            .map_err(|e| MailpackError::Malformed(e.to_string()))?;

        Ok(Some(Self {
            file_name,
            project_name,
            version,
            data,
        }))
    }
}

fn find_archive_part<'a>(mail: &'a ParsedMail<'a>) -> Option<&'a ParsedMail<'a>> {
    if mail.ctype.mimetype.eq_ignore_ascii_case(ARCHIVE_CONTENT_TYPE) {
        return Some(mail);
    }
    mail.subparts.iter().find_map(find_archive_part)
}
