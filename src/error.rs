use std::fmt;

/// Which input document a merge failure refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentRole {
    Draft,
    Donor,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRole::Draft => write!(f, "draft"),
            DocumentRole::Donor => write!(f, "donor"),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// Record rejected before layout begins (e.g. empty NI PPPK).
    InvalidRecord(String),
    /// Template rejected before layout begins (e.g. no articles).
    InvalidTemplate(String),
    /// Failure while assembling the PDF.
    Pdf(String),
    /// One of the merge inputs is not a well-formed PDF.
    Load(DocumentRole, lopdf::Error),
    /// The donor document has no pages to copy.
    EmptyDonor,
    /// A collaborator (record store, validator, archive) failed.
    External(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidRecord(msg) => write!(f, "invalid record: {msg}"),
            Error::InvalidTemplate(msg) => write!(f, "invalid template: {msg}"),
            Error::Pdf(msg) => write!(f, "PDF error: {msg}"),
            Error::Load(role, e) => write!(f, "cannot load {role} document: {e}"),
            Error::EmptyDonor => write!(f, "donor document has no pages"),
            Error::External(msg) => write!(f, "external collaborator failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Load(_, e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
