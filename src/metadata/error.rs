use crate::error::ErrorCode;

/// Errors that can occur while building or parsing the metadata document
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// XML tokenizer error
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// Attribute could not be decoded
    #[error("XML attribute error: {0}")]
    AttrError(#[from] quick_xml::events::attributes::AttrError),

    /// Text was not valid UTF-8
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// Document structure does not match the container schema
    #[error("Invalid metadata document: {0}")]
    InvalidFormat(String),

    /// A mandatory element is missing
    #[error("Missing mandatory element <{0}>")]
    MissingField(&'static str),

    /// A mandatory element holds an unusable value
    #[error("Invalid value '{value}' for <{field}>")]
    InvalidValue {
        /// Element name
        field: &'static str,
        /// Offending text
        value: String,
    },

    /// A string that must be embedded as XML is not well-formed
    #[error("Not a well-formed XML string: {0}")]
    InvalidXmlString(String),

    /// The document describes no channel
    #[error("No channel described")]
    EmptyChannelInfo,
}

impl MetadataError {
    /// Integer code reported at the container boundary
    pub fn code(&self) -> ErrorCode {
        match self {
            MetadataError::InvalidXmlString(_) => ErrorCode::InvalidXmlString,
            MetadataError::EmptyChannelInfo => ErrorCode::EmptyChannelInfo,
            _ => ErrorCode::InvalidFormatOfIQTarXmlContent,
        }
    }
}
