//! Integer result codes shared by every public entry point.
//!
//! Internally each module raises its own error enum. At the container
//! boundary those errors collapse into an [`ErrorCode`], whose numeric value
//! is stable and can be handed to callers that only understand integers
//! (0 = success).

use std::fmt;

/// Stable integer result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// Operation was successful
    Success = 0,
    /// A read operation was attempted before the file was opened
    OpenFileHasNotBeenCalled = -1,
    /// The file could not be found
    FileNotFound = -10,
    /// The folder could not be found
    FolderNotFound = -11,
    /// Channel or array data is inconsistent
    InconsistentInputData = -14,
    /// The file could not be opened or created
    FileOpenError = -17,
    /// The archive does not contain a metadata document
    InvalidFormatNoXmlFoundInTar = -20,
    /// The metadata document is malformed
    InvalidFormatOfIQTarXmlContent = -21,
    /// The archive structure is invalid
    InvalidTarArchive = -22,
    /// A string that should contain XML is not well-formed
    InvalidXmlString = -28,
    /// The container does not describe any channel
    EmptyChannelInfo = -100,
    /// No array with the requested name exists
    InvalidArrayName = -101,
    /// The data entry is empty
    NoDataFoundInFile = -102,
    /// The read offset is past the available samples
    StartIndexOutOfRange = -103,
    /// The requested interval cannot be read
    InvalidDataInterval = -104,
    /// The requested value count must be even
    InvalidArraySize = -105,
    /// More bytes were written than declared
    DataOverflow = -106,
    /// A write operation was attempted before the writer was opened
    FileWriterUninitialized = -107,
    /// The element type differs from the one already written
    WrongDataType = -108,
    /// The writer is already open
    WriterAlreadyInitialized = -110,
    /// The reader is already open
    ReaderAlreadyInitialized = -111,
    /// The preview engine failed
    IqPreviewError = -2000,
    /// Catch-all for failures of lower layers
    InternalError = -99999,
}

impl ErrorCode {
    /// Every known code, in ascending declaration order.
    pub const ALL: [ErrorCode; 23] = [
        ErrorCode::Success,
        ErrorCode::OpenFileHasNotBeenCalled,
        ErrorCode::FileNotFound,
        ErrorCode::FolderNotFound,
        ErrorCode::InconsistentInputData,
        ErrorCode::FileOpenError,
        ErrorCode::InvalidFormatNoXmlFoundInTar,
        ErrorCode::InvalidFormatOfIQTarXmlContent,
        ErrorCode::InvalidTarArchive,
        ErrorCode::InvalidXmlString,
        ErrorCode::EmptyChannelInfo,
        ErrorCode::InvalidArrayName,
        ErrorCode::NoDataFoundInFile,
        ErrorCode::StartIndexOutOfRange,
        ErrorCode::InvalidDataInterval,
        ErrorCode::InvalidArraySize,
        ErrorCode::DataOverflow,
        ErrorCode::FileWriterUninitialized,
        ErrorCode::WrongDataType,
        ErrorCode::WriterAlreadyInitialized,
        ErrorCode::ReaderAlreadyInitialized,
        ErrorCode::IqPreviewError,
        ErrorCode::InternalError,
    ];

    /// Numeric value of the code.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Look up a code from its numeric value.
    pub fn from_i32(value: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.as_i32() == value)
    }

    /// Human-readable description of the code.
    pub fn describe(self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation was successful.",
            ErrorCode::OpenFileHasNotBeenCalled => {
                "The file has to be opened before data or metadata can be read."
            }
            ErrorCode::FileNotFound => "The file could not be found.",
            ErrorCode::FolderNotFound => "The specified path could not be found.",
            ErrorCode::InconsistentInputData => {
                "Input data is inconsistent (see documentation of file format requirements)."
            }
            ErrorCode::FileOpenError => "File could not be opened.",
            ErrorCode::InvalidFormatNoXmlFoundInTar => {
                "Given iq-tar file does not contain the required xml file."
            }
            ErrorCode::InvalidFormatOfIQTarXmlContent => {
                "Could not parse the xml file containing the meta data."
            }
            ErrorCode::InvalidTarArchive => "Cannot read tar archive.",
            ErrorCode::InvalidXmlString => "The specified string does not represent valid XML.",
            ErrorCode::EmptyChannelInfo => "Data read from file does not contain any channels.",
            ErrorCode::InvalidArrayName => "File does not contain a data array with the given name.",
            ErrorCode::NoDataFoundInFile => "File does not contain the requested data.",
            ErrorCode::StartIndexOutOfRange => {
                "Offset exceeds the size of the data to be read from file."
            }
            ErrorCode::InvalidDataInterval => {
                "Combination of offset and the number of values to be read defines a data interval that can not be read."
            }
            ErrorCode::InvalidArraySize => "Invalid array size. Must be divisible by 2.",
            ErrorCode::DataOverflow => "Number of bytes written exceeds specified file size.",
            ErrorCode::FileWriterUninitialized => "The file writer has not been initialized.",
            ErrorCode::WrongDataType => {
                "The type of the input data does not match the data type already written to file."
            }
            ErrorCode::WriterAlreadyInitialized => {
                "The file has already been initialized for writing data. Do not initialize twice."
            }
            ErrorCode::ReaderAlreadyInitialized => {
                "The file has already been initialized for reading data. Do not initialize twice."
            }
            ErrorCode::IqPreviewError => "Error while calculating I/Q preview.",
            ErrorCode::InternalError => "Internal coding error.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.describe(), self.as_i32())
    }
}

impl std::error::Error for ErrorCode {}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.as_i32()
    }
}

/// Collapse a result into its integer status (0 on success).
pub fn status<T>(result: &Result<T, ErrorCode>) -> i32 {
    match result {
        Ok(_) => ErrorCode::Success.as_i32(),
        Err(code) => code.as_i32(),
    }
}
