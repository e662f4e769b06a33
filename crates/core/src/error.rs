/// Errors raised while decoding values handed to the resource by an engine.
///
/// The evaluator itself never fails: a precondition that does not hold is an
/// ordinary `4.12` response, not an error. These variants only surface at the
/// decode boundary (building an [`ETag`](crate::ETag) from raw or textual
/// input, parsing a method or message type name).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlugtestError {
    /// An entity tag must carry at least one byte.
    #[error("entity tag is empty")]
    EmptyTag,

    /// An entity tag carries at most eight bytes.
    #[error("entity tag is {len} bytes long, maximum is {max}", max = crate::etag::MAX_ETAG_LEN)]
    TagTooLong { len: usize },

    /// Textual entity tag was not valid hex.
    #[error("entity tag is not valid hex: {0}")]
    InvalidTagEncoding(String),

    #[error("unknown request method: {0}")]
    UnknownMethod(String),

    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    #[error("invalid message id: {0}")]
    InvalidMessageId(String),
}
