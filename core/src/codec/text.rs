use std::io::Write;

use crate::codec::{DecodeError, Document, DocumentRef, EncodeError, Header};

pub(crate) fn write<W>(document: &DocumentRef, writer: W) -> Result<(), EncodeError>
where
  W: Write,
{
  serde_json::to_writer_pretty(writer, document).map_err(|err| {
    let cause = err.to_string();
    if err.is_io() {
      EncodeError::Io { cause }
    } else {
      EncodeError::Text { cause }
    }
  })
}

pub(crate) fn read_header(bytes: &[u8]) -> Result<Header, DecodeError> {
  serde_json::from_slice(bytes).map_err(|err| DecodeError::Text {
    cause: err.to_string(),
  })
}

pub(crate) fn read_document(bytes: &[u8]) -> Result<Document, DecodeError> {
  serde_json::from_slice(bytes).map_err(|err| DecodeError::Text {
    cause: err.to_string(),
  })
}
