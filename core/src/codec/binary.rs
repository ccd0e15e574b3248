use std::io::Write;

use crate::codec::{DecodeError, Document, DocumentRef, EncodeError, Header};

pub(crate) fn write<W>(document: &DocumentRef, writer: W) -> Result<(), EncodeError>
where
  W: Write,
{
  ciborium::ser::into_writer(document, writer).map_err(|err| match err {
    ciborium::ser::Error::Io(err) => EncodeError::Io {
      cause: err.to_string(),
    },
    ciborium::ser::Error::Value(cause) => EncodeError::Binary { cause },
  })
}

pub(crate) fn read_header(bytes: &[u8]) -> Result<Header, DecodeError> {
  ciborium::de::from_reader(bytes).map_err(|err| DecodeError::Binary {
    cause: err.to_string(),
  })
}

pub(crate) fn read_document(bytes: &[u8]) -> Result<Document, DecodeError> {
  ciborium::de::from_reader(bytes).map_err(|err| DecodeError::Binary {
    cause: err.to_string(),
  })
}
