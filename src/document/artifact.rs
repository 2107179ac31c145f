use super::RuntimeDocument;
use crate::error::DocumentError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use std::fs;
use std::io::{Read, Write};

impl RuntimeDocument {
    /// Encodes the document in the compact binary artifact format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        encode_to_vec(self, standard())
            .map_err(|e| DocumentError::Artifact(format!("Serialization failed: {}", e)))
    }

    /// Decodes and validates a binary artifact.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let document: Self = decode_from_slice(bytes, standard())
            .map(|(document, _)| document) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| DocumentError::Artifact(format!("Deserialization failed: {}", e)))?;
        document.validate()?;
        Ok(document)
    }

    /// Saves the document to a file using the binary artifact format.
    pub fn save(&self, path: &str) -> Result<(), DocumentError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| io_error(path, e))?;
        file.write_all(&bytes).map_err(|e| io_error(path, e))?;
        Ok(())
    }

    /// Loads a binary artifact from a file.
    pub fn from_file(path: &str) -> Result<Self, DocumentError> {
        let mut file = fs::File::open(path).map_err(|e| io_error(path, e))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| io_error(path, e))?;
        Self::from_bytes(&bytes)
    }

    /// Loads a document from either format, picking JSON when the path ends in `.json`.
    pub fn load(path: &str) -> Result<Self, DocumentError> {
        if path.ends_with(".json") {
            let json = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
            Self::from_json(&json)
        } else {
            Self::from_file(path)
        }
    }
}

fn io_error(path: &str, e: std::io::Error) -> DocumentError {
    DocumentError::Io {
        path: path.to_string(),
        message: e.to_string(),
    }
}
