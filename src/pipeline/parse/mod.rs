mod json;

use crate::error::NormalizeError;
use crate::types::export::{ExportDocument, ExportFormat};

pub trait Parser {
    fn parse(&self, bytes: &[u8]) -> Result<ExportDocument, NormalizeError>;
}

pub fn parse(bytes: &[u8], format: ExportFormat) -> Result<ExportDocument, NormalizeError> {
    match format {
        ExportFormat::Json => json::JsonParser.parse(bytes),
    }
}
