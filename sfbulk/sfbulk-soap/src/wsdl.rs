use std::{fs, path::Path};

use sfbulk_core::ClientError;

use crate::xml::parse_document;

/// Read the login endpoint (`soap:address location`) from an enterprise WSDL.
pub fn endpoint_from_wsdl(path: &Path) -> Result<String, ClientError> {
    let text = fs::read_to_string(path).map_err(|e| {
        ClientError::Config(format!("cannot read WSDL {}: {e}", path.display()))
    })?;
    endpoint_from_wsdl_str(&text)
}

pub fn endpoint_from_wsdl_str(wsdl: &str) -> Result<String, ClientError> {
    let definitions = parse_document(wsdl)?;
    definitions
        .find("address")
        .and_then(|address| address.attribute("location"))
        .map(str::to_string)
        .ok_or_else(|| ClientError::Config("WSDL has no soap:address location".to_string()))
}
