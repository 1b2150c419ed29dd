use sfbulk_core::{ClientError, Credentials};
use sfbulk_soap::{SoapClient, SoapConfig, endpoint_from_wsdl, endpoint_from_wsdl_str};

const WSDL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions targetNamespace="urn:enterprise.soap.sforce.com"
    xmlns="http://schemas.xmlsoap.org/wsdl/"
    xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/">
  <service name="SforceService">
    <documentation>Sforce SOAP API</documentation>
    <port binding="tns:SoapBinding" name="Soap">
      <soap:address location="https://test.salesforce.com/services/Soap/c/58.0"/>
    </port>
  </service>
</definitions>"#;

#[test]
fn endpoint_comes_from_soap_address() {
    assert_eq!(
        endpoint_from_wsdl_str(WSDL).unwrap(),
        "https://test.salesforce.com/services/Soap/c/58.0"
    );
}

#[test]
fn wsdl_without_address_is_config_error() {
    let err = endpoint_from_wsdl_str("<definitions><service/></definitions>").unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}

#[test]
fn client_prefers_wsdl_endpoint() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, WSDL.as_bytes()).unwrap();

    assert_eq!(
        endpoint_from_wsdl(file.path()).unwrap(),
        "https://test.salesforce.com/services/Soap/c/58.0"
    );

    let mut config = SoapConfig::new(Credentials::new("u", "p", "t"));
    config.wsdl_file = Some(file.path().to_path_buf());
    let client = SoapClient::new(config).unwrap();
    assert_eq!(client.endpoint(), "https://test.salesforce.com/services/Soap/c/58.0");
}

#[test]
fn client_falls_back_to_versioned_login_endpoint() {
    let config = SoapConfig::new(Credentials::new("u", "p", "t"));
    let client = SoapClient::new(config).unwrap();
    assert_eq!(
        client.endpoint(),
        "https://login.salesforce.com/services/Soap/c/59.0"
    );
}
