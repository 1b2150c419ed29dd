//! Request envelopes of the enterprise SOAP API.

use quick_xml::escape::escape;
use sfbulk_core::FieldValues;

const SOAPENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const ENTERPRISE_NS: &str = "urn:enterprise.soap.sforce.com";
const SOBJECT_NS: &str = "urn:sobject.enterprise.soap.sforce.com";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Headers carried by an envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headers<'a> {
    pub session_id: Option<&'a str>,
    pub batch_size: Option<u32>,
}

/// Wrap a body fragment in a SOAP envelope with the given headers.
pub fn envelope(headers: Headers<'_>, body: &str) -> String {
    let mut header = String::new();
    if let Some(session_id) = headers.session_id {
        header.push_str(&format!(
            "<urn:SessionHeader><urn:sessionId>{}</urn:sessionId></urn:SessionHeader>",
            escape(session_id)
        ));
    }
    if let Some(size) = headers.batch_size {
        header.push_str(&format!(
            "<urn:QueryOptions><urn:batchSize>{size}</urn:batchSize></urn:QueryOptions>"
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <soapenv:Envelope xmlns:soapenv=\"{SOAPENV_NS}\" xmlns:urn=\"{ENTERPRISE_NS}\" \
         xmlns:urn1=\"{SOBJECT_NS}\" xmlns:xsi=\"{XSI_NS}\">\
         <soapenv:Header>{header}</soapenv:Header>\
         <soapenv:Body>{body}</soapenv:Body>\
         </soapenv:Envelope>"
    )
}

pub fn login(user: &str, password: &str) -> String {
    format!(
        "<urn:login><urn:username>{}</urn:username><urn:password>{}</urn:password></urn:login>",
        escape(user),
        escape(password)
    )
}

pub fn logout() -> String {
    "<urn:logout/>".to_string()
}

pub fn describe_sobject(object_type: &str) -> String {
    format!(
        "<urn:describeSObject><urn:sObjectType>{}</urn:sObjectType></urn:describeSObject>",
        escape(object_type)
    )
}

pub fn describe_global() -> String {
    "<urn:describeGlobal/>".to_string()
}

/// `operation` is `query` or `queryAll`.
pub fn query(operation: &str, query: &str) -> String {
    format!(
        "<urn:{operation}><urn:queryString>{}</urn:queryString></urn:{operation}>",
        escape(query)
    )
}

pub fn query_more(locator: &str) -> String {
    format!(
        "<urn:queryMore><urn:queryLocator>{}</urn:queryLocator></urn:queryMore>",
        escape(locator)
    )
}

pub fn create(object_type: &str, fields: &FieldValues) -> String {
    format!(
        "<urn:create>{}</urn:create>",
        sobject(object_type, None, fields)
    )
}

pub fn update(object_type: &str, id: &str, fields: &FieldValues) -> String {
    format!(
        "<urn:update>{}</urn:update>",
        sobject(object_type, Some(id), fields)
    )
}

pub fn delete(id: &str) -> String {
    format!("<urn:delete><urn:ids>{}</urn:ids></urn:delete>", escape(id))
}

fn sobject(object_type: &str, id: Option<&str>, fields: &FieldValues) -> String {
    let mut out = format!(
        "<urn:sObjects xsi:type=\"urn1:{}\">",
        escape(object_type)
    );
    if let Some(id) = id {
        out.push_str(&format!("<urn1:Id>{}</urn1:Id>", escape(id)));
    }
    for (name, value) in fields.iter() {
        out.push_str(&format!("<urn1:{name}>{}</urn1:{name}>", escape(value)));
    }
    out.push_str("</urn:sObjects>");
    out
}
