use anyhow::{anyhow, Result};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::reader::Reader;
use std::str;

/// Counts the entries of a Depth 1 PROPFIND multistatus response, leaving out
/// the response describing the listed collection itself.
pub fn count_collection_entries(xml_text: &str, collection_path: &str) -> Result<usize> {
    let collection = normalize_href(collection_path);
    let hrefs = parse_response_hrefs(xml_text)?;

    Ok(hrefs
        .iter()
        .filter(|href| normalize_href(href) != collection)
        .count())
}

/// Extracts the `href` of every `response` element in document order.
pub fn parse_response_hrefs(xml_text: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml_text);
    reader.config_mut().trim_text(true);

    let mut hrefs = Vec::new();
    let mut in_response = false;
    let mut in_href = false;
    let mut saw_multistatus = false;
    let mut current_href = String::new();
    let mut depth = 0usize;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                match get_local_name(&e)?.as_str() {
                    "multistatus" => saw_multistatus = true,
                    "response" => {
                        in_response = true;
                        current_href.clear();
                    }
                    "href" if in_response => in_href = true,
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if in_href {
                    current_href.push_str(&e.unescape()?);
                }
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                match get_local_name_from_end(&e)?.as_str() {
                    "href" => in_href = false,
                    "response" => {
                        if !current_href.trim().is_empty() {
                            hrefs.push(current_href.trim().to_string());
                        }
                        in_response = false;
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("XML parsing error: {}", e)),
            _ => {}
        }

        buf.clear();
    }

    if depth != 0 {
        return Err(anyhow!("Truncated multistatus response"));
    }

    if !saw_multistatus {
        return Err(anyhow!("Response is not a WebDAV multistatus document"));
    }

    Ok(hrefs)
}

/// Reduces an href (absolute URL or path) to a decoded path without a
/// trailing slash.
fn normalize_href(href: &str) -> String {
    let path = match url::Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => href.to_string(),
    };

    let decoded = urlencoding::decode(&path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(path);

    decoded.trim_end_matches('/').to_string()
}

fn get_local_name(e: &BytesStart) -> Result<String> {
    let qname = e.name();
    let local = qname.local_name();
    let name = str::from_utf8(local.as_ref())
        .map_err(|e| anyhow!("Invalid UTF-8 in element name: {}", e))?;
    Ok(name.to_string())
}

fn get_local_name_from_end(e: &BytesEnd) -> Result<String> {
    let qname = e.name();
    let local = qname.local_name();
    let name = str::from_utf8(local.as_ref())
        .map_err(|e| anyhow!("Invalid UTF-8 in element name: {}", e))?;
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<?xml version="1.0"?>
        <d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/dav/product_images/</d:href>
                <d:propstat>
                    <d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
                    <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
            </d:response>
            <d:response>
                <d:href>/dav/product_images/shoe.jpg</d:href>
                <d:propstat>
                    <d:prop><d:displayname>shoe.jpg</d:displayname><d:resourcetype/></d:prop>
                    <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
            </d:response>
            <d:response>
                <d:href>/dav/product_images/Summer%20Sale/</d:href>
                <d:propstat>
                    <d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
                    <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
            </d:response>
        </d:multistatus>"#;

    #[test]
    fn test_collection_itself_is_not_counted() {
        assert_eq!(count_collection_entries(LISTING, "/dav/product_images/").unwrap(), 2);
        assert_eq!(count_collection_entries(LISTING, "/dav/product_images").unwrap(), 2);
    }

    #[test]
    fn test_absolute_and_encoded_hrefs_match_collection() {
        let xml = r#"<D:multistatus xmlns:D="DAV:">
            <D:response><D:href>https://h/My%20Files/</D:href></D:response>
            <D:response><D:href>https://h/My%20Files/a.txt</D:href></D:response>
        </D:multistatus>"#;
        assert_eq!(count_collection_entries(xml, "/My Files/").unwrap(), 1);
    }

    #[test]
    fn test_empty_collection() {
        let xml = r#"<d:multistatus xmlns:d="DAV:">
            <d:response><d:href>/files/</d:href></d:response>
        </d:multistatus>"#;
        assert_eq!(count_collection_entries(xml, "/files/").unwrap(), 0);
    }

    #[test]
    fn test_non_multistatus_body_is_an_error() {
        assert!(count_collection_entries("<html><body>Login</body></html>", "/").is_err());
        assert!(count_collection_entries("<d:multistatus><d:response>", "/").is_err());
    }
}
