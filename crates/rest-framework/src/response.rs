//! # Response Envelope
//!
//! [`HttpResponse`] is what every service call resolves to: status, headers, the decoded
//! body (absent for empty responses) and any hypermedia controls the backend attached.
//!
//! The backend may answer either with a bare JSON body or wrapped as
//! `{"content": <body>, "controls": <OpenAPI fragment>}`. Both shapes decode to the same
//! `HttpResponse`; the wrapper's `controls` are kept next to the body.

use crate::error::FrameworkError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

pub const LINK_HEADER: &str = "link";
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// A decoded response: status, headers, optional body and optional controls.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse<B> {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Option<B>,
    pub controls: Option<Value>,
}

impl<B> HttpResponse<B> {
    /// A `200 OK` response carrying `body`.
    pub fn ok(body: B) -> Self {
        Self {
            status: 200,
            headers: HeaderMap::new(),
            body: Some(body),
            controls: None,
        }
    }

    /// A response without body, e.g. `204 No Content`.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
            controls: None,
        }
    }

    /// Adds a header; invalid names or values are skipped.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_controls(mut self, controls: Value) -> Self {
        self.controls = Some(controls);
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn into_body(self) -> Option<B> {
        self.body
    }

    pub fn map<U>(self, f: impl FnOnce(B) -> U) -> HttpResponse<U> {
        HttpResponse {
            status: self.status,
            headers: self.headers,
            body: self.body.map(f),
            controls: self.controls,
        }
    }

    /// Page numbers announced by the `Link` header, keyed by relation (`next`, `last`, …).
    ///
    /// A response without the header yields an empty map.
    pub fn links(&self) -> Result<BTreeMap<String, u32>, FrameworkError> {
        match self.headers.get(LINK_HEADER) {
            None => Ok(BTreeMap::new()),
            Some(value) => {
                let value = value
                    .to_str()
                    .map_err(|e| FrameworkError::InvalidLink(e.to_string()))?;
                parse_links(value)
            }
        }
    }

    /// Total number of records on the server, from `X-Total-Count`.
    pub fn total_count(&self) -> Option<u64> {
        self.headers
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }

    /// Paging reported inside the envelope's controls, if any.
    pub fn page_controls(&self) -> Option<PageControls> {
        self.controls.as_ref().and_then(PageControls::from_controls)
    }
}

/// Paging the backend announces in an envelope's `controls` rather than in headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControls {
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: Option<u32>,
}

impl PageControls {
    /// Finds `currentPage` and `totalPages` (and `pageSize`, when present) at any depth
    /// of `controls`.
    pub fn from_controls(controls: &Value) -> Option<Self> {
        Some(Self {
            current_page: find_u32(controls, "currentPage")?,
            total_pages: find_u32(controls, "totalPages")?,
            page_size: find_u32(controls, "pageSize"),
        })
    }

    /// The relations a `Link` header would carry for this page.
    pub fn links(&self) -> BTreeMap<String, u32> {
        let mut links = BTreeMap::new();
        let Some(last) = self.total_pages.checked_sub(1) else {
            return links;
        };
        links.insert("first".to_string(), 0);
        links.insert("last".to_string(), last);
        if self.current_page < last {
            links.insert("next".to_string(), self.current_page + 1);
        }
        if self.current_page > 0 {
            links.insert("prev".to_string(), self.current_page - 1);
        }
        links
    }
}

fn find_u32(value: &Value, key: &str) -> Option<u32> {
    match value {
        Value::Object(map) => map
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .or_else(|| map.values().find_map(|v| find_u32(v, key))),
        Value::Array(items) => items.iter().find_map(|v| find_u32(v, key)),
        _ => None,
    }
}

/// Parses a pagination `Link` header into `rel -> page`.
///
/// `<api/orders?page=1&size=20>; rel="next",<api/orders?page=4&size=20>; rel="last"`
/// becomes `{"last": 4, "next": 1}`.
pub fn parse_links(header: &str) -> Result<BTreeMap<String, u32>, FrameworkError> {
    if header.trim().is_empty() {
        return Err(FrameworkError::InvalidLink("header is empty".to_string()));
    }

    let mut links = BTreeMap::new();
    for part in header.split(',') {
        let mut section = part.split(';');
        let (Some(url), Some(rel), None) = (section.next(), section.next(), section.next()) else {
            return Err(FrameworkError::InvalidLink(format!(
                "section could not be split on ';': {part}"
            )));
        };

        let url = url.trim().trim_start_matches('<').trim_end_matches('>');
        let rel = rel
            .trim()
            .strip_prefix("rel=")
            .map(|r| r.trim_matches('"'))
            .ok_or_else(|| FrameworkError::InvalidLink(format!("missing rel in: {part}")))?;

        let query = url.split_once('?').map(|(_, q)| q).unwrap_or_default();
        let page = query
            .split('&')
            .find_map(|kv| kv.strip_prefix("page="))
            .ok_or_else(|| FrameworkError::InvalidLink(format!("missing page in: {url}")))?
            .parse::<u32>()
            .map_err(|e| FrameworkError::InvalidLink(format!("bad page in {url}: {e}")))?;

        links.insert(rel.to_string(), page);
    }
    Ok(links)
}

/// An undecoded response as produced by a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// A JSON response serialized from `value`.
    pub fn json(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// Turns non-2xx statuses into errors. `path` names the requested resource.
    pub fn error_for_status(self, path: &str) -> Result<Self, FrameworkError> {
        if (200..300).contains(&self.status) {
            return Ok(self);
        }
        if self.status == 404 {
            return Err(FrameworkError::NotFound(path.to_string()));
        }

        let message = match self.body.trim() {
            "" => StatusCode::from_u16(self.status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("unknown status")
                .to_string(),
            text => text.to_string(),
        };
        Err(FrameworkError::Status {
            status: self.status,
            message,
        })
    }

    /// Decodes the body (bare or wrapped in a `content`/`controls` envelope).
    pub fn decode<B: DeserializeOwned>(self) -> Result<HttpResponse<B>, FrameworkError> {
        let (content, controls) = self.split()?;
        let body = match content {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                serde_json::from_value(value).map_err(|e| FrameworkError::Decode(e.to_string()))?,
            ),
        };
        Ok(HttpResponse {
            status: self.status,
            headers: self.headers,
            body,
            controls,
        })
    }

    /// Drops the body, keeping status, headers and controls.
    pub fn decode_empty(self) -> HttpResponse<()> {
        let controls = self.split().ok().and_then(|(_, controls)| controls);
        HttpResponse {
            status: self.status,
            headers: self.headers,
            body: None,
            controls,
        }
    }

    fn split(&self) -> Result<(Option<Value>, Option<Value>), FrameworkError> {
        if self.body.trim().is_empty() {
            return Ok((None, None));
        }
        let value: Value =
            serde_json::from_str(&self.body).map_err(|e| FrameworkError::Decode(e.to_string()))?;
        let (content, controls) = split_envelope(value);
        Ok((Some(content), controls))
    }
}

fn split_envelope(value: Value) -> (Value, Option<Value>) {
    match value {
        Value::Object(mut map)
            if map.contains_key("content")
                && map.keys().all(|k| k == "content" || k == "controls") =>
        {
            let controls = map.remove("controls").filter(|c| !c.is_null());
            let content = map.remove("content").unwrap_or(Value::Null);
            (content, controls)
        }
        other => (other, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        id: u32,
    }

    #[test]
    fn decodes_bare_body() {
        let raw = RawResponse::json(200, &json!([{"id": 1}, {"id": 2}]));
        let res: HttpResponse<Vec<Item>> = raw.decode().unwrap();
        assert_eq!(res.body, Some(vec![Item { id: 1 }, Item { id: 2 }]));
        assert!(res.controls.is_none());
    }

    #[test]
    fn decodes_hypermedia_envelope() {
        let raw = RawResponse::json(
            200,
            &json!({"content": {"id": 7}, "controls": {"paths": {"/customers/7": {}}}}),
        );
        let res: HttpResponse<Item> = raw.decode().unwrap();
        assert_eq!(res.body, Some(Item { id: 7 }));
        assert_eq!(res.controls, Some(json!({"paths": {"/customers/7": {}}})));
    }

    #[test]
    fn empty_and_null_bodies_decode_to_none() {
        let res: HttpResponse<Vec<Item>> = RawResponse::new(200, "").decode().unwrap();
        assert!(res.body.is_none());

        let res: HttpResponse<Item> = RawResponse::json(200, &json!({"content": null, "controls": {}}))
            .decode()
            .unwrap();
        assert!(res.body.is_none());
        assert_eq!(res.controls, Some(json!({})));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let res = RawResponse::new(200, "not json").decode::<Item>();
        assert!(matches!(res, Err(FrameworkError::Decode(_))));
    }

    #[test]
    fn error_for_status_classifies() {
        assert!(RawResponse::new(204, "").error_for_status("api/x/1").is_ok());
        assert_eq!(
            RawResponse::new(404, "").error_for_status("api/x/1"),
            Err(FrameworkError::NotFound("api/x/1".to_string()))
        );
        assert_eq!(
            RawResponse::new(500, "").error_for_status("api/x"),
            Err(FrameworkError::Status {
                status: 500,
                message: "Internal Server Error".to_string()
            })
        );
        assert_eq!(
            RawResponse::new(400, "idexists").error_for_status("api/x"),
            Err(FrameworkError::Status {
                status: 400,
                message: "idexists".to_string()
            })
        );
    }

    #[test]
    fn page_controls_are_found_in_envelope() {
        let raw = RawResponse::json(
            200,
            &json!({
                "content": [{"id": 1}],
                "controls": {"paths": {"/orders": {"get": {"currentPage": 0, "totalPages": 3}}}}
            }),
        );
        let res: HttpResponse<Vec<Item>> = raw.decode().unwrap();
        let page = res.page_controls().unwrap();
        assert_eq!(
            page,
            PageControls {
                current_page: 0,
                total_pages: 3,
                page_size: None
            }
        );
        let links = page.links();
        assert_eq!(links.get("next"), Some(&1));
        assert_eq!(links.get("last"), Some(&2));
        assert_eq!(links.get("prev"), None);
    }

    #[test]
    fn controls_without_paging_yield_none() {
        let res = HttpResponse::ok(()).with_controls(json!({"paths": {}}));
        assert!(res.page_controls().is_none());
        let empty = PageControls {
            current_page: 0,
            total_pages: 0,
            page_size: None,
        };
        assert!(empty.links().is_empty());
    }

    #[test]
    fn parses_link_header() {
        let header = r#"<api/orders?page=1&size=20>; rel="next",<api/orders?page=4&size=20>; rel="last",<api/orders?page=0&size=20>; rel="first""#;
        let links = parse_links(header).unwrap();
        assert_eq!(links.get("next"), Some(&1));
        assert_eq!(links.get("last"), Some(&4));
        assert_eq!(links.get("first"), Some(&0));
    }

    #[test]
    fn rejects_malformed_link_header() {
        assert!(parse_links("").is_err());
        assert!(parse_links("link;link").is_err());
        assert!(parse_links("<api/orders?size=20>; rel=\"next\"").is_err());
    }

    #[test]
    fn response_headers_expose_links_and_total() {
        let res = HttpResponse::ok(Vec::<Item>::new())
            .with_header("Link", r#"<api/orders?page=2&size=5>; rel="next""#)
            .with_header("X-Total-Count", "42");
        assert_eq!(res.links().unwrap().get("next"), Some(&2));
        assert_eq!(res.total_count(), Some(42));
        assert!(HttpResponse::<()>::empty(204).links().unwrap().is_empty());
    }
}
