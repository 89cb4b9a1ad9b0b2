//! In-process route table.
//!
//! A [`Router`] that keeps mounted handlers in registration order and
//! dispatches GET requests to them without a network server. Used by the
//! `quire request` command and by integration tests.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use quire_core::{
    application::{
        ApplicationError, Cancellation,
        ports::{Handler, Request, Response, Router},
        services::WILDCARD_PARAM,
    },
    error::QuireError,
};

struct Route {
    segments: Vec<Segment>,
    handler: Handler,
}

#[derive(Debug, PartialEq)]
enum Segment {
    Literal(String),
    Param(String),
    /// Trailing `*`, matches the rest of the path.
    Rest,
}

/// Routes matched first-registered-first.
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Parse `target` (path plus optional query string) and dispatch it.
    pub fn request(&self, target: &str, cancel: &Cancellation) -> Response {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let mut request = Request::new(path).with_cancel(cancel.clone());
        request.query = parse_query(query);
        self.dispatch(request)
    }

    /// Fill in path parameters from the first matching route and call it.
    #[instrument(skip_all, fields(path = %request.path))]
    pub fn dispatch(&self, mut request: Request) -> Response {
        for route in &self.routes {
            if let Some(params) = match_segments(&route.segments, &request.path) {
                request.params.extend(params);
                return (route.handler)(&request);
            }
        }

        debug!("no route matched");
        let err: QuireError = ApplicationError::RouteNotFound {
            path: request.path.clone(),
        }
        .into();
        Response::from_error(&err)
    }
}

impl Router for RouteTable {
    fn get(&mut self, pattern: &str, handler: Handler) {
        debug!(pattern, "route mounted");
        self.routes.push(Route {
            segments: parse_pattern(pattern),
            handler,
        });
    }
}

/// `/blog/{slug}/` → `["blog", {slug}, ""]`. The empty last segment keeps
/// trailing slashes significant.
fn parse_pattern(pattern: &str) -> Vec<Segment> {
    let trimmed = pattern.strip_prefix('/').unwrap_or(pattern);
    trimmed
        .split('/')
        .map(|part| {
            if part == "*" {
                Segment::Rest
            } else if let Some(name) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Segment::Param(name.to_string())
            } else {
                Segment::Literal(part.to_string())
            }
        })
        .collect()
}

fn match_segments(segments: &[Segment], path: &str) -> Option<BTreeMap<String, String>> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let parts: Vec<&str> = trimmed.split('/').collect();
    let mut params = BTreeMap::new();

    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Rest => {
                let rest = parts.get(i..)?.join("/");
                if rest.is_empty() {
                    return None;
                }
                params.insert(WILDCARD_PARAM.to_string(), decode(&rest));
                return Some(params);
            }
            Segment::Literal(literal) => {
                if parts.get(i)? != literal {
                    return None;
                }
            }
            Segment::Param(name) => {
                let value = parts.get(i)?;
                if value.is_empty() {
                    return None;
                }
                params.insert(name.clone(), decode(value));
            }
        }
    }

    (parts.len() == segments.len()).then_some(params)
}

fn parse_query(query: &str) -> BTreeMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(&key.replace('+', " ")), decode(&value.replace('+', " ")))
        })
        .collect()
}

/// Percent-decode. Malformed escapes are kept as written.
fn decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3).and_then(|h| std::str::from_utf8(h).ok());
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn echo(tag: &'static str) -> Handler {
        Arc::new(move |req: &Request| {
            let params: Vec<String> = req
                .params
                .iter()
                .chain(req.query.iter())
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            Response::html(format!("{tag} {}", params.join(",")), 0)
        })
    }

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table.get("/", echo("root"));
        table.get("/blog/", echo("list"));
        table.get("/blog/{slug}", echo("post"));
        table.get("/blog/{slug}/", echo("post/"));
        table.get("/assets/*", echo("asset"));
        table
    }

    fn body(table: &RouteTable, target: &str) -> String {
        table
            .request(target, &Cancellation::new())
            .body_text()
            .into_owned()
    }

    #[test]
    fn literal_routes() {
        let t = table();
        assert_eq!(body(&t, "/"), "root ");
        assert_eq!(body(&t, "/blog/"), "list ");
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn trailing_slash_is_significant() {
        let t = table();
        assert_eq!(body(&t, "/blog/hello"), "post slug=hello");
        assert_eq!(body(&t, "/blog/hello/"), "post/ slug=hello");
    }

    #[test]
    fn wildcard_takes_the_rest() {
        let t = table();
        assert_eq!(body(&t, "/assets/css/site.css"), "asset *=css/site.css");
        assert_eq!(t.request("/assets/", &Cancellation::new()).status, 404);
    }

    #[test]
    fn query_and_params_are_decoded() {
        let t = table();
        assert_eq!(
            body(&t, "/blog/caf%C3%A9?q=rust+lang&x=%2525"),
            "post slug=café,q=rust lang,x=%25"
        );
    }

    #[test]
    fn unmatched_is_404() {
        let res = table().request("/nope/deeper", &Cancellation::new());
        assert_eq!(res.status, 404);
        assert!(res.body_text().contains("/nope/deeper"));
    }

    #[test]
    fn pattern_parsing() {
        assert_eq!(
            parse_pattern("/a/{b}/*"),
            vec![
                Segment::Literal("a".into()),
                Segment::Param("b".into()),
                Segment::Rest
            ]
        );
    }

    #[test]
    fn malformed_escape_kept() {
        assert_eq!(decode("100%zz"), "100%zz");
        assert_eq!(decode("%4"), "%4");
    }
}
