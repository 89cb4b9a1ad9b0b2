//! `quire request` - dispatch one GET through the in-process routes.

use tracing::{debug, instrument};

use quire_core::application::{Cancellation, Module as _, Response};

use crate::{
    cli::RequestArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    site::Site,
};

#[instrument(skip_all, fields(path = %args.path))]
pub fn execute(
    args: RequestArgs,
    mut config: AppConfig,
    output: OutputManager,
    cancel: &Cancellation,
) -> CliResult<()> {
    config.apply_sources(&args.source);
    let site = Site::open(&config)?;
    let (module, routes) = site.serve(cancel)?;

    let response = routes.request(&args.path, cancel);
    debug!(status = response.status, bytes = response.body.len(), "request served");

    if !args.body_only {
        for line in head(&response) {
            output.data(&line)?;
        }
        output.data("")?;
    }
    output.bytes(&response.body)?;
    module.stop()?;

    if response.is_success() {
        Ok(())
    } else {
        Err(CliError::RequestFailed {
            path: args.path,
            status: response.status,
        })
    }
}

/// Status line and headers, HTTP style.
fn head(response: &Response) -> Vec<String> {
    let mut lines = vec![
        format!("HTTP {}", response.status),
        format!("Content-Type: {}", response.content_type),
    ];
    if let Some(cache) = &response.cache_control {
        lines.push(format!("Cache-Control: {cache}"));
    }
    lines.push(format!("Content-Length: {}", response.body.len()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_lists_headers() {
        let response = Response::html("<p>hi</p>".into(), 300);
        assert_eq!(
            head(&response),
            vec![
                "HTTP 200",
                "Content-Type: text/html; charset=utf-8",
                "Cache-Control: public, max-age=300",
                "Content-Length: 9",
            ]
        );
    }

    #[test]
    fn uncached_errors_skip_cache_header() {
        let err = quire_core::application::ApplicationError::ArticleNotFound { slug: "x".into() };
        let response = Response::from_error(&err.into());
        let lines = head(&response);
        assert_eq!(lines[0], "HTTP 404");
        assert!(!lines.iter().any(|l| l.starts_with("Cache-Control")));
    }
}
