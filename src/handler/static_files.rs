//! Static file serving module
//!
//! Resolves a request path under the serving root and produces the file,
//! directory index, listing, redirect or error response for it.

use hyper::{Response, StatusCode};
use std::fs::Metadata;
use std::io;
use std::path::Path;
use tokio::fs;

use super::listing;
use super::resolve::{self, percent_decode};
use super::router::RequestContext;
use crate::config::AppState;
use crate::http::{self, body, cache, mime, FileBody, ResponseBody};
use crate::logger;

/// Per-request failure to produce a file; always becomes an HTTP status
#[derive(Debug)]
pub enum FileError {
    NotFound,
    PermissionDenied,
    Read(io::Error),
}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            // InvalidInput: the decoded path holds a byte no file name can contain (NUL)
            io::ErrorKind::NotFound
            | io::ErrorKind::NotADirectory
            | io::ErrorKind::InvalidInput => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Read(e),
        }
    }
}

impl FileError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::Read(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self, path: &Path) -> Response<ResponseBody> {
        let message = match &self {
            Self::NotFound => "File not found",
            Self::PermissionDenied => "Permission denied",
            Self::Read(e) => {
                logger::log_error(&format!("Failed to read '{}': {e}", path.display()));
                "Internal server error"
            }
        };
        http::build_error_response(self.status(), message)
    }
}

/// Serve whatever the request path names under the serving root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    let resolved = resolve::translate(&state.root, ctx.path);
    let fs_path = resolved.fs_path.as_path();

    let metadata = match fs::metadata(fs_path).await {
        Ok(m) => m,
        Err(e) => return FileError::from(e).into_response(fs_path),
    };

    if metadata.is_dir() {
        if !resolved.trailing_slash {
            return http::build_301_response(&slash_redirect_target(ctx.path, ctx.query));
        }
        return serve_directory(ctx, fs_path, &state.config.http.index_files).await;
    }

    // A file path with a trailing slash, or something that is not a regular file
    if resolved.trailing_slash || !metadata.is_file() {
        return FileError::NotFound.into_response(fs_path);
    }

    serve_file(ctx, fs_path, &metadata).await
}

/// Serve the first index file found in `dir`, else a generated listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    dir: &Path,
    index_files: &[String],
) -> Response<ResponseBody> {
    for index in index_files {
        let candidate = dir.join(index);
        if let Ok(metadata) = fs::metadata(&candidate).await {
            if metadata.is_file() {
                return serve_file(ctx, &candidate, &metadata).await;
            }
        }
    }

    match listing::read_entries(dir).await {
        Ok(entries) => {
            let html = listing::render(&percent_decode(ctx.path), &entries);
            http::build_listing_response(html, ctx.is_head)
        }
        Err(e) => FileError::from(e).into_response(dir),
    }
}

/// Serve a regular file, honoring `If-Modified-Since`
async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    metadata: &Metadata,
) -> Response<ResponseBody> {
    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::format_http_date);

    if let (Some(modified), Some(last_modified)) = (modified, last_modified.as_deref()) {
        if cache::is_not_modified(
            ctx.if_modified_since.as_deref(),
            ctx.has_if_none_match,
            modified,
        ) {
            return http::build_304_response(last_modified);
        }
    }

    let content_type = mime::content_type_for(path);

    // HEAD opens the file too, so an unreadable file gets the same status as for GET
    let file = match fs::File::open(path).await {
        Ok(file) => file,
        Err(e) => return FileError::from(e).into_response(path),
    };

    let length = metadata.len();
    let body = if ctx.is_head {
        body::empty()
    } else {
        FileBody::new(file, length).boxed()
    };

    http::build_file_response(
        body,
        content_type,
        length,
        last_modified.as_deref(),
        ctx.is_head,
    )
}

/// Redirect target for a directory requested without its trailing slash
fn slash_redirect_target(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) => format!("{path}/?{q}"),
        None => format!("{path}/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let not_found = FileError::from(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let denied = FileError::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let other = FileError::from(io::Error::from(io::ErrorKind::InvalidData));
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_nul_in_path_is_not_found() {
        let err = fs::metadata("missing\0name").await.unwrap_err();
        assert_eq!(FileError::from(err).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_slash_redirect_target() {
        assert_eq!(slash_redirect_target("/docs", None), "/docs/");
        assert_eq!(slash_redirect_target("/docs", Some("page=2")), "/docs/?page=2");
    }
}
