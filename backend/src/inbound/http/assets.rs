//! Static front-end assets.
//!
//! Files are read through a `cap_std` directory handle opened once at
//! startup, so a request path can never reach outside the public root.

use std::io;
use std::path::Path;
use std::sync::Arc;

use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse, web};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use crate::domain::Error;
use crate::inbound::http::ApiResult;

const INDEX: &str = "index.html";
const NOT_FOUND_MESSAGE: &str = "Not found";

/// Capability handle on the public asset root.
#[derive(Clone)]
pub struct PublicAssets {
    root: Arc<Dir>,
}

impl PublicAssets {
    /// Open `path` as the asset root.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory cannot be opened.
    pub fn open(path: &Path) -> io::Result<Self> {
        Dir::open_ambient_dir(path, ambient_authority()).map(Self::from_dir)
    }

    pub fn from_dir(dir: Dir) -> Self {
        Self {
            root: Arc::new(dir),
        }
    }

    fn read(&self, relative: &str) -> io::Result<Vec<u8>> {
        self.root.read(relative)
    }
}

/// Map a request path onto a file inside the root.
fn asset_path(request_path: &str) -> String {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed.is_empty() {
        INDEX.to_owned()
    } else if trimmed.ends_with('/') {
        format!("{trimmed}{INDEX}")
    } else {
        trimmed.to_owned()
    }
}

fn content_type_for(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    match extension {
        "html" => "text/html; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Serve a file from the public root; anything unreadable is a 404.
pub async fn serve_asset(
    assets: web::Data<PublicAssets>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return Err(Error::not_found(NOT_FOUND_MESSAGE));
    }
    let relative = asset_path(req.path());
    let lookup = relative.clone();
    let store = assets.get_ref().clone();
    let contents = web::block(move || store.read(&lookup))
        .await
        .map_err(|err| Error::internal(format!("asset read was cancelled: {err}")))?;
    match contents {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type(content_type_for(&relative))
            .body(bytes)),
        Err(err) => {
            debug!(path = %relative, error = %err, "asset unavailable");
            Err(Error::not_found(NOT_FOUND_MESSAGE))
        }
    }
}
