use std::io::Read;

use flate2::{bufread::GzEncoder, Compression};
use tracing::error;

use crate::{request::Request, response_writer::ResponseWriter};

use super::BoxHandler;

/// Gzip-encodes non-empty bodies for clients that accept it.
pub fn new(next: BoxHandler) -> BoxHandler {
    Box::new(move |w: &mut ResponseWriter, r: &mut Request| {
        next(w, r);

        let body = w.get_body();
        if body.is_empty() {
            return;
        }

        if !r
            .get_header_values("accept-encoding")
            .any(|encoding| encoding.eq_ignore_ascii_case("gzip"))
        {
            return;
        }

        let Some(content_type) = w.get_content_type_header() else {
            error!("Content-Type is supposed to be present");
            return;
        };
        let content_type = content_type.to_owned();

        let mut gz = GzEncoder::new(body, Compression::fast());
        let mut buffer = vec![];
        if let Err(err) = gz.read_to_end(&mut buffer) {
            error!(?err);
            return;
        }

        w.set_body(buffer, &content_type);
        w.add_content_encoding_header("gzip");
    })
}
