use std::time::Instant;

use tracing::info;

use crate::{request::Request, response_writer::ResponseWriter};

use super::BoxHandler;

pub fn new(next: BoxHandler) -> BoxHandler {
    Box::new(move |w: &mut ResponseWriter, r: &mut Request| {
        let start = Instant::now();
        next(w, r);
        info!(
            status = w.get_status_code().unwrap_or(200),
            elapsed_us = start.elapsed().as_micros() as u64,
            "request handled"
        );
    })
}
