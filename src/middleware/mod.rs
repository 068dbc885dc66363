use crate::{request::Request, response_writer::ResponseWriter, server::Handler};

pub mod gzip_compressor;
pub mod logger;

pub type BoxHandler = Box<dyn Fn(&mut ResponseWriter, &mut Request) + Send + Sync>;

type Wrapper = Box<dyn Fn(BoxHandler) -> BoxHandler + Send + Sync>;

pub fn boxed(handler: impl Handler + Send + Sync + 'static) -> BoxHandler {
    Box::new(move |w: &mut ResponseWriter, r: &mut Request| handler.handle(w, r))
}

/// An ordered list of handler wrappers.
///
/// The first wrapper added is the outermost: it sees the request first and
/// the response last.
#[derive(Default)]
pub struct Middleware {
    wrappers: Vec<Wrapper>,
}

impl Middleware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        wrapper: impl Fn(BoxHandler) -> BoxHandler + Send + Sync + 'static,
    ) -> Self {
        self.wrappers.push(Box::new(wrapper));
        self
    }

    pub fn then(&self, handler: impl Handler + Send + Sync + 'static) -> BoxHandler {
        self.wrappers
            .iter()
            .rev()
            .fold(boxed(handler), |next, wrap| wrap(next))
    }
}
