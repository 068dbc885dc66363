use std::{
    borrow::Cow,
    collections::HashMap,
    io::{BufRead, BufReader, ErrorKind, Read, Take},
};

use thiserror::Error;
use tracing::debug;

use crate::router::Params;

const REQUEST_LINE_LIMIT: u64 = 1024;
const HEADERS_LIMIT: u64 = 8 * 1024;
const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug)]
struct RequestLine<'a> {
    line: &'a str,
}

impl<'a> RequestLine<'a> {
    fn new(line: &'a str) -> Self {
        Self { line }
    }

    fn part(&self, idx: usize) -> &'a str {
        self.line.split(' ').nth(idx).unwrap_or_default()
    }

    fn http_method(&self) -> &'a str {
        self.part(0)
    }

    fn request_target(&self) -> &'a str {
        self.part(1)
    }

    fn http_version(&self) -> &'a str {
        self.part(2)
    }
}

#[derive(Debug)]
pub struct Request {
    request_line: String,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
    params: Params,
}

impl Request {
    pub fn new(
        request_line: String,
        headers: HashMap<String, String>,
        body: Option<Vec<u8>>,
    ) -> Self {
        Self {
            request_line,
            headers,
            body,
            params: Params::default(),
        }
    }

    pub fn get_http_method(&self) -> &str {
        RequestLine::new(&self.request_line).http_method()
    }

    pub fn get_request_target(&self) -> &str {
        RequestLine::new(&self.request_line).request_target()
    }

    /// The percent-decoded request target without its query string.
    ///
    /// A path that does not decode to UTF-8 is returned as sent.
    pub fn get_path(&self) -> Cow<'_, str> {
        let target = self.get_request_target();
        let path = target.split_once('?').map_or(target, |(path, _)| path);
        urlencoding::decode(path).unwrap_or(Cow::Borrowed(path))
    }

    pub fn get_http_version(&self) -> &str {
        RequestLine::new(&self.request_line).http_version()
    }

    /// Path parameters extracted by the router for this request.
    ///
    /// Empty when the matched route declares no parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub(crate) fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers.get(&key.to_lowercase()).map(|v| v.as_str())
    }

    pub fn get_header_values(&self, key: &str) -> impl Iterator<Item = &str> + '_ {
        self.get_header(key)
            .into_iter()
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn get_body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

#[derive(Error, Debug)]
#[error("end of file")]
pub struct EndOfFile;

#[derive(Error, Debug)]
#[error("invalid request")]
pub struct InvalidRequest;

pub struct RequestReader<R> {
    buf_reader: Take<BufReader<R>>,
}

impl<R: Read> RequestReader<R> {
    pub fn new(r: R) -> Self {
        Self {
            buf_reader: BufReader::new(r).take(u64::MAX),
        }
    }

    pub fn read(&mut self) -> anyhow::Result<Request> {
        let mut request_line = String::new();
        self.buf_reader.set_limit(REQUEST_LINE_LIMIT);
        let n = self.buf_reader.read_line(&mut request_line)?;
        if n == 0 {
            Err(EndOfFile)?
        }
        request_line = request_line
            .strip_suffix("\r\n")
            .ok_or(InvalidRequest)?
            .to_owned();

        if request_line.split(' ').count() != 3 {
            Err(InvalidRequest)?
        }

        debug!(?request_line);

        let mut headers = HashMap::new();
        self.buf_reader.set_limit(HEADERS_LIMIT);
        loop {
            let mut line = String::new();
            self.buf_reader.read_line(&mut line)?;
            line = line.strip_suffix("\r\n").ok_or(InvalidRequest)?.to_owned();

            if line.is_empty() {
                break;
            }
            let (k, v) = line.split_once(':').ok_or(InvalidRequest)?;
            headers.insert(k.to_lowercase(), v.trim().to_owned());
        }

        let mut body = None;
        if let Some(content_length) = headers.get("content-length") {
            let content_length: usize = content_length.parse().map_err(|_| InvalidRequest)?;
            if content_length > BODY_LIMIT {
                Err(InvalidRequest)?
            }
            self.buf_reader.set_limit(content_length as u64);
            let mut buf = vec![0; content_length];
            if let Err(err) = self.buf_reader.read_exact(&mut buf) {
                if err.kind() == ErrorKind::UnexpectedEof {
                    Err(InvalidRequest)?
                } else {
                    Err(err)?
                }
            }
            body = Some(buf)
        }

        Ok(Request::new(request_line, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        io::{self, Cursor},
    };

    use crate::test_utils::{ErrReader, InfReader};

    use super::{EndOfFile, InvalidRequest, Request, RequestReader};

    #[test]
    fn test_request() {
        let r = Request::new(
            "GET /reminders/1?verbose=true HTTP/1.1".to_owned(),
            HashMap::new(),
            None,
        );
        assert_eq!(r.get_http_method(), "GET");
        assert_eq!(r.get_request_target(), "/reminders/1?verbose=true");
        assert_eq!(r.get_path(), "/reminders/1");
        assert_eq!(r.get_http_version(), "HTTP/1.1");
        assert!(r.params().is_empty());
    }

    #[test]
    fn test_request_path_is_decoded() {
        let tests = [
            ("/reminders/1%2C2", "/reminders/1,2"),
            ("/reminders/1%2c2?x=%20", "/reminders/1,2"),
            ("/a%20b", "/a b"),
            ("/bad%FF", "/bad%FF"),
        ];

        for (target, path) in tests {
            let r = Request::new(format!("GET {} HTTP/1.1", target), HashMap::new(), None);
            assert_eq!(r.get_path(), path, "{}", target);
        }
    }

    #[test]
    fn test_header_values() {
        let headers = HashMap::from([("accept-encoding".to_owned(), "gzip, br,".to_owned())]);
        let r = Request::new("GET / HTTP/1.1".to_owned(), headers, None);
        let values: Vec<_> = r.get_header_values("Accept-Encoding").collect();
        assert_eq!(values, ["gzip", "br"]);
        assert_eq!(r.get_header_values("connection").count(), 0);
    }

    // - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - -
    // request line
    // - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - -

    #[test]
    fn test_request_reader_status_line_ok() {
        let cursor = Cursor::new("DELETE /reminders/1,2 HTTP/1.1\r\n\r\n");
        let mut request_reader = RequestReader::new(cursor);
        let r = request_reader.read().unwrap();
        assert_eq!(r.get_http_method(), "DELETE");
        assert_eq!(r.get_request_target(), "/reminders/1,2");
        assert!(r.get_body().is_none());
    }

    #[test]
    fn test_request_reader_status_line_empty() {
        let mut request_reader = RequestReader::new(Cursor::new(""));
        let res = request_reader.read();
        res.unwrap_err().downcast_ref::<EndOfFile>().unwrap();
    }

    #[test]
    fn test_request_reader_status_line_malformed() {
        let mut request_reader = RequestReader::new(Cursor::new("GET /\r\n\r\n"));
        let res = request_reader.read();
        res.unwrap_err().downcast_ref::<InvalidRequest>().unwrap();
    }

    #[test]
    fn test_request_reader_status_line_error() {
        let mut request_reader = RequestReader::new(ErrReader::new(b"GET /"));
        let res = request_reader.read();
        res.unwrap_err().downcast_ref::<io::Error>().unwrap();
    }

    // - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - -
    // headers
    // - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - -

    #[test]
    fn test_request_reader_headers_ok() {
        let data = "GET / HTTP/1.1\r\nAccept: */*\r\n\r\n";
        let mut request_reader = RequestReader::new(Cursor::new(data));
        let r = request_reader.read().unwrap();
        assert_eq!(r.get_header("accept").unwrap(), "*/*");
    }

    #[test]
    fn test_request_reader_headers_no_colon() {
        let data = "GET / HTTP/1.1\r\nAccept */*\r\n\r\n";
        let mut request_reader = RequestReader::new(Cursor::new(data));
        let res = request_reader.read();
        res.unwrap_err().downcast_ref::<InvalidRequest>().unwrap();
    }

    #[test]
    fn test_request_reader_missing_newline_after_headers() {
        let data = "GET / HTTP/1.1\r\nAccept: */*\r\n";
        let mut request_reader = RequestReader::new(Cursor::new(data));
        let res = request_reader.read();
        res.unwrap_err().downcast_ref::<InvalidRequest>().unwrap();
    }

    // - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - -
    // body
    // - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - -

    #[test]
    fn test_request_reader_body() {
        let data = "PATCH /reminders/3 HTTP/1.1\r\nContent-Length: 13\r\n\r\n{\"title\":\"x\"}";
        let mut request_reader = RequestReader::new(Cursor::new(data));
        let r = request_reader.read().unwrap();
        assert_eq!(r.get_body().unwrap(), b"{\"title\":\"x\"}");
    }

    #[test]
    fn test_request_reader_body_truncated() {
        let data = "POST /reminders HTTP/1.1\r\nContent-Length: 10\r\n\r\n{}";
        let mut request_reader = RequestReader::new(Cursor::new(data));
        let res = request_reader.read();
        res.unwrap_err().downcast_ref::<InvalidRequest>().unwrap();
    }

    #[test]
    fn test_request_reader_body_too_large() {
        let data = "POST /reminders HTTP/1.1\r\nContent-Length: 99999999\r\n\r\n";
        let mut request_reader = RequestReader::new(Cursor::new(data));
        let res = request_reader.read();
        res.unwrap_err().downcast_ref::<InvalidRequest>().unwrap();
    }

    #[test]
    fn test_request_reader_infinite_stream() {
        let inf_reader = InfReader::new(b"GET / HTTP/1.1\r\nAccept: */*\r\n", 0);
        let mut request_reader = RequestReader::new(inf_reader);
        let res = request_reader.read();
        res.unwrap_err().downcast_ref::<InvalidRequest>().unwrap();
    }

    #[test]
    fn test_request_reader_multiple_requests() {
        let fst = "GET /health HTTP/1.1\r\n\r\n";
        let snd = "POST /reminders HTTP/1.1\r\nContent-Length: 2\r\n\r\n{}";
        let cursor = Cursor::new(format!("{}{}", fst, snd));
        let mut request_reader = RequestReader::new(cursor);

        let r = request_reader.read().unwrap();
        assert_eq!(r.get_request_target(), "/health");

        let r = request_reader.read().unwrap();
        assert_eq!(r.get_http_method(), "POST");
        assert_eq!(r.get_body().unwrap(), b"{}");

        let res = request_reader.read();
        res.unwrap_err().downcast_ref::<EndOfFile>().unwrap();
    }
}
