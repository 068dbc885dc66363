use std::sync::{MutexGuard, PoisonError};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::{send_error, ApiError},
    request::Request,
    response_writer::ResponseWriter,
    server::Handler,
    status_code_registry::ReasonPhrase,
};

use super::{EditReminder, NewReminder, Repository, SharedRepository};

pub fn health(w: &mut ResponseWriter, _: &mut Request) {
    w.set_reason_phrase(ReasonPhrase::OK);
}

pub fn create(repo: SharedRepository) -> impl Handler + Send + Sync {
    move |w: &mut ResponseWriter, r: &mut Request| {
        let result = parse_body::<NewReminder>(r).and_then(|new| lock(&repo).create(new));
        respond(w, result, ReasonPhrase::Created);
    }
}

pub fn edit(repo: SharedRepository) -> impl Handler + Send + Sync {
    move |w: &mut ResponseWriter, r: &mut Request| {
        let result = parse_id(r).and_then(|id| {
            let edit = parse_body::<EditReminder>(r)?;
            lock(&repo).edit(id, edit)
        });
        respond(w, result, ReasonPhrase::OK);
    }
}

pub fn fetch(repo: SharedRepository) -> impl Handler + Send + Sync {
    move |w: &mut ResponseWriter, r: &mut Request| {
        let result = parse_ids(r).and_then(|ids| lock(&repo).fetch(&ids));
        respond(w, result, ReasonPhrase::OK);
    }
}

pub fn delete(repo: SharedRepository) -> impl Handler + Send + Sync {
    move |w: &mut ResponseWriter, r: &mut Request| {
        match parse_ids(r).and_then(|ids| lock(&repo).delete(&ids)) {
            Ok(()) => w.set_reason_phrase(ReasonPhrase::NoContent),
            Err(err) => send_error(w, &err),
        }
    }
}

fn lock(repo: &SharedRepository) -> MutexGuard<'_, Repository> {
    repo.lock().unwrap_or_else(PoisonError::into_inner)
}

fn respond(w: &mut ResponseWriter, result: Result<impl Serialize, ApiError>, ok: ReasonPhrase) {
    match result {
        Ok(value) => {
            w.set_reason_phrase(ok);
            w.set_json(&value);
        }
        Err(err) => send_error(w, &err),
    }
}

fn parse_body<T: DeserializeOwned>(r: &Request) -> Result<T, ApiError> {
    let body = r.get_body().unwrap_or_default();
    if body.is_empty() {
        return Err(ApiError::InvalidJson("request body is empty".to_owned()));
    }
    serde_json::from_slice(body).map_err(|err| ApiError::InvalidJson(err.to_string()))
}

fn parse_id(r: &Request) -> Result<u64, ApiError> {
    let id = r
        .params()
        .get("id")
        .ok_or_else(|| ApiError::FormatValidation("missing id".to_owned()))?;
    parse_u64(id)
}

fn parse_ids(r: &Request) -> Result<Vec<u64>, ApiError> {
    let ids = r
        .params()
        .get("ids")
        .ok_or_else(|| ApiError::FormatValidation("missing ids".to_owned()))?;
    ids.split(',').map(parse_u64).collect()
}

fn parse_u64(s: &str) -> Result<u64, ApiError> {
    s.parse()
        .map_err(|_| ApiError::FormatValidation(format!("invalid id: {}", s)))
}
