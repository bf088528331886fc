//! Scripted in-memory gateway.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use fuiman_import::{Connection, Gateway, GatewayError, ImportRequest, ImportResponse};
use fuiman_transform::UserRecord;
use serde_json::{Value, json};

/// Replies returned in order; once exhausted every batch succeeds.
#[derive(Default)]
pub struct ScriptedGateway {
    pub replies: RefCell<VecDeque<Result<ImportResponse, GatewayError>>>,
    pub requests: RefCell<Vec<Value>>,
    pub connects: Cell<usize>,
    pub releases: Cell<usize>,
    pub refuse_connect: bool,
}

impl ScriptedGateway {
    pub fn with_replies(replies: Vec<Result<ImportResponse, GatewayError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn request_sizes(&self) -> Vec<usize> {
        self.requests
            .borrow()
            .iter()
            .map(|r| r["users"].as_array().map_or(0, Vec::len))
            .collect()
    }
}

pub struct ScriptedConnection<'g> {
    gateway: &'g ScriptedGateway,
}

impl Gateway for ScriptedGateway {
    fn connect(&self) -> Result<Box<dyn Connection + '_>, GatewayError> {
        if self.refuse_connect {
            return Err(GatewayError::Authentication("bad password".into()));
        }
        self.connects.set(self.connects.get() + 1);
        Ok(Box::new(ScriptedConnection { gateway: self }))
    }

    fn health_check(&self) -> Result<bool, GatewayError> {
        Ok(true)
    }
}

impl Connection for ScriptedConnection<'_> {
    fn post_import(&self, request: &ImportRequest<'_>) -> Result<ImportResponse, GatewayError> {
        self.gateway
            .requests
            .borrow_mut()
            .push(serde_json::to_value(request).unwrap());
        self.gateway
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(accepted(request.users.len() as u64)))
    }
}

impl Drop for ScriptedConnection<'_> {
    fn drop(&mut self) {
        self.gateway.releases.set(self.gateway.releases.get() + 1);
    }
}

pub fn accepted(created: u64) -> ImportResponse {
    ImportResponse {
        created_records: created,
        failed_records: 0,
        ..ImportResponse::default()
    }
}

pub fn records(count: usize) -> Vec<UserRecord> {
    (0..count)
        .map(|i| {
            serde_json::from_value(json!({
                "username": format!("user{i}"),
                "externalSystemId": format!("ext{i}"),
            }))
            .unwrap()
        })
        .collect()
}
