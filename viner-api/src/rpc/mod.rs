//! JSON-RPC dispatcher.
//!
//! Holds the method table and turns raw requests into framed responses.
//! Transports hand it text or parsed JSON; bound handlers see only the
//! request's params and return a result value or an [`RpcError`].

pub mod message;

use std::collections::HashMap;

use serde_json::Value;
use strum::EnumString;
use thiserror::Error;

use crate::tracing::prelude::*;

pub use message::{Dialect, Request, RpcError};

/// JSON-RPC dialects a dispatcher accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ProtocolVersion {
    #[strum(serialize = "v1")]
    V1,
    #[strum(serialize = "v2")]
    V2,
    #[strum(serialize = "v1v2")]
    V1V2,
}

impl ProtocolVersion {
    fn accepts(self, dialect: Dialect) -> bool {
        match self {
            ProtocolVersion::V1 => dialect == Dialect::V1,
            ProtocolVersion::V2 => dialect == Dialect::V2,
            ProtocolVersion::V1V2 => true,
        }
    }

    /// Dialect for answering requests that never got far enough to declare one.
    fn fallback(self) -> Dialect {
        match self {
            ProtocolVersion::V1 => Dialect::V1,
            ProtocolVersion::V2 | ProtocolVersion::V1V2 => Dialect::V2,
        }
    }
}

/// How a procedure expects its parameters. Recorded for introspection only;
/// the dispatcher never rejects a call because of its params.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    ByName,
    ByPosition,
}

/// Signature of a bound method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    pub name: String,
    pub params: ParamStyle,
}

impl Procedure {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParamStyle::ByName,
        }
    }

    pub fn by_position(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParamStyle::ByPosition,
        }
    }
}

/// A bound method body.
pub type Handler = Box<dyn Fn(&Value) -> Result<Value, RpcError> + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("method {0} is already bound")]
    DuplicateMethod(String),
}

struct Binding {
    procedure: Procedure,
    handler: Handler,
}

/// Method table plus request framing.
pub struct Dispatcher {
    protocol: ProtocolVersion,
    methods: HashMap<String, Binding>,
}

impl Dispatcher {
    pub fn new(protocol: ProtocolVersion) -> Self {
        Self {
            protocol,
            methods: HashMap::new(),
        }
    }

    pub fn protocol(&self) -> ProtocolVersion {
        self.protocol
    }

    /// Bind `handler` under `procedure.name`. Each name binds at most once.
    pub fn bind<F>(&mut self, procedure: Procedure, handler: F) -> Result<(), DispatchError>
    where
        F: Fn(&Value) -> Result<Value, RpcError> + Send + Sync + 'static,
    {
        if self.methods.contains_key(&procedure.name) {
            return Err(DispatchError::DuplicateMethod(procedure.name));
        }
        trace!(method = %procedure.name, "Binding method");
        self.methods.insert(
            procedure.name.clone(),
            Binding {
                procedure,
                handler: Box::new(handler),
            },
        );
        Ok(())
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Bound procedures, sorted by name.
    pub fn procedures(&self) -> Vec<&Procedure> {
        let mut procedures: Vec<_> = self.methods.values().map(|b| &b.procedure).collect();
        procedures.sort_by(|a, b| a.name.cmp(&b.name));
        procedures
    }

    /// Handle a raw request body. Returns `None` when nothing should be
    /// written back (notifications, or a batch made only of notifications).
    pub fn handle(&self, body: &str) -> Option<String> {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => self.handle_value(value).map(|v| v.to_string()),
            Err(e) => {
                debug!(error = %e, "Unparsable request");
                Some(
                    message::frame(
                        self.protocol.fallback(),
                        Value::Null,
                        Err(RpcError::parse_error()),
                    )
                    .to_string(),
                )
            }
        }
    }

    /// Handle a parsed request or batch.
    pub fn handle_value(&self, value: Value) -> Option<Value> {
        match value {
            Value::Array(batch) => self.handle_batch(batch),
            single => self.handle_single(single),
        }
    }

    fn handle_batch(&self, batch: Vec<Value>) -> Option<Value> {
        if !self.protocol.accepts(Dialect::V2) {
            return Some(self.reject("batches require JSON-RPC 2.0"));
        }
        if batch.is_empty() {
            return Some(self.reject("empty batch"));
        }

        let responses: Vec<Value> = batch
            .into_iter()
            .filter_map(|request| self.handle_single(request))
            .collect();

        if responses.is_empty() {
            None
        } else {
            Some(Value::Array(responses))
        }
    }

    fn handle_single(&self, value: Value) -> Option<Value> {
        let request = match Request::from_value(value, self.protocol.fallback()) {
            Ok(request) => request,
            Err(rejected) => {
                debug!(error = %rejected.error, "Rejected request");
                return Some(message::frame(
                    rejected.dialect,
                    rejected.id,
                    Err(rejected.error),
                ));
            }
        };

        if !self.protocol.accepts(request.dialect) {
            let error = RpcError::invalid_request("protocol version not served");
            return Some(message::frame(
                self.protocol.fallback(),
                request.id.unwrap_or(Value::Null),
                Err(error),
            ));
        }

        let outcome = self.call(&request.method, &request.params);

        let id = request.id?;
        Some(message::frame(request.dialect, id, outcome))
    }

    fn call(&self, method: &str, params: &Value) -> Result<Value, RpcError> {
        let Some(binding) = self.methods.get(method) else {
            debug!(method, "Method not found");
            return Err(RpcError::method_not_found(method));
        };

        let outcome = (binding.handler)(params);
        if let Err(e) = &outcome {
            warn!(method, error = %e, "Method failed");
        }
        outcome
    }

    fn reject(&self, detail: &str) -> Value {
        message::frame(
            self.protocol.fallback(),
            Value::Null,
            Err(RpcError::invalid_request(detail)),
        )
    }
}
