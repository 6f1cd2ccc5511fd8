//! The API server: binds methods to farm queries.
//!
//! Which methods exist is decided once, in [`ApiServer::new`], from the
//! readonly flag. A readonly server simply has no control methods, so
//! calling one gets the ordinary "method not found" error.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::methods::Method;
use super::snapshot::FarmSnapshot;
use super::{control, stat_v1, stat_v2};
use crate::build_info;
use crate::farm::{Farm, ProgressDetail};
use crate::rpc::{DispatchError, Dispatcher, Procedure, ProtocolVersion, RpcError};
use crate::tracing::prelude::*;

/// Farm handle and reported version, shared by every bound handler.
struct Context {
    farm: Arc<dyn Farm>,
    version: String,
}

impl Context {
    fn invoke(&self, method: Method) -> Result<Value, RpcError> {
        match method {
            Method::GetStat1 => {
                let snapshot = FarmSnapshot::capture(
                    self.farm.as_ref(),
                    &self.version,
                    ProgressDetail::Monitors,
                )?;
                to_result(&stat_v1::format(&snapshot))
            }
            Method::GetStatHr => {
                let snapshot = FarmSnapshot::capture(
                    self.farm.as_ref(),
                    &self.version,
                    ProgressDetail::MonitorsWithPower,
                )?;
                to_result(&stat_v2::format(&snapshot))
            }
            Method::Restart => Ok(control::restart(self.farm.as_ref())?),
            Method::Reboot => Ok(control::reboot()),
        }
    }
}

fn to_result<T: Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal(e.to_string()))
}

/// JSON-RPC server exposing a farm.
pub struct ApiServer {
    dispatcher: Dispatcher,
    readonly: bool,
}

impl ApiServer {
    /// Create a server reporting this build's version.
    pub fn new(
        protocol: ProtocolVersion,
        farm: Arc<dyn Farm>,
        readonly: bool,
    ) -> Result<Self, DispatchError> {
        Self::with_version(protocol, farm, readonly, build_info::project_version())
    }

    /// Create a server reporting `version` in its stat responses.
    pub fn with_version(
        protocol: ProtocolVersion,
        farm: Arc<dyn Farm>,
        readonly: bool,
        version: impl Into<String>,
    ) -> Result<Self, DispatchError> {
        let context = Arc::new(Context {
            farm,
            version: version.into(),
        });

        let mut dispatcher = Dispatcher::new(protocol);
        for method in Method::available(readonly) {
            let context = Arc::clone(&context);
            dispatcher.bind(Procedure::by_name(method.name()), move |_params| {
                context.invoke(method)
            })?;
        }

        info!(
            readonly,
            protocol = ?protocol,
            methods = dispatcher.procedures().len(),
            "API methods bound"
        );

        Ok(Self {
            dispatcher,
            readonly,
        })
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    pub fn protocol(&self) -> ProtocolVersion {
        self.dispatcher.protocol()
    }

    /// Whether `method` is bound on this server.
    pub fn exposes(&self, method: Method) -> bool {
        self.dispatcher.contains(method.name())
    }

    /// Names of the bound methods, sorted.
    pub fn methods(&self) -> Vec<&str> {
        self.dispatcher
            .procedures()
            .into_iter()
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Handle a raw request body; see [`Dispatcher::handle`].
    pub fn handle(&self, body: &str) -> Option<String> {
        self.dispatcher.handle(body)
    }

    /// Handle a parsed request or batch; see [`Dispatcher::handle_value`].
    pub fn handle_value(&self, request: Value) -> Option<Value> {
        self.dispatcher.handle_value(request)
    }
}
