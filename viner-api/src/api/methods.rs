//! The fixed set of API methods and the readonly access policy.

use strum::{EnumIter, EnumString, IntoStaticStr};

/// Every method the API can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
pub enum Method {
    /// Legacy positional stats (nine strings).
    #[strum(serialize = "viner_getstat1")]
    GetStat1,

    /// Keyed stats with native numbers.
    #[strum(serialize = "viner_getstathr")]
    GetStatHr,

    /// Ask the farm to restart mining.
    #[strum(serialize = "viner_restart")]
    Restart,

    /// Accepted and acknowledged, but does nothing.
    #[strum(serialize = "viner_reboot")]
    Reboot,
}

impl Method {
    /// Always bound.
    pub const QUERIES: [Method; 2] = [Method::GetStat1, Method::GetStatHr];

    /// Bound only when the server is not readonly.
    pub const CONTROLS: [Method; 2] = [Method::Restart, Method::Reboot];

    /// Wire name of the method.
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn is_control(self) -> bool {
        Self::CONTROLS.contains(&self)
    }

    /// Methods a server with the given policy exposes.
    pub fn available(readonly: bool) -> Vec<Method> {
        let mut methods = Self::QUERIES.to_vec();
        if !readonly {
            methods.extend(Self::CONTROLS);
        }
        methods
    }
}
