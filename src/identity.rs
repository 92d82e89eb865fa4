//! Application identity used to namespace call-sequence entries.

use std::sync::Arc;

/// Stable name of the running service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    name: Arc<str>,
}

impl AppIdentity {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    /// Identity named after the current crate, for binaries without configuration.
    pub fn from_package() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_name() {
        let identity = AppIdentity::new("orders");
        let copy = identity.clone();
        assert_eq!(copy.name(), "orders");
        assert_eq!(identity, copy);
    }

    #[test]
    fn test_package_identity() {
        assert_eq!(AppIdentity::from_package().name(), "service-http");
    }
}
