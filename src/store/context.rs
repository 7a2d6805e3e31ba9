use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::utils::home_path;
use super::Storable;
use crate::config::{CONTEXT_STORE_PATH, EXEC_NAME};
use crate::impl_store;

/// Per-user defaults persisted between invocations. The parent override
/// from the command line never hits the disk.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct Context {
    pub default_parent: Option<i64>,

    /// Points all commands at a non-default API endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_api_url: Option<String>,

    #[serde(skip)]
    pub parent_override: Option<i64>,
}

impl Storable for Context {
    fn path() -> Result<PathBuf> {
        home_path(CONTEXT_STORE_PATH)
    }
}

impl_store!(Context);

impl Context {
    pub fn current_parent(&self) -> Option<i64> {
        self.parent_override.or(self.default_parent)
    }

    pub fn current_parent_error(&self) -> i64 {
        self.current_parent().unwrap_or_else(|| {
            panic!(
                "No parent account selected. Pass `--parent <id>` or run `{EXEC_NAME} switch` first."
            )
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_override_takes_precedence() {
        let ctx = Context {
            default_parent: Some(1),
            parent_override: Some(7),
            ..Default::default()
        };

        assert_eq!(ctx.current_parent(), Some(7));
    }

    #[test]
    fn test_falls_back_to_default() {
        let ctx = Context {
            default_parent: Some(1),
            ..Default::default()
        };

        assert_eq!(ctx.current_parent(), Some(1));
    }
}
