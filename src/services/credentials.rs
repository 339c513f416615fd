use crate::constants::env_vars;
use crate::errors::ToolError;

/// The bearer token presented to the upstream API. Opaque, held only for the
/// duration of one request, and excluded from Debug output so it cannot end
/// up in a log line or error detail.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// The two token sources, fixed at startup. The deployment-injected source
/// always wins; the local-development source is consulted only when the
/// first is unset or empty. Values are read per call, not cached, so a
/// rotated token takes effect on the next invocation.
#[derive(Debug, Clone)]
pub struct CredentialSources {
    deploy_var: &'static str,
    local_var: &'static str,
}

impl CredentialSources {
    pub fn from_env_defaults() -> Self {
        Self {
            deploy_var: env_vars::API_TOKEN,
            local_var: env_vars::API_TOKEN_DEV,
        }
    }

    pub fn resolve(&self) -> Result<Credential, ToolError> {
        for var in [self.deploy_var, self.local_var] {
            if let Ok(raw) = std::env::var(var) {
                let token = raw.trim();
                if !token.is_empty() {
                    return Ok(Credential(token.to_string()));
                }
            }
        }
        Err(ToolError::missing_credential(format!(
            "No API token configured: set {} (deployment) or {} (local development)",
            self.deploy_var, self.local_var
        )))
    }
}
