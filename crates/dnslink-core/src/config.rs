//! Configuration types for the dnslink publisher
//!
//! A run is configured once, from the action inputs, into an immutable
//! [`RunConfig`] that is passed explicitly to every component.

/// Gateway prefix used for the `url` output
pub const DEFAULT_GATEWAY_BASE: &str = "https://w3s.link/ipfs/";

/// Action input names
pub mod inputs {
    /// Directory to upload
    pub const DIR: &str = "dir";
    /// DNS provider API token
    pub const DNS_API_TOKEN: &str = "cf-token";
    /// DNS zone id
    pub const ZONE_ID: &str = "cf-zone-id";
    /// DNS zone name, used as the TXT record name
    pub const ZONE_NAME: &str = "cf-zone-name";
    /// Upload signing key
    pub const UPLOAD_PRINCIPAL: &str = "w3s-key";
    /// Upload delegation proof
    pub const UPLOAD_PROOF: &str = "w3s-proof";
}

/// Configuration for a single publish run
#[derive(Clone)]
pub struct RunConfig {
    /// Directory to upload
    pub directory: String,

    /// DNS provider API token
    /// ⚠️ NEVER log this value
    pub dns_api_token: String,

    /// Zone holding the dnslink record
    pub zone_id: String,

    /// Zone name; also the name of the TXT record (e.g. `_dnslink.example.com`)
    pub zone_name: String,

    /// Upload signing key, passed to the uploader as `W3_PRINCIPAL`
    /// ⚠️ NEVER log this value
    pub upload_principal: String,

    /// Delegation proof registering the upload space
    /// ⚠️ NEVER log this value
    pub upload_proof: String,

    /// Gateway URL prefix for the published CID
    pub gateway_base: String,

    /// Uploader program followed by its leading arguments
    pub uploader_command: Vec<String>,

    /// Perform reads against the DNS API but skip writes
    pub dry_run: bool,
}

// Custom Debug implementation that hides credentials
impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("directory", &self.directory)
            .field("dns_api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("zone_name", &self.zone_name)
            .field("upload_principal", &"<REDACTED>")
            .field("upload_proof", &"<REDACTED>")
            .field("gateway_base", &self.gateway_base)
            .field("uploader_command", &self.uploader_command)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl RunConfig {
    /// Build a configuration from action inputs
    ///
    /// `lookup` receives an input name such as `cf-zone-id` and returns its
    /// raw value, if set. Values are trimmed; missing inputs become empty
    /// strings and are rejected by [`RunConfig::validate`].
    pub fn from_inputs<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let input = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        Self {
            directory: input(inputs::DIR),
            dns_api_token: input(inputs::DNS_API_TOKEN),
            zone_id: input(inputs::ZONE_ID),
            zone_name: input(inputs::ZONE_NAME),
            upload_principal: input(inputs::UPLOAD_PRINCIPAL),
            upload_proof: input(inputs::UPLOAD_PROOF),
            gateway_base: default_gateway_base(),
            uploader_command: default_uploader_command(),
            dry_run: false,
        }
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Override the uploader program and its leading arguments
    pub fn with_uploader_command(mut self, command: Vec<String>) -> Self {
        self.uploader_command = command;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        let required = [
            (inputs::DIR, &self.directory),
            (inputs::DNS_API_TOKEN, &self.dns_api_token),
            (inputs::ZONE_ID, &self.zone_id),
            (inputs::ZONE_NAME, &self.zone_name),
            (inputs::UPLOAD_PRINCIPAL, &self.upload_principal),
            (inputs::UPLOAD_PROOF, &self.upload_proof),
        ];

        for (name, value) in required {
            if value.is_empty() {
                return Err(crate::Error::config(format!(
                    "Input required and not supplied: {}",
                    name
                )));
            }
        }

        if self.uploader_command.first().is_none_or(|p| p.is_empty()) {
            return Err(crate::Error::config("Uploader command cannot be empty"));
        }

        if !self.gateway_base.starts_with("https://") && !self.gateway_base.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "Gateway base must be an HTTP(S) URL. Got: {}",
                self.gateway_base
            )));
        }

        Ok(())
    }
}

fn default_gateway_base() -> String {
    DEFAULT_GATEWAY_BASE.to_string()
}

fn default_uploader_command() -> Vec<String> {
    vec!["npx".to_string(), "@web3-storage/w3cli".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_inputs() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("dir", "dist"),
            ("cf-token", "  secret-token  "),
            ("cf-zone-id", "zone123"),
            ("cf-zone-name", "_dnslink.example.com"),
            ("w3s-key", "MgCabc"),
            ("w3s-proof", "mAYIEAproof"),
        ])
    }

    #[test]
    fn from_inputs_trims_values() {
        let inputs = full_inputs();
        let config = RunConfig::from_inputs(|name| inputs.get(name).map(|v| v.to_string()));

        assert_eq!(config.directory, "dist");
        assert_eq!(config.dns_api_token, "secret-token");
        assert_eq!(config.zone_name, "_dnslink.example.com");
        assert_eq!(config.gateway_base, DEFAULT_GATEWAY_BASE);
        assert_eq!(config.uploader_command, vec!["npx", "@web3-storage/w3cli"]);
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_input_is_rejected() {
        let mut inputs = full_inputs();
        inputs.remove("cf-zone-id");
        let config = RunConfig::from_inputs(|name| inputs.get(name).map(|v| v.to_string()));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cf-zone-id"));
    }

    #[test]
    fn whitespace_only_input_is_rejected() {
        let mut inputs = full_inputs();
        inputs.insert("w3s-proof", "   ");
        let config = RunConfig::from_inputs(|name| inputs.get(name).map(|v| v.to_string()));

        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_uploader_command_is_rejected() {
        let inputs = full_inputs();
        let config = RunConfig::from_inputs(|name| inputs.get(name).map(|v| v.to_string()))
            .with_uploader_command(Vec::new());

        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let inputs = full_inputs();
        let config = RunConfig::from_inputs(|name| inputs.get(name).map(|v| v.to_string()));

        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("secret-token"));
        assert!(!debug_str.contains("MgCabc"));
        assert!(!debug_str.contains("mAYIEAproof"));
        assert!(debug_str.contains("zone123"));
    }
}
