use crate::cli::actions::Action;
use crate::guardia::{
    self,
    groups::GroupConfig,
    token::{JwtValidator, TokenValidator},
};
use anyhow::{Context, Result};
use std::{fs, sync::Arc};

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            public_key,
            base_group,
            admin_group,
        } => {
            let pem = fs::read(&public_key)
                .with_context(|| format!("Failed to read public key from {public_key}"))?;

            let validator: Arc<dyn TokenValidator> = Arc::new(
                JwtValidator::from_ec_pem(&pem).context("Failed to load EC public key")?,
            );

            let groups = GroupConfig::new(base_group, admin_group);

            guardia::new(port, validator, groups).await?;
        }
    }

    Ok(())
}
