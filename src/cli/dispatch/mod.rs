use crate::cli::actions::Action;
use anyhow::{Context, Result};

/// Map parsed arguments to an [`Action`].
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        public_key: matches
            .get_one::<String>("public-key")
            .cloned()
            .context("missing required argument: --public-key")?,
        base_group: matches
            .get_one::<String>("base-group")
            .cloned()
            .context("missing required argument: --base-group")?,
        admin_group: matches
            .get_one::<String>("admin-group")
            .cloned()
            .context("missing required argument: --admin-group")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_handler_server_action() {
        let matches = commands::new().get_matches_from(vec![
            "guardia",
            "--port",
            "9443",
            "--public-key",
            "/etc/guardia/ecdsa-public.pem",
        ]);

        let action = handler(&matches).expect("action");
        let Action::Server {
            port,
            public_key,
            base_group,
            admin_group,
        } = action;

        assert_eq!(port, 9443);
        assert_eq!(public_key, "/etc/guardia/ecdsa-public.pem");
        assert_eq!(base_group, "unauthenticated-baseline");
        assert_eq!(admin_group, "cluster-admin-binding");
    }
}
