#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use serial_test::serial;

    use crate::broker::IssuedToken;
    use crate::config::TokenCacheConfig;
    use crate::launcher::{client_command, client_env, CLIENT_BIN_ENV};
    use crate::tests::common::config_for;

    fn issued() -> IssuedToken {
        IssuedToken {
            access_token: "db-token".into(),
            expires_in: 3600,
        }
    }

    #[test]
    fn client_env_points_at_the_serving_endpoint() {
        let config = config_for("https://example.com", TokenCacheConfig::default());
        let env = client_env(&config, &issued());
        assert_eq!(
            env,
            vec![
                ("ANTHROPIC_BASE_URL", "https://example.com/serving-endpoints/ep/invocations".to_string()),
                ("ANTHROPIC_AUTH_TOKEN", "db-token".to_string()),
                ("ANTHROPIC_MODEL", "m".to_string()),
            ]
        );
    }

    #[test]
    #[serial]
    fn client_command_passes_arguments_through() {
        std::env::set_var(CLIENT_BIN_ENV, "/usr/local/bin/claude-dev");
        let config = config_for("https://example.com", TokenCacheConfig::default());
        let command = client_command(&config, &issued(), ["--resume", "-p", "hi"]);

        assert_eq!(command.get_program(), OsStr::new("/usr/local/bin/claude-dev"));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec![OsStr::new("--resume"), OsStr::new("-p"), OsStr::new("hi")]);
        let token = command
            .get_envs()
            .find(|(k, _)| *k == OsStr::new("ANTHROPIC_AUTH_TOKEN"))
            .and_then(|(_, v)| v);
        assert_eq!(token, Some(OsStr::new("db-token")));
        std::env::remove_var(CLIENT_BIN_ENV);
    }
}
