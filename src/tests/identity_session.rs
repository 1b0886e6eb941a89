#[cfg(test)]
mod tests {
    use std::os::unix::fs::PermissionsExt;

    use crate::helpers::time::now_i64;
    use crate::identity::id_token;
    use crate::identity::session::{AccountSession, SessionCache};
    use crate::tests::common::fake_id_token;

    fn account(id_token: &str) -> AccountSession {
        AccountSession {
            tenant_id: "tenant".into(),
            client_id: "client".into(),
            username: Some("user@test.com".into()),
            id_token: id_token.into(),
            refresh_token: Some("rt-1".into()),
        }
    }

    #[test]
    fn untouched_session_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msal_cache.bin");
        {
            let session = SessionCache::open(&path);
            assert!(!session.has_state_changed());
            assert!(session.account("tenant", "client").is_none());
        }
        assert!(!path.exists());
    }

    #[test]
    fn changed_session_is_written_once_on_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gw").join("msal_cache.bin");
        {
            let mut session = SessionCache::open(&path);
            session.upsert(account("id-1"));
            assert!(session.has_state_changed());
            assert!(!path.exists(), "nothing is written before release");
        }
        assert!(path.exists());
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);

        let reopened = SessionCache::open(&path);
        assert_eq!(reopened.account("tenant", "client"), Some(&account("id-1")));
    }

    #[test]
    fn identical_upsert_does_not_mark_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msal_cache.bin");
        {
            let mut session = SessionCache::open(&path);
            session.upsert(account("id-1"));
        }
        let modified = std::fs::metadata(&path).unwrap().modified().unwrap();

        let mut session = SessionCache::open(&path);
        session.upsert(account("id-1"));
        assert!(!session.has_state_changed());
        drop(session);
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn remove_drops_the_account() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msal_cache.bin");
        {
            let mut session = SessionCache::open(&path);
            session.upsert(account("id-1"));
        }
        {
            let mut session = SessionCache::open(&path);
            assert!(session.remove("tenant", "client"));
            assert!(!session.remove("tenant", "client"));
        }
        assert!(SessionCache::open(&path).account("tenant", "client").is_none());
    }

    #[test]
    fn corrupt_session_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msal_cache.bin");
        std::fs::write(&path, b"\x00\x01garbage").unwrap();

        let session = SessionCache::open(&path);
        assert!(session.account("tenant", "client").is_none());
        assert!(!session.has_state_changed());
    }

    #[test]
    fn id_token_claims_and_freshness() {
        let now = now_i64();
        let fresh = fake_id_token(now + 3600, "user@test.com");
        let stale = fake_id_token(now + 100, "user@test.com");

        // claims the session does not use (oid, tid, ...) are skipped
        let claims = id_token::claims(&fresh).unwrap();
        assert_eq!(
            claims,
            id_token::IdTokenClaims {
                exp: Some(now + 3600),
                preferred_username: Some("user@test.com".into()),
            }
        );
        assert!(id_token::is_fresh(&fresh, now));
        assert!(!id_token::is_fresh(&stale, now));
        assert!(!id_token::is_fresh("not-a-jwt", now));
    }
}
