mod common;

use claims::{assert_none, assert_ok, assert_some};
use client::auth::{MemorySessionStore, SessionState};
use client::model::{ResourceDraft, ResourceTemplate, Role};
use client::resources::DashboardStats;
use client::theme::style::PRIMARY_SLOT;
use client::theme::{ModeChange, ThemeMode, ThemePhase};
use client::ClientError;
use common::{Harness, MockConsoleApi, PASSWORD, theme, user};
use serde_json::json;

fn template(id: i64, title: &str, icon: &str) -> ResourceTemplate {
    ResourceTemplate {
        id,
        title: title.to_string(),
        resource_name: title.to_lowercase().replace(' ', "-"),
        description: format!("{title} template"),
        icon: icon.to_string(),
        status: "Running".to_string(),
        region: "East US".to_string(),
    }
}

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn test_login_empty_theme_then_toggle() {
        let api = MockConsoleApi::new()
            .with_account(user("u1", "a@b.com", Some(Role::User)))
            .with_theme("u1", theme(json!({})));
        let harness = Harness::new(api);

        let signed_in = assert_ok!(harness.console.login("a@b.com", PASSWORD).await);
        assert_eq!(signed_in.id, "u1");
        assert_eq!(
            harness.console.session.state().await,
            SessionState::Authenticated {
                user: user("u1", "a@b.com", Some(Role::User))
            }
        );

        let sync = &harness.console.theme;
        assert_eq!(
            sync.phase().await,
            ThemePhase::Ready {
                user_id: "u1".to_string()
            }
        );
        assert_eq!(sync.mode().await, ThemeMode::Light);
        assert_none!(sync.remote().await);

        assert_eq!(sync.toggle().await, ModeChange::Persisted);

        let saved = harness.api.saved_themes();
        assert_eq!(saved.len(), 1);
        assert_eq!(serde_json::to_value(&saved[0]).unwrap(), json!({ "mode": "dark" }));
        assert_eq!(sync.remote().await, Some(saved[0].clone()));
    }

    #[tokio::test]
    async fn test_restart_restores_session_and_theme() {
        let api = MockConsoleApi::new()
            .with_account(user("u1", "a@b.com", Some(Role::User)))
            .with_theme("u1", theme(json!({ "mode": "dark", "schemeId": "royal-purple" })));
        let store = MemorySessionStore::with_session("token-u1", None);
        let harness = Harness::with_store(api, store);

        let restored = assert_some!(harness.console.start().await);
        assert_eq!(restored.email, "a@b.com");
        assert_eq!(harness.console.theme.mode().await, ThemeMode::Dark);
        assert_eq!(
            harness.console.theme.selected_palette().await.id,
            "royal-purple"
        );
    }

    #[tokio::test]
    async fn test_start_without_session_is_idle() {
        let harness = Harness::new(MockConsoleApi::new());
        assert_none!(harness.console.start().await);
        assert_eq!(harness.console.theme.phase().await, ThemePhase::Idle);
        assert_eq!(MockConsoleApi::count(&harness.api.theme_fetches), 0);
    }

    #[tokio::test]
    async fn test_revoked_token_during_request_signs_out_everywhere() {
        let api = MockConsoleApi::new()
            .with_account(user("u1", "a@b.com", None))
            .with_theme("u1", theme(json!({ "mode": "dark", "primaryColor": "#0ea5e9" })));
        let harness = Harness::new(api);
        assert_ok!(harness.console.login("a@b.com", PASSWORD).await);
        assert_eq!(harness.console.theme.mode().await, ThemeMode::Dark);
        assert!(harness.styles.snapshot().property(PRIMARY_SLOT).is_some());

        harness.api.revoke(&harness.api.token_for("u1"));
        let result = harness.console.resources.list().await;
        assert!(matches!(result, Err(ClientError::Api(ref e)) if e.is_unauthorized()));

        assert!(!harness.console.session.is_authenticated().await);
        assert_none!(harness.stored_token());
        let sync = &harness.console.theme;
        assert_eq!(sync.phase().await, ThemePhase::Idle);
        assert_eq!(sync.mode().await, ThemeMode::Light);
        assert_none!(sync.remote().await);
        let styles = harness.styles.snapshot();
        assert!(styles.properties.is_empty());
        assert_eq!(styles.mode, ThemeMode::Light);
    }

    #[tokio::test]
    async fn test_rejected_profile_refresh_resets_theme() {
        let api = MockConsoleApi::new()
            .with_account(user("u1", "a@b.com", None))
            .with_theme("u1", theme(json!({ "mode": "dark" })));
        let harness = Harness::new(api);
        assert_ok!(harness.console.session.login("a@b.com", PASSWORD).await);
        harness.console.resync_theme().await;
        assert!(harness.console.theme.phase().await.is_ready());

        harness.api.revoke(&harness.api.token_for("u1"));
        harness.console.session.refresh_profile().await;

        assert!(!harness.console.session.is_authenticated().await);
        assert_eq!(harness.console.theme.phase().await, ThemePhase::Idle);
        assert_eq!(harness.console.theme.mode().await, ThemeMode::Light);
    }
}

mod resources {
    use super::*;

    async fn signed_in(api: MockConsoleApi) -> Harness {
        let harness = Harness::new(api.with_account(user("u1", "a@b.com", Some(Role::Admin))));
        assert_ok!(harness.console.login("a@b.com", PASSWORD).await);
        harness
    }

    #[tokio::test]
    async fn test_crud_round() {
        let harness = signed_in(MockConsoleApi::new()).await;
        let resources = &harness.console.resources;

        let draft = ResourceDraft {
            title: "Orders DB".to_string(),
            resource_name: "sql-orders".to_string(),
            icon: "database".to_string(),
            ..Default::default()
        };
        let created = assert_ok!(resources.create(&draft).await);
        assert_eq!(created.region, "East US");
        assert_eq!(created.status, "Running");

        let mut edit = ResourceDraft::from(&created);
        edit.status = "Stopped".to_string();
        let updated = assert_ok!(resources.update(created.id, &edit).await);
        assert_eq!(updated.status, "Stopped");

        let fetched = assert_ok!(resources.get(created.id).await);
        assert_eq!(fetched, updated);

        assert_ok!(resources.delete(created.id).await);
        assert!(matches!(
            resources.get(created.id).await,
            Err(ClientError::NotFound { kind: "Resource", .. })
        ));
    }

    #[tokio::test]
    async fn test_import_templates_and_stats() {
        let api = MockConsoleApi::new().with_templates(vec![
            template(10, "Web App", "globe"),
            template(11, "Key Vault", "key"),
            template(12, "Gateway", "zap"),
        ]);
        let harness = signed_in(api).await;
        let resources = &harness.console.resources;

        let templates = assert_ok!(resources.templates().await);
        assert_eq!(templates.len(), 3);

        assert_ok!(resources.import_templates(&[10, 12]).await);
        assert_ok!(resources.import_templates(&[]).await);
        assert_eq!(harness.api.imported(), vec![vec![10, 12]]);

        let stats = assert_ok!(resources.stats().await);
        assert_eq!(
            stats,
            DashboardStats {
                active_resources: 2,
                running: 2,
                stopped: 0,
                pending: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_requests_need_a_session() {
        let harness = Harness::new(MockConsoleApi::new());
        assert!(matches!(
            harness.console.resources.list().await,
            Err(ClientError::NotAuthenticated)
        ));
    }
}
