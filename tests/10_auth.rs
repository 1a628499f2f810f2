mod common;

use anyhow::Result;
use reqwest::Method;

use analyses_panel::api::{ApiClient, AuthApi};
use analyses_panel::controller::{analysis_columns, Notice, ResourceListController};
use analyses_panel::error::ClientError;
use analyses_panel::filter::ColumnFilterPanel;
use analyses_panel::pagination::{OffsetPaginator, PaginatorOptions};

#[tokio::test]
async fn login_persists_credential_and_attaches_bearer() -> Result<()> {
    let server = common::start_stub().await?;
    let config = server.config();
    let (session, _nav) = common::session(&config, false, "/login")?;
    let client = ApiClient::new(&config.api, session.clone())?;
    let auth = AuthApi::new(&client);

    assert!(!session.is_authenticated());
    let user = auth.login("admin", "secret").await?;
    assert_eq!(user.role, "admin");
    assert!(session.is_authenticated());
    assert_eq!(session.identity().display_label(), "admin");

    let me = auth.me().await?;
    assert_eq!(me.email, "admin@example.com");
    let last = server.last_request().expect("request recorded");
    assert_eq!(last.path, "/api/v1/auth/me");
    assert_eq!(last.authorization.as_deref(), Some("Bearer tok-123"));
    Ok(())
}

#[tokio::test]
async fn wrong_password_surfaces_server_message() -> Result<()> {
    let server = common::start_stub().await?;
    let config = server.config();
    let (session, _nav) = common::session(&config, false, "/login")?;
    let client = ApiClient::new(&config.api, session.clone())?;

    let err = AuthApi::new(&client).login("admin", "nope").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert_eq!(err.user_message("Login failed"), "Invalid username or password");
    assert!(!session.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn unauthenticated_protected_visit_redirects_without_request() -> Result<()> {
    let server = common::start_stub().await?;
    let config = server.config();
    let (session, navigator) = common::session(&config, false, "/additional-analyses")?;

    assert_eq!(navigator.visits(), vec!["/login".to_string()]);
    assert_eq!(session.redirected_to(), Some("/login"));

    let api = common::analyses_api(&config, session)?;
    let mut controller = ResourceListController::new(
        api,
        OffsetPaginator::new(PaginatorOptions::default()),
        ColumnFilterPanel::new(analysis_columns()),
    );
    assert!(!controller.refresh().await);
    assert!(matches!(controller.notice(), Some(Notice::Error(_))));
    assert!(server.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn bearer_only_on_api_paths() -> Result<()> {
    let server = common::start_stub().await?;
    let config = server.config();
    let (session, _nav) = common::session(&config, true, "/additional-analyses")?;
    let client = ApiClient::new(&config.api, session)?;

    client.request(Method::GET, "/health")?.send().await?;
    let last = server.last_request().expect("request recorded");
    assert_eq!(last.path, "/health");
    assert_eq!(last.authorization, None);
    Ok(())
}

#[tokio::test]
async fn logout_clears_session_and_navigates_to_login() -> Result<()> {
    let server = common::start_stub().await?;
    let config = server.config();
    let (session, navigator) = common::session(&config, true, "/additional-analyses")?;
    let client = ApiClient::new(&config.api, session.clone())?;

    AuthApi::new(&client).logout().await?;
    assert!(!session.is_authenticated());
    assert_eq!(navigator.visits(), vec!["/login".to_string()]);

    let logout = server.last_request().expect("logout recorded");
    assert_eq!(logout.path, "/api/v1/auth/logout");
    assert_eq!(logout.authorization.as_deref(), Some("Bearer tok-123"));
    Ok(())
}

#[tokio::test]
async fn expired_credential_fails_only_the_request() -> Result<()> {
    let server = common::start_stub().await?;
    let config = server.config();
    let (session, navigator) = common::session(&config, false, "/login")?;
    session.login("stale-token", Default::default())?;

    let api = common::analyses_api(&config, session)?;
    let mut controller = ResourceListController::new(
        api,
        OffsetPaginator::new(PaginatorOptions::default()),
        ColumnFilterPanel::new(analysis_columns()),
    );
    assert!(controller.refresh().await);
    assert_eq!(controller.notice().map(Notice::text), Some("Invalid or expired token"));
    assert!(controller.rows().is_empty());
    assert!(navigator.visits().is_empty());
    Ok(())
}
