//! Mock authentication context
//!
//! Sign-in is simulated: any well-formed credentials succeed after an
//! artificial delay, and the "access token" is fabricated locally. The
//! signed-in flag survives restarts through an [`AuthStorage`]. This is not a
//! security boundary.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use portal_api::TokenProvider;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::validation::{LoginForm, Schema};

/// Default artificial latency of login and logout.
pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(500);

const APP_DIR: &str = "selfcare-portal";
const AUTH_FILE: &str = "auth.json";

/// The static demo account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoUser {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Initials shown in the avatar.
    pub avatar: String,
    pub plan: String,
}

impl Default for DemoUser {
    fn default() -> Self {
        Self {
            id: "usr_demo".to_string(),
            name: "Alex Morgan".to_string(),
            email: "alex.morgan@example.com".to_string(),
            avatar: "AM".to_string(),
            plan: "Business".to_string(),
        }
    }
}

/// Persisted authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<DemoUser>,
}

/// Where the signed-in flag is kept between runs.
#[async_trait]
pub trait AuthStorage: Send + Sync {
    async fn load(&self) -> CoreResult<Option<AuthState>>;

    async fn save(&self, state: &AuthState) -> CoreResult<()>;
}

/// JSON file storage.
pub struct FileAuthStorage {
    path: PathBuf,
}

impl FileAuthStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/selfcare-portal/auth.json`
    pub fn default_path() -> CoreResult<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join(AUTH_FILE))
            .ok_or_else(|| CoreError::Storage("No data directory on this platform".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuthStorage for FileAuthStorage {
    async fn load(&self) -> CoreResult<Option<AuthState>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::Storage(e.to_string())),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CoreError::Storage(format!("Invalid auth state file: {e}")))
    }

    async fn save(&self, state: &AuthState) -> CoreResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| CoreError::Storage(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(state)
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))
    }
}

/// In-memory storage.
#[derive(Default)]
pub struct MemoryAuthStorage {
    state: RwLock<Option<AuthState>>,
}

impl MemoryAuthStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthStorage for MemoryAuthStorage {
    async fn load(&self) -> CoreResult<Option<AuthState>> {
        Ok(self.state.read().await.clone())
    }

    async fn save(&self, state: &AuthState) -> CoreResult<()> {
        *self.state.write().await = Some(state.clone());
        Ok(())
    }
}

/// Simulated sign-in, doubling as the API client's token provider.
pub struct MockAuth {
    storage: Arc<dyn AuthStorage>,
    delay: Duration,
    state: RwLock<AuthState>,
    token: RwLock<Option<String>>,
}

impl MockAuth {
    pub fn new(storage: Arc<dyn AuthStorage>, delay: Duration) -> Self {
        Self {
            storage,
            delay,
            state: RwLock::new(AuthState::default()),
            token: RwLock::new(None),
        }
    }

    /// Load the persisted state. Returns whether the user is signed in.
    pub async fn restore(&self) -> CoreResult<bool> {
        let restored = self.storage.load().await?.unwrap_or_default();
        let authenticated = restored.authenticated;
        *self.token.write().await = authenticated.then(fabricate_token);
        *self.state.write().await = restored;
        log::debug!("Restored auth state (authenticated: {authenticated})");
        Ok(authenticated)
    }

    /// Sign in. Any credentials that pass the login form succeed.
    pub async fn login(&self, form: &LoginForm) -> CoreResult<DemoUser> {
        form.check()?;
        tokio::time::sleep(self.delay).await;

        let user = DemoUser::default();
        let state = AuthState {
            authenticated: true,
            user: Some(user.clone()),
        };
        self.storage.save(&state).await?;

        *self.token.write().await = Some(fabricate_token());
        *self.state.write().await = state;
        log::info!("Signed in as {}", user.email);
        Ok(user)
    }

    pub async fn logout(&self) -> CoreResult<()> {
        tokio::time::sleep(self.delay).await;

        let state = AuthState::default();
        self.storage.save(&state).await?;

        *self.token.write().await = None;
        *self.state.write().await = state;
        log::info!("Signed out");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.authenticated
    }

    pub async fn user(&self) -> Option<DemoUser> {
        self.state.read().await.user.clone()
    }

    /// Fail with `NotAuthenticated` unless signed in.
    pub async fn require_user(&self) -> CoreResult<DemoUser> {
        self.user().await.ok_or(CoreError::NotAuthenticated)
    }
}

fn fabricate_token() -> String {
    format!("demo-token-{}", Uuid::new_v4())
}

#[async_trait]
impl TokenProvider for MockAuth {
    async fn access_token(&self) -> portal_api::Result<Option<String>> {
        Ok(self.token.read().await.clone())
    }
}
