//! Password, two-factor authentication and login history

use std::mem;
use std::sync::Arc;

use chrono::Utc;
use portal_api::{PasswordChange, SecuritySettings, TwoFactorSetup, UserApi};
use tokio::sync::RwLock;

use super::report;
use crate::error::CoreResult;
use crate::notify::{Notification, Notifier};
use crate::optimistic::apply_optimistic_with;
use crate::validation::{FieldErrors, PasswordChangeForm, Schema};

const TOTP_CODE_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct SecurityState {
    pub settings: Option<SecuritySettings>,
    /// Enrollment data returned when two-factor is switched on, until verified.
    pub pending_setup: Option<TwoFactorSetup>,
    pub backup_codes: Vec<String>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct SecurityStore {
    api: Arc<dyn UserApi>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<SecurityState>,
}

impl SecurityStore {
    #[must_use]
    pub fn new(api: Arc<dyn UserApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: RwLock::new(SecurityState::default()),
        }
    }

    pub async fn snapshot(&self) -> SecurityState {
        self.state.read().await.clone()
    }

    pub async fn load(&self) -> CoreResult<SecuritySettings> {
        self.state.write().await.loading = true;
        let result = self.api.get_security().await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(settings) => {
                state.settings = Some(settings.clone());
                state.error = None;
                Ok(settings)
            }
            Err(e) => {
                state.error = Some(e.to_string());
                drop(state);
                Err(report(self.notifier.as_ref(), "load security settings", e))
            }
        }
    }

    /// Change the password. Nothing is sent unless the form validates.
    pub async fn change_password(&self, form: &PasswordChangeForm) -> CoreResult<()> {
        form.check()?;

        let change = PasswordChange {
            current_password: form.current_password.clone(),
            new_password: form.new_password.clone(),
        };
        self.api
            .change_password(&change)
            .await
            .map_err(|e| report(self.notifier.as_ref(), "change password", e))?;

        if let Some(settings) = self.state.write().await.settings.as_mut() {
            settings.last_password_change = Some(Utc::now());
        }
        self.notifier.notify(Notification::success("Password updated"));
        Ok(())
    }

    /// Switch two-factor authentication on or off.
    pub async fn set_two_factor(&self, enabled: bool) -> CoreResult<TwoFactorSetup> {
        let setup = apply_optimistic_with(
            &self.state,
            |s| {
                s.settings
                    .as_mut()
                    .map(|settings| mem::replace(&mut settings.two_factor_enabled, enabled))
            },
            self.api.toggle_two_factor(enabled),
            |s, was_enabled| {
                if let (Some(settings), Some(was)) = (s.settings.as_mut(), was_enabled) {
                    settings.two_factor_enabled = was;
                }
            },
            |s, server: &TwoFactorSetup| {
                if let Some(settings) = s.settings.as_mut() {
                    settings.two_factor_enabled = server.enabled;
                }
                s.pending_setup = server.secret.is_some().then(|| server.clone());
            },
        )
        .await
        .map_err(|e| report(self.notifier.as_ref(), "update two-factor authentication", e))?;

        let message = if setup.enabled {
            "Two-factor authentication enabled"
        } else {
            "Two-factor authentication disabled"
        };
        self.notifier.notify(Notification::success(message));
        Ok(setup)
    }

    /// Confirm enrollment with a code from the authenticator app.
    pub async fn verify_two_factor(&self, code: &str) -> CoreResult<()> {
        let code = code.trim();
        if code.len() != TOTP_CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(FieldErrors::single("code", "Enter the 6-digit code").into());
        }

        self.api
            .verify_two_factor(code)
            .await
            .map_err(|e| report(self.notifier.as_ref(), "verify code", e))?;

        self.state.write().await.pending_setup = None;
        self.notifier
            .notify(Notification::success("Two-factor authentication verified"));
        Ok(())
    }

    /// Issue a fresh set of backup codes, invalidating the old ones.
    pub async fn regenerate_backup_codes(&self) -> CoreResult<Vec<String>> {
        let codes = self
            .api
            .regenerate_backup_codes()
            .await
            .map_err(|e| report(self.notifier.as_ref(), "regenerate backup codes", e))?
            .codes;

        self.state.write().await.backup_codes.clone_from(&codes);
        self.notifier
            .notify(Notification::info("New backup codes generated"));
        Ok(codes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use portal_api::ApiError;

    use super::*;
    use crate::error::CoreError;
    use crate::forms::FormState;
    use crate::test_utils::{notifier, MockPortalApi};

    async fn loaded() -> (Arc<MockPortalApi>, SecurityStore) {
        let api = MockPortalApi::shared();
        let store = SecurityStore::new(api.clone(), notifier());
        store.load().await.unwrap();
        (api, store)
    }

    #[tokio::test]
    async fn password_change_end_to_end() {
        let (api, store) = loaded().await;

        let mut form = FormState::new(PasswordChangeForm::new("OldPass1!", "Abcdef1!", "Abcdef1!"));
        let target = &store;
        form.submit(move |values| async move { target.change_password(&values).await })
            .await
            .unwrap();
        assert_eq!(api.call_count("change_password").await, 1);
        assert!(store
            .snapshot()
            .await
            .settings
            .unwrap()
            .last_password_change
            .is_some());
    }

    #[tokio::test]
    async fn mismatched_confirmation_blocks_submit() {
        let (api, store) = loaded().await;

        let mut form = FormState::new(PasswordChangeForm::new("OldPass1!", "Abcdef1!", "Abcdef1"));
        let target = &store;
        let result = form
            .submit(move |values| async move { target.change_password(&values).await })
            .await;

        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(form.error("confirmPassword"), Some("Passwords do not match"));
        assert_eq!(api.call_count("change_password").await, 0);
    }

    #[tokio::test]
    async fn two_factor_enrollment() {
        let (api, store) = loaded().await;
        let setup = store.set_two_factor(true).await.unwrap();
        assert!(setup.secret.is_some());

        let state = store.snapshot().await;
        assert!(state.settings.unwrap().two_factor_enabled);
        assert!(state.pending_setup.is_some());

        assert!(matches!(
            store.verify_two_factor("12345").await,
            Err(CoreError::Validation(_))
        ));
        assert_eq!(api.call_count("verify_two_factor").await, 0);

        store.verify_two_factor("123456").await.unwrap();
        assert!(store.snapshot().await.pending_setup.is_none());
    }

    #[tokio::test]
    async fn failed_toggle_restores_flag() {
        let (api, store) = loaded().await;
        api.fail_with_status(500).await;
        assert!(store.set_two_factor(true).await.is_err());
        assert!(!store.snapshot().await.settings.unwrap().two_factor_enabled);
    }

    #[tokio::test]
    async fn failed_toggle_keeps_backup_codes_issued_meanwhile() {
        let (api, store) = loaded().await;
        api.hold("toggle_two_factor");

        let toggle = store.set_two_factor(true);
        let meanwhile = async {
            api.wait_parked(1).await;
            assert!(store.snapshot().await.settings.unwrap().two_factor_enabled);
            store.regenerate_backup_codes().await.unwrap();
            api.release("toggle_two_factor", Some(ApiError::Timeout { after_ms: 30_000 }));
        };
        let (result, ()) = tokio::join!(toggle, meanwhile);
        assert!(result.is_err());

        let state = store.snapshot().await;
        assert!(!state.settings.unwrap().two_factor_enabled);
        assert_eq!(state.backup_codes.len(), 8);
    }

    #[tokio::test]
    async fn backup_codes_are_stored() {
        let (_, store) = loaded().await;
        let codes = store.regenerate_backup_codes().await.unwrap();
        assert_eq!(codes.len(), 8);
        assert_eq!(store.snapshot().await.backup_codes, codes);
    }
}
