//! Account profile and billing address

use std::sync::Arc;

use portal_api::{Address, Profile, UserApi};
use tokio::sync::RwLock;

use super::report;
use crate::error::CoreResult;
use crate::notify::{Notification, Notifier};
use crate::optimistic::apply_optimistic_with;
use crate::validation::{AddressForm, ProfileForm, Schema};

#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub address: Option<Address>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct ProfileStore {
    api: Arc<dyn UserApi>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<ProfileState>,
}

impl ProfileStore {
    #[must_use]
    pub fn new(api: Arc<dyn UserApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: RwLock::new(ProfileState::default()),
        }
    }

    pub async fn snapshot(&self) -> ProfileState {
        self.state.read().await.clone()
    }

    pub async fn load(&self) -> CoreResult<Profile> {
        self.state.write().await.loading = true;
        let result = self.api.get_profile().await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(profile) => {
                state.profile = Some(profile.clone());
                state.error = None;
                Ok(profile)
            }
            Err(e) => {
                state.error = Some(e.to_string());
                drop(state);
                Err(report(self.notifier.as_ref(), "load profile", e))
            }
        }
    }

    pub async fn update_profile(&self, form: &ProfileForm) -> CoreResult<Profile> {
        form.check()?;
        let profile = form.to_profile();

        apply_optimistic_with(
            &self.state,
            |s| s.profile.replace(profile.clone()),
            self.api.update_profile(&profile),
            |s, previous| {
                // A profile loaded while the request was in flight stays.
                if s.profile.as_ref() == Some(&profile) {
                    s.profile = previous;
                }
            },
            |s, server| s.profile = Some(server.clone()),
        )
        .await
        .map_err(|e| report(self.notifier.as_ref(), "update profile", e))
        .inspect(|_| self.notifier.notify(Notification::success("Profile updated")))
    }

    pub async fn load_address(&self) -> CoreResult<Address> {
        let address = self
            .api
            .get_address()
            .await
            .map_err(|e| report(self.notifier.as_ref(), "load address", e))?;
        self.state.write().await.address = Some(address.clone());
        Ok(address)
    }

    pub async fn update_address(&self, form: &AddressForm) -> CoreResult<Address> {
        form.check()?;
        let address = form.to_address();

        apply_optimistic_with(
            &self.state,
            |s| s.address.replace(address.clone()),
            self.api.update_address(&address),
            |s, previous| {
                if s.address.as_ref() == Some(&address) {
                    s.address = previous;
                }
            },
            |s, server| s.address = Some(server.clone()),
        )
        .await
        .map_err(|e| report(self.notifier.as_ref(), "update address", e))
        .inspect(|_| self.notifier.notify(Notification::success("Address updated")))
    }
}
