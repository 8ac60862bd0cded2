use async_trait::async_trait;
use serde_json::json;

use crate::client::ApiClient;
use crate::error::Result;
use crate::traits::UserApi;
use crate::types::{
    Address, BackupCodes, PasswordChange, Profile, SecuritySettings, TwoFactorSetup,
};

#[async_trait]
impl UserApi for ApiClient {
    async fn get_profile(&self) -> Result<Profile> {
        self.get_json("/user/profile").await
    }

    async fn update_profile(&self, profile: &Profile) -> Result<Profile> {
        self.put_json("/user/profile", profile).await
    }

    async fn get_address(&self) -> Result<Address> {
        self.get_json("/user/address").await
    }

    async fn update_address(&self, address: &Address) -> Result<Address> {
        self.put_json("/user/address", address).await
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        self.post_unit("/user/password", change).await
    }

    async fn toggle_two_factor(&self, enabled: bool) -> Result<TwoFactorSetup> {
        self.post_json("/user/2fa/toggle", &json!({ "enabled": enabled }))
            .await
    }

    async fn verify_two_factor(&self, code: &str) -> Result<()> {
        self.post_unit("/user/2fa/verify", &json!({ "code": code }))
            .await
    }

    async fn regenerate_backup_codes(&self) -> Result<BackupCodes> {
        self.post_json("/user/2fa/backup-codes", &json!({})).await
    }

    async fn get_security(&self) -> Result<SecuritySettings> {
        self.get_json("/user/security").await
    }
}
