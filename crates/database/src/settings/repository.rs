use crate::{
    settings::model::SETTINGS_DOC_ID,
    Database,
};
use async_trait::async_trait;
use mongodb::{bson::doc, options::UpdateOptions};
use std::sync::Arc;
use utils::AppResult;

pub type DynSettingsRepository = Arc<dyn SettingsRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait SettingsRepositoryTrait {
    async fn get_payment_number(&self) -> AppResult<Option<String>>;

    async fn set_payment_number(&self, number: &str) -> AppResult<()>;
}

#[async_trait]
impl SettingsRepositoryTrait for Database {
    async fn get_payment_number(&self) -> AppResult<Option<String>> {
        let filter = doc! {"_id": SETTINGS_DOC_ID};
        let settings = self.admin_settings.find_one(filter, None).await?;

        Ok(settings.and_then(|s| s.active_payment_number))
    }

    async fn set_payment_number(&self, number: &str) -> AppResult<()> {
        let filter = doc! {"_id": SETTINGS_DOC_ID};
        let update = doc! {"$set": {"activePaymentNumber": number}};
        let options = UpdateOptions::builder().upsert(true).build();

        self.admin_settings.update_one(filter, update, options).await?;

        Ok(())
    }
}
