use sea_orm::DatabaseConnection;

use crate::choices::domain::{BuildServiceEntry, TokenEntry};
use crate::choices::repository::ChoiceSource;
use crate::errors::ServiceError;

pub struct SeaOrmChoiceSource {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl ChoiceSource for SeaOrmChoiceSource {
    async fn image_types(&self) -> Result<Vec<String>, ServiceError> {
        let rows = models::image_type::list_all(&self.db).await?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }

    async fn archs(&self) -> Result<Vec<String>, ServiceError> {
        let rows = models::arch::list_all(&self.db).await?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }

    async fn build_services(&self) -> Result<Vec<BuildServiceEntry>, ServiceError> {
        let rows = models::build_service::list_all(&self.db).await?;
        Ok(rows.into_iter().map(|r| BuildServiceEntry { name: r.name, apiurl: r.apiurl }).collect())
    }

    async fn tokens(&self) -> Result<Vec<TokenEntry>, ServiceError> {
        let rows = models::token::list_all(&self.db).await?;
        Ok(rows
            .into_iter()
            .map(|r| TokenEntry { name: r.name, default_value: r.default_value, description: r.description })
            .collect())
    }
}
