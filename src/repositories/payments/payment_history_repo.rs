//! 결제 이력 리포지토리

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};
use once_cell::sync::OnceCell;

use crate::{
    core::{
        errors::AppError,
        registry::{Repository, RepositoryRegistration, ServiceLocator},
    },
    db::{is_duplicate_key_error, Database},
    domain::entities::payments::PaymentHistory,
};

const COLLECTION: &str = "payment_histories";

static PAYMENT_HISTORY_REPOSITORY_INSTANCE: OnceCell<Arc<PaymentHistoryRepository>> =
    OnceCell::new();

pub struct PaymentHistoryRepository {
    db: Arc<Database>,
}

impl PaymentHistoryRepository {
    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
        }
    }

    pub fn instance() -> Arc<Self> {
        PAYMENT_HISTORY_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn collection(&self) -> Collection<PaymentHistory> {
        self.db.collection::<PaymentHistory>(COLLECTION)
    }

    pub async fn find_by_payment_id(&self, payment_id: &str) -> Result<Option<PaymentHistory>, AppError> {
        self.collection()
            .find_one(doc! { "payment_id": payment_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut payment: PaymentHistory) -> Result<PaymentHistory, AppError> {
        let result = self.collection().insert_one(&payment).await.map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::ConflictError(format!(
                    "Payment history already exists: {}",
                    payment.payment_id
                ))
            } else {
                AppError::DatabaseError(e.to_string())
            }
        })?;

        payment.id = result.inserted_id.as_object_id();
        Ok(payment)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let payment_id_index = IndexModel::builder()
            .keys(doc! { "payment_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("payment_id_unique".to_string())
                .build())
            .build();

        let challenge_index = IndexModel::builder()
            .keys(doc! { "challenge_id": 1 })
            .options(IndexOptions::builder()
                .name("challenge_id".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([payment_id_index, challenge_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Repository for PaymentHistoryRepository {
    fn name(&self) -> &str {
        "payment_history"
    }

    fn collection_name(&self) -> &str {
        COLLECTION
    }

    async fn init(&self) -> Result<(), AppError> {
        self.create_indexes().await
    }
}

fn payment_history_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(PaymentHistoryRepository::instance())
}

fn payment_history_repository_initializer() -> BoxFuture<'static, Result<(), AppError>> {
    Box::pin(async { PaymentHistoryRepository::instance().init().await })
}

inventory::submit! {
    RepositoryRegistration {
        name: "payment_history_repository",
        constructor: payment_history_repository_constructor,
        initializer: payment_history_repository_initializer,
    }
}
