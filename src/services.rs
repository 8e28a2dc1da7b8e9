// src/services.rs
//
// Ujście dla formularzy. Rdzeń tylko waliduje i przekazuje payload dalej;
// prawdziwy endpoint dostawy (CRM, e-mail, kolejka) wpina się przez ten
// trait przy wdrożeniu.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ContactMessagePayload, DistributorApplicationPayload};

#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit_application(
        &self,
        application: &DistributorApplicationPayload,
    ) -> Result<Uuid, AppError>;

    async fn submit_contact_message(
        &self,
        message: &ContactMessagePayload,
    ) -> Result<Uuid, AppError>;
}

/// Domyślna implementacja: payload ląduje w logu i dostaje identyfikator.
pub struct LoggingSubmissionSink;

#[async_trait]
impl SubmissionSink for LoggingSubmissionSink {
    async fn submit_application(
        &self,
        application: &DistributorApplicationPayload,
    ) -> Result<Uuid, AppError> {
        let submission_id = Uuid::new_v4();
        tracing::info!(
            %submission_id,
            business_name = %application.business_name,
            contact_name = %application.contact_name,
            email = %application.email,
            "Przyjęto wniosek dystrybutorski: {:?}",
            application
        );
        Ok(submission_id)
    }

    async fn submit_contact_message(
        &self,
        message: &ContactMessagePayload,
    ) -> Result<Uuid, AppError> {
        let submission_id = Uuid::new_v4();
        tracing::info!(
            %submission_id,
            email = %message.email,
            subject = %message.subject,
            "Przyjęto wiadomość kontaktową: {:?}",
            message
        );
        Ok(submission_id)
    }
}
