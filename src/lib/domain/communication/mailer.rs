//! Email provider capability

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod errors;
mod message;

pub use errors::MailerError;
pub use message::{Message, SendReceipt};

/// A transactional email provider
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `message` - The [`Message`] to hand over to the provider.
    ///
    /// # Returns
    /// - [`Ok`] with the provider's [`SendReceipt`] if the provider accepted the message.
    /// - [`Err`] containing a [`MailerError`] describing why it did not.
    async fn send_email(&self, message: &Message) -> Result<SendReceipt, MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_email(&self, message: &Message) -> Result<SendReceipt, MailerError>;
    }
}
