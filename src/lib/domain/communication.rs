//! Email communication: requests, addresses, the mailer capability and the dispatcher.

pub mod dispatcher;
pub mod email_addresses;
pub mod mailer;
pub mod requests;
