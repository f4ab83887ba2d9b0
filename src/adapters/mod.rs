pub mod infoblox;
pub mod mailer;
