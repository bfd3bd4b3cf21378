// Adapters layer: concrete Mailer implementations for the outside world.

pub mod dry_run;
pub mod smtp;

pub use dry_run::DryRunMailer;
pub use smtp::SmtpMailer;
