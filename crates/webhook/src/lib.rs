//! org-watch chat webhook adapter.
//!
//! Implements the [`watch::Notifier`] trait twice:
//!
//! - [`FeishuNotifier`] posts each message as a Feishu (Lark) custom-bot
//!   "text" message.
//! - [`LogNotifier`] writes each message to the log instead; used for dry
//!   runs.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Payload shape, transport, and interpretation of the
//! bot's reply all live here. The [`watch`] crate sees only
//! [`watch::Notifier`] and [`watch::DeliveryError`].

mod dry_run;
mod feishu;

pub use dry_run::LogNotifier;
pub use feishu::FeishuNotifier;
