//! Channel health management
//!
//! Classifies upstream failures, moves channels between `Enabled` and
//! `AutoDisabled` through a [`ChannelStore`], and tells operators about every
//! applied transition through a [`NotificationRouter`].

pub mod classifier;
pub mod controller;
pub mod keywords;
pub mod traits;


pub use classifier::{
    DISABLE_ERROR_CODES, DISABLE_ERROR_TYPES, DISABLE_RULES, DisableRule, ErrorClassifier, Rule,
    SkipReason, Verdict,
};
pub use controller::{ChannelHealthController, TransitionOutcome, notify_type_key};
pub use keywords::{KeywordMatcher, SubstringMatcher};
pub use traits::{ChannelStore, NotificationRouter};
