//! Upstream error classification
//!
//! Decides from the shape of an upstream error whether the channel that
//! produced it should be taken out of rotation. The decision is the first
//! matching row of [`DISABLE_RULES`]; provider-specific rows sit ahead of the
//! generic ones and the skip-retry row vetoes everything after it.

use super::keywords::{KeywordMatcher, SubstringMatcher};
use crate::config::ChannelHealthConfig;
use crate::core::channel::{ChannelStatus, ChannelType, UpstreamError};
use std::sync::Arc;
use tracing::debug;

/// Error codes that always mean the credential is unusable
pub const DISABLE_ERROR_CODES: &[&str] = &[
    "invalid_api_key",
    "account_deactivated",
    "billing_not_active",
    "pre_consume_token_quota_failed",
    "Arrearage",
];

/// Error types that always mean the credential is unusable
pub const DISABLE_ERROR_TYPES: &[&str] = &[
    "insufficient_quota",
    "insufficient_user_quota",
    "authentication_error",
    "permission_error",
    "forbidden",
];

/// Which rule decided to disable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableRule {
    ChannelLevel,
    Unauthorized,
    GeminiForbidden,
    ErrorCode,
    ErrorType,
    Keyword,
}

/// Why classification did not run to a disable decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Automatic disable is switched off
    FeatureDisabled,
    /// There was no error to classify
    NoError,
    /// The caller marked the error as never disable-worthy
    SkipRetry,
}

/// Outcome of classifying one upstream error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Disable(DisableRule),
    Skip(SkipReason),
    /// No rule matched
    Keep,
}

impl Verdict {
    pub fn is_disable(&self) -> bool {
        matches!(self, Verdict::Disable(_))
    }
}

/// Everything a rule may look at
pub struct RuleContext<'a> {
    pub channel_type: ChannelType,
    pub error: &'a UpstreamError,
    pub keywords: &'a [String],
    pub matcher: &'a dyn KeywordMatcher,
}

/// One row of the rule table
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&RuleContext<'_>) -> bool,
    pub verdict: Verdict,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("verdict", &self.verdict)
            .finish()
    }
}

/// Ordered rule table; evaluation stops at the first match
pub static DISABLE_RULES: &[Rule] = &[
    Rule {
        name: "channel_level",
        matches: is_channel_level,
        verdict: Verdict::Disable(DisableRule::ChannelLevel),
    },
    Rule {
        name: "skip_retry",
        matches: is_skip_retry,
        verdict: Verdict::Skip(SkipReason::SkipRetry),
    },
    Rule {
        name: "unauthorized",
        matches: is_unauthorized,
        verdict: Verdict::Disable(DisableRule::Unauthorized),
    },
    Rule {
        name: "gemini_forbidden",
        matches: is_gemini_forbidden,
        verdict: Verdict::Disable(DisableRule::GeminiForbidden),
    },
    Rule {
        name: "error_code",
        matches: has_disable_code,
        verdict: Verdict::Disable(DisableRule::ErrorCode),
    },
    Rule {
        name: "error_type",
        matches: has_disable_type,
        verdict: Verdict::Disable(DisableRule::ErrorType),
    },
    Rule {
        name: "keyword",
        matches: has_disable_keyword,
        verdict: Verdict::Disable(DisableRule::Keyword),
    },
];

fn is_channel_level(ctx: &RuleContext<'_>) -> bool {
    ctx.error.channel_level
}

fn is_skip_retry(ctx: &RuleContext<'_>) -> bool {
    ctx.error.skip_retry
}

fn is_unauthorized(ctx: &RuleContext<'_>) -> bool {
    ctx.error.status_code == 401
}

fn is_gemini_forbidden(ctx: &RuleContext<'_>) -> bool {
    ctx.error.status_code == 403 && ctx.channel_type.is_gemini()
}

fn has_disable_code(ctx: &RuleContext<'_>) -> bool {
    DISABLE_ERROR_CODES.contains(&ctx.error.code.as_str())
}

fn has_disable_type(ctx: &RuleContext<'_>) -> bool {
    DISABLE_ERROR_TYPES.contains(&ctx.error.error_type.as_str())
}

fn has_disable_keyword(ctx: &RuleContext<'_>) -> bool {
    let message = ctx.error.to_string().to_lowercase();
    ctx.matcher.matches(&message, ctx.keywords)
}

/// Applies [`DISABLE_RULES`] under the configured switches
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    settings: ChannelHealthConfig,
    matcher: Arc<dyn KeywordMatcher>,
}

impl ErrorClassifier {
    pub fn new(settings: ChannelHealthConfig) -> Self {
        Self::with_matcher(settings, Arc::new(SubstringMatcher))
    }

    pub fn with_matcher(settings: ChannelHealthConfig, matcher: Arc<dyn KeywordMatcher>) -> Self {
        Self { settings, matcher }
    }

    pub fn settings(&self) -> &ChannelHealthConfig {
        &self.settings
    }

    /// Run the rule table and report which row decided
    pub fn classify(&self, channel_type: ChannelType, err: Option<&UpstreamError>) -> Verdict {
        if !self.settings.automatic_disable_enabled {
            return Verdict::Skip(SkipReason::FeatureDisabled);
        }
        let Some(error) = err else {
            return Verdict::Skip(SkipReason::NoError);
        };

        let ctx = RuleContext {
            channel_type,
            error,
            keywords: &self.settings.disable_keywords,
            matcher: self.matcher.as_ref(),
        };

        match DISABLE_RULES.iter().find(|rule| (rule.matches)(&ctx)) {
            Some(rule) => {
                debug!(
                    rule = rule.name,
                    status = error.status_code,
                    channel_type = channel_type.0,
                    "Upstream error matched classification rule"
                );
                rule.verdict
            }
            None => Verdict::Keep,
        }
    }

    /// Whether the error should take the channel out of rotation
    pub fn should_disable(&self, channel_type: ChannelType, err: Option<&UpstreamError>) -> bool {
        self.classify(channel_type, err).is_disable()
    }

    /// Whether a channel may be restored after a request without error
    pub fn should_enable(&self, err: Option<&UpstreamError>, stored_status: ChannelStatus) -> bool {
        self.settings.automatic_enable_enabled
            && err.is_none()
            && stored_status == ChannelStatus::AutoDisabled
    }
}
