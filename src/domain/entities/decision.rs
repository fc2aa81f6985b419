//! Outcome of a redirect evaluation.

use std::fmt;

use crate::domain::country::CountryCode;

/// Why a request was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    AdminOrAjax,
    AlreadyRedirected,
    NotFrontPage,
    Disabled,
    Bot,
    NoCountry,
    NoRules,
    NoMatchingRule,
    /// The visitor is already on the rule's target.
    AlreadyAtTarget,
    /// The target path could not be joined onto the site URL.
    InvalidTarget,
    SettingsUnavailable,
}

impl SkipReason {
    /// Stable label for logs, metrics and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminOrAjax => "admin_or_ajax",
            Self::AlreadyRedirected => "already_redirected",
            Self::NotFrontPage => "not_front_page",
            Self::Disabled => "disabled",
            Self::Bot => "bot",
            Self::NoCountry => "no_country",
            Self::NoRules => "no_rules",
            Self::NoMatchingRule => "no_matching_rule",
            Self::AlreadyAtTarget => "already_at_target",
            Self::InvalidTarget => "invalid_target",
            Self::SettingsUnavailable => "settings_unavailable",
        }
    }

    /// Human readable explanation.
    pub fn description(&self) -> &'static str {
        match self {
            Self::AdminOrAjax => "admin/ajax context",
            Self::AlreadyRedirected => "already redirected this session",
            Self::NotFrontPage => "not eligible page",
            Self::Disabled => "feature disabled",
            Self::Bot => "bot/crawler",
            Self::NoCountry => "no/invalid country signal",
            Self::NoRules => "no rules configured",
            Self::NoMatchingRule => "no matching rule for country",
            Self::AlreadyAtTarget => "already at target, avoiding redirect loop",
            Self::InvalidTarget => "target cannot be resolved against site URL",
            Self::SettingsUnavailable => "settings could not be loaded",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The single decision made per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip(SkipReason),
    Redirect {
        country: CountryCode,
        /// Absolute target URL for the `Location` header.
        location: String,
        /// Lifetime of the "already redirected" cookie, in seconds.
        cookie_max_age: u64,
    },
}

impl Decision {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// Label used for metrics: `redirect` or the skip reason.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Skip(reason) => reason.as_str(),
            Self::Redirect { .. } => "redirect",
        }
    }
}
