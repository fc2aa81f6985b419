//! The redirect decision engine.
//!
//! Evaluation is a fixed sequence of short-circuit checks. Cheap, local
//! request checks run first, then the bot scan and country parsing, then the
//! rule lookup and the loop guard:
//!
//! 1. admin/ajax context
//! 2. "already redirected" cookie present
//! 3. not the front page
//! 4. feature disabled
//! 5. bot or crawler user agent
//! 6. missing or invalid country
//! 7. no rules configured
//! 8. no rule for the country
//! 9. request already on the rule's target
//!
//! Anything that survives all nine becomes a [`Decision::Redirect`].

use url::Url;

use crate::domain::bot_detector;
use crate::domain::country;
use crate::domain::entities::{Decision, RedirectSettings, RequestContext, SkipReason};
use crate::utils::url_normalizer::trim_slashes;

/// A named precondition evaluated against the request and settings.
struct Gate {
    name: &'static str,
    skip_when: fn(&RequestContext, &RedirectSettings) -> bool,
    reason: SkipReason,
}

/// Request-level gates, in evaluation order.
const GATES: &[Gate] = &[
    Gate {
        name: "admin_or_ajax",
        skip_when: |ctx, _| ctx.is_admin_or_ajax,
        reason: SkipReason::AdminOrAjax,
    },
    Gate {
        name: "redirect_cookie",
        skip_when: |ctx, _| ctx.has_redirect_cookie,
        reason: SkipReason::AlreadyRedirected,
    },
    Gate {
        name: "front_page",
        skip_when: |ctx, _| !ctx.is_front_page,
        reason: SkipReason::NotFrontPage,
    },
    Gate {
        name: "enabled",
        skip_when: |_, settings| !settings.redirect_enabled,
        reason: SkipReason::Disabled,
    },
    Gate {
        name: "bot",
        skip_when: |ctx, _| bot_detector::is_bot(ctx.user_agent.as_deref()),
        reason: SkipReason::Bot,
    },
];

/// Pure decision engine bound to the site's public URL.
#[derive(Debug, Clone)]
pub struct RedirectEngine {
    site_url: Url,
}

impl RedirectEngine {
    /// Creates an engine resolving targets against the origin of `site_url`.
    ///
    /// Rule target paths are absolute site paths, so any path on `site_url`
    /// is dropped: `https://example.com/blog` resolves `blog/es` to
    /// `https://example.com/blog/es`.
    pub fn new(mut site_url: Url) -> Self {
        site_url.set_path("/");
        site_url.set_query(None);
        site_url.set_fragment(None);

        Self { site_url }
    }

    pub fn site_url(&self) -> &Url {
        &self.site_url
    }

    /// Decides what to do with one request.
    pub fn decide(&self, ctx: &RequestContext, settings: &RedirectSettings) -> Decision {
        if let Some(gate) = GATES.iter().find(|gate| (gate.skip_when)(ctx, settings)) {
            tracing::trace!(gate = gate.name, "gate closed");
            return Decision::Skip(gate.reason);
        }

        let Some(country) = country::extract(ctx.country_header.as_deref()) else {
            return Decision::Skip(SkipReason::NoCountry);
        };

        if settings.rules.is_empty() {
            return Decision::Skip(SkipReason::NoRules);
        }

        let Some(rule) = settings.rules.find_match(&country) else {
            return Decision::Skip(SkipReason::NoMatchingRule);
        };

        if trim_slashes(&ctx.request_path) == rule.target_path {
            return Decision::Skip(SkipReason::AlreadyAtTarget);
        }

        match self.resolve(&rule.target_path) {
            Some(location) => Decision::Redirect {
                country,
                location,
                cookie_max_age: settings.cookie_max_age(),
            },
            None => Decision::Skip(SkipReason::InvalidTarget),
        }
    }

    /// Joins a target path onto the site origin.
    ///
    /// The `./` prefix keeps segments such as `a:b` from being read as a scheme.
    fn resolve(&self, target_path: &str) -> Option<String> {
        self.site_url
            .join(&format!("./{target_path}"))
            .ok()
            .map(String::from)
    }
}
