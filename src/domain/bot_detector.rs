//! User-agent based crawler detection.

/// Lowercase substrings that mark a user agent as a crawler, preview fetcher
/// or ad bot.
const BOT_SIGNATURES: &[&str] = &[
    "bot",
    "crawl",
    "slurp",
    "spider",
    "mediapartners",
    "google",
    "bingpreview",
    "facebookexternalhit",
    "linkedinbot",
    "embedly",
    "quora link preview",
    "outbrain",
    "pinterest",
    "developers.google.com/+/web/snippet",
];

/// Returns `true` if the user agent looks like a bot or crawler.
///
/// A missing or empty user agent is treated as a regular visitor.
pub fn is_bot(user_agent: Option<&str>) -> bool {
    let Some(agent) = user_agent.filter(|ua| !ua.is_empty()) else {
        return false;
    };

    let agent = agent.to_lowercase();

    BOT_SIGNATURES
        .iter()
        .any(|signature| agent.contains(signature))
}
