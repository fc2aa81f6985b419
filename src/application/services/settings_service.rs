//! Redirect settings service: snapshots for readers, sanitized writes for admins.

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::entities::{RedirectSettings, StoredRule, StoredSettings};
use crate::domain::repositories::SettingsRepository;
use crate::domain::rule_set::{Rule, RuleError};
use crate::error::AppError;
use crate::utils::url_normalizer::normalize_url;

/// Longest accepted redirect cookie lifetime, in days.
pub const MAX_COOKIE_DAYS: u32 = 3650;

/// A rule as submitted by an administrator, before sanitization.
#[derive(Debug, Clone, Default)]
pub struct RuleInput {
    pub country: Option<String>,
    pub url: Option<String>,
}

impl RuleInput {
    pub fn new(country: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
            url: Some(url.into()),
        }
    }
}

/// Partial settings update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub rules: Option<Vec<RuleInput>>,
    pub cookie_days: Option<i64>,
    pub redirect_enabled: Option<bool>,
}

/// A submitted rule that was not stored, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRule {
    pub index: usize,
    pub country: Option<String>,
    pub url: Option<String>,
    pub reason: String,
}

/// Result of a successful update.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub settings: Arc<StoredSettings>,
    pub rejected: Vec<RejectedRule>,
}

/// Sanitizes one submitted rule into its stored form.
///
/// Trims and uppercases the country, trims and normalizes the URL, then
/// checks that the pair forms a valid [`Rule`].
///
/// # Errors
///
/// Returns a [`RuleError`] describing the first problem found.
pub fn sanitize_rule(input: &RuleInput) -> Result<StoredRule, RuleError> {
    let country = input
        .country
        .as_deref()
        .map(|c| c.trim().to_ascii_uppercase())
        .filter(|c| !c.is_empty())
        .ok_or(RuleError::MissingCountry)?;
    let url = input
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(RuleError::MissingUrl)?;

    let url = normalize_url(url)?;
    let rule = Rule::new(&country, &url)?;

    Ok(StoredRule {
        country: rule.country.to_string(),
        url: rule.url,
    })
}

/// Sanitizes a batch of submitted rules, keeping order.
pub fn sanitize_rules(inputs: &[RuleInput]) -> (Vec<StoredRule>, Vec<RejectedRule>) {
    let mut accepted = Vec::with_capacity(inputs.len());
    let mut rejected = Vec::new();

    for (index, input) in inputs.iter().enumerate() {
        match sanitize_rule(input) {
            Ok(rule) => accepted.push(rule),
            Err(e) => rejected.push(RejectedRule {
                index,
                country: input.country.clone(),
                url: input.url.clone(),
                reason: e.to_string(),
            }),
        }
    }

    (accepted, rejected)
}

/// Service for reading and updating the redirect settings document.
///
/// Readers get a [`RedirectSettings`] snapshot built from a single repository
/// read. Writers go through [`sanitize_rules`] and always persist a clean
/// document. Each write holds `write_lock` from the read of the current
/// document until the save, so concurrent partial updates never drop each
/// other's fields.
pub struct SettingsService<R: SettingsRepository + ?Sized = dyn SettingsRepository> {
    write_lock: Mutex<()>,
    repository: Arc<R>,
}

impl<R: SettingsRepository + ?Sized> SettingsService<R> {
    /// Creates a new settings service.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            write_lock: Mutex::new(()),
            repository,
        }
    }

    /// Returns the raw stored document.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be read.
    pub async fn stored(&self) -> Result<Arc<StoredSettings>, AppError> {
        self.repository.load().await
    }

    /// Returns a consistent, typed snapshot of the current settings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be read.
    pub async fn snapshot(&self) -> Result<RedirectSettings, AppError> {
        let stored = self.repository.load().await?;
        Ok(RedirectSettings::from_stored(&stored))
    }

    /// Applies a partial update and persists a clean document.
    ///
    /// Submitted rules replace the whole rule list; entries that fail
    /// sanitization are left out and reported in [`UpdateOutcome::rejected`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `cookie_days` is outside
    /// `1..=MAX_COOKIE_DAYS`.
    /// Returns [`AppError::Internal`] if the store cannot be read or written.
    pub async fn update(&self, update: SettingsUpdate) -> Result<UpdateOutcome, AppError> {
        let cookie_days = update
            .cookie_days
            .map(|days| {
                u32::try_from(days)
                    .ok()
                    .filter(|d| (1..=MAX_COOKIE_DAYS).contains(d))
                    .ok_or_else(|| {
                        AppError::bad_request(
                            "cookie_days out of range",
                            json!({"cookie_days": days, "min": 1, "max": MAX_COOKIE_DAYS}),
                        )
                    })
            })
            .transpose()?;

        let _guard = self.write_lock.lock().await;
        let current = self.snapshot().await?;

        let (rules, rejected) = match update.rules {
            Some(inputs) => sanitize_rules(&inputs),
            None => (stored_rules(&current), Vec::new()),
        };

        let mut document = StoredSettings::new(
            rules,
            cookie_days.unwrap_or(current.cookie_days),
            update.redirect_enabled.unwrap_or(current.redirect_enabled),
        );
        document.updated_at = Some(Utc::now());

        self.repository.save(document.clone()).await?;

        info!(
            "Settings updated: {} rules ({} rejected), cookie_days={}, enabled={}",
            rules_count(&document),
            rejected.len(),
            document.cookie_days,
            document.redirect_enabled
        );

        Ok(UpdateOutcome {
            settings: Arc::new(document),
            rejected,
        })
    }

    /// Appends one rule after the existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the rule fails sanitization.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn add_rule(&self, input: RuleInput) -> Result<StoredRule, AppError> {
        let rule = sanitize_rule(&input).map_err(|e| {
            AppError::bad_request(
                "Invalid rule",
                json!({"reason": e.to_string(), "country": input.country, "url": input.url}),
            )
        })?;

        let _guard = self.write_lock.lock().await;
        let current = self.snapshot().await?;
        let mut rules = stored_rules(&current);
        rules.push(rule.clone());

        let mut document =
            StoredSettings::new(rules, current.cookie_days, current.redirect_enabled);
        document.updated_at = Some(Utc::now());
        self.repository.save(document).await?;

        Ok(rule)
    }

    /// Removes every rule for `country`. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no rule exists for the country.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn remove_country(&self, country: &str) -> Result<usize, AppError> {
        let _guard = self.write_lock.lock().await;
        let current = self.snapshot().await?;
        let before = current.rules.len();

        let rules: Vec<StoredRule> = stored_rules(&current)
            .into_iter()
            .filter(|rule| !rule.country.eq_ignore_ascii_case(country.trim()))
            .collect();

        let removed = before - rules.len();
        if removed == 0 {
            return Err(AppError::not_found(
                "No rule for country",
                json!({"country": country}),
            ));
        }

        let mut document =
            StoredSettings::new(rules, current.cookie_days, current.redirect_enabled);
        document.updated_at = Some(Utc::now());
        self.repository.save(document).await?;

        Ok(removed)
    }

    /// Describes the backing store.
    pub fn describe(&self) -> String {
        self.repository.describe()
    }
}

/// Converts the valid rules of a snapshot back to their stored form.
fn stored_rules(settings: &RedirectSettings) -> Vec<StoredRule> {
    settings
        .rules
        .iter()
        .map(|rule| StoredRule {
            country: rule.country.to_string(),
            url: rule.url.clone(),
        })
        .collect()
}

fn rules_count(document: &StoredSettings) -> usize {
    document.rules.as_array().map_or(0, Vec::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockSettingsRepository;
    use crate::infrastructure::persistence::InMemorySettingsRepository;
    use async_trait::async_trait;

    /// Yields to the scheduler around every read so concurrent writers interleave.
    struct YieldingRepository(InMemorySettingsRepository);

    #[async_trait]
    impl SettingsRepository for YieldingRepository {
        async fn load(&self) -> Result<Arc<StoredSettings>, AppError> {
            tokio::task::yield_now().await;
            let settings = self.0.load().await;
            tokio::task::yield_now().await;
            settings
        }

        async fn save(&self, settings: StoredSettings) -> Result<(), AppError> {
            tokio::task::yield_now().await;
            self.0.save(settings).await
        }

        fn describe(&self) -> String {
            self.0.describe()
        }
    }

    fn stored_with(rules: &[(&str, &str)]) -> Arc<StoredSettings> {
        Arc::new(StoredSettings::new(
            rules
                .iter()
                .map(|(c, u)| StoredRule {
                    country: c.to_string(),
                    url: u.to_string(),
                })
                .collect(),
            7,
            true,
        ))
    }

    #[test]
    fn test_sanitize_rule_normalizes() {
        let rule = sanitize_rule(&RuleInput::new(" es ", " HTTPS://Example.COM/es#top ")).unwrap();
        assert_eq!(rule.country, "ES");
        assert_eq!(rule.url, "https://example.com/es");
    }

    #[test]
    fn test_sanitize_rule_missing_fields() {
        let missing_country = RuleInput {
            country: None,
            url: Some("https://example.com".to_string()),
        };
        assert!(matches!(
            sanitize_rule(&missing_country),
            Err(RuleError::MissingCountry)
        ));

        let blank_url = RuleInput::new("ES", "   ");
        assert!(matches!(
            sanitize_rule(&blank_url),
            Err(RuleError::MissingUrl)
        ));
    }

    #[test]
    fn test_sanitize_rules_reports_rejections() {
        let (accepted, rejected) = sanitize_rules(&[
            RuleInput::new("es", "https://example.com/es"),
            RuleInput::new("", "https://example.com/x"),
            RuleInput::new("FRA", "https://example.com/fr"),
            RuleInput::new("DE", "javascript:alert(1)"),
            RuleInput::new("pt", "/pt"),
        ]);

        let countries: Vec<&str> = accepted.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["ES", "PT"]);

        let indexes: Vec<usize> = rejected.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_snapshot_reads_once() {
        let mut mock_repo = MockSettingsRepository::new();
        mock_repo
            .expect_load()
            .times(1)
            .returning(|| Ok(stored_with(&[("ES", "https://example.com/es")])));

        let service = SettingsService::new(Arc::new(mock_repo));
        let snapshot = service.snapshot().await.unwrap();

        assert_eq!(snapshot.rules.len(), 1);
        assert_eq!(snapshot.cookie_days, 7);
    }

    #[tokio::test]
    async fn test_snapshot_propagates_store_error() {
        let mut mock_repo = MockSettingsRepository::new();
        mock_repo
            .expect_load()
            .times(1)
            .returning(|| Err(AppError::internal("disk gone", json!({}))));

        let service = SettingsService::new(Arc::new(mock_repo));
        let result = service.snapshot().await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_update_replaces_rules_and_keeps_scalars() {
        let mut mock_repo = MockSettingsRepository::new();
        mock_repo
            .expect_load()
            .times(1)
            .returning(|| Ok(stored_with(&[("ES", "https://example.com/es")])));
        mock_repo
            .expect_save()
            .withf(|doc| {
                doc.rules == json!([{"country": "FR", "url": "https://example.com/fr"}])
                    && doc.cookie_days == json!(7)
                    && doc.redirect_enabled == json!(true)
                    && doc.updated_at.is_some()
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = SettingsService::new(Arc::new(mock_repo));
        let outcome = service
            .update(SettingsUpdate {
                rules: Some(vec![
                    RuleInput::new("fr", "https://example.com/fr"),
                    RuleInput::new("", ""),
                ]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].index, 1);
    }

    #[tokio::test]
    async fn test_update_scalars_keeps_rules() {
        let mut mock_repo = MockSettingsRepository::new();
        mock_repo
            .expect_load()
            .times(1)
            .returning(|| Ok(stored_with(&[("ES", "https://example.com/es")])));
        mock_repo
            .expect_save()
            .withf(|doc| {
                doc.rules == json!([{"country": "ES", "url": "https://example.com/es"}])
                    && doc.cookie_days == json!(30)
                    && doc.redirect_enabled == json!(false)
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = SettingsService::new(Arc::new(mock_repo));
        let outcome = service
            .update(SettingsUpdate {
                rules: None,
                cookie_days: Some(30),
                redirect_enabled: Some(false),
            })
            .await
            .unwrap();

        assert!(outcome.rejected.is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_zero_cookie_days() {
        let mock_repo = MockSettingsRepository::new();
        let service = SettingsService::new(Arc::new(mock_repo));

        let result = service
            .update(SettingsUpdate {
                cookie_days: Some(0),
                ..Default::default()
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_rejects_cookie_days_above_max() {
        let service = SettingsService::new(Arc::new(MockSettingsRepository::new()));

        let result = service
            .update(SettingsUpdate {
                cookie_days: Some(i64::from(MAX_COOKIE_DAYS) + 1),
                ..Default::default()
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_partial_updates_keep_both_fields() {
        let repo = Arc::new(YieldingRepository(InMemorySettingsRepository::default()));
        let service = SettingsService::new(repo.clone());

        let (days, enabled) = tokio::join!(
            service.update(SettingsUpdate {
                cookie_days: Some(14),
                ..Default::default()
            }),
            service.update(SettingsUpdate {
                redirect_enabled: Some(false),
                ..Default::default()
            }),
        );
        days.unwrap();
        enabled.unwrap();

        let stored = repo.load().await.unwrap();
        assert_eq!(stored.cookie_days, json!(14));
        assert_eq!(stored.redirect_enabled, json!(false));
    }

    #[tokio::test]
    async fn test_concurrent_rule_edits_keep_every_rule() {
        let repo = Arc::new(YieldingRepository(InMemorySettingsRepository::default()));
        let service = SettingsService::new(repo.clone());

        let (es, fr) = tokio::join!(
            service.add_rule(RuleInput::new("es", "/es")),
            service.add_rule(RuleInput::new("fr", "/fr")),
        );
        es.unwrap();
        fr.unwrap();

        assert_eq!(service.snapshot().await.unwrap().rules.len(), 2);
    }

    #[tokio::test]
    async fn test_add_rule_appends() {
        let mut mock_repo = MockSettingsRepository::new();
        mock_repo
            .expect_load()
            .times(1)
            .returning(|| Ok(stored_with(&[("ES", "https://example.com/es")])));
        mock_repo
            .expect_save()
            .withf(|doc| {
                doc.rules
                    == json!([
                        {"country": "ES", "url": "https://example.com/es"},
                        {"country": "IT", "url": "/it"}
                    ])
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = SettingsService::new(Arc::new(mock_repo));
        let rule = service.add_rule(RuleInput::new("it", "/it")).await.unwrap();

        assert_eq!(rule.country, "IT");
    }

    #[tokio::test]
    async fn test_add_rule_invalid() {
        let mock_repo = MockSettingsRepository::new();
        let service = SettingsService::new(Arc::new(mock_repo));

        let result = service
            .add_rule(RuleInput::new("Spain", "https://example.com/es"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_remove_country() {
        let mut mock_repo = MockSettingsRepository::new();
        mock_repo.expect_load().times(1).returning(|| {
            Ok(stored_with(&[
                ("ES", "https://example.com/es"),
                ("FR", "https://example.com/fr"),
                ("ES", "https://example.com/es-2"),
            ]))
        });
        mock_repo
            .expect_save()
            .withf(|doc| doc.rules == json!([{"country": "FR", "url": "https://example.com/fr"}]))
            .times(1)
            .returning(|_| Ok(()));

        let service = SettingsService::new(Arc::new(mock_repo));
        let removed = service.remove_country("es").await.unwrap();

        assert_eq!(removed, 2);
    }

    #[tokio::test]
    async fn test_remove_country_not_found() {
        let mut mock_repo = MockSettingsRepository::new();
        mock_repo
            .expect_load()
            .times(1)
            .returning(|| Ok(stored_with(&[("ES", "https://example.com/es")])));

        let service = SettingsService::new(Arc::new(mock_repo));
        let result = service.remove_country("DE").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
