// metrology-core/src/application/triage.rs

// Violation lifecycle use cases: load, apply the transition, persist.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::violation::{Violation, ViolationStats};
use crate::error::MetrologyError;
use crate::ports::store::{ViolationFilter, ViolationRepository};

async fn load<S: ViolationRepository + ?Sized>(
    store: &S,
    violation_id: &str,
) -> Result<Violation, MetrologyError> {
    store
        .get_violation(violation_id)
        .await?
        .ok_or_else(|| DomainError::ViolationNotFound(violation_id.to_string()).into())
}

pub async fn assign_violation<S: ViolationRepository + ?Sized>(
    store: &S,
    violation_id: &str,
    user_id: &str,
) -> Result<Violation, MetrologyError> {
    let mut violation = load(store, violation_id).await?;
    violation.assign(user_id)?;
    store.update_violation(&violation).await?;
    info!(violation_id, user_id, "violation assigned");
    Ok(violation)
}

pub async fn resolve_violation<S: ViolationRepository + ?Sized>(
    store: &S,
    violation_id: &str,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<Violation, MetrologyError> {
    let mut violation = load(store, violation_id).await?;
    violation.resolve(notes, now)?;
    store.update_violation(&violation).await?;
    info!(violation_id, "violation resolved");
    Ok(violation)
}

pub async fn dismiss_violation<S: ViolationRepository + ?Sized>(
    store: &S,
    violation_id: &str,
    notes: Option<String>,
) -> Result<Violation, MetrologyError> {
    let mut violation = load(store, violation_id).await?;
    violation.dismiss(notes)?;
    store.update_violation(&violation).await?;
    info!(violation_id, "violation dismissed");
    Ok(violation)
}

pub async fn list_violations<S: ViolationRepository + ?Sized>(
    store: &S,
    filter: &ViolationFilter,
) -> Result<Vec<Violation>, MetrologyError> {
    store.list_violations(filter).await
}

pub async fn violation_stats<S: ViolationRepository + ?Sized>(
    store: &S,
    filter: &ViolationFilter,
    now: DateTime<Utc>,
) -> Result<ViolationStats, MetrologyError> {
    let violations = store.list_violations(filter).await?;
    Ok(ViolationStats::compute(&violations, now))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::compliance::{Severity, ViolationDescriptor};
    use crate::domain::violation::ViolationStatus;
    use crate::infrastructure::adapters::InMemoryStore;
    use anyhow::Result;
    use chrono::Duration;

    async fn store_with_one() -> Result<(InMemoryStore, String)> {
        let store = InMemoryStore::new();
        let finding = ViolationDescriptor::new("country_of_origin", "Missing origin", Severity::Medium);
        let v = store
            .insert_violation(Violation::open("p-1", finding, Utc::now()))
            .await?;
        Ok((store, v.id))
    }

    #[tokio::test]
    async fn test_assign_then_resolve() -> Result<()> {
        let (store, id) = store_with_one().await?;

        let assigned = assign_violation(&store, &id, "inspector-7").await?;
        assert_eq!(assigned.status, ViolationStatus::Investigating);

        let first = Utc::now();
        let resolved = resolve_violation(&store, &id, Some("fixed".into()), first).await?;
        assert_eq!(resolved.resolved_at, Some(first));

        let again = resolve_violation(&store, &id, None, first + Duration::hours(2)).await?;
        assert_eq!(again.resolved_at, Some(first));

        let stored = store.get_violation(&id).await?.unwrap();
        assert_eq!(stored.status, ViolationStatus::Resolved);
        assert_eq!(stored.assigned_to.as_deref(), Some("inspector-7"));
        Ok(())
    }

    #[tokio::test]
    async fn test_dismissed_violation_cannot_be_assigned() -> Result<()> {
        let (store, id) = store_with_one().await?;
        dismiss_violation(&store, &id, Some("duplicate listing".into())).await?;

        let err = assign_violation(&store, &id, "inspector-7").await.unwrap_err();
        assert!(matches!(
            err,
            MetrologyError::Domain(DomainError::InvalidTransition { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_violation_is_not_found() -> Result<()> {
        let (store, _) = store_with_one().await?;
        let err = resolve_violation(&store, "nope", None, Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        Ok(())
    }

    #[tokio::test]
    async fn test_stats_follow_filter() -> Result<()> {
        let (store, id) = store_with_one().await?;
        assign_violation(&store, &id, "inspector-7").await?;

        let all = violation_stats(&store, &ViolationFilter::default(), Utc::now()).await?;
        assert_eq!(all.total, 1);

        let filter = ViolationFilter {
            assigned_to: Some("someone-else".into()),
            ..Default::default()
        };
        let none = violation_stats(&store, &filter, Utc::now()).await?;
        assert_eq!(none.total, 0);
        assert_eq!(list_violations(&store, &filter).await?.len(), 0);
        Ok(())
    }
}
