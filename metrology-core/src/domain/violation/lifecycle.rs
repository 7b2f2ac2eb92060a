// metrology-core/src/domain/violation/lifecycle.rs
//
// open -> investigating -> {resolved, dismissed}
// open -> {resolved, dismissed}
// Nothing leaves resolved or dismissed.

use chrono::{DateTime, Utc};

use super::record::{Violation, ViolationStatus};
use crate::domain::error::DomainError;

impl ViolationStatus {
    pub fn can_transition_to(&self, next: ViolationStatus) -> bool {
        use ViolationStatus::*;
        matches!(
            (self, next),
            (Open, Investigating)
                | (Investigating, Investigating)
                | (Open | Investigating, Resolved | Dismissed)
        )
    }
}

impl Violation {
    fn transition(&mut self, next: ViolationStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                violation_id: self.id.clone(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Assignment is the only way into `investigating`. Reassigning is allowed.
    pub fn assign(&mut self, user_id: &str) -> Result<(), DomainError> {
        self.transition(ViolationStatus::Investigating)?;
        self.assigned_to = Some(user_id.to_string());
        Ok(())
    }

    /// Idempotent on an already resolved violation: `resolved_at` keeps its
    /// first value. Notes are replaced only when provided.
    pub fn resolve(&mut self, notes: Option<String>, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != ViolationStatus::Resolved {
            self.transition(ViolationStatus::Resolved)?;
        }
        self.resolved_at.get_or_insert(now);
        if notes.is_some() {
            self.notes = notes;
        }
        Ok(())
    }

    /// Idempotent on an already dismissed violation.
    pub fn dismiss(&mut self, notes: Option<String>) -> Result<(), DomainError> {
        if self.status != ViolationStatus::Dismissed {
            self.transition(ViolationStatus::Dismissed)?;
        }
        if notes.is_some() {
            self.notes = notes;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::compliance::{Severity, ViolationDescriptor};
    use chrono::Duration;

    fn open_violation() -> Violation {
        Violation::open(
            "p1",
            ViolationDescriptor::new("price_display", "Missing MRP", Severity::High),
            Utc::now(),
        )
    }

    #[test]
    fn test_assign_moves_to_investigating() {
        let mut v = open_violation();
        v.assign("officer-7").unwrap();
        assert_eq!(v.status, ViolationStatus::Investigating);
        assert_eq!(v.assigned_to.as_deref(), Some("officer-7"));

        v.assign("officer-9").unwrap();
        assert_eq!(v.assigned_to.as_deref(), Some("officer-9"));
    }

    #[test]
    fn test_resolve_sets_timestamp_once() {
        let mut v = open_violation();
        let first = Utc::now();
        v.resolve(Some("Seller fixed listing".into()), first).unwrap();

        assert_eq!(v.status, ViolationStatus::Resolved);
        assert_eq!(v.resolved_at, Some(first));

        let later = first + Duration::hours(3);
        v.resolve(None, later).unwrap();
        assert_eq!(v.resolved_at, Some(first));
        assert_eq!(v.notes.as_deref(), Some("Seller fixed listing"));
    }

    #[test]
    fn test_resolve_from_investigating() {
        let mut v = open_violation();
        v.assign("officer-7").unwrap();
        v.resolve(None, Utc::now()).unwrap();
        assert_eq!(v.status, ViolationStatus::Resolved);
        assert_eq!(v.assigned_to.as_deref(), Some("officer-7"));
    }

    #[test]
    fn test_closed_violations_stay_closed() {
        let mut dismissed = open_violation();
        dismissed.dismiss(Some("duplicate listing".into())).unwrap();
        dismissed.dismiss(None).unwrap();
        assert!(dismissed.resolve(None, Utc::now()).is_err());
        assert!(dismissed.assign("officer-7").is_err());
        assert!(dismissed.resolved_at.is_none());

        let mut resolved = open_violation();
        resolved.resolve(None, Utc::now()).unwrap();
        let err = resolved.dismiss(None).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidTransition { ref from, ref to, .. } if from == "resolved" && to == "dismissed"
        ));
    }

    #[test]
    fn test_no_way_back_to_open() {
        for status in ViolationStatus::ALL {
            assert!(!status.can_transition_to(ViolationStatus::Open));
        }
    }
}
