use crate::error::{Error, Result};
use crate::models::application::ActorRole::{self, Employer, Reviewer};
use crate::models::application::ApplicationStatus::{self, *};

/// The full role-gated transition table. Candidates drive no transition
/// after creation, so they have no rows. `Applied -> PendingHr` lets a
/// reviewer claim a submission for screening before deciding on it.
const TABLE: &[(ApplicationStatus, ActorRole, ApplicationStatus)] = &[
    (Applied, Reviewer, PendingHr),
    (Applied, Reviewer, ForwardedToCompany),
    (Applied, Reviewer, HrRejected),
    (PendingHr, Reviewer, ForwardedToCompany),
    (PendingHr, Reviewer, HrRejected),
    (ForwardedToCompany, Employer, CompanyViewed),
    (ForwardedToCompany, Employer, CompanyAccepted),
    (ForwardedToCompany, Employer, CompanyRejected),
    (CompanyViewed, Employer, CompanyAccepted),
    (CompanyViewed, Employer, CompanyRejected),
];

/// Outcome of checking a requested move against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The move is in the table; the store should append it.
    Apply,
    /// Requested status equals the current one. Idempotent success with
    /// no duplicate history entry.
    NoOp,
}

pub fn allowed_from(current: ApplicationStatus, role: ActorRole) -> Vec<ApplicationStatus> {
    TABLE
        .iter()
        .filter(|(from, by, _)| *from == current && *by == role)
        .map(|(_, _, to)| *to)
        .collect()
}

pub fn validate(
    current: ApplicationStatus,
    requested: ApplicationStatus,
    role: ActorRole,
) -> Result<TransitionOutcome> {
    if requested == current {
        return Ok(TransitionOutcome::NoOp);
    }
    let legal = TABLE
        .iter()
        .any(|(from, by, to)| *from == current && *by == role && *to == requested);
    if legal {
        Ok(TransitionOutcome::Apply)
    } else {
        Err(Error::InvalidTransition {
            from: current,
            to: requested,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ActorRole::Candidate;

    fn assert_invalid(current: ApplicationStatus, requested: ApplicationStatus, role: ActorRole) {
        match validate(current, requested, role) {
            Err(Error::InvalidTransition { from, to, role: r }) => {
                assert_eq!(from, current);
                assert_eq!(to, requested);
                assert_eq!(r, role);
            }
            other => panic!("expected invalid transition, got {other:?}"),
        }
    }

    #[test]
    fn reviewer_screens_from_applied_and_pending() {
        for from in [Applied, PendingHr] {
            assert_eq!(
                validate(from, ForwardedToCompany, Reviewer).unwrap(),
                TransitionOutcome::Apply
            );
            assert_eq!(
                validate(from, HrRejected, Reviewer).unwrap(),
                TransitionOutcome::Apply
            );
        }
        assert_eq!(
            validate(Applied, PendingHr, Reviewer).unwrap(),
            TransitionOutcome::Apply
        );
    }

    #[test]
    fn employer_decides_forwarded_applications() {
        for from in [ForwardedToCompany, CompanyViewed] {
            assert_eq!(
                validate(from, CompanyAccepted, Employer).unwrap(),
                TransitionOutcome::Apply
            );
            assert_eq!(
                validate(from, CompanyRejected, Employer).unwrap(),
                TransitionOutcome::Apply
            );
        }
        assert_eq!(
            validate(ForwardedToCompany, CompanyViewed, Employer).unwrap(),
            TransitionOutcome::Apply
        );
    }

    #[test]
    fn employer_may_accept_without_viewing_first() {
        // Both edges exist, so skipping CompanyViewed is legal.
        assert_eq!(
            validate(ForwardedToCompany, CompanyAccepted, Employer).unwrap(),
            TransitionOutcome::Apply
        );
    }

    #[test]
    fn employer_cannot_touch_unforwarded_applications() {
        assert_invalid(PendingHr, CompanyAccepted, Employer);
        assert_invalid(Applied, CompanyViewed, Employer);
        assert_invalid(Applied, CompanyRejected, Employer);
    }

    #[test]
    fn candidates_drive_no_transitions() {
        for from in [Applied, PendingHr, ForwardedToCompany, CompanyViewed] {
            for to in [
                PendingHr,
                HrRejected,
                ForwardedToCompany,
                CompanyViewed,
                CompanyAccepted,
                CompanyRejected,
            ] {
                if to == from {
                    continue;
                }
                assert_invalid(from, to, Candidate);
            }
        }
    }

    #[test]
    fn terminal_states_are_dead_ends() {
        for terminal in [HrRejected, CompanyAccepted, CompanyRejected] {
            assert!(terminal.is_terminal());
            for role in [Candidate, Reviewer, Employer] {
                assert!(allowed_from(terminal, role).is_empty());
            }
        }
    }

    #[test]
    fn same_status_is_an_idempotent_noop() {
        assert_eq!(
            validate(ForwardedToCompany, ForwardedToCompany, Employer).unwrap(),
            TransitionOutcome::NoOp
        );
        assert_eq!(
            validate(Applied, Applied, Candidate).unwrap(),
            TransitionOutcome::NoOp
        );
    }

    #[test]
    fn roles_cannot_borrow_each_others_edges() {
        assert_invalid(Applied, ForwardedToCompany, Employer);
        assert_invalid(ForwardedToCompany, CompanyAccepted, Reviewer);
        assert_invalid(ForwardedToCompany, HrRejected, Reviewer);
    }
}
