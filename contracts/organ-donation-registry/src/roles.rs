// roles.rs - Role and verification state machine
// Accounts move Unregistered -> PendingVerification -> Verified, with
// admin-only side branches (Suspended, Flagged, and for donors Deceased
// plus the commitment-validity toggle). Every guard is evaluated against
// a snapshot of the target; entrypoints fetch the snapshot, call
// `evaluate_transition`, and only then mutate storage.

use crate::{ContractError, DonorProfile, PatientProfile, Role};
use soroban_sdk::contracttype;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransitionAction {
    Verify,
    Suspend,
    Flag,
    MarkDeceased,
    RevokeCommitment,
    ValidateCommitment,
}

/// Snapshot of the target account's role and status flags
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TransitionTarget {
    pub role: Role,
    pub verified: bool,
    pub suspended: bool,
    pub flagged: bool,
    pub deceased: bool,
    pub commitment_valid: bool,
}

impl TransitionTarget {
    pub fn from_donor(donor: &DonorProfile) -> Self {
        TransitionTarget {
            role: Role::Donor,
            verified: donor.verified,
            suspended: donor.suspended,
            flagged: donor.flagged,
            deceased: donor.deceased,
            commitment_valid: donor.commitment_valid,
        }
    }

    pub fn from_patient(patient: &PatientProfile) -> Self {
        TransitionTarget {
            role: Role::Patient,
            verified: patient.verified,
            suspended: patient.suspended,
            flagged: patient.flagged,
            deceased: false,
            commitment_valid: false,
        }
    }
}

/// Check whether `actor_role` may apply `action` to an account in the
/// `target` state. Re-applying a transition that would be a no-op is
/// rejected with `InvalidState` rather than silently succeeding, so a
/// buggy caller hears about it.
pub fn evaluate_transition(
    actor_role: &Role,
    action: &TransitionAction,
    target: &TransitionTarget,
) -> Result<(), ContractError> {
    match actor_role {
        Role::Admin => {}
        Role::None | Role::Donor | Role::Patient => return Err(ContractError::NotAuthorized),
    }

    if target.role == Role::None {
        return Err(ContractError::RoleNotFound);
    }
    if target.role == Role::Admin {
        return Err(ContractError::RoleMismatch);
    }

    match action {
        TransitionAction::Verify => {
            if target.verified {
                return Err(ContractError::InvalidState);
            }
        }
        TransitionAction::Suspend => {
            if !target.verified {
                return Err(ContractError::NotVerified);
            }
            if target.suspended {
                return Err(ContractError::InvalidState);
            }
        }
        TransitionAction::Flag => {
            if target.flagged {
                return Err(ContractError::InvalidState);
            }
        }
        TransitionAction::MarkDeceased => {
            if target.role != Role::Donor {
                return Err(ContractError::RoleMismatch);
            }
            if target.deceased {
                return Err(ContractError::InvalidState);
            }
        }
        TransitionAction::RevokeCommitment => {
            if target.role != Role::Donor {
                return Err(ContractError::RoleMismatch);
            }
            if !target.commitment_valid {
                return Err(ContractError::InvalidState);
            }
        }
        TransitionAction::ValidateCommitment => {
            if target.role != Role::Donor {
                return Err(ContractError::RoleMismatch);
            }
            if target.commitment_valid {
                return Err(ContractError::InvalidState);
            }
        }
    }

    Ok(())
}
