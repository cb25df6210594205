#![no_std]
use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, String, Symbol, Vec};

mod error;
mod geo;
mod matching;
mod roles;
mod types;
mod utils;

#[cfg(test)]
mod tests;

pub use error::ContractError;
pub use matching::*;
pub use roles::*;
pub use types::*;
pub use utils::*;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    DonorCount,
    PatientCount,
    DonorIndex(u32),
    PatientIndex(u32),
    Donor(Address),
    Patient(Address),
    Role(Address),
}

#[contract]
pub struct OrganDonationRegistry;

#[contractimpl]
impl OrganDonationRegistry {
    /// Initialize the registry. The admin account is the only one that
    /// may drive verification and suspension transitions.
    pub fn initialize(
        env: Env,
        admin: Address,
        urgency_weight: u32,
        high_priority_threshold: u32,
    ) -> Result<(), ContractError> {
        admin.require_auth();

        if env.storage().instance().has(&DataKey::Config) {
            return Err(ContractError::AlreadyInitialized);
        }

        let config = Config {
            admin: admin.clone(),
            matching_enabled: true,
            urgency_weight,
            high_priority_threshold,
        };

        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::DonorCount, &0u32);
        env.storage().instance().set(&DataKey::PatientCount, &0u32);
        env.storage()
            .persistent()
            .set(&DataKey::Role(admin.clone()), &Role::Admin);

        env.events()
            .publish((Symbol::new(&env, "init"),), (admin,));

        Ok(())
    }

    /// Self-service donor registration. Creates the record unverified;
    /// an admin must verify it before the donor can participate in
    /// matching.
    pub fn register_donor(
        env: Env,
        address: Address,
        name: String,
        blood_type: BloodType,
        organs: Vec<OrganType>,
        location: String,
        coordinates: Option<GeoPoint>,
        ipfs_hash: Option<String>,
    ) -> Result<(), ContractError> {
        address.require_auth();
        read_config(&env)?;

        if read_role(&env, &address) != Role::None {
            return Err(ContractError::AlreadyRegistered);
        }

        utils::validate_donor_registration(&name, &organs, &location)?;

        let donor = DonorProfile {
            address: address.clone(),
            name,
            blood_type,
            organs,
            location,
            coordinates,
            verified: false,
            suspended: false,
            flagged: false,
            deceased: false,
            commitment_valid: true,
            ipfs_hash,
            registered_at: env.ledger().timestamp(),
        };

        let count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::DonorCount)
            .unwrap_or(0);
        env.storage()
            .persistent()
            .set(&DataKey::Donor(address.clone()), &donor);
        env.storage()
            .persistent()
            .set(&DataKey::Role(address.clone()), &Role::Donor);
        env.storage()
            .instance()
            .set(&DataKey::DonorIndex(count), &address);
        env.storage()
            .instance()
            .set(&DataKey::DonorCount, &(count + 1));

        env.events()
            .publish((Symbol::new(&env, "donor_reg"),), (address,));

        Ok(())
    }

    /// Self-service patient registration. A patient needs exactly one
    /// organ; urgency is the canonical ordinal.
    pub fn register_patient(
        env: Env,
        address: Address,
        name: String,
        blood_type: BloodType,
        needed_organ: OrganType,
        urgency: UrgencyLevel,
        location: String,
        coordinates: Option<GeoPoint>,
        ipfs_hash: Option<String>,
    ) -> Result<(), ContractError> {
        address.require_auth();
        read_config(&env)?;

        if read_role(&env, &address) != Role::None {
            return Err(ContractError::AlreadyRegistered);
        }

        utils::validate_patient_registration(&name, &location)?;

        let patient = PatientProfile {
            address: address.clone(),
            name,
            blood_type,
            needed_organ,
            urgency,
            location,
            coordinates,
            verified: false,
            suspended: false,
            flagged: false,
            ipfs_hash,
            registered_at: env.ledger().timestamp(),
        };

        let count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::PatientCount)
            .unwrap_or(0);
        env.storage()
            .persistent()
            .set(&DataKey::Patient(address.clone()), &patient);
        env.storage()
            .persistent()
            .set(&DataKey::Role(address.clone()), &Role::Patient);
        env.storage()
            .instance()
            .set(&DataKey::PatientIndex(count), &address);
        env.storage()
            .instance()
            .set(&DataKey::PatientCount, &(count + 1));

        env.events()
            .publish((Symbol::new(&env, "patient_reg"),), (address,));

        Ok(())
    }

    pub fn get_donor(env: Env, address: Address) -> Option<DonorProfile> {
        env.storage().persistent().get(&DataKey::Donor(address))
    }

    pub fn get_patient(env: Env, address: Address) -> Option<PatientProfile> {
        env.storage().persistent().get(&DataKey::Patient(address))
    }

    pub fn get_role(env: Env, address: Address) -> Role {
        read_role(&env, &address)
    }

    pub fn get_config(env: Env) -> Option<Config> {
        env.storage().instance().get(&DataKey::Config)
    }

    pub fn list_donors(env: Env) -> Vec<DonorProfile> {
        collect_donors(&env)
    }

    pub fn list_patients(env: Env) -> Vec<PatientProfile> {
        collect_patients(&env)
    }

    /// Mark a pending account as verified. The expected role is
    /// cross-checked against the stored one so an admin acting on a
    /// stale listing fails loudly instead of verifying the wrong kind
    /// of account.
    pub fn verify_user(
        env: Env,
        caller: Address,
        address: Address,
        role: Role,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        read_config(&env)?;

        let actor_role = read_role(&env, &caller);
        let target = build_target(&env, &address);
        roles::evaluate_transition(&actor_role, &TransitionAction::Verify, &target)?;

        if target.role != role {
            return Err(ContractError::RoleMismatch);
        }

        match target.role {
            Role::Donor => {
                let mut donor = read_donor(&env, &address)?;
                donor.verified = true;
                env.storage()
                    .persistent()
                    .set(&DataKey::Donor(address.clone()), &donor);
            }
            Role::Patient => {
                let mut patient = read_patient(&env, &address)?;
                patient.verified = true;
                env.storage()
                    .persistent()
                    .set(&DataKey::Patient(address.clone()), &patient);
            }
            Role::Admin | Role::None => return Err(ContractError::RoleMismatch),
        }

        env.events()
            .publish((Symbol::new(&env, "verified"),), (address, role));

        Ok(())
    }

    /// Suspend a verified account: excluded from matching and from
    /// initiating new transactions, record retained.
    pub fn suspend_user(env: Env, caller: Address, address: Address) -> Result<(), ContractError> {
        caller.require_auth();
        read_config(&env)?;

        let actor_role = read_role(&env, &caller);
        let target = build_target(&env, &address);
        roles::evaluate_transition(&actor_role, &TransitionAction::Suspend, &target)?;

        set_account_flag(&env, &address, &target, AccountFlag::Suspended)?;

        env.events()
            .publish((Symbol::new(&env, "suspended"),), (address,));

        Ok(())
    }

    /// Flag an account for review. Advisory only: a flagged account
    /// still participates in matching, unlike a suspended one.
    pub fn flag_user(env: Env, caller: Address, address: Address) -> Result<(), ContractError> {
        caller.require_auth();
        read_config(&env)?;

        let actor_role = read_role(&env, &caller);
        let target = build_target(&env, &address);
        roles::evaluate_transition(&actor_role, &TransitionAction::Flag, &target)?;

        set_account_flag(&env, &address, &target, AccountFlag::Flagged)?;

        env.events()
            .publish((Symbol::new(&env, "flagged"),), (address,));

        Ok(())
    }

    /// Confirm a donor's death. Their registered organs become
    /// allocable; the profile stays visible and matchable.
    pub fn mark_donor_deceased(
        env: Env,
        caller: Address,
        address: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        read_config(&env)?;

        let actor_role = read_role(&env, &caller);
        let target = build_target(&env, &address);
        roles::evaluate_transition(&actor_role, &TransitionAction::MarkDeceased, &target)?;

        let mut donor = read_donor(&env, &address)?;
        donor.deceased = true;
        env.storage()
            .persistent()
            .set(&DataKey::Donor(address.clone()), &donor);

        env.events()
            .publish((Symbol::new(&env, "deceased"),), (address,));

        Ok(())
    }

    pub fn revoke_donor_commitment(
        env: Env,
        caller: Address,
        address: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        read_config(&env)?;

        let actor_role = read_role(&env, &caller);
        let target = build_target(&env, &address);
        roles::evaluate_transition(&actor_role, &TransitionAction::RevokeCommitment, &target)?;

        let mut donor = read_donor(&env, &address)?;
        donor.commitment_valid = false;
        env.storage()
            .persistent()
            .set(&DataKey::Donor(address.clone()), &donor);

        env.events()
            .publish((Symbol::new(&env, "commit_rvk"),), (address,));

        Ok(())
    }

    pub fn validate_donor_commitment(
        env: Env,
        caller: Address,
        address: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        read_config(&env)?;

        let actor_role = read_role(&env, &caller);
        let target = build_target(&env, &address);
        roles::evaluate_transition(&actor_role, &TransitionAction::ValidateCommitment, &target)?;

        let mut donor = read_donor(&env, &address)?;
        donor.commitment_valid = true;
        env.storage()
            .persistent()
            .set(&DataKey::Donor(address.clone()), &donor);

        env.events()
            .publish((Symbol::new(&env, "commit_ok"),), (address,));

        Ok(())
    }

    /// Read-only preflight: would `actor` be allowed to apply `action`
    /// to `target` right now? Same guard the mutating entrypoints use.
    pub fn evaluate_transition(
        env: Env,
        actor: Address,
        action: TransitionAction,
        target: Address,
    ) -> Result<(), ContractError> {
        let actor_role = read_role(&env, &actor);
        let snapshot = build_target(&env, &target);
        roles::evaluate_transition(&actor_role, &action, &snapshot)
    }

    /// Compute the ordered match list for a verified patient against
    /// the current donor pool. Nothing is persisted; the report is a
    /// point-in-time view.
    pub fn find_matches(env: Env, patient_address: Address) -> Result<MatchReport, ContractError> {
        let config = read_config(&env)?;

        if !config.matching_enabled {
            return Ok(MatchReport {
                matches: Vec::new(&env),
                unlocated: Vec::new(&env),
            });
        }

        let patient = read_patient(&env, &patient_address)?;
        if !patient.verified {
            return Err(ContractError::NotVerified);
        }
        if patient.suspended {
            return Err(ContractError::AccountSuspended);
        }

        let pool = collect_donors(&env);
        let report = matching::compute_matches(&env, &patient, &pool, config.urgency_weight)?;

        env.events().publish(
            (Symbol::new(&env, "match_run"),),
            (patient_address, report.matches.len()),
        );

        Ok(report)
    }

    /// Accounts that have registered but not yet been verified, for the
    /// admin dashboard.
    pub fn get_pending_verifications(env: Env) -> Vec<PendingVerification> {
        let mut pending = Vec::new(&env);
        for donor in collect_donors(&env).iter() {
            if !donor.verified {
                pending.push_back(PendingVerification {
                    address: donor.address.clone(),
                    role: Role::Donor,
                    name: donor.name.clone(),
                });
            }
        }
        for patient in collect_patients(&env).iter() {
            if !patient.verified {
                pending.push_back(PendingVerification {
                    address: patient.address.clone(),
                    role: Role::Patient,
                    name: patient.name.clone(),
                });
            }
        }
        pending
    }

    /// Organs of verified donors, with the deceased flag that marks
    /// them allocable.
    pub fn get_available_organs(env: Env) -> Vec<AvailableOrgan> {
        let mut organs = Vec::new(&env);
        for donor in collect_donors(&env).iter() {
            if !donor.verified || donor.suspended {
                continue;
            }
            for organ in donor.organs.iter() {
                organs.push_back(AvailableOrgan {
                    donor: donor.address.clone(),
                    organ_type: organ,
                    verified: donor.verified,
                    deceased: donor.deceased,
                });
            }
        }
        organs
    }

    /// Admin kill-switch for the match engine. While disabled,
    /// `find_matches` returns an empty report rather than an error.
    pub fn set_matching_enabled(
        env: Env,
        caller: Address,
        enabled: bool,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let mut config = read_config(&env)?;

        if read_role(&env, &caller) != Role::Admin {
            return Err(ContractError::NotAuthorized);
        }

        config.matching_enabled = enabled;
        env.storage().instance().set(&DataKey::Config, &config);

        Ok(())
    }
}

enum AccountFlag {
    Suspended,
    Flagged,
}

fn read_config(env: &Env) -> Result<Config, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(ContractError::NotInitialized)
}

fn read_role(env: &Env, address: &Address) -> Role {
    env.storage()
        .persistent()
        .get(&DataKey::Role(address.clone()))
        .unwrap_or(Role::None)
}

fn read_donor(env: &Env, address: &Address) -> Result<DonorProfile, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Donor(address.clone()))
        .ok_or(ContractError::DonorNotFound)
}

fn read_patient(env: &Env, address: &Address) -> Result<PatientProfile, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Patient(address.clone()))
        .ok_or(ContractError::PatientNotFound)
}

/// Snapshot the target account's role and flags for the state machine.
/// Unregistered addresses produce a `Role::None` snapshot so the
/// authorization check still runs first.
fn build_target(env: &Env, address: &Address) -> TransitionTarget {
    let role = read_role(env, address);
    match role {
        Role::Donor => match read_donor(env, address) {
            Ok(donor) => TransitionTarget::from_donor(&donor),
            Err(_) => empty_target(Role::None),
        },
        Role::Patient => match read_patient(env, address) {
            Ok(patient) => TransitionTarget::from_patient(&patient),
            Err(_) => empty_target(Role::None),
        },
        Role::Admin => TransitionTarget {
            role: Role::Admin,
            verified: true,
            suspended: false,
            flagged: false,
            deceased: false,
            commitment_valid: false,
        },
        Role::None => empty_target(Role::None),
    }
}

fn empty_target(role: Role) -> TransitionTarget {
    TransitionTarget {
        role,
        verified: false,
        suspended: false,
        flagged: false,
        deceased: false,
        commitment_valid: false,
    }
}

fn set_account_flag(
    env: &Env,
    address: &Address,
    target: &TransitionTarget,
    flag: AccountFlag,
) -> Result<(), ContractError> {
    match target.role {
        Role::Donor => {
            let mut donor = read_donor(env, address)?;
            match flag {
                AccountFlag::Suspended => donor.suspended = true,
                AccountFlag::Flagged => donor.flagged = true,
            }
            env.storage()
                .persistent()
                .set(&DataKey::Donor(address.clone()), &donor);
        }
        Role::Patient => {
            let mut patient = read_patient(env, address)?;
            match flag {
                AccountFlag::Suspended => patient.suspended = true,
                AccountFlag::Flagged => patient.flagged = true,
            }
            env.storage()
                .persistent()
                .set(&DataKey::Patient(address.clone()), &patient);
        }
        Role::Admin | Role::None => return Err(ContractError::RoleMismatch),
    }
    Ok(())
}

fn collect_donors(env: &Env) -> Vec<DonorProfile> {
    let mut donors = Vec::new(env);
    let count: u32 = env
        .storage()
        .instance()
        .get(&DataKey::DonorCount)
        .unwrap_or(0);
    for i in 0..count {
        if let Some(address) = env
            .storage()
            .instance()
            .get::<DataKey, Address>(&DataKey::DonorIndex(i))
        {
            if let Some(donor) = env
                .storage()
                .persistent()
                .get::<DataKey, DonorProfile>(&DataKey::Donor(address))
            {
                donors.push_back(donor);
            }
        }
    }
    donors
}

fn collect_patients(env: &Env) -> Vec<PatientProfile> {
    let mut patients = Vec::new(env);
    let count: u32 = env
        .storage()
        .instance()
        .get(&DataKey::PatientCount)
        .unwrap_or(0);
    for i in 0..count {
        if let Some(address) = env
            .storage()
            .instance()
            .get::<DataKey, Address>(&DataKey::PatientIndex(i))
        {
            if let Some(patient) = env
                .storage()
                .persistent()
                .get::<DataKey, PatientProfile>(&DataKey::Patient(address))
            {
                patients.push_back(patient);
            }
        }
    }
    patients
}
