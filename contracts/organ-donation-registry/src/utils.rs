// utils.rs - Display mappings and registration validation helpers

use crate::{BloodType, ContractError, OrganType, UrgencyLevel};
use soroban_sdk::{Env, String, Vec};

/// Blood group label as shown on the registration forms
pub fn blood_type_to_string(env: &Env, blood_type: &BloodType) -> String {
    match blood_type {
        BloodType::APos => String::from_str(env, "A+"),
        BloodType::ANeg => String::from_str(env, "A-"),
        BloodType::BPos => String::from_str(env, "B+"),
        BloodType::BNeg => String::from_str(env, "B-"),
        BloodType::AbPos => String::from_str(env, "AB+"),
        BloodType::AbNeg => String::from_str(env, "AB-"),
        BloodType::OPos => String::from_str(env, "O+"),
        BloodType::ONeg => String::from_str(env, "O-"),
    }
}

pub fn organ_type_to_string(env: &Env, organ_type: &OrganType) -> String {
    match organ_type {
        OrganType::Kidney => String::from_str(env, "Kidney"),
        OrganType::Liver => String::from_str(env, "Liver"),
        OrganType::Heart => String::from_str(env, "Heart"),
        OrganType::Lung => String::from_str(env, "Lung"),
        OrganType::Pancreas => String::from_str(env, "Pancreas"),
    }
}

/// Display label for an urgency level. The ordinal is canonical; this
/// mapping exists only for presentation.
pub fn urgency_label(env: &Env, urgency: &UrgencyLevel) -> String {
    match urgency {
        UrgencyLevel::Low => String::from_str(env, "Low"),
        UrgencyLevel::Medium => String::from_str(env, "Medium"),
        UrgencyLevel::High => String::from_str(env, "High"),
        UrgencyLevel::Critical => String::from_str(env, "Critical"),
    }
}

/// Presentation-layer classification over the engine's numeric score
pub fn is_high_priority(match_score: u32, threshold: u32) -> bool {
    match_score > threshold
}

/// Validate donor registration fields. The organs list must be
/// non-empty once a donor completes registration.
pub fn validate_donor_registration(
    name: &String,
    organs: &Vec<OrganType>,
    location: &String,
) -> Result<(), ContractError> {
    if name.len() == 0 {
        return Err(ContractError::MissingName);
    }
    if organs.is_empty() {
        return Err(ContractError::NoOrgansListed);
    }
    if location.len() == 0 {
        return Err(ContractError::MissingLocation);
    }
    Ok(())
}

pub fn validate_patient_registration(
    name: &String,
    location: &String,
) -> Result<(), ContractError> {
    if name.len() == 0 {
        return Err(ContractError::MissingName);
    }
    if location.len() == 0 {
        return Err(ContractError::MissingLocation);
    }
    Ok(())
}
