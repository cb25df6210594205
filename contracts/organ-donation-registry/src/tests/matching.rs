#![cfg(test)]

extern crate std;

use soroban_sdk::{testutils::Address as _, Address, Env, String, Vec};

use crate::matching::{blood_compatibility_score, compute_match_score, compute_matches};
use crate::tests::utils::{
    organ_list, point, register_donor, register_patient, register_verified_donor,
    register_verified_patient, setup,
};
use crate::{
    BloodType, ContractError, DonorProfile, GeoPoint, OrganType, PatientProfile, Role,
    UrgencyLevel,
};

fn donor_profile(
    env: &Env,
    blood_type: BloodType,
    organs: &[OrganType],
    coordinates: Option<GeoPoint>,
) -> DonorProfile {
    DonorProfile {
        address: Address::generate(env),
        name: String::from_str(env, "Donor"),
        blood_type,
        organs: organ_list(env, organs),
        location: String::from_str(env, "Springfield"),
        coordinates,
        verified: true,
        suspended: false,
        flagged: false,
        deceased: false,
        commitment_valid: true,
        ipfs_hash: None,
        registered_at: 0,
    }
}

fn patient_profile(
    env: &Env,
    blood_type: BloodType,
    needed_organ: OrganType,
    urgency: UrgencyLevel,
    coordinates: Option<GeoPoint>,
) -> PatientProfile {
    PatientProfile {
        address: Address::generate(env),
        name: String::from_str(env, "Patient"),
        blood_type,
        needed_organ,
        urgency,
        location: String::from_str(env, "Shelbyville"),
        coordinates,
        verified: true,
        suspended: false,
        flagged: false,
        ipfs_hash: None,
        registered_at: 0,
    }
}

#[test]
fn blood_chart_covers_universal_donor_and_recipient() {
    // Exact matches always score highest
    assert_eq!(
        blood_compatibility_score(&BloodType::APos, &BloodType::APos),
        100
    );
    assert_eq!(
        blood_compatibility_score(&BloodType::ONeg, &BloodType::ONeg),
        100
    );

    // O- donates to everyone
    for recipient in [
        BloodType::APos,
        BloodType::ANeg,
        BloodType::BPos,
        BloodType::BNeg,
        BloodType::AbPos,
        BloodType::AbNeg,
        BloodType::OPos,
    ] {
        assert!(blood_compatibility_score(&BloodType::ONeg, &recipient) > 0);
    }

    // AB+ receives from everyone
    for donor in [
        BloodType::APos,
        BloodType::ANeg,
        BloodType::BPos,
        BloodType::BNeg,
        BloodType::AbNeg,
        BloodType::OPos,
        BloodType::ONeg,
    ] {
        assert!(blood_compatibility_score(&donor, &BloodType::AbPos) > 0);
    }

    // ABO rejections
    assert_eq!(
        blood_compatibility_score(&BloodType::APos, &BloodType::BPos),
        0
    );
    assert_eq!(
        blood_compatibility_score(&BloodType::AbPos, &BloodType::APos),
        0
    );
    assert_eq!(
        blood_compatibility_score(&BloodType::AbNeg, &BloodType::OPos),
        0
    );

    // Rh-positive donors cannot donate to Rh-negative recipients
    assert_eq!(
        blood_compatibility_score(&BloodType::APos, &BloodType::ANeg),
        0
    );
    assert_eq!(
        blood_compatibility_score(&BloodType::OPos, &BloodType::ONeg),
        0
    );
}

#[test]
fn exact_blood_match_never_scores_below_a_cross_match() {
    let exact = blood_compatibility_score(&BloodType::APos, &BloodType::APos);
    for donor in [
        BloodType::ANeg,
        BloodType::OPos,
        BloodType::ONeg,
    ] {
        assert!(exact >= blood_compatibility_score(&donor, &BloodType::APos));
    }
}

#[test]
fn match_score_is_monotone_in_urgency() {
    let env = Env::default();
    let donor = donor_profile(&env, BloodType::ONeg, &[OrganType::Kidney], None);

    let mut previous = 0;
    for urgency in [
        UrgencyLevel::Low,
        UrgencyLevel::Medium,
        UrgencyLevel::High,
        UrgencyLevel::Critical,
    ] {
        let patient = patient_profile(&env, BloodType::APos, OrganType::Kidney, urgency, None);
        let score = compute_match_score(&donor, &patient, 100);
        assert!(score >= previous);
        previous = score;
    }
}

#[test]
fn universal_donor_with_critical_patient_scores_high_priority() {
    let env = Env::default();
    let donor = donor_profile(&env, BloodType::ONeg, &[OrganType::Kidney], None);
    let patient = patient_profile(
        &env,
        BloodType::APos,
        OrganType::Kidney,
        UrgencyLevel::Critical,
        None,
    );

    let score = compute_match_score(&donor, &patient, 100);
    assert_eq!(score, 88);
    assert!(crate::is_high_priority(score, 80));
    assert!(!crate::is_high_priority(80, 80));
}

#[test]
fn donor_without_needed_organ_is_never_matched() {
    let (env, client, admin) = setup();
    let patient = register_verified_patient(
        &env,
        &client,
        &admin,
        BloodType::APos,
        OrganType::Kidney,
        UrgencyLevel::High,
        Some(point(0, 0)),
    );
    register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::ONeg,
        &[OrganType::Heart],
        Some(point(0, 0)),
    );

    let report = client.find_matches(&patient);
    assert_eq!(report.matches.len(), 0);
    assert_eq!(report.unlocated.len(), 0);
}

#[test]
fn blood_incompatible_donors_are_excluded_entirely() {
    let (env, client, admin) = setup();
    let patient = register_verified_patient(
        &env,
        &client,
        &admin,
        BloodType::BPos,
        OrganType::Kidney,
        UrgencyLevel::High,
        Some(point(0, 0)),
    );
    register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::APos,
        &[OrganType::Kidney],
        Some(point(0, 0)),
    );

    let report = client.find_matches(&patient);
    assert_eq!(report.matches.len(), 0);
}

#[test]
fn results_are_ordered_by_score_then_distance() {
    let (env, client, admin) = setup();
    let patient = register_verified_patient(
        &env,
        &client,
        &admin,
        BloodType::APos,
        OrganType::Kidney,
        UrgencyLevel::Medium,
        Some(point(0, 0)),
    );

    // Distinct blood compatibility grades at the same location
    let exact = register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::APos,
        &[OrganType::Kidney],
        Some(point(0, 0)),
    );
    let universal = register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::ONeg,
        &[OrganType::Kidney],
        Some(point(0, 0)),
    );
    let same_group = register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::ANeg,
        &[OrganType::Kidney],
        Some(point(0, 0)),
    );

    let report = client.find_matches(&patient);
    assert_eq!(report.matches.len(), 3);
    assert_eq!(report.matches.get(0).unwrap().donor, exact);
    assert_eq!(report.matches.get(1).unwrap().donor, universal);
    assert_eq!(report.matches.get(2).unwrap().donor, same_group);

    for i in 0..(report.matches.len() - 1) {
        let current = report.matches.get(i).unwrap();
        let next = report.matches.get(i + 1).unwrap();
        assert!(current.match_score >= next.match_score);
        if current.match_score == next.match_score {
            assert!(current.distance_km <= next.distance_km);
        }
    }
}

#[test]
fn equal_scores_break_ties_by_distance() {
    let (env, client, admin) = setup();
    let patient = register_verified_patient(
        &env,
        &client,
        &admin,
        BloodType::APos,
        OrganType::Kidney,
        UrgencyLevel::Medium,
        Some(point(0, 0)),
    );

    // Same blood type, so identical scores; the far donor registers first
    let far = register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::APos,
        &[OrganType::Kidney],
        Some(point(450_000, 0)), // ~50 km north
    );
    let near = register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::APos,
        &[OrganType::Kidney],
        Some(point(45_000, 0)), // ~5 km north
    );

    let report = client.find_matches(&patient);
    assert_eq!(report.matches.len(), 2);

    let first = report.matches.get(0).unwrap();
    let second = report.matches.get(1).unwrap();
    assert_eq!(first.donor, near);
    assert_eq!(first.distance_km, 5);
    assert_eq!(second.donor, far);
    assert_eq!(second.distance_km, 50);
    assert_eq!(first.match_score, second.match_score);
}

#[test]
fn identical_inputs_produce_identical_reports() {
    let (env, client, admin) = setup();
    let patient = register_verified_patient(
        &env,
        &client,
        &admin,
        BloodType::AbPos,
        OrganType::Liver,
        UrgencyLevel::High,
        Some(point(48_856_600, 2_352_200)),
    );
    for blood in [BloodType::APos, BloodType::BNeg, BloodType::ONeg] {
        register_verified_donor(
            &env,
            &client,
            &admin,
            blood,
            &[OrganType::Liver, OrganType::Kidney],
            Some(point(50_110_900, 8_682_100)),
        );
    }

    let first = client.find_matches(&patient);
    let second = client.find_matches(&patient);
    assert_eq!(first, second);
}

#[test]
fn duplicate_pool_entries_are_deduplicated_first_wins() {
    let env = Env::default();
    let patient = patient_profile(
        &env,
        BloodType::APos,
        OrganType::Kidney,
        UrgencyLevel::Low,
        Some(point(0, 0)),
    );

    let donor = donor_profile(
        &env,
        BloodType::APos,
        &[OrganType::Kidney],
        Some(point(45_000, 0)),
    );
    let mut duplicate = donor.clone();
    duplicate.coordinates = Some(point(450_000, 0));

    let mut pool = Vec::new(&env);
    pool.push_back(donor);
    pool.push_back(duplicate);

    let report = compute_matches(&env, &patient, &pool, 100).unwrap();
    assert_eq!(report.matches.len(), 1);
    // First occurrence's coordinates won
    assert_eq!(report.matches.get(0).unwrap().distance_km, 5);
}

#[test]
fn donor_without_coordinates_is_reported_not_dropped_silently() {
    let (env, client, admin) = setup();
    let patient = register_verified_patient(
        &env,
        &client,
        &admin,
        BloodType::APos,
        OrganType::Kidney,
        UrgencyLevel::High,
        Some(point(0, 0)),
    );
    let located = register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::APos,
        &[OrganType::Kidney],
        Some(point(45_000, 0)),
    );
    let unlocated = register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::APos,
        &[OrganType::Kidney],
        None,
    );

    let report = client.find_matches(&patient);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches.get(0).unwrap().donor, located);
    assert_eq!(report.unlocated.len(), 1);
    assert_eq!(report.unlocated.get(0).unwrap(), unlocated);
}

#[test]
fn patient_without_coordinates_fails_the_run() {
    let (env, client, admin) = setup();
    let patient = register_verified_patient(
        &env,
        &client,
        &admin,
        BloodType::APos,
        OrganType::Kidney,
        UrgencyLevel::High,
        None,
    );
    register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::APos,
        &[OrganType::Kidney],
        Some(point(0, 0)),
    );

    assert_eq!(
        client.try_find_matches(&patient),
        Err(Ok(ContractError::LocationUnresolved))
    );
}

#[test]
fn suspended_donor_disappears_from_subsequent_runs() {
    let (env, client, admin) = setup();
    let patient = register_verified_patient(
        &env,
        &client,
        &admin,
        BloodType::APos,
        OrganType::Kidney,
        UrgencyLevel::High,
        Some(point(0, 0)),
    );
    let donor = register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::APos,
        &[OrganType::Kidney],
        Some(point(0, 0)),
    );

    assert_eq!(client.find_matches(&patient).matches.len(), 1);

    client.suspend_user(&admin, &donor);

    assert_eq!(client.find_matches(&patient).matches.len(), 0);
}

#[test]
fn unverified_donors_never_participate() {
    let (env, client, admin) = setup();
    let patient = register_verified_patient(
        &env,
        &client,
        &admin,
        BloodType::APos,
        OrganType::Kidney,
        UrgencyLevel::High,
        Some(point(0, 0)),
    );
    register_donor(
        &env,
        &client,
        BloodType::APos,
        &[OrganType::Kidney],
        Some(point(0, 0)),
    );

    assert_eq!(client.find_matches(&patient).matches.len(), 0);
}

#[test]
fn flagged_donor_still_matches_deceased_donor_is_available() {
    let (env, client, admin) = setup();
    let patient = register_verified_patient(
        &env,
        &client,
        &admin,
        BloodType::APos,
        OrganType::Kidney,
        UrgencyLevel::High,
        Some(point(0, 0)),
    );
    let flagged = register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::APos,
        &[OrganType::Kidney],
        Some(point(0, 0)),
    );
    client.flag_user(&admin, &flagged);

    let deceased = register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::ONeg,
        &[OrganType::Kidney],
        Some(point(0, 0)),
    );
    client.mark_donor_deceased(&admin, &deceased);

    let report = client.find_matches(&patient);
    assert_eq!(report.matches.len(), 2);
    for candidate in report.matches.iter() {
        if candidate.donor == deceased {
            assert!(candidate.organ_available);
        } else {
            assert_eq!(candidate.donor, flagged);
            assert!(!candidate.organ_available);
        }
    }
}

#[test]
fn unverified_or_suspended_patient_cannot_request_matches() {
    let (env, client, admin) = setup();
    let pending = register_patient(
        &env,
        &client,
        BloodType::APos,
        OrganType::Kidney,
        UrgencyLevel::High,
        Some(point(0, 0)),
    );
    assert_eq!(
        client.try_find_matches(&pending),
        Err(Ok(ContractError::NotVerified))
    );

    client.verify_user(&admin, &pending, &Role::Patient);
    client.suspend_user(&admin, &pending);
    assert_eq!(
        client.try_find_matches(&pending),
        Err(Ok(ContractError::AccountSuspended))
    );
}

#[test]
fn kill_switch_returns_empty_report_not_error() {
    let (env, client, admin) = setup();
    let patient = register_verified_patient(
        &env,
        &client,
        &admin,
        BloodType::APos,
        OrganType::Kidney,
        UrgencyLevel::High,
        Some(point(0, 0)),
    );
    register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::APos,
        &[OrganType::Kidney],
        Some(point(0, 0)),
    );

    client.set_matching_enabled(&admin, &false);
    let report = client.find_matches(&patient);
    assert_eq!(report.matches.len(), 0);

    client.set_matching_enabled(&admin, &true);
    assert_eq!(client.find_matches(&patient).matches.len(), 1);

    let outsider = Address::generate(&env);
    assert_eq!(
        client.try_set_matching_enabled(&outsider, &false),
        Err(Ok(ContractError::NotAuthorized))
    );
}

#[test]
fn available_organs_reflect_verified_donors_and_death_flags() {
    let (env, client, admin) = setup();
    register_donor(
        &env,
        &client,
        BloodType::APos,
        &[OrganType::Kidney],
        None,
    );
    let verified = register_verified_donor(
        &env,
        &client,
        &admin,
        BloodType::ONeg,
        &[OrganType::Kidney, OrganType::Liver],
        None,
    );
    client.mark_donor_deceased(&admin, &verified);

    let organs = client.get_available_organs();
    assert_eq!(organs.len(), 2);
    for organ in organs.iter() {
        assert_eq!(organ.donor, verified);
        assert!(organ.verified);
        assert!(organ.deceased);
    }
}
