// matching.rs - Donor-patient compatibility matching
// Pure computation over profile snapshots: filter on organ and blood
// compatibility, score the survivors, order them deterministically.
// Results are never stored; every run reflects the registry as it is
// at call time.

use crate::geo;
use crate::{
    BloodType, ContractError, DonorProfile, MatchCandidate, MatchReport, OrganType, PatientProfile,
};
use soroban_sdk::{Address, Env, Vec};

fn abo_compatible(donor: &BloodType, recipient: &BloodType) -> bool {
    match donor {
        // O donates to everyone
        BloodType::OPos | BloodType::ONeg => true,
        BloodType::APos | BloodType::ANeg => matches!(
            recipient,
            BloodType::APos | BloodType::ANeg | BloodType::AbPos | BloodType::AbNeg
        ),
        BloodType::BPos | BloodType::BNeg => matches!(
            recipient,
            BloodType::BPos | BloodType::BNeg | BloodType::AbPos | BloodType::AbNeg
        ),
        // AB only donates to AB
        BloodType::AbPos | BloodType::AbNeg => {
            matches!(recipient, BloodType::AbPos | BloodType::AbNeg)
        }
    }
}

fn is_rh_positive(blood: &BloodType) -> bool {
    matches!(
        blood,
        BloodType::APos | BloodType::BPos | BloodType::AbPos | BloodType::OPos
    )
}

fn same_abo_group(a: &BloodType, b: &BloodType) -> bool {
    let group = |blood: &BloodType| match blood {
        BloodType::APos | BloodType::ANeg => 0u32,
        BloodType::BPos | BloodType::BNeg => 1,
        BloodType::AbPos | BloodType::AbNeg => 2,
        BloodType::OPos | BloodType::ONeg => 3,
    };
    group(a) == group(b)
}

/// Blood type compatibility score for a donor/recipient pair.
/// Returns 0-100, with 0 meaning incompatible (absolute rejection).
/// An exact match always scores at least as high as any cross-match.
pub fn blood_compatibility_score(donor: &BloodType, recipient: &BloodType) -> u32 {
    if !abo_compatible(donor, recipient) {
        return 0;
    }
    // Rh-negative donates to both Rh signs; Rh-positive only to positive
    if is_rh_positive(donor) && !is_rh_positive(recipient) {
        return 0;
    }

    if donor == recipient {
        return 100;
    }
    if *donor == BloodType::ONeg {
        return 95; // universal donor
    }
    if same_abo_group(donor, recipient) {
        return 92; // same group, Rh-negative donor to Rh-positive recipient
    }
    if *donor == BloodType::OPos {
        return 88;
    }
    // Remaining cases are A/B into AB
    85
}

/// Time-sensitivity bonus: organs with the shortest viability windows
/// rank slightly higher when everything else is equal.
pub fn organ_time_bonus(organ: &OrganType) -> u32 {
    match organ {
        OrganType::Heart => 10, // 4-6 hour window
        OrganType::Lung => 8,   // 6-8 hours
        OrganType::Liver => 6,  // 12-18 hours
        OrganType::Pancreas => 4,
        OrganType::Kidney => 2, // 24-36 hours
    }
}

/// Overall match score, 0-100. Blood compatibility carries 70 points,
/// patient urgency up to 20 (scaled by the configured weight), and the
/// organ time bonus up to 10. Monotone non-decreasing in urgency.
pub fn compute_match_score(
    donor: &DonorProfile,
    patient: &PatientProfile,
    urgency_weight: u32,
) -> u32 {
    let blood = blood_compatibility_score(&donor.blood_type, &patient.blood_type);
    if blood == 0 {
        return 0;
    }

    let blood_points = blood * 70 / 100;
    let urgency_points = patient.urgency.ordinal() * 5 * urgency_weight / 100;
    let organ_points = organ_time_bonus(&patient.needed_organ);

    (blood_points + urgency_points + organ_points).min(100)
}

/// Compute the ordered match list for one patient against a donor pool.
///
/// Duplicate donor addresses are deduplicated, first occurrence wins.
/// Unverified and suspended donors are skipped; flagged donors stay in
/// (the flag is advisory), and deceased donors stay in because theirs
/// are the organs that are actually allocable. A donor without resolved
/// coordinates is skipped and reported in `unlocated` instead of
/// failing the run; a patient without coordinates fails the whole run
/// since no distance is computable at all.
pub fn compute_matches(
    env: &Env,
    patient: &PatientProfile,
    pool: &Vec<DonorProfile>,
    urgency_weight: u32,
) -> Result<MatchReport, ContractError> {
    let patient_point = match patient.coordinates {
        Some(point) => point,
        None => return Err(ContractError::LocationUnresolved),
    };

    let mut matches = Vec::new(env);
    let mut unlocated = Vec::new(env);
    let mut seen: Vec<Address> = Vec::new(env);

    for donor in pool.iter() {
        if seen.contains(&donor.address) {
            continue;
        }
        seen.push_back(donor.address.clone());

        if !donor.verified || donor.suspended {
            continue;
        }
        if !donor.organs.contains(&patient.needed_organ) {
            continue;
        }

        let score = compute_match_score(&donor, patient, urgency_weight);
        if score == 0 {
            continue; // blood incompatibility is absolute
        }

        let donor_point = match donor.coordinates {
            Some(point) => point,
            None => {
                unlocated.push_back(donor.address.clone());
                continue;
            }
        };

        matches.push_back(MatchCandidate {
            donor: donor.address.clone(),
            patient: patient.address.clone(),
            organ_type: patient.needed_organ,
            match_score: score,
            distance_km: geo::distance_km(&donor_point, &patient_point),
            organ_available: donor.deceased,
        });
    }

    sort_matches(&mut matches);

    Ok(MatchReport { matches, unlocated })
}

/// Sort by score descending, distance ascending, donor address
/// ascending: a deterministic total order. Bubble sort is fine for the
/// pool sizes a single ledger entry can hold.
fn sort_matches(matches: &mut Vec<MatchCandidate>) {
    let len = matches.len();
    if len <= 1 {
        return;
    }

    for i in 0..len {
        for j in 0..(len - i - 1) {
            let current = matches.get(j).unwrap();
            let next = matches.get(j + 1).unwrap();

            let should_swap = if current.match_score != next.match_score {
                current.match_score < next.match_score
            } else if current.distance_km != next.distance_km {
                current.distance_km > next.distance_km
            } else {
                current.donor > next.donor
            };

            if should_swap {
                let temp = current.clone();
                matches.set(j, next.clone());
                matches.set(j + 1, temp);
            }
        }
    }
}
