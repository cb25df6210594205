#![cfg(test)]

use soroban_sdk::{testutils::Address as _, Address, Env, String, Vec};

use crate::{
    BloodType, GeoPoint, OrganDonationRegistry, OrganDonationRegistryClient, OrganType, Role,
    UrgencyLevel,
};

pub fn setup_uninitialized() -> (Env, OrganDonationRegistryClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(OrganDonationRegistry, ());
    let client = OrganDonationRegistryClient::new(&env, &contract_id);
    let admin = Address::generate(&env);

    (env, client, admin)
}

/// Registry initialized with urgency weight 100 and the default
/// high-priority threshold of 80
pub fn setup() -> (Env, OrganDonationRegistryClient<'static>, Address) {
    let (env, client, admin) = setup_uninitialized();
    client.initialize(&admin, &100, &80);
    (env, client, admin)
}

pub fn organ_list(env: &Env, organs: &[OrganType]) -> Vec<OrganType> {
    let mut list = Vec::new(env);
    for organ in organs {
        list.push_back(*organ);
    }
    list
}

pub fn point(lat_e6: i32, lon_e6: i32) -> GeoPoint {
    GeoPoint { lat_e6, lon_e6 }
}

pub fn register_donor(
    env: &Env,
    client: &OrganDonationRegistryClient,
    blood_type: BloodType,
    organs: &[OrganType],
    coordinates: Option<GeoPoint>,
) -> Address {
    let address = Address::generate(env);
    client.register_donor(
        &address,
        &String::from_str(env, "Test Donor"),
        &blood_type,
        &organ_list(env, organs),
        &String::from_str(env, "Springfield"),
        &coordinates,
        &None::<String>,
    );
    address
}

pub fn register_verified_donor(
    env: &Env,
    client: &OrganDonationRegistryClient,
    admin: &Address,
    blood_type: BloodType,
    organs: &[OrganType],
    coordinates: Option<GeoPoint>,
) -> Address {
    let address = register_donor(env, client, blood_type, organs, coordinates);
    client.verify_user(admin, &address, &Role::Donor);
    address
}

pub fn register_patient(
    env: &Env,
    client: &OrganDonationRegistryClient,
    blood_type: BloodType,
    needed_organ: OrganType,
    urgency: UrgencyLevel,
    coordinates: Option<GeoPoint>,
) -> Address {
    let address = Address::generate(env);
    client.register_patient(
        &address,
        &String::from_str(env, "Test Patient"),
        &blood_type,
        &needed_organ,
        &urgency,
        &String::from_str(env, "Shelbyville"),
        &coordinates,
        &None::<String>,
    );
    address
}

pub fn register_verified_patient(
    env: &Env,
    client: &OrganDonationRegistryClient,
    admin: &Address,
    blood_type: BloodType,
    needed_organ: OrganType,
    urgency: UrgencyLevel,
    coordinates: Option<GeoPoint>,
) -> Address {
    let address = register_patient(env, client, blood_type, needed_organ, urgency, coordinates);
    client.verify_user(admin, &address, &Role::Patient);
    address
}
