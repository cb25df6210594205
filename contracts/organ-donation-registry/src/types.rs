use soroban_sdk::{contracttype, Address, String, Vec};

/// ABO/Rh blood groups as collected on the registration forms
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BloodType {
    APos,
    ANeg,
    BPos,
    BNeg,
    AbPos,
    AbNeg,
    OPos,
    ONeg,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OrganType {
    Kidney,
    Liver,
    Heart,
    Lung,
    Pancreas,
}

/// Medical urgency of a patient. The ordinal is the canonical
/// representation; display labels are derived in `utils`.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UrgencyLevel {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

/// Exactly one role per address at any time
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    None,
    Donor,
    Patient,
    Admin,
}

/// Coordinates in microdegrees. Geocoding of the free-text location
/// happens off-chain; callers submit the resolved point together with
/// the display string. `None` means the location could not be resolved.
///
/// The `#[contracttype]` impls below are written out by hand instead of
/// derived: this type appears as `Option<GeoPoint>` in other contract
/// types, and the XDR conversion generated under `testutils` for those
/// types needs an infallible `ScVal: From<GeoPoint>`, which the derive
/// only emits as `TryFrom`. The impls are the macro's own expansion,
/// with the two `ScVal` conversions strengthened to `From` (they cannot
/// fail: two `i32` fields under distinct symbol keys).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GeoPoint {
    pub lat_e6: i32,
    pub lon_e6: i32,
}

#[cfg_attr(target_family = "wasm", link_section = "contractspecv0")]
pub static __SPEC_XDR_TYPE_GEOPOINT: [u8; 68usize] = GeoPoint::spec_xdr();

impl GeoPoint {
    pub const fn spec_xdr() -> [u8; 68usize] {
        *b"\0\0\0\x01\0\0\0\0\0\0\0\0\0\0\0\x08GeoPoint\0\0\0\x02\0\0\0\0\0\0\0\x06lat_e6\0\0\0\0\0\x05\0\0\0\0\0\0\0\x06lon_e6\0\0\0\0\0\x05"
    }
}

impl soroban_sdk::TryFromVal<soroban_sdk::Env, soroban_sdk::Val> for GeoPoint {
    type Error = soroban_sdk::ConversionError;
    fn try_from_val(
        env: &soroban_sdk::Env,
        val: &soroban_sdk::Val,
    ) -> Result<Self, soroban_sdk::ConversionError> {
        use soroban_sdk::{ConversionError, EnvBase, MapObject, TryIntoVal, Val};
        const KEYS: [&'static str; 2usize] = ["lat_e6", "lon_e6"];
        let mut vals: [Val; 2usize] = [Val::VOID.to_val(); 2usize];
        let map: MapObject = val.try_into().map_err(|_| ConversionError)?;
        env.map_unpack_to_slice(map, &KEYS, &mut vals)
            .map_err(|_| ConversionError)?;
        Ok(Self {
            lat_e6: vals[0].try_into_val(env).map_err(|_| ConversionError)?,
            lon_e6: vals[1].try_into_val(env).map_err(|_| ConversionError)?,
        })
    }
}

impl soroban_sdk::TryFromVal<soroban_sdk::Env, GeoPoint> for soroban_sdk::Val {
    type Error = soroban_sdk::ConversionError;
    fn try_from_val(
        env: &soroban_sdk::Env,
        val: &GeoPoint,
    ) -> Result<Self, soroban_sdk::ConversionError> {
        use soroban_sdk::{ConversionError, EnvBase, TryIntoVal, Val};
        const KEYS: [&'static str; 2usize] = ["lat_e6", "lon_e6"];
        let vals: [Val; 2usize] = [
            (&val.lat_e6).try_into_val(env).map_err(|_| ConversionError)?,
            (&val.lon_e6).try_into_val(env).map_err(|_| ConversionError)?,
        ];
        Ok(env
            .map_new_from_slices(&KEYS, &vals)
            .map_err(|_| ConversionError)?
            .into())
    }
}

#[cfg(any(test, feature = "testutils"))]
mod geo_point_testutils {
    use super::GeoPoint;

    impl soroban_sdk::TryFromVal<soroban_sdk::Env, soroban_sdk::xdr::ScMap> for GeoPoint {
        type Error = soroban_sdk::xdr::Error;
        #[inline(always)]
        fn try_from_val(
            env: &soroban_sdk::Env,
            val: &soroban_sdk::xdr::ScMap,
        ) -> Result<Self, soroban_sdk::xdr::Error> {
            use soroban_sdk::xdr::Validate;
            use soroban_sdk::TryIntoVal;
            let map = val;
            if map.len() != 2usize {
                return Err(soroban_sdk::xdr::Error::Invalid);
            }
            map.validate()?;
            Ok(Self {
                lat_e6: {
                    let key: soroban_sdk::xdr::ScVal = soroban_sdk::xdr::ScSymbol(
                        "lat_e6"
                            .try_into()
                            .map_err(|_| soroban_sdk::xdr::Error::Invalid)?,
                    )
                    .into();
                    let idx = map
                        .binary_search_by_key(&key, |entry| entry.key.clone())
                        .map_err(|_| soroban_sdk::xdr::Error::Invalid)?;
                    let rv: soroban_sdk::Val = (&map[idx].val.clone())
                        .try_into_val(env)
                        .map_err(|_| soroban_sdk::xdr::Error::Invalid)?;
                    rv.try_into_val(env)
                        .map_err(|_| soroban_sdk::xdr::Error::Invalid)?
                },
                lon_e6: {
                    let key: soroban_sdk::xdr::ScVal = soroban_sdk::xdr::ScSymbol(
                        "lon_e6"
                            .try_into()
                            .map_err(|_| soroban_sdk::xdr::Error::Invalid)?,
                    )
                    .into();
                    let idx = map
                        .binary_search_by_key(&key, |entry| entry.key.clone())
                        .map_err(|_| soroban_sdk::xdr::Error::Invalid)?;
                    let rv: soroban_sdk::Val = (&map[idx].val.clone())
                        .try_into_val(env)
                        .map_err(|_| soroban_sdk::xdr::Error::Invalid)?;
                    rv.try_into_val(env)
                        .map_err(|_| soroban_sdk::xdr::Error::Invalid)?
                },
            })
        }
    }

    impl soroban_sdk::TryFromVal<soroban_sdk::Env, soroban_sdk::xdr::ScVal> for GeoPoint {
        type Error = soroban_sdk::xdr::Error;
        #[inline(always)]
        fn try_from_val(
            env: &soroban_sdk::Env,
            val: &soroban_sdk::xdr::ScVal,
        ) -> Result<Self, soroban_sdk::xdr::Error> {
            if let soroban_sdk::xdr::ScVal::Map(Some(map)) = val {
                <_ as soroban_sdk::TryFromVal<_, _>>::try_from_val(env, map)
            } else {
                Err(soroban_sdk::xdr::Error::Invalid)
            }
        }
    }

    impl TryFrom<&GeoPoint> for soroban_sdk::xdr::ScMap {
        type Error = soroban_sdk::xdr::Error;
        #[inline(always)]
        fn try_from(val: &GeoPoint) -> Result<Self, soroban_sdk::xdr::Error> {
            extern crate alloc;
            soroban_sdk::xdr::ScMap::sorted_from(alloc::vec![
                soroban_sdk::xdr::ScMapEntry {
                    key: soroban_sdk::xdr::ScSymbol(
                        "lat_e6"
                            .try_into()
                            .map_err(|_| soroban_sdk::xdr::Error::Invalid)?
                    )
                    .into(),
                    val: (&val.lat_e6)
                        .try_into()
                        .map_err(|_| soroban_sdk::xdr::Error::Invalid)?,
                },
                soroban_sdk::xdr::ScMapEntry {
                    key: soroban_sdk::xdr::ScSymbol(
                        "lon_e6"
                            .try_into()
                            .map_err(|_| soroban_sdk::xdr::Error::Invalid)?
                    )
                    .into(),
                    val: (&val.lon_e6)
                        .try_into()
                        .map_err(|_| soroban_sdk::xdr::Error::Invalid)?,
                },
            ])
        }
    }

    impl TryFrom<GeoPoint> for soroban_sdk::xdr::ScMap {
        type Error = soroban_sdk::xdr::Error;
        #[inline(always)]
        fn try_from(val: GeoPoint) -> Result<Self, soroban_sdk::xdr::Error> {
            (&val).try_into()
        }
    }

    impl From<&GeoPoint> for soroban_sdk::xdr::ScVal {
        #[inline(always)]
        fn from(val: &GeoPoint) -> Self {
            let map: soroban_sdk::xdr::ScMap = val
                .try_into()
                .expect("GeoPoint to ScMap conversion is infallible");
            soroban_sdk::xdr::ScVal::Map(Some(map))
        }
    }

    impl From<GeoPoint> for soroban_sdk::xdr::ScVal {
        #[inline(always)]
        fn from(val: GeoPoint) -> Self {
            (&val).into()
        }
    }

    use soroban_sdk::testutils::arbitrary::arbitrary;
    use soroban_sdk::testutils::arbitrary::std;

    #[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, arbitrary::Arbitrary)]
    pub struct ArbitraryGeoPoint {
        lat_e6: <i32 as soroban_sdk::testutils::arbitrary::SorobanArbitrary>::Prototype,
        lon_e6: <i32 as soroban_sdk::testutils::arbitrary::SorobanArbitrary>::Prototype,
    }

    impl soroban_sdk::testutils::arbitrary::SorobanArbitrary for GeoPoint {
        type Prototype = ArbitraryGeoPoint;
    }

    impl soroban_sdk::TryFromVal<soroban_sdk::Env, ArbitraryGeoPoint> for GeoPoint {
        type Error = soroban_sdk::ConversionError;
        fn try_from_val(
            env: &soroban_sdk::Env,
            v: &ArbitraryGeoPoint,
        ) -> Result<Self, Self::Error> {
            Ok(GeoPoint {
                lat_e6: soroban_sdk::IntoVal::into_val(&v.lat_e6, env),
                lon_e6: soroban_sdk::IntoVal::into_val(&v.lon_e6, env),
            })
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonorProfile {
    pub address: Address,
    pub name: String,
    pub blood_type: BloodType,
    pub organs: Vec<OrganType>,
    pub location: String,
    pub coordinates: Option<GeoPoint>,
    pub verified: bool,
    pub suspended: bool,
    pub flagged: bool,
    pub deceased: bool,
    pub commitment_valid: bool,
    pub ipfs_hash: Option<String>,
    pub registered_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientProfile {
    pub address: Address,
    pub name: String,
    pub blood_type: BloodType,
    pub needed_organ: OrganType,
    pub urgency: UrgencyLevel,
    pub location: String,
    pub coordinates: Option<GeoPoint>,
    pub verified: bool,
    pub suspended: bool,
    pub flagged: bool,
    pub ipfs_hash: Option<String>,
    pub registered_at: u64,
}

/// A scored donor-patient pairing. Derived on demand from current
/// profiles and never persisted; it is stale the moment either party's
/// verification or availability changes.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchCandidate {
    pub donor: Address,
    pub patient: Address,
    pub organ_type: OrganType,
    pub match_score: u32,
    pub distance_km: u32,
    pub organ_available: bool,
}

/// Result of one match run. `unlocated` lists donors that were skipped
/// because their coordinates are unresolved, so callers can tell a
/// partial result from an empty one.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchReport {
    pub matches: Vec<MatchCandidate>,
    pub unlocated: Vec<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingVerification {
    pub address: Address,
    pub role: Role,
    pub name: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AvailableOrgan {
    pub donor: Address,
    pub organ_type: OrganType,
    pub verified: bool,
    pub deceased: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub admin: Address,
    pub matching_enabled: bool,
    pub urgency_weight: u32,
    pub high_priority_threshold: u32,
}

impl UrgencyLevel {
    pub fn ordinal(&self) -> u32 {
        match self {
            UrgencyLevel::Low => 1,
            UrgencyLevel::Medium => 2,
            UrgencyLevel::High => 3,
            UrgencyLevel::Critical => 4,
        }
    }
}
