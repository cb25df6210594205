use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    // Authorization errors
    NotAuthorized = 100,
    RoleMismatch = 101,

    // Registration and validation errors
    AlreadyRegistered = 200,
    MissingName = 201,
    NoOrgansListed = 202,
    MissingLocation = 203,

    // Lookup errors
    DonorNotFound = 300,
    PatientNotFound = 301,
    RoleNotFound = 302,

    // State errors
    InvalidState = 400,
    NotVerified = 401,
    AccountSuspended = 402,

    // Computation errors
    LocationUnresolved = 500,

    // System errors
    AlreadyInitialized = 600,
    NotInitialized = 601,
}
