//! Role tags issued by the backend.

pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_VETERINARIAN: &str = "ROLE_VETERINARIAN";
pub const ROLE_RECEPTIONIST: &str = "ROLE_RECEPTIONIST";

/// Roles allowed on patient and owner screens.
pub const FRONT_DESK: &[&str] = &[ROLE_ADMIN, ROLE_VETERINARIAN, ROLE_RECEPTIONIST];

/// Roles allowed on clinical reference data (species, breeds, medications...).
pub const CLINICAL: &[&str] = &[ROLE_ADMIN, ROLE_VETERINARIAN];
