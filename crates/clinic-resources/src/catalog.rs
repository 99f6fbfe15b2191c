//! Collections exposed by the clinic backend.

use crate::ResourceSpec;

pub const OWNERS: ResourceSpec = ResourceSpec::uniform("owners", "Owners").with_aliases(&["owner"]);
pub const PATIENTS: ResourceSpec =
    ResourceSpec::uniform("patients", "Patients").with_aliases(&["patient"]);
pub const SPECIES: ResourceSpec = ResourceSpec::uniform("species", "Species");
pub const BREEDS: ResourceSpec = ResourceSpec::uniform("breeds", "Breeds").with_aliases(&["breed"]);
pub const BLOOD_TYPES: ResourceSpec = ResourceSpec::uniform("bloodTypes", "Blood types")
    .with_aliases(&["blood-types", "blood_types", "bloodtype"]);
pub const MEDICATIONS: ResourceSpec =
    ResourceSpec::action_segments("medication", "Medications").with_aliases(&["medications"]);
pub const DIAGNOSES: ResourceSpec =
    ResourceSpec::action_segments("diagnosis", "Diagnoses").with_aliases(&["diagnoses"]);
pub const MEDICATION_BATCHES: ResourceSpec =
    ResourceSpec::uniform("medication-batch", "Medication batches")
        .with_aliases(&["medication-batches"]);
pub const PRESCRIPTIONS: ResourceSpec =
    ResourceSpec::uniform("prescriptions", "Prescriptions").with_aliases(&["prescription"]);

pub const CATALOG: &[ResourceSpec] = &[
    OWNERS,
    PATIENTS,
    SPECIES,
    BREEDS,
    BLOOD_TYPES,
    MEDICATIONS,
    DIAGNOSES,
    MEDICATION_BATCHES,
    PRESCRIPTIONS,
];

/// Find a collection by name or alias, ignoring case.
pub fn lookup(name: &str) -> Option<ResourceSpec> {
    CATALOG.iter().copied().find(|spec| spec.answers_to(name))
}
