//! One schema per entity screen.

use crate::FieldKind::{Email, NonNegativeInteger, PositiveDecimal, Reference, Text};
use crate::{Column, FieldSpec, ScreenSchema};
use clinic_resources::catalog;

pub const OWNERS: ScreenSchema = ScreenSchema {
    resource: catalog::OWNERS,
    noun: "Owner",
    fields: &[
        FieldSpec::required("fullName", "Full name", Text),
        FieldSpec::required("phone", "Phone", Text),
        FieldSpec::optional("email", "Email", Email),
        FieldSpec::optional("address", "Address", Text),
    ],
    columns: &[
        Column::new("Full name", "fullName"),
        Column::new("Phone", "phone"),
        Column::new("Email", "email"),
        Column::new("Address", "address"),
    ],
    search_fields: &["fullName", "phone", "email"],
};

pub const PATIENTS: ScreenSchema = ScreenSchema {
    resource: catalog::PATIENTS,
    noun: "Patient",
    fields: &[
        FieldSpec::required("name", "Name", Text),
        FieldSpec::required("age", "Age", NonNegativeInteger),
        FieldSpec::required("weight", "Weight", PositiveDecimal),
        FieldSpec::required("chipNumber", "Chip number", Text),
        FieldSpec::required("ownerId", "Owner", Reference),
        FieldSpec::required("speciesId", "Species", Reference),
        FieldSpec::required("breedId", "Breed", Reference),
        FieldSpec::required("bloodTypeId", "Blood type", Reference),
    ],
    columns: &[
        Column::new("Name", "name"),
        Column::new("Chip number", "chipNumber"),
        Column::new("Age", "age"),
        Column::new("Weight", "weight"),
        Column::new("Owner", "owner.fullName"),
        Column::new("Species", "species.name"),
        Column::new("Breed", "breed.name"),
        Column::new("Blood type", "bloodType.type"),
    ],
    search_fields: &["name", "chipNumber", "owner.fullName"],
};

pub const SPECIES: ScreenSchema = ScreenSchema {
    resource: catalog::SPECIES,
    noun: "Species",
    fields: &[FieldSpec::required("name", "Name", Text)],
    columns: &[Column::new("Name", "name")],
    search_fields: &["name"],
};

pub const BREEDS: ScreenSchema = ScreenSchema {
    resource: catalog::BREEDS,
    noun: "Breed",
    fields: &[
        FieldSpec::required("name", "Name", Text),
        FieldSpec::required("speciesId", "Species", Reference),
    ],
    columns: &[Column::new("Name", "name"), Column::new("Species", "species.name")],
    search_fields: &["name", "species.name"],
};

pub const BLOOD_TYPES: ScreenSchema = ScreenSchema {
    resource: catalog::BLOOD_TYPES,
    noun: "Blood type",
    fields: &[
        FieldSpec::required("type", "Type", Text),
        FieldSpec::required("speciesId", "Species", Reference),
    ],
    columns: &[Column::new("Type", "type"), Column::new("Species", "species.name")],
    search_fields: &["type", "species.name"],
};

pub const MEDICATIONS: ScreenSchema = ScreenSchema {
    resource: catalog::MEDICATIONS,
    noun: "Medication",
    fields: &[
        FieldSpec::required("name", "Name", Text),
        FieldSpec::required("unit", "Unit", Text),
        FieldSpec::required("stockWarningLevel", "Stock warning level", NonNegativeInteger),
    ],
    columns: &[
        Column::new("Name", "name"),
        Column::new("Unit", "unit"),
        Column::new("Stock warning level", "stockWarningLevel"),
    ],
    search_fields: &["name", "unit"],
};

pub const DIAGNOSES: ScreenSchema = ScreenSchema {
    resource: catalog::DIAGNOSES,
    noun: "Diagnosis",
    fields: &[
        FieldSpec::required("patientId", "Patient", Reference),
        FieldSpec::optional("vetId", "Veterinarian", Reference),
        FieldSpec::required("diagnosis", "Diagnosis", Text),
        FieldSpec::required("treatmentPlan", "Treatment plan", Text),
    ],
    columns: &[
        Column::new("Patient", "patient.name"),
        Column::new("Diagnosis", "diagnosis"),
        Column::new("Treatment plan", "treatmentPlan"),
        Column::new("Date", "createdAt"),
    ],
    search_fields: &["diagnosis", "treatmentPlan", "patient.name"],
};

pub const ALL: &[ScreenSchema] = &[
    OWNERS,
    PATIENTS,
    SPECIES,
    BREEDS,
    BLOOD_TYPES,
    MEDICATIONS,
    DIAGNOSES,
];

/// Schema for a collection name or alias.
pub fn for_resource(name: &str) -> Option<&'static ScreenSchema> {
    ALL.iter().find(|schema| schema.resource.answers_to(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_fields_and_columns_are_well_formed() {
        for schema in ALL {
            assert!(!schema.fields.is_empty(), "{}", schema.noun);
            assert!(!schema.search_fields.is_empty(), "{}", schema.noun);
            for path in schema.search_fields {
                assert!(!path.is_empty() && !path.ends_with('.'), "{}: {}", schema.noun, path);
            }
        }
    }

    #[test]
    fn test_for_resource() {
        assert_eq!(for_resource("owners").map(|s| s.noun), Some("Owner"));
        assert_eq!(for_resource("medications").map(|s| s.noun), Some("Medication"));
        assert!(for_resource("prescriptions").is_none());
    }
}
