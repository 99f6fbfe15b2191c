//! Clinic entities as returned by the backend, and the drafts posted to
//! create or update them.
//!
//! Entities embed their references (`patient.owner.fullName`); drafts carry
//! only the referenced ids. The backend enforces referential integrity.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDraft {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl From<&Owner> for OwnerDraft {
    fn from(owner: &Owner) -> Self {
        Self {
            full_name: owner.full_name.clone(),
            phone: owner.phone.clone(),
            email: owner.email.clone().unwrap_or_default(),
            address: owner.address.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesDraft {
    pub name: String,
}

impl From<&Species> for SpeciesDraft {
    fn from(species: &Species) -> Self {
        Self {
            name: species.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breed {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub species: Option<Species>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreedDraft {
    pub name: String,
    pub species_id: Option<i64>,
}

impl From<&Breed> for BreedDraft {
    fn from(breed: &Breed) -> Self {
        Self {
            name: breed.name.clone(),
            species_id: breed.species.as_ref().map(|s| s.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodType {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub species: Option<Species>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodTypeDraft {
    #[serde(rename = "type")]
    pub kind: String,
    pub species_id: Option<i64>,
}

impl From<&BloodType> for BloodTypeDraft {
    fn from(blood_type: &BloodType) -> Self {
        Self {
            kind: blood_type.kind.clone(),
            species_id: blood_type.species.as_ref().map(|s| s.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub chip_number: String,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub species: Option<Species>,
    #[serde(default)]
    pub breed: Option<Breed>,
    #[serde(default)]
    pub blood_type: Option<BloodType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDraft {
    pub name: String,
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub chip_number: String,
    pub blood_type_id: Option<i64>,
    pub owner_id: Option<i64>,
    pub species_id: Option<i64>,
    pub breed_id: Option<i64>,
}

impl From<&Patient> for PatientDraft {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            age: patient.age,
            weight: patient.weight,
            chip_number: patient.chip_number.clone(),
            blood_type_id: patient.blood_type.as_ref().map(|b| b.id),
            owner_id: patient.owner.as_ref().map(|o| o.id),
            species_id: patient.species.as_ref().map(|s| s.id),
            breed_id: patient.breed.as_ref().map(|b| b.id),
        }
    }
}

/// Default stock level below which a medication is flagged.
pub const DEFAULT_STOCK_WARNING_LEVEL: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub stock_warning_level: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationDraft {
    pub name: String,
    pub unit: String,
    pub stock_warning_level: i64,
}

impl Default for MedicationDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            unit: String::new(),
            stock_warning_level: DEFAULT_STOCK_WARNING_LEVEL,
        }
    }
}

impl From<&Medication> for MedicationDraft {
    fn from(medication: &Medication) -> Self {
        Self {
            name: medication.name.clone(),
            unit: medication.unit.clone(),
            stock_warning_level: medication.stock_warning_level,
        }
    }
}

/// Veterinarian as embedded in a diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vet {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub specialization: Option<VetSpecialization>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetSpecialization {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub id: i64,
    pub diagnosis: String,
    #[serde(default)]
    pub treatment_plan: String,
    #[serde(default)]
    pub patient: Option<Patient>,
    #[serde(default)]
    pub vet: Option<Vet>,
    /// Server timestamp, kept as sent.
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisDraft {
    pub patient_id: Option<i64>,
    pub vet_id: Option<i64>,
    pub diagnosis: String,
    pub treatment_plan: String,
}

impl From<&Diagnosis> for DiagnosisDraft {
    fn from(diagnosis: &Diagnosis) -> Self {
        Self {
            patient_id: diagnosis.patient.as_ref().map(|p| p.id),
            vet_id: diagnosis.vet.as_ref().map(|v| v.id),
            diagnosis: diagnosis.diagnosis.clone(),
            treatment_plan: diagnosis.treatment_plan.clone(),
        }
    }
}
