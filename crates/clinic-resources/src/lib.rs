//! Generic CRUD clients over the clinic's REST collections.
//!
//! A [`ResourceSpec`] names a collection and its path convention; a
//! [`ResourceClient`] turns list/get/create/update/remove into gateway
//! calls for it. The [`catalog`] lists every collection the console uses.

pub mod catalog;
mod client;
pub mod models;
mod page;
mod spec;

pub use catalog::{lookup, CATALOG};
pub use client::{
    BloodTypeClient, BreedClient, DiagnosisClient, MedicationClient, OwnerClient, PatientClient,
    ResourceClient, SpeciesClient, UntypedClient,
};
pub use page::Page;
pub use spec::{ResourceSpec, RouteStyle};
