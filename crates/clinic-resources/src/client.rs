use crate::catalog::DIAGNOSES;
use crate::models::{
    BloodType, BloodTypeDraft, Breed, BreedDraft, Diagnosis, DiagnosisDraft, Medication,
    MedicationDraft, Owner, OwnerDraft, Patient, PatientDraft, Species, SpeciesDraft,
};
use crate::{Page, ResourceSpec};
use clinic_gateway::{ApiError, ApiResult, Gateway};
use clinic_transport::HttpMethod;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::ops::Deref;
use tracing::{debug, info};

/// CRUD over one collection: entities `E` come back, drafts `D` go out.
pub struct ResourceClient<E, D = E> {
    gateway: Gateway,
    spec: ResourceSpec,
    _types: PhantomData<fn() -> (E, D)>,
}

impl<E, D> Clone for ResourceClient<E, D> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            spec: self.spec,
            _types: PhantomData,
        }
    }
}

/// Client over raw JSON, for collections without a typed model.
pub type UntypedClient = ResourceClient<Value, Value>;

pub type OwnerClient = ResourceClient<Owner, OwnerDraft>;
pub type PatientClient = ResourceClient<Patient, PatientDraft>;
pub type SpeciesClient = ResourceClient<Species, SpeciesDraft>;
pub type BreedClient = ResourceClient<Breed, BreedDraft>;
pub type BloodTypeClient = ResourceClient<BloodType, BloodTypeDraft>;
pub type MedicationClient = ResourceClient<Medication, MedicationDraft>;

impl<E, D> ResourceClient<E, D>
where
    E: DeserializeOwned,
    D: Serialize,
{
    pub fn new(gateway: Gateway, spec: ResourceSpec) -> Self {
        Self {
            gateway,
            spec,
            _types: PhantomData,
        }
    }

    pub fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Fetch one page (`page` is zero-based).
    pub async fn list(&self, page: u32, size: u32) -> ApiResult<Page<E>> {
        debug!(resource = %self.spec.name, page, size, "Listing");
        let value = self
            .gateway
            .get(&self.spec.list_path(page, size))
            .await?
            .into_json();
        Page::from_value(value, page, size).map_err(|e| self.decode_error(e))
    }

    pub async fn get(&self, id: i64) -> ApiResult<E> {
        self.gateway
            .call_json(&self.spec.item_path(id), HttpMethod::Get, None)
            .await
    }

    pub async fn create(&self, draft: &D) -> ApiResult<E> {
        let body = serde_json::to_value(draft).map_err(|e| self.decode_error(e))?;
        let created = self
            .gateway
            .call_json(&self.spec.create_path(), HttpMethod::Post, Some(body))
            .await?;
        info!(resource = %self.spec.name, "Created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, draft: &D) -> ApiResult<E> {
        let body = serde_json::to_value(draft).map_err(|e| self.decode_error(e))?;
        let updated = self
            .gateway
            .call_json(&self.spec.update_path(id), HttpMethod::Put, Some(body))
            .await?;
        info!(resource = %self.spec.name, id, "Updated");
        Ok(updated)
    }

    /// Delete by id. Whatever the backend answers on success is ignored.
    pub async fn remove(&self, id: i64) -> ApiResult<()> {
        self.gateway.delete(&self.spec.delete_path(id)).await?;
        info!(resource = %self.spec.name, id, "Deleted");
        Ok(())
    }

    fn decode_error(&self, err: serde_json::Error) -> ApiError {
        ApiError::Decode(format!("{}: {}", self.spec.name, err))
    }
}

/// Diagnoses add per-patient lookup on top of plain CRUD.
#[derive(Clone)]
pub struct DiagnosisClient {
    inner: ResourceClient<Diagnosis, DiagnosisDraft>,
}

impl DiagnosisClient {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            inner: ResourceClient::new(gateway, DIAGNOSES),
        }
    }

    /// Every diagnosis recorded for `patient_id`.
    pub async fn for_patient(&self, patient_id: i64) -> ApiResult<Vec<Diagnosis>> {
        let path = format!("{}/patient/{}", self.inner.spec.name, patient_id);
        let value = self.inner.gateway.get(&path).await?.into_json();
        let page: Page<Diagnosis> =
            Page::from_value(value, 0, 0).map_err(|e| self.inner.decode_error(e))?;
        Ok(page.items)
    }
}

impl Deref for DiagnosisClient {
    type Target = ResourceClient<Diagnosis, DiagnosisDraft>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MEDICATIONS, OWNERS};
    use clinic_auth::roles::ROLE_ADMIN;
    use clinic_auth::testing::fresh_token;
    use clinic_auth::SessionManager;
    use clinic_storage::{MemoryTokenStore, StoreKeys, TokenStore, TokenVault};
    use clinic_transport::{ApiResponse, StubTransport};
    use serde_json::json;
    use std::sync::Arc;

    async fn gateway(stub: Arc<StubTransport>) -> Gateway {
        let store = Arc::new(MemoryTokenStore::new());
        store
            .set(StoreKeys::ACCESS_TOKEN, &fresh_token("admin", &[ROLE_ADMIN]))
            .unwrap();
        store.set(StoreKeys::REFRESH_TOKEN, "r1").unwrap();
        let auth = Arc::new(SessionManager::new(TokenVault::new(store), stub.clone()));
        auth.bootstrap().await.unwrap();
        Gateway::new(auth, stub)
    }

    #[tokio::test]
    async fn test_list_uses_page_and_size() {
        let stub = Arc::new(StubTransport::new());
        stub.respond(
            HttpMethod::Get,
            "owners",
            ApiResponse::json(
                200,
                &json!({
                    "content": [{ "id": 1, "fullName": "Jane Doe", "phone": "555" }],
                    "totalElements": 11,
                    "totalPages": 2
                }),
            ),
        );
        let client: OwnerClient = ResourceClient::new(gateway(stub.clone()).await, OWNERS);

        let page = client.list(1, 10).await.unwrap();

        assert_eq!(page.items[0].full_name, "Jane Doe");
        assert_eq!(page.total_pages, 2);
        assert_eq!(stub.requests()[0].path, "owners?page=1&size=10");
    }

    #[tokio::test]
    async fn test_action_segment_resource_routes() {
        let stub = Arc::new(StubTransport::new());
        let medication = json!({ "id": 4, "name": "Amoxicillin", "unit": "mg", "stockWarningLevel": 20 });
        stub.respond(HttpMethod::Get, "medication/find/4", ApiResponse::json(200, &medication));
        stub.respond(HttpMethod::Post, "medication/create", ApiResponse::json(201, &medication));
        stub.respond(HttpMethod::Put, "medication/update/4", ApiResponse::json(200, &medication));
        stub.respond(HttpMethod::Delete, "medication/delete/4", ApiResponse::text(200, "deleted"));
        let client: MedicationClient = ResourceClient::new(gateway(stub.clone()).await, MEDICATIONS);

        let draft = MedicationDraft {
            name: "Amoxicillin".to_string(),
            unit: "mg".to_string(),
            ..MedicationDraft::default()
        };
        assert_eq!(client.get(4).await.unwrap().name, "Amoxicillin");
        assert_eq!(client.create(&draft).await.unwrap().id, 4);
        assert_eq!(client.update(4, &draft).await.unwrap().unit, "mg");
        client.remove(4).await.unwrap();

        let posted = stub
            .requests()
            .into_iter()
            .find(|r| r.method == HttpMethod::Post)
            .and_then(|r| r.body)
            .unwrap();
        assert_eq!(posted["stockWarningLevel"], 20);
    }

    #[tokio::test]
    async fn test_remove_propagates_forbidden() {
        let stub = Arc::new(StubTransport::new());
        stub.respond(HttpMethod::Delete, "owners/5", ApiResponse::empty(403));
        let client: OwnerClient = ResourceClient::new(gateway(stub.clone()).await, OWNERS);

        assert!(matches!(client.remove(5).await, Err(ApiError::Forbidden)));
    }

    #[tokio::test]
    async fn test_untyped_client_passes_json_through() {
        let stub = Arc::new(StubTransport::new());
        stub.respond(
            HttpMethod::Get,
            "prescriptions/2",
            ApiResponse::json(200, &json!({ "id": 2, "dosage": "5ml" })),
        );
        let client: UntypedClient =
            ResourceClient::new(gateway(stub.clone()).await, crate::catalog::PRESCRIPTIONS);

        assert_eq!(client.get(2).await.unwrap()["dosage"], "5ml");
    }

    #[tokio::test]
    async fn test_diagnoses_for_patient() {
        let stub = Arc::new(StubTransport::new());
        stub.respond(
            HttpMethod::Get,
            "diagnosis/patient/7",
            ApiResponse::json(
                200,
                &json!([
                    { "id": 1, "diagnosis": "Otitis", "treatmentPlan": "Drops" },
                    { "id": 2, "diagnosis": "Fracture", "treatmentPlan": "Cast" }
                ]),
            ),
        );
        let client = DiagnosisClient::new(gateway(stub.clone()).await);

        let diagnoses = client.for_patient(7).await.unwrap();

        assert_eq!(diagnoses.len(), 2);
        assert_eq!(diagnoses[1].treatment_plan, "Cast");
        assert_eq!(client.spec().name, "diagnosis");
    }

    #[tokio::test]
    async fn test_list_with_wrong_shape_is_decode_error() {
        let stub = Arc::new(StubTransport::new());
        stub.respond(
            HttpMethod::Get,
            "owners",
            ApiResponse::json(200, &json!({ "content": [{ "unexpected": true }] })),
        );
        let client: OwnerClient = ResourceClient::new(gateway(stub.clone()).await, OWNERS);

        assert!(matches!(client.list(0, 10).await, Err(ApiError::Decode(_))));
    }
}
