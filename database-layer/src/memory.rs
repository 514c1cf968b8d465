//! In-memory `PrescriptionStore` for tests and database-less runs.
//!
//! Mirrors the Postgres schema: generated serial ids, a unique email index,
//! a foreign key from prescriptions to pharmacists and cascade delete.

use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{NewPharmacist, NewPrescription, Pharmacist, Prescription, ProfileUpdate};
use crate::repository::PrescriptionStore;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct InMemoryPrescriptionStore {
    pharmacists: Arc<DashMap<i32, Pharmacist>>,
    /// email -> pharmacist id; plays the role of `ux_pharmacists_email`
    emails: Arc<DashMap<String, i32>>,
    prescriptions: Arc<DashMap<i32, Prescription>>,
    next_pharmacist_id: Arc<AtomicI32>,
    next_prescription_id: Arc<AtomicI32>,
}

impl InMemoryPrescriptionStore {
    pub fn new() -> Self {
        Self {
            pharmacists: Arc::new(DashMap::new()),
            emails: Arc::new(DashMap::new()),
            prescriptions: Arc::new(DashMap::new()),
            next_pharmacist_id: Arc::new(AtomicI32::new(1)),
            next_prescription_id: Arc::new(AtomicI32::new(1)),
        }
    }

    pub fn pharmacist_count(&self) -> usize {
        self.pharmacists.len()
    }

    pub fn prescription_count(&self) -> usize {
        self.prescriptions.len()
    }
}

impl Default for InMemoryPrescriptionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrescriptionStore for InMemoryPrescriptionStore {
    async fn find_pharmacist_by_email(&self, email: &str) -> DatabaseResult<Option<Pharmacist>> {
        let Some(id) = self.emails.get(email).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.pharmacists.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_pharmacist_by_id(&self, id: i32) -> DatabaseResult<Option<Pharmacist>> {
        Ok(self.pharmacists.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert_pharmacist(&self, pharmacist: &NewPharmacist) -> DatabaseResult<i32> {
        // Holding the vacant entry makes check-and-claim a single step.
        let Entry::Vacant(slot) = self.emails.entry(pharmacist.email.clone()) else {
            return Err(DatabaseError::DuplicateEmail);
        };

        let id = self.next_pharmacist_id.fetch_add(1, Ordering::SeqCst);
        self.pharmacists.insert(
            id,
            Pharmacist {
                id,
                email: pharmacist.email.clone(),
                password_hash: pharmacist.password_hash.clone(),
                full_name: pharmacist.full_name.clone(),
                height: pharmacist.height,
                weight: pharmacist.weight,
                birth_of_date: pharmacist.birth_of_date,
            },
        );
        slot.insert(id);

        Ok(id)
    }

    async fn update_pharmacist(
        &self,
        existing: &Pharmacist,
        update: &ProfileUpdate,
    ) -> DatabaseResult<()> {
        if !self.pharmacists.contains_key(&existing.id) {
            return Err(DatabaseError::QueryFailed(format!(
                "pharmacist {} disappeared before update",
                existing.id
            )));
        }

        if update.email != existing.email {
            match self.emails.entry(update.email.clone()) {
                Entry::Occupied(_) => return Err(DatabaseError::DuplicateEmail),
                Entry::Vacant(slot) => {
                    slot.insert(existing.id);
                }
            }
            self.emails.remove(&existing.email);
        }

        if let Some(mut row) = self.pharmacists.get_mut(&existing.id) {
            update.apply_to(row.value_mut());
        }

        Ok(())
    }

    async fn delete_pharmacist(&self, id: i32) -> DatabaseResult<bool> {
        let Some((_, removed)) = self.pharmacists.remove(&id) else {
            return Ok(false);
        };
        self.emails.remove(&removed.email);
        self.prescriptions
            .retain(|_, prescription| prescription.pharmacist_id != id);
        Ok(true)
    }

    async fn insert_prescription(&self, prescription: &NewPrescription) -> DatabaseResult<i32> {
        if !self.pharmacists.contains_key(&prescription.pharmacist_id) {
            return Err(DatabaseError::QueryFailed(format!(
                "insert on prescriptions violates foreign key: pharmacist {} does not exist",
                prescription.pharmacist_id
            )));
        }

        let id = self.next_prescription_id.fetch_add(1, Ordering::SeqCst);
        self.prescriptions.insert(
            id,
            Prescription {
                id,
                image_name: prescription.image_name.clone(),
                predicted_text: prescription.predicted_text.clone(),
                created_at: Utc::now(),
                pharmacist_id: prescription.pharmacist_id,
            },
        );

        Ok(id)
    }

    async fn list_prescriptions_by_pharmacist(
        &self,
        pharmacist_id: i32,
    ) -> DatabaseResult<Vec<Prescription>> {
        let mut prescriptions: Vec<Prescription> = self
            .prescriptions
            .iter()
            .filter(|entry| entry.value().pharmacist_id == pharmacist_id)
            .map(|entry| entry.value().clone())
            .collect();
        prescriptions.sort_by_key(|prescription| prescription.id);
        Ok(prescriptions)
    }

    async fn find_prescription_by_id(&self, id: i32) -> DatabaseResult<Option<Prescription>> {
        Ok(self.prescriptions.get(&id).map(|entry| entry.value().clone()))
    }

    async fn delete_prescription_by_id(&self, id: i32) -> DatabaseResult<bool> {
        Ok(self.prescriptions.remove(&id).is_some())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn new_pharmacist(email: &str) -> NewPharmacist {
        NewPharmacist {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            full_name: "Dana Pharm".to_string(),
            height: Decimal::new(17250, 2),
            weight: Decimal::new(6800, 2),
            birth_of_date: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
        }
    }

    fn new_prescription(pharmacist_id: i32, text: &str) -> NewPrescription {
        NewPrescription {
            image_name: "img1.png".to_string(),
            predicted_text: text.to_string(),
            pharmacist_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = InMemoryPrescriptionStore::new();
        store.insert_pharmacist(&new_pharmacist("a@rx.test")).await.unwrap();

        let err = store
            .insert_pharmacist(&new_pharmacist("a@rx.test"))
            .await
            .unwrap_err();

        assert!(matches!(err, DatabaseError::DuplicateEmail));
        assert_eq!(store.pharmacist_count(), 1);
    }

    #[tokio::test]
    async fn test_email_lookup_is_exact() {
        let store = InMemoryPrescriptionStore::new();
        store.insert_pharmacist(&new_pharmacist("Case@rx.test")).await.unwrap();

        assert!(store.find_pharmacist_by_email("case@rx.test").await.unwrap().is_none());
        assert!(store.find_pharmacist_by_email("Case@rx.test").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_registrations_yield_one_row() {
        let store = InMemoryPrescriptionStore::new();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.insert_pharmacist(&new_pharmacist("race@rx.test")).await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.pharmacist_count(), 1);
    }

    #[tokio::test]
    async fn test_prescription_requires_existing_pharmacist() {
        let store = InMemoryPrescriptionStore::new();

        let result = store.insert_prescription(&new_prescription(42, "Ibuprofen")).await;

        assert!(result.is_err());
        assert_eq!(store.prescription_count(), 0);
    }

    #[tokio::test]
    async fn test_list_is_filtered_and_in_insertion_order() {
        let store = InMemoryPrescriptionStore::new();
        let alice = store.insert_pharmacist(&new_pharmacist("alice@rx.test")).await.unwrap();
        let bob = store.insert_pharmacist(&new_pharmacist("bob@rx.test")).await.unwrap();

        store.insert_prescription(&new_prescription(alice, "first")).await.unwrap();
        store.insert_prescription(&new_prescription(bob, "other")).await.unwrap();
        store.insert_prescription(&new_prescription(alice, "second")).await.unwrap();

        let listed = store.list_prescriptions_by_pharmacist(alice).await.unwrap();
        let texts: Vec<&str> = listed.iter().map(|p| p.predicted_text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_delete_prescription_reports_missing_rows() {
        let store = InMemoryPrescriptionStore::new();
        let owner = store.insert_pharmacist(&new_pharmacist("del@rx.test")).await.unwrap();
        let id = store.insert_prescription(&new_prescription(owner, "x")).await.unwrap();

        assert!(store.delete_prescription_by_id(id).await.unwrap());
        assert!(!store.delete_prescription_by_id(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_deleting_pharmacist_cascades() {
        let store = InMemoryPrescriptionStore::new();
        let owner = store.insert_pharmacist(&new_pharmacist("gone@rx.test")).await.unwrap();
        store.insert_prescription(&new_prescription(owner, "a")).await.unwrap();
        store.insert_prescription(&new_prescription(owner, "b")).await.unwrap();

        assert!(store.delete_pharmacist(owner).await.unwrap());

        assert_eq!(store.prescription_count(), 0);
        assert!(store.find_pharmacist_by_email("gone@rx.test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_overwrites_profile_fields() {
        let store = InMemoryPrescriptionStore::new();
        let id = store.insert_pharmacist(&new_pharmacist("upd@rx.test")).await.unwrap();
        let existing = store.find_pharmacist_by_id(id).await.unwrap().unwrap();

        let update = ProfileUpdate {
            email: "upd@rx.test".to_string(),
            full_name: "Renamed".to_string(),
            height: Decimal::new(180, 0),
            weight: Decimal::new(75, 0),
            birth_of_date: NaiveDate::from_ymd_opt(1985, 1, 1).unwrap(),
        };
        store.update_pharmacist(&existing, &update).await.unwrap();

        let reloaded = store.find_pharmacist_by_id(id).await.unwrap().unwrap();
        assert_eq!(reloaded.full_name, "Renamed");
        assert_eq!(reloaded.height, Decimal::new(180, 0));
        assert_eq!(reloaded.password_hash, existing.password_hash);
    }

    #[tokio::test]
    async fn test_update_to_taken_email_is_rejected() {
        let store = InMemoryPrescriptionStore::new();
        store.insert_pharmacist(&new_pharmacist("taken@rx.test")).await.unwrap();
        let id = store.insert_pharmacist(&new_pharmacist("mine@rx.test")).await.unwrap();
        let existing = store.find_pharmacist_by_id(id).await.unwrap().unwrap();

        let update = ProfileUpdate {
            email: "taken@rx.test".to_string(),
            full_name: existing.full_name.clone(),
            height: existing.height,
            weight: existing.weight,
            birth_of_date: existing.birth_of_date,
        };

        let err = store.update_pharmacist(&existing, &update).await.unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateEmail));
        assert_eq!(
            store.find_pharmacist_by_id(id).await.unwrap().unwrap().email,
            "mine@rx.test"
        );
    }
}
