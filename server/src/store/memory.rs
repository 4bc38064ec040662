use std::sync::Arc;

use tokio::sync::RwLock;

use super::{PatientStore, StoreResult};
use crate::model::Patient;

/// Process-local collection. Clones share the same documents.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    patients: Arc<RwLock<Vec<Patient>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patients(patients: Vec<Patient>) -> Self {
        Self {
            patients: Arc::new(RwLock::new(patients)),
        }
    }
}

impl PatientStore for MemoryStore {
    async fn count(&self) -> StoreResult<u64> {
        Ok(self.patients.read().await.len() as u64)
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Patient>> {
        let patients = self.patients.read().await;
        Ok(patients.iter().find(|p| p.id == id).cloned())
    }

    async fn page(&self, offset: u64, limit: u64) -> StoreResult<Vec<Patient>> {
        let patients = self.patients.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(patients.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn modify<F, T>(&self, id: i64, apply: F) -> StoreResult<Option<T>>
    where
        F: FnOnce(&mut Patient) -> T + Send + 'static,
        T: Send + 'static,
    {
        let mut patients = self.patients.write().await;
        Ok(patients.iter_mut().find(|p| p.id == id).map(apply))
    }

    async fn replace_all(&self, patients: Vec<Patient>) -> StoreResult<()> {
        *self.patients.write().await = patients;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(id: i64) -> Patient {
        Patient {
            id,
            name: format!("Patient{id}"),
            first_name: "Test".to_string(),
            age: 50,
            height: 170.0,
            weight: 70.0,
            gender: "female".to_string(),
            medications: vec![],
            body_temperatures: vec![],
        }
    }

    #[tokio::test]
    async fn page_preserves_insertion_order() {
        let store = MemoryStore::with_patients(vec![patient(5), patient(1), patient(3)]);
        let ids: Vec<i64> = store.page(1, 10).await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn page_past_end_is_empty() {
        let store = MemoryStore::with_patients(vec![patient(0)]);
        assert!(store.page(10, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn modify_is_visible_through_clones() {
        let store = MemoryStore::with_patients(vec![patient(0)]);
        let other = store.clone();
        let name = other
            .modify(0, |p| {
                p.name = "Renamed".to_string();
                p.name.clone()
            })
            .await
            .unwrap();
        assert_eq!(name.as_deref(), Some("Renamed"));
        assert_eq!(store.find(0).await.unwrap().unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn modify_unknown_patient_returns_none() {
        let store = MemoryStore::new();
        assert!(store.modify(9, |_| ()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_modifies_are_not_lost() {
        let store = MemoryStore::with_patients(vec![patient(0)]);
        let mut tasks = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store
                    .modify(0, move |p| p.body_temperatures.push(crate::model::Temperature {
                        date: format!("day-{i}"),
                        temperature: 37.0,
                        last_modified: None,
                    }))
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        let stored = store.find(0).await.unwrap().unwrap();
        assert_eq!(stored.body_temperatures.len(), 32);
    }

    #[tokio::test]
    async fn replace_all_swaps_the_collection() {
        let store = MemoryStore::with_patients(vec![patient(0), patient(1)]);
        store.replace_all(vec![patient(9)]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.find(0).await.unwrap().is_none());
    }
}
